pub mod cli;
pub mod core;
pub mod providers;
pub mod store;

use crate::core::config::AppConfig;
use crate::core::dashboard::DashboardCache;
use crate::core::filter::FilterSelection;
use crate::core::identity::IdentityProvider;
use crate::core::transaction::{NewTransaction, OwnerId, TransactionId, TransactionPatch};
use crate::providers::local_identity::LocalIdentityProvider;
use crate::store::TransactionStore;
use anyhow::{Result, bail};
use tracing::{debug, info};

pub enum AppCommand {
    Summary(FilterSelection),
    List(FilterSelection),
    Months,
    Add(NewTransaction),
    Edit {
        id: TransactionId,
        patch: TransactionPatch,
    },
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("fintrack starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let repository = store::open_repository(&config)?;
    let identity = LocalIdentityProvider::new(config.owner.as_deref().map(OwnerId::from));
    let mut store = TransactionStore::new(repository);

    let spinner = cli::ui::new_spinner("Loading transactions...");
    let started = store.start(&identity).await;
    spinner.finish_and_clear();
    started?;

    if store.owner().is_none() {
        bail!("No owner configured; set `owner` in the configuration file");
    }

    let cache = DashboardCache::new();
    let currency = config.currency.as_str();
    match command {
        AppCommand::Summary(filter) => cli::summary::run(&store, &cache, &filter, currency).await,
        AppCommand::List(filter) => cli::list::run(&store, &cache, &filter, currency).await,
        AppCommand::Months => cli::list::run_months(&store, &cache).await,
        AppCommand::Add(input) => {
            cli::edit::add(&mut store, input, currency).await?;
        }
        AppCommand::Edit { id, patch } => {
            cli::edit::edit(&mut store, &id, patch, currency).await?;
        }
    }

    let mut events = identity.subscribe();
    store.sign_out(&identity).await?;
    store.follow(&mut events).await;
    debug!("Session closed");
    Ok(())
}
