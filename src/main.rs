use anyhow::Result;
use chrono::{Local, NaiveDate};
use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum};
use fintrack::core::filter::FilterSelection;
use fintrack::core::log::init_logging;
use fintrack::core::transaction::{
    NewTransaction, TransactionId, TransactionKind, TransactionPatch, YearMonth,
};
use rust_decimal::Decimal;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Clone, Copy, ValueEnum)]
enum KindArg {
    Income,
    Expense,
}

impl From<KindArg> for TransactionKind {
    fn from(kind: KindArg) -> TransactionKind {
        match kind {
            KindArg::Income => TransactionKind::Income,
            KindArg::Expense => TransactionKind::Expense,
        }
    }
}

#[derive(Args)]
struct FilterArgs {
    /// Only income or only expense transactions
    #[arg(long = "type", value_enum)]
    kind: Option<KindArg>,

    /// Only transactions in this category
    #[arg(long)]
    category: Option<String>,

    /// Only transactions in this month (YYYY-MM)
    #[arg(long)]
    month: Option<YearMonth>,
}

impl From<FilterArgs> for FilterSelection {
    fn from(args: FilterArgs) -> FilterSelection {
        FilterSelection {
            kind: args.kind.map(Into::into),
            category: args.category,
            month: args.month,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Display totals, expenses by category and the monthly trend
    Summary(FilterArgs),
    /// List transactions, most recent first
    List(FilterArgs),
    /// List months that have transactions
    Months,
    /// Record a new transaction
    Add {
        #[arg(long = "type", value_enum)]
        kind: KindArg,
        #[arg(long)]
        amount: Decimal,
        #[arg(long)]
        category: String,
        #[arg(long)]
        description: String,
        /// Defaults to today (YYYY-MM-DD)
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Change fields of an existing transaction
    Edit {
        id: TransactionId,
        #[arg(long = "type", value_enum)]
        kind: Option<KindArg>,
        #[arg(long)]
        amount: Option<Decimal>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        date: Option<NaiveDate>,
    },
}

impl From<Commands> for fintrack::AppCommand {
    fn from(cmd: Commands) -> fintrack::AppCommand {
        match cmd {
            Commands::Summary(filter) => fintrack::AppCommand::Summary(filter.into()),
            Commands::List(filter) => fintrack::AppCommand::List(filter.into()),
            Commands::Months => fintrack::AppCommand::Months,
            Commands::Add {
                kind,
                amount,
                category,
                description,
                date,
            } => fintrack::AppCommand::Add(NewTransaction {
                kind: kind.into(),
                amount,
                category,
                description,
                date: date.unwrap_or_else(|| Local::now().date_naive()),
            }),
            Commands::Edit {
                id,
                kind,
                amount,
                category,
                description,
                date,
            } => fintrack::AppCommand::Edit {
                id,
                patch: TransactionPatch {
                    kind: kind.map(Into::into),
                    amount,
                    category,
                    description,
                    date,
                },
            },
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => fintrack::cli::setup::setup(),
        Some(cmd) => fintrack::run_command(cmd.into(), cli.config_path.as_deref()).await,
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
