pub mod local_identity;

// Re-export the identity trait alongside its implementations
pub use crate::core::identity::IdentityProvider;
pub use local_identity::LocalIdentityProvider;
