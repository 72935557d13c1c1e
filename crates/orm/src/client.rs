//! Global repository factory singleton.
//!
//! Provides a set-once factory that can be accessed from anywhere in the application.

use std::sync::{Arc, OnceLock};

use drupal_jsonapi_schema::Model;
use thiserror::Error;

use crate::factory::RepositoryFactory;
use crate::repository::BaseRepository;

static GLOBAL_FACTORY: OnceLock<RepositoryFactory> = OnceLock::new();

/// Returned when the global factory is initialized twice.
#[derive(Error, Debug, Clone)]
#[error("ORM client has already been initialized. OrmClient::init() can only be called once per process.")]
pub struct ClientAlreadyInitializedError;

/// Access to the process-wide [`RepositoryFactory`].
///
/// # Example
/// ```ignore
/// use drupal_jsonapi_orm::{OrmClient, RepositoryFactory};
/// use drupal_jsonapi_client::ClientConfig;
///
/// // Initialize once at application startup
/// OrmClient::init(RepositoryFactory::from_config(ClientConfig::from_env()?)?)?;
///
/// // Access from anywhere
/// let articles = OrmClient::repository::<Article>()?;
/// ```
pub struct OrmClient;

impl OrmClient {
    /// Initialize the global factory.
    ///
    /// Exactly one caller succeeds when several threads race to initialize.
    pub fn init(factory: RepositoryFactory) -> Result<(), ClientAlreadyInitializedError> {
        GLOBAL_FACTORY
            .set(factory)
            .map_err(|_| ClientAlreadyInitializedError)
    }

    /// `None` until [`OrmClient::init`] was called.
    pub fn get() -> Option<&'static RepositoryFactory> {
        GLOBAL_FACTORY.get()
    }

    pub fn is_initialized() -> bool {
        GLOBAL_FACTORY.get().is_some()
    }

    /// Repository for `M` from the global factory.
    pub fn repository<M: Model>() -> anyhow::Result<Arc<dyn BaseRepository>> {
        let factory = Self::get().ok_or_else(|| {
            anyhow::anyhow!("ORM client not initialized. Call OrmClient::init() first.")
        })?;
        factory.for_model::<M>()
    }
}
