use std::sync::Arc;

use anyhow::Context;
use tracing::{info, warn};

use mimix_auth::TokenIssuer;
use mimix_infra::{
    AppConfig, CredentialService, InMemoryStorage, ObjectFacade, PgStorage, PromotionWorkflow,
    Storage,
};

/// Services shared by every handler, all backed by one storage instance.
pub struct AppServices {
    pub credentials: CredentialService<dyn Storage>,
    pub objects: ObjectFacade<dyn Storage>,
    pub workflow: PromotionWorkflow<dyn Storage>,
}

impl AppServices {
    pub fn new(storage: Arc<dyn Storage>, tokens: TokenIssuer) -> Self {
        Self {
            credentials: CredentialService::new(Arc::clone(&storage), tokens),
            objects: ObjectFacade::new(Arc::clone(&storage)),
            workflow: PromotionWorkflow::new(storage),
        }
    }
}

/// Postgres when `DATABASE_URL` is set, in-memory otherwise.
pub async fn build_storage(config: &AppConfig) -> anyhow::Result<Arc<dyn Storage>> {
    let Some(database_url) = config.database_url.as_deref() else {
        warn!("DATABASE_URL not set; using in-memory storage (data is lost on restart)");
        return Ok(Arc::new(InMemoryStorage::new()));
    };

    let storage = PgStorage::connect(database_url)
        .await
        .context("failed to connect to Postgres")?;
    if config.run_migrations {
        storage.migrate().await.context("failed to apply migrations")?;
        info!("database schema up to date");
    }
    Ok(Arc::new(storage))
}
