use crate::config::AppConfig;
use crate::db::PgStore;
use crate::memory::MemoryStore;
use crate::repo::Store;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);
        let db = PgStore::connect(&config).await?;

        if let Err(e) = db.migrate().await {
            tracing::warn!(error = %format!("{e:#}"), "migrations failed; continuing");
        }

        Ok(Self {
            store: Arc::new(db) as Arc<dyn Store>,
            config,
        })
    }

    pub fn from_parts(store: Arc<dyn Store>, config: Arc<AppConfig>) -> Self {
        Self { store, config }
    }

    /// State backed by an empty in-process store.
    pub fn fake() -> Self {
        Self {
            store: Arc::new(MemoryStore::default()) as Arc<dyn Store>,
            config: Arc::new(AppConfig::default()),
        }
    }
}
