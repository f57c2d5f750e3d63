//! Application state containing repositories and shared resources

use sea_orm::DatabaseConnection;
use std::sync::Arc;

use crate::domain::LedgerQueries;
use crate::infrastructure::auth::TokenKeys;
use crate::infrastructure::config::Config;
use crate::infrastructure::SeaOrmLedgerQueries;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection used by the CRUD services
    db: DatabaseConnection,
    /// Read-only ledger queries for the report engine
    pub ledger: Arc<dyn LedgerQueries>,
    /// Token issuing/checking keys
    pub tokens: Arc<TokenKeys>,
}

impl AppState {
    pub fn new(db: DatabaseConnection, config: &Config) -> Self {
        let ledger = Arc::new(SeaOrmLedgerQueries::new(db.clone()));
        let tokens = Arc::new(TokenKeys::new(
            config.jwt_secret.clone(),
            config.jwt_ttl_hours,
        ));

        Self { db, ledger, tokens }
    }

    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

// Implement FromRef to allow extracting DatabaseConnection from AppState
impl axum::extract::FromRef<AppState> for DatabaseConnection {
    fn from_ref(state: &AppState) -> Self {
        state.db.clone()
    }
}
