use sea_orm::DatabaseConnection;

use crate::config::AppConfig;
use crate::utils::notify::FlagNotifier;

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub config: AppConfig,
    pub notifier: FlagNotifier,
}
