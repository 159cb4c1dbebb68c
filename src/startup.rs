//! Process startup: database connection, migrations and client wiring.

use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};

use crate::{
    config::Config,
    error::Error,
    external::{connect::ConnectClient, vateud::VateudClient},
    model::app::AppState,
};

/// Connect to the database and run migrations
pub async fn connect_to_database(config: &Config) -> Result<DatabaseConnection, Error> {
    let mut opt = ConnectOptions::new(&config.database_url);
    opt.sqlx_logging(false);

    let db = Database::connect(opt).await?;

    Migrator::up(&db, None).await?;

    Ok(db)
}

/// Builds the shared application state from configuration.
pub fn build_app_state(config: &Config, db: DatabaseConnection) -> Result<AppState, Error> {
    let connect = ConnectClient::from_config(config)?;
    let vateud = VateudClient::from_config(config)?;

    Ok(AppState {
        db,
        connect,
        vateud,
        required_scopes: config.required_scopes.clone(),
    })
}
