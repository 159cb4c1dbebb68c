use sea_orm::DatabaseConnection;

use crate::{
    external::{connect::ConnectClient, vateud::VateudClient},
    model::scope::ScopeSet,
};

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub connect: ConnectClient,
    pub vateud: VateudClient,
    pub required_scopes: ScopeSet,
}
