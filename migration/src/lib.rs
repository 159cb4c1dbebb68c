pub use sea_orm_migration::prelude::*;

mod m20260301_000001_create_user_table;
mod m20260301_000002_create_user_profile_table;
mod m20260301_000003_create_user_settings_table;
mod m20260301_000004_create_user_session_table;
mod m20260301_000005_create_solo_authorization_table;
mod m20260301_000006_create_delivery_job_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260301_000001_create_user_table::Migration),
            Box::new(m20260301_000002_create_user_profile_table::Migration),
            Box::new(m20260301_000003_create_user_settings_table::Migration),
            Box::new(m20260301_000004_create_user_session_table::Migration),
            Box::new(m20260301_000005_create_solo_authorization_table::Migration),
            Box::new(m20260301_000006_create_delivery_job_table::Migration),
        ]
    }
}
