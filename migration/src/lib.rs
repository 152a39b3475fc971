pub use sea_orm_migration::prelude::*;

mod m20260105_000001_create_uplink_rank_table;
mod m20260105_000002_create_uplink_package_table;
mod m20260105_000003_create_uplink_user_table;
mod m20260105_000004_create_uplink_package_request_table;
mod m20260105_000005_create_uplink_earning_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260105_000001_create_uplink_rank_table::Migration),
            Box::new(m20260105_000002_create_uplink_package_table::Migration),
            Box::new(m20260105_000003_create_uplink_user_table::Migration),
            Box::new(m20260105_000004_create_uplink_package_request_table::Migration),
            Box::new(m20260105_000005_create_uplink_earning_table::Migration),
        ]
    }
}
