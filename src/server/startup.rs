use sea_orm::DatabaseConnection;

use crate::server::{config::Config, error::Error, scheduler::Scheduler};

/// Connect to the database and run migrations
pub async fn connect_to_database(config: &Config) -> Result<DatabaseConnection, Error> {
    use migration::{Migrator, MigratorTrait};
    use sea_orm::{ConnectOptions, Database};

    let mut opt = ConnectOptions::new(&config.database_url);
    opt.sqlx_logging(false);

    let db = Database::connect(opt).await?;

    Migrator::up(&db, None).await?;

    Ok(db)
}

/// Register the periodic referral audit and start the scheduler
pub async fn start_scheduler(config: &Config, db: DatabaseConnection) -> Result<(), Error> {
    let scheduler = Scheduler::new(db, config.referral).await?;
    scheduler.start(&config.audit_cron).await?;

    Ok(())
}
