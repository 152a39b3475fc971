//! Cron scheduler for periodic referral maintenance.
//!
//! Runs a report-only integrity audit on a cron schedule so corrupted referral data
//! is surfaced in the logs without anybody having to ask for it.

use std::sync::Arc;

use sea_orm::DatabaseConnection;
use tokio_cron_scheduler::{Job, JobScheduler};

use crate::server::{error::Error, referral::ReferralSettings};

pub mod audit;


use self::audit::run_scheduled_audit;

/// Job scheduler for background referral maintenance.
pub struct Scheduler {
    db: DatabaseConnection,
    settings: ReferralSettings,
    sched: JobScheduler,
}

impl Scheduler {
    /// Creates a new instance of [`Scheduler`].
    ///
    /// # Returns
    /// - `Ok(Scheduler)` - Successfully created scheduler instance
    /// - `Err(Error)` - Failed to initialize the underlying job scheduler
    pub async fn new(db: DatabaseConnection, settings: ReferralSettings) -> Result<Self, Error> {
        let sched = JobScheduler::new().await?;
        Ok(Self {
            db,
            settings,
            sched,
        })
    }

    /// Registers the referral audit job and starts the scheduler.
    ///
    /// # Arguments
    /// - `audit_cron` - Six-field cron expression for the dry-run audit (e.g. "0 0 3 * * *")
    ///
    /// # Returns
    /// - `Ok(())` - Job registered and scheduler started
    /// - `Err(Error)` - Invalid cron expression or scheduler failure
    pub async fn start(mut self, audit_cron: &str) -> Result<(), Error> {
        self.schedule_job(audit_cron, "referral audit", run_scheduled_audit)
            .await?;

        self.sched.start().await?;

        Ok(())
    }

    /// Schedules a recurring job with the specified cron expression.
    ///
    /// The job receives clones of the database connection and referral settings and
    /// returns how many issues it found, which is logged after every run.
    ///
    /// # Arguments
    /// - `cron` - Cron expression defining when the job should run
    /// - `name` - Human-readable name for the job (used in log messages)
    /// - `function` - Async job body
    ///
    /// # Returns
    /// - `Ok(())` - Job successfully registered with the scheduler
    /// - `Err(Error)` - Failed to create or add the job
    pub async fn schedule_job<F, Fut>(
        &mut self,
        cron: &str,
        name: &str,
        function: F,
    ) -> Result<(), Error>
    where
        F: Fn(DatabaseConnection, ReferralSettings) -> Fut + Send + Sync + 'static,
        Fut: std::future::Future<Output = Result<usize, Error>> + Send + 'static,
    {
        let db = self.db.clone();
        let settings = self.settings;
        let name = name.to_string();
        let function = Arc::new(function);

        self.sched
            .add(Job::new_async(cron, move |_, _| {
                let db = db.clone();
                let name = name.clone();
                let function = Arc::clone(&function);

                Box::pin(async move {
                    match function(db, settings).await {
                        Ok(0) => tracing::debug!("{} found no issues", name),
                        Ok(count) => tracing::warn!("{} found {} issue(s)", name, count),
                        Err(e) => tracing::error!("Error running {}: {:?}", name, e),
                    }
                })
            })?)
            .await?;

        Ok(())
    }
}
