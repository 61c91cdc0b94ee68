use crate::config::SchedulerConfig;
use crate::services::flight_instance_service::FlightInstanceService;
use chrono::{Local, Utc};
use tokio_cron_scheduler::{Job, JobScheduler, JobSchedulerError};

/// Owns the maintenance jobs for the lifetime of the server. Dropping the
/// handle without calling [`MaintenanceScheduler::shutdown`] leaves the
/// jobs running until the runtime stops.
pub struct MaintenanceScheduler {
    scheduler: JobScheduler,
}

impl MaintenanceScheduler {
    /// Starts the expired-flight shift on `config.shift_schedule`,
    /// evaluated in server local time.
    pub async fn start(
        config: &SchedulerConfig,
        flight_instances: FlightInstanceService,
    ) -> Result<Self, JobSchedulerError> {
        let scheduler = JobScheduler::new().await?;

        let job = Job::new_async_tz(config.shift_schedule.as_str(), Local, move |_uuid, _lock| {
            let flight_instances = flight_instances.clone();

            Box::pin(async move {
                tracing::info!("shifting expired flight instances");
                run_shift(&flight_instances).await;
            })
        })?;

        scheduler.add(job).await?;
        scheduler.start().await?;

        tracing::info!(schedule = %config.shift_schedule, "maintenance scheduler started");

        Ok(MaintenanceScheduler { scheduler })
    }

    pub async fn shutdown(mut self) -> Result<(), JobSchedulerError> {
        self.scheduler.shutdown().await?;
        tracing::info!("maintenance scheduler stopped");
        Ok(())
    }
}

// A failed run is logged; the next scheduled run retries
pub async fn run_shift(flight_instances: &FlightInstanceService) {
    if let Err(e) = flight_instances.shift_expired_flights(Utc::now()).await {
        tracing::error!(error = ?e, "expired flight shift failed");
    }
}
