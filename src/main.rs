use dotenv::dotenv;
use flight_reservation::build_rocket;
use flight_reservation::config::AppConfig;
use flight_reservation::db::Database;
use flight_reservation::scheduler::MaintenanceScheduler;
use flight_reservation::services::flight_instance_service::FlightInstanceService;
use flight_reservation::utils::error::StartupError;
use tracing_subscriber::EnvFilter;

#[rocket::main]
async fn main() {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    if let Err(e) = run().await {
        tracing::error!(error = %e, "flight reservation service stopped");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), StartupError> {
    let config = AppConfig::from_env()?;

    // Connect to the database
    let database = Database::new(&config.database).await?;
    database.migrate().await?;

    let scheduler = if config.scheduler.enabled {
        let flight_instances = FlightInstanceService::new(database.get_pool().clone());
        Some(MaintenanceScheduler::start(&config.scheduler, flight_instances).await?)
    } else {
        tracing::warn!("expired flight shift is disabled");
        None
    };

    let launched = build_rocket(config.auth.clone(), database.get_pool().clone())
        .launch()
        .await;

    if let Some(scheduler) = scheduler {
        if let Err(e) = scheduler.shutdown().await {
            tracing::warn!(error = %e, "maintenance scheduler did not stop cleanly");
        }
    }
    database.close().await;

    launched.map(|_| ()).map_err(|e| StartupError::Launch(Box::new(e)))
}
