use std::sync::Arc;
use tokio::signal;
use tracing::info;

use game_persistence::{
    connection::connect_and_migrate,
    repositories::{GameRepository, UserRepository},
};
use game_server::{
    config::Config,
    create_routes,
    reminders::{LogMailer, send_move_reminders},
};

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    info!("Starting Guard Boost Hit server...");

    let config = Config::new();

    // Initialize database connection and run migrations
    let db = match connect_and_migrate().await {
        Ok(db) => db,
        Err(e) => {
            tracing::error!("Failed to connect to database and run migrations: {}", e);
            std::process::exit(1);
        }
    };
    let user_repository = Arc::new(UserRepository::new(db.clone()));
    let game_repository = Arc::new(GameRepository::new(db));

    let routes = create_routes(user_repository.clone(), game_repository.clone());

    // Start reminder task
    let reminder_user_repository = user_repository.clone();
    let reminder_game_repository = game_repository.clone();
    let reminder_interval = config.reminder_interval_minutes;
    tokio::spawn(async move {
        let mailer = LogMailer;
        let mut interval =
            tokio::time::interval(std::time::Duration::from_secs(reminder_interval * 60));
        // The first tick fires immediately; skip it so a fresh start
        // doesn't spam users
        interval.tick().await;
        loop {
            interval.tick().await;
            match send_move_reminders(
                &reminder_user_repository,
                &reminder_game_repository,
                &mailer,
            )
            .await
            {
                Ok(sent) => info!("Reminder sweep complete, {} reminders sent", sent),
                Err(e) => tracing::error!("Reminder sweep failed: {}", e),
            }
        }
    });

    info!("Server starting on {}:{}", config.host, config.port);

    let addr = (
        config.host.parse::<std::net::IpAddr>().unwrap(),
        config.port,
    );

    let (addr, server) = warp::serve(routes).bind_with_graceful_shutdown(addr, async {
        // Wait for SIGINT (Ctrl+C) or SIGTERM
        #[cfg(unix)]
        {
            let mut sigint = signal::unix::signal(signal::unix::SignalKind::interrupt()).unwrap();
            let mut sigterm = signal::unix::signal(signal::unix::SignalKind::terminate()).unwrap();

            tokio::select! {
                _ = sigint.recv() => {
                    info!("Received SIGINT, shutting down gracefully...");
                }
                _ = sigterm.recv() => {
                    info!("Received SIGTERM, shutting down gracefully...");
                }
            }
        }

        #[cfg(not(unix))]
        {
            signal::ctrl_c().await.expect("Failed to listen for ctrl+c");
            info!("Received Ctrl+C, shutting down gracefully...");
        }
    });

    info!(
        "Server started successfully on {}. Press Ctrl+C to stop.",
        addr
    );
    server.await;
    info!("Server shutdown complete.");
}
