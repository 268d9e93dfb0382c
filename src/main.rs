use std::error::Error;
use std::sync::Arc;

use futures::future::FutureExt;
use warp::Filter;

use listens::catalog::SpotifyCatalog;
use listens::config::{get_optional_variable, get_variable};
use listens::db::PgDb;
use listens::environment::{Config, Environment, SafeNotifier};
use listens::notification::{LogNotifier, SnsNotifier};
use listens::routes;
use listens::sunlight::SunlightService;
use log::{info, initialize_logger};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    dotenv::dotenv().ok();

    let logger = initialize_logger();

    let main_port: u16 = get_variable("LISTENS_PORT")
        .parse()
        .expect("parse LISTENS_PORT as u16");
    let admin_port: u16 = get_variable("LISTENS_ADMIN_PORT")
        .parse()
        .expect("parse LISTENS_ADMIN_PORT as u16");

    info!(logger, "Starting..."; "main_port" => main_port, "admin_port" => admin_port);
    let logger = Arc::new(logger);

    info!(logger, "Creating database pool...");
    let connection_string = get_variable("LISTENS_DB_CONNECTION_STRING");
    let pool = sqlx::Pool::connect(&connection_string)
        .await
        .expect("create database pool from LISTENS_DB_CONNECTION_STRING");
    let db = PgDb::new(pool);

    if get_optional_variable("LISTENS_PERSIST_SCHEMA").is_some() {
        info!(logger, "Persisting schema...");
        db.persist_schema().await.expect("persist database schema");
    }

    let catalog =
        Arc::new(SpotifyCatalog::from_env().expect("initialize Spotify catalog from environment"));
    let sunlight =
        Arc::new(SunlightService::from_env().expect("initialize sunlight service from environment"));

    let notifier: Arc<SafeNotifier> = match get_optional_variable("LISTEN_ADDED_SNS_TOPIC") {
        Some(topic_arn) => {
            info!(logger, "Announcing listens over SNS..."; "topic_arn" => &topic_arn);
            Arc::new(SnsNotifier::from_env(topic_arn).expect("initialize SNS client from environment"))
        }
        None => {
            info!(logger, "No SNS topic configured; announcing listens to the log");
            Arc::new(LogNotifier::new(logger.clone()))
        }
    };

    let environment = Environment::new(
        logger.clone(),
        Arc::new(db),
        catalog,
        sunlight,
        notifier,
        Config::from_env(),
    );

    let should_terminate = {
        let logger = logger.clone();

        async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                info!(logger, "Failed to listen for interrupts"; "error" => %e);
            }
            info!(logger, "Shutting down...");
        }
        .shared()
    };

    let main_server = {
        let should_terminate = should_terminate.clone();
        let logger2 = logger.clone();

        let routes = routes::make_listens_route(environment.clone())
            .recover(move |r| routes::format_rejection(logger2.clone(), r));

        let (_, main_server) =
            warp::serve(routes).bind_with_graceful_shutdown(([0, 0, 0, 0], main_port), async {
                should_terminate.await;
            });

        main_server
    };

    let admin_server = {
        let should_terminate = should_terminate.clone();

        let (_, admin_server) = warp::serve(routes::admin::make_healthz_route())
            .bind_with_graceful_shutdown(([0, 0, 0, 0], admin_port), async {
                should_terminate.await;
            });

        admin_server
    };

    tokio::join!(main_server, admin_server);

    info!(logger, "Exiting gracefully...");

    Ok(())
}
