// main.rs - entry point to run the API server

use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use clap::{Parser, ValueEnum};
use dotenvy::dotenv;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing::subscriber::set_global_default;
use tracing_actix_web::TracingLogger;
use tracing_log::LogTracer;
use tracing_subscriber::{fmt, layer::SubscriberExt, EnvFilter, Registry};

mod config;
mod error;
mod fees;
mod gateway;
mod models;
mod payment;
mod routes;
#[cfg(test)]
mod testing;
mod token_gate;
mod upload;
mod utils;

use config::Config;
use database::{applicants::model::create_applicant_index, store::MongoStore};
use fees::FeeTable;
use gateway::{BkashClient, GatewayConfig};
use token_gate::{token_lifetime, TokenGate, DEFAULT_TOKEN_LIFETIME_MINUTES};

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Environment {
    Local,
    Production,
}

#[derive(Parser, Debug)]
struct Args {
    /// Database URI and Name
    #[arg(
        long,
        env = "DATABASE_URI",
        default_value = "mongodb://localhost:27017"
    )]
    database_uri: String,
    #[arg(long, env = "DATABASE_NAME", default_value = "recruitment-portal")]
    database_name: String,
    /// Environment
    #[arg(long, env = "ENVIRONMENT", value_enum, default_value = "local")]
    environment: Environment,
    /// Origin the frontend is served from
    #[arg(long, env = "PUBLIC_URL", default_value = "http://localhost:5173")]
    public_url: String,
    #[arg(long, env = "UPLOADS_DIR", default_value = "./uploads")]
    uploads_dir: PathBuf,
    /// TOML file with a [fees] table; built-in fees are used when absent
    #[arg(long, env = "FEES_FILE")]
    fees_file: Option<PathBuf>,
    /// bKash tokenized checkout credentials
    #[arg(
        long,
        env = "BKASH_BASE_URL",
        default_value = "https://tokenized.sandbox.bka.sh/v1.2.0-beta"
    )]
    bkash_base_url: String,
    #[arg(long, env = "BKASH_USERNAME")]
    bkash_username: String,
    #[arg(long, env = "BKASH_PASSWORD")]
    bkash_password: String,
    #[arg(long, env = "BKASH_APP_KEY")]
    bkash_app_key: String,
    #[arg(long, env = "BKASH_APP_SECRET")]
    bkash_app_secret: String,
    #[arg(long, env = "TOKEN_LIFETIME_MINUTES", default_value_t = DEFAULT_TOKEN_LIFETIME_MINUTES)]
    token_lifetime_minutes: i64,
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load environment variables from .env file if local
    dotenv().ok();

    // Parse CLI args, using ENV vars if not provided
    let args = Args::parse();

    // Adds log tracer as the default tracer for the log crate
    LogTracer::init().expect("Failed to set log tracer");
    // Set log level based on env variable
    let env_layer = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let fmt_layer = fmt::layer().with_target(false);
    let subscriber = Registry::default().with(env_layer).with(fmt_layer);
    set_global_default(subscriber).expect("Failed to set global default subscriber");

    let fees = match &args.fees_file {
        Some(path) => FeeTable::from_file(path)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string()))?,
        None => FeeTable::default(),
    };

    let lifetime = token_lifetime(args.token_lifetime_minutes)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string()))?;

    // Create database client
    let client = mongodb::Client::with_uri_str(&args.database_uri)
        .await
        .expect("Failed to connect to database.");
    create_applicant_index(&client, &args.database_name).await;
    let store = Arc::new(MongoStore::new(client, args.database_name.clone()));

    let public_url = args.public_url.trim_end_matches('/').to_string();
    let gateway = Arc::new(
        BkashClient::new(GatewayConfig {
            base_url: args.bkash_base_url.clone(),
            username: args.bkash_username.clone(),
            password: args.bkash_password.clone(),
            app_key: args.bkash_app_key.clone(),
            app_secret: args.bkash_app_secret.clone(),
            callback_url: format!("{}/api/bkash/callback", public_url),
        })
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))?,
    );

    let token_gate = TokenGate::new(
        store.clone(),
        gateway.clone(),
        lifetime,
    );

    // Set api config
    let config = Config {
        applicants: store.clone(),
        tokens: store,
        gateway,
        token_gate: Arc::new(token_gate),
        fees,
        uploads_dir: args.uploads_dir.clone(),
        public_url: public_url.clone(),
    };

    // Create and run http server
    let binding = match args.environment {
        Environment::Local => ("127.0.0.1", 5000),
        Environment::Production => ("0.0.0.0", 5000),
    };
    info!("Starting API on {}:{} ({:?})", binding.0, binding.1, args.environment);

    let environment = args.environment;
    HttpServer::new(move || {
        let cors = match environment {
            Environment::Local => Cors::permissive(),
            Environment::Production => Cors::default()
                .allowed_origin(&public_url)
                .allowed_methods(vec!["GET", "POST", "PUT", "PATCH", "DELETE"])
                .allow_any_header()
                .max_age(3600),
        };
        App::new()
            .app_data(web::Data::new(config.clone()))
            .wrap(TracingLogger::default())
            .wrap(cors)
            .configure(routes::configure)
    })
    .bind(binding)?
    .run()
    .await
}
