// admin/main.rs - scripts for initializing the database and managing applicants

use clap::{Parser, Subcommand};
use database::{
    applicants::{
        filter::ApplicantFilter,
        model::{create_applicant_index, ApplicantModel, PaymentStatus},
        query::{delete_applicant, list_applicants, update_payment_status},
    },
    tokens::query::get_token,
};
use dotenvy::dotenv;
use mongodb::Client;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[clap(name = "admin")]
struct Args {
    #[clap(subcommand)]
    subcommand: Subcommands,
    #[arg(
        long,
        env = "DATABASE_URI",
        default_value = "mongodb://localhost:27017"
    )]
    database_uri: String,
    #[arg(long, env = "DATABASE_NAME", default_value = "recruitment-portal")]
    database_name: String,
    /// Print records as JSON instead of a table
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Debug, Subcommand)]
enum Subcommands {
    #[clap(name = "init-db")]
    InitDatabase,
    #[clap(name = "list")]
    List {
        /// Matches name, phone or NID
        #[arg(short, long)]
        search: Option<String>,
        #[arg(short, long)]
        role: Option<String>,
        #[arg(long)]
        subject: Option<String>,
    },
    #[clap(name = "set-status")]
    SetStatus {
        id: i64,
        /// "approved" or "not-approved"
        status: PaymentStatus,
    },
    #[clap(name = "delete")]
    Delete { id: i64 },
    #[clap(name = "token-status")]
    TokenStatus,
}

fn print_row(applicant: &ApplicantModel) {
    let subject = applicant.selected_subject.as_deref().unwrap_or("-");
    println!(
        "#{:04}  {:<28} {:<14} {:<18} {:<14} {}",
        applicant.id,
        applicant.name,
        applicant.phone,
        applicant.apply_for,
        subject,
        applicant.payment_status.as_str()
    );
}

#[tokio::main]
async fn main() -> Result<(), String> {
    // Load environment variables from .env file
    dotenv().ok();

    // Parse CLI args, using ENV vars if not provided
    let args = Args::parse();

    // Set up tracing
    let env_layer = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_layer)
        .with_target(true)
        .init();

    // Create database client
    let db_client = Client::with_uri_str(&args.database_uri)
        .await
        .map_err(|e| format!("Failed to connect to database: {}", e))?;
    let database = args.database_name.as_str();

    // Perform subcommand logic
    match args.subcommand {
        Subcommands::InitDatabase => {
            info!("Creating database indexes.");
            create_applicant_index(&db_client, database).await;
            info!("Database initialized: {}", database);
        }
        Subcommands::List {
            search,
            role,
            subject,
        } => {
            let filter = ApplicantFilter {
                search,
                role,
                subject,
            };
            let applicants = list_applicants(&db_client, database)
                .await
                .map_err(|e| e.to_string())?;
            let applicants = filter.apply(applicants);
            debug!("{} applicants matched", applicants.len());

            if args.json {
                let rows: Vec<serde_json::Value> = applicants
                    .iter()
                    .map(|a| {
                        serde_json::json!({
                            "id": a.id,
                            "name": a.name,
                            "phone": a.phone,
                            "nid": a.nid,
                            "applyFor": a.apply_for,
                            "selectedSubject": a.selected_subject,
                            "paymentStatus": a.payment_status,
                        })
                    })
                    .collect();
                let out = serde_json::to_string_pretty(&rows).map_err(|e| e.to_string())?;
                println!("{}", out);
            } else {
                applicants.iter().for_each(print_row);
                println!("{} applicant(s)", applicants.len());
            }
        }
        Subcommands::SetStatus { id, status } => {
            let updated = update_payment_status(&db_client, database, id, status)
                .await
                .map_err(|e| e.to_string())?;
            if !updated {
                return Err(format!("Applicant {} not found", id));
            }
            info!("Applicant {} marked {}", id, status.as_str());
        }
        Subcommands::Delete { id } => {
            let deleted = delete_applicant(&db_client, database, id)
                .await
                .map_err(|e| e.to_string())?;
            if !deleted {
                return Err(format!("Applicant {} not found", id));
            }
            info!("Applicant {} deleted", id);
        }
        Subcommands::TokenStatus => match get_token(&db_client, database).await.map_err(|e| e.to_string())? {
            Some(token) => {
                let now = chrono::Utc::now();
                let remaining = (token.expires_at - now).num_minutes().max(0);
                println!("issued_at:         {}", token.issued_at);
                println!("expires_at:        {}", token.expires_at);
                println!("is_valid:          {}", token.is_valid_at(now));
                println!("minutes_remaining: {}", remaining);
            }
            None => warn!("No token found in database."),
        },
    }

    Ok(())
}
