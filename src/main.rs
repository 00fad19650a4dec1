use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use leadline::{api, auth, db};

#[derive(Parser)]
#[command(name = "leadline")]
#[command(about = "Sales-lead CRM backend for study-abroad consultants")]
struct Cli {
    /// Database file (defaults to the platform data directory)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the Leadline server
    Serve {
        /// Port for HTTP API
        #[arg(short, long, default_value = "3000")]
        port: u16,
    },
    /// Create a consultant account
    AddUser {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "leadline=debug,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let db = match &cli.db {
        Some(path) => db::Database::open(path)?,
        None => db::Database::open_default()?,
    };
    db.migrate()?;

    match cli.command {
        Some(Commands::AddUser { email, password }) => {
            let user = db.create_user(&email, &auth::hash_password(&password))?;
            println!("Created consultant account {} ({})", user.email, user.id);
        }
        Some(Commands::Serve { port }) => serve(db, port).await?,
        None => serve(db, 3000).await?,
    }

    Ok(())
}

async fn serve(db: db::Database, port: u16) -> anyhow::Result<()> {
    tracing::info!("Starting Leadline server on port {}", port);

    let app = api::create_router(db);

    let listener = tokio::net::TcpListener::bind(format!("127.0.0.1:{}", port)).await?;
    tracing::info!("Leadline server listening on http://127.0.0.1:{}", port);

    axum::serve(listener, app).await
        .map_err(anyhow::Error::from)
}
