use anyhow::Context;
use chrono::{Duration, Utc};
use clap::{Parser, Subcommand};
use pourpal_config::load as load_config;
use pourpal_database::{HangoutRepository, SessionRepository, UserRepository};
use pourpal_gateway::{create_router, GatewayState};
use pourpal_runtime::{telemetry, BackendServices};
use tokio::net::TcpListener;
use tracing::info;

#[derive(Parser)]
#[command(name = "pourpal-backend")]
#[command(about = "PourPal chat backend")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP/WebSocket server (default)
    Serve,
    /// Seed the database with development users, sessions and hangouts
    SeedData,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => run_server().await,
        Commands::SeedData => seed_data().await,
    }
}

async fn run_server() -> anyhow::Result<()> {
    telemetry::init_tracing().context("failed to initialise tracing")?;

    info!("starting PourPal chat backend");

    let config = load_config().context("failed to load configuration")?;

    let services = BackendServices::initialise(&config)
        .await
        .context("failed to initialise backend services")?;

    let state = GatewayState::new(services.db_pool.clone(), &config.auth);
    let app = create_router(state);

    let address = format!("{}:{}", config.http.address, config.http.port);
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind http listener on {address}"))?;

    info!(%address, "http server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(pourpal_runtime::shutdown_signal())
        .await
        .context("http server error")?;

    info!("backend shut down");
    Ok(())
}

async fn seed_data() -> anyhow::Result<()> {
    telemetry::init_tracing().context("failed to initialise tracing")?;

    info!("seeding development data");

    let config = load_config().context("failed to load configuration")?;

    let services = BackendServices::initialise(&config)
        .await
        .context("failed to initialise backend services")?;

    let users = UserRepository::new(services.db_pool.clone());
    let sessions = SessionRepository::new(services.db_pool.clone());
    let hangouts = HangoutRepository::new(services.db_pool.clone());

    let alice = users
        .create("alice@example.com", Some("Alice"), None)
        .await
        .context("failed to seed user")?;
    let bob = users
        .create("bob@example.com", None, None)
        .await
        .context("failed to seed user")?;

    let expires = (Utc::now() + Duration::days(30)).to_rfc3339();
    for user in [&alice, &bob] {
        let token = cuid2::cuid();
        sessions
            .create(user.id, &token, &expires)
            .await
            .context("failed to seed session")?;
        println!("session for {}: sessionid={token}", user.email);
    }

    let hangout = hangouts
        .create(
            "Friday tasting",
            "Corner taproom",
            (Utc::now() + Duration::days(3)).to_rfc3339().as_str(),
            alice.id,
        )
        .await
        .context("failed to seed hangout")?;
    hangouts
        .add_participant(hangout.id, alice.id)
        .await
        .context("failed to seed participant")?;
    hangouts
        .add_participant(hangout.id, bob.id)
        .await
        .context("failed to seed participant")?;

    println!(
        "hangout {} seeded; chat at /ws/chat/{} and /api/chat/{}/messages",
        hangout.id, hangout.id, hangout.id
    );

    Ok(())
}
