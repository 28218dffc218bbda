//! Plateful CLI - console management and demo tools.
//!
//! # Usage
//!
//! ```bash
//! # Seed the local demo data directory
//! pf-cli seed
//!
//! # Sign a console identity in (persists for later commands)
//! pf-cli login -e ops@example.com -n "Ops Lead" -r super_admin
//!
//! # Rating stats, optionally for one merchant
//! pf-cli stats --merchant m-1
//!
//! # KPI rollup over the last 7 days
//! pf-cli kpi --days 7
//!
//! # Advance due demo orders one lifecycle step
//! pf-cli orders advance
//! ```
//!
//! Mode follows the environment: with `PLATEFUL_API_URL` set the commands
//! talk to the platform API, otherwise they work on the local demo data
//! under `PLATEFUL_DATA_DIR`.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "pf-cli")]
#[command(author, version, about = "Plateful console CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Seed local demo data (idempotent per resource)
    Seed {
        /// Clear existing demo data first
        #[arg(long)]
        force: bool,
    },
    /// Sign a console identity in
    Login {
        /// Email address
        #[arg(short, long)]
        email: String,

        /// Display name
        #[arg(short, long)]
        name: String,

        /// Role (`super_admin`, `admin`, `merchant_admin`, `support_agent`,
        /// `finance`, `logistics`)
        #[arg(short, long, default_value = "admin")]
        role: String,
    },
    /// Sign the current identity out
    Logout,
    /// Rating statistics over reviews
    Stats {
        /// Restrict to one merchant id
        #[arg(short, long)]
        merchant: Option<String>,
    },
    /// KPI rollup over recent orders
    Kpi {
        /// Window size in days
        #[arg(short, long, default_value_t = 7)]
        days: i64,
    },
    /// Order flow tools
    Orders {
        #[command(subcommand)]
        action: OrderAction,
    },
    /// Coupon tools
    Coupons {
        #[command(subcommand)]
        action: CouponAction,
    },
}

#[derive(Subcommand)]
enum OrderAction {
    /// List cached orders
    List,
    /// Advance every due demo order one lifecycle step
    Advance,
}

#[derive(Subcommand)]
enum CouponAction {
    /// List coupons with usage
    List,
    /// Deactivate a coupon by id
    Deactivate {
        /// Coupon id
        id: String,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Seed { force } => commands::seed::run(force)?,
        Commands::Login { email, name, role } => {
            commands::session::login(&email, &name, &role)?;
        }
        Commands::Logout => commands::session::logout()?,
        Commands::Stats { merchant } => commands::report::stats(merchant.as_deref()).await?,
        Commands::Kpi { days } => commands::report::kpi(days).await?,
        Commands::Orders { action } => match action {
            OrderAction::List => commands::orders::list().await?,
            OrderAction::Advance => commands::orders::advance().await?,
        },
        Commands::Coupons { action } => match action {
            CouponAction::List => commands::coupons::list().await?,
            CouponAction::Deactivate { id } => commands::coupons::deactivate(&id).await?,
        },
    }
    Ok(())
}
