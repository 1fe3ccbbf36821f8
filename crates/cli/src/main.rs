//! Level-Up CLI - Browse the catalog, manage the cart and check out.
//!
//! # Usage
//!
//! ```bash
//! # Search the catalog
//! levelup catalog --search gamer --sort-price precio-asc
//!
//! # Register a profile (DUOC emails unlock the student discount)
//! levelup profile set -n "Valentina Rojas" -e v.rojas@duoc.cl -f 2001-03-15
//!
//! # Fill the cart and check out with a coupon
//! levelup cart add 11 --qty 2
//! levelup coupons apply LEVELUP10
//! levelup checkout --coupon LEVELUP10
//! ```
//!
//! # Commands
//!
//! - `catalog` - Filter, sort and page through products
//! - `categories` - List product categories
//! - `cart` - Show and edit the cart
//! - `coupons` - List available coupons, preview a coupon on the cart
//! - `points` - Show loyalty points, exchange them for a coupon
//! - `profile` - Show, set or clear the stored profile
//! - `checkout` - Complete the order

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use levelup_storefront::config::{LogFormat, StorefrontConfig};
use levelup_storefront::state::AppState;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

use commands::CommandError;
use commands::catalog::CatalogArgs;

#[derive(Parser)]
#[command(name = "levelup")]
#[command(author, version, about = "Level-Up Gamer storefront CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Filter, sort and page through products
    Catalog(CatalogArgs),
    /// List product categories
    Categories,
    /// Show and edit the cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// List or preview coupons
    Coupons {
        #[command(subcommand)]
        action: CouponAction,
    },
    /// Loyalty points
    Points {
        #[command(subcommand)]
        action: PointsAction,
    },
    /// Manage the stored profile
    Profile {
        #[command(subcommand)]
        action: ProfileAction,
    },
    /// Complete the order
    Checkout {
        /// Coupon code to redeem
        #[arg(short, long)]
        coupon: Option<String>,

        /// Promotional discount in CLP
        #[arg(long, default_value_t = 0)]
        promo: u64,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Show cart lines and totals
    Show,
    /// Add a product
    Add {
        /// Product ID
        id: String,

        /// Units to add
        #[arg(short, long, default_value_t = 1)]
        qty: u32,
    },
    /// Set the quantity of a line
    Update {
        /// Product ID
        id: String,

        /// New quantity (1 to stock)
        qty: u32,
    },
    /// Remove a line
    Remove {
        /// Product ID
        id: String,
    },
    /// Empty the cart
    Clear,
}

#[derive(Subcommand)]
enum CouponAction {
    /// List coupons available to the profile
    List,
    /// Preview the cart total with a coupon
    Apply {
        /// Coupon code
        code: String,
    },
}

#[derive(Subcommand)]
enum PointsAction {
    /// Show the points balance
    Show,
    /// Exchange points for a reward coupon
    Redeem,
}

#[derive(Subcommand)]
enum ProfileAction {
    /// Show the stored profile
    Show,
    /// Create or replace the profile
    Set {
        /// User ID
        #[arg(long, default_value_t = 1)]
        id: i32,

        /// Full name
        #[arg(short, long)]
        nombre: String,

        /// Email address
        #[arg(short, long)]
        email: String,

        /// Birth date (YYYY-MM-DD)
        #[arg(short, long)]
        fecha_nacimiento: String,

        /// Referral code
        #[arg(short, long)]
        referral: Option<String>,
    },
    /// Delete the stored profile
    Clear,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = StorefrontConfig::from_env();
    init_tracing(config.as_ref().map_or(LogFormat::Pretty, |c| c.log_format));

    let result = match config {
        Ok(config) => run(cli, config).await,
        Err(e) => Err(CommandError::from(e)),
    };

    if let Err(e) = result {
        tracing::error!(error = %e, "Command failed");
        commands::report(&e);
        std::process::exit(1);
    }
}

fn init_tracing(format: LogFormat) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "levelup_storefront=info,levelup_cli=info".into());

    let registry = tracing_subscriber::registry().with(env_filter);
    match format {
        LogFormat::Pretty => registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init(),
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init(),
    }
}

async fn run(cli: Cli, config: StorefrontConfig) -> Result<(), CommandError> {
    let state = AppState::open(config)?;
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Commands::Catalog(args) => commands::catalog::list(&state, &args, &mut out).await?,
        Commands::Categories => commands::catalog::categories(&state, &mut out).await?,
        Commands::Cart { action } => match action {
            CartAction::Show => commands::cart::show(&state, &mut out)?,
            CartAction::Add { id, qty } => commands::cart::add(&state, &id, qty, &mut out).await?,
            CartAction::Update { id, qty } => {
                commands::cart::update(&state, &id, qty, &mut out)?;
            }
            CartAction::Remove { id } => commands::cart::remove(&state, &id, &mut out)?,
            CartAction::Clear => commands::cart::clear(&state, &mut out)?,
        },
        Commands::Coupons { action } => match action {
            CouponAction::List => commands::coupons::list(&state, &mut out).await?,
            CouponAction::Apply { code } => {
                commands::coupons::apply(&state, &code, &mut out).await?;
            }
        },
        Commands::Points { action } => match action {
            PointsAction::Show => commands::points::show(&state, &mut out)?,
            PointsAction::Redeem => commands::points::redeem(&state, &mut out)?,
        },
        Commands::Profile { action } => match action {
            ProfileAction::Show => commands::profile::show(&state, &mut out)?,
            ProfileAction::Set {
                id,
                nombre,
                email,
                fecha_nacimiento,
                referral,
            } => {
                let input = levelup_storefront::profile::ProfileInput {
                    nombre,
                    email,
                    fecha_nacimiento,
                    referral_code: referral,
                };
                commands::profile::set(&state, id, input, &mut out)?;
            }
            ProfileAction::Clear => commands::profile::clear(&state, &mut out)?,
        },
        Commands::Checkout { coupon, promo } => {
            commands::checkout::complete(&state, coupon, promo, &mut out).await?;
        }
    }
    Ok(())
}
