//! Bazaar CLI - account client front end.
//!
//! # Usage
//!
//! ```bash
//! # Register a customer account
//! bazaar register -n "Amira" -e a@b.com -p 01234567890 --password abc123
//!
//! # Register a worker with an id-card photo
//! bazaar register -n "Omar" -e omar@b.com -p 01987654321 --password xyz789 \
//!     -t worker --id-card ./id.jpg
//!
//! # Log in (mirror first, then the backend)
//! bazaar login -e a@b.com --password abc123
//!
//! # Restore a session from the persisted token, show the user
//! bazaar whoami
//!
//! # Check what the route guard says about a navigation
//! bazaar guard /orders
//!
//! # Address roundtrip, logout
//! bazaar address get
//! bazaar logout
//! ```
//!
//! # Environment Variables
//!
//! - `BAZAAR_API_BASE_URL` - Base URL of the REST backend (required)
//! - `BAZAAR_DATA_DIR` - Credential mirror directory (default `./.bazaar`)

#![cfg_attr(not(test), forbid(unsafe_code))]
#![allow(clippy::print_stdout)]

use clap::{Parser, Subcommand};
use secrecy::SecretString;

use bazaar_account::{
    AccountConfig, AccountService, Address, IdCard, LoginRequest, RegisterForm, SessionStore,
};
use bazaar_core::{AccountType, Email, PhoneNumber};

#[derive(Parser)]
#[command(name = "bazaar")]
#[command(author, version, about = "Bazaar storefront account client")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Register a new account
    Register {
        /// Display name
        #[arg(short, long)]
        name: String,

        /// Email address
        #[arg(short, long)]
        email: String,

        /// Phone number (11 digits)
        #[arg(short, long)]
        phone: String,

        /// Password (at least 3 letters and 2 digits)
        #[arg(long)]
        password: String,

        /// Account type (`customer` or `worker`)
        #[arg(short = 't', long, default_value = "customer")]
        account_type: String,

        /// Id-card photo to attach (workers only)
        #[arg(long)]
        id_card: Option<std::path::PathBuf>,
    },
    /// Log in to an existing account
    Login {
        /// Email address
        #[arg(short, long)]
        email: String,

        /// Password
        #[arg(long)]
        password: String,

        /// Account type (`customer` or `worker`)
        #[arg(short = 't', long, default_value = "customer")]
        account_type: String,

        /// Route to return to after login
        #[arg(long)]
        return_url: Option<String>,
    },
    /// Restore the session from the persisted token and show the user
    Whoami,
    /// Clear the persisted token and the session
    Logout,
    /// Ask the route guard about a navigation target
    Guard {
        /// Target route, e.g. /orders
        target: String,
    },
    /// Read or update the shipping address
    Address {
        #[command(subcommand)]
        action: AddressAction,
    },
}

#[derive(Subcommand)]
enum AddressAction {
    /// Fetch the stored address
    Get,
    /// Replace the stored address
    Set {
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
        #[arg(long)]
        street: String,
        #[arg(long)]
        city: String,
        #[arg(long)]
        state: String,
        #[arg(long)]
        zipcode: String,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = AccountConfig::from_env()?;
    let service = AccountService::new(&config, SessionStore::new())?;

    match cli.command {
        Commands::Register {
            name,
            email,
            phone,
            password,
            account_type,
            id_card,
        } => {
            let form = RegisterForm {
                display_name: name,
                email: Email::parse(&email)?,
                phone_number: PhoneNumber::parse(&phone)?,
                password: SecretString::from(password),
                account_type: account_type.parse::<AccountType>()?,
                id_card: id_card.map(read_id_card).transpose()?,
            };
            let outcome = service.register(&form).await?;
            println!(
                "registered {} ({}), continue at {}",
                outcome.user.display_name, outcome.user.email, outcome.redirect
            );
        }
        Commands::Login {
            email,
            password,
            account_type,
            return_url,
        } => {
            let request = LoginRequest {
                email: Email::parse(&email)?,
                password: SecretString::from(password),
                account_type: account_type.parse::<AccountType>()?,
            };
            let outcome = service.login(&request, return_url.as_deref()).await?;
            println!(
                "logged in as {} ({}), continue at {}",
                outcome.user.display_name, outcome.user.account_type, outcome.redirect
            );
        }
        Commands::Whoami => match service.load_current_user().await {
            Some(user) => println!("{} <{}> [{}]", user.display_name, user.email, user.account_type),
            None => println!("not logged in"),
        },
        Commands::Logout => {
            let target = service.logout()?;
            println!("logged out, back to {target}");
        }
        Commands::Guard { target } => {
            // Restore the session first so the guard sees the real state.
            service.load_current_user().await;
            let decision = service.route_guard().check(&target);
            match decision.redirect_target() {
                None => println!("{target}: allowed"),
                Some(redirect) => println!("{target}: denied, redirect to {redirect}"),
            }
        }
        Commands::Address { action } => match action {
            AddressAction::Get => {
                service.load_current_user().await;
                let address = service.user_address().await?;
                println!("{}", serde_json::to_string_pretty(&address)?);
            }
            AddressAction::Set {
                first_name,
                last_name,
                street,
                city,
                state,
                zipcode,
            } => {
                service.load_current_user().await;
                let updated = service
                    .update_user_address(&Address {
                        first_name,
                        last_name,
                        street,
                        city,
                        state,
                        zipcode,
                    })
                    .await?;
                println!("{}", serde_json::to_string_pretty(&updated)?);
            }
        },
    }
    Ok(())
}

/// Read an id-card photo from disk into a multipart-ready attachment.
fn read_id_card(path: std::path::PathBuf) -> Result<IdCard, std::io::Error> {
    let bytes = std::fs::read(&path)?;
    let file_name = path
        .file_name()
        .map_or_else(|| "id-card".to_owned(), |n| n.to_string_lossy().into_owned());
    Ok(IdCard { file_name, bytes })
}
