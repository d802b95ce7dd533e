//! Rider KYC CLI
//!
//! Command-line front end for rider registration and the admin listing.
//!
//! # Usage
//!
//! ```bash
//! rider-kyc form
//! rider-kyc register --field name="Ravi Kumar" --field address="12 MG Road" \
//!     --field aadharNumber=1234-5678-9012 --field vehicle=KA01AB1234 \
//!     --file aadharFile=./aadhar.pdf --file riderPhoto=./me.jpg
//! rider-kyc admin login --username admin --password password
//! rider-kyc admin drivers --format json
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use kyc_client::Config;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod output;

#[derive(Parser)]
#[command(name = "rider-kyc")]
#[command(version)]
#[command(about = "Rider KYC registration and admin listing", long_about = None)]
struct Cli {
    /// API root URL (overrides KYC_API_URL)
    #[arg(long)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the fields of a form
    Form {
        /// Show the damage report form instead of the registration form
        #[arg(long)]
        damage_report: bool,
    },
    /// Validate and submit a driver registration
    Register {
        /// Text field value, as NAME=VALUE
        #[arg(long = "field", value_parser = commands::parse_key_val::<String>)]
        fields: Vec<(String, String)>,

        /// File to attach, as NAME=PATH (repeat NAME for multi-file fields)
        #[arg(long = "file", value_parser = commands::parse_key_val::<PathBuf>)]
        files: Vec<(String, PathBuf)>,
    },
    /// Admin listing of registered drivers
    Admin {
        #[command(subcommand)]
        action: AdminCommands,
    },
}

#[derive(Subcommand)]
enum AdminCommands {
    /// Log in and remember it
    Login {
        #[arg(long)]
        username: String,
        #[arg(long)]
        password: String,
    },
    /// Forget the stored login
    Logout,
    /// List registered drivers
    Drivers {
        #[arg(long, short, default_value = "table")]
        format: output::OutputFormat,
    },
}

async fn run(cli: Cli) -> Result<()> {
    let mut config = Config::from_env().context("Failed to load configuration")?;
    if let Some(api_url) = &cli.api_url {
        config = config.with_api_url(api_url)?;
    }

    match cli.command {
        Commands::Form { damage_report } => commands::form::handle(damage_report, &config),
        Commands::Register { fields, files } => {
            commands::register::handle(fields, files, &config).await
        }
        Commands::Admin { action } => commands::admin::handle(action, &config).await,
    }
}

#[tokio::main]
async fn main() {
    // Logs go to stderr so stdout stays clean for tables and JSON
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rider_kyc=info,kyc_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(e) = run(Cli::parse()).await {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_register_arguments() {
        let cli = Cli::try_parse_from([
            "rider-kyc",
            "register",
            "--field",
            "name=Ravi Kumar",
            "--file",
            "riderPhoto=./me.jpg",
        ])
        .unwrap();

        match cli.command {
            Commands::Register { fields, files } => {
                assert_eq!(fields, vec![("name".to_string(), "Ravi Kumar".to_string())]);
                assert_eq!(files, vec![("riderPhoto".to_string(), PathBuf::from("./me.jpg"))]);
            }
            _ => panic!("expected register"),
        }
    }

    #[test]
    fn test_drivers_format_flag() {
        let cli =
            Cli::try_parse_from(["rider-kyc", "admin", "drivers", "--format", "json"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Admin {
                action: AdminCommands::Drivers {
                    format: output::OutputFormat::Json
                }
            }
        ));
    }
}
