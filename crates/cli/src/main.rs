mod config;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use coincraddle_client::{CoincraddleClient, EmergencyAction, OrderStatus, RateType};
use rust_decimal::Decimal;
use serde_json::Value;
use std::path::PathBuf;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::{resolve_api_key, FileConfig};

#[derive(Parser)]
#[command(name = "coincraddle")]
#[command(about = "Coincraddle exchange API client: quotes, orders and order status")]
#[command(version)]
struct Cli {
    /// Log level (trace, debug, info, warn, error) [default: info]
    #[arg(short, long)]
    log_level: Option<String>,

    /// API key
    #[arg(long, env = "COINCRADDLE_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Path to a TOML config file with `api_key` and `log_level`
    #[arg(short, long, env = "COINCRADDLE_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check whether an address is valid for a currency
    ValidateAddress {
        /// Currency code (e.g. "BTC")
        currency: String,
        address: String,
    },

    /// Quote an exchange of a given source amount
    Rate {
        from: String,
        to: String,
        amount: Decimal,

        /// Use a fixed market rate instead of a floating one
        #[arg(long)]
        fixed: bool,
    },

    /// Quote the source amount needed to receive a given amount
    PaymentRate {
        from: String,
        to: String,
        amount_to: Decimal,
    },

    /// List available currencies
    Currencies,

    /// List available exchange pairs
    Pairs,

    /// Create an exchange order
    CreateExchange {
        from: String,
        to: String,
        amount: Decimal,

        /// Address that receives the exchanged funds
        #[arg(long)]
        destination_address: String,

        /// Address for refunds
        #[arg(long)]
        refund_address: String,

        #[arg(long)]
        destination_tag: Option<String>,

        #[arg(long)]
        refund_tag: Option<String>,

        /// Use a fixed market rate instead of a floating one
        #[arg(long)]
        fixed: bool,
    },

    /// Create a payment order that delivers an exact amount
    CreatePayment {
        from: String,
        to: String,
        amount_to: Decimal,

        #[arg(long)]
        destination_address: String,

        #[arg(long)]
        refund_address: String,

        #[arg(long)]
        destination_tag: Option<String>,

        #[arg(long)]
        refund_tag: Option<String>,
    },

    /// Resolve an expired payment
    Emergency {
        /// Order ID
        id: String,

        #[arg(value_enum)]
        action: Action,

        /// Required by the service for refunds
        #[arg(long)]
        refund_address: Option<String>,

        #[arg(long)]
        refund_tag: Option<String>,
    },

    /// Show the status of an exchange order
    Status {
        /// Order ID
        id: String,
    },

    /// Show the status of several exchange orders
    Statuses {
        /// Order IDs
        #[arg(required = true)]
        ids: Vec<String>,
    },

    /// List past exchanges
    History {
        #[arg(long)]
        page: Option<u32>,

        /// Records per page (the service allows at most 100)
        #[arg(long)]
        limit: Option<u32>,
    },

    /// List the order status tags the service reports
    OrderStatuses,
}

#[derive(Clone, Copy, ValueEnum)]
enum Action {
    /// Continue the exchange at market rate
    Exchange,
    /// Refund the deposit
    Refund,
}

impl From<Action> for EmergencyAction {
    fn from(action: Action) -> Self {
        match action {
            Action::Exchange => EmergencyAction::Exchange,
            Action::Refund => EmergencyAction::Refund,
        }
    }
}

fn rate_type(fixed: bool) -> RateType {
    if fixed {
        RateType::Fixed
    } else {
        RateType::Floating
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let file_config = match &cli.config {
        Some(path) => FileConfig::load(path)?,
        None => FileConfig::default(),
    };

    // Initialize tracing
    let log_level = cli
        .log_level
        .clone()
        .or_else(|| file_config.log_level.clone())
        .unwrap_or_else(|| "info".to_string());
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&log_level));
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    if let Commands::OrderStatuses = cli.command {
        println!("Order statuses reported by Coincraddle:");
        for status in OrderStatus::ALL {
            println!("  {}", status);
        }
        return Ok(());
    }

    let Some(api_key) = resolve_api_key(cli.api_key, &file_config) else {
        anyhow::bail!(
            "No API key: pass --api-key, set COINCRADDLE_API_KEY, or add api_key to the config file"
        );
    };
    let client = CoincraddleClient::new(api_key)?;

    run(&client, cli.command).await
}

async fn run(client: &CoincraddleClient, command: Commands) -> Result<()> {
    match command {
        Commands::ValidateAddress { currency, address } => {
            tracing::info!(currency = %currency, "Validating address");
            let valid = client.validate_address(&currency, &address).await?;
            println!("{}", if valid { "valid" } else { "invalid" });
        }
        Commands::Rate {
            from,
            to,
            amount,
            fixed,
        } => {
            let rate = client
                .get_rate(&from, &to, amount, rate_type(fixed))
                .await?;
            print_payload(&rate)?;
        }
        Commands::PaymentRate {
            from,
            to,
            amount_to,
        } => {
            let rate = client.get_payment_rate(&from, &to, amount_to).await?;
            print_payload(&rate)?;
        }
        Commands::Currencies => print_payload(&client.get_currencies().await?)?,
        Commands::Pairs => print_payload(&client.get_pairs().await?)?,
        Commands::CreateExchange {
            from,
            to,
            amount,
            destination_address,
            refund_address,
            destination_tag,
            refund_tag,
            fixed,
        } => {
            tracing::info!(from = %from, to = %to, amount = %amount, "Creating exchange");
            let order = client
                .create_exchange(
                    &from,
                    &to,
                    amount,
                    &destination_address,
                    &refund_address,
                    destination_tag.as_deref(),
                    refund_tag.as_deref(),
                    rate_type(fixed),
                )
                .await?;
            print_payload(&order)?;
        }
        Commands::CreatePayment {
            from,
            to,
            amount_to,
            destination_address,
            refund_address,
            destination_tag,
            refund_tag,
        } => {
            tracing::info!(from = %from, to = %to, amount_to = %amount_to, "Creating payment");
            let order = client
                .create_payment(
                    &from,
                    &to,
                    amount_to,
                    &destination_address,
                    &refund_address,
                    destination_tag.as_deref(),
                    refund_tag.as_deref(),
                )
                .await?;
            print_payload(&order)?;
        }
        Commands::Emergency {
            id,
            action,
            refund_address,
            refund_tag,
        } => {
            let accepted = client
                .handle_emergency(
                    &id,
                    action.into(),
                    refund_address.as_deref(),
                    refund_tag.as_deref(),
                )
                .await?;
            println!("{}", if accepted { "ok" } else { "rejected" });
        }
        Commands::Status { id } => {
            let status = client.get_exchange_status(&id).await?;
            if let Some(tag) = coincraddle_core::payload::order_status(&status) {
                tracing::info!(id = %id, status = %tag, "Exchange status");
            }
            print_payload(&status)?;
        }
        Commands::Statuses { ids } => {
            print_payload(&client.get_multiple_exchange_statuses(&ids).await?)?;
        }
        Commands::History { page, limit } => {
            print_payload(&client.get_exchange_history(page, limit).await?)?;
        }
        Commands::OrderStatuses => {}
    }

    Ok(())
}

fn print_payload(payload: &Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(payload)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_create_exchange() {
        let cli = Cli::try_parse_from([
            "coincraddle",
            "create-exchange",
            "BTC",
            "ETH",
            "0.1",
            "--destination-address",
            "0xabc",
            "--refund-address",
            "bc1q",
            "--fixed",
        ])
        .unwrap();

        match cli.command {
            Commands::CreateExchange {
                amount,
                destination_tag,
                refund_tag,
                fixed,
                ..
            } => {
                assert_eq!(amount, Decimal::new(1, 1));
                assert_eq!(destination_tag, None);
                assert_eq!(refund_tag, None);
                assert_eq!(rate_type(fixed), RateType::Fixed);
            }
            _ => panic!("Expected create-exchange"),
        }
    }

    #[test]
    fn test_parse_emergency_action() {
        let cli = Cli::try_parse_from(["coincraddle", "emergency", "pay-1", "refund"]).unwrap();
        match cli.command {
            Commands::Emergency { action, .. } => {
                assert_eq!(EmergencyAction::from(action), EmergencyAction::Refund);
            }
            _ => panic!("Expected emergency"),
        }
    }

    #[test]
    fn test_statuses_require_ids() {
        assert!(Cli::try_parse_from(["coincraddle", "statuses"]).is_err());
    }
}
