//! azprices - Fast Azure retail price search and region recommendation CLI
//!
//! Subcommands map one-to-one onto the library operations and print their
//! typed results as JSON.

use anyhow::Result;
use azprices::commands::{
    customer_discount, CompareCommand, DiscoverCommand, EstimateCommand, RecommendCommand,
    ResolveCommand, SearchCommand, SearchRequest,
};
use azprices::config::Config;
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "azprices",
    version,
    about = "Fast Azure retail price search and region recommendation CLI",
    long_about = "Queries the Azure Retail Prices API with SKU normalization, \
                  region ranking, and flat customer discounting."
)]
struct Cli {
    /// Currency code for returned prices
    #[arg(short = 'u', long, global = true, env = "AZP_CURRENCY")]
    currency: Option<String>,

    /// Proxy URL (e.g., socks5://host:port)
    #[arg(long, global = true, env = "AZP_PROXY")]
    proxy: Option<String>,

    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search retail prices with filters
    #[command(alias = "s")]
    Search {
        /// Service name (e.g., 'Virtual Machines')
        #[arg(long)]
        service: Option<String>,

        /// Service family (e.g., 'Compute', 'Storage')
        #[arg(long)]
        family: Option<String>,

        /// Region code (e.g., 'eastus')
        #[arg(short, long)]
        region: Option<String>,

        /// SKU name substring (e.g., 'D4s v5')
        #[arg(long)]
        sku: Option<String>,

        /// Price type: Consumption, Reservation, or DevTestConsumption
        #[arg(long)]
        price_type: Option<String>,

        /// Maximum number of results
        #[arg(short, long, default_value = "50")]
        limit: usize,

        /// Discount percentage to apply to prices
        #[arg(short, long, value_parser = parse_discount)]
        discount: Option<f64>,

        /// Skip SKU validation and clarification
        #[arg(long)]
        no_validate: bool,
    },

    /// Compare prices across regions or SKUs
    #[command(alias = "c")]
    Compare {
        /// Service name to compare
        service: String,

        /// Specific SKU to compare
        #[arg(long)]
        sku: Option<String>,

        /// Regions to compare (compares SKUs when omitted)
        #[arg(short, long, value_delimiter = ',')]
        regions: Vec<String>,

        /// Discount percentage to apply to prices
        #[arg(short, long, value_parser = parse_discount)]
        discount: Option<f64>,
    },

    /// Rank the cheapest regions for a SKU
    #[command(alias = "r")]
    Recommend {
        /// Service name (e.g., 'Virtual Machines')
        service: String,

        /// SKU in any format ('D4s v3', 'Standard_D4s_v5', 'D4s_v5')
        sku: String,

        /// Number of top regions to return
        #[arg(short, long, default_value = "10")]
        top: usize,

        /// Discount percentage to apply to prices
        #[arg(short, long, value_parser = parse_discount)]
        discount: Option<f64>,
    },

    /// Project monthly costs for a SKU in one region
    #[command(alias = "e")]
    Estimate {
        /// Service name
        service: String,

        /// SKU name
        sku: String,

        /// Region code
        region: String,

        /// Expected hours of usage per month
        #[arg(long, default_value = "730")]
        hours: f64,

        /// Discount percentage to apply to prices
        #[arg(short, long, value_parser = parse_discount)]
        discount: Option<f64>,
    },

    /// List the distinct SKUs a service offers
    Skus {
        /// Service name
        service: String,

        /// Region code to filter by
        #[arg(short, long)]
        region: Option<String>,

        /// Price type to filter by
        #[arg(long, default_value = "Consumption")]
        price_type: String,

        /// Maximum number of catalog rows to scan
        #[arg(short, long, default_value = "100")]
        limit: usize,
    },

    /// Resolve a free-text hint to a canonical service name
    Resolve {
        /// Service name or description (e.g., 'web app', 'vm', 'storage')
        hint: String,

        /// Service family to scope the broad scan
        #[arg(long)]
        family: Option<String>,
    },

    /// Show the customer discount on file
    Discount {
        /// Customer ID
        #[arg(long)]
        customer: Option<String>,
    },
}

/// Parses a discount percentage, requiring (0, 100].
fn parse_discount(raw: &str) -> Result<f64, String> {
    let value: f64 = raw.parse().map_err(|_| format!("invalid percentage: {raw}"))?;
    if value > 0.0 && value <= 100.0 {
        Ok(value)
    } else {
        Err(format!("discount must be within (0, 100], got {value}"))
    }
}

/// Prints any serializable result as pretty JSON.
fn emit<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new(Level::DEBUG.to_string())
    } else {
        EnvFilter::from_default_env().add_directive(Level::WARN.into())
    };

    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();

    // Load config with layered overrides
    let mut config = Config::load(cli.config.as_deref())?.with_env();

    // Apply CLI overrides
    if let Some(currency) = cli.currency {
        config.currency = currency;
    }
    if let Some(proxy) = cli.proxy {
        config.proxy = Some(proxy);
    }

    match cli.command {
        Commands::Search {
            service,
            family,
            region,
            sku,
            price_type,
            limit,
            discount,
            no_validate,
        } => {
            let request = SearchRequest {
                service_name: service,
                service_family: family,
                region,
                sku_contains: sku,
                price_type,
                currency: config.currency.clone(),
                limit,
                discount,
                validate_sku: !no_validate,
            };

            let cmd = SearchCommand::new(config);
            emit(&cmd.execute(&request).await?)?;
        }

        Commands::Compare { service, sku, regions, discount } => {
            let cmd = CompareCommand::new(config);
            emit(&cmd.execute(&service, sku.as_deref(), &regions, discount).await?)?;
        }

        Commands::Recommend { service, sku, top, discount } => {
            let cmd = RecommendCommand::new(config);
            emit(&cmd.execute(&service, &sku, top, discount).await?)?;
        }

        Commands::Estimate { service, sku, region, hours, discount } => {
            let cmd = EstimateCommand::new(config);
            emit(&cmd.execute(&service, &sku, &region, hours, discount).await?)?;
        }

        Commands::Skus { service, region, price_type, limit } => {
            let cmd = DiscoverCommand::new(config);
            emit(&cmd.execute(&service, region.as_deref(), &price_type, limit).await?)?;
        }

        Commands::Resolve { hint, family } => {
            let cmd = ResolveCommand::new(config);
            emit(&cmd.execute(&hint, family.as_deref()).await?)?;
        }

        Commands::Discount { customer } => {
            emit(&customer_discount(&config, customer.as_deref()))?;
        }
    }

    Ok(())
}
