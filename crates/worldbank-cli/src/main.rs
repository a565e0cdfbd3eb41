use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use serde_json::json;

use worldbank_cli::commands::{mcp, query};
use worldbank_cli::GlobalOptions;
use worldbank_mcp::types::DEFAULT_YEAR;
use worldbank_mcp::{HandlerId, ResourceId, ToolId};

#[derive(Parser, Debug)]
#[command(author, version, about = "World Bank data gateway")]
struct Cli {
    /// Override the dataset CSV path.
    #[arg(long, global = true)]
    data_file: Option<PathBuf>,

    /// Log filter (overrides RUST_LOG).
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the MCP server over stdio.
    Mcp,
    /// Print the dataset schema.
    Schema,
    /// Print the countries present in the dataset.
    Countries,
    /// Print the local indicator rows for one country.
    Indicators {
        /// ISO3 country code.
        country_code: String,
    },
    /// Look up a country profile.
    CountryInfo {
        /// ISO 3166-1 alpha-2 or alpha-3 country code.
        country_code: String,
    },
    /// Fetch one live indicator value.
    LiveIndicator {
        country_code: String,
        /// World Bank indicator ID (e.g. NY.GDP.PCAP.CD).
        indicator: String,
        #[arg(long, default_value_t = DEFAULT_YEAR)]
        year: i32,
    },
    /// Compare one live indicator across countries.
    Compare {
        indicator: String,
        #[arg(required = true)]
        country_codes: Vec<String>,
        #[arg(long, default_value_t = DEFAULT_YEAR)]
        year: i32,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let global = GlobalOptions {
        data_file: cli.data_file,
        log_level: cli.log_level,
    };

    let (handler, arguments) = match cli.command {
        Command::Mcp => return mcp::run_mcp_server(&global).await,
        Command::Schema => (HandlerId::Resource(ResourceId::Schema), json!(null)),
        Command::Countries => (HandlerId::Resource(ResourceId::Countries), json!(null)),
        Command::Indicators { country_code } => (
            HandlerId::Resource(ResourceId::Indicators(country_code)),
            json!(null),
        ),
        Command::CountryInfo { country_code } => (
            HandlerId::Tool(ToolId::CountryInfo),
            json!({ "country_code": country_code }),
        ),
        Command::LiveIndicator {
            country_code,
            indicator,
            year,
        } => (
            HandlerId::Tool(ToolId::LiveIndicator),
            json!({ "country_code": country_code, "indicator": indicator, "year": year }),
        ),
        Command::Compare {
            indicator,
            country_codes,
            year,
        } => (
            HandlerId::Tool(ToolId::CompareCountries),
            json!({ "country_codes": country_codes, "indicator": indicator, "year": year }),
        ),
    };

    query::run_query(&global, handler, arguments).await
}
