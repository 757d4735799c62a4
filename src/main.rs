use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use sheetfeed::feed::{FeedParams, Projection, QueryOptions, Visibility};
use sheetfeed::{Config, SheetsClient};
use std::path::PathBuf;

/// Get the default config file path (~/.config/sheetfeed/config.toml)
fn default_config_path() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME environment variable not set")?;
    Ok(PathBuf::from(home)
        .join(".config")
        .join("sheetfeed")
        .join("config.toml"))
}

#[derive(Parser, Debug)]
#[command(
    name = "sheetfeed",
    about = "Fetch Google Spreadsheets feeds as flattened JSON"
)]
struct Cli {
    /// Config file (defaults to ~/.config/sheetfeed/config.toml)
    #[arg(long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the cells feed of one worksheet
    Cells {
        /// Spreadsheet key
        id: String,
        /// Worksheet id (e.g. od6)
        worksheet: String,
        #[command(flatten)]
        feed: FeedArgs,
    },
    /// Print the cells feed of every worksheet
    Worksheets {
        /// Spreadsheet key
        id: String,
        #[command(flatten)]
        feed: FeedArgs,
    },
}

#[derive(Args, Debug)]
struct FeedArgs {
    /// public or private
    #[arg(long)]
    visibility: Option<Visibility>,
    /// full or basic
    #[arg(long)]
    projection: Option<Projection>,
    #[arg(long)]
    min_row: Option<u32>,
    #[arg(long)]
    max_row: Option<u32>,
    #[arg(long)]
    min_col: Option<u32>,
    #[arg(long)]
    max_col: Option<u32>,
    /// Column to sort by
    #[arg(long)]
    orderby: Option<String>,
    #[arg(long)]
    reverse: bool,
    /// Structured query
    #[arg(long)]
    sq: Option<String>,
}

impl FeedArgs {
    fn into_params(self, id: String) -> FeedParams {
        FeedParams {
            id,
            visibility: self.visibility,
            projection: self.projection,
            query: QueryOptions {
                min_row: self.min_row,
                max_row: self.max_row,
                min_col: self.min_col,
                max_col: self.max_col,
                orderby: self.orderby,
                reverse: self.reverse.then_some(true),
                sq: self.sq,
                alt: None,
            },
            ..FeedParams::default()
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config_path = match cli.config {
        Some(path) => path,
        None => default_config_path()?,
    };
    let config = Config::load(&config_path)
        .with_context(|| format!("Failed to load config from {}", config_path.display()))?;
    tracing::debug!(?config, "Using configuration");

    let credentials = config.credentials();
    let client = SheetsClient::from_config(reqwest::Client::new(), &config);

    let output = match cli.command {
        Command::Cells {
            id,
            worksheet,
            feed,
        } => {
            let params = feed.into_params(id).worksheet(worksheet);
            let cells = client
                .get_cells(&params, &credentials)
                .await
                .with_context(|| format!("Failed to fetch cells of spreadsheet '{}'", params.id))?;
            serde_json::to_string_pretty(&cells)?
        }
        Command::Worksheets { id, feed } => {
            let params = feed.into_params(id);
            let sheets = client
                .get_worksheets(&params, &credentials)
                .await
                .with_context(|| {
                    format!("Failed to fetch worksheets of spreadsheet '{}'", params.id)
                })?;
            serde_json::to_string_pretty(&sheets)?
        }
    };

    println!("{}", output);
    Ok(())
}
