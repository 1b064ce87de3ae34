pub mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use shopsense_core::config::{AppConfig, ConfigOverrides, LoadOptions, LogFormat};
use shopsense_core::forecast::ForecastSubject;
use shopsense_core::ranking::SubstitutionReason;
use shopsense_core::text::{DEFAULT_MAX_KEYWORDS, DEFAULT_SUMMARY_LENGTH};
use tracing::Level;

use commands::campaign::{CampaignKindArg, CampaignRequest};
use commands::prompt::{PromptKind, PromptRequest};
use commands::CommandResult;

#[derive(Debug, Parser)]
#[command(
    name = "shopsense",
    about = "ShopSense e-commerce intelligence CLI",
    long_about = "Analyze review text, rank similar products, forecast demand, and render marketing prompts from local JSON data.",
    after_help = "Examples:\n  shopsense sentiment \"great phone, fast delivery\"\n  shopsense similar --catalog catalog.json --product p-1\n  shopsense forecast --series sales.json --subject product\n  shopsense campaign --users users.json --segment vip --kind personalized\n  shopsense doctor --json"
)]
pub struct Cli {
    #[arg(long, global = true, help = "Path to a shopsense.toml config file")]
    config: Option<PathBuf>,
    #[arg(long, global = true, help = "Override the configured log level")]
    log_level: Option<String>,
    #[arg(long, global = true, help = "Override the configured log format")]
    log_format: Option<LogFormatArg>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
enum LogFormatArg {
    Compact,
    Pretty,
    Json,
}

impl From<LogFormatArg> for LogFormat {
    fn from(value: LogFormatArg) -> Self {
        match value {
            LogFormatArg::Compact => LogFormat::Compact,
            LogFormatArg::Pretty => LogFormat::Pretty,
            LogFormatArg::Json => LogFormat::Json,
        }
    }
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Classify review text as positive, negative, or neutral")]
    Sentiment { text: String },
    #[command(about = "Extract the most frequent non-stop-words from text")]
    Keywords {
        text: String,
        #[arg(long, default_value_t = DEFAULT_MAX_KEYWORDS)]
        max: usize,
    },
    #[command(about = "Shorten text to its leading sentences")]
    Summarize {
        text: String,
        #[arg(long, default_value_t = DEFAULT_SUMMARY_LENGTH)]
        max_length: usize,
    },
    #[command(about = "Score text against product category keyword lists")]
    Classify {
        text: String,
        #[arg(long = "category", help = "Category to score; repeat for several (default: all)")]
        categories: Vec<String>,
    },
    #[command(about = "Produce the deterministic pseudo-embedding for text")]
    Embed {
        text: String,
        #[arg(long, help = "Print every component instead of a preview")]
        full: bool,
    },
    #[command(about = "Rank catalog products similar to a target product")]
    Similar {
        #[arg(long)]
        catalog: PathBuf,
        #[arg(long)]
        product: String,
        #[arg(long)]
        top_k: Option<usize>,
        #[arg(long, help = "Skip the embedding tier and rank by category")]
        no_embeddings: bool,
    },
    #[command(about = "Search product names and descriptions for a query")]
    Search {
        #[arg(long)]
        catalog: PathBuf,
        query: String,
        #[arg(long)]
        top_k: Option<usize>,
    },
    #[command(about = "Suggest substitutes for an out-of-stock or overpriced product")]
    Substitutes {
        #[arg(long)]
        catalog: PathBuf,
        #[arg(long)]
        product: String,
        #[arg(long, default_value = "out_of_stock")]
        reason: SubstitutionReason,
    },
    #[command(about = "Recommend products outside the categories a shopper already prefers")]
    Discover {
        #[arg(long)]
        catalog: PathBuf,
        #[arg(long = "preferred", required = true, num_args = 1..)]
        preferred: Vec<String>,
        #[arg(long)]
        top_k: Option<usize>,
    },
    #[command(about = "Forecast daily values for a product, category, or revenue series")]
    Forecast {
        #[arg(long)]
        series: PathBuf,
        #[arg(long, default_value = "product")]
        subject: ForecastSubject,
        #[arg(long)]
        periods: Option<u32>,
        #[arg(long, help = "Forecast origin as RFC 3339 (default: now)")]
        as_of: Option<DateTime<Utc>>,
    },
    #[command(about = "Project stock levels against forecast demand")]
    Inventory {
        #[arg(long)]
        series: PathBuf,
        #[arg(long)]
        stock: u32,
        #[arg(long)]
        horizon: Option<u32>,
        #[arg(long, help = "Forecast origin as RFC 3339 (default: now)")]
        as_of: Option<DateTime<Utc>>,
    },
    #[command(about = "Compare recent and prior halves of a series within the trend window")]
    Trend {
        #[arg(long)]
        series: PathBuf,
        #[arg(long, help = "Window end as RFC 3339 (default: now)")]
        as_of: Option<DateTime<Utc>>,
    },
    #[command(about = "Render a marketing prompt and its templated reply")]
    Prompt {
        #[arg(long, value_enum)]
        kind: PromptKind,
        #[arg(long, default_value = "newsletter")]
        email_type: String,
        #[arg(long, help = "User profile JSON")]
        profile: Option<PathBuf>,
        #[arg(long, help = "Category preference JSON array")]
        preferences: Option<PathBuf>,
        #[arg(long, help = "Cart item JSON array")]
        cart: Option<PathBuf>,
        #[arg(long, help = "Catalog JSON used to pick featured products")]
        catalog: Option<PathBuf>,
        #[arg(long)]
        season: Option<String>,
    },
    #[command(about = "Render one marketing email per user in a segment")]
    Campaign {
        #[arg(long, help = "User JSON array with user_id, email, and optional segment")]
        users: PathBuf,
        #[arg(long, default_value = shopsense_core::prompts::ALL_SEGMENTS)]
        segment: String,
        #[arg(long, value_enum)]
        kind: CampaignKindArg,
        #[arg(long, default_value = "newsletter")]
        email_type: String,
        #[arg(long)]
        season: Option<String>,
        #[arg(long, help = "Catalog JSON used to pick featured seasonal products")]
        catalog: Option<PathBuf>,
    },
    #[command(
        about = "Inspect effective configuration values with source attribution and redaction"
    )]
    Config,
    #[command(about = "Validate config, prompt templates, and the embedding self-check")]
    Doctor {
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
}

impl Cli {
    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            config_path: self.config.clone(),
            require_file: self.config.is_some(),
            overrides: ConfigOverrides {
                log_level: self.log_level.clone(),
                log_format: self.log_format.map(LogFormat::from),
                ..ConfigOverrides::default()
            },
        }
    }
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();
    let options = cli.load_options();
    init_logging(&options);

    let result = execute(cli.command, &options);
    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}

/// Parses `args` (program name first) and runs the selected command.
pub fn execute_args<I, T>(args: I) -> Result<CommandResult, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let cli = Cli::try_parse_from(args)?;
    let options = cli.load_options();
    Ok(execute(cli.command, &options))
}

fn execute(command: Command, options: &LoadOptions) -> CommandResult {
    match command {
        Command::Sentiment { text } => commands::analyze::sentiment(options, &text),
        Command::Keywords { text, max } => commands::analyze::keywords(options, &text, max),
        Command::Summarize { text, max_length } => commands::analyze::summarize(&text, max_length),
        Command::Classify { text, categories } => commands::analyze::classify(&text, &categories),
        Command::Embed { text, full } => commands::analyze::embed(options, &text, full),
        Command::Similar { catalog, product, top_k, no_embeddings } => {
            commands::recommend::similar(options, &catalog, &product, top_k, !no_embeddings)
        }
        Command::Search { catalog, query, top_k } => {
            commands::recommend::search(&catalog, &query, top_k)
        }
        Command::Substitutes { catalog, product, reason } => {
            commands::recommend::substitutes(options, &catalog, &product, reason)
        }
        Command::Discover { catalog, preferred, top_k } => {
            commands::recommend::discover(options, &catalog, &preferred, top_k)
        }
        Command::Forecast { series, subject, periods, as_of } => commands::forecast::forecast(
            options,
            &series,
            subject,
            periods,
            as_of.unwrap_or_else(Utc::now),
        ),
        Command::Inventory { series, stock, horizon, as_of } => commands::forecast::inventory(
            options,
            &series,
            stock,
            horizon,
            as_of.unwrap_or_else(Utc::now),
        ),
        Command::Trend { series, as_of } => {
            commands::forecast::trend(options, &series, as_of.unwrap_or_else(Utc::now))
        }
        Command::Prompt { kind, email_type, profile, preferences, cart, catalog, season } => {
            let request =
                PromptRequest { kind, email_type, profile, preferences, cart, catalog, season };
            commands::prompt::run(options, &request)
        }
        Command::Campaign { users, segment, kind, email_type, season, catalog } => {
            let request = CampaignRequest { users, segment, kind, email_type, season, catalog };
            commands::campaign::run(options, &request, Utc::now())
        }
        Command::Config => commands::config::run(options),
        Command::Doctor { json } => commands::doctor::run(options, json),
    }
}

/// Logs go to stderr so stdout carries only the command envelope.
fn init_logging(options: &LoadOptions) {
    use LogFormat::*;

    // An invalid config still gets logging; the command reports the error itself.
    let (level, format) = match AppConfig::load(options.clone()) {
        Ok(config) => (config.logging.level, config.logging.format),
        Err(_) => (
            options.overrides.log_level.clone().unwrap_or_else(|| "info".to_string()),
            options.overrides.log_format.unwrap_or(Compact),
        ),
    };
    let log_level = level.parse::<Level>().unwrap_or(Level::INFO);

    let builder = tracing_subscriber::fmt()
        .with_target(false)
        .with_max_level(log_level)
        .with_writer(std::io::stderr);
    match format {
        Compact => builder.compact().init(),
        Pretty => builder.pretty().init(),
        Json => builder.json().init(),
    }
}
