//! adaptest CLI — the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{ArgGroup, Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "adaptest",
    version,
    about = "Adaptive ability assessment with the Rasch model"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Estimate ability from a recorded response history
    Estimate {
        /// Response history (.toml with [[responses]] or .json array)
        #[arg(long)]
        responses: PathBuf,

        /// Output format: text, json
        #[arg(long, default_value = "text")]
        format: String,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Discrimination analysis of items from top/bottom group outcomes
    Analyze {
        /// Item analysis TOML file
        #[arg(long)]
        items: PathBuf,

        /// Output format: text, json
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Efficiency of an adaptive session against a fixed-length test
    Efficiency {
        /// Questions the adaptive session asked
        #[arg(long, allow_negative_numbers = true)]
        asked: i64,

        /// Fixed-length baseline (default from config)
        #[arg(long, allow_negative_numbers = true)]
        baseline: Option<i64>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Run simulated adaptive sessions against an item bank
    Simulate {
        /// Item bank TOML file
        #[arg(long)]
        bank: PathBuf,

        /// True abilities of the simulated examinees (e.g. "-1.5,0,2")
        #[arg(long, allow_hyphen_values = true)]
        abilities: String,

        /// Max concurrent sessions (default from config)
        #[arg(long)]
        parallelism: Option<usize>,

        /// Output directory
        #[arg(long, default_value = "./adaptest-results")]
        output: PathBuf,

        /// Output format: json, markdown, all
        #[arg(long, default_value = "json")]
        format: String,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Validate item banks or a response history
    #[command(group(ArgGroup::new("target").required(true).args(["bank", "responses"])))]
    Validate {
        /// Path to item bank file or directory
        #[arg(long)]
        bank: Option<PathBuf>,

        /// Path to a response history file
        #[arg(long)]
        responses: Option<PathBuf>,
    },

    /// Create starter config and example item bank
    Init,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("adaptest=info".parse().unwrap()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Estimate {
            responses,
            format,
            config,
        } => commands::estimate::execute(responses, format, config),
        Commands::Analyze { items, format } => commands::analyze::execute(items, format),
        Commands::Efficiency {
            asked,
            baseline,
            config,
        } => commands::efficiency::execute(asked, baseline, config),
        Commands::Simulate {
            bank,
            abilities,
            parallelism,
            output,
            format,
            config,
        } => commands::simulate::execute(bank, abilities, parallelism, output, format, config).await,
        Commands::Validate { bank, responses } => commands::validate::execute(bank, responses),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
