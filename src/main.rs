//! MindEase - guided stress-management wizard for your terminal.
//!
//! Runs the interactive wizard by default, or one-shot analysis and plan
//! requests for scripting.

use std::fs::OpenOptions;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use mindease::ai::{build_advisor, Advisor, AdvisorError};
use mindease::core::{ActionPlan, Config, ProviderKind, StressAnalysis};
use mindease::{tui, App};

/// Guided stress-management wizard for your terminal
#[derive(Parser)]
#[command(name = "mindease")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    command: Option<Commands>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Text-generation provider (overrides the config file)
    #[arg(long, global = true, value_enum, env = "MINDEASE_PROVIDER")]
    provider: Option<ProviderKind>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the interactive wizard (default)
    Run,

    /// Analyze a description of what is stressing you
    Analyze {
        /// Free text to analyze
        text: String,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Generate an action plan from a saved analysis
    Plan {
        /// Analysis JSON file (as printed by `analyze --format json`), or - for stdin
        file: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Show configuration
    Config {
        /// Show config file path
        #[arg(long)]
        path: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn main() -> Result<()> {
    // API keys may live in a local .env file
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    match cli.command {
        None | Some(Commands::Run) => {
            let config = load_config(cli.provider)?;
            init_logging(cli.verbose, config.log_file().as_deref())?;
            cmd_run(config)?;
        }
        Some(Commands::Analyze { text, format }) => {
            init_logging(cli.verbose, None)?;
            cmd_analyze(&load_config(cli.provider)?, &text, format)?;
        }
        Some(Commands::Plan { file, format }) => {
            init_logging(cli.verbose, None)?;
            cmd_plan(&load_config(cli.provider)?, &file, format)?;
        }
        Some(Commands::Config { path }) => {
            init_logging(cli.verbose, None)?;
            cmd_config(cli.provider, path)?;
        }
        Some(Commands::Completions { shell }) => {
            cmd_completions(shell);
        }
    }

    Ok(())
}

/// Load the config file and apply command-line overrides.
fn load_config(provider: Option<ProviderKind>) -> Result<Config> {
    let mut config = Config::load()?;
    if let Some(provider) = provider {
        config.ai.provider = provider;
    }
    Ok(config)
}

/// Setup logging to stderr, or to a file while the TUI owns the terminal.
fn init_logging(verbose: bool, log_file: Option<&Path>) -> Result<()> {
    let filter = if verbose {
        EnvFilter::new("mindease=debug,warn")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    match log_file {
        Some(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Cannot open log file {}", path.display()))?;

            tracing_subscriber::registry()
                .with(fmt::layer().with_target(false).with_ansi(false).with_writer(Mutex::new(file)))
                .with(filter)
                .init();
        }
        None => {
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(false).with_writer(io::stderr))
                .with(filter)
                .init();
        }
    }

    Ok(())
}

/// Build the configured advisor with a friendlier missing-key message.
fn advisor_for(config: &Config) -> Result<Arc<dyn Advisor>> {
    build_advisor(&config.ai).map_err(|e| match e {
        AdvisorError::MissingApiKey(var) => anyhow::anyhow!(
            "{var} not set.\n\
             Export it (or add it to a .env file), or pick another provider with --provider."
        ),
        other => other.into(),
    })
}

/// Run the interactive wizard.
fn cmd_run(config: Config) -> Result<()> {
    let runtime = tokio::runtime::Runtime::new()?;
    let advisor = advisor_for(&config)?;

    let app = App::new(config, advisor, runtime.handle().clone());
    let result = tui::run_tui(app);

    // In-flight requests are abandoned, not awaited.
    runtime.shutdown_background();
    result
}

/// One-shot analysis.
fn cmd_analyze(config: &Config, text: &str, format: OutputFormat) -> Result<()> {
    if text.trim().is_empty() {
        anyhow::bail!("Nothing to analyze: the text is empty");
    }

    let advisor = advisor_for(config)?;
    let runtime = tokio::runtime::Runtime::new()?;

    eprintln!("Analyzing with {}...\n", advisor.name());
    let analysis = runtime.block_on(advisor.analyze(text))?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&analysis)?),
        OutputFormat::Text => print_analysis(&analysis),
    }

    Ok(())
}

/// One-shot plan from a saved analysis.
fn cmd_plan(config: &Config, file: &Path, format: OutputFormat) -> Result<()> {
    let content = if file == Path::new("-") {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        std::fs::read_to_string(file)
            .with_context(|| format!("Cannot read analysis file {}", file.display()))?
    };

    let analysis: StressAnalysis =
        serde_json::from_str(&content).context("Analysis file is not a valid analysis")?;
    analysis.check_shape().map_err(|e| anyhow::anyhow!("Invalid analysis: {e}"))?;

    let advisor = advisor_for(config)?;
    let runtime = tokio::runtime::Runtime::new()?;

    eprintln!("Building a plan with {}...\n", advisor.name());
    let plan = runtime.block_on(advisor.plan(&analysis))?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&plan)?),
        OutputFormat::Text => print_plan(&plan),
    }

    Ok(())
}

fn print_analysis(analysis: &StressAnalysis) {
    println!("Sentiment: {}", analysis.sentiment);
    println!("\n{}\n", analysis.summary);
    for category in &analysis.categories {
        println!("  {:<20} {:>3.0}  {}", category.name, category.score, category.description);
    }
}

fn print_plan(plan: &ActionPlan) {
    println!("Right now:");
    for step in &plan.immediate_steps {
        println!("  • {step}");
    }

    println!("\nOver the coming weeks:");
    for strategy in &plan.long_term_strategies {
        println!("  • {strategy}");
    }

    println!("\nSupport at USM:");
    for resource in &plan.usm_resources {
        println!("  • {} ({})", resource.name, resource.contact);
        println!("    {}", resource.link);
    }
}

/// Show configuration.
fn cmd_config(provider: Option<ProviderKind>, show_path: bool) -> Result<()> {
    if show_path {
        match Config::locate() {
            Some(path) => println!("{}", path.display()),
            None => {
                let global = Config::global_path()
                    .map_or_else(|| "(no config directory)".to_string(), |p| p.display().to_string());
                println!("{global} (not found, using defaults)");
            }
        }
        return Ok(());
    }

    let config = load_config(provider)?;
    print!("{}", toml::to_string_pretty(&config)?);
    Ok(())
}

/// Generate shell completions.
fn cmd_completions(shell: Shell) {
    let mut cmd = Cli::command();
    generate(shell, &mut cmd, "mindease", &mut io::stdout());
}
