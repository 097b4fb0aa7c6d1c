use clap::{Parser, Subcommand};
use docpub::collect::Collector;
use docpub::config::{self, CONFIG_FILENAME};
use docpub::publish::{CommandDeployer, CommandGenerator, Orchestrator, TriggerContext};
use docpub::{Error, output};
use std::io::IsTerminal;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "docpub")]
#[command(about = "Build and publish a repository's documentation site")]
#[command(long_about = "\
Build and publish a repository's documentation site

Reads docpub.toml at the repository root, collects the documentation and
example files its patterns select, runs the documentation generator, and,
on the trigger branch only, deploys the generated site.

  repo/
  ├── docpub.toml          # Site config
  ├── index.md             # [sources] patterns pick documentation
  ├── posts/*.md
  ├── examples/*.cpp       # [examples] patterns pick code examples
  └── html/                # Generator output (never collected)

The build branch comes from --branch, then $DOCPUB_BRANCH, then
$GITHUB_REF_NAME. Other branches still generate, so broken docs fail the
build everywhere, but only the trigger branch publishes.

Run 'docpub gen-config' to generate a documented docpub.toml.")]
#[command(version)]
struct Cli {
    /// Repository root
    #[arg(long, default_value = ".", global = true)]
    root: PathBuf,

    /// Config file (default: <root>/docpub.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Print stage progress and the collected documents
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Branch being built
    #[arg(long, env = "DOCPUB_BRANCH", global = true)]
    branch: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the full pipeline: generate, then deploy on the trigger branch (default)
    Publish,
    /// Validate the config and list the collected documents
    Check,
    /// Show which code-block category each symbol falls into
    Classify {
        /// Symbol names to classify
        #[arg(required = true)]
        symbols: Vec<String>,
    },
    /// Print a stock docpub.toml with all options documented
    GenConfig,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    if let Err(e) = init_logging(cli.verbose) {
        eprintln!("warning: logging unavailable: {e}");
    }

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::from(e.exit_code())
        }
    }
}

fn run(cli: Cli) -> Result<(), Error> {
    let command = cli.command.unwrap_or(Command::Publish);
    if let Command::GenConfig = command {
        print!("{}", config::stock_config_toml());
        return Ok(());
    }

    let config_path = cli
        .config
        .unwrap_or_else(|| cli.root.join(CONFIG_FILENAME));
    let config = config::load_config(&config_path)?;

    if let Command::Classify { symbols } = &command {
        output::print_classification(&config.code_blocks, symbols);
        return Ok(());
    }

    let collector = Collector::new(&config, &cli.root)?;
    let docs = collector.collect_all()?;
    tracing::info!(documents = docs.len(), "collected");

    if let Command::Check = command {
        output::print_collection(&docs, collector.root());
        return Ok(());
    }
    if cli.verbose {
        output::print_collection(&docs, collector.root());
        println!();
    }

    let generator = CommandGenerator::new(collector.root());
    let deployer = CommandDeployer::from_env(&config.publish, collector.root(), |var| {
        std::env::var(var).ok()
    });
    let trigger = TriggerContext::resolve(cli.branch, |var| std::env::var(var).ok());

    let mut orchestrator = Orchestrator::new(&generator, &deployer);
    if cli.verbose {
        orchestrator = orchestrator.with_observer(&output::print_stage_event);
    }
    let run = orchestrator.run(&docs, &config, trigger);
    if cli.verbose {
        println!();
        output::print_run_summary(&run, &config.publish.target_branch);
    }
    run.into_result()?;
    Ok(())
}

/// Send `tracing` output to stderr: warnings by default, debug when verbose.
///
/// Colors only when stderr is a terminal, so CI logs stay plain.
fn init_logging(verbose: bool) -> Result<(), tracing::subscriber::SetGlobalDefaultError> {
    let level = if verbose { Level::DEBUG } else { Level::WARN };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_ansi(std::io::stderr().is_terminal())
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
}
