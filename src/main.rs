use anyhow::Result;
use clap::{Parser, Subcommand};
use physcalc::calculator::{
    AngleMode, CONSTANTS, Calculator, EvalContext, copy_to_clipboard, evaluate_expression,
    format_with_precision,
};
use physcalc::config::Settings;
use physcalc::ui::TerminalShell;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "physcalc", version, about = "A scientific and physics calculator")]
struct Cli {
    /// Settings file (defaults to the user config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Interpret angles in radians instead of degrees
    #[arg(long, global = true)]
    radians: bool,

    /// Significant digits for results
    #[arg(long, global = true)]
    precision: Option<usize>,

    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate a single expression and print the result
    Eval {
        /// The expression, e.g. "m_e*c**2/eV"
        expression: String,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,

        /// Copy the result to the clipboard
        #[arg(long)]
        copy: bool,
    },
    /// List the built-in physical constants
    Constants,
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(io::stderr)
        .init();
}

fn settings_for(cli: &Cli) -> Settings {
    let mut settings = Settings::load(cli.config.as_deref());
    if cli.radians {
        settings.angle_mode = AngleMode::Radians;
    }
    if let Some(precision) = cli.precision {
        settings.precision = precision;
    }
    settings.normalized()
}

fn run_eval(settings: &Settings, expression: &str, json: bool, copy: bool) -> Result<ExitCode> {
    let ctx = EvalContext::new(settings.angle_mode);
    let result = evaluate_expression(expression, &ctx, settings.precision);

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!("{}", result.display());
    }

    if copy && result.is_success() {
        copy_to_clipboard(result.display())?;
    }

    Ok(if result.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn list_constants(settings: &Settings) {
    for constant in CONSTANTS.iter() {
        println!(
            "{:<6} {:<18} {}",
            constant.name,
            format_with_precision(constant.value, settings.precision),
            constant.description
        );
    }
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let settings = settings_for(&cli);
    tracing::debug!(?settings, "starting physcalc");

    match &cli.command {
        Some(Commands::Eval {
            expression,
            json,
            copy,
        }) => run_eval(&settings, expression, *json, *copy),
        Some(Commands::Constants) => {
            list_constants(&settings);
            Ok(ExitCode::SUCCESS)
        }
        None => {
            let calculator = Calculator::new()
                .with_angle_mode(settings.angle_mode)
                .with_precision(settings.precision);
            let stdin = io::stdin();
            let mut shell =
                TerminalShell::new(calculator, settings.prompt.clone(), stdin.lock(), io::stdout());
            shell.run()?;
            Ok(ExitCode::SUCCESS)
        }
    }
}
