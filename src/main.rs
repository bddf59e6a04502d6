//! ParleyLab - Main entry point
//!
//! Parses the CLI, draws the session condition, and brackets the TUI run
//! with terminal setup and cleanup.

use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::stdout;
use std::path::Path;
use tracing::{debug, error, info};

use parleylab::app::App;
use parleylab::cli::{Cli, Commands};
use parleylab::condition::Condition;
use parleylab::config::{DelayProfileKind, StudyConfig};
use parleylab::error;
use parleylab::results::ResultsStore;

/// Initialize tracing with RUST_LOG override, defaulting to info
fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();
    info!("ParleyLab starting up");

    let cli = Cli::parse_args();
    debug!("CLI arguments parsed");

    match cli.command {
        Some(Commands::Validate { config }) => {
            info!("Validating configuration file: {:?}", config);
            match StudyConfig::load_from_file(&config) {
                Ok(config) => match config.validate() {
                    Ok(_) => {
                        info!("Configuration validation successful");
                        println!("✓ Configuration file is valid: {:?}", config);
                    }
                    Err(e) => {
                        error!("Configuration validation failed: {}", e);
                        eprintln!("✗ Configuration validation failed: {:#}", e);
                        std::process::exit(1);
                    }
                },
                Err(e) => {
                    error!("Failed to load configuration file: {}", e);
                    eprintln!("✗ Failed to load configuration file: {:#}", e);
                    std::process::exit(1);
                }
            }
        }
        Some(Commands::Summary { results }) => {
            let path = results
                .unwrap_or_else(|| StudyConfig::default().results_path);
            print_summary(&path)?;
        }
        Some(Commands::Run {
            config,
            results,
            quick,
            seed,
            tempo,
            batna,
        }) => {
            let mut study = match config {
                Some(path) => StudyConfig::load_from_file(&path)?,
                None => StudyConfig::default(),
            };
            if let Some(results_path) = results {
                study.results_path = results_path;
            }
            if quick {
                study.delays = DelayProfileKind::Accelerated;
            }
            if tempo.is_some() {
                study.tempo = tempo;
            }
            if batna.is_some() {
                study.batna = batna;
            }
            study.validate()?;

            let condition = Condition::draw(seed, study.tempo, study.batna);
            run_session(study, condition)?;
        }
        None => {
            info!("No command specified, running a study session with defaults");
            let study = StudyConfig::default();
            let condition = Condition::draw(None, None, None);
            run_session(study, condition)?;
        }
    }

    Ok(())
}

/// Run one interactive session in the TUI
fn run_session(config: StudyConfig, condition: Condition) -> Result<(), Box<dyn std::error::Error>> {
    debug!("Initializing terminal for TUI mode");

    enable_raw_mode()
        .map_err(|e| error::general_error(format!("Failed to enable raw mode: {}", e)))?;
    crossterm::execute!(stdout(), crossterm::terminal::EnterAlternateScreen)
        .map_err(|e| error::general_error(format!("Failed to enter alternate screen: {}", e)))?;

    let backend = CrosstermBackend::new(stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| error::general_error(format!("Failed to create terminal: {}", e)))?;

    let mut app = App::new(config, condition);
    let result = app.run(&mut terminal);

    // Cleanup terminal (always attempt cleanup, even if the app failed)
    let _ = disable_raw_mode();
    let _ = crossterm::execute!(stdout(), crossterm::terminal::LeaveAlternateScreen);

    result
}

/// Print per-condition aggregates from the results file
fn print_summary(path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    if !path.exists() {
        println!("No results file at {}", path.display());
        return Ok(());
    }

    let store = ResultsStore::new(path);
    let summaries = store.summarize()?;

    if summaries.is_empty() {
        println!("No sessions recorded in {}", path.display());
        return Ok(());
    }

    println!(
        "{:<24} {:>8} {:>18} {:>18}",
        "condition", "sessions", "mean satisfaction", "mean response (ms)"
    );
    for summary in summaries {
        let response = summary
            .mean_response_ms
            .map(|ms| format!("{:.0}", ms))
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:<24} {:>8} {:>18.2} {:>18}",
            summary.condition.to_string(),
            summary.sessions,
            summary.mean_satisfaction,
            response
        );
    }

    Ok(())
}
