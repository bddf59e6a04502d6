use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::condition::{BatnaStrength, ReplyTempo};

/// ParleyLab - A guided negotiation study in the terminal
#[derive(Parser)]
#[command(name = "parleylab")]
#[command(about = "Runs a scripted price negotiation with a simulated client and records the results")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run an interactive study session
    Run {
        /// Path to a study configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Where to append the results row (overrides the configuration)
        #[arg(short, long)]
        results: Option<PathBuf>,

        /// Shorten the scripted reply delays for piloting
        #[arg(long)]
        quick: bool,

        /// Seed for the condition draw (random when omitted)
        #[arg(long)]
        seed: Option<u64>,

        /// Pin the reply tempo instead of drawing it (immediate, deliberate, counteroffer)
        #[arg(long)]
        tempo: Option<ReplyTempo>,

        /// Pin the alternative-offer strength instead of drawing it (strong, weak)
        #[arg(long)]
        batna: Option<BatnaStrength>,
    },
    /// Validate a study configuration file
    Validate {
        /// Path to configuration file to validate
        config: PathBuf,
    },
    /// Summarize collected results per condition
    Summary {
        /// Path to the results file to read
        #[arg(short, long)]
        results: Option<PathBuf>,
    },
}

impl Cli {
    pub fn parse_args() -> Self {
        <Self as clap::Parser>::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_cli_no_args() {
        // Running with no args should succeed (defaults to a study session)
        let result = Cli::try_parse_from(["parleylab"]);
        assert!(result.is_ok());
        let cli = result.unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_cli_run_with_overrides() {
        let result = Cli::try_parse_from([
            "parleylab",
            "run",
            "--config",
            "/path/to/study.json",
            "--quick",
            "--seed",
            "42",
            "--tempo",
            "counteroffer",
            "--batna",
            "weak",
        ]);
        assert!(result.is_ok());
        let cli = result.unwrap();
        match cli.command {
            Some(Commands::Run {
                config,
                quick,
                seed,
                tempo,
                batna,
                ..
            }) => {
                assert_eq!(config.unwrap().to_str().unwrap(), "/path/to/study.json");
                assert!(quick);
                assert_eq!(seed, Some(42));
                assert_eq!(tempo, Some(ReplyTempo::CounterOffer));
                assert_eq!(batna, Some(BatnaStrength::Weak));
            }
            _ => panic!("Expected Run command"),
        }
    }

    #[test]
    fn test_cli_validate_command() {
        let result = Cli::try_parse_from(["parleylab", "validate", "/path/to/study.json"]);
        assert!(result.is_ok());
        let cli = result.unwrap();
        match cli.command {
            Some(Commands::Validate { config }) => {
                assert_eq!(config.to_str().unwrap(), "/path/to/study.json");
            }
            _ => panic!("Expected Validate command"),
        }
    }

    #[test]
    fn test_cli_summary_command() {
        let result = Cli::try_parse_from(["parleylab", "summary", "--results", "out.csv"]);
        assert!(result.is_ok());
        let cli = result.unwrap();
        match cli.command {
            Some(Commands::Summary { results }) => {
                assert_eq!(results.unwrap().to_str().unwrap(), "out.csv");
            }
            _ => panic!("Expected Summary command"),
        }
    }

    #[test]
    fn test_cli_rejects_unknown_tempo() {
        let result = Cli::try_parse_from(["parleylab", "run", "--tempo", "sluggish"]);
        assert!(result.is_err());
    }
}
