//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// FormInsight - anonymous forms, collected locally
///
/// Create forms with multiple-choice or free-text questions, share them by
/// link or QR code, collect responses and read the statistics.
///
/// Examples:
///   forminsight create lunch.toml
///   forminsight submit 3f2a -a 1=Pizza -a 2="Earlier please"
///   forminsight stats 3f2a --format json -o stats.json
///   forminsight share 3f2a --svg qr.svg
///   forminsight --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .forminsight.toml in the current directory
    #[arg(short, long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Directory holding the form store
    #[arg(long, value_name = "DIR", env = "FORMINSIGHT_DATA_DIR", global = true)]
    pub data_dir: Option<PathBuf>,

    /// Public origin used in share links
    #[arg(long, value_name = "URL", env = "FORMINSIGHT_BASE_URL", global = true)]
    pub base_url: Option<String>,

    /// Pause before insights are shown, in milliseconds
    #[arg(long, value_name = "MS", global = true)]
    pub delay_ms: Option<u64>,

    /// Enable verbose logging output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Generate a default .forminsight.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// Subcommands. `FORM` accepts a full form id or a unique prefix of one.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Create a form from a TOML or JSON definition file
    Create {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// List all forms
    List,

    /// Show a form as respondents see it
    Show {
        #[arg(value_name = "FORM")]
        form: String,
    },

    /// Submit a response to a form
    Submit {
        #[arg(value_name = "FORM")]
        form: String,

        /// Answer as KEY=VALUE, where KEY is a question id or 1-based number
        #[arg(short, long = "answer", value_name = "KEY=VALUE", value_parser = parse_answer)]
        answers: Vec<(String, String)>,
    },

    /// Close an active form or reopen a closed one
    Toggle {
        #[arg(value_name = "FORM")]
        form: String,
    },

    /// Show response statistics
    Stats {
        #[arg(value_name = "FORM")]
        form: String,

        /// Output format (markdown, json)
        #[arg(long, default_value = "markdown", value_name = "FORMAT")]
        format: OutputFormat,

        /// Write the report to a file instead of stdout
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Generate a written summary of the responses
    Insights {
        #[arg(value_name = "FORM")]
        form: String,
    },

    /// Print the share link and QR code
    Share {
        #[arg(value_name = "FORM")]
        form: String,

        /// Also write the QR code as an SVG image
        #[arg(long, value_name = "FILE")]
        svg: Option<PathBuf>,
    },
}

/// Output format for the stats report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Markdown format (default)
    #[default]
    Markdown,
    /// JSON format
    Json,
}

/// Parse a `KEY=VALUE` answer. The value may be empty or contain `=`.
fn parse_answer(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, _)) if key.trim().is_empty() => {
            Err(format!("Missing question before '=' in '{}'", s))
        }
        Some((key, value)) => Ok((key.trim().to_string(), value.to_string())),
        None => Err(format!("Expected KEY=VALUE, got '{}'", s)),
    }
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        // Skip validation for --init-config
        if self.init_config {
            return Ok(());
        }

        if self.command.is_none() {
            return Err("No command given. Run with --help to see the commands.".to_string());
        }

        // Check for conflicting options
        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if let Some(ref base_url) = self.base_url {
            if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
                return Err("Base URL must start with 'http://' or 'https://'".to_string());
            }
        }

        if let Some(Command::Create { ref file }) = self.command {
            if !file.is_file() {
                return Err(format!("Form definition not found: {}", file.display()));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(argv: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("forminsight").chain(argv.iter().copied())).unwrap()
    }

    #[test]
    fn test_parse_submit_answers() {
        let args = parse(&["submit", "abc", "-a", "1=Pizza", "--answer", "q2=a=b", "-a", "3="]);

        assert_eq!(
            args.command,
            Some(Command::Submit {
                form: "abc".to_string(),
                answers: vec![
                    ("1".to_string(), "Pizza".to_string()),
                    ("q2".to_string(), "a=b".to_string()),
                    ("3".to_string(), String::new()),
                ],
            })
        );
    }

    #[test]
    fn test_parse_answer_errors() {
        assert!(parse_answer("novalue").is_err());
        assert!(parse_answer("=x").is_err());
    }

    #[test]
    fn test_parse_stats_format() {
        let args = parse(&["stats", "abc", "--format", "json"]);
        match args.command {
            Some(Command::Stats { format, output, .. }) => {
                assert_eq!(format, OutputFormat::Json);
                assert!(output.is_none());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let args = parse(&["list", "--verbose", "--data-dir", "/tmp/x"]);
        assert!(args.verbose);
        assert_eq!(args.data_dir, Some(PathBuf::from("/tmp/x")));
    }

    #[test]
    fn test_validation_requires_command() {
        let args = parse(&[]);
        assert!(args.validate().is_err());

        let args = parse(&["--init-config"]);
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_validation_conflicting_options() {
        let args = parse(&["list", "-v", "-q"]);
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_invalid_base_url() {
        let args = parse(&["share", "abc", "--base-url", "forms.example.com"]);
        assert!(args.validate().is_err());
    }
}
