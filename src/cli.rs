//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use crate::analysis::{SortColumn, SortOrder};
use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// SalaryDash - ML and data science salaries in your terminal
///
/// Fetches salary records from the salary API, aggregates them per year
/// and renders summary cards, the salary trend, the yearly table and
/// per-year job title breakdowns.
///
/// Examples:
///   salarydash
///   salarydash --sort avg-salary --order desc
///   salarydash year 2023 --page 2
///   salarydash years 2022 2023 2024
///   salarydash chat "Which job title pays best?"
///   salarydash init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Base URL of the salary API
    ///
    /// Records are read from this URL, per-year records from URL/YEAR and
    /// chat messages are posted to URL/chat.
    #[arg(long, value_name = "URL", env = "SALARY_API_URL", global = true)]
    pub api_url: Option<String>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .salarydash.toml in the current directory
    #[arg(short, long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Output format (markdown, text, json)
    #[arg(short, long, value_name = "FORMAT", global = true)]
    pub format: Option<OutputFormat>,

    /// Column to sort the yearly table by
    #[arg(long, value_name = "COLUMN", global = true)]
    pub sort: Option<SortColumn>,

    /// Sort direction of the yearly table
    #[arg(long, value_name = "ORDER", global = true)]
    pub order: Option<SortOrder>,

    /// Job titles per drill-down page
    #[arg(long, value_name = "ROWS", global = true)]
    pub page_size: Option<usize>,

    /// Write the dashboard to a file instead of stdout
    #[arg(short, long, value_name = "FILE", global = true)]
    pub output: Option<PathBuf>,

    /// Request timeout in seconds
    #[arg(long, value_name = "SECS", global = true)]
    pub timeout: Option<u64>,

    /// Parallel requests when drilling into several years
    #[arg(long, value_name = "NUM", global = true)]
    pub concurrency: Option<usize>,

    /// Enable verbose logging output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Run in quiet mode (errors only, no spinner)
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Show the dashboard (default)
    Summary,

    /// Show the dashboard with the job titles of one year
    Year {
        /// Work year to drill into
        year: i32,

        /// Drill-down page to show (1-based)
        #[arg(long, default_value = "1")]
        page: usize,
    },

    /// Request several years concurrently; the last one listed is shown
    Years {
        #[arg(required = true, num_args = 1..)]
        years: Vec<i32>,
    },

    /// Ask the assistant a question about the data
    Chat {
        #[arg(required = true, num_args = 1..)]
        message: Vec<String>,
    },

    /// Generate a default .salarydash.toml configuration file
    InitConfig,
}

/// Output format for the dashboard.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Markdown format (default)
    #[default]
    Markdown,
    /// Plain text for terminals
    Text,
    /// JSON format
    Json,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// The subcommand to run, `summary` when none was given.
    pub fn command(&self) -> Command {
        self.command.clone().unwrap_or(Command::Summary)
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        if let Some(ref url) = self.api_url {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err("API URL must start with 'http://' or 'https://'".to_string());
            }
        }

        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if self.timeout == Some(0) {
            return Err("Timeout must be at least 1 second".to_string());
        }

        if self.concurrency == Some(0) {
            return Err("Concurrency must be at least 1".to_string());
        }

        if self.page_size == Some(0) {
            return Err("Page size must be at least 1".to_string());
        }

        if let Some(Command::Year { page: 0, .. }) = self.command {
            return Err("Page numbers start at 1".to_string());
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_args() -> Args {
        Args {
            command: None,
            api_url: Some("http://localhost:8000/api/salaries".to_string()),
            config: None,
            format: None,
            sort: None,
            order: None,
            page_size: None,
            output: None,
            timeout: None,
            concurrency: None,
            verbose: false,
            quiet: false,
        }
    }

    #[test]
    fn test_default_command_is_summary() {
        let args = make_args();
        assert_eq!(args.command(), Command::Summary);
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_parse_year_subcommand() {
        let args = Args::try_parse_from([
            "salarydash",
            "year",
            "2023",
            "--page",
            "2",
            "--sort",
            "avg-salary",
        ])
        .unwrap();

        assert_eq!(args.command(), Command::Year { year: 2023, page: 2 });
        assert_eq!(args.sort, Some(SortColumn::AvgSalary));
    }

    #[test]
    fn test_parse_chat_joins_words() {
        let args = Args::try_parse_from(["salarydash", "chat", "best", "year?"]).unwrap();
        match args.command() {
            Command::Chat { message } => assert_eq!(message.join(" "), "best year?"),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_years_requires_at_least_one() {
        assert!(Args::try_parse_from(["salarydash", "years"]).is_err());
    }

    #[test]
    fn test_validation_invalid_url() {
        let mut args = make_args();
        args.api_url = Some("localhost:8000".to_string());
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_conflicting_options() {
        let mut args = make_args();
        args.verbose = true;
        args.quiet = true;
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_zero_values() {
        let mut args = make_args();
        args.page_size = Some(0);
        assert!(args.validate().is_err());

        let mut args = make_args();
        args.command = Some(Command::Year { year: 2023, page: 0 });
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_log_level() {
        let mut args = make_args();
        assert_eq!(args.log_level(), tracing::Level::INFO);

        args.verbose = true;
        assert_eq!(args.log_level(), tracing::Level::DEBUG);

        args.verbose = false;
        args.quiet = true;
        assert_eq!(args.log_level(), tracing::Level::ERROR);
    }
}
