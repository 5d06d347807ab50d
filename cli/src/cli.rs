//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};
use hrefkit_core::Charset;

/// Inspect, normalize, resolve and compare URLs.
#[derive(Parser, Debug)]
#[command(name = "hrefkit")]
#[command(author, version, about)]
pub struct Cli {
    /// Configuration file (JSON); the per-user file is used when present
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Base URL for relative references, overriding the configuration
    #[arg(short, long, global = true, value_name = "URL")]
    pub base: Option<String>,

    /// Percent-encoding charset (unicode or iso8859)
    #[arg(long, global = true, value_name = "CHARSET")]
    pub charset: Option<Charset>,

    /// Print URLs as written instead of normalizing them
    #[arg(long, global = true)]
    pub raw: bool,

    /// Keep identical values of a repeated query parameter
    #[arg(long, global = true)]
    pub keep_duplicates: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the components of a URL as JSON
    Inspect {
        url: String,

        /// Single-line JSON
        #[arg(long)]
        compact: bool,
    },

    /// Print the normalized form of a URL
    Normalize { url: String },

    /// Resolve a reference against the base URL
    Resolve { reference: String },

    /// Express a URL relative to the base URL
    Relative { url: String },

    /// Compare two URLs; exit status 1 when they differ
    Equals { one: String, two: String },

    /// Print a URL for humans: no credentials, decoded path and query
    Readable { url: String },

    /// Rewrite every URL found in text (argument, or stdin when absent)
    Rewrite { text: Option<String> },

    /// Add or remove query parameters
    Query {
        #[command(subcommand)]
        command: QueryCommand,
    },
}

#[derive(Subcommand, Debug)]
pub enum QueryCommand {
    /// Add parameters given as `name=value` (a bare `name` has no value)
    Add {
        url: String,
        #[arg(required = true)]
        params: Vec<String>,
    },

    /// Remove parameters by name
    Remove {
        url: String,
        #[arg(required = true)]
        names: Vec<String>,
    },
}

impl Cli {
    /// Default log filter; `RUST_LOG` takes precedence
    pub fn log_level(&self) -> &'static str {
        if self.quiet {
            return "error";
        }
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_subcommand_parses() {
        let cli = Cli::try_parse_from(["hrefkit", "normalize", "HTTP://a.com/"]).unwrap();
        assert!(matches!(cli.command, Command::Normalize { ref url } if url == "HTTP://a.com/"));
        assert_eq!(cli.verbose, 0);
        assert!(!cli.quiet);
        assert!(!cli.raw);
    }

    #[test]
    fn test_cli_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "hrefkit",
            "resolve",
            "../x",
            "--base",
            "http://a.com/b/c",
            "--charset",
            "iso8859",
        ])
        .unwrap();
        assert_eq!(cli.base.as_deref(), Some("http://a.com/b/c"));
        assert_eq!(cli.charset, Some(Charset::Iso8859));
    }

    #[test]
    fn test_cli_verbose_flag_increments_count() {
        let cli = Cli::try_parse_from(["hrefkit", "-vv", "readable", "x"]).unwrap();
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.log_level(), "debug");

        let cli = Cli::try_parse_from(["hrefkit", "-q", "-v", "readable", "x"]).unwrap();
        assert_eq!(cli.log_level(), "error");

        let cli = Cli::try_parse_from(["hrefkit", "readable", "x"]).unwrap();
        assert_eq!(cli.log_level(), "warn");
    }

    #[test]
    fn test_cli_query_subcommands() {
        let cli =
            Cli::try_parse_from(["hrefkit", "query", "add", "http://a.com/", "a=1", "b"]).unwrap();
        match cli.command {
            Command::Query {
                command: QueryCommand::Add { url, params },
            } => {
                assert_eq!(url, "http://a.com/");
                assert_eq!(params, ["a=1", "b"]);
            }
            other => panic!("unexpected command {:?}", other),
        }

        let result = Cli::try_parse_from(["hrefkit", "query", "remove", "http://a.com/"]);
        assert_eq!(
            result.unwrap_err().kind(),
            clap::error::ErrorKind::MissingRequiredArgument
        );
    }

    #[test]
    fn test_cli_invalid_charset_rejected() {
        let result = Cli::try_parse_from(["hrefkit", "--charset", "ebcdic", "normalize", "x"]);
        assert_eq!(result.unwrap_err().kind(), clap::error::ErrorKind::ValueValidation);
    }

    #[test]
    fn test_cli_missing_subcommand() {
        let result = Cli::try_parse_from(["hrefkit"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_help_flag_shows_usage() {
        let err = Cli::try_parse_from(["hrefkit", "--help"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }
}
