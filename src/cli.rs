//! Command-line interface definitions.

use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::{Date, Time};

const DATE_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");
const TIME_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[hour]:[minute]:[second]");
const SHORT_TIME_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[hour]:[minute]");

/// File documents into a dated, tagged archive.
#[derive(Debug, Parser)]
#[command(name = "docket", version, about)]
pub struct Cli {
    /// Configuration file to layer over the user configuration (TOML, YAML or JSON).
    #[arg(short, long, global = true, env = "DOCKET_CONFIG")]
    pub config: Option<PathBuf>,
    /// More logging; repeat for trace output.
    #[arg(short, long, global = true, action = ArgAction::Count, conflicts_with = "quiet")]
    pub verbose: u8,
    /// Less logging; repeat to only show errors.
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub quiet: u8,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Move a file into the archive and print where it went.
    Archive(ArchiveArgs),
    /// List the tags already used for a file type's group.
    Tags {
        /// File type name (e.g. `jpeg`) or extension (e.g. `jpg`).
        file_type: String,
    },
    /// Show how files would be classified.
    Classify {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
}

#[derive(Debug, Args)]
pub struct ArchiveArgs {
    pub file: PathBuf,
    /// Archive date (YYYY-MM-DD); defaults to today.
    #[arg(long, value_parser = parse_date)]
    pub date: Option<Date>,
    /// Time of day (HH:MM[:SS]) to put in the name; defaults to now for file
    /// types that use the time.
    #[arg(long, value_parser = parse_time, conflicts_with = "no_time")]
    pub time: Option<Time>,
    /// Leave the time of day out of the name.
    #[arg(long)]
    pub no_time: bool,
    #[arg(short, long, default_value = "")]
    pub description: String,
    /// Tag to attach; repeat for more.
    #[arg(short, long = "tag")]
    pub tags: Vec<String>,
}

impl Cli {
    /// Default filter directive derived from `-v`/`-q`.
    pub fn log_level(&self) -> &'static str {
        match (self.verbose, self.quiet) {
            (0, 0) => "info",
            (1, _) => "debug",
            (_, 0) => "trace",
            (_, 1) => "warn",
            _ => "error",
        }
    }
}

fn parse_date(value: &str) -> Result<Date, String> {
    Date::parse(value, DATE_FORMAT).map_err(|e| format!("expected YYYY-MM-DD: {e}"))
}

fn parse_time(value: &str) -> Result<Time, String> {
    Time::parse(value, TIME_FORMAT)
        .or_else(|_| Time::parse(value, SHORT_TIME_FORMAT))
        .map_err(|e| format!("expected HH:MM[:SS]: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use rstest::rstest;
    use time::macros::{date, time};

    #[test]
    fn test_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_archive_args() {
        let cli = Cli::parse_from([
            "docket", "archive", "scan.pdf", "--date", "2021-07-01", "--time", "09:30", "-d", "Tax return", "-t", "tax",
            "--tag", "2021",
        ]);
        let Command::Archive(args) = cli.command else { panic!("expected archive") };
        assert_eq!(args.file, PathBuf::from("scan.pdf"));
        assert_eq!(args.date, Some(date!(2021 - 07 - 01)));
        assert_eq!(args.time, Some(time!(09:30:00)));
        assert_eq!(args.description, "Tax return");
        assert_eq!(args.tags, ["tax", "2021"]);
    }

    #[test]
    fn test_time_conflicts_with_no_time() {
        assert!(Cli::try_parse_from(["docket", "archive", "a.jpg", "--time", "10:00:00", "--no-time"]).is_err());
    }

    #[rstest]
    #[case("2021-7-1")]
    #[case("01.07.2021")]
    #[case("2021-02-30")]
    fn test_invalid_date(#[case] date: &str) {
        assert!(Cli::try_parse_from(["docket", "archive", "a.txt", "--date", date]).is_err());
    }

    #[rstest]
    #[case(&["docket", "tags", "jpg"], "info")]
    #[case(&["docket", "-v", "tags", "jpg"], "debug")]
    #[case(&["docket", "tags", "jpg", "-vv"], "trace")]
    #[case(&["docket", "-q", "tags", "jpg"], "warn")]
    #[case(&["docket", "-qq", "tags", "jpg"], "error")]
    fn test_log_level(#[case] args: &[&str], #[case] expected: &str) {
        assert_eq!(Cli::parse_from(args).log_level(), expected);
    }
}
