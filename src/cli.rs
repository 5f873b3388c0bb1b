//! CLI command definitions

use std::path::PathBuf;

use chrono::Month;
use clap::{Parser, Subcommand, ValueEnum};

/// Multi-day trip planner
#[derive(Parser)]
#[command(
    name = "travel-planner",
    about = "Plan a multi-day trip: weather, flights, hotels, attractions and local context",
    version
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, help = "Path to config file")]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands
#[derive(Subcommand)]
pub enum Command {
    /// Plan a trip and print the itinerary
    Plan {
        /// City to travel to
        #[arg(short, long)]
        destination: String,

        /// City to travel from
        #[arg(short, long)]
        origin: String,

        /// Trip length in days (1-30)
        #[arg(short = 'n', long)]
        days: u32,

        /// Travel month, by name ("June", "jun") or number ("6")
        #[arg(short, long, value_parser = parse_month)]
        month: Month,

        /// Use deterministic mock data instead of live providers
        #[arg(long)]
        mock: bool,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Markdown)]
        format: OutputFormat,

        /// Write the plan to a file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

/// Output format for a rendered plan
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Markdown,
    Json,
}

/// Parse a month name, abbreviation or number
pub fn parse_month(value: &str) -> Result<Month, String> {
    let value = value.trim();
    if let Ok(number) = value.parse::<u8>() {
        return Month::try_from(number).map_err(|_| format!("Month must be between 1 and 12, got {number}"));
    }
    value
        .parse::<Month>()
        .map_err(|_| format!("Unknown month '{value}'"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use rstest::rstest;

    #[rstest]
    #[case("June", Month::June)]
    #[case("jun", Month::June)]
    #[case("12", Month::December)]
    #[case(" 3 ", Month::March)]
    fn test_parse_month(#[case] input: &str, #[case] expected: Month) {
        assert_eq!(parse_month(input), Ok(expected));
    }

    #[rstest]
    #[case("0")]
    #[case("13")]
    #[case("Juneteenth")]
    fn test_parse_month_rejects(#[case] input: &str) {
        assert!(parse_month(input).is_err());
    }

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_plan_arguments() {
        let cli = Cli::try_parse_from([
            "travel-planner",
            "plan",
            "--destination",
            "Paris",
            "--origin",
            "New York",
            "--days",
            "7",
            "--month",
            "June",
            "--mock",
            "--format",
            "json",
        ])
        .unwrap();

        let Command::Plan {
            destination,
            days,
            month,
            mock,
            format,
            output,
            ..
        } = cli.command;
        assert_eq!(destination, "Paris");
        assert_eq!(days, 7);
        assert_eq!(month, Month::June);
        assert!(mock);
        assert_eq!(format, OutputFormat::Json);
        assert!(output.is_none());
    }
}
