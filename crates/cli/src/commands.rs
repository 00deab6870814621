//! CLI command definitions for chatlens.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Main CLI application.
#[derive(Parser, Debug)]
#[command(name = "chatlens", author, version, about, long_about = None)]
pub struct Cli {
    /// Logging verbosity
    #[arg(short, long, global = true, default_value_t = 0, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Configuration file path
    #[arg(short, long, global = true, env = "CHATLENS_CONFIG")]
    pub config: Option<PathBuf>,

    /// Directory all artifacts are written to
    #[arg(short, long, global = true, env = "CHATLENS_OUTPUT_DIR")]
    pub output_dir: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the full pipeline: clock, relationship, radar, focus clouds, dictionary
    Run(InputArgs),

    /// Draw the hourly activity clock
    Clock(ReportArgs),

    /// Build and save the relationship matrix
    Relationship(ReportArgs),

    /// Compute attribute scores and draw the radar chart
    Radar(ReportArgs),

    /// Write the tokenizer user dictionary
    Dict(InputArgs),

    /// Draw word clouds
    Wordcloud(WordcloudArgs),

    /// Print the effective configuration
    Config(ConfigArgs),
}

/// Arguments shared by every analysis command.
#[derive(Args, Debug, Clone)]
pub struct InputArgs {
    /// Exported message table (.csv, .tsv, or .json); defaults to `[input] path`
    pub input: Option<PathBuf>,

    /// Number of most active senders to analyze
    #[arg(short = 'n', long, env = "CHATLENS_TOP_N")]
    pub top_n: Option<usize>,

    /// Radar frame shape (circle, polygon)
    #[arg(long)]
    pub frame: Option<String>,
}

/// Analysis command that also reports its result.
#[derive(Args, Debug, Clone)]
pub struct ReportArgs {
    /// Input selection
    #[command(flatten)]
    pub input: InputArgs,

    /// Output format
    #[arg(short, long, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

/// Word cloud arguments.
#[derive(Args, Debug, Clone)]
pub struct WordcloudArgs {
    /// Input selection
    #[command(flatten)]
    pub input: InputArgs,

    /// Also draw clouds from the tokenized message text (slow)
    #[arg(long, default_value_t = false)]
    pub all: bool,

    /// Regenerate the user dictionary before tokenizing
    #[arg(long, default_value_t = false)]
    pub generate_dict: bool,
}

/// Configuration command arguments.
#[derive(Args, Debug, Clone)]
pub struct ConfigArgs {
    /// Also write the effective configuration to this file
    #[arg(long)]
    pub save: Option<PathBuf>,
}

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Plain text
    Text,
    /// JSON format
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "chatlens", "radar", "export.csv", "--top-n", "5", "--frame", "circle", "-f", "json", "-vv",
            "-o", "out",
        ])
        .expect("parse");

        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.output_dir, Some(PathBuf::from("out")));
        match cli.command {
            Commands::Radar(args) => {
                assert_eq!(args.input.input, Some(PathBuf::from("export.csv")));
                assert_eq!(args.input.top_n, Some(5));
                assert_eq!(args.input.frame.as_deref(), Some("circle"));
                assert_eq!(args.format, OutputFormat::Json);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn wordcloud_flags() {
        let cli = Cli::try_parse_from(["chatlens", "wordcloud", "x.json", "--all", "--generate-dict"])
            .expect("parse");
        match cli.command {
            Commands::Wordcloud(args) => {
                assert!(args.all);
                assert!(args.generate_dict);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn input_may_come_from_the_config_file() {
        let cli = Cli::try_parse_from(["chatlens", "clock"]).expect("parse");
        match cli.command {
            Commands::Clock(args) => assert_eq!(args.input.input, None),
            other => panic!("unexpected command {:?}", other),
        }
    }
}
