//! CLI application entry point.

use crate::commands::{Cli, Commands, ConfigArgs, InputArgs, OutputFormat, ReportArgs, WordcloudArgs};
use crate::error::{CliError, Result};
use chatlens_analysis::Analyzer;
use chatlens_core::config::LogLevel;
use chatlens_core::{ChatlensConfig, FrameShape};
use clap::Parser;
use serde::Serialize;
use std::io::Write;
use std::path::PathBuf;
use tracing::info;

/// Main CLI application.
#[derive(Debug)]
pub struct App {
    /// Effective configuration after file, environment, and flag overrides.
    pub config: ChatlensConfig,
    /// Parsed CLI arguments.
    pub cli: Cli,
}

#[derive(Debug, Serialize)]
struct ClockReport {
    peak_hour: Option<usize>,
    top_hours: Vec<(usize, usize)>,
    counts: Vec<usize>,
}

impl App {
    /// Create a new application instance from command line arguments.
    pub fn new() -> Result<Self> {
        Self::from_cli(Cli::parse())
    }

    /// Create an application from already parsed arguments.
    pub fn from_cli(cli: Cli) -> Result<Self> {
        let config = Self::load_config(&cli)?;
        Ok(Self { config, cli })
    }

    /// Load configuration from file, then apply global flag overrides.
    fn load_config(cli: &Cli) -> Result<ChatlensConfig> {
        let mut config = match &cli.config {
            Some(path) if path.exists() => ChatlensConfig::load(path)?,
            Some(path) => {
                return Err(CliError::Config(format!(
                    "Configuration file not found: {}",
                    path.display()
                )))
            }
            None => match ChatlensConfig::default_path() {
                Ok(path) if path.exists() => ChatlensConfig::load(&path)?,
                _ => ChatlensConfig::default(),
            },
        };

        if let Some(dir) = &cli.output_dir {
            config.output.dir = dir.clone();
        }
        Ok(config)
    }

    /// Run the application.
    pub fn run(self) -> Result<()> {
        self.setup_logging();

        match &self.cli.command {
            Commands::Run(args) => self.handle_run(args),
            Commands::Clock(args) => self.handle_clock(args),
            Commands::Relationship(args) => self.handle_relationship(args),
            Commands::Radar(args) => self.handle_radar(args),
            Commands::Dict(args) => self.handle_dict(args),
            Commands::Wordcloud(args) => self.handle_wordcloud(args),
            Commands::Config(args) => self.handle_config(args),
        }
    }

    /// Set up logging based on verbosity level.
    fn setup_logging(&self) {
        let level = match self.cli.verbose {
            0 => match self.config.logging.level {
                LogLevel::Error => log::LevelFilter::Error,
                LogLevel::Warn => log::LevelFilter::Warn,
                LogLevel::Info => log::LevelFilter::Info,
                LogLevel::Debug => log::LevelFilter::Debug,
                LogLevel::Trace => log::LevelFilter::Trace,
            },
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        };

        env_logger::Builder::new()
            .filter_level(level)
            .format_module_path(false)
            .format_target(false)
            .format_timestamp(None)
            .try_init()
            .ok(); // Ignore errors if logger already initialized
    }

    /// Configuration with the per-command overrides applied.
    fn effective_config(&self, args: &InputArgs) -> Result<ChatlensConfig> {
        let mut config = self.config.clone();
        if let Some(top_n) = args.top_n {
            config.analysis.top_n = top_n;
        }
        if let Some(frame) = &args.frame {
            config.render.frame = frame.parse::<FrameShape>()?;
        }
        config.validate()?;
        Ok(config)
    }

    /// Input table from the command line, falling back to `[input] path`.
    fn input_path(&self, args: &InputArgs) -> Result<PathBuf> {
        args.input
            .clone()
            .or_else(|| self.config.input.path.clone())
            .ok_or_else(|| {
                CliError::Argument(
                    "no input table given; pass a path or set [input] path in the configuration"
                        .to_string(),
                )
            })
    }

    fn loaded_analyzer(&self, args: &InputArgs) -> Result<Analyzer> {
        let input = self.input_path(args)?;
        let mut analyzer = Analyzer::new(self.effective_config(args)?)?;
        analyzer.load(&input)?;
        Ok(analyzer)
    }

    fn handle_run(&self, args: &InputArgs) -> Result<()> {
        let input = self.input_path(args)?;
        let mut analyzer = Analyzer::new(self.effective_config(args)?)?;
        let summary = analyzer.run_all(&input)?;

        println!("Analyzed {} messages", summary.messages);
        if let Some(hour) = summary.peak_hour {
            println!("Most messages are sent at {} o'clock", hour);
        }
        for artifact in &summary.artifacts {
            println!("  wrote {}", artifact.display());
        }
        Ok(())
    }

    fn handle_clock(&self, args: &ReportArgs) -> Result<()> {
        let analyzer = self.loaded_analyzer(&args.input)?;
        let activity = analyzer.clock_heat()?;
        let report = ClockReport {
            peak_hour: activity.peak_hour(),
            top_hours: activity.top_hours(5),
            counts: activity.counts().to_vec(),
        };

        match args.format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
            OutputFormat::Text => {
                println!("Top hours by message count:");
                for (hour, count) in &report.top_hours {
                    println!("  {:02}:00  {}", hour, count);
                }
                if let Some(hour) = report.peak_hour {
                    println!("Most messages are sent at {} o'clock", hour);
                }
            }
        }
        Ok(())
    }

    fn handle_relationship(&self, args: &ReportArgs) -> Result<()> {
        let mut analyzer = self.loaded_analyzer(&args.input)?;
        let matrix = analyzer.relationship()?;

        match args.format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(matrix)?),
            OutputFormat::Text => {
                let stdout = std::io::stdout();
                matrix.write_csv(stdout.lock())?;
            }
        }
        let path = self.config.output_path(&self.config.output.relationship_file);
        info!("relationship matrix saved to {}", path.display());
        Ok(())
    }

    fn handle_radar(&self, args: &ReportArgs) -> Result<()> {
        let mut analyzer = self.loaded_analyzer(&args.input)?;
        analyzer.relationship()?;
        let scores = analyzer.radar()?;

        match args.format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&scores)?),
            OutputFormat::Text => {
                let mut out = std::io::stdout().lock();
                for (sender, values) in scores.iter() {
                    write!(out, "{}:", sender)?;
                    for (label, value) in scores.labels().iter().zip(values) {
                        write!(out, " {}={:.3}", label, value)?;
                    }
                    writeln!(out)?;
                }
            }
        }
        Ok(())
    }

    fn handle_dict(&self, args: &InputArgs) -> Result<()> {
        let mut analyzer = self.loaded_analyzer(args)?;
        analyzer.relationship()?;
        let path = analyzer.generate_dict()?;
        println!("User dictionary written to {}", path.display());
        Ok(())
    }

    fn handle_wordcloud(&self, args: &WordcloudArgs) -> Result<()> {
        let mut analyzer = self.loaded_analyzer(&args.input)?;
        analyzer.relationship()?;
        if args.generate_dict {
            analyzer.generate_dict()?;
        }

        let mut written = analyzer.wordcloud_focus()?;
        if args.all {
            written.extend(analyzer.wordcloud_all()?);
        }
        println!("Wrote {} word clouds", written.len());
        for path in &written {
            println!("  {}", path.display());
        }
        Ok(())
    }

    fn handle_config(&self, args: &ConfigArgs) -> Result<()> {
        self.config.validate()?;
        print!("{}", self.config.to_toml()?);
        if let Some(path) = &args.save {
            self.config.save(path)?;
            info!("configuration saved to {}", path.display());
        }
        Ok(())
    }
}

/// Parse arguments and run the application.
pub fn run() -> Result<()> {
    App::new()?.run()
}
