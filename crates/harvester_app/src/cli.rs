//! Command-line arguments.

use std::path::PathBuf;

use clap::Parser;
use engine_logging::{LogDestination, LogSettings};
use log::LevelFilter;

/// Download every image referenced by a web page into a class folder.
///
/// Images are deduplicated by content within a run and named
/// `{class}_{timestamp}_{hash}.{ext}`.
#[derive(Parser, Debug)]
#[command(name = "harvester")]
#[command(author, version, about)]
pub struct Args {
    /// Page whose images are harvested
    #[arg(short, long)]
    pub url: String,

    /// Class label; must be listed in the catalog unless --dir is given
    #[arg(short, long)]
    pub class: String,

    /// RON file mapping class labels to destination folders
    #[arg(long, default_value = "classes.ron")]
    pub catalog: PathBuf,

    /// Destination folder for this class, bypassing the catalog
    #[arg(short, long)]
    pub dir: Option<PathBuf>,

    /// Write the diagnostic log to this file instead of the terminal
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Per-request timeout in seconds (1-120)
    #[arg(long, default_value_t = 15, value_parser = clap::value_parser!(u64).range(1..=120))]
    pub timeout_secs: u64,

    /// Increase diagnostic verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Args {
    /// Run output is rendered separately, so the terminal logger only shows
    /// warnings unless verbosity is raised.
    pub fn log_settings(&self) -> LogSettings {
        let level = match self.verbose {
            0 if self.log_file.is_some() => LevelFilter::Info,
            0 => LevelFilter::Warn,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        };
        let destination = match &self.log_file {
            Some(path) => LogDestination::File(path.clone()),
            None => LogDestination::Terminal,
        };
        LogSettings { destination, level }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_and_class_are_required() {
        assert!(Args::try_parse_from(["harvester"]).is_err());
        assert!(Args::try_parse_from(["harvester", "--url", "https://ex.com"]).is_err());
    }

    #[test]
    fn defaults_apply() {
        let args =
            Args::try_parse_from(["harvester", "-u", "https://ex.com", "-c", "Fresa"]).unwrap();
        assert_eq!(args.catalog, PathBuf::from("classes.ron"));
        assert_eq!(args.timeout_secs, 15);
        assert!(args.dir.is_none());
        assert_eq!(args.log_settings().level, LevelFilter::Warn);
        assert_eq!(args.log_settings().destination, LogDestination::Terminal);
    }

    #[test]
    fn log_file_and_verbosity_shape_logging() {
        let args = Args::try_parse_from([
            "harvester", "-u", "x", "-c", "Higo", "--log-file", "run.log",
        ])
        .unwrap();
        assert_eq!(
            args.log_settings(),
            LogSettings {
                destination: LogDestination::File(PathBuf::from("run.log")),
                level: LevelFilter::Info,
            }
        );

        let args = Args::try_parse_from(["harvester", "-u", "x", "-c", "Higo", "-vv"]).unwrap();
        assert_eq!(args.log_settings().level, LevelFilter::Trace);
    }

    #[test]
    fn timeout_is_range_checked() {
        let result = Args::try_parse_from([
            "harvester", "-u", "x", "-c", "Nuez", "--timeout-secs", "0",
        ]);
        assert!(result.is_err());
    }
}
