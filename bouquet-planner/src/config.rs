use clap::Parser;
use std::ffi::OsStr;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]

pub struct Cli {
    #[clap(flatten)]
    pub input: Input,

    #[clap(flatten)]
    pub output_config: OutputConfig,
}

#[derive(clap::Args, Debug, Clone)]
pub struct Input {
    /// Bouquet design records, one design per line (e.g. AL10a15b5c30).
    /// Read interactively from stdin if not set.
    #[clap(short = 'D', long, parse(from_os_str), value_name = "FILE")]
    pub designs: Option<PathBuf>,

    /// Flower records, one flower per line (e.g. aL). Read interactively
    /// from stdin if not set.
    #[clap(short = 'F', long, parse(from_os_str), value_name = "FILE")]
    pub flowers: Option<PathBuf>,

    /// Use the built-in sample designs and flowers instead of reading input
    #[clap(long)]
    pub sample: bool,
}

#[derive(clap::Args, Debug, Clone)]
pub struct OutputConfig {
    /// Sets the path for the log file, containing information about each design
    #[clap(long, parse(from_os_str), value_name = "FILE")]
    pub design_log_output: Option<PathBuf>,

    /// Sets the path for the log file, containing the runtime of the allocation phases
    #[clap(long, parse(from_os_str), value_name = "FILE")]
    pub runtime_log_output: Option<PathBuf>,

    /// Sets the path to the stats file, containing summary metrics of the current run
    #[clap(long, parse(from_os_str), value_name = "FILE")]
    pub stats_output: Option<PathBuf>,
}

impl Cli {
    /// Checks that the combination of selected options is currently supported
    /// (where this is not already handled via attributes)
    pub fn check_config(&self) {
        if self.input.sample {
            assert!(
                self.input.designs.is_none() && self.input.flowers.is_none(),
                "--sample cannot be combined with --designs or --flowers"
            );
        }
    }
}

fn check_log_path(path: &PathBuf, extension: &str) {
    // did not supply empty output_path
    let mut copy = path.clone();
    assert!(copy.pop(), "Empty output path was supplied");
    // all parent directories exist
    assert!(
        copy.exists(),
        "A directory on the supplied output path either does not exist or is inaccessible"
    );
    assert_eq!(
        path.extension().and_then(OsStr::to_str),
        Some(extension),
        "output file needs to have \".{}\" extension (no capital letters)",
        extension
    );
}

pub fn check_output_paths(config: &Cli) -> OutputPaths {
    let design_log_output_path = config.output_config.design_log_output.clone();
    if let Some(path) = design_log_output_path.as_ref() {
        check_log_path(path, "csv");
    }

    let runtime_log_output_path = config.output_config.runtime_log_output.clone();
    if let Some(path) = runtime_log_output_path.as_ref() {
        check_log_path(path, "csv");
    }

    let stats_output_path = config.output_config.stats_output.clone();
    if let Some(path) = stats_output_path.as_ref() {
        check_log_path(path, "json");
    }

    OutputPaths {
        design_log_output_path,
        runtime_log_output_path,
        stats_output_path,
    }
}

/// The validated output paths of one run. Logs whose path is `None` are
/// skipped.
pub struct OutputPaths {
    pub design_log_output_path: Option<PathBuf>,
    pub runtime_log_output_path: Option<PathBuf>,
    pub stats_output_path: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_parse_sample_flag() {
        let cli = Cli::parse_from(["bouquet_planner", "--sample"]);
        assert!(cli.input.sample);
        assert!(cli.input.designs.is_none());
        cli.check_config();
    }

    #[test]
    fn test_parse_input_files() {
        let cli = Cli::parse_from([
            "bouquet_planner",
            "-D",
            "designs.txt",
            "-F",
            "flowers.txt",
            "--stats-output",
            "./stats.json",
        ]);
        assert_eq!(cli.input.designs, Some(PathBuf::from("designs.txt")));
        assert_eq!(cli.input.flowers, Some(PathBuf::from("flowers.txt")));
        cli.check_config();
        let output_paths = check_output_paths(&cli);
        assert_eq!(
            output_paths.stats_output_path,
            Some(PathBuf::from("./stats.json"))
        );
    }

    #[test]
    #[should_panic(expected = "--sample cannot be combined")]
    fn test_sample_excludes_input_files() {
        let cli = Cli::parse_from(["bouquet_planner", "--sample", "-D", "designs.txt"]);
        cli.check_config();
    }

    #[test]
    #[should_panic(expected = "extension")]
    fn test_stats_output_must_be_json() {
        let cli = Cli::parse_from(["bouquet_planner", "--sample", "--stats-output", "./stats.csv"]);
        let _ = check_output_paths(&cli);
    }
}
