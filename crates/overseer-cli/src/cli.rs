use std::path::PathBuf;

use clap::{Parser, Subcommand};
use overseer_core::JobSpec;

#[derive(Parser, Debug)]
#[command(name = "overseer", version, about = "Launch and supervise external jobs")]
pub struct Args {
    /// JSON config file for the supervisor
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Executable to launch for every job (overrides the config file)
    #[arg(short, long, global = true)]
    pub program: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Do not launch anything; every job completes with exit code 0
    #[arg(long, global = true)]
    pub dry_run: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start jobs given on the command line and wait for all of them
    Run {
        /// Job as `name` or `name:arg1,arg2,...`; repeatable
        #[arg(short, long = "job", value_parser = parse_job, required = true)]
        jobs: Vec<JobSpec>,
    },

    /// Start jobs from a JSON file of `{"jobName": ..., "arguments": [...]}`
    /// objects and wait for all of them
    Batch {
        /// Path to the JSON array
        file: PathBuf,
    },
}

/// `name` or `name:arg1,arg2`. Names must be non-empty.
pub fn parse_job(raw: &str) -> Result<JobSpec, String> {
    let (name, args) = match raw.split_once(':') {
        Some((name, args)) => (name, Some(args)),
        None => (raw, None),
    };

    let name = name.trim();
    if name.is_empty() {
        return Err("job name must not be empty".to_string());
    }

    let spec = JobSpec::new(name);
    Ok(match args {
        Some(args) if !args.is_empty() => spec.with_args(args.split(',')),
        _ => spec,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_name_only() {
        assert_eq!(parse_job("backup").unwrap(), JobSpec::new("backup"));
        assert_eq!(parse_job("backup:").unwrap(), JobSpec::new("backup"));
    }

    #[test]
    fn parses_arguments_in_order() {
        let spec = parse_job("my-task-42:b,a,c").unwrap();
        assert_eq!(spec.name, "my-task-42");
        assert_eq!(spec.arguments, vec!["b", "a", "c"]);
    }

    #[test]
    fn rejects_empty_name() {
        assert!(parse_job("").is_err());
        assert!(parse_job(":x").is_err());
    }
}
