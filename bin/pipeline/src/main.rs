use std::path::PathBuf;

use clap::{error::ErrorKind, Parser};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use foundation_pipeline::{Pipeline, PipelineConfig, PipelineError, PipelineSettings};

/// Exit status for bad arguments or an unreadable settings file.
const EXIT_INVALID_ARGUMENTS: i32 = -1;
const EXIT_SPAWN_FAILED: i32 = -2;
const EXIT_WORKER_FAILED: i32 = -3;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Number of slots in the job queue
    #[arg(value_parser = positive_count)]
    queue_size: usize,

    /// Jobs each producer generates
    #[arg(value_parser = positive_count)]
    jobs_per_producer: usize,

    /// Number of producer threads
    #[arg(value_parser = positive_count)]
    producers: usize,

    /// Number of consumer threads
    #[arg(value_parser = positive_count)]
    consumers: usize,

    /// TOML file with `seed` and `[timing]` settings
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Length of one simulated second, in milliseconds
    #[arg(long)]
    time_unit_ms: Option<u64>,

    /// Time units a worker waits on the queue before retiring
    #[arg(long)]
    idle_timeout: Option<u32>,

    /// Seed for job durations and production pacing
    #[arg(long)]
    seed: Option<u64>,

    #[arg(long, default_value = "info")]
    log_level: Level,
}

fn positive_count(value: &str) -> Result<usize, String> {
    match value.parse::<usize>() {
        Ok(0) => Err(format!("{value} is not a positive integer")),
        Ok(count) => Ok(count),
        Err(_) => Err(format!("{value} is not a positive integer")),
    }
}

impl Args {
    fn pipeline_config(&self) -> Result<PipelineConfig, String> {
        let mut config = PipelineConfig::new(self.queue_size)
            .jobs_per_producer(self.jobs_per_producer)
            .producers(self.producers)
            .consumers(self.consumers);

        if let Some(path) = &self.config {
            let settings = PipelineSettings::from_path(path)
                .map_err(|err| format!("failed to load {}: {err}", path.display()))?;
            config = settings.apply(config);
        }

        let mut timing = config.get_timing();
        if let Some(millis) = self.time_unit_ms {
            timing = timing.unit_millis(millis);
        }
        if let Some(units) = self.idle_timeout {
            timing = timing.idle_timeout_units(units);
        }
        config = config.timing(timing);

        if let Some(seed) = self.seed {
            config = config.seed(seed);
        }

        Ok(config)
    }
}

fn exit_status(err: &PipelineError) -> i32 {
    match err {
        PipelineError::InvalidConfig(_) => EXIT_INVALID_ARGUMENTS,
        PipelineError::Spawn(_) => EXIT_SPAWN_FAILED,
        PipelineError::WorkerPanicked(..)
        | PipelineError::QueueUnderflow(_)
        | PipelineError::Queue(_) => EXIT_WORKER_FAILED,
    }
}

fn run() -> i32 {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(err) => {
            let _ = err.print();
            return match err.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
                _ => EXIT_INVALID_ARGUMENTS,
            };
        }
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(args.log_level)
        .with_thread_names(true)
        .finish();
    if tracing::subscriber::set_global_default(subscriber).is_err() {
        eprintln!("tracing subscriber was already set");
    }

    let config = match args.pipeline_config() {
        Ok(config) => config,
        Err(message) => {
            tracing::error!("{message}");
            return EXIT_INVALID_ARGUMENTS;
        }
    };

    let report = match Pipeline::new(config).and_then(Pipeline::run) {
        Ok(report) => report,
        Err(err) => {
            tracing::error!(error = %err, "pipeline failed");
            return exit_status(&err);
        }
    };

    println!("{}", report.to_string_pretty());
    0
}

fn main() {
    std::process::exit(run());
}
