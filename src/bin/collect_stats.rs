use clap::Parser;
use fake_process::stats::collector::{self, CsvStatsWriter, StatsCollector, DEFAULT_PREFIX, DEFAULT_PROC_ROOT};
use fake_process::utils::logger::{self, LogFormat};
use fake_process::utils::validation::{self, Validate};
use fake_process::{FakeProcessError, Result};
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(name = "collect-stats")]
#[command(about = "Collect scheduler stats from /proc for running fake processes")]
struct Args {
    /// CSV file to write
    #[arg(long)]
    output: PathBuf,

    /// Seconds between the two samples of each row
    #[arg(long, default_value = "1")]
    interval: u64,

    /// Process name prefix to observe
    #[arg(long, default_value = DEFAULT_PREFIX)]
    prefix: String,

    /// Root of the proc filesystem
    #[arg(long, default_value = DEFAULT_PROC_ROOT)]
    proc_root: PathBuf,

    /// Stop after this many intervals instead of running forever
    #[arg(long)]
    samples: Option<u64>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

impl Validate for Args {
    fn validate(&self) -> Result<()> {
        validation::validate_positive_number("interval", self.interval, 1)?;
        validation::validate_non_empty_string("prefix", &self.prefix)?;
        Ok(())
    }
}

fn main() {
    let args = Args::parse();

    // 初始化日誌
    logger::init_cli_logger(args.verbose, LogFormat::Compact);

    if let Err(e) = run(&args) {
        tracing::error!(
            "❌ collect-stats failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(e.exit_code());
    }
}

fn run(args: &Args) -> Result<()> {
    args.validate()?;

    let processes = collector::discover(&args.prefix);
    for process in &processes {
        tracing::info!("👀 Watching {} (pid {})", process.label, process.pid);
    }

    let collector = StatsCollector::new(&args.proc_root, processes).map_err(|_| {
        FakeProcessError::StatsError {
            message: format!("no running process name starts with '{}'", args.prefix),
        }
    })?;

    let file = File::create(&args.output)?;
    let mut writer = CsvStatsWriter::new(BufWriter::new(file))?;

    tracing::info!(
        "📁 Writing stats every {}s to {}",
        args.interval,
        args.output.display()
    );

    collector::run(
        &collector,
        &mut writer,
        Duration::from_secs(args.interval),
        args.samples,
    )
}
