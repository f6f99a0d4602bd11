use clap::Parser;
use fake_process::utils::{logger, monitor::SystemMonitor, validation::Validate};
use fake_process::{CliConfig, DutyCycleRunner, FakeProcessError, SourceLoader, WorkloadConfig};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = CliConfig::parse();

    let config = match cli.resolve() {
        Ok(config) => config,
        Err(e) => {
            // 日誌尚未初始化
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 建議: {}", e.recovery_suggestion());
            std::process::exit(e.exit_code());
        }
    };

    // 初始化日誌
    logger::init_cli_logger(config.verbose, config.log_format);

    tracing::info!("Starting fake-process");
    tracing::debug!("Workload config: {:?}", config);

    if let Err(e) = run(config).await {
        tracing::error!(
            "❌ fake-process failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(e.exit_code());
    }
}

async fn run(config: WorkloadConfig) -> Result<(), FakeProcessError> {
    // 驗證配置
    config.validate()?;

    let payload = SourceLoader::new().fetch(&config.url).await?;

    let mut runner = DutyCycleRunner::new(
        payload,
        config.codec,
        config.duty_cycle(),
        config.chunk_size,
    )?;

    tracing::info!(
        "🔥 Decompressing {} payload forever (freq: {}ms, sleep: {}ms, chunk: {} bytes)",
        runner.codec().name(),
        config.freq_ms,
        config.duration_ms,
        config.chunk_size
    );

    let mut monitor = SystemMonitor::new(config.monitor);
    if monitor.is_enabled() {
        tracing::info!("🔍 System monitoring enabled");
    }

    let never = runner.run(|report| {
        tracing::debug!(
            "Pass {} complete: {} bytes in {} chunks, {} sleeps ({:.1}% idle), took {:?}",
            report.pass,
            report.bytes_decompressed,
            report.chunks,
            report.sleeps,
            report.sleep_fraction() * 100.0,
            report.elapsed
        );
        monitor.log_stats(&format!("Pass {}", report.pass));
    })?;
    match never {}
}
