pub mod toml_config;

use crate::config::toml_config::WorkloadFile;
use crate::core::codec::Codec;
use crate::core::runner::{DutyCycle, DEFAULT_CHUNK_SIZE};
use crate::utils::error::Result;
use crate::utils::logger::LogFormat;
use crate::utils::validation::{self, Validate};
use clap::Parser;
use std::path::PathBuf;

pub const DEFAULT_URL: &str = "https://large-tarballs.sophaskins.net/kernel.tar.gz";
pub const DEFAULT_FREQ_MS: u64 = 100;
pub const DEFAULT_DURATION_MS: u64 = 50;

#[derive(Debug, Clone, Parser)]
#[command(name = "fake-process")]
#[command(about = "A fake CPU-bound workload that decompresses a tarball forever")]
pub struct CliConfig {
    /// The url of a large compressed tarball to download
    #[arg(long)]
    pub url: Option<String>,

    /// How often (ms) the task should sleep [default: 100]
    #[arg(long)]
    pub freq: Option<u64>,

    /// How long (ms) each sleep lasts [default: 50]
    #[arg(long)]
    pub duration: Option<u64>,

    /// Compression format of the payload [default: auto]
    #[arg(long, value_enum)]
    pub format: Option<Codec>,

    /// Bytes decompressed per work step [default: 1024]
    #[arg(long)]
    pub chunk_size: Option<usize>,

    /// Optional TOML file with a [workload] table
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Log own CPU and memory usage after every pass
    #[arg(long)]
    pub monitor: bool,

    /// Log output format [default: compact]
    #[arg(long, value_enum)]
    pub log_format: Option<LogFormat>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}

/// 合併命令列、TOML 與預設值後的最終設定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkloadConfig {
    pub url: String,
    pub freq_ms: u64,
    pub duration_ms: u64,
    pub codec: Codec,
    pub chunk_size: usize,
    pub monitor: bool,
    pub verbose: bool,
    pub log_format: LogFormat,
}

impl Default for WorkloadConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_URL.to_string(),
            freq_ms: DEFAULT_FREQ_MS,
            duration_ms: DEFAULT_DURATION_MS,
            codec: Codec::Auto,
            chunk_size: DEFAULT_CHUNK_SIZE,
            monitor: false,
            verbose: false,
            log_format: LogFormat::Compact,
        }
    }
}

impl WorkloadConfig {
    pub fn duty_cycle(&self) -> DutyCycle {
        DutyCycle::from_millis(self.freq_ms, self.duration_ms)
    }
}

impl CliConfig {
    /// 命令列 > TOML 檔 > 預設值
    pub fn resolve(&self) -> Result<WorkloadConfig> {
        let file = match &self.config {
            Some(path) => WorkloadFile::from_file(path)?,
            None => WorkloadFile::default(),
        };
        Ok(self.merge(&file))
    }

    pub fn merge(&self, file: &WorkloadFile) -> WorkloadConfig {
        let defaults = WorkloadConfig::default();
        let workload = file.workload.clone().unwrap_or_default();
        let logging = file.logging.clone().unwrap_or_default();

        WorkloadConfig {
            url: self.url.clone().or(workload.url).unwrap_or(defaults.url),
            freq_ms: self.freq.or(workload.freq_ms).unwrap_or(defaults.freq_ms),
            duration_ms: self
                .duration
                .or(workload.duration_ms)
                .unwrap_or(defaults.duration_ms),
            codec: self.format.or(workload.format).unwrap_or(defaults.codec),
            chunk_size: self
                .chunk_size
                .or(workload.chunk_size)
                .unwrap_or(defaults.chunk_size),
            monitor: self.monitor || file.monitoring_enabled(),
            verbose: self.verbose || logging.verbose.unwrap_or(false),
            log_format: self
                .log_format
                .or(logging.format)
                .unwrap_or(defaults.log_format),
        }
    }
}

impl Validate for WorkloadConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_url("url", &self.url)?;
        validation::validate_positive_number("freq", self.freq_ms, 1)?;
        validation::validate_positive_number("chunk_size", self.chunk_size, 1)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> CliConfig {
        CliConfig::parse_from(std::iter::once("fake-process").chain(args.iter().copied()))
    }

    #[test]
    fn test_defaults_without_flags() {
        let config = parse(&[]).resolve().unwrap();
        assert_eq!(config, WorkloadConfig::default());
        assert_eq!(config.freq_ms, 100);
        assert_eq!(config.duration_ms, 50);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_cli_overrides_file() {
        let file = WorkloadFile::from_toml_str(
            r#"
[workload]
url = "https://example.com/linux.tar.gz"
freq_ms = 250
duration_ms = 10
format = "gzip"
"#,
        )
        .unwrap();

        let config = parse(&["--freq", "500", "--format", "zlib"]).merge(&file);
        assert_eq!(config.url, "https://example.com/linux.tar.gz");
        assert_eq!(config.freq_ms, 500);
        assert_eq!(config.duration_ms, 10);
        assert_eq!(config.codec, Codec::Zlib);
    }

    #[test]
    fn test_xz_format_flag() {
        let config = parse(&["--format", "xz"]).resolve().unwrap();
        assert_eq!(config.codec, Codec::Xz);
    }

    #[test]
    fn test_zero_freq_is_rejected() {
        let config = parse(&["--freq", "0"]).resolve().unwrap();
        assert!(config.validate().is_err());

        let config = parse(&["--duration", "0"]).resolve().unwrap();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_bad_url_is_rejected() {
        let config = parse(&["--url", "file:///tmp/kernel.tar.gz"]).resolve().unwrap();
        assert!(config.validate().is_err());
    }
}
