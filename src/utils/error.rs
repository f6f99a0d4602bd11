use thiserror::Error;

#[derive(Error, Debug)]
pub enum FakeProcessError {
    #[error("Failed to fetch payload from {url}: {source}")]
    FetchError {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Cannot open decompression stream: {message}")]
    StreamInitError { message: String },

    #[error("Decompression failed during pass {pass}: {source}")]
    DecodeError {
        pass: u64,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Stats collection error: {message}")]
    StatsError { message: String },
}

/// 錯誤嚴重程度，決定程式的退出碼
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    /// 外部因素，稍後重試可能成功
    Medium,
    /// 使用者輸入錯誤
    High,
    /// 資料或系統錯誤
    Critical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Decode,
    Configuration,
    System,
}

impl FakeProcessError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::FetchError { .. } => ErrorCategory::Network,
            Self::StreamInitError { .. } | Self::DecodeError { .. } => ErrorCategory::Decode,
            Self::ConfigError { .. } | Self::InvalidConfigValueError { .. } => {
                ErrorCategory::Configuration
            }
            Self::IoError(_) | Self::CsvError(_) | Self::StatsError { .. } => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Decode | ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    /// 根據嚴重程度決定退出碼
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::FetchError { url, .. } => format!("無法下載工作負載: {}", url),
            Self::StreamInitError { message } => format!("下載的內容不是有效的壓縮資料: {}", message),
            Self::DecodeError { pass, .. } => format!("第 {} 輪解壓縮時資料損毀", pass),
            Self::ConfigError { message } => format!("配置錯誤: {}", message),
            Self::InvalidConfigValueError { field, reason, .. } => {
                format!("參數 {} 無效: {}", field, reason)
            }
            Self::StatsError { message } => format!("統計收集失敗: {}", message),
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            Self::FetchError { .. } => "Check that the URL is reachable and returns a 2xx response",
            Self::StreamInitError { .. } => {
                "Point --url at a gzip, zlib or xz payload, or set --format explicitly"
            }
            Self::DecodeError { .. } => "The payload is corrupt or truncated; re-upload it",
            Self::ConfigError { .. } | Self::InvalidConfigValueError { .. } => {
                "Run with --help to see the accepted values"
            }
            Self::IoError(_) | Self::CsvError(_) => "Check file permissions and free disk space",
            Self::StatsError { .. } => "Make sure the target processes are running on a Linux host",
        }
    }
}

pub type Result<T> = std::result::Result<T, FakeProcessError>;
