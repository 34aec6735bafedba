use std::fmt;
use std::path::PathBuf;

use bytes::Bytes;
use url::Url;

/// Immutable input to a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub url: String,
}

impl PageRequest {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

/// Class label and the directory its images are written to. Supplied by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassificationTarget {
    pub label: String,
    pub directory: PathBuf,
}

impl ClassificationTarget {
    pub fn new(label: impl Into<String>, directory: impl Into<PathBuf>) -> Self {
        Self {
            label: label.into(),
            directory: directory.into(),
        }
    }
}

/// An absolute http(s) image URL found in page markup.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ImageCandidate {
    pub url: Url,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageResponse {
    pub final_url: Url,
    pub html: String,
    pub content_type: Option<String>,
    pub encoding_label: String,
}

/// A downloaded image payload, consumed by deduplication and naming.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadOutcome {
    pub source_url: Url,
    pub bytes: Bytes,
    /// Lower-cased `Content-Type` header; empty when the server sent none.
    pub content_type: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    Idle,
    Running,
    Cancelled,
    Completed,
}

impl RunPhase {
    pub fn is_terminal(self) -> bool {
        matches!(self, RunPhase::Cancelled | RunPhase::Completed)
    }
}

/// Progress of the candidate loop. `total` is fixed once extraction completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunProgress {
    pub processed: usize,
    pub total: usize,
    pub cancelled: bool,
}

impl RunProgress {
    pub fn new(total: usize) -> Self {
        Self {
            processed: 0,
            total,
            cancelled: false,
        }
    }

    /// Integer percentage of processed candidates, 0..=100.
    pub fn percent(&self) -> u8 {
        if self.total == 0 {
            return 0;
        }
        let pct = self.processed.min(self.total) * 100 / self.total;
        pct as u8
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Warn,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogLine {
    pub level: LogLevel,
    pub message: String,
}

impl LogLine {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: LogLevel::Info,
            message: message.into(),
        }
    }

    pub fn warn(message: impl Into<String>) -> Self {
        Self {
            level: LogLevel::Warn,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: LogLevel::Error,
            message: message.into(),
        }
    }
}

impl fmt::Display for LogLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// One-way notifications from a run to its observer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunEvent {
    Log(LogLine),
    /// Percentage of discovered candidates processed so far.
    Progress(u8),
    /// Emitted exactly once, when the run reaches a terminal state.
    Finished(RunResult),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunResult {
    pub phase: RunPhase,
    pub saved_count: usize,
    pub total_discovered: usize,
    pub duplicate_count: usize,
    pub non_image_count: usize,
    pub failed_count: usize,
    pub saved_files: Vec<PathBuf>,
    /// Set when the run ended early without processing candidates.
    pub error: Option<RunError>,
}

impl RunResult {
    pub(crate) fn empty() -> Self {
        Self {
            phase: RunPhase::Idle,
            saved_count: 0,
            total_discovered: 0,
            duplicate_count: 0,
            non_image_count: 0,
            failed_count: 0,
            saved_files: Vec::new(),
            error: None,
        }
    }

    pub fn was_cancelled(&self) -> bool {
        self.phase == RunPhase::Cancelled
    }
}

/// Conditions that end a run before any candidate is processed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RunError {
    #[error("empty url")]
    EmptyInput,
    #[error("invalid url {url}: {message}")]
    InvalidInput { url: String, message: String },
    #[error("output directory unavailable: {0}")]
    OutputDir(String),
    #[error("failed to fetch page: {0}")]
    PageFetch(FetchError),
    #[error("run could not start: {0}")]
    Startup(String),
}

/// Why a single candidate was not saved. The run continues after each of these.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SkipReason {
    #[error("{0}")]
    ImageFetch(FetchError),
    #[error("not an image ({content_type})")]
    NonImageContentType { content_type: String },
    #[error("duplicate content {digest}")]
    DuplicateContent { digest: String },
    #[error("write failed: {0}")]
    WriteFailed(String),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct FetchError {
    pub kind: FailureKind,
    pub message: String,
}

impl FetchError {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    RedirectLimitExceeded,
    TooLarge { max_bytes: u64, actual: Option<u64> },
    UnsupportedContentType { content_type: String },
    Network,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::RedirectLimitExceeded => write!(f, "redirect limit exceeded"),
            FailureKind::TooLarge { max_bytes, actual } => {
                write!(f, "response too large (max {max_bytes}, actual {actual:?})")
            }
            FailureKind::UnsupportedContentType { content_type } => {
                write!(f, "unsupported content type {content_type}")
            }
            FailureKind::Network => write!(f, "network error"),
        }
    }
}
