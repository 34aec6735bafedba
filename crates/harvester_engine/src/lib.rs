//! Harvester engine: page fetch, image extraction, download, dedup and persistence.
mod controller;
mod decode;
mod dedup;
mod engine;
mod events;
mod extract;
mod fetch;
mod filename;
mod persist;
mod resolve;
mod srcset;
mod types;

pub use controller::{Clock, RunController};
pub use decode::{decode_html, DecodedHtml};
pub use dedup::{content_digest, ContentDigest, DedupIndex};
pub use engine::{EngineConfig, EngineHandle, RunHandle};
pub use events::{ChannelEventSink, EventSink};
pub use extract::{ImageExtractor, MarkupImageExtractor};
pub use fetch::{FetchSettings, Fetcher, ReqwestFetcher, DEFAULT_USER_AGENT};
pub use filename::{
    build_file_name, extension_for_content_type, extension_from_url, sanitize_file_name,
    DEFAULT_EXTENSION, TIMESTAMP_FORMAT,
};
pub use persist::{ensure_output_dir, AtomicFileWriter, PersistError};
pub use resolve::{is_http_url, resolve_reference};
pub use srcset::select_best;
pub use types::{
    ClassificationTarget, DownloadOutcome, FailureKind, FetchError, ImageCandidate, LogLevel,
    LogLine, PageRequest, PageResponse, RunError, RunEvent, RunPhase, RunProgress, RunResult,
    SkipReason,
};
