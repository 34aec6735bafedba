//! Sequential page-to-files pass.
//!
//! One [`RunController`] drives one run: fetch the page, extract candidates,
//! then download, deduplicate, name and write each candidate in discovery
//! order. Cancellation is checked between candidates, never mid-request.
use std::path::PathBuf;
use std::sync::Arc;

use chrono::NaiveDateTime;
use engine_logging::{engine_debug, engine_error, engine_info, engine_warn};
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::dedup::{content_digest, DedupIndex};
use crate::events::EventSink;
use crate::extract::ImageExtractor;
use crate::fetch::Fetcher;
use crate::filename::build_file_name;
use crate::persist::{ensure_output_dir, AtomicFileWriter};
use crate::resolve::is_http_url;
use crate::{
    ClassificationTarget, FailureKind, FetchError, ImageCandidate, LogLevel, LogLine, PageRequest,
    RunError, RunEvent, RunPhase, RunProgress, RunResult, SkipReason,
};

/// Source of the timestamp embedded in file names.
pub type Clock = Arc<dyn Fn() -> NaiveDateTime + Send + Sync>;

pub struct RunController<'a> {
    fetcher: &'a dyn Fetcher,
    extractor: &'a dyn ImageExtractor,
    sink: &'a dyn EventSink,
    clock: Clock,
    cancel: CancellationToken,
    dedup: DedupIndex,
    progress: RunProgress,
    phase: RunPhase,
    result: RunResult,
}

impl<'a> RunController<'a> {
    pub fn new(
        fetcher: &'a dyn Fetcher,
        extractor: &'a dyn ImageExtractor,
        sink: &'a dyn EventSink,
        clock: Clock,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            fetcher,
            extractor,
            sink,
            clock,
            cancel,
            dedup: DedupIndex::new(),
            progress: RunProgress::default(),
            phase: RunPhase::Idle,
            result: RunResult::empty(),
        }
    }

    pub fn phase(&self) -> RunPhase {
        self.phase
    }

    /// Run to a terminal state and return the tally. Emits exactly one
    /// [`RunEvent::Finished`].
    pub async fn run(mut self, request: &PageRequest, target: &ClassificationTarget) -> RunResult {
        self.enter(RunPhase::Running);
        let phase = match self.execute(request, target).await {
            Ok(phase) => phase,
            Err(err) => {
                self.result.error = Some(err);
                RunPhase::Completed
            }
        };
        self.finish(phase)
    }

    async fn execute(
        &mut self,
        request: &PageRequest,
        target: &ClassificationTarget,
    ) -> Result<RunPhase, RunError> {
        let page_url = self.validate_input(request)?;

        if let Err(err) = ensure_output_dir(&target.directory) {
            self.log(LogLine::error(format!(
                "Cannot use destination folder {}: {err}",
                target.directory.display()
            )));
            return Err(RunError::OutputDir(err.to_string()));
        }

        self.log(LogLine::info(format!("Downloading page: {page_url}")));
        let page = match self.fetcher.fetch_page(&page_url).await {
            Ok(page) => page,
            Err(err) => {
                self.log(LogLine::error(format!("Failed to fetch page: {err}")));
                return Err(RunError::PageFetch(err));
            }
        };
        engine_debug!(
            "Page {} decoded as {} ({} chars)",
            page.final_url,
            page.encoding_label,
            page.html.len()
        );

        let candidates = self.extractor.extract(&page.html, &page.final_url);
        if candidates.is_empty() {
            self.log(LogLine::info("No images found on the page."));
            return Ok(RunPhase::Completed);
        }

        self.progress = RunProgress::new(candidates.len());
        self.result.total_discovered = candidates.len();
        self.log(LogLine::info(format!("Images detected: {}", candidates.len())));

        let writer = AtomicFileWriter::new(target.directory.clone());
        for (index, candidate) in candidates.iter().enumerate() {
            if self.cancel.is_cancelled() {
                self.progress.cancelled = true;
                self.log(LogLine::warn("Operation cancelled by user."));
                return Ok(RunPhase::Cancelled);
            }

            let outcome = self.process_candidate(candidate, target, &writer).await;
            self.record_outcome(candidate, outcome);

            self.progress.processed = index + 1;
            self.sink.emit(RunEvent::Progress(self.progress.percent()));
        }

        Ok(RunPhase::Completed)
    }

    fn validate_input(&mut self, request: &PageRequest) -> Result<Url, RunError> {
        let raw = request.url.trim();
        if raw.is_empty() {
            self.log(LogLine::warn("Empty URL."));
            return Err(RunError::EmptyInput);
        }

        let invalid = |message: String| RunError::InvalidInput {
            url: raw.to_string(),
            message,
        };
        let parsed = match Url::parse(raw) {
            Ok(url) if is_http_url(&url) => Ok(url),
            Ok(url) => Err(invalid(format!("unsupported scheme {}", url.scheme()))),
            Err(err) => Err(invalid(err.to_string())),
        };
        if let Err(RunError::InvalidInput { message, .. }) = &parsed {
            self.log(LogLine::warn(format!("Invalid URL: {message}")));
        }
        parsed
    }

    async fn process_candidate(
        &mut self,
        candidate: &ImageCandidate,
        target: &ClassificationTarget,
        writer: &AtomicFileWriter,
    ) -> Result<PathBuf, SkipReason> {
        let download = self
            .fetcher
            .fetch_image(&candidate.url)
            .await
            .map_err(classify_fetch_error)?;

        let digest = content_digest(&download.bytes);
        if !self.dedup.check_and_record(&digest) {
            return Err(SkipReason::DuplicateContent {
                digest: digest.to_string(),
            });
        }

        let file_name = build_file_name(
            &target.label,
            &digest,
            &download.content_type,
            &download.source_url,
            (self.clock)(),
        );
        writer
            .write(&file_name, &download.bytes)
            .map_err(|err| SkipReason::WriteFailed(err.to_string()))
    }

    fn record_outcome(&mut self, candidate: &ImageCandidate, outcome: Result<PathBuf, SkipReason>) {
        let url = &candidate.url;
        match outcome {
            Ok(path) => {
                self.result.saved_count += 1;
                self.log(LogLine::info(format!("Saved: {}", path.display())));
                self.result.saved_files.push(path);
            }
            Err(SkipReason::NonImageContentType { content_type }) => {
                self.result.non_image_count += 1;
                engine_debug!("{url} declared content type {content_type:?}");
                self.log(LogLine::info(format!("Skipped (not an image): {url}")));
            }
            Err(SkipReason::DuplicateContent { digest }) => {
                self.result.duplicate_count += 1;
                engine_debug!("{url} repeats digest {digest}");
                self.log(LogLine::info(format!("Duplicate (repeated hash): {url}")));
            }
            Err(reason @ (SkipReason::ImageFetch(_) | SkipReason::WriteFailed(_))) => {
                self.result.failed_count += 1;
                self.log(LogLine::warn(format!("Error with {url} -> {reason}")));
            }
        }
    }

    fn enter(&mut self, next: RunPhase) {
        engine_debug!("Run phase {:?} -> {:?}", self.phase, next);
        self.phase = next;
    }

    fn finish(mut self, phase: RunPhase) -> RunResult {
        self.enter(phase);
        self.result.phase = phase;
        engine_info!(
            "Run {:?}: saved={} discovered={} duplicates={} non_image={} failed={}",
            phase,
            self.result.saved_count,
            self.result.total_discovered,
            self.result.duplicate_count,
            self.result.non_image_count,
            self.result.failed_count
        );
        self.sink.emit(RunEvent::Finished(self.result.clone()));
        self.result
    }

    fn log(&self, line: LogLine) {
        match line.level {
            LogLevel::Info => engine_info!("{}", line.message),
            LogLevel::Warn => engine_warn!("{}", line.message),
            LogLevel::Error => engine_error!("{}", line.message),
        }
        self.sink.emit(RunEvent::Log(line));
    }
}

fn classify_fetch_error(err: FetchError) -> SkipReason {
    match err.kind {
        FailureKind::UnsupportedContentType { content_type } => {
            SkipReason::NonImageContentType { content_type }
        }
        _ => SkipReason::ImageFetch(err),
    }
}
