use crate::view_model::AppViewModel;

/// Lifecycle of the current run as seen by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Idle,
    Running,
    Cancelled,
    Completed,
}

impl SessionState {
    pub fn is_terminal(self) -> bool {
        matches!(self, SessionState::Cancelled | SessionState::Completed)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    session: SessionState,
    url_input: String,
    class_label: Option<String>,
    classes: Vec<String>,
    progress: u8,
    log_lines: Vec<String>,
    saved_count: Option<usize>,
    cancel_requested: bool,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    /// State restricted to the given class labels. An empty list accepts any label.
    pub fn with_classes(classes: Vec<String>) -> Self {
        Self {
            classes,
            ..Self::default()
        }
    }

    pub fn view(&self) -> AppViewModel {
        AppViewModel {
            session: self.session,
            url_input: self.url_input.clone(),
            class_label: self.class_label.clone(),
            classes: self.classes.clone(),
            progress: self.progress,
            log_lines: self.log_lines.clone(),
            saved_count: self.saved_count,
            can_start: self.session != SessionState::Running,
            can_cancel: self.session == SessionState::Running && !self.cancel_requested,
            dirty: self.dirty,
        }
    }

    pub fn session(&self) -> SessionState {
        self.session
    }

    /// Returns whether anything changed since the last call, and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn url_input(&self) -> &str {
        &self.url_input
    }

    pub(crate) fn class_label(&self) -> Option<&str> {
        self.class_label.as_deref()
    }

    pub(crate) fn cancel_requested(&self) -> bool {
        self.cancel_requested
    }

    pub(crate) fn set_url_input(&mut self, url: String) {
        self.url_input = url;
        self.dirty = true;
    }

    pub(crate) fn select_class(&mut self, label: String) -> bool {
        if !self.classes.is_empty() && !self.classes.contains(&label) {
            return false;
        }
        self.class_label = Some(label);
        self.dirty = true;
        true
    }

    pub(crate) fn reset_run(&mut self) {
        self.progress = 0;
        self.log_lines.clear();
        self.saved_count = None;
        self.cancel_requested = false;
        self.dirty = true;
    }

    pub(crate) fn begin_run(&mut self) {
        self.session = SessionState::Running;
        self.dirty = true;
    }

    pub(crate) fn finish_run(&mut self, saved_count: usize, cancelled: bool) {
        self.session = if cancelled {
            SessionState::Cancelled
        } else {
            SessionState::Completed
        };
        self.saved_count = Some(saved_count);
        self.dirty = true;
    }

    pub(crate) fn request_cancel(&mut self) {
        self.cancel_requested = true;
        self.dirty = true;
    }

    /// Progress never moves backwards within a run.
    pub(crate) fn apply_progress(&mut self, percent: u8) {
        let percent = percent.min(100);
        if percent > self.progress {
            self.progress = percent;
            self.dirty = true;
        }
    }

    pub(crate) fn push_log(&mut self, line: impl Into<String>) {
        self.log_lines.push(line.into());
        self.dirty = true;
    }
}
