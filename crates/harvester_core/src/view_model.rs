use crate::SessionState;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub session: SessionState,
    pub url_input: String,
    pub class_label: Option<String>,
    pub classes: Vec<String>,
    pub progress: u8,
    pub log_lines: Vec<String>,
    /// Set once a run has finished.
    pub saved_count: Option<usize>,
    pub can_start: bool,
    pub can_cancel: bool,
    pub dirty: bool,
}
