#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User edited the page URL.
    UrlChanged(String),
    /// User picked a class label from the configured list.
    ClassSelected(String),
    /// User asked to harvest the current URL into the selected class.
    StartClicked,
    /// User asked to stop the running harvest.
    CancelClicked,
    /// Human-readable line from the running harvest.
    RunLog(String),
    /// Percentage of discovered images processed.
    RunProgress(u8),
    /// The harvest reached a terminal state.
    RunFinished { saved_count: usize, cancelled: bool },
    /// Render tick to coalesce rendering.
    Tick,
    /// Fallback for placeholder wiring.
    NoOp,
}
