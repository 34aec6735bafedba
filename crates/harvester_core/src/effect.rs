#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    StartRun { url: String, class_label: String },
    CancelRun,
}
