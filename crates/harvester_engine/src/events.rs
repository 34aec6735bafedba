use std::sync::mpsc;

use crate::RunEvent;

/// Receives run notifications. Emission is fire-and-forget.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: RunEvent);
}

pub struct ChannelEventSink {
    tx: mpsc::Sender<RunEvent>,
}

impl ChannelEventSink {
    pub fn new(tx: mpsc::Sender<RunEvent>) -> Self {
        Self { tx }
    }
}

impl EventSink for ChannelEventSink {
    fn emit(&self, event: RunEvent) {
        // A dropped receiver means nobody is watching; the run still finishes.
        let _ = self.tx.send(event);
    }
}
