use engine_logging::{engine_info, engine_warn};
use harvester_core::{Effect, Msg};
use harvester_engine::{EngineHandle, PageRequest, RunEvent, RunHandle, RunPhase};

use crate::catalog::ClassCatalog;

/// Executes effects requested by `update` and turns run events back into messages.
pub struct EffectRunner {
    engine: EngineHandle,
    catalog: ClassCatalog,
    run: Option<RunHandle>,
}

impl EffectRunner {
    pub fn new(engine: EngineHandle, catalog: ClassCatalog) -> Self {
        Self {
            engine,
            catalog,
            run: None,
        }
    }

    /// Returns messages for effects that resolve immediately.
    pub fn apply(&mut self, effects: Vec<Effect>) -> Vec<Msg> {
        let mut msgs = Vec::new();
        for effect in effects {
            match effect {
                Effect::StartRun { url, class_label } => {
                    let Some(target) = self.catalog.target(&class_label) else {
                        engine_warn!("StartRun for unknown class {}", class_label);
                        msgs.push(Msg::RunLog(format!("Unknown class: {class_label}")));
                        msgs.push(Msg::RunFinished {
                            saved_count: 0,
                            cancelled: false,
                        });
                        continue;
                    };
                    engine_info!("StartRun url={} class={}", url, class_label);
                    self.run = Some(self.engine.start(PageRequest::new(url), target));
                }
                Effect::CancelRun => match &self.run {
                    Some(run) if run.cancel() => engine_info!("Cancellation requested"),
                    _ => engine_info!("CancelRun ignored; no active run"),
                },
            }
        }
        msgs
    }

    /// Drain pending run events without blocking.
    pub fn poll(&mut self) -> Vec<Msg> {
        let Some(run) = &self.run else {
            return Vec::new();
        };
        let mut msgs = Vec::new();
        let mut finished = false;
        while let Some(event) = run.try_recv() {
            finished |= matches!(event, RunEvent::Finished(_));
            msgs.push(map_event(event));
        }
        if finished {
            self.run = None;
        }
        msgs
    }
}

fn map_event(event: RunEvent) -> Msg {
    match event {
        RunEvent::Log(line) => Msg::RunLog(line.to_string()),
        RunEvent::Progress(percent) => Msg::RunProgress(percent),
        RunEvent::Finished(result) => Msg::RunFinished {
            saved_count: result.saved_count,
            cancelled: result.phase == RunPhase::Cancelled,
        },
    }
}
