use std::collections::VecDeque;
use std::io;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use anyhow::{bail, Context};
use engine_logging::{engine_info, engine_warn};
use harvester_core::{update, AppState, Msg, SessionState};
use harvester_engine::{EngineConfig, EngineHandle, FetchSettings};

use crate::catalog::ClassCatalog;
use crate::cli::Args;
use crate::effects::EffectRunner;
use crate::render::TerminalRenderer;

const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// Drive one harvesting run to completion and return the number of images saved.
pub fn run(args: Args) -> anyhow::Result<usize> {
    let catalog = load_catalog(&args)?;
    let settings = FetchSettings {
        request_timeout: Duration::from_secs(args.timeout_secs),
        ..FetchSettings::default()
    };
    let engine = EngineHandle::new(EngineConfig {
        fetch: settings,
        ..EngineConfig::default()
    });
    let mut runner = EffectRunner::new(engine, catalog.clone());

    let (msg_tx, msg_rx) = mpsc::channel();
    spawn_interrupt_listener(msg_tx);

    let mut state = AppState::with_classes(catalog.labels());
    let mut renderer = TerminalRenderer::new(io::stdout().lock());
    let mut inbox = VecDeque::from([
        Msg::UrlChanged(args.url),
        Msg::ClassSelected(args.class),
        Msg::StartClicked,
    ]);

    loop {
        while let Some(msg) = inbox.pop_front() {
            let (next, effects) = update(state, msg);
            state = next;
            inbox.extend(runner.apply(effects));
        }
        if state.consume_dirty() {
            renderer.render(&state.view()).context("writing to terminal")?;
        }

        match state.session() {
            SessionState::Idle => bail!("run did not start"),
            SessionState::Cancelled | SessionState::Completed => break,
            SessionState::Running => {}
        }

        inbox.extend(msg_rx.try_iter());
        inbox.extend(runner.poll());
        if inbox.is_empty() {
            thread::sleep(POLL_INTERVAL);
        }
    }

    let view = state.view();
    engine_info!("Session ended in {:?}", view.session);
    Ok(view.saved_count.unwrap_or(0))
}

fn load_catalog(args: &Args) -> anyhow::Result<ClassCatalog> {
    match &args.dir {
        Some(dir) => Ok(ClassCatalog::single(args.class.clone(), dir.clone())),
        None => ClassCatalog::load(&args.catalog),
    }
}

/// Ctrl-C becomes a cancel request; the run then stops before its next image.
fn spawn_interrupt_listener(msg_tx: mpsc::Sender<Msg>) {
    thread::spawn(move || {
        let runtime = match tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                engine_warn!("Ctrl-C handling unavailable: {}", err);
                return;
            }
        };
        runtime.block_on(async {
            while tokio::signal::ctrl_c().await.is_ok() {
                engine_info!("Interrupt received");
                if msg_tx.send(Msg::CancelClicked).is_err() {
                    break;
                }
            }
        });
    });
}
