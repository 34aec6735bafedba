use url::Url;

use crate::{AppState, Effect, Msg, SessionState};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::UrlChanged(url) => {
            state.set_url_input(url);
            Vec::new()
        }
        Msg::ClassSelected(label) => {
            if !state.select_class(label.clone()) {
                state.push_log(format!("Unknown class: {label}"));
            }
            Vec::new()
        }
        Msg::StartClicked => start(&mut state),
        Msg::CancelClicked => {
            if state.session() == SessionState::Running && !state.cancel_requested() {
                state.request_cancel();
                vec![Effect::CancelRun]
            } else {
                Vec::new()
            }
        }
        Msg::RunLog(line) => {
            if state.session() == SessionState::Running {
                state.push_log(line);
            }
            Vec::new()
        }
        Msg::RunProgress(percent) => {
            if state.session() == SessionState::Running {
                state.apply_progress(percent);
            }
            Vec::new()
        }
        Msg::RunFinished {
            saved_count,
            cancelled,
        } => {
            if state.session() == SessionState::Running {
                state.finish_run(saved_count, cancelled);
                state.push_log(format!("Total images saved: {saved_count}"));
            }
            Vec::new()
        }
        Msg::Tick | Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

fn start(state: &mut AppState) -> Vec<Effect> {
    if state.session() == SessionState::Running {
        return Vec::new();
    }
    state.reset_run();

    let Some(class_label) = state.class_label().map(str::to_owned) else {
        state.push_log("No class selected.");
        return Vec::new();
    };

    let url = state.url_input().trim().to_owned();
    if url.is_empty() {
        state.push_log("Empty URL.");
        state.finish_run(0, false);
        return Vec::new();
    }
    if let Err(reason) = check_url(&url) {
        state.push_log(format!("Invalid URL: {reason}"));
        state.finish_run(0, false);
        return Vec::new();
    }

    state.push_log(format!("Class selected: {class_label}"));
    state.begin_run();
    vec![Effect::StartRun { url, class_label }]
}

fn check_url(raw: &str) -> Result<(), String> {
    let url = Url::parse(raw).map_err(|err| err.to_string())?;
    match url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(format!("unsupported scheme {other}")),
    }
}
