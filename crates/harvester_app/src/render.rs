use std::io::{self, Write};

use harvester_core::{AppViewModel, SessionState};

/// Prints new log lines and progress changes as a plain line stream.
pub struct TerminalRenderer<W: Write> {
    out: W,
    printed_lines: usize,
    last_progress: Option<u8>,
}

impl<W: Write> TerminalRenderer<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            printed_lines: 0,
            last_progress: None,
        }
    }

    pub fn render(&mut self, view: &AppViewModel) -> io::Result<()> {
        // A new run clears the log.
        if view.log_lines.len() < self.printed_lines {
            self.printed_lines = 0;
            self.last_progress = None;
        }
        for line in &view.log_lines[self.printed_lines..] {
            writeln!(self.out, "{line}")?;
        }
        self.printed_lines = view.log_lines.len();

        if view.session == SessionState::Running && self.last_progress != Some(view.progress) {
            if view.progress > 0 {
                writeln!(self.out, "[{:>3}%]", view.progress)?;
            }
            self.last_progress = Some(view.progress);
        }
        self.out.flush()
    }

    #[cfg(test)]
    fn into_inner(self) -> W {
        self.out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view(session: SessionState, progress: u8, lines: &[&str]) -> AppViewModel {
        AppViewModel {
            session,
            progress,
            log_lines: lines.iter().map(|s| s.to_string()).collect(),
            ..AppViewModel::default()
        }
    }

    #[test]
    fn prints_only_new_lines_and_changed_progress() {
        let mut renderer = TerminalRenderer::new(Vec::new());
        renderer
            .render(&view(SessionState::Running, 0, &["Class selected: Fresa"]))
            .unwrap();
        renderer
            .render(&view(
                SessionState::Running,
                50,
                &["Class selected: Fresa", "Saved: a.png"],
            ))
            .unwrap();
        renderer
            .render(&view(
                SessionState::Running,
                50,
                &["Class selected: Fresa", "Saved: a.png"],
            ))
            .unwrap();
        renderer
            .render(&view(
                SessionState::Completed,
                100,
                &["Class selected: Fresa", "Saved: a.png", "Total images saved: 1"],
            ))
            .unwrap();

        let out = String::from_utf8(renderer.into_inner()).unwrap();
        assert_eq!(
            out,
            "Class selected: Fresa\nSaved: a.png\n[ 50%]\nTotal images saved: 1\n"
        );
    }

    #[test]
    fn restarts_after_log_reset() {
        let mut renderer = TerminalRenderer::new(Vec::new());
        renderer
            .render(&view(SessionState::Completed, 0, &["Empty URL.", "x"]))
            .unwrap();
        renderer
            .render(&view(SessionState::Running, 0, &["Class selected: Higo"]))
            .unwrap();
        let out = String::from_utf8(renderer.into_inner()).unwrap();
        assert_eq!(out, "Empty URL.\nx\nClass selected: Higo\n");
    }
}
