use crate::render;
use anyhow::{bail, Context, Error};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal;
use defuzz::session::{Action, Interrupted, ReviewIo, WaitOutcome};
use defuzz::{CatalogEntry, Forms};
use std::io::Write;
use std::path::Path;
use std::process::Command;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Used when neither `--editor` nor `$EDITOR` is set.
pub const FALLBACK_EDITOR: &str = "nano";

/// Reviews entries on the controlling terminal. Keys are read one at a time in
/// raw mode, the text itself is edited in an external editor.
pub struct Terminal {
    editor: String,
    interrupt: Arc<AtomicBool>,
}

impl Terminal {
    pub fn new(editor: String, interrupt: Arc<AtomicBool>) -> Self {
        Terminal { editor, interrupt }
    }

    fn interrupted(&self) -> Interrupted {
        self.interrupt.store(true, Ordering::SeqCst);
        render::info("\nEditing interrupted. Exiting...");
        Interrupted
    }

    fn check(&self) -> Result<(), Interrupted> {
        if self.interrupt.load(Ordering::SeqCst) {
            return Err(self.interrupted());
        }
        Ok(())
    }

    /// The next key press, or `None` once `timeout` has elapsed.
    fn key(&self, timeout: Option<Duration>) -> Result<Option<KeyEvent>, Interrupted> {
        self.check()?;
        let key = next_key(timeout).map_err(|err| {
            tracing::error!("cannot read from the terminal: {err}");
            self.interrupted()
        })?;
        println!();
        match key {
            Some(key) if is_interrupt(&key) => Err(self.interrupted()),
            key => Ok(key),
        }
    }
}

impl ReviewIo for Terminal {
    fn present(&mut self, path: &Path, entry: &CatalogEntry, proposed: &Forms) {
        render::present(path, entry, proposed);
    }

    fn choose_action(&mut self) -> Result<Action, Interrupted> {
        loop {
            render::prompt("\nChoose an action - [E]dit, [W]rite, or [S]kip: ");
            let Some(key) = self.key(None)? else {
                continue;
            };
            if let Some(action) = action_for(&key) {
                return Ok(action);
            }
        }
    }

    fn edit(&mut self, label: &str, current: &str) -> Result<String, Interrupted> {
        self.check()?;
        render::rule();
        println!("{label}:");
        let text = match edit_externally(&self.editor, current) {
            Ok(text) => text,
            Err(err) => {
                tracing::warn!("{err:#}");
                current.to_owned()
            }
        };
        println!("{text}");
        render::rule();
        self.check()?;
        Ok(text)
    }

    fn edited(&mut self, before: &Forms, after: &Forms) {
        render::edited(before, after);
    }

    fn confirm(&mut self, delay: Duration) -> Result<WaitOutcome, Interrupted> {
        render::prompt(&format!(
            "\nSaving in {}s... (Press ENTER to interrupt)",
            delay.as_secs()
        ));
        let deadline = Instant::now() + delay;
        loop {
            let left = deadline.saturating_duration_since(Instant::now());
            match self.key(Some(left))? {
                None => {
                    render::info("Timeout reached. Continuing...");
                    return Ok(WaitOutcome::Elapsed);
                }
                Some(key) if key.code == KeyCode::Enter => return Ok(WaitOutcome::Cancelled),
                Some(_) => {}
            }
        }
    }
}

/// Puts the terminal in raw mode for as long as it lives.
struct RawMode;

impl RawMode {
    fn enable() -> std::io::Result<Self> {
        terminal::enable_raw_mode()?;
        Ok(RawMode)
    }
}

impl Drop for RawMode {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}

fn next_key(timeout: Option<Duration>) -> std::io::Result<Option<KeyEvent>> {
    let _raw = RawMode::enable()?;
    let deadline = timeout.map(|timeout| Instant::now() + timeout);
    loop {
        if let Some(deadline) = deadline {
            let left = deadline.saturating_duration_since(Instant::now());
            if left.is_zero() || !event::poll(left)? {
                return Ok(None);
            }
        }
        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press {
                return Ok(Some(key));
            }
        }
    }
}

/// Raw mode turns Ctrl-C into a plain key press.
fn is_interrupt(key: &KeyEvent) -> bool {
    key.modifiers.contains(KeyModifiers::CONTROL)
        && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('C'))
}

/// Greek keyboard layouts put `ε`, `ς` and `σ` on the `e`, `w` and `s` keys.
fn action_for(key: &KeyEvent) -> Option<Action> {
    let KeyCode::Char(c) = key.code else {
        return None;
    };
    match c.to_lowercase().next()? {
        'e' | 'ε' => Some(Action::Edit),
        'w' | 'ς' => Some(Action::Write),
        's' | 'σ' => Some(Action::Skip),
        _ => None,
    }
}

/// Open `text` in `editor` and return what was saved.
fn edit_externally(editor: &str, text: &str) -> Result<String, Error> {
    let mut words = editor.split_whitespace();
    let program = words.next().unwrap_or(FALLBACK_EDITOR);

    let mut file = tempfile::Builder::new()
        .prefix("msgstr")
        .suffix(".txt")
        .tempfile()
        .context("cannot create a file to edit")?;
    file.write_all(text.as_bytes())?;
    file.flush()?;

    let status = Command::new(program)
        .args(words)
        .arg(file.path())
        .status()
        .with_context(|| format!("cannot run the editor `{editor}`"))?;
    if !status.success() {
        bail!("the editor `{editor}` exited with {status}");
    }
    let edited = std::fs::read_to_string(file.path())
        .with_context(|| format!("cannot read back {}", file.path().display()))?;
    Ok(strip_final_newline(edited))
}

/// Editors end the file with a line break that was not part of the text.
fn strip_final_newline(mut text: String) -> String {
    if text.ends_with('\n') {
        text.pop();
        if text.ends_with('\r') {
            text.pop();
        }
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE)
    }

    #[test]
    fn actions() {
        assert_eq!(action_for(&key('e')), Some(Action::Edit));
        assert_eq!(action_for(&key('W')), Some(Action::Write));
        assert_eq!(action_for(&key('σ')), Some(Action::Skip));
        assert_eq!(action_for(&key('Σ')), Some(Action::Skip));
        assert_eq!(action_for(&key('ς')), Some(Action::Write));
        assert_eq!(action_for(&key('ε')), Some(Action::Edit));
        assert_eq!(action_for(&key('x')), None);
        assert_eq!(
            action_for(&KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE)),
            None
        );
    }

    #[test]
    fn ctrl_c() {
        assert!(is_interrupt(&KeyEvent::new(
            KeyCode::Char('c'),
            KeyModifiers::CONTROL
        )));
        assert!(!is_interrupt(&key('c')));
    }

    #[test]
    fn final_newline() {
        assert_eq!(strip_final_newline("Έξοδος\n".into()), "Έξοδος");
        assert_eq!(strip_final_newline("a\r\n".into()), "a");
        assert_eq!(strip_final_newline("a\n\n".into()), "a\n");
        assert_eq!(strip_final_newline("a".into()), "a");
    }

    #[cfg(unix)]
    #[test]
    fn editor_output_is_read_back() {
        // `true` leaves the file as it was
        assert_eq!(edit_externally("true", "κείμενο").unwrap(), "κείμενο");
        assert!(edit_externally("false", "κείμενο").is_err());
    }
}
