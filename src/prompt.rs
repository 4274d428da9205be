//! Interactive password entry.
//!
//! On a terminal the password is read in raw mode so nothing is echoed.
//! When stdin is redirected the first line is read as-is, which keeps the
//! tool scriptable (`echo "$PW" | hn_saved_stories alice`).

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal;
use secrecy::SecretString;
use std::io::{self, BufRead, IsTerminal, Write};

/// Disables raw mode when dropped, whichever way the prompt exits.
struct RawMode;

impl RawMode {
    fn enable() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawMode {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Entry {
    Continue,
    Done,
    Cancelled,
}

fn apply_key(buf: &mut String, key: KeyEvent) -> Entry {
    if key.kind != KeyEventKind::Press {
        return Entry::Continue;
    }
    match key.code {
        KeyCode::Enter => Entry::Done,
        KeyCode::Esc => Entry::Cancelled,
        KeyCode::Char('c' | 'd') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            Entry::Cancelled
        }
        KeyCode::Backspace => {
            buf.pop();
            Entry::Continue
        }
        KeyCode::Char(c) => {
            buf.push(c);
            Entry::Continue
        }
        _ => Entry::Continue,
    }
}

fn read_hidden_line() -> io::Result<String> {
    let _raw = RawMode::enable()?;
    let mut buf = String::new();
    loop {
        if let Event::Key(key) = event::read()? {
            match apply_key(&mut buf, key) {
                Entry::Continue => {}
                Entry::Done => return Ok(buf),
                Entry::Cancelled => {
                    return Err(io::Error::new(
                        io::ErrorKind::Interrupted,
                        "password entry cancelled",
                    ));
                }
            }
        }
    }
}

/// Print `prompt` to stderr and read a password without echoing it.
pub fn prompt_password(prompt: &str) -> io::Result<SecretString> {
    let mut stderr = io::stderr();
    write!(stderr, "{prompt}")?;
    stderr.flush()?;

    let stdin = io::stdin();
    if !stdin.is_terminal() {
        let mut line = String::new();
        stdin.lock().read_line(&mut line)?;
        return Ok(SecretString::from(line.trim_end_matches(['\r', '\n']).to_string()));
    }

    let password = read_hidden_line();
    writeln!(stderr)?;
    password.map(SecretString::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_typing_and_backspace() {
        let mut buf = String::new();
        for code in [
            KeyCode::Char('h'),
            KeyCode::Char('u'),
            KeyCode::Backspace,
            KeyCode::Char('n'),
            KeyCode::Left,
        ] {
            assert_eq!(apply_key(&mut buf, key(code)), Entry::Continue);
        }
        assert_eq!(apply_key(&mut buf, key(KeyCode::Enter)), Entry::Done);
        assert_eq!(buf, "hn");
    }

    #[test]
    fn test_backspace_on_empty() {
        let mut buf = String::new();
        assert_eq!(apply_key(&mut buf, key(KeyCode::Backspace)), Entry::Continue);
        assert!(buf.is_empty());
    }

    #[test]
    fn test_ctrl_c_cancels() {
        let mut buf = String::from("secret");
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(apply_key(&mut buf, ctrl_c), Entry::Cancelled);
    }

    #[test]
    fn test_key_release_is_ignored() {
        let mut buf = String::new();
        let release = KeyEvent::new_with_kind(
            KeyCode::Char('x'),
            KeyModifiers::NONE,
            KeyEventKind::Release,
        );
        assert_eq!(apply_key(&mut buf, release), Entry::Continue);
        assert!(buf.is_empty());
    }
}
