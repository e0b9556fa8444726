//! Hidden password input on the terminal.

use std::{
    error::Error,
    io::{BufRead, Write},
};

use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyModifiers},
    execute,
    style::Print,
    terminal::{self, ClearType},
};

type Result<T> = std::result::Result<T, Box<dyn Error + Send + Sync>>;

const MAX_ATTEMPTS: usize = 3;

/// Restores cooked mode when dropped, even on early return.
struct RawModeGuard;

impl RawModeGuard {
    fn enter() -> Result<Self> {
        terminal::enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}

fn notice(out: &mut impl Write, message: &str) -> Result<()> {
    execute!(
        out,
        cursor::MoveToColumn(0),
        terminal::Clear(ClearType::CurrentLine),
        Print(message),
        Print("\r\n")
    )?;
    Ok(())
}

fn read_hidden(prompt: &str) -> Result<String> {
    let _raw = RawModeGuard::enter()?;
    let mut out = std::io::stderr();
    execute!(
        out,
        cursor::MoveToColumn(0),
        terminal::Clear(ClearType::CurrentLine),
        Print(prompt)
    )?;

    let mut buf = String::new();
    loop {
        let Event::Key(KeyEvent {
            code, modifiers, ..
        }) = event::read()?
        else {
            continue;
        };

        match code {
            KeyCode::Enter => break,
            KeyCode::Backspace => {
                if buf.pop().is_some() {
                    execute!(out, cursor::MoveLeft(1), Print(" "), cursor::MoveLeft(1))?;
                }
            }
            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                execute!(out, Print("\r\n"))?;
                return Err("interrupted".into());
            }
            KeyCode::Char(ch) if !modifiers.contains(KeyModifiers::CONTROL) => {
                buf.push(ch);
                execute!(out, Print("*"))?;
            }
            _ => {}
        }
        out.flush()?;
    }

    execute!(out, Print("\r\n"))?;
    Ok(buf)
}

/// Ask for a new password twice until both entries match.
pub fn new_password() -> Result<String> {
    let mut out = std::io::stderr();
    for _ in 0..MAX_ATTEMPTS {
        let first = read_hidden("Password: ")?;
        if first.is_empty() {
            notice(&mut out, "Password must not be empty.")?;
            continue;
        }
        if read_hidden("Confirm password: ")? == first {
            return Ok(first);
        }
        notice(&mut out, "Passwords do not match. Try again.")?;
    }

    Err("too many attempts".into())
}

/// Read the password from the first line of `input`, for scripted use.
pub fn password_from(input: impl BufRead) -> Result<String> {
    let line = input.lines().next().transpose()?.unwrap_or_default();
    let password = line.trim_end_matches(['\r', '\n']).to_string();
    if password.is_empty() {
        return Err("empty password on stdin".into());
    }
    Ok(password)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_from_reads_first_line() {
        let password = password_from("s3cret\nignored\n".as_bytes()).unwrap();
        assert_eq!(password, "s3cret");
    }

    #[test]
    fn password_from_rejects_empty_input() {
        assert!(password_from("".as_bytes()).is_err());
        assert!(password_from("\n".as_bytes()).is_err());
    }
}
