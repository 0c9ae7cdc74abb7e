use crossterm::event::{KeyCode, KeyModifiers, poll, read};
use std::io;
use std::io::Write;
use std::time::Duration;

/// Byte-oriented console consumed by the memory-mapped keyboard
/// registers and the I/O trap routines.
pub trait Console {
    /// Checks if input is available, does not block.
    ///
    /// A `true` result stages the character so that the next
    /// [`Console::read_char`] returns immediately.
    fn poll_ready(&mut self) -> io::Result<bool>;
    /// Reads one character, blocking until one arrives.
    fn read_char(&mut self) -> io::Result<u8>;
    /// Writes one character to the display.
    fn write_char(&mut self, c: u8) -> io::Result<()>;
    /// Writes every byte of `s` via [`Console::write_char`].
    fn write_str(&mut self, s: &str) -> io::Result<()> {
        for b in s.bytes() {
            self.write_char(b)?;
        }
        Ok(())
    }
    /// True once the user requested termination with CTRL-C.
    fn is_interrupted(&self) -> bool {
        false
    }
}

/// [`Console`] backed by the real terminal via crossterm events.
///
/// In raw mode CTRL-C arrives as an ordinary key event instead of a
/// signal, so it is latched here and surfaced via `is_interrupted`.
pub struct TerminalConsole {
    pending: Option<u8>,
    interrupted: bool,
    stdout: io::Stdout,
}

impl TerminalConsole {
    #[must_use]
    pub fn new() -> Self {
        Self {
            pending: None,
            interrupted: false,
            stdout: io::stdout(),
        }
    }
}

impl Default for TerminalConsole {
    fn default() -> Self {
        Self::new()
    }
}

fn is_ctrl_c(code: KeyCode, modifiers: KeyModifiers) -> bool {
    code == KeyCode::Char('c') && modifiers == KeyModifiers::CONTROL
}

fn key_press_byte(code: KeyCode) -> Option<u8> {
    match code {
        KeyCode::Enter => Some(b'\n'),
        KeyCode::Backspace => Some(0x08),
        _ => code.as_char().and_then(|c| u8::try_from(c).ok()),
    }
}

impl Console for TerminalConsole {
    fn poll_ready(&mut self) -> io::Result<bool> {
        if self.pending.is_some() {
            return Ok(true);
        }
        if poll(Duration::from_secs(0))?
            && let Some(event) = read()?.as_key_press_event()
        {
            if is_ctrl_c(event.code, event.modifiers) {
                self.interrupted = true;
            } else if let Some(b) = key_press_byte(event.code) {
                self.pending = Some(b);
                return Ok(true);
            }
        }
        Ok(false)
    }

    fn read_char(&mut self) -> io::Result<u8> {
        if let Some(b) = self.pending.take() {
            return Ok(b);
        }
        loop {
            if let Some(event) = read()?.as_key_press_event() {
                if is_ctrl_c(event.code, event.modifiers) {
                    // Returned value is never observed: the reading
                    // traps check `is_interrupted` before using it and
                    // the run loop stops before the next instruction.
                    self.interrupted = true;
                    return Ok(0);
                }
                if let Some(b) = key_press_byte(event.code) {
                    return Ok(b);
                }
            }
        }
    }

    fn write_char(&mut self, c: u8) -> io::Result<()> {
        // Raw mode does not translate newlines on output.
        if c == b'\n' {
            self.stdout.write_all(b"\r\n")?;
        } else {
            self.stdout.write_all(&[c])?;
        }
        self.stdout.flush()
    }

    fn is_interrupted(&self) -> bool {
        self.interrupted
    }
}
