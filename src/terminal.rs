use crossterm::terminal;

/// Guard holding the terminal in raw mode; leaving the scope restores
/// the previous mode on every exit path, normal halt, fault or
/// interrupt alike.
pub struct RawLock {
    _private: (),
}

impl Drop for RawLock {
    fn drop(&mut self) {
        // terminal stays in raw mode but no means to repair
        if let Err(e) = terminal::disable_raw_mode() {
            eprintln!("Error resetting terminal {e}");
        }
    }
}

/// Set terminal to raw in best-effort mode, only log on failure, so
/// the emulator still runs with stdin redirected from a file or under
/// cargo doc tests.
pub fn set_terminal_raw() -> RawLock {
    if let Err(e) = terminal::enable_raw_mode() {
        eprintln!("Could not set terminal to raw mode: {e}");
    }
    RawLock { _private: () }
}
