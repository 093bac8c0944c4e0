//! Terminal setup and teardown. Whatever was switched on is switched off
//! again on any exit, including early errors and panics.

use crossterm::{
    cursor::Show,
    event::{KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use std::io::{self, Write, stdout};

/// Writes the escape sequences that undo [`TerminalGuard::enter`] to `out`
/// and leaves raw mode.
pub fn restore_terminal<W: Write>(out: &mut W, keyboard_enhancement: bool) -> io::Result<()> {
    if keyboard_enhancement {
        execute!(out, PopKeyboardEnhancementFlags)?;
    }
    execute!(out, LeaveAlternateScreen, Show)?;
    disable_raw_mode()
}

/// Chains a hook in front of the current panic hook (color-eyre's, once
/// installed) so the report is printed to a usable terminal.
pub fn install_panic_hook(keyboard_enhancement: bool) {
    let hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = restore_terminal(&mut stdout(), keyboard_enhancement);
        hook(info);
    }));
}

/// Owns the terminal modes for as long as it lives
#[derive(Debug)]
pub struct TerminalGuard {
    keyboard_enhancement: bool,
    active: bool,
}

impl TerminalGuard {
    /// Enables raw mode, enters the alternate screen and, if supported,
    /// pushes keyboard enhancement flags. Anything already switched on is
    /// switched off again if a later step fails.
    pub fn enter(keyboard_enhancement: bool) -> io::Result<Self> {
        enable_raw_mode()?;
        let guard = Self {
            keyboard_enhancement,
            active: true,
        };

        let mut stdout = stdout();
        execute!(stdout, EnterAlternateScreen)?;

        // Enable keyboard enhancement AFTER entering alternate screen
        if keyboard_enhancement {
            execute!(
                stdout,
                PushKeyboardEnhancementFlags(
                    KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
                        | KeyboardEnhancementFlags::REPORT_EVENT_TYPES
                )
            )?;
        }

        Ok(guard)
    }

    /// Restores the terminal. Only the first call does anything.
    pub fn restore(&mut self) -> io::Result<()> {
        self.restore_to(&mut stdout())
    }

    fn restore_to<W: Write>(&mut self, out: &mut W) -> io::Result<()> {
        if !self.active {
            return Ok(());
        }
        self.active = false;
        restore_terminal(out, self.keyboard_enhancement)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = self.restore();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LEAVE_ALTERNATE_SCREEN: &str = "\x1b[?1049l";
    const SHOW_CURSOR: &str = "\x1b[?25h";
    const POP_KEYBOARD_FLAGS: &str = "\x1b[<1u";

    #[test]
    fn test_restore_leaves_alternate_screen_and_shows_cursor() {
        let mut out = Vec::new();
        restore_terminal(&mut out, false).unwrap();

        let written = String::from_utf8(out).unwrap();
        assert!(written.contains(LEAVE_ALTERNATE_SCREEN));
        assert!(written.contains(SHOW_CURSOR));
        assert!(!written.contains(POP_KEYBOARD_FLAGS));
    }

    #[test]
    fn test_restore_pops_keyboard_flags_first() {
        let mut out = Vec::new();
        restore_terminal(&mut out, true).unwrap();

        let written = String::from_utf8(out).unwrap();
        let pop = written.find(POP_KEYBOARD_FLAGS).unwrap();
        let leave = written.find(LEAVE_ALTERNATE_SCREEN).unwrap();
        assert!(pop < leave);
    }

    #[test]
    fn test_guard_restores_only_once() {
        let mut guard = TerminalGuard {
            keyboard_enhancement: true,
            active: true,
        };

        let mut first = Vec::new();
        guard.restore_to(&mut first).unwrap();
        assert!(!first.is_empty());

        let mut second = Vec::new();
        guard.restore_to(&mut second).unwrap();
        assert!(second.is_empty());

        // Dropping an already restored guard writes nothing to stdout
        assert!(!guard.active);
    }
}
