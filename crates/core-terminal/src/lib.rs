//! Terminal backend abstraction and crossterm implementation.
//!
//! Entering the editor screen puts the terminal in raw mode on the alternate
//! screen with mouse reporting and bracketed paste turned on; leaving undoes
//! all of it in reverse order.

use anyhow::Result;
use crossterm::{
    cursor::{Hide, Show},
    event::{
        DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
    },
    execute,
    terminal::{
        EnterAlternateScreen, LeaveAlternateScreen, SetTitle, disable_raw_mode, enable_raw_mode,
    },
};
use std::io::stdout;
use tracing::{debug, warn};

/// Used until the terminal reports a size.
pub const FALLBACK_SIZE: (u16, u16) = (80, 24);

pub trait TerminalBackend {
    fn enter(&mut self) -> Result<()>;
    fn leave(&mut self) -> Result<()>;
    fn set_title(&mut self, title: &str) -> Result<()>;
    /// `(cols, rows)`.
    fn size(&self) -> Result<(u16, u16)>;
}

pub struct CrosstermBackend {
    entered: bool,
}

/// RAII guard ensuring terminal state restoration even if caller early-returns or panics.
pub struct TerminalGuard<'a, B: TerminalBackend> {
    backend: &'a mut B,
    active: bool,
}

impl<'a, B: TerminalBackend> TerminalGuard<'a, B> {
    pub fn enter(backend: &'a mut B) -> Result<Self> {
        backend.enter()?;
        Ok(Self {
            backend,
            active: true,
        })
    }

    pub fn backend(&mut self) -> &mut B {
        self.backend
    }
}

impl<B: TerminalBackend> Drop for TerminalGuard<'_, B> {
    fn drop(&mut self) {
        if self.active
            && let Err(e) = self.backend.leave()
        {
            warn!(target: "terminal", error = %e, "leave_failed");
        }
    }
}

impl Default for CrosstermBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl CrosstermBackend {
    pub fn new() -> Self {
        Self { entered: false }
    }

    /// Enter and return a guard that will leave on drop.
    pub fn enter_guard(&mut self) -> Result<TerminalGuard<'_, Self>> {
        TerminalGuard::enter(self)
    }
}

impl TerminalBackend for CrosstermBackend {
    fn enter(&mut self) -> Result<()> {
        if !self.entered {
            enable_raw_mode()?;
            execute!(
                stdout(),
                EnterAlternateScreen,
                EnableMouseCapture,
                EnableBracketedPaste,
                Hide
            )?;
            self.entered = true;
            debug!(target: "terminal", "entered");
        }
        Ok(())
    }

    fn leave(&mut self) -> Result<()> {
        if self.entered {
            execute!(
                stdout(),
                DisableBracketedPaste,
                DisableMouseCapture,
                LeaveAlternateScreen,
                Show
            )?;
            disable_raw_mode()?;
            self.entered = false;
            debug!(target: "terminal", "left");
        }
        Ok(())
    }

    fn set_title(&mut self, title: &str) -> Result<()> {
        execute!(stdout(), SetTitle(title))?;
        Ok(())
    }

    fn size(&self) -> Result<(u16, u16)> {
        Ok(crossterm::terminal::size()?)
    }
}

impl Drop for CrosstermBackend {
    fn drop(&mut self) {
        let _ = self.leave();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recording {
        log: Vec<&'static str>,
        fail_leave: bool,
    }

    impl TerminalBackend for Recording {
        fn enter(&mut self) -> Result<()> {
            self.log.push("enter");
            Ok(())
        }
        fn leave(&mut self) -> Result<()> {
            self.log.push("leave");
            if self.fail_leave {
                anyhow::bail!("tty closed");
            }
            Ok(())
        }
        fn set_title(&mut self, _title: &str) -> Result<()> {
            self.log.push("title");
            Ok(())
        }
        fn size(&self) -> Result<(u16, u16)> {
            Ok(FALLBACK_SIZE)
        }
    }

    #[test]
    fn guard_leaves_on_drop() {
        let mut backend = Recording::default();
        {
            let mut guard = TerminalGuard::enter(&mut backend).unwrap();
            guard.backend().set_title("pike").unwrap();
        }
        assert_eq!(backend.log, vec!["enter", "title", "leave"]);
    }

    #[test]
    fn failed_leave_does_not_panic() {
        let mut backend = Recording {
            fail_leave: true,
            ..Default::default()
        };
        drop(TerminalGuard::enter(&mut backend).unwrap());
        assert_eq!(backend.log, vec!["enter", "leave"]);
    }
}
