//! Core event types and channel policy for pike.

use std::fmt;
use std::sync::atomic::AtomicU64;
use tokio::sync::mpsc;

// -------------------------------------------------------------------------------------------------
// Channel Policy
// -------------------------------------------------------------------------------------------------
// The input task feeds the editor loop through a bounded mpsc channel of `EVENT_CHANNEL_CAP`.
// The producer awaits `send` when the channel is full instead of dropping events, so every key and
// click is applied in order. The editor loop is the single consumer; a closed channel on either
// side ends the other.
// -------------------------------------------------------------------------------------------------
pub const EVENT_CHANNEL_CAP: usize = 8192;

pub type EventSender = mpsc::Sender<Event>;
pub type EventReceiver = mpsc::Receiver<Event>;

/// The editor's event channel, bounded at `EVENT_CHANNEL_CAP`.
pub fn event_channel() -> (EventSender, EventReceiver) {
    mpsc::channel(EVENT_CHANNEL_CAP)
}

// -------------------------------------------------------------------------------------------------
// Telemetry
// -------------------------------------------------------------------------------------------------
// Relaxed atomic counters; inspected by tests and logged at shutdown.
// -------------------------------------------------------------------------------------------------
pub static CHANNEL_SEND_FAILURES: AtomicU64 = AtomicU64::new(0);
pub static CHANNEL_SENDS: AtomicU64 = AtomicU64::new(0);
pub static KEYPRESS_TOTAL: AtomicU64 = AtomicU64::new(0);
pub static MOUSE_TOTAL: AtomicU64 = AtomicU64::new(0);
pub static ASYNC_INPUT_STARTS: AtomicU64 = AtomicU64::new(0);
pub static ASYNC_INPUT_STOP_SIGNAL: AtomicU64 = AtomicU64::new(0);
pub static ASYNC_INPUT_STOP_CHANNEL: AtomicU64 = AtomicU64::new(0);
pub static ASYNC_INPUT_STOP_STREAM: AtomicU64 = AtomicU64::new(0);
pub static ASYNC_INPUT_STOP_ERROR: AtomicU64 = AtomicU64::new(0);

/// Top-level event enum consumed by the editor loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Input(InputEvent),
    Shutdown,
}

/// Normalized input events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    Key(KeyEvent),
    /// Terminal resize (columns, rows).
    Resize(u16, u16),
    Mouse(MouseEvent),
    /// Bracketed paste payload, inserted at the point as one edit.
    Paste(String),
    /// The terminal stream failed; the loop shuts down and leaves buffers untouched.
    Error(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyEvent {
    pub code: KeyCode,
    pub mods: KeyModifiers,
}

impl KeyEvent {
    pub fn new(code: KeyCode, mods: KeyModifiers) -> Self {
        Self { code, mods }
    }

    pub fn plain(ch: char) -> Self {
        Self::new(KeyCode::Char(ch), KeyModifiers::empty())
    }

    pub fn ctrl(ch: char) -> Self {
        Self::new(KeyCode::Char(ch), KeyModifiers::CTRL)
    }

    pub fn alt(ch: char) -> Self {
        Self::new(KeyCode::Char(ch), KeyModifiers::ALT)
    }

    /// A character typed with no modifier besides shift.
    pub fn printable(&self) -> Option<char> {
        match self.code {
            KeyCode::Char(c) if (self.mods - KeyModifiers::SHIFT).is_empty() && !c.is_control() => {
                Some(c)
            }
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    Char(char),
    Enter,
    Esc,
    Backspace,
    Delete,
    Tab,
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    PageUp,
    PageDown,
}

bitflags::bitflags! {
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct KeyModifiers: u8 {
        const CTRL = 0b0000_0001;
        const ALT  = 0b0000_0010;
        const SHIFT= 0b0000_0100;
    }
}

/// Chord notation used by the keymap: `C-a`, `M-<`, `C-M-v`, `RET`, `<next>`.
/// Shift is folded into the character for printable keys.
impl fmt::Display for KeyEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.mods.contains(KeyModifiers::CTRL) {
            f.write_str("C-")?;
        }
        if self.mods.contains(KeyModifiers::ALT) {
            f.write_str("M-")?;
        }
        match self.code {
            KeyCode::Char(' ') => f.write_str("SPC"),
            KeyCode::Char(c) => write!(f, "{c}"),
            KeyCode::Enter => f.write_str("RET"),
            KeyCode::Esc => f.write_str("ESC"),
            KeyCode::Backspace => f.write_str("DEL"),
            KeyCode::Delete => f.write_str("<delete>"),
            KeyCode::Tab => f.write_str("TAB"),
            KeyCode::Up => f.write_str("<up>"),
            KeyCode::Down => f.write_str("<down>"),
            KeyCode::Left => f.write_str("<left>"),
            KeyCode::Right => f.write_str("<right>"),
            KeyCode::Home => f.write_str("<home>"),
            KeyCode::End => f.write_str("<end>"),
            KeyCode::PageUp => f.write_str("<prior>"),
            KeyCode::PageDown => f.write_str("<next>"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MouseEvent {
    pub kind: MouseEventKind,
    pub column: u16,
    pub row: u16,
    pub mods: KeyModifiers,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseEventKind {
    Down(MouseButton),
    Up(MouseButton),
    Drag(MouseButton),
    ScrollUp,
    ScrollDown,
    Moved,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Middle,
    Right,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chord_notation() {
        assert_eq!(KeyEvent::ctrl('x').to_string(), "C-x");
        assert_eq!(KeyEvent::alt('<').to_string(), "M-<");
        assert_eq!(
            KeyEvent::new(KeyCode::Char('v'), KeyModifiers::CTRL | KeyModifiers::ALT).to_string(),
            "C-M-v"
        );
        assert_eq!(KeyEvent::ctrl(' ').to_string(), "C-SPC");
        assert_eq!(
            KeyEvent::new(KeyCode::PageDown, KeyModifiers::empty()).to_string(),
            "<next>"
        );
        assert_eq!(
            KeyEvent::new(KeyCode::Enter, KeyModifiers::empty()).to_string(),
            "RET"
        );
    }

    #[test]
    fn printable_ignores_shift_only() {
        assert_eq!(KeyEvent::plain('a').printable(), Some('a'));
        assert_eq!(
            KeyEvent::new(KeyCode::Char('A'), KeyModifiers::SHIFT).printable(),
            Some('A')
        );
        assert_eq!(KeyEvent::ctrl('a').printable(), None);
        assert_eq!(KeyEvent::alt('a').printable(), None);
        assert_eq!(
            KeyEvent::new(KeyCode::Enter, KeyModifiers::empty()).printable(),
            None
        );
    }

    #[tokio::test]
    async fn bounded_channel_applies_backpressure() {
        let (tx, mut rx) = tokio::sync::mpsc::channel::<Event>(1);
        tx.send(Event::Input(InputEvent::Resize(80, 24)))
            .await
            .unwrap();
        assert!(tx.try_send(Event::Shutdown).is_err());
        assert_eq!(
            rx.recv().await,
            Some(Event::Input(InputEvent::Resize(80, 24)))
        );
        tx.send(Event::Shutdown).await.unwrap();
        drop(tx);
        assert_eq!(rx.recv().await, Some(Event::Shutdown));
        assert_eq!(rx.recv().await, None);
    }

    #[test]
    fn event_channel_has_the_policy_capacity() {
        let (tx, _rx) = event_channel();
        assert_eq!(tx.max_capacity(), EVENT_CHANNEL_CAP);
        for _ in 0..EVENT_CHANNEL_CAP {
            tx.try_send(Event::Shutdown).unwrap();
        }
        assert!(tx.try_send(Event::Shutdown).is_err());
    }
}
