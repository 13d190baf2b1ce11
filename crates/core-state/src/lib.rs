//! Editor state: buffer registry, scrap text, message line and terminal
//! metadata.
//!
//! Buffers live in an arena addressed by [`BufferId`]; ids stay valid until
//! the buffer is killed. A separate `order` list keeps live buffers sorted by
//! name, which is the order `next_buffer` cycles through. The current buffer
//! can never be killed, so `state.current_buffer()` is always valid.
//!
//! View state (windows, their rows and saved frames) lives in `core-model`;
//! this crate stays buffer-centric.

use anyhow::Result;
use core_text::Buffer;
use std::ops::{Index, IndexMut};
use tracing::{debug, info};

/// Stable handle to a buffer in the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BufferId(pub usize);

pub const DEFAULT_TAB_WIDTH: usize = 4;

/// What a minibuffer answer will be used for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind {
    FindFile,
    WriteFile,
    SwitchBuffer,
}

impl PromptKind {
    pub fn label(&self) -> &'static str {
        match self {
            PromptKind::FindFile => "Find file: ",
            PromptKind::WriteFile => "Write file: ",
            PromptKind::SwitchBuffer => "Switch to buffer: ",
        }
    }
}

/// A question being answered on the message line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub kind: PromptKind,
    pub response: String,
}

impl Prompt {
    pub fn new(kind: PromptKind) -> Self {
        Self {
            kind,
            response: String::new(),
        }
    }

    /// Label followed by the answer typed so far.
    pub fn line(&self) -> String {
        format!("{}{}", self.kind.label(), self.response)
    }
}

#[derive(Debug)]
pub struct EditorState {
    slots: Vec<Option<Buffer>>,
    order: Vec<BufferId>,
    current: BufferId,
    /// Text removed by kill-line; re-inserted by yank.
    pub scrap: String,
    /// Pending message for the bottom line. Cleared on the next key.
    pub message: Option<String>,
    /// Active minibuffer question; owns the message line while set.
    pub prompt: Option<Prompt>,
    pub cols: u16,
    pub rows: u16,
    pub tab_width: usize,
    /// Pad rows past the end of text with `~`, `^` and `$` glyphs.
    pub fill_glyphs: bool,
    /// Set once a quit with modified buffers has been warned about.
    pub quit_armed: bool,
    pub done: bool,
}

impl EditorState {
    /// Create a new state with `buffer` registered and current.
    pub fn new(buffer: Buffer) -> Self {
        let mut state = Self {
            slots: Vec::new(),
            order: Vec::new(),
            current: BufferId(0),
            scrap: String::new(),
            message: None,
            prompt: None,
            cols: 80,
            rows: 24,
            tab_width: DEFAULT_TAB_WIDTH,
            fill_glyphs: true,
            quit_armed: false,
            done: false,
        };
        state.current = state.add_buffer(buffer);
        state
    }

    /// Register `buffer`, keeping `order` sorted by name. Equal names keep
    /// insertion order.
    pub fn add_buffer(&mut self, buffer: Buffer) -> BufferId {
        let id = BufferId(self.slots.len());
        let at = self
            .order
            .iter()
            .position(|other| self[*other].name.as_str() > buffer.name.as_str())
            .unwrap_or(self.order.len());
        debug!(target: "state", id = id.0, len = buffer.len(), "buffer_added");
        self.slots.push(Some(buffer));
        self.order.insert(at, id);
        id
    }

    pub fn find_buffer(&self, name: &str) -> Option<BufferId> {
        self.order.iter().copied().find(|id| self[*id].name == name)
    }

    /// Look a buffer up by name, creating an empty one when none exists.
    pub fn find_or_create(&mut self, name: &str) -> Result<BufferId> {
        if let Some(id) = self.find_buffer(name) {
            return Ok(id);
        }
        let buffer = Buffer::from_str(name, "")?;
        Ok(self.add_buffer(buffer))
    }

    pub fn buffer(&self, id: BufferId) -> Option<&Buffer> {
        self.slots.get(id.0).and_then(Option::as_ref)
    }

    pub fn buffer_mut(&mut self, id: BufferId) -> Option<&mut Buffer> {
        self.slots.get_mut(id.0).and_then(Option::as_mut)
    }

    /// Live buffers in name order.
    pub fn buffers(&self) -> impl Iterator<Item = (BufferId, &Buffer)> + '_ {
        self.order.iter().map(move |id| (*id, &self[*id]))
    }

    pub fn buffer_count(&self) -> usize {
        self.order.len()
    }

    pub fn current_id(&self) -> BufferId {
        self.current
    }

    pub fn current_buffer(&self) -> &Buffer {
        &self[self.current]
    }

    pub fn current_buffer_mut(&mut self) -> &mut Buffer {
        let id = self.current;
        &mut self[id]
    }

    /// Make `id` current. Returns false for a killed or unknown id.
    pub fn set_current(&mut self, id: BufferId) -> bool {
        if self.buffer(id).is_none() {
            return false;
        }
        self.current = id;
        true
    }

    /// The buffer after the current one in name order, wrapping around.
    pub fn next_buffer(&self) -> BufferId {
        let at = self
            .order
            .iter()
            .position(|id| *id == self.current)
            .unwrap_or(0);
        self.order[(at + 1) % self.order.len()]
    }

    /// Remove a buffer. Refused for the current buffer and for buffers still
    /// shown in a window.
    pub fn kill_buffer(&mut self, id: BufferId) -> bool {
        if id == self.current {
            return false;
        }
        match self.buffer(id) {
            Some(b) if b.window_count() == 0 => {}
            _ => return false,
        }
        self.order.retain(|other| *other != id);
        self.slots[id.0] = None;
        info!(target: "state", id = id.0, "buffer_killed");
        true
    }

    pub fn any_modified(&self) -> bool {
        self.buffers().any(|(_, b)| b.modified)
    }

    pub fn set_message(&mut self, msg: impl Into<String>) {
        self.message = Some(msg.into());
    }

    pub fn clear_message(&mut self) {
        self.message = None;
    }

    /// The message line: the active prompt if any, else the pending message.
    pub fn message_line(&self) -> Option<String> {
        match &self.prompt {
            Some(p) => Some(p.line()),
            None => self.message.clone(),
        }
    }

    pub fn resize(&mut self, cols: u16, rows: u16) {
        self.cols = cols;
        self.rows = rows;
    }
}

impl Index<BufferId> for EditorState {
    type Output = Buffer;

    fn index(&self, id: BufferId) -> &Buffer {
        match self.slots.get(id.0) {
            Some(Some(b)) => b,
            _ => panic!("stale buffer id {}", id.0),
        }
    }
}

impl IndexMut<BufferId> for EditorState {
    fn index_mut(&mut self, id: BufferId) -> &mut Buffer {
        match self.slots.get_mut(id.0) {
            Some(Some(b)) => b,
            _ => panic!("stale buffer id {}", id.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> EditorState {
        EditorState::new(Buffer::from_str("*scratch*", "").unwrap())
    }

    fn names(st: &EditorState) -> Vec<String> {
        st.buffers().map(|(_, b)| b.name.clone()).collect()
    }

    #[test]
    fn buffers_are_kept_in_name_order() {
        let mut st = state();
        st.find_or_create("notes.txt").unwrap();
        st.find_or_create("Makefile").unwrap();
        st.find_or_create("main.rs").unwrap();
        assert_eq!(names(&st), ["*scratch*", "Makefile", "main.rs", "notes.txt"]);
    }

    #[test]
    fn prompt_owns_the_message_line() {
        let mut st = state();
        st.set_message("saved");
        assert_eq!(st.message_line().as_deref(), Some("saved"));
        let mut p = Prompt::new(PromptKind::FindFile);
        p.response.push_str("a.txt");
        st.prompt = Some(p);
        assert_eq!(st.message_line().as_deref(), Some("Find file: a.txt"));
    }

    #[test]
    fn find_or_create_reuses_existing() {
        let mut st = state();
        let a = st.find_or_create("a").unwrap();
        let b = st.find_or_create("a").unwrap();
        assert_eq!(a, b);
        assert_eq!(st.buffer_count(), 2);
    }

    #[test]
    fn next_buffer_wraps() {
        let mut st = state();
        let a = st.find_or_create("a").unwrap();
        let scratch = st.current_id();
        assert_eq!(st.next_buffer(), a);
        st.set_current(a);
        assert_eq!(st.next_buffer(), scratch);
    }

    #[test]
    fn current_buffer_cannot_be_killed() {
        let mut st = state();
        let a = st.find_or_create("a").unwrap();
        assert!(!st.kill_buffer(st.current_id()));
        assert!(st.kill_buffer(a));
        assert!(st.buffer(a).is_none());
        assert!(!st.set_current(a));
        assert_eq!(st.buffer_count(), 1);
    }

    #[test]
    fn displayed_buffer_cannot_be_killed() {
        let mut st = state();
        let a = st.find_or_create("a").unwrap();
        st[a].attach_window();
        assert!(!st.kill_buffer(a));
        st[a].detach_window();
        assert!(st.kill_buffer(a));
    }

    #[test]
    fn modified_tracking() {
        let mut st = state();
        assert!(!st.any_modified());
        st.current_buffer_mut().insert("x").unwrap();
        assert!(st.any_modified());
    }
}
