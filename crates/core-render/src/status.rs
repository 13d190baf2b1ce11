//! Mode line and message line composition.
//!
//! Mode line format (one per window, directly under its text rows):
//! `FFM pike: FF <name> L<line> C<col> FFFF...`
//! * `F` is the fill character: `=` for the current window, `-` otherwise.
//! * `M` is `*` when the buffer is modified, otherwise `F`.
//! * Line and column are 1-based; the column counts characters from the line
//!   start.
//! * The remainder of the row is padded with `F`.
//!
//! Two stages: `compose_mode_line` produces ordered segments and
//! `format_mode_line` renders them, so tests can introspect either.

pub struct ModeLineContext<'a> {
    pub current: bool,
    pub modified: bool,
    pub name: &'a str,
    pub line: usize, // 0-based
    pub col: usize,  // 0-based
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModeSegment<'a> {
    Lead { fill: char, marker: char },
    Name(&'a str),
    Position { line_1: usize, col_1: usize },
}

pub fn fill_char(current: bool) -> char {
    if current { '=' } else { '-' }
}

pub fn compose_mode_line<'a>(ctx: &ModeLineContext<'a>) -> Vec<ModeSegment<'a>> {
    let fill = fill_char(ctx.current);
    let marker = if ctx.modified { '*' } else { fill };
    vec![
        ModeSegment::Lead { fill, marker },
        ModeSegment::Name(ctx.name),
        ModeSegment::Position {
            line_1: ctx.line + 1,
            col_1: ctx.col + 1,
        },
    ]
}

/// Render segments and pad with `fill` to exactly `width` characters.
pub fn format_mode_line(segments: &[ModeSegment<'_>], fill: char, width: usize) -> String {
    use std::fmt::Write as _;
    let mut s = String::with_capacity(width.max(32));
    for seg in segments {
        match seg {
            ModeSegment::Lead { fill, marker } => {
                let _ = write!(s, "{fill}{fill}{marker} pike: {fill}{fill} ");
            }
            ModeSegment::Name(name) => s.push_str(name),
            ModeSegment::Position { line_1, col_1 } => {
                let _ = write!(s, " L{line_1} C{col_1} ");
            }
        }
    }
    let len = s.chars().count();
    if len >= width {
        return s.chars().take(width).collect();
    }
    s.extend(std::iter::repeat_n(fill, width - len));
    s
}

pub fn build_mode_line(ctx: &ModeLineContext<'_>, width: usize) -> String {
    format_mode_line(&compose_mode_line(ctx), fill_char(ctx.current), width)
}

/// Message text clipped to `width`; empty when there is no message.
pub fn build_message_line(message: Option<&str>, width: usize) -> String {
    message
        .map(|m| m.chars().take(width).collect())
        .unwrap_or_default()
}
