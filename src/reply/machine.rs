//! Section parser state machine.
//!
//! | state     | `Marker(m)`          | `Content`         |
//! |-----------|----------------------|-------------------|
//! | `Idle`    | `Open(m)`, `Begin`   | `Idle`, `Discard` |
//! | `Open(a)` | `Open(m)`, `Flush(a)`| `Open(a)`, `Append` |
//!
//! At end of input only `Open(BlogContent)` flushes; any other open section
//! is dropped.

use super::sections::SectionName;

/// Where the parser is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParserState {
    /// No marker seen yet.
    #[default]
    Idle,
    /// Accumulating lines for a section.
    Open(SectionName),
}

/// What a single input line is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineEvent {
    Marker(SectionName),
    Content,
}

impl LineEvent {
    pub fn classify(line: &str) -> Self {
        match SectionName::detect(line) {
            Some(section) => LineEvent::Marker(section),
            None => LineEvent::Content,
        }
    }
}

/// Side effect the parser performs on a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Drop the line.
    Discard,
    /// Buffer the line for the open section.
    Append,
    /// Start a section; there is no buffer to commit.
    Begin,
    /// Commit the buffer into this section, then start afresh.
    Flush(SectionName),
}

/// Next state and action for `event` in `state`.
pub fn transition(state: ParserState, event: LineEvent) -> (ParserState, Action) {
    match (state, event) {
        (ParserState::Idle, LineEvent::Marker(next)) => (ParserState::Open(next), Action::Begin),
        (ParserState::Idle, LineEvent::Content) => (ParserState::Idle, Action::Discard),
        (ParserState::Open(open), LineEvent::Marker(next)) => {
            (ParserState::Open(next), Action::Flush(open))
        }
        (ParserState::Open(open), LineEvent::Content) => (ParserState::Open(open), Action::Append),
    }
}

/// Action at end of input.
pub fn on_end(state: ParserState) -> Action {
    match state {
        ParserState::Open(SectionName::BlogContent) => Action::Flush(SectionName::BlogContent),
        _ => Action::Discard,
    }
}
