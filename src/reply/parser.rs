//! Line-oriented section parser.

use super::machine::{Action, LineEvent, ParserState, on_end, transition};
use super::sections::{ParsedSections, SectionName};

/// Drives the state machine over a reply, one line at a time.
#[derive(Debug, Default)]
pub struct SectionParser<'a> {
    state: ParserState,
    buffer: Vec<&'a str>,
    sections: ParsedSections,
}

impl<'a> SectionParser<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> ParserState {
        self.state
    }

    /// Feed one line (without its `\n`).
    pub fn feed(&mut self, line: &'a str) {
        let (next, action) = transition(self.state, LineEvent::classify(line));
        self.apply(action, line);
        self.state = next;
    }

    /// End the input and return the sections.
    pub fn finish(mut self) -> ParsedSections {
        let action = on_end(self.state);
        self.apply(action, "");
        self.sections
    }

    fn apply(&mut self, action: Action, line: &'a str) {
        match action {
            Action::Discard => {}
            Action::Append => self.buffer.push(line),
            Action::Begin => self.buffer.clear(),
            Action::Flush(section) => self.flush(section),
        }
    }

    fn flush(&mut self, section: SectionName) {
        let text = self.buffer.join("\n");
        self.sections.set(section, text.trim());
        self.buffer.clear();
    }
}

/// Split a reply into its named sections.
///
/// Never fails: text without markers yields six empty sections. Lines before
/// the first marker are dropped, a repeated marker replaces the earlier text,
/// and only `blog_content` is committed at end of input.
///
/// ```
/// use aladin::reply::{SectionName, parse};
///
/// let sections = parse("###BLOG_CONTENT###\nHello world");
/// assert_eq!(sections.get(SectionName::BlogContent), "Hello world");
/// assert_eq!(sections.get(SectionName::SeoTitle), "");
/// ```
pub fn parse(text: &str) -> ParsedSections {
    let mut parser = SectionParser::new();
    for line in text.split('\n') {
        parser.feed(line);
    }
    parser.finish()
}
