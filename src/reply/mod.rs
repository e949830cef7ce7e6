//! Model reply decomposition.
//!
//! A reply is expected to look like:
//!
//! ```text
//! <acknowledgement preamble>
//! ###SEO_TITLE###
//! ...
//! ###SEO_DESCRIPTION###
//! ...
//! ###EMOTIONAL_TITLE###
//! ...
//! ###EMOTIONAL_DESCRIPTION###
//! ...
//! ###URL_SLUG###
//! ...
//! ###BLOG_CONTENT###
//! ...
//! ```
//!
//! The preamble is stripped first, then the parser assigns lines to sections.
//! Missing, reordered and repeated markers are tolerated; the result always
//! has all six sections.

mod machine;
mod parser;
mod preamble;
mod sections;


pub use machine::{Action, LineEvent, ParserState, on_end, transition};
pub use parser::{SectionParser, parse};
pub use preamble::{RawReply, strip_preamble};
pub use sections::{ParsedSections, SectionName};
