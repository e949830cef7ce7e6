//! End-to-end generation: render, call, strip, parse, evaluate.
//!
//! Template failures stop the run before the caller is touched. Inference
//! failures surface as `AladinError::Inference`. Parsing never fails.

use crate::error::{AladinError, Result};
use crate::inference::InferenceCaller;
use crate::prompt::{GenerationRequest, PromptRenderer, RenderedPrompt};
use crate::reply::{ParsedSections, RawReply, parse, strip_preamble};
use crate::wordcount::{WordCountVerdict, evaluate};
use serde::Serialize;

/// Sections of a reply plus the word-count verdict for its body.
#[derive(Debug, Clone, Serialize)]
pub struct Decomposition {
    pub sections: ParsedSections,
    pub word_count: WordCountVerdict,
}

impl Decomposition {
    /// Turn a missed word count into an error, for strict runs.
    pub fn ensure_within_tolerance(&self) -> Result<()> {
        if self.word_count.within_tolerance {
            Ok(())
        } else {
            Err(AladinError::WordCount(self.word_count.summary()))
        }
    }
}

/// Everything one generation produced.
#[derive(Debug, Clone)]
pub struct Generation {
    pub prompt: RenderedPrompt,
    pub reply: RawReply,
    pub decomposition: Decomposition,
}

/// Strip `preamble`, parse sections, and evaluate `blog_content`.
///
/// `None` parses the reply exactly as given.
pub fn decompose(raw: &str, preamble: Option<&str>, target: u32, tolerance: u32) -> Decomposition {
    let body = match preamble {
        Some(preamble) => strip_preamble(raw, preamble),
        None => raw,
    };
    let sections = parse(body);
    let word_count = evaluate(sections.blog_content(), target, tolerance);
    Decomposition {
        sections,
        word_count,
    }
}

/// Validate the request and render its prompt.
pub fn prepare(renderer: &PromptRenderer, request: &GenerationRequest) -> Result<RenderedPrompt> {
    request.validate()?;
    Ok(renderer.render(request)?)
}

/// Send a rendered prompt to `caller` and decompose the reply.
pub fn answer<C: InferenceCaller + ?Sized>(
    renderer: &PromptRenderer,
    request: &GenerationRequest,
    prompt: RenderedPrompt,
    caller: &C,
) -> Result<Generation> {
    let reply = caller.complete(&prompt)?;
    let decomposition = decompose(
        reply.as_str(),
        Some(renderer.preamble()),
        request.target_word_count,
        renderer.tolerance(),
    );

    Ok(Generation {
        prompt,
        reply,
        decomposition,
    })
}

/// Run the whole pipeline for one request.
pub fn generate<C: InferenceCaller + ?Sized>(
    renderer: &PromptRenderer,
    request: &GenerationRequest,
    caller: &C,
) -> Result<Generation> {
    let prompt = prepare(renderer, request)?;
    answer(renderer, request, prompt, caller)
}
