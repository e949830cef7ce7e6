//! Section vocabulary and the parsed-sections mapping.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// One named field of a model reply.
///
/// Declaration order is the order the prompt asks for, and the order
/// `ParsedSections` iterates and serializes in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionName {
    SeoTitle,
    SeoDescription,
    EmotionalTitle,
    EmotionalDescription,
    UrlSlug,
    BlogContent,
}

impl SectionName {
    /// Every section, in marker order.
    pub const ALL: [SectionName; 6] = [
        SectionName::SeoTitle,
        SectionName::SeoDescription,
        SectionName::EmotionalTitle,
        SectionName::EmotionalDescription,
        SectionName::UrlSlug,
        SectionName::BlogContent,
    ];

    /// The literal token that opens this section in a reply.
    pub fn marker(self) -> &'static str {
        match self {
            SectionName::SeoTitle => "###SEO_TITLE###",
            SectionName::SeoDescription => "###SEO_DESCRIPTION###",
            SectionName::EmotionalTitle => "###EMOTIONAL_TITLE###",
            SectionName::EmotionalDescription => "###EMOTIONAL_DESCRIPTION###",
            SectionName::UrlSlug => "###URL_SLUG###",
            SectionName::BlogContent => "###BLOG_CONTENT###",
        }
    }

    /// Snake-case key used in JSON output.
    pub fn key(self) -> &'static str {
        match self {
            SectionName::SeoTitle => "seo_title",
            SectionName::SeoDescription => "seo_description",
            SectionName::EmotionalTitle => "emotional_title",
            SectionName::EmotionalDescription => "emotional_description",
            SectionName::UrlSlug => "url_slug",
            SectionName::BlogContent => "blog_content",
        }
    }

    /// Human-readable label for terminal output.
    pub fn label(self) -> &'static str {
        match self {
            SectionName::SeoTitle => "SEO Title",
            SectionName::SeoDescription => "SEO Description",
            SectionName::EmotionalTitle => "Emotional Title",
            SectionName::EmotionalDescription => "Emotional Description",
            SectionName::UrlSlug => "URL Slug",
            SectionName::BlogContent => "Blog Content",
        }
    }

    /// Find the marker a line contains, if any.
    ///
    /// Containment, not equality: `**###URL_SLUG###**` still counts. When a
    /// line holds several markers the earliest in `ALL` wins.
    pub fn detect(line: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|section| line.contains(section.marker()))
    }
}

impl fmt::Display for SectionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Section name to text, with every section always present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ParsedSections {
    fields: BTreeMap<SectionName, String>,
}

impl Default for ParsedSections {
    fn default() -> Self {
        Self {
            fields: SectionName::ALL
                .into_iter()
                .map(|section| (section, String::new()))
                .collect(),
        }
    }
}

impl ParsedSections {
    /// Text stored for `section`; empty if the reply never supplied it.
    pub fn get(&self, section: SectionName) -> &str {
        self.fields.get(&section).map(String::as_str).unwrap_or("")
    }

    /// Replace the stored text for `section`.
    pub fn set(&mut self, section: SectionName, value: impl Into<String>) {
        self.fields.insert(section, value.into());
    }

    pub fn blog_content(&self) -> &str {
        self.get(SectionName::BlogContent)
    }

    /// Iterate sections in marker order.
    pub fn iter(&self) -> impl Iterator<Item = (SectionName, &str)> {
        self.fields.iter().map(|(name, text)| (*name, text.as_str()))
    }

    /// Sections that ended up empty.
    pub fn missing(&self) -> Vec<SectionName> {
        self.iter()
            .filter(|(_, text)| text.is_empty())
            .map(|(name, _)| name)
            .collect()
    }
}
