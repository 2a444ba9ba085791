//! Vehicle registration tag extraction.

use super::patterns::REGISTRATION;
use super::{ExtractionMatch, FieldExtractor};

/// Registration tag extractor.
pub struct RegistrationExtractor;

impl RegistrationExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RegistrationExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for RegistrationExtractor {
    type Output = ExtractionMatch<String>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        REGISTRATION
            .find_iter(text)
            .map(|m| {
                ExtractionMatch::new(m.as_str().to_string()).with_position(m.start(), m.end())
            })
            .collect()
    }
}

/// Text with its registration tag removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrippedText {
    /// Remaining text, whitespace-collapsed.
    pub text: String,
    /// First registration tag found, if any.
    pub registration: Option<String>,
}

/// Extract the first registration tag from text.
pub fn extract_registration(text: &str) -> Option<String> {
    RegistrationExtractor::new().extract(text).map(|m| m.value)
}

/// Remove every registration tag from `text`, keeping the first one found.
///
/// Tags are replaced by a space before whitespace is collapsed, so the
/// surrounding fragments can never join into a new tag. Whitespace is
/// collapsed whether or not a tag was found.
pub fn strip_registration(text: &str) -> StrippedText {
    let matches = RegistrationExtractor::new().extract_all(text);

    let mut remaining = String::with_capacity(text.len());
    let mut last = 0;
    for (start, end) in matches.iter().filter_map(|m| m.position) {
        remaining.push_str(&text[last..start]);
        remaining.push(' ');
        last = end;
    }
    remaining.push_str(&text[last..]);

    StrippedText {
        text: remaining.split_whitespace().collect::<Vec<_>>().join(" "),
        registration: matches.into_iter().next().map(|m| m.value),
    }
}
