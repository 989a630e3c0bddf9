//! Sanitizer engine.

use engram_core::constants::MAX_PRIVACY_TAG_OCCURRENCES;
use engram_core::errors::EngramResult;
use engram_core::traits::{ISanitizer, SanitizedText};

use crate::patterns;

/// Strips `<private>`, `<no-memory>`, and `<secret>` regions from a delta.
///
/// At most [`MAX_PRIVACY_TAG_OCCURRENCES`] regions are removed per call;
/// anything past the cap is left intact, which bounds regex work on
/// adversarial input. Unclosed or mismatched tags are not regions and pass
/// through unchanged.
#[derive(Debug, Default)]
pub struct Sanitizer;

impl Sanitizer {
    pub fn new() -> Self {
        Self
    }
}

impl ISanitizer for Sanitizer {
    fn sanitize(&self, text: &str) -> EngramResult<SanitizedText> {
        let Some(re) = patterns::TAG_SPANS.as_ref() else {
            tracing::error!("privacy tag pattern failed to compile; passing text through");
            return Ok(SanitizedText {
                text: text.to_string(),
                removed_spans: 0,
                capped: false,
            });
        };

        let mut out = String::with_capacity(text.len());
        let mut cursor = 0;
        let mut removed = 0;
        let mut capped = false;

        for m in re.find_iter(text) {
            if removed >= MAX_PRIVACY_TAG_OCCURRENCES {
                capped = true;
                break;
            }
            out.push_str(&text[cursor..m.start()]);
            cursor = m.end();
            removed += 1;
        }
        out.push_str(&text[cursor..]);

        if capped {
            tracing::warn!(
                removed,
                "privacy tag cap hit; remaining tags left intact"
            );
        }

        Ok(SanitizedText {
            text: out,
            removed_spans: removed,
            capped,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sanitize(text: &str) -> SanitizedText {
        Sanitizer::new().sanitize(text).unwrap()
    }

    #[test]
    fn strips_each_tag_kind() {
        let out = sanitize("a<private>x</private>b<no-memory>y</no-memory>c<secret>z</secret>d");
        assert_eq!(out.text, "abcd");
        assert_eq!(out.removed_spans, 3);
        assert!(!out.capped);
    }

    #[test]
    fn spans_cross_newlines() {
        let out = sanitize("keep\n<private>line one\nline two</private>\nkeep");
        assert_eq!(out.text, "keep\n\nkeep");
    }

    #[test]
    fn unclosed_tags_pass_through() {
        let out = sanitize("a<private>never closed");
        assert_eq!(out.text, "a<private>never closed");
        assert_eq!(out.removed_spans, 0);
    }

    #[test]
    fn mismatched_closers_pass_through() {
        let out = sanitize("a<private>x</secret>b");
        assert_eq!(out.text, "a<private>x</secret>b");
    }

    #[test]
    fn cap_leaves_later_tags_intact() {
        let text = "<secret>x</secret>".repeat(MAX_PRIVACY_TAG_OCCURRENCES + 5);
        let out = sanitize(&text);
        assert!(out.capped);
        assert_eq!(out.removed_spans, MAX_PRIVACY_TAG_OCCURRENCES);
        assert_eq!(out.text, "<secret>x</secret>".repeat(5));
    }

    #[test]
    fn plain_text_is_untouched() {
        let out = sanitize("nothing tagged here");
        assert_eq!(out.text, "nothing tagged here");
        assert_eq!(out.removed_spans, 0);
    }
}
