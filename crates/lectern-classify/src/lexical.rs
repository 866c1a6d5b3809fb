//! Cue-word highlight classifier.
//!
//! Flags fragments that read like definitions, formulas, or worked examples
//! by matching lexical cues, with no model call involved. Confidence comes
//! from the weighted scorer: each matched cue contributes evidence, and the
//! fragment's own cue coverage stands in for context coverage.

use async_trait::async_trait;
use tracing::debug;

use crate::confidence::{compute_confidence, ConfidenceInputs};
use crate::errors::Result;
use crate::types::{Classification, HighlightClassifier};

/// Longest excerpt carried into a highlight annotation.
const EXCERPT_LIMIT: usize = 250;

/// Longest title derived from the fragment's opening words.
const TITLE_WORD_LIMIT: usize = 8;

const DEFINITION_CUES: [&str; 4] = ["definition", "is defined as", "refers to", "means that"];
const FORMULA_CUES: [&str; 4] = ["formula", "equation", "equals", "theorem"];
const EXAMPLE_CUES: [&str; 3] = ["for example", "for instance", "example"];

/// Keyword-driven classifier used when no model-backed collaborator is wired.
#[derive(Clone, Copy, Debug, Default)]
pub struct LexicalClassifier;

impl LexicalClassifier {
    /// Create a classifier.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    fn matched_cues(lower: &str) -> (Option<&'static str>, usize) {
        let groups: [(&str, &[&str]); 3] = [
            ("definition", &DEFINITION_CUES),
            ("formula", &FORMULA_CUES),
            ("example", &EXAMPLE_CUES),
        ];
        let mut kind = None;
        let mut matches = 0;
        for (label, cues) in groups {
            let hits = cues.iter().filter(|cue| lower.contains(*cue)).count();
            if hits > 0 {
                matches += hits;
                if kind.is_none() {
                    kind = Some(label);
                }
            }
        }
        (kind, matches)
    }
}

#[async_trait]
impl HighlightClassifier for LexicalClassifier {
    async fn classify(&self, fragment: &str) -> Result<Classification> {
        let lower = fragment.to_lowercase();
        let (kind, cue_matches) = Self::matched_cues(&lower);

        let Some(kind) = kind else {
            return Ok(Classification::none());
        };

        let similarities = vec![0.9; cue_matches];
        let confidence = compute_confidence(&ConfidenceInputs {
            similarities: &similarities,
            context_count: cue_matches,
            self_rated: None,
        });

        let excerpt: String = fragment.chars().take(EXCERPT_LIMIT).collect();
        let title = fragment
            .split_whitespace()
            .take(TITLE_WORD_LIMIT)
            .collect::<Vec<_>>()
            .join(" ");

        debug!(kind, cue_matches, confidence, "fragment flagged as highlight");
        Ok(Classification {
            is_highlight: true,
            kind: Some(kind.to_owned()),
            title: Some(title),
            excerpt: Some(excerpt),
            confidence: Some(confidence),
        })
    }
}
