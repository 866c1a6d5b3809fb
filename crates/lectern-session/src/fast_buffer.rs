//! Fast per-session buffer feeding live highlight classification.
//!
//! Fragments accumulate until one of three readiness rules fires, then the
//! whole window is handed to the classifier in a single flush. The time rule
//! guarantees a classification cadence even during slow speech, the word rule
//! caps classifier input size, and the punctuation rule short-circuits the
//! wait at natural sentence boundaries.

use std::time::{Duration, Instant};

/// Elapsed time after which a non-empty window is ready.
const FLUSH_WINDOW: Duration = Duration::from_millis(8_000);

/// Word count at which a window is ready.
const FLUSH_WORD_LIMIT: usize = 25;

/// Micro-accumulator for live transcript fragments.
#[derive(Debug, Default)]
pub struct FastBuffer {
    text: String,
    window_start: Option<Instant>,
    word_count: usize,
}

impl FastBuffer {
    /// Create an empty buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a fragment, inserting a separating space only when needed.
    ///
    /// The first append after a reset stamps the window start.
    pub fn add_fragment(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        if self.text.is_empty() {
            self.window_start = Some(Instant::now());
        } else if !self.text.ends_with(' ') && !text.starts_with(' ') {
            self.text.push(' ');
        }
        self.text.push_str(text);
        self.word_count = self.text.split_whitespace().count();
    }

    /// Whether the window is ready to flush.
    ///
    /// True iff any of: elapsed time since window start reached 8 seconds,
    /// word count reached 25, or the trimmed text ends in `.`, `?`, or `!`.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        if self.text.is_empty() {
            return false;
        }
        if self
            .window_start
            .is_some_and(|start| start.elapsed() >= FLUSH_WINDOW)
        {
            return true;
        }
        if self.word_count >= FLUSH_WORD_LIMIT {
            return true;
        }
        matches!(
            self.text.trim_end().chars().last(),
            Some('.' | '?' | '!')
        )
    }

    /// Flush the window if it is ready.
    ///
    /// Returns the trimmed window text and resets the buffer, or `None`
    /// leaving all state untouched.
    pub fn flush_if_ready(&mut self) -> Option<String> {
        if !self.is_ready() {
            return None;
        }
        let text = self.text.trim().to_owned();
        self.reset();
        Some(text)
    }

    /// Clear the window back to its initial empty state.
    pub fn reset(&mut self) {
        self.text.clear();
        self.window_start = None;
        self.word_count = 0;
    }

    /// Current word count of the window.
    #[must_use]
    pub fn word_count(&self) -> usize {
        self.word_count
    }

    /// Whether the window holds no text.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Backdate the window start, for exercising the time rule in tests.
    #[cfg(test)]
    fn backdate_window(&mut self, by: Duration) {
        self.window_start = Instant::now().checked_sub(by);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_buffer_not_ready() {
        let buf = FastBuffer::new();
        assert!(!buf.is_ready());
    }

    #[test]
    fn not_ready_flush_is_noop() {
        let mut buf = FastBuffer::new();
        buf.add_fragment("short fragment without punctuation");
        assert!(!buf.is_ready());
        assert!(buf.flush_if_ready().is_none());
        // State untouched
        assert_eq!(buf.word_count(), 5);
        assert!(!buf.is_empty());
    }

    #[test]
    fn punctuation_rule_fires_immediately() {
        // 11 words, well under the time and word thresholds, ending in `.`
        let mut buf = FastBuffer::new();
        buf.add_fragment(
            "Newton's second law states that force equals mass times acceleration.",
        );
        assert!(buf.is_ready());
        let flushed = buf.flush_if_ready().expect("ready via punctuation");
        assert!(flushed.ends_with('.'));
    }

    #[test]
    fn question_and_exclamation_also_fire() {
        for terminal in ["does anyone know why?", "watch closely!"] {
            let mut buf = FastBuffer::new();
            buf.add_fragment(terminal);
            assert!(buf.is_ready(), "{terminal:?} should be ready");
        }
    }

    #[test]
    fn trailing_whitespace_does_not_hide_punctuation() {
        let mut buf = FastBuffer::new();
        buf.add_fragment("and that concludes the proof.   ");
        assert!(buf.is_ready());
    }

    #[test]
    fn word_rule_fires_on_26th_word() {
        let mut buf = FastBuffer::new();
        for i in 0..25 {
            buf.add_fragment(&format!("w{i}"));
        }
        assert!(buf.is_ready(), "25 words reach the limit");

        // One-by-one: not ready at 24, ready at 25
        let mut buf = FastBuffer::new();
        for i in 0..24 {
            buf.add_fragment(&format!("w{i}"));
            assert!(!buf.is_ready(), "not ready at {} words", i + 1);
        }
        buf.add_fragment("w24");
        assert!(buf.is_ready());
    }

    #[test]
    fn time_rule_fires_after_window() {
        let mut buf = FastBuffer::new();
        buf.add_fragment("slow speech with no punctuation");
        assert!(!buf.is_ready());
        buf.backdate_window(Duration::from_millis(8_001));
        assert!(buf.is_ready());
    }

    #[test]
    fn time_rule_not_early() {
        let mut buf = FastBuffer::new();
        buf.add_fragment("slow speech with no punctuation");
        buf.backdate_window(Duration::from_millis(7_000));
        assert!(!buf.is_ready());
    }

    #[test]
    fn fragments_joined_with_single_space() {
        let mut buf = FastBuffer::new();
        buf.add_fragment("so the derivative");
        buf.add_fragment("of x squared");
        buf.add_fragment(" is two x.");
        let flushed = buf.flush_if_ready().unwrap();
        assert_eq!(flushed, "so the derivative of x squared is two x.");
    }

    #[test]
    fn empty_fragment_ignored() {
        let mut buf = FastBuffer::new();
        buf.add_fragment("");
        assert!(buf.is_empty());
        assert!(!buf.is_ready());
    }

    #[test]
    fn flush_resets_to_fresh_state() {
        let mut buf = FastBuffer::new();
        buf.add_fragment("first window ends here.");
        let _ = buf.flush_if_ready().unwrap();

        assert!(buf.is_empty());
        assert_eq!(buf.word_count(), 0);
        assert!(!buf.is_ready());

        // The next add behaves as on a fresh buffer.
        buf.add_fragment("second window");
        assert_eq!(buf.word_count(), 2);
        assert!(!buf.is_ready());
    }

    #[test]
    fn flush_trims_window_text() {
        let mut buf = FastBuffer::new();
        buf.add_fragment("  padded text.  ");
        let flushed = buf.flush_if_ready().unwrap();
        assert_eq!(flushed, "padded text.");
    }
}
