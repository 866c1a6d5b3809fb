//! Slow per-session buffer ("lecture memory") feeding semantic indexing.
//!
//! Fragments accumulate in a sliding 15-minute retention window; once five
//! unpruned fragments are present the whole window is flushed into the
//! ingestion pipeline. The count trigger is deliberately decoupled from the
//! fast buffer's timing, so ingestion cadence differs from classification
//! cadence. Pruning only bounds memory — it never triggers a flush.

use std::time::{Duration, Instant};

/// How long a fragment stays eligible for inclusion in a flush.
const RETENTION_WINDOW: Duration = Duration::from_secs(15 * 60);

/// Unpruned fragment count at which the window should flush.
const FLUSH_FRAGMENT_COUNT: usize = 5;

#[derive(Debug)]
struct TimestampedFragment {
    text: String,
    at: Instant,
}

/// Macro-accumulator for the ingestion path.
#[derive(Debug, Default)]
pub struct LectureMemory {
    fragments: Vec<TimestampedFragment>,
}

impl LectureMemory {
    /// Create an empty buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a timestamped fragment, then prune entries older than the
    /// 15-minute retention window.
    pub fn add_fragment(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        self.fragments.push(TimestampedFragment {
            text: text.to_owned(),
            at: Instant::now(),
        });
        self.prune();
    }

    /// Whether enough unpruned fragments have accumulated to flush.
    #[must_use]
    pub fn should_flush(&self) -> bool {
        self.fragments.len() >= FLUSH_FRAGMENT_COUNT
    }

    /// Concatenate and clear the window. Always succeeds, even when
    /// [`should_flush`](Self::should_flush) is false.
    pub fn flush(&mut self) -> String {
        let text = self
            .fragments
            .iter()
            .map(|f| f.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        self.fragments.clear();
        text
    }

    /// Number of unpruned fragments currently held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    /// Whether the window holds no fragments.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    fn prune(&mut self) {
        self.fragments.retain(|f| f.at.elapsed() < RETENTION_WINDOW);
    }

    /// Insert a fragment stamped in the past, for exercising pruning in tests.
    #[cfg(test)]
    fn add_aged_fragment(&mut self, text: &str, age: Duration) {
        if let Some(at) = Instant::now().checked_sub(age) {
            self.fragments.push(TimestampedFragment {
                text: text.to_owned(),
                at,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_buffer_should_not_flush() {
        let mem = LectureMemory::new();
        assert!(!mem.should_flush());
        assert!(mem.is_empty());
    }

    #[test]
    fn flush_trigger_exactly_at_five() {
        let mut mem = LectureMemory::new();
        for i in 0..4 {
            mem.add_fragment(&format!("fragment {i}"));
            assert!(!mem.should_flush(), "not ready at {} fragments", i + 1);
        }
        mem.add_fragment("fragment 4");
        assert!(mem.should_flush());
    }

    #[test]
    fn flush_concatenates_and_clears() {
        let mut mem = LectureMemory::new();
        for text in ["alpha", "beta", "gamma", "delta", "epsilon"] {
            mem.add_fragment(text);
        }
        assert!(mem.should_flush());

        let window = mem.flush();
        assert_eq!(window, "alpha beta gamma delta epsilon");
        assert!(mem.is_empty());
        assert!(!mem.should_flush());
    }

    #[test]
    fn flush_is_unconditional() {
        let mut mem = LectureMemory::new();
        mem.add_fragment("only one");
        assert!(!mem.should_flush());
        // Unlike the fast buffer, flush always succeeds.
        assert_eq!(mem.flush(), "only one");
        assert!(mem.is_empty());
    }

    #[test]
    fn flush_on_empty_returns_empty_string() {
        let mut mem = LectureMemory::new();
        assert_eq!(mem.flush(), "");
    }

    #[test]
    fn old_fragments_pruned_on_add() {
        let mut mem = LectureMemory::new();
        mem.add_aged_fragment("stale", Duration::from_secs(16 * 60));
        mem.add_aged_fragment("also stale", Duration::from_secs(15 * 60));
        mem.add_fragment("fresh");

        assert_eq!(mem.len(), 1);
        assert_eq!(mem.flush(), "fresh");
    }

    #[test]
    fn recent_fragments_survive_pruning() {
        let mut mem = LectureMemory::new();
        mem.add_aged_fragment("fourteen minutes old", Duration::from_secs(14 * 60));
        mem.add_fragment("new");
        assert_eq!(mem.len(), 2);
    }

    #[test]
    fn pruning_is_not_a_flush_trigger() {
        let mut mem = LectureMemory::new();
        // Four stale entries plus one fresh: after pruning only one remains,
        // and the count trigger stays quiet regardless of elapsed time.
        for _ in 0..4 {
            mem.add_aged_fragment("stale", Duration::from_secs(20 * 60));
        }
        mem.add_fragment("fresh");
        assert_eq!(mem.len(), 1);
        assert!(!mem.should_flush());
    }

    #[test]
    fn count_trigger_independent_of_time() {
        // Five fragments within a second trip the trigger immediately.
        let mut mem = LectureMemory::new();
        for i in 0..5 {
            mem.add_fragment(&format!("f{i}"));
        }
        assert!(mem.should_flush());
        assert_eq!(mem.flush(), "f0 f1 f2 f3 f4");
        assert!(mem.is_empty());
    }

    #[test]
    fn empty_fragment_ignored() {
        let mut mem = LectureMemory::new();
        mem.add_fragment("");
        assert!(mem.is_empty());
    }
}
