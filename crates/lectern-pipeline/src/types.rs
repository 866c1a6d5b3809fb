//! Fragment processing outcomes.

/// What the ingestion path did with the fragment's window.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RagStatus {
    /// The slow buffer is still accumulating; nothing was indexed.
    Buffering,
    /// A window was flushed and indexed.
    Ingested {
        /// How many records the flush stored.
        stored_chunks: usize,
    },
    /// A window was flushed but ingestion failed; the window text is
    /// dropped and processing continues.
    Failed,
}

impl RagStatus {
    /// Wire name for the status.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Buffering => "buffering",
            Self::Ingested { .. } => "ingested",
            Self::Failed => "failed",
        }
    }

    /// Stored record count, when a flush was ingested.
    #[must_use]
    pub fn stored_chunks(self) -> Option<usize> {
        match self {
            Self::Ingested { stored_chunks } => Some(stored_chunks),
            _ => None,
        }
    }
}

/// Per-fragment result assembled from both paths.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FragmentOutcome {
    /// Ingestion path status.
    pub rag_status: RagStatus,
    /// Whether a highlight event was published for this fragment.
    pub highlight_emitted: bool,
}
