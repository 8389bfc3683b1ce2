use std::fmt::{Display, Formatter};
use std::sync::atomic::{AtomicUsize, Ordering};

/// A unique identifier for a particular vote submission, tagging every log
/// line the submission produces on its way to a terminal state.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd)]
pub struct SubmissionId(pub usize);

impl Display for SubmissionId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl SubmissionId {
    /// Atomically get the next ID. This wraps around back to zero if you somehow exceed a usize.
    pub fn next() -> SubmissionId {
        static SUBMISSION_ID_COUNTER: AtomicUsize = AtomicUsize::new(0);
        SubmissionId(SUBMISSION_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}
