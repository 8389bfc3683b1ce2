//! Per-candidate vote counters for the active election.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use thiserror::Error;

pub type CandidateId = String;

/// A vote was cast for a candidate not on the ballot.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("candidate `{0}` is not on the ballot")]
pub struct UnknownCandidate(pub CandidateId);

/// Running totals for a fixed, preconfigured candidate set. Counters only
/// ever move upwards, by atomic increments; the candidate set never changes
/// after construction, so increments for different candidates never contend.
#[derive(Debug)]
pub struct TallyStore {
    totals: HashMap<CandidateId, AtomicU64>,
}

impl TallyStore {
    /// Zeroed counters for the given candidates.
    pub fn new(candidates: impl IntoIterator<Item = CandidateId>) -> Self {
        Self::with_totals(candidates.into_iter().map(|candidate| (candidate, 0)))
    }

    /// Counters seeded with existing totals, e.g. restored from the counter
    /// store on startup.
    pub fn with_totals(totals: impl IntoIterator<Item = (CandidateId, u64)>) -> Self {
        Self {
            totals: totals
                .into_iter()
                .map(|(candidate, count)| (candidate, AtomicU64::new(count)))
                .collect(),
        }
    }

    /// Atomically add one vote to the named candidate's total.
    pub fn increment(&self, candidate: &str) -> Result<(), UnknownCandidate> {
        let total = self
            .totals
            .get(candidate)
            .ok_or_else(|| UnknownCandidate(candidate.to_string()))?;
        total.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    /// A point-in-time read of every total. Increments that race with the
    /// read may or may not be included, but no count ever appears lower than
    /// a previously observed value.
    pub fn snapshot(&self) -> HashMap<CandidateId, u64> {
        self.totals
            .iter()
            .map(|(candidate, total)| (candidate.clone(), total.load(Ordering::Relaxed)))
            .collect()
    }
}

/// Example data for tests.
#[cfg(test)]
mod examples {
    use super::*;

    impl TallyStore {
        /// The two-candidate ballot with the totals the original deployment
        /// booted with.
        pub fn example() -> Self {
            Self::with_totals([
                ("candidateA".to_string(), 29900),
                ("candidateB".to_string(), 33000),
            ])
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Barrier};
    use std::thread;

    use super::*;

    #[test]
    fn increments_listed_candidate() {
        let tally = TallyStore::example();
        tally.increment("candidateA").unwrap();

        let snapshot = tally.snapshot();
        assert_eq!(29901, snapshot["candidateA"]);
        assert_eq!(33000, snapshot["candidateB"]);
    }

    #[test]
    fn rejects_unlisted_candidate() {
        let tally = TallyStore::example();
        assert_eq!(
            Err(UnknownCandidate("candidateC".to_string())),
            tally.increment("candidateC")
        );
        assert_eq!(TallyStore::example().snapshot(), tally.snapshot());
    }

    #[test]
    fn zeroed_counters_start_at_zero() {
        let tally = TallyStore::new(["candidateA".to_string()]);
        assert_eq!(0, tally.snapshot()["candidateA"]);
    }

    #[test]
    fn concurrent_increments_all_count() {
        const THREADS: usize = 8;
        const PER_THREAD: usize = 100;

        let tally = Arc::new(TallyStore::new(["candidateB".to_string()]));
        let barrier = Arc::new(Barrier::new(THREADS));
        let handles: Vec<_> = (0..THREADS)
            .map(|_| {
                let tally = Arc::clone(&tally);
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    barrier.wait();
                    for _ in 0..PER_THREAD {
                        tally.increment("candidateB").unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(
            (THREADS * PER_THREAD) as u64,
            tally.snapshot()["candidateB"]
        );
    }
}
