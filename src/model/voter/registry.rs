//! The voter registry contract and the bundled in-memory implementation.
//!
//! `try_mark_voted` is the linchpin of the one-vote invariant: it must be a
//! single indivisible compare-and-set, never a read-then-write pair. Any
//! number of concurrent submissions for the same identity must observe
//! exactly one winning false→true transition.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{PoisonError, RwLock};

use hmac::{Hmac, Mac};
use sha2::Sha256;
use thiserror::Error;

use crate::config::Config;

use super::{Identity, VoterRecord};

pub type HmacSha256 = Hmac<Sha256>;

/// Why a voter could not be marked as having voted.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("voter has already cast their vote")]
    AlreadyVoted,
    #[error("no such voter is registered")]
    NotFound,
}

/// Narrow interface onto whatever user store backs the election. The
/// submission service makes no assumption about the backing storage beyond
/// these two operations.
pub trait VoterRegistry: Send + Sync {
    /// Fetch a voter's registration state.
    fn lookup(&self, identity: &Identity) -> Option<VoterRecord>;

    /// Atomically transition the voter's `has_voted` flag false→true.
    /// Implementations must make this a single compare-and-set: under
    /// concurrent calls for the same identity exactly one caller wins and
    /// every other caller gets [`RegistryError::AlreadyVoted`].
    fn try_mark_voted(&self, identity: &Identity) -> Result<(), RegistryError>;
}

/// In-process registry for elections whose electoral roll fits in memory.
/// Voters are keyed by the HMAC of their identity rather than the identity
/// itself, so the roll never stores raw identifiers.
pub struct MemoryVoterRegistry {
    hmac_secret: Vec<u8>,
    voters: RwLock<HashMap<Vec<u8>, AtomicBool>>,
}

impl MemoryVoterRegistry {
    pub fn new(config: &Config) -> Self {
        Self {
            hmac_secret: config.hmac_secret().to_vec(),
            voters: RwLock::new(HashMap::new()),
        }
    }

    /// Create a registry pre-populated with an electoral roll.
    pub fn with_voters<'a>(
        config: &Config,
        identities: impl IntoIterator<Item = &'a Identity>,
    ) -> Self {
        let registry = Self::new(config);
        for identity in identities {
            registry.register(identity);
        }
        registry
    }

    /// Add a voter to the roll with their vote still unspent. Returns false
    /// if the identity was already registered, leaving its state untouched.
    /// Registration is a setup-time operation, not part of the submission
    /// path.
    pub fn register(&self, identity: &Identity) -> bool {
        let key = self.pseudonym(identity);
        let mut voters = self.voters.write().unwrap_or_else(PoisonError::into_inner);
        match voters.entry(key) {
            std::collections::hash_map::Entry::Occupied(_) => false,
            std::collections::hash_map::Entry::Vacant(entry) => {
                entry.insert(AtomicBool::new(false));
                true
            }
        }
    }

    /// Do not directly store potentially sensitive identity data.
    fn pseudonym(&self, identity: &Identity) -> Vec<u8> {
        let mut hmac = HmacSha256::new_from_slice(&self.hmac_secret)
            .expect("HMAC can take key of any size");
        hmac.update(identity.as_str().as_bytes());
        hmac.finalize().into_bytes().to_vec()
    }
}

impl VoterRegistry for MemoryVoterRegistry {
    fn lookup(&self, identity: &Identity) -> Option<VoterRecord> {
        let voters = self.voters.read().unwrap_or_else(PoisonError::into_inner);
        voters
            .get(&self.pseudonym(identity))
            .map(|voted| VoterRecord {
                identity: identity.clone(),
                has_voted: voted.load(Ordering::Acquire),
            })
    }

    fn try_mark_voted(&self, identity: &Identity) -> Result<(), RegistryError> {
        let voters = self.voters.read().unwrap_or_else(PoisonError::into_inner);
        let voted = voters
            .get(&self.pseudonym(identity))
            .ok_or(RegistryError::NotFound)?;
        voted
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map(|_| ())
            .map_err(|_| RegistryError::AlreadyVoted)
    }
}
