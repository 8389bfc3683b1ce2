//! The vote submission pipeline.
//!
//! Each submission walks an explicit sequence of states:
//! `Unauthenticated → Authenticated → Decoded → VoterChecked → Tallied`,
//! with any failure terminal (`Rejected`). Nothing is retried internally; a
//! caller can only submit a fresh request, and the one-vote invariant blocks
//! it if their slot is already spent. Credential verification and payload
//! decoding are pure, so submissions for different identities run fully in
//! parallel; the only cross-request ordering point is the registry's
//! compare-and-set.

use std::collections::HashMap;
use std::sync::Arc;

use log::{info, warn};
use serde::Serialize;

use crate::config::Config;
use crate::error::{Rejection, Result};
use crate::logging::SubmissionId;
use crate::model::{
    auth::AuthToken,
    tally::{CandidateId, TallyStore},
    vote::VoteRequest,
    voter::{
        registry::{MemoryVoterRegistry, VoterRegistry},
        Identity, VoterRecord,
    },
};

/// Confirmation returned to the caller once their vote has been counted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VoteReceipt {
    pub identity: Identity,
    pub candidate: CandidateId,
}

/// Orchestrates authentication, decoding, the one-vote invariant and the
/// tally update for every submission. Shared across request workers behind an
/// [`Arc`]; holds no per-request state of its own.
pub struct VoteSubmissionService<R = MemoryVoterRegistry> {
    config: Config,
    registry: Arc<R>,
    tally: Arc<TallyStore>,
}

impl<R> VoteSubmissionService<R>
where
    R: VoterRegistry,
{
    pub fn new(config: Config, registry: Arc<R>, tally: Arc<TallyStore>) -> Self {
        Self {
            config,
            registry,
            tally,
        }
    }

    /// Process one vote submission to a terminal state.
    pub fn submit(&self, credential: Option<&str>, payload: &[u8]) -> Result<VoteReceipt> {
        let id = SubmissionId::next();
        info!("->sub{id} {} payload bytes", payload.len());

        // Unauthenticated → Authenticated: the credential must verify before
        // the payload is looked at.
        let identity = AuthToken::verify_header(credential, &self.config)
            .map_err(|err| rejected(id, err.into()))?;

        // Authenticated → Decoded: parse the payload against the fixed vote
        // schema.
        let vote =
            VoteRequest::decode(payload, &self.config).map_err(|err| rejected(id, err.into()))?;

        // Decoded → VoterChecked: spend the voter's one slot. Concurrent
        // submissions for the same identity race here and exactly one wins.
        self.registry
            .try_mark_voted(&identity)
            .map_err(|err| rejected(id, err.into()))?;

        // VoterChecked → Tallied. A vote for an unlisted candidate has still
        // spent the voter's slot: the mark is never rolled back.
        self.tally
            .increment(&vote.candidate_id)
            .map_err(|err| rejected(id, err.into()))?;

        info!("<-sub{id} tallied vote for `{}`", vote.candidate_id);
        Ok(VoteReceipt {
            identity,
            candidate: vote.candidate_id,
        })
    }

    /// Sign a credential for an identity the login layer has already
    /// authenticated.
    pub fn issue_credential(&self, identity: Identity) -> String {
        info!("issuing credential for `{identity}`");
        AuthToken::issue(identity, &self.config).into_token(&self.config)
    }

    /// Verify a credential and report the voter's registration state, for
    /// session-validation endpoints.
    pub fn validate_credential(&self, credential: Option<&str>) -> Result<VoterRecord> {
        let identity = AuthToken::verify_header(credential, &self.config)?;
        self.registry
            .lookup(&identity)
            .ok_or(Rejection::UnknownVoter)
    }

    /// Current totals for every candidate on the ballot.
    pub fn results(&self) -> HashMap<CandidateId, u64> {
        self.tally.snapshot()
    }
}

fn rejected(id: SubmissionId, rejection: Rejection) -> Rejection {
    warn!(
        "<-sub{id} rejected ({}): {rejection}",
        rejection.status_code()
    );
    rejection
}
