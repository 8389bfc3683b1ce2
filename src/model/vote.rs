//! Decoding of untrusted vote payloads.
//!
//! The payload is attacker-controlled bytes. It is parsed into exactly one
//! flat, whitelisted shape ([`VoteRequest`]) and nothing else: unknown fields,
//! wrong types, nested structures and type markers are all schema violations,
//! and no construct in the payload can instantiate types outside the schema
//! or execute code. Size is bounded before the parser ever runs.

use serde::{Deserialize, Serialize};
use serde_json::error::Category;
use thiserror::Error;

use crate::config::Config;
use crate::model::tally::CandidateId;

/// Why a payload was refused.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("malformed payload: {0}")]
    Malformed(String),
    #[error("payload of {size} bytes exceeds the {limit} byte limit")]
    TooLarge { size: usize, limit: usize },
    #[error("payload violates the vote schema: {0}")]
    SchemaViolation(String),
}

/// A vote for a single candidate, constructed fresh from the payload of each
/// submission. This is the entire inbound schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VoteRequest {
    pub candidate_id: CandidateId,
}

impl VoteRequest {
    /// Decode a raw payload buffer into a vote.
    pub fn decode(payload: &[u8], config: &Config) -> Result<Self, DecodeError> {
        if payload.len() > config.max_vote_bytes() {
            return Err(DecodeError::TooLarge {
                size: payload.len(),
                limit: config.max_vote_bytes(),
            });
        }

        serde_json::from_slice(payload).map_err(|err| match err.classify() {
            // The bytes were valid JSON but described something outside the
            // whitelisted schema.
            Category::Data => DecodeError::SchemaViolation(err.to_string()),
            _ => DecodeError::Malformed(err.to_string()),
        })
    }
}
