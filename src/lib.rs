//! Vote submission authorisation and tallying core.
//!
//! This crate owns the correctness-critical path of the voting backend:
//! verifying signed, time-limited credentials, decoding untrusted vote
//! payloads into the fixed vote schema, enforcing the one-vote-per-identity
//! invariant under concurrent submissions, and keeping per-candidate tallies.
//! Route wiring, user registration storage and credential issuance UIs live in
//! the surrounding server and talk to this crate through
//! [`submission::VoteSubmissionService`].

pub mod config;
pub mod error;
pub mod logging;
pub mod model;
pub mod submission;

pub use config::Config;
pub use error::{Rejection, Result};
pub use submission::{VoteReceipt, VoteSubmissionService};
