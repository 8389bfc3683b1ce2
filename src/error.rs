use thiserror::Error;

use crate::model::{
    auth::AuthError, tally::UnknownCandidate, vote::DecodeError, voter::registry::RegistryError,
};

pub type Result<T> = std::result::Result<T, Rejection>;

/// Terminal reasons a submission can be rejected. Every failure on the
/// submission path surfaces as exactly one of these; internal errors never
/// leak to the caller. None of them is retried: the caller may only submit a
/// fresh request, which the one-vote invariant will block if the voter was
/// already marked.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Rejection {
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error("voter has already cast their vote")]
    AlreadyVoted,
    #[error("no voter is registered under the presented identity")]
    UnknownVoter,
    #[error(transparent)]
    UnknownCandidate(#[from] UnknownCandidate),
}

impl From<RegistryError> for Rejection {
    fn from(err: RegistryError) -> Self {
        match err {
            RegistryError::AlreadyVoted => Self::AlreadyVoted,
            RegistryError::NotFound => Self::UnknownVoter,
        }
    }
}

impl Rejection {
    /// Stable HTTP-style status for the transport layer, so clients can tell
    /// "get a new token" from "you already voted" from "bad request".
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Auth(_) => 401,
            Self::Decode(_) | Self::UnknownCandidate(_) => 400,
            Self::AlreadyVoted => 403,
            Self::UnknownVoter => 404,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_errors_map_to_distinct_rejections() {
        assert_eq!(
            Rejection::AlreadyVoted,
            Rejection::from(RegistryError::AlreadyVoted)
        );
        assert_eq!(
            Rejection::UnknownVoter,
            Rejection::from(RegistryError::NotFound)
        );
    }

    #[test]
    fn status_codes_are_stable() {
        assert_eq!(401, Rejection::Auth(AuthError::Expired).status_code());
        assert_eq!(403, Rejection::AlreadyVoted.status_code());
        assert_eq!(404, Rejection::UnknownVoter.status_code());
        assert_eq!(
            400,
            Rejection::UnknownCandidate(UnknownCandidate("nobody".to_string())).status_code()
        );
    }
}
