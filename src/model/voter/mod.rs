use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

pub mod registry;

/// Opaque unique identifier for a registered voter. Issued by the
/// registration layer and immutable once created; this crate never inspects
/// its contents.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identity(String);

impl Identity {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for Identity {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Identity {
    fn from(inner: &str) -> Self {
        Self(inner.to_string())
    }
}

impl From<String> for Identity {
    fn from(inner: String) -> Self {
        Self(inner)
    }
}

/// A voter's registration state as seen by the submission path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoterRecord {
    pub identity: Identity,
    pub has_voted: bool,
}
