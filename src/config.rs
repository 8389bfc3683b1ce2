use chrono::Duration;
use serde::Deserialize;

/// Application configuration. The embedding server extracts this from its own
/// config source and hands it to the submission service; secrets are only
/// ever exposed as byte slices.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    // non-secrets
    #[serde(default = "default_auth_ttl")]
    auth_ttl: u32,
    #[serde(default = "default_max_vote_bytes")]
    max_vote_bytes: usize,
    // secrets
    jwt_secret: String,
    hmac_secret: String,
}

/// Credentials are valid for one hour unless configured otherwise.
fn default_auth_ttl() -> u32 {
    3600
}

fn default_max_vote_bytes() -> usize {
    1024
}

impl Config {
    /// Create a config with the default credential lifetime and payload bound.
    pub fn new(jwt_secret: impl Into<String>, hmac_secret: impl Into<String>) -> Self {
        Self {
            auth_ttl: default_auth_ttl(),
            max_vote_bytes: default_max_vote_bytes(),
            jwt_secret: jwt_secret.into(),
            hmac_secret: hmac_secret.into(),
        }
    }

    /// Override the credential lifetime in seconds.
    pub fn with_auth_ttl(mut self, seconds: u32) -> Self {
        self.auth_ttl = seconds;
        self
    }

    /// Override the maximum accepted vote payload size in bytes.
    pub fn with_max_vote_bytes(mut self, bytes: usize) -> Self {
        self.max_vote_bytes = bytes;
        self
    }

    /// Valid lifetime of issued credentials.
    pub fn auth_ttl(&self) -> Duration {
        Duration::seconds(self.auth_ttl.into())
    }

    /// Largest vote payload the decoder will look at.
    pub fn max_vote_bytes(&self) -> usize {
        self.max_vote_bytes
    }

    /// Secret key used to sign credential JWTs.
    pub fn jwt_secret(&self) -> &[u8] {
        self.jwt_secret.as_bytes()
    }

    /// Secret key used to pseudonymise voter identities.
    pub fn hmac_secret(&self) -> &[u8] {
        self.hmac_secret.as_bytes()
    }
}
