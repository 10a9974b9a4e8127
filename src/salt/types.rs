//! Salt service wire schema and response types.

use serde::Deserialize;

use crate::error::AttemptError;

/// JSON body returned by the salt service.
#[derive(Debug, Deserialize)]
pub struct SaltWire {
    /// salt2 as hex.
    pub s2: String,
    /// Version id the returned salt belongs to.
    pub vid: Option<u64>,
    /// Newer salt2, present when a newer version exists and the caller
    /// pinned an older one.
    pub new_s2: Option<String>,
    /// Version id for `new_s2`.
    pub new_vid: Option<u64>,
}

/// Result of a successful salt retrieval.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaltResponse {
    pub salt2_hex: String,
    /// Version the returned salt corresponds to. Always the requested
    /// version when one was specified.
    pub version_id: u64,
    /// Upgrade salt, only when a specific version was requested and the
    /// server reports newer settings.
    pub new_salt2_hex: Option<String>,
    pub new_version_id: Option<u64>,
}

impl SaltResponse {
    /// Interpret the wire body for the version that was actually requested.
    ///
    /// A pinned request answers with the requested version plus any upgrade
    /// fields the server offered. A latest request answers with the server's
    /// reported version and never carries upgrade fields.
    pub fn from_wire(wire: SaltWire, requested: Option<u64>) -> Result<Self, AttemptError> {
        if hex::decode(&wire.s2).is_err() {
            return Err(AttemptError::Remote("'s2' is not valid hex".into()));
        }
        if let Some(new_s2) = &wire.new_s2 {
            if hex::decode(new_s2).is_err() {
                return Err(AttemptError::Remote("'new_s2' is not valid hex".into()));
            }
        }

        match requested {
            Some(version_id) => Ok(Self {
                salt2_hex: wire.s2,
                version_id,
                new_salt2_hex: wire.new_s2,
                new_version_id: wire.new_vid,
            }),
            None => {
                let version_id = wire
                    .vid
                    .ok_or_else(|| AttemptError::Remote("response missing 'vid'".into()))?;
                Ok(Self {
                    salt2_hex: wire.s2,
                    version_id,
                    new_salt2_hex: None,
                    new_version_id: None,
                })
            }
        }
    }

    /// Whether the server advertised newer settings usable for an upgrade.
    pub fn upgrade(&self) -> Option<(u64, &str)> {
        match (self.new_version_id, self.new_salt2_hex.as_deref()) {
            (Some(vid), Some(salt)) => Some((vid, salt)),
            _ => None,
        }
    }
}
