//! Stable content hash of a [`RuleSet`](crate::RuleSet).
//!
//! The evaluator never caches. Hosts that keep their own cache of
//! visibility decisions can key it on this fingerprint so entries are
//! invalidated whenever the rule set changes.

use crate::{BlockvisError, RuleSet};

/// Truncated BLAKE3 hash of the persisted JSON form.
pub type Fingerprint = [u8; 16];

impl RuleSet {
    /// Hash the persisted JSON form with BLAKE3, truncated to 16 bytes.
    ///
    /// Rule ids are part of the hash, so two rule sets that differ only in
    /// ids have different fingerprints.
    ///
    /// # Errors
    ///
    /// Returns [`BlockvisError::Json`] if serialization fails.
    pub fn fingerprint(&self) -> Result<Fingerprint, BlockvisError> {
        let payload = serde_json::to_vec(self)?;
        let hash = blake3::hash(&payload);
        let mut out = [0u8; 16];
        out.copy_from_slice(&hash.as_bytes()[..16]);
        Ok(out)
    }
}
