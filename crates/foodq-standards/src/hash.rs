use sha2::{Digest, Sha256};

/// SHA-256 hex digest of several byte sequences, each terminated by a NUL
/// separator so that moving bytes between parts changes the result.
pub fn fingerprint<'a, I>(parts: I) -> String
where
    I: IntoIterator<Item = &'a [u8]>,
{
    let mut hasher = Sha256::new();
    for part in parts {
        hasher.update(part);
        hasher.update([0u8]);
    }
    hex::encode(hasher.finalize())
}
