//! Git object hashing.

use sha1::{Digest, Sha1};

/// Compute the git blob id of `content`.
///
/// Git hashes blobs as SHA-1 of `"blob {len}\0"` followed by the content, so
/// the result matches the sha the hosting service reports for the same bytes.
#[must_use]
pub fn git_blob_sha(content: &[u8]) -> String {
    let mut hasher = Sha1::new();
    hasher.update(format!("blob {}\0", content.len()).as_bytes());
    hasher.update(content);
    hex::encode(hasher.finalize())
}
