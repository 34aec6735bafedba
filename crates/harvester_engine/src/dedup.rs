use std::collections::HashSet;
use std::fmt;

use sha2::{Digest, Sha256};

const SHORT_LEN: usize = 8;

/// Lower-case hex SHA-256 of a payload.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContentDigest(String);

impl ContentDigest {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// First eight hex characters, used in file names.
    pub fn short(&self) -> &str {
        &self.0[..SHORT_LEN]
    }
}

impl fmt::Display for ContentDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

pub fn content_digest(bytes: &[u8]) -> ContentDigest {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    let digest = hasher.finalize();
    let mut hex = String::with_capacity(digest.len() * 2);
    for byte in digest.iter() {
        use std::fmt::Write;
        let _ = write!(&mut hex, "{byte:02x}");
    }
    ContentDigest(hex)
}

/// Digests seen during one run. Never persisted; a new run starts with a new index.
#[derive(Debug, Default)]
pub struct DedupIndex {
    seen: HashSet<ContentDigest>,
}

impl DedupIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_duplicate(&self, digest: &ContentDigest) -> bool {
        self.seen.contains(digest)
    }

    pub fn record(&mut self, digest: ContentDigest) {
        self.seen.insert(digest);
    }

    /// Record `digest` and report whether it was new. The first caller for a digest wins.
    pub fn check_and_record(&mut self, digest: &ContentDigest) -> bool {
        self.seen.insert(digest.clone())
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}
