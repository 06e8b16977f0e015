//! Object identifier (SHA-1 hash)
//!
//! Object IDs are 40-character lowercase hexadecimal strings representing SHA-1
//! hashes of framed object bytes.
//!
//! ## Storage
//!
//! Objects are stored in `.dagit/objects/<first-2-chars>/<remaining-38-chars>`

use crate::artifacts::objects::OBJECT_ID_LENGTH;
use std::fmt::Write;
use std::path::PathBuf;

/// Object identifier (SHA-1 hash)
///
/// Always 40 lowercase hexadecimal characters once constructed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(String);

impl ObjectId {
    /// Parse and validate an object ID from a string
    ///
    /// Upper-case digits are accepted and normalized, so the same object is
    /// always addressed by the same path.
    pub fn try_parse(id: String) -> anyhow::Result<Self> {
        if id.len() != OBJECT_ID_LENGTH {
            anyhow::bail!("Invalid object ID length: {}", id.len());
        }
        if !id.chars().all(|c| c.is_ascii_hexdigit()) {
            anyhow::bail!("Invalid object ID characters: {}", id);
        }
        Ok(Self(id.to_ascii_lowercase()))
    }

    /// Whether `candidate` has the syntax of a full object ID
    pub fn is_valid(candidate: &str) -> bool {
        candidate.len() == OBJECT_ID_LENGTH && candidate.chars().all(|c| c.is_ascii_hexdigit())
    }

    pub(crate) fn from_digest(digest: &[u8]) -> Self {
        let hex = digest
            .iter()
            .fold(String::with_capacity(OBJECT_ID_LENGTH), |mut acc, byte| {
                let _ = write!(acc, "{byte:02x}");
                acc
            });

        Self(hex)
    }

    /// Convert to file system path for object storage
    ///
    /// Splits the hash as `XX/YYYYYY...` where XX is the first 2 chars.
    pub fn to_path(&self) -> PathBuf {
        let (dir, file) = self.0.split_at(2);
        PathBuf::from(dir).join(file)
    }

    /// First 7 characters of the hash
    pub fn to_short_oid(&self) -> String {
        self.0.split_at(7).0.to_string()
    }
}

impl AsRef<str> for ObjectId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ObjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::proptest;

    proptest! {
        #[test]
        fn any_40_hex_string_parses(id in "[0-9a-fA-F]{40}") {
            let oid = ObjectId::try_parse(id.clone()).unwrap();
            assert_eq!(oid.as_ref(), id.to_ascii_lowercase());
        }

        #[test]
        fn wrong_length_is_rejected(id in "[0-9a-f]{1,39}") {
            assert!(ObjectId::try_parse(id).is_err());
        }
    }

    #[test]
    fn non_hex_characters_are_rejected() {
        let id = "g".repeat(OBJECT_ID_LENGTH);
        assert!(ObjectId::try_parse(id.clone()).is_err());
        assert!(!ObjectId::is_valid(&id));
    }

    #[test]
    fn path_is_split_after_two_characters() {
        let oid = ObjectId::try_parse("b6fc4c620b67d95f953a5c1c1230aaab5db5a1b0".to_string())
            .unwrap();

        assert_eq!(
            oid.to_path(),
            PathBuf::from("b6").join("fc4c620b67d95f953a5c1c1230aaab5db5a1b0")
        );
        assert_eq!(oid.to_short_oid(), "b6fc4c6");
    }

    #[test]
    fn digest_is_rendered_as_lowercase_hex() {
        let oid = ObjectId::from_digest(&[0xAB; 20]);
        assert_eq!(oid.as_ref(), "ab".repeat(20));
    }
}
