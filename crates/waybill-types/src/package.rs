use std::fmt;

use chrono::Utc;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Prefix of every generated package ID.
pub const PACKAGE_ID_PREFIX: &str = "PKG";

/// Length of the random suffix of a generated package ID.
pub const SUFFIX_LEN: usize = 6;

const SUFFIX_ALPHABET: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Identifier of a shipment package.
///
/// Generated IDs have the shape `PKG-<unix millis>-<6 chars of [0-9a-z]>`,
/// giving 36^6 combinations per millisecond. Uniqueness is probabilistic:
/// nothing is checked against the ledger. IDs minted elsewhere are accepted
/// as-is as long as they are non-empty.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PackageId(String);

impl PackageId {
    /// Generate a new package ID for the current time.
    pub fn generate() -> Self {
        Self::generate_at(Utc::now().timestamp_millis(), &mut rand::thread_rng())
    }

    /// Generate a package ID for an explicit millisecond timestamp.
    pub fn generate_at<R: Rng>(unix_ms: i64, rng: &mut R) -> Self {
        let suffix: String = (0..SUFFIX_LEN)
            .map(|_| SUFFIX_ALPHABET[rng.gen_range(0..SUFFIX_ALPHABET.len())] as char)
            .collect();
        Self(format!("{PACKAGE_ID_PREFIX}-{unix_ms}-{suffix}"))
    }

    /// Accept an externally supplied package ID.
    pub fn parse(s: &str) -> Result<Self, TypeError> {
        if s.is_empty() {
            return Err(TypeError::EmptyPackageId);
        }
        Ok(Self(s.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for PackageId {
    type Error = TypeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if value.is_empty() {
            return Err(TypeError::EmptyPackageId);
        }
        Ok(Self(value))
    }
}

impl From<PackageId> for String {
    fn from(id: PackageId) -> Self {
        id.0
    }
}

impl std::str::FromStr for PackageId {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Debug for PackageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PackageId({})", self.0)
    }
}

impl fmt::Display for PackageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;

    fn assert_generated_shape(id: &PackageId) {
        let parts: Vec<&str> = id.as_str().split('-').collect();
        assert_eq!(parts.len(), 3, "unexpected shape: {id}");
        assert_eq!(parts[0], "PKG");
        assert!(!parts[1].is_empty());
        assert!(parts[1].chars().all(|c| c.is_ascii_digit()));
        assert_eq!(parts[2].len(), SUFFIX_LEN);
        assert!(parts[2]
            .chars()
            .all(|c| c.is_ascii_digit() || c.is_ascii_lowercase()));
    }

    #[test]
    fn generated_ids_are_distinct_and_well_formed() {
        let a = PackageId::generate();
        let b = PackageId::generate();
        assert_ne!(a, b);
        assert_generated_shape(&a);
        assert_generated_shape(&b);
    }

    #[test]
    fn generate_at_embeds_timestamp() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(7);
        let id = PackageId::generate_at(1_708_164_000_123, &mut rng);
        assert!(id.as_str().starts_with("PKG-1708164000123-"));
        assert_generated_shape(&id);
    }

    #[test]
    fn parse_rejects_empty() {
        assert_eq!(PackageId::parse(""), Err(TypeError::EmptyPackageId));
        assert_eq!(PackageId::parse("PKG-1").unwrap().as_str(), "PKG-1");
    }

    #[test]
    fn serde_is_a_plain_string() {
        let id = PackageId::parse("PKG-42-abcdef").unwrap();
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"PKG-42-abcdef\"");
        assert!(serde_json::from_str::<PackageId>("\"\"").is_err());
    }

    proptest! {
        #[test]
        fn any_timestamp_yields_well_formed_id(ms in 0i64..=9_999_999_999_999, seed in any::<u64>()) {
            let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
            let id = PackageId::generate_at(ms, &mut rng);
            assert_generated_shape(&id);
        }
    }
}
