//! Shared test infrastructure for the catalog crates
//!
//! - `TestDatabase`: PostgreSQL container with the catalog schema migrated (feature: "postgres")
//! - `TestRedis`: Redis container exposing a `ConnectionManager` (feature: "redis")
//! - `TestDataBuilder`: deterministic identifiers and SKUs
//! - `assertions`: ordering helpers for hydrated pages
//!
//! Container-backed tests need Docker and are marked `#[ignore]`:
//!
//! ```rust,ignore
//! use test_utils::{TestDatabase, TestDataBuilder};
//!
//! #[tokio::test]
//! #[ignore] // Requires Docker
//! async fn fetches_in_rank_order() {
//!     let db = TestDatabase::new().await;
//!     let data = TestDataBuilder::from_test_name("fetches_in_rank_order");
//!     let id = data.uuid("variant", 1);
//! }
//! ```

use uuid::Uuid;

#[cfg(feature = "postgres")]
mod postgres;

#[cfg(feature = "redis")]
mod redis;

#[cfg(feature = "postgres")]
pub use postgres::TestDatabase;

#[cfg(feature = "redis")]
pub use redis::TestRedis;

/// Deterministic test data derived from a seed
///
/// Two builders created from the same test name produce the same ids, so a
/// failing test reproduces exactly.
pub struct TestDataBuilder {
    seed: u64,
}

impl TestDataBuilder {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// Seed from a hash of the test name
    pub fn from_test_name(name: &str) -> Self {
        Self::new(hash_of(&name))
    }

    /// A UUID unique to (seed, kind, n)
    pub fn uuid(&self, kind: &str, n: u64) -> Uuid {
        let high = hash_of(&(self.seed, kind)).to_be_bytes();
        let low = hash_of(&(self.seed, kind, n)).to_be_bytes();

        let mut bytes = [0u8; 16];
        bytes[..8].copy_from_slice(&high);
        bytes[8..].copy_from_slice(&low);
        uuid::Builder::from_random_bytes(bytes).into_uuid()
    }

    /// A SKU unique to (seed, n), e.g. `SKU-1a2b3c4d-0007`
    pub fn sku(&self, n: u64) -> String {
        format!("SKU-{:08x}-{:04}", self.seed as u32, n)
    }
}

fn hash_of<T: std::hash::Hash>(value: &T) -> u64 {
    use std::collections::hash_map::DefaultHasher;
    use std::hash::Hasher;

    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

/// Test assertion helpers
pub mod assertions {
    use uuid::Uuid;

    /// Assert that `actual` lists exactly `expected`, in the same order
    pub fn assert_ids_in_order(actual: &[Uuid], expected: &[Uuid], context: &str) {
        assert_eq!(
            actual, expected,
            "{}: expected ids in order {:?}, got {:?}",
            context, expected, actual
        );
    }

    /// Assert that `subset` appears in `ranking` in the same relative order
    pub fn assert_preserves_relative_order(subset: &[Uuid], ranking: &[Uuid], context: &str) {
        let positions: Vec<usize> = subset
            .iter()
            .map(|id| {
                ranking
                    .iter()
                    .position(|r| r == id)
                    .unwrap_or_else(|| panic!("{}: {} missing from ranking", context, id))
            })
            .collect();

        assert!(
            positions.windows(2).all(|w| w[0] < w[1]),
            "{}: {:?} is not ordered like {:?}",
            context,
            subset,
            ranking
        );
    }
}
