pub mod memory;
pub mod team;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::Team;

/// Key-value access to jury partitions: one list of teams per jury.
#[async_trait]
pub trait TeamRepository: Send + Sync {
    /// Load every team of the jury's partition.
    async fn get(&self, jury_name: &str) -> Result<Vec<Team>>;

    /// Replace the jury's partition wholesale.
    async fn put(&self, jury_name: &str, teams: &[Team]) -> Result<()>;

    /// Identifies the storage partition backing `jury_name`.
    ///
    /// Juries that share a partition return the same key, so callers can
    /// serialize read-modify-write cycles per partition.
    fn partition_of(&self, jury_name: &str) -> String {
        jury_name.to_string()
    }
}
