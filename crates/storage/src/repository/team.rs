use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use uuid::Uuid;

use super::TeamRepository;
use crate::error::{Result, StorageError};
use crate::models::Team;

/// Maps jury names to their team files, with a fallback file for any name
/// that is not configured.
#[derive(Debug, Clone)]
pub struct JuryPartitions {
    files: HashMap<String, PathBuf>,
    fallback: PathBuf,
}

impl JuryPartitions {
    pub fn new(fallback: impl Into<PathBuf>) -> Self {
        Self {
            files: HashMap::new(),
            fallback: fallback.into(),
        }
    }

    pub fn with_jury(mut self, jury_name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        self.insert(jury_name, path);
        self
    }

    pub fn insert(&mut self, jury_name: impl Into<String>, path: impl Into<PathBuf>) {
        self.files.insert(jury_name.into(), path.into());
    }

    /// Exact-match lookup; unknown names resolve to the fallback file.
    pub fn resolve(&self, jury_name: &str) -> &Path {
        self.files
            .get(jury_name)
            .map(PathBuf::as_path)
            .unwrap_or(self.fallback.as_path())
    }
}

/// Team store backed by one pretty-printed JSON array per jury.
#[derive(Debug, Clone)]
pub struct FileTeamRepository {
    partitions: JuryPartitions,
}

impl FileTeamRepository {
    pub fn new(partitions: JuryPartitions) -> Self {
        Self { partitions }
    }
}

#[async_trait]
impl TeamRepository for FileTeamRepository {
    async fn get(&self, jury_name: &str) -> Result<Vec<Team>> {
        let path = self.partitions.resolve(jury_name);
        let path_str = path.display().to_string();

        let contents = match tokio::fs::read(path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::warn!("Team file {} does not exist, treating as empty", path_str);
                return Ok(Vec::new());
            }
            Err(e) => return Err(StorageError::io(path_str, e)),
        };

        let teams: Vec<Team> =
            serde_json::from_slice(&contents).map_err(|e| StorageError::json(&path_str, e))?;

        tracing::debug!("Loaded {} teams for jury {} from {}", teams.len(), jury_name, path_str);

        Ok(teams)
    }

    async fn put(&self, jury_name: &str, teams: &[Team]) -> Result<()> {
        let path = self.partitions.resolve(jury_name);
        let path_str = path.display().to_string();

        let json = serde_json::to_vec_pretty(teams).map_err(|e| StorageError::json(&path_str, e))?;

        // Write next to the target and rename over it so readers never see a
        // half-written file.
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "teams.json".to_string());
        let tmp = path.with_file_name(format!(".{}.{}.tmp", file_name, Uuid::new_v4()));

        tokio::fs::write(&tmp, &json)
            .await
            .map_err(|e| StorageError::io(tmp.display().to_string(), e))?;

        if let Err(e) = tokio::fs::rename(&tmp, path).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(StorageError::io(path_str, e));
        }

        tracing::debug!("Wrote {} teams for jury {} to {}", teams.len(), jury_name, path_str);

        Ok(())
    }

    fn partition_of(&self, jury_name: &str) -> String {
        self.partitions.resolve(jury_name).display().to_string()
    }
}
