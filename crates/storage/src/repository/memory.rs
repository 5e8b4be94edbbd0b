use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::TeamRepository;
use crate::error::Result;
use crate::models::Team;

/// Team store kept entirely in memory.
///
/// Resolves jury names like the file store: configured juries own a
/// partition, every other name shares the fallback partition.
#[derive(Debug)]
pub struct InMemoryTeamRepository {
    juries: HashSet<String>,
    fallback: String,
    partitions: RwLock<HashMap<String, Vec<Team>>>,
}

impl InMemoryTeamRepository {
    pub fn new(fallback: impl Into<String>) -> Self {
        Self {
            juries: HashSet::new(),
            fallback: fallback.into(),
            partitions: RwLock::new(HashMap::new()),
        }
    }

    pub fn with_jury(mut self, jury_name: impl Into<String>, teams: Vec<Team>) -> Self {
        let jury_name = jury_name.into();
        self.partitions.get_mut().insert(jury_name.clone(), teams);
        self.juries.insert(jury_name);
        self
    }

    fn resolve<'a>(&'a self, jury_name: &'a str) -> &'a str {
        if self.juries.contains(jury_name) {
            jury_name
        } else {
            &self.fallback
        }
    }
}

#[async_trait]
impl TeamRepository for InMemoryTeamRepository {
    async fn get(&self, jury_name: &str) -> Result<Vec<Team>> {
        Ok(self
            .partitions
            .read()
            .await
            .get(self.resolve(jury_name))
            .cloned()
            .unwrap_or_default())
    }

    async fn put(&self, jury_name: &str, teams: &[Team]) -> Result<()> {
        self.partitions
            .write()
            .await
            .insert(self.resolve(jury_name).to_string(), teams.to_vec());
        Ok(())
    }

    fn partition_of(&self, jury_name: &str) -> String {
        self.resolve(jury_name).to_string()
    }
}
