use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, bail};
use jury_storage::JuryPartitions;
use serde::Deserialize;

/// One jury member: login, team file and the spreadsheet their scores land in.
#[derive(Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JuryProfile {
    pub name: String,
    pub email: String,
    pub password: String,
    pub teams_file: PathBuf,
    pub sheet_link: String,
}

impl fmt::Debug for JuryProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JuryProfile")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("teams_file", &self.teams_file)
            .field("sheet_link", &self.sheet_link)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub juries: Vec<JuryProfile>,
    pub fallback_teams_file: PathBuf,
    pub default_jury_name: String,
    pub evaluation_webhook_url: String,
    pub status_webhook_url: String,
    pub team_status_sheet_id: String,
    pub relay_timeout: Duration,
    pub dead_letter_path: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let jury_config_path =
            std::env::var("JURY_CONFIG_PATH").unwrap_or_else(|_| "juries.json".to_string());
        let juries = load_juries(Path::new(&jury_config_path))?;

        let default_jury_name = match std::env::var("DEFAULT_JURY_NAME") {
            Ok(name) if !name.trim().is_empty() => name,
            _ => juries
                .first()
                .map(|j| j.name.clone())
                .context("JURY_CONFIG_PATH must list at least one jury")?,
        };

        Ok(Self {
            host: std::env::var("HOST").context("Cannot load HOST env variable")?,
            port: std::env::var("PORT")
                .context("Cannot load PORT env variable")?
                .parse()
                .context("PORT must be a number")?,
            juries,
            fallback_teams_file: std::env::var("FALLBACK_TEAMS_FILE")
                .unwrap_or_else(|_| "data.json".to_string())
                .into(),
            default_jury_name,
            evaluation_webhook_url: std::env::var("EVALUATION_WEBHOOK_URL")
                .context("Cannot load EVALUATION_WEBHOOK_URL env variable")?,
            status_webhook_url: std::env::var("STATUS_WEBHOOK_URL")
                .context("Cannot load STATUS_WEBHOOK_URL env variable")?,
            team_status_sheet_id: std::env::var("TEAM_STATUS_SHEET_ID")
                .context("Cannot load TEAM_STATUS_SHEET_ID env variable")?,
            relay_timeout: Duration::from_secs(match std::env::var("RELAY_TIMEOUT_SECS") {
                Ok(secs) => secs.parse().context("RELAY_TIMEOUT_SECS must be a number")?,
                Err(_) => 30,
            }),
            dead_letter_path: std::env::var("DEAD_LETTER_PATH").ok().map(PathBuf::from),
        })
    }

    pub fn partitions(&self) -> JuryPartitions {
        let mut partitions = JuryPartitions::new(&self.fallback_teams_file);
        for jury in &self.juries {
            partitions.insert(jury.name.clone(), jury.teams_file.clone());
        }
        partitions
    }
}

pub fn load_juries(path: &Path) -> Result<Vec<JuryProfile>> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Cannot read jury config at {}", path.display()))?;
    parse_juries(&contents).with_context(|| format!("Invalid jury config at {}", path.display()))
}

fn parse_juries(contents: &str) -> Result<Vec<JuryProfile>> {
    let juries: Vec<JuryProfile> = serde_json::from_str(contents)?;

    let mut seen = std::collections::HashSet::new();
    for jury in &juries {
        if !seen.insert(jury.name.as_str()) {
            bail!("duplicate jury name: {}", jury.name);
        }
    }

    Ok(juries)
}

#[cfg(test)]
mod tests {
    use super::*;

    const JURIES: &str = r#"[
        {
            "name": "John Doe 1",
            "email": "jury1@example.com",
            "password": "secret-1",
            "teamsFile": "data/jury1.json",
            "sheetLink": "https://sheets.example/1"
        },
        {
            "name": "John Doe 2",
            "email": "jury2@example.com",
            "password": "secret-2",
            "teamsFile": "data/jury2.json",
            "sheetLink": "https://sheets.example/2"
        }
    ]"#;

    #[test]
    fn test_parse_juries() {
        let juries = parse_juries(JURIES).unwrap();
        assert_eq!(juries.len(), 2);
        assert_eq!(juries[1].teams_file, PathBuf::from("data/jury2.json"));
    }

    #[test]
    fn test_duplicate_jury_names_rejected() {
        let doubled = JURIES.replace("John Doe 2", "John Doe 1");
        assert!(parse_juries(&doubled).is_err());
    }

    #[test]
    fn test_debug_hides_password() {
        let juries = parse_juries(JURIES).unwrap();
        assert!(!format!("{:?}", juries[0]).contains("secret-1"));
    }

    #[test]
    fn test_partitions_use_fallback_for_unknown_jury() {
        let config = Config {
            host: "127.0.0.1".to_string(),
            port: 0,
            juries: parse_juries(JURIES).unwrap(),
            fallback_teams_file: "data.json".into(),
            default_jury_name: "John Doe 1".to_string(),
            evaluation_webhook_url: String::new(),
            status_webhook_url: String::new(),
            team_status_sheet_id: String::new(),
            relay_timeout: Duration::from_secs(1),
            dead_letter_path: None,
        };

        let partitions = config.partitions();
        assert_eq!(partitions.resolve("John Doe 1"), Path::new("data/jury1.json"));
        assert_eq!(partitions.resolve("JURY 9"), Path::new("data.json"));
    }
}
