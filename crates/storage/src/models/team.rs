use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A competition team as stored in a jury's team file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    pub team_id: i64,
    pub team_name: String,
    #[serde(default)]
    pub is_evaluated: bool,
    #[serde(default)]
    pub is_updated: bool,
}

/// Where a team sits in its evaluation lifecycle.
///
/// The only transitions are `Unevaluated -> Evaluated -> Updated`, and
/// `Updated` is absorbing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvaluationState {
    Unevaluated,
    Evaluated,
    Updated,
}

impl Team {
    pub fn new(team_id: i64, team_name: impl Into<String>) -> Self {
        Self {
            team_id,
            team_name: team_name.into(),
            is_evaluated: false,
            is_updated: false,
        }
    }

    pub fn state(&self) -> EvaluationState {
        match (self.is_evaluated, self.is_updated) {
            (false, _) => EvaluationState::Unevaluated,
            (true, false) => EvaluationState::Evaluated,
            (true, true) => EvaluationState::Updated,
        }
    }

    /// Applies a successful submission to the stored flags.
    ///
    /// `was_already_evaluated` must be the `is_evaluated` value observed
    /// before the submission was relayed. `is_updated` is only ever raised,
    /// never cleared.
    pub fn record_evaluation(&mut self, was_already_evaluated: bool) {
        self.is_evaluated = true;
        if was_already_evaluated {
            self.is_updated = true;
        }
    }

    /// Matches the team against a free-text search.
    ///
    /// A numeric query selects by exact id, anything else is a
    /// case-insensitive substring match on the name. Blank queries match all.
    pub fn matches_search(&self, query: &str) -> bool {
        let query = query.trim();
        if query.is_empty() {
            return true;
        }

        match query.parse::<i64>() {
            Ok(id) => self.team_id == id,
            Err(_) => self
                .team_name
                .to_lowercase()
                .contains(&query.to_lowercase()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_evaluation_sets_only_evaluated() {
        let mut team = Team::new(7, "Foo");
        assert_eq!(team.state(), EvaluationState::Unevaluated);

        team.record_evaluation(false);

        assert!(team.is_evaluated);
        assert!(!team.is_updated);
        assert_eq!(team.state(), EvaluationState::Evaluated);
    }

    #[test]
    fn test_reevaluation_sets_updated() {
        let mut team = Team::new(7, "Foo");
        team.record_evaluation(false);
        team.record_evaluation(true);

        assert_eq!(team.state(), EvaluationState::Updated);
    }

    #[test]
    fn test_updated_is_absorbing() {
        let mut team = Team {
            team_id: 3,
            team_name: "Bar".to_string(),
            is_evaluated: true,
            is_updated: true,
        };

        // A stale "not yet evaluated" observation must not clear the flag.
        team.record_evaluation(false);

        assert_eq!(team.state(), EvaluationState::Updated);
    }

    #[test]
    fn test_wire_format_is_camel_case() {
        let team: Team = serde_json::from_str(
            r#"{"teamId": 12, "teamName": "Rustaceans", "isEvaluated": true, "isUpdated": false}"#,
        )
        .unwrap();
        assert_eq!(team.team_id, 12);
        assert_eq!(team.state(), EvaluationState::Evaluated);

        let value = serde_json::to_value(&team).unwrap();
        assert_eq!(value["teamName"], "Rustaceans");
        assert_eq!(value["isUpdated"], false);
    }

    #[test]
    fn test_missing_flags_default_to_false() {
        let team: Team = serde_json::from_str(r#"{"teamId": 1, "teamName": "Seed"}"#).unwrap();
        assert_eq!(team.state(), EvaluationState::Unevaluated);
    }

    #[test]
    fn test_search_by_id_and_name() {
        let team = Team::new(42, "Byte Busters");

        assert!(team.matches_search(""));
        assert!(team.matches_search("  "));
        assert!(team.matches_search("42"));
        assert!(!team.matches_search("4"));
        assert!(team.matches_search("byte"));
        assert!(team.matches_search("BUSTERS"));
        assert!(!team.matches_search("crabs"));
    }
}
