//! Domain types for the Kith personal social graph.
//!
//! Persons are stored as `:Person` nodes and relationships as directed
//! `:KNOWS` edges, though every read query treats the edge symmetrically.
//! Wire representation is camelCase to match the external API surface;
//! database property names stay snake_case.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Trust level bounds for a KNOWS relationship (inclusive).
pub const TRUST_LEVEL_MIN: i64 = 1;
pub const TRUST_LEVEL_MAX: i64 = 5;

/// Default trust level when none is supplied.
pub const TRUST_LEVEL_DEFAULT: i64 = 3;

// ── Persisted entities ────────────────────────────────────────────

/// A person in the graph. At most one person carries `is_user: true`,
/// marking the graph owner and the viewpoint for degree computations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    pub id: String,
    pub name: String,
    pub bio: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub offers: Option<String>,
    pub seeks: Option<String>,
    pub is_user: bool,
    pub created_at: DateTime<Utc>,
    pub city: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

// ── View types (computed per request, never persisted) ────────────

/// A first-degree connection: a person plus the KNOWS edge linking
/// them to the queried subject.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection {
    pub person: Person,
    pub relationship_id: String,
    pub since: Option<NaiveDate>,
    pub trust_level: i64,
    pub context: Option<String>,
    pub notes: Option<String>,
}

/// A person reachable through exactly one intermediate, paired with
/// that intermediate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecondDegreeConnection {
    pub person: Person,
    pub connected_via: Person,
}

/// Node projection for graph visualization. `degree` is the hop
/// distance from the user node: 0 = user, 1 = first-degree,
/// 2 = second-degree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonNode {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub is_user: bool,
    pub degree: i64,
    pub city: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// Edge projection for graph visualization. Each undirected pair is
/// emitted once, with the lower id as `source`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelationshipEdge {
    pub id: String,
    pub source: String,
    pub target: String,
    pub trust_level: i64,
    pub context: Option<String>,
}

/// Complete node/edge projection for visualization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphData {
    pub nodes: Vec<PersonNode>,
    pub edges: Vec<RelationshipEdge>,
}

// ── Input types ───────────────────────────────────────────────────

/// Mutable fields of a person. Used for both create and update;
/// id, user flag, and creation timestamp are never caller-supplied.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonInput {
    pub name: String,
    pub bio: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub offers: Option<String>,
    pub seeks: Option<String>,
    pub city: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// Mutable fields of a KNOWS relationship.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionInput {
    pub since: Option<NaiveDate>,
    #[serde(default = "default_trust_level")]
    pub trust_level: i64,
    pub context: Option<String>,
    pub notes: Option<String>,
}

impl ConnectionInput {
    /// Reject out-of-range trust levels before any query executes.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !(TRUST_LEVEL_MIN..=TRUST_LEVEL_MAX).contains(&self.trust_level) {
            return Err(ValidationError(format!(
                "trust level must be between {TRUST_LEVEL_MIN} and {TRUST_LEVEL_MAX}, got {}",
                self.trust_level
            )));
        }
        Ok(())
    }
}

impl Default for ConnectionInput {
    fn default() -> Self {
        Self {
            since: None,
            trust_level: TRUST_LEVEL_DEFAULT,
            context: None,
            notes: None,
        }
    }
}

fn default_trust_level() -> i64 {
    TRUST_LEVEL_DEFAULT
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn person_serializes_camel_case() {
        let person = Person {
            id: "p-1".to_string(),
            name: "Alex Chen".to_string(),
            bio: None,
            tags: vec!["engineering".to_string()],
            offers: None,
            seeks: None,
            is_user: false,
            created_at: Utc::now(),
            city: Some("Berlin".to_string()),
            latitude: Some(52.52),
            longitude: Some(13.405),
        };

        let json = serde_json::to_value(&person).unwrap();
        assert_eq!(json["isUser"], serde_json::json!(false));
        assert!(json.get("createdAt").is_some());
        assert!(json.get("is_user").is_none());
    }

    #[test]
    fn connection_input_defaults_trust_to_three() {
        let input: ConnectionInput = serde_json::from_str("{}").unwrap();
        assert_eq!(input.trust_level, TRUST_LEVEL_DEFAULT);
        assert!(input.since.is_none());
        assert!(input.validate().is_ok());
    }

    #[test]
    fn connection_input_rejects_out_of_range_trust() {
        for trust in [0, 6, -1, 100] {
            let input = ConnectionInput {
                trust_level: trust,
                ..Default::default()
            };
            assert!(input.validate().is_err(), "trust {trust} should be rejected");
        }
        for trust in TRUST_LEVEL_MIN..=TRUST_LEVEL_MAX {
            let input = ConnectionInput {
                trust_level: trust,
                ..Default::default()
            };
            assert!(input.validate().is_ok(), "trust {trust} should be accepted");
        }
    }

    #[test]
    fn person_input_tags_default_empty() {
        let input: PersonInput = serde_json::from_str(r#"{"name": "Maria"}"#).unwrap();
        assert_eq!(input.name, "Maria");
        assert!(input.tags.is_empty());
        assert!(input.latitude.is_none());
    }

    #[test]
    fn connection_input_parses_since_date() {
        let input: ConnectionInput =
            serde_json::from_str(r#"{"since": "2018-03-15", "trustLevel": 5}"#).unwrap();
        assert_eq!(input.trust_level, 5);
        assert_eq!(
            input.since,
            Some(NaiveDate::from_ymd_opt(2018, 3, 15).unwrap())
        );
    }
}
