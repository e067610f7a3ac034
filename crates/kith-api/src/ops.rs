//! The graph-operation surface: typed operations, the response
//! envelope, and dispatch onto the data access layer.
//!
//! Each operation forwards verbatim to exactly one kith-graph call; no
//! business logic lives here.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use kith_core::{ConnectionInput, PersonInput};
use kith_graph::{GraphClient, GraphError};

/// A single graph operation, tagged by name.
///
/// Wire shape: `{"operation": "createPerson", "params": {...}}`;
/// operations without parameters omit `params`.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "operation", content = "params", rename_all = "camelCase")]
pub enum Operation {
    // Queries
    Me,
    #[serde(rename_all = "camelCase")]
    Person { id: String },
    #[serde(rename_all = "camelCase")]
    People {
        #[serde(default)]
        tags: Option<Vec<String>>,
    },
    #[serde(rename_all = "camelCase")]
    Graph {
        #[serde(default = "default_depth")]
        depth: i64,
    },
    #[serde(rename_all = "camelCase")]
    Connections { id: String },
    #[serde(rename_all = "camelCase")]
    SecondDegreeConnections { id: String },

    // Mutations
    #[serde(rename_all = "camelCase")]
    CreatePerson { input: PersonInput },
    #[serde(rename_all = "camelCase")]
    UpdatePerson { id: String, input: PersonInput },
    #[serde(rename_all = "camelCase")]
    DeletePerson { id: String },
    #[serde(rename_all = "camelCase")]
    SetAsMe { id: String },
    #[serde(rename_all = "camelCase")]
    CreateConnection {
        from_id: String,
        to_id: String,
        input: ConnectionInput,
    },
    #[serde(rename_all = "camelCase")]
    UpdateConnection {
        relationship_id: String,
        input: ConnectionInput,
    },
    #[serde(rename_all = "camelCase")]
    DeleteConnection { relationship_id: String },
}

fn default_depth() -> i64 {
    2
}

/// Response envelope: `data` on success, `errors` on failure, always
/// HTTP 200 (response-level error entries, not status codes).
#[derive(Debug, Serialize, Deserialize)]
pub struct OpResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<OpError>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct OpError {
    pub message: String,
    pub code: String,
}

impl OpResponse {
    pub fn data(value: Value) -> Self {
        Self {
            data: Some(value),
            errors: Vec::new(),
        }
    }

    pub fn error(err: &GraphError) -> Self {
        Self {
            data: None,
            errors: vec![OpError {
                message: err.to_string(),
                code: error_code(err).to_string(),
            }],
        }
    }
}

/// Map the graph-layer error taxonomy to response error codes.
pub fn error_code(err: &GraphError) -> &'static str {
    match err {
        GraphError::NotFound { .. } => "NOT_FOUND",
        GraphError::Validation(_) => "VALIDATION",
        GraphError::Connection(_) => "UNAVAILABLE",
        GraphError::Query(_) | GraphError::Serialization(_) => "INTERNAL",
    }
}

/// Execute one operation against the data access layer.
pub async fn dispatch(client: &GraphClient, op: Operation) -> Result<Value, GraphError> {
    match op {
        Operation::Me => to_value(&client.get_user().await?),
        Operation::Person { id } => to_value(&client.get_person(&id).await?),
        Operation::People { tags } => to_value(&client.get_people(tags.as_deref()).await?),
        Operation::Graph { depth } => to_value(&client.get_graph_data(depth).await?),
        Operation::Connections { id } => to_value(&client.get_connections(&id).await?),
        Operation::SecondDegreeConnections { id } => {
            to_value(&client.get_second_degree_connections(&id).await?)
        }
        Operation::CreatePerson { input } => to_value(&client.create_person(&input).await?),
        Operation::UpdatePerson { id, input } => {
            to_value(&client.update_person(&id, &input).await?)
        }
        Operation::DeletePerson { id } => to_value(&client.delete_person(&id).await?),
        Operation::SetAsMe { id } => to_value(&client.set_as_user(&id).await?),
        Operation::CreateConnection {
            from_id,
            to_id,
            input,
        } => to_value(&client.create_connection(&from_id, &to_id, &input).await?),
        Operation::UpdateConnection {
            relationship_id,
            input,
        } => to_value(&client.update_connection(&relationship_id, &input).await?),
        Operation::DeleteConnection { relationship_id } => {
            to_value(&client.delete_connection(&relationship_id).await?)
        }
    }
}

fn to_value<T: Serialize>(value: &T) -> Result<Value, GraphError> {
    serde_json::to_value(value).map_err(|e| GraphError::Serialization(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use kith_core::ValidationError;

    #[test]
    fn parses_parameterless_query() {
        let op: Operation = serde_json::from_str(r#"{"operation": "me"}"#).unwrap();
        assert!(matches!(op, Operation::Me));
    }

    #[test]
    fn parses_graph_with_default_depth() {
        let op: Operation =
            serde_json::from_str(r#"{"operation": "graph", "params": {}}"#).unwrap();
        assert!(matches!(op, Operation::Graph { depth: 2 }));

        let op: Operation =
            serde_json::from_str(r#"{"operation": "graph", "params": {"depth": 1}}"#).unwrap();
        assert!(matches!(op, Operation::Graph { depth: 1 }));
    }

    #[test]
    fn parses_create_connection_camel_case() {
        let op: Operation = serde_json::from_str(
            r#"{
                "operation": "createConnection",
                "params": {
                    "fromId": "a",
                    "toId": "b",
                    "input": {"trustLevel": 4, "context": "met at a conference"}
                }
            }"#,
        )
        .unwrap();
        match op {
            Operation::CreateConnection {
                from_id,
                to_id,
                input,
            } => {
                assert_eq!(from_id, "a");
                assert_eq!(to_id, "b");
                assert_eq!(input.trust_level, 4);
            }
            other => panic!("unexpected operation: {other:?}"),
        }
    }

    #[test]
    fn parses_create_person_with_minimal_input() {
        let op: Operation = serde_json::from_str(
            r#"{"operation": "createPerson", "params": {"input": {"name": "Maria"}}}"#,
        )
        .unwrap();
        match op {
            Operation::CreatePerson { input } => {
                assert_eq!(input.name, "Maria");
                assert!(input.tags.is_empty());
            }
            other => panic!("unexpected operation: {other:?}"),
        }
    }

    #[test]
    fn rejects_unknown_operation() {
        let result: Result<Operation, _> =
            serde_json::from_str(r#"{"operation": "dropDatabase"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn error_codes_follow_taxonomy() {
        let not_found = GraphError::NotFound {
            label: "Person".to_string(),
            id: "x".to_string(),
        };
        assert_eq!(error_code(&not_found), "NOT_FOUND");

        let validation = GraphError::Validation(ValidationError("bad trust".to_string()));
        assert_eq!(error_code(&validation), "VALIDATION");

        let conn = GraphError::Connection("refused".to_string());
        assert_eq!(error_code(&conn), "UNAVAILABLE");

        let ser = GraphError::Serialization("oops".to_string());
        assert_eq!(error_code(&ser), "INTERNAL");
    }

    #[test]
    fn error_envelope_shape() {
        let err = GraphError::NotFound {
            label: "Person".to_string(),
            id: "missing".to_string(),
        };
        let json = serde_json::to_value(OpResponse::error(&err)).unwrap();
        assert!(json.get("data").is_none());
        assert_eq!(json["errors"][0]["code"], "NOT_FOUND");
        assert!(json["errors"][0]["message"]
            .as_str()
            .unwrap()
            .contains("missing"));
    }

    #[test]
    fn data_envelope_omits_errors() {
        let json = serde_json::to_value(OpResponse::data(serde_json::json!({"ok": true}))).unwrap();
        assert_eq!(json["data"]["ok"], true);
        assert!(json.get("errors").is_none());
    }
}
