//! Read operations for the social graph.
//!
//! Every query treats KNOWS edges direction-agnostically, even though
//! they are stored directed. Ordering and deduplication are delegated
//! to Neo4j.

use chrono::{DateTime, NaiveDate, Utc};
use neo4rs::query;

use kith_core::{
    Connection, GraphData, Person, PersonNode, RelationshipEdge, SecondDegreeConnection,
};

use crate::client::{GraphClient, GraphError};

impl GraphClient {
    // ── Person Lookups ───────────────────────────────────────────

    /// Get the person flagged as the graph owner, if any.
    pub async fn get_user(&self) -> Result<Option<Person>, GraphError> {
        let q = query("MATCH (p:Person {is_user: true}) RETURN p");

        match self.query_one(q).await? {
            Some(row) => Ok(Some(row_to_person(&row, "p")?)),
            None => Ok(None),
        }
    }

    /// Get a person by id.
    pub async fn get_person(&self, person_id: &str) -> Result<Option<Person>, GraphError> {
        let q = query("MATCH (p:Person {id: $id}) RETURN p").param("id", person_id.to_string());

        match self.query_one(q).await? {
            Some(row) => Ok(Some(row_to_person(&row, "p")?)),
            None => Ok(None),
        }
    }

    /// List all people ordered by name, optionally filtered to those
    /// whose tag set intersects `tags`.
    pub async fn get_people(&self, tags: Option<&[String]>) -> Result<Vec<Person>, GraphError> {
        let q = match tags {
            Some(tags) if !tags.is_empty() => query(
                "MATCH (p:Person)
                 WHERE any(tag IN $tags WHERE tag IN p.tags)
                 RETURN p
                 ORDER BY p.name ASC",
            )
            .param("tags", tags.to_vec()),
            _ => query(
                "MATCH (p:Person)
                 RETURN p
                 ORDER BY p.name ASC",
            ),
        };

        let rows = self.query_rows(q).await?;
        let mut people = Vec::with_capacity(rows.len());
        for row in rows {
            people.push(row_to_person(&row, "p")?);
        }
        Ok(people)
    }

    // ── Connection Queries ───────────────────────────────────────

    /// All first-degree connections of a person, ordered by trust level
    /// descending then name ascending.
    pub async fn get_connections(&self, person_id: &str) -> Result<Vec<Connection>, GraphError> {
        let q = query(
            "MATCH (p:Person {id: $id})-[r:KNOWS]-(other:Person)
             RETURN other, r
             ORDER BY r.trust_level DESC, other.name ASC",
        )
        .param("id", person_id.to_string());

        let rows = self.query_rows(q).await?;
        let mut connections = Vec::with_capacity(rows.len());
        for row in rows {
            let person = row_to_person(&row, "other")?;
            let rel: neo4rs::Relation = row
                .get("r")
                .map_err(|e| GraphError::Serialization(format!("Failed to get relation: {e}")))?;
            connections.push(relation_to_connection(person, &rel));
        }
        Ok(connections)
    }

    /// People reachable through exactly one intermediate, excluding the
    /// subject and anyone directly connected to it, one row per person.
    ///
    /// When several intermediates exist the reported one is the first
    /// by (name, id) ascending, so results are deterministic.
    pub async fn get_second_degree_connections(
        &self,
        person_id: &str,
    ) -> Result<Vec<SecondDegreeConnection>, GraphError> {
        let q = query(
            "MATCH (me:Person {id: $id})-[:KNOWS]-(friend:Person)-[:KNOWS]-(fof:Person)
             WHERE me.id <> fof.id AND NOT (me)-[:KNOWS]-(fof)
             WITH fof, friend
             ORDER BY friend.name ASC, friend.id ASC
             WITH fof, head(collect(friend)) AS via
             RETURN fof, via
             ORDER BY fof.name ASC",
        )
        .param("id", person_id.to_string());

        let rows = self.query_rows(q).await?;
        let mut results = Vec::with_capacity(rows.len());
        for row in rows {
            results.push(SecondDegreeConnection {
                person: row_to_person(&row, "fof")?,
                connected_via: row_to_person(&row, "via")?,
            });
        }
        Ok(results)
    }

    // ── Graph Projection ─────────────────────────────────────────

    /// Node/edge projection for visualization: the user at degree 0
    /// plus everyone within 2 hops at their minimum hop distance, and
    /// the KNOWS edges between included nodes (one per undirected
    /// pair, lower id first).
    ///
    /// Degraded mode: when no user node exists or `depth < 1`, all
    /// people are returned at degree 1 (0 if user-flagged) with the
    /// same edge projection.
    pub async fn get_graph_data(&self, depth: i64) -> Result<GraphData, GraphError> {
        let user_q = query("MATCH (user:Person {is_user: true}) RETURN user.id AS user_id");
        let user_id: Option<String> = match self.query_one(user_q).await? {
            Some(row) => row.get::<String>("user_id").ok(),
            None => None,
        };

        let nodes_q = if user_id.is_some() && depth >= 1 {
            query(
                "MATCH (user:Person {is_user: true})
                 OPTIONAL MATCH path = (user)-[:KNOWS*1..2]-(p:Person)
                 WHERE p.id <> user.id
                 WITH p, min(length(path)) AS degree
                 WHERE p IS NOT NULL
                 RETURN p AS person, degree
                 UNION
                 MATCH (user:Person {is_user: true})
                 RETURN user AS person, 0 AS degree",
            )
        } else {
            query(
                "MATCH (p:Person)
                 RETURN p AS person,
                        CASE WHEN p.is_user THEN 0 ELSE 1 END AS degree",
            )
        };

        let rows = self.query_rows(nodes_q).await?;
        let mut nodes = Vec::with_capacity(rows.len());
        for row in rows {
            let node: neo4rs::Node = row.get("person").map_err(|e| {
                GraphError::Serialization(format!("Failed to get graph node: {e}"))
            })?;
            let degree: i64 = row.get("degree").unwrap_or(1);
            nodes.push(node_to_person_node(&node, degree));
        }

        let node_ids: Vec<String> = nodes.iter().map(|n| n.id.clone()).collect();
        let edges = if node_ids.is_empty() {
            Vec::new()
        } else {
            let edges_q = query(
                "MATCH (a:Person)-[r:KNOWS]-(b:Person)
                 WHERE a.id IN $node_ids AND b.id IN $node_ids AND a.id < b.id
                 RETURN r.id AS id, a.id AS source, b.id AS target,
                        r.trust_level AS trust_level, r.context AS context",
            )
            .param("node_ids", node_ids);

            let rows = self.query_rows(edges_q).await?;
            let mut edges = Vec::with_capacity(rows.len());
            for row in rows {
                edges.push(RelationshipEdge {
                    id: row.get::<String>("id").unwrap_or_default(),
                    source: row.get::<String>("source").unwrap_or_default(),
                    target: row.get::<String>("target").unwrap_or_default(),
                    trust_level: row.get::<i64>("trust_level").unwrap_or(3),
                    context: row.get::<String>("context").ok(),
                });
            }
            edges
        };

        Ok(GraphData { nodes, edges })
    }
}

// ── Row Mapping ──────────────────────────────────────────────────

/// Extract a Person node bound to `key` from a row.
pub(crate) fn row_to_person(row: &neo4rs::Row, key: &str) -> Result<Person, GraphError> {
    let node: neo4rs::Node = row
        .get(key)
        .map_err(|e| GraphError::Serialization(format!("Failed to get person node: {e}")))?;
    Ok(node_to_person(&node))
}

/// Convert a neo4rs::Node to a Person. Absent properties map to None;
/// absent timestamps fall back to now, matching write-side defaults.
pub(crate) fn node_to_person(node: &neo4rs::Node) -> Person {
    Person {
        id: node.get::<String>("id").unwrap_or_default(),
        name: node.get::<String>("name").unwrap_or_default(),
        bio: node.get::<String>("bio").ok(),
        tags: node.get::<Vec<String>>("tags").unwrap_or_default(),
        offers: node.get::<String>("offers").ok(),
        seeks: node.get::<String>("seeks").ok(),
        is_user: node.get::<bool>("is_user").unwrap_or(false),
        created_at: node
            .get::<String>("created_at")
            .ok()
            .and_then(|s| DateTime::parse_from_rfc3339(&s).ok())
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(Utc::now),
        city: node.get::<String>("city").ok(),
        latitude: node.get::<f64>("latitude").ok(),
        longitude: node.get::<f64>("longitude").ok(),
    }
}

/// Convert a neo4rs::Node to a visualization node at the given degree.
fn node_to_person_node(node: &neo4rs::Node, degree: i64) -> PersonNode {
    PersonNode {
        id: node.get::<String>("id").unwrap_or_default(),
        name: node.get::<String>("name").unwrap_or_default(),
        tags: node.get::<Vec<String>>("tags").unwrap_or_default(),
        is_user: node.get::<bool>("is_user").unwrap_or(false),
        degree,
        city: node.get::<String>("city").ok(),
        latitude: node.get::<f64>("latitude").ok(),
        longitude: node.get::<f64>("longitude").ok(),
    }
}

/// Pair a person with the KNOWS edge connecting it to the subject.
pub(crate) fn relation_to_connection(person: Person, rel: &neo4rs::Relation) -> Connection {
    Connection {
        person,
        relationship_id: rel.get::<String>("id").unwrap_or_default(),
        since: rel.get::<String>("since").ok().and_then(parse_since),
        trust_level: rel.get::<i64>("trust_level").unwrap_or(3),
        context: rel.get::<String>("context").ok(),
        notes: rel.get::<String>("notes").ok(),
    }
}

pub(crate) fn parse_since(s: String) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(&s, "%Y-%m-%d").ok()
}

pub(crate) fn format_since(d: &NaiveDate) -> String {
    d.format("%Y-%m-%d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn since_roundtrip() {
        let d = NaiveDate::from_ymd_opt(2020, 6, 1).unwrap();
        assert_eq!(parse_since(format_since(&d)), Some(d));
    }

    #[test]
    fn since_rejects_garbage() {
        assert_eq!(parse_since("not a date".to_string()), None);
        assert_eq!(parse_since(String::new()), None);
    }
}
