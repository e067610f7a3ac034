//! Write operations for the social graph.
//!
//! Every mutation is one or more independently auto-committing
//! parameterized queries. Identifiers are freshly generated uuid-v4
//! strings; creation timestamps are set server-side.

use chrono::Utc;
use neo4rs::query;
use uuid::Uuid;

use kith_core::{Connection, ConnectionInput, Person, PersonInput};

use crate::client::{GraphClient, GraphError};
use crate::queries::{format_since, relation_to_connection, row_to_person};

impl GraphClient {
    // ── Person Mutations ─────────────────────────────────────────

    /// Create a person with a fresh id. The user flag is always false
    /// on creation; `set_as_user` is the only way to move it.
    pub async fn create_person(&self, input: &PersonInput) -> Result<Person, GraphError> {
        let person_id = Uuid::new_v4().to_string();

        let q = query(
            "CREATE (p:Person {
                 id: $id,
                 name: $name,
                 bio: $bio,
                 tags: $tags,
                 offers: $offers,
                 seeks: $seeks,
                 is_user: false,
                 created_at: $created_at,
                 city: $city,
                 latitude: $latitude,
                 longitude: $longitude
             })
             RETURN p",
        )
        .param("id", person_id)
        .param("name", input.name.clone())
        .param("bio", input.bio.clone())
        .param("tags", input.tags.clone())
        .param("offers", input.offers.clone())
        .param("seeks", input.seeks.clone())
        .param("created_at", Utc::now().to_rfc3339())
        .param("city", input.city.clone())
        .param("latitude", input.latitude)
        .param("longitude", input.longitude);

        match self.query_one(q).await? {
            Some(row) => row_to_person(&row, "p"),
            None => Err(GraphError::Serialization(
                "CREATE did not return the new person".to_string(),
            )),
        }
    }

    /// Overwrite all mutable person fields in place. Id, user flag and
    /// creation timestamp are untouched.
    pub async fn update_person(
        &self,
        person_id: &str,
        input: &PersonInput,
    ) -> Result<Person, GraphError> {
        let q = query(
            "MATCH (p:Person {id: $id})
             SET p.name = $name,
                 p.bio = $bio,
                 p.tags = $tags,
                 p.offers = $offers,
                 p.seeks = $seeks,
                 p.city = $city,
                 p.latitude = $latitude,
                 p.longitude = $longitude
             RETURN p",
        )
        .param("id", person_id.to_string())
        .param("name", input.name.clone())
        .param("bio", input.bio.clone())
        .param("tags", input.tags.clone())
        .param("offers", input.offers.clone())
        .param("seeks", input.seeks.clone())
        .param("city", input.city.clone())
        .param("latitude", input.latitude)
        .param("longitude", input.longitude);

        match self.query_one(q).await? {
            Some(row) => row_to_person(&row, "p"),
            None => Err(GraphError::not_found("Person", person_id)),
        }
    }

    /// Delete a person and all incident KNOWS edges. Returns whether a
    /// node was actually removed.
    pub async fn delete_person(&self, person_id: &str) -> Result<bool, GraphError> {
        let q = query(
            "MATCH (p:Person {id: $id})
             DETACH DELETE p
             RETURN count(p) AS deleted",
        )
        .param("id", person_id.to_string());

        match self.query_one(q).await? {
            Some(row) => Ok(row.get::<i64>("deleted").unwrap_or(0) > 0),
            None => Ok(false),
        }
    }

    /// Move the user flag to the given person.
    ///
    /// Two independent auto-committing queries: unset whoever holds the
    /// flag, then set it on the target. The unset runs unconditionally,
    /// so a missing target leaves the graph with zero user nodes, and
    /// concurrent calls can race. Known consistency gap, preserved
    /// rather than hidden.
    pub async fn set_as_user(&self, person_id: &str) -> Result<Person, GraphError> {
        let unset = query("MATCH (p:Person {is_user: true}) SET p.is_user = false");
        self.run(unset).await?;

        let set = query(
            "MATCH (p:Person {id: $id})
             SET p.is_user = true
             RETURN p",
        )
        .param("id", person_id.to_string());

        match self.query_one(set).await? {
            Some(row) => row_to_person(&row, "p"),
            None => Err(GraphError::not_found("Person", person_id)),
        }
    }

    /// Remove every node and relationship. Seeding and tests only.
    pub async fn clear_all(&self) -> Result<(), GraphError> {
        self.run(query("MATCH (n) DETACH DELETE n")).await
    }

    // ── Connection Mutations ─────────────────────────────────────

    /// Create a directed KNOWS edge between two people. Trust level is
    /// validated before any query runs. Fails with NotFound if either
    /// endpoint does not exist.
    pub async fn create_connection(
        &self,
        from_id: &str,
        to_id: &str,
        input: &ConnectionInput,
    ) -> Result<Connection, GraphError> {
        input.validate()?;
        let relationship_id = Uuid::new_v4().to_string();

        let q = query(
            "MATCH (a:Person {id: $from_id}), (b:Person {id: $to_id})
             CREATE (a)-[r:KNOWS {
                 id: $rel_id,
                 since: $since,
                 trust_level: $trust_level,
                 context: $context,
                 notes: $notes
             }]->(b)
             RETURN b, r",
        )
        .param("from_id", from_id.to_string())
        .param("to_id", to_id.to_string())
        .param("rel_id", relationship_id)
        .param("since", input.since.as_ref().map(format_since))
        .param("trust_level", input.trust_level)
        .param("context", input.context.clone())
        .param("notes", input.notes.clone());

        match self.query_one(q).await? {
            Some(row) => {
                let person = row_to_person(&row, "b")?;
                let rel: neo4rs::Relation = row.get("r").map_err(|e| {
                    GraphError::Serialization(format!("Failed to get relation: {e}"))
                })?;
                Ok(relation_to_connection(person, &rel))
            }
            None => Err(GraphError::not_found(
                "Person",
                &format!("{from_id} or {to_id}"),
            )),
        }
    }

    /// Overwrite the mutable fields of a KNOWS edge, matched by id in
    /// either direction. Trust level is validated before any query runs.
    pub async fn update_connection(
        &self,
        relationship_id: &str,
        input: &ConnectionInput,
    ) -> Result<Connection, GraphError> {
        input.validate()?;

        let q = query(
            "MATCH (a:Person)-[r:KNOWS {id: $rel_id}]-(b:Person)
             SET r.since = $since,
                 r.trust_level = $trust_level,
                 r.context = $context,
                 r.notes = $notes
             RETURN b, r
             LIMIT 1",
        )
        .param("rel_id", relationship_id.to_string())
        .param("since", input.since.as_ref().map(format_since))
        .param("trust_level", input.trust_level)
        .param("context", input.context.clone())
        .param("notes", input.notes.clone());

        match self.query_one(q).await? {
            Some(row) => {
                let person = row_to_person(&row, "b")?;
                let rel: neo4rs::Relation = row.get("r").map_err(|e| {
                    GraphError::Serialization(format!("Failed to get relation: {e}"))
                })?;
                Ok(relation_to_connection(person, &rel))
            }
            None => Err(GraphError::not_found("Knows", relationship_id)),
        }
    }

    /// Delete a KNOWS edge by id, matched in either direction. Returns
    /// whether any edge was removed.
    pub async fn delete_connection(&self, relationship_id: &str) -> Result<bool, GraphError> {
        let q = query(
            "MATCH ()-[r:KNOWS {id: $rel_id}]-()
             DELETE r
             RETURN count(r) AS deleted",
        )
        .param("rel_id", relationship_id.to_string());

        match self.query_one(q).await? {
            Some(row) => Ok(row.get::<i64>("deleted").unwrap_or(0) > 0),
            None => Ok(false),
        }
    }
}
