//! Sample-data seeding for local development.
//!
//! Wipes the database and loads a small graph: one user node, a ring
//! of first-degree connections, and a few friends-of-friends behind
//! them. Runs entirely through the data access layer.

use chrono::NaiveDate;

use kith_core::{ConnectionInput, PersonInput};
use kith_graph::{GraphClient, GraphError};

struct SeedPerson {
    name: &'static str,
    bio: &'static str,
    tags: &'static [&'static str],
    offers: &'static str,
    seeks: &'static str,
}

struct SeedEdge {
    from: &'static str,
    to: &'static str,
    trust: i64,
    since: &'static str,
    context: &'static str,
}

const PEOPLE: &[SeedPerson] = &[
    SeedPerson {
        name: "You",
        bio: "Mapping my own network",
        tags: &["product", "engineering"],
        offers: "Technical mentorship, introductions",
        seeks: "Collaborators for graph tooling",
    },
    SeedPerson {
        name: "Alex Chen",
        bio: "Senior engineer at a fintech startup",
        tags: &["engineering", "fintech"],
        offers: "Architecture advice, code reviews",
        seeks: "Interesting side projects",
    },
    SeedPerson {
        name: "Maria Santos",
        bio: "Product designer focused on data visualization",
        tags: &["design", "data-viz"],
        offers: "Design feedback",
        seeks: "Complex visualization challenges",
    },
    SeedPerson {
        name: "Sarah Kim",
        bio: "VC at an early-stage fund",
        tags: &["vc", "investing"],
        offers: "Fundraising advice",
        seeks: "Promising pre-seed founders",
    },
    SeedPerson {
        name: "Robert Taylor",
        bio: "Serial entrepreneur, 3x founder",
        tags: &["startups", "strategy"],
        offers: "Startup mentorship",
        seeks: "Interesting market opportunities",
    },
    SeedPerson {
        name: "Emily Chen",
        bio: "Head of product at a unicorn startup",
        tags: &["product", "growth"],
        offers: "Product strategy",
        seeks: "Ambitious product managers",
    },
    SeedPerson {
        name: "Michael Brown",
        bio: "Principal engineer, distributed systems",
        tags: &["engineering", "architecture"],
        offers: "System design reviews",
        seeks: "Challenging technical problems",
    },
];

// First-degree edges start at "You"; the rest are friends-of-friends.
const EDGES: &[SeedEdge] = &[
    SeedEdge {
        from: "You",
        to: "Alex Chen",
        trust: 5,
        since: "2018-03-15",
        context: "College roommates, built projects together",
    },
    SeedEdge {
        from: "You",
        to: "Maria Santos",
        trust: 4,
        since: "2020-06-01",
        context: "Met at a design conference",
    },
    SeedEdge {
        from: "You",
        to: "Sarah Kim",
        trust: 3,
        since: "2021-02-10",
        context: "Introduced by a former coworker",
    },
    SeedEdge {
        from: "Alex Chen",
        to: "Robert Taylor",
        trust: 4,
        since: "2019-05-10",
        context: "Robert invested in Alex's previous startup",
    },
    SeedEdge {
        from: "Alex Chen",
        to: "Michael Brown",
        trust: 5,
        since: "2016-08-01",
        context: "Former colleagues",
    },
    SeedEdge {
        from: "Maria Santos",
        to: "Emily Chen",
        trust: 3,
        since: "2021-04-15",
        context: "Met at a product design workshop",
    },
    SeedEdge {
        from: "Sarah Kim",
        to: "Robert Taylor",
        trust: 3,
        since: "2020-03-01",
        context: "Robert is an LP in Sarah's fund",
    },
];

/// Wipe the database and load the sample graph.
pub async fn run(client: &GraphClient) -> Result<(), GraphError> {
    client.clear_all().await?;
    tracing::info!("Cleared existing data");

    let mut ids = std::collections::HashMap::new();
    for p in PEOPLE {
        let input = PersonInput {
            name: p.name.to_string(),
            bio: Some(p.bio.to_string()),
            tags: p.tags.iter().map(|t| t.to_string()).collect(),
            offers: Some(p.offers.to_string()),
            seeks: Some(p.seeks.to_string()),
            ..Default::default()
        };
        let created = client.create_person(&input).await?;
        ids.insert(p.name, created.id);
    }
    tracing::info!(count = PEOPLE.len(), "Created people");

    client.set_as_user(&ids["You"]).await?;

    for e in EDGES {
        let input = ConnectionInput {
            since: NaiveDate::parse_from_str(e.since, "%Y-%m-%d").ok(),
            trust_level: e.trust,
            context: Some(e.context.to_string()),
            notes: None,
        };
        client
            .create_connection(&ids[e.from], &ids[e.to], &input)
            .await?;
    }
    tracing::info!(count = EDGES.len(), "Created relationships");

    Ok(())
}
