use std::collections::HashMap;

use crate::payload::NetworkPayload;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Campaign,
    User,
    Keyword,
}

impl EntityKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Campaign => "campaign",
            Self::User => "user",
            Self::Keyword => "keyword",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Entity {
    pub id: usize,
    pub name: String,
    pub kind: EntityKind,
}

/// Undirected relation between two entity ids. Duplicates are kept.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Edge {
    pub source: usize,
    pub target: usize,
}

/// Deduplicated entities and their edges, derived from a network payload.
///
/// Ids are handed out in first-seen order while walking campaigns, then each
/// campaign's users, then each user's keywords. Each level is walked in
/// JavaScript property order (integer-like keys first, ascending), so numeric
/// user handles get the same ids the browser dashboard gave them. A name keeps
/// the kind it was first seen with.
#[derive(Clone, Debug, Default)]
pub struct RelationGraph {
    pub entities: Vec<Entity>,
    pub edges: Vec<Edge>,
    index_by_name: HashMap<String, usize>,
    neighbors: Vec<Vec<usize>>,
}

impl RelationGraph {
    pub fn build(payload: &NetworkPayload) -> Self {
        let mut graph = Self::default();

        for campaign in &payload.campaigns {
            let campaign_id = graph.intern(&campaign.name, EntityKind::Campaign);
            for user in &campaign.users {
                let user_id = graph.intern(&user.name, EntityKind::User);
                graph.link(campaign_id, user_id);
                for keyword in &user.hate_keywords {
                    let keyword_id = graph.intern(keyword, EntityKind::Keyword);
                    graph.link(user_id, keyword_id);
                }
            }
        }

        graph
    }

    fn intern(&mut self, name: &str, kind: EntityKind) -> usize {
        if let Some(&id) = self.index_by_name.get(name) {
            return id;
        }

        let id = self.entities.len();
        self.entities.push(Entity {
            id,
            name: name.to_owned(),
            kind,
        });
        self.index_by_name.insert(name.to_owned(), id);
        self.neighbors.push(Vec::new());
        id
    }

    fn link(&mut self, source: usize, target: usize) {
        self.edges.push(Edge { source, target });
        if source != target {
            self.neighbors[source].push(target);
            self.neighbors[target].push(source);
        }
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    #[cfg(test)]
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.index_by_name.get(name).copied()
    }

    pub fn neighbors(&self, id: usize) -> &[usize] {
        self.neighbors.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn edge_pairs(&self) -> Vec<(usize, usize)> {
        self.edges
            .iter()
            .map(|edge| (edge.source, edge.target))
            .collect()
    }

    pub fn count_of(&self, kind: EntityKind) -> usize {
        self.entities
            .iter()
            .filter(|entity| entity.kind == kind)
            .count()
    }
}
