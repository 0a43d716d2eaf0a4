use std::collections::HashSet;
use std::sync::Arc;

use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;

use crate::graph::RelationGraph;

use super::{SearchMatchCache, ViewModel};

fn fuzzy_match_score(matcher: &SkimMatcherV2, text: &str, query: &str) -> Option<i64> {
    matcher
        .fuzzy_match(text, query)
        .or_else(|| matcher.fuzzy_match(&text.to_ascii_lowercase(), &query.to_ascii_lowercase()))
}

/// Indices of entities whose name fuzzily matches `query`.
pub(super) fn matching_entities(graph: &RelationGraph, query: &str) -> HashSet<usize> {
    let matcher = SkimMatcherV2::default();
    graph
        .entities
        .iter()
        .filter(|entity| fuzzy_match_score(&matcher, &entity.name, query).is_some())
        .map(|entity| entity.id)
        .collect()
}

impl ViewModel {
    pub(super) fn cached_search_matches(&mut self) -> Option<Arc<HashSet<usize>>> {
        let query = self.search.trim();
        if query.is_empty() {
            return None;
        }

        if let Some(cached) = &self.search_match_cache
            && cached.query == query
        {
            return Some(Arc::clone(&cached.matches));
        }

        let network = self.network.as_ref()?;
        let matches = Arc::new(matching_entities(&network.graph, query));
        self.search_match_cache = Some(SearchMatchCache {
            query: query.to_owned(),
            matches: Arc::clone(&matches),
        });

        Some(matches)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::payload::NetworkPayload;

    #[test]
    fn fuzzy_search_matches_across_kinds() {
        let graph = RelationGraph::build(&NetworkPayload::from_value(&json!({
            "campaign": {
                "boycott_drive": { "user_alpha": { "hatekeywords": ["boycott", "traitor"] } }
            }
        })));

        let matches = matching_entities(&graph, "boyc");
        let mut names = matches
            .iter()
            .map(|&id| graph.entities[id].name.as_str())
            .collect::<Vec<_>>();
        names.sort_unstable();
        assert_eq!(names, ["boycott", "boycott_drive"]);

        assert_eq!(matching_entities(&graph, "ALPHA").len(), 1);
        assert!(matching_entities(&graph, "zzz").is_empty());
    }
}
