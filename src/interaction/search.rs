use std::cmp::Reverse;

use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;

use crate::config::InteractionConfig;
use crate::graph::Node;

/// Case-insensitive substring search over display names. Matches are ranked
/// by fuzzy score, then name, then id.
pub fn search_nodes(nodes: &[Node], query: &str, config: &InteractionConfig) -> Vec<String> {
    let query = query.trim().to_lowercase();
    if query.is_empty() || query.chars().count() < config.min_query_len {
        return Vec::new();
    }

    let matcher = SkimMatcherV2::default();
    let mut ranked = nodes
        .iter()
        .filter_map(|node| {
            let name = node.display_name.to_lowercase();
            if !name.contains(&query) {
                return None;
            }
            let score = matcher.fuzzy_match(&name, &query).unwrap_or(0);
            Some((score, name, node.id.as_str()))
        })
        .collect::<Vec<_>>();

    ranked.sort_by(|a, b| {
        Reverse(a.0)
            .cmp(&Reverse(b.0))
            .then_with(|| a.1.cmp(&b.1))
            .then_with(|| a.2.cmp(b.2))
    });
    if config.max_results > 0 {
        ranked.truncate(config.max_results);
    }

    ranked.into_iter().map(|(_, _, id)| id.to_owned()).collect()
}
