//! Matching typed object names against what the player can see.
use crate::afford::Entity;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Found(Entity),
    /// Several candidates match equally well; their names, in scope order.
    Ambiguous(Vec<String>),
    NotFound,
}

/// Normalize a name for comparison
///
/// - Convert to lowercase
/// - Trim whitespace
/// - Collapse multiple spaces to single space
/// - Drop a leading article
pub fn normalize_name(name: &str) -> String {
    let lowered = name.to_lowercase();
    let mut words: Vec<&str> = lowered.split_whitespace().collect();
    if words.len() > 1 && matches!(words[0], "the" | "a" | "an") {
        words.remove(0);
    }
    words.join(" ")
}

/// Check if a query matches an object name
///
/// - Case-insensitive
/// - "key" matches "rusty key"
pub fn name_matches(query: &str, object_name: &str) -> bool {
    let query_norm = normalize_name(query);
    let name_norm = normalize_name(object_name);
    if query_norm.is_empty() {
        return false;
    }
    query_norm == name_norm || name_norm.contains(&query_norm)
}

/// Pick the entity the player means. Exact name matches win over partial
/// ones; more than one match at the best level is ambiguous.
pub fn resolve(query: &str, candidates: &[Entity]) -> Resolution {
    let query_norm = normalize_name(query);
    let named = candidates
        .iter()
        .filter_map(|e| e.display_name().map(|n| (e, normalize_name(n))));

    let mut exact = Vec::new();
    let mut partial = Vec::new();
    for (entity, name) in named {
        if name == query_norm {
            exact.push(entity);
        } else if name_matches(&query_norm, &name) {
            partial.push(entity);
        }
    }

    let best = if exact.is_empty() { partial } else { exact };
    match best.as_slice() {
        [] => Resolution::NotFound,
        [one] => Resolution::Found((*one).clone()),
        many => Resolution::Ambiguous(
            many.iter()
                .filter_map(|e| e.display_name().map(str::to_string))
                .collect(),
        ),
    }
}

/// "the brass lamp or the lantern"
pub fn format_choices(names: &[String]) -> String {
    match names {
        [] => String::new(),
        [one] => format!("the {}", one),
        [init @ .., last] => format!(
            "{} or the {}",
            init.iter()
                .map(|n| format!("the {}", n))
                .collect::<Vec<_>>()
                .join(", "),
            last
        ),
    }
}
