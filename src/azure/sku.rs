//! SKU name normalization across catalog naming conventions.
//!
//! The catalog names the same hardware differently by generation: older SKUs
//! read "D4s v3" (space before the generation suffix) while newer ones read
//! "Standard_D4s_v5" (underscore-joined with a tier prefix). Searches must
//! try both shapes to find a SKU regardless of how the caller wrote it.

/// Ordered search-term variants plus a display name for a raw SKU string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedSku {
    /// Variants to try against the catalog, in priority order.
    pub search_terms: Vec<String>,
    /// Human-readable form (e.g. "D4s v5").
    pub display_name: String,
}

/// Generates catalog search variants for a SKU written in any supported format.
pub fn normalize_sku(raw: &str) -> NormalizedSku {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return NormalizedSku { search_terms: Vec::new(), display_name: String::new() };
    }

    let stripped = strip_tier_prefix(trimmed);
    let display_name = stripped.replace('_', " ");

    let mut search_terms = Vec::new();
    let variants =
        [stripped.replace(' ', "_"), stripped.replace('_', " "), stripped.to_string()];
    for variant in variants {
        if !search_terms.contains(&variant) {
            search_terms.push(variant);
        }
    }

    NormalizedSku { search_terms, display_name }
}

/// Removes one leading "Standard_" or "Basic_" tier prefix, case-insensitively.
fn strip_tier_prefix(sku: &str) -> &str {
    for prefix in ["Standard_", "Basic_"] {
        if let Some(head) = sku.get(..prefix.len()) {
            if head.eq_ignore_ascii_case(prefix) {
                return &sku[prefix.len()..];
            }
        }
    }
    sku
}

/// Case-insensitive fuzzy match: containment in either direction, or any
/// whitespace token of the query appearing in the candidate.
pub fn loose_match(candidate: &str, query: &str) -> bool {
    let candidate = candidate.to_lowercase();
    let query = query.to_lowercase();
    if candidate.is_empty() || query.is_empty() {
        return false;
    }

    candidate.contains(&query)
        || query.contains(&candidate)
        || query.split_whitespace().any(|word| candidate.contains(word))
}
