
use tracing::debug;

use crate::index::Candidate;

/// Drop every candidate whose allergens field mentions an excluded tag.
///
/// This is the only allergen-safety enforcement point in the system, so it
/// runs on every turn before any candidate reaches the context. Matching is
/// case-insensitive substring membership, which makes trace annotations
/// ("Soy (trace)") count the same as full presence. An empty exclusion set
/// returns the input unchanged.
#[inline]
pub fn filter_candidates(candidates: Vec<Candidate>, excluded_allergens: &[&str]) -> Vec<Candidate> {
    if excluded_allergens.is_empty() {
        return candidates;
    }

    candidates
        .into_iter()
        .filter(|candidate| {
            let allergens = candidate.allergens.to_lowercase();
            let blocked = excluded_allergens.iter().any(|&tag| allergens.contains(tag));
            if blocked {
                debug!(
                    "Excluding {} (allergens: {})",
                    candidate.name, candidate.allergens
                );
            }
            !blocked
        })
        .collect()
}
