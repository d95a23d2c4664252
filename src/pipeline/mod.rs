// Retrieval pipeline module
// Turns one user message into the bounded menu context the generation step consumes

#[cfg(test)]
mod tests;

pub mod categorize;
pub mod constraints;
pub mod context;
pub mod filter;

pub use categorize::{DISPLAY_LIMIT, MenuBuckets, categorize};
pub use constraints::{QueryConstraints, extract};
pub use context::render_context;
pub use filter::filter_candidates;

use std::time::Instant;
use tracing::{debug, warn};

use crate::embeddings::OllamaClient;
use crate::index::MenuIndex;

/// Context used when the index has nothing usable for a query.
pub const NO_RELEVANT_ITEMS: &str = "No relevant items found in the menu.";

/// Telemetry about the best raw match for one query, captured before
/// allergen filtering so analytics reflect what the index actually returned.
#[derive(Debug, Clone, PartialEq)]
pub struct TopMatch {
    pub name: String,
    pub score: f32,
}

/// Everything one retrieval run hands to the rest of the turn.
#[derive(Debug, Clone)]
pub struct TurnContext {
    pub context: String,
    pub constraints: QueryConstraints,
    pub top_match: Option<TopMatch>,
    pub latency_ms: f64,
}

/// Run constraint extraction, similarity search, allergen filtering,
/// categorization and context rendering for one user message.
///
/// Retrieval failures never escape: an unreachable embedder or index
/// degrades to the no-relevant-items context so the turn still completes.
#[inline]
pub async fn run(
    embedder: &OllamaClient,
    index: &MenuIndex,
    query: &str,
    n_results: usize,
) -> TurnContext {
    let constraints = constraints::extract(query);
    debug!(
        "Extracted constraints: allergens={:?} intents={:?}",
        constraints.allergens, constraints.intents
    );

    let started = Instant::now();
    let candidates = match embedder.generate_embedding(query) {
        Ok(result) => match index.search(&result.embedding, n_results).await {
            Ok(candidates) => candidates,
            Err(e) => {
                warn!("Menu search failed, continuing without candidates: {}", e);
                Vec::new()
            }
        },
        Err(e) => {
            warn!("Query embedding failed, continuing without candidates: {}", e);
            Vec::new()
        }
    };
    let latency_ms = round_ms(started.elapsed().as_secs_f64() * 1000.0);

    let top_match = candidates.first().map(|candidate| TopMatch {
        name: candidate.name.clone(),
        score: candidate.similarity,
    });

    let context = if candidates.is_empty() {
        NO_RELEVANT_ITEMS.to_string()
    } else {
        let filtered = filter::filter_candidates(candidates, &constraints.allergens);
        let buckets = categorize::categorize(filtered, &constraints.intents);
        context::render_context(&buckets, &constraints.allergens)
    };

    debug!("Retrieval completed in {} ms", latency_ms);

    TurnContext {
        context,
        constraints,
        top_match,
        latency_ms,
    }
}

fn round_ms(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
