// Embeddings module
// Composes the per-item embedding text and talks to the Ollama server


pub mod ollama;

pub use ollama::{EmbeddingResult, OllamaClient};

use crate::catalog::MenuItem;

/// Compose the text that gets embedded for one menu item.
///
/// Sparse rows keep a stable wording: missing calories render as "N/A"
/// and missing allergens as "None listed".
#[inline]
pub fn item_document(item: &MenuItem) -> String {
    let calories = if item.calories.is_empty() {
        "N/A"
    } else {
        item.calories.as_str()
    };
    let allergens = if item.allergens.is_empty() {
        "None listed"
    } else {
        item.allergens.as_str()
    };

    format!(
        "Item Name: {}. Description: {}. Ingredients: {}. Calories: {}. Allergens: {}. Dietary Tags: {}.",
        item.name, item.description, item.ingredients, calories, allergens, item.dietary_tags
    )
}
