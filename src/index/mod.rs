// Menu index module
// Handles vector storage and similarity search over embedded menu items


pub mod store;

pub use store::MenuIndex;

use crate::catalog::MenuItem;

/// Embedding record stored in the menu index.
///
/// Descriptive fields are kept as plain text columns next to the vector so
/// a search hit carries everything the pipeline needs without a second
/// lookup. Price is stored stringified like the rest and parsed on use.
#[derive(Debug, Clone)]
pub struct IndexRecord {
    pub id: String,
    pub vector: Vec<f32>,
    pub name: String,
    pub description: String,
    pub ingredients: String,
    pub calories: String,
    pub price: String,
    pub allergens: String,
    pub category: String,
    pub dietary_tags: String,
    pub document: String,
}

impl IndexRecord {
    /// Build a record from a catalog item, its composed document and its
    /// embedding vector.
    #[inline]
    pub fn new(item: &MenuItem, document: String, vector: Vec<f32>) -> Self {
        Self {
            id: item.id.clone(),
            vector,
            name: item.name.clone(),
            description: item.description.clone(),
            ingredients: item.ingredients.clone(),
            calories: item.calories.clone(),
            price: item.price.to_string(),
            allergens: item.allergens.clone(),
            category: item.category.clone(),
            dietary_tags: item.dietary_tags.clone(),
            document,
        }
    }
}

/// One retrieved menu item with its similarity score.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub id: String,
    pub name: String,
    pub description: String,
    pub ingredients: String,
    pub calories: String,
    pub price: String,
    pub allergens: String,
    pub category: String,
    pub dietary_tags: String,
    pub document: String,
    pub similarity: f32,
    pub distance: f32,
}

impl Candidate {
    /// Parse the stored price, if it is numeric.
    #[inline]
    pub fn price_value(&self) -> Option<f64> {
        self.price.trim().parse().ok()
    }
}
