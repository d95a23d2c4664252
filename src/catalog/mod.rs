// Catalog store module
// Loads the product CSV into normalized menu records and writes admin edits back

#[cfg(test)]
mod tests;

use std::path::{Path, PathBuf};

use csv::StringRecord;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::{FoodieError, Result};

/// One menu item as loaded from the product catalog.
///
/// `ingredients`, `allergens` and `dietary_tags` stay weakly-structured
/// semicolon-delimited text; the retrieval pipeline operates on normalized
/// substring membership rather than parsed tag lists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuItem {
    #[serde(rename = "product_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub ingredients: String,
    #[serde(default)]
    pub calories: String,
    pub price: f64,
    #[serde(default)]
    pub allergens: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub dietary_tags: String,
}

/// Raw CSV row before validation. Every column is optional text so that a
/// malformed row fails validation instead of failing the whole load.
#[derive(Debug, Default, Deserialize)]
struct RawRow {
    #[serde(default)]
    product_id: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    ingredients: String,
    #[serde(default)]
    calories: String,
    #[serde(default)]
    price: String,
    #[serde(default)]
    allergens: String,
    #[serde(default)]
    category: String,
    #[serde(default)]
    dietary_tags: String,
}

/// In-memory product catalog backed by a flat CSV file.
pub struct Catalog {
    items: Vec<MenuItem>,
    path: PathBuf,
}

impl Catalog {
    /// Load the catalog from a CSV file.
    ///
    /// Headers are normalized (trimmed, lower-cased, spaces to underscores)
    /// so spreadsheet-style files with "Product ID" columns load cleanly.
    /// Rows missing an id, name or ingredients, or with an unparseable
    /// price, are dropped with a warning rather than failing the load.
    #[inline]
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let mut reader = csv::Reader::from_path(path).map_err(|e| {
            FoodieError::Catalog(format!(
                "Could not open catalog file {}: {}",
                path.display(),
                e
            ))
        })?;

        let headers = normalize_headers(reader.headers().map_err(|e| {
            FoodieError::Catalog(format!("Failed to read catalog headers: {}", e))
        })?);

        let mut items = Vec::new();
        let mut dropped = 0usize;

        for (row_number, record) in reader.records().enumerate() {
            let record = match record {
                Ok(record) => record,
                Err(e) => {
                    warn!("Skipping unreadable catalog row {}: {}", row_number + 2, e);
                    dropped += 1;
                    continue;
                }
            };

            let raw: RawRow = match record.deserialize(Some(&headers)) {
                Ok(raw) => raw,
                Err(e) => {
                    warn!("Skipping malformed catalog row {}: {}", row_number + 2, e);
                    dropped += 1;
                    continue;
                }
            };

            match validate_row(raw) {
                Some(item) => items.push(item),
                None => {
                    debug!("Dropping incomplete catalog row {}", row_number + 2);
                    dropped += 1;
                }
            }
        }

        if dropped > 0 {
            warn!("Dropped {} incomplete rows while loading catalog", dropped);
        }
        info!(
            "Loaded {} menu items from {}",
            items.len(),
            path.display()
        );

        Ok(Self {
            items,
            path: path.to_path_buf(),
        })
    }

    /// All loaded menu items, in file order.
    #[inline]
    pub fn items(&self) -> &[MenuItem] {
        &self.items
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[inline]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Look up one item by its product id.
    #[inline]
    pub fn get(&self, id: &str) -> Option<&MenuItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Edit one field of one item (the admin path). `product_id` is the row
    /// key and cannot be edited; `price` must parse as a non-negative number.
    #[inline]
    pub fn set_field(&mut self, id: &str, field: &str, value: &str) -> Result<()> {
        let item = self
            .items
            .iter_mut()
            .find(|item| item.id == id)
            .ok_or_else(|| FoodieError::Catalog(format!("No menu item with id '{}'", id)))?;

        match field {
            "name" => item.name = value.to_string(),
            "description" => item.description = value.to_string(),
            "ingredients" => item.ingredients = value.to_string(),
            "calories" => item.calories = value.to_string(),
            "allergens" => item.allergens = value.to_string(),
            "category" => item.category = value.to_string(),
            "dietary_tags" => item.dietary_tags = value.to_string(),
            "price" => {
                let price: f64 = value.trim().parse().map_err(|_| {
                    FoodieError::Catalog(format!("Price '{}' is not a number", value))
                })?;
                if !price.is_finite() || price < 0.0 {
                    return Err(FoodieError::Catalog(format!(
                        "Price must be a non-negative number, got '{}'",
                        value
                    )));
                }
                item.price = price;
            }
            other => {
                return Err(FoodieError::Catalog(format!(
                    "Unknown or read-only field '{}'",
                    other
                )));
            }
        }

        debug!("Set {} on item {}", field, id);
        Ok(())
    }

    /// Write the whole catalog back to its CSV file with normalized headers.
    #[inline]
    pub fn save(&self) -> Result<()> {
        let mut writer = csv::Writer::from_path(&self.path).map_err(|e| {
            FoodieError::Catalog(format!(
                "Could not write catalog file {}: {}",
                self.path.display(),
                e
            ))
        })?;

        for item in &self.items {
            writer
                .serialize(item)
                .map_err(|e| FoodieError::Catalog(format!("Failed to write row: {}", e)))?;
        }
        writer
            .flush()
            .map_err(|e| FoodieError::Catalog(format!("Failed to flush catalog file: {}", e)))?;

        info!(
            "Saved {} menu items to {}",
            self.items.len(),
            self.path.display()
        );
        Ok(())
    }
}

fn normalize_headers(headers: &StringRecord) -> StringRecord {
    headers
        .iter()
        .map(|h| h.trim().to_lowercase().replace(' ', "_"))
        .collect()
}

fn validate_row(raw: RawRow) -> Option<MenuItem> {
    let id = raw.product_id.trim();
    let name = raw.name.trim();
    let ingredients = raw.ingredients.trim();
    if id.is_empty() || name.is_empty() || ingredients.is_empty() {
        return None;
    }

    // Mirrors the spreadsheet's numeric coercion: unparseable prices drop
    // the row rather than poisoning the load.
    let price: f64 = raw.price.trim().parse().ok()?;
    if !price.is_finite() || price < 0.0 {
        return None;
    }

    Some(MenuItem {
        id: id.to_string(),
        name: name.to_string(),
        description: raw.description.trim().to_string(),
        ingredients: ingredients.to_string(),
        calories: raw.calories.trim().to_string(),
        price,
        allergens: raw.allergens.trim().to_string(),
        category: raw.category.trim().to_string(),
        dietary_tags: raw.dietary_tags.trim().to_string(),
    })
}
