#[cfg(test)]
mod tests;

use super::categorize::{DISPLAY_LIMIT, MenuBuckets};
use crate::index::Candidate;

/// Instruction line the generation step sees at the top of every context.
/// The trailing newline keeps a blank line between it and the first bucket.
pub const CONTEXT_HEADER: &str =
    "Use only this menu context. Answer in 5-7 concise bullets with clear spacing (e.g., '720 calories').\n";

/// Serialize categorized candidates into the bounded context block.
///
/// Deterministic and side-effect free: fixed bucket order, at most
/// [`DISPLAY_LIMIT`] items per bucket, and only fields that exist on the
/// candidate. When every bucket is empty the result is a fixed no-match
/// message naming any allergens that were being avoided.
#[inline]
pub fn render_context(buckets: &MenuBuckets, excluded_allergens: &[&str]) -> String {
    if buckets.is_empty() {
        return if excluded_allergens.is_empty() {
            "No suitable menu items found.".to_string()
        } else {
            format!(
                "No suitable menu items found (avoiding: {}).",
                excluded_allergens.join(", ")
            )
        };
    }

    let sections = [
        ("Main Dishes:", &buckets.main_dishes),
        ("Appetizers & Snacks:", &buckets.appetizers_snacks),
        ("Beverages:", &buckets.beverages),
        ("Desserts:", &buckets.desserts),
    ];

    let mut lines = vec![CONTEXT_HEADER.to_string()];
    for (header, items) in sections {
        if items.is_empty() {
            continue;
        }
        lines.push(header.to_string());
        for candidate in items.iter().take(DISPLAY_LIMIT) {
            lines.push(render_item(candidate));
        }
        lines.push(String::new());
    }

    lines.join("\n").trim_end().to_string()
}

fn render_item(candidate: &Candidate) -> String {
    let price = match candidate.price_value() {
        Some(value) => format!("${:.2}", value),
        None => "Price N/A".to_string(),
    };

    let ingredients = normalize_delimiters(candidate.ingredients.trim());

    let allergens_field = candidate.allergens.trim();
    let allergens = if allergens_field.is_empty() || allergens_field.eq_ignore_ascii_case("none listed")
    {
        "No allergens listed".to_string()
    } else {
        format!("Contains: {}", normalize_delimiters(allergens_field))
    };

    let calories_field = candidate.calories.trim();
    let calories = if calories_field.is_empty() || calories_field.eq_ignore_ascii_case("n/a") {
        String::new()
    } else {
        format!(" | {} calories", calories_field)
    };

    format!(
        "- {} ({}) | Ingredients: {} | {} | Category: {}{}",
        candidate.name, price, ingredients, allergens, candidate.category, calories
    )
}

/// Normalize semicolon-ish delimiters to ", " regardless of source spacing.
fn normalize_delimiters(field: &str) -> String {
    field.replace("; ", ";").replace(';', ", ")
}
