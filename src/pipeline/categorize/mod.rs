
use crate::index::Candidate;

/// Per-bucket cap on how many candidates the context may show.
pub const DISPLAY_LIMIT: usize = 3;

/// Categories that are main dishes no matter what the item is called.
const MAIN_CATEGORY_MARKERS: &[&str] = &["burger", "pizza", "taco", "wrap", "salad", "healthy", "breakfast"];

/// Categories that mix entrees and snackable items, split by name below.
const SNACKABLE_CATEGORY_MARKERS: &[&str] = &["side", "appetizer", "fried chicken"];

/// Name substrings that mark an item as a snack rather than an entree.
const SNACK_NAME_MARKERS: &[&str] = &["bites", "poppers", "tots", "fries", "chips", "rings"];

/// Filtered candidates grouped into presentation buckets, each ordered most
/// similar first and capped at [`DISPLAY_LIMIT`].
#[derive(Debug, Clone, Default)]
pub struct MenuBuckets {
    pub main_dishes: Vec<Candidate>,
    pub appetizers_snacks: Vec<Candidate>,
    pub beverages: Vec<Candidate>,
    pub desserts: Vec<Candidate>,
}

impl MenuBuckets {
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.main_dishes.is_empty()
            && self.appetizers_snacks.is_empty()
            && self.beverages.is_empty()
            && self.desserts.is_empty()
    }
}

/// Bucket candidates into presentation categories, narrowing to a single
/// bucket when the request intent asks for one.
///
/// The fried-chicken split is the point of this function: a fried-chicken
/// entree goes to main dishes while fried-chicken bites go to snacks, so an
/// explicit meal request is never answered with poppers.
#[inline]
pub fn categorize(candidates: Vec<Candidate>, intents: &[&str]) -> MenuBuckets {
    let mut buckets = MenuBuckets::default();

    for candidate in candidates {
        let category = candidate.category.to_lowercase();
        let name = candidate.name.to_lowercase();

        if MAIN_CATEGORY_MARKERS.iter().any(|&m| category.contains(m)) {
            buckets.main_dishes.push(candidate);
        } else if SNACKABLE_CATEGORY_MARKERS.iter().any(|&m| category.contains(m)) {
            if has_snack_name(&name) {
                buckets.appetizers_snacks.push(candidate);
            } else {
                buckets.main_dishes.push(candidate);
            }
        } else if category.contains("beverage") {
            buckets.beverages.push(candidate);
        } else if category.contains("dessert") {
            buckets.desserts.push(candidate);
        } else if has_snack_name(&name) {
            buckets.appetizers_snacks.push(candidate);
        } else {
            buckets.main_dishes.push(candidate);
        }
    }

    let mut buckets = narrow_to_intent(buckets, intents);

    buckets.main_dishes.truncate(DISPLAY_LIMIT);
    buckets.appetizers_snacks.truncate(DISPLAY_LIMIT);
    buckets.beverages.truncate(DISPLAY_LIMIT);
    buckets.desserts.truncate(DISPLAY_LIMIT);
    buckets
}

/// Keep only the bucket matching an explicit category request. `sweet` and
/// `savory` do not narrow.
fn narrow_to_intent(buckets: MenuBuckets, intents: &[&str]) -> MenuBuckets {
    let has = |tag: &str| intents.iter().any(|&t| t == tag);

    if has("main_dish") {
        MenuBuckets {
            main_dishes: buckets.main_dishes,
            ..MenuBuckets::default()
        }
    } else if has("snack") {
        MenuBuckets {
            appetizers_snacks: buckets.appetizers_snacks,
            ..MenuBuckets::default()
        }
    } else if has("drink") {
        MenuBuckets {
            beverages: buckets.beverages,
            ..MenuBuckets::default()
        }
    } else {
        buckets
    }
}

fn has_snack_name(lowered_name: &str) -> bool {
    SNACK_NAME_MARKERS.iter().any(|&m| lowered_name.contains(m))
}
