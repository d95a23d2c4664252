
use itertools::Itertools;

/// Allergen exclusions keyed by tag, each with the phrases that trigger it.
///
/// Matching is loose substring matching over the normalized query. Singular
/// patterns ("no nut") also cover their plural forms.
const ALLERGEN_RULES: &[(&str, &[&str])] = &[
    (
        "soy",
        &[
            "no soy",
            "without soy",
            "soy free",
            "soy allergy",
            "allergic to soy",
        ],
    ),
    (
        "gluten",
        &[
            "no gluten",
            "without gluten",
            "gluten free",
            "gluten allergy",
            "allergic to gluten",
            "celiac",
        ],
    ),
    (
        "dairy",
        &[
            "no dairy",
            "without dairy",
            "dairy free",
            "dairy allergy",
            "allergic to dairy",
            "lactose",
        ],
    ),
    (
        "nuts",
        &[
            "no nut",
            "without nut",
            "nut free",
            "nut allergy",
            "allergic to nut",
            "no peanut",
            "peanut allergy",
        ],
    ),
    (
        "egg",
        &[
            "no egg",
            "without egg",
            "egg free",
            "egg allergy",
            "allergic to egg",
        ],
    ),
    (
        "fish",
        &[
            "no fish",
            "without fish",
            "fish free",
            "fish allergy",
            "allergic to fish",
            "no seafood",
            "seafood allergy",
        ],
    ),
    (
        "sesame",
        &[
            "no sesame",
            "without sesame",
            "sesame free",
            "sesame allergy",
            "allergic to sesame",
        ],
    ),
];

/// Request intents keyed by tag. Only `main_dish`, `snack` and `drink`
/// narrow the presentation buckets; `sweet` and `savory` ride along for
/// the generation prompt.
const INTENT_RULES: &[(&str, &[&str])] = &[
    (
        "main_dish",
        &[
            "main dish",
            "main course",
            "a meal",
            "full meal",
            "entree",
            "something filling",
            "lunch",
            "dinner",
        ],
    ),
    (
        "snack",
        &[
            "snack",
            "appetizer",
            "starter",
            "finger food",
            "something small",
            "side of",
            "side order",
        ],
    ),
    (
        "drink",
        &[
            "drink",
            "beverage",
            "thirsty",
            "soda",
            "juice",
            "shake",
            "lemonade",
            "refresher",
        ],
    ),
    ("sweet", &["sweet", "dessert", "sugar", "treat"]),
    ("savory", &["savory", "savoury", "salty"]),
];

/// Allergen exclusions and request intents detected in one user message.
///
/// Tag order follows the rule tables, so results are deterministic for a
/// given query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryConstraints {
    pub allergens: Vec<&'static str>,
    pub intents: Vec<&'static str>,
}

impl QueryConstraints {
    #[inline]
    pub fn has_intent(&self, tag: &str) -> bool {
        self.intents.iter().any(|&t| t == tag)
    }

    #[inline]
    pub fn is_unconstrained(&self) -> bool {
        self.allergens.is_empty() && self.intents.is_empty()
    }
}

/// Detect allergen exclusions and request intents in a free-text query.
///
/// Pure function of the query text; absence of any match yields empty sets,
/// never an error.
#[inline]
pub fn extract(query: &str) -> QueryConstraints {
    let normalized = normalize(query);

    let mut constraints = QueryConstraints::default();
    for &(tag, patterns) in ALLERGEN_RULES {
        if patterns.iter().any(|&p| normalized.contains(p)) {
            constraints.allergens.push(tag);
        }
    }
    for &(tag, patterns) in INTENT_RULES {
        if patterns.iter().any(|&p| normalized.contains(p)) {
            constraints.intents.push(tag);
        }
    }

    constraints
}

/// Lower-case, turn hyphens into spaces and collapse whitespace runs, so
/// "Gluten-Free" and "gluten   free" both hit the "gluten free" pattern.
fn normalize(query: &str) -> String {
    query
        .to_lowercase()
        .replace('-', " ")
        .split_whitespace()
        .join(" ")
}
