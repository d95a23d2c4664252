use super::*;

fn candidate(name: &str, distance: f32) -> Candidate {
    Candidate {
        id: format!("id-{}", name),
        name: name.to_string(),
        description: String::new(),
        ingredients: "beef;bun;lettuce".to_string(),
        calories: "550".to_string(),
        price: "5.99".to_string(),
        allergens: "gluten; dairy".to_string(),
        category: "Burgers".to_string(),
        dietary_tags: String::new(),
        document: String::new(),
        similarity: 1.0 - distance,
        distance,
    }
}

#[test]
fn renders_header_buckets_and_fields() {
    let buckets = MenuBuckets {
        main_dishes: vec![candidate("Classic Burger", 0.1)],
        ..MenuBuckets::default()
    };

    let context = render_context(&buckets, &[]);

    assert!(context.starts_with(CONTEXT_HEADER));
    assert!(context.contains("Main Dishes:"));
    assert!(context.contains(
        "- Classic Burger ($5.99) | Ingredients: beef, bun, lettuce | \
         Contains: gluten, dairy | Category: Burgers | 550 calories"
    ));
}

#[test]
fn unparseable_price_renders_placeholder() {
    let mut item = candidate("Mystery Meal", 0.1);
    item.price = "market price".to_string();

    let buckets = MenuBuckets {
        main_dishes: vec![item],
        ..MenuBuckets::default()
    };
    let context = render_context(&buckets, &[]);

    assert!(context.contains("- Mystery Meal (Price N/A)"));
}

#[test]
fn empty_allergens_render_fixed_phrase() {
    let mut item = candidate("Fruit Cup", 0.1);
    item.allergens = String::new();
    let mut listed = candidate("Fruit Bowl", 0.2);
    listed.allergens = "None listed".to_string();

    let buckets = MenuBuckets {
        main_dishes: vec![item, listed],
        ..MenuBuckets::default()
    };
    let context = render_context(&buckets, &[]);

    assert_eq!(context.matches("No allergens listed").count(), 2);
    assert!(!context.contains("Contains: None listed"));
}

#[test]
fn missing_calories_are_omitted() {
    let mut item = candidate("Iced Tea", 0.1);
    item.calories = "N/A".to_string();

    let buckets = MenuBuckets {
        beverages: vec![item],
        ..MenuBuckets::default()
    };
    let context = render_context(&buckets, &[]);

    assert!(context.contains(
        "- Iced Tea ($5.99) | Ingredients: beef, bun, lettuce | \
         Contains: gluten, dairy | Category: Burgers"
    ));
    assert!(!context.contains("N/A calories"));
}

#[test]
fn buckets_appear_in_fixed_order() {
    let buckets = MenuBuckets {
        main_dishes: vec![candidate("Burger", 0.1)],
        appetizers_snacks: vec![candidate("Fries", 0.2)],
        beverages: vec![candidate("Shake", 0.3)],
        desserts: vec![candidate("Brownie", 0.4)],
    };

    let context = render_context(&buckets, &[]);

    let main_pos = context.find("Main Dishes:").expect("main bucket rendered");
    let snack_pos = context
        .find("Appetizers & Snacks:")
        .expect("snack bucket rendered");
    let beverage_pos = context.find("Beverages:").expect("beverage bucket rendered");
    let dessert_pos = context.find("Desserts:").expect("dessert bucket rendered");

    assert!(main_pos < snack_pos);
    assert!(snack_pos < beverage_pos);
    assert!(beverage_pos < dessert_pos);
}

#[test]
fn render_caps_each_bucket() {
    let buckets = MenuBuckets {
        main_dishes: vec![
            candidate("Burger A", 0.1),
            candidate("Burger B", 0.2),
            candidate("Burger C", 0.3),
            candidate("Burger D", 0.4),
            candidate("Burger E", 0.5),
        ],
        ..MenuBuckets::default()
    };

    let context = render_context(&buckets, &[]);

    assert!(context.contains("Burger A"));
    assert!(context.contains("Burger C"));
    assert!(!context.contains("Burger D"));
    assert!(!context.contains("Burger E"));

    // Ascending distance order is preserved
    let a_pos = context.find("Burger A").expect("first item rendered");
    let c_pos = context.find("Burger C").expect("third item rendered");
    assert!(a_pos < c_pos);
}

#[test]
fn empty_buckets_name_avoided_allergens() {
    let buckets = MenuBuckets::default();

    assert_eq!(
        render_context(&buckets, &[]),
        "No suitable menu items found."
    );
    assert_eq!(
        render_context(&buckets, &["soy", "nuts"]),
        "No suitable menu items found (avoiding: soy, nuts)."
    );
}
