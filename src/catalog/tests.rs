use super::*;
use std::fs;
use tempfile::TempDir;

fn write_catalog(dir: &TempDir, contents: &str) -> PathBuf {
    let path = dir.path().join("menu.csv");
    fs::write(&path, contents).expect("should write catalog file");
    path
}

#[test]
fn load_normalizes_spreadsheet_headers() {
    let dir = TempDir::new().expect("should create temp dir");
    let path = write_catalog(
        &dir,
        "Product ID, Name ,Description,Ingredients,Calories,Price,Allergens,Category,Dietary Tags\n\
         FF001,Classic Burger,A classic.,beef; bun; lettuce,550,5.99,gluten; dairy,Burgers,none\n",
    );

    let catalog = Catalog::load(&path).expect("should load catalog");
    assert_eq!(catalog.len(), 1);

    let item = &catalog.items()[0];
    assert_eq!(item.id, "FF001");
    assert_eq!(item.name, "Classic Burger");
    assert_eq!(item.ingredients, "beef; bun; lettuce");
    assert_eq!(item.calories, "550");
    assert!((item.price - 5.99).abs() < f64::EPSILON);
    assert_eq!(item.dietary_tags, "none");
}

#[test]
fn load_drops_rows_missing_required_fields() {
    let dir = TempDir::new().expect("should create temp dir");
    let path = write_catalog(
        &dir,
        "product_id,name,description,ingredients,calories,price,allergens,category,dietary_tags\n\
         FF001,Burger,,beef; bun,550,5.99,,Burgers,\n\
         ,Nameless,,beef,100,1.00,,,\n\
         FF003,,,beef,100,1.00,,,\n\
         FF004,No Ingredients,,,100,1.00,,,\n",
    );

    let catalog = Catalog::load(&path).expect("should load catalog");
    assert_eq!(catalog.len(), 1);
    assert_eq!(catalog.items()[0].id, "FF001");
}

#[test]
fn load_drops_rows_with_unparseable_price() {
    let dir = TempDir::new().expect("should create temp dir");
    let path = write_catalog(
        &dir,
        "product_id,name,description,ingredients,calories,price,allergens,category,dietary_tags\n\
         FF001,Burger,,beef,550,5.99,,,\n\
         FF002,Fries,,potato,300,market price,,,\n\
         FF003,Shake,,milk,400,,,,\n\
         FF004,Wrap,,tortilla,350,-2.50,,,\n",
    );

    let catalog = Catalog::load(&path).expect("should load catalog");
    assert_eq!(catalog.len(), 1);
    assert_eq!(catalog.items()[0].name, "Burger");
}

#[test]
fn load_missing_file_is_catalog_error() {
    let dir = TempDir::new().expect("should create temp dir");
    let result = Catalog::load(dir.path().join("nope.csv"));
    assert!(matches!(result, Err(FoodieError::Catalog(_))));
}

#[test]
fn get_finds_item_by_id() {
    let dir = TempDir::new().expect("should create temp dir");
    let path = write_catalog(
        &dir,
        "product_id,name,description,ingredients,calories,price,allergens,category,dietary_tags\n\
         FF001,Burger,,beef,550,5.99,,,\n\
         FF002,Fries,,potato,300,2.49,,,\n",
    );

    let catalog = Catalog::load(&path).expect("should load catalog");
    assert_eq!(
        catalog.get("FF002").expect("should find FF002").name,
        "Fries"
    );
    assert!(catalog.get("FF999").is_none());
}

#[test]
fn set_field_edits_text_and_price() {
    let dir = TempDir::new().expect("should create temp dir");
    let path = write_catalog(
        &dir,
        "product_id,name,description,ingredients,calories,price,allergens,category,dietary_tags\n\
         FF001,Burger,,beef,550,5.99,,,\n",
    );

    let mut catalog = Catalog::load(&path).expect("should load catalog");
    catalog
        .set_field("FF001", "description", "Flame grilled")
        .expect("should set description");
    catalog
        .set_field("FF001", "price", "6.49")
        .expect("should set price");

    let item = catalog.get("FF001").expect("should find FF001");
    assert_eq!(item.description, "Flame grilled");
    assert!((item.price - 6.49).abs() < f64::EPSILON);
}

#[test]
fn set_field_rejects_bad_price_and_unknown_field() {
    let dir = TempDir::new().expect("should create temp dir");
    let path = write_catalog(
        &dir,
        "product_id,name,description,ingredients,calories,price,allergens,category,dietary_tags\n\
         FF001,Burger,,beef,550,5.99,,,\n",
    );

    let mut catalog = Catalog::load(&path).expect("should load catalog");
    assert!(catalog.set_field("FF001", "price", "cheap").is_err());
    assert!(catalog.set_field("FF001", "price", "-1").is_err());
    assert!(catalog.set_field("FF001", "product_id", "FF999").is_err());
    assert!(catalog.set_field("FF404", "name", "Ghost").is_err());

    // Failed edits leave the item untouched
    let item = catalog.get("FF001").expect("should find FF001");
    assert!((item.price - 5.99).abs() < f64::EPSILON);
}

#[test]
fn save_roundtrips_edits() {
    let dir = TempDir::new().expect("should create temp dir");
    let path = write_catalog(
        &dir,
        "product_id,name,description,ingredients,calories,price,allergens,category,dietary_tags\n\
         FF001,Burger,,beef,550,5.99,,,\n\
         FF002,Fries,,potato,300,2.49,,,\n",
    );

    let mut catalog = Catalog::load(&path).expect("should load catalog");
    catalog
        .set_field("FF002", "price", "2.99")
        .expect("should set price");
    catalog
        .set_field("FF002", "dietary_tags", "vegetarian")
        .expect("should set dietary tags");
    catalog.save().expect("should save catalog");

    let reloaded = Catalog::load(&path).expect("should reload catalog");
    assert_eq!(reloaded.len(), 2);
    let fries = reloaded.get("FF002").expect("should find FF002");
    assert!((fries.price - 2.99).abs() < f64::EPSILON);
    assert_eq!(fries.dietary_tags, "vegetarian");
}
