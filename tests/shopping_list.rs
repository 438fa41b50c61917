use foodgram_api::services::shopping_list_service::{
    CartIngredientRow, aggregate, capitalize, render,
};
use uuid::Uuid;

fn row(id: Uuid, name: &str, unit: &str, amount: i32) -> CartIngredientRow {
    CartIngredientRow {
        ingredient_id: id,
        name: name.to_string(),
        measurement_unit: unit.to_string(),
        amount,
    }
}

#[test]
fn same_ingredient_across_recipes_is_summed() {
    let flour = Uuid::new_v4();
    let lines = aggregate(vec![row(flour, "flour", "g", 200), row(flour, "flour", "g", 300)]);

    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].amount, 500);
    assert_eq!(render(&lines), "1. Flour: 500 g\n");
}

#[test]
fn lines_keep_first_encountered_order() {
    let salt = Uuid::new_v4();
    let eggs = Uuid::new_v4();
    let milk = Uuid::new_v4();
    let lines = aggregate(vec![
        row(salt, "salt", "g", 5),
        row(eggs, "eggs", "pcs", 2),
        row(salt, "salt", "g", 3),
        row(milk, "milk", "ml", 250),
        row(eggs, "eggs", "pcs", 1),
    ]);

    let names: Vec<_> = lines.iter().map(|l| l.name.as_str()).collect();
    assert_eq!(names, ["salt", "eggs", "milk"]);
    assert_eq!(
        render(&lines),
        "1. Salt: 8 g\n2. Eggs: 3 pcs\n3. Milk: 250 ml\n"
    );
}

#[test]
fn ingredients_with_same_name_but_different_unit_stay_apart() {
    let sugar_g = Uuid::new_v4();
    let sugar_spoon = Uuid::new_v4();
    let lines = aggregate(vec![
        row(sugar_g, "sugar", "g", 100),
        row(sugar_spoon, "sugar", "tbsp", 2),
    ]);

    assert_eq!(lines.len(), 2);
    assert_eq!(render(&lines), "1. Sugar: 100 g\n2. Sugar: 2 tbsp\n");
}

#[test]
fn empty_cart_renders_empty_document() {
    let lines = aggregate(Vec::new());
    assert!(lines.is_empty());
    assert_eq!(render(&lines), "");
}

#[test]
fn amounts_do_not_overflow_i32() {
    let rice = Uuid::new_v4();
    let lines = aggregate(vec![
        row(rice, "rice", "g", i32::MAX),
        row(rice, "rice", "g", i32::MAX),
    ]);
    assert_eq!(lines[0].amount, 2 * i64::from(i32::MAX));
}

#[test]
fn capitalize_handles_case_and_unicode() {
    assert_eq!(capitalize("flour"), "Flour");
    assert_eq!(capitalize("OLIVE OIL"), "Olive oil");
    assert_eq!(capitalize("éclair cream"), "Éclair cream");
    assert_eq!(capitalize(""), "");
}
