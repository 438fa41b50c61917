use foodgram_api::{
    dto::recipes::{IngredientAmountInput, RecipeWriteRequest},
    error::AppError,
};
use uuid::Uuid;

fn valid_request() -> RecipeWriteRequest {
    RecipeWriteRequest {
        tags: Some(vec![Uuid::new_v4()]),
        ingredients: Some(vec![IngredientAmountInput::new(Uuid::new_v4(), 100)]),
        name: Some("Pancakes".into()),
        text: Some("Mix and fry.".into()),
        cooking_time: Some(15),
        image: None,
    }
}

fn bad_request_message(req: RecipeWriteRequest) -> String {
    match req.validate() {
        Err(AppError::BadRequest(msg)) => msg,
        other => panic!("expected BadRequest, got {other:?}"),
    }
}

#[test]
fn valid_payload_passes() {
    let validated = valid_request().validate().expect("valid");
    assert_eq!(validated.name, "Pancakes");
    assert_eq!(validated.cooking_time, 15);
    assert_eq!(validated.ingredients.len(), 1);
    assert_eq!(validated.ingredients[0].amount, 100);
}

#[test]
fn missing_fields_are_named() {
    for field in ["tags", "ingredients", "name", "text", "cooking_time"] {
        let mut req = valid_request();
        match field {
            "tags" => req.tags = None,
            "ingredients" => req.ingredients = None,
            "name" => req.name = None,
            "text" => req.text = None,
            _ => req.cooking_time = None,
        }
        let msg = bad_request_message(req);
        assert_eq!(msg, format!("field `{field}` is required"));
    }
}

#[test]
fn empty_lists_count_as_missing() {
    let mut req = valid_request();
    req.tags = Some(Vec::new());
    assert_eq!(bad_request_message(req), "field `tags` is required");

    let mut req = valid_request();
    req.ingredients = Some(Vec::new());
    assert_eq!(bad_request_message(req), "field `ingredients` is required");
}

#[test]
fn cooking_time_below_one_is_rejected() {
    let mut req = valid_request();
    req.cooking_time = Some(0);
    assert!(bad_request_message(req).contains("cooking_time"));
}

#[test]
fn ingredient_amount_below_one_is_rejected() {
    let id = Uuid::new_v4();
    let mut req = valid_request();
    req.ingredients = Some(vec![IngredientAmountInput::new(id, 0)]);
    let msg = bad_request_message(req);
    assert!(msg.contains(&id.to_string()));
}

#[test]
fn repeated_ingredient_is_rejected() {
    let id = Uuid::new_v4();
    let mut req = valid_request();
    req.ingredients = Some(vec![
        IngredientAmountInput::new(id, 10),
        IngredientAmountInput::new(id, 20),
    ]);
    assert!(bad_request_message(req).contains("more than once"));
}

#[test]
fn ingredient_without_amount_is_rejected() {
    let mut req = valid_request();
    req.ingredients = Some(vec![IngredientAmountInput {
        id: Some(Uuid::new_v4()),
        amount: None,
    }]);
    assert_eq!(
        bad_request_message(req),
        "each ingredient needs `id` and `amount`"
    );
}

#[test]
fn overlong_name_is_rejected() {
    let mut req = valid_request();
    req.name = Some("x".repeat(201));
    assert!(bad_request_message(req).contains("at most 200"));
}

#[test]
fn duplicate_tags_collapse_in_order() {
    let a = Uuid::new_v4();
    let b = Uuid::new_v4();
    let mut req = valid_request();
    req.tags = Some(vec![a, b, a]);
    let validated = req.validate().expect("valid");
    assert_eq!(validated.tag_ids, vec![a, b]);
}

#[test]
fn blank_image_becomes_none() {
    let mut req = valid_request();
    req.image = Some("   ".into());
    assert_eq!(req.validate().expect("valid").image, None);
}

#[test]
fn unknown_json_shape_decodes_with_missing_fields() {
    let req: RecipeWriteRequest =
        serde_json::from_str(r#"{"name":"Soup","cooking_time":10}"#).expect("decodes");
    assert_eq!(bad_request_message(req), "field `tags` is required");
}

#[test]
fn name_with_surrounding_whitespace_is_rejected() {
    let mut req = valid_request();
    req.name = Some(" Pancakes ".into());
    assert_eq!(
        bad_request_message(req),
        "`name` must not start or end with whitespace"
    );
}

#[test]
fn text_is_kept_as_sent() {
    let mut req = valid_request();
    req.text = Some("  Mix.\nFry.\n".into());
    assert_eq!(req.validate().expect("valid").text, "  Mix.\nFry.\n");
}

#[test]
fn blank_text_counts_as_missing() {
    let mut req = valid_request();
    req.text = Some(" \n ".into());
    assert_eq!(bad_request_message(req), "field `text` is required");
}
