use foodgram_api::{
    error::AppError,
    routes::params::{Pagination, RecipeQuery, RecipesLimitQuery},
};

#[test]
fn pagination_defaults_and_clamps() {
    assert_eq!(Pagination::default().normalize(), (1, 20, 0));

    let p = Pagination {
        page: Some(3),
        per_page: Some(500),
    };
    assert_eq!(p.normalize(), (3, 100, 200));

    let p = Pagination {
        page: Some(0),
        per_page: Some(0),
    };
    assert_eq!(p.normalize(), (1, 1, 0));
}

#[test]
fn huge_page_saturates_offset() {
    let p = Pagination {
        page: Some(i64::MAX),
        per_page: Some(100),
    };
    assert_eq!(p.normalize(), (i64::MAX, 100, i64::MAX as u64));

    let p = Pagination {
        page: Some(i64::MIN),
        per_page: Some(i64::MIN),
    };
    assert_eq!(p.normalize(), (1, 1, 0));
}

#[test]
fn flags_accept_zero_and_one() {
    let query = RecipeQuery {
        is_favorited: Some("1".into()),
        is_in_shopping_cart: Some("0".into()),
        ..Default::default()
    };
    let filters = query.filters().expect("valid flags");
    assert!(filters.is_favorited);
    assert!(!filters.is_in_shopping_cart);
}

#[test]
fn malformed_flag_is_bad_request() {
    let query = RecipeQuery {
        is_favorited: Some("yes".into()),
        ..Default::default()
    };
    assert!(matches!(query.filters(), Err(AppError::BadRequest(_))));
}

#[test]
fn blank_tag_slugs_are_dropped() {
    let query = RecipeQuery {
        tags: vec!["breakfast".into(), " ".into(), "dinner".into()],
        ..Default::default()
    };
    assert_eq!(query.filters().expect("valid").tags, ["breakfast", "dinner"]);
}

#[test]
fn recipes_limit_rules() {
    assert_eq!(RecipesLimitQuery::default().limit().expect("ok"), None);
    let zero = RecipesLimitQuery {
        recipes_limit: Some(0),
    };
    assert_eq!(zero.limit().expect("ok"), Some(0));
    let negative = RecipesLimitQuery {
        recipes_limit: Some(-1),
    };
    assert!(matches!(negative.limit(), Err(AppError::BadRequest(_))));
}
