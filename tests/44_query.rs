// Filter parsing and query construction from raw client input down to
// final query text plus positional parameters.

use atlas_api::filter::{parse, CompareOp, FilterNode, LogicalOp, ParseErrorKind};
use atlas_api::query::{BuildError, Entity, QueryOptions};
use atlas_api::validation::ValidationError;
use serde_json::json;

#[test]
fn documented_example_parses_to_expected_tree() {
    let node = parse("price_min > 5 AND city = 'Krakow'").unwrap();
    assert_eq!(
        node,
        FilterNode::logical(
            LogicalOp::And,
            FilterNode::comparison("price_min", CompareOp::Gt, json!(5)),
            FilterNode::comparison("city", CompareOp::Eq, json!("Krakow")),
        )
    );
}

#[test]
fn filtered_listing_produces_parameterized_sql() {
    let options = QueryOptions::build(
        Entity::Locations,
        50,
        100,
        vec!["id".into(), "name".into(), "rating".into()],
        Some("(country = 'Poland' OR country = 'Germany') AND rating >= 4"),
    )
    .unwrap();

    let select = options.to_select_query();
    assert_eq!(
        select.text,
        "SELECT \"id\", \"name\", \"rating\" FROM \"locations\" \
         WHERE ((\"country\" = $1 OR \"country\" = $2) AND \"rating\" >= $3) \
         LIMIT 50 OFFSET 100"
    );
    assert_eq!(select.params, vec![json!("Poland"), json!("Germany"), json!(4)]);

    // Count query shares filter and params, drops pagination.
    let count = options.to_count_query();
    assert_eq!(
        count.text,
        "SELECT COUNT(*) AS count FROM \"locations\" \
         WHERE ((\"country\" = $1 OR \"country\" = $2) AND \"rating\" >= $3)"
    );
    assert_eq!(count.params, select.params);
}

#[test]
fn no_literal_ever_lands_in_query_text() {
    let options = QueryOptions::build(
        Entity::Locations,
        10,
        0,
        vec!["id".into()],
        Some("city = 'Krakow; DROP TABLE users --'"),
    )
    .unwrap();

    let sql = options.to_select_query();
    assert!(!sql.text.contains("Krakow"));
    assert!(!sql.text.contains("DROP TABLE"));
    assert_eq!(sql.params.len(), 1);
}

#[test]
fn pagination_bounds_from_the_api_contract() {
    let fields = vec!["id".to_string()];
    assert!(QueryOptions::build(Entity::Locations, 200, 0, fields.clone(), None).is_ok());
    for (limit, offset) in [(0, 0), (201, 0), (10, -1)] {
        let result = QueryOptions::build(Entity::Locations, limit, offset, fields.clone(), None);
        assert!(
            matches!(result, Err(BuildError::Validation(_))),
            "expected rejection for limit={} offset={}",
            limit,
            offset
        );
    }
}

#[test]
fn unknown_columns_are_rejected_everywhere() {
    let err = QueryOptions::build(
        Entity::Users,
        10,
        0,
        vec!["id".into(), "password_hash".into()],
        None,
    )
    .unwrap_err();
    assert!(matches!(
        err,
        BuildError::Validation(ValidationError::UnknownColumn(_))
    ));

    let err = QueryOptions::build(
        Entity::Users,
        10,
        0,
        vec!["id".into()],
        Some("salt = 'x'"),
    )
    .unwrap_err();
    assert!(matches!(
        err,
        BuildError::Validation(ValidationError::UnknownColumn(_))
    ));

    // non-ASCII identifiers parse cleanly and fall to the allow-list
    let err = QueryOptions::build(
        Entity::Locations,
        10,
        0,
        vec!["id".into()],
        Some("miejscowość = 'Łódź'"),
    )
    .unwrap_err();
    assert!(matches!(
        err,
        BuildError::Validation(ValidationError::UnknownColumn(_))
    ));
}

#[test]
fn malformed_expressions_fail_before_any_query_exists() {
    for expr in ["a > ", "(a > 1", "AND", "city = ", "= 5", "city ~ 'x'"] {
        let result = QueryOptions::build(
            Entity::Locations,
            10,
            0,
            vec!["id".into()],
            Some(expr),
        );
        assert!(matches!(result, Err(BuildError::Parse(_))), "accepted: {:?}", expr);
    }
}

#[test]
fn parse_errors_carry_positions() {
    let err = parse("price_min >> 5").unwrap_err();
    assert!(err.position > 0);

    let err = parse("city = 'open").unwrap_err();
    assert_eq!(err.kind, ParseErrorKind::UnterminatedString);
    assert_eq!(err.position, 7);
}

#[test]
fn introspection_tree_is_plain_nested_json() {
    let node = parse("price_min > 5 AND (city = 'Krakow' OR city = 'Warsaw')").unwrap();
    let value = serde_json::to_value(&node).unwrap();

    assert_eq!(value["type"], "logical");
    assert_eq!(value["op"], "AND");
    assert_eq!(value["right"]["type"], "logical");
    assert_eq!(value["right"]["op"], "OR");
    assert_eq!(value["right"]["left"]["value"], "Krakow");

    // And it round-trips.
    let back: FilterNode = serde_json::from_value(value).unwrap();
    assert_eq!(back, node);
}
