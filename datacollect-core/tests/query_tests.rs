use datacollect_core::domain::*;
use pretty_assertions::assert_eq;
use serde_json::json;
use test_case::test_case;

#[test]
fn test_simple_filter_wire_shape() {
    let filter: Filter = SimpleFilter::equal("Код", "77").into();
    assert_eq!(
        serde_json::to_value(&filter).unwrap(),
        json!({ "type": "simple", "attribute": "Код", "operator": "equal", "value": "77" })
    );
}

#[test]
fn test_in_filter_serializes_array() {
    let filter: Filter = SimpleFilter::one_of("Код", ["16", "59"]).into();
    assert_eq!(
        serde_json::to_value(&filter).unwrap(),
        json!({ "type": "simple", "attribute": "Код", "operator": "in", "value": ["16", "59"] })
    );
}

#[test]
fn test_null_filters_have_no_value() {
    let filter: Filter = SimpleFilter::is_null("Дата закрытия").into();
    assert_eq!(
        serde_json::to_value(&filter).unwrap(),
        json!({ "type": "simple", "attribute": "Дата закрытия", "operator": "isNull" })
    );
}

#[test]
fn test_named_filter_and_fields() {
    let request = SearchRequest::new()
        .filter(NamedFilter::new("ByRegion").with_parameter("regionId", 12))
        .field(SimpleField::new("Код"))
        .field(NamedField::new("FullPath").with_alias("Путь"))
        .take(50);

    assert_eq!(
        serde_json::to_value(&request).unwrap(),
        json!({
            "filters": [
                { "type": "named", "name": "ByRegion", "parameters": { "regionId": 12 } }
            ],
            "fields": [
                { "type": "simple", "attribute": "Код" },
                { "type": "named", "name": "FullPath", "alias": "Путь" }
            ],
            "take": 50
        })
    );
}

#[test]
fn test_empty_search_request_is_empty_object() {
    assert_eq!(serde_json::to_value(SearchRequest::new()).unwrap(), json!({}));
}

#[test]
fn test_order_by_serialization() {
    let request = SearchRequest::new().order_by("Название").order_by_desc("Код");
    assert_eq!(
        serde_json::to_value(&request).unwrap(),
        json!({
            "orderBy": [
                { "attribute": "Название", "descending": false },
                { "attribute": "Код", "descending": true }
            ]
        })
    );
}

#[test]
fn test_search_request_deserializes_back() {
    let request = SearchRequest::new()
        .filter(SimpleFilter::greater_or_equal("Население", 1_000_000))
        .filter(SimpleFilter::starts_with("Название", "Ново"))
        .skip(10);

    let json = serde_json::to_string(&request).unwrap();
    let parsed: SearchRequest = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, request);
}

#[test_case(SimpleFilter::equal("Код", "1") ; "equal with value")]
#[test_case(SimpleFilter::one_of("Код", ["1", "2"]) ; "in with list")]
#[test_case(SimpleFilter::is_not_null("Код") ; "is not null without value")]
#[test_case(SimpleFilter::contains("Название", "ск") ; "contains with text")]
fn test_valid_filters(filter: SimpleFilter) {
    assert!(filter.validate().is_ok());
}

#[test_case(SimpleFilter::new("Код", FilterOperator::In, Some(FilterValue::Single("1".into()))) ; "in with single value")]
#[test_case(SimpleFilter::new("Код", FilterOperator::Equal, None) ; "equal without value")]
#[test_case(SimpleFilter::new("Код", FilterOperator::IsNull, Some(FilterValue::Single("1".into()))) ; "is null with value")]
#[test_case(SimpleFilter::new("Код", FilterOperator::Less, Some(FilterValue::List(vec![]))) ; "less with list")]
fn test_invalid_filters(filter: SimpleFilter) {
    let err = filter.validate().unwrap_err();
    assert!(matches!(err, datacollect_core::CoreError::InvalidFilter(_)));
}

#[test]
fn test_search_request_validation_reports_first_bad_filter() {
    let request = SearchRequest::new()
        .filter(SimpleFilter::equal("Код", "1"))
        .filter(SimpleFilter::new("Название", FilterOperator::In, None));

    let err = request.validate().unwrap_err();
    assert!(err.to_string().contains("Название"));
}
