use crate::{Identity, Plan, has_feature, is_plan_at_least, plan_level};

use serde_json::json;

#[test]
fn test_plan_ordering_matches_levels() {
    assert!(Plan::Free < Plan::Starter);
    assert!(Plan::Professional < Plan::Enterprise);
    assert_eq!(Plan::Professional.level(), 2);
}

#[test]
fn test_is_plan_at_least() {
    assert!(is_plan_at_least(Some(Plan::Professional), Plan::Starter));
    assert!(is_plan_at_least(Some(Plan::Professional), Plan::Professional));
    assert!(!is_plan_at_least(Some(Plan::Free), Plan::Enterprise));
}

#[test]
fn test_missing_plan_counts_as_free() {
    assert_eq!(plan_level(None), 0);
    assert!(is_plan_at_least(None, Plan::Free));
    assert!(!is_plan_at_least(None, Plan::Starter));
}

#[test]
fn test_has_feature() {
    let identity =
        Identity::from_value(json!({"_id": "1", "features": ["billing", "hr"]})).unwrap();

    assert!(has_feature(Some(&identity), "hr"));
    assert!(!has_feature(Some(&identity), "crm"));
    assert!(!has_feature(None, "hr"));
}

#[test]
fn test_has_feature_without_features_field() {
    let identity = Identity::from_value(json!({"_id": "1"})).unwrap();
    assert!(!has_feature(Some(&identity), "billing"));
}
