use crate::{Identity, Plan, Role};

use proptest::prelude::*;
use serde_json::json;

fn identity(value: serde_json::Value) -> Identity {
    Identity::from_value(value).unwrap()
}

#[test]
fn given_firm_id_missing_when_normalized_then_derives_from_firm() {
    let user = identity(json!({"_id": "1", "firm": {"id": "F1"}})).normalized();

    assert_eq!(user.firm_id(), Some("F1"));
}

#[test]
fn given_no_firm_when_normalized_then_derives_from_tenant() {
    let user = identity(json!({"_id": "1", "tenant": {"id": "T9"}})).normalized();

    assert_eq!(user.firm_id(), Some("T9"));
}

#[test]
fn given_firm_and_tenant_when_normalized_then_firm_wins() {
    let user = identity(json!({"_id": "1", "firm": {"id": "F1"}, "tenant": {"id": "T9"}}))
        .normalized();

    assert_eq!(user.firm_id(), Some("F1"));
}

#[test]
fn given_empty_firm_id_when_normalized_then_treated_as_missing() {
    let user = identity(json!({"_id": "1", "firmId": "", "tenant": {"id": "T9"}})).normalized();

    assert_eq!(user.firm_id(), Some("T9"));
}

#[test]
fn given_numeric_firm_id_when_normalized_then_kept() {
    let user = identity(json!({"_id": "1", "firmId": 42, "firm": {"id": "F9"}})).normalized();

    assert_eq!(user.get("firmId"), Some(&json!(42)));
}

#[test]
fn given_falsy_firm_id_when_normalized_then_treated_as_missing() {
    for falsy in [json!(null), json!(false), json!(0)] {
        let user = identity(json!({"_id": "1", "firmId": falsy, "firm": {"id": "F9"}}))
            .normalized();

        assert_eq!(user.firm_id(), Some("F9"));
    }
}

#[test]
fn given_no_linkage_when_normalized_then_unchanged() {
    let original = identity(json!({"_id": "1", "firm": null}));
    let user = original.clone().normalized();

    assert_eq!(user, original);
    assert!(user.firm_id().is_none());
}

#[test]
fn given_underscore_id_missing_when_id_then_falls_back_to_id() {
    let user = identity(json!({"id": "abc"}));
    assert_eq!(user.id(), Some("abc"));
}

#[test]
fn given_known_and_unknown_roles_when_role_then_parsed_or_none() {
    assert_eq!(identity(json!({"role": "lawyer"})).role(), Some(Role::Lawyer));
    assert_eq!(identity(json!({"role": "departed"})).role(), None);
    assert!(identity(json!({"role": "admin"})).has_role(Role::Admin));
}

#[test]
fn given_plan_field_when_plan_then_parsed() {
    assert_eq!(
        identity(json!({"plan": "enterprise"})).plan(),
        Some(Plan::Enterprise)
    );
    assert_eq!(identity(json!({})).plan(), None);
}

#[test]
fn given_non_object_when_from_value_then_error() {
    assert!(Identity::from_value(json!("user")).is_err());
    assert!(Identity::from_value(json!(null)).is_err());
    assert!(Identity::from_value(json!([1, 2])).is_err());
}

#[test]
fn given_identity_when_serialized_then_fields_pass_through() {
    let user = identity(json!({"_id": "1", "lawyerProfile": {"rating": 4.5}}));
    let json = serde_json::to_value(&user).unwrap();

    assert_eq!(json["lawyerProfile"]["rating"], 4.5);
}

proptest! {
    #[test]
    fn given_existing_firm_id_when_normalized_then_never_overwritten(
        firm_id in "[A-Za-z0-9]{1,16}",
        nested_firm in "[A-Za-z0-9]{1,16}",
        nested_tenant in "[A-Za-z0-9]{1,16}",
    ) {
        let user = identity(json!({
            "_id": "1",
            "firmId": firm_id.clone(),
            "firm": {"id": nested_firm},
            "tenant": {"id": nested_tenant},
        }));

        let normalized = user.clone().normalized();

        prop_assert_eq!(normalized.firm_id(), Some(firm_id.as_str()));
        prop_assert_eq!(&normalized, &user);
    }

    #[test]
    fn given_non_string_firm_id_when_normalized_then_never_overwritten(
        firm_id in prop_oneof![
            (1i64..i64::MAX).prop_map(|n| json!(n)),
            Just(json!(true)),
            "[A-Za-z0-9]{1,8}".prop_map(|s| json!([s])),
            "[A-Za-z0-9]{1,8}".prop_map(|s| json!({"id": s})),
        ],
        nested_firm in "[A-Za-z0-9]{1,16}",
    ) {
        let user = identity(json!({
            "_id": "1",
            "firmId": firm_id.clone(),
            "firm": {"id": nested_firm},
        }));

        let normalized = user.clone().normalized();

        prop_assert_eq!(normalized.get("firmId"), Some(&firm_id));
        prop_assert_eq!(&normalized, &user);
    }

    #[test]
    fn given_any_identity_when_normalized_twice_then_same_as_once(
        nested_firm in proptest::option::of("[A-Za-z0-9]{1,16}"),
        nested_tenant in proptest::option::of("[A-Za-z0-9]{1,16}"),
    ) {
        let user = identity(json!({
            "_id": "1",
            "firm": nested_firm.map(|id| json!({"id": id})),
            "tenant": nested_tenant.map(|id| json!({"id": id})),
        }));

        let once = user.normalized();
        let twice = once.clone().normalized();

        prop_assert_eq!(once, twice);
    }
}
