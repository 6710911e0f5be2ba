use crate::Role;

use std::str::FromStr;

#[test]
fn test_role_as_str() {
    assert_eq!(Role::Client.as_str(), "client");
    assert_eq!(Role::Lawyer.as_str(), "lawyer");
    assert_eq!(Role::Admin.as_str(), "admin");
}

#[test]
fn test_role_from_str() {
    assert_eq!(Role::from_str("lawyer").unwrap(), Role::Lawyer);
    assert_eq!(Role::from_str("admin").unwrap(), Role::Admin);
    assert!(Role::from_str("paralegal").is_err());
    assert!(Role::from_str("Admin").is_err());
}
