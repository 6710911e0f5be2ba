//! Identity - the cached record of the authenticated user.
//!
//! The backend owns the shape of the user record, so the identity keeps it as
//! an opaque JSON object and only reads the handful of fields the session layer
//! needs. The one field it ever writes on its own is `firmId`, via [`Identity::normalized`].

use crate::{CoreError, CoreResult, Plan, Role};

use std::panic::Location;
use std::str::FromStr;

use error_location::ErrorLocation;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const FIELD_ID: &str = "_id";
pub const FIELD_FIRM_ID: &str = "firmId";
pub const FIELD_ROLE: &str = "role";

/// Pass-through user record as returned by the auth endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identity(Map<String, Value>);

impl Identity {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// Build an identity from an arbitrary JSON value. Only objects qualify.
    #[track_caller]
    pub fn from_value(value: Value) -> CoreResult<Self> {
        match value {
            Value::Object(fields) => Ok(Self(fields)),
            other => Err(CoreError::Validation {
                message: format!("identity must be a JSON object, got {}", kind_of(&other)),
                location: ErrorLocation::from(Location::caller()),
            }),
        }
    }

    /// Backend user id (`_id`, falling back to `id`).
    pub fn id(&self) -> Option<&str> {
        self.str_field(FIELD_ID).or_else(|| self.str_field("id"))
    }

    pub fn username(&self) -> Option<&str> {
        self.str_field("username")
    }

    pub fn email(&self) -> Option<&str> {
        self.str_field("email")
    }

    pub fn role(&self) -> Option<Role> {
        self.str_field(FIELD_ROLE)
            .and_then(|role| Role::from_str(role).ok())
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.role() == Some(role)
    }

    pub fn firm_id(&self) -> Option<&str> {
        self.str_field(FIELD_FIRM_ID)
    }

    pub fn plan(&self) -> Option<Plan> {
        self.str_field("plan")
            .and_then(|plan| Plan::from_str(plan).ok())
    }

    pub fn features(&self) -> impl Iterator<Item = &str> {
        self.0
            .get("features")
            .and_then(Value::as_array)
            .into_iter()
            .flatten()
            .filter_map(Value::as_str)
    }

    pub fn is_email_verified(&self) -> bool {
        self.0.get("isEmailVerified").and_then(Value::as_bool) == Some(true)
    }

    /// Fill in `firmId` from `firm.id` or `tenant.id` when it is absent.
    ///
    /// A present `firmId` of any type is never replaced; only null, `false`,
    /// `0` and `""` count as absent.
    pub fn normalized(mut self) -> Self {
        if self.0.get(FIELD_FIRM_ID).is_some_and(is_truthy) {
            return self;
        }

        let derived = self
            .nested("firm", "id")
            .or_else(|| self.nested("tenant", "id"))
            .cloned();

        if let Some(firm_id) = derived {
            self.0.insert(FIELD_FIRM_ID.to_string(), firm_id);
        }

        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.0.insert(key.into(), value)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }

    /// Non-empty string field; empty strings read as absent.
    fn str_field(&self, key: &str) -> Option<&str> {
        self.0
            .get(key)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
    }

    fn nested(&self, outer: &str, inner: &str) -> Option<&Value> {
        self.0
            .get(outer)
            .and_then(|v| v.get(inner))
            .filter(|v| is_truthy(v))
    }
}

/// Presence in the sense the backend's clients use: null, `false`, zero and
/// the empty string are absent.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
