//! Subscription plan hierarchy.

use crate::{CoreError, CoreResult, Identity};

use std::panic::Location;
use std::str::FromStr;

use error_location::ErrorLocation;
use serde::{Deserialize, Serialize};

/// Subscription plan, ordered from lowest to highest.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Plan {
    Free,
    Starter,
    Professional,
    Enterprise,
}

impl Plan {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Free => "free",
            Self::Starter => "starter",
            Self::Professional => "professional",
            Self::Enterprise => "enterprise",
        }
    }

    /// Position in the hierarchy (0-3).
    pub fn level(&self) -> u8 {
        match self {
            Self::Free => 0,
            Self::Starter => 1,
            Self::Professional => 2,
            Self::Enterprise => 3,
        }
    }
}

impl FromStr for Plan {
    type Err = CoreError;

    #[track_caller]
    fn from_str(s: &str) -> CoreResult<Self> {
        match s {
            "free" => Ok(Self::Free),
            "starter" => Ok(Self::Starter),
            "professional" => Ok(Self::Professional),
            "enterprise" => Ok(Self::Enterprise),
            _ => Err(CoreError::InvalidPlan {
                value: s.to_string(),
                location: ErrorLocation::from(Location::caller()),
            }),
        }
    }
}

/// Level of a possibly-missing plan. A missing plan counts as `Free`.
pub fn plan_level(plan: Option<Plan>) -> u8 {
    plan.unwrap_or(Plan::Free).level()
}

/// True when `user_plan` meets or exceeds `required`. A missing plan counts as `Free`.
pub fn is_plan_at_least(user_plan: Option<Plan>, required: Plan) -> bool {
    plan_level(user_plan) >= required.level()
}

/// True when the identity lists `feature` in its `features` array.
pub fn has_feature(identity: Option<&Identity>, feature: &str) -> bool {
    identity.is_some_and(|identity| identity.features().any(|f| f == feature))
}
