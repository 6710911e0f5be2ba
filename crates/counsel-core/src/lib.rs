pub mod error;
pub mod models;

pub use error::{CoreError, Result as CoreResult};
pub use models::identity::Identity;
pub use models::plan::{Plan, has_feature, is_plan_at_least, plan_level};
pub use models::role::Role;

#[cfg(test)]
mod tests;
