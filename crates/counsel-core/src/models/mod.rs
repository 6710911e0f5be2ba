pub mod identity;
pub mod plan;
pub mod role;
