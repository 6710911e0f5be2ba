mod identity;
mod plan;
mod role;
