//! Infrastructure layer - concrete implementations of the domain contracts

pub mod api_key;
pub mod observability;
pub mod session;
