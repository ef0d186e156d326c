//! Use cases
//!
//! Application-level operations that orchestrate domain logic.

pub mod compose_response;
pub mod record_turn;
pub mod stream_relay;
pub(crate) mod shared;

#[cfg(test)]
pub(crate) mod test_support;
