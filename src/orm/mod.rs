//! SeaORM entities, one module per table.

pub mod candidates;
pub mod elections;
pub mod feature_flags;
pub mod initiatives;
pub mod members;
pub mod vote_confirmations;
pub mod vote_sessions;
pub mod votes;
