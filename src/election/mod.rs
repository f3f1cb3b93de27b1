//! Election domain: windows, configuration, nominations, ballots and results.
//!
//! Everything in here takes `now` explicitly so window decisions can be
//! evaluated at any instant; handlers pass `Utc::now().naive_utc()`.

pub mod ballot;
pub mod confirmation;
pub mod eligibility;
mod error;
pub mod kind;
pub mod nomination;
pub mod results;
pub mod unopposed;
pub mod voting_config;
pub mod window;

pub use error::ElectionError;
pub use kind::ElectionType;
pub use voting_config::{load_voting_config, load_voting_config_or_default, VotingConfig};
pub use window::VotingStatus;

use crate::orm::elections;
use sea_orm::{DatabaseConnection, EntityTrait};

/// Fetch an election or fail with `ElectionError::NotFound`.
pub async fn find_election(
    db: &DatabaseConnection,
    election_id: i32,
) -> Result<elections::Model, ElectionError> {
    elections::Entity::find_by_id(election_id)
        .one(db)
        .await?
        .ok_or(ElectionError::NotFound)
}

/// Current instant as the naive UTC timestamp the store uses.
pub fn now() -> chrono::NaiveDateTime {
    chrono::Utc::now().naive_utc()
}
