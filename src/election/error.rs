//! Errors raised by election operations.

use super::voting_config::VotingConfigError;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use sea_orm::DbErr;
use std::fmt;

#[derive(Debug)]
pub enum ElectionError {
    NotFound,
    NominationsClosed,
    VotingClosed,
    NotEligible,
    AlreadyNominated,
    AlreadyVoted,
    InvalidBallot(String),
    InvalidNomination(String),
    Config(VotingConfigError),
    Database(DbErr),
}

impl ElectionError {
    /// Message safe to show to the voter. Internal failures stay generic.
    pub fn public_message(&self) -> String {
        match self {
            Self::Config(_) | Self::Database(_) => {
                "Something went wrong. Please try again later.".to_string()
            }
            other => other.to_string(),
        }
    }
}

impl fmt::Display for ElectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "Election not found"),
            Self::NominationsClosed => write!(f, "Nominations are not open for this election"),
            Self::VotingClosed => write!(f, "Voting is not open for this ballot"),
            Self::NotEligible => write!(f, "Only members in good standing may take part"),
            Self::AlreadyNominated => {
                write!(f, "You have already submitted a nomination for this election")
            }
            Self::AlreadyVoted => write!(f, "You have already submitted this ballot"),
            Self::InvalidBallot(msg) => write!(f, "Invalid ballot: {}", msg),
            Self::InvalidNomination(msg) => write!(f, "Invalid nomination: {}", msg),
            Self::Config(e) => write!(f, "Election configuration error: {}", e),
            Self::Database(e) => write!(f, "Database error: {}", e),
        }
    }
}

impl std::error::Error for ElectionError {}

impl From<DbErr> for ElectionError {
    fn from(e: DbErr) -> Self {
        Self::Database(e)
    }
}

impl From<VotingConfigError> for ElectionError {
    fn from(e: VotingConfigError) -> Self {
        match e {
            VotingConfigError::NotFound(_) => Self::NotFound,
            VotingConfigError::Database(db) => Self::Database(db),
            other => Self::Config(other),
        }
    }
}

impl ResponseError for ElectionError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::NominationsClosed | Self::VotingClosed | Self::NotEligible => {
                StatusCode::FORBIDDEN
            }
            Self::AlreadyNominated | Self::AlreadyVoted => StatusCode::CONFLICT,
            Self::InvalidBallot(_) | Self::InvalidNomination(_) => StatusCode::BAD_REQUEST,
            Self::Config(_) | Self::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if self.status_code().is_server_error() {
            log::error!("{}", self);
        }
        crate::web::error::json_error(self.status_code(), &self.public_message())
    }
}
