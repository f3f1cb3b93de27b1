//! Read-only election endpoints: results and voting status.

use super::error::json_error;
use crate::config::{Feature, ResolvedFeatures};
use crate::election::ballot::completed_sessions;
use crate::election::results::load_election_results;
use crate::election::unopposed::{compute_unopposed_status_or_default, UnopposedStatus};
use crate::election::{self, find_election, VotingConfig, VotingStatus};
use crate::middleware::ClientCtx;
use crate::orm::elections;
use crate::orm::vote_sessions::SessionType;
use actix_web::http::StatusCode;
use actix_web::{get, web, Error, HttpResponse};
use sea_orm::{DatabaseConnection, EntityTrait};
use serde::Serialize;

pub(super) fn configure(conf: &mut actix_web::web::ServiceConfig) {
    conf.service(view_results).service(view_voting_status);
}

#[get("/api/elections/{election_id}/results")]
pub async fn view_results(
    db: web::Data<DatabaseConnection>,
    features: ResolvedFeatures,
    path: web::Path<i32>,
) -> Result<HttpResponse, Error> {
    features.require(Feature::Elections)?;
    let election_id = path.into_inner();

    let election = match elections::Entity::find_by_id(election_id)
        .one(db.get_ref())
        .await
    {
        Ok(Some(election)) => election,
        Ok(None) => return Ok(json_error(StatusCode::NOT_FOUND, "Election not found")),
        Err(e) => {
            log::error!("Failed to load election {}: {}", election_id, e);
            return Ok(json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to fetch election results",
            ));
        }
    };

    let now = election::now();
    if !features.is_enabled(Feature::LiveResults) && now <= election.end_date {
        return Ok(json_error(
            StatusCode::FORBIDDEN,
            "Results are not available until voting closes",
        ));
    }

    match load_election_results(db.get_ref(), &election, now).await {
        Ok(results) => Ok(HttpResponse::Ok().json(results)),
        Err(e) => {
            log::error!("Failed to tally election {}: {}", election_id, e);
            Ok(json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to fetch election results",
            ))
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct VotingStatusResponse {
    election_id: i32,
    voting_status: VotingStatus,
    unopposed: UnopposedStatus,
    /// Empty for anonymous visitors.
    completed_ballots: Vec<SessionType>,
    nominations_enabled: bool,
    /// Echo back in ballot and nomination submissions.
    csrf_token: String,
}

#[get("/api/elections/{election_id}/voting-status")]
pub async fn view_voting_status(
    client: ClientCtx,
    db: web::Data<DatabaseConnection>,
    features: ResolvedFeatures,
    path: web::Path<i32>,
) -> Result<HttpResponse, Error> {
    features.require(Feature::Elections)?;
    let election = find_election(db.get_ref(), path.into_inner()).await?;

    let config = VotingConfig::from_election_or_default(&election);
    let now = election::now();
    let voting_status = VotingStatus::evaluate(&election, &config, now);
    let unopposed =
        compute_unopposed_status_or_default(db.get_ref(), &election, &config, now).await;

    let completed_ballots = match client.get_id() {
        Some(user_id) => completed_sessions(db.get_ref(), user_id, election.id)
            .await
            .map_err(actix_web::error::ErrorInternalServerError)?,
        None => Vec::new(),
    };

    Ok(HttpResponse::Ok().json(VotingStatusResponse {
        election_id: election.id,
        voting_status,
        unopposed,
        completed_ballots,
        nominations_enabled: features.is_enabled(Feature::Nominations),
        csrf_token: client.get_csrf_token().to_string(),
    }))
}
