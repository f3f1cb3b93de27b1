//! Ballot submission endpoints. Both take JSON and answer with a receipt.

use crate::config::{Feature, ResolvedFeatures};
use crate::election;
use crate::election::ballot::{
    submit_candidate_ballot, submit_initiative_ballot, CandidateBallot, InitiativeBallot,
};
use crate::middleware::ClientCtx;
use actix_web::{post, web, Error, HttpResponse};
use sea_orm::DatabaseConnection;
use serde::Deserialize;

pub(super) fn configure(conf: &mut actix_web::web::ServiceConfig) {
    conf.service(cast_candidate_ballot)
        .service(cast_initiative_ballot);
}

#[derive(Deserialize)]
pub struct CandidateBallotData {
    pub csrf_token: String,
    #[serde(flatten)]
    pub ballot: CandidateBallot,
}

#[derive(Deserialize)]
pub struct InitiativeBallotData {
    pub csrf_token: String,
    #[serde(flatten)]
    pub ballot: InitiativeBallot,
}

#[post("/elections/{election_id}/ballot/candidates")]
pub async fn cast_candidate_ballot(
    client: ClientCtx,
    cookies: actix_session::Session,
    db: web::Data<DatabaseConnection>,
    features: ResolvedFeatures,
    path: web::Path<i32>,
    body: web::Json<CandidateBallotData>,
) -> Result<HttpResponse, Error> {
    features.require(Feature::Elections)?;
    crate::middleware::csrf::validate_csrf_token(&cookies, &body.csrf_token)?;
    let user_id = client.require_login()?;

    let receipt = submit_candidate_ballot(
        db.get_ref(),
        user_id,
        path.into_inner(),
        body.into_inner().ballot,
        election::now(),
    )
    .await?;

    Ok(HttpResponse::Created().json(receipt))
}

#[post("/elections/{election_id}/ballot/initiatives")]
pub async fn cast_initiative_ballot(
    client: ClientCtx,
    cookies: actix_session::Session,
    db: web::Data<DatabaseConnection>,
    features: ResolvedFeatures,
    path: web::Path<i32>,
    body: web::Json<InitiativeBallotData>,
) -> Result<HttpResponse, Error> {
    features.require(Feature::Elections)?;
    crate::middleware::csrf::validate_csrf_token(&cookies, &body.csrf_token)?;
    let user_id = client.require_login()?;

    let receipt = submit_initiative_ballot(
        db.get_ref(),
        user_id,
        path.into_inner(),
        body.into_inner().ballot,
        election::now(),
    )
    .await?;

    Ok(HttpResponse::Created().json(receipt))
}
