//! Nomination form submission.

use crate::config::{Feature, ResolvedFeatures};
use crate::election::nomination::{submit_nomination, NominationRequest};
use crate::election::{self, ElectionError};
use crate::middleware::ClientCtx;
use actix_web::{post, web, Error, HttpResponse, Responder};
use sea_orm::DatabaseConnection;
use serde::Deserialize;

pub(super) fn configure(conf: &mut actix_web::web::ServiceConfig) {
    conf.service(create_nomination);
}

#[derive(Deserialize)]
pub struct NominationFormData {
    pub csrf_token: String,
    pub position: String,
    pub full_name: String,
    pub bio: Option<String>,
    pub manifesto: Option<String>,
    pub photo_url: Option<String>,
}

impl From<NominationFormData> for NominationRequest {
    fn from(form: NominationFormData) -> Self {
        Self {
            position: form.position,
            full_name: form.full_name,
            bio: form.bio,
            manifesto: form.manifesto,
            photo_url: form.photo_url,
        }
    }
}

#[post("/elections/{election_id}/nominations")]
pub async fn create_nomination(
    client: ClientCtx,
    cookies: actix_session::Session,
    db: web::Data<DatabaseConnection>,
    features: ResolvedFeatures,
    path: web::Path<i32>,
    form: web::Form<NominationFormData>,
) -> Result<impl Responder, Error> {
    features.require(Feature::Elections)?;
    if !features.is_enabled(Feature::Nominations) {
        return Err(ElectionError::NominationsClosed.into());
    }

    crate::middleware::csrf::validate_csrf_token(&cookies, &form.csrf_token)?;
    let user_id = client.require_login()?;
    let election_id = path.into_inner();

    submit_nomination(
        db.get_ref(),
        user_id,
        election_id,
        form.into_inner().into(),
        election::now(),
    )
    .await?;

    Ok(HttpResponse::Found()
        .append_header(("Location", format!("/elections/{}/", election_id)))
        .finish())
}
