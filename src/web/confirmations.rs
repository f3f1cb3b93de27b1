use super::error::json_error;
use crate::config::{Feature, ResolvedFeatures};
use crate::election::confirmation::find_own_confirmation;
use crate::middleware::ClientCtx;
use actix_web::http::StatusCode;
use actix_web::{error, get, web, Error, HttpResponse};
use sea_orm::DatabaseConnection;

pub(super) fn configure(conf: &mut actix_web::web::ServiceConfig) {
    conf.service(view_confirmation);
}

/// Members may only look up their own confirmation codes. Someone else's
/// code is indistinguishable from one that was never issued.
#[get("/api/vote-confirmations/{code}")]
pub async fn view_confirmation(
    client: ClientCtx,
    db: web::Data<DatabaseConnection>,
    features: ResolvedFeatures,
    path: web::Path<String>,
) -> Result<HttpResponse, Error> {
    features.require(Feature::Elections)?;
    let user_id = client.require_login()?;

    match find_own_confirmation(db.get_ref(), user_id, &path.into_inner())
        .await
        .map_err(error::ErrorInternalServerError)?
    {
        Some(receipt) => Ok(HttpResponse::Ok().json(receipt)),
        None => Ok(json_error(
            StatusCode::NOT_FOUND,
            "Confirmation code not found",
        )),
    }
}
