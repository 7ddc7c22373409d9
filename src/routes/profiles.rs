use actix_web::{web, HttpResponse, Responder};
use validator::Validate;
use crate::models::{ErrorResponse, ProfileForm, ProfileLookupQuery};
use crate::routes::{bad_request, internal_error, AppState};
use crate::services::ProfileStoreError;

/// Configure profile routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/profiles", web::post().to(save_profile))
        .route("/profiles", web::get().to(lookup_profile));
}

/// Save a profile
///
/// POST /api/v1/profiles
async fn save_profile(
    state: web::Data<AppState>,
    form: web::Json<ProfileForm>,
) -> impl Responder {
    match state.profiles.save(form.into_inner()).await {
        Ok(stored) => HttpResponse::Created().json(stored),
        Err(ProfileStoreError::Validation(errors)) => bad_request("Validation failed", errors),
        Err(e) => {
            tracing::error!("Failed to save profile: {}", e);
            internal_error("Failed to save profile", e)
        }
    }
}

/// Look up the latest profile saved under an email
///
/// GET /api/v1/profiles?email={email}
async fn lookup_profile(
    state: web::Data<AppState>,
    query: web::Query<ProfileLookupQuery>,
) -> impl Responder {
    if let Err(errors) = query.validate() {
        return bad_request("Validation failed", errors);
    }

    match state.profiles.find_by_email(&query.email).await {
        Ok(Some(stored)) => HttpResponse::Ok().json(stored),
        Ok(None) => HttpResponse::NotFound().json(ErrorResponse {
            error: "Profile not found".to_string(),
            message: format!("No profile saved for {}", query.email),
            status_code: 404,
        }),
        Err(e) => {
            tracing::error!("Failed to read profiles: {}", e);
            internal_error("Failed to read profiles", e)
        }
    }
}
