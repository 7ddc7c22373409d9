use actix_web::{web, HttpResponse, Responder};
use validator::Validate;
use crate::core::{deadline, normalize_profile, MatchError, MatchStatistics};
use crate::models::{FindMatchesRequest, FindMatchesResponse, HealthResponse, IneligibleRequest, IneligibleResponse};
use crate::routes::{bad_request, internal_error, AppState};

/// Configure all match-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/matches/find", web::post().to(find_matches))
        .route("/matches/ineligible", web::post().to(ineligible));
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let snapshot = state.catalog.snapshot().await;

    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        catalog_size: snapshot.catalog.len(),
        timestamp: chrono::Utc::now(),
    })
}

/// Find matches endpoint
///
/// POST /api/v1/matches/find
///
/// Request body:
/// ```json
/// {
///   "profile": {
///     "gpa": 3.8,
///     "gradeLevel": "College Sophomore",
///     "major": "Computer Science",
///     "state": "California",
///     "interests": ["coding"]
///   },
///   "limit": 15,
///   "filter": { "category": "STEM", "deadlineWindow": "month" }
/// }
/// ```
async fn find_matches(
    state: web::Data<AppState>,
    req: web::Json<FindMatchesRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for find_matches request: {}", errors);
        return bad_request("Validation failed", errors);
    }

    let limit = req
        .limit
        .unwrap_or(state.default_limit)
        .min(state.max_limit) as usize;

    let snapshot = state.catalog.snapshot().await;
    let outcome = match state
        .matcher
        .match_form(&req.profile, &snapshot.catalog, deadline::today())
    {
        Ok(outcome) => outcome,
        Err(MatchError::InvalidProfile(errors)) => {
            return bad_request("Validation failed", errors);
        }
        Err(e) => {
            tracing::error!("Matching failed: {}", e);
            return internal_error("Matching failed", e);
        }
    };

    let mut matches = req.filter.apply(outcome.matches);
    let statistics = MatchStatistics::from_matches(&matches);
    let total_results = matches.len();
    matches.truncate(limit);

    tracing::info!(
        "Returning {} of {} matches (from {} candidates, {} ineligible, {} below threshold)",
        matches.len(),
        total_results,
        outcome.total_candidates,
        outcome.hard_failures.len(),
        outcome.below_threshold
    );

    HttpResponse::Ok().json(FindMatchesResponse {
        matches,
        total_results,
        total_candidates: outcome.total_candidates,
        statistics,
        warnings: &snapshot.catalog.warnings,
    })
}

/// Scholarships the profile cannot apply to, with the rule that excluded each
///
/// POST /api/v1/matches/ineligible
async fn ineligible(
    state: web::Data<AppState>,
    req: web::Json<IneligibleRequest>,
) -> impl Responder {
    let profile = match normalize_profile(&req.profile) {
        Ok(profile) => profile,
        Err(errors) => return bad_request("Validation failed", errors),
    };

    let snapshot = state.catalog.snapshot().await;
    let failures = state
        .matcher
        .hard_filter_failures(&profile, &snapshot.catalog.scholarships);

    tracing::debug!(
        "{} of {} scholarships excluded by hard filters",
        failures.len(),
        snapshot.catalog.len()
    );

    HttpResponse::Ok().json(IneligibleResponse {
        failures,
        total_candidates: snapshot.catalog.len(),
    })
}
