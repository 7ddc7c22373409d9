use actix_web::{web, HttpResponse, Responder};
use validator::Validate;
use crate::core::{deadline, filters, CatalogStatistics};
use crate::models::{
    CatalogStatsResponse, ErrorResponse, ReloadResponse, SearchScholarshipsQuery,
    SearchScholarshipsResponse, TitleLookupQuery,
};
use crate::routes::{bad_request, internal_error, AppState};

/// Configure catalog routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/scholarships", web::get().to(search_scholarships))
        .route("/scholarships/stats", web::get().to(catalog_stats))
        .route("/scholarships/by-title", web::get().to(scholarship_by_title))
        .route("/catalog/reload", web::post().to(reload_catalog));
}

/// Keyword search over the catalog
///
/// GET /api/v1/scholarships?query=engineering&category=STEM&minAmount=1000
async fn search_scholarships(
    state: web::Data<AppState>,
    query: web::Query<SearchScholarshipsQuery>,
) -> impl Responder {
    let query = filters::CatalogQuery::from(query.into_inner());
    let snapshot = state.catalog.snapshot().await;
    let scholarships = filters::search_catalog(&snapshot.catalog.scholarships, &query);

    HttpResponse::Ok().json(SearchScholarshipsResponse {
        total_results: scholarships.len(),
        scholarships,
    })
}

/// Look up one scholarship by its exact title, ignoring case
///
/// GET /api/v1/scholarships/by-title?title={title}
async fn scholarship_by_title(
    state: web::Data<AppState>,
    query: web::Query<TitleLookupQuery>,
) -> impl Responder {
    if let Err(errors) = query.validate() {
        return bad_request("Validation failed", errors);
    }

    let snapshot = state.catalog.snapshot().await;
    match filters::find_by_title(&snapshot.catalog.scholarships, &query.title) {
        Some(scholarship) => HttpResponse::Ok().json(scholarship),
        None => HttpResponse::NotFound().json(ErrorResponse {
            error: "Scholarship not found".to_string(),
            message: format!("No scholarship titled {}", query.title),
            status_code: 404,
        }),
    }
}

async fn catalog_stats(state: web::Data<AppState>) -> impl Responder {
    let snapshot = state.catalog.snapshot().await;
    let scholarships = &snapshot.catalog.scholarships;

    HttpResponse::Ok().json(CatalogStatsResponse {
        statistics: CatalogStatistics::from_catalog(scholarships, deadline::today()),
        categories: filters::categories(scholarships),
        warnings: &snapshot.catalog.warnings,
    })
}

/// Re-read the catalog file
///
/// POST /api/v1/catalog/reload
async fn reload_catalog(state: web::Data<AppState>) -> impl Responder {
    match state.catalog.reload().await {
        Ok(snapshot) => HttpResponse::Ok().json(ReloadResponse {
            scholarships: snapshot.catalog.len(),
            warnings: snapshot.catalog.warnings.len(),
            loaded_at: snapshot.loaded_at,
        }),
        Err(e) => {
            tracing::error!("Catalog reload failed: {}", e);
            internal_error("Failed to reload catalog", e)
        }
    }
}
