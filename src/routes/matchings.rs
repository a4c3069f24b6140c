use actix_web::http::header::{self, ContentDisposition, DispositionParam, DispositionType};
use actix_web::{guard, web, HttpResponse, Responder};
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::core::report::{export_records, NotificationTemplate};
use crate::core::Matcher;
use crate::models::{
    ConfirmResponse, CreateMatchingRequest, HealthResponse, MatchResponse,
    MatchingDetailsResponse, Roster,
};
use crate::routes::error::ApiError;
use crate::services::{
    confirm_matching, merge_history, read_participants, to_csv_bytes, HistoryStore, MatchingStore,
    StoredMatching,
};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub history: Arc<dyn HistoryStore>,
    pub matchings: Arc<dyn MatchingStore>,
    pub matcher: Matcher,
    pub template: NotificationTemplate,
}

/// Configure all matching routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .service(
            web::resource("/matchings")
                .route(web::post().guard(guard::fn_guard(is_csv)).to(create_matching_from_csv))
                .route(web::post().to(create_matching)),
        )
        .route("/matchings/{matching_id}", web::get().to(get_matching))
        .route("/matchings/{matching_id}/confirm", web::post().to(confirm))
        .route("/matchings/{matching_id}/download", web::get().to(download));
}

fn is_csv(ctx: &guard::GuardContext<'_>) -> bool {
    ctx.head()
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.trim_start().starts_with("text/csv"))
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let history_healthy = state.history.health_check().await.unwrap_or(false);

    let status = if history_healthy { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Create matching endpoint
///
/// POST /api/v1/matchings
///
/// Request body:
/// ```json
/// {
///   "participants": [
///     {
///       "name": "string",
///       "discord": "string",
///       "email": "string",
///       "wishlist": "string",
///       "wishlistTags": "tag, tag" | ["tag"],
///       "blacklistTags": "tag, tag" | ["tag"],
///       "references": "string"
///     }
///   ]
/// }
/// ```
///
/// Responds with counts and the unmatched participants only. An incomplete
/// matching is still a 200; the caller decides whether to retry or confirm.
async fn create_matching(
    state: web::Data<AppState>,
    req: web::Json<CreateMatchingRequest>,
) -> Result<HttpResponse, ApiError> {
    match_and_store(&state, req.into_inner()).await
}

/// Create matching from a roster sheet
///
/// POST /api/v1/matchings with `Content-Type: text/csv`
///
/// Columns: `Name, Discord, Email, Wishlist, Wishlist Tags, Blacklist Tags, References`.
/// Tag cells are comma-delimited; the last four columns may be blank or absent.
async fn create_matching_from_csv(
    state: web::Data<AppState>,
    body: web::Bytes,
) -> Result<HttpResponse, ApiError> {
    let participants = read_participants(body.as_ref())?;
    tracing::info!("Read {} participants from uploaded sheet", participants.len());

    match_and_store(&state, CreateMatchingRequest { participants }).await
}

async fn match_and_store(
    state: &AppState,
    request: CreateMatchingRequest,
) -> Result<HttpResponse, ApiError> {
    if let Err(errors) = request.validate() {
        tracing::info!("Validation failed for create_matching request: {:?}", errors);
        return Err(errors.into());
    }

    let participants = merge_history(request.participants, state.history.as_ref()).await?;
    let roster = Roster::new(participants)?;
    let total = roster.len();

    tracing::info!("Matching {} participants", total);

    let matcher = state.matcher;
    let run = web::block(move || matcher.run(&roster)).await?;
    let matching = StoredMatching::new(run, total);
    let response = MatchResponse {
        matching_id: matching.id,
        report: matching.report.clone(),
    };

    state.matchings.create(matching).await?;

    tracing::info!(
        "Created matching {}: {}/{} matched",
        response.matching_id,
        response.report.matched_count,
        response.report.total_count
    );

    Ok(HttpResponse::Ok().json(response))
}

/// Matching details endpoint
///
/// GET /api/v1/matchings/{matching_id}
async fn get_matching(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let matching = state.matchings.get(path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(MatchingDetailsResponse {
        matching_id: matching.id,
        status: matching.status,
        confirmed: matching.confirmed(),
        attempts_used: matching.attempts_used,
        created_at: matching.created_at,
        report: matching.report,
    }))
}

/// Confirm endpoint
///
/// POST /api/v1/matchings/{matching_id}/confirm
///
/// Commits the matching's pairings to history. A matching can be confirmed once.
async fn confirm(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let matching_id = path.into_inner();
    let recorded =
        confirm_matching(state.matchings.as_ref(), state.history.as_ref(), matching_id).await?;

    Ok(HttpResponse::Ok().json(ConfirmResponse {
        message: "Matching confirmed successfully".to_string(),
        matching_id,
        recorded_pairings: recorded as usize,
    }))
}

/// Download endpoint
///
/// GET /api/v1/matchings/{matching_id}/download
///
/// Returns the assignment sheet as CSV.
async fn download(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let matching = state.matchings.get(path.into_inner()).await?;
    let records = export_records(&matching.pairings, &state.template);
    let body = to_csv_bytes(&records)?;

    Ok(HttpResponse::Ok()
        .content_type("text/csv")
        .insert_header(ContentDisposition {
            disposition: DispositionType::Attachment,
            parameters: vec![DispositionParam::Filename(format!(
                "output_{}.csv",
                matching.id
            ))],
        })
        .body(body))
}
