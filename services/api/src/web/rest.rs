//! services/api/src/web/rest.rs
//!
//! Contains the Axum handlers for the REST API endpoints and the master
//! definition for the OpenAPI specification.

use crate::web::protocol::{
    BucketsResponse, ClassifyRequest, PriceHistoryDto, PricePointDto, PriceReportResponse,
    PriceSummaryDto, PriceSummaryRequest, RecommendRequest, RecommendationResponse, ReminderDto,
    ReminderQuery, SizeSuggestionDto, UsageRequest, UsageResponse, VendorSummaryDto,
};
use crate::web::state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use chrono::{Local, NaiveDate};
use nestuity_core::domain::{BabyId, DiaperSupply, PriceHistoryItem, ProductId, ReminderRecord};
use nestuity_core::ports::PortError;
use nestuity_core::reminders::{classify, CategoryFilter, TimeScope};
use nestuity_core::sizing::{age_in_months, RecommendError};
use nestuity_core::usage;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, error, info};
use utoipa::{OpenApi, ToSchema};

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        health_handler,
        classify_handler,
        baby_reminders_handler,
        list_sizes_handler,
        recommend_handler,
        baby_recommendation_handler,
        usage_projection_handler,
        price_summary_handler,
        product_prices_handler,
    ),
    components(
        schemas(
            HealthResponse,
            ReminderDto,
            ClassifyRequest,
            BucketsResponse,
            SizeSuggestionDto,
            RecommendRequest,
            RecommendationResponse,
            UsageRequest,
            UsageResponse,
            PriceHistoryDto,
            PriceSummaryRequest,
            PriceSummaryDto,
            VendorSummaryDto,
            PricePointDto,
            PriceReportResponse,
        )
    ),
    tags(
        (name = "Nestuity API", description = "Reminder buckets, diaper size suggestions, restock projections and price comparison.")
    )
)]
pub struct ApiDoc;

type HandlerError = (StatusCode, String);

#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    status: String,
}

//=========================================================================================
// Shared Helpers
//=========================================================================================

fn parse_filters(
    scope: Option<&str>,
    category: Option<&str>,
) -> Result<(TimeScope, CategoryFilter), HandlerError> {
    let scope = match scope {
        Some(raw) => raw
            .parse::<TimeScope>()
            .map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))?,
        None => TimeScope::All,
    };
    let category = match category {
        Some(raw) => raw
            .parse::<CategoryFilter>()
            .map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))?,
        None => CategoryFilter::All,
    };
    Ok((scope, category))
}

fn bucket_response(
    reminders: Vec<ReminderRecord>,
    scope: TimeScope,
    category: CategoryFilter,
) -> BucketsResponse {
    let total = reminders.len();
    let buckets = classify(reminders, scope);
    debug!(
        "Classified {} reminders with scope {}: {} placed, {} dropped",
        total,
        scope,
        buckets.len(),
        total - buckets.len()
    );

    let visible: Vec<_> = buckets
        .visible(category)
        .into_iter()
        .map(|(category, _)| category)
        .collect();
    BucketsResponse::new(scope.as_str(), &visible, &buckets)
}

fn port_error_response(e: PortError, action: &str) -> HandlerError {
    match e {
        PortError::NotFound(what) => (StatusCode::NOT_FOUND, format!("{} not found", what)),
        other => {
            error!("Failed to {}: {:?}", action, other);
            (
                StatusCode::BAD_GATEWAY,
                format!("Failed to {}", action),
            )
        }
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn recommendation_response(
    app_state: &AppState,
    weight_kg: Option<f64>,
    age_months: Option<f64>,
) -> Result<RecommendationResponse, HandlerError> {
    let recommendation = app_state
        .size_table
        .recommend(weight_kg, age_months)
        .map_err(|e: RecommendError| (StatusCode::BAD_REQUEST, e.to_string()))?;
    Ok(RecommendationResponse::new(recommendation, age_months))
}

//=========================================================================================
// REST API Handlers
//=========================================================================================

/// Liveness probe.
#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Service is up", body = HealthResponse))
)]
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

/// Classify a caller-supplied list of reminders into buckets.
#[utoipa::path(
    post,
    path = "/reminders/classify",
    request_body = ClassifyRequest,
    responses(
        (status = 200, description = "Reminders grouped into buckets", body = BucketsResponse),
        (status = 400, description = "Unknown scope or category")
    )
)]
pub async fn classify_handler(
    Json(req): Json<ClassifyRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    let (scope, category) = parse_filters(req.scope.as_deref(), req.category.as_deref())?;
    let reminders = req.reminders.into_iter().map(ReminderDto::into_domain).collect();
    Ok(Json(bucket_response(reminders, scope, category)))
}

/// Fetch a baby's upcoming reminders from the backend and classify them.
#[utoipa::path(
    get,
    path = "/babies/{baby_id}/reminders",
    responses(
        (status = 200, description = "Reminders grouped into buckets", body = BucketsResponse),
        (status = 400, description = "Unknown scope or category"),
        (status = 404, description = "Baby not found"),
        (status = 502, description = "Backend failure")
    ),
    params(
        ("baby_id" = i64, Path, description = "The backend ID of the baby."),
        ("scope" = Option<String>, Query, description = "all, daily, weekly or monthly."),
        ("category" = Option<String>, Query, description = "all, tasks, vaccinations, completed or overdue.")
    )
)]
pub async fn baby_reminders_handler(
    State(app_state): State<Arc<AppState>>,
    Path(baby_id): Path<BabyId>,
    Query(query): Query<ReminderQuery>,
) -> Result<impl IntoResponse, HandlerError> {
    let (scope, category) = parse_filters(query.scope.as_deref(), query.category.as_deref())?;
    let reminders = app_state
        .backend
        .upcoming_reminders(baby_id)
        .await
        .map_err(|e| port_error_response(e, "fetch reminders"))?;
    Ok(Json(bucket_response(reminders, scope, category)))
}

/// List the loaded size table in order.
#[utoipa::path(
    get,
    path = "/sizes",
    responses((status = 200, description = "The size table", body = Vec<SizeSuggestionDto>))
)]
pub async fn list_sizes_handler(State(app_state): State<Arc<AppState>>) -> impl IntoResponse {
    let sizes: Vec<SizeSuggestionDto> = app_state
        .size_table
        .entries()
        .iter()
        .map(SizeSuggestionDto::from)
        .collect();
    Json(sizes)
}

/// Suggest a diaper size from weight and age (or date of birth).
#[utoipa::path(
    post,
    path = "/sizes/recommend",
    request_body = RecommendRequest,
    responses(
        (status = 200, description = "Suggestion, or a prompt when the weight is missing", body = RecommendationResponse),
        (status = 400, description = "Non-finite input")
    )
)]
pub async fn recommend_handler(
    State(app_state): State<Arc<AppState>>,
    Json(req): Json<RecommendRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    let age_months = req
        .age_months
        .or_else(|| req.dob.map(|dob| f64::from(age_in_months(dob, today()))));
    let response = recommendation_response(&app_state, req.weight_kg, age_months)?;
    Ok(Json(response))
}

/// Suggest a diaper size for a stored baby profile.
#[utoipa::path(
    get,
    path = "/babies/{baby_id}/size-recommendation",
    responses(
        (status = 200, description = "Suggestion, or a prompt when the profile has no weight", body = RecommendationResponse),
        (status = 404, description = "Baby not found"),
        (status = 502, description = "Backend failure")
    ),
    params(
        ("baby_id" = i64, Path, description = "The backend ID of the baby.")
    )
)]
pub async fn baby_recommendation_handler(
    State(app_state): State<Arc<AppState>>,
    Path(baby_id): Path<BabyId>,
) -> Result<impl IntoResponse, HandlerError> {
    let profile = app_state
        .backend
        .baby_profile(baby_id)
        .await
        .map_err(|e| port_error_response(e, "fetch baby profile"))?;

    let age_months = profile.dob.map(|dob| f64::from(age_in_months(dob, today())));
    let response = recommendation_response(&app_state, profile.weight_kg, age_months)?;
    if let Some(current) = &response.current {
        info!("Suggested size {} for baby {}", current.size, baby_id);
    }
    Ok(Json(response))
}

/// Project how long the diapers at home last and how many boxes to buy.
#[utoipa::path(
    post,
    path = "/usage/projection",
    request_body = UsageRequest,
    responses(
        (status = 200, description = "Restock projection", body = UsageResponse),
        (status = 400, description = "Negative quantities")
    )
)]
pub async fn usage_projection_handler(
    Json(req): Json<UsageRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    if req.boxes_at_home < 0.0 || req.diapers_per_box < 0.0 {
        return Err((
            StatusCode::BAD_REQUEST,
            "Box counts cannot be negative".to_string(),
        ));
    }
    let supply = DiaperSupply::from_boxes(
        req.boxes_at_home,
        req.diapers_per_box,
        req.preferred_supply_min_days,
    );
    let projection = usage::project(req.weight_kg, req.daily_usage, &supply);
    Ok(Json(UsageResponse::from(projection)))
}

/// Summarise a caller-supplied price history per retailer.
#[utoipa::path(
    post,
    path = "/prices/summary",
    request_body = PriceSummaryRequest,
    responses(
        (status = 200, description = "Per-retailer summaries and a daily timeline", body = PriceReportResponse),
        (status = 400, description = "Non-finite or negative price")
    )
)]
pub async fn price_summary_handler(
    Json(req): Json<PriceSummaryRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    if req.price_history.iter().any(|p| !p.price.is_finite() || p.price < 0.0) {
        return Err((
            StatusCode::BAD_REQUEST,
            "Prices must be finite and not negative".to_string(),
        ));
    }
    let history: Vec<PriceHistoryItem> = req
        .price_history
        .into_iter()
        .map(PriceHistoryDto::into_domain)
        .collect();
    Ok(Json(PriceReportResponse::from_history(&history)))
}

/// Fetch a product from the backend and summarise its price history.
#[utoipa::path(
    get,
    path = "/products/{product_id}/prices",
    responses(
        (status = 200, description = "Per-retailer summaries and a daily timeline", body = PriceReportResponse),
        (status = 404, description = "Product not found"),
        (status = 502, description = "Backend failure")
    ),
    params(
        ("product_id" = i64, Path, description = "The backend ID of the product.")
    )
)]
pub async fn product_prices_handler(
    State(app_state): State<Arc<AppState>>,
    Path(product_id): Path<ProductId>,
) -> Result<impl IntoResponse, HandlerError> {
    let product = app_state
        .backend
        .baby_product(product_id)
        .await
        .map_err(|e| port_error_response(e, "fetch product"))?;
    debug!(
        "Summarising {} prices for product {}",
        product.price_history.len(),
        product_id
    );
    Ok(Json(PriceReportResponse::for_product(&product)))
}
