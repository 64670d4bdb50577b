// src/web/handlers/search_handlers.rs

use crate::dashboard::Dashboard;
use crate::options::FilterOptions;
use crate::search::{FullResults, SearchOutcome, SearchQuery};
use crate::web::types::{
    DataResponse, StandardErrorResponse, StandardRequest, WithConversationId,
};

use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::State;
use tracing::{info, warn};

pub async fn search_handler(
    request: Json<StandardRequest<SearchQuery>>,
    dashboard: &State<Dashboard>,
) -> Json<DataResponse<SearchOutcome>> {
    let conversation_id = request.conversation_id();
    let query = &request.data;

    info!(
        "Search: text={:?}, states={:?}, cities={:?}, categories={:?}, min_score={}, min_approval={}, cap_exempt_only={}, year={:?}",
        query.text,
        query.states,
        query.cities,
        query.categories,
        query.min_score,
        query.min_approval,
        query.cap_exempt_only,
        query.year
    );

    let outcome = dashboard.search(query);
    let message = if dashboard.has_data() {
        format!("Found {} unique employers", outcome.total_matches)
    } else {
        warn!("Search requested while no dataset is loaded");
        outcome.summary.clone()
    };

    Json(DataResponse::success(message, outcome, conversation_id))
}

pub async fn full_results_handler(
    request: Json<StandardRequest<SearchQuery>>,
    dashboard: &State<Dashboard>,
) -> Result<Json<DataResponse<FullResults>>, (Status, Json<StandardErrorResponse>)> {
    let conversation_id = request.conversation_id();

    match dashboard.full_results(&request.data) {
        Some(full) => {
            info!("Full results: {} employers", full.total_matches);
            Ok(Json(DataResponse::success(
                format!("All {} matching employers", full.total_matches),
                full,
                conversation_id,
            )))
        }
        None => Err((
            Status::ServiceUnavailable,
            Json(StandardErrorResponse::no_data(conversation_id)),
        )),
    }
}

pub async fn filter_options_handler(
    dashboard: &State<Dashboard>,
) -> Json<DataResponse<FilterOptions>> {
    let options = dashboard.filter_options();
    let message = format!(
        "{} states/territories, {} cities",
        options.states.len(),
        options.cities.len()
    );

    Json(DataResponse::success(message, options, None))
}
