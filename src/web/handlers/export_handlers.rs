// src/web/handlers/export_handlers.rs

use crate::dashboard::Dashboard;
use crate::export;
use crate::search::SearchQuery;
use crate::web::types::{CsvResponse, StandardErrorResponse, StandardRequest, WithConversationId};

use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::State;
use tracing::{error, info};

pub async fn export_csv_handler(
    request: Json<StandardRequest<SearchQuery>>,
    dashboard: &State<Dashboard>,
) -> Result<CsvResponse, (Status, Json<StandardErrorResponse>)> {
    let conversation_id = request.conversation_id();

    let Some(full) = dashboard.full_results(&request.data) else {
        return Err((
            Status::ServiceUnavailable,
            Json(StandardErrorResponse::no_data(conversation_id)),
        ));
    };

    match export::to_csv_bytes(&full.rows) {
        Ok(bytes) => {
            let filename = export::export_file_name();
            info!(
                "CSV export: {} rows, {} bytes, filename: {}",
                full.rows.len(),
                bytes.len(),
                filename
            );
            Ok(CsvResponse::with_filename(bytes, filename))
        }
        Err(e) => {
            error!("CSV export failed: {:#}", e);
            Err((
                Status::InternalServerError,
                Json(StandardErrorResponse::new(
                    format!("CSV export failed: {}", e),
                    "EXPORT_ERROR".to_string(),
                    vec!["Try again with fewer filters".to_string()],
                    conversation_id,
                )),
            ))
        }
    }
}
