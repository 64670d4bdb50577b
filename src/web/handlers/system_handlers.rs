// src/web/handlers/system_handlers.rs
use crate::dashboard::{Dashboard, DatasetInfo};
use crate::web::types::{DataResponse, TextResponse};

use rocket::serde::json::Json;
use rocket::State;
use tracing::info;

pub async fn health_handler(dashboard: &State<Dashboard>) -> Json<TextResponse> {
    let info = dashboard.info();
    info!("Health check, dataset available: {}", info.available);

    let message = if info.available {
        format!("OK: {} records loaded", info.records)
    } else {
        "OK: running without data".to_string()
    };
    Json(TextResponse::success(message, None))
}

pub async fn dataset_info_handler(dashboard: &State<Dashboard>) -> Json<DataResponse<DatasetInfo>> {
    let info = dashboard.info();
    let message = format!(
        "{} records from years {:?}",
        info.records, info.loaded_years
    );
    Json(DataResponse::success(message, info, None))
}
