// src/web/mod.rs

pub mod handlers;
pub mod types;

pub use handlers::*;
pub use types::*;

use crate::dashboard::{Dashboard, DatasetInfo};
use crate::environment::ServerSettings;
use crate::options::FilterOptions;
use crate::search::{FullResults, SearchOutcome, SearchQuery};
use anyhow::Result;
use rocket::fairing::{Fairing, Info, Kind};
use rocket::figment::Figment;
use rocket::http::{Header, Status};
use rocket::serde::json::Json;
use rocket::{catchers, get, options, post, routes, Build, Request, Response, Rocket, State};
use tracing::info;

// CORS Fairing
pub struct Cors;

#[rocket::async_trait]
impl Fairing for Cors {
    fn info(&self) -> Info {
        Info {
            name: "Add CORS headers to responses",
            kind: Kind::Response,
        }
    }

    async fn on_response<'r>(&self, _request: &'r Request<'_>, response: &mut Response<'r>) {
        response.set_header(Header::new("Access-Control-Allow-Origin", "*"));
        response.set_header(Header::new(
            "Access-Control-Allow-Methods",
            "POST, GET, OPTIONS",
        ));
        response.set_header(Header::new("Access-Control-Allow-Headers", "*"));
        response.set_header(Header::new(
            "Access-Control-Expose-Headers",
            "Content-Disposition",
        ));
    }
}

#[get("/health")]
pub async fn health(dashboard: &State<Dashboard>) -> Json<TextResponse> {
    handlers::health_handler(dashboard).await
}

#[get("/dataset")]
pub async fn dataset_info(dashboard: &State<Dashboard>) -> Json<DataResponse<DatasetInfo>> {
    handlers::dataset_info_handler(dashboard).await
}

#[get("/options")]
pub async fn filter_options(dashboard: &State<Dashboard>) -> Json<DataResponse<FilterOptions>> {
    handlers::filter_options_handler(dashboard).await
}

#[post("/search", data = "<request>")]
pub async fn search(
    request: Json<StandardRequest<SearchQuery>>,
    dashboard: &State<Dashboard>,
) -> Json<DataResponse<SearchOutcome>> {
    handlers::search_handler(request, dashboard).await
}

#[post("/search/full", data = "<request>")]
pub async fn full_results(
    request: Json<StandardRequest<SearchQuery>>,
    dashboard: &State<Dashboard>,
) -> Result<Json<DataResponse<FullResults>>, (Status, Json<StandardErrorResponse>)> {
    handlers::full_results_handler(request, dashboard).await
}

#[post("/export", data = "<request>")]
pub async fn export_csv(
    request: Json<StandardRequest<SearchQuery>>,
    dashboard: &State<Dashboard>,
) -> Result<CsvResponse, (Status, Json<StandardErrorResponse>)> {
    handlers::export_csv_handler(request, dashboard).await
}

#[options("/<_..>")]
pub async fn options() -> Status {
    Status::Ok
}

// Error catchers
#[rocket::catch(400)]
pub fn bad_request() -> Json<StandardErrorResponse> {
    Json(StandardErrorResponse::new(
        "Invalid request format".to_string(),
        "BAD_REQUEST".to_string(),
        vec![
            "Check your request JSON format".to_string(),
            "Verify all field types match the search query".to_string(),
        ],
        None,
    ))
}

#[rocket::catch(404)]
pub fn not_found() -> Json<StandardErrorResponse> {
    Json(StandardErrorResponse::new(
        "Endpoint not found".to_string(),
        "NOT_FOUND".to_string(),
        vec!["Available endpoints live under /api".to_string()],
        None,
    ))
}

#[rocket::catch(422)]
pub fn unprocessable() -> Json<StandardErrorResponse> {
    Json(StandardErrorResponse::new(
        "Search query could not be understood".to_string(),
        "INVALID_QUERY".to_string(),
        vec![
            "Categories must be one of the values listed by GET /api/options".to_string(),
            "Scores and approval rates are numbers between 0 and 1".to_string(),
        ],
        None,
    ))
}

#[rocket::catch(500)]
pub fn internal_error() -> Json<StandardErrorResponse> {
    Json(StandardErrorResponse::new(
        "Internal server error".to_string(),
        "INTERNAL_ERROR".to_string(),
        vec![
            "Try again in a few moments".to_string(),
            "Check the server logs if the problem persists".to_string(),
        ],
        None,
    ))
}

pub fn build_rocket(dashboard: Dashboard, figment: Figment) -> Rocket<Build> {
    rocket::custom(figment)
        .attach(Cors)
        .manage(dashboard)
        .register(
            "/api",
            catchers![bad_request, not_found, unprocessable, internal_error],
        )
        .mount(
            "/api",
            routes![
                health,
                dataset_info,
                filter_options,
                search,
                full_results,
                export_csv,
                options,
            ],
        )
}

// Main server start function
pub async fn start_web_server(dashboard: Dashboard, settings: &ServerSettings) -> Result<()> {
    let figment = rocket::Config::figment()
        .merge(("address", settings.address.clone()))
        .merge(("port", settings.port));

    let info = dashboard.info();
    info!(
        "Starting employer search API on {}:{}",
        settings.address, settings.port
    );
    info!(
        "Dataset available: {}, records: {}, years: {:?}",
        info.available, info.records, info.loaded_years
    );

    build_rocket(dashboard, figment)
        .launch()
        .await
        .map_err(|e| anyhow::anyhow!("Web server failed: {}", e))?;

    Ok(())
}
