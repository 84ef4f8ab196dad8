//! Job API endpoints
//!
//! Create jobs, attach addresses, poll progress and export results.

use crate::server::routes::ApiResponse;
use crate::server::state::AppState;
use crate::services::jobs::{ExportFormat, NewJob, ReportedOutcome};
use crate::storage::ResultOrder;
use crate::utils::error::{BatchError, Result};
use actix_web::http::header::{ContentDisposition, DispositionParam, DispositionType};
use actix_web::{HttpResponse, web};
use serde::Deserialize;
use tracing::info;

/// Configure job routes
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/v1/jobs")
            .route("", web::get().to(list_jobs))
            .route("", web::post().to(create_job))
            .route("/{job_id}", web::get().to(get_job))
            .route("/{job_id}/start", web::post().to(start_job))
            .route("/{job_id}/prepare", web::post().to(prepare_job))
            .route("/{job_id}/results", web::get().to(list_results))
            .route("/{job_id}/results/submit", web::post().to(submit_result))
            .route("/{job_id}/export", web::get().to(export_results)),
    );
}

/// Job creation payload; with addresses the job starts immediately
#[derive(Debug, Deserialize)]
pub struct CreateJobRequest {
    #[serde(flatten)]
    pub job: NewJob,
    pub addresses: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
pub struct AddressesRequest {
    pub addresses: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct ResultsQuery {
    pub order: Option<ResultOrder>,
}

#[derive(Debug, Deserialize)]
pub struct ExportQuery {
    pub format: Option<ExportFormat>,
}

/// Outcome reported by a caller; exactly one of `payload` and `error`
#[derive(Debug, Deserialize)]
pub struct SubmitResultRequest {
    pub address: String,
    pub payload: Option<serde_json::Value>,
    pub error: Option<String>,
}

impl SubmitResultRequest {
    fn into_outcome(self) -> Result<(String, ReportedOutcome)> {
        let outcome = match (self.payload, self.error) {
            (Some(payload), None) => ReportedOutcome::Success { payload },
            (None, Some(error)) => ReportedOutcome::Failed { error },
            _ => {
                return Err(BatchError::validation(
                    "exactly one of payload or error must be given",
                ));
            }
        };
        Ok((self.address, outcome))
    }
}

/// GET /v1/jobs
pub async fn list_jobs(state: web::Data<AppState>) -> Result<HttpResponse> {
    let jobs = state.jobs.list_jobs().await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(jobs)))
}

/// POST /v1/jobs
pub async fn create_job(
    state: web::Data<AppState>,
    payload: web::Json<CreateJobRequest>,
) -> Result<HttpResponse> {
    let CreateJobRequest { job, addresses } = payload.into_inner();

    let job = match addresses {
        Some(addresses) => state.jobs.submit(job, addresses).await?,
        None => state.jobs.create_job(job).await?,
    };
    info!(job_id = %job.id, total = job.total_addresses, "Job accepted via API");

    Ok(HttpResponse::Created().json(ApiResponse::success(job)))
}

/// GET /v1/jobs/{job_id}
pub async fn get_job(state: web::Data<AppState>, path: web::Path<String>) -> Result<HttpResponse> {
    let job = state.jobs.get_job(&path).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(job)))
}

/// POST /v1/jobs/{job_id}/start
pub async fn start_job(
    state: web::Data<AppState>,
    path: web::Path<String>,
    payload: web::Json<AddressesRequest>,
) -> Result<HttpResponse> {
    let job = state
        .jobs
        .start_job(&path, payload.into_inner().addresses)
        .await?;
    Ok(HttpResponse::Accepted().json(ApiResponse::success(job)))
}

/// POST /v1/jobs/{job_id}/prepare
pub async fn prepare_job(
    state: web::Data<AppState>,
    path: web::Path<String>,
    payload: web::Json<AddressesRequest>,
) -> Result<HttpResponse> {
    let job = state
        .jobs
        .prepare_job(&path, payload.into_inner().addresses)
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(job)))
}

/// GET /v1/jobs/{job_id}/results
pub async fn list_results(
    state: web::Data<AppState>,
    path: web::Path<String>,
    query: web::Query<ResultsQuery>,
) -> Result<HttpResponse> {
    let order = query.order.unwrap_or_default();
    let results = state.jobs.list_results(&path, order).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(results)))
}

/// POST /v1/jobs/{job_id}/results/submit
pub async fn submit_result(
    state: web::Data<AppState>,
    path: web::Path<String>,
    payload: web::Json<SubmitResultRequest>,
) -> Result<HttpResponse> {
    let (address, outcome) = payload.into_inner().into_outcome()?;
    let row = state.jobs.submit_result(&path, &address, outcome).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(row)))
}

/// GET /v1/jobs/{job_id}/export
pub async fn export_results(
    state: web::Data<AppState>,
    path: web::Path<String>,
    query: web::Query<ExportQuery>,
) -> Result<HttpResponse> {
    let format = query.format.unwrap_or_default();
    let body = state.jobs.export(&path, format).await?;

    let mut response = HttpResponse::Ok();
    response.content_type(format.content_type());
    if format == ExportFormat::Csv {
        response.insert_header(ContentDisposition {
            disposition: DispositionType::Attachment,
            parameters: vec![DispositionParam::Filename(format!(
                "{}.{}",
                path.as_str(),
                format.extension()
            ))],
        });
    }
    Ok(response.body(body))
}
