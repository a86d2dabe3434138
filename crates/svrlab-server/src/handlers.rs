use std::sync::Arc;

use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::Json;
use svrlab_io::{read_table, FileFormat};
use svrlab_pipeline::{describe, DatasetInfo, TrainingRequest, TrainingResult};
use tracing::{info, warn};

use crate::api::AppState;
use crate::config::ServerConfig;
use crate::envelope::ApiResponse;
use crate::error::ServerError;

type HandlerResult<T> = std::result::Result<T, ServerError>;

/// The parts of a multipart upload this service understands.
struct Upload {
    filename: String,
    bytes: Vec<u8>,
    parameters: Option<String>,
}

impl Upload {
    async fn read(
        multipart: Result<Multipart, MultipartRejection>,
        config: &ServerConfig,
    ) -> HandlerResult<Self> {
        let mut multipart = multipart.map_err(|e| ServerError::Multipart(e.body_text()))?;
        let too_large = || ServerError::FileTooLarge {
            limit: config.max_file_size,
        };
        let mut file = None;
        let mut parameters = None;

        loop {
            let field = match multipart.next_field().await {
                Ok(Some(field)) => field,
                Ok(None) => break,
                Err(e) if e.status() == StatusCode::PAYLOAD_TOO_LARGE => return Err(too_large()),
                Err(e) => return Err(ServerError::Multipart(e.body_text())),
            };
            let name = field.name().map(str::to_string);
            match name.as_deref() {
                Some("file") => {
                    let filename = field.file_name().unwrap_or_default().to_string();
                    let bytes = field.bytes().await.map_err(|e| {
                        if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
                            too_large()
                        } else {
                            ServerError::Multipart(e.body_text())
                        }
                    })?;
                    file = Some((filename, bytes.to_vec()));
                }
                Some("parameters") => {
                    let text = field
                        .text()
                        .await
                        .map_err(|e| ServerError::Multipart(e.body_text()))?;
                    parameters = Some(text);
                }
                _ => {}
            }
        }

        let (filename, bytes) = file.ok_or(ServerError::MissingField("file"))?;
        info!(filename = %filename, bytes = bytes.len(), "received upload");

        if bytes.len() > config.max_file_size {
            return Err(too_large());
        }
        if FileFormat::from_filename(&filename).is_none() {
            return Err(ServerError::InvalidFormat { filename });
        }
        Ok(Upload {
            filename,
            bytes,
            parameters,
        })
    }
}

async fn blocking<T, F>(work: F) -> HandlerResult<T>
where
    F: FnOnce() -> svrlab_core::Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| ServerError::Task(e.to_string()))?
        .map_err(ServerError::from)
}

pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "version": state.config.app_version,
        "app": state.config.app_name,
    }))
}

/// Upload a file and return basic information about the dataset
pub async fn upload_info(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResponse<DatasetInfo> {
    let result: HandlerResult<DatasetInfo> = async {
        let upload = Upload::read(multipart, &state.config).await?;
        blocking(move || {
            let dataset = read_table(&upload.filename, &upload.bytes)?;
            Ok(describe(&upload.filename, &dataset))
        })
        .await
    }
    .await;

    match result {
        Ok(info) => ApiResponse::success("File uploaded successfully", info),
        Err(e) => {
            warn!(kind = e.kind(), error = %e, "upload-info failed");
            e.into_envelope("Failed to process file")
        }
    }
}

/// Train an SVR on the uploaded file and return metrics and plots
pub async fn train_svr(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResponse<TrainingResult> {
    let result: HandlerResult<TrainingResult> = async {
        let upload = Upload::read(multipart, &state.config).await?;
        let raw = upload
            .parameters
            .as_deref()
            .ok_or(ServerError::MissingField("parameters"))?;
        let request = TrainingRequest::from_json(raw)?;
        info!(
            filename = %upload.filename,
            target = %request.target_column,
            kernel = %request.kernel,
            "training requested"
        );

        let state = Arc::clone(&state);
        blocking(move || {
            let dataset = read_table(&upload.filename, &upload.bytes)?;
            state.pipeline.run(&dataset, &request)
        })
        .await
    }
    .await;

    match result {
        Ok(result) => {
            let message = if result.plots.is_some() {
                "SVR model trained successfully"
            } else {
                "SVR model trained successfully (plots unavailable)"
            };
            ApiResponse::success(message, result)
        }
        Err(e) => {
            warn!(kind = e.kind(), error = %e, "train-svr failed");
            e.into_envelope("Failed to train SVR model")
        }
    }
}
