use axum::extract::{Path as UrlPath, State};
use axum::http::{HeaderValue, header};
use axum::response::{IntoResponse, Response};
use std::path::Path;

use super::AppState;
use super::error::ApiError;
use crate::catalog::is_relative_asset_path;

fn content_type(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase());
    match extension.as_deref() {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("svg") => "image/svg+xml",
        Some("tif") | Some("tiff") => "image/tiff",
        Some("csv") => "text/csv",
        Some("json") => "application/json",
        Some("toml") | Some("txt") | Some("md") => "text/plain; charset=utf-8",
        _ => "application/octet-stream",
    }
}

async fn read_file(path: &Path) -> Result<Vec<u8>, ApiError> {
    tokio::fs::read(path).await.map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            ApiError::NotFound(format!("no such asset: {}", path.display()))
        } else {
            ApiError::Internal(format!("failed to read {}: {e}", path.display()))
        }
    })
}

pub(crate) async fn asset_handler(
    State(state): State<AppState>,
    UrlPath(requested): UrlPath<String>,
) -> Result<Response, ApiError> {
    if !is_relative_asset_path(&requested) {
        return Err(ApiError::NotFound(format!("no such asset: {requested}")));
    }
    let path = state.asset_root.join(&requested);
    let bytes = read_file(&path).await?;
    tracing::debug!(asset = %requested, bytes = bytes.len(), "serving asset");
    Ok(([(header::CONTENT_TYPE, content_type(&path))], bytes).into_response())
}

pub(crate) async fn dataset_handler(State(state): State<AppState>) -> Result<Response, ApiError> {
    let bytes = read_file(&state.dataset_path).await?;
    let file_name = state
        .dataset_path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("dataset.csv");
    let disposition = HeaderValue::from_str(&format!("attachment; filename=\"{file_name}\""))
        .unwrap_or_else(|_| HeaderValue::from_static("attachment"));

    let mut response = bytes.into_response();
    response
        .headers_mut()
        .insert(header::CONTENT_TYPE, HeaderValue::from_static("text/csv"));
    response
        .headers_mut()
        .insert(header::CONTENT_DISPOSITION, disposition);
    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_types_follow_extension() {
        assert_eq!(content_type(Path::new("images/heatmap.PNG")), "image/png");
        assert_eq!(
            content_type(Path::new("remote_sensing/NDVI_Change_Map.tif")),
            "image/tiff"
        );
        assert_eq!(content_type(Path::new("data/risk.csv")), "text/csv");
        assert_eq!(
            content_type(Path::new("blob")),
            "application/octet-stream"
        );
    }
}
