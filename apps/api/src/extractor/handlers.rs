use axum::extract::Multipart;
use axum::Json;
use serde::Serialize;
use tracing::info;

use crate::errors::AppError;
use crate::extractor::extract;

const PDF_FIELD: &str = "pdf_file";

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub success: bool,
    pub latex_code: String,
    pub degraded: bool,
    pub message: String,
}

/// POST /api/v1/resume/upload
///
/// Accepts a multipart form with a `pdf_file` field and returns the LaTeX
/// rendering. Extraction itself never fails; only the upload envelope is
/// validated here.
pub async fn handle_upload(mut multipart: Multipart) -> Result<Json<UploadResponse>, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        if field.name() != Some(PDF_FIELD) {
            continue;
        }

        let is_pdf_name = field
            .file_name()
            .map(|n| n.to_ascii_lowercase().ends_with(".pdf"))
            .unwrap_or(false);
        if !is_pdf_name {
            return Err(AppError::Validation(
                "Please upload a PDF file".to_string(),
            ));
        }

        let bytes: bytes::Bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Failed to read upload: {e}")))?;

        let extraction = extract(&bytes);
        info!(
            size = bytes.len(),
            degraded = extraction.degraded,
            "PDF converted to LaTeX"
        );

        let message = if extraction.degraded {
            "PDF could not be read; returning a placeholder template".to_string()
        } else {
            "PDF converted to LaTeX successfully!".to_string()
        };

        return Ok(Json(UploadResponse {
            success: true,
            latex_code: extraction.document.render(),
            degraded: extraction.degraded,
            message,
        }));
    }

    Err(AppError::Validation("No PDF file uploaded".to_string()))
}
