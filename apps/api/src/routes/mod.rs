pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::extractor::handlers as extractor_handlers;
use crate::optimizer::handlers as optimizer_handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route(
            "/api/v1/resume/upload",
            post(extractor_handlers::handle_upload),
        )
        .route(
            "/api/v1/resume/optimize",
            post(optimizer_handlers::handle_optimize),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    use super::*;
    use crate::config::Config;
    use crate::llm_client::{LlmApi, LlmError};
    use crate::optimizer::Optimizer;

    struct CannedLlm(String);

    #[async_trait]
    impl LlmApi for CannedLlm {
        async fn send(&self, _system: &str, _prompt: &str) -> Result<String, LlmError> {
            Ok(self.0.clone())
        }
    }

    fn test_config() -> Config {
        Config {
            groq_api_key: None,
            groq_api_url: "http://localhost:0".to_string(),
            port: 0,
            rust_log: "info".to_string(),
        }
    }

    fn app_with(optimizer: Optimizer) -> Router {
        build_router(AppState {
            optimizer: Arc::new(optimizer),
            config: test_config(),
        })
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health_returns_ok() {
        let config = test_config();
        let app = app_with(Optimizer::new(&config));
        let response = app
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_optimize_missing_fields_returns_400() {
        let app = app_with(Optimizer::with_client(Arc::new(CannedLlm(
            "{}".to_string(),
        ))));
        let request = Request::post("/api/v1/resume/optimize")
            .header("content-type", "application/json")
            .body(Body::from(
                r#"{"latex_code": "", "job_description": "Rust role"}"#,
            ))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "Both LaTeX resume and job description required");
    }

    #[tokio::test]
    async fn test_optimize_without_api_key_returns_500() {
        let config = test_config();
        let app = app_with(Optimizer::new(&config));
        let request = Request::post("/api/v1/resume/optimize")
            .header("content-type", "application/json")
            .body(Body::from(
                r#"{"latex_code": "\\section*{Skills} Python", "job_description": "Rust role"}"#,
            ))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "API key not configured");
    }

    #[tokio::test]
    async fn test_optimize_happy_path_returns_200_result() {
        let reply = serde_json::json!({
            "keywords_added": ["Rust"],
            "modified_latex": "\\section*{Skills}\nPython and Rust, plus supporting systems tooling",
            "match_score": 84,
            "suggestions": ["Add metrics"]
        })
        .to_string();
        let app = app_with(Optimizer::with_client(Arc::new(CannedLlm(reply))));
        let request = Request::post("/api/v1/resume/optimize")
            .header("content-type", "application/json")
            .body(Body::from(
                r#"{"latex_code": "\\section*{Skills}\nPython", "job_description": "Rust role"}"#,
            ))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["match_score"], 84);
        assert_eq!(body["keywords_added"][0], "Rust");
    }

    #[tokio::test]
    async fn test_upload_without_file_returns_400() {
        let config = test_config();
        let app = app_with(Optimizer::new(&config));
        let request = Request::post("/api/v1/resume/upload")
            .header("content-type", "multipart/form-data; boundary=XX")
            .body(Body::from("--XX--\r\n"))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"], "No PDF file uploaded");
    }

    #[tokio::test]
    async fn test_upload_rejects_non_pdf_filename() {
        let config = test_config();
        let app = app_with(Optimizer::new(&config));
        let body = concat!(
            "--XX\r\n",
            "Content-Disposition: form-data; name=\"pdf_file\"; filename=\"resume.docx\"\r\n",
            "Content-Type: application/octet-stream\r\n",
            "\r\n",
            "not a pdf\r\n",
            "--XX--\r\n"
        );
        let request = Request::post("/api/v1/resume/upload")
            .header("content-type", "multipart/form-data; boundary=XX")
            .body(Body::from(body))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"], "Please upload a PDF file");
    }

    #[tokio::test]
    async fn test_upload_garbage_pdf_returns_degraded_template() {
        let config = test_config();
        let app = app_with(Optimizer::new(&config));
        let body = concat!(
            "--XX\r\n",
            "Content-Disposition: form-data; name=\"pdf_file\"; filename=\"resume.pdf\"\r\n",
            "Content-Type: application/pdf\r\n",
            "\r\n",
            "garbage bytes\r\n",
            "--XX--\r\n"
        );
        let request = Request::post("/api/v1/resume/upload")
            .header("content-type", "multipart/form-data; boundary=XX")
            .body(Body::from(body))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["degraded"], true);
        let latex = body["latex_code"].as_str().unwrap();
        assert!(latex.contains("\\begin{document}"));
        assert!(latex.contains("\\end{document}"));
    }
}
