//! Route table: the prediction endpoint plus static web content

use crate::config::StaticFilesConfig;
use crate::server::handlers::{self, AppState};
use axum::routing::post;
use axum::Router;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

/// Build the application router.
///
/// `GET /` returns the index document; any other path not claimed by a route
/// is looked up under the static directory (404 when absent).
pub fn build_router(state: AppState, static_files: &StaticFilesConfig) -> Router {
    let index = ServeFile::new(static_files.index_path());
    let assets = ServeDir::new(&static_files.dir);

    Router::new()
        .route("/predict", post(handlers::predict))
        .route_service("/", index)
        .fallback_service(assets)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::linear::{LinearClassifier, LinearModelArtifact};
    use crate::models::Classifier;
    use crate::types::{FeatureRecord, PredictedLabel, FEATURE_COUNT, FEATURE_KEYS};
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tempfile::TempDir;
    use tower::ServiceExt;

    const INDEX_HTML: &str = "<html><body>census</body></html>";

    /// Predicts 1 (">50K") when capital gain exceeds 5000
    fn capital_gain_model() -> Arc<dyn Classifier> {
        let mut row = vec![0.0; FEATURE_COUNT];
        row[9] = 1.0;
        let artifact = LinearModelArtifact {
            classes: vec![0, 1],
            coefficients: vec![row],
            intercept: vec![-5000.0],
            scaler: None,
        };
        Arc::new(LinearClassifier::new(artifact).unwrap())
    }

    struct FailingClassifier;

    impl Classifier for FailingClassifier {
        fn name(&self) -> &str {
            "failing"
        }

        fn feature_count(&self) -> usize {
            FEATURE_COUNT
        }

        fn predict(&self, _record: &FeatureRecord) -> anyhow::Result<Vec<PredictedLabel>> {
            anyhow::bail!("model internal failure")
        }
    }

    fn static_dir() -> TempDir {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("index.html"), INDEX_HTML).unwrap();
        std::fs::write(dir.path().join("style.css"), "body { margin: 0; }").unwrap();
        dir
    }

    fn app(classifier: Arc<dyn Classifier>, dir: &TempDir) -> Router {
        let static_files = StaticFilesConfig {
            dir: dir.path().to_path_buf(),
            index: "index.html".to_string(),
        };
        build_router(AppState::new(classifier), &static_files)
    }

    fn body_with_gain(gain: f64) -> Value {
        let mut body = json!({
            "age": 39,
            "final-weight": 77516,
            "education": 9,
            "education-number": 13,
            "marital-status": 4,
            "relationship": 1,
            "occupation": 0,
            "race": 4,
            "sex": 1,
            "capital-loss": 0,
            "hours-per-week": 40,
            "native-country": 38,
            "employment-type": 6
        });
        body["capital-gain"] = json!(gain);
        body
    }

    fn post_predict(body: impl Into<Body>) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/predict")
            .body(body.into())
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, bytes.to_vec())
    }

    async fn send_json(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let (status, bytes) = send(app, request).await;
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_valid_request_returns_prediction() {
        let dir = static_dir();
        let (status, body) = send_json(
            app(capital_gain_model(), &dir),
            post_predict(body_with_gain(14084.0).to_string()),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "prediction": [1] }));
    }

    #[tokio::test]
    async fn test_each_missing_key_is_a_bad_request() {
        let dir = static_dir();
        let router = app(capital_gain_model(), &dir);

        for key in FEATURE_KEYS {
            let mut payload = body_with_gain(0.0);
            payload.as_object_mut().unwrap().remove(key);

            let (status, body) = send_json(router.clone(), post_predict(payload.to_string())).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(
                body,
                json!({ "error": format!("Missing key: {} in JSON request", key) })
            );
        }
    }

    #[tokio::test]
    async fn test_non_numeric_value_is_a_server_error() {
        let dir = static_dir();
        let mut payload = body_with_gain(0.0);
        payload["native-country"] = json!("United-States");

        let (status, body) =
            send_json(app(capital_gain_model(), &dir), post_predict(payload.to_string())).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        let message = body["error"].as_str().unwrap();
        assert!(message.contains("United-States"));
    }

    #[tokio::test]
    async fn test_malformed_json_is_a_server_error() {
        let dir = static_dir();
        let (status, body) =
            send_json(app(capital_gain_model(), &dir), post_predict("{not json")).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!body["error"].as_str().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_model_failure_is_a_server_error() {
        let dir = static_dir();
        let (status, body) = send_json(
            app(Arc::new(FailingClassifier), &dir),
            post_predict(body_with_gain(0.0).to_string()),
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({ "error": "model internal failure" }));
    }

    #[tokio::test]
    async fn test_concurrent_predictions_are_independent() {
        let dir = static_dir();
        let router = app(capital_gain_model(), &dir);

        let (high, low) = tokio::join!(
            send_json(router.clone(), post_predict(body_with_gain(99999.0).to_string())),
            send_json(router.clone(), post_predict(body_with_gain(0.0).to_string())),
        );

        assert_eq!(high, (StatusCode::OK, json!({ "prediction": [1] })));
        assert_eq!(low, (StatusCode::OK, json!({ "prediction": [0] })));
    }

    #[tokio::test]
    async fn test_root_serves_index_document() {
        let dir = static_dir();
        let router = app(capital_gain_model(), &dir);

        let (root_status, root) = send(router.clone(), get("/")).await;
        let (index_status, index) = send(router, get("/index.html")).await;

        assert_eq!(root_status, StatusCode::OK);
        assert_eq!(index_status, StatusCode::OK);
        assert_eq!(root, index);
        assert_eq!(root, INDEX_HTML.as_bytes());
    }

    #[tokio::test]
    async fn test_static_asset_is_served() {
        let dir = static_dir();
        let (status, body) = send(app(capital_gain_model(), &dir), get("/style.css")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, b"body { margin: 0; }");
    }

    #[tokio::test]
    async fn test_missing_static_file_is_not_found() {
        let dir = static_dir();
        let router = app(capital_gain_model(), &dir);

        let (status, _) = send(router.clone(), get("/missing.js")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(router, get("/../Cargo.toml")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_predict_only_accepts_post() {
        let dir = static_dir();
        let (status, _) = send(app(capital_gain_model(), &dir), get("/predict")).await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    }
}
