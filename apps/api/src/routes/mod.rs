pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post},
    Router,
};

use crate::candidates::handlers as candidates;
use crate::export::handlers as export;
use crate::jobs::handlers as jobs;
use crate::state::AppState;
use crate::uploads::handlers as uploads;

/// Multipart uploads may carry several resumes at once.
const UPLOAD_BODY_LIMIT: usize = 25 * 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Candidates and shortlist
        .route("/api/v1/candidates", get(candidates::handle_list_candidates))
        .route(
            "/api/v1/candidates/:id",
            get(candidates::handle_get_candidate),
        )
        .route(
            "/api/v1/candidates/:id/shortlist",
            post(candidates::handle_shortlist),
        )
        .route("/api/v1/shortlist", get(candidates::handle_list_shortlist))
        .route(
            "/api/v1/shortlist/:id",
            delete(candidates::handle_remove_from_shortlist),
        )
        .route("/api/v1/uploaded", get(candidates::handle_list_uploaded))
        // Resume uploads
        .route(
            "/api/v1/uploads",
            post(uploads::handle_upload)
                .get(uploads::handle_list_uploads)
                .layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT)),
        )
        .route(
            "/api/v1/uploads/:id",
            get(uploads::handle_get_upload).delete(uploads::handle_cancel_upload),
        )
        // Jobs
        .route(
            "/api/v1/jobs",
            get(jobs::handle_list_jobs).post(jobs::handle_create_job),
        )
        .route(
            "/api/v1/jobs/:id",
            get(jobs::handle_get_job)
                .put(jobs::handle_update_job)
                .delete(jobs::handle_delete_job),
        )
        // Export
        .route("/api/v1/export", post(export::handle_export))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{header, Method, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::bootstrap::Stores;
    use crate::candidates::{CandidateState, CandidateStore};
    use crate::config::Config;
    use crate::jobs::{JobState, JobStore};
    use crate::models::candidate::{sample_candidate, Verdict};
    use crate::persistence::{MemorySnapshotStore, PersistenceGateway};
    use crate::uploads::SimulatedExtractor;

    async fn test_state() -> AppState {
        let gateway = PersistenceGateway::new(Arc::new(MemorySnapshotStore::default()));

        let mut high = sample_candidate(1, "Meera Iyer");
        high.verdict = Verdict::High;
        high.relevance_score = 91;
        let mut duplicate = sample_candidate(3, "Arjun Rao");
        duplicate.is_duplicate = true;
        let state = CandidateState {
            candidates: vec![high, sample_candidate(2, "Arjun Rao"), duplicate],
            ..Default::default()
        };

        let candidates = Arc::new(CandidateStore::new(state, gateway.clone()));
        let jobs = Arc::new(JobStore::new(JobState::seeded(), gateway));
        candidates.finish_loading().await;
        jobs.finish_loading().await;

        AppState::new(
            Stores { candidates, jobs },
            Arc::new(SimulatedExtractor),
            &Config::default(),
        )
    }

    async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Vec<u8>) {
        let mut request = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                request = request.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };
        let response = app
            .clone()
            .oneshot(request.body(body).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, bytes.to_vec())
    }

    fn json_body(bytes: &[u8]) -> Value {
        serde_json::from_slice(bytes).unwrap()
    }

    fn ids(value: &Value) -> Vec<u64> {
        value
            .as_array()
            .unwrap()
            .iter()
            .map(|c| c["id"].as_u64().unwrap())
            .collect()
    }

    #[tokio::test]
    async fn test_health() {
        let app = build_router(test_state().await);
        let (status, body) = send(&app, Method::GET, "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json_body(&body)["service"], "scout-api");
    }

    #[tokio::test]
    async fn test_candidate_listing_filters() {
        let app = build_router(test_state().await);

        let (_, body) = send(&app, Method::GET, "/api/v1/candidates", None).await;
        assert_eq!(ids(&json_body(&body)), vec![1, 2, 3]);

        let (_, body) = send(&app, Method::GET, "/api/v1/candidates?show_duplicates=false", None).await;
        assert_eq!(ids(&json_body(&body)), vec![1, 2]);

        let (_, body) = send(&app, Method::GET, "/api/v1/candidates?verdict=High", None).await;
        assert_eq!(ids(&json_body(&body)), vec![1]);

        let (_, body) = send(&app, Method::GET, "/api/v1/candidates?search=arjun", None).await;
        assert_eq!(ids(&json_body(&body)), vec![2, 3]);
    }

    #[tokio::test]
    async fn test_shortlist_round_trip_over_http() {
        let state = test_state().await;
        let app = build_router(state.clone());

        let (status, _) = send(&app, Method::POST, "/api/v1/candidates/2/shortlist", None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (_, body) = send(&app, Method::GET, "/api/v1/shortlist", None).await;
        let shortlist = json_body(&body);
        assert_eq!(ids(&shortlist), vec![2]);
        assert_eq!(shortlist[0]["isShortlisted"], true);

        // Still reachable by id while shortlisted.
        let (status, _) = send(&app, Method::GET, "/api/v1/candidates/2", None).await;
        assert_eq!(status, StatusCode::OK);

        let (status, _) = send(&app, Method::DELETE, "/api/v1/shortlist/2", None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let back = state.candidates.state().await;
        assert!(back.shortlisted.is_empty());
        assert_eq!(back.candidates.last().map(|c| c.id), Some(2));
        assert_eq!(back.candidates.last().and_then(|c| c.is_shortlisted), None);
    }

    #[tokio::test]
    async fn test_unknown_ids() {
        let app = build_router(test_state().await);

        let (status, body) = send(&app, Method::GET, "/api/v1/candidates/42", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json_body(&body)["error"]["code"], "NOT_FOUND");

        let (status, _) = send(&app, Method::POST, "/api/v1/candidates/42/shortlist", None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, _) = send(&app, Method::DELETE, "/api/v1/jobs/999", None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (_, body) = send(&app, Method::GET, "/api/v1/jobs", None).await;
        assert_eq!(ids(&json_body(&body)), vec![1, 2, 3, 4]);
    }

    #[tokio::test]
    async fn test_job_creation() {
        let app = build_router(test_state().await);

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/v1/jobs",
            Some(json!({"title": "SRE", "company": "Acme", "location": "Pune", "skills": ["Linux"]})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let job = json_body(&body);
        assert_eq!(job["id"], 5);
        assert_eq!(job["applications"], 0);
        assert_eq!(job["status"], "active");

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/v1/jobs",
            Some(json!({"title": "SRE", "company": "", "location": "Pune"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            json_body(&body)["error"]["message"],
            "Please fill in all required fields"
        );
    }

    #[tokio::test]
    async fn test_job_update_uses_path_id() {
        let state = test_state().await;
        let app = build_router(state.clone());

        let (_, body) = send(&app, Method::GET, "/api/v1/jobs/2", None).await;
        let mut job = json_body(&body);
        job["id"] = json!(77);
        job["status"] = json!("completed");

        let (status, _) = send(&app, Method::PUT, "/api/v1/jobs/2", Some(job)).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (_, body) = send(&app, Method::GET, "/api/v1/jobs/2", None).await;
        assert_eq!(json_body(&body)["status"], "completed");
        assert!(state.jobs.read(|s| s.find(77).is_none()).await);
    }

    #[tokio::test]
    async fn test_export_selection() {
        let app = build_router(test_state().await);

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/v1/export",
            Some(json!({"scope": "candidates", "ids": [2]})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let text = String::from_utf8(body).unwrap();
        assert!(text.starts_with("Name,Email,Phone"));
        assert!(text.contains("Arjun Rao"));
        assert!(!text.contains("Meera Iyer"));

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/v1/export",
            Some(json!({"scope": "shortlist"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json_body(&body)["error"]["message"], "No candidates to export");
    }

    #[tokio::test]
    async fn test_upload_rejects_unsupported_files() {
        let app = build_router(test_state().await);
        let boundary = "scoutboundary";
        let body = format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"photo.png\"\r\nContent-Type: image/png\r\n\r\nPNG\r\n--{boundary}--\r\n"
        );
        let request = Request::builder()
            .method(Method::POST)
            .uri("/api/v1/uploads")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={boundary}"),
            )
            .body(Body::from(body))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(
            json_body(&bytes)["error"]["message"],
            "Only PDF and DOC/DOCX files are supported"
        );
    }
}
