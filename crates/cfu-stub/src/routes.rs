//! Route definitions for the control service stub.
//!
//! Implements the endpoints `cfu-client` calls, with the same camelCase JSON
//! shapes and `{"error": "..."}` failure bodies the real service produces.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;

use cfu_core::{is_well_formed_control_id, Category, Control};

use crate::store::{AppState, StoreError};

/// Submission body. Missing fields read as empty so they fail the
/// required-field check rather than JSON decoding.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct ControlBody {
    control_id: String,
    category: String,
    description: String,
}

/// Build the complete router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/controls", get(list_controls))
        .route("/submit", post(submit_control))
        .route("/controls/{id}", put(update_control).delete(delete_control))
        .fallback(not_found)
        .with_state(state)
}

fn error(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

fn store_error(err: StoreError) -> Response {
    match err {
        StoreError::NotFound => error(StatusCode::NOT_FOUND, "not found"),
        StoreError::Duplicate => error(StatusCode::CONFLICT, "Control ID already exists"),
    }
}

/// Server-side validation, in the order the service applies it. Length is
/// the byte length of the raw description.
fn check(body: Result<Json<ControlBody>, JsonRejection>) -> Result<Control, Response> {
    let Json(body) = body.map_err(|rejection| {
        tracing::debug!(%rejection, "undecodable control body");
        error(StatusCode::BAD_REQUEST, "Invalid request")
    })?;
    if body.control_id.is_empty() || body.category.is_empty() || body.description.is_empty() {
        return Err(error(StatusCode::BAD_REQUEST, "All fields are required"));
    }
    if !is_well_formed_control_id(&body.control_id) {
        return Err(error(
            StatusCode::BAD_REQUEST,
            "Control ID must be format CTRL-XXX",
        ));
    }
    let len = body.description.len();
    if !(10..=500).contains(&len) {
        return Err(error(
            StatusCode::BAD_REQUEST,
            "Description must be 10-500 characters",
        ));
    }
    if body.category.parse::<Category>().is_err() {
        return Err(error(StatusCode::BAD_REQUEST, "Invalid Category"));
    }
    Ok(Control::new(body.control_id, body.category, body.description))
}

// ── Health ──────────────────────────────────────────────────────────

async fn health() -> StatusCode {
    StatusCode::OK
}

// ── Controls ────────────────────────────────────────────────────────

async fn list_controls(State(state): State<AppState>) -> Json<Vec<Control>> {
    Json(state.list())
}

async fn submit_control(
    State(state): State<AppState>,
    body: Result<Json<ControlBody>, JsonRejection>,
) -> Response {
    let control = match check(body) {
        Ok(control) => control,
        Err(resp) => return resp,
    };
    match state.insert(control.clone()) {
        Ok(()) => {
            tracing::info!(control_id = %control.control_id, "control created");
            (
                StatusCode::CREATED,
                Json(json!({ "message": "Submission successful", "control": control })),
            )
                .into_response()
        }
        Err(e) => store_error(e),
    }
}

async fn update_control(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<ControlBody>, JsonRejection>,
) -> Response {
    let control = match check(body) {
        Ok(control) => control,
        Err(resp) => return resp,
    };
    match state.replace(&id, control.clone()) {
        Ok(()) => {
            tracing::info!(original_id = %id, control_id = %control.control_id, "control updated");
            Json(json!({ "message": "Update successful", "control": control })).into_response()
        }
        Err(e) => store_error(e),
    }
}

async fn delete_control(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    match state.remove(&id) {
        Ok(_) => {
            tracing::info!(control_id = %id, "control deleted");
            Json(json!({ "message": "Delete successful" })).into_response()
        }
        Err(e) => store_error(e),
    }
}

async fn not_found() -> Response {
    error(StatusCode::NOT_FOUND, "not found")
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use serde_json::Value;
    use tower::ServiceExt;

    fn seeded() -> AppState {
        AppState::with_controls(vec![Control::new(
            "CTRL-001",
            "Monitoring",
            "Implement quarterly access reviews",
        )])
    }

    async fn body_json(resp: Response) -> Value {
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn submit(app: Router, body: Value) -> (StatusCode, Value) {
        let resp = app.oneshot(json_request("POST", "/submit", body)).await.unwrap();
        let status = resp.status();
        (status, body_json(resp).await)
    }

    #[tokio::test]
    async fn health_is_ok() {
        let req = Request::builder().uri("/health").body(Body::empty()).unwrap();
        let resp = router(AppState::new()).oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn submit_then_list_in_insertion_order() {
        let state = seeded();
        let app = router(state.clone());

        let (status, body) = submit(
            app.clone(),
            json!({"controlId": "CTRL-002", "category": "Data Protection", "description": "Encrypt backups at rest"}),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["message"], "Submission successful");
        assert_eq!(body["control"]["controlId"], "CTRL-002");

        let req = Request::builder().uri("/controls").body(Body::empty()).unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let list = body_json(resp).await;
        assert_eq!(list[0]["controlId"], "CTRL-001");
        assert_eq!(list[1]["controlId"], "CTRL-002");
    }

    #[tokio::test]
    async fn submit_validation_messages() {
        let cases = [
            (json!({"controlId": "CTRL-002", "category": "Monitoring"}), "All fields are required"),
            (
                json!({"controlId": "CTRL-02", "category": "Monitoring", "description": "Long enough text"}),
                "Control ID must be format CTRL-XXX",
            ),
            (
                json!({"controlId": "CTRL-002", "category": "Monitoring", "description": "short"}),
                "Description must be 10-500 characters",
            ),
            (
                json!({"controlId": "CTRL-002", "category": "Physical", "description": "Long enough text"}),
                "Invalid Category",
            ),
        ];
        for (body, expected) in cases {
            let (status, resp) = submit(router(AppState::new()), body).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(resp["error"], expected);
        }
    }

    #[tokio::test]
    async fn description_length_is_measured_in_bytes() {
        // 4 characters, 12 bytes.
        let (status, _) = submit(
            router(AppState::new()),
            json!({"controlId": "CTRL-002", "category": "Monitoring", "description": "监控日志"}),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);

        // 200 characters, 600 bytes.
        let (status, body) = submit(
            router(AppState::new()),
            json!({"controlId": "CTRL-003", "category": "Monitoring", "description": "监".repeat(200)}),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Description must be 10-500 characters");
    }

    #[tokio::test]
    async fn malformed_json_is_invalid_request() {
        let req = Request::builder()
            .method("POST")
            .uri("/submit")
            .header("content-type", "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let resp = router(AppState::new()).oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(resp).await["error"], "Invalid request");
    }

    #[tokio::test]
    async fn duplicate_submit_conflicts() {
        let (status, body) = submit(
            router(seeded()),
            json!({"controlId": "CTRL-001", "category": "Monitoring", "description": "Another description"}),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"], "Control ID already exists");
    }

    #[tokio::test]
    async fn update_unknown_id_is_not_found() {
        let req = json_request(
            "PUT",
            "/controls/CTRL-002",
            json!({"controlId": "CTRL-002", "category": "Monitoring", "description": "Implement quarterly access reviews"}),
        );
        let resp = router(seeded()).oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(resp).await, json!({"error": "not found"}));
    }

    #[tokio::test]
    async fn update_replaces_in_place() {
        let state = seeded();
        let req = json_request(
            "PUT",
            "/controls/CTRL-001",
            json!({"controlId": "CTRL-010", "category": "Access Control", "description": "Enforce MFA for all admins"}),
        );
        let resp = router(state.clone()).oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_json(resp).await["message"], "Update successful");
        assert_eq!(state.list()[0].control_id, "CTRL-010");
    }

    #[tokio::test]
    async fn delete_then_delete_again() {
        let app = router(seeded());
        let req = || {
            Request::builder()
                .method("DELETE")
                .uri("/controls/CTRL-001")
                .body(Body::empty())
                .unwrap()
        };
        let resp = app.clone().oneshot(req()).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_json(resp).await["message"], "Delete successful");

        let resp = app.oneshot(req()).await.unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn unknown_route_is_json_not_found() {
        let req = Request::builder().uri("/nope").body(Body::empty()).unwrap();
        let resp = router(AppState::new()).oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(resp).await["error"], "not found");
    }
}
