//! HTTP router.
//!
//! Returns a composable `Router` that can be mounted on any axum server.
//! One route group per resource; the uploads directory is mounted at
//! `/uploads` for direct retrieval of stored files by generated name.

use axum::extract::DefaultBodyLimit;
use axum::routing::get;
use axum::{Json, Router};
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;

use crate::api::endpoints::{doctors, gallery, patients, schedules, visits};
use crate::api::types::ApiContext;
use crate::config;

async fn welcome() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "message": "Clinic management API",
        "version": config::APP_VERSION,
    }))
}

/// Build the full application router.
///
/// NOTE: Path params use `:param` syntax (matchit 0.7 / axum 0.7).
pub fn build_router(ctx: ApiContext) -> Router {
    let uploads_dir = ctx.images.root().to_path_buf();

    Router::new()
        .route("/", get(welcome))
        .route("/doctors", get(doctors::list).post(doctors::create))
        .route(
            "/doctors/:id",
            axum::routing::put(doctors::update).delete(doctors::remove),
        )
        .route("/doctors/:id/patient-count", get(doctors::patient_count))
        .route("/doctors/images/:filename", get(doctors::image))
        .route(
            "/visits/:id",
            get(visits::list_for_doctor)
                .post(visits::create)
                .delete(visits::remove),
        )
        .route("/visits/detail/:visit_id", get(visits::detail))
        .route("/patients", get(patients::list_all))
        .route("/patients/unique", get(patients::unique))
        .route(
            "/patients/:visit_id",
            get(patients::list_for_visit).post(patients::create),
        )
        .route(
            "/patients/patient/:patient_id",
            axum::routing::patch(patients::toggle_fee)
                .put(patients::update)
                .delete(patients::remove),
        )
        .route("/schedules", get(schedules::list).post(schedules::create))
        .route(
            "/schedules/:id",
            axum::routing::put(schedules::update).delete(schedules::remove),
        )
        .route("/gallery", get(gallery::list).post(gallery::create))
        .route(
            "/gallery/:id",
            get(gallery::get)
                .put(gallery::update)
                .delete(gallery::remove),
        )
        .nest_service("/uploads", ServeDir::new(uploads_dir))
        .with_state(ctx)
        .layer(DefaultBodyLimit::max(20 * 1024 * 1024)) // multipart uploads
        .layer(CorsLayer::permissive())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    use crate::db::repository;
    use crate::models::{DoctorFields, FeeStatus};
    use crate::uploads::ImageStore;

    const BOUNDARY: &str = "test-boundary-7MA4YWxkTrZu0gW";

    fn test_ctx() -> (tempfile::TempDir, ApiContext) {
        let tmp = tempfile::tempdir().unwrap();
        let store = ImageStore::new(tmp.path().join("uploads"));
        store.ensure_dirs().unwrap();
        let ctx = ApiContext::new(tmp.path().join("clinic.db"), store);
        (tmp, ctx)
    }

    fn multipart_body(
        fields: &[(&str, &str)],
        file: Option<(&str, &str, &[u8])>,
    ) -> Vec<u8> {
        let mut body = Vec::new();
        for (name, value) in fields {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
                )
                .as_bytes(),
            );
        }
        if let Some((filename, content_type, bytes)) = file {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"image\"; \
                     filename=\"{filename}\"\r\nContent-Type: {content_type}\r\n\r\n"
                )
                .as_bytes(),
            );
            body.extend_from_slice(bytes);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        body
    }

    fn multipart_request(uri: &str, method: &str, body: Vec<u8>) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    fn json_request(uri: &str, method: &str, json: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn welcome_route() {
        let (_tmp, ctx) = test_ctx();
        let app = build_router(ctx);
        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["version"], config::APP_VERSION);
    }

    #[tokio::test]
    async fn doctor_create_and_list() {
        let (_tmp, ctx) = test_ctx();
        let app = build_router(ctx);

        let body = multipart_body(
            &[
                ("name", "Dr. Ahmed"),
                ("specialization", "Cardiology"),
                ("phone", "555-0100"),
            ],
            Some(("photo.png", "image/png", b"png-bytes")),
        );
        let response = app
            .clone()
            .oneshot(multipart_request("/doctors", "POST", body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let created = body_json(response).await;
        assert_eq!(created["name"], "Dr. Ahmed");
        assert!(created["image_filename"].as_str().unwrap().ends_with(".png"));

        let response = app
            .oneshot(Request::builder().uri("/doctors").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let listed = body_json(response).await;
        assert_eq!(listed.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn doctor_create_missing_field_is_400() {
        let (_tmp, ctx) = test_ctx();
        let app = build_router(ctx);
        let body = multipart_body(&[("name", "Dr. Ahmed")], None);
        let response = app
            .oneshot(multipart_request("/doctors", "POST", body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn visit_under_unknown_doctor_is_404() {
        let (_tmp, ctx) = test_ctx();
        let app = build_router(ctx);
        let response = app
            .oneshot(json_request(
                "/visits/99",
                "POST",
                serde_json::json!({"date": "2024-01-01"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn patient_lifecycle_over_http() {
        let (_tmp, ctx) = test_ctx();
        // Seed a doctor and visit directly through the repository.
        let conn = ctx.open_db().unwrap();
        let doctor = repository::insert_doctor(
            &conn,
            &DoctorFields {
                name: "Dr. A".into(),
                specialization: "GP".into(),
                phone: "555".into(),
            },
            None,
        )
        .unwrap();
        let visit = repository::insert_visit(
            &conn,
            doctor.id,
            chrono::NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        )
        .unwrap();
        drop(conn);
        let app = build_router(ctx);

        let response = app
            .clone()
            .oneshot(json_request(
                &format!("/patients/{}", visit.id),
                "POST",
                serde_json::json!({"name": "Jane", "contact": "555-1111"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let patient = body_json(response).await;
        assert_eq!(patient["serial_no"], 1);
        assert_eq!(patient["fee_status"], FeeStatus::Due.as_str());
        let patient_id = patient["id"].as_i64().unwrap();

        // Toggling twice returns to the original status.
        let uri = format!("/patients/patient/{patient_id}");
        let toggled = app
            .clone()
            .oneshot(json_request(&uri, "PATCH", serde_json::json!({})))
            .await
            .unwrap();
        assert_eq!(body_json(toggled).await["fee_status"], "paid");
        let toggled = app
            .clone()
            .oneshot(json_request(&uri, "PATCH", serde_json::json!({})))
            .await
            .unwrap();
        assert_eq!(body_json(toggled).await["fee_status"], "due");

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri(&uri)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        // The row is gone; further operations on it are 404.
        let response = app
            .oneshot(json_request(&uri, "PATCH", serde_json::json!({})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn gallery_rejects_non_image_upload() {
        let (_tmp, ctx) = test_ctx();
        let app = build_router(ctx);
        let body = multipart_body(
            &[("title", "hero")],
            Some(("notes.txt", "text/plain", b"not an image")),
        );
        let response = app
            .oneshot(multipart_request("/gallery", "POST", body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn gallery_upload_served_back_from_uploads_mount() {
        let (_tmp, ctx) = test_ctx();
        let app = build_router(ctx);

        let body = multipart_body(
            &[("title", "hero"), ("order_index", "1")],
            Some(("banner.jpg", "image/jpeg", b"jpeg-bytes")),
        );
        let response = app
            .clone()
            .oneshot(multipart_request("/gallery", "POST", body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let created = body_json(response).await;
        let url = created["image_url"].as_str().unwrap().to_string();
        assert!(url.starts_with("/uploads/gallery/"));

        let response = app
            .oneshot(Request::builder().uri(&url).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&bytes[..], b"jpeg-bytes");
    }

    #[tokio::test]
    async fn gallery_listing_hides_inactive_by_default() {
        let (_tmp, ctx) = test_ctx();
        let app = build_router(ctx);

        for (title, active) in [("a", "true"), ("b", "false")] {
            let body = multipart_body(
                &[("title", title), ("is_active", active)],
                Some(("x.png", "image/png", b"p")),
            );
            let response = app
                .clone()
                .oneshot(multipart_request("/gallery", "POST", body))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::CREATED);
        }

        let response = app
            .clone()
            .oneshot(Request::builder().uri("/gallery").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let listed = body_json(response).await;
        assert_eq!(listed.as_array().unwrap().len(), 1);
        assert_eq!(listed[0]["title"], "a");

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/gallery?active_only=false")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let listed = body_json(response).await;
        assert_eq!(listed.as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn schedule_create_parses_times_and_date() {
        let (_tmp, ctx) = test_ctx();
        let app = build_router(ctx);
        let body = multipart_body(
            &[
                ("name", "Dr. A"),
                ("specialization", "GP"),
                ("day_of_week", "Monday"),
                ("start_time", "09:00"),
                ("end_time", "17:30:00"),
                ("specific_date", "2024-06-07"),
            ],
            None,
        );
        let response = app
            .oneshot(multipart_request("/schedules", "POST", body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let created = body_json(response).await;
        assert_eq!(created["start_time"], "09:00:00");
        assert_eq!(created["is_available"], true);
        assert_eq!(created["specific_date"], "2024-06-07");
    }

    #[tokio::test]
    async fn doctor_cascade_delete_over_http() {
        let (_tmp, ctx) = test_ctx();
        let conn = ctx.open_db().unwrap();
        let doctor = repository::insert_doctor(
            &conn,
            &DoctorFields {
                name: "Dr. A".into(),
                specialization: "GP".into(),
                phone: "555".into(),
            },
            None,
        )
        .unwrap();
        let visit = repository::insert_visit(
            &conn,
            doctor.id,
            chrono::NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        )
        .unwrap();
        drop(conn);
        let app = build_router(ctx.clone());

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri(format!("/doctors/{}", doctor.id))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let conn = ctx.open_db().unwrap();
        assert!(repository::get_doctor(&conn, doctor.id).unwrap().is_none());
        assert!(repository::get_visit(&conn, visit.id).unwrap().is_none());
    }
}
