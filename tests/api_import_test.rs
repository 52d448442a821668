use axum::{
    body::Body,
    http::{Request, StatusCode, header},
};
use library_catalog::db;
use library_catalog::domain::BookRepository;
use library_catalog::infrastructure::AppState;
use library_catalog::server::build_router;
use serde_json::Value;
use tower::util::ServiceExt; // for `oneshot`

const BOUNDARY: &str = "----register-upload";

// Helper to create a test app state
async fn setup_test_state() -> AppState {
    let db = db::init_db("sqlite::memory:")
        .await
        .expect("Failed to init DB");
    AppState::new(db)
}

// Seven header lines, then two books and a row without a title
fn register_export() -> String {
    let mut csv = String::new();
    for i in 1..=6 {
        csv.push_str(&format!("Accession Register page header {}\n", i));
    }
    csv.push_str("S/N,Date,Accession No.,Call No.,Author,Editor,Title,Edition,Vols,Pages,Source of Fund,Cost,Publisher,Year,Location,Remarks\n");
    csv.push_str("1,,ACC1,004.1,,,Intro to Computing / Jane Roe,,,,,,,2005,,\n");
    csv.push_str("2,,ACC2,530,\"Feynman, Richard\",,Lectures on Physics,3rd,3,\"xii, 552 p.\",Grant,\"12,500.00\",Addison-Wesley,1963,Shelf B,\n");
    csv.push_str("3,,ACC3,,Anonymous,,,,,,,,,,,\n");
    csv
}

fn multipart_body(field: &str, content: &str) -> String {
    format!(
        "--{b}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"register.csv\"\r\nContent-Type: text/csv\r\n\r\n{content}\r\n--{b}--\r\n",
        b = BOUNDARY
    )
}

fn upload_request(body: String) -> Request<Body> {
    Request::builder()
        .uri("/api/import/accession")
        .method("POST")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .unwrap()
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_health_check() {
    let state = setup_test_state().await;
    let app = build_router(state);

    let req = Request::builder()
        .uri("/api/health")
        .method("GET")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = json_body(response).await;
    assert_eq!(json["status"], "ok");
}

#[tokio::test]
async fn test_upload_register_imports_books() {
    let state = setup_test_state().await;
    let app = build_router(state.clone());

    let response = app
        .oneshot(upload_request(multipart_body("file", &register_export())))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = json_body(response).await;
    assert_eq!(json["imported"], 2);
    assert_eq!(json["skipped"], 1);
    assert_eq!(json["errors"].as_array().unwrap().len(), 0);
    assert_eq!(
        json["message"],
        "Import completed! 2 books imported, 1 rows skipped"
    );

    assert_eq!(state.book_repo.count().await.unwrap(), 2);
}

#[tokio::test]
async fn test_upload_without_file_field_is_rejected() {
    let state = setup_test_state().await;
    let app = build_router(state.clone());

    let response = app
        .oneshot(upload_request(multipart_body("attachment", &register_export())))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = json_body(response).await;
    assert_eq!(json["error"], "Missing 'file' field");
    assert_eq!(state.book_repo.count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_upload_with_bad_content_type_is_rejected() {
    let state = setup_test_state().await;
    let app = build_router(state);

    let req = Request::builder()
        .uri("/api/import/accession")
        .method("POST")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{}"))
        .unwrap();

    let response = app.oneshot(req).await.unwrap();
    assert!(response.status().is_client_error());
}
