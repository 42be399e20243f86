mod common;

use axum::http::StatusCode;
use sqlx::PgPool;

use common::{build_test_app, get};

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_health_reports_db_status(pool: PgPool) {
    let app = build_test_app(pool).await;

    let (status, body) = get(&app, "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["db_healthy"], true);
    assert!(body["version"].is_string());
}
