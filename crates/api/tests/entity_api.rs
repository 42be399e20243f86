mod common;

use axum::http::StatusCode;
use serde_json::json;
use sqlx::PgPool;

use curby_db::models::profile::ROLE_ADMIN;

use common::{build_test_app, delete, get, login_as, patch, post};

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_event_type_crud_flow(pool: PgPool) {
    let app = build_test_app(pool.clone()).await;
    let admin = login_as(&app, &pool, "ops@example.com", ROLE_ADMIN).await;

    // Create.
    let (status, created) = post(
        &app,
        "/api/v1/event-types",
        Some(&admin),
        json!({
            "key": "item.claimed",
            "name": "Item claimed",
            "description": "Someone claimed a curbside item",
            "default_channel": "push",
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{created}");
    let id = created["data"]["id"].as_str().unwrap().to_string();

    // Read back.
    let (status, fetched) = get(&app, &format!("/api/v1/event-types/{id}"), Some(&admin)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["data"]["key"], "item.claimed");

    // Partial update leaves other fields alone.
    let (status, updated) = patch(
        &app,
        &format!("/api/v1/event-types/{id}"),
        Some(&admin),
        json!({ "name": "Item was claimed" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["data"]["name"], "Item was claimed");
    assert_eq!(updated["data"]["default_channel"], "push");

    // Delete.
    let (status, _) = delete(&app, &format!("/api/v1/event-types/{id}"), Some(&admin)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = get(&app, &format!("/api/v1/event-types/{id}"), Some(&admin)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_contract_filters_search_and_total(pool: PgPool) {
    let app = build_test_app(pool.clone()).await;
    let admin = login_as(&app, &pool, "ops@example.com", ROLE_ADMIN).await;

    for i in 0..7 {
        let (status, _) = post(
            &app,
            "/api/v1/event-types",
            Some(&admin),
            json!({
                "key": format!("item.event_{i}"),
                "name": format!("Item event {i}"),
                "default_channel": "push",
            }),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }
    let (status, _) = post(
        &app,
        "/api/v1/event-types",
        Some(&admin),
        json!({ "key": "profile.joined", "name": "Neighbor joined", "default_channel": "email" }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    // Paged list: page of 3, total counts everything matching the filter.
    let (status, page) = get(
        &app,
        "/api/v1/event-types?filter=key.like.item.%25&order=key.asc&limit=3",
        Some(&admin),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{page}");
    assert_eq!(page["data"].as_array().unwrap().len(), 3);
    assert_eq!(page["total"], 7);
    assert_eq!(page["data"][0]["key"], "item.event_0");

    // Search hits the searchable columns.
    let (status, found) = get(
        &app,
        "/api/v1/event-types?search=Neighbor",
        Some(&admin),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(found["total"], 1);
    assert_eq!(found["data"][0]["key"], "profile.joined");

    // Count and exists share the filter DSL.
    let (status, count) = get(
        &app,
        "/api/v1/event-types/count?filter=default_channel.eq.email",
        Some(&admin),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(count["data"], 1);

    let (status, exists) = get(
        &app,
        "/api/v1/event-types/exists?filter=key.eq.no.such.key",
        Some(&admin),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(exists["data"], false);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_unknown_filter_column_is_rejected(pool: PgPool) {
    let app = build_test_app(pool.clone()).await;
    let admin = login_as(&app, &pool, "ops@example.com", ROLE_ADMIN).await;

    let (status, body) = get(
        &app,
        "/api/v1/event-types?filter=secret_column.eq.x",
        Some(&admin),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");

    let (status, _) = get(&app, "/api/v1/event-types?limt=10", Some(&admin)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_duplicate_key_maps_to_conflict(pool: PgPool) {
    let app = build_test_app(pool.clone()).await;
    let admin = login_as(&app, &pool, "ops@example.com", ROLE_ADMIN).await;

    let body = json!({ "key": "item.posted", "name": "Item posted", "default_channel": "push" });
    let (status, _) = post(&app, "/api/v1/event-types", Some(&admin), body.clone()).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, err) = post(&app, "/api/v1/event-types", Some(&admin), body).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(err["code"], "CONFLICT");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_bulk_delete(pool: PgPool) {
    let app = build_test_app(pool.clone()).await;
    let admin = login_as(&app, &pool, "ops@example.com", ROLE_ADMIN).await;

    let mut ids = Vec::new();
    for i in 0..3 {
        let (_, created) = post(
            &app,
            "/api/v1/coin-transaction-types",
            Some(&admin),
            json!({ "key": format!("coin.rule_{i}"), "name": format!("Rule {i}"), "amount": 5 }),
        )
        .await;
        ids.push(created["data"]["id"].as_str().unwrap().to_string());
    }

    let (status, deleted) = post(
        &app,
        "/api/v1/coin-transaction-types/bulk-delete",
        Some(&admin),
        json!({ "ids": [ids[0], ids[1]] }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(deleted["data"], 2);

    let (_, count) = get(&app, "/api/v1/coin-transaction-types/count", Some(&admin)).await;
    assert_eq!(count["data"], 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_member_cannot_manage_catalog(pool: PgPool) {
    let app = build_test_app(pool.clone()).await;
    let member = login_as(&app, &pool, "plain@example.com", "member").await;

    let (status, _) = post(
        &app,
        "/api/v1/event-types",
        Some(&member),
        json!({ "key": "x.y", "name": "X", "default_channel": "push" }),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_broadcast_send_fans_out_once(pool: PgPool) {
    let app = build_test_app(pool.clone()).await;
    let admin = login_as(&app, &pool, "ops@example.com", ROLE_ADMIN).await;
    let member = login_as(&app, &pool, "reader@example.com", "member").await;

    // The member registers a device so the fanout has a target.
    let (_, me) = get(&app, "/api/v1/auth/me", Some(&member)).await;
    let member_id = me["data"]["id"].as_str().unwrap().to_string();
    let (status, _) = post(
        &app,
        "/api/v1/devices",
        Some(&member),
        json!({ "profile_id": member_id, "platform": "ios", "push_token": "tok-1" }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, created) = post(
        &app,
        "/api/v1/broadcasts",
        Some(&admin),
        json!({ "title": "Cleanup day", "body": "Bring gloves", "audience": "all" }),
    )
    .await;
    let id = created["data"]["id"].as_str().unwrap().to_string();

    let (status, sent) = post(
        &app,
        &format!("/api/v1/broadcasts/{id}/send"),
        Some(&admin),
        json!({}),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{sent}");
    assert_eq!(sent["data"]["broadcast"]["status"], "sent");
    // Two seeded accounts, but only the member has a device... plus the admin
    // has none, so exactly one delivery.
    assert_eq!(sent["data"]["deliveries_created"], 1);

    // A second send is a conflict, not a double fanout.
    let (status, _) = post(
        &app,
        &format!("/api/v1/broadcasts/{id}/send"),
        Some(&admin),
        json!({}),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, deliveries) = get(
        &app,
        &format!("/api/v1/broadcasts/{id}/deliveries"),
        Some(&admin),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(deliveries["data"].as_array().unwrap().len(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_sent_broadcast_is_immutable(pool: PgPool) {
    let app = build_test_app(pool.clone()).await;
    let admin = login_as(&app, &pool, "ops@example.com", ROLE_ADMIN).await;

    let (_, created) = post(
        &app,
        "/api/v1/broadcasts",
        Some(&admin),
        json!({ "title": "Yard sale", "body": "Saturday", "audience": "all" }),
    )
    .await;
    let id = created["data"]["id"].as_str().unwrap().to_string();

    let (status, _) = post(
        &app,
        &format!("/api/v1/broadcasts/{id}/send"),
        Some(&admin),
        json!({}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = patch(
        &app,
        &format!("/api/v1/broadcasts/{id}"),
        Some(&admin),
        json!({ "title": "Changed my mind" }),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT, "{body}");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_dashboard_stats(pool: PgPool) {
    let app = build_test_app(pool.clone()).await;
    let admin = login_as(&app, &pool, "ops@example.com", ROLE_ADMIN).await;
    let member = login_as(&app, &pool, "reporter@example.com", "member").await;

    let (_, me) = get(&app, "/api/v1/auth/me", Some(&member)).await;
    let member_id = me["data"]["id"].as_str().unwrap().to_string();

    let (status, _) = post(
        &app,
        "/api/v1/moderation/item-reviews",
        Some(&member),
        json!({ "item_id": uuid::Uuid::new_v4(), "reason": "Broken glass inside" }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = post(
        &app,
        "/api/v1/support-requests",
        Some(&member),
        json!({ "profile_id": member_id, "subject": "Cannot log in on web", "body": "Help" }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, stats) = get(&app, "/api/v1/dashboard/stats", Some(&admin)).await;
    assert_eq!(status, StatusCode::OK, "{stats}");
    assert_eq!(stats["data"]["pending_item_reviews"], 1);
    assert_eq!(stats["data"]["pending_user_reviews"], 0);
    assert_eq!(stats["data"]["open_support_requests"], 1);
    assert_eq!(stats["data"]["total_profiles"], 2);
}
