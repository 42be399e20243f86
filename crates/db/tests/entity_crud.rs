//! Integration tests for the repository layer against a real database:
//! - Create/update/delete across entity tables
//! - Audit column stamping (created_by/updated_by)
//! - Unique constraint violations
//! - Foreign key violations

use sqlx::PgPool;

use curby_db::listing;
use curby_db::models::broadcast::{Broadcast, CreateBroadcast, CreateSchedule};
use curby_db::models::coin_transaction_type::CreateCoinTransactionType;
use curby_db::models::device::{CreateDevice, Device};
use curby_db::models::event_type::{CreateEventType, UpdateEventType};
use curby_db::models::notification_template::CreateNotificationTemplate;
use curby_db::models::profile::UpdateProfile;
use curby_db::models::support_request::{
    CreateSupportRequest, UpdateSupportRequest, SUPPORT_STATUS_RESOLVED,
};
use curby_db::repositories::{
    BroadcastRepo, CoinTransactionTypeRepo, DeviceRepo, EventTypeRepo, NotificationTemplateRepo,
    ProfileRepo, ScheduleRepo, SupportRequestRepo,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn seed_admin(pool: &PgPool) -> curby_db::models::profile::Profile {
    ProfileRepo::create(pool, "admin@curby.test", "Admin", "admin", "x", None)
        .await
        .unwrap()
}

fn new_broadcast(title: &str) -> CreateBroadcast {
    CreateBroadcast {
        title: title.to_string(),
        body: "Free couch on the curb".to_string(),
        audience: "all".to_string(),
        scheduled_at: None,
        tags: vec!["furniture".to_string()],
    }
}

fn new_event_type(key: &str) -> CreateEventType {
    CreateEventType {
        key: key.to_string(),
        name: "Item claimed".to_string(),
        description: None,
        default_channel: "push".to_string(),
    }
}

fn new_device(profile_id: curby_core::types::DbId, token: &str) -> CreateDevice {
    CreateDevice {
        profile_id,
        platform: "ios".to_string(),
        push_token: token.to_string(),
        app_version: Some("1.4.0".to_string()),
    }
}

// ---------------------------------------------------------------------------
// Test: Audit columns are stamped with the acting profile
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_audit_columns_stamped(pool: PgPool) {
    let admin = seed_admin(&pool).await;
    assert!(admin.created_by.is_none(), "bootstrap account has no actor");

    let broadcast = BroadcastRepo::create(&pool, &new_broadcast("Audit"), Some(admin.id))
        .await
        .unwrap();
    assert_eq!(broadcast.created_by, Some(admin.id));
    assert_eq!(broadcast.updated_by, Some(admin.id));

    let moderator = ProfileRepo::create(&pool, "mod@curby.test", "Mod", "moderator", "x", None)
        .await
        .unwrap();
    let updated = BroadcastRepo::update(
        &pool,
        broadcast.id,
        &curby_db::models::broadcast::UpdateBroadcast {
            title: Some("Audit v2".to_string()),
            ..Default::default()
        },
        Some(moderator.id),
    )
    .await
    .unwrap();

    assert_eq!(updated.title, "Audit v2");
    assert_eq!(updated.created_by, Some(admin.id), "create actor preserved");
    assert_eq!(updated.updated_by, Some(moderator.id));
    assert!(updated.updated_at >= broadcast.updated_at);
}

// ---------------------------------------------------------------------------
// Test: Broadcast status defaults follow scheduled_at
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_broadcast_status_from_schedule(pool: PgPool) {
    let draft = BroadcastRepo::create(&pool, &new_broadcast("Draft"), None)
        .await
        .unwrap();
    assert_eq!(draft.status, "draft");

    let mut input = new_broadcast("Scheduled");
    input.scheduled_at = Some(chrono::Utc::now() + chrono::Duration::hours(1));
    let scheduled = BroadcastRepo::create(&pool, &input, None).await.unwrap();
    assert_eq!(scheduled.status, "scheduled");
}

// ---------------------------------------------------------------------------
// Test: Unique constraint violations
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_duplicate_email_rejected(pool: PgPool) {
    seed_admin(&pool).await;
    let result = ProfileRepo::create(&pool, "admin@curby.test", "Other", "member", "x", None).await;
    assert!(result.is_err(), "Duplicate email should fail");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_duplicate_event_type_key_rejected(pool: PgPool) {
    EventTypeRepo::create(&pool, &new_event_type("item.claimed"), None)
        .await
        .unwrap();
    let result = EventTypeRepo::create(&pool, &new_event_type("item.claimed"), None).await;
    assert!(result.is_err(), "Duplicate event type key should fail");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_duplicate_push_token_rejected(pool: PgPool) {
    let admin = seed_admin(&pool).await;
    DeviceRepo::create(&pool, &new_device(admin.id, "tok-1"), None)
        .await
        .unwrap();
    let result = DeviceRepo::create(&pool, &new_device(admin.id, "tok-1"), None).await;
    assert!(result.is_err(), "Duplicate push token should fail");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_duplicate_template_version_rejected(pool: PgPool) {
    let event_type = EventTypeRepo::create(&pool, &new_event_type("item.claimed"), None)
        .await
        .unwrap();
    let template = CreateNotificationTemplate {
        event_type_id: event_type.id,
        name: "claimed".to_string(),
        version: 1,
        locale: "en".to_string(),
        subject: "Your item was claimed".to_string(),
        body: "Someone picked it up!".to_string(),
    };
    NotificationTemplateRepo::create(&pool, &template, None)
        .await
        .unwrap();
    let result = NotificationTemplateRepo::create(&pool, &template, None).await;
    assert!(
        result.is_err(),
        "Duplicate (name, version, locale) should fail"
    );

    // A new version of the same template is fine.
    let mut v2 = template.clone();
    v2.version = 2;
    NotificationTemplateRepo::create(&pool, &v2, None)
        .await
        .unwrap();
}

// ---------------------------------------------------------------------------
// Test: FK violation when referencing non-existent profile
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_fk_violation_device_bad_profile(pool: PgPool) {
    let ghost = curby_core::types::DbId::new_v4();
    let result = DeviceRepo::create(&pool, &new_device(ghost, "tok-ghost"), None).await;
    assert!(
        result.is_err(),
        "FK violation should fail for non-existent profile_id"
    );
}

// ---------------------------------------------------------------------------
// Test: Partial update touches only the supplied fields
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_partial_update_event_type(pool: PgPool) {
    let created = EventTypeRepo::create(&pool, &new_event_type("item.claimed"), None)
        .await
        .unwrap();

    let updated = EventTypeRepo::update(
        &pool,
        created.id,
        &UpdateEventType {
            is_active: Some(false),
            ..Default::default()
        },
        None,
    )
    .await
    .unwrap();

    assert!(!updated.is_active);
    assert_eq!(updated.key, "item.claimed", "key untouched");
    assert_eq!(updated.name, created.name, "name untouched");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_nonexistent_is_row_not_found(pool: PgPool) {
    let result = ProfileRepo::update(
        &pool,
        curby_core::types::DbId::new_v4(),
        &UpdateProfile {
            display_name: Some("Ghost".to_string()),
            ..Default::default()
        },
        None,
    )
    .await;
    assert!(matches!(result, Err(sqlx::Error::RowNotFound)));
}

// ---------------------------------------------------------------------------
// Test: Resolving a support request stamps resolved_at
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_support_request_resolution(pool: PgPool) {
    let admin = seed_admin(&pool).await;
    let request = SupportRequestRepo::create(
        &pool,
        &CreateSupportRequest {
            profile_id: admin.id,
            subject: "Can't upload photos".to_string(),
            body: "The app crashes on upload".to_string(),
        },
        None,
    )
    .await
    .unwrap();
    assert_eq!(request.status, "open");
    assert!(request.resolved_at.is_none());

    let resolved = SupportRequestRepo::update(
        &pool,
        request.id,
        &UpdateSupportRequest {
            status: Some(SUPPORT_STATUS_RESOLVED.to_string()),
            assignee_id: Some(admin.id),
            ..Default::default()
        },
        Some(admin.id),
    )
    .await
    .unwrap();
    assert_eq!(resolved.status, "resolved");
    assert!(resolved.resolved_at.is_some());
}

// ---------------------------------------------------------------------------
// Test: Login bookkeeping
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_login_bookkeeping(pool: PgPool) {
    let admin = seed_admin(&pool).await;

    let count = ProfileRepo::increment_failed_login(&pool, admin.id)
        .await
        .unwrap();
    assert_eq!(count, 1);
    let count = ProfileRepo::increment_failed_login(&pool, admin.id)
        .await
        .unwrap();
    assert_eq!(count, 2);
    let profile = listing::get_by_id::<curby_db::models::profile::Profile>(&pool, admin.id)
        .await
        .unwrap();
    assert_eq!(profile.failed_login_count, 2);

    let until = chrono::Utc::now() + chrono::Duration::minutes(15);
    ProfileRepo::lock_account(&pool, admin.id, until).await.unwrap();

    ProfileRepo::record_successful_login(&pool, admin.id)
        .await
        .unwrap();
    let profile = listing::get_by_id::<curby_db::models::profile::Profile>(&pool, admin.id)
        .await
        .unwrap();
    assert_eq!(profile.failed_login_count, 0);
    assert!(profile.locked_until.is_none());
    assert!(profile.last_login_at.is_some());
}

// ---------------------------------------------------------------------------
// Test: Cascade delete broadcast removes schedules and deliveries
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_cascade_delete_broadcast(pool: PgPool) {
    let admin = seed_admin(&pool).await;
    DeviceRepo::create(&pool, &new_device(admin.id, "tok-cascade"), None)
        .await
        .unwrap();

    let broadcast = BroadcastRepo::create(&pool, &new_broadcast("Cascade"), None)
        .await
        .unwrap();
    ScheduleRepo::create(
        &pool,
        broadcast.id,
        &CreateSchedule {
            cron_expr: "0 9 * * MON".to_string(),
            timezone: "America/New_York".to_string(),
            next_fire_at: None,
        },
        None,
    )
    .await
    .unwrap();
    let fanned_out = BroadcastRepo::fan_out_deliveries(&pool, broadcast.id, "push", None)
        .await
        .unwrap();
    assert_eq!(fanned_out, 1);

    let deleted = listing::delete_by_id::<Broadcast>(&pool, broadcast.id)
        .await
        .unwrap();
    assert!(deleted);

    let schedules = ScheduleRepo::list_for_broadcast(&pool, broadcast.id)
        .await
        .unwrap();
    assert!(schedules.is_empty());
}

// ---------------------------------------------------------------------------
// Test: Fan-out skips inactive profiles and dedupes multi-device profiles
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_fan_out_targets_active_profiles_once(pool: PgPool) {
    let active = seed_admin(&pool).await;
    DeviceRepo::create(&pool, &new_device(active.id, "tok-a"), None)
        .await
        .unwrap();
    DeviceRepo::create(&pool, &new_device(active.id, "tok-b"), None)
        .await
        .unwrap();

    let inactive = ProfileRepo::create(&pool, "gone@curby.test", "Gone", "member", "x", None)
        .await
        .unwrap();
    DeviceRepo::create(&pool, &new_device(inactive.id, "tok-c"), None)
        .await
        .unwrap();
    ProfileRepo::update(
        &pool,
        inactive.id,
        &UpdateProfile {
            is_active: Some(false),
            ..Default::default()
        },
        None,
    )
    .await
    .unwrap();

    let broadcast = BroadcastRepo::create(&pool, &new_broadcast("Fanout"), None)
        .await
        .unwrap();
    let created = BroadcastRepo::fan_out_deliveries(&pool, broadcast.id, "push", None)
        .await
        .unwrap();
    assert_eq!(created, 1, "one delivery per active profile");
}

// ---------------------------------------------------------------------------
// Test: Bulk delete by ids
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_delete_by_ids(pool: PgPool) {
    let admin = seed_admin(&pool).await;
    let d1 = DeviceRepo::create(&pool, &new_device(admin.id, "tok-1"), None)
        .await
        .unwrap();
    let d2 = DeviceRepo::create(&pool, &new_device(admin.id, "tok-2"), None)
        .await
        .unwrap();
    DeviceRepo::create(&pool, &new_device(admin.id, "tok-3"), None)
        .await
        .unwrap();

    let deleted = listing::delete_by_ids::<Device>(&pool, &[d1.id, d2.id])
        .await
        .unwrap();
    assert_eq!(deleted, 2);

    let remaining = listing::count::<Device>(&pool, &[]).await.unwrap();
    assert_eq!(remaining, 1);

    // Empty id list is a no-op.
    let deleted = listing::delete_by_ids::<Device>(&pool, &[]).await.unwrap();
    assert_eq!(deleted, 0);
}

// ---------------------------------------------------------------------------
// Test: Signed coin amounts round-trip
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_coin_transaction_type_signed_amount(pool: PgPool) {
    let earn = CoinTransactionTypeRepo::create(
        &pool,
        &CreateCoinTransactionType {
            key: "item.given_away".to_string(),
            name: "Gave away an item".to_string(),
            description: None,
            amount: 25,
        },
        None,
    )
    .await
    .unwrap();
    assert_eq!(earn.amount, 25);

    let spend = CoinTransactionTypeRepo::create(
        &pool,
        &CreateCoinTransactionType {
            key: "boost.listing".to_string(),
            name: "Boosted a listing".to_string(),
            description: None,
            amount: -10,
        },
        None,
    )
    .await
    .unwrap();
    assert_eq!(spend.amount, -10);
}
