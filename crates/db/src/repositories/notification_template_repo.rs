//! Repository for the `notification_templates` table.

use sqlx::PgPool;

use curby_core::filter::EntityMeta;
use curby_core::types::DbId;

use crate::listing::Table;
use crate::models::notification_template::{
    CreateNotificationTemplate, NotificationTemplate, UpdateNotificationTemplate,
    NOTIFICATION_TEMPLATE_META,
};

/// Column list for `notification_templates` queries.
const COLUMNS: &str = "id, event_type_id, name, version, locale, subject, body, \
    created_at, updated_at, created_by, updated_by";

impl Table for NotificationTemplate {
    type Row = NotificationTemplate;
    const TABLE: &'static str = "notification_templates";
    const COLUMNS: &'static str = COLUMNS;

    fn meta() -> &'static EntityMeta {
        &NOTIFICATION_TEMPLATE_META
    }
}

/// Provides CRUD operations for notification templates.
pub struct NotificationTemplateRepo;

impl NotificationTemplateRepo {
    /// Create a template. `(name, version, locale)` must be unique
    /// (`uq_notification_templates_name_version_locale`).
    pub async fn create(
        pool: &PgPool,
        input: &CreateNotificationTemplate,
        actor: Option<DbId>,
    ) -> Result<NotificationTemplate, sqlx::Error> {
        let query = format!(
            "INSERT INTO notification_templates
                (event_type_id, name, version, locale, subject, body, created_by, updated_by)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, NotificationTemplate>(&query)
            .bind(input.event_type_id)
            .bind(&input.name)
            .bind(input.version)
            .bind(&input.locale)
            .bind(&input.subject)
            .bind(&input.body)
            .bind(actor)
            .fetch_one(pool)
            .await
    }

    /// Partially update a template's content.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateNotificationTemplate,
        actor: Option<DbId>,
    ) -> Result<NotificationTemplate, sqlx::Error> {
        let query = format!(
            "UPDATE notification_templates SET
                subject = COALESCE($1, subject),
                body = COALESCE($2, body),
                updated_at = NOW(),
                updated_by = $3
             WHERE id = $4
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, NotificationTemplate>(&query)
            .bind(&input.subject)
            .bind(&input.body)
            .bind(actor)
            .bind(id)
            .fetch_one(pool)
            .await
    }
}
