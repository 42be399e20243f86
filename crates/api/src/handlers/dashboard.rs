//! Dashboard statistics for the admin home screen.

use axum::extract::State;
use axum::Json;
use chrono::{Duration, Utc};
use serde::Serialize;

use curby_core::filter::Filter;
use curby_db::listing;
use curby_db::models::broadcast::{Broadcast, BROADCAST_META};
use curby_db::models::profile::Profile;
use curby_db::models::review::{ItemReview, UserReview, ITEM_REVIEW_META, USER_REVIEW_META};
use curby_db::models::support_request::{SupportRequest, SUPPORT_REQUEST_META};

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct DashboardStats {
    pub pending_item_reviews: i64,
    pub pending_user_reviews: i64,
    pub open_support_requests: i64,
    pub broadcasts_sent_last_30_days: i64,
    pub total_profiles: i64,
}

/// `GET /dashboard/stats` - headline counts, fetched concurrently.
pub async fn stats(
    State(state): State<AppState>,
    _user: AuthUser,
) -> AppResult<Json<DataResponse<DashboardStats>>> {
    let pending_items = [Filter::parse(&ITEM_REVIEW_META, "status.eq.pending")?];
    let pending_users = [Filter::parse(&USER_REVIEW_META, "status.eq.pending")?];
    let open_support = [Filter::parse(&SUPPORT_REQUEST_META, "status.eq.open")?];

    let since = (Utc::now() - Duration::days(30)).to_rfc3339();
    let recent_sent = [
        Filter::parse(&BROADCAST_META, "status.eq.sent")?,
        Filter::parse(&BROADCAST_META, &format!("sent_at.gte.{since}"))?,
    ];

    let (
        pending_item_reviews,
        pending_user_reviews,
        open_support_requests,
        broadcasts_sent_last_30_days,
        total_profiles,
    ) = tokio::join!(
        listing::count::<ItemReview>(&state.pool, &pending_items),
        listing::count::<UserReview>(&state.pool, &pending_users),
        listing::count::<SupportRequest>(&state.pool, &open_support),
        listing::count::<Broadcast>(&state.pool, &recent_sent),
        listing::count::<Profile>(&state.pool, &[]),
    );

    Ok(Json(DataResponse {
        data: DashboardStats {
            pending_item_reviews: pending_item_reviews?,
            pending_user_reviews: pending_user_reviews?,
            open_support_requests: open_support_requests?,
            broadcasts_sent_last_30_days: broadcasts_sent_last_30_days?,
            total_profiles: total_profiles?,
        },
    }))
}
