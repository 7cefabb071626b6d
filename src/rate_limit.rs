use chrono::{DateTime, Local, Utc};

use crate::{database::BoardStore, error::AppError, models::RateLimitRecord};

/// Fixed-window decision. The window is the local calendar day of the last
/// request: a submission on the same day increments up to `daily_limit`, a
/// submission on any other day starts a fresh window at 1. Returns the
/// record to upsert, or `None` when the quota is spent.
pub fn roll_window(
    existing: Option<&RateLimitRecord>,
    now: DateTime<Utc>,
    daily_limit: u32,
) -> Option<RateLimitRecord> {
    let today = now.with_timezone(&Local).date_naive();

    match existing {
        Some(record) if record.last_request_at.with_timezone(&Local).date_naive() == today => {
            if record.count >= daily_limit {
                return None;
            }

            Some(RateLimitRecord {
                count: record.count + 1,
                last_request_at: now,
            })
        }
        _ => Some(RateLimitRecord {
            count: 1,
            last_request_at: now,
        }),
    }
}

/// One read and at most one write per attempt. Two submissions from the same
/// IP in the same instant can both read before either writes; no
/// compare-and-swap at this traffic level.
pub async fn check_and_record<S: BoardStore>(
    store: &S,
    source_ip: &str,
    daily_limit: u32,
) -> Result<bool, AppError> {
    let existing = store.get_rate_limit(source_ip).await?;

    match roll_window(existing.as_ref(), Utc::now(), daily_limit) {
        Some(updated) => {
            store.put_rate_limit(source_ip, &updated).await?;
            Ok(true)
        }
        None => Ok(false),
    }
}
