use chrono::Utc;

use crate::{
    captcha::BotVerifier,
    database::BoardStore,
    error::AppError,
    models::SubmitRequest,
    query::ListingCache,
    rate_limit::check_and_record,
};

pub const DAILY_QUOTE_LIMIT: u32 = 10;
pub const ANONYMOUS_LABEL: &str = "Anonymous";

/// Admission pipeline for one submission. Steps run in order and
/// short-circuit: validate, verify the CAPTCHA token, spend the daily quota,
/// insert, drop the memoized listing. A quota increment is not refunded when
/// a later step fails.
pub async fn submit_quote<S, V>(
    store: &S,
    verifier: &V,
    cache: &ListingCache,
    source_ip: &str,
    request: SubmitRequest,
) -> Result<(), AppError>
where
    S: BoardStore,
    V: BotVerifier,
{
    let text = request.text.trim();
    if text.is_empty() {
        return Err(AppError::EmptyMessage);
    }

    verifier.verify(&request.bot_token, source_ip).await?;

    if !check_and_record(store, source_ip, DAILY_QUOTE_LIMIT).await? {
        return Err(AppError::RateLimited(DAILY_QUOTE_LIMIT));
    }

    store
        .insert_quote(
            text,
            recipient_or_anonymous(&request.recipient_label),
            Utc::now(),
        )
        .await?;

    cache.invalidate().await;

    Ok(())
}

fn recipient_or_anonymous(label: &str) -> &str {
    let label = label.trim();

    if label.is_empty() { ANONYMOUS_LABEL } else { label }
}
