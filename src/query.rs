use tokio::sync::RwLock;
use tracing::error;

use crate::{database::BoardStore, models::Quote};

pub const PAGE_SIZE: usize = 4;

/// Memoized copy of the full listing, newest first. Filled by the read path
/// on a successful fetch, emptied by the submission pipeline. The lock is
/// only ever held to read or swap the vector, never across I/O.
#[derive(Default)]
pub struct ListingCache {
    entries: RwLock<Option<Vec<Quote>>>,
}

impl ListingCache {
    pub async fn get(&self) -> Option<Vec<Quote>> {
        self.entries.read().await.clone()
    }

    pub async fn fill(&self, quotes: Vec<Quote>) {
        *self.entries.write().await = Some(quotes);
    }

    pub async fn invalidate(&self) {
        *self.entries.write().await = None;
    }
}

/// Full listing ordered by creation time descending. A storage failure
/// degrades to an empty listing (logged, never cached) so browsing stays up.
pub async fn list_all<S: BoardStore>(store: &S, cache: &ListingCache) -> Vec<Quote> {
    if let Some(quotes) = cache.get().await {
        return quotes;
    }

    match store.list_quotes().await {
        Ok(quotes) => {
            cache.fill(quotes.clone()).await;
            quotes
        }
        Err(err) => {
            error!("Failed to load quotes: {err}");
            Vec::new()
        }
    }
}

/// Case-insensitive substring match over message text and recipient label.
/// An empty term matches everything.
pub fn filter_quotes(quotes: &[Quote], term: &str) -> Vec<Quote> {
    let needle = term.to_lowercase();

    quotes
        .iter()
        .filter(|quote| {
            quote.text.to_lowercase().contains(&needle)
                || quote.recipient_label.to_lowercase().contains(&needle)
        })
        .cloned()
        .collect()
}

pub fn page_count(total: usize) -> usize {
    total.div_ceil(PAGE_SIZE)
}

/// Fixed-size slice of the filtered listing. Indexes past the end clamp to
/// the last valid page instead of wrapping.
pub fn page(quotes: &[Quote], page_index: usize) -> &[Quote] {
    if quotes.is_empty() {
        return &[];
    }

    let clamped = page_index.min(page_count(quotes.len()) - 1);
    let start = clamped * PAGE_SIZE;
    let end = (start + PAGE_SIZE).min(quotes.len());

    &quotes[start..end]
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;

    use chrono::{Duration, Utc};

    use super::*;
    use crate::database::testing::MemoryStore;

    fn quote(id: &str, text: &str, recipient_label: &str, offset_secs: i64) -> Quote {
        Quote {
            id: id.to_string(),
            text: text.to_string(),
            recipient_label: recipient_label.to_string(),
            created_at: Utc::now() + Duration::seconds(offset_secs),
        }
    }

    #[tokio::test]
    async fn listing_is_newest_first() {
        let store = MemoryStore::default();
        let base = Utc::now();
        for (text, offset) in [("oldest", 0), ("newest", 20), ("middle", 10)] {
            store
                .insert_quote(text, "Anonymous", base + Duration::seconds(offset))
                .await
                .unwrap();
        }
        let cache = ListingCache::default();

        let listed = list_all(&store, &cache).await;

        let texts: Vec<&str> = listed.iter().map(|quote| quote.text.as_str()).collect();
        assert_eq!(texts, ["newest", "middle", "oldest"]);
    }

    #[tokio::test]
    async fn read_failure_degrades_to_empty_and_is_not_cached() {
        let store = MemoryStore::default();
        store.insert_quote("hello", "Reza", Utc::now()).await.unwrap();
        store.offline.store(true, Ordering::SeqCst);
        let cache = ListingCache::default();

        assert!(list_all(&store, &cache).await.is_empty());
        assert!(cache.get().await.is_none());

        store.offline.store(false, Ordering::SeqCst);

        assert_eq!(list_all(&store, &cache).await.len(), 1);
    }

    #[tokio::test]
    async fn warm_cache_skips_storage() {
        let store = MemoryStore::default();
        store.insert_quote("hello", "Reza", Utc::now()).await.unwrap();
        let cache = ListingCache::default();

        assert_eq!(list_all(&store, &cache).await.len(), 1);

        // A dead backend goes unnoticed while the cache is warm.
        store.offline.store(true, Ordering::SeqCst);

        assert_eq!(list_all(&store, &cache).await.len(), 1);
    }

    #[test]
    fn filter_matches_text_and_label_case_insensitively() {
        let quotes = [
            quote("1", "masih ada notes kita", "Reza", 0),
            quote("2", "i wish REZA would text me", "Nayla", 1),
            quote("3", "goodbye", "Jensen", 2),
        ];

        let matched = filter_quotes(&quotes, "reza");

        let ids: Vec<&str> = matched.iter().map(|quote| quote.id.as_str()).collect();
        assert_eq!(ids, ["1", "2"]);
    }

    #[test]
    fn empty_term_matches_everything() {
        let quotes = [quote("1", "a", "b", 0), quote("2", "c", "d", 1)];

        assert_eq!(filter_quotes(&quotes, "").len(), 2);
    }

    #[test]
    fn ten_quotes_paginate_into_three_pages() {
        let quotes: Vec<Quote> = (0..10)
            .map(|n| quote(&n.to_string(), "text", "label", n))
            .collect();

        assert_eq!(page_count(quotes.len()), 3);
        assert_eq!(page(&quotes, 0).len(), 4);
        assert_eq!(page(&quotes, 2).len(), 2);
    }

    #[test]
    fn page_index_past_the_end_clamps_to_the_last_page() {
        let quotes: Vec<Quote> = (0..10)
            .map(|n| quote(&n.to_string(), "text", "label", n))
            .collect();

        assert_eq!(page(&quotes, 3), page(&quotes, 2));
        assert_eq!(page(&quotes, 99), page(&quotes, 2));
    }

    #[test]
    fn empty_listing_has_no_pages() {
        assert_eq!(page_count(0), 0);
        assert!(page(&[], 0).is_empty());
        assert!(page(&[], 5).is_empty());
    }
}
