use crate::{rank, SearchError, DEFAULT_PAGE_SIZE};
use jiff::civil::DateTime;
use record_store::{Card, MarketSection, RecordId, RecordStore};
use serde::{Deserialize, Serialize};
use tracing::info;

/// A marketplace card search: one section, one or more keyword ids, and a
/// choice between union (any keyword) and intersection (all keywords).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardSearchRequest {
    pub section: String,
    pub keyword_ids: Vec<RecordId>,
    /// `true` = a card matches if it carries any of the keywords,
    /// `false` = it must carry all of them. Required.
    pub union: Option<bool>,
    #[serde(default)]
    pub page_number: usize,
}

/// Searches active cards in one marketplace section by keyword.
///
/// `now` is the caller's clock; cards whose display period has ended before
/// it are never returned. Passing the instant in keeps the search free of
/// ambient state and reproducible in tests.
pub fn search_cards<S>(
    store: &S,
    request: &CardSearchRequest,
    now: DateTime,
) -> Result<(Vec<Card>, usize), SearchError>
where
    S: RecordStore<Card> + ?Sized,
{
    let Some(section) = MarketSection::parse(&request.section) else {
        return Err(SearchError::InvalidFilterValue(format!(
            "{:?} is not a marketplace section",
            request.section
        )));
    };
    if request.keyword_ids.is_empty() {
        return Err(SearchError::InvalidFilterValue(
            "at least one keyword id is required".into(),
        ));
    }
    let Some(union) = request.union else {
        return Err(SearchError::InvalidFilterValue(
            "union is a required parameter".into(),
        ));
    };

    let keyword_ids = &request.keyword_ids;
    let cards = store.find_matching(&|card: &Card| {
        if card.section != section || card.display_period_end < now {
            return false;
        }
        if union {
            keyword_ids.iter().any(|id| card.keyword_ids.contains(id))
        } else {
            keyword_ids.iter().all(|id| card.keyword_ids.contains(id))
        }
    })?;

    let (page, total) = rank(cards, None, request.page_number, DEFAULT_PAGE_SIZE);
    info!("retrieved {} cards, showing {}", total, page.len());
    Ok((page, total))
}
