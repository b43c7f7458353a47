use crate::{evaluate, rank, Comparator, SearchError, DEFAULT_PAGE_SIZE};
use query_syntax::tokenize;
use record_store::{Business, BusinessField, BusinessType, RecordStore};
use std::cmp::Ordering;
use tracing::info;

/// Business search compares tokens against the business name only; the
/// business type is a separate categorical filter, not a text field.
pub const BUSINESS_SEARCH_FIELDS: &[BusinessField] = &[BusinessField::Name];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusinessSortKey {
    IdAsc,
    IdDesc,
    NameAsc,
    NameDesc,
    BusinessTypeAsc,
    BusinessTypeDesc,
}

impl BusinessSortKey {
    pub fn parse(value: &str) -> Option<BusinessSortKey> {
        match value {
            "idASC" => Some(BusinessSortKey::IdAsc),
            "idDESC" => Some(BusinessSortKey::IdDesc),
            "nameASC" => Some(BusinessSortKey::NameAsc),
            "nameDESC" => Some(BusinessSortKey::NameDesc),
            "businessTypeASC" => Some(BusinessSortKey::BusinessTypeAsc),
            "businessTypeDESC" => Some(BusinessSortKey::BusinessTypeDesc),
            _ => None,
        }
    }

    fn comparator(self) -> Comparator<Business> {
        match self {
            BusinessSortKey::IdAsc => Box::new(|a, b| a.id.cmp(&b.id)),
            BusinessSortKey::IdDesc => Box::new(|a, b| b.id.cmp(&a.id)),
            BusinessSortKey::NameAsc => Box::new(|a, b| compare_ci(&a.name, &b.name)),
            BusinessSortKey::NameDesc => Box::new(|a, b| compare_ci(&b.name, &a.name)),
            BusinessSortKey::BusinessTypeAsc => {
                Box::new(|a, b| a.business_type.as_str().cmp(b.business_type.as_str()))
            }
            BusinessSortKey::BusinessTypeDesc => {
                Box::new(|a, b| b.business_type.as_str().cmp(a.business_type.as_str()))
            }
        }
    }
}

fn compare_ci(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase())
}

/// Searches businesses by name, optionally narrowed to one business type,
/// and returns one page plus the total match count.
pub fn search_businesses<S>(
    store: &S,
    raw_query: &str,
    business_type: Option<BusinessType>,
    sort_by: &str,
    page_number: usize,
) -> Result<(Vec<Business>, usize), SearchError>
where
    S: RecordStore<Business> + ?Sized,
{
    let group = tokenize(raw_query);
    let mut businesses = evaluate(store, BUSINESS_SEARCH_FIELDS, &group)?;
    if let Some(kind) = business_type {
        businesses.retain(|business| business.business_type == kind);
    }

    let compare = BusinessSortKey::parse(sort_by).map(BusinessSortKey::comparator);
    let (page, total) = rank(businesses, compare, page_number, DEFAULT_PAGE_SIZE);
    info!("retrieved {} businesses, showing {}", total, page.len());
    Ok((page, total))
}
