use crate::{evaluate, rank, Comparator, SearchError, DEFAULT_PAGE_SIZE};
use jiff::civil::Date;
use money::Money;
use query_syntax::tokenize;
use record_store::{BusinessType, ListingField, RecordStore, SaleListing};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use tracing::{info, warn};

/// A listing search as it arrives from the outside: the raw query plus the
/// optional filters, all still in wire form. Validation turns this into
/// [`ListingFilterOptions`] before anything touches the store.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ListingSearchRequest {
    pub query: String,
    pub match_product_name: bool,
    pub match_business_name: bool,
    pub match_business_location: bool,
    pub match_business_type: bool,
    pub price_range_lower: Option<String>,
    pub price_range_upper: Option<String>,
    pub closing_date_lower: Option<String>,
    pub closing_date_upper: Option<String>,
    pub business_type: Option<String>,
    pub sort_by: String,
    pub page_number: usize,
}

/// Orderings a listing search can request. Anything else in the request's
/// `sort_by` falls back to the evaluator's own order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListingSortKey {
    PriceAsc,
    PriceDesc,
    ProductName,
    Country,
    City,
    Seller,
}

impl ListingSortKey {
    pub fn parse(value: &str) -> Option<ListingSortKey> {
        match value {
            "priceAsc" => Some(ListingSortKey::PriceAsc),
            "priceDesc" => Some(ListingSortKey::PriceDesc),
            "productName" => Some(ListingSortKey::ProductName),
            "country" => Some(ListingSortKey::Country),
            "city" => Some(ListingSortKey::City),
            "seller" => Some(ListingSortKey::Seller),
            _ => None,
        }
    }

    fn comparator(self) -> Comparator<SaleListing> {
        match self {
            ListingSortKey::PriceAsc => Box::new(|a, b| compare_prices(a.price, b.price)),
            ListingSortKey::PriceDesc => Box::new(|a, b| match (a.price, b.price) {
                (Some(a), Some(b)) => b.cmp(&a),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            }),
            ListingSortKey::ProductName => {
                Box::new(|a, b| compare_ci(&a.product_name, &b.product_name))
            }
            ListingSortKey::Country => Box::new(|a, b| compare_ci(&a.country, &b.country)),
            ListingSortKey::City => Box::new(|a, b| compare_ci(&a.city, &b.city)),
            ListingSortKey::Seller => {
                Box::new(|a, b| compare_ci(&a.business_name, &b.business_name))
            }
        }
    }
}

// Listings without a price sort after priced ones in either direction.
fn compare_prices(a: Option<Money>, b: Option<Money>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn compare_ci(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase())
}

/// Validated filter set for a listing search.
#[derive(Debug, Clone)]
pub struct ListingFilterOptions {
    pub fields: Vec<ListingField>,
    pub price_lower: Option<Money>,
    pub price_upper: Option<Money>,
    pub closing_lower: Option<Date>,
    pub closing_upper: Option<Date>,
    pub business_type: Option<BusinessType>,
    pub sort: Option<ListingSortKey>,
    pub page_number: usize,
}

impl ListingFilterOptions {
    /// Validates a raw request. Shape problems (unparsable amounts or
    /// dates) are [`SearchError::MalformedQuery`]; values that parse but
    /// cannot be honored (inverted ranges, unknown business type) are
    /// [`SearchError::InvalidFilterValue`]. Nothing reaches the store until
    /// this succeeds.
    pub fn from_request(request: &ListingSearchRequest) -> Result<Self, SearchError> {
        let mut fields = Vec::new();
        if request.match_product_name {
            fields.push(ListingField::ProductName);
        }
        if request.match_business_name {
            fields.push(ListingField::BusinessName);
        }
        if request.match_business_location {
            fields.push(ListingField::Country);
        }
        if request.match_business_type {
            fields.push(ListingField::BusinessType);
        }
        if fields.is_empty() {
            fields.push(ListingField::ProductName);
        }

        let price_lower = parse_price(request.price_range_lower.as_deref())?;
        let price_upper = parse_price(request.price_range_upper.as_deref())?;
        if let (Some(lower), Some(upper)) = (price_lower, price_upper) {
            if lower > upper {
                return Err(SearchError::InvalidFilterValue(format!(
                    "price range lower bound {lower} exceeds upper bound {upper}"
                )));
            }
        }

        let closing_lower = parse_closing_date(request.closing_date_lower.as_deref())?;
        let closing_upper = parse_closing_date(request.closing_date_upper.as_deref())?;
        if let (Some(lower), Some(upper)) = (closing_lower, closing_upper) {
            if lower > upper {
                return Err(SearchError::InvalidFilterValue(format!(
                    "closing date lower bound {lower} exceeds upper bound {upper}"
                )));
            }
        }

        let business_type = match request.business_type.as_deref() {
            Some(value) => match BusinessType::parse(value) {
                Some(kind) => Some(kind),
                None => {
                    warn!("rejected unknown business type filter {value:?}");
                    return Err(SearchError::InvalidFilterValue(format!(
                        "{value:?} is not a valid business type"
                    )));
                }
            },
            None => None,
        };

        Ok(ListingFilterOptions {
            fields,
            price_lower,
            price_upper,
            closing_lower,
            closing_upper,
            business_type,
            sort: ListingSortKey::parse(&request.sort_by),
            page_number: request.page_number,
        })
    }

    /// Range and categorical filters, intersected with the text match.
    /// Price bounds are inclusive; an unpriced listing fails any price
    /// bound. Closing-date bounds include the whole end day.
    fn accepts(&self, listing: &SaleListing) -> bool {
        if self.price_lower.is_some() || self.price_upper.is_some() {
            let Some(price) = listing.price else {
                return false;
            };
            if let Some(lower) = self.price_lower {
                if price < lower {
                    return false;
                }
            }
            if let Some(upper) = self.price_upper {
                if price > upper {
                    return false;
                }
            }
        }

        let closes = listing.closes.date();
        if let Some(lower) = self.closing_lower {
            if closes < lower {
                return false;
            }
        }
        if let Some(upper) = self.closing_upper {
            if closes > upper {
                return false;
            }
        }

        if let Some(kind) = self.business_type {
            if listing.business_type != kind {
                return false;
            }
        }

        true
    }
}

fn parse_price(value: Option<&str>) -> Result<Option<Money>, SearchError> {
    match value {
        Some(raw) => raw
            .parse::<Money>()
            .map(Some)
            .map_err(|error| SearchError::MalformedQuery(error.to_string())),
        None => Ok(None),
    }
}

fn parse_closing_date(value: Option<&str>) -> Result<Option<Date>, SearchError> {
    match value {
        Some(raw) => raw.parse::<Date>().map(Some).map_err(|_| {
            SearchError::MalformedQuery(format!(
                "date {raw:?} is not in the format yyyy-mm-dd"
            ))
        }),
        None => Ok(None),
    }
}

/// Full listing search: tokenize the query, evaluate it over the selected
/// fields, intersect with the range and categorical filters, then sort and
/// paginate. Returns one page plus the total match count.
pub fn search_listings<S>(
    store: &S,
    request: &ListingSearchRequest,
) -> Result<(Vec<SaleListing>, usize), SearchError>
where
    S: RecordStore<SaleListing> + ?Sized,
{
    let options = ListingFilterOptions::from_request(request)?;
    let group = tokenize(&request.query);

    let mut listings = evaluate(store, &options.fields, &group)?;
    listings.retain(|listing| options.accepts(listing));

    let compare = options.sort.map(ListingSortKey::comparator);
    let (page, total) = rank(listings, compare, options.page_number, DEFAULT_PAGE_SIZE);
    info!("retrieved {} sale listings, showing {}", total, page.len());
    Ok((page, total))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> ListingSearchRequest {
        ListingSearchRequest::default()
    }

    #[test]
    fn defaults_to_product_name_field() {
        let options = ListingFilterOptions::from_request(&request()).unwrap();
        assert_eq!(options.fields, vec![ListingField::ProductName]);
    }

    #[test]
    fn collects_selected_fields_in_order() {
        let mut req = request();
        req.match_business_name = true;
        req.match_business_type = true;
        let options = ListingFilterOptions::from_request(&req).unwrap();
        assert_eq!(
            options.fields,
            vec![ListingField::BusinessName, ListingField::BusinessType]
        );
    }

    #[test]
    fn rejects_non_numeric_price_bound() {
        let mut req = request();
        req.price_range_lower = Some("ten".into());
        let error = ListingFilterOptions::from_request(&req).unwrap_err();
        assert!(matches!(error, SearchError::MalformedQuery(_)));
    }

    #[test]
    fn rejects_inverted_price_range() {
        let mut req = request();
        req.price_range_lower = Some("50.00".into());
        req.price_range_upper = Some("10.00".into());
        let error = ListingFilterOptions::from_request(&req).unwrap_err();
        assert!(matches!(error, SearchError::InvalidFilterValue(_)));
    }

    #[test]
    fn rejects_unparsable_date() {
        let mut req = request();
        req.closing_date_lower = Some("06/01/2021".into());
        let error = ListingFilterOptions::from_request(&req).unwrap_err();
        assert!(matches!(error, SearchError::MalformedQuery(_)));
    }

    #[test]
    fn rejects_inverted_date_range() {
        let mut req = request();
        req.closing_date_lower = Some("2021-12-01".into());
        req.closing_date_upper = Some("2021-06-01".into());
        let error = ListingFilterOptions::from_request(&req).unwrap_err();
        assert!(matches!(error, SearchError::InvalidFilterValue(_)));
    }

    #[test]
    fn rejects_unknown_business_type_case_sensitively() {
        let mut req = request();
        req.business_type = Some("retail trade".into());
        let error = ListingFilterOptions::from_request(&req).unwrap_err();
        assert!(matches!(error, SearchError::InvalidFilterValue(_)));

        req.business_type = Some("Retail Trade".into());
        let options = ListingFilterOptions::from_request(&req).unwrap();
        assert_eq!(options.business_type, Some(BusinessType::RetailTrade));
    }

    #[test]
    fn unknown_sort_key_falls_back_to_default_order() {
        let mut req = request();
        req.sort_by = "cheapestFirst".into();
        let options = ListingFilterOptions::from_request(&req).unwrap();
        assert_eq!(options.sort, None);
    }

    #[test]
    fn unpriced_listings_sort_last_in_both_directions() {
        let cheap = Some(Money::from_minor_units(100));
        let dear = Some(Money::from_minor_units(900));
        assert_eq!(compare_prices(cheap, dear), Ordering::Less);
        assert_eq!(compare_prices(None, cheap), Ordering::Greater);
        assert_eq!(compare_prices(cheap, None), Ordering::Less);
    }
}
