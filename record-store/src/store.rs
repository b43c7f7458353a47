use crate::{RecordId, SaleRecord};
use jiff::civil::Date;
use std::fmt;

/// The backing store could not answer a query. Carries the underlying
/// reason as text; the engine never retries, it surfaces this to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreError {
    message: String,
}

impl StoreError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        StoreError {
            message: message.into(),
        }
    }
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "record store unavailable: {}", self.message)
    }
}

impl std::error::Error for StoreError {}

/// Returns every record of one type satisfying a predicate.
///
/// The predicate is evaluated store-side; implementations are free to push
/// it down however they like as long as the returned records all satisfy it
/// and their relative order is deterministic for an unchanged store.
pub trait RecordStore<R> {
    fn find_matching(&self, predicate: &dyn Fn(&R) -> bool) -> Result<Vec<R>, StoreError>;
}

/// Returns every completed sale for a business whose completion date falls
/// in `[start, end]` (both inclusive, whole days).
pub trait SaleSource {
    fn sales_within(
        &self,
        business_id: RecordId,
        start: Date,
        end: Date,
    ) -> Result<Vec<SaleRecord>, StoreError>;
}

/// In-memory record store: a plain vector filtered on demand. Records keep
/// their insertion order, which makes search results reproducible in tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore<R> {
    records: Vec<R>,
}

impl<R> MemoryStore<R> {
    pub fn new(records: Vec<R>) -> Self {
        MemoryStore { records }
    }

    pub fn push(&mut self, record: R) {
        self.records.push(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl<R: Clone> RecordStore<R> for MemoryStore<R> {
    fn find_matching(&self, predicate: &dyn Fn(&R) -> bool) -> Result<Vec<R>, StoreError> {
        Ok(self
            .records
            .iter()
            .filter(|record| predicate(record))
            .cloned()
            .collect())
    }
}

/// In-memory sale history for the report aggregator.
#[derive(Debug, Clone, Default)]
pub struct MemorySaleSource {
    sales: Vec<SaleRecord>,
}

impl MemorySaleSource {
    pub fn new(sales: Vec<SaleRecord>) -> Self {
        MemorySaleSource { sales }
    }

    pub fn push(&mut self, sale: SaleRecord) {
        self.sales.push(sale);
    }
}

impl SaleSource for MemorySaleSource {
    fn sales_within(
        &self,
        business_id: RecordId,
        start: Date,
        end: Date,
    ) -> Result<Vec<SaleRecord>, StoreError> {
        Ok(self
            .sales
            .iter()
            .filter(|sale| {
                sale.business_id == business_id
                    && sale.sold.date() >= start
                    && sale.sold.date() <= end
            })
            .cloned()
            .collect())
    }
}
