use crate::{evaluate, SearchError};
use query_syntax::tokenize;
use record_store::{Product, ProductField, RecordStore};
use tracing::debug;

/// Catalogue search compares tokens against the product code and name.
pub const PRODUCT_SEARCH_FIELDS: &[ProductField] = &[ProductField::Code, ProductField::Name];

/// Searches one business's product catalogue. The catalogue view is not
/// paginated, so this returns every match in evaluator order.
pub fn search_products<S>(
    store: &S,
    business_id: u32,
    raw_query: &str,
) -> Result<Vec<Product>, SearchError>
where
    S: RecordStore<Product> + ?Sized,
{
    let group = tokenize(raw_query);
    let mut products = evaluate(store, PRODUCT_SEARCH_FIELDS, &group)?;
    products.retain(|product| product.business_id == business_id);
    debug!(
        "catalogue search for business {} matched {} products",
        business_id,
        products.len()
    );
    Ok(products)
}
