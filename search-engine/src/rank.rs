use std::cmp::Ordering;

/// Page size used by every entity search entry point, matching the rest of
/// the application's paging. Callers invoking [`rank`] directly can pick
/// their own.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Orders two records for a requested sort key. Sorting through [`rank`] is
/// stable, so records comparing equal keep their evaluator order.
pub type Comparator<R> = Box<dyn Fn(&R, &R) -> Ordering>;

/// Sorts (optionally) and paginates a result set.
///
/// The total count is taken before the page is cut, so callers always learn
/// how many records matched. A page number past the end yields an empty
/// page, not an error.
pub fn rank<R>(
    mut records: Vec<R>,
    compare: Option<Comparator<R>>,
    page_number: usize,
    page_size: usize,
) -> (Vec<R>, usize) {
    let total = records.len();
    if let Some(compare) = compare {
        records.sort_by(|a, b| compare(a, b));
    }

    let start = page_number.saturating_mul(page_size);
    if start >= total {
        return (Vec::new(), total);
    }
    let page = records
        .into_iter()
        .skip(start)
        .take(page_size)
        .collect();
    (page, total)
}
