use crate::{clause_matches, MatchMode, SearchError};
use hashbrown::HashSet;
use query_syntax::ClauseGroup;
use record_store::{RecordStore, TextRecord};
use tracing::debug;

/// Evaluates a tokenized query against the store.
///
/// Every clause issues two store queries, one per [`MatchMode`]: records
/// matched exactly and records matched by containment are unioned, in
/// insertion order, deduplicated by record identity. Exact-mode hits are a
/// subset of substring-mode hits for the same clause, so the double query
/// changes ordering, not membership: exact matches surface ahead of looser
/// ones whenever no explicit sort is requested.
///
/// A store error aborts the evaluation; no partial result escapes.
pub fn evaluate<R, S>(
    store: &S,
    fields: &[R::Field],
    group: &ClauseGroup,
) -> Result<Vec<R>, SearchError>
where
    R: TextRecord,
    S: RecordStore<R> + ?Sized,
{
    let mut seen = HashSet::new();
    let mut results = Vec::new();

    for clause in &group.clauses {
        for mode in [MatchMode::ExactToken, MatchMode::Substring] {
            let matched =
                store.find_matching(&|record: &R| clause_matches(record, fields, clause, mode))?;
            for record in matched {
                if seen.insert(record.record_id()) {
                    results.push(record);
                }
            }
        }
    }

    debug!(
        "evaluated {} clauses, {} distinct records matched",
        group.clauses.len(),
        results.len()
    );
    Ok(results)
}
