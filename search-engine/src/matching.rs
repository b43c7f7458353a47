use query_syntax::{Clause, Token};
use record_store::TextRecord;

/// How a token is compared against a field value. Both modes lower-case the
/// field first; tokens arrive already lower-cased from the tokenizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchMode {
    /// The whole field value equals the token.
    ExactToken,
    /// The field value contains the token.
    Substring,
}

/// True when any field in the spec matches the token under `mode`.
///
/// A phrase token (written quoted in the raw query) always requires an
/// exact field match, whatever the mode: quoting is how callers opt out of
/// substring matching.
pub fn token_matches<R: TextRecord>(
    record: &R,
    fields: &[R::Field],
    token: &Token,
    mode: MatchMode,
) -> bool {
    fields.iter().any(|&field| {
        let Some(value) = record.field_text(field) else {
            return false;
        };
        let value = value.to_lowercase();
        if token.phrase {
            return value == token.text;
        }
        match mode {
            MatchMode::ExactToken => value == token.text,
            MatchMode::Substring => value.contains(&token.text),
        }
    })
}

/// AND over the clause's tokens. An empty clause matches every record,
/// which is how an empty query means "everything".
pub fn clause_matches<R: TextRecord>(
    record: &R,
    fields: &[R::Field],
    clause: &Clause,
    mode: MatchMode,
) -> bool {
    clause
        .tokens
        .iter()
        .all(|token| token_matches(record, fields, token, mode))
}
