//! # Marketplace search query tokenizer
//!
//! `query-syntax` turns a raw search string into the boolean structure the
//! rest of the engine evaluates: clauses joined by `or` at the top level,
//! tokens joined by `and` (or plain whitespace) inside each clause. Double
//! quotes group a phrase so its contents are never split, even when they
//! contain the words `and` or `or`.
//!
//! ## Example
//! ```
//! use query_syntax::tokenize;
//!
//! let group = tokenize("\"fish and chips\" or soup");
//! assert_eq!(group.clauses.len(), 2);
//! assert_eq!(group.clauses[0].tokens[0].text, "fish and chips");
//! assert!(group.clauses[0].tokens[0].phrase);
//! assert_eq!(group.clauses[1].tokens[0].text, "soup");
//! assert!(!group.clauses[1].tokens[0].phrase);
//! ```
//!
//! Tokenization never fails: an empty query produces a single empty clause
//! (which downstream code treats as "match everything"), and an unbalanced
//! quote simply treats the rest of the string as quoted.

/// Splits a raw query into its disjunctive clause structure.
///
/// The input is lower-cased first, so tokens compare cheaply against
/// lower-cased entity fields later on.
pub fn tokenize(raw: &str) -> ClauseGroup {
    let lowered = raw.to_lowercase();
    let mut segments = split_outside_quotes(&lowered, " or ");
    // A trailing separator does not open a new (match-everything) clause.
    while segments.len() > 1 && segments.last().is_some_and(|s| s.trim().is_empty()) {
        segments.pop();
    }
    let clauses = segments.into_iter().map(clause_from_segment).collect();
    ClauseGroup { clauses }
}

/// A full query: clauses combined with OR.
///
/// ```
/// use query_syntax::tokenize;
/// let group = tokenize("bread or milk");
/// assert_eq!(group.clauses.len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClauseGroup {
    pub clauses: Vec<Clause>,
}

impl ClauseGroup {
    /// True when every clause is empty, i.e. the query places no constraint
    /// on the result set.
    ///
    /// ```
    /// use query_syntax::tokenize;
    /// assert!(tokenize("   ").matches_everything());
    /// assert!(!tokenize("bread").matches_everything());
    /// ```
    pub fn matches_everything(&self) -> bool {
        self.clauses.iter().all(|clause| clause.tokens.is_empty())
    }
}

/// A conjunction of tokens: a record must satisfy every token in the clause.
///
/// An empty clause (from an empty query segment) matches every record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clause {
    pub tokens: Vec<Token>,
}

/// One search token. `phrase` records whether the token was written as a
/// quoted phrase; quoted tokens opt out of substring matching downstream.
/// The structural quotes themselves are stripped from `text`.
///
/// ```
/// use query_syntax::tokenize;
/// let group = tokenize("\"cara's cookies\"");
/// let token = &group.clauses[0].tokens[0];
/// assert_eq!(token.text, "cara's cookies");
/// assert!(token.phrase);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub text: String,
    pub phrase: bool,
}

fn clause_from_segment(segment: &str) -> Clause {
    Clause {
        tokens: split_clause_tokens(segment),
    }
}

/// Splits on a literal separator, ignoring occurrences inside double quotes.
///
/// A single pass tracks quote state by toggling on each `"`; once an
/// unmatched quote opens, everything after it counts as quoted, which is how
/// unbalanced input stays tolerated.
fn split_outside_quotes<'a>(input: &'a str, separator: &str) -> Vec<&'a str> {
    let mut parts = Vec::new();
    let mut in_quotes = false;
    let mut start = 0;
    let mut pos = 0;

    while pos < input.len() {
        let ch = match input[pos..].chars().next() {
            Some(ch) => ch,
            None => break,
        };
        if ch == '"' {
            in_quotes = !in_quotes;
            pos += 1;
            continue;
        }
        if !in_quotes && input[pos..].starts_with(separator) {
            parts.push(&input[start..pos]);
            pos += separator.len();
            start = pos;
            continue;
        }
        pos += ch.len_utf8();
    }

    parts.push(&input[start..]);
    parts
}

/// Splits one clause segment into tokens on `" and "` or runs of whitespace,
/// again skipping anything inside quotes. Consecutive delimiters collapse;
/// they never produce empty tokens.
fn split_clause_tokens(segment: &str) -> Vec<Token> {
    const AND_SEPARATOR: &str = " and ";

    let mut tokens = Vec::new();
    let mut in_quotes = false;
    let mut start = 0;
    let mut pos = 0;

    while pos < segment.len() {
        let ch = match segment[pos..].chars().next() {
            Some(ch) => ch,
            None => break,
        };
        if ch == '"' {
            in_quotes = !in_quotes;
            pos += 1;
            continue;
        }
        if !in_quotes {
            if segment[pos..].starts_with(AND_SEPARATOR) {
                push_token(&mut tokens, &segment[start..pos]);
                pos += AND_SEPARATOR.len();
                start = pos;
                continue;
            }
            if ch.is_whitespace() {
                push_token(&mut tokens, &segment[start..pos]);
                pos += ch.len_utf8();
                start = pos;
                continue;
            }
        }
        pos += ch.len_utf8();
    }

    push_token(&mut tokens, &segment[start..]);
    tokens
}

fn push_token(tokens: &mut Vec<Token>, raw: &str) {
    if raw.is_empty() {
        return;
    }
    let phrase = raw.len() >= 2 && raw.starts_with('"') && raw.ends_with('"');
    let text: String = raw.chars().filter(|&ch| ch != '"').collect();
    // A stray quote is not a token. An explicitly quoted empty phrase ("")
    // is kept; it matches only empty fields.
    if text.is_empty() && !phrase {
        return;
    }
    tokens.push(Token { text, phrase });
}
