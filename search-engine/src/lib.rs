//! Boolean search over marketplace entities.
//!
//! A raw query string is tokenized by `query-syntax`, evaluated against a
//! [`record_store::RecordStore`] clause by clause, deduplicated, filtered,
//! sorted and paginated. Each entity type (users, businesses, products,
//! cards, sale listings) gets a thin entry point that fixes the searchable
//! fields and sort vocabulary; the machinery underneath is shared.

mod businesses;
mod cards;
mod error;
mod evaluate;
mod listings;
mod matching;
mod products;
mod rank;
mod users;

pub use businesses::*;
pub use cards::*;
pub use error::*;
pub use evaluate::*;
pub use listings::*;
pub use matching::*;
pub use products::*;
pub use rank::*;
pub use users::*;
