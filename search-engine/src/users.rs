use crate::{evaluate, rank, Comparator, SearchError, DEFAULT_PAGE_SIZE};
use query_syntax::tokenize;
use record_store::{RecordStore, User, UserField};
use std::cmp::Ordering;
use tracing::info;

/// The fields a user search compares tokens against.
pub const USER_SEARCH_FIELDS: &[UserField] = &[
    UserField::FirstName,
    UserField::MiddleName,
    UserField::LastName,
    UserField::Nickname,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserSortKey {
    IdAsc,
    IdDesc,
    FirstNameAsc,
    FirstNameDesc,
    MiddleNameAsc,
    MiddleNameDesc,
    LastNameAsc,
    LastNameDesc,
    EmailAsc,
    EmailDesc,
}

impl UserSortKey {
    /// Accepts the wire spellings (`"firstNameASC"`, `"idDESC"`, ...);
    /// anything else means no sorting.
    pub fn parse(value: &str) -> Option<UserSortKey> {
        match value {
            "idASC" => Some(UserSortKey::IdAsc),
            "idDESC" => Some(UserSortKey::IdDesc),
            "firstNameASC" => Some(UserSortKey::FirstNameAsc),
            "firstNameDESC" => Some(UserSortKey::FirstNameDesc),
            "middleNameASC" => Some(UserSortKey::MiddleNameAsc),
            "middleNameDESC" => Some(UserSortKey::MiddleNameDesc),
            "lastNameASC" => Some(UserSortKey::LastNameAsc),
            "lastNameDESC" => Some(UserSortKey::LastNameDesc),
            "emailASC" => Some(UserSortKey::EmailAsc),
            "emailDESC" => Some(UserSortKey::EmailDesc),
            _ => None,
        }
    }

    fn comparator(self) -> Comparator<User> {
        match self {
            UserSortKey::IdAsc => Box::new(|a, b| a.id.cmp(&b.id)),
            UserSortKey::IdDesc => Box::new(|a, b| b.id.cmp(&a.id)),
            UserSortKey::FirstNameAsc => {
                Box::new(|a, b| compare_ci(&a.first_name, &b.first_name))
            }
            UserSortKey::FirstNameDesc => {
                Box::new(|a, b| compare_ci(&b.first_name, &a.first_name))
            }
            UserSortKey::MiddleNameAsc => {
                Box::new(|a, b| compare_optional_ci(a.middle_name.as_deref(), b.middle_name.as_deref(), false))
            }
            UserSortKey::MiddleNameDesc => {
                Box::new(|a, b| compare_optional_ci(a.middle_name.as_deref(), b.middle_name.as_deref(), true))
            }
            UserSortKey::LastNameAsc => Box::new(|a, b| compare_ci(&a.last_name, &b.last_name)),
            UserSortKey::LastNameDesc => Box::new(|a, b| compare_ci(&b.last_name, &a.last_name)),
            UserSortKey::EmailAsc => Box::new(|a, b| compare_ci(&a.email, &b.email)),
            UserSortKey::EmailDesc => Box::new(|a, b| compare_ci(&b.email, &a.email)),
        }
    }
}

fn compare_ci(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase())
}

// Users without the field sort last in either direction.
fn compare_optional_ci(a: Option<&str>, b: Option<&str>, descending: bool) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => {
            if descending {
                compare_ci(b, a)
            } else {
                compare_ci(a, b)
            }
        }
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Searches users by name (first, middle, last, nickname) and returns one
/// page plus the total match count.
pub fn search_users<S>(
    store: &S,
    raw_query: &str,
    sort_by: &str,
    page_number: usize,
) -> Result<(Vec<User>, usize), SearchError>
where
    S: RecordStore<User> + ?Sized,
{
    let group = tokenize(raw_query);
    let users = evaluate(store, USER_SEARCH_FIELDS, &group)?;

    let compare = UserSortKey::parse(sort_by).map(UserSortKey::comparator);
    let (page, total) = rank(users, compare, page_number, DEFAULT_PAGE_SIZE);
    info!("retrieved {} users, showing {}", total, page.len());
    Ok((page, total))
}
