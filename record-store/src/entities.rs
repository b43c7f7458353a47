use jiff::civil::DateTime;
use money::Money;
use serde::{Deserialize, Serialize};
use std::fmt;

pub type RecordId = u32;

/// A record whose text fields can be compared against search tokens.
///
/// Each entity names its searchable fields with a small `Copy` enum; a
/// search passes a slice of those fields and the matcher asks the record for
/// the text behind each one. `None` means the field is absent on this record
/// (e.g. a user without a middle name), which never matches.
pub trait TextRecord {
    type Field: Copy;

    fn record_id(&self) -> RecordId;
    fn field_text(&self, field: Self::Field) -> Option<&str>;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: RecordId,
    pub first_name: String,
    pub middle_name: Option<String>,
    pub last_name: String,
    pub nickname: Option<String>,
    pub email: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserField {
    FirstName,
    MiddleName,
    LastName,
    Nickname,
}

impl TextRecord for User {
    type Field = UserField;

    fn record_id(&self) -> RecordId {
        self.id
    }

    fn field_text(&self, field: UserField) -> Option<&str> {
        match field {
            UserField::FirstName => Some(&self.first_name),
            UserField::MiddleName => self.middle_name.as_deref(),
            UserField::LastName => Some(&self.last_name),
            UserField::Nickname => self.nickname.as_deref(),
        }
    }
}

/// The fixed set of business classifications. Filter values must match the
/// canonical spelling exactly; [`BusinessType::parse`] is case-sensitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BusinessType {
    RetailTrade,
    CharitableOrganisation,
    NonProfitOrganisation,
    AccommodationAndFood,
}

impl BusinessType {
    pub const ALL: [BusinessType; 4] = [
        BusinessType::RetailTrade,
        BusinessType::CharitableOrganisation,
        BusinessType::NonProfitOrganisation,
        BusinessType::AccommodationAndFood,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            BusinessType::RetailTrade => "Retail Trade",
            BusinessType::CharitableOrganisation => "Charitable organisation",
            BusinessType::NonProfitOrganisation => "Non-profit organisation",
            BusinessType::AccommodationAndFood => "Accommodation and Food Services",
        }
    }

    pub fn parse(value: &str) -> Option<BusinessType> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == value)
    }
}

impl fmt::Display for BusinessType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Business {
    pub id: RecordId,
    pub name: String,
    pub business_type: BusinessType,
    pub country: String,
    pub city: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusinessField {
    Name,
}

impl TextRecord for Business {
    type Field = BusinessField;

    fn record_id(&self) -> RecordId {
        self.id
    }

    fn field_text(&self, field: BusinessField) -> Option<&str> {
        match field {
            BusinessField::Name => Some(&self.name),
        }
    }
}

/// A catalogue product. `code` is the business-scoped product code shown to
/// administrators; `id` is the store identity used for deduplication.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: RecordId,
    pub business_id: RecordId,
    pub code: String,
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductField {
    Code,
    Name,
}

impl TextRecord for Product {
    type Field = ProductField;

    fn record_id(&self) -> RecordId {
        self.id
    }

    fn field_text(&self, field: ProductField) -> Option<&str> {
        match field {
            ProductField::Code => Some(&self.code),
            ProductField::Name => Some(&self.name),
        }
    }
}

/// Marketplace card sections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MarketSection {
    ForSale,
    Wanted,
    Exchange,
}

impl MarketSection {
    pub fn parse(value: &str) -> Option<MarketSection> {
        match value {
            "ForSale" => Some(MarketSection::ForSale),
            "Wanted" => Some(MarketSection::Wanted),
            "Exchange" => Some(MarketSection::Exchange),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub id: RecordId,
    pub creator_id: RecordId,
    pub section: MarketSection,
    pub title: String,
    pub keyword_ids: Vec<RecordId>,
    /// Cards stop appearing in searches once this instant has passed.
    pub display_period_end: DateTime,
}

/// A live sale listing, denormalized with the owning business's name,
/// location and type so listing search can match and sort without joins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaleListing {
    pub id: RecordId,
    pub business_id: RecordId,
    pub product_name: String,
    pub business_name: String,
    pub business_type: BusinessType,
    pub country: String,
    pub city: String,
    pub price: Option<Money>,
    pub quantity: u32,
    pub closes: DateTime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListingField {
    ProductName,
    BusinessName,
    Country,
    BusinessType,
}

impl TextRecord for SaleListing {
    type Field = ListingField;

    fn record_id(&self) -> RecordId {
        self.id
    }

    fn field_text(&self, field: ListingField) -> Option<&str> {
        match field {
            ListingField::ProductName => Some(&self.product_name),
            ListingField::BusinessName => Some(&self.business_name),
            ListingField::Country => Some(&self.country),
            ListingField::BusinessType => Some(self.business_type.as_str()),
        }
    }
}

/// A completed sale, consumed read-only by the report aggregator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaleRecord {
    pub business_id: RecordId,
    pub listing_id: RecordId,
    pub product_name: String,
    pub quantity: u32,
    pub price: Money,
    pub sold: DateTime,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn business_type_parsing_is_case_sensitive() {
        assert_eq!(
            BusinessType::parse("Retail Trade"),
            Some(BusinessType::RetailTrade)
        );
        assert_eq!(BusinessType::parse("retail trade"), None);
        assert_eq!(BusinessType::parse("Retail"), None);
        assert_eq!(
            BusinessType::parse("Accommodation and Food Services"),
            Some(BusinessType::AccommodationAndFood)
        );
    }

    #[test]
    fn user_exposes_optional_fields_as_none() {
        let user = User {
            id: 1,
            first_name: "Cara".into(),
            middle_name: None,
            last_name: "Baker".into(),
            nickname: None,
            email: "cara@example.com".into(),
        };
        assert_eq!(user.field_text(UserField::FirstName), Some("Cara"));
        assert_eq!(user.field_text(UserField::MiddleName), None);
        assert_eq!(user.field_text(UserField::Nickname), None);
    }

    #[test]
    fn listing_exposes_business_type_text() {
        let listing = SaleListing {
            id: 7,
            business_id: 2,
            product_name: "Sourdough".into(),
            business_name: "Cara's Cookies".into(),
            business_type: BusinessType::RetailTrade,
            country: "New Zealand".into(),
            city: "Christchurch".into(),
            price: Some(money::Money::from_minor_units(500)),
            quantity: 3,
            closes: jiff::civil::date(2026, 1, 1).at(12, 0, 0, 0),
        };
        assert_eq!(
            listing.field_text(ListingField::BusinessType),
            Some("Retail Trade")
        );
    }
}
