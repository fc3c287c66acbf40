//! # Domain Types
//!
//! Catalog, customer and shop-configuration records used throughout Shopfront.
//! The order aggregate has its own module ([`crate::order`]).
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │   Collection    │   │    Product      │   │ ProductVariant  │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id, slug       │◄──│  collections    │   │  id, sku        │       │
//! │  │  parent_id      │   │  variants ──────┼──►│  price          │       │
//! │  │  children       │   │  slug           │   │  stock_level    │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Customer     │   │ ShippingMethod  │   │ PaymentMethod   │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  email (key)    │   │  id, price      │   │  code           │       │
//! │  │  addresses      │   │  description    │   │  is_eligible    │       │
//! │  │  user           │   └─────────────────┘   └─────────────────┘       │
//! │  └─────────────────┘                                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Wire Shape
//! Every record serializes with camelCase field names, the shape the
//! storefront client reads. None of these types carries a credential.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Assets
// =============================================================================

/// An image reference with a preview URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Asset {
    pub id: String,
    pub preview: String,
}

impl Asset {
    pub fn new(id: impl Into<String>, preview: impl Into<String>) -> Self {
        Asset {
            id: id.into(),
            preview: preview.into(),
        }
    }
}

// =============================================================================
// Collections
// =============================================================================

/// A catalog collection. Top-level collections carry their children inline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Collection {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub description: String,
    /// `None` for top-level collections.
    pub parent_id: Option<String>,
    pub featured_asset: Option<Asset>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Collection>,
}

impl Collection {
    /// Finds this collection or one of its children by slug.
    pub fn find_by_slug(&self, slug: &str) -> Option<&Collection> {
        if self.slug == slug {
            return Some(self);
        }
        self.children.iter().find(|child| child.slug == slug)
    }
}

/// Parent link inside a [`ProductCollection`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CollectionParent {
    pub id: String,
    pub name: String,
    pub slug: String,
}

/// Denormalized collection membership stored on each product.
///
/// A product in "Smartphones" lists both "Electronics" and "Smartphones", so
/// membership tests are a plain slug comparison against this list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ProductCollection {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub parent: Option<CollectionParent>,
}

// =============================================================================
// Products
// =============================================================================

/// Stock availability bucket of a variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[ts(export)]
pub enum StockLevel {
    InStock,
    LowStock,
    OutOfStock,
}

/// Option group (e.g., "Storage", "Color").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct OptionGroup {
    pub id: String,
    pub name: String,
}

/// A single option value of a variant (e.g., "128GB" in group "Storage").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ProductOption {
    pub id: String,
    pub name: String,
    pub group: OptionGroup,
}

/// A purchasable variant of a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ProductVariant {
    pub id: String,
    pub name: String,
    pub sku: String,
    pub stock_level: StockLevel,
    pub currency_code: String,
    pub price: Money,
    /// Equal to `price` in the demo shop (tax-inclusive pricing).
    pub price_with_tax: Money,
    pub options: Vec<ProductOption>,
    pub featured_asset: Option<Asset>,
    pub assets: Vec<Asset>,
}

/// A catalog product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub featured_asset: Option<Asset>,
    pub assets: Vec<Asset>,
    pub variants: Vec<ProductVariant>,
    pub collections: Vec<ProductCollection>,
}

impl Product {
    /// Checks membership in a collection by slug.
    pub fn in_collection(&self, slug: &str) -> bool {
        self.collections.iter().any(|c| c.slug == slug)
    }

    /// Case-insensitive substring match on name or description.
    ///
    /// `needle` must already be lowercase. An empty needle matches.
    pub fn matches_term(&self, needle: &str) -> bool {
        needle.is_empty()
            || self.name.to_lowercase().contains(needle)
            || self.description.to_lowercase().contains(needle)
    }

    pub fn variant(&self, variant_id: &str) -> Option<&ProductVariant> {
        self.variants.iter().find(|v| v.id == variant_id)
    }

    /// Builds the search projection of this product.
    ///
    /// ## Price Shape
    /// ```text
    /// all variants 39900          ──► SinglePrice { value: 39900 }
    /// variants 99900..129900      ──► PriceRange { min: 99900, max: 129900 }
    /// no variants                 ──► SinglePrice { value: 0 }
    /// ```
    pub fn to_search_result(&self) -> SearchResultItem {
        let prices = self.variants.iter().map(|v| v.price_with_tax);
        let min = prices.clone().min().unwrap_or_default();
        let max = prices.max().unwrap_or_default();

        let price_with_tax = if min == max {
            SearchPrice::SinglePrice { value: min }
        } else {
            SearchPrice::PriceRange { min, max }
        };

        SearchResultItem {
            product_name: self.name.clone(),
            slug: self.slug.clone(),
            product_asset: self.featured_asset.clone(),
            price_with_tax,
            currency_code: self
                .variants
                .first()
                .map(|v| v.currency_code.clone())
                .unwrap_or_else(|| crate::DEFAULT_CURRENCY_CODE.to_string()),
        }
    }
}

/// Price of a search hit: one value, or the span across variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(tag = "__typename")]
#[ts(export)]
pub enum SearchPrice {
    SinglePrice { value: Money },
    PriceRange { min: Money, max: Money },
}

/// One product in a search result page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SearchResultItem {
    pub product_name: String,
    pub slug: String,
    pub product_asset: Option<Asset>,
    pub price_with_tax: SearchPrice,
    pub currency_code: String,
}

// =============================================================================
// Pagination
// =============================================================================

/// A page of results plus the count before slicing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct PaginatedList<T> {
    pub items: Vec<T>,
    pub total_items: usize,
}

impl<T> PaginatedList<T> {
    /// Slices `filtered[skip .. skip + take]`, clamped to the input.
    ///
    /// ## Example
    /// ```rust
    /// use shopfront_core::PaginatedList;
    ///
    /// let page = PaginatedList::paginate(vec![1, 2, 3, 4, 5], 3, 10);
    /// assert_eq!(page.items, vec![4, 5]);
    /// assert_eq!(page.total_items, 5);
    ///
    /// let past_end = PaginatedList::paginate(vec![1, 2], 7, 10);
    /// assert!(past_end.items.is_empty());
    /// assert_eq!(past_end.total_items, 2);
    /// ```
    pub fn paginate(filtered: Vec<T>, skip: usize, take: usize) -> Self {
        let total_items = filtered.len();
        let items = filtered.into_iter().skip(skip).take(take).collect();
        PaginatedList { items, total_items }
    }
}

// =============================================================================
// Customers
// =============================================================================

/// Country reference on a customer address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct AddressCountry {
    pub code: String,
    pub name: String,
}

/// A saved customer address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Address {
    pub id: String,
    pub full_name: String,
    pub street_line1: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub street_line2: Option<String>,
    pub city: String,
    pub postal_code: String,
    pub country: AddressCountry,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
}

/// The login identity attached to a customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CurrentUser {
    pub id: String,
    pub identifier: String,
}

/// Public view of a customer account.
///
/// The credential is held by the customer store and never appears here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Customer {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub email_address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    pub addresses: Vec<Address>,
    pub user: CurrentUser,
}

/// Input for account registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct RegisterCustomerInput {
    pub email_address: String,
    pub first_name: String,
    pub last_name: String,
    /// Falls back to a default password when absent.
    #[serde(default)]
    pub password: Option<String>,
}

/// Successful login: the new session token and the logged-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct LoginResult {
    pub token: String,
    pub current_user: CurrentUser,
}

// =============================================================================
// Shop Configuration
// =============================================================================

/// A selectable shipping method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ShippingMethod {
    pub id: String,
    pub name: String,
    pub price: Money,
    pub description: String,
}

/// A payment method and whether checkout may offer it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct PaymentMethodInfo {
    pub id: String,
    pub name: String,
    pub code: String,
    pub is_eligible: bool,
}

/// A country the shop ships to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Country {
    pub id: String,
    pub code: String,
    pub name: String,
}

/// A named group of countries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ShippingZone {
    pub id: String,
    pub name: String,
    pub members: Vec<Country>,
}

/// The active sales channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Channel {
    pub default_shipping_zone: ShippingZone,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn variant(id: &str, price: i64) -> ProductVariant {
        ProductVariant {
            id: id.to_string(),
            name: format!("Variant {id}"),
            sku: format!("SKU-{id}"),
            stock_level: StockLevel::InStock,
            currency_code: "USD".to_string(),
            price: Money::from_minor(price),
            price_with_tax: Money::from_minor(price),
            options: Vec::new(),
            featured_asset: None,
            assets: Vec::new(),
        }
    }

    fn product(variants: Vec<ProductVariant>) -> Product {
        Product {
            id: "prod-x".to_string(),
            name: "Noise Cancelling Headphones".to_string(),
            slug: "headphones".to_string(),
            description: "Industry-leading noise cancellation".to_string(),
            featured_asset: None,
            assets: Vec::new(),
            variants,
            collections: vec![ProductCollection {
                id: "1-3".to_string(),
                name: "Audio".to_string(),
                slug: "audio".to_string(),
                parent: None,
            }],
        }
    }

    #[test]
    fn test_search_result_single_price() {
        let item = product(vec![variant("a", 39900), variant("b", 39900)]).to_search_result();
        assert_eq!(
            item.price_with_tax,
            SearchPrice::SinglePrice {
                value: Money::from_minor(39900)
            }
        );
        assert_eq!(item.currency_code, "USD");
    }

    #[test]
    fn test_search_result_price_range() {
        let item = product(vec![variant("a", 129900), variant("b", 99900)]).to_search_result();
        assert_eq!(
            item.price_with_tax,
            SearchPrice::PriceRange {
                min: Money::from_minor(99900),
                max: Money::from_minor(129900)
            }
        );
    }

    #[test]
    fn test_search_price_wire_shape() {
        let json = serde_json::to_value(SearchPrice::PriceRange {
            min: Money::from_minor(1),
            max: Money::from_minor(2),
        })
        .unwrap();
        assert_eq!(json["__typename"], "PriceRange");
        assert_eq!(json["min"], 1);
    }

    #[test]
    fn test_matches_term() {
        let p = product(vec![]);
        assert!(p.matches_term(""));
        assert!(p.matches_term("headphones"));
        assert!(p.matches_term("noise cancellation"));
        assert!(!p.matches_term("laptop"));
    }

    #[test]
    fn test_in_collection() {
        let p = product(vec![]);
        assert!(p.in_collection("audio"));
        assert!(!p.in_collection("laptops"));
    }

    #[test]
    fn test_stock_level_wire_names() {
        let json = serde_json::to_string(&StockLevel::OutOfStock).unwrap();
        assert_eq!(json, "\"OUT_OF_STOCK\"");
    }

    #[test]
    fn test_paginate() {
        let page = PaginatedList::paginate((1..=30).collect::<Vec<_>>(), 12, 12);
        assert_eq!(page.items.first(), Some(&13));
        assert_eq!(page.items.len(), 12);
        assert_eq!(page.total_items, 30);

        let page = PaginatedList::paginate(vec!['a'], 0, 0);
        assert!(page.items.is_empty());
        assert_eq!(page.total_items, 1);
    }

    #[test]
    fn test_collection_find_by_slug() {
        let parent = Collection {
            id: "1".to_string(),
            name: "Electronics".to_string(),
            slug: "electronics".to_string(),
            description: String::new(),
            parent_id: None,
            featured_asset: None,
            children: vec![Collection {
                id: "1-1".to_string(),
                name: "Smartphones".to_string(),
                slug: "smartphones".to_string(),
                description: String::new(),
                parent_id: Some("1".to_string()),
                featured_asset: None,
                children: Vec::new(),
            }],
        };

        assert_eq!(parent.find_by_slug("electronics").map(|c| c.id.as_str()), Some("1"));
        assert_eq!(parent.find_by_slug("smartphones").map(|c| c.id.as_str()), Some("1-1"));
        assert!(parent.find_by_slug("laptops").is_none());
    }
}
