//! # Catalog Commands
//!
//! Product browsing: search, listing, detail, collections and stock.
//!
//! ## User Workflow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Storefront                                                            │
//! │                                                                         │
//! │  Menu ───────────► getCollections ──► Electronics ▸ Audio ...          │
//! │    │                                                                    │
//! │    ▼                                                                    │
//! │  Category page ──► search { term: "", collectionSlug: "audio" }        │
//! │    │                                                                    │
//! │    ▼                                                                    │
//! │  Product page ───► getProduct { slug: "sony-wh-1000xm5" }              │
//! │    │                                                                    │
//! │    ▼                                                                    │
//! │  Variant picker ─► getVariantStock { productId, variantId }            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Deserialize;
use shopfront_core::validation::{require_present, validate_search_query};
use shopfront_core::{
    Collection, PaginatedList, Product, SearchResultItem, StockLevel, DEFAULT_CATALOG_TAKE,
};
use tracing::debug;

use crate::commands::PageInput;
use crate::error::{ApiError, ErrorCode};
use crate::state::AppState;

/// Input for `search`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchInput {
    #[serde(default)]
    pub term: Option<String>,
    #[serde(default)]
    pub collection_slug: Option<String>,
    #[serde(flatten)]
    pub page: PageInput,
}

/// Input for `getVariantStock`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantStockInput {
    #[serde(default)]
    pub product_id: Option<String>,
    #[serde(default)]
    pub variant_id: Option<String>,
}

/// Searches products by name or description.
///
/// ## Behavior
/// - Empty or missing term matches every product
/// - `collectionSlug` additionally requires membership
/// - `totalItems` counts all matches, `items` is the requested page
pub fn search(state: &AppState, input: SearchInput) -> Result<PaginatedList<SearchResultItem>, ApiError> {
    let term = validate_search_query(input.term.as_deref().unwrap_or(""))?;
    let collection = input
        .collection_slug
        .as_deref()
        .map(str::trim)
        .filter(|slug| !slug.is_empty());
    let (skip, take) = input.page.window(DEFAULT_CATALOG_TAKE);

    debug!(term = %term, ?collection, skip, take, "search command");
    Ok(state.with_store(|store| store.catalog().search(term, collection, skip, take)))
}

/// Lists full products in catalog order.
pub fn get_products(state: &AppState, page: PageInput) -> PaginatedList<Product> {
    let (skip, take) = page.window(DEFAULT_CATALOG_TAKE);
    debug!(skip, take, "get_products command");
    state.with_store(|store| store.catalog().list_products(skip, take))
}

/// Gets a product by slug.
///
/// ## Errors
/// - `VALIDATION_ERROR` if the slug is missing
/// - `NOT_FOUND` if no product has the slug
pub fn get_product(state: &AppState, slug: Option<&str>) -> Result<Product, ApiError> {
    let slug = require_present("slug", slug)?;
    debug!(slug = %slug, "get_product command");

    state
        .with_store(|store| store.catalog().get_by_slug(slug).cloned())
        .ok_or_else(|| ApiError::not_found("Product", slug))
}

/// Gets the menu: top-level collections with their children.
pub fn get_collections(state: &AppState) -> Vec<Collection> {
    debug!("get_collections command");
    state.with_store(|store| store.catalog().list_collections().to_vec())
}

/// Gets a collection by slug, searching top-level collections and children.
pub fn get_collection(state: &AppState, slug: Option<&str>) -> Result<Collection, ApiError> {
    let slug = require_present("slug", slug)?;
    debug!(slug = %slug, "get_collection command");

    state
        .with_store(|store| store.catalog().collection_by_slug(slug).cloned())
        .ok_or_else(|| ApiError::not_found("Collection", slug))
}

/// Gets the stock level of one variant of one product.
pub fn get_variant_stock(state: &AppState, input: VariantStockInput) -> Result<StockLevel, ApiError> {
    let product_id = require_present("productId", input.product_id.as_deref())?;
    let variant_id = require_present("variantId", input.variant_id.as_deref())?;
    debug!(product_id = %product_id, variant_id = %variant_id, "get_variant_stock command");

    state
        .with_store(|store| store.catalog().variant_stock(product_id, variant_id))
        .ok_or_else(|| ApiError::new(ErrorCode::NotFound, "Product or variant not found"))
}

// =============================================================================
// Unit Tests
// =============================================================================
