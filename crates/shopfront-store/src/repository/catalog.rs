//! # Catalog Repository
//!
//! Read-only product and collection lookups.
//!
//! ## Key Operations
//! - Lookup by slug or id
//! - Substring search with optional collection filter
//! - Paginated listing
//!
//! ## Search
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    How Search Works                                     │
//! │                                                                         │
//! │  search("pro", Some("audio"), skip 0, take 12)                         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  lowercase term, match name OR description (substring)                 │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  keep products whose collections contain slug "audio"                  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  totalItems = filtered count ──► items = filtered[skip .. skip+take]   │
//! │                                                                         │
//! │  Declaration order is kept. There is no relevance ranking.             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use shopfront_core::{
    Collection, PaginatedList, Product, ProductVariant, SearchResultItem, StockLevel, VariantInfo,
};
use tracing::debug;

/// Repository for catalog lookups.
///
/// ## Usage
/// ```rust
/// use shopfront_store::seed;
///
/// let catalog = seed::demo_catalog();
///
/// let page = catalog.search("iphone", None, 0, 12);
/// assert_eq!(page.total_items, 1);
///
/// let product = catalog.get_by_slug("airpods-pro-2").unwrap();
/// assert_eq!(product.variants.len(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    products: Vec<Product>,
    collections: Vec<Collection>,
}

impl Catalog {
    /// Creates a catalog from products and top-level collections.
    pub fn new(products: Vec<Product>, collections: Vec<Collection>) -> Self {
        Catalog {
            products,
            collections,
        }
    }

    /// Finds a product by slug.
    pub fn get_by_slug(&self, slug: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.slug == slug)
    }

    /// Finds a product by id.
    pub fn get_by_id(&self, id: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    /// The collection tree: top-level collections with children inline.
    pub fn list_collections(&self) -> &[Collection] {
        &self.collections
    }

    /// Finds a collection by slug, at the top level or one level down.
    pub fn collection_by_slug(&self, slug: &str) -> Option<&Collection> {
        self.collections
            .iter()
            .find_map(|collection| collection.find_by_slug(slug))
    }

    /// Lists full products, paginated.
    pub fn list_products(&self, skip: usize, take: usize) -> PaginatedList<Product> {
        PaginatedList::paginate(self.products.clone(), skip, take)
    }

    /// Searches products by term and optional collection slug.
    ///
    /// ## Arguments
    /// * `term` - Case-insensitive substring of name or description. Empty matches all.
    /// * `collection_slug` - Only products listed in this collection
    /// * `skip`, `take` - Window over the filtered results
    pub fn search(
        &self,
        term: &str,
        collection_slug: Option<&str>,
        skip: usize,
        take: usize,
    ) -> PaginatedList<SearchResultItem> {
        let needle = term.to_lowercase();

        let filtered: Vec<SearchResultItem> = self
            .products
            .iter()
            .filter(|p| p.matches_term(&needle))
            .filter(|p| collection_slug.map_or(true, |slug| p.in_collection(slug)))
            .map(Product::to_search_result)
            .collect();

        debug!(
            term = %term,
            collection = ?collection_slug,
            matched = filtered.len(),
            "Searched catalog"
        );

        PaginatedList::paginate(filtered, skip, take)
    }

    /// Finds a variant anywhere in the catalog, with its product.
    pub fn find_variant(&self, variant_id: &str) -> Option<(&Product, &ProductVariant)> {
        self.products
            .iter()
            .find_map(|p| p.variant(variant_id).map(|v| (p, v)))
    }

    /// The snapshot a cart line copies from a catalog variant.
    pub fn variant_info(&self, variant_id: &str) -> Option<VariantInfo> {
        self.find_variant(variant_id).map(|(product, variant)| {
            let info = VariantInfo::new(&variant.name, &variant.sku, variant.price_with_tax);
            match variant
                .featured_asset
                .as_ref()
                .or(product.featured_asset.as_ref())
            {
                Some(asset) => info.with_asset(asset.clone()),
                None => info,
            }
        })
    }

    /// Stock level of one variant of one product.
    ///
    /// `None` when either id is unknown or the variant belongs to another product.
    pub fn variant_stock(&self, product_id: &str, variant_id: &str) -> Option<StockLevel> {
        self.get_by_id(product_id)?
            .variant(variant_id)
            .map(|v| v.stock_level)
    }

    /// Number of products in the catalog.
    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
