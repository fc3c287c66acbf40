//! # Demo Seed Data
//!
//! The demo shop: six products across three collection trees, two customer
//! accounts, three shipping methods, four payment methods and ten countries.
//!
//! ## Demo Accounts
//! | Email              | Password      |
//! |--------------------|---------------|
//! | `demo@example.com` | `password123` |
//! | `jane@example.com` | `password456` |
//!
//! ## Images
//! Every asset points at `https://picsum.photos/seed/<name>/<w>/<h>`.

use shopfront_core::{
    Address, AddressCountry, Asset, Collection, CollectionParent, Country, CurrentUser, Customer,
    Money, OptionGroup, PaymentMethodInfo, Product, ProductCollection, ProductOption,
    ProductVariant, ShippingMethod, StockLevel, DEFAULT_CURRENCY_CODE,
};

use crate::error::StoreResult;
use crate::repository::catalog::Catalog;
use crate::repository::customer::CustomerRepository;
use crate::repository::settings::ShopSettings;

// =============================================================================
// Helpers
// =============================================================================

fn picsum(id: &str, seed: &str, size: &str) -> Asset {
    Asset::new(id, format!("https://picsum.photos/seed/{seed}/{size}"))
}

fn collection(
    id: &str,
    name: &str,
    slug: &str,
    description: &str,
    parent_id: Option<&str>,
    image_seed: &str,
) -> Collection {
    Collection {
        id: id.to_string(),
        name: name.to_string(),
        slug: slug.to_string(),
        description: description.to_string(),
        parent_id: parent_id.map(str::to_string),
        featured_asset: Some(picsum(&format!("asset-{id}"), image_seed, "400/300")),
        children: Vec::new(),
    }
}

/// Membership entries for a product in `child` (and therefore in its parent).
fn memberships(parent: (&str, &str, &str), child: (&str, &str, &str)) -> Vec<ProductCollection> {
    let (parent_id, parent_name, parent_slug) = parent;
    let (child_id, child_name, child_slug) = child;

    vec![
        ProductCollection {
            id: parent_id.to_string(),
            name: parent_name.to_string(),
            slug: parent_slug.to_string(),
            parent: None,
        },
        ProductCollection {
            id: child_id.to_string(),
            name: child_name.to_string(),
            slug: child_slug.to_string(),
            parent: Some(CollectionParent {
                id: parent_id.to_string(),
                name: parent_name.to_string(),
                slug: parent_slug.to_string(),
            }),
        },
    ]
}

/// (option id, option name, group id, group name)
type OptionSpec<'a> = (&'a str, &'a str, &'a str, &'a str);

fn variant(
    id: &str,
    name: &str,
    sku: &str,
    stock_level: StockLevel,
    price: i64,
    options: &[OptionSpec<'_>],
    image_seed: Option<&str>,
) -> ProductVariant {
    ProductVariant {
        id: id.to_string(),
        name: name.to_string(),
        sku: sku.to_string(),
        stock_level,
        currency_code: DEFAULT_CURRENCY_CODE.to_string(),
        price: Money::from_minor(price),
        price_with_tax: Money::from_minor(price),
        options: options
            .iter()
            .map(|&(id, name, group_id, group_name)| ProductOption {
                id: id.to_string(),
                name: name.to_string(),
                group: OptionGroup {
                    id: group_id.to_string(),
                    name: group_name.to_string(),
                },
            })
            .collect(),
        featured_asset: image_seed.map(|seed| picsum(&format!("asset-{id}"), seed, "600/600")),
        assets: Vec::new(),
    }
}

#[allow(clippy::too_many_arguments)]
fn product(
    id: &str,
    name: &str,
    slug: &str,
    description: &str,
    image_seed: &str,
    extra_images: usize,
    variants: Vec<ProductVariant>,
    collections: Vec<ProductCollection>,
) -> Product {
    Product {
        id: id.to_string(),
        name: name.to_string(),
        slug: slug.to_string(),
        description: description.to_string(),
        featured_asset: Some(picsum(&format!("asset-{id}"), image_seed, "600/600")),
        assets: (1..=extra_images)
            .map(|n| picsum(&format!("asset-{id}-{n}"), &format!("{image_seed}-{n}"), "600/600"))
            .collect(),
        variants,
        collections,
    }
}

// =============================================================================
// Catalog
// =============================================================================

const ELECTRONICS: (&str, &str, &str) = ("1", "Electronics", "electronics");
const CLOTHING: (&str, &str, &str) = ("2", "Clothing", "clothing");
const HOME_GARDEN: (&str, &str, &str) = ("3", "Home & Garden", "home-garden");

const STORAGE: (&str, &str) = ("grp-1", "Storage");
const COLOR: (&str, &str) = ("grp-2", "Color");
const CHIP: (&str, &str) = ("grp-3", "Chip");
const SIZE: (&str, &str) = ("grp-4", "Size");

/// The demo collection tree.
pub fn demo_collections() -> Vec<Collection> {
    let mut electronics = collection(
        "1",
        "Electronics",
        "electronics",
        "Latest electronic gadgets and devices",
        None,
        "electronics",
    );
    electronics.children = vec![
        collection("1-1", "Smartphones", "smartphones", "Latest smartphones from top brands", Some("1"), "smartphones"),
        collection("1-2", "Laptops", "laptops", "Powerful laptops for work and play", Some("1"), "laptops"),
        collection("1-3", "Audio", "audio", "Headphones, speakers and audio equipment", Some("1"), "audio"),
    ];

    let mut clothing = collection(
        "2",
        "Clothing",
        "clothing",
        "Fashion and apparel for everyone",
        None,
        "clothing",
    );
    clothing.children = vec![
        collection("2-1", "Men's Clothing", "mens-clothing", "Stylish clothing for men", Some("2"), "mens"),
        collection("2-2", "Women's Clothing", "womens-clothing", "Fashionable clothing for women", Some("2"), "womens"),
    ];

    let mut home = collection(
        "3",
        "Home & Garden",
        "home-garden",
        "Everything for your home and garden",
        None,
        "home",
    );
    home.children = vec![
        collection("3-1", "Furniture", "furniture", "Modern and classic furniture", Some("3"), "furniture"),
        collection("3-2", "Kitchen", "kitchen", "Kitchen appliances and accessories", Some("3"), "kitchen"),
    ];

    vec![electronics, clothing, home]
}

/// The demo products, in catalog declaration order.
pub fn demo_products() -> Vec<Product> {
    use StockLevel::{InStock, LowStock, OutOfStock};

    let (storage, color, chip, size) = (STORAGE, COLOR, CHIP, SIZE);

    vec![
        product(
            "prod-1",
            "iPhone 15 Pro",
            "iphone-15-pro",
            "The latest iPhone with A17 Pro chip, titanium design, and advanced camera system. \
             Features a 6.1-inch Super Retina XDR display with ProMotion technology.",
            "iphone15",
            3,
            vec![
                variant(
                    "var-1-1",
                    "iPhone 15 Pro 128GB Natural Titanium",
                    "IP15P-128-NT",
                    InStock,
                    99900,
                    &[("opt-1", "128GB", storage.0, storage.1), ("opt-2", "Natural Titanium", color.0, color.1)],
                    Some("iphone15-nt"),
                ),
                variant(
                    "var-1-2",
                    "iPhone 15 Pro 256GB Blue Titanium",
                    "IP15P-256-BT",
                    InStock,
                    109900,
                    &[("opt-3", "256GB", storage.0, storage.1), ("opt-4", "Blue Titanium", color.0, color.1)],
                    Some("iphone15-bt"),
                ),
                variant(
                    "var-1-3",
                    "iPhone 15 Pro 512GB Black Titanium",
                    "IP15P-512-BK",
                    LowStock,
                    129900,
                    &[("opt-5", "512GB", storage.0, storage.1), ("opt-6", "Black Titanium", color.0, color.1)],
                    Some("iphone15-bk"),
                ),
            ],
            memberships(ELECTRONICS, ("1-1", "Smartphones", "smartphones")),
        ),
        product(
            "prod-2",
            "MacBook Pro 14\"",
            "macbook-pro-14",
            "Supercharged by M3 Pro or M3 Max chip. Up to 22 hours of battery life. \
             Stunning Liquid Retina XDR display.",
            "macbook14",
            2,
            vec![
                variant(
                    "var-2-1",
                    "MacBook Pro 14\" M3 Pro 512GB Space Black",
                    "MBP14-M3P-512-SB",
                    InStock,
                    199900,
                    &[
                        ("opt-7", "M3 Pro", chip.0, chip.1),
                        ("opt-8", "512GB", storage.0, storage.1),
                        ("opt-9", "Space Black", color.0, color.1),
                    ],
                    Some("macbook14-sb"),
                ),
                variant(
                    "var-2-2",
                    "MacBook Pro 14\" M3 Max 1TB Silver",
                    "MBP14-M3M-1TB-SV",
                    InStock,
                    299900,
                    &[
                        ("opt-10", "M3 Max", chip.0, chip.1),
                        ("opt-11", "1TB", storage.0, storage.1),
                        ("opt-12", "Silver", color.0, color.1),
                    ],
                    Some("macbook14-sv"),
                ),
            ],
            memberships(ELECTRONICS, ("1-2", "Laptops", "laptops")),
        ),
        product(
            "prod-3",
            "AirPods Pro 2",
            "airpods-pro-2",
            "Active Noise Cancellation, Adaptive Audio, and Conversation Awareness. \
             Up to 2x more Active Noise Cancellation than the previous generation.",
            "airpodspro",
            1,
            vec![variant(
                "var-3-1",
                "AirPods Pro 2 with USB-C",
                "APP2-USBC",
                InStock,
                24900,
                &[],
                Some("airpodspro"),
            )],
            memberships(ELECTRONICS, ("1-3", "Audio", "audio")),
        ),
        product(
            "prod-4",
            "Sony WH-1000XM5",
            "sony-wh-1000xm5",
            "Industry-leading noise cancellation with 8 microphones and Auto NC Optimizer. \
             Crystal clear hands-free calling with 4 beamforming microphones.",
            "sonywh1000",
            2,
            vec![
                variant(
                    "var-4-1",
                    "Sony WH-1000XM5 Black",
                    "SONY-WH5-BK",
                    InStock,
                    39900,
                    &[("opt-13", "Black", color.0, color.1)],
                    Some("sonywh1000-bk"),
                ),
                variant(
                    "var-4-2",
                    "Sony WH-1000XM5 Silver",
                    "SONY-WH5-SV",
                    InStock,
                    39900,
                    &[("opt-14", "Silver", color.0, color.1)],
                    Some("sonywh1000-sv"),
                ),
            ],
            memberships(ELECTRONICS, ("1-3", "Audio", "audio")),
        ),
        product(
            "prod-5",
            "Classic Cotton T-Shirt",
            "classic-cotton-tshirt",
            "Premium 100% organic cotton t-shirt. Soft, breathable, and perfect for everyday wear. \
             Pre-shrunk for a consistent fit.",
            "tshirt",
            1,
            vec![
                variant(
                    "var-5-1",
                    "Classic Cotton T-Shirt S White",
                    "TSHIRT-S-WH",
                    InStock,
                    2900,
                    &[("opt-15", "S", size.0, size.1), ("opt-16", "White", color.0, color.1)],
                    None,
                ),
                variant(
                    "var-5-2",
                    "Classic Cotton T-Shirt M Black",
                    "TSHIRT-M-BK",
                    InStock,
                    2900,
                    &[("opt-17", "M", size.0, size.1), ("opt-18", "Black", color.0, color.1)],
                    None,
                ),
                variant(
                    "var-5-3",
                    "Classic Cotton T-Shirt L Navy",
                    "TSHIRT-L-NV",
                    OutOfStock,
                    2900,
                    &[("opt-19", "L", size.0, size.1), ("opt-20", "Navy", color.0, color.1)],
                    None,
                ),
            ],
            memberships(CLOTHING, ("2-1", "Men's Clothing", "mens-clothing")),
        ),
        product(
            "prod-6",
            "Modern Desk Lamp",
            "modern-desk-lamp",
            "Elegant LED desk lamp with adjustable brightness and color temperature. \
             Touch control and USB charging port included.",
            "desklamp",
            0,
            vec![
                variant(
                    "var-6-1",
                    "Modern Desk Lamp White",
                    "LAMP-DESK-WH",
                    InStock,
                    4900,
                    &[("opt-21", "White", color.0, color.1)],
                    None,
                ),
                variant(
                    "var-6-2",
                    "Modern Desk Lamp Black",
                    "LAMP-DESK-BK",
                    InStock,
                    4900,
                    &[("opt-22", "Black", color.0, color.1)],
                    None,
                ),
            ],
            memberships(HOME_GARDEN, ("3-1", "Furniture", "furniture")),
        ),
    ]
}

/// The demo catalog.
pub fn demo_catalog() -> Catalog {
    Catalog::new(demo_products(), demo_collections())
}

// =============================================================================
// Settings
// =============================================================================

/// The demo shipping methods, payment methods and countries.
pub fn demo_settings() -> ShopSettings {
    let shipping_methods = [
        ("ship-1", "Standard Shipping", 999, "Delivery in 5-7 business days"),
        ("ship-2", "Express Shipping", 1999, "Delivery in 2-3 business days"),
        ("ship-3", "Overnight Shipping", 2999, "Next business day delivery"),
    ]
    .into_iter()
    .map(|(id, name, price, description)| ShippingMethod {
        id: id.to_string(),
        name: name.to_string(),
        price: Money::from_minor(price),
        description: description.to_string(),
    })
    .collect();

    let payment_methods = [
        ("pay-1", "Credit Card", "credit-card", true),
        ("pay-2", "PayPal", "paypal", true),
        ("pay-3", "Stripe", "stripe", true),
        ("pay-4", "Bank Transfer", "bank-transfer", false),
    ]
    .into_iter()
    .map(|(id, name, code, is_eligible)| PaymentMethodInfo {
        id: id.to_string(),
        name: name.to_string(),
        code: code.to_string(),
        is_eligible,
    })
    .collect();

    let countries = [
        ("US", "United States"),
        ("CA", "Canada"),
        ("GB", "United Kingdom"),
        ("DE", "Germany"),
        ("FR", "France"),
        ("AU", "Australia"),
        ("JP", "Japan"),
        ("CN", "China"),
        ("BR", "Brazil"),
        ("MX", "Mexico"),
    ]
    .into_iter()
    .enumerate()
    .map(|(i, (code, name))| Country {
        id: format!("country-{}", i + 1),
        code: code.to_string(),
        name: name.to_string(),
    })
    .collect();

    ShopSettings::new(shipping_methods, payment_methods, countries)
}

// =============================================================================
// Customers
// =============================================================================

fn united_states() -> AddressCountry {
    AddressCountry {
        code: "US".to_string(),
        name: "United States".to_string(),
    }
}

/// The demo customers and their plaintext passwords.
pub fn demo_customers() -> Vec<(Customer, &'static str)> {
    vec![
        (
            Customer {
                id: "cust-1".to_string(),
                title: Some("Mr".to_string()),
                first_name: "John".to_string(),
                last_name: "Doe".to_string(),
                email_address: "demo@example.com".to_string(),
                phone_number: Some("+1-555-123-4567".to_string()),
                addresses: vec![Address {
                    id: "addr-1".to_string(),
                    full_name: "John Doe".to_string(),
                    street_line1: "123 Main Street".to_string(),
                    street_line2: Some("Apt 4B".to_string()),
                    city: "New York".to_string(),
                    postal_code: "10001".to_string(),
                    country: united_states(),
                    phone_number: Some("+1-555-123-4567".to_string()),
                }],
                user: CurrentUser {
                    id: "user-1".to_string(),
                    identifier: "demo@example.com".to_string(),
                },
            },
            "password123",
        ),
        (
            Customer {
                id: "cust-2".to_string(),
                title: Some("Ms".to_string()),
                first_name: "Jane".to_string(),
                last_name: "Smith".to_string(),
                email_address: "jane@example.com".to_string(),
                phone_number: Some("+1-555-987-6543".to_string()),
                addresses: vec![Address {
                    id: "addr-2".to_string(),
                    full_name: "Jane Smith".to_string(),
                    street_line1: "456 Oak Avenue".to_string(),
                    street_line2: None,
                    city: "Los Angeles".to_string(),
                    postal_code: "90001".to_string(),
                    country: united_states(),
                    phone_number: None,
                }],
                user: CurrentUser {
                    id: "user-2".to_string(),
                    identifier: "jane@example.com".to_string(),
                },
            },
            "password456",
        ),
    ]
}

/// Loads the demo customers into a repository, hashing their passwords.
pub fn seed_customers(repo: &mut CustomerRepository) -> StoreResult<()> {
    for (customer, password) in demo_customers() {
        repo.insert(customer, password)?;
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
