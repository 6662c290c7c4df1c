use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Weight ratio above which a group is reported as close to the box capacity.
pub const NEAR_CAPACITY_RATIO: f64 = 0.9;

/// Product that can be shipped
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: u32,
    pub name: String,
    /// Dimensions in cm, kept in ascending order (min, mid, max)
    pub dims: [f64; 3],
    /// Weight in grams
    pub weight: u32,
    #[serde(default)]
    pub glyph: String,
}

impl Product {
    pub fn new(id: u32, name: &str, dims: [f64; 3], weight: u32, glyph: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
            dims: sorted_dims(dims),
            weight,
            glyph: glyph.to_string(),
        }
    }
}

/// Shipping box available to the shipper
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShippingBox {
    pub id: String,
    pub name: String,
    /// Inner dimensions in cm, kept in ascending order (min, mid, max)
    pub dims: [f64; 3],
    /// Maximum payload in kilograms
    pub max_weight: f64,
    /// Alternative names the box is known by. Informational only.
    #[serde(default)]
    pub aliases: Vec<String>,
}

impl ShippingBox {
    pub fn new(id: &str, name: &str, dims: [f64; 3], max_weight: f64, aliases: &[&str]) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            dims: sorted_dims(dims),
            max_weight,
            aliases: aliases.iter().map(|a| a.to_string()).collect(),
        }
    }
}

/// One product line inside a group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupItem {
    pub product: Product,
    pub quantity: u32,
}

impl GroupItem {
    pub fn new(product: &Product, quantity: u32) -> Self {
        Self {
            product: product.clone(),
            quantity,
        }
    }
}

/// Combination of products that can travel together in one box
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductGroup {
    pub items: Vec<GroupItem>,
    /// Estimated stack dimensions (height, width, length) in cm
    pub stack_dims: [f64; 3],
    /// Estimated volume in cm³
    pub total_volume: f64,
    /// Total weight in grams
    pub total_weight: u64,
}

impl ProductGroup {
    /// Number of units across all product lines.
    pub fn total_items(&self) -> u32 {
        self.items.iter().map(|item| item.quantity).sum()
    }

    pub fn weight_kg(&self) -> f64 {
        self.total_weight as f64 / 1000.0
    }

    /// True when the group uses more than 90% of the box weight capacity.
    pub fn near_capacity(&self, shipping_box: &ShippingBox) -> bool {
        self.weight_kg() > shipping_box.max_weight * NEAR_CAPACITY_RATIO
    }
}

/// Every group that fits a single box
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoxReport {
    pub box_id: String,
    pub box_name: String,
    pub dims: [f64; 3],
    pub max_weight: f64,
    /// Ids of the products that fit on their own
    pub compatible_products: Vec<u32>,
    pub groups: Vec<ProductGroup>,
}

/// Error type for catalog handling
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Unknown product: {0}")]
    UnknownProduct(u32),

    #[error("Unknown box: {0}")]
    UnknownBox(String),

    #[error("Failed to read catalog: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse catalog JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to parse catalog YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, CatalogError>;

/// Returns the triple in ascending order.
pub fn sorted_dims(dims: [f64; 3]) -> [f64; 3] {
    let mut sorted = dims;
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    sorted
}
