//! Bounding-box fit checks for single products and stacked groups.
//!
//! The stacking estimate lays every unit on its smallest face and piles them
//! up: heights add, footprints share the largest width and length seen. It is
//! not a 3D packing solver and can be wrong both ways for real arrangements.

use crate::types::{sorted_dims, GroupItem, ShippingBox};

/// Checks whether an item fits inside a box when it may be freely rotated.
///
/// Both triples are sorted before the component-wise comparison, so the
/// argument order of the dimensions never matters. Equal sizes fit.
pub fn fits(item_dims: [f64; 3], box_dims: [f64; 3]) -> bool {
    let item = sorted_dims(item_dims);
    let container = sorted_dims(box_dims);

    item[0] <= container[0] && item[1] <= container[1] && item[2] <= container[2]
}

/// Estimates the outer dimensions `[height, width, length]` of a stacked group.
pub fn estimate_stack(items: &[GroupItem]) -> [f64; 3] {
    let mut total_height = 0.0;
    let mut max_width: f64 = 0.0;
    let mut max_length: f64 = 0.0;

    for item in items {
        let dims = sorted_dims(item.product.dims);
        total_height += dims[0] * item.quantity as f64;
        max_width = max_width.max(dims[1]);
        max_length = max_length.max(dims[2]);
    }

    [total_height, max_width, max_length]
}

/// Total weight of the group in grams.
pub fn total_weight(items: &[GroupItem]) -> u64 {
    items
        .iter()
        .map(|item| item.product.weight as u64 * item.quantity as u64)
        .sum()
}

/// Checks both the stacked dimensions and the weight capacity of the box.
pub fn group_fits(items: &[GroupItem], shipping_box: &ShippingBox) -> bool {
    let fits_dimensions = fits(estimate_stack(items), shipping_box.dims);

    // Capacity is in kg, product weights in grams
    let weight_kg = total_weight(items) as f64 / 1000.0;
    let fits_weight = weight_kg <= shipping_box.max_weight;

    fits_dimensions && fits_weight
}
