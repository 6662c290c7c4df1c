use crate::catalog::Catalog;
use crate::fit::{estimate_stack, group_fits, total_weight};
use crate::types::*;
use tracing::debug;

mod dedup;
mod report;

pub use dedup::group_key;
pub(crate) use report::box_report;

/// Default upper bound on units in a homogeneous group.
pub const DEFAULT_MAX_ITEMS: u32 = 3;

/// Enumerates multi-product groups that fit a box using a fixed set of
/// combination shapes.
///
/// Shapes, in emission order:
/// 1. `n` copies of one product, `n` in `2..=max_items`
/// 2. two distinct products, one each
/// 3. three distinct products, one each
/// 4. two of one product plus one of another, both orderings
///
/// Only the first shape depends on `max_items`. The mixed shapes never grow
/// past three units.
pub struct GroupEnumerator<'a> {
    catalog: &'a Catalog,
}

impl<'a> GroupEnumerator<'a> {
    pub fn new(catalog: &'a Catalog) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &'a Catalog {
        self.catalog
    }

    /// Returns every distinct group that fits the box, in emission order.
    pub fn enumerate(&self, shipping_box: &ShippingBox, max_items: u32) -> Vec<ProductGroup> {
        let compatible = self.catalog.compatible_products(shipping_box);

        let mut groups = Vec::new();
        self.homogeneous_groups(&compatible, shipping_box, max_items, &mut groups);
        self.pair_groups(&compatible, shipping_box, &mut groups);
        self.triple_groups(&compatible, shipping_box, &mut groups);
        self.two_plus_one_groups(&compatible, shipping_box, &mut groups);

        let candidates = groups.len();
        let unique = dedup::dedup_groups(groups);

        debug!(
            "Box {}: {} compatible products, {} groups ({} before dedup, max_items={})",
            shipping_box.id,
            compatible.len(),
            unique.len(),
            candidates,
            max_items
        );

        unique
    }

    fn homogeneous_groups(
        &self,
        compatible: &[&Product],
        shipping_box: &ShippingBox,
        max_items: u32,
        groups: &mut Vec<ProductGroup>,
    ) {
        for product in compatible {
            for quantity in 2..=max_items {
                push_if_fits(vec![GroupItem::new(product, quantity)], shipping_box, groups);
            }
        }
    }

    fn pair_groups(
        &self,
        compatible: &[&Product],
        shipping_box: &ShippingBox,
        groups: &mut Vec<ProductGroup>,
    ) {
        for i in 0..compatible.len() {
            for j in (i + 1)..compatible.len() {
                let items = vec![
                    GroupItem::new(compatible[i], 1),
                    GroupItem::new(compatible[j], 1),
                ];
                push_if_fits(items, shipping_box, groups);
            }
        }
    }

    fn triple_groups(
        &self,
        compatible: &[&Product],
        shipping_box: &ShippingBox,
        groups: &mut Vec<ProductGroup>,
    ) {
        for i in 0..compatible.len() {
            for j in (i + 1)..compatible.len() {
                for k in (j + 1)..compatible.len() {
                    let items = vec![
                        GroupItem::new(compatible[i], 1),
                        GroupItem::new(compatible[j], 1),
                        GroupItem::new(compatible[k], 1),
                    ];
                    push_if_fits(items, shipping_box, groups);
                }
            }
        }
    }

    /// A 2:1 ratio is order sensitive, so every ordered pair is tried.
    fn two_plus_one_groups(
        &self,
        compatible: &[&Product],
        shipping_box: &ShippingBox,
        groups: &mut Vec<ProductGroup>,
    ) {
        for i in 0..compatible.len() {
            for j in 0..compatible.len() {
                if i == j {
                    continue;
                }
                let items = vec![
                    GroupItem::new(compatible[i], 2),
                    GroupItem::new(compatible[j], 1),
                ];
                push_if_fits(items, shipping_box, groups);
            }
        }
    }
}

/// Builds the group record, computing its stack estimate and totals.
pub fn build_group(items: Vec<GroupItem>) -> ProductGroup {
    let stack_dims = estimate_stack(&items);
    let total_weight = total_weight(&items);

    ProductGroup {
        items,
        stack_dims,
        total_volume: stack_dims[0] * stack_dims[1] * stack_dims[2],
        total_weight,
    }
}

fn push_if_fits(
    items: Vec<GroupItem>,
    shipping_box: &ShippingBox,
    groups: &mut Vec<ProductGroup>,
) {
    if group_fits(&items, shipping_box) {
        groups.push(build_group(items));
    }
}
