use crate::enumerator::{box_report, GroupEnumerator};
use crate::types::{BoxReport, ProductGroup, ShippingBox};
use std::collections::HashMap;
use tracing::debug;

/// Memoizes enumeration results per `(box id, max_items)`.
///
/// Owned by the caller. Valid only for the catalog it was filled from, whose
/// box ids must be unique (`Catalog::new` rejects duplicates). Looking up a
/// different box under an already cached id trips a debug assertion.
#[derive(Debug, Default)]
pub struct GroupCache {
    entries: HashMap<(String, u32), CachedGroups>,
}

#[derive(Debug)]
struct CachedGroups {
    box_dims: [f64; 3],
    groups: Vec<ProductGroup>,
}

impl GroupCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_compute(
        &mut self,
        enumerator: &GroupEnumerator<'_>,
        shipping_box: &ShippingBox,
        max_items: u32,
    ) -> &[ProductGroup] {
        let key = (shipping_box.id.clone(), max_items);
        if self.entries.contains_key(&key) {
            debug!("Group cache hit for {} (max_items={})", shipping_box.id, max_items);
        }

        let cached = self.entries.entry(key).or_insert_with(|| CachedGroups {
            box_dims: shipping_box.dims,
            groups: enumerator.enumerate(shipping_box, max_items),
        });
        debug_assert_eq!(
            cached.box_dims, shipping_box.dims,
            "box id {} reused for a different box",
            shipping_box.id
        );

        &cached.groups
    }

    /// Same as [`GroupEnumerator::report`], served from the cache.
    pub fn report(
        &mut self,
        enumerator: &GroupEnumerator<'_>,
        shipping_box: &ShippingBox,
        max_items: u32,
    ) -> BoxReport {
        let groups = self
            .get_or_compute(enumerator, shipping_box, max_items)
            .to_vec();
        box_report(enumerator.catalog(), shipping_box, groups)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
