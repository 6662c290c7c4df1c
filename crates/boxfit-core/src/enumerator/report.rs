use super::*;

impl GroupEnumerator<'_> {
    /// Collects single-product compatibility and the fitting groups for one box.
    pub fn report(&self, shipping_box: &ShippingBox, max_items: u32) -> BoxReport {
        box_report(
            self.catalog,
            shipping_box,
            self.enumerate(shipping_box, max_items),
        )
    }

    /// Builds a report for every box in catalog order.
    pub fn report_all(&self, max_items: u32) -> Vec<BoxReport> {
        self.catalog
            .boxes()
            .iter()
            .map(|shipping_box| self.report(shipping_box, max_items))
            .collect()
    }
}

pub(crate) fn box_report(
    catalog: &Catalog,
    shipping_box: &ShippingBox,
    groups: Vec<ProductGroup>,
) -> BoxReport {
    let compatible_products = catalog
        .compatible_products(shipping_box)
        .iter()
        .map(|p| p.id)
        .collect();

    BoxReport {
        box_id: shipping_box.id.clone(),
        box_name: shipping_box.name.clone(),
        dims: shipping_box.dims,
        max_weight: shipping_box.max_weight,
        compatible_products,
        groups,
    }
}
