use crate::fit::fits;
use crate::types::*;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// Immutable set of products and boxes every lookup runs against.
#[derive(Debug, Clone, Serialize)]
pub struct Catalog {
    products: Vec<Product>,
    boxes: Vec<ShippingBox>,
}

/// Raw catalog shape as it appears in YAML or JSON files
#[derive(Debug, Deserialize)]
struct CatalogFile {
    products: Vec<Product>,
    boxes: Vec<ShippingBox>,
}

impl Catalog {
    /// Validates entries and normalizes every dimension triple to ascending order.
    pub fn new(mut products: Vec<Product>, mut boxes: Vec<ShippingBox>) -> Result<Self> {
        if products.is_empty() {
            return Err(CatalogError::InvalidInput(
                "At least one product must be provided".to_string(),
            ));
        }

        if boxes.is_empty() {
            return Err(CatalogError::InvalidInput(
                "At least one box must be provided".to_string(),
            ));
        }

        let mut product_ids = HashSet::new();
        for product in &mut products {
            if !product_ids.insert(product.id) {
                return Err(CatalogError::InvalidInput(format!(
                    "Duplicate product id {}",
                    product.id
                )));
            }

            if !valid_dims(&product.dims) {
                return Err(CatalogError::InvalidInput(format!(
                    "Product '{}' has invalid dimensions",
                    product.name
                )));
            }

            product.dims = sorted_dims(product.dims);
        }

        let mut box_ids = HashSet::new();
        for shipping_box in &mut boxes {
            if !box_ids.insert(shipping_box.id.clone()) {
                return Err(CatalogError::InvalidInput(format!(
                    "Duplicate box id '{}'",
                    shipping_box.id
                )));
            }

            if !valid_dims(&shipping_box.dims) {
                return Err(CatalogError::InvalidInput(format!(
                    "Box '{}' has invalid dimensions",
                    shipping_box.id
                )));
            }

            if !shipping_box.max_weight.is_finite() || shipping_box.max_weight < 0.0 {
                return Err(CatalogError::InvalidInput(format!(
                    "Box '{}' has invalid maximum weight",
                    shipping_box.id
                )));
            }

            shipping_box.dims = sorted_dims(shipping_box.dims);
        }

        Ok(Self { products, boxes })
    }

    /// Loads a catalog file. `.yaml`/`.yml` files are read as YAML, anything else as JSON.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;

        let file: CatalogFile = match path.extension().and_then(|s| s.to_str()) {
            Some("yaml") | Some("yml") => serde_yaml::from_str(&content)?,
            _ => serde_json::from_str(&content)?,
        };

        Self::new(file.products, file.boxes)
    }

    /// Reference catalog of the "Envíos Perro" box system.
    pub fn builtin() -> Self {
        let products = vec![
            Product::new(1, "Ropita Renne", [0.5, 16.5, 16.5], 40, "👕"),
            Product::new(2, "Playera", [0.5, 20.5, 25.0], 80, "👚"),
            Product::new(3, "Moño", [1.5, 14.5, 22.5], 40, "🎀"),
            Product::new(4, "Libreta", [3.0, 15.5, 22.0], 540, "📓"),
            Product::new(5, "Sudadera", [3.5, 20.0, 23.0], 240, "🧥"),
            Product::new(6, "Mochila", [3.5, 26.5, 34.5], 420, "🎒"),
            Product::new(7, "Vestido 2", [5.5, 22.0, 30.0], 480, "👗"),
            Product::new(8, "Vestido", [6.0, 25.0, 25.0], 520, "👗"),
            Product::new(9, "Cilindro", [8.2, 8.8, 28.5], 366, "🥤"),
            Product::new(10, "Tumbler", [11.0, 11.0, 18.5], 160, "🥤"),
            Product::new(11, "Peluche Lara", [12.0, 14.3, 42.5], 580, "🧸"),
            Product::new(12, "Peluche Galleta", [16.5, 18.5, 21.5], 320, "🍪"),
            Product::new(13, "Peluche Rana", [20.4, 20.4, 25.0], 580, "🐸"),
        ];

        let boxes = vec![
            ShippingBox::new(
                "SOBRES",
                "Sobre Documentos / Ropa",
                [2.0, 21.0, 27.0],
                1.0,
                &[
                    "Libretas",
                    "Sobre Sudadera",
                    "Playera",
                    "Bolsa Mochila Rhenne",
                    "Sobre Pastillas",
                ],
            ),
            ShippingBox::new("VASO", "Vaso con Popote", [15.0, 17.0, 21.0], 2.0, &[]),
            ShippingBox::new(
                "RANA_GALLETA",
                "Caja Rana / Galleta",
                [23.0, 26.0, 30.0],
                4.0,
                &["Caja Mochila", "Caja Rana", "Caja Galleta"],
            ),
            ShippingBox::new(
                "RANA_MOCHILA",
                "Caja Rana y Mochila",
                [25.0, 25.0, 37.0],
                5.0,
                &[],
            ),
            ShippingBox::new(
                "LARA_CILINDRO",
                "Caja Lara / Cilindro",
                [14.0, 17.0, 45.0],
                3.0,
                &["Vestido Rosa Neon", "Caja Cilindro", "Caja Lara"],
            ),
            ShippingBox::new(
                "LARA_VARIOS",
                "Caja Lara y Varios",
                [17.0, 22.0, 45.0],
                4.0,
                &[],
            ),
            ShippingBox::new("LARA_DOBLE", "Caja Lara Doble", [17.0, 27.0, 45.0], 5.0, &[]),
            ShippingBox::new("VESTIDO", "Caja Vestido", [11.0, 36.0, 46.0], 4.0, &[]),
            ShippingBox::new(
                "DOBLE",
                "Caja Doble / 8kg",
                [28.0, 29.0, 45.0],
                8.0,
                &["Caja Doble Galleta", "Caja Doble 8kg"],
            ),
            ShippingBox::new(
                "ESPECIAL",
                "Caja Especial",
                [45.0, 45.0, 66.0],
                27.0,
                &["Gigante"],
            ),
        ];

        Self { products, boxes }
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn boxes(&self) -> &[ShippingBox] {
        &self.boxes
    }

    pub fn product(&self, id: u32) -> Result<&Product> {
        self.products
            .iter()
            .find(|p| p.id == id)
            .ok_or(CatalogError::UnknownProduct(id))
    }

    pub fn shipping_box(&self, id: &str) -> Result<&ShippingBox> {
        self.boxes
            .iter()
            .find(|b| b.id == id)
            .ok_or_else(|| CatalogError::UnknownBox(id.to_string()))
    }

    /// Products that fit the box on their own, in catalog order.
    pub fn compatible_products(&self, shipping_box: &ShippingBox) -> Vec<&Product> {
        self.products
            .iter()
            .filter(|p| fits(p.dims, shipping_box.dims))
            .collect()
    }

    /// Boxes the product fits into, in catalog order.
    pub fn compatible_boxes(&self, product: &Product) -> Vec<&ShippingBox> {
        self.boxes
            .iter()
            .filter(|b| fits(product.dims, b.dims))
            .collect()
    }
}

fn valid_dims(dims: &[f64; 3]) -> bool {
    dims.iter().all(|d| d.is_finite() && *d >= 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn box_ids(boxes: &[&ShippingBox]) -> Vec<String> {
        boxes.iter().map(|b| b.id.clone()).collect()
    }

    #[test]
    fn test_builtin_catalog_shape() {
        let catalog = Catalog::builtin();

        assert_eq!(catalog.products().len(), 13);
        assert_eq!(catalog.boxes().len(), 10);
        assert_eq!(catalog.shipping_box("VASO").unwrap().max_weight, 2.0);
        assert_eq!(catalog.product(10).unwrap().name, "Tumbler");
    }

    #[test]
    fn test_builtin_dims_are_sorted() {
        let catalog = Catalog::builtin();

        for product in catalog.products() {
            assert_eq!(product.dims, sorted_dims(product.dims));
        }
        for shipping_box in catalog.boxes() {
            assert_eq!(shipping_box.dims, sorted_dims(shipping_box.dims));
        }
    }

    #[test]
    fn test_unknown_lookups() {
        let catalog = Catalog::builtin();

        assert!(matches!(
            catalog.product(99),
            Err(CatalogError::UnknownProduct(99))
        ));
        assert!(matches!(
            catalog.shipping_box("NOPE"),
            Err(CatalogError::UnknownBox(_))
        ));
    }

    #[test]
    fn test_compatible_boxes_for_tumbler() {
        let catalog = Catalog::builtin();
        let tumbler = catalog.product(10).unwrap();

        assert_eq!(
            box_ids(&catalog.compatible_boxes(tumbler)),
            vec![
                "VASO",
                "RANA_GALLETA",
                "RANA_MOCHILA",
                "LARA_CILINDRO",
                "LARA_VARIOS",
                "LARA_DOBLE",
                "VESTIDO",
                "DOBLE",
                "ESPECIAL"
            ]
        );
    }

    #[test]
    fn test_compatible_products_for_sobres() {
        let catalog = Catalog::builtin();
        let sobres = catalog.shipping_box("SOBRES").unwrap();
        let ids: Vec<u32> = catalog
            .compatible_products(sobres)
            .iter()
            .map(|p| p.id)
            .collect();

        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn test_new_sorts_dimensions() {
        let mut product = Product::new(1, "Flat", [1.0, 2.0, 3.0], 10, "");
        product.dims = [3.0, 1.0, 2.0];
        let mut shipping_box = ShippingBox::new("B", "Box", [1.0, 2.0, 3.0], 1.0, &[]);
        shipping_box.dims = [9.0, 4.0, 6.0];

        let catalog = Catalog::new(vec![product], vec![shipping_box]).unwrap();

        assert_eq!(catalog.products()[0].dims, [1.0, 2.0, 3.0]);
        assert_eq!(catalog.boxes()[0].dims, [4.0, 6.0, 9.0]);
    }

    #[test]
    fn test_new_rejects_invalid_entries() {
        let product = Product::new(1, "A", [1.0, 1.0, 1.0], 10, "");
        let shipping_box = ShippingBox::new("B", "Box", [5.0, 5.0, 5.0], 1.0, &[]);

        assert!(Catalog::new(vec![], vec![shipping_box.clone()]).is_err());
        assert!(Catalog::new(vec![product.clone()], vec![]).is_err());
        assert!(Catalog::new(
            vec![product.clone(), product.clone()],
            vec![shipping_box.clone()]
        )
        .is_err());
        assert!(Catalog::new(
            vec![product.clone()],
            vec![shipping_box.clone(), shipping_box.clone()]
        )
        .is_err());

        let negative = Product::new(2, "Negative", [-1.0, 1.0, 1.0], 10, "");
        assert!(Catalog::new(vec![negative], vec![shipping_box.clone()]).is_err());

        let mut unbounded = shipping_box;
        unbounded.max_weight = f64::NAN;
        assert!(matches!(
            Catalog::new(vec![product], vec![unbounded]),
            Err(CatalogError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_from_path_yaml() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(
            file,
            r#"
products:
  - id: 1
    name: Mug
    dims: [12, 9, 9]
    weight: 350
boxes:
  - id: SMALL
    name: Small box
    dims: [15, 15, 10]
    max_weight: 2
"#
        )
        .unwrap();

        let catalog = Catalog::from_path(file.path()).unwrap();
        assert_eq!(catalog.products()[0].dims, [9.0, 9.0, 12.0]);
        assert_eq!(catalog.products()[0].glyph, "");
        assert!(catalog.boxes()[0].aliases.is_empty());
    }

    #[test]
    fn test_from_path_json() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(
            file,
            r#"{{"products":[{{"id":7,"name":"Card","dims":[0.1,10,15],"weight":5,"glyph":"x"}}],
               "boxes":[{{"id":"ENV","name":"Envelope","dims":[1,12,18],"max_weight":0.5,"aliases":["Sobre"]}}]}}"#
        )
        .unwrap();

        let catalog = Catalog::from_path(file.path()).unwrap();
        let envelope = catalog.shipping_box("ENV").unwrap();
        assert_eq!(envelope.aliases, vec!["Sobre".to_string()]);
        assert_eq!(catalog.compatible_products(envelope).len(), 1);
    }

    #[test]
    fn test_from_path_reports_parse_errors() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, "not json").unwrap();

        assert!(matches!(
            Catalog::from_path(file.path()),
            Err(CatalogError::Json(_))
        ));
    }
}
