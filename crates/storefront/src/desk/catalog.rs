use crate::model::ProductId;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: f64,
}

impl Product {
    pub fn new(id: u64, name: impl Into<String>, price: f64) -> Self {
        Self {
            id: ProductId(id),
            name: name.into(),
            price,
        }
    }
}

/// Products the desk can sell, priced at order time.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    products: HashMap<ProductId, Product>,
}

impl Catalog {
    pub fn new(products: impl IntoIterator<Item = Product>) -> Self {
        Self {
            products: products.into_iter().map(|p| (p.id, p)).collect(),
        }
    }

    /// A small GPU catalog for the demo binary.
    pub fn demo() -> Self {
        Self::new([
            Product::new(1, "RTX 4090", 1599.0),
            Product::new(2, "RTX 4080 Super", 999.0),
            Product::new(3, "Radeon RX 7900 XTX", 949.0),
            Product::new(4, "Arc A770", 329.0),
        ])
    }

    pub fn get(&self, id: &ProductId) -> Option<&Product> {
        self.products.get(id)
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}
