//! In-memory product catalog.
//!
//! Loaded once at startup from a JSON file and read-only afterwards. The
//! cart engine never fetches data itself; handlers resolve against this
//! catalog and hand fully-resolved additions to the store.

use std::collections::HashMap;
use std::path::Path;

use thiserror::Error;

use suplefit_core::{Product, ProductId};

/// Errors loading the catalog file.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Reading the file failed.
    #[error("failed to read catalog file: {0}")]
    Io(#[from] std::io::Error),
    /// The file is not valid catalog JSON.
    #[error("failed to parse catalog file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Read-only product catalog, indexed by product id.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    products: Vec<Product>,
    by_id: HashMap<ProductId, usize>,
}

impl Catalog {
    /// Build a catalog from in-memory records.
    ///
    /// On duplicate ids the first record wins; later duplicates are dropped
    /// with a warning.
    #[must_use]
    pub fn from_products(products: Vec<Product>) -> Self {
        let mut deduped = Vec::with_capacity(products.len());
        let mut by_id = HashMap::with_capacity(products.len());
        for product in products {
            if by_id.contains_key(&product.id) {
                tracing::warn!(product_id = %product.id, "duplicate product id in catalog, dropping");
                continue;
            }
            by_id.insert(product.id.clone(), deduped.len());
            deduped.push(product);
        }
        Self {
            products: deduped,
            by_id,
        }
    }

    /// Load a catalog from a JSON file holding an array of products.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let raw = std::fs::read_to_string(path)?;
        let products: Vec<Product> = serde_json::from_str(&raw)?;
        Ok(Self::from_products(products))
    }

    /// Look up a product by id.
    #[must_use]
    pub fn get(&self, id: &ProductId) -> Option<&Product> {
        self.by_id.get(id).and_then(|&index| self.products.get(index))
    }

    /// All products, in catalog order.
    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Number of products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Whether the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}
