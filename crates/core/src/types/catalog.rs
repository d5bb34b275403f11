//! Read-only catalog records.
//!
//! These are the product records the cart engine consumes. They are owned by
//! whatever catalog backend the surrounding app uses; nothing in this
//! workspace mutates them.

use serde::{Deserialize, Serialize};

use crate::types::id::{ProductId, VariantId};
use crate::types::price::Price;

/// A purchasable product as published in the catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    /// Catalog identifier.
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Base price, used when no variant is selected.
    pub price: Price,
    /// Pre-discount price for strikethrough display.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_price: Option<Price>,
    /// Base image URL.
    pub image: String,
    /// Base stock count. `None` means unconstrained.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stock: Option<u32>,
    /// Coarse availability flag, consulted when no numeric stock is known.
    #[serde(default = "default_true")]
    pub in_stock: bool,
    /// Size label for the product's own price point (e.g., "500g").
    ///
    /// When present, the product itself is offered as a size option alongside
    /// its variants.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_size: Option<String>,
    /// Size variants in catalog order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub variants: Vec<Variant>,
    /// Available flavors. Selection is mandatory only when more than one
    /// flavor exists.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub flavors: Vec<String>,
}

impl Product {
    /// Whether adding this product to a cart requires an explicit flavor.
    #[must_use]
    pub fn requires_flavor(&self) -> bool {
        self.flavors.len() > 1
    }
}

/// A size variant of a product.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Variant {
    /// Variant identifier, unique within its product.
    pub id: VariantId,
    /// Size label (e.g., "1kg"). Blank labels mark unfinished drafts and are
    /// skipped when building size options.
    pub size: String,
    /// Variant price. `None` falls back to the product price.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<Price>,
    /// Pre-discount price for strikethrough display.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_price: Option<Price>,
    /// Variant image URL. `None` falls back to the product image.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Variant stock count. `None` means unconstrained.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stock: Option<u32>,
}

impl Variant {
    /// Whether this variant has a usable (non-blank) size label.
    #[must_use]
    pub fn has_size_label(&self) -> bool {
        !self.size.trim().is_empty()
    }
}

/// Sentinel id for the product's own price point in a size selection.
pub const BASE_SIZE_ID: &str = "base";

/// A size choice: either the product's own price point or one of its
/// variants.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum SizeSelection {
    /// The synthetic option carrying the product's own price/image/stock.
    Base,
    /// A concrete variant.
    Variant(VariantId),
}

impl SizeSelection {
    /// The identifier segment used in cart line keys.
    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            Self::Base => BASE_SIZE_ID,
            Self::Variant(id) => id.as_str(),
        }
    }
}

impl From<String> for SizeSelection {
    fn from(id: String) -> Self {
        if id == BASE_SIZE_ID {
            Self::Base
        } else {
            Self::Variant(VariantId::from(id))
        }
    }
}

impl From<&str> for SizeSelection {
    fn from(id: &str) -> Self {
        Self::from(id.to_owned())
    }
}

impl From<SizeSelection> for String {
    fn from(selection: SizeSelection) -> Self {
        selection.id().to_owned()
    }
}

impl core::fmt::Display for SizeSelection {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.id())
    }
}

const fn default_true() -> bool {
    true
}
