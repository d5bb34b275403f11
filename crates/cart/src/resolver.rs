//! Size/flavor/price resolution.
//!
//! Every product surface needs the same answer: given a product and the
//! shopper's current selection, what price, image, and stock apply? This
//! module is that single answer. It is pure: no side effects, no mutation of
//! the catalog record.

use serde::Serialize;

use suplefit_core::{Price, Product, SizeSelection};

use crate::quantity;

/// One entry in a product's size picker.
///
/// The product's own price point (when it has a base size label) comes
/// first, then variants in catalog order. Variants with blank size labels
/// are unfinished drafts and are skipped.
#[derive(Debug, Clone, Serialize)]
pub struct SizeOption {
    /// What to select to get this option.
    pub selection: SizeSelection,
    /// Display label (e.g., "500g", "1kg").
    pub label: String,
    /// Effective price for this option.
    pub price: Price,
    /// Pre-discount price, when the catalog records one.
    pub original_price: Option<Price>,
    /// Image for this option.
    pub image: String,
    /// Stock count. `None` means unconstrained.
    pub stock: Option<u32>,
}

/// Build the ordered size-option list for a product.
#[must_use]
pub fn size_options(product: &Product) -> Vec<SizeOption> {
    let mut options = Vec::with_capacity(product.variants.len() + 1);

    if let Some(base_size) = &product.base_size {
        options.push(SizeOption {
            selection: SizeSelection::Base,
            label: base_size.clone(),
            price: product.price,
            original_price: product.original_price,
            image: product.image.clone(),
            stock: product.stock,
        });
    }

    for variant in &product.variants {
        if !variant.has_size_label() {
            continue;
        }
        // A variant without its own price inherits the product's price, and
        // with it the product's pre-discount price.
        let (price, original_price) = match variant.price {
            Some(price) => (price, variant.original_price),
            None => (product.price, product.original_price),
        };
        options.push(SizeOption {
            selection: SizeSelection::Variant(variant.id.clone()),
            label: variant.size.clone(),
            price,
            original_price,
            image: variant.image.clone().unwrap_or_else(|| product.image.clone()),
            stock: variant.stock,
        });
    }

    options
}

/// A fully-resolved selection, ready to display or to snapshot into a cart
/// addition.
#[derive(Debug, Clone, Serialize)]
pub struct ResolvedSelection {
    /// The selection the values below were resolved from. `None` when the
    /// product offers no size options at all.
    pub selection: Option<SizeSelection>,
    /// Size label for display.
    pub size_label: Option<String>,
    /// Chosen flavor, when one was given.
    pub flavor: Option<String>,
    /// Unit price to charge.
    pub unit_price: Price,
    /// Pre-discount price, when the catalog records one.
    pub original_price: Option<Price>,
    /// Image to show.
    pub image: String,
    /// Stock ceiling. `None` means unconstrained.
    pub stock: Option<u32>,
    /// Availability after stock fallback: a numeric stock wins; without one
    /// the product-level flag decides.
    pub in_stock: bool,
}

impl ResolvedSelection {
    /// Whether at least one unit of this selection can be added to a cart.
    #[must_use]
    pub const fn purchasable(&self) -> bool {
        self.in_stock
    }
}

/// Resolve a product + selection into effective display/snapshot values.
///
/// Matching rules:
/// - `Some(Base)` picks the product's own price point.
/// - `Some(Variant(id))` picks the matching variant; an unknown id falls
///   back to the first option rather than panicking (surfaces seed their
///   selection from the first option, so a mismatch means stale UI state).
/// - `None` picks the first option.
/// - A product with no size options resolves to its own base values.
#[must_use]
pub fn resolve(
    product: &Product,
    selection: Option<&SizeSelection>,
    flavor: Option<&str>,
) -> ResolvedSelection {
    let flavor = flavor
        .map(str::trim)
        .filter(|f| !f.is_empty())
        .map(ToOwned::to_owned);

    let options = size_options(product);
    let Some(first) = options.first() else {
        return ResolvedSelection {
            selection: None,
            size_label: None,
            flavor,
            unit_price: product.price,
            original_price: product.original_price,
            image: product.image.clone(),
            stock: product.stock,
            in_stock: quantity::purchasable(product.stock, product.in_stock),
        };
    };

    let chosen = match selection {
        Some(wanted) => options
            .iter()
            .find(|option| option.selection == *wanted)
            .unwrap_or(first),
        None => first,
    };

    ResolvedSelection {
        selection: Some(chosen.selection.clone()),
        size_label: Some(chosen.label.clone()),
        flavor,
        unit_price: chosen.price,
        original_price: chosen.original_price,
        image: chosen.image.clone(),
        stock: chosen.stock,
        in_stock: quantity::purchasable(chosen.stock, product.in_stock),
    }
}
