//! Read-only product views.
//!
//! These are the resolved views product surfaces render from: effective
//! price, availability, and the size-option list, all produced by the cart
//! engine's resolver rather than recomputed per surface.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Serialize;
use tracing::instrument;

use suplefit_cart::{SizeOption, size_options};
use suplefit_core::{Price, Product, ProductId};

use crate::error::{AppError, Result};
use crate::state::AppState;

/// One size-picker entry.
#[derive(Debug, Clone, Serialize)]
pub struct SizeOptionView {
    /// Selection id to pass back on add (`"base"` or a variant id).
    pub id: String,
    /// Display label.
    pub label: String,
    /// Effective price.
    pub price: Price,
    /// Pre-discount price.
    pub original_price: Option<Price>,
    /// Image for this option.
    pub image: String,
    /// Stock count; `null` means unconstrained.
    pub stock: Option<u32>,
}

impl From<SizeOption> for SizeOptionView {
    fn from(option: SizeOption) -> Self {
        Self {
            id: option.selection.id().to_owned(),
            label: option.label,
            price: option.price,
            original_price: option.original_price,
            image: option.image,
            stock: option.stock,
        }
    }
}

/// Product display data.
#[derive(Debug, Clone, Serialize)]
pub struct ProductView {
    /// Catalog identifier.
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Base price.
    pub price: Price,
    /// Pre-discount price.
    pub original_price: Option<Price>,
    /// Base image.
    pub image: String,
    /// Coarse availability.
    pub in_stock: bool,
    /// Available flavors.
    pub flavors: Vec<String>,
    /// Whether an add requires an explicit flavor.
    pub requires_flavor: bool,
    /// Ordered size options (base price point first, when present).
    pub sizes: Vec<SizeOptionView>,
}

impl From<&Product> for ProductView {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.clone(),
            name: product.name.clone(),
            price: product.price,
            original_price: product.original_price,
            image: product.image.clone(),
            in_stock: product.in_stock,
            flavors: product.flavors.clone(),
            requires_flavor: product.requires_flavor(),
            sizes: size_options(product)
                .into_iter()
                .map(SizeOptionView::from)
                .collect(),
        }
    }
}

/// List all products with their resolved size options.
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Json<Vec<ProductView>> {
    Json(
        state
            .catalog()
            .products()
            .iter()
            .map(ProductView::from)
            .collect(),
    )
}

/// Show one product.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ProductView>> {
    let product_id = ProductId::new(id);
    state
        .catalog()
        .get(&product_id)
        .map(|product| Json(ProductView::from(product)))
        .ok_or_else(|| AppError::NotFound(format!("product {product_id}")))
}
