//! Cart route handlers.
//!
//! The cart id lives in the session; the cart itself lives in the process-
//! wide [`CartRegistry`](crate::carts::CartRegistry). Handlers resolve the
//! catalog selection first, then hand a fully-resolved addition to the
//! store, so the store never looks back at the catalog.

use axum::{Json, extract::State, response::IntoResponse};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;
use uuid::Uuid;

use suplefit_cart::{CartAddition, CartSnapshot, CartStore, CartTotals, LineItem, LineKey};
use suplefit_cart::{quantity, resolve};
use suplefit_core::{Price, ProductId, SizeSelection};

use crate::carts::{CartHandle, lock};
use crate::error::{AppError, Result};
use crate::state::AppState;

/// Session key holding the shopper's cart id.
const CART_ID_KEY: &str = "cart_id";

// =============================================================================
// Views
// =============================================================================

/// Cart line display data.
#[derive(Debug, Clone, Serialize)]
pub struct CartItemView {
    /// Identity key, round-trippable through update/remove.
    pub key: String,
    /// Product display name.
    pub name: String,
    /// Size label, if a size selection applies.
    pub size: Option<String>,
    /// Flavor label, if one was chosen.
    pub flavor: Option<String>,
    /// Units of this line.
    pub quantity: u32,
    /// Unit price snapshot.
    pub unit_price: Price,
    /// Pre-discount price snapshot.
    pub original_price: Option<Price>,
    /// `unit_price * quantity`.
    pub line_price: Price,
    /// Image snapshot.
    pub image: String,
}

impl From<&LineItem> for CartItemView {
    fn from(line: &LineItem) -> Self {
        let line_price = Price::new(
            line.unit_price.amount * Decimal::from(line.quantity),
            line.unit_price.currency_code,
        );
        Self {
            key: line.key.to_string(),
            name: line.name.clone(),
            size: line.size_label.clone(),
            flavor: line.flavor_label.clone(),
            quantity: line.quantity,
            unit_price: line.unit_price,
            original_price: line.original_price,
            line_price,
            image: line.image.clone(),
        }
    }
}

/// Cart display data.
#[derive(Debug, Clone, Serialize)]
pub struct CartView {
    /// Lines in insertion order.
    pub items: Vec<CartItemView>,
    /// Aggregates over the lines.
    pub totals: CartTotals,
}

impl CartView {
    /// An empty cart.
    #[must_use]
    pub fn empty() -> Self {
        Self::from(&CartStore::new())
    }
}

impl From<&CartStore> for CartView {
    fn from(store: &CartStore) -> Self {
        Self {
            items: store.items().iter().map(CartItemView::from).collect(),
            totals: store.totals(),
        }
    }
}

/// Cart count badge data.
#[derive(Debug, Clone, Serialize)]
pub struct CartCountView {
    /// Total units across all lines.
    pub count: u64,
}

// =============================================================================
// Session Helpers
// =============================================================================

/// Get the cart ID from the session.
async fn get_cart_id(session: &Session) -> Option<Uuid> {
    session.get::<Uuid>(CART_ID_KEY).await.ok().flatten()
}

/// Set the cart ID in the session.
async fn set_cart_id(session: &Session, cart_id: Uuid) -> Result<()> {
    session.insert(CART_ID_KEY, cart_id).await?;
    Ok(())
}

/// The session's cart, created on first use.
async fn cart_for_session(state: &AppState, session: &Session) -> Result<CartHandle> {
    if let Some(id) = get_cart_id(session).await {
        return Ok(state.carts().get_or_create(id));
    }
    let (id, handle) = state.carts().create();
    set_cart_id(session, id).await?;
    Ok(handle)
}

/// The session's cart, if one exists. Read paths do not create carts.
async fn existing_cart(state: &AppState, session: &Session) -> Option<CartHandle> {
    let id = get_cart_id(session).await?;
    state.carts().get(id)
}

// =============================================================================
// Requests
// =============================================================================

/// Add to cart request body.
#[derive(Debug, Deserialize)]
pub struct AddToCartRequest {
    /// Product to add.
    pub product_id: String,
    /// Size selection id (`"base"` or a variant id). Defaults to the
    /// product's first size option.
    pub variant_id: Option<String>,
    /// Flavor; required only when the product has more than one.
    pub flavor: Option<String>,
}

/// Update quantity request body.
#[derive(Debug, Deserialize)]
pub struct UpdateCartRequest {
    /// Line key as rendered in [`CartItemView::key`].
    pub key: String,
    /// Requested absolute quantity; clamped to `[1, stock]`.
    pub quantity: i64,
}

/// Remove line request body.
#[derive(Debug, Deserialize)]
pub struct RemoveCartRequest {
    /// Line key as rendered in [`CartItemView::key`].
    pub key: String,
}

fn parse_key(raw: &str) -> Result<LineKey> {
    raw.parse()
        .map_err(|_| AppError::BadRequest(format!("invalid line key: {raw}")))
}

// =============================================================================
// Handlers
// =============================================================================

/// Display the cart with totals.
#[instrument(skip(state, session))]
pub async fn show(State(state): State<AppState>, session: Session) -> impl IntoResponse {
    let view = match existing_cart(&state, &session).await {
        Some(handle) => CartView::from(&*lock(&handle)),
        None => CartView::empty(),
    };
    Json(view)
}

/// Add one unit of a resolved selection to the cart.
///
/// Creates the session's cart on first use. Repeated adds of the same
/// product/size/flavor merge into one line.
#[instrument(skip(state, session))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    Json(request): Json<AddToCartRequest>,
) -> Result<Json<CartView>> {
    if request.product_id.trim().is_empty() {
        return Err(AppError::BadRequest("product_id is required".to_owned()));
    }

    let product_id = ProductId::new(request.product_id);
    let product = state
        .catalog()
        .get(&product_id)
        .ok_or_else(|| AppError::NotFound(format!("product {product_id}")))?;

    let flavor = request
        .flavor
        .as_deref()
        .map(str::trim)
        .filter(|f| !f.is_empty());
    if product.requires_flavor() && flavor.is_none() {
        return Err(AppError::FlavorRequired(product.id.to_string()));
    }

    let selection = request.variant_id.map(SizeSelection::from);
    let resolved = resolve(product, selection.as_ref(), flavor);
    if !resolved.purchasable() {
        return Err(AppError::OutOfStock(product.id.to_string()));
    }

    let addition = CartAddition::from_resolved(product, resolved);
    let handle = cart_for_session(&state, &session).await?;
    let mut cart = lock(&handle);
    cart.add(addition);
    Ok(Json(CartView::from(&*cart)))
}

/// Set a line's quantity, clamped against the selection's current stock.
#[instrument(skip(state, session))]
pub async fn update(
    State(state): State<AppState>,
    session: Session,
    Json(request): Json<UpdateCartRequest>,
) -> Result<Json<CartView>> {
    let key = parse_key(&request.key)?;

    // Stock is live catalog data, not a cart snapshot. A product that left
    // the catalog clamps against no ceiling (floor of 1 still applies).
    let stock = state.catalog().get(key.product()).and_then(|product| {
        let selection = (!key.size().is_empty()).then(|| SizeSelection::from(key.size()));
        resolve(product, selection.as_ref(), None).stock
    });
    let quantity = quantity::clamp(request.quantity, stock);

    let Some(handle) = existing_cart(&state, &session).await else {
        return Ok(Json(CartView::empty()));
    };
    let mut cart = lock(&handle);
    cart.set_quantity(&key, quantity);
    Ok(Json(CartView::from(&*cart)))
}

/// Remove a line. Absent keys are a no-op.
#[instrument(skip(state, session))]
pub async fn remove(
    State(state): State<AppState>,
    session: Session,
    Json(request): Json<RemoveCartRequest>,
) -> Result<Json<CartView>> {
    let key = parse_key(&request.key)?;
    let Some(handle) = existing_cart(&state, &session).await else {
        return Ok(Json(CartView::empty()));
    };
    let mut cart = lock(&handle);
    cart.remove(&key);
    Ok(Json(CartView::from(&*cart)))
}

/// Empty the cart. External checkout calls this only after it has
/// independently confirmed success.
#[instrument(skip(state, session))]
pub async fn clear(State(state): State<AppState>, session: Session) -> Result<Json<CartView>> {
    if let Some(handle) = existing_cart(&state, &session).await {
        lock(&handle).clear();
    }
    Ok(Json(CartView::empty()))
}

/// Total unit count badge.
#[instrument(skip(state, session))]
pub async fn count(State(state): State<AppState>, session: Session) -> Json<CartCountView> {
    let count = match existing_cart(&state, &session).await {
        Some(handle) => lock(&handle).totals().total_items,
        None => 0,
    };
    Json(CartCountView { count })
}

/// Snapshot handed to external checkout. Never clears the cart.
#[instrument(skip(state, session))]
pub async fn checkout(
    State(state): State<AppState>,
    session: Session,
) -> Result<Json<CartSnapshot>> {
    let Some(handle) = existing_cart(&state, &session).await else {
        return Err(AppError::BadRequest("cart is empty".to_owned()));
    };
    let cart = lock(&handle);
    if cart.is_empty() {
        return Err(AppError::BadRequest("cart is empty".to_owned()));
    }
    Ok(Json(cart.snapshot()))
}
