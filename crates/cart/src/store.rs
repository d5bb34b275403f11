//! The cart store: single owner of all line items.
//!
//! Every mutation goes through the store's operations (or the equivalent
//! [`CartCommand`]); nothing else touches the line collection. Operations
//! never fail: removing an absent key or updating a missing line is a
//! silent no-op, mirroring how the cart drawer treats stale clicks.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use suplefit_core::{Price, Product, ProductId, SizeSelection};

use crate::resolver::ResolvedSelection;
use crate::totals::CartTotals;

// =============================================================================
// Identity Keys
// =============================================================================

/// Separator between line-key segments.
const KEY_SEPARATOR: &str = "::";

/// Identity key for a cart line: product, size selection, flavor.
///
/// Two additions with the same key merge into one line; any segment that
/// does not apply is the empty string. Keys render as
/// `product::size::flavor` so the HTTP surface can round-trip them.
///
/// A key is computed once, at add time, from the *resolved* selection; it is
/// never recomputed from stale input.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct LineKey {
    product: ProductId,
    size: String,
    flavor: String,
}

impl LineKey {
    /// Build a key from a resolved selection.
    #[must_use]
    pub fn new(
        product: &ProductId,
        selection: Option<&SizeSelection>,
        flavor: Option<&str>,
    ) -> Self {
        Self {
            product: product.clone(),
            size: selection.map(SizeSelection::id).unwrap_or_default().to_owned(),
            flavor: flavor.unwrap_or_default().to_owned(),
        }
    }

    /// The product segment.
    #[must_use]
    pub const fn product(&self) -> &ProductId {
        &self.product
    }

    /// The size-selection segment; empty when no size selection applies.
    #[must_use]
    pub fn size(&self) -> &str {
        &self.size
    }

    /// The flavor segment; empty when no flavor was chosen.
    #[must_use]
    pub fn flavor(&self) -> &str {
        &self.flavor
    }
}

impl core::fmt::Display for LineKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "{}{KEY_SEPARATOR}{}{KEY_SEPARATOR}{}",
            self.product, self.size, self.flavor
        )
    }
}

/// Error parsing a line key from its string form.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid line key {0:?}: expected product::size::flavor")]
pub struct ParseLineKeyError(String);

impl core::str::FromStr for LineKey {
    type Err = ParseLineKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut segments = s.split(KEY_SEPARATOR);
        match (
            segments.next(),
            segments.next(),
            segments.next(),
            segments.next(),
        ) {
            (Some(product), Some(size), Some(flavor), None) => Ok(Self {
                product: ProductId::new(product),
                size: size.to_owned(),
                flavor: flavor.to_owned(),
            }),
            _ => Err(ParseLineKeyError(s.to_owned())),
        }
    }
}

impl From<LineKey> for String {
    fn from(key: LineKey) -> Self {
        key.to_string()
    }
}

impl TryFrom<String> for LineKey {
    type Error = ParseLineKeyError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

// =============================================================================
// Line Items
// =============================================================================

/// A fully-resolved addition, as produced by the resolver.
///
/// Carries everything the store needs to create a line; the store never
/// looks back at the catalog, so later catalog price changes do not
/// retroactively alter the cart.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartAddition {
    /// Product identifier.
    pub product_id: ProductId,
    /// Product display name.
    pub product_name: String,
    /// Resolved size selection, if any.
    pub selection: Option<SizeSelection>,
    /// Chosen flavor, if any.
    pub flavor: Option<String>,
    /// Unit price snapshot.
    pub unit_price: Price,
    /// Pre-discount price snapshot.
    pub original_price: Option<Price>,
    /// Image snapshot.
    pub image: String,
    /// Size label for display.
    pub size_label: Option<String>,
}

impl CartAddition {
    /// Assemble an addition from a product and a resolved selection.
    #[must_use]
    pub fn from_resolved(product: &Product, resolved: ResolvedSelection) -> Self {
        Self {
            product_id: product.id.clone(),
            product_name: product.name.clone(),
            selection: resolved.selection,
            flavor: resolved.flavor,
            unit_price: resolved.unit_price,
            original_price: resolved.original_price,
            image: resolved.image,
            size_label: resolved.size_label,
        }
    }

    /// The identity key this addition merges under.
    #[must_use]
    pub fn key(&self) -> LineKey {
        LineKey::new(
            &self.product_id,
            self.selection.as_ref(),
            self.flavor.as_deref(),
        )
    }
}

/// A line in the cart.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineItem {
    /// Identity key.
    pub key: LineKey,
    /// Product display name (snapshot).
    pub name: String,
    /// Unit price snapshot from add time.
    pub unit_price: Price,
    /// Pre-discount price snapshot, for discount display.
    pub original_price: Option<Price>,
    /// Image snapshot.
    pub image: String,
    /// Size label for display.
    pub size_label: Option<String>,
    /// Flavor label for display.
    pub flavor_label: Option<String>,
    /// Units of this line. At least 1 unless the store was built permissive.
    pub quantity: u32,
    /// When the line was first added.
    pub added_at: DateTime<Utc>,
}

// =============================================================================
// Commands
// =============================================================================

/// Cart mutations as a command enum.
///
/// The store's methods and [`CartStore::apply`] are equivalent; the command
/// form exists for callers that queue or log mutations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum CartCommand {
    /// Add one unit of a resolved selection (merging by identity key).
    Add(CartAddition),
    /// Remove the line with this key.
    Remove(LineKey),
    /// Set the quantity of the line with this key.
    SetQuantity {
        /// Line to update.
        key: LineKey,
        /// New absolute quantity. Callers clamp via [`crate::quantity`]
        /// first; a hardened store additionally floors at 1.
        quantity: u32,
    },
    /// Empty the cart.
    Clear,
}

// =============================================================================
// Cart Store
// =============================================================================

/// The canonical, ordered collection of cart lines.
///
/// One store exists per shopper session. Lines keep insertion order; adds
/// for an existing identity key merge into the existing line instead of
/// appending.
///
/// By default the store is hardened: quantity writes are floored at 1 at
/// the store boundary. [`CartStore::permissive`] preserves the historical
/// behavior of storing whatever quantity the caller passed (including 0),
/// for callers that clamp externally and want write-through semantics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartStore {
    lines: Vec<LineItem>,
    #[serde(default = "default_clamp")]
    clamp_quantities: bool,
}

const fn default_clamp() -> bool {
    true
}

impl Default for CartStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CartStore {
    /// Create an empty, hardened store.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            lines: Vec::new(),
            clamp_quantities: true,
        }
    }

    /// Create an empty store that writes quantities through unclamped.
    #[must_use]
    pub const fn permissive() -> Self {
        Self {
            lines: Vec::new(),
            clamp_quantities: false,
        }
    }

    /// Add one unit of a resolved selection.
    ///
    /// Merges by identity key: repeated adds of the same
    /// product/size/flavor accumulate quantity on a single line. Any
    /// quantity on the input is ignored; one call is one unit.
    pub fn add(&mut self, addition: CartAddition) {
        let key = addition.key();
        if let Some(line) = self.lines.iter_mut().find(|line| line.key == key) {
            line.quantity = line.quantity.saturating_add(1);
            tracing::debug!(%key, quantity = line.quantity, "merged cart line");
            return;
        }
        tracing::debug!(%key, "new cart line");
        self.lines.push(LineItem {
            key,
            name: addition.product_name,
            unit_price: addition.unit_price,
            original_price: addition.original_price,
            image: addition.image,
            size_label: addition.size_label,
            flavor_label: addition.flavor,
            quantity: 1,
            added_at: Utc::now(),
        });
    }

    /// Remove the line with this key. Absent keys are a no-op.
    pub fn remove(&mut self, key: &LineKey) {
        self.lines.retain(|line| line.key != *key);
    }

    /// Set the quantity of the line with this key. Absent keys are a no-op.
    ///
    /// A hardened store floors the value at 1; dropping a line is always an
    /// explicit [`CartStore::remove`], never a side effect of a quantity
    /// write. A permissive store writes the value through as given.
    pub fn set_quantity(&mut self, key: &LineKey, quantity: u32) {
        let quantity = if self.clamp_quantities {
            quantity.max(1)
        } else {
            quantity
        };
        if let Some(line) = self.lines.iter_mut().find(|line| line.key == *key) {
            line.quantity = quantity;
        }
    }

    /// Empty the cart. Idempotent.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Apply a command. Equivalent to calling the matching method.
    pub fn apply(&mut self, command: CartCommand) {
        match command {
            CartCommand::Add(addition) => self.add(addition),
            CartCommand::Remove(key) => self.remove(&key),
            CartCommand::SetQuantity { key, quantity } => self.set_quantity(&key, quantity),
            CartCommand::Clear => self.clear(),
        }
    }

    /// Current lines, in insertion order.
    #[must_use]
    pub fn items(&self) -> &[LineItem] {
        &self.lines
    }

    /// The line with this key, if present.
    #[must_use]
    pub fn get(&self, key: &LineKey) -> Option<&LineItem> {
        self.lines.iter().find(|line| line.key == *key)
    }

    /// Number of lines (not units; see [`CartTotals::total_items`]).
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether the cart is empty. Downstream gates checkout on this.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Aggregate totals over the current lines. Recomputed on every call.
    #[must_use]
    pub fn totals(&self) -> CartTotals {
        CartTotals::compute(&self.lines)
    }

    /// Snapshot for checkout handoff: cloned lines plus totals.
    ///
    /// Checkout is external; it clears the cart only after it has
    /// independently confirmed success.
    #[must_use]
    pub fn snapshot(&self) -> CartSnapshot {
        CartSnapshot {
            items: self.lines.clone(),
            totals: self.totals(),
        }
    }
}

/// Point-in-time copy of the cart handed to external checkout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartSnapshot {
    /// Cart lines at snapshot time.
    pub items: Vec<LineItem>,
    /// Aggregates at snapshot time.
    pub totals: CartTotals,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use suplefit_core::VariantId;

    fn addition(product: &str, size: Option<&str>, flavor: Option<&str>) -> CartAddition {
        CartAddition {
            product_id: ProductId::new(product),
            product_name: product.to_owned(),
            selection: size.map(|id| SizeSelection::Variant(VariantId::new(id))),
            flavor: flavor.map(ToOwned::to_owned),
            unit_price: Price::from_amount(100),
            original_price: None,
            image: "/img/p.webp".to_owned(),
            size_label: size.map(ToOwned::to_owned),
        }
    }

    #[test]
    fn test_add_merges_by_identity_key() {
        let mut store = CartStore::new();
        for _ in 0..3 {
            store.add(addition("whey", Some("1kg"), Some("Vainilla")));
        }
        assert_eq!(store.len(), 1);
        assert_eq!(store.items()[0].quantity, 3);
    }

    #[test]
    fn test_add_ignores_input_quantity_one_unit_per_call() {
        let mut store = CartStore::new();
        store.add(addition("whey", None, None));
        assert_eq!(store.items()[0].quantity, 1);
    }

    #[test]
    fn test_distinct_variants_make_distinct_lines() {
        let mut store = CartStore::new();
        store.add(addition("whey", Some("1kg"), None));
        store.add(addition("whey", Some("2kg"), None));
        assert_eq!(store.len(), 2);
        assert!(store.items().iter().all(|line| line.quantity == 1));
    }

    #[test]
    fn test_distinct_flavors_make_distinct_lines() {
        let mut store = CartStore::new();
        store.add(addition("whey", Some("1kg"), Some("Vainilla")));
        store.add(addition("whey", Some("1kg"), Some("Chocolate")));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_remove_absent_key_is_noop() {
        let mut store = CartStore::new();
        store.add(addition("whey", None, None));
        store.remove(&addition("creatine", None, None).key());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_remove_deletes_line() {
        let mut store = CartStore::new();
        let key = addition("whey", None, None).key();
        store.add(addition("whey", None, None));
        store.remove(&key);
        assert!(store.is_empty());
    }

    #[test]
    fn test_hardened_set_quantity_floors_at_one() {
        let mut store = CartStore::new();
        let key = addition("whey", None, None).key();
        store.add(addition("whey", None, None));
        store.set_quantity(&key, 0);
        assert_eq!(store.get(&key).unwrap().quantity, 1);
    }

    #[test]
    fn test_permissive_set_quantity_writes_through() {
        let mut store = CartStore::permissive();
        let key = addition("whey", None, None).key();
        store.add(addition("whey", None, None));
        store.set_quantity(&key, 0);
        // Historical behavior: the value is stored as given, line included.
        assert_eq!(store.get(&key).unwrap().quantity, 0);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_set_quantity_absent_key_is_noop() {
        let mut store = CartStore::new();
        store.set_quantity(&addition("whey", None, None).key(), 5);
        assert!(store.is_empty());
    }

    #[test]
    fn test_clear_is_idempotent() {
        let mut store = CartStore::new();
        store.add(addition("whey", None, None));
        store.clear();
        assert!(store.is_empty());
        store.clear();
        assert!(store.is_empty());
        assert_eq!(store.totals().total_price.amount, Decimal::ZERO);
    }

    #[test]
    fn test_missing_product_id_degrades_without_panic() {
        // Malformed input is tolerated; the key just carries an empty
        // product segment. Call sites are expected to validate first.
        let mut store = CartStore::new();
        store.add(addition("", None, None));
        store.add(addition("", None, None));
        assert_eq!(store.len(), 1);
        assert_eq!(store.items()[0].quantity, 2);
    }

    #[test]
    fn test_commands_match_methods() {
        let mut store = CartStore::new();
        let key = addition("whey", None, None).key();
        store.apply(CartCommand::Add(addition("whey", None, None)));
        store.apply(CartCommand::Add(addition("whey", None, None)));
        store.apply(CartCommand::SetQuantity {
            key: key.clone(),
            quantity: 5,
        });
        assert_eq!(store.get(&key).unwrap().quantity, 5);
        store.apply(CartCommand::Remove(key));
        store.apply(CartCommand::Clear);
        assert!(store.is_empty());
    }

    #[test]
    fn test_line_key_round_trip() {
        let key = addition("whey", Some("1kg"), Some("Vainilla")).key();
        assert_eq!(key.to_string(), "whey::1kg::Vainilla");
        let parsed: LineKey = "whey::1kg::Vainilla".parse().unwrap();
        assert_eq!(parsed, key);
    }

    #[test]
    fn test_line_key_empty_segments() {
        let key = addition("whey", None, None).key();
        assert_eq!(key.to_string(), "whey::::");
        let parsed: LineKey = "whey::::".parse().unwrap();
        assert_eq!(parsed, key);
    }

    #[test]
    fn test_line_key_rejects_wrong_segment_count() {
        assert!("whey::1kg".parse::<LineKey>().is_err());
        assert!("a::b::c::d".parse::<LineKey>().is_err());
    }
}
