//! Quantity clamping against stock bounds.
//!
//! The guard is advisory: callers clamp before writing to the store. The
//! floor of 1 always wins, even against a 0 ceiling, so callers must treat
//! zero stock as "blocked entirely" via [`purchasable`] rather than relying
//! on the clamp alone.

/// Clamp a requested absolute quantity to `[1, stock]`.
///
/// With unconstrained stock (`None`) only the floor applies. The result is
/// never less than 1; decrementing from 1 is a no-op at the call site.
#[must_use]
pub fn clamp(requested: i64, stock: Option<u32>) -> u32 {
    let ceiling = stock.map_or(i64::from(u32::MAX), i64::from);
    let clamped = requested.min(ceiling).max(1);
    u32::try_from(clamped).unwrap_or(1)
}

/// Apply a +1/-1 (or larger) step to the current quantity, clamped.
#[must_use]
pub fn step(current: u32, delta: i32, stock: Option<u32>) -> u32 {
    clamp(i64::from(current) + i64::from(delta), stock)
}

/// Whether any quantity of the selection can be purchased at all.
///
/// A known stock of 0 blocks the add outright; this is the enforcement
/// point for sold-out options, since [`clamp`] floors at 1 and would
/// otherwise let one unit through. Without a numeric stock the coarse
/// product-level flag decides.
#[must_use]
pub const fn purchasable(stock: Option<u32>, in_stock_flag: bool) -> bool {
    match stock {
        Some(count) => count > 0,
        None => in_stock_flag,
    }
}
