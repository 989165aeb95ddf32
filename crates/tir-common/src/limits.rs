//! Centralized recursion/iteration bounds.
//!
//! Kept deliberately small: the core has exactly two places where an
//! unbounded loop could otherwise run away, and both are collected here so
//! they can be tuned in one spot rather than hunted down across crates.

/// Initial capacity hint for the explicit work stack used by
/// `post_order_visit`. Traversal itself is unbounded (limited by heap, not
/// by this constant) — this only avoids a handful of early reallocations
/// for the common case of small-to-medium functions.
pub const POST_ORDER_STACK_INITIAL_CAPACITY: usize = 16;

/// Upper bound on how many numeric suffixes `NameTable::get_unique_name`
/// will try (`hint`, `hint1`, `hint2`, ...) before giving up.
///
/// This is a safety valve, not a normal code path: hitting it means some
/// caller is emitting on the order of ten thousand variables sharing one
/// display-name hint inside a single builder, which is never expected in
/// practice.
pub const MAX_NAME_DISAMBIGUATION_ATTEMPTS: usize = 10_000;
