//! Stack growth for recursive attribute walks.
//!
//! Structural equality and hashing recurse once per tree level. Attribute
//! trees built programmatically (long `Select` chains, nested arrays of
//! configuration) have no depth limit, so every recursive step goes through
//! [`ensure_sufficient_stack`], which allocates a fresh stack segment when
//! the current one runs low.
//!
//! On `wasm32` the guard is a plain call.

/// Remaining stack below which a new segment is allocated (128KB).
const RED_ZONE: usize = 128 * 1024;

/// Size of each newly allocated stack segment (2MB).
const SEGMENT_SIZE: usize = 2 * 1024 * 1024;

/// Run `f`, first growing the stack if fewer than [`RED_ZONE`] bytes remain.
///
/// Wrap the body of any function that recurses into child attributes:
///
/// ```text
/// fn hash(&mut self, node: &Attr) -> u64 {
///     ensure_sufficient_stack(|| self.visit(node, ()))
/// }
/// ```
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, SEGMENT_SIZE, f)
}

/// `wasm32` manages its own stack; call through.
#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}

#[cfg(test)]
mod tests;
