//! Stack growth for deep recursion.
//!
//! Parsing and code generation recurse once per nested expression. Heavily
//! nested kernels (long operator chains, deep object literals) would
//! otherwise overflow the main thread's stack.

/// Minimum remaining stack before growing.
const RED_ZONE: usize = 100 * 1024;

/// Size of each newly allocated stack segment.
const STACK_PER_RECURSION: usize = 1024 * 1024;

/// Run `f`, first growing the stack if less than `RED_ZONE` bytes remain.
#[inline]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, f)
}
