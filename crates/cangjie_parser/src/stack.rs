//! Stack safety for recursive parsing.

const RED_ZONE: usize = 100 * 1024; // 100KB
const STACK_PER_RECURSION: usize = 1024 * 1024; // 1MB

/// Run `f`, growing the native stack first if fewer than `RED_ZONE` bytes
/// remain.
#[inline]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, f)
}
