//! String interning for identifiers.
//!
//! Every identifier, raw identifier and dollar identifier the scanner
//! produces is interned so the tree stores a 4-byte handle instead of an
//! owned string, and name comparison is an integer compare.

use lasso::{Spur, ThreadedRodeo};
use std::fmt;
use std::num::NonZeroUsize;
use std::sync::Arc;

/// An interned identifier. Resolve it through the [`StringInterner`] that
/// produced it.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct InternedString(Spur);

impl InternedString {
    #[inline]
    pub fn from_spur(spur: Spur) -> Self {
        Self(spur)
    }

    #[inline]
    pub fn as_spur(self) -> Spur {
        self.0
    }
}

impl fmt::Debug for InternedString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "InternedString({:?})", self.0)
    }
}

/// Thread-safe string interner.
///
/// Cloning is cheap (an `Arc` bump), so one interner can be handed to every
/// parser of a batch, including parsers running on other threads.
#[derive(Clone)]
pub struct StringInterner {
    rodeo: Arc<ThreadedRodeo>,
}

impl StringInterner {
    pub fn new() -> Self {
        Self {
            rodeo: Arc::new(ThreadedRodeo::new()),
        }
    }

    /// Create an interner sized for roughly `capacity` distinct names.
    pub fn with_capacity(capacity: usize) -> Self {
        let strings = capacity.max(1);
        let bytes = NonZeroUsize::new(strings.saturating_mul(8)).unwrap_or(NonZeroUsize::MIN);
        Self {
            rodeo: Arc::new(ThreadedRodeo::with_capacity(lasso::Capacity::new(strings, bytes))),
        }
    }

    /// Intern a string, returning the existing handle if it was seen before.
    #[inline]
    pub fn intern(&self, s: &str) -> InternedString {
        InternedString::from_spur(self.rodeo.get_or_intern(s))
    }

    #[inline]
    pub fn intern_static(&self, s: &'static str) -> InternedString {
        InternedString::from_spur(self.rodeo.get_or_intern_static(s))
    }

    /// Look up a string without interning it.
    #[inline]
    pub fn get(&self, s: &str) -> Option<InternedString> {
        self.rodeo.get(s).map(InternedString::from_spur)
    }

    #[inline]
    pub fn resolve(&self, key: InternedString) -> &str {
        self.rodeo.resolve(&key.as_spur())
    }

    pub fn len(&self) -> usize {
        self.rodeo.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rodeo.is_empty()
    }

    /// Whether two interners share the same storage.
    pub fn ptr_eq(&self, other: &StringInterner) -> bool {
        Arc::ptr_eq(&self.rodeo, &other.rodeo)
    }
}

impl Default for StringInterner {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for StringInterner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StringInterner")
            .field("len", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intern_and_resolve() {
        let interner = StringInterner::new();
        let a = interner.intern("spawn_worker");
        let b = interner.intern("spawn_worker");
        let c = interner.intern("Option");

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(interner.resolve(a), "spawn_worker");
        assert_eq!(interner.resolve(c), "Option");
    }

    #[test]
    fn test_clones_share_storage() {
        let interner = StringInterner::with_capacity(16);
        let other = interner.clone();
        let a = other.intern("x");
        assert!(interner.ptr_eq(&other));
        assert_eq!(interner.get("x"), Some(a));
    }

    #[test]
    fn test_intern_from_threads() {
        let interner = StringInterner::new();
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let interner = interner.clone();
                std::thread::spawn(move || interner.intern("shared"))
            })
            .collect();
        let keys: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert!(keys.windows(2).all(|w| w[0] == w[1]));
        assert_eq!(interner.len(), 1);
    }
}
