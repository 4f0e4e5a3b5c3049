//! Typed index arenas.
//!
//! Syntax-tree nodes are stored in flat vectors and refer to each other
//! through small copyable ids instead of references. A tree therefore owns
//! all of its nodes, can be moved freely, and recursive shapes (nested enum
//! patterns, chained calls) never form ownership cycles.

use std::fmt;
use std::marker::PhantomData;
use std::ops::Index;

/// A handle that indexes into an [`Arena`].
pub trait ArenaId: Copy + Eq {
    /// Build an id from a vector index.
    fn from_index(index: usize) -> Self;

    /// The vector index this id points at.
    fn index(self) -> usize;
}

/// Declare a `u32`-backed id type implementing [`ArenaId`].
#[macro_export]
macro_rules! define_id {
    ($(#[$meta:meta])* $vis:vis struct $name:ident;) => {
        $(#[$meta])*
        #[derive(Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
        $vis struct $name(u32);

        impl $name {
            /// The raw index value.
            #[inline]
            pub const fn raw(self) -> u32 {
                self.0
            }
        }

        impl $crate::arena::ArenaId for $name {
            #[inline]
            fn from_index(index: usize) -> Self {
                debug_assert!(index < u32::MAX as usize);
                Self(index as u32)
            }

            #[inline]
            fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl ::std::fmt::Debug for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }
    };
}

/// An append-only vector of `T` addressed by ids of type `I`.
///
/// Nodes are never removed or mutated after they are allocated; the whole
/// arena is dropped with the tree that owns it.
pub struct Arena<I, T> {
    items: Vec<T>,
    _marker: PhantomData<fn(I) -> I>,
}

impl<I: ArenaId, T> Arena<I, T> {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            _marker: PhantomData,
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            items: Vec::with_capacity(capacity),
            _marker: PhantomData,
        }
    }

    /// Store a value and return its id.
    #[inline]
    pub fn alloc(&mut self, value: T) -> I {
        let id = I::from_index(self.items.len());
        self.items.push(value);
        id
    }

    #[inline]
    pub fn get(&self, id: I) -> Option<&T> {
        self.items.get(id.index())
    }

    /// The id the next `alloc` call will return.
    #[inline]
    pub fn next_id(&self) -> I {
        I::from_index(self.items.len())
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Drop every value allocated at or after index `len`. Used to discard
    /// the nodes of an abandoned speculative parse.
    pub fn truncate(&mut self, len: usize) {
        self.items.truncate(len);
    }

    /// Iterate over `(id, value)` pairs in allocation order.
    pub fn iter(&self) -> impl Iterator<Item = (I, &T)> + '_ {
        self.items
            .iter()
            .enumerate()
            .map(|(i, item)| (I::from_index(i), item))
    }
}

impl<I: ArenaId, T> Default for Arena<I, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I: ArenaId, T> Index<I> for Arena<I, T> {
    type Output = T;

    #[inline]
    fn index(&self, id: I) -> &T {
        &self.items[id.index()]
    }
}

impl<I, T: Clone> Clone for Arena<I, T> {
    fn clone(&self) -> Self {
        Self {
            items: self.items.clone(),
            _marker: PhantomData,
        }
    }
}

impl<I, T: fmt::Debug> fmt::Debug for Arena<I, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.items.iter()).finish()
    }
}
