//! Strongly typed identifiers and the shared id allocator.
//!
//! All IDs are `Copy + Ord + Hash` so they can be used as map keys and sorted
//! collection elements without ceremony.
//!
//! # Id spaces
//!
//! `IdAllocator` hands out two disjoint, monotonically increasing id spaces:
//!
//! | Space        | Range                               | Use                            |
//! |--------------|-------------------------------------|--------------------------------|
//! | burnable     | `1_000 .. 1_000_000_000`            | runtime instances, scratch ids |
//! | persistent   | `1_000_000_000 ..`                  | ids meant to outlive a run     |
//!
//! Ids below 1,000 are never allocated, so applications may use them for
//! hand-assigned fixtures.

use std::fmt;
use std::ops::Range;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use crate::{CoreError, CoreResult};

/// Generate a typed ID wrapper around a primitive integer.
macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty);) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        $vis struct $name(pub $inner);

        impl $name {
            /// Sentinel meaning "no valid ID".
            pub const INVALID: $name = $name(<$inner>::MAX);

            /// Cast to `usize` for direct use as a `Vec` index.
            #[inline(always)]
            pub fn index(self) -> usize {
                self.0 as usize
            }

            #[inline(always)]
            pub fn is_valid(self) -> bool {
                self != Self::INVALID
            }
        }

        impl Default for $name {
            /// Returns the `INVALID` sentinel so uninitialized IDs are visibly invalid.
            #[inline(always)]
            fn default() -> Self {
                Self::INVALID
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }
    };
}

typed_id! {
    /// Host-assigned identifier of a behavior instance (entity or component).
    pub struct InstanceId(u64);
}

typed_id! {
    /// Index of a behavior kind in the host's registry, in registration order.
    pub struct KindId(u16);
}

// ── IdAllocator ───────────────────────────────────────────────────────────────

/// First burnable id.
pub const BURNABLE_START: u64 = 1_000;
/// Exclusive end of the burnable range and first persistent id.
pub const PERSISTENT_START: u64 = 1_000_000_000;

/// Which id space an allocation came from.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum IdKind {
    Burnable,
    Persistent,
}

impl fmt::Display for IdKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdKind::Burnable   => f.write_str("burnable"),
            IdKind::Persistent => f.write_str("persistent"),
        }
    }
}

/// Lock-free, monotonic id source shared by the host and every behavior.
///
/// `IdAllocator` is `Sync`: behaviors running on different Rayon workers call
/// [`burn`][Self::burn] concurrently through `&IdAllocator`.  Ids are never
/// reused, so a stale reference can never alias a newer instance.
///
/// Exhaustion is sticky: once either space runs dry, [`is_exhausted`][Self::is_exhausted]
/// stays `true` so the host can escalate it even if the caller dropped the
/// error.
#[derive(Debug)]
pub struct IdAllocator {
    next_burnable:   AtomicU64,
    burnable_end:    u64,
    next_persistent: AtomicU64,
    persistent_end:  u64,
    exhausted:       AtomicBool,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::with_ranges(BURNABLE_START..PERSISTENT_START, PERSISTENT_START..u64::MAX)
    }

    /// Allocator over explicit ranges.  Mostly useful for exercising exhaustion.
    ///
    /// The ranges must not overlap; `u64::MAX` is reserved for
    /// `InstanceId::INVALID` and is never handed out.
    pub fn with_ranges(burnable: Range<u64>, persistent: Range<u64>) -> Self {
        debug_assert!(
            burnable.end <= persistent.start || persistent.end <= burnable.start,
            "burnable and persistent id ranges overlap",
        );
        Self {
            next_burnable:   AtomicU64::new(burnable.start),
            burnable_end:    burnable.end,
            next_persistent: AtomicU64::new(persistent.start),
            persistent_end:  persistent.end,
            exhausted:       AtomicBool::new(false),
        }
    }

    /// Next burnable id.
    pub fn burn(&self) -> CoreResult<InstanceId> {
        self.take(&self.next_burnable, self.burnable_end, IdKind::Burnable)
    }

    /// Next persistent id.
    pub fn persistent(&self) -> CoreResult<InstanceId> {
        self.take(&self.next_persistent, self.persistent_end, IdKind::Persistent)
    }

    /// `true` once any allocation has failed for lack of ids.
    #[inline]
    pub fn is_exhausted(&self) -> bool {
        self.exhausted.load(Ordering::Acquire)
    }

    /// The id the next `burn` would return, if the space is not exhausted.
    pub fn peek_burnable(&self) -> u64 {
        self.next_burnable.load(Ordering::Relaxed)
    }

    fn take(&self, next: &AtomicU64, end: u64, kind: IdKind) -> CoreResult<InstanceId> {
        // A dry space stays pinned at `end`; it never creeps toward wrap-around.
        match next.fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| (n < end).then_some(n + 1)) {
            Ok(id) => Ok(InstanceId(id)),
            Err(_) => {
                self.exhausted.store(true, Ordering::Release);
                Err(CoreError::IdsExhausted(kind))
            }
        }
    }
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self::new()
    }
}
