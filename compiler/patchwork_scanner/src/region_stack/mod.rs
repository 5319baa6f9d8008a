//! Bounded stack of open prompt regions.
//!
//! Each entry is the brace-nesting counter of one region's literal text:
//! it starts at 1 when the region opens, goes up for every `{` in the text
//! and down for every matching `}`. The region's own closing brace is only
//! recognized while the counter is exactly 1.
//!
//! Storage is inline; a push past [`REGION_CAPACITY`] is rejected with
//! [`RegionOverflow`] and leaves the stack untouched.

use smallvec::SmallVec;
use thiserror::Error;

/// Maximum number of simultaneously open prompt regions.
pub const REGION_CAPACITY: usize = 64;

/// Brace counter of a freshly opened region.
pub const INITIAL_DEPTH: u16 = 1;

/// A region push was refused because [`REGION_CAPACITY`] regions are open.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
#[error("prompt regions nested deeper than {}", REGION_CAPACITY)]
pub struct RegionOverflow;

/// Inline stack of per-region brace counters, outermost first.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RegionStack {
    depths: SmallVec<[u16; REGION_CAPACITY]>,
}

impl RegionStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of open regions.
    #[inline]
    pub fn len(&self) -> usize {
        self.depths.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.depths.is_empty()
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.depths.len() >= REGION_CAPACITY
    }

    /// Open a region with counter [`INITIAL_DEPTH`].
    pub fn push(&mut self) -> Result<(), RegionOverflow> {
        self.push_depth(INITIAL_DEPTH)
    }

    /// Open a region with an explicit counter (restoring a snapshot).
    ///
    /// A zero counter is raised to 1.
    pub fn push_depth(&mut self, depth: u16) -> Result<(), RegionOverflow> {
        if self.is_full() {
            return Err(RegionOverflow);
        }
        self.depths.push(depth.max(INITIAL_DEPTH));
        Ok(())
    }

    /// Close the innermost region, returning its counter.
    pub fn pop(&mut self) -> Option<u16> {
        self.depths.pop()
    }

    /// Counter of the innermost region.
    #[inline]
    pub fn top(&self) -> Option<u16> {
        self.depths.last().copied()
    }

    /// Replace the innermost counter. Does nothing when no region is open.
    pub fn set_top(&mut self, depth: u16) {
        if let Some(top) = self.depths.last_mut() {
            *top = depth.max(INITIAL_DEPTH);
        }
    }

    /// Returns `true` if the innermost region may close here.
    #[inline]
    pub fn can_close(&self) -> bool {
        self.top() == Some(INITIAL_DEPTH)
    }

    pub fn clear(&mut self) {
        self.depths.clear();
    }

    /// Counters from outermost to innermost.
    pub fn iter(&self) -> impl Iterator<Item = u16> + '_ {
        self.depths.iter().copied()
    }
}
