//! Persistent scanner state and its snapshot encoding.
//!
//! The host attaches a snapshot to every token so an incremental re-parse
//! can resume scanning at any token boundary without replaying the document.
//!
//! # Snapshot layout
//!
//! ```text
//! byte 0        region count N (0..=64)
//! byte 1        interpolation depth
//! byte 2        flags (bit 0 line start, bit 1 nested block pending)
//! bytes 3..     N little-endian u16 brace counters, outermost first
//! ```
//!
//! Decoding accepts any prefix of this layout. The host may hand back stale
//! or truncated snapshots while a document is being edited, so the region
//! count is clamped to the entries actually present.

use bitflags::bitflags;
use smallvec::SmallVec;
use tracing::debug;

use crate::region_stack::{RegionOverflow, RegionStack, REGION_CAPACITY};

/// Bytes before the per-region counters.
pub const HEADER_LEN: usize = 3;

/// Largest snapshot the scanner ever produces.
pub const SERIALIZED_CAPACITY: usize = HEADER_LEN + 2 * REGION_CAPACITY;

/// Owned snapshot bytes; always inline.
pub type Snapshot = SmallVec<[u8; SERIALIZED_CAPACITY]>;

bitflags! {
    /// Boolean scanner state, stored as snapshot byte 2.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
    pub struct StateFlags: u8 {
        /// The cursor is at the first unconsumed column of a physical line.
        const LINE_START = 1 << 0;
        /// The previous token was the nested-block keyword; the next `{`
        /// opens a region even though one is already open.
        const NESTED_BLOCK_PENDING = 1 << 1;
    }
}

/// Everything the scanner remembers between tokens.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ScannerState {
    regions: RegionStack,
    /// Open `${ … }` spans across the whole document.
    interpolation_depth: u8,
    flags: StateFlags,
}

impl ScannerState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assemble a state from its parts.
    pub fn from_parts(regions: RegionStack, interpolation_depth: u8, flags: StateFlags) -> Self {
        Self {
            regions,
            interpolation_depth,
            flags,
        }
    }

    /// Return to the all-zero state of a fresh session.
    pub fn reset(&mut self) {
        self.regions.clear();
        self.interpolation_depth = 0;
        self.flags = StateFlags::empty();
    }

    #[inline]
    pub fn regions(&self) -> &RegionStack {
        &self.regions
    }

    #[inline]
    pub(crate) fn regions_mut(&mut self) -> &mut RegionStack {
        &mut self.regions
    }

    #[inline]
    pub fn in_region(&self) -> bool {
        !self.regions.is_empty()
    }

    #[inline]
    pub fn interpolation_depth(&self) -> u8 {
        self.interpolation_depth
    }

    #[inline]
    pub fn flags(&self) -> StateFlags {
        self.flags
    }

    #[inline]
    pub fn at_line_start(&self) -> bool {
        self.flags.contains(StateFlags::LINE_START)
    }

    #[inline]
    pub fn nested_block_pending(&self) -> bool {
        self.flags.contains(StateFlags::NESTED_BLOCK_PENDING)
    }

    #[inline]
    pub(crate) fn set_line_start(&mut self, value: bool) {
        self.flags.set(StateFlags::LINE_START, value);
    }

    #[inline]
    pub(crate) fn set_nested_block_pending(&mut self, value: bool) {
        self.flags.set(StateFlags::NESTED_BLOCK_PENDING, value);
    }

    /// Open a prompt region. The region's first column counts as a line start.
    pub(crate) fn open_region(&mut self) -> Result<(), RegionOverflow> {
        self.regions.push()?;
        self.set_line_start(true);
        debug!(depth = self.regions.len(), "opened prompt region");
        Ok(())
    }

    /// Close the innermost prompt region.
    pub(crate) fn close_region(&mut self) {
        self.regions.pop();
        debug!(depth = self.regions.len(), "closed prompt region");
    }

    /// Count an opened interpolation. Returns `false` if the counter is saturated.
    pub(crate) fn enter_interpolation(&mut self) -> bool {
        match self.interpolation_depth.checked_add(1) {
            Some(depth) => {
                self.interpolation_depth = depth;
                true
            }
            None => false,
        }
    }

    /// Count a closed interpolation. Returns `false` if none is open.
    pub(crate) fn leave_interpolation(&mut self) -> bool {
        match self.interpolation_depth.checked_sub(1) {
            Some(depth) => {
                self.interpolation_depth = depth;
                true
            }
            None => false,
        }
    }

    // ─── Snapshots ─────────────────────────────────────────────────

    /// Encode the state into `buffer`, returning the number of bytes written.
    ///
    /// A buffer of [`SERIALIZED_CAPACITY`] bytes always fits. A shorter
    /// buffer receives as much of the header and as many whole counters as
    /// fit; decoding that prefix yields a valid, clamped state.
    pub fn serialize(&self, buffer: &mut [u8]) -> usize {
        #[allow(
            clippy::cast_possible_truncation,
            reason = "region count <= REGION_CAPACITY which fits in u8"
        )]
        let header = [
            self.regions.len() as u8,
            self.interpolation_depth,
            self.flags.bits(),
        ];

        let mut written = 0;
        for (slot, byte) in buffer.iter_mut().zip(header) {
            *slot = byte;
            written += 1;
        }
        if written < HEADER_LEN {
            return written;
        }

        for depth in self.regions.iter() {
            let Some(slot) = buffer.get_mut(written..written + 2) else {
                break;
            };
            slot.copy_from_slice(&depth.to_le_bytes());
            written += 2;
        }
        written
    }

    /// Encode the state into an owned snapshot.
    pub fn snapshot(&self) -> Snapshot {
        let mut bytes = [0u8; SERIALIZED_CAPACITY];
        let len = self.serialize(&mut bytes);
        SmallVec::from_slice(&bytes[..len])
    }

    /// Replace the state with the one encoded in `buffer`.
    ///
    /// An empty buffer yields a reset state. Missing header bytes keep their
    /// reset values, the region count is clamped to the complete counters
    /// present (and to [`REGION_CAPACITY`]), zero counters are raised to 1,
    /// and unknown flag bits are dropped.
    pub fn deserialize(&mut self, buffer: &[u8]) {
        self.reset();

        let Some((&count, mut rest)) = buffer.split_first() else {
            return;
        };
        if let Some((&depth, tail)) = rest.split_first() {
            self.interpolation_depth = depth;
            rest = tail;
        }
        if let Some((&bits, tail)) = rest.split_first() {
            self.flags = StateFlags::from_bits_truncate(bits);
            rest = tail;
        }

        for pair in rest.chunks_exact(2).take(usize::from(count)) {
            if self
                .regions
                .push_depth(u16::from_le_bytes([pair[0], pair[1]]))
                .is_err()
            {
                break;
            }
        }

        if self.regions.len() < usize::from(count) {
            debug!(
                declared = count,
                restored = self.regions.len(),
                "clamped truncated scanner snapshot"
            );
        }
    }

    /// Decode a snapshot into a fresh state.
    pub fn from_snapshot(buffer: &[u8]) -> Self {
        let mut state = Self::new();
        state.deserialize(buffer);
        state
    }
}
