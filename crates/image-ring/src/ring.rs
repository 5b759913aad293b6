//! Drain-Cursor Ring Implementation

/// One image record.
///
/// A record is fully drained iff `drain_offset() == len()`. An empty
/// record (`len() == 0`) has nothing to drain; empty and fully drained
/// look the same to the consumer (`remaining() == 0`).
#[derive(Debug, Clone, Default)]
pub struct ImageSlot {
    /// Compressed image payload of the current occupant
    bytes: Vec<u8>,
    /// Bytes already sent for the current occupant
    drain_offset: usize,
    /// Capture timestamp of the occupant (milliseconds since the epoch)
    captured_at_ms: u64,
}

impl ImageSlot {
    /// Total byte count of the current occupant
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether the slot holds no image at all
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Bytes already sent for the current occupant
    pub fn drain_offset(&self) -> usize {
        self.drain_offset
    }

    /// Bytes of the current occupant still to send
    pub fn remaining(&self) -> usize {
        self.bytes.len() - self.drain_offset
    }

    /// Whether every byte of the occupant has been sent
    pub fn is_drained(&self) -> bool {
        self.drain_offset == self.bytes.len()
    }

    /// Capture timestamp of the occupant (milliseconds since the epoch)
    pub fn captured_at_ms(&self) -> u64 {
        self.captured_at_ms
    }

    /// Not-yet-drained payload of the current occupant
    pub fn undrained(&self) -> &[u8] {
        &self.bytes[self.drain_offset..]
    }

    /// Take `count` bytes at the drain offset and move the offset forward.
    ///
    /// `count` must not exceed `remaining()`.
    pub fn drain(&mut self, count: usize) -> Vec<u8> {
        let start = self.drain_offset;
        self.drain_offset = start + count;
        self.bytes[start..self.drain_offset].to_vec()
    }

    fn clear_drain(&mut self) {
        self.drain_offset = 0;
    }
}

/// Fixed-capacity ring of image records.
///
/// The cursor marks the one record eligible for draining; at most one
/// record is ever in flight. Records are allocated once and reused in
/// place for the life of the ring.
#[derive(Debug)]
pub struct ImageRing {
    slots: Vec<ImageSlot>,
    cursor: usize,
}

impl ImageRing {
    /// Create a ring of `capacity` empty records.
    ///
    /// Capacity is fixed for the life of the ring and must be at least 1.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity >= 1, "ring capacity must be at least 1");
        Self {
            slots: vec![ImageSlot::default(); capacity],
            cursor: 0,
        }
    }

    /// Number of records in the ring
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Index of the record currently eligible for draining
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Record at the drain cursor
    pub fn current(&self) -> &ImageSlot {
        &self.slots[self.cursor]
    }

    /// Mutable record at the drain cursor
    pub fn current_mut(&mut self) -> &mut ImageSlot {
        &mut self.slots[self.cursor]
    }

    /// Overwrite the record at `index` with a fresh image.
    ///
    /// Always succeeds; the drain offset resets to zero. Whatever the
    /// previous occupant had not yet sent is discarded, and the count of
    /// discarded bytes is returned so the caller can account for the loss.
    pub fn install_at(&mut self, index: usize, bytes: Vec<u8>, captured_at_ms: u64) -> usize {
        let slot = &mut self.slots[index];
        let discarded = slot.remaining();
        slot.bytes = bytes;
        slot.drain_offset = 0;
        slot.captured_at_ms = captured_at_ms;
        discarded
    }

    /// Move the cursor to the next record and clear its drain state.
    ///
    /// Called by the consumer once the record at the cursor is fully
    /// drained.
    pub fn advance_cursor(&mut self) {
        self.cursor = (self.cursor + 1) % self.slots.len();
        self.slots[self.cursor].clear_drain();
    }
}
