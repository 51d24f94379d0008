//! Ring Buffer
//!
//! Fixed-capacity circular history of `f32` samples. Writers append whole
//! vectors; readers copy out a contiguous window measured back from the most
//! recent write, with the wrap handled here instead of at every call site.

/// Circular sample history
#[derive(Debug, Clone)]
pub struct RingBuffer {
    /// Internal storage
    data: Vec<f32>,
    /// Next write position
    write_pos: usize,
}

impl RingBuffer {
    /// Create a zero-filled buffer holding `capacity` samples
    pub fn new(capacity: usize) -> Self {
        Self::filled(capacity, 0.0)
    }

    /// Create a buffer whose history reads as `value` until overwritten
    pub fn filled(capacity: usize, value: f32) -> Self {
        assert!(capacity > 0, "ring buffer capacity must be non-zero");
        Self {
            data: vec![value; capacity],
            write_pos: 0,
        }
    }

    /// Buffer capacity in samples
    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// Zero the contents and rewind the write cursor
    pub fn clear(&mut self) {
        self.data.fill(0.0);
        self.write_pos = 0;
    }

    /// Append a vector, overwriting the oldest samples
    pub fn write_vector(&mut self, vector: &[f32]) {
        let capacity = self.data.len();
        debug_assert!(vector.len() <= capacity);

        let first = vector.len().min(capacity - self.write_pos);
        let (head, tail) = vector.split_at(first);
        self.data[self.write_pos..self.write_pos + first].copy_from_slice(head);
        self.data[..tail.len()].copy_from_slice(tail);

        self.write_pos = (self.write_pos + vector.len()) % capacity;
    }

    /// Copy a window into `out`, in chronological order
    ///
    /// The window ends `end_offset` samples before the most recent write, so an
    /// offset of zero includes the newest sample.
    pub fn read_window_into(&self, out: &mut [f32], end_offset: usize) {
        let capacity = self.data.len();
        let len = out.len();
        assert!(
            len + end_offset <= capacity,
            "window of {} ending {} back exceeds capacity {}",
            len,
            end_offset,
            capacity
        );

        let end = (self.write_pos + capacity - end_offset) % capacity;
        let start = (end + capacity - len) % capacity;

        let first = len.min(capacity - start);
        out[..first].copy_from_slice(&self.data[start..start + first]);
        out[first..].copy_from_slice(&self.data[..len - first]);
    }

    /// Owned copy of a window, see [`RingBuffer::read_window_into`]
    pub fn read_window(&self, len: usize, end_offset: usize) -> Vec<f32> {
        let mut out = vec![0.0; len];
        self.read_window_into(&mut out, end_offset);
        out
    }

    /// The newest `N` samples
    pub fn latest<const N: usize>(&self) -> [f32; N] {
        let mut out = [0.0; N];
        self.read_window_into(&mut out, 0);
        out
    }
}
