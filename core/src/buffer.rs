//! Growable typed buffers.
//!
//! [`GrowBuffer<T>`] is the storage primitive behind every mesh attribute and
//! index list produced by the OBJ loader. It behaves like a `Vec<T>` with an
//! explicit, caller-visible capacity policy:
//!
//! - [`GrowBuffer::resize`] sets the capacity to exactly the requested number
//!   of slots and never grows past it.
//! - [`GrowBuffer::write`] and [`GrowBuffer::write_many`] only reallocate when
//!   the append would overflow, doubling the capacity (minimum 8) until the
//!   new elements fit.
//!
//! A buffer that was pre-sized with `resize` and then only appended to within
//! that budget never reallocates. The two-pass OBJ loader relies on this to
//! keep its fill pass allocation-free.
//!
//! Allocation failure aborts the process, as with any `Vec`.
//!
//! # Example
//!
//! ```
//! use wfobj_core::buffer::GrowBuffer;
//!
//! let mut positions = GrowBuffer::<f32>::new();
//! positions.resize(6);
//! positions.write_many(&[0.0, 1.0, 2.0]);
//! positions.write(3.0);
//!
//! assert_eq!(positions.len(), 4);
//! assert_eq!(positions.capacity(), 6);
//! assert_eq!(positions.as_slice(), &[0.0, 1.0, 2.0, 3.0]);
//! ```

/// Smallest capacity a growing buffer allocates.
pub const MIN_CAPACITY: usize = 8;

/// Multiplier applied to the capacity on overflow.
pub const GROWTH_FACTOR: usize = 2;

/// Buffer of signed 32-bit integers.
pub type BufferS32 = GrowBuffer<i32>;
/// Buffer of unsigned 32-bit integers.
pub type BufferU32 = GrowBuffer<u32>;
/// Buffer of 32-bit floats.
pub type BufferF32 = GrowBuffer<f32>;

/// Next capacity after an overflow of `capacity`.
#[inline]
fn grow_capacity(capacity: usize) -> usize {
    MIN_CAPACITY.max(capacity * GROWTH_FACTOR)
}

/// A contiguous, exclusively owned buffer with amortized doubling growth.
///
/// `capacity` is the logical number of allocated slots; the backing `Vec` is
/// always at least that large, so appends within `capacity` never move the
/// storage.
#[derive(Debug)]
pub struct GrowBuffer<T> {
    data: Vec<T>,
    capacity: usize,
}

impl<T> GrowBuffer<T> {
    /// Create an empty buffer with no storage.
    pub const fn new() -> Self {
        Self {
            data: Vec::new(),
            capacity: 0,
        }
    }

    /// Number of live elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check whether the buffer holds no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Number of allocated element slots.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// View the live elements.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Pointer to the start of the storage.
    ///
    /// Stays the same across appends that fit within [`capacity`](Self::capacity).
    #[inline]
    pub fn as_ptr(&self) -> *const T {
        self.data.as_ptr()
    }

    /// Drop all elements but keep the storage for reuse.
    #[inline]
    pub fn clear(&mut self) {
        self.data.clear();
    }

    /// Release the storage and return to the empty state.
    pub fn free(&mut self) {
        self.data = Vec::new();
        self.capacity = 0;
    }

    /// Reallocate to exactly `capacity` slots.
    ///
    /// Elements past the new capacity are discarded. This never applies the
    /// doubling policy; it is the way to pre-size a buffer.
    pub fn resize(&mut self, capacity: usize) {
        self.data.truncate(capacity);
        if capacity > self.data.capacity() {
            self.data.reserve_exact(capacity - self.data.len());
        } else {
            self.data.shrink_to(capacity);
        }
        self.capacity = capacity;
    }

    /// Consume the buffer and return its elements.
    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    /// Make room for `additional` more elements, doubling until they fit.
    fn reserve_for(&mut self, additional: usize) {
        let required = self.data.len() + additional;
        if required <= self.capacity {
            return;
        }

        let mut capacity = self.capacity;
        while required > capacity {
            capacity = grow_capacity(capacity);
        }

        self.data.reserve_exact(capacity - self.data.len());
        self.capacity = capacity;
    }
}

impl<T: Copy> GrowBuffer<T> {
    /// Append a single element.
    #[inline]
    pub fn write(&mut self, value: T) {
        self.reserve_for(1);
        self.data.push(value);
    }

    /// Append a slice of elements as one contiguous copy.
    #[inline]
    pub fn write_many(&mut self, values: &[T]) {
        self.reserve_for(values.len());
        self.data.extend_from_slice(values);
    }
}

impl<T: bytemuck::Pod> GrowBuffer<T> {
    /// View the live elements as raw bytes, ready for a GPU upload.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.data)
    }
}

impl<T> Default for GrowBuffer<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> Clone for GrowBuffer<T> {
    fn clone(&self) -> Self {
        // Vec::clone only keeps `len` slots; the copy must honor the same budget.
        let mut data = Vec::with_capacity(self.capacity);
        data.extend_from_slice(&self.data);
        Self {
            data,
            capacity: self.capacity,
        }
    }
}

impl<T: PartialEq> PartialEq for GrowBuffer<T> {
    fn eq(&self, other: &Self) -> bool {
        self.data == other.data
    }
}

impl<T> std::ops::Deref for GrowBuffer<T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        &self.data
    }
}

impl<T> From<GrowBuffer<T>> for Vec<T> {
    fn from(buffer: GrowBuffer<T>) -> Self {
        buffer.into_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_empty() {
        let buffer = BufferU32::new();
        assert_eq!(buffer.len(), 0);
        assert_eq!(buffer.capacity(), 0);
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_first_write_allocates_minimum() {
        let mut buffer = BufferS32::new();
        buffer.write(-7);
        assert_eq!(buffer.capacity(), MIN_CAPACITY);
        assert_eq!(buffer.as_slice(), &[-7]);
    }

    #[test]
    fn test_write_doubles_on_overflow() {
        let mut buffer = BufferU32::new();
        for i in 0..9 {
            buffer.write(i);
        }
        assert_eq!(buffer.capacity(), 16);
        assert_eq!(buffer.len(), 9);
    }

    #[test]
    fn test_doubling_uses_max_of_minimum_and_twice() {
        let mut buffer = BufferU32::new();
        buffer.resize(5);
        buffer.write_many(&[1, 2, 3, 4, 5]);
        buffer.write(6);
        // max(8, 5 * 2)
        assert_eq!(buffer.capacity(), 10);
    }

    #[test]
    fn test_write_many_grows_until_fit() {
        let mut buffer = BufferF32::new();
        buffer.write_many(&[0.0; 20]);
        // 8 -> 16 -> 32
        assert_eq!(buffer.capacity(), 32);
        assert_eq!(buffer.len(), 20);
    }

    #[test]
    fn test_resize_is_exact() {
        let mut buffer = BufferU32::new();
        buffer.resize(13);
        assert_eq!(buffer.capacity(), 13);
        assert_eq!(buffer.len(), 0);
    }

    #[test]
    fn test_resize_below_count_truncates() {
        let mut buffer = BufferU32::new();
        buffer.write_many(&[1, 2, 3, 4, 5]);
        buffer.resize(2);
        assert_eq!(buffer.capacity(), 2);
        assert_eq!(buffer.as_slice(), &[1, 2]);
    }

    #[test]
    fn test_writes_within_budget_keep_storage() {
        let mut buffer = BufferF32::new();
        buffer.resize(12);
        let ptr = buffer.as_ptr();

        buffer.write_many(&[1.0, 2.0, 3.0]);
        buffer.write(4.0);
        buffer.write_many(&[5.0; 8]);

        assert_eq!(buffer.len(), 12);
        assert_eq!(buffer.capacity(), 12);
        assert_eq!(buffer.as_ptr(), ptr);
    }

    #[test]
    fn test_clear_keeps_capacity() {
        let mut buffer = BufferU32::new();
        buffer.resize(12);
        buffer.write_many(&[1, 2, 3]);
        buffer.clear();
        assert!(buffer.is_empty());
        assert_eq!(buffer.capacity(), 12);
    }

    #[test]
    fn test_free_resets() {
        let mut buffer = BufferU32::new();
        buffer.write_many(&[1, 2, 3]);
        buffer.free();
        assert_eq!(buffer.len(), 0);
        assert_eq!(buffer.capacity(), 0);
    }

    #[test]
    fn test_clone_preserves_budget() {
        let mut buffer = BufferU32::new();
        buffer.resize(9);
        buffer.write_many(&[1, 2, 3]);

        let mut copy = buffer.clone();
        assert_eq!(copy.capacity(), 9);
        let ptr = copy.as_ptr();
        copy.write_many(&[4, 5, 6, 7, 8, 9]);
        assert_eq!(copy.as_ptr(), ptr);
        assert_eq!(copy, {
            let mut expected = BufferU32::new();
            expected.write_many(&[1, 2, 3, 4, 5, 6, 7, 8, 9]);
            expected
        });
    }

    #[test]
    fn test_as_bytes() {
        let mut buffer = BufferU32::new();
        buffer.write_many(&[1, 2]);
        assert_eq!(buffer.as_bytes().len(), 8);
    }
}
