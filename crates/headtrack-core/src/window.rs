use crate::CoreError;

/// Fixed-capacity append-only ring buffer.
///
/// Holds the `capacity` most recently appended values; once full, every
/// append evicts the oldest one. Logical index 0 is always the oldest value
/// currently held.
#[derive(Clone, Debug)]
pub struct CircularWindow<T> {
    data: Vec<T>,
    capacity: usize,
    /// Physical index of the oldest element once the buffer has wrapped.
    start: usize,
}

impl<T> CircularWindow<T> {
    /// Create an empty window. Zero capacity is rejected.
    pub fn new(capacity: usize) -> Result<Self, CoreError> {
        if capacity == 0 {
            return Err(CoreError::ZeroCapacity);
        }
        Ok(Self {
            data: Vec::with_capacity(capacity),
            capacity,
            start: 0,
        })
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of values currently held, in `0..=capacity`.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.data.len() == self.capacity
    }

    /// Append a value, overwriting the oldest one when full.
    pub fn append(&mut self, value: T) {
        if self.data.len() < self.capacity {
            self.data.push(value);
        } else {
            self.data[self.start] = value;
            self.start = (self.start + 1) % self.capacity;
        }
    }

    /// The `index`-th oldest value, or `None` past the end.
    #[inline]
    pub fn get(&self, index: usize) -> Option<&T> {
        if index >= self.data.len() {
            return None;
        }
        self.data.get((self.start + index) % self.capacity)
    }

    /// Bounds-checked access to the `index`-th oldest value.
    pub fn at(&self, index: usize) -> Result<&T, CoreError> {
        self.get(index).ok_or(CoreError::OutOfRange {
            index,
            len: self.data.len(),
        })
    }

    /// Most recently appended value.
    pub fn latest(&self) -> Option<&T> {
        self.data.len().checked_sub(1).and_then(|i| self.get(i))
    }

    /// Iterate oldest to newest.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &T> + '_ {
        (0..self.data.len()).map(move |i| &self.data[(self.start + i) % self.capacity])
    }
}
