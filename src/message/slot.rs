//! Slot: Single-use ownership transfer cell.
//!
//! A message that hands a producer-built resource to the consumer stores it in
//! a `Slot`. The first `accept` moves the resource out; every later call
//! returns `None`, so a GPU-bound resource can never end up owned twice.

/// Holds a move-only payload until the consumer accepts it.
#[derive(Debug)]
pub struct Slot<T> {
    value: Option<T>,
}

impl<T> Slot<T> {
    /// Create a slot holding `value`.
    #[inline]
    pub const fn new(value: T) -> Self {
        Self { value: Some(value) }
    }

    /// Take the payload out of the slot.
    ///
    /// Returns `Some` exactly once per slot.
    #[inline]
    pub fn accept(&mut self) -> Option<T> {
        self.value.take()
    }

    /// Borrow the payload without taking it.
    #[inline]
    pub const fn peek(&self) -> Option<&T> {
        self.value.as_ref()
    }

    /// Check whether the payload has already been accepted.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.value.is_none()
    }
}

impl<T> From<T> for Slot<T> {
    fn from(value: T) -> Self {
        Self::new(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_accept_once() {
        let mut slot = Slot::new(vec![1u32, 2, 3]);
        assert!(!slot.is_empty());
        assert_eq!(slot.peek().map(Vec::len), Some(3));

        assert_eq!(slot.accept(), Some(vec![1, 2, 3]));
        assert!(slot.is_empty());
        assert_eq!(slot.accept(), None);
        assert!(slot.peek().is_none());
    }

    #[test]
    fn test_slot_accept_moves_heap_storage() {
        let data = vec![0u8; 16];
        let ptr = data.as_ptr();
        let mut slot = Slot::from(data);

        let taken = slot.accept().unwrap();
        assert_eq!(taken.as_ptr(), ptr);
        assert!(slot.accept().is_none());
    }
}
