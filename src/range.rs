//! Compact byte ranges into a text buffer.
//!
//! Lines point into the original input, chunks point into the joined text
//! of one block. Both use `u32` offsets, so documents are limited to 4GB.

/// Compact range into a byte buffer.
///
/// # Example
/// ```
/// use mkdown::Range;
///
/// let input = b"Meeting notes";
/// let range = Range::new(0, 7);
/// assert_eq!(range.slice(input), b"Meeting");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct Range {
    pub start: u32,
    pub end: u32,
}

const _: () = assert!(std::mem::size_of::<Range>() == 8);

impl Range {
    /// Create a new range.
    #[inline]
    pub const fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    /// Create a range from usize offsets.
    #[inline]
    pub fn from_usize(start: usize, end: usize) -> Self {
        debug_assert!(start <= end);
        debug_assert!(end <= u32::MAX as usize);
        Self {
            start: start as u32,
            end: end as u32,
        }
    }

    /// Empty range at a position.
    #[inline]
    pub const fn empty_at(pos: u32) -> Self {
        Self { start: pos, end: pos }
    }

    /// The bytes this range covers.
    #[inline]
    pub fn slice<'a>(&self, input: &'a [u8]) -> &'a [u8] {
        &input[self.start as usize..self.end as usize]
    }

    #[inline]
    pub const fn len(&self) -> u32 {
        self.end - self.start
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }

    #[inline]
    pub const fn start_usize(&self) -> usize {
        self.start as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_slice() {
        let input = b"[[Meeting Notes]]";
        let r = Range::new(2, 15);
        assert_eq!(r.slice(input), b"Meeting Notes");
        assert_eq!(r.len(), 13);
        assert!(!r.is_empty());
    }

    #[test]
    fn test_range_empty_at() {
        let r = Range::empty_at(4);
        assert!(r.is_empty());
        assert_eq!(r.slice(b"abcdef"), b"");
    }

    #[test]
    fn test_from_usize_keeps_unicode_boundaries() {
        let input = "café au lait".as_bytes();
        let r = Range::from_usize(0, 5);
        assert_eq!(r.slice(input), "café".as_bytes());
        assert_eq!(r.start_usize(), 0);
    }
}
