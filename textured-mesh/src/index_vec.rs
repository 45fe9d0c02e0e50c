use core::mem;

use either::Either;

/// Storage for a buffer's index list, using 16-bit indices until a value is added which
/// does not fit, and 32-bit indices from then on.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub(crate) enum IndexVec {
    /// 16-bit indices.
    U16(Vec<u16>),
    /// 32-bit indices.
    U32(Vec<u32>),
}

impl IndexVec {
    /// Creates an empty [`IndexVec`] without allocating.
    #[inline]
    pub const fn new() -> Self {
        Self::U16(Vec::new())
    }

    /// Creates an empty [`IndexVec`] able to hold `capacity` indices, where the largest
    /// index value is expected to be `max_vertex`.
    #[inline]
    pub fn with_capacity(capacity: usize, max_vertex: usize) -> Self {
        if max_vertex > usize::from(u16::MAX) {
            Self::U32(Vec::with_capacity(capacity))
        } else {
            Self::U16(Vec::with_capacity(capacity))
        }
    }

    /// Returns a slice-reference-like handle to the contents.
    #[inline]
    pub fn as_slice(&self) -> IndexSlice<'_> {
        match self {
            IndexVec::U16(vec) => IndexSlice::U16(vec),
            IndexVec::U32(vec) => IndexSlice::U32(vec),
        }
    }

    /// As per [`Vec::len()`].
    #[inline]
    pub fn len(&self) -> usize {
        self.as_slice().len()
    }

    #[inline]
    pub(crate) fn capacity_bytes(&self) -> usize {
        match self {
            IndexVec::U16(vec) => vec.capacity() * 2,
            IndexVec::U32(vec) => vec.capacity() * 4,
        }
    }
}

impl Default for IndexVec {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl Extend<u32> for IndexVec {
    fn extend<T: IntoIterator<Item = u32>>(&mut self, iter: T) {
        let u16_vec = match self {
            IndexVec::U32(vec) => return vec.extend(iter),
            IndexVec::U16(vec) => vec,
        };
        let mut iter = iter.into_iter();
        for index in iter.by_ref() {
            match u16::try_from(index) {
                Ok(small) => u16_vec.push(small),
                Err(_) => {
                    let widened = mem::take(u16_vec)
                        .into_iter()
                        .map(u32::from)
                        .chain([index])
                        .chain(iter)
                        .collect();
                    *self = IndexVec::U32(widened);
                    return;
                }
            }
        }
    }
}

/// Index data of a [`RenderBuffer`](crate::RenderBuffer), which may use either 16 or 32-bit
/// values.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[expect(clippy::exhaustive_enums)]
pub enum IndexSlice<'a> {
    /// 16-bit indices.
    U16(&'a [u16]),
    /// 32-bit indices.
    U32(&'a [u32]),
}

impl<'a> IndexSlice<'a> {
    /// Returns the number of indices in this slice.
    #[inline]
    pub fn len(&self) -> usize {
        match self {
            IndexSlice::U16(slice) => slice.len(),
            IndexSlice::U32(slice) => slice.len(),
        }
    }

    /// Returns whether this slice is empty (`len() == 0`).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the index data interpreted as bytes in **native endianness**.
    #[inline]
    pub fn as_bytes(&self) -> &'a [u8] {
        match self {
            IndexSlice::U16(slice) => bytemuck::must_cast_slice::<u16, u8>(slice),
            IndexSlice::U32(slice) => bytemuck::must_cast_slice::<u32, u8>(slice),
        }
    }

    /// Returns the indices in this slice, each converted unconditionally to [`u32`].
    #[inline]
    pub fn iter_u32(self) -> impl Iterator<Item = u32> + 'a {
        match self {
            IndexSlice::U16(slice) => Either::Left(slice.iter().copied().map(u32::from)),
            IndexSlice::U32(slice) => Either::Right(slice.iter().copied()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upgrades_only_when_necessary() {
        let mut v = IndexVec::new();
        v.extend([0, 1, 2_u32]);
        assert_eq!(v, IndexVec::U16(vec![0, 1, 2]));

        v.extend([3, 70_000, 5_u32]);
        assert_eq!(v, IndexVec::U32(vec![0, 1, 2, 3, 70_000, 5]));

        v.extend([6]);
        assert_eq!(v.len(), 7);
    }

    #[test]
    fn capacity_hint_chooses_width() {
        assert!(matches!(
            IndexVec::with_capacity(3, 100_000),
            IndexVec::U32(_)
        ));
        assert!(matches!(IndexVec::with_capacity(3, 10), IndexVec::U16(_)));
    }

    /// The iterator borrows only the index data, not the slice handle it came from.
    #[test]
    fn iterator_outlives_slice_handle() {
        fn iter(v: &IndexVec) -> impl Iterator<Item = u32> + '_ {
            v.as_slice().iter_u32()
        }
        let v = IndexVec::U32(vec![3, 70_000]);
        assert_eq!(iter(&v).collect::<Vec<_>>(), vec![3, 70_000]);
    }

    #[test]
    fn bytes_and_widening_iteration() {
        let v = IndexVec::U16(vec![1, 2]);
        assert_eq!(v.as_slice().as_bytes().len(), 4);
        assert_eq!(v.as_slice().iter_u32().collect::<Vec<_>>(), vec![1, 2]);
    }
}
