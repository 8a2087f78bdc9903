use std::cmp::Ordering;
use std::fmt::{self, Debug};
use std::hash::{Hash, Hasher};
use std::iter::FusedIterator;
use std::mem::{self, ManuallyDrop};
use std::ops::{Add, AddAssign, Deref, DerefMut, Range, Sub, SubAssign};
use std::ptr;
use std::slice;

use crate::alloc::{Allocator, AllocatorTraits, DifferenceType, Global};
use crate::error::{ContainerError, Result};
use crate::iter::{tag, BidirectionalCursor, Cursor, RandomAccessCursor};
use crate::raw::RawBuf;

// Capacity of the first block, and the factor organic growth multiplies by after that.
const FIRST_GROWTH: usize = 2;
const GROWTH_FACTOR: usize = 2;

/// A contiguous growable array, generic over its allocator.
///
/// A vector owns a single block of `capacity()` slots, of which the first `len()` hold live
/// values and the rest are raw memory. The block is allocated lazily on first growth. When
/// pushes run out of room the capacity doubles (0, 2, 4, 8, ...), so a sequence of `n` pushes
/// relocates O(n) elements in total. Explicit requests such as [`reserve`](Vector::reserve) or
/// [`resize`](Vector::resize) grow to exactly the requested size instead.
///
/// A vector dereferences to a slice, so indexing, slicing, and all of the slice methods are
/// available directly. Indexing past `len()` panics; [`at`](Vector::at) reports the same
/// condition as an error instead.
///
/// Positional operations (`insert`, `erase`, ...) take and return indices. Cursors obtained from
/// [`begin`](Vector::begin) and [`end`](Vector::end) borrow the vector, so any operation that
/// could move or remove elements cannot run while one is alive.
pub struct Vector<T, A: Allocator = Global> {
    buf: RawBuf<T, A>,
    len: usize,
}

impl<T> Vector<T> {
    /// Makes a new, empty vector. No memory is allocated until the first element arrives.
    ///
    /// # Examples
    ///
    /// ```
    /// use rtl_containers::Vector;
    ///
    /// let v: Vector<i32> = Vector::new();
    /// assert!(v.is_empty());
    /// assert_eq!(v.capacity(), 0);
    /// ```
    pub const fn new() -> Self {
        Vector::new_in(Global)
    }

    /// Makes a vector of `n` default values.
    pub fn with_len(n: usize) -> Self
    where
        T: Default,
    {
        let mut v = Vector::new();
        v.resize_default(n);
        v
    }

    /// Makes a vector of `n` clones of `value`.
    ///
    /// # Examples
    ///
    /// ```
    /// use rtl_containers::Vector;
    ///
    /// let v = Vector::from_elem(3, "ab");
    /// assert_eq!(v, ["ab", "ab", "ab"]);
    /// assert_eq!(v.capacity(), 3);
    /// ```
    pub fn from_elem(n: usize, value: T) -> Self
    where
        T: Clone,
    {
        Vector::from_elem_in(n, value, Global)
    }
}

impl<T, A: Allocator> Vector<T, A> {
    /// Makes a new, empty vector that will allocate from `alloc`.
    pub const fn new_in(alloc: A) -> Self {
        Vector {
            buf: RawBuf::new_in(alloc),
            len: 0,
        }
    }

    pub fn from_elem_in(n: usize, value: T, alloc: A) -> Self
    where
        T: Clone,
    {
        let mut v = Vector::new_in(alloc);
        v.resize(n, value);
        v
    }

    pub fn allocator(&self) -> &A {
        self.buf.allocator()
    }

    /// Returns the number of live elements.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns the number of slots in the current block, live or not.
    pub fn capacity(&self) -> usize {
        self.buf.capacity()
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the largest length the allocator could ever give this vector.
    pub fn max_size(&self) -> usize {
        self.allocator().max_size::<T>()
    }

    /// Grows the block to exactly `n` slots if it is currently smaller. The length is unchanged.
    ///
    /// # Panics
    ///
    /// Panics if `n` exceeds [`max_size`](Vector::max_size) or the allocator fails.
    ///
    /// # Examples
    ///
    /// ```
    /// use rtl_containers::Vector;
    ///
    /// let mut v = Vector::from_elem(2, 0u8);
    /// v.reserve(10);
    /// assert_eq!(v.capacity(), 10);
    /// v.reserve(4);
    /// assert_eq!(v.capacity(), 10);
    /// assert_eq!(v.len(), 2);
    /// ```
    pub fn reserve(&mut self, n: usize) {
        if n > self.capacity() {
            self.buf.reallocate(self.len, n);
        }
    }

    /// Like [`reserve`](Vector::reserve), but reports failure instead of panicking.
    pub fn try_reserve(&mut self, n: usize) -> Result<()> {
        if n > self.capacity() {
            self.buf.try_reallocate(self.len, n)?;
        }
        Ok(())
    }

    /// Reallocates the block to exactly `len()` slots. An empty vector releases its block.
    pub fn shrink_to_fit(&mut self) {
        if self.capacity() != self.len {
            self.buf.reallocate(self.len, self.len);
        }
    }

    // Makes room for `additional` more elements, growing geometrically.
    fn grow_for(&mut self, additional: usize) {
        let cap = self.capacity();
        let required = match self.len.checked_add(additional) {
            Some(required) => required,
            None => panic!(
                "{}",
                ContainerError::CapacityOverflow { requested: usize::MAX, max: self.max_size() }
            ),
        };
        if required <= cap {
            return;
        }
        let doubled = if cap == 0 { FIRST_GROWTH } else { cap.saturating_mul(GROWTH_FACTOR) };
        let new_cap = doubled.min(self.max_size()).max(required);
        self.buf.reallocate(self.len, new_cap);
    }

    /// Resizes to `n` elements, filling new slots with clones of `value`.
    ///
    /// Growing reserves exactly `n` slots first; shrinking destroys the trailing elements. The
    /// capacity never shrinks.
    ///
    /// # Examples
    ///
    /// ```
    /// use rtl_containers::Vector;
    ///
    /// let mut v = Vector::from_elem(2, 1);
    /// v.resize(4, 7);
    /// assert_eq!(v, [1, 1, 7, 7]);
    /// v.resize(1, 0);
    /// assert_eq!(v, [1]);
    /// assert_eq!(v.capacity(), 4);
    /// ```
    pub fn resize(&mut self, n: usize, value: T)
    where
        T: Clone,
    {
        self.resize_with(n, || value.clone())
    }

    /// Resizes to `n` elements, filling new slots with `T::default()`.
    pub fn resize_default(&mut self, n: usize)
    where
        T: Default,
    {
        self.resize_with(n, T::default)
    }

    /// Resizes to `n` elements, filling new slots with values returned by `f`.
    pub fn resize_with<F: FnMut() -> T>(&mut self, n: usize, mut f: F) {
        if n > self.len {
            self.reserve(n);
            while self.len < n {
                unsafe {
                    self.allocator().construct(self.buf.slot(self.len), f());
                }
                self.len += 1;
            }
        } else {
            self.truncate(n);
        }
    }

    /// Destroys trailing elements until at most `n` remain.
    pub fn truncate(&mut self, n: usize) {
        while self.len > n {
            self.len -= 1;
            unsafe {
                self.allocator().destroy(self.buf.slot(self.len));
            }
        }
    }

    /// Destroys every element, keeping the block.
    pub fn clear(&mut self) {
        self.truncate(0)
    }

    /// Returns the element at `index`, or `OutOfBounds`.
    ///
    /// # Examples
    ///
    /// ```
    /// use rtl_containers::{ContainerError, Vector};
    ///
    /// let v = Vector::from_elem(2, 'x');
    /// assert_eq!(v.at(1), Ok(&'x'));
    /// assert_eq!(v.at(2), Err(ContainerError::OutOfBounds { index: 2, len: 2 }));
    /// ```
    pub fn at(&self, index: usize) -> Result<&T> {
        let len = self.len;
        self.as_slice().get(index).ok_or(ContainerError::OutOfBounds { index, len })
    }

    pub fn at_mut(&mut self, index: usize) -> Result<&mut T> {
        let len = self.len;
        self.as_mut_slice().get_mut(index).ok_or(ContainerError::OutOfBounds { index, len })
    }

    pub fn front(&self) -> Option<&T> {
        self.as_slice().first()
    }

    pub fn front_mut(&mut self) -> Option<&mut T> {
        self.as_mut_slice().first_mut()
    }

    pub fn back(&self) -> Option<&T> {
        self.as_slice().last()
    }

    pub fn back_mut(&mut self) -> Option<&mut T> {
        self.as_mut_slice().last_mut()
    }

    /// Pointer to the start of the block. Dangling when nothing has been allocated.
    pub fn as_ptr(&self) -> *const T {
        self.buf.ptr()
    }

    pub fn as_mut_ptr(&mut self) -> *mut T {
        self.buf.ptr()
    }

    pub fn as_slice(&self) -> &[T] {
        unsafe { slice::from_raw_parts(self.buf.ptr(), self.len) }
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        unsafe { slice::from_raw_parts_mut(self.buf.ptr(), self.len) }
    }

    /// Appends `value`, doubling the capacity if the block is full.
    ///
    /// # Examples
    ///
    /// ```
    /// use rtl_containers::Vector;
    ///
    /// let mut v = Vector::new();
    /// v.push_back(1);
    /// assert_eq!(v.capacity(), 2);
    /// v.push_back(2);
    /// v.push_back(3);
    /// assert_eq!(v.capacity(), 4);
    /// assert_eq!(v, [1, 2, 3]);
    /// ```
    pub fn push_back(&mut self, value: T) {
        if self.len == self.capacity() {
            self.grow_for(1);
        }
        unsafe {
            self.allocator().construct(self.buf.slot(self.len), value);
        }
        self.len += 1;
    }

    /// Removes the last element and returns it, or `None` if the vector is empty.
    ///
    /// The value is moved out to the caller, so the allocator's `destroy` is not called for it.
    pub fn pop_back(&mut self) -> Option<T> {
        if self.len == 0 {
            return None;
        }
        self.len -= 1;
        unsafe { Some(ptr::read(self.buf.ptr().add(self.len))) }
    }

    /// Inserts `value` at `index`, shifting everything after it one slot to the right. Returns
    /// the index of the inserted element.
    ///
    /// # Panics
    ///
    /// Panics if `index > len()`.
    ///
    /// # Examples
    ///
    /// ```
    /// use rtl_containers::Vector;
    ///
    /// let mut v: Vector<_> = [1, 3].into();
    /// assert_eq!(v.insert(1, 2), 1);
    /// assert_eq!(v, [1, 2, 3]);
    /// ```
    pub fn insert(&mut self, index: usize, value: T) -> usize {
        let len = self.len;
        assert!(index <= len, "insertion index {index} out of range for length {len}");
        if len == self.capacity() {
            self.grow_for(1);
        }
        unsafe {
            let p = self.buf.ptr().add(index);
            ptr::copy(p, p.add(1), len - index);
            self.allocator().construct(self.buf.slot(index), value);
        }
        self.len += 1;
        index
    }

    /// Inserts `n` clones of `value` at `index`. Returns `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index > len()`.
    pub fn insert_n(&mut self, index: usize, n: usize, value: T) -> usize
    where
        T: Clone,
    {
        self.insert_iter(index, std::iter::repeat(value).take(n))
    }

    /// Inserts every item of `iter` at `index`, in order. Returns `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index > len()`.
    ///
    /// # Examples
    ///
    /// ```
    /// use rtl_containers::Vector;
    ///
    /// let mut v: Vector<_> = [1, 5].into();
    /// v.insert_iter(1, 2..5);
    /// assert_eq!(v, [1, 2, 3, 4, 5]);
    /// ```
    pub fn insert_iter<I: IntoIterator<Item = T>>(&mut self, index: usize, iter: I) -> usize {
        let len = self.len;
        assert!(index <= len, "insertion index {index} out of range for length {len}");
        self.extend(iter);
        self.as_mut_slice()[index..].rotate_left(len - index);
        index
    }

    /// Removes the element at `index`, shifting everything after it one slot to the left.
    /// Returns the index of the element that now follows the removed one.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len()`.
    ///
    /// # Examples
    ///
    /// ```
    /// use rtl_containers::Vector;
    ///
    /// let mut v: Vector<_> = ['a', 'b', 'c', 'd'].into();
    /// assert_eq!(v.erase(1), 1);
    /// assert_eq!(v, ['a', 'c', 'd']);
    /// ```
    pub fn erase(&mut self, index: usize) -> usize {
        let len = self.len;
        assert!(index < len, "removal index {index} out of range for length {len}");
        unsafe {
            // A panicking destructor leaks the tail instead of exposing a dead slot.
            self.len = index;
            self.allocator().destroy(self.buf.slot(index));
            let p = self.buf.ptr().add(index);
            ptr::copy(p.add(1), p, len - index - 1);
        }
        self.len = len - 1;
        index
    }

    /// Removes the elements in `range`, closing the gap. Returns `range.start`.
    ///
    /// # Panics
    ///
    /// Panics if the range is decreasing or ends past `len()`.
    pub fn erase_range(&mut self, range: Range<usize>) -> usize {
        let Range { start, end } = range;
        let len = self.len;
        assert!(start <= end, "removal range starts at {start} but ends at {end}");
        assert!(end <= len, "removal range end {end} out of range for length {len}");
        unsafe {
            // A panicking destructor leaks the tail instead of exposing dead slots.
            self.len = start;
            for i in start..end {
                self.allocator().destroy(self.buf.slot(i));
            }
            let p = self.buf.ptr();
            ptr::copy(p.add(end), p.add(start), len - end);
        }
        self.len = len - (end - start);
        start
    }

    /// Exchanges contents, capacity and allocator with `other`.
    pub fn swap(&mut self, other: &mut Self) {
        mem::swap(self, other)
    }

    /// A cursor at the first element.
    pub fn begin(&self) -> Position<'_, T> {
        Position { seq: self.as_slice(), index: 0 }
    }

    /// A cursor one past the last element.
    ///
    /// # Examples
    ///
    /// ```
    /// use rtl_containers::iter::distance;
    /// use rtl_containers::Vector;
    ///
    /// let v: Vector<_> = [4, 5, 6].into();
    /// assert_eq!(distance(&v.begin(), &v.end()), 3);
    /// assert_eq!((v.end() - 1).get(), Some(&6));
    /// ```
    pub fn end(&self) -> Position<'_, T> {
        Position { seq: self.as_slice(), index: self.len }
    }
}

/// Exchanges the contents of two vectors.
pub fn swap<T, A: Allocator>(a: &mut Vector<T, A>, b: &mut Vector<T, A>) {
    a.swap(b)
}

impl<T, A: Allocator> Drop for Vector<T, A> {
    fn drop(&mut self) {
        self.clear();
    }
}

impl<T, A: Allocator> Deref for Vector<T, A> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T, A: Allocator> DerefMut for Vector<T, A> {
    fn deref_mut(&mut self) -> &mut [T] {
        self.as_mut_slice()
    }
}

impl<T: Clone, A: Allocator + Clone> Clone for Vector<T, A> {
    fn clone(&self) -> Self {
        let mut copy = Vector::new_in(self.allocator().clone());
        copy.reserve(self.len);
        copy.extend(self.iter().cloned());
        copy
    }

    fn clone_from(&mut self, source: &Self) {
        self.truncate(source.len);
        let (init, tail) = source.split_at(self.len);
        self.clone_from_slice(init);
        self.reserve(source.len);
        self.extend(tail.iter().cloned());
    }
}

impl<T> Default for Vector<T> {
    fn default() -> Self {
        Vector::new()
    }
}

impl<T: Debug, A: Allocator> Debug for Vector<T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T: PartialEq, A: Allocator> PartialEq for Vector<T, A> {
    fn eq(&self, other: &Self) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: PartialEq, A: Allocator, const M: usize> PartialEq<[T; M]> for Vector<T, A> {
    fn eq(&self, other: &[T; M]) -> bool {
        self.as_slice() == other
    }
}

impl<T: Eq, A: Allocator> Eq for Vector<T, A> {}

impl<T: PartialOrd, A: Allocator> PartialOrd for Vector<T, A> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.as_slice().partial_cmp(other.as_slice())
    }
}

impl<T: Ord, A: Allocator> Ord for Vector<T, A> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.as_slice().cmp(other.as_slice())
    }
}

impl<T: Hash, A: Allocator> Hash for Vector<T, A> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_slice().hash(state)
    }
}

impl<T, A: Allocator> Extend<T> for Vector<T, A> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        let iter = iter.into_iter();
        self.grow_for(iter.size_hint().0);
        for value in iter {
            self.push_back(value);
        }
    }
}

impl<'a, T: Copy + 'a, A: Allocator> Extend<&'a T> for Vector<T, A> {
    fn extend<I: IntoIterator<Item = &'a T>>(&mut self, iter: I) {
        self.extend(iter.into_iter().copied())
    }
}

impl<T> FromIterator<T> for Vector<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut v = Vector::new();
        v.extend(iter);
        v
    }
}

impl<T: Clone> From<&[T]> for Vector<T> {
    fn from(values: &[T]) -> Self {
        let mut v = Vector::new();
        v.reserve(values.len());
        v.extend(values.iter().cloned());
        v
    }
}

impl<T, const M: usize> From<[T; M]> for Vector<T> {
    fn from(values: [T; M]) -> Self {
        let mut v = Vector::new();
        v.reserve(M);
        v.extend(values);
        v
    }
}

impl<'a, T, A: Allocator> IntoIterator for &'a Vector<T, A> {
    type Item = &'a T;
    type IntoIter = slice::Iter<'a, T>;

    fn into_iter(self) -> slice::Iter<'a, T> {
        self.iter()
    }
}

impl<'a, T, A: Allocator> IntoIterator for &'a mut Vector<T, A> {
    type Item = &'a mut T;
    type IntoIter = slice::IterMut<'a, T>;

    fn into_iter(self) -> slice::IterMut<'a, T> {
        self.iter_mut()
    }
}

impl<T, A: Allocator> IntoIterator for Vector<T, A> {
    type Item = T;
    type IntoIter = IntoIter<T, A>;

    fn into_iter(self) -> IntoIter<T, A> {
        let me = ManuallyDrop::new(self);
        IntoIter {
            // SAFETY: `me` is never dropped, so the block now has exactly one owner.
            buf: unsafe { ptr::read(&me.buf) },
            start: 0,
            end: me.len,
        }
    }
}

/// An owning iterator over the elements of a [`Vector`].
pub struct IntoIter<T, A: Allocator = Global> {
    buf: RawBuf<T, A>,
    start: usize,
    end: usize,
}

impl<T, A: Allocator> Iterator for IntoIter<T, A> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        if self.start == self.end {
            return None;
        }
        let value = unsafe { ptr::read(self.buf.ptr().add(self.start)) };
        self.start += 1;
        Some(value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.end - self.start;
        (n, Some(n))
    }
}

impl<T, A: Allocator> DoubleEndedIterator for IntoIter<T, A> {
    fn next_back(&mut self) -> Option<T> {
        if self.start == self.end {
            return None;
        }
        self.end -= 1;
        unsafe { Some(ptr::read(self.buf.ptr().add(self.end))) }
    }
}

impl<T, A: Allocator> ExactSizeIterator for IntoIter<T, A> {}
impl<T, A: Allocator> FusedIterator for IntoIter<T, A> {}

impl<T, A: Allocator> Drop for IntoIter<T, A> {
    fn drop(&mut self) {
        while self.start < self.end {
            let idx = self.start;
            self.start += 1;
            unsafe {
                self.buf.allocator().destroy(self.buf.slot(idx));
            }
        }
    }
}

/// A random-access cursor into a vector's live elements.
///
/// Positions range over `0..=len`; the last one is the "end" position and has no element.
/// Moving outside that range panics.
pub struct Position<'a, T> {
    seq: &'a [T],
    index: usize,
}

impl<'a, T> Position<'a, T> {
    pub fn index(&self) -> usize {
        self.index
    }

    /// The element at this position, or `None` at the end position.
    pub fn get(&self) -> Option<&'a T> {
        self.seq.get(self.index)
    }

    fn moved_by(&self, n: DifferenceType) -> usize {
        match self.index.checked_add_signed(n) {
            Some(index) if index <= self.seq.len() => index,
            _ => panic!(
                "cannot move position {} by {} in a sequence of length {}",
                self.index,
                n,
                self.seq.len()
            ),
        }
    }
}

impl<'a, T> Clone for Position<'a, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, T> Copy for Position<'a, T> {}

impl<'a, T> PartialEq for Position<'a, T> {
    fn eq(&self, other: &Self) -> bool {
        debug_assert!(ptr::eq(self.seq, other.seq), "comparing positions of different sequences");
        self.index == other.index
    }
}

impl<'a, T> Eq for Position<'a, T> {}

impl<'a, T> PartialOrd for Position<'a, T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<'a, T> Ord for Position<'a, T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.index.cmp(&other.index)
    }
}

impl<'a, T> Debug for Position<'a, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Position")
            .field("index", &self.index)
            .field("len", &self.seq.len())
            .finish()
    }
}

impl<'a, T> Cursor for Position<'a, T> {
    type Value = T;
    type Category = tag::RandomAccess;

    fn increment(&mut self) {
        self.index = self.moved_by(1);
    }
}

impl<'a, T> BidirectionalCursor for Position<'a, T> {
    fn decrement(&mut self) {
        self.index = self.moved_by(-1);
    }
}

impl<'a, T> RandomAccessCursor for Position<'a, T> {
    fn jump(&mut self, n: DifferenceType) {
        self.index = self.moved_by(n);
    }

    fn offset_from(&self, origin: &Self) -> DifferenceType {
        self.index as DifferenceType - origin.index as DifferenceType
    }
}

impl<'a, T> AddAssign<DifferenceType> for Position<'a, T> {
    fn add_assign(&mut self, n: DifferenceType) {
        self.jump(n)
    }
}

impl<'a, T> SubAssign<DifferenceType> for Position<'a, T> {
    fn sub_assign(&mut self, n: DifferenceType) {
        self.jump(-n)
    }
}

impl<'a, T> Add<DifferenceType> for Position<'a, T> {
    type Output = Self;

    fn add(mut self, n: DifferenceType) -> Self {
        self += n;
        self
    }
}

impl<'a, T> Sub<DifferenceType> for Position<'a, T> {
    type Output = Self;

    fn sub(mut self, n: DifferenceType) -> Self {
        self -= n;
        self
    }
}

impl<'a, T> Sub for Position<'a, T> {
    type Output = DifferenceType;

    fn sub(self, origin: Self) -> DifferenceType {
        self.offset_from(&origin)
    }
}
