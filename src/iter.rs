//! Position-style iterators and the generic positional algorithms.
//!
//! A [`Cursor`] is a position within a sequence rather than a stream of items: it can be copied,
//! compared and stepped. What else it can do is announced by its category tag, and
//! [`advance`]/[`distance`] pick their algorithm from that tag at compile time.
//!
//! Distances between cursors are always [`DifferenceType`]; there is no per-cursor difference
//! type to look up.

use std::mem;

use crate::alloc::DifferenceType;

/// Category tags. These carry no data and are never constructed.
pub mod tag {
    pub enum Input {}
    pub enum Output {}
    pub enum Forward {}
    pub enum Bidirectional {}
    pub enum RandomAccess {}
}

/// Implemented by every category tag.
pub trait Category: 'static {
    const NAME: &'static str;
}

pub trait InputCategory: Category {}
pub trait ForwardCategory: InputCategory {}
pub trait BidirectionalCategory: ForwardCategory {}
pub trait RandomAccessCategory: BidirectionalCategory {}
pub trait OutputCategory: Category {}

impl Category for tag::Input {
    const NAME: &'static str = "input";
}
impl Category for tag::Output {
    const NAME: &'static str = "output";
}
impl Category for tag::Forward {
    const NAME: &'static str = "forward";
}
impl Category for tag::Bidirectional {
    const NAME: &'static str = "bidirectional";
}
impl Category for tag::RandomAccess {
    const NAME: &'static str = "random access";
}

impl InputCategory for tag::Input {}
impl OutputCategory for tag::Output {}

impl InputCategory for tag::Forward {}
impl ForwardCategory for tag::Forward {}

impl InputCategory for tag::Bidirectional {}
impl ForwardCategory for tag::Bidirectional {}
impl BidirectionalCategory for tag::Bidirectional {}

impl InputCategory for tag::RandomAccess {}
impl ForwardCategory for tag::RandomAccess {}
impl BidirectionalCategory for tag::RandomAccess {}
impl RandomAccessCategory for tag::RandomAccess {}

/// A position within a sequence that can step forward.
pub trait Cursor: Clone + PartialEq {
    type Value;
    type Category: Category;

    fn increment(&mut self);
}

pub trait BidirectionalCursor: Cursor {
    fn decrement(&mut self);
}

pub trait RandomAccessCursor: BidirectionalCursor {
    /// Moves by `n` positions in one step. `n` may be negative.
    fn jump(&mut self, n: DifferenceType);

    /// Signed number of positions from `origin` to `self`.
    fn offset_from(&self, origin: &Self) -> DifferenceType;
}

// Lookups keyed by cursor type.
pub type ValueOf<I> = <I as Cursor>::Value;
pub type CategoryOf<I> = <I as Cursor>::Category;
pub type PointerOf<I> = *const <I as Cursor>::Value;
pub type ReferenceOf<'a, I> = &'a <I as Cursor>::Value;

// Raw pointers are random access. Stepping uses wrapping arithmetic and never reads through the
// pointer, so it is safe; only dereferencing the result is not. Pointers to zero-sized values
// never move, so they cannot measure distances.
macro_rules! pointer_cursor {
    ($ptr: ty) => {
        impl<T> Cursor for $ptr {
            type Value = T;
            type Category = tag::RandomAccess;

            fn increment(&mut self) {
                *self = self.wrapping_add(1);
            }
        }

        impl<T> BidirectionalCursor for $ptr {
            fn decrement(&mut self) {
                *self = self.wrapping_sub(1);
            }
        }

        impl<T> RandomAccessCursor for $ptr {
            fn jump(&mut self, n: DifferenceType) {
                *self = self.wrapping_offset(n);
            }

            fn offset_from(&self, origin: &Self) -> DifferenceType {
                debug_assert!(
                    mem::size_of::<T>() != 0,
                    "cannot measure the distance between pointers to zero-sized values"
                );
                let bytes = (*self as usize).wrapping_sub(*origin as usize) as isize;
                bytes / mem::size_of::<T>().max(1) as isize
            }
        }
    };
}

pointer_cursor!(*const T);
pointer_cursor!(*mut T);

/// The traversal strategy a category tag selects for a cursor type.
pub trait Traversal<I: Cursor> {
    fn advance(it: &mut I, n: DifferenceType);
    fn distance(first: &I, last: &I) -> DifferenceType;
}

fn step_forward<I: Cursor>(it: &mut I, n: DifferenceType) {
    assert!(n >= 0, "cannot move a {} cursor backwards by {}", <I::Category as Category>::NAME, -n);
    for _ in 0..n {
        it.increment();
    }
}

fn count_forward<I: Cursor>(first: &I, last: &I) -> DifferenceType {
    let mut it = first.clone();
    let mut n = 0;
    while it != *last {
        it.increment();
        n += 1;
    }
    n
}

impl<I: Cursor<Category = tag::Input>> Traversal<I> for tag::Input {
    fn advance(it: &mut I, n: DifferenceType) {
        step_forward(it, n)
    }

    fn distance(first: &I, last: &I) -> DifferenceType {
        count_forward(first, last)
    }
}

impl<I: Cursor<Category = tag::Forward>> Traversal<I> for tag::Forward {
    fn advance(it: &mut I, n: DifferenceType) {
        step_forward(it, n)
    }

    fn distance(first: &I, last: &I) -> DifferenceType {
        count_forward(first, last)
    }
}

impl<I: BidirectionalCursor<Category = tag::Bidirectional>> Traversal<I> for tag::Bidirectional {
    fn advance(it: &mut I, n: DifferenceType) {
        if n >= 0 {
            for _ in 0..n {
                it.increment();
            }
        } else {
            for _ in n..0 {
                it.decrement();
            }
        }
    }

    fn distance(first: &I, last: &I) -> DifferenceType {
        count_forward(first, last)
    }
}

impl<I: RandomAccessCursor<Category = tag::RandomAccess>> Traversal<I> for tag::RandomAccess {
    fn advance(it: &mut I, n: DifferenceType) {
        it.jump(n)
    }

    fn distance(first: &I, last: &I) -> DifferenceType {
        last.offset_from(first)
    }
}

/// Moves `it` by `n` positions.
///
/// Random-access cursors jump in one step. Bidirectional cursors step one position at a time in
/// either direction. Forward and input cursors only step forward.
///
/// # Panics
///
/// Panics if `n` is negative and the cursor is not at least bidirectional.
///
/// # Examples
///
/// ```
/// use rtl_containers::iter::advance;
///
/// let data = [1, 2, 3, 4];
/// let mut p = data.as_ptr();
/// advance(&mut p, 3);
/// assert_eq!(unsafe { *p }, 4);
/// ```
pub fn advance<I>(it: &mut I, n: DifferenceType)
where
    I: Cursor,
    I::Category: Traversal<I>,
{
    <I::Category as Traversal<I>>::advance(it, n)
}

/// Number of increments needed to get from `first` to `last`.
///
/// Constant time for random-access cursors. Everything else walks from `first` and never
/// returns if `last` cannot be reached that way.
pub fn distance<I>(first: &I, last: &I) -> DifferenceType
where
    I: Cursor,
    I::Category: Traversal<I>,
{
    <I::Category as Traversal<I>>::distance(first, last)
}

/// Returns `it` moved forward by `n`.
pub fn next<I>(mut it: I, n: DifferenceType) -> I
where
    I: Cursor,
    I::Category: Traversal<I>,
{
    advance(&mut it, n);
    it
}

/// Returns `it` moved backward by `n`.
pub fn prev<I>(mut it: I, n: DifferenceType) -> I
where
    I: BidirectionalCursor,
    I::Category: Traversal<I> + BidirectionalCategory,
{
    advance(&mut it, -n);
    it
}
