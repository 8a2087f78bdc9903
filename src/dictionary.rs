use std::array;
use std::ffi::CStr;
use std::fmt::{self, Debug};
use std::iter::{Flatten, FusedIterator};
use std::slice;

use tracing::{debug, trace};

use crate::alloc::{Allocator, AllocatorTraits, Global};
use crate::error::{ContainerError, Result};
use crate::key::{AsKey, KeyBuf};
use crate::pair::Pair;
use crate::search::{self, SearchResult::*};
use crate::vector::Vector;

/// A key/value entry stored in a dictionary bucket.
pub type Slot<T, A = Global> = Pair<KeyBuf<A>, T>;

type Bucket<T, A> = Vector<Slot<T, A>, A>;

/// A hash map from null-terminated byte strings to `T`, with a fixed number of buckets.
///
/// The bucket count `N` is part of the type and never changes; there is no rehashing. A key
/// lives in bucket `hash(key)`, the byte sum of the key modulo `N`, and each bucket is a
/// [`Vector`] of slots scanned linearly. Collisions are cheap to handle but long chains are
/// not: pick `N` with the expected number of keys in mind.
///
/// Every stored key is a private copy, so the caller's string can be dropped right after the
/// call. Keys are never removed; they live as long as the dictionary.
///
/// A dictionary with zero buckets does not compile.
///
/// # Examples
///
/// ```
/// use rtl_containers::Dictionary;
///
/// let mut d: Dictionary<i32, 16> = Dictionary::new();
/// *d.get_or_insert("x") = 5;
/// assert_eq!(*d.get_or_insert("x"), 5);
/// assert!(d.contains("x"));
/// assert!(!d.contains("y"));
/// assert_eq!(d.len(), 1);
/// ```
pub struct Dictionary<T, const N: usize, A: Allocator + Clone = Global> {
    buckets: [Bucket<T, A>; N],
    len: usize,
    alloc: A,
}

impl<T, const N: usize> Dictionary<T, N> {
    /// Makes a new, empty dictionary. Buckets allocate on their first insertion.
    pub fn new() -> Self {
        Dictionary::new_in(Global)
    }
}

impl<T, const N: usize, A: Allocator + Clone> Dictionary<T, N, A> {
    /// Makes a new, empty dictionary whose buckets and keys allocate from `alloc`.
    pub fn new_in(alloc: A) -> Self {
        const { assert!(N > 0, "a dictionary needs at least one bucket") };
        Dictionary {
            buckets: array::from_fn(|_| Vector::new_in(alloc.clone())),
            len: 0,
            alloc,
        }
    }

    /// Copies every entry of `other` into a new dictionary, rehashing into `N` buckets.
    ///
    /// # Examples
    ///
    /// ```
    /// use rtl_containers::Dictionary;
    ///
    /// let mut small: Dictionary<u8, 1> = Dictionary::new();
    /// *small.get_or_insert("alpha") = 1;
    /// *small.get_or_insert("beta") = 2;
    ///
    /// let large: Dictionary<u8, 64> = Dictionary::from_dictionary(&small);
    /// assert_eq!(large.len(), 2);
    /// assert_eq!(large.find("beta"), Some(&2));
    /// ```
    pub fn from_dictionary<const M: usize>(other: &Dictionary<T, M, A>) -> Self
    where
        T: Clone,
    {
        let mut dict = Dictionary::new_in(other.alloc.clone());
        for (key, value) in other {
            dict.get_or_insert_with(key, || value.clone());
        }
        dict
    }

    /// Replaces the contents of `self` with copies of the entries of `other`.
    pub fn assign_from<const M: usize>(&mut self, other: &Dictionary<T, M, A>)
    where
        T: Clone,
    {
        *self = Dictionary::from_dictionary(other);
    }

    pub fn allocator(&self) -> &A {
        &self.alloc
    }

    /// Returns the number of entries across all buckets.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the largest number of entries a single bucket could ever hold.
    pub fn max_size(&self) -> usize {
        self.alloc.max_size::<Slot<T, A>>()
    }

    pub const fn bucket_count(&self) -> usize {
        N
    }

    /// The slots of bucket `index`, in insertion order.
    ///
    /// # Panics
    ///
    /// Panics if `index >= N`.
    pub fn bucket(&self, index: usize) -> &[Slot<T, A>] {
        &self.buckets[index]
    }

    /// The bucket `key` belongs to: its byte sum modulo `N`, or 0 for the null key.
    ///
    /// # Examples
    ///
    /// ```
    /// use rtl_containers::Dictionary;
    ///
    /// assert_eq!(Dictionary::<(), 10>::hash("ab"), (97 + 98) % 10);
    /// assert_eq!(Dictionary::<(), 10>::hash(&None::<&str>), 0);
    /// ```
    pub fn hash<K: AsKey + ?Sized>(key: &K) -> usize {
        search::hash(key.key_bytes(), N)
    }

    /// Whether two keys are byte-for-byte equal. A null key equals nothing.
    pub fn keys_equal<K1, K2>(a: &K1, b: &K2) -> bool
    where
        K1: AsKey + ?Sized,
        K2: AsKey + ?Sized,
    {
        search::keys_equal(a.key_bytes(), b.key_bytes())
    }

    /// Returns a reference to the value for `key`, or `None` if the key is absent. Never
    /// inserts.
    ///
    /// # Examples
    ///
    /// ```
    /// use rtl_containers::Dictionary;
    ///
    /// let mut d: Dictionary<&str, 4> = Dictionary::new();
    /// assert_eq!(d.find("k"), None);
    /// *d.get_or_insert("k") = "v";
    /// assert_eq!(d.find("k"), Some(&"v"));
    /// assert_eq!(d.find(&None::<&str>), None);
    /// ```
    pub fn find<K: AsKey + ?Sized>(&self, key: &K) -> Option<&T> {
        let key = key.key_bytes()?;
        let bucket = &self.buckets[search::hash(Some(key), N)];
        match search::search_bucket(bucket, Some(key)) {
            Found(idx) => Some(&bucket[idx].second),
            Vacant(_) => None,
        }
    }

    /// Returns a mutable reference to the value for `key`, or `None` if the key is absent.
    pub fn find_mut<K: AsKey + ?Sized>(&mut self, key: &K) -> Option<&mut T> {
        let key = key.key_bytes()?;
        let bucket = &mut self.buckets[search::hash(Some(key), N)];
        match search::search_bucket(bucket, Some(key)) {
            Found(idx) => Some(&mut bucket[idx].second),
            Vacant(_) => None,
        }
    }

    /// Returns true if the dictionary holds a value for `key`.
    pub fn contains<K: AsKey + ?Sized>(&self, key: &K) -> bool {
        self.find(key).is_some()
    }

    /// Returns the value for `key`, inserting `T::default()` first if the key is absent.
    ///
    /// This is the subscript operation: reading a missing key creates it.
    ///
    /// # Panics
    ///
    /// Panics on the null key, which cannot be stored.
    ///
    /// # Examples
    ///
    /// ```
    /// use rtl_containers::Dictionary;
    ///
    /// let mut counts: Dictionary<u32, 8> = Dictionary::new();
    /// for word in ["a", "b", "a"] {
    ///     *counts.get_or_insert(word) += 1;
    /// }
    /// assert_eq!(counts.find("a"), Some(&2));
    /// assert_eq!(counts.len(), 2);
    /// ```
    pub fn get_or_insert<K: AsKey + ?Sized>(&mut self, key: &K) -> &mut T
    where
        T: Default,
    {
        self.get_or_insert_with(key, T::default)
    }

    /// Returns the value for `key`, inserting the result of `f` first if the key is absent.
    ///
    /// # Panics
    ///
    /// Panics on the null key, which cannot be stored.
    pub fn get_or_insert_with<K, F>(&mut self, key: &K, f: F) -> &mut T
    where
        K: AsKey + ?Sized,
        F: FnOnce() -> T,
    {
        match self.try_get_or_insert_with(key, f) {
            Ok(value) => value,
            Err(err) => panic!("{err}"),
        }
    }

    /// Like [`get_or_insert`](Dictionary::get_or_insert), but reports the null key as
    /// `NullKey` instead of panicking.
    pub fn try_get_or_insert<K: AsKey + ?Sized>(&mut self, key: &K) -> Result<&mut T>
    where
        T: Default,
    {
        self.try_get_or_insert_with(key, T::default)
    }

    pub fn try_get_or_insert_with<K, F>(&mut self, key: &K, f: F) -> Result<&mut T>
    where
        K: AsKey + ?Sized,
        F: FnOnce() -> T,
    {
        let key = key.key_bytes().ok_or(ContainerError::NullKey)?;
        let index = search::hash(Some(key), N);
        let bucket = &mut self.buckets[index];
        let idx = match search::search_bucket(bucket, Some(key)) {
            Found(idx) => idx,
            Vacant(idx) => {
                bucket.push_back(Pair::new(KeyBuf::copy_in(key, self.alloc.clone()), f()));
                self.len += 1;
                trace!(bucket = index, len = self.len, "inserted dictionary slot");
                idx
            }
        };
        Ok(&mut bucket[idx].second)
    }

    /// Gets an iterator over the entries, bucket by bucket and in insertion order within a
    /// bucket.
    pub fn iter(&self) -> Iter<'_, T, A> {
        Iter {
            slots: self.buckets.iter().flatten(),
            remaining: self.len,
        }
    }

    /// Gets an iterator over the entries with mutable references to the values.
    pub fn iter_mut(&mut self) -> IterMut<'_, T, A> {
        IterMut {
            remaining: self.len,
            slots: self.buckets.iter_mut().flatten(),
        }
    }
}

impl<T: Debug, const N: usize, A: Allocator + Clone> Dictionary<T, N, A> {
    /// Logs the bucket layout at debug level.
    pub fn dump(&self) {
        for (index, bucket) in self.buckets.iter().enumerate() {
            debug!(bucket = index, slots = bucket.len(), "dictionary bucket");
            for slot in bucket {
                debug!(bucket = index, key = ?slot.first, value = ?slot.second, "dictionary slot");
            }
        }
    }
}

impl<T, const N: usize> Default for Dictionary<T, N> {
    fn default() -> Self {
        Dictionary::new()
    }
}

impl<T: Clone, const N: usize, A: Allocator + Clone> Clone for Dictionary<T, N, A> {
    fn clone(&self) -> Self {
        Dictionary {
            buckets: self.buckets.clone(),
            len: self.len,
            alloc: self.alloc.clone(),
        }
    }
}

impl<T: Debug, const N: usize, A: Allocator + Clone> Debug for Dictionary<T, N, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<'a, T, const N: usize, A: Allocator + Clone> IntoIterator for &'a Dictionary<T, N, A> {
    type Item = (&'a CStr, &'a T);
    type IntoIter = Iter<'a, T, A>;

    fn into_iter(self) -> Iter<'a, T, A> {
        self.iter()
    }
}

impl<'a, T, const N: usize, A: Allocator + Clone> IntoIterator for &'a mut Dictionary<T, N, A> {
    type Item = (&'a CStr, &'a mut T);
    type IntoIter = IterMut<'a, T, A>;

    fn into_iter(self) -> IterMut<'a, T, A> {
        self.iter_mut()
    }
}

/// An iterator over a dictionary's entries.
pub struct Iter<'a, T: 'a, A: Allocator + 'a> {
    slots: Flatten<slice::Iter<'a, Bucket<T, A>>>,
    remaining: usize,
}

impl<'a, T: 'a, A: Allocator + 'a> Iterator for Iter<'a, T, A> {
    type Item = (&'a CStr, &'a T);

    fn next(&mut self) -> Option<(&'a CStr, &'a T)> {
        let slot = self.slots.next()?;
        self.remaining -= 1;
        Some((slot.first.as_c_str(), &slot.second))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, T: 'a, A: Allocator + 'a> ExactSizeIterator for Iter<'a, T, A> {}
impl<'a, T: 'a, A: Allocator + 'a> FusedIterator for Iter<'a, T, A> {}

/// A mutable iterator over a dictionary's entries.
pub struct IterMut<'a, T: 'a, A: Allocator + 'a> {
    slots: Flatten<slice::IterMut<'a, Bucket<T, A>>>,
    remaining: usize,
}

impl<'a, T: 'a, A: Allocator + 'a> Iterator for IterMut<'a, T, A> {
    type Item = (&'a CStr, &'a mut T);

    fn next(&mut self) -> Option<(&'a CStr, &'a mut T)> {
        let Pair { first, second } = self.slots.next()?;
        self.remaining -= 1;
        let key: &'a KeyBuf<A> = first;
        Some((key.as_c_str(), second))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, T: 'a, A: Allocator + 'a> ExactSizeIterator for IterMut<'a, T, A> {}
impl<'a, T: 'a, A: Allocator + 'a> FusedIterator for IterMut<'a, T, A> {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_then_read() {
        let mut d: Dictionary<i32, 8> = Dictionary::new();
        *d.get_or_insert(c"x") = 5;
        assert_eq!(*d.get_or_insert(c"x"), 5);
        assert!(d.contains(c"x"));
        assert!(!d.contains(c"y"));
        assert_eq!(d.len(), 1);
    }

    #[test]
    fn single_bucket_collisions_stay_separate() {
        let mut d: Dictionary<i32, 1> = Dictionary::new();
        *d.get_or_insert("alpha") = 1;
        *d.get_or_insert("beta") = 2;
        assert_eq!(*d.get_or_insert("alpha"), 1);
        assert_eq!(*d.get_or_insert("beta"), 2);
        assert_eq!(d.bucket(0).len(), 2);
    }

    #[test]
    fn keys_live_in_their_hash_bucket() {
        let mut d: Dictionary<usize, 7> = Dictionary::new();
        for i in 0..50 {
            *d.get_or_insert(&format!("key{i}")) = i;
        }
        for b in 0..d.bucket_count() {
            for slot in d.bucket(b) {
                assert_eq!(Dictionary::<usize, 7>::hash(&slot.first), b);
            }
        }
        assert_eq!(d.len(), 50);
        assert_eq!(d.iter().len(), 50);
    }

    #[test]
    fn find_does_not_insert() {
        let mut d: Dictionary<String, 4> = Dictionary::new();
        assert_eq!(d.find("ghost"), None);
        assert_eq!(d.find_mut("ghost"), None);
        assert!(d.is_empty());
        d.get_or_insert("real").push_str("value");
        d.find_mut("real").unwrap().push('!');
        assert_eq!(d.find("real").map(String::as_str), Some("value!"));
    }

    #[test]
    fn null_key_never_matches_and_never_inserts() {
        let mut d: Dictionary<u8, 3> = Dictionary::new();
        *d.get_or_insert("") = 1;
        let null = None::<&str>;
        assert_eq!(Dictionary::<u8, 3>::hash(&null), 0);
        assert!(!d.contains(&null));
        assert_eq!(d.try_get_or_insert(&null), Err(ContainerError::NullKey));
        assert_eq!(d.len(), 1);
    }

    #[test]
    #[should_panic(expected = "null key")]
    fn subscript_with_null_key_panics() {
        let mut d: Dictionary<u8, 3> = Dictionary::new();
        d.get_or_insert(&None::<&CStr>);
    }

    #[test]
    fn keys_are_copied_not_aliased() {
        let mut d: Dictionary<u8, 2> = Dictionary::new();
        let mut key = String::from("temp");
        *d.get_or_insert(&key) = 9;
        key.clear();
        key.push_str("other");
        assert_eq!(d.find("temp"), Some(&9));
        assert_eq!(d.find(&key), None);
    }

    #[test]
    fn interior_nul_terminates_the_key() {
        let mut d: Dictionary<u8, 5> = Dictionary::new();
        *d.get_or_insert("ab\0cd") = 3;
        assert_eq!(d.find("ab"), Some(&3));
        assert_eq!(d.find(b"ab\0zz".as_slice()), Some(&3));
    }

    #[test]
    fn clone_and_assign_copy_every_entry() {
        let mut d: Dictionary<Vec<u8>, 3> = Dictionary::new();
        for key in ["a", "bb", "ccc", "dddd"] {
            *d.get_or_insert(key) = key.as_bytes().to_vec();
        }
        let copy = d.clone();
        d.find_mut("a").unwrap().push(b'!');
        assert_eq!(copy.find("a"), Some(&b"a".to_vec()));

        let mut wide: Dictionary<Vec<u8>, 32> = Dictionary::new();
        *wide.get_or_insert("stale") = Vec::new();
        wide.assign_from(&copy);
        assert_eq!(wide.len(), 4);
        assert!(!wide.contains("stale"));
        for (key, value) in &copy {
            assert_eq!(wide.find(key), Some(value));
        }
    }

    #[test]
    fn iter_mut_updates_values() {
        let mut d: Dictionary<u32, 4> = Dictionary::new();
        for key in ["w", "x", "y", "z"] {
            *d.get_or_insert(key) = 1;
        }
        for (_, value) in &mut d {
            *value *= 10;
        }
        assert!(d.iter().all(|(_, &v)| v == 10));
    }

    #[test]
    fn debug_lists_entries() {
        let mut d: Dictionary<u8, 1> = Dictionary::new();
        *d.get_or_insert("k") = 1;
        assert_eq!(format!("{d:?}"), r#"{"k": 1}"#);
    }
}
