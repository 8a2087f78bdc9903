//! Null-terminated byte-string keys.
//!
//! Dictionary keys are read the way C strings are: byte by byte up to the first NUL. [`AsKey`]
//! covers the common string types, plus `Option<&K>` for the null key. Stored keys are
//! [`KeyBuf`]s, private heap copies that include the terminator.

use std::ffi::{CStr, CString};
use std::fmt;

use crate::alloc::{Allocator, Global};
use crate::vector::Vector;

/// Something that can be looked up in a [`Dictionary`](crate::Dictionary).
pub trait AsKey {
    /// The key's bytes without the terminator, or `None` for the null key.
    fn key_bytes(&self) -> Option<&[u8]>;
}

fn until_nul(bytes: &[u8]) -> &[u8] {
    match bytes.iter().position(|&b| b == 0) {
        Some(end) => &bytes[..end],
        None => bytes,
    }
}

impl AsKey for CStr {
    fn key_bytes(&self) -> Option<&[u8]> {
        Some(self.to_bytes())
    }
}

impl AsKey for CString {
    fn key_bytes(&self) -> Option<&[u8]> {
        Some(self.as_bytes())
    }
}

impl AsKey for str {
    fn key_bytes(&self) -> Option<&[u8]> {
        Some(until_nul(self.as_bytes()))
    }
}

impl AsKey for String {
    fn key_bytes(&self) -> Option<&[u8]> {
        self.as_str().key_bytes()
    }
}

impl AsKey for [u8] {
    fn key_bytes(&self) -> Option<&[u8]> {
        Some(until_nul(self))
    }
}

impl<K: AsKey + ?Sized> AsKey for &K {
    fn key_bytes(&self) -> Option<&[u8]> {
        (**self).key_bytes()
    }
}

impl<K: AsKey + ?Sized> AsKey for Option<&K> {
    fn key_bytes(&self) -> Option<&[u8]> {
        self.and_then(AsKey::key_bytes)
    }
}

/// An exclusively owned copy of a key, terminator included.
pub struct KeyBuf<A: Allocator = Global> {
    bytes: Vector<u8, A>,
}

impl<A: Allocator> KeyBuf<A> {
    /// Copies `key` up to its first NUL into a fresh block from `alloc`.
    pub fn copy_in(key: &[u8], alloc: A) -> Self {
        let key = until_nul(key);
        let mut bytes = Vector::new_in(alloc);
        bytes.reserve(key.len() + 1);
        bytes.extend(key);
        bytes.push_back(0);
        KeyBuf { bytes }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.bytes.len() - 1]
    }

    pub fn as_bytes_with_nul(&self) -> &[u8] {
        &self.bytes
    }

    pub fn as_c_str(&self) -> &CStr {
        // SAFETY: `copy_in` stops at the first NUL and appends exactly one terminator.
        unsafe { CStr::from_bytes_with_nul_unchecked(&self.bytes) }
    }
}

impl<A: Allocator> AsKey for KeyBuf<A> {
    fn key_bytes(&self) -> Option<&[u8]> {
        Some(self.as_bytes())
    }
}

impl<A: Allocator> AsRef<CStr> for KeyBuf<A> {
    fn as_ref(&self) -> &CStr {
        self.as_c_str()
    }
}

impl<A: Allocator + Clone> Clone for KeyBuf<A> {
    fn clone(&self) -> Self {
        KeyBuf { bytes: self.bytes.clone() }
    }
}

impl<A: Allocator> PartialEq for KeyBuf<A> {
    fn eq(&self, other: &Self) -> bool {
        self.bytes == other.bytes
    }
}

impl<A: Allocator> Eq for KeyBuf<A> {}

impl<A: Allocator> PartialOrd for KeyBuf<A> {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl<A: Allocator> Ord for KeyBuf<A> {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.bytes.cmp(&other.bytes)
    }
}

impl<A: Allocator> std::hash::Hash for KeyBuf<A> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.bytes.hash(state)
    }
}

impl<A: Allocator> fmt::Debug for KeyBuf<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self.as_c_str(), f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_stop_at_the_first_nul() {
        assert_eq!("ab\0cd".key_bytes(), Some(&b"ab"[..]));
        assert_eq!(b"xyz".as_slice().key_bytes(), Some(&b"xyz"[..]));
        assert_eq!(c"key".key_bytes(), Some(&b"key"[..]));
        assert_eq!(String::from("k\0").key_bytes(), Some(&b"k"[..]));
    }

    #[test]
    fn none_is_the_null_key() {
        assert_eq!(None::<&str>.key_bytes(), None);
        assert_eq!(Some("a").key_bytes(), Some(&b"a"[..]));
    }

    #[test]
    fn copies_include_the_terminator() {
        let source = String::from("alpha");
        let key = KeyBuf::copy_in(source.as_bytes(), Global);
        drop(source);
        assert_eq!(key.as_bytes(), b"alpha");
        assert_eq!(key.as_bytes_with_nul(), b"alpha\0");
        assert_eq!(key.as_c_str(), c"alpha");
    }

    #[test]
    fn copies_are_independent() {
        let a = KeyBuf::copy_in(b"same", Global);
        let b = a.clone();
        assert_eq!(a, b);
        assert_ne!(a.as_bytes().as_ptr(), b.as_bytes().as_ptr());
    }

    #[test]
    fn empty_key_is_just_a_terminator() {
        let key = KeyBuf::copy_in(b"", Global);
        assert_eq!(key.as_bytes_with_nul(), b"\0");
        assert_eq!(key.key_bytes(), Some(&b""[..]));
    }
}
