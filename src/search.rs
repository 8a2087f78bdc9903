use crate::alloc::Allocator;
use crate::dictionary::Slot;

use self::SearchResult::*;

pub enum SearchResult {
    Found(usize),
    // The key is absent; a new slot for it belongs at this index of the bucket.
    Vacant(usize),
}

/// Byte sum of the key, reduced modulo `buckets`. The null key always lands in bucket 0.
pub fn hash(key: Option<&[u8]>, buckets: usize) -> usize {
    match key {
        Some(key) => key.iter().fold(0usize, |sum, &b| sum.wrapping_add(b as usize)) % buckets,
        None => 0,
    }
}

/// Full byte-for-byte equality. The null key equals nothing, not even itself.
pub fn keys_equal(a: Option<&[u8]>, b: Option<&[u8]>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}

pub fn search_bucket<T, A: Allocator>(bucket: &[Slot<T, A>], key: Option<&[u8]>) -> SearchResult {
    match search_linear(bucket, key) {
        (idx, true) => Found(idx),
        (idx, false) => Vacant(idx),
    }
}

fn search_linear<T, A: Allocator>(bucket: &[Slot<T, A>], key: Option<&[u8]>) -> (usize, bool) {
    for (i, slot) in bucket.iter().enumerate() {
        if keys_equal(Some(slot.first.as_bytes()), key) {
            return (i, true);
        }
    }
    (bucket.len(), false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alloc::Global;
    use crate::key::KeyBuf;
    use crate::pair::Pair;

    #[test]
    fn hash_sums_bytes() {
        assert_eq!(hash(Some(b"a"), 1000), 97);
        assert_eq!(hash(Some(b"ab"), 1000), 97 + 98);
        assert_eq!(hash(Some(b"ab"), 10), (97 + 98) % 10);
        assert_eq!(hash(Some(b""), 7), 0);
        assert_eq!(hash(Some(&[0xff, 0xff]), 1024), 510);
    }

    #[test]
    fn null_key_hashes_to_zero_and_matches_nothing() {
        assert_eq!(hash(None, 13), 0);
        assert!(!keys_equal(None, None));
        assert!(!keys_equal(None, Some(b"")));
        assert!(!keys_equal(Some(b"x"), None));
    }

    #[test]
    fn equality_is_not_a_prefix_match() {
        assert!(keys_equal(Some(b"abc"), Some(b"abc")));
        assert!(!keys_equal(Some(b"abc"), Some(b"abcd")));
        assert!(!keys_equal(Some(b"abcd"), Some(b"abc")));
    }

    #[test]
    fn linear_scan_finds_existing_keys() {
        let bucket: Vec<Slot<i32, Global>> = ["one", "two", "three"]
            .iter()
            .enumerate()
            .map(|(i, k)| Pair::new(KeyBuf::copy_in(k.as_bytes(), Global), i as i32))
            .collect();
        assert!(matches!(search_bucket(&bucket, Some(b"two")), Found(1)));
        assert!(matches!(search_bucket(&bucket, Some(b"four")), Vacant(3)));
        assert!(matches!(search_bucket(&bucket, None), Vacant(3)));
    }
}
