//! An ordered two-field tuple.

use std::mem;

/// Two independently owned values.
///
/// Equality is structural and ordering is lexicographic: `first` decides, `second` breaks ties.
/// The remaining comparison operators follow from `PartialEq` and `PartialOrd`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Pair<K, V> {
    pub first: K,
    pub second: V,
}

impl<K, V> Pair<K, V> {
    pub fn new(first: K, second: V) -> Self {
        Pair { first, second }
    }

    /// Exchanges both fields with `other`.
    pub fn swap(&mut self, other: &mut Self) {
        mem::swap(&mut self.first, &mut other.first);
        mem::swap(&mut self.second, &mut other.second);
    }

    pub fn into_tuple(self) -> (K, V) {
        (self.first, self.second)
    }
}

impl<K, V> From<(K, V)> for Pair<K, V> {
    fn from((first, second): (K, V)) -> Self {
        Pair { first, second }
    }
}

impl<K, V> From<Pair<K, V>> for (K, V) {
    fn from(pair: Pair<K, V>) -> Self {
        pair.into_tuple()
    }
}

pub fn make_pair<K, V>(first: K, second: V) -> Pair<K, V> {
    Pair::new(first, second)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn orders_by_first_then_second() {
        assert!(make_pair(1, 9) < make_pair(2, 0));
        assert!(make_pair(2, 1) < make_pair(2, 3));
        assert!(make_pair(2, 3) >= make_pair(2, 3));
        assert!(make_pair("b", 0) > make_pair("a", 7));
    }

    #[test]
    fn equality_needs_both_fields() {
        assert_eq!(make_pair(1, 'a'), Pair::from((1, 'a')));
        assert_ne!(make_pair(1, 'a'), make_pair(1, 'b'));
        assert_ne!(make_pair(0, 'a'), make_pair(1, 'a'));
    }

    #[test]
    fn swap_exchanges_fields() {
        let mut a = make_pair(String::from("a"), 1);
        let mut b = make_pair(String::from("b"), 2);
        a.swap(&mut b);
        assert_eq!(a.into_tuple(), (String::from("b"), 2));
        assert_eq!(<(String, i32)>::from(b), (String::from("a"), 1));
    }
}
