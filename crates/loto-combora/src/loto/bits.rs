use serde::Serialize;

/// Highest number a `NumberSet` can hold.
const CAPACITY: u8 = 64;

/// One-hot set of ball numbers: number `n` lives at bit `n - 1`.
///
/// Equality is set equality, so two plays with the same primaries in a
/// different order compare equal and hash the same.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct NumberSet {
    bits: u64,
}

impl NumberSet {
    pub fn from_numbers(numbers: &[u8]) -> Self {
        numbers.iter().copied().collect()
    }

    /// Numbers outside `1..=64` are ignored.
    pub fn insert(&mut self, n: u8) {
        if (1..=CAPACITY).contains(&n) {
            self.bits |= 1u64 << (n - 1);
        }
    }

    pub fn contains(&self, n: u8) -> bool {
        (1..=CAPACITY).contains(&n) && self.bits & (1u64 << (n - 1)) != 0
    }

    pub fn len(&self) -> usize {
        self.bits.count_ones() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.bits == 0
    }

    pub fn intersection(&self, other: &Self) -> Self {
        Self {
            bits: self.bits & other.bits,
        }
    }

    pub fn union(&self, other: &Self) -> Self {
        Self {
            bits: self.bits | other.bits,
        }
    }

    /// Size of the intersection without materialising it.
    pub fn shared(&self, other: &Self) -> usize {
        (self.bits & other.bits).count_ones() as usize
    }

    /// Members in ascending order.
    pub fn numbers(&self) -> impl Iterator<Item = u8> + '_ {
        (1..=CAPACITY).filter(|&n| self.contains(n))
    }

    pub fn to_vec(&self) -> Vec<u8> {
        self.numbers().collect()
    }
}

impl FromIterator<u8> for NumberSet {
    fn from_iter<I: IntoIterator<Item = u8>>(iter: I) -> Self {
        let mut set = Self::default();
        for n in iter {
            set.insert(n);
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_semantics() {
        let a = NumberSet::from_numbers(&[30, 25, 12, 8, 5, 1]);
        let b = NumberSet::from_numbers(&[1, 5, 8, 12, 25, 30]);
        assert_eq!(a, b);
        assert_eq!(a.len(), 6);
        assert_eq!(a.to_vec(), vec![1, 5, 8, 12, 25, 30]);

        // duplicates collapse
        let c = NumberSet::from_numbers(&[1, 1, 2]);
        assert_eq!(c.len(), 2);
    }

    #[test]
    fn intersection_and_union() {
        // a: [1, 5, 8, 12,         25, 30]
        // d: [1, 5, 8,     20, 21, 22]
        let a = NumberSet::from_numbers(&[1, 5, 8, 12, 25, 30]);
        let d = NumberSet::from_numbers(&[1, 5, 8, 20, 21, 22]);
        assert_eq!(a.shared(&d), 3);
        assert_eq!(a.intersection(&d).to_vec(), vec![1, 5, 8]);
        assert_eq!(a.union(&d).len(), 9);
        assert!(a.intersection(&NumberSet::default()).is_empty());
    }

    #[test]
    fn bounds_are_ignored() {
        let mut set = NumberSet::default();
        set.insert(0);
        set.insert(65);
        assert!(set.is_empty());
        assert!(!set.contains(0));

        set.insert(40);
        set.insert(64);
        assert!(set.contains(40));
        assert_eq!(set.to_vec(), vec![40, 64]);
    }

    #[test]
    fn collects_from_iterator() {
        let set: NumberSet = [3u8, 9, 27].into_iter().collect();
        assert_eq!(set.to_vec(), vec![3, 9, 27]);
    }
}
