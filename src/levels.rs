//! Support/resistance level accumulation
//!
//! Levels discovered by pivot detection accumulate for the lifetime of one
//! instrument's scan. Insertion order is preserved and nothing is ever
//! removed or merged; a candidate within the relative tolerance of an
//! existing level is dropped, not averaged in.

/// Append-only, order-preserving set of price levels with relative-tolerance
/// deduplication. One instance per instrument per direction.
#[derive(Debug, Clone)]
pub struct LevelSet {
    levels: Vec<f64>,
    tolerance: f64,
}

impl LevelSet {
    /// `tolerance` is relative, e.g. 0.01 for 1%
    pub fn new(tolerance: f64) -> Self {
        LevelSet {
            levels: Vec::new(),
            tolerance,
        }
    }

    /// Insert a level unless an existing one lies within tolerance of it.
    /// Returns whether the level was actually added.
    pub fn insert(&mut self, price: f64) -> bool {
        let near_existing = self
            .levels
            .iter()
            .any(|&l| (price - l).abs() < self.tolerance * l);

        if near_existing {
            return false;
        }

        self.levels.push(price);
        true
    }

    /// Levels in insertion order
    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.levels.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_order() {
        let mut set = LevelSet::new(0.01);
        assert!(set.insert(100.0));
        assert!(set.insert(150.0));
        assert!(set.insert(120.0));

        let levels: Vec<f64> = set.iter().collect();
        assert_eq!(levels, vec![100.0, 150.0, 120.0]);
    }

    #[test]
    fn test_dedupe_within_tolerance() {
        let mut set = LevelSet::new(0.01);
        assert!(set.insert(100.0));
        // 100.5 is within 1% of 100.0
        assert!(!set.insert(100.5));
        assert!(!set.insert(99.2));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_identical_insert_idempotent() {
        let mut set = LevelSet::new(0.01);
        assert!(set.insert(250.0));
        assert!(!set.insert(250.0));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_outside_tolerance_accepted() {
        let mut set = LevelSet::new(0.01);
        set.insert(100.0);
        // 101.5 is 1.5% away from 100.0
        assert!(set.insert(101.5));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_dedupe_is_against_existing_not_transitive() {
        let mut set = LevelSet::new(0.01);
        set.insert(100.0);
        set.insert(101.5);
        // 100.9 is within 1% of both, rejected against the first match
        assert!(!set.insert(100.9));
        assert_eq!(set.len(), 2);
    }
}
