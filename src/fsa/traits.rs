//! Statistics reporting for trie structures

/// Statistics about a trie's state and memory usage
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrieStats {
    /// Occupied states, root and terminal slots included
    pub num_states: usize,
    /// Number of keys stored
    pub num_keys: usize,
    /// Total number of transitions
    pub num_transitions: usize,
    /// Slots in the free list
    pub free_slots: usize,
    /// Length of the `base`/`check` arrays
    pub array_len: usize,
    /// Memory usage in bytes
    pub memory_usage: usize,
    /// Space efficiency (bits per key)
    pub bits_per_key: f64,
}

impl TrieStats {
    /// Create new empty statistics
    pub fn new() -> Self {
        Self::default()
    }

    /// Calculate bits per key
    pub fn calculate_bits_per_key(&mut self) {
        if self.num_keys > 0 {
            self.bits_per_key = (self.memory_usage * 8) as f64 / self.num_keys as f64;
        }
    }

    /// Fraction of array slots in use
    pub fn load_factor(&self) -> f64 {
        if self.array_len == 0 {
            0.0
        } else {
            self.num_states as f64 / self.array_len as f64
        }
    }
}

/// Trait for automata that provide performance statistics
pub trait StatisticsProvider {
    /// Get detailed statistics about the trie
    fn stats(&self) -> TrieStats;

    /// Get memory usage in bytes
    fn memory_usage(&self) -> usize {
        self.stats().memory_usage
    }

    /// Get space efficiency in bits per key
    fn bits_per_key(&self) -> f64 {
        self.stats().bits_per_key
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trie_stats() {
        let mut stats = TrieStats::new();
        stats.num_keys = 100;
        stats.memory_usage = 1024;

        stats.calculate_bits_per_key();
        assert!((stats.bits_per_key - 81.92).abs() < 0.01);
    }

    #[test]
    fn test_empty_stats() {
        let mut stats = TrieStats::new();
        stats.calculate_bits_per_key();
        assert_eq!(stats.bits_per_key, 0.0);
        assert_eq!(stats.load_factor(), 0.0);

        stats.num_states = 25;
        stats.array_len = 100;
        assert!((stats.load_factor() - 0.25).abs() < f64::EPSILON);
    }
}
