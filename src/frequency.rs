//! Byte frequency analysis.

use std::collections::BTreeMap;

/// Occurrence count for every byte value present in the input.
///
/// Only symbols with a non-zero count are stored, and iteration is in
/// ascending symbol order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrequencyTable {
    counts: BTreeMap<u8, u64>,
}

impl FrequencyTable {
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let mut histogram = [0u64; 256];
        for &byte in bytes {
            histogram[byte as usize] += 1;
        }

        let counts = histogram
            .iter()
            .enumerate()
            .filter(|(_, &count)| count > 0)
            .map(|(byte, &count)| (byte as u8, count))
            .collect();

        FrequencyTable { counts }
    }

    #[cfg(test)]
    pub(crate) fn get(&self, symbol: u8) -> u64 {
        self.counts.get(&symbol).copied().unwrap_or(0)
    }

    /// Number of distinct symbols.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u8, u64)> + '_ {
        self.counts.iter().map(|(&symbol, &count)| (symbol, count))
    }

    /// Halve every count, keeping each at least 1.
    ///
    /// Used to flatten a distribution whose optimal tree is too deep.
    pub(crate) fn flattened(&self) -> Self {
        let counts = self
            .counts
            .iter()
            .map(|(&symbol, &count)| (symbol, (count / 2).max(1)))
            .collect();
        FrequencyTable { counts }
    }
}

impl FromIterator<(u8, u64)> for FrequencyTable {
    fn from_iter<I: IntoIterator<Item = (u8, u64)>>(iter: I) -> Self {
        let counts = iter.into_iter().filter(|&(_, count)| count > 0).collect();
        FrequencyTable { counts }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_gives_empty_table() {
        let table = FrequencyTable::from_bytes(&[]);
        assert!(table.is_empty());
        assert_eq!(table.total(), 0);
    }

    #[test]
    fn counts_only_present_symbols() {
        let table = FrequencyTable::from_bytes(b"AAAAABBBCC");
        assert_eq!(table.len(), 3);
        assert_eq!(table.get(b'A'), 5);
        assert_eq!(table.get(b'B'), 3);
        assert_eq!(table.get(b'C'), 2);
        assert_eq!(table.get(b'D'), 0);
        assert_eq!(table.total(), 10);

        let symbols: Vec<u8> = table.iter().map(|(s, _)| s).collect();
        assert_eq!(symbols, b"ABC".to_vec());
    }

    #[test]
    fn flattening_never_drops_a_symbol() {
        let table: FrequencyTable = [(0u8, 1u64), (1, 3), (2, 1000)].into_iter().collect();
        let flat = table.flattened();
        assert_eq!(flat.get(0), 1);
        assert_eq!(flat.get(1), 1);
        assert_eq!(flat.get(2), 500);
        assert_eq!(flat.len(), 3);
    }

    #[test]
    fn zero_counts_are_filtered_on_collect() {
        let table: FrequencyTable = [(7u8, 0u64), (8, 2)].into_iter().collect();
        assert_eq!(table.len(), 1);
    }
}
