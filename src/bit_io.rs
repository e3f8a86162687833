//! MSB-first bit packing.

#[derive(Default, Debug)]
pub struct BitWriter {
    bytes: Vec<u8>,
    bit_count: u64,
}

impl BitWriter {
    pub fn new() -> Self {
        BitWriter {
            bytes: Vec::new(),
            bit_count: 0,
        }
    }

    pub fn with_capacity(bytes: usize) -> Self {
        BitWriter {
            bytes: Vec::with_capacity(bytes),
            bit_count: 0,
        }
    }

    /// Bits written so far, not counting padding.
    pub fn bit_count(&self) -> u64 {
        self.bit_count
    }

    pub fn push_bit(&mut self, bit: bool) {
        let bit_offset = (self.bit_count % 8) as u32;

        if bit_offset == 0 {
            self.bytes.push(0);
        }
        if bit {
            if let Some(last) = self.bytes.last_mut() {
                *last |= 1 << (7 - bit_offset);
            }
        }
        self.bit_count += 1;
    }

    /// Append the low `bit_length` bits of `code`, most significant first.
    pub fn push_bits(&mut self, code: u32, bit_length: u8) {
        for bit_pos in (0..bit_length).rev() {
            self.push_bit((code >> bit_pos) & 1 != 0);
        }
    }

    /// The packed bytes. Unused low bits of the last byte are zero.
    pub fn finish(self) -> (Vec<u8>, u64) {
        (self.bytes, self.bit_count)
    }
}

/// Reads at most `bit_budget` bits from a byte slice, ignoring any padding
/// past the budget.
#[derive(Debug)]
pub struct BitReader<'a> {
    bytes: &'a [u8],
    bit_budget: u64,
    position: u64,
}

impl<'a> BitReader<'a> {
    pub fn new(bytes: &'a [u8], bit_budget: u64) -> Self {
        let bit_budget = bit_budget.min(bytes.len() as u64 * 8);
        BitReader {
            bytes,
            bit_budget,
            position: 0,
        }
    }

    pub fn read_bit(&mut self) -> Option<bool> {
        if self.position >= self.bit_budget {
            return None;
        }
        let byte = self.bytes[(self.position / 8) as usize];
        let bit = (byte >> (7 - self.position % 8)) & 1 == 1;
        self.position += 1;
        Some(bit)
    }

    #[cfg(test)]
    pub(crate) fn position(&self) -> u64 {
        self.position
    }

    pub fn remaining(&self) -> u64 {
        self.bit_budget - self.position
    }
}

/// Number of bytes needed to hold `bits` bits.
pub fn bytes_for_bits(bits: u64) -> u64 {
    bits.div_ceil(8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn packs_msb_first_with_zero_padding() {
        let mut writer = BitWriter::new();
        writer.push_bits(0b101, 3);
        writer.push_bits(0b11, 2);
        writer.push_bits(0b0001, 4);
        assert_eq!(writer.bit_count(), 9);

        let (bytes, bits) = writer.finish();
        assert_eq!(bits, 9);
        assert_eq!(bytes, vec![0b1011_1000, 0b1000_0000]);
    }

    #[test]
    fn wide_codes_span_bytes() {
        let mut writer = BitWriter::with_capacity(4);
        writer.push_bits(0xdead_beef, 32);
        let (bytes, _) = writer.finish();
        assert_eq!(bytes, vec![0xde, 0xad, 0xbe, 0xef]);
    }

    #[test]
    fn reader_stops_at_budget() {
        let bytes = [0b1011_1000, 0b1000_0000];
        let mut reader = BitReader::new(&bytes, 9);

        let bits: Vec<bool> = std::iter::from_fn(|| reader.read_bit()).collect();
        assert_eq!(
            bits,
            vec![true, false, true, true, true, false, false, false, true]
        );
        assert_eq!(reader.position(), 9);
        assert_eq!(reader.remaining(), 0);
        assert_eq!(reader.read_bit(), None);
    }

    #[test]
    fn reader_budget_is_clamped_to_available_bytes() {
        let bytes = [0xff];
        let reader = BitReader::new(&bytes, 100);
        assert_eq!(reader.remaining(), 8);
    }

    #[test]
    fn byte_rounding() {
        assert_eq!(bytes_for_bits(0), 0);
        assert_eq!(bytes_for_bits(1), 1);
        assert_eq!(bytes_for_bits(8), 1);
        assert_eq!(bytes_for_bits(9), 2);
    }
}
