//! Three-region bloom filter over a fixed 24 KiB bit array
//!
//! Bit layout: region `f` occupies bits `f * 65536 .. (f + 1) * 65536`.
//! Within a region, the 16-bit index taken from address bytes
//! `[2f, 2f + 1]` (big-endian) selects the bit. With `Lsb0` ordering that is
//! byte `f * 8192 + (index >> 3)`, mask `1 << (index & 7)`, which is the
//! on-disk format of `bloom.bin`.

use bitvec::prelude::*;
use shared_types::DeviceAddress;

/// Number of independently addressed regions.
pub const REGION_COUNT: usize = 3;
/// Bits per region (one per 16-bit index value).
pub const REGION_BITS: usize = 1 << 16;
/// Bytes per region.
pub const REGION_BYTES: usize = REGION_BITS / 8;
/// Total size of the backing array in bytes.
pub const FILTER_BYTES: usize = REGION_BYTES * REGION_COUNT;

/// Outcome of [`RegionBloom::check_and_set`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Insertion {
    /// At least one of the address's bits was clear before the call.
    pub is_new: bool,
    /// Byte offsets whose value changed, ascending.
    pub changed_bytes: Vec<usize>,
}

/// Bloom filter with one fixed bit per region per address.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RegionBloom {
    bits: BitVec<u8, Lsb0>,
}

impl Default for RegionBloom {
    fn default() -> Self {
        Self::new()
    }
}

impl RegionBloom {
    /// Create an empty (all-zero) filter.
    pub fn new() -> Self {
        Self {
            bits: bitvec![u8, Lsb0; 0; FILTER_BYTES * 8],
        }
    }

    /// Rebuild a filter from its raw byte image.
    ///
    /// Returns `None` unless `bytes` is exactly [`FILTER_BYTES`] long.
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.len() != FILTER_BYTES {
            return None;
        }
        Some(Self {
            bits: BitVec::<u8, Lsb0>::from_slice(bytes),
        })
    }

    /// Raw byte image, suitable for `bloom.bin`.
    pub fn as_bytes(&self) -> &[u8] {
        self.bits.as_raw_slice()
    }

    /// Value of one byte of the image.
    pub fn byte_at(&self, offset: usize) -> Option<u8> {
        self.bits.as_raw_slice().get(offset).copied()
    }

    /// Global bit positions for an address, one per region.
    pub fn bit_positions(address: &DeviceAddress) -> [usize; REGION_COUNT] {
        let bytes = address.as_bytes();
        let mut positions = [0usize; REGION_COUNT];
        for (field, position) in positions.iter_mut().enumerate() {
            let index = u16::from_be_bytes([bytes[field * 2], bytes[field * 2 + 1]]) as usize;
            *position = field * REGION_BITS + index;
        }
        positions
    }

    /// Test membership without modifying the filter.
    pub fn contains(&self, address: &DeviceAddress) -> bool {
        Self::bit_positions(address)
            .iter()
            .all(|&pos| self.bits[pos])
    }

    /// Set the address's bits, reporting whether any was previously clear.
    pub fn check_and_set(&mut self, address: &DeviceAddress) -> Insertion {
        let mut insertion = Insertion::default();

        for pos in Self::bit_positions(address) {
            if !self.bits[pos] {
                self.bits.set(pos, true);
                insertion.is_new = true;
                insertion.changed_bytes.push(pos / 8);
            }
        }

        insertion
    }

    /// Reset all bits to 0.
    pub fn clear(&mut self) {
        self.bits.fill(false);
    }

    /// Number of bits set across all regions.
    pub fn bits_set(&self) -> usize {
        self.bits.count_ones()
    }

    /// Fraction of bits set in one region.
    pub fn region_fill(&self, region: usize) -> f64 {
        if region >= REGION_COUNT {
            return 0.0;
        }
        let start = region * REGION_BITS;
        let ones = self.bits[start..start + REGION_BITS].count_ones();
        ones as f64 / REGION_BITS as f64
    }

    /// Probability that an unseen address is reported as known.
    ///
    /// An address is a false positive when its bit is already set in every
    /// region, so the rate is the product of the region fill ratios.
    pub fn false_positive_rate(&self) -> f64 {
        (0..REGION_COUNT).map(|r| self.region_fill(r)).product()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(bytes: [u8; 6]) -> DeviceAddress {
        DeviceAddress::new(bytes)
    }

    #[test]
    fn test_new_filter_is_empty() {
        let bloom = RegionBloom::new();
        assert_eq!(bloom.as_bytes().len(), FILTER_BYTES);
        assert_eq!(bloom.bits_set(), 0, "All bits should be zero initially");
        assert_eq!(bloom.false_positive_rate(), 0.0);
    }

    #[test]
    fn test_bit_positions_follow_byte_pairs() {
        let positions = RegionBloom::bit_positions(&addr([0x12, 0x34, 0x56, 0x78, 0x9A, 0xBC]));
        assert_eq!(
            positions,
            [0x1234, REGION_BITS + 0x5678, 2 * REGION_BITS + 0x9ABC]
        );
    }

    #[test]
    fn test_check_and_set_reports_changed_bytes_and_masks() {
        let mut bloom = RegionBloom::new();
        let a = addr([0x12, 0x34, 0x56, 0x78, 0x9A, 0xBC]);

        let insertion = bloom.check_and_set(&a);

        assert!(insertion.is_new);
        assert_eq!(insertion.changed_bytes, vec![582, 10959, 21335]);
        assert_eq!(bloom.byte_at(582), Some(0x10), "0x1234 & 7 = 4");
        assert_eq!(bloom.byte_at(10959), Some(0x01), "0x5678 & 7 = 0");
        assert_eq!(bloom.byte_at(21335), Some(0x10), "0x9ABC & 7 = 4");
        assert_eq!(bloom.bits_set(), 3);
    }

    #[test]
    fn test_second_insert_is_not_new() {
        let mut bloom = RegionBloom::new();
        let a = addr([1, 2, 3, 4, 5, 6]);

        assert!(bloom.check_and_set(&a).is_new);
        let again = bloom.check_and_set(&a);
        assert!(!again.is_new, "second insert must report known");
        assert!(again.changed_bytes.is_empty(), "nothing to persist");
    }

    #[test]
    fn test_partial_overlap_is_still_new() {
        let mut bloom = RegionBloom::new();
        bloom.check_and_set(&addr([1, 1, 2, 2, 3, 3]));

        // Shares the first two fields, differs in the third.
        let insertion = bloom.check_and_set(&addr([1, 1, 2, 2, 9, 9]));
        assert!(insertion.is_new);
        assert_eq!(insertion.changed_bytes.len(), 1);
    }

    #[test]
    fn test_three_field_collision_is_false_positive() {
        let mut bloom = RegionBloom::new();
        // Bits from three different addresses cover every field of a fourth.
        bloom.check_and_set(&addr([0xAA, 0xAA, 0, 1, 0, 1]));
        bloom.check_and_set(&addr([0, 2, 0xBB, 0xBB, 0, 2]));
        bloom.check_and_set(&addr([0, 3, 0, 3, 0xCC, 0xCC]));

        assert!(bloom.contains(&addr([0xAA, 0xAA, 0xBB, 0xBB, 0xCC, 0xCC])));
    }

    #[test]
    fn test_byte_image_round_trip() {
        let mut bloom = RegionBloom::new();
        bloom.check_and_set(&addr([9, 8, 7, 6, 5, 4]));

        let restored = RegionBloom::from_bytes(bloom.as_bytes()).unwrap();
        assert_eq!(restored, bloom);
        assert!(restored.contains(&addr([9, 8, 7, 6, 5, 4])));
    }

    #[test]
    fn test_from_bytes_rejects_wrong_size() {
        assert!(RegionBloom::from_bytes(&[0u8; 10]).is_none());
        assert!(RegionBloom::from_bytes(&vec![0u8; FILTER_BYTES + 1]).is_none());
    }

    #[test]
    fn test_clear_zeroes_everything() {
        let mut bloom = RegionBloom::new();
        bloom.check_and_set(&addr([1, 2, 3, 4, 5, 6]));
        bloom.clear();
        assert_eq!(bloom.bits_set(), 0);
        assert!(!bloom.contains(&addr([1, 2, 3, 4, 5, 6])));
    }

    #[test]
    fn test_false_positive_rate_is_product_of_fills() {
        let mut bloom = RegionBloom::new();
        bloom.check_and_set(&addr([0, 0, 0, 0, 0, 0]));
        let per_region = 1.0 / REGION_BITS as f64;
        let expected = per_region * per_region * per_region;
        assert!((bloom.false_positive_rate() - expected).abs() < f64::EPSILON);
    }
}
