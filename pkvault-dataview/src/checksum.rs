use byteorder::ByteOrder;

/// Gen 1: 0xff minus every byte, i.e. the complement of the 8-bit sum.
pub fn diff8(buf: &[u8]) -> u8 {
    buf.iter().fold(0xffu8, |acc, b| acc.wrapping_sub(*b))
}

/// Gen 2: plain 16-bit sum of bytes.
pub fn sum16(buf: &[u8]) -> u16 {
    buf.iter().fold(0u16, |acc, b| acc.wrapping_add(*b as u16))
}

/// Gen 3+ entity records: 16-bit sum of little-endian words.
pub fn sum16_words(buf: &[u8]) -> u16 {
    buf.chunks_exact(2)
        .fold(0u16, |acc, w| acc.wrapping_add(byteorder::LittleEndian::read_u16(w)))
}

/// A checksum over one or more discontiguous ranges of a container, stored at `position`.
pub struct Region {
    pub ranges: &'static [std::ops::Range<usize>],
    pub position: usize,
}

impl Region {
    pub fn bytes<'a>(&'a self, buf: &'a [u8]) -> impl Iterator<Item = &'a u8> + 'a {
        self.ranges.iter().flat_map(move |r| buf[r.clone()].iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diff8_is_complement_of_sum() {
        let buf = [0x10, 0x20, 0x30, 0xff];
        let sum = buf.iter().fold(0u8, |acc, b| acc.wrapping_add(*b));
        assert_eq!(diff8(&buf), !sum);
        assert_eq!(diff8(&[]), 0xff);
    }

    #[test]
    fn test_sum16_wraps() {
        let buf = vec![0xffu8; 0x200];
        assert_eq!(sum16(&buf), (0xffu32 * 0x200) as u16);
    }

    #[test]
    fn test_sum16_words() {
        assert_eq!(sum16_words(&[0x01, 0x02, 0x03, 0x04]), 0x0201 + 0x0403);
        assert_eq!(sum16_words(&[0xff, 0xff, 0x02, 0x00]), 0x0001);
    }

    #[test]
    fn test_region_concatenates_ranges() {
        static RANGES: [std::ops::Range<usize>; 2] = [0..2, 4..5];
        let region = Region {
            ranges: &RANGES,
            position: 6,
        };
        let buf = [1u8, 2, 3, 4, 5, 6, 7];
        assert_eq!(region.bytes(&buf).copied().collect::<Vec<_>>(), vec![1, 2, 5]);
    }
}
