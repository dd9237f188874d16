use byteorder::ByteOrder;

/// Block order for each of the 24 shuffle values, as indexes into the canonical order.
const BLOCK_POSITION: [[usize; 4]; 24] = [
    [0, 1, 2, 3],
    [0, 1, 3, 2],
    [0, 2, 1, 3],
    [0, 3, 1, 2],
    [0, 2, 3, 1],
    [0, 3, 2, 1],
    [1, 0, 2, 3],
    [1, 0, 3, 2],
    [2, 0, 1, 3],
    [3, 0, 1, 2],
    [2, 0, 3, 1],
    [3, 0, 2, 1],
    [1, 2, 0, 3],
    [1, 3, 0, 2],
    [2, 1, 0, 3],
    [3, 1, 0, 2],
    [2, 3, 0, 1],
    [3, 2, 0, 1],
    [1, 2, 3, 0],
    [1, 3, 2, 0],
    [2, 1, 3, 0],
    [3, 1, 2, 0],
    [2, 3, 1, 0],
    [3, 2, 1, 0],
];

/// The shuffle value that undoes each shuffle value.
const BLOCK_POSITION_INVERT: [usize; 24] = [
    0, 1, 2, 4, 3, 5, 6, 7, 12, 18, 13, 19, 8, 10, 14, 20, 16, 22, 9, 11, 15, 21, 17, 23,
];

/// Reorders the four `block_size` blocks starting at `start` according to shuffle value `sv`.
pub fn shuffle(data: &mut [u8], sv: usize, block_size: usize, start: usize) {
    let src = data[start..][..block_size * 4].to_vec();
    for (i, from) in BLOCK_POSITION[sv % 24].iter().enumerate() {
        data[start + block_size * i..][..block_size].copy_from_slice(&src[block_size * from..][..block_size]);
    }
}

/// Puts blocks back into stored order after `shuffle(data, sv, ..)` produced canonical order.
pub fn unshuffle(data: &mut [u8], sv: usize, block_size: usize, start: usize) {
    shuffle(data, BLOCK_POSITION_INVERT[sv % 24], block_size, start);
}

pub fn lcrng_next(seed: u32) -> u32 {
    seed.wrapping_mul(0x41c64e6d).wrapping_add(0x6073)
}

/// XORs each little-endian word with the high half of the LCRNG stream seeded by `seed`. Self-inverse.
pub fn lcrng_xor(data: &mut [u8], seed: u32) {
    let mut seed = seed;
    for word in data.chunks_exact_mut(2) {
        seed = lcrng_next(seed);
        let v = byteorder::LittleEndian::read_u16(word) ^ (seed >> 16) as u16;
        byteorder::LittleEndian::write_u16(word, v);
    }
}

/// Gen 3 substructure cipher: every little-endian dword XORed with the same key. Self-inverse.
pub fn xor32(data: &mut [u8], key: u32) {
    for dword in data.chunks_exact_mut(4) {
        let v = byteorder::LittleEndian::read_u32(dword) ^ key;
        byteorder::LittleEndian::write_u32(dword, v);
    }
}

/// Start of the shuffled block area in Gen 4 onward records, right after the PID/EC, sanity word and checksum.
pub const BLOCKS_START: usize = 8;

/// Shuffle value of Gen 4 onward records, from the PID (Gen 4/5) or encryption constant (Gen 6+).
pub fn shuffle_value(key: u32) -> usize {
    (((key >> 13) & 31) % 24) as usize
}

/// Decrypts a Gen 4 onward record in place: the block area is keyed by `block_seed`, anything past it (party
/// stats) by `party_seed`, then the blocks are put in canonical order.
pub fn decrypt_array(data: &mut [u8], block_size: usize, block_seed: u32, party_seed: u32, sv: usize) {
    let blocks_end = BLOCKS_START + 4 * block_size;
    lcrng_xor(&mut data[BLOCKS_START..blocks_end], block_seed);
    lcrng_xor(&mut data[blocks_end..], party_seed);
    shuffle(data, sv, block_size, BLOCKS_START);
}

pub fn encrypt_array(data: &mut [u8], block_size: usize, block_seed: u32, party_seed: u32, sv: usize) {
    let blocks_end = BLOCKS_START + 4 * block_size;
    unshuffle(data, sv, block_size, BLOCKS_START);
    lcrng_xor(&mut data[BLOCKS_START..blocks_end], block_seed);
    lcrng_xor(&mut data[blocks_end..], party_seed);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_shuffle_is_undone_by_its_inverse() {
        let original = (0..32u8).collect::<Vec<_>>();
        for sv in 0..24 {
            let mut data = original.clone();
            shuffle(&mut data, sv, 8, 0);
            unshuffle(&mut data, sv, 8, 0);
            assert_eq!(data, original, "sv {}", sv);
        }
    }

    #[test]
    fn test_shuffle_orders_blocks() {
        let mut data = vec![0, 0, 1, 1, 2, 2, 3, 3];
        shuffle(&mut data, 23, 2, 0);
        assert_eq!(data, vec![3, 3, 2, 2, 1, 1, 0, 0]);
    }

    #[test]
    fn test_lcrng_xor_is_self_inverse() {
        let original = (0..0x80u8).collect::<Vec<_>>();
        let mut data = original.clone();
        lcrng_xor(&mut data, 0x1234);
        assert_ne!(data, original);
        lcrng_xor(&mut data, 0x1234);
        assert_eq!(data, original);
        assert_eq!(lcrng_next(0), 0x6073);
    }

    #[test]
    fn test_array_round_trip() {
        let original = (0..0xecu16).map(|v| v as u8).collect::<Vec<_>>();
        let mut data = original.clone();
        encrypt_array(&mut data, 32, 0xbeef, 0x1234_5678, 7);
        assert_ne!(&data[8..], &original[8..]);
        assert_eq!(&data[..8], &original[..8]);
        decrypt_array(&mut data, 32, 0xbeef, 0x1234_5678, 7);
        assert_eq!(data, original);
        assert_eq!(shuffle_value(0xffff_ffff), 7);
    }
}
