/// The keystream that masks every byte of a block after its key.
///
/// The generator is warmed up by one advance per set bit of the seed, then hands out the state four bytes at a time,
/// least significant first, advancing whenever a word runs out.
#[derive(Clone, Debug)]
pub struct XorShift32 {
    state: u32,
    counter: u32,
}

fn advance(mut state: u32) -> u32 {
    state ^= state << 2;
    state ^= state >> 15;
    state ^= state << 13;
    state
}

impl XorShift32 {
    pub fn new(seed: u32) -> Self {
        let mut state = seed;
        for _ in 0..seed.count_ones() {
            state = advance(state);
        }
        Self { state, counter: 0 }
    }

    pub fn next_u8(&mut self) -> u8 {
        let b = (self.state >> (self.counter * 8)) as u8;
        if self.counter == 3 {
            self.state = advance(self.state);
            self.counter = 0;
        } else {
            self.counter += 1;
        }
        b
    }

    pub fn next_u32(&mut self) -> u32 {
        u32::from_le_bytes([self.next_u8(), self.next_u8(), self.next_u8(), self.next_u8()])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keystream() {
        let mut xk = XorShift32::new(0x12345678);
        let bytes = (0..8).map(|_| xk.next_u8()).collect::<Vec<_>>();
        assert_eq!(bytes, vec![0xaf, 0x71, 0xc9, 0x07, 0xca, 0xc6, 0x35, 0x88]);
    }

    #[test]
    fn test_next_u32_is_little_endian() {
        let mut xk = XorShift32::new(0x12345678);
        assert_eq!(xk.next_u32(), 0x07c971af);
        assert_eq!(xk.next_u32(), 0x8835c6ca);
    }

    #[test]
    fn test_zero_seed_is_fixed_point() {
        let mut xk = XorShift32::new(0);
        assert!((0..16).all(|_| xk.next_u8() == 0));
    }
}
