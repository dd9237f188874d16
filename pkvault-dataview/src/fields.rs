use byteorder::ByteOrder;

pub trait Int: Copy {
    const WIDTH: usize;
    fn read<E: ByteOrder>(buf: &[u8]) -> Self;
    fn write<E: ByteOrder>(self, buf: &mut [u8]);
}

impl Int for u8 {
    const WIDTH: usize = 1;

    fn read<E: ByteOrder>(buf: &[u8]) -> Self {
        buf[0]
    }

    fn write<E: ByteOrder>(self, buf: &mut [u8]) {
        buf[0] = self;
    }
}

impl Int for u16 {
    const WIDTH: usize = 2;

    fn read<E: ByteOrder>(buf: &[u8]) -> Self {
        E::read_u16(buf)
    }

    fn write<E: ByteOrder>(self, buf: &mut [u8]) {
        E::write_u16(buf, self)
    }
}

impl Int for u32 {
    const WIDTH: usize = 4;

    fn read<E: ByteOrder>(buf: &[u8]) -> Self {
        E::read_u32(buf)
    }

    fn write<E: ByteOrder>(self, buf: &mut [u8]) {
        E::write_u32(buf, self)
    }
}

impl Int for u64 {
    const WIDTH: usize = 8;

    fn read<E: ByteOrder>(buf: &[u8]) -> Self {
        E::read_u64(buf)
    }

    fn write<E: ByteOrder>(self, buf: &mut [u8]) {
        E::write_u64(buf, self)
    }
}

pub fn read_be<T: Int>(buf: &[u8], offset: usize) -> T {
    T::read::<byteorder::BigEndian>(&buf[offset..][..T::WIDTH])
}

pub fn write_be<T: Int>(buf: &mut [u8], offset: usize, v: T) {
    v.write::<byteorder::BigEndian>(&mut buf[offset..][..T::WIDTH])
}

pub fn read_le<T: Int>(buf: &[u8], offset: usize) -> T {
    T::read::<byteorder::LittleEndian>(&buf[offset..][..T::WIDTH])
}

pub fn write_le<T: Int>(buf: &mut [u8], offset: usize, v: T) {
    v.write::<byteorder::LittleEndian>(&mut buf[offset..][..T::WIDTH])
}

/// Gen 1/2 experience and Gen 2 money are 24-bit big-endian.
pub fn read_u24_be(buf: &[u8], offset: usize) -> u32 {
    byteorder::BigEndian::read_u24(&buf[offset..][..3])
}

pub fn write_u24_be(buf: &mut [u8], offset: usize, v: u32) {
    byteorder::BigEndian::write_u24(&mut buf[offset..][..3], v.min(0xff_ffff))
}

/// Reads `digits` packed decimal digits, most significant nibble first. Nibbles above 9 read as 9.
pub fn read_bcd(buf: &[u8], offset: usize, digits: usize) -> u32 {
    let mut v = 0u32;
    for i in 0..digits {
        let b = buf[offset + i / 2];
        let nibble = if i % 2 == 0 { b >> 4 } else { b & 0xf };
        v = v * 10 + nibble.min(9) as u32;
    }
    v
}

/// Writes `v` as `digits` packed decimal digits, clamping to the largest representable value.
pub fn write_bcd(buf: &mut [u8], offset: usize, digits: usize, v: u32) {
    let max = 10u32.saturating_pow(digits as u32).saturating_sub(1);
    let mut v = v.min(max);
    for i in (0..digits).rev() {
        let digit = (v % 10) as u8;
        v /= 10;
        let b = &mut buf[offset + i / 2];
        *b = if i % 2 == 0 {
            (*b & 0x0f) | (digit << 4)
        } else {
            (*b & 0xf0) | digit
        };
    }
}

pub fn bcd_max(digits: usize) -> u32 {
    10u32.saturating_pow(digits as u32).saturating_sub(1)
}
