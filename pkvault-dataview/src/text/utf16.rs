//! Gen 5 onward store names as UTF-16LE, with the gender symbols moved to game-private code points.

use byteorder::ByteOrder;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flavor {
    /// Black/White: 0xffff terminator, gender glyphs at U+246D/U+246E.
    Gen5,
    /// X/Y onward: 0x0000 terminator, gender glyphs at U+E08E/U+E08F.
    Gen6,
}

impl Flavor {
    fn terminator(self) -> u16 {
        match self {
            Flavor::Gen5 => 0xffff,
            Flavor::Gen6 => 0x0000,
        }
    }

    fn male(self) -> u16 {
        match self {
            Flavor::Gen5 => 0x246e,
            Flavor::Gen6 => 0xe08e,
        }
    }

    fn female(self) -> u16 {
        match self {
            Flavor::Gen5 => 0x246d,
            Flavor::Gen6 => 0xe08f,
        }
    }
}

pub fn decode(buf: &[u8], flavor: Flavor) -> String {
    let units = buf
        .chunks_exact(2)
        .map(byteorder::LittleEndian::read_u16)
        .take_while(|u| *u != flavor.terminator())
        .map(|u| {
            if u == flavor.male() {
                '♂' as u16
            } else if u == flavor.female() {
                '♀' as u16
            } else {
                u
            }
        });
    char::decode_utf16(units).filter_map(|c| c.ok()).collect()
}

pub fn write(field: &mut [u8], s: &str, flavor: Flavor) {
    let max_units = (field.len() / 2).saturating_sub(1);
    let mut units = s
        .encode_utf16()
        .map(|u| match char::from_u32(u as u32) {
            Some('♂') => flavor.male(),
            Some('♀') => flavor.female(),
            _ => u,
        })
        .take(max_units)
        .collect::<Vec<_>>();

    // Never split a surrogate pair at the length limit.
    if units.last().map(|u| (0xd800..0xdc00).contains(u)).unwrap_or(false) {
        units.pop();
    }

    field.fill(0);
    for (i, u) in units.iter().enumerate() {
        byteorder::LittleEndian::write_u16(&mut field[i * 2..][..2], *u);
    }
    let end = units.len() * 2;
    if end + 2 <= field.len() {
        byteorder::LittleEndian::write_u16(&mut field[end..][..2], flavor.terminator());
    }
}
