//! Record fields Gen 3 onward encode identically.

use crate::pkm::{Stat, MAX_IV};

/// Six 5-bit IVs plus two flags in one little-endian word. The top flag is the ability slot in Gen 3 and the
/// nickname flag from Gen 4 on.
#[repr(transparent)]
#[derive(bytemuck::AnyBitPattern, bytemuck::NoUninit, Clone, Copy, Default, c2rust_bitfields::BitfieldStruct)]
pub struct RawIvs {
    #[bitfield(name = "hp", ty = "u8", bits = "0..=4")]
    #[bitfield(name = "atk", ty = "u8", bits = "5..=9")]
    #[bitfield(name = "def", ty = "u8", bits = "10..=14")]
    #[bitfield(name = "spe", ty = "u8", bits = "15..=19")]
    #[bitfield(name = "spa", ty = "u8", bits = "20..=24")]
    #[bitfield(name = "spd", ty = "u8", bits = "25..=29")]
    #[bitfield(name = "egg", ty = "bool", bits = "30..=30")]
    #[bitfield(name = "flag", ty = "bool", bits = "31..=31")]
    ivs: [u8; 4],
}
const _: () = assert!(std::mem::size_of::<RawIvs>() == 0x4);

impl RawIvs {
    pub fn read(buf: &[u8], offset: usize) -> Self {
        bytemuck::pod_read_unaligned(&buf[offset..][..std::mem::size_of::<RawIvs>()])
    }

    pub fn write(self, buf: &mut [u8], offset: usize) {
        buf[offset..][..std::mem::size_of::<RawIvs>()].copy_from_slice(bytemuck::bytes_of(&self));
    }

    pub fn iv(&self, stat: Stat) -> u8 {
        match stat {
            Stat::Hp => self.hp(),
            Stat::Atk => self.atk(),
            Stat::Def => self.def(),
            Stat::Spe => self.spe(),
            Stat::SpA => self.spa(),
            Stat::SpD => self.spd(),
        }
    }

    pub fn set_iv(&mut self, stat: Stat, v: u8) {
        let v = v.min(MAX_IV);
        match stat {
            Stat::Hp => self.set_hp(v),
            Stat::Atk => self.set_atk(v),
            Stat::Def => self.set_def(v),
            Stat::Spe => self.set_spe(v),
            Stat::SpA => self.set_spa(v),
            Stat::SpD => self.set_spd(v),
        }
    }
}

/// Reads and updates the IV word at `offset` in place.
pub fn update_ivs(buf: &mut [u8], offset: usize, f: impl FnOnce(&mut RawIvs)) {
    let mut ivs = RawIvs::read(buf, offset);
    f(&mut ivs);
    ivs.write(buf, offset);
}

/// Year (since 2000), month, day. All zero means no date.
pub fn read_date(buf: &[u8], offset: usize) -> Option<chrono::NaiveDate> {
    let [y, m, d] = [buf[offset], buf[offset + 1], buf[offset + 2]];
    if m == 0 || d == 0 {
        return None;
    }
    chrono::NaiveDate::from_ymd_opt(2000 + y as i32, m as u32, d as u32)
}

pub fn write_date(buf: &mut [u8], offset: usize, date: Option<chrono::NaiveDate>) {
    use chrono::Datelike;
    let bytes = match date {
        Some(date) => [
            (date.year() - 2000).clamp(0, 99) as u8,
            date.month() as u8,
            date.day() as u8,
        ],
        None => [0; 3],
    };
    buf[offset..][..3].copy_from_slice(&bytes);
}

/// Two PP-up bits per move slot, packed in one byte (Gen 3).
pub fn packed_pp_ups(byte: u8, slot: usize) -> u8 {
    (byte >> (slot * 2)) & 3
}

pub fn set_packed_pp_ups(byte: u8, slot: usize, ups: u8) -> u8 {
    (byte & !(3 << (slot * 2))) | ((ups.min(3)) << (slot * 2))
}

/// The flags byte shared from Gen 4 on: fateful encounter, female, genderless, then the form.
#[repr(transparent)]
#[derive(bytemuck::AnyBitPattern, bytemuck::NoUninit, Clone, Copy, Default, c2rust_bitfields::BitfieldStruct)]
pub struct RawFlags {
    #[bitfield(name = "fateful", ty = "bool", bits = "0..=0")]
    #[bitfield(name = "female", ty = "bool", bits = "1..=1")]
    #[bitfield(name = "genderless", ty = "bool", bits = "2..=2")]
    #[bitfield(name = "form", ty = "u8", bits = "3..=7")]
    flags: [u8; 1],
}
const _: () = assert!(std::mem::size_of::<RawFlags>() == 0x1);

impl RawFlags {
    pub fn read(buf: &[u8], offset: usize) -> Self {
        bytemuck::pod_read_unaligned(&buf[offset..][..1])
    }

    pub fn write(self, buf: &mut [u8], offset: usize) {
        buf[offset] = bytemuck::bytes_of(&self)[0];
    }

    pub fn gender(&self) -> crate::pkm::Gender {
        if self.genderless() {
            crate::pkm::Gender::Genderless
        } else if self.female() {
            crate::pkm::Gender::Female
        } else {
            crate::pkm::Gender::Male
        }
    }

    pub fn set_gender(&mut self, gender: crate::pkm::Gender) {
        self.set_female(gender == crate::pkm::Gender::Female);
        self.set_genderless(gender == crate::pkm::Gender::Genderless);
    }
}

pub fn update_flags(buf: &mut [u8], offset: usize, f: impl FnOnce(&mut RawFlags)) {
    let mut flags = RawFlags::read(buf, offset);
    f(&mut flags);
    flags.write(buf, offset);
}

/// `pid` rewritten so the record is, or is not, shiny for the trainer.
///
/// The low byte (gender and the Gen 3/4 ability slot) and `pid % 25` (the Gen 3/4 nature) are kept. The search
/// starts from the current middle byte, so a PID that needs no change elsewhere keeps it too.
pub fn shiny_pid(pid: u32, tid: u16, sid: u16, shiny: bool) -> u32 {
    let trainer = (tid ^ sid) as u32;
    let low_byte = pid & 0xff;
    let mid = (pid >> 8) & 0xff;
    let xor_base = if shiny { 0 } else { 0x8000 };
    let candidates = (0..0x100u32).flat_map(|i| {
        let low = ((mid + i) & 0xff) << 8 | low_byte;
        (0..8u32).map(move |x| (trainer ^ low ^ xor_base ^ x) << 16 | low)
    });
    let mut first = None;
    for candidate in candidates {
        if candidate % 25 == pid % 25 {
            return candidate;
        }
        first.get_or_insert(candidate);
    }
    first.unwrap_or(pid)
}

/// Met level in the low seven bits, OT gender in the top bit (Gen 4 on).
pub fn met_level(byte: u8) -> u8 {
    byte & 0x7f
}

pub fn with_met_level(byte: u8, level: u8) -> u8 {
    (byte & 0x80) | level.min(100)
}

pub fn ot_female(byte: u8) -> bool {
    byte & 0x80 != 0
}

pub fn with_ot_female(byte: u8, female: bool) -> u8 {
    (byte & 0x7f) | ((female as u8) << 7)
}
