//! Record fields Gen 1 and Gen 2 encode identically.

use crate::pkm::{Gender, Stat, Type, MAX_GB_IV};

/// Determinant values: four 4-bit IVs, two per byte. The HP IV is not stored.
#[repr(transparent)]
#[derive(bytemuck::AnyBitPattern, bytemuck::NoUninit, Clone, Copy, Default, c2rust_bitfields::BitfieldStruct)]
pub struct RawDvs {
    #[bitfield(name = "def", ty = "u8", bits = "0..=3")]
    #[bitfield(name = "atk", ty = "u8", bits = "4..=7")]
    #[bitfield(name = "spc", ty = "u8", bits = "8..=11")]
    #[bitfield(name = "spe", ty = "u8", bits = "12..=15")]
    dvs: [u8; 2],
}
const _: () = assert!(std::mem::size_of::<RawDvs>() == 0x2);

pub const SHINY_DV: u8 = 10;

impl RawDvs {
    pub fn read(buf: &[u8], offset: usize) -> Self {
        bytemuck::pod_read_unaligned(&buf[offset..][..std::mem::size_of::<RawDvs>()])
    }

    pub fn write(self, buf: &mut [u8], offset: usize) {
        buf[offset..][..std::mem::size_of::<RawDvs>()].copy_from_slice(bytemuck::bytes_of(&self));
    }

    pub fn iv(&self, stat: Stat) -> u8 {
        match stat {
            Stat::Hp => ((self.atk() & 1) << 3) | ((self.def() & 1) << 2) | ((self.spe() & 1) << 1) | (self.spc() & 1),
            Stat::Atk => self.atk(),
            Stat::Def => self.def(),
            Stat::Spe => self.spe(),
            Stat::SpA | Stat::SpD => self.spc(),
        }
    }

    /// HP is derived, so setting it does nothing.
    pub fn set_iv(&mut self, stat: Stat, v: u8) {
        let v = v.min(MAX_GB_IV);
        match stat {
            Stat::Hp => {}
            Stat::Atk => self.set_atk(v),
            Stat::Def => self.set_def(v),
            Stat::Spe => self.set_spe(v),
            Stat::SpA | Stat::SpD => self.set_spc(v),
        }
    }

    pub fn is_shiny(&self) -> bool {
        self.def() == SHINY_DV && self.spe() == SHINY_DV && self.spc() == SHINY_DV && (self.atk() & 0b10) != 0
    }

    /// Turning shininess off only clears the Attack bit; the other three DVs stay at 10.
    pub fn set_shiny(&mut self, shiny: bool) {
        if shiny {
            self.set_def(SHINY_DV);
            self.set_spe(SHINY_DV);
            self.set_spc(SHINY_DV);
            self.set_atk(self.atk() | 0b10);
        } else {
            self.set_atk(self.atk() & !0b10);
        }
    }

    pub fn hidden_power_type(&self) -> Type {
        Type::from_id((((self.atk() & 3) << 2) | (self.def() & 3)) + 1).unwrap_or(Type::Fighting)
    }

    /// Normal and Fairy are out of range and clamp to Fighting and Dark.
    pub fn set_hidden_power_type(&mut self, ty: Type) {
        let index = (ty as u8).clamp(Type::Fighting as u8, Type::Dark as u8) - 1;
        self.set_atk((self.atk() & !3) | (index >> 2));
        self.set_def((self.def() & !3) | (index & 3));
    }

    /// Gen 2 derives gender from the Attack DV against the species' female threshold.
    pub fn gender(&self, gender_ratio: u8) -> Gender {
        match gender_ratio {
            crate::data::GENDERLESS => Gender::Genderless,
            crate::data::GENDER_FEMALE_ONLY => Gender::Female,
            crate::data::GENDER_MALE_ONLY => Gender::Male,
            ratio => {
                if self.atk() as u16 * 17 <= ratio as u16 {
                    Gender::Female
                } else {
                    Gender::Male
                }
            }
        }
    }

    pub fn set_gender(&mut self, gender_ratio: u8, gender: Gender) {
        if matches!(
            gender_ratio,
            crate::data::GENDERLESS | crate::data::GENDER_FEMALE_ONLY | crate::data::GENDER_MALE_ONLY
        ) || self.gender(gender_ratio) == gender
        {
            return;
        }
        let highest_female = (gender_ratio / 17).min(MAX_GB_IV);
        match gender {
            Gender::Female => self.set_atk(highest_female),
            Gender::Male => self.set_atk((highest_female + 1).min(MAX_GB_IV)),
            Gender::Genderless => {}
        }
    }
}

/// Stat experience words: HP, Attack, Defense, Speed, Special.
pub fn stat_exp_offset(base: usize, stat: Stat) -> usize {
    base + 2
        * match stat {
            Stat::Hp => 0,
            Stat::Atk => 1,
            Stat::Def => 2,
            Stat::Spe => 3,
            Stat::SpA | Stat::SpD => 4,
        }
}

pub const PP_MASK: u8 = 0x3f;

pub fn pp(buf: &[u8], offset: usize, slot: usize) -> u8 {
    buf[offset + slot] & PP_MASK
}

pub fn set_pp(buf: &mut [u8], offset: usize, slot: usize, pp: u8) {
    buf[offset + slot] = (buf[offset + slot] & !PP_MASK) | pp.min(PP_MASK);
}

pub fn pp_ups(buf: &[u8], offset: usize, slot: usize) -> u8 {
    buf[offset + slot] >> 6
}

pub fn set_pp_ups(buf: &mut [u8], offset: usize, slot: usize, ups: u8) {
    buf[offset + slot] = (buf[offset + slot] & PP_MASK) | (ups.min(3) << 6);
}

/// Party stats follow max HP as big-endian words: Attack, Defense, Speed, then Special (one or two words).
pub fn party_stat_offset(max_hp: usize, stat: Stat) -> usize {
    max_hp
        + 2 * match stat {
            Stat::Hp => 0,
            Stat::Atk => 1,
            Stat::Def => 2,
            Stat::Spe => 3,
            Stat::SpA => 4,
            Stat::SpD => 5,
        }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dvs(atk: u8, def: u8, spe: u8, spc: u8) -> RawDvs {
        let mut d = RawDvs::default();
        d.set_iv(Stat::Atk, atk);
        d.set_iv(Stat::Def, def);
        d.set_iv(Stat::Spe, spe);
        d.set_iv(Stat::SpA, spc);
        d
    }

    #[test]
    fn test_byte_layout() {
        let mut buf = [0u8; 3];
        dvs(0xa, 0xb, 0xc, 0xd).write(&mut buf, 1);
        assert_eq!(buf, [0, 0xab, 0xcd]);
        assert_eq!(RawDvs::read(&buf, 1).iv(Stat::Spe), 0xc);
    }

    #[test]
    fn test_iv_round_trip_and_clamp() {
        for stat in [Stat::Atk, Stat::Def, Stat::Spe, Stat::SpA] {
            for v in 0..=20u8 {
                let mut d = RawDvs::default();
                d.set_iv(stat, v);
                assert_eq!(d.iv(stat), v.min(15));
            }
        }
    }

    #[test]
    fn test_hp_iv_is_derived() {
        for atk in 0..16 {
            for def in 0..16 {
                for spe in [0, 1, 6, 15] {
                    for spc in [0, 3, 8, 15] {
                        let d = dvs(atk, def, spe, spc);
                        let expected = ((atk & 1) << 3) | ((def & 1) << 2) | ((spe & 1) << 1) | (spc & 1);
                        assert_eq!(d.iv(Stat::Hp), expected);
                    }
                }
            }
        }
        let mut d = dvs(1, 2, 3, 4);
        d.set_iv(Stat::Hp, 0);
        assert_eq!(d.iv(Stat::Hp), 0b1010);
        assert_eq!(d.iv(Stat::SpD), 4);
    }

    #[test]
    fn test_shiny() {
        let mut d = dvs(8, 10, 10, 10);
        assert!(!d.is_shiny());
        d.set_shiny(true);
        assert!(d.is_shiny());
        assert_eq!(d.iv(Stat::Atk), 10);

        let mut d = dvs(0, 0, 0, 0);
        d.set_shiny(true);
        assert!(d.is_shiny());
        assert_eq!((d.iv(Stat::Def), d.iv(Stat::Spe), d.iv(Stat::SpA)), (10, 10, 10));
        assert_ne!(d.iv(Stat::Atk) & 2, 0);
    }

    #[test]
    fn test_shiny_off_keeps_pinned_dvs() {
        let mut d = dvs(10, 10, 10, 10);
        assert!(d.is_shiny());
        d.set_shiny(false);
        assert!(!d.is_shiny());
        assert_eq!(d.iv(Stat::Atk), 8);
        assert_eq!((d.iv(Stat::Def), d.iv(Stat::Spe), d.iv(Stat::SpA)), (10, 10, 10));
    }

    #[test]
    fn test_hidden_power_round_trip() {
        for ty in Type::Fighting as u8..=Type::Dark as u8 {
            let ty = Type::from_id(ty).unwrap();
            let mut d = dvs(15, 15, 15, 15);
            d.set_hidden_power_type(ty);
            assert_eq!(d.hidden_power_type(), ty);
        }
        let mut d = RawDvs::default();
        d.set_hidden_power_type(Type::Normal);
        assert_eq!(d.hidden_power_type(), Type::Fighting);
        d.set_hidden_power_type(Type::Fairy);
        assert_eq!(d.hidden_power_type(), Type::Dark);
    }

    #[test]
    fn test_gender_threshold() {
        assert_eq!(dvs(1, 0, 0, 0).gender(31), Gender::Female);
        assert_eq!(dvs(2, 0, 0, 0).gender(31), Gender::Male);
        assert_eq!(dvs(7, 0, 0, 0).gender(127), Gender::Female);
        assert_eq!(dvs(8, 0, 0, 0).gender(127), Gender::Male);
        assert_eq!(dvs(15, 0, 0, 0).gender(255), Gender::Genderless);

        let mut d = dvs(15, 0, 0, 0);
        d.set_gender(127, Gender::Female);
        assert_eq!(d.gender(127), Gender::Female);
        d.set_gender(127, Gender::Male);
        assert_eq!(d.gender(127), Gender::Male);
    }

    #[test]
    fn test_pp_bits() {
        let mut buf = [0u8; 4];
        set_pp(&mut buf, 0, 1, 35);
        set_pp_ups(&mut buf, 0, 1, 3);
        assert_eq!(buf[1], 0xe3);
        assert_eq!(pp(&buf, 0, 1), 35);
        assert_eq!(pp_ups(&buf, 0, 1), 3);
        set_pp(&mut buf, 0, 1, 200);
        assert_eq!(pp(&buf, 0, 1), 63);
        assert_eq!(pp_ups(&buf, 0, 1), 3);
    }
}
