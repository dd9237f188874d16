use pkvault_gamedb::{GameVersion, Generation, Language};

use crate::fields::{read_be, read_u24_be, write_be, write_u24_be};
use crate::game::gb::{self, RawDvs};
use crate::pkm::{Gender, Pkm, PkmClone, Stat, Type};
use crate::text::gen12;

pub const BOX_SIZE: usize = 0x20;
pub const PARTY_SIZE: usize = 0x30;

const SPECIES_OFFSET: usize = 0x00;
const HELD_ITEM_OFFSET: usize = 0x01;
const MOVES_OFFSET: usize = 0x02;
const TID_OFFSET: usize = 0x06;
const EXP_OFFSET: usize = 0x08;
const STAT_EXP_OFFSET: usize = 0x0b;
const DVS_OFFSET: usize = 0x15;
const PP_OFFSET: usize = 0x17;
const FRIENDSHIP_OFFSET: usize = 0x1b;
const POKERUS_OFFSET: usize = 0x1c;
const CAUGHT_OFFSET: usize = 0x1d;
const LEVEL_OFFSET: usize = 0x1f;
const STATUS_OFFSET: usize = 0x20;
const CURRENT_HP_OFFSET: usize = 0x22;
const MAX_HP_OFFSET: usize = 0x24;

/// Crystal's caught data: time of day and met level in the first byte, OT gender and met location in the second.
#[repr(transparent)]
#[derive(bytemuck::AnyBitPattern, bytemuck::NoUninit, Clone, Copy, Default, c2rust_bitfields::BitfieldStruct)]
struct RawCaught {
    #[bitfield(name = "met_level", ty = "u8", bits = "0..=5")]
    #[bitfield(name = "time_of_day", ty = "u8", bits = "6..=7")]
    #[bitfield(name = "met_location", ty = "u8", bits = "8..=14")]
    #[bitfield(name = "ot_female", ty = "bool", bits = "15..=15")]
    caught: [u8; 2],
}
const _: () = assert!(std::mem::size_of::<RawCaught>() == 0x2);

/// A Gold/Silver/Crystal record. Eggs are marked in the list's species index rather than in the record, so the
/// flag travels as metadata next to the names.
pub struct Pk2<B> {
    core: B,
    ot: B,
    nickname: B,
    entry: Option<B>,
    language: Language,
    egg: bool,
}

impl Pk2<Vec<u8>> {
    pub fn new(language: Language, party: bool) -> Self {
        let name_len = gen12::name_len(language);
        Self {
            core: vec![0; if party { PARTY_SIZE } else { BOX_SIZE }],
            ot: vec![gen12::TERMINATOR; name_len],
            nickname: vec![gen12::TERMINATOR; name_len],
            entry: None,
            language,
            egg: false,
        }
    }

    /// Reads the exchange layout: core record, OT name, nickname.
    pub fn from_exchange(buf: &[u8], language: Language, egg: bool) -> Option<Self> {
        let name_len = gen12::name_len(language);
        let core_len = buf.len().checked_sub(2 * name_len)?;
        if core_len != BOX_SIZE && core_len != PARTY_SIZE {
            return None;
        }
        Some(Self {
            core: buf[..core_len].to_vec(),
            ot: buf[core_len..][..name_len].to_vec(),
            nickname: buf[core_len + name_len..].to_vec(),
            entry: None,
            language,
            egg,
        })
    }
}

impl<'a> Pk2<&'a mut [u8]> {
    /// A record stored in place. The egg flag is read from and written back to `entry`.
    pub fn view(
        entry: &'a mut [u8],
        core: &'a mut [u8],
        ot: &'a mut [u8],
        nickname: &'a mut [u8],
        language: Language,
    ) -> Self {
        let egg = entry[0] == crate::game::list::EGG;
        Self {
            core,
            ot,
            nickname,
            entry: Some(entry),
            language,
            egg,
        }
    }
}

impl<B> Pk2<B>
where
    B: AsRef<[u8]>,
{
    pub fn core(&self) -> &[u8] {
        self.core.as_ref()
    }

    pub fn raw_ot_name(&self) -> &[u8] {
        self.ot.as_ref()
    }

    pub fn raw_nickname(&self) -> &[u8] {
        self.nickname.as_ref()
    }

    /// The value the list's species index holds for this record.
    pub fn list_entry(&self) -> u8 {
        if self.egg {
            crate::game::list::EGG
        } else {
            self.core()[SPECIES_OFFSET]
        }
    }

    fn dvs(&self) -> RawDvs {
        RawDvs::read(self.core(), DVS_OFFSET)
    }

    fn caught(&self) -> RawCaught {
        bytemuck::pod_read_unaligned(&self.core()[CAUGHT_OFFSET..][..std::mem::size_of::<RawCaught>()])
    }

    pub fn met_time_of_day(&self) -> u8 {
        self.caught().time_of_day()
    }

    /// Crystal is the only release that records where and when a creature was caught.
    pub fn has_caught_data(&self) -> bool {
        self.core()[CAUGHT_OFFSET] != 0 || self.core()[CAUGHT_OFFSET + 1] != 0
    }

    fn gender_ratio(&self) -> Option<u8> {
        crate::data::get()
            .personal
            .info(Generation::Two, self.core()[SPECIES_OFFSET] as u16, 0)
            .map(|p| p.gender_ratio)
    }

    pub fn detached(&self) -> Pk2<Vec<u8>> {
        Pk2 {
            core: self.core.as_ref().to_vec(),
            ot: self.ot.as_ref().to_vec(),
            nickname: self.nickname.as_ref().to_vec(),
            entry: None,
            language: self.language,
            egg: self.egg,
        }
    }
}

impl<B> Pk2<B>
where
    B: AsRef<[u8]> + AsMut<[u8]>,
{
    fn core_mut(&mut self) -> &mut [u8] {
        self.core.as_mut()
    }

    fn sync_entry(&mut self) {
        let v = self.list_entry();
        if let Some(entry) = self.entry.as_mut() {
            entry.as_mut()[0] = v;
        }
    }

    fn update_caught(&mut self, f: impl FnOnce(&mut RawCaught)) {
        let mut caught = self.caught();
        f(&mut caught);
        self.core_mut()[CAUGHT_OFFSET..][..std::mem::size_of::<RawCaught>()]
            .copy_from_slice(bytemuck::bytes_of(&caught));
    }

    pub fn set_met_time_of_day(&mut self, time: u8) {
        self.update_caught(|c| c.set_time_of_day(time.min(3)));
    }

    /// A copy in the given shape and text region; see `Pk1::reshaped`.
    pub fn reshaped(&self, party: bool, language: Language) -> Pk2<Vec<u8>> {
        let mut out = Pk2::new(language, party);
        out.egg = self.egg;
        out.core[..BOX_SIZE].copy_from_slice(&self.core()[..BOX_SIZE]);

        if gen12::name_len(language) == self.raw_ot_name().len() {
            out.ot.copy_from_slice(self.raw_ot_name());
            out.nickname.copy_from_slice(self.raw_nickname());
        } else {
            gen12::write_or_placeholder(&mut out.ot, &self.ot_name(), language);
            if self.is_egg() {
                gen12::write(&mut out.nickname, &egg_name(language), language);
            } else if self.is_nicknamed() {
                gen12::write(&mut out.nickname, &self.nickname(), language);
            } else {
                gen12::write(
                    &mut out.nickname,
                    &crate::pkm::default_name(self.species(), language, true),
                    language,
                );
            }
        }

        if party {
            out.refresh_stats();
        }
        out
    }
}

/// The name the games give every egg.
pub fn egg_name(language: Language) -> String {
    match language {
        Language::Japanese => "タマゴ",
        Language::French => "OEUF",
        Language::German => "EI",
        Language::Italian => "UOVO",
        Language::Spanish => "HUEVO",
        _ => "EGG",
    }
    .to_string()
}

impl<B> PkmClone for Pk2<B>
where
    B: AsRef<[u8]>,
{
    fn clone_box(&self) -> Box<dyn Pkm> {
        Box::new(self.detached())
    }
}

impl<B> Pkm for Pk2<B>
where
    B: AsRef<[u8]> + AsMut<[u8]>,
{
    fn generation(&self) -> Generation {
        Generation::Two
    }

    fn is_party(&self) -> bool {
        self.core().len() == PARTY_SIZE
    }

    fn to_bytes(&self) -> Vec<u8> {
        [self.core(), self.raw_ot_name(), self.raw_nickname()].concat()
    }

    fn species(&self) -> u16 {
        self.core()[SPECIES_OFFSET] as u16
    }

    fn set_species(&mut self, species: u16) {
        self.core_mut()[SPECIES_OFFSET] = species.min(Generation::Two.max_species()) as u8;
        self.sync_entry();
    }

    fn held_item(&self) -> u16 {
        self.core()[HELD_ITEM_OFFSET] as u16
    }

    fn set_held_item(&mut self, item: u16) {
        self.core_mut()[HELD_ITEM_OFFSET] = item.min(Generation::Two.max_item()) as u8;
    }

    fn exp(&self) -> u32 {
        read_u24_be(self.core(), EXP_OFFSET)
    }

    fn set_exp(&mut self, exp: u32) {
        write_u24_be(self.core_mut(), EXP_OFFSET, exp);
    }

    fn level(&self) -> u8 {
        self.core()[LEVEL_OFFSET]
    }

    fn set_level(&mut self, level: u8) {
        let level = level.clamp(1, 100);
        self.core_mut()[LEVEL_OFFSET] = level;
        let exp = self.growth_rate().exp_for_level(level);
        self.set_exp(exp);
    }

    fn iv(&self, stat: Stat) -> u8 {
        self.dvs().iv(stat)
    }

    fn set_iv(&mut self, stat: Stat, v: u8) {
        let mut dvs = self.dvs();
        dvs.set_iv(stat, v);
        dvs.write(self.core_mut(), DVS_OFFSET);
    }

    fn max_iv(&self) -> u8 {
        crate::pkm::MAX_GB_IV
    }

    fn ev(&self, stat: Stat) -> u16 {
        read_be(self.core(), gb::stat_exp_offset(STAT_EXP_OFFSET, stat))
    }

    fn set_ev(&mut self, stat: Stat, v: u16) {
        write_be(self.core_mut(), gb::stat_exp_offset(STAT_EXP_OFFSET, stat), v);
    }

    fn move_id(&self, slot: usize) -> u16 {
        if slot >= 4 {
            return 0;
        }
        self.core()[MOVES_OFFSET + slot] as u16
    }

    fn set_move_id(&mut self, slot: usize, id: u16) {
        if slot >= 4 {
            return;
        }
        self.core_mut()[MOVES_OFFSET + slot] = id.min(Generation::Two.max_move()) as u8;
    }

    fn pp(&self, slot: usize) -> u8 {
        if slot >= 4 {
            return 0;
        }
        gb::pp(self.core(), PP_OFFSET, slot)
    }

    fn set_pp(&mut self, slot: usize, pp: u8) {
        if slot >= 4 {
            return;
        }
        gb::set_pp(self.core_mut(), PP_OFFSET, slot, pp);
    }

    fn pp_ups(&self, slot: usize) -> u8 {
        if slot >= 4 {
            return 0;
        }
        gb::pp_ups(self.core(), PP_OFFSET, slot)
    }

    fn set_pp_ups(&mut self, slot: usize, ups: u8) {
        if slot >= 4 {
            return;
        }
        gb::set_pp_ups(self.core_mut(), PP_OFFSET, slot, ups);
    }

    fn tid(&self) -> u16 {
        read_be(self.core(), TID_OFFSET)
    }

    fn set_tid(&mut self, tid: u16) {
        write_be(self.core_mut(), TID_OFFSET, tid);
    }

    fn ot_name(&self) -> String {
        gen12::decode(self.raw_ot_name(), self.language)
    }

    fn set_ot_name(&mut self, name: &str) {
        gen12::write(self.ot.as_mut(), name, self.language);
    }

    fn ot_gender(&self) -> Gender {
        if self.caught().ot_female() {
            Gender::Female
        } else {
            Gender::Male
        }
    }

    fn set_ot_gender(&mut self, gender: Gender) {
        self.update_caught(|c| c.set_ot_female(gender == Gender::Female));
    }

    fn nickname(&self) -> String {
        gen12::decode(self.raw_nickname(), self.language)
    }

    fn set_nickname(&mut self, name: &str) {
        gen12::write(self.nickname.as_mut(), name, self.language);
    }

    /// Compared against the species name in every language the generation shipped in, not just the record's own.
    fn is_nicknamed(&self) -> bool {
        !self.egg && !crate::pkm::is_default_name(self.species(), &self.nickname(), Generation::Two, true)
    }

    fn set_nicknamed(&mut self, nicknamed: bool) {
        if !nicknamed {
            let name = crate::pkm::default_name(self.species(), self.language, true);
            self.set_nickname(&name);
        }
    }

    fn language(&self) -> Language {
        self.language
    }

    /// Only languages sharing the record's name width apply.
    fn set_language(&mut self, language: Language) {
        if gen12::name_len(language) == self.raw_ot_name().len() {
            self.language = language;
        }
    }

    fn version(&self) -> Option<GameVersion> {
        self.has_caught_data().then_some(GameVersion::C)
    }

    fn is_egg(&self) -> bool {
        self.egg
    }

    fn set_egg(&mut self, egg: bool) {
        self.egg = egg;
        self.sync_entry();
    }

    fn friendship(&self) -> u8 {
        self.core()[FRIENDSHIP_OFFSET]
    }

    fn set_friendship(&mut self, friendship: u8) {
        self.core_mut()[FRIENDSHIP_OFFSET] = friendship;
    }

    fn pokerus(&self) -> u8 {
        self.core()[POKERUS_OFFSET]
    }

    fn set_pokerus(&mut self, pokerus: u8) {
        self.core_mut()[POKERUS_OFFSET] = pokerus;
    }

    fn met_location(&self) -> u16 {
        self.caught().met_location() as u16
    }

    fn set_met_location(&mut self, location: u16) {
        self.update_caught(|c| c.set_met_location(location.min(0x7f) as u8));
    }

    fn met_level(&self) -> u8 {
        self.caught().met_level()
    }

    fn set_met_level(&mut self, level: u8) {
        self.update_caught(|c| c.set_met_level(level.min(0x3f)));
    }

    fn gender(&self) -> Gender {
        self.gender_ratio()
            .map(|ratio| self.dvs().gender(ratio))
            .unwrap_or(Gender::Genderless)
    }

    fn set_gender(&mut self, gender: Gender) {
        let Some(ratio) = self.gender_ratio() else {
            return;
        };
        let mut dvs = self.dvs();
        dvs.set_gender(ratio, gender);
        dvs.write(self.core_mut(), DVS_OFFSET);
    }

    fn is_shiny(&self) -> bool {
        self.dvs().is_shiny()
    }

    fn set_shiny(&mut self, shiny: bool) {
        let mut dvs = self.dvs();
        dvs.set_shiny(shiny);
        dvs.write(self.core_mut(), DVS_OFFSET);
    }

    fn status(&self) -> u8 {
        if !self.is_party() {
            return 0;
        }
        self.core()[STATUS_OFFSET]
    }

    fn set_status(&mut self, status: u8) {
        if self.is_party() {
            self.core_mut()[STATUS_OFFSET] = status;
        }
    }

    fn current_hp(&self) -> u16 {
        if !self.is_party() {
            return 0;
        }
        read_be(self.core(), CURRENT_HP_OFFSET)
    }

    fn set_current_hp(&mut self, hp: u16) {
        if self.is_party() {
            write_be(self.core_mut(), CURRENT_HP_OFFSET, hp);
        }
    }

    fn stat(&self, stat: Stat) -> u16 {
        if !self.is_party() {
            return 0;
        }
        read_be(self.core(), gb::party_stat_offset(MAX_HP_OFFSET, stat))
    }

    fn set_stat(&mut self, stat: Stat, v: u16) {
        if self.is_party() {
            write_be(self.core_mut(), gb::party_stat_offset(MAX_HP_OFFSET, stat), v);
        }
    }

    fn hidden_power_type(&self) -> Type {
        self.dvs().hidden_power_type()
    }

    fn set_hidden_power_type(&mut self, ty: Type) {
        let mut dvs = self.dvs();
        dvs.set_hidden_power_type(ty);
        dvs.write(self.core_mut(), DVS_OFFSET);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CELEBI: u16 = 251;

    #[test]
    fn test_celebi_shiny_asymmetry() {
        crate::testing::install();
        let mut pk = Pk2::new(Language::English, false);
        pk.set_species(CELEBI);
        pk.set_level(10);
        pk.set_iv(Stat::Atk, 8);
        pk.set_iv(Stat::Def, 10);
        pk.set_iv(Stat::Spe, 10);
        pk.set_iv(Stat::SpA, 10);
        assert_eq!(pk.level(), 10);
        assert!(!pk.is_shiny());

        pk.set_iv(Stat::Atk, 10);
        assert!(pk.is_shiny());
        pk.set_shiny(false);
        assert!(!pk.is_shiny());
        assert_eq!(pk.iv(Stat::Atk), 8);
        assert_eq!((pk.iv(Stat::Def), pk.iv(Stat::Spe), pk.iv(Stat::SpA)), (10, 10, 10));
    }

    #[test]
    fn test_caught_data_bits() {
        let mut pk = Pk2::new(Language::English, false);
        assert_eq!(pk.version(), None);
        pk.set_met_level(5);
        pk.set_met_time_of_day(2);
        pk.set_met_location(0x7e);
        pk.set_ot_gender(Gender::Female);
        assert_eq!(pk.core()[0x1d..0x1f], [0x85, 0xfe]);
        assert_eq!(pk.met_level(), 5);
        assert_eq!(pk.met_time_of_day(), 2);
        assert_eq!(pk.met_location(), 0x7e);
        assert_eq!(pk.ot_gender(), Gender::Female);
        assert_eq!(pk.version(), Some(GameVersion::C));
        pk.set_met_level(200);
        assert_eq!(pk.met_level(), 0x3f);
    }

    #[test]
    fn test_level_is_stored() {
        crate::testing::install();
        let mut pk = Pk2::new(Language::English, true);
        pk.set_species(CELEBI);
        pk.set_level(50);
        assert_eq!(pk.core()[LEVEL_OFFSET], 50);
        pk.set_exp(0);
        assert_eq!(pk.level(), 50);
        pk.set_level(0);
        assert_eq!(pk.level(), 1);
    }

    #[test]
    fn test_egg_lives_in_list_entry() {
        crate::testing::install();
        let mut buf = vec![0u8; 1 + BOX_SIZE + 22];
        {
            let (entry, rest) = buf.split_at_mut(1);
            let (core, names) = rest.split_at_mut(BOX_SIZE);
            let (ot, nickname) = names.split_at_mut(11);
            let mut pk = Pk2::view(entry, core, ot, nickname, Language::English);
            pk.set_species(CELEBI);
            assert_eq!(pk.list_entry(), CELEBI as u8);
            pk.set_egg(true);
        }
        assert_eq!(buf[0], crate::game::list::EGG);
        assert_eq!(buf[1], CELEBI as u8);

        let (entry, rest) = buf.split_at_mut(1);
        let (core, names) = rest.split_at_mut(BOX_SIZE);
        let (ot, nickname) = names.split_at_mut(11);
        let pk = Pk2::view(entry, core, ot, nickname, Language::English);
        assert!(pk.is_egg());
        assert!(!pk.is_nicknamed());
        assert!(pk.clone_box().is_egg());
    }

    #[test]
    fn test_party_stats_include_both_specials() {
        crate::testing::install();
        let mut pk = Pk2::new(Language::English, true);
        pk.set_species(CELEBI);
        pk.set_level(100);
        pk.refresh_stats();
        assert_eq!(pk.stat(Stat::Hp), pk.current_hp());
        assert_eq!(pk.stat(Stat::SpA), pk.stat(Stat::SpD));
        assert_eq!(read_be::<u16>(pk.core(), 0x2c), pk.stat(Stat::SpA));
        assert_eq!(read_be::<u16>(pk.core(), 0x2e), pk.stat(Stat::SpD));
    }

    #[test]
    fn test_reshape_party_to_box() {
        crate::testing::install();
        let mut pk = Pk2::new(Language::English, true);
        pk.set_species(CELEBI);
        pk.set_level(30);
        pk.set_nicknamed(false);
        let boxed = pk.reshaped(false, Language::English);
        assert!(!boxed.is_party());
        assert_eq!(boxed.level(), 30);
        assert_eq!(boxed.to_bytes().len(), BOX_SIZE + 22);
        assert_eq!(boxed.nickname(), "CELEBI");
    }
}
