use pkvault_gamedb::{GameVersion, Generation, Language};

use crate::fields::{read_be, read_u24_be, write_be, write_u24_be};
use crate::game::gb::{self, RawDvs};
use crate::pkm::{Gender, Pkm, PkmClone, Stat, Type};
use crate::text::gen12;

pub const BOX_SIZE: usize = 0x21;
pub const PARTY_SIZE: usize = 0x2c;

const SPECIES_OFFSET: usize = 0x00;
const CURRENT_HP_OFFSET: usize = 0x01;
const BOX_LEVEL_OFFSET: usize = 0x03;
const STATUS_OFFSET: usize = 0x04;
const TYPES_OFFSET: usize = 0x05;
const CATCH_RATE_OFFSET: usize = 0x07;
const MOVES_OFFSET: usize = 0x08;
const TID_OFFSET: usize = 0x0c;
const EXP_OFFSET: usize = 0x0e;
const STAT_EXP_OFFSET: usize = 0x11;
const DVS_OFFSET: usize = 0x1b;
const PP_OFFSET: usize = 0x1d;
const PARTY_LEVEL_OFFSET: usize = 0x21;
const MAX_HP_OFFSET: usize = 0x22;

/// A Red/Blue/Yellow record. The trainer name and nickname live outside the core record; `B` is either an owned
/// buffer or slices borrowed from a save's list.
pub struct Pk1<B> {
    core: B,
    ot: B,
    nickname: B,
    entry: Option<B>,
    language: Language,
}

impl Pk1<Vec<u8>> {
    /// A blank record with empty names.
    pub fn new(language: Language, party: bool) -> Self {
        let name_len = gen12::name_len(language);
        Self {
            core: vec![0; if party { PARTY_SIZE } else { BOX_SIZE }],
            ot: vec![gen12::TERMINATOR; name_len],
            nickname: vec![gen12::TERMINATOR; name_len],
            entry: None,
            language,
        }
    }

    /// Reads the exchange layout: core record, OT name, nickname.
    pub fn from_exchange(buf: &[u8], language: Language) -> Option<Self> {
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
        })
    }
}

impl<'a> Pk1<&'a mut [u8]> {
    /// A record stored in place. `entry` is its slot in the list's species index.
    pub fn view(
        entry: &'a mut [u8],
        core: &'a mut [u8],
        ot: &'a mut [u8],
        nickname: &'a mut [u8],
        language: Language,
    ) -> Self {
        Self {
            core,
            ot,
            nickname,
            entry: Some(entry),
            language,
        }
    }
}

impl<B> Pk1<B>
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

    /// The internal species index the games store.
    pub fn species_index(&self) -> u8 {
        self.core()[SPECIES_OFFSET]
    }

    pub fn types(&self) -> [u8; 2] {
        [self.core()[TYPES_OFFSET], self.core()[TYPES_OFFSET + 1]]
    }

    fn dvs(&self) -> RawDvs {
        RawDvs::read(self.core(), DVS_OFFSET)
    }

    fn gender_ratio(&self) -> Option<u8> {
        crate::data::get()
            .personal
            .info(Generation::One, crate::ids::gen1_to_national(self.species_index()), 0)
            .map(|p| p.gender_ratio)
    }

    pub fn detached(&self) -> Pk1<Vec<u8>> {
        Pk1 {
            core: self.core.as_ref().to_vec(),
            ot: self.ot.as_ref().to_vec(),
            nickname: self.nickname.as_ref().to_vec(),
            entry: None,
            language: self.language,
        }
    }
}

impl<B> Pk1<B>
where
    B: AsRef<[u8]> + AsMut<[u8]>,
{
    fn core_mut(&mut self) -> &mut [u8] {
        self.core.as_mut()
    }

    /// A copy in the given shape and text region. Party records gain a level byte and freshly computed stats;
    /// names are re-encoded when the region changes, and a trainer name the region cannot spell becomes the
    /// placeholder.
    pub fn reshaped(&self, party: bool, language: Language) -> Pk1<Vec<u8>> {
        let mut out = Pk1::new(language, party);
        out.core[..BOX_SIZE].copy_from_slice(&self.core()[..BOX_SIZE]);

        if gen12::name_len(language) == self.raw_ot_name().len() {
            out.ot.copy_from_slice(self.raw_ot_name());
            out.nickname.copy_from_slice(self.raw_nickname());
        } else {
            gen12::write_or_placeholder(&mut out.ot, &self.ot_name(), language);
            if self.is_nicknamed() {
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
            out.core[PARTY_LEVEL_OFFSET] = self.core()[BOX_LEVEL_OFFSET];
            out.refresh_stats();
        }
        out
    }
}

impl<B> PkmClone for Pk1<B>
where
    B: AsRef<[u8]>,
{
    fn clone_box(&self) -> Box<dyn Pkm> {
        Box::new(self.detached())
    }
}

impl<B> Pkm for Pk1<B>
where
    B: AsRef<[u8]> + AsMut<[u8]>,
{
    fn generation(&self) -> Generation {
        Generation::One
    }

    fn is_party(&self) -> bool {
        self.core().len() == PARTY_SIZE
    }

    fn to_bytes(&self) -> Vec<u8> {
        [self.core(), self.raw_ot_name(), self.raw_nickname()].concat()
    }

    fn species(&self) -> u16 {
        crate::ids::gen1_to_national(self.species_index())
    }

    /// Also rewrites the stored types, which the games keep alongside the species.
    fn set_species(&mut self, species: u16) {
        let index = crate::ids::national_to_gen1(species);
        self.core_mut()[SPECIES_OFFSET] = index;
        if let Some(entry) = self.entry.as_mut() {
            entry.as_mut()[0] = index;
        }
        if let Some(personal) = crate::data::get().personal.info(Generation::One, species, 0) {
            self.core_mut()[TYPES_OFFSET..][..2].copy_from_slice(&personal.types);
        }
    }

    fn catch_rate(&self) -> u8 {
        self.core()[CATCH_RATE_OFFSET]
    }

    fn set_catch_rate(&mut self, rate: u8) {
        self.core_mut()[CATCH_RATE_OFFSET] = rate;
    }

    fn exp(&self) -> u32 {
        read_u24_be(self.core(), EXP_OFFSET)
    }

    fn set_exp(&mut self, exp: u32) {
        write_u24_be(self.core_mut(), EXP_OFFSET, exp);
    }

    fn level(&self) -> u8 {
        if self.is_party() {
            self.core()[PARTY_LEVEL_OFFSET]
        } else {
            self.core()[BOX_LEVEL_OFFSET]
        }
    }

    fn set_level(&mut self, level: u8) {
        let level = level.clamp(1, 100);
        self.core_mut()[BOX_LEVEL_OFFSET] = level;
        if self.is_party() {
            self.core_mut()[PARTY_LEVEL_OFFSET] = level;
        }
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
        self.core_mut()[MOVES_OFFSET + slot] = id.min(Generation::One.max_move()) as u8;
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

    fn nickname(&self) -> String {
        gen12::decode(self.raw_nickname(), self.language)
    }

    fn set_nickname(&mut self, name: &str) {
        gen12::write(self.nickname.as_mut(), name, self.language);
    }

    /// Compared against the species name in every language the generation shipped in, not just the record's own.
    fn is_nicknamed(&self) -> bool {
        !crate::pkm::is_default_name(self.species(), &self.nickname(), Generation::One, true)
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
        None
    }

    fn is_egg(&self) -> bool {
        false
    }

    fn set_egg(&mut self, _egg: bool) {}

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
        self.core()[STATUS_OFFSET]
    }

    fn set_status(&mut self, status: u8) {
        self.core_mut()[STATUS_OFFSET] = status;
    }

    fn current_hp(&self) -> u16 {
        read_be(self.core(), CURRENT_HP_OFFSET)
    }

    fn set_current_hp(&mut self, hp: u16) {
        write_be(self.core_mut(), CURRENT_HP_OFFSET, hp);
    }

    fn stat(&self, stat: Stat) -> u16 {
        if !self.is_party() {
            return 0;
        }
        read_be(self.core(), gb::party_stat_offset(MAX_HP_OFFSET, gen1_stat(stat)))
    }

    fn set_stat(&mut self, stat: Stat, v: u16) {
        if !self.is_party() {
            return;
        }
        write_be(self.core_mut(), gb::party_stat_offset(MAX_HP_OFFSET, gen1_stat(stat)), v);
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

/// Gen 1 has a single Special stat, stored where Gen 2 keeps Sp. Atk.
fn gen1_stat(stat: Stat) -> Stat {
    match stat {
        Stat::SpD => Stat::SpA,
        s => s,
    }
}
