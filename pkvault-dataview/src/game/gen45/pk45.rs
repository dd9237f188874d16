use pkvault_gamedb::{GameVersion, Generation, Language};

use crate::fields::{read_le, write_le};
use crate::game::modern::{self, RawFlags, RawIvs};
use crate::pkm::{crypto, Gender, Pkm, PkmClone, Stat};
use crate::text::{gen4, utf16};

pub const BOX_SIZE: usize = 136;
pub const PARTY_SIZE_GEN4: usize = 236;
pub const PARTY_SIZE_GEN5: usize = 220;

const BLOCK_SIZE: usize = 32;
const BLOCKS_END: usize = crypto::BLOCKS_START + 4 * BLOCK_SIZE;

const PID_OFFSET: usize = 0x00;
const CHECKSUM_OFFSET: usize = 0x06;
const SPECIES_OFFSET: usize = 0x08;
const HELD_ITEM_OFFSET: usize = 0x0a;
const TID_OFFSET: usize = 0x0c;
const SID_OFFSET: usize = 0x0e;
const EXP_OFFSET: usize = 0x10;
const FRIENDSHIP_OFFSET: usize = 0x14;
const ABILITY_OFFSET: usize = 0x15;
const LANGUAGE_OFFSET: usize = 0x17;
const EVS_OFFSET: usize = 0x18;
const MOVES_OFFSET: usize = 0x28;
const PP_OFFSET: usize = 0x30;
const PP_UPS_OFFSET: usize = 0x34;
const IVS_OFFSET: usize = 0x38;
const FLAGS_OFFSET: usize = 0x40;
/// Gen 5 only.
const NATURE_OFFSET: usize = 0x41;
/// Gen 5 only: bit 0 marks the hidden ability.
const HIDDEN_ABILITY_OFFSET: usize = 0x42;
/// Gen 4 only: Platinum/HeartGold/SoulSilver locations that Diamond/Pearl cannot show.
const EGG_LOCATION_EXTENDED_OFFSET: usize = 0x44;
const MET_LOCATION_EXTENDED_OFFSET: usize = 0x46;
const NICKNAME_OFFSET: usize = 0x48;
const NICKNAME_LEN: usize = 22;
const VERSION_OFFSET: usize = 0x5f;
const OT_NAME_OFFSET: usize = 0x68;
const OT_NAME_LEN: usize = 16;
const EGG_DATE_OFFSET: usize = 0x78;
const MET_DATE_OFFSET: usize = 0x7b;
const EGG_LOCATION_OFFSET: usize = 0x7e;
const MET_LOCATION_OFFSET: usize = 0x80;
const POKERUS_OFFSET: usize = 0x82;
const BALL_OFFSET: usize = 0x83;
const MET_LEVEL_OFFSET: usize = 0x84;
/// Gen 4 only: HeartGold/SoulSilver balls.
const BALL_HGSS_OFFSET: usize = 0x86;
const STATUS_OFFSET: usize = 0x88;
const LEVEL_OFFSET: usize = 0x8c;
const CURRENT_HP_OFFSET: usize = 0x8e;
const STATS_OFFSET: usize = 0x90;

const MAX_DP_BALL: u8 = 16;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Format {
    /// Diamond/Pearl/Platinum/HeartGold/SoulSilver.
    Gen4,
    /// Black/White/Black 2/White 2.
    Gen5,
}

impl Format {
    pub fn generation(self) -> Generation {
        match self {
            Format::Gen4 => Generation::Four,
            Format::Gen5 => Generation::Five,
        }
    }

    pub fn party_size(self) -> usize {
        match self {
            Format::Gen4 => PARTY_SIZE_GEN4,
            Format::Gen5 => PARTY_SIZE_GEN5,
        }
    }
}

/// Locations only Platinum and HeartGold/SoulSilver have; Diamond/Pearl show them as a faraway place.
fn is_extended_location(location: u16) -> bool {
    (112..2000).contains(&location) || (2010..=2014).contains(&location)
}

/// A Gen 4 or Gen 5 record, held decrypted. Both share one layout; the few fields that differ are keyed by
/// `Format`.
#[derive(Clone)]
pub struct Pk45 {
    data: Vec<u8>,
    format: Format,
}

impl Pk45 {
    pub fn new(format: Format, party: bool) -> Self {
        let mut pk = Self {
            data: vec![0; if party { format.party_size() } else { BOX_SIZE }],
            format,
        };
        pk.set_nickname("");
        pk.set_ot_name("");
        pk.set_language(Language::English);
        pk
    }

    pub fn from_bytes(format: Format, buf: &[u8]) -> Option<Self> {
        if buf.len() != BOX_SIZE && buf.len() != format.party_size() {
            return None;
        }
        Some(Self {
            data: buf.to_vec(),
            format,
        })
    }

    pub fn decrypt(format: Format, ekm: &[u8]) -> Option<Self> {
        let mut pk = Self::from_bytes(format, ekm)?;
        let pid = pk.pid();
        let seed = read_le::<u16>(&pk.data, CHECKSUM_OFFSET) as u32;
        crypto::decrypt_array(&mut pk.data, BLOCK_SIZE, seed, pid, crypto::shuffle_value(pid));
        Some(pk)
    }

    pub fn encrypt(&self) -> Vec<u8> {
        let mut ekm = self.data.clone();
        let pid = self.pid();
        let seed = read_le::<u16>(&self.data, CHECKSUM_OFFSET) as u32;
        crypto::encrypt_array(&mut ekm, BLOCK_SIZE, seed, pid, crypto::shuffle_value(pid));
        ekm
    }

    pub fn decrypted(&self) -> &[u8] {
        &self.data
    }

    pub fn format(&self) -> Format {
        self.format
    }

    /// The same record in a box-sized buffer.
    pub fn boxed(&self) -> Self {
        Self {
            data: self.data[..BOX_SIZE].to_vec(),
            format: self.format,
        }
    }

    fn ivs(&self) -> RawIvs {
        RawIvs::read(&self.data, IVS_OFFSET)
    }

    fn flags(&self) -> RawFlags {
        RawFlags::read(&self.data, FLAGS_OFFSET)
    }

    fn compute_checksum(&self) -> u16 {
        crate::checksum::sum16_words(&self.data[crypto::BLOCKS_START..BLOCKS_END])
    }

    fn read_text(&self, offset: usize, len: usize) -> String {
        let field = &self.data[offset..][..len];
        match self.format {
            Format::Gen4 => gen4::decode(field),
            Format::Gen5 => utf16::decode(field, utf16::Flavor::Gen5),
        }
    }

    fn write_text(&mut self, offset: usize, len: usize, s: &str) {
        let field = &mut self.data[offset..][..len];
        match self.format {
            Format::Gen4 => gen4::write(field, s),
            Format::Gen5 => utf16::write(field, s, utf16::Flavor::Gen5),
        }
    }

    /// Gen 4 keeps a Diamond/Pearl-visible location and an extended one.
    fn location(&self, dp_offset: usize, extended_offset: usize) -> u16 {
        if self.format == Format::Gen4 {
            let extended = read_le::<u16>(&self.data, extended_offset);
            if extended != 0 {
                return extended;
            }
        }
        read_le(&self.data, dp_offset)
    }

    fn set_location(&mut self, dp_offset: usize, extended_offset: usize, location: u16) {
        if self.format == Format::Gen5 {
            write_le(&mut self.data, dp_offset, location);
            return;
        }
        let dp = if is_extended_location(location) {
            crate::ids::location::FARAWAY_GEN4
        } else {
            location
        };
        write_le(&mut self.data, dp_offset, dp);
        write_le(&mut self.data, extended_offset, location);
    }

    fn has_hidden_ability(&self) -> bool {
        self.format == Format::Gen5 && self.data[HIDDEN_ABILITY_OFFSET] & 1 != 0
    }
}

impl PkmClone for Pk45 {
    fn clone_box(&self) -> Box<dyn Pkm> {
        Box::new(self.clone())
    }
}

impl Pkm for Pk45 {
    fn generation(&self) -> Generation {
        self.format.generation()
    }

    fn is_party(&self) -> bool {
        self.data.len() > BOX_SIZE
    }

    fn to_bytes(&self) -> Vec<u8> {
        self.data.clone()
    }

    fn species(&self) -> u16 {
        read_le(&self.data, SPECIES_OFFSET)
    }

    fn set_species(&mut self, species: u16) {
        let species = species.min(self.generation().max_species());
        write_le(&mut self.data, SPECIES_OFFSET, species);
    }

    fn form(&self) -> u8 {
        self.flags().form()
    }

    fn set_form(&mut self, form: u8) {
        modern::update_flags(&mut self.data, FLAGS_OFFSET, |f| f.set_form(form.min(31)));
    }

    fn held_item(&self) -> u16 {
        read_le(&self.data, HELD_ITEM_OFFSET)
    }

    fn set_held_item(&mut self, item: u16) {
        let item = item.min(self.generation().max_item());
        write_le(&mut self.data, HELD_ITEM_OFFSET, item);
    }

    fn exp(&self) -> u32 {
        read_le(&self.data, EXP_OFFSET)
    }

    fn set_exp(&mut self, exp: u32) {
        let max = self.growth_rate().max_exp();
        write_le(&mut self.data, EXP_OFFSET, exp.min(max));
    }

    fn set_level(&mut self, level: u8) {
        let level = level.clamp(1, 100);
        self.set_exp(self.growth_rate().exp_for_level(level));
        if self.is_party() {
            self.data[LEVEL_OFFSET] = level;
        }
    }

    fn iv(&self, stat: Stat) -> u8 {
        self.ivs().iv(stat)
    }

    fn set_iv(&mut self, stat: Stat, v: u8) {
        modern::update_ivs(&mut self.data, IVS_OFFSET, |ivs| ivs.set_iv(stat, v));
    }

    fn ev(&self, stat: Stat) -> u16 {
        self.data[EVS_OFFSET + stat as usize] as u16
    }

    fn set_ev(&mut self, stat: Stat, v: u16) {
        self.data[EVS_OFFSET + stat as usize] = v.min(255) as u8;
    }

    fn move_id(&self, slot: usize) -> u16 {
        if slot >= 4 {
            return 0;
        }
        read_le(&self.data, MOVES_OFFSET + slot * 2)
    }

    fn set_move_id(&mut self, slot: usize, id: u16) {
        if slot < 4 {
            let id = id.min(self.generation().max_move());
            write_le(&mut self.data, MOVES_OFFSET + slot * 2, id);
        }
    }

    fn pp(&self, slot: usize) -> u8 {
        if slot >= 4 {
            return 0;
        }
        self.data[PP_OFFSET + slot]
    }

    fn set_pp(&mut self, slot: usize, pp: u8) {
        if slot < 4 {
            self.data[PP_OFFSET + slot] = pp;
        }
    }

    fn pp_ups(&self, slot: usize) -> u8 {
        if slot >= 4 {
            return 0;
        }
        self.data[PP_UPS_OFFSET + slot]
    }

    fn set_pp_ups(&mut self, slot: usize, ups: u8) {
        if slot < 4 {
            self.data[PP_UPS_OFFSET + slot] = ups.min(3);
        }
    }

    fn tid(&self) -> u16 {
        read_le(&self.data, TID_OFFSET)
    }

    fn set_tid(&mut self, tid: u16) {
        write_le(&mut self.data, TID_OFFSET, tid);
    }

    fn sid(&self) -> u16 {
        read_le(&self.data, SID_OFFSET)
    }

    fn set_sid(&mut self, sid: u16) {
        write_le(&mut self.data, SID_OFFSET, sid);
    }

    fn ot_name(&self) -> String {
        self.read_text(OT_NAME_OFFSET, OT_NAME_LEN)
    }

    fn set_ot_name(&mut self, name: &str) {
        self.write_text(OT_NAME_OFFSET, OT_NAME_LEN, name);
    }

    fn ot_gender(&self) -> Gender {
        if modern::ot_female(self.data[MET_LEVEL_OFFSET]) {
            Gender::Female
        } else {
            Gender::Male
        }
    }

    fn set_ot_gender(&mut self, gender: Gender) {
        self.data[MET_LEVEL_OFFSET] = modern::with_ot_female(self.data[MET_LEVEL_OFFSET], gender == Gender::Female);
    }

    fn nickname(&self) -> String {
        self.read_text(NICKNAME_OFFSET, NICKNAME_LEN)
    }

    fn set_nickname(&mut self, name: &str) {
        self.write_text(NICKNAME_OFFSET, NICKNAME_LEN, name);
    }

    fn is_nicknamed(&self) -> bool {
        self.ivs().flag()
    }

    fn set_nicknamed(&mut self, nicknamed: bool) {
        modern::update_ivs(&mut self.data, IVS_OFFSET, |ivs| ivs.set_flag(nicknamed));
        if !nicknamed {
            // Gen 4 default names are uppercase; Gen 5 uses the mixed-case names.
            let name = crate::pkm::default_name(self.species(), self.language(), self.format == Format::Gen4);
            self.set_nickname(&name);
        }
    }

    fn language(&self) -> Language {
        Language::from_id(self.data[LANGUAGE_OFFSET]).unwrap_or_default()
    }

    fn set_language(&mut self, language: Language) {
        self.data[LANGUAGE_OFFSET] = language.id();
    }

    fn version(&self) -> Option<GameVersion> {
        GameVersion::from_id(self.data[VERSION_OFFSET])
    }

    fn set_version(&mut self, version: GameVersion) {
        self.data[VERSION_OFFSET] = version.id();
    }

    fn is_egg(&self) -> bool {
        self.ivs().egg()
    }

    fn set_egg(&mut self, egg: bool) {
        modern::update_ivs(&mut self.data, IVS_OFFSET, |ivs| ivs.set_egg(egg));
    }

    fn friendship(&self) -> u8 {
        self.data[FRIENDSHIP_OFFSET]
    }

    fn set_friendship(&mut self, friendship: u8) {
        self.data[FRIENDSHIP_OFFSET] = friendship;
    }

    fn pid(&self) -> u32 {
        read_le(&self.data, PID_OFFSET)
    }

    fn set_pid(&mut self, pid: u32) {
        write_le(&mut self.data, PID_OFFSET, pid);
    }

    /// Gen 4 derives the nature from the PID; Gen 5 stores it.
    fn nature(&self) -> u8 {
        match self.format {
            Format::Gen4 => (self.pid() % 25) as u8,
            Format::Gen5 => self.data[NATURE_OFFSET],
        }
    }

    fn set_nature(&mut self, nature: u8) {
        if self.format == Format::Gen5 {
            self.data[NATURE_OFFSET] = nature.min(24);
        }
    }

    fn ability(&self) -> u16 {
        self.data[ABILITY_OFFSET] as u16
    }

    fn set_ability(&mut self, ability: u16) {
        self.data[ABILITY_OFFSET] = ability.min(self.generation().max_ability()) as u8;
    }

    fn ability_number(&self) -> u8 {
        if self.has_hidden_ability() {
            return 4;
        }
        let bit = match self.format {
            Format::Gen4 => self.pid() & 1,
            Format::Gen5 => (self.pid() >> 16) & 1,
        };
        1 << bit
    }

    /// Only the Gen 5 hidden ability flag is stored; the other slots follow from the PID.
    fn set_ability_number(&mut self, number: u8) {
        if self.format == Format::Gen5 {
            self.data[HIDDEN_ABILITY_OFFSET] = (self.data[HIDDEN_ABILITY_OFFSET] & !1) | (number == 4) as u8;
        }
    }

    fn gender(&self) -> Gender {
        self.flags().gender()
    }

    fn set_gender(&mut self, gender: Gender) {
        modern::update_flags(&mut self.data, FLAGS_OFFSET, |f| f.set_gender(gender));
    }

    fn is_shiny(&self) -> bool {
        crate::pkm::is_shiny_pid(self.pid(), self.tid(), self.sid(), self.generation())
    }

    fn set_shiny(&mut self, shiny: bool) {
        if shiny != self.is_shiny() {
            self.set_pid(modern::shiny_pid(self.pid(), self.tid(), self.sid(), shiny));
        }
    }

    fn pokerus(&self) -> u8 {
        self.data[POKERUS_OFFSET]
    }

    fn set_pokerus(&mut self, pokerus: u8) {
        self.data[POKERUS_OFFSET] = pokerus;
    }

    fn ball(&self) -> u8 {
        match self.format {
            Format::Gen4 => self.data[BALL_OFFSET].max(self.data[BALL_HGSS_OFFSET]),
            Format::Gen5 => self.data[BALL_OFFSET],
        }
    }

    /// Gen 4 keeps balls newer than Diamond/Pearl in a second byte and shows a Poké Ball there.
    fn set_ball(&mut self, ball: u8) {
        match self.format {
            Format::Gen4 if ball > MAX_DP_BALL => {
                self.data[BALL_OFFSET] = crate::pkm::BALL_POKE;
                self.data[BALL_HGSS_OFFSET] = ball;
            }
            Format::Gen4 => {
                self.data[BALL_OFFSET] = ball;
                self.data[BALL_HGSS_OFFSET] = 0;
            }
            Format::Gen5 => self.data[BALL_OFFSET] = ball,
        }
    }

    fn met_location(&self) -> u16 {
        self.location(MET_LOCATION_OFFSET, MET_LOCATION_EXTENDED_OFFSET)
    }

    fn set_met_location(&mut self, location: u16) {
        self.set_location(MET_LOCATION_OFFSET, MET_LOCATION_EXTENDED_OFFSET, location);
    }

    fn met_level(&self) -> u8 {
        modern::met_level(self.data[MET_LEVEL_OFFSET])
    }

    fn set_met_level(&mut self, level: u8) {
        self.data[MET_LEVEL_OFFSET] = modern::with_met_level(self.data[MET_LEVEL_OFFSET], level);
    }

    fn met_date(&self) -> Option<chrono::NaiveDate> {
        modern::read_date(&self.data, MET_DATE_OFFSET)
    }

    fn set_met_date(&mut self, date: Option<chrono::NaiveDate>) {
        modern::write_date(&mut self.data, MET_DATE_OFFSET, date);
    }

    fn egg_location(&self) -> u16 {
        self.location(EGG_LOCATION_OFFSET, EGG_LOCATION_EXTENDED_OFFSET)
    }

    fn set_egg_location(&mut self, location: u16) {
        self.set_location(EGG_LOCATION_OFFSET, EGG_LOCATION_EXTENDED_OFFSET, location);
    }

    fn egg_date(&self) -> Option<chrono::NaiveDate> {
        modern::read_date(&self.data, EGG_DATE_OFFSET)
    }

    fn set_egg_date(&mut self, date: Option<chrono::NaiveDate>) {
        modern::write_date(&mut self.data, EGG_DATE_OFFSET, date);
    }

    fn fateful_encounter(&self) -> bool {
        self.flags().fateful()
    }

    fn set_fateful_encounter(&mut self, fateful: bool) {
        modern::update_flags(&mut self.data, FLAGS_OFFSET, |f| f.set_fateful(fateful));
    }

    fn status(&self) -> u8 {
        if !self.is_party() {
            return 0;
        }
        self.data[STATUS_OFFSET]
    }

    fn set_status(&mut self, status: u8) {
        if self.is_party() {
            write_le(&mut self.data, STATUS_OFFSET, status as u32);
        }
    }

    fn stat(&self, stat: Stat) -> u16 {
        if !self.is_party() {
            return 0;
        }
        read_le(&self.data, STATS_OFFSET + 2 * stat as usize)
    }

    fn set_stat(&mut self, stat: Stat, v: u16) {
        if self.is_party() {
            write_le(&mut self.data, STATS_OFFSET + 2 * stat as usize, v);
        }
    }

    fn current_hp(&self) -> u16 {
        if !self.is_party() {
            return 0;
        }
        read_le(&self.data, CURRENT_HP_OFFSET)
    }

    fn set_current_hp(&mut self, hp: u16) {
        if self.is_party() {
            write_le(&mut self.data, CURRENT_HP_OFFSET, hp);
        }
    }

    fn refresh_stats(&mut self) {
        if !self.is_party() {
            return;
        }
        self.data[LEVEL_OFFSET] = self.level();
        let Some(stats) = self.calc_stats() else {
            return;
        };
        for s in Stat::ALL {
            self.set_stat(s, stats[s as usize]);
        }
        self.set_current_hp(stats[Stat::Hp as usize]);
    }

    fn refresh_checksum(&mut self) {
        let checksum = self.compute_checksum();
        write_le(&mut self.data, CHECKSUM_OFFSET, checksum);
    }

    fn is_checksum_valid(&self) -> bool {
        self.compute_checksum() == read_le::<u16>(&self.data, CHECKSUM_OFFSET)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(format: Format, party: bool) -> Pk45 {
        let mut pk = Pk45::new(format, party);
        pk.set_pid(0xdead_beef);
        pk.set_species(387);
        pk.set_tid(1);
        pk.set_ot_name("Lucas");
        pk.set_nickname("Turtwig");
        pk.set_move_id(0, 33);
        pk.set_iv(Stat::Atk, 30);
        pk.refresh_checksum();
        pk
    }

    #[test]
    fn test_encrypt_round_trip() {
        for (format, party) in [(Format::Gen4, false), (Format::Gen4, true), (Format::Gen5, true)] {
            let pk = record(format, party);
            let ekm = pk.encrypt();
            assert_eq!(ekm.len(), pk.decrypted().len());
            assert_ne!(ekm, pk.decrypted());
            let back = Pk45::decrypt(format, &ekm).unwrap();
            assert_eq!(back.decrypted(), pk.decrypted());
            assert!(back.is_checksum_valid());
            assert_eq!(back.nickname(), "Turtwig");
            assert_eq!(back.iv(Stat::Atk), 30);
        }
    }

    #[test]
    fn test_exp_is_capped_at_level_100() {
        for format in [Format::Gen4, Format::Gen5] {
            let mut pk = record(format, false);
            pk.set_exp(u32::MAX);
            assert_eq!(pk.exp(), pk.growth_rate().max_exp());
        }
    }

    #[test]
    fn test_rejects_wrong_sizes() {
        assert!(Pk45::from_bytes(Format::Gen4, &[0; PARTY_SIZE_GEN5]).is_none());
        assert!(Pk45::from_bytes(Format::Gen5, &[0; PARTY_SIZE_GEN4]).is_none());
        assert!(Pk45::from_bytes(Format::Gen5, &[0; BOX_SIZE]).is_some());
    }

    #[test]
    fn test_gen4_extended_locations() {
        let mut pk = record(Format::Gen4, false);
        pk.set_met_location(crate::ids::location::PAL_PARK);
        assert_eq!(read_le::<u16>(pk.decrypted(), MET_LOCATION_OFFSET), 55);
        assert_eq!(pk.met_location(), 55);

        pk.set_met_location(126);
        assert_eq!(read_le::<u16>(pk.decrypted(), MET_LOCATION_OFFSET), 3002);
        assert_eq!(pk.met_location(), 126);
    }

    #[test]
    fn test_nature_and_ability_by_format() {
        let mut gen4 = record(Format::Gen4, false);
        gen4.set_nature(3);
        assert_eq!(gen4.nature(), (0xdead_beefu32 % 25) as u8);
        assert_eq!(gen4.ability_number(), 2);

        let mut gen5 = record(Format::Gen5, false);
        gen5.set_nature(3);
        assert_eq!(gen5.nature(), 3);
        // Gen 5 reads bit 16 of the PID.
        assert_eq!(gen5.ability_number(), 2);
        gen5.set_pid(0x0000_beef);
        assert_eq!(gen5.ability_number(), 1);
        gen5.set_ability_number(4);
        assert_eq!(gen5.ability_number(), 4);
    }

    #[test]
    fn test_hgss_ball() {
        let mut pk = record(Format::Gen4, false);
        pk.set_ball(20);
        assert_eq!(pk.decrypted()[BALL_OFFSET], 4);
        assert_eq!(pk.ball(), 20);
        pk.set_ball(5);
        assert_eq!(pk.ball(), 5);
    }

    #[test]
    fn test_boxed_drops_party_area() {
        let pk = record(Format::Gen5, true);
        let boxed = pk.boxed();
        assert!(!boxed.is_party());
        assert_eq!(boxed.decrypted(), &pk.decrypted()[..BOX_SIZE]);
    }

    #[test]
    fn test_nickname_flag() {
        crate::testing::install();
        let mut pk = record(Format::Gen4, false);
        pk.set_species(25);
        pk.set_nicknamed(false);
        assert!(!pk.is_nicknamed());
        assert_eq!(pk.nickname(), "PIKACHU");

        let mut pk = record(Format::Gen5, false);
        pk.set_species(25);
        pk.set_nicknamed(false);
        assert_eq!(pk.nickname(), "Pikachu");
    }
}
