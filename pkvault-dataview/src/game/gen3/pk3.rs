use pkvault_gamedb::{GameVersion, Generation, Language};

use crate::fields::{read_le, write_le};
use crate::game::modern::{self, RawIvs};
use crate::pkm::{crypto, Gender, Pkm, PkmClone, Stat};
use crate::text::gen3;

pub const BOX_SIZE: usize = 80;
pub const PARTY_SIZE: usize = 100;

const BLOCK_SIZE: usize = 12;
const BLOCKS_START: usize = 0x20;
const BLOCKS_END: usize = BLOCKS_START + 4 * BLOCK_SIZE;

const PID_OFFSET: usize = 0x00;
const TID_OFFSET: usize = 0x04;
const SID_OFFSET: usize = 0x06;
const NICKNAME_OFFSET: usize = 0x08;
const NICKNAME_LEN: usize = 10;
const LANGUAGE_OFFSET: usize = 0x12;
const FLAGS_OFFSET: usize = 0x13;
const OT_NAME_OFFSET: usize = 0x14;
const OT_NAME_LEN: usize = 7;
const CHECKSUM_OFFSET: usize = 0x1c;
const SPECIES_OFFSET: usize = 0x20;
const HELD_ITEM_OFFSET: usize = 0x22;
const EXP_OFFSET: usize = 0x24;
const PP_UPS_OFFSET: usize = 0x28;
const FRIENDSHIP_OFFSET: usize = 0x29;
const MOVES_OFFSET: usize = 0x2c;
const PP_OFFSET: usize = 0x34;
const EVS_OFFSET: usize = 0x38;
const POKERUS_OFFSET: usize = 0x44;
const MET_LOCATION_OFFSET: usize = 0x45;
const ORIGINS_OFFSET: usize = 0x46;
const IVS_OFFSET: usize = 0x48;
const RIBBONS_OFFSET: usize = 0x4c;
const STATUS_OFFSET: usize = 0x50;
const LEVEL_OFFSET: usize = 0x54;
const CURRENT_HP_OFFSET: usize = 0x56;
const STATS_OFFSET: usize = 0x58;

const FLAG_HAS_SPECIES: u8 = 1 << 1;
const FLAG_EGG_NAME: u8 = 1 << 2;
const RIBBON_FATEFUL: u32 = 1 << 31;

#[repr(transparent)]
#[derive(bytemuck::AnyBitPattern, bytemuck::NoUninit, Clone, Copy, Default, c2rust_bitfields::BitfieldStruct)]
struct RawOrigins {
    #[bitfield(name = "met_level", ty = "u8", bits = "0..=6")]
    #[bitfield(name = "version", ty = "u8", bits = "7..=10")]
    #[bitfield(name = "ball", ty = "u8", bits = "11..=14")]
    #[bitfield(name = "ot_female", ty = "bool", bits = "15..=15")]
    origins: [u8; 2],
}
const _: () = assert!(std::mem::size_of::<RawOrigins>() == 0x2);

/// A Ruby/Sapphire/Emerald/FireRed/LeafGreen record, held decrypted.
#[derive(Clone)]
pub struct Pk3 {
    data: Vec<u8>,
}

impl Pk3 {
    pub fn new(party: bool) -> Self {
        let mut data = vec![0; if party { PARTY_SIZE } else { BOX_SIZE }];
        data[NICKNAME_OFFSET..][..NICKNAME_LEN].fill(gen3::TERMINATOR);
        data[OT_NAME_OFFSET..][..OT_NAME_LEN].fill(gen3::TERMINATOR);
        data[LANGUAGE_OFFSET] = Language::English.id();
        Self { data }
    }

    /// Wraps decrypted bytes.
    pub fn from_bytes(buf: &[u8]) -> Option<Self> {
        if buf.len() != BOX_SIZE && buf.len() != PARTY_SIZE {
            return None;
        }
        Some(Self { data: buf.to_vec() })
    }

    /// Decrypts a record as stored in a save.
    pub fn decrypt(ekm: &[u8]) -> Option<Self> {
        let mut pk = Self::from_bytes(ekm)?;
        let key = pk.xor_key();
        crypto::xor32(&mut pk.data[BLOCKS_START..BLOCKS_END], key);
        let pid = pk.pid();
        crypto::shuffle(&mut pk.data, pid as usize % 24, BLOCK_SIZE, BLOCKS_START);
        Some(pk)
    }

    pub fn encrypt(&self) -> Vec<u8> {
        let mut ekm = self.data.clone();
        crypto::unshuffle(&mut ekm, self.pid() as usize % 24, BLOCK_SIZE, BLOCKS_START);
        crypto::xor32(&mut ekm[BLOCKS_START..BLOCKS_END], self.xor_key());
        ekm
    }

    pub fn decrypted(&self) -> &[u8] {
        &self.data
    }

    fn xor_key(&self) -> u32 {
        self.pid() ^ read_le::<u32>(&self.data, TID_OFFSET)
    }

    fn origins(&self) -> RawOrigins {
        bytemuck::pod_read_unaligned(&self.data[ORIGINS_OFFSET..][..2])
    }

    fn update_origins(&mut self, f: impl FnOnce(&mut RawOrigins)) {
        let mut origins = self.origins();
        f(&mut origins);
        self.data[ORIGINS_OFFSET..][..2].copy_from_slice(bytemuck::bytes_of(&origins));
    }

    fn ivs(&self) -> RawIvs {
        RawIvs::read(&self.data, IVS_OFFSET)
    }

    fn compute_checksum(&self) -> u16 {
        crate::checksum::sum16_words(&self.data[BLOCKS_START..BLOCKS_END])
    }

    /// Gen 3 stores its own item ids; other generations go through the item map.
    pub fn set_held_item_raw(&mut self, item: u16) {
        write_le(&mut self.data, HELD_ITEM_OFFSET, item);
    }
}

impl PkmClone for Pk3 {
    fn clone_box(&self) -> Box<dyn Pkm> {
        Box::new(self.clone())
    }
}

impl Pkm for Pk3 {
    fn generation(&self) -> Generation {
        Generation::Three
    }

    fn is_party(&self) -> bool {
        self.data.len() == PARTY_SIZE
    }

    fn to_bytes(&self) -> Vec<u8> {
        self.data.clone()
    }

    fn species(&self) -> u16 {
        crate::ids::gen3_to_national(read_le(&self.data, SPECIES_OFFSET))
    }

    fn set_species(&mut self, species: u16) {
        let species = species.min(Generation::Three.max_species());
        write_le(&mut self.data, SPECIES_OFFSET, crate::ids::national_to_gen3(species));
        if species == 0 {
            self.data[FLAGS_OFFSET] &= !FLAG_HAS_SPECIES;
        } else {
            self.data[FLAGS_OFFSET] |= FLAG_HAS_SPECIES;
        }
    }

    fn held_item(&self) -> u16 {
        read_le(&self.data, HELD_ITEM_OFFSET)
    }

    fn set_held_item(&mut self, item: u16) {
        self.set_held_item_raw(item.min(Generation::Three.max_item()));
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
        if slot >= 4 {
            return;
        }
        write_le(&mut self.data, MOVES_OFFSET + slot * 2, id.min(Generation::Three.max_move()));
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
        modern::packed_pp_ups(self.data[PP_UPS_OFFSET], slot)
    }

    fn set_pp_ups(&mut self, slot: usize, ups: u8) {
        if slot < 4 {
            self.data[PP_UPS_OFFSET] = modern::set_packed_pp_ups(self.data[PP_UPS_OFFSET], slot, ups);
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
        gen3::decode(&self.data[OT_NAME_OFFSET..][..OT_NAME_LEN])
    }

    fn set_ot_name(&mut self, name: &str) {
        gen3::write(&mut self.data[OT_NAME_OFFSET..][..OT_NAME_LEN], name);
    }

    fn ot_gender(&self) -> Gender {
        if self.origins().ot_female() {
            Gender::Female
        } else {
            Gender::Male
        }
    }

    fn set_ot_gender(&mut self, gender: Gender) {
        self.update_origins(|o| o.set_ot_female(gender == Gender::Female));
    }

    fn nickname(&self) -> String {
        gen3::decode(&self.data[NICKNAME_OFFSET..][..NICKNAME_LEN])
    }

    fn set_nickname(&mut self, name: &str) {
        gen3::write(&mut self.data[NICKNAME_OFFSET..][..NICKNAME_LEN], name);
    }

    /// Gen 3 has no nickname flag; a name matching a default species name in any language is not a nickname.
    fn is_nicknamed(&self) -> bool {
        !self.is_egg() && !crate::pkm::is_default_name(self.species(), &self.nickname(), Generation::Three, true)
    }

    fn set_nicknamed(&mut self, nicknamed: bool) {
        if !nicknamed {
            let name = crate::pkm::default_name(self.species(), self.language(), true);
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
        GameVersion::from_id(self.origins().version())
    }

    fn set_version(&mut self, version: GameVersion) {
        self.update_origins(|o| o.set_version(version.id() & 0xf));
    }

    fn is_egg(&self) -> bool {
        self.ivs().egg()
    }

    fn set_egg(&mut self, egg: bool) {
        modern::update_ivs(&mut self.data, IVS_OFFSET, |ivs| ivs.set_egg(egg));
        if egg {
            self.data[FLAGS_OFFSET] |= FLAG_EGG_NAME;
        } else {
            self.data[FLAGS_OFFSET] &= !FLAG_EGG_NAME;
        }
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

    fn nature(&self) -> u8 {
        (self.pid() % 25) as u8
    }

    fn ability(&self) -> u16 {
        let slot = self.ivs().flag() as usize;
        self.personal().map(|p| p.abilities[slot]).unwrap_or(0)
    }

    fn ability_number(&self) -> u8 {
        if self.ivs().flag() {
            2
        } else {
            1
        }
    }

    fn set_ability_number(&mut self, number: u8) {
        modern::update_ivs(&mut self.data, IVS_OFFSET, |ivs| ivs.set_flag(number == 2));
    }

    fn gender(&self) -> Gender {
        let ratio = self.personal().map(|p| p.gender_ratio).unwrap_or(crate::data::GENDERLESS);
        crate::pkm::gender_from_pid(self.pid(), ratio)
    }

    /// Gender follows from the PID and cannot be set on its own.
    fn set_gender(&mut self, _gender: Gender) {}

    fn is_shiny(&self) -> bool {
        crate::pkm::is_shiny_pid(self.pid(), self.tid(), self.sid(), Generation::Three)
    }

    /// Rewrites the PID's upper bytes, keeping gender, ability slot and nature.
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
        self.origins().ball()
    }

    fn set_ball(&mut self, ball: u8) {
        self.update_origins(|o| o.set_ball(ball.min(12)));
    }

    fn met_location(&self) -> u16 {
        self.data[MET_LOCATION_OFFSET] as u16
    }

    fn set_met_location(&mut self, location: u16) {
        self.data[MET_LOCATION_OFFSET] = location.min(0xff) as u8;
    }

    fn met_level(&self) -> u8 {
        self.origins().met_level()
    }

    fn set_met_level(&mut self, level: u8) {
        self.update_origins(|o| o.set_met_level(level.min(100)));
    }

    fn fateful_encounter(&self) -> bool {
        read_le::<u32>(&self.data, RIBBONS_OFFSET) & RIBBON_FATEFUL != 0
    }

    fn set_fateful_encounter(&mut self, fateful: bool) {
        let ribbons = read_le::<u32>(&self.data, RIBBONS_OFFSET) & !RIBBON_FATEFUL;
        write_le(
            &mut self.data,
            RIBBONS_OFFSET,
            ribbons | if fateful { RIBBON_FATEFUL } else { 0 },
        );
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
