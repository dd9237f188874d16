use pkvault_gamedb::{GameVersion, Generation, Language};

use crate::fields::{read_be, read_le, read_u24_be, write_be, write_le, write_u24_be};
use crate::game::gen2::pk2::{self, Pk2};
use crate::game::list::{self, List};
use crate::pkm::{Gender, Pkm};
use crate::pouch::{Layout as PouchLayout, Pouch};
use crate::save::{self, PouchKind, Save as _};
use crate::text::gen12;

pub const SAVE_SIZE: usize = 0x8000;
/// Emulators append the cartridge clock after the battery RAM.
pub const SAVE_SIZE_WITH_RTC: usize = 0x8010;

const MAIN_START: usize = 0x2009;
const BANKS: [usize; 2] = [0x4000, 0x6000];
const DEX_LEN: usize = 32;
const PARTY_CAPACITY: usize = 6;
const BOX_NAME_LEN: usize = 9;
const MAX_MONEY: u32 = 999999;
const MAX_COINS: u16 = 9999;
const SPECIES_UNOWN: u16 = 201;
const UNOWN_FORMS: u8 = 26;

#[derive(PartialEq, Debug, Clone, Copy)]
pub enum Variant {
    GoldSilver,
    Crystal,
}

#[derive(PartialEq, Debug, Clone, Copy)]
pub enum Region {
    International,
    Japanese,
}

#[derive(Debug)]
pub struct Offsets {
    pub variant: Variant,
    pub region: Region,
    pub name_len: usize,
    pub tid: usize,
    pub ot_name: usize,
    pub rival_name: usize,
    pub play_time: usize,
    pub money: usize,
    pub tm_hm: usize,
    pub items: usize,
    pub key_items: usize,
    pub balls: usize,
    pub pc_items: usize,
    pub current_box_index: usize,
    pub box_names: usize,
    pub party: usize,
    pub dex_caught: usize,
    pub dex_seen: usize,
    pub current_box: usize,
    pub player_gender: Option<usize>,
    /// Last byte covered by the checksum.
    pub checksum_end: usize,
    pub checksum: usize,
    pub backup_checksum: usize,
    /// Pieces of the main block mirrored into the backup: source range, destination.
    pub backup: &'static [(std::ops::Range<usize>, usize)],
    pub box_count: usize,
    pub box_capacity: usize,
    pub box_stride: usize,
    pub boxes_in_first_bank: usize,
}

pub const GOLD_SILVER: Offsets = Offsets {
    variant: Variant::GoldSilver,
    region: Region::International,
    name_len: 11,
    tid: 0x2009,
    ot_name: 0x200b,
    rival_name: 0x2021,
    play_time: 0x2053,
    money: 0x23db,
    tm_hm: 0x23e6,
    items: 0x241f,
    key_items: 0x2449,
    balls: 0x2464,
    pc_items: 0x247e,
    current_box_index: 0x2724,
    box_names: 0x2727,
    party: 0x288a,
    dex_caught: 0x2a4c,
    dex_seen: 0x2a6c,
    current_box: 0x2d6c,
    player_gender: None,
    checksum_end: 0x2d68,
    checksum: 0x2d69,
    backup_checksum: 0x7e6d,
    backup: &[
        (0x2009..0x222f, 0x15c7),
        (0x222f..0x23d9, 0x3d69),
        (0x23d9..0x2856, 0x0c6b),
        (0x2856..0x288a, 0x7e39),
        (0x288a..0x2d69, 0x10e8),
    ],
    box_count: 14,
    box_capacity: 20,
    box_stride: 0x450,
    boxes_in_first_bank: 7,
};

pub const CRYSTAL: Offsets = Offsets {
    variant: Variant::Crystal,
    region: Region::International,
    name_len: 11,
    tid: 0x2009,
    ot_name: 0x200b,
    rival_name: 0x2021,
    play_time: 0x2052,
    money: 0x23dc,
    tm_hm: 0x23e7,
    items: 0x2420,
    key_items: 0x244a,
    balls: 0x2465,
    pc_items: 0x247f,
    current_box_index: 0x2700,
    box_names: 0x2703,
    party: 0x2865,
    dex_caught: 0x2a27,
    dex_seen: 0x2a47,
    current_box: 0x2d10,
    player_gender: Some(0x3e3d),
    checksum_end: 0x2b82,
    checksum: 0x2d0d,
    backup_checksum: 0x1f0d,
    backup: &[(0x2009..0x2b83, 0x1209)],
    box_count: 14,
    box_capacity: 20,
    box_stride: 0x450,
    boxes_in_first_bank: 7,
};

// The Japanese Gold/Silver backup block is scattered in a layout not modelled here; it is left untouched and only
// its checksum is kept in step.
pub const GOLD_SILVER_JP: Offsets = Offsets {
    variant: Variant::GoldSilver,
    region: Region::Japanese,
    name_len: 6,
    tid: 0x2009,
    ot_name: 0x200b,
    rival_name: 0x2017,
    play_time: 0x2034,
    money: 0x23bc,
    tm_hm: 0x23c7,
    items: 0x2400,
    key_items: 0x242a,
    balls: 0x2445,
    pc_items: 0x245f,
    current_box_index: 0x2705,
    box_names: 0x2708,
    party: 0x283e,
    dex_caught: 0x29ce,
    dex_seen: 0x29ee,
    current_box: 0x2d10,
    player_gender: None,
    checksum_end: 0x2c8b,
    checksum: 0x2d0d,
    backup_checksum: 0x7f0d,
    backup: &[],
    box_count: 9,
    box_capacity: 30,
    box_stride: 0x54a,
    boxes_in_first_bank: 6,
};

pub const CRYSTAL_JP: Offsets = Offsets {
    variant: Variant::Crystal,
    region: Region::Japanese,
    name_len: 6,
    tid: 0x2009,
    ot_name: 0x200b,
    rival_name: 0x2017,
    play_time: 0x2034,
    money: 0x23be,
    tm_hm: 0x23c9,
    items: 0x2402,
    key_items: 0x242c,
    balls: 0x2447,
    pc_items: 0x2461,
    current_box_index: 0x26e2,
    box_names: 0x26e5,
    party: 0x281a,
    dex_caught: 0x29aa,
    dex_seen: 0x29ca,
    current_box: 0x2d10,
    player_gender: None,
    checksum_end: 0x2ae2,
    checksum: 0x2d0d,
    backup_checksum: 0x7f0d,
    backup: &[(0x2009..0x2ae3, 0x7209)],
    box_count: 9,
    box_capacity: 30,
    box_stride: 0x54a,
    boxes_in_first_bank: 6,
};

const LAYOUTS: &[&Offsets] = &[&GOLD_SILVER, &CRYSTAL, &GOLD_SILVER_JP, &CRYSTAL_JP];

const POUCHES: [PouchKind; 5] = [
    PouchKind::Items,
    PouchKind::KeyItems,
    PouchKind::Balls,
    PouchKind::TmHm,
    PouchKind::Pc,
];

impl Offsets {
    pub fn party_list(&self) -> List {
        List {
            offset: self.party,
            capacity: PARTY_CAPACITY,
            record_size: pk2::PARTY_SIZE,
            name_len: self.name_len,
        }
    }

    fn box_list_at(&self, offset: usize) -> List {
        List {
            offset,
            capacity: self.box_capacity,
            record_size: pk2::BOX_SIZE,
            name_len: self.name_len,
        }
    }

    pub fn box_size(&self) -> usize {
        self.box_list_at(0).size()
    }

    pub fn bank_box_offset(&self, box_index: usize) -> usize {
        if box_index < self.boxes_in_first_bank {
            BANKS[0] + box_index * self.box_stride
        } else {
            BANKS[1] + (box_index - self.boxes_in_first_bank) * self.box_stride
        }
    }

    fn pouch(&self, kind: PouchKind) -> Pouch {
        let (offset, capacity, layout) = match kind {
            PouchKind::Items => (self.items, 20, PouchLayout::CountedPairs),
            PouchKind::KeyItems => (self.key_items, 25, PouchLayout::CountedIds),
            PouchKind::Balls => (self.balls, 12, PouchLayout::CountedPairs),
            PouchKind::TmHm => (self.tm_hm, 57, PouchLayout::TmQuantities),
            PouchKind::Pc => (self.pc_items, 50, PouchLayout::CountedPairs),
        };
        Pouch {
            kind,
            offset,
            capacity,
            layout,
        }
    }

    fn compute_checksum(&self, buf: &[u8]) -> u16 {
        crate::checksum::sum16(&buf[MAIN_START..=self.checksum_end])
    }

    fn probe(&self, buf: &[u8]) -> bool {
        self.party_list().is_valid(buf) && self.box_list_at(self.current_box).is_valid(buf)
    }
}

/// A Gold/Silver/Crystal battery save.
#[derive(Clone)]
pub struct Save {
    buf: Vec<u8>,
    offsets: &'static Offsets,
    language: Language,
    next_box: Option<usize>,
}

impl Save {
    pub fn new(buf: &[u8], options: &save::LoadOptions) -> Result<Self, save::Error> {
        if buf.len() != SAVE_SIZE && buf.len() != SAVE_SIZE_WITH_RTC {
            return Err(save::Error::InvalidSize(buf.len()));
        }

        let candidates = LAYOUTS.iter().copied().filter(|o| o.probe(buf)).collect::<Vec<_>>();
        let offsets = candidates
            .iter()
            .copied()
            .find(|o| o.compute_checksum(buf) == read_le::<u16>(buf, o.checksum))
            .or_else(|| candidates.first().copied())
            .ok_or(save::Error::Unrecognized { len: buf.len() })?;

        let expected = offsets.compute_checksum(buf);
        let actual = read_le::<u16>(buf, offsets.checksum);
        if expected != actual {
            if options.verify_checksums {
                return Err(save::Error::ChecksumMismatch {
                    offset: offsets.checksum,
                    expected,
                    actual,
                });
            }
            log::warn!("gen 2 checksum mismatch: {:04x} != {:04x}", actual, expected);
        }

        let language = match offsets.region {
            Region::Japanese => Language::Japanese,
            Region::International => match options.language {
                Language::Japanese | Language::Korean | Language::ChineseSimplified | Language::ChineseTraditional => {
                    Language::English
                }
                language => language,
            },
        };
        log::debug!(
            "detected gen 2 save: {:?} {:?} ({:?})",
            offsets.variant,
            offsets.region,
            language
        );

        Ok(Self {
            buf: buf.to_vec(),
            offsets,
            language,
            next_box: None,
        })
    }

    /// A save with empty lists and pouches.
    pub fn blank(offsets: &'static Offsets, language: Language) -> Self {
        let mut save = Self {
            buf: vec![0; SAVE_SIZE],
            offsets,
            language: if offsets.region == Region::Japanese {
                Language::Japanese
            } else {
                language
            },
            next_box: None,
        };
        offsets.party_list().clear(&mut save.buf);
        offsets.box_list_at(offsets.current_box).clear(&mut save.buf);
        for box_index in 0..offsets.box_count {
            offsets
                .box_list_at(offsets.bank_box_offset(box_index))
                .clear(&mut save.buf);
        }
        for kind in POUCHES {
            offsets.pouch(kind).fix(&mut save.buf);
        }
        save.buf[offsets.ot_name..][..offsets.name_len].fill(gen12::TERMINATOR);
        save.buf[offsets.rival_name..][..offsets.name_len].fill(gen12::TERMINATOR);
        save.buf[offsets.box_names..][..offsets.box_count * BOX_NAME_LEN].fill(gen12::TERMINATOR);
        save.rebuild_checksum();
        save
    }

    pub fn offsets(&self) -> &'static Offsets {
        self.offsets
    }

    pub fn current_box(&self) -> usize {
        (self.buf[self.offsets.current_box_index] as usize).min(self.offsets.box_count - 1)
    }

    fn box_list(&self, box_index: usize) -> Option<List> {
        if box_index >= self.offsets.box_count {
            return None;
        }
        Some(if box_index == self.current_box() {
            self.offsets.box_list_at(self.offsets.current_box)
        } else {
            self.offsets.box_list_at(self.offsets.bank_box_offset(box_index))
        })
    }

    fn switch_boxes(&mut self) {
        let offsets = self.offsets;
        let current = self.current_box();
        let box_size = offsets.box_size();
        self.buf
            .copy_within(offsets.current_box..offsets.current_box + box_size, offsets.bank_box_offset(current));

        for box_index in 0..offsets.box_count {
            offsets
                .box_list_at(offsets.bank_box_offset(box_index))
                .compact(&mut self.buf, |s| s);
        }

        let next = self.next_box.take().unwrap_or(current);
        let home = offsets.bank_box_offset(next);
        self.buf.copy_within(home..home + box_size, offsets.current_box);
        self.buf[offsets.current_box_index] = next as u8;
    }
}

impl save::Save for Save {
    fn to_vec(&self) -> Vec<u8> {
        self.buf.clone()
    }

    fn as_raw(&self) -> &[u8] {
        &self.buf
    }

    /// Mirrors the main block into the backup, then writes the same sum to both positions.
    fn rebuild_checksum(&mut self) {
        for (src, dst) in self.offsets.backup {
            self.buf.copy_within(src.clone(), *dst);
        }
        let checksum = self.offsets.compute_checksum(&self.buf);
        write_le(&mut self.buf, self.offsets.checksum, checksum);
        write_le(&mut self.buf, self.offsets.backup_checksum, checksum);
    }

    fn finish_editing(&mut self) {
        self.switch_boxes();
        self.offsets.party_list().compact(&mut self.buf, |s| s);
        for kind in POUCHES {
            self.offsets.pouch(kind).fix(&mut self.buf);
        }
        self.rebuild_checksum();
    }

    fn view_trainer(&self) -> Option<Box<dyn save::TrainerView + '_>> {
        Some(Box::new(TrainerView { save: self }))
    }

    fn view_trainer_mut(&mut self) -> Option<Box<dyn save::TrainerViewMut + '_>> {
        Some(Box::new(TrainerViewMut { save: self }))
    }

    fn view_boxes(&self) -> Option<Box<dyn save::BoxesView + '_>> {
        Some(Box::new(BoxesView { save: self }))
    }

    fn view_boxes_mut(&mut self) -> Option<Box<dyn save::BoxesViewMut + '_>> {
        Some(Box::new(BoxesViewMut { save: self }))
    }

    fn view_party(&self) -> Option<Box<dyn save::PartyView + '_>> {
        Some(Box::new(PartyView { save: self }))
    }

    fn view_party_mut(&mut self) -> Option<Box<dyn save::PartyViewMut + '_>> {
        Some(Box::new(PartyViewMut { save: self }))
    }

    fn view_pouches(&self) -> Option<Box<dyn save::PouchesView + '_>> {
        Some(Box::new(PouchesView { save: self }))
    }

    fn view_pouches_mut(&mut self) -> Option<Box<dyn save::PouchesViewMut + '_>> {
        Some(Box::new(PouchesViewMut { save: self }))
    }

    fn view_dex(&self) -> Option<Box<dyn save::DexView + '_>> {
        Some(Box::new(DexView { save: self }))
    }

    fn view_dex_mut(&mut self) -> Option<Box<dyn save::DexViewMut + '_>> {
        Some(Box::new(DexViewMut { save: self }))
    }
}

impl save::TransferTarget for Save {
    fn generation(&self) -> Generation {
        Generation::Two
    }

    /// Gold and Silver share a layout; both report as Gold.
    fn version(&self) -> GameVersion {
        match self.offsets.variant {
            Variant::GoldSilver => GameVersion::GD,
            Variant::Crystal => GameVersion::C,
        }
    }

    fn language(&self) -> Language {
        self.language
    }

    fn tid(&self) -> u16 {
        read_be(&self.buf, self.offsets.tid)
    }

    fn ot_name(&self) -> String {
        gen12::decode(&self.buf[self.offsets.ot_name..][..self.offsets.name_len], self.language)
    }

    fn ot_gender(&self) -> Gender {
        match self.offsets.player_gender {
            Some(offset) if self.buf[offset] == 1 => Gender::Female,
            _ => Gender::Male,
        }
    }
}

fn read_record(buf: &[u8], list: &List, slot: usize, language: Language) -> Option<Pk2<Vec<u8>>> {
    if slot >= list.count(buf) {
        return None;
    }
    let s = list.slot(slot);
    if buf[s.core.start] == 0 {
        return None;
    }
    let egg = buf[s.entry.start] == list::EGG;
    Pk2::from_exchange(&[&buf[s.core], &buf[s.ot], &buf[s.nickname]].concat(), language, egg)
}

fn write_record(buf: &mut [u8], list: &List, slot: usize, pkm: &dyn Pkm, party: bool, language: Language) -> bool {
    if slot >= list.capacity || pkm.generation() != Generation::Two {
        return false;
    }
    let Some(record) = Pk2::from_exchange(&pkm.to_bytes(), pkm.language(), pkm.is_egg()) else {
        return false;
    };
    let record = record.reshaped(party, language);
    let s = list.slot(slot);
    list.occupy(buf, slot, record.list_entry());
    buf[s.core].copy_from_slice(record.core());
    buf[s.ot].copy_from_slice(record.raw_ot_name());
    buf[s.nickname].copy_from_slice(record.raw_nickname());
    true
}

fn view_record<'a>(buf: &'a mut [u8], list: &List, slot: usize, language: Language) -> Option<Box<dyn Pkm + 'a>> {
    if slot >= list.count(buf) || buf[list.slot(slot).core.start] == 0 {
        return None;
    }
    let [entry, core, ot, nickname] = list::split_ranges(buf, list.slot(slot).ranges());
    Some(Box::new(Pk2::view(entry, core, ot, nickname, language)))
}

fn delete_record(buf: &mut [u8], list: &List, slot: usize) -> bool {
    if slot >= list.count(buf) {
        return false;
    }
    list.clear_slot(buf, slot);
    true
}

pub struct TrainerView<'a> {
    save: &'a Save,
}

impl<'a> save::TrainerView<'a> for TrainerView<'a> {
    fn name(&self) -> String {
        save::TransferTarget::ot_name(self.save)
    }

    fn rival_name(&self) -> Option<String> {
        let offsets = self.save.offsets;
        Some(gen12::decode(
            &self.save.buf[offsets.rival_name..][..offsets.name_len],
            self.save.language,
        ))
    }

    fn tid(&self) -> u16 {
        save::TransferTarget::tid(self.save)
    }

    fn gender(&self) -> Gender {
        save::TransferTarget::ot_gender(self.save)
    }

    fn money(&self) -> u32 {
        read_u24_be(&self.save.buf, self.save.offsets.money)
    }

    fn max_money(&self) -> u32 {
        MAX_MONEY
    }

    fn coins(&self) -> u16 {
        read_be(&self.save.buf, self.save.offsets.money + 7)
    }

    fn max_coins(&self) -> u16 {
        MAX_COINS
    }

    /// Johto badges in the low byte, Kanto badges in the next.
    fn badges(&self) -> u32 {
        let offset = self.save.offsets.money + 9;
        self.save.buf[offset] as u32 | (self.save.buf[offset + 1] as u32) << 8
    }

    fn play_time(&self) -> save::PlayTime {
        let offset = self.save.offsets.play_time;
        save::PlayTime {
            hours: read_be(&self.save.buf, offset),
            minutes: self.save.buf[offset + 2],
            seconds: self.save.buf[offset + 3],
            frames: self.save.buf[offset + 4],
        }
    }
}

pub struct TrainerViewMut<'a> {
    save: &'a mut Save,
}

impl<'a> save::TrainerViewMut<'a> for TrainerViewMut<'a> {
    fn set_name(&mut self, name: &str) {
        let offsets = self.save.offsets;
        gen12::write(
            &mut self.save.buf[offsets.ot_name..][..offsets.name_len],
            name,
            self.save.language,
        );
    }

    fn set_rival_name(&mut self, name: &str) {
        let offsets = self.save.offsets;
        gen12::write(
            &mut self.save.buf[offsets.rival_name..][..offsets.name_len],
            name,
            self.save.language,
        );
    }

    fn set_tid(&mut self, tid: u16) {
        write_be(&mut self.save.buf, self.save.offsets.tid, tid);
    }

    /// Crystal only; the other releases have no player gender.
    fn set_gender(&mut self, gender: Gender) {
        if let Some(offset) = self.save.offsets.player_gender {
            self.save.buf[offset] = (gender == Gender::Female) as u8;
        }
    }

    fn set_money(&mut self, money: u32) {
        write_u24_be(&mut self.save.buf, self.save.offsets.money, money.min(MAX_MONEY));
    }

    fn set_coins(&mut self, coins: u16) {
        write_be(&mut self.save.buf, self.save.offsets.money + 7, coins.min(MAX_COINS));
    }

    fn set_badges(&mut self, badges: u32) {
        let offset = self.save.offsets.money + 9;
        self.save.buf[offset] = badges as u8;
        self.save.buf[offset + 1] = (badges >> 8) as u8;
    }

    fn set_play_time(&mut self, play_time: save::PlayTime) {
        let offset = self.save.offsets.play_time;
        write_be(&mut self.save.buf, offset, play_time.hours.min(999));
        self.save.buf[offset + 2] = play_time.minutes.min(59);
        self.save.buf[offset + 3] = play_time.seconds.min(59);
        self.save.buf[offset + 4] = play_time.frames.min(59);
    }
}

pub struct BoxesView<'a> {
    save: &'a Save,
}

impl<'a> save::BoxesView<'a> for BoxesView<'a> {
    fn box_count(&self) -> usize {
        self.save.offsets.box_count
    }

    fn slots_per_box(&self) -> usize {
        self.save.offsets.box_capacity
    }

    fn current_box(&self) -> usize {
        self.save.current_box()
    }

    fn box_name(&self, box_index: usize) -> Option<String> {
        if box_index >= self.save.offsets.box_count {
            return None;
        }
        Some(gen12::decode(
            &self.save.buf[self.save.offsets.box_names + box_index * BOX_NAME_LEN..][..BOX_NAME_LEN],
            self.save.language,
        ))
    }

    fn count(&self, box_index: usize) -> usize {
        self.save
            .box_list(box_index)
            .map(|list| list.count(&self.save.buf))
            .unwrap_or(0)
    }

    fn pkm(&self, box_index: usize, slot: usize) -> Option<Box<dyn Pkm>> {
        let list = self.save.box_list(box_index)?;
        read_record(&self.save.buf, &list, slot, self.save.language).map(|pk| Box::new(pk) as Box<dyn Pkm>)
    }
}

pub struct BoxesViewMut<'a> {
    save: &'a mut Save,
}

impl<'a> save::BoxesViewMut<'a> for BoxesViewMut<'a> {
    fn set_current_box(&mut self, box_index: usize) -> bool {
        if box_index >= self.save.offsets.box_count {
            return false;
        }
        self.save.next_box = Some(box_index);
        true
    }

    fn set_box_name(&mut self, box_index: usize, name: &str) -> bool {
        if box_index >= self.save.offsets.box_count {
            return false;
        }
        let offset = self.save.offsets.box_names + box_index * BOX_NAME_LEN;
        gen12::write(&mut self.save.buf[offset..][..BOX_NAME_LEN], name, self.save.language);
        true
    }

    fn set_pkm(&mut self, box_index: usize, slot: usize, pkm: &dyn Pkm) -> bool {
        let Some(list) = self.save.box_list(box_index) else {
            return false;
        };
        let language = self.save.language;
        write_record(&mut self.save.buf, &list, slot, pkm, false, language)
    }

    fn delete_pkm(&mut self, box_index: usize, slot: usize) -> bool {
        let Some(list) = self.save.box_list(box_index) else {
            return false;
        };
        delete_record(&mut self.save.buf, &list, slot)
    }

    fn pkm_mut(&mut self, box_index: usize, slot: usize) -> Option<Box<dyn Pkm + '_>> {
        let list = self.save.box_list(box_index)?;
        let language = self.save.language;
        view_record(&mut self.save.buf, &list, slot, language)
    }

    fn compact(&mut self, box_index: usize) {
        if let Some(list) = self.save.box_list(box_index) {
            list.compact(&mut self.save.buf, |s| s);
        }
    }
}

pub struct PartyView<'a> {
    save: &'a Save,
}

impl<'a> save::PartyView<'a> for PartyView<'a> {
    fn count(&self) -> usize {
        self.save.offsets.party_list().count(&self.save.buf)
    }

    fn pkm(&self, slot: usize) -> Option<Box<dyn Pkm>> {
        read_record(
            &self.save.buf,
            &self.save.offsets.party_list(),
            slot,
            self.save.language,
        )
        .map(|pk| Box::new(pk) as Box<dyn Pkm>)
    }
}

pub struct PartyViewMut<'a> {
    save: &'a mut Save,
}

impl<'a> save::PartyViewMut<'a> for PartyViewMut<'a> {
    fn set_pkm(&mut self, slot: usize, pkm: &dyn Pkm) -> bool {
        let list = self.save.offsets.party_list();
        let language = self.save.language;
        write_record(&mut self.save.buf, &list, slot, pkm, true, language)
    }

    fn delete_pkm(&mut self, slot: usize) -> bool {
        let list = self.save.offsets.party_list();
        delete_record(&mut self.save.buf, &list, slot)
    }

    fn pkm_mut(&mut self, slot: usize) -> Option<Box<dyn Pkm + '_>> {
        let list = self.save.offsets.party_list();
        let language = self.save.language;
        view_record(&mut self.save.buf, &list, slot, language)
    }

    fn compact(&mut self) {
        self.save.offsets.party_list().compact(&mut self.save.buf, |s| s);
    }
}

pub struct PouchesView<'a> {
    save: &'a Save,
}

impl<'a> save::PouchesView<'a> for PouchesView<'a> {
    fn kinds(&self) -> Vec<PouchKind> {
        POUCHES.to_vec()
    }

    fn capacity(&self, kind: PouchKind) -> usize {
        self.save.offsets.pouch(kind).capacity
    }

    fn items(&self, kind: PouchKind) -> Vec<save::Item> {
        self.save.offsets.pouch(kind).items(&self.save.buf)
    }
}

pub struct PouchesViewMut<'a> {
    save: &'a mut Save,
}

impl<'a> save::PouchesViewMut<'a> for PouchesViewMut<'a> {
    fn set_item(&mut self, kind: PouchKind, slot: usize, item: save::Item) -> bool {
        self.save.offsets.pouch(kind).set_item(&mut self.save.buf, slot, item)
    }

    fn fix_item_lists(&mut self) {
        for kind in POUCHES {
            self.save.offsets.pouch(kind).fix(&mut self.save.buf);
        }
    }
}

pub struct DexView<'a> {
    save: &'a Save,
}

impl<'a> save::DexView<'a> for DexView<'a> {
    fn seen(&self, species: u16) -> bool {
        save::dex_bit(&self.save.buf, self.save.offsets.dex_seen, DEX_LEN, species)
    }

    fn caught(&self, species: u16) -> bool {
        save::dex_bit(&self.save.buf, self.save.offsets.dex_caught, DEX_LEN, species)
    }
}

pub struct DexViewMut<'a> {
    save: &'a mut Save,
}

impl<'a> save::DexViewMut<'a> for DexViewMut<'a> {
    fn set_seen(&mut self, species: u16, seen: bool) {
        let offset = self.save.offsets.dex_seen;
        save::set_dex_bit(&mut self.save.buf, offset, DEX_LEN, species, seen);
    }

    /// Catching Unown also fills the Unown form list; the Pokédex crashes on an Unown entry without one.
    fn set_caught(&mut self, species: u16, caught: bool) {
        let offsets = self.save.offsets;
        save::set_dex_bit(&mut self.save.buf, offsets.dex_caught, DEX_LEN, species, caught);
        if species == SPECIES_UNOWN && caught {
            let forms = offsets.dex_seen + DEX_LEN;
            for form in 1..=UNOWN_FORMS {
                self.save.buf[forms + form as usize - 1] = form;
            }
        }
    }
}
