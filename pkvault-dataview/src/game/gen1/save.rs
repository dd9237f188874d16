use pkvault_gamedb::{GameVersion, Generation, Language};

use crate::fields::{read_bcd, read_be, write_bcd, write_be};
use crate::game::gen1::pk1::{self, Pk1};
use crate::game::list::{self, List};
use crate::pkm::Pkm;
use crate::pouch::{Layout as PouchLayout, Pouch};
use crate::save::{self, PouchKind, Save as _};
use crate::text::gen12;

pub const SAVE_SIZE: usize = 0x8000;
/// Some emulators append a footer to battery saves.
pub const SAVE_SIZE_WITH_FOOTER: usize = 0x802c;

const MAIN_START: usize = 0x2598;
const BANKS: [usize; 2] = [0x4000, 0x6000];
const DEX_LEN: usize = 19;
const BOXES_INITIALIZED: u8 = 0x80;
const MONEY_DIGITS: usize = 6;
const COIN_DIGITS: usize = 4;
const PARTY_CAPACITY: usize = 6;
const BAG_CAPACITY: usize = 20;
const PC_CAPACITY: usize = 50;

#[derive(PartialEq, Debug, Clone, Copy)]
pub enum Region {
    International,
    Japanese,
}

#[derive(Debug)]
pub struct Offsets {
    pub name_len: usize,
    pub ot_name: usize,
    pub dex_caught: usize,
    pub dex_seen: usize,
    pub items: usize,
    pub money: usize,
    pub rival_name: usize,
    pub badges: usize,
    pub tid: usize,
    pub pc_items: usize,
    pub current_box_index: usize,
    pub coins: usize,
    pub play_time: usize,
    pub party: usize,
    pub current_box: usize,
    pub checksum: usize,
    pub box_count: usize,
    pub box_capacity: usize,
}

pub const INTERNATIONAL: Offsets = Offsets {
    name_len: 11,
    ot_name: 0x2598,
    dex_caught: 0x25a3,
    dex_seen: 0x25b6,
    items: 0x25c9,
    money: 0x25f3,
    rival_name: 0x25f6,
    badges: 0x2602,
    tid: 0x2605,
    pc_items: 0x27e6,
    current_box_index: 0x284c,
    coins: 0x2850,
    play_time: 0x2ced,
    party: 0x2f2c,
    current_box: 0x30c0,
    checksum: 0x3523,
    box_count: 12,
    box_capacity: 20,
};

pub const JAPANESE: Offsets = Offsets {
    name_len: 6,
    ot_name: 0x2598,
    dex_caught: 0x259e,
    dex_seen: 0x25b1,
    items: 0x25c4,
    money: 0x25ee,
    rival_name: 0x25f1,
    badges: 0x25f8,
    tid: 0x25fb,
    pc_items: 0x27dc,
    current_box_index: 0x2842,
    coins: 0x2846,
    play_time: 0x2ca0,
    party: 0x2ed5,
    current_box: 0x302d,
    checksum: 0x3594,
    box_count: 8,
    box_capacity: 30,
};

impl Offsets {
    pub fn party_list(&self) -> List {
        List {
            offset: self.party,
            capacity: PARTY_CAPACITY,
            record_size: pk1::PARTY_SIZE,
            name_len: self.name_len,
        }
    }

    fn box_list_at(&self, offset: usize) -> List {
        List {
            offset,
            capacity: self.box_capacity,
            record_size: pk1::BOX_SIZE,
            name_len: self.name_len,
        }
    }

    pub fn box_size(&self) -> usize {
        self.box_list_at(0).size()
    }

    fn boxes_per_bank(&self) -> usize {
        self.box_count / BANKS.len()
    }

    /// Where a box lives in the banks. The active box's bank copy is stale until it is written back.
    pub fn bank_box_offset(&self, box_index: usize) -> usize {
        BANKS[box_index / self.boxes_per_bank()] + (box_index % self.boxes_per_bank()) * self.box_size()
    }

    fn bank_checksum(&self, bank: usize) -> usize {
        BANKS[bank] + self.boxes_per_bank() * self.box_size()
    }

    fn pouch(&self, kind: PouchKind) -> Option<Pouch> {
        let (offset, capacity) = match kind {
            PouchKind::Items => (self.items, BAG_CAPACITY),
            PouchKind::Pc => (self.pc_items, PC_CAPACITY),
            _ => return None,
        };
        Some(Pouch {
            kind,
            offset,
            capacity,
            layout: PouchLayout::CountedPairs,
        })
    }

    fn probe(&self, buf: &[u8]) -> bool {
        self.party_list().is_valid(buf) && self.box_list_at(self.current_box).is_valid(buf)
    }
}

/// A Red/Blue/Yellow battery save.
#[derive(Clone)]
pub struct Save {
    buf: Vec<u8>,
    region: Region,
    language: Language,
    next_box: Option<usize>,
}

impl Save {
    pub fn new(buf: &[u8], options: &save::LoadOptions) -> Result<Self, save::Error> {
        if buf.len() != SAVE_SIZE && buf.len() != SAVE_SIZE_WITH_FOOTER {
            return Err(save::Error::InvalidSize(buf.len()));
        }

        let international = INTERNATIONAL.probe(buf);
        let japanese = JAPANESE.probe(buf);
        let region = match (international, japanese) {
            (true, true) if options.language == Language::Japanese => Region::Japanese,
            (true, _) => Region::International,
            (false, true) => Region::Japanese,
            (false, false) => return Err(save::Error::Unrecognized { len: buf.len() }),
        };
        let language = match region {
            Region::Japanese => Language::Japanese,
            Region::International => match options.language {
                Language::Japanese | Language::Korean | Language::ChineseSimplified | Language::ChineseTraditional => {
                    Language::English
                }
                language => language,
            },
        };
        log::debug!("detected gen 1 save: {:?} ({:?})", region, language);

        let mut save = Self {
            buf: buf.to_vec(),
            region,
            language,
            next_box: None,
        };

        let offsets = save.offsets();
        let expected = save.compute_checksum();
        let actual = save.buf[offsets.checksum];
        if expected != actual {
            if options.verify_checksums {
                return Err(save::Error::ChecksumMismatch {
                    offset: offsets.checksum,
                    expected: expected as u16,
                    actual: actual as u16,
                });
            }
            log::warn!("gen 1 checksum mismatch: {:02x} != {:02x}", actual, expected);
        }

        save.repair_banks();
        Ok(save)
    }

    /// A freshly formatted save with empty lists and pouches, as the game writes before the first save.
    pub fn blank(region: Region, language: Language) -> Self {
        let mut save = Self {
            buf: vec![0; SAVE_SIZE],
            region,
            language: if region == Region::Japanese {
                Language::Japanese
            } else {
                language
            },
            next_box: None,
        };
        let offsets = save.offsets();
        offsets.party_list().clear(&mut save.buf);
        offsets.box_list_at(offsets.current_box).clear(&mut save.buf);
        for box_index in 0..offsets.box_count {
            offsets
                .box_list_at(offsets.bank_box_offset(box_index))
                .clear(&mut save.buf);
        }
        for kind in [PouchKind::Items, PouchKind::Pc] {
            if let Some(pouch) = offsets.pouch(kind) {
                pouch.fix(&mut save.buf);
            }
        }
        save.buf[offsets.current_box_index] = BOXES_INITIALIZED;
        save.buf[offsets.ot_name..][..offsets.name_len].fill(gen12::TERMINATOR);
        save.buf[offsets.rival_name..][..offsets.name_len].fill(gen12::TERMINATOR);
        save.rebuild_checksum();
        save
    }

    pub fn region(&self) -> Region {
        self.region
    }

    pub fn offsets(&self) -> &'static Offsets {
        match self.region {
            Region::International => &INTERNATIONAL,
            Region::Japanese => &JAPANESE,
        }
    }

    fn compute_checksum(&self) -> u8 {
        crate::checksum::diff8(&self.buf[MAIN_START..self.offsets().checksum])
    }

    /// Until the player first switches boxes the banks hold whatever the cartridge RAM powered up with.
    fn repair_banks(&mut self) {
        let offsets = self.offsets();
        if self.buf[offsets.current_box_index] & BOXES_INITIALIZED != 0 {
            return;
        }
        log::debug!("gen 1 box banks were never initialized, clearing them");
        for box_index in 0..offsets.box_count {
            offsets
                .box_list_at(offsets.bank_box_offset(box_index))
                .clear(&mut self.buf);
        }
        self.buf[offsets.current_box_index] |= BOXES_INITIALIZED;
    }

    pub fn current_box(&self) -> usize {
        let offsets = self.offsets();
        ((self.buf[offsets.current_box_index] & !BOXES_INITIALIZED) as usize).min(offsets.box_count - 1)
    }

    /// The active box is read from and written to the scratch copy.
    fn box_list(&self, box_index: usize) -> Option<List> {
        let offsets = self.offsets();
        if box_index >= offsets.box_count {
            return None;
        }
        Some(if box_index == self.current_box() {
            offsets.box_list_at(offsets.current_box)
        } else {
            offsets.box_list_at(offsets.bank_box_offset(box_index))
        })
    }

    fn switch_boxes(&mut self) {
        let offsets = self.offsets();
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
        self.buf[offsets.current_box_index] = next as u8 | BOXES_INITIALIZED;
    }
}

impl save::Save for Save {
    fn to_vec(&self) -> Vec<u8> {
        self.buf.clone()
    }

    fn as_raw(&self) -> &[u8] {
        &self.buf
    }

    fn rebuild_checksum(&mut self) {
        let offsets = self.offsets();
        let box_size = offsets.box_size();
        for (bank, start) in BANKS.iter().enumerate() {
            let checksum = offsets.bank_checksum(bank);
            for i in 0..offsets.boxes_per_bank() {
                let box_start = start + i * box_size;
                self.buf[checksum + 1 + i] = crate::checksum::diff8(&self.buf[box_start..box_start + box_size]);
            }
            self.buf[checksum] = crate::checksum::diff8(&self.buf[*start..checksum]);
        }
        self.buf[offsets.checksum] = self.compute_checksum();
    }

    fn finish_editing(&mut self) {
        self.switch_boxes();
        let offsets = self.offsets();
        offsets.party_list().compact(&mut self.buf, |s| s);
        for kind in [PouchKind::Items, PouchKind::Pc] {
            if let Some(pouch) = offsets.pouch(kind) {
                pouch.fix(&mut self.buf);
            }
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
        Generation::One
    }

    /// The cartridge is not recorded; Red, Blue and Yellow share this layout.
    fn version(&self) -> GameVersion {
        GameVersion::RD
    }

    fn language(&self) -> Language {
        self.language
    }

    fn tid(&self) -> u16 {
        read_be(&self.buf, self.offsets().tid)
    }

    fn ot_name(&self) -> String {
        let offsets = self.offsets();
        gen12::decode(&self.buf[offsets.ot_name..][..offsets.name_len], self.language)
    }
}

fn read_record(buf: &[u8], list: &List, slot: usize, language: Language) -> Option<Pk1<Vec<u8>>> {
    if slot >= list.count(buf) {
        return None;
    }
    let s = list.slot(slot);
    if buf[s.core.start] == 0 {
        return None;
    }
    Pk1::from_exchange(&[&buf[s.core], &buf[s.ot], &buf[s.nickname]].concat(), language)
}

fn write_record(buf: &mut [u8], list: &List, slot: usize, pkm: &dyn Pkm, party: bool, language: Language) -> bool {
    if slot >= list.capacity || pkm.generation() != Generation::One {
        return false;
    }
    let Some(record) = Pk1::from_exchange(&pkm.to_bytes(), pkm.language()) else {
        return false;
    };
    let record = record.reshaped(party, language);
    let s = list.slot(slot);
    list.occupy(buf, slot, record.species_index());
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
    Some(Box::new(Pk1::view(entry, core, ot, nickname, language)))
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
        let offsets = self.save.offsets();
        Some(gen12::decode(
            &self.save.buf[offsets.rival_name..][..offsets.name_len],
            self.save.language,
        ))
    }

    fn tid(&self) -> u16 {
        save::TransferTarget::tid(self.save)
    }

    fn money(&self) -> u32 {
        read_bcd(&self.save.buf, self.save.offsets().money, MONEY_DIGITS)
    }

    fn max_money(&self) -> u32 {
        crate::fields::bcd_max(MONEY_DIGITS)
    }

    fn coins(&self) -> u16 {
        read_bcd(&self.save.buf, self.save.offsets().coins, COIN_DIGITS) as u16
    }

    fn max_coins(&self) -> u16 {
        crate::fields::bcd_max(COIN_DIGITS) as u16
    }

    fn badges(&self) -> u32 {
        self.save.buf[self.save.offsets().badges] as u32
    }

    fn play_time(&self) -> save::PlayTime {
        let offset = self.save.offsets().play_time;
        save::PlayTime {
            hours: self.save.buf[offset] as u16,
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
        let offsets = self.save.offsets();
        gen12::write(
            &mut self.save.buf[offsets.ot_name..][..offsets.name_len],
            name,
            self.save.language,
        );
    }

    fn set_rival_name(&mut self, name: &str) {
        let offsets = self.save.offsets();
        gen12::write(
            &mut self.save.buf[offsets.rival_name..][..offsets.name_len],
            name,
            self.save.language,
        );
    }

    fn set_tid(&mut self, tid: u16) {
        let offset = self.save.offsets().tid;
        write_be(&mut self.save.buf, offset, tid);
    }

    fn set_money(&mut self, money: u32) {
        let offset = self.save.offsets().money;
        write_bcd(&mut self.save.buf, offset, MONEY_DIGITS, money);
    }

    fn set_coins(&mut self, coins: u16) {
        let offset = self.save.offsets().coins;
        write_bcd(&mut self.save.buf, offset, COIN_DIGITS, coins as u32);
    }

    fn set_badges(&mut self, badges: u32) {
        let offset = self.save.offsets().badges;
        self.save.buf[offset] = badges as u8;
    }

    fn set_play_time(&mut self, play_time: save::PlayTime) {
        let offset = self.save.offsets().play_time;
        self.save.buf[offset] = play_time.hours.min(255) as u8;
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
        self.save.offsets().box_count
    }

    fn slots_per_box(&self) -> usize {
        self.save.offsets().box_capacity
    }

    fn current_box(&self) -> usize {
        self.save.current_box()
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
        if box_index >= self.save.offsets().box_count {
            return false;
        }
        self.save.next_box = Some(box_index);
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
        self.save.offsets().party_list().count(&self.save.buf)
    }

    fn pkm(&self, slot: usize) -> Option<Box<dyn Pkm>> {
        read_record(
            &self.save.buf,
            &self.save.offsets().party_list(),
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
        let list = self.save.offsets().party_list();
        let language = self.save.language;
        write_record(&mut self.save.buf, &list, slot, pkm, true, language)
    }

    fn delete_pkm(&mut self, slot: usize) -> bool {
        let list = self.save.offsets().party_list();
        delete_record(&mut self.save.buf, &list, slot)
    }

    fn pkm_mut(&mut self, slot: usize) -> Option<Box<dyn Pkm + '_>> {
        let list = self.save.offsets().party_list();
        let language = self.save.language;
        view_record(&mut self.save.buf, &list, slot, language)
    }

    fn compact(&mut self) {
        self.save.offsets().party_list().compact(&mut self.save.buf, |s| s);
    }
}

pub struct PouchesView<'a> {
    save: &'a Save,
}

impl<'a> save::PouchesView<'a> for PouchesView<'a> {
    fn kinds(&self) -> Vec<PouchKind> {
        vec![PouchKind::Items, PouchKind::Pc]
    }

    fn capacity(&self, kind: PouchKind) -> usize {
        self.save.offsets().pouch(kind).map(|p| p.capacity).unwrap_or(0)
    }

    fn items(&self, kind: PouchKind) -> Vec<save::Item> {
        self.save
            .offsets()
            .pouch(kind)
            .map(|p| p.items(&self.save.buf))
            .unwrap_or_default()
    }
}

pub struct PouchesViewMut<'a> {
    save: &'a mut Save,
}

impl<'a> save::PouchesViewMut<'a> for PouchesViewMut<'a> {
    fn set_item(&mut self, kind: PouchKind, slot: usize, item: save::Item) -> bool {
        let Some(pouch) = self.save.offsets().pouch(kind) else {
            return false;
        };
        pouch.set_item(&mut self.save.buf, slot, item)
    }

    fn fix_item_lists(&mut self) {
        for kind in [PouchKind::Items, PouchKind::Pc] {
            if let Some(pouch) = self.save.offsets().pouch(kind) {
                pouch.fix(&mut self.save.buf);
            }
        }
    }
}

pub struct DexView<'a> {
    save: &'a Save,
}

impl<'a> save::DexView<'a> for DexView<'a> {
    fn seen(&self, species: u16) -> bool {
        save::dex_bit(&self.save.buf, self.save.offsets().dex_seen, DEX_LEN, species)
    }

    fn caught(&self, species: u16) -> bool {
        save::dex_bit(&self.save.buf, self.save.offsets().dex_caught, DEX_LEN, species)
    }
}

pub struct DexViewMut<'a> {
    save: &'a mut Save,
}

impl<'a> save::DexViewMut<'a> for DexViewMut<'a> {
    fn set_seen(&mut self, species: u16, seen: bool) {
        let offset = self.save.offsets().dex_seen;
        save::set_dex_bit(&mut self.save.buf, offset, DEX_LEN, species, seen);
    }

    fn set_caught(&mut self, species: u16, caught: bool) {
        let offset = self.save.offsets().dex_caught;
        save::set_dex_bit(&mut self.save.buf, offset, DEX_LEN, species, caught);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pkm::Stat;
    use crate::save::{Save as _, TransferTarget as _};

    const MEW: u16 = 151;
    const MEWTWO: u16 = 150;
    const BULBASAUR: u16 = 1;

    fn mon(species: u16, level: u8) -> Pk1<Vec<u8>> {
        let mut pk = Pk1::new(Language::English, false);
        pk.set_species(species);
        pk.set_level(level);
        pk.set_ot_name("RED");
        pk.set_nicknamed(false);
        pk
    }

    #[test]
    fn test_offsets_fit_their_regions() {
        for offsets in [&INTERNATIONAL, &JAPANESE] {
            assert_eq!(offsets.party + offsets.party_list().size(), offsets.current_box);
            assert!(offsets.current_box + offsets.box_size() <= offsets.checksum);
            for bank in 0..2 {
                assert!(offsets.bank_checksum(bank) + offsets.boxes_per_bank() < BANKS[bank] + 0x2000);
            }
        }
        assert_eq!(INTERNATIONAL.box_size(), 0x462);
        assert_eq!(JAPANESE.box_size(), 0x566);
    }

    #[test]
    fn test_load_blank() {
        let blank = Save::blank(Region::International, Language::French);
        let options = save::LoadOptions {
            language: Language::French,
            ..Default::default()
        };
        let save = Save::new(&blank.to_vec(), &options).unwrap();
        assert_eq!(save.region(), Region::International);
        assert_eq!(save.language(), Language::French);

        let blank = Save::blank(Region::Japanese, Language::Japanese);
        let save = Save::new(&blank.to_vec(), &Default::default()).unwrap();
        assert_eq!(save.region(), Region::Japanese);
        assert_eq!(save.view_boxes().unwrap().box_count(), 8);
    }

    #[test]
    fn test_load_errors() {
        assert!(matches!(
            Save::new(&[0u8; 0x100], &Default::default()),
            Err(save::Error::InvalidSize(0x100))
        ));
        assert!(matches!(
            Save::new(&vec![0u8; SAVE_SIZE], &Default::default()),
            Err(save::Error::Unrecognized { len: SAVE_SIZE })
        ));

        let mut buf = Save::blank(Region::International, Language::English).to_vec();
        buf[INTERNATIONAL.money] ^= 0x11;
        assert!(matches!(
            Save::new(&buf, &Default::default()),
            Err(save::Error::ChecksumMismatch { offset: 0x3523, .. })
        ));
        let options = save::LoadOptions {
            verify_checksums: false,
            ..Default::default()
        };
        assert!(Save::new(&buf, &options).is_ok());
    }

    #[test]
    fn test_money_clamps() {
        let mut save = Save::blank(Region::International, Language::English);
        save.view_trainer_mut().unwrap().set_money(999999);
        assert_eq!(save.view_trainer().unwrap().money(), 999999);
        save.view_trainer_mut().unwrap().set_money(1000000);
        assert_eq!(save.view_trainer().unwrap().money(), 999999);
        assert_eq!(&save.as_raw()[INTERNATIONAL.money..][..3], &[0x99, 0x99, 0x99]);

        save.view_trainer_mut().unwrap().set_coins(12345);
        assert_eq!(save.view_trainer().unwrap().coins(), 9999);
    }

    #[test]
    fn test_trainer_fields() {
        let mut save = Save::blank(Region::International, Language::English);
        {
            let mut trainer = save.view_trainer_mut().unwrap();
            trainer.set_name("ASH");
            trainer.set_rival_name("GARY");
            trainer.set_tid(12345);
            trainer.set_badges(0b1010_0001);
            trainer.set_money(1_000_000);
            trainer.set_coins(12345);
            trainer.set_play_time(save::PlayTime {
                hours: 300,
                minutes: 12,
                seconds: 34,
                frames: 5,
            });
        }
        let trainer = save.view_trainer().unwrap();
        assert_eq!(trainer.name(), "ASH");
        assert_eq!(trainer.rival_name().as_deref(), Some("GARY"));
        assert_eq!(trainer.tid(), 12345);
        assert_eq!(trainer.badges(), 0b1010_0001);
        assert_eq!(trainer.money(), 999_999);
        assert_eq!(trainer.coins(), 9999);
        assert_eq!(trainer.play_time().hours, 255);
        assert_eq!(trainer.play_time().seconds, 34);
        assert_eq!(save.tid(), 12345);
    }

    #[test]
    fn test_party_and_box_storage() {
        crate::testing::install();
        let mut save = Save::blank(Region::International, Language::English);
        assert!(save.view_party_mut().unwrap().set_pkm(0, &mon(MEWTWO, 70)));
        assert!(save.view_boxes_mut().unwrap().set_pkm(3, 0, &mon(BULBASAUR, 5)));

        let party = save.view_party().unwrap();
        assert_eq!(party.count(), 1);
        let pk = party.pkm(0).unwrap();
        assert!(pk.is_party());
        assert_eq!(pk.species(), MEWTWO);
        assert_eq!(pk.level(), 70);
        assert!(pk.stat(Stat::Hp) > 0);
        assert_eq!(save.as_raw()[INTERNATIONAL.party + 1], 0x83);
        assert_eq!(save.as_raw()[INTERNATIONAL.party + 2], list::TERMINATOR);

        let boxes = save.view_boxes().unwrap();
        assert_eq!(boxes.count(3), 1);
        assert_eq!(boxes.pkm(3, 0).unwrap().nickname(), "BULBASAUR");
        assert!(boxes.pkm(3, 1).is_none());
        assert!(boxes.pkm(12, 0).is_none());
    }

    #[test]
    fn test_japanese_record_into_international_save() {
        crate::testing::install();
        let mut save = Save::blank(Region::International, Language::English);
        let mut jp = Pk1::new(Language::Japanese, false);
        jp.set_species(MEW);
        jp.set_level(5);
        jp.set_ot_name("サトシ");
        jp.set_nicknamed(false);
        assert!(save.view_boxes_mut().unwrap().set_pkm(0, 0, &jp));
        let pk = save.view_boxes().unwrap().pkm(0, 0).unwrap();
        assert_eq!(pk.ot_name(), "TRAINER");
        assert_eq!(pk.nickname(), "MEW");
        assert_eq!(pk.language(), Language::English);
    }

    #[test]
    fn test_rejects_other_generations() {
        crate::testing::install();
        let mut save = Save::blank(Region::International, Language::English);
        let pk2 = crate::game::gen2::pk2::Pk2::new(Language::English, false);
        assert!(!save.view_boxes_mut().unwrap().set_pkm(0, 0, &pk2));
        assert!(!save.view_boxes_mut().unwrap().set_pkm(0, 20, &mon(MEW, 5)));
    }

    #[test]
    fn test_edit_in_place() {
        crate::testing::install();
        let mut save = Save::blank(Region::International, Language::English);
        save.view_boxes_mut().unwrap().set_pkm(1, 0, &mon(MEW, 5));
        {
            let mut boxes = save.view_boxes_mut().unwrap();
            let mut pk = boxes.pkm_mut(1, 0).unwrap();
            pk.set_species(MEWTWO);
            pk.set_shiny(true);
        }
        let pk = save.view_boxes().unwrap().pkm(1, 0).unwrap();
        assert_eq!(pk.species(), MEWTWO);
        assert!(pk.is_shiny());
        let list = INTERNATIONAL.box_list_at(INTERNATIONAL.bank_box_offset(1));
        assert_eq!(list.species_entry(save.as_raw(), 0), 0x83);
    }

    #[test]
    fn test_finish_editing_compacts_and_checksums() {
        crate::testing::install();
        let mut save = Save::blank(Region::International, Language::English);
        {
            let mut party = save.view_party_mut().unwrap();
            party.set_pkm(0, &mon(BULBASAUR, 5));
            party.set_pkm(1, &mon(MEW, 5));
            party.set_pkm(2, &mon(MEWTWO, 70));
            party.delete_pkm(1);
        }
        save.begin_editing();
        save.finish_editing();
        let party = save.view_party().unwrap();
        assert_eq!(party.count(), 2);
        assert_eq!(party.pkm(0).unwrap().species(), BULBASAUR);
        assert_eq!(party.pkm(1).unwrap().species(), MEWTWO);
        drop(party);

        let once = save.to_vec();
        save.finish_editing();
        assert_eq!(once, save.to_vec());
        assert!(Save::new(&once, &Default::default()).is_ok());
    }

    #[test]
    fn test_switching_boxes_moves_scratch_copy() {
        crate::testing::install();
        let mut save = Save::blank(Region::International, Language::English);
        assert_eq!(save.current_box(), 0);
        save.view_boxes_mut().unwrap().set_pkm(0, 0, &mon(MEW, 5));
        save.view_boxes_mut().unwrap().set_pkm(4, 0, &mon(MEWTWO, 70));
        // Box 0 is active, so its record only exists in the scratch copy until the box is switched away.
        assert_eq!(save.as_raw()[INTERNATIONAL.bank_box_offset(0)], 0);

        assert!(save.view_boxes_mut().unwrap().set_current_box(4));
        assert_eq!(save.current_box(), 0);
        save.finish_editing();

        assert_eq!(save.current_box(), 4);
        assert_eq!(save.as_raw()[INTERNATIONAL.current_box_index], 4 | BOXES_INITIALIZED);
        assert_eq!(save.as_raw()[INTERNATIONAL.bank_box_offset(0)], 1);
        assert_eq!(save.as_raw()[INTERNATIONAL.current_box + 1], 0x83);
        let boxes = save.view_boxes().unwrap();
        assert_eq!(boxes.pkm(0, 0).unwrap().species(), MEW);
        assert_eq!(boxes.pkm(4, 0).unwrap().species(), MEWTWO);
    }

    #[test]
    fn test_uninitialized_banks_are_cleared() {
        let mut save = Save::blank(Region::International, Language::English);
        save.buf[INTERNATIONAL.current_box_index] = 0;
        save.buf[INTERNATIONAL.bank_box_offset(5)..][..INTERNATIONAL.box_size()].fill(0xff);
        save.rebuild_checksum();
        let loaded = Save::new(&save.to_vec(), &Default::default()).unwrap();
        assert_eq!(loaded.view_boxes().unwrap().count(5), 0);
        assert_eq!(loaded.as_raw()[INTERNATIONAL.current_box_index], BOXES_INITIALIZED);
    }

    #[test]
    fn test_bank_checksums() {
        crate::testing::install();
        let mut save = Save::blank(Region::International, Language::English);
        save.view_boxes_mut().unwrap().set_pkm(7, 0, &mon(MEW, 5));
        save.rebuild_checksum();
        let offset = INTERNATIONAL.bank_box_offset(7);
        let size = INTERNATIONAL.box_size();
        let bank_checksum = INTERNATIONAL.bank_checksum(1);
        assert_eq!(offset, 0x6462);
        assert_eq!(bank_checksum, 0x7a4c);
        assert_eq!(save.as_raw()[bank_checksum + 2], crate::checksum::diff8(&save.as_raw()[offset..offset + size]));
        assert_eq!(
            save.as_raw()[bank_checksum],
            crate::checksum::diff8(&save.as_raw()[0x6000..bank_checksum])
        );
    }

    #[test]
    fn test_pouch_fix() {
        let mut save = Save::blank(Region::International, Language::English);
        {
            let mut pouches = save.view_pouches_mut().unwrap();
            let potion = save::Item { id: 0x14, count: 1 };
            assert!(pouches.set_item(PouchKind::Items, 0, potion));
            assert!(pouches.set_item(PouchKind::Items, 1, potion));
            assert!(!pouches.set_item(PouchKind::KeyItems, 0, potion));
        }
        save.buf[INTERNATIONAL.items] = 5;
        save.view_pouches_mut().unwrap().fix_item_lists();
        assert_eq!(save.as_raw()[INTERNATIONAL.items], 2);
        assert_eq!(save.as_raw()[INTERNATIONAL.items + 5], crate::pouch::TERMINATOR);
        assert_eq!(save.view_pouches().unwrap().items(PouchKind::Items).len(), 2);
        assert_eq!(save.view_pouches().unwrap().capacity(PouchKind::Pc), 50);
    }

    #[test]
    fn test_dex() {
        let mut save = Save::blank(Region::International, Language::English);
        save.view_dex_mut().unwrap().set_caught(MEW, true);
        save.view_dex_mut().unwrap().set_seen(BULBASAUR, true);
        let dex = save.view_dex().unwrap();
        assert!(dex.caught(MEW));
        assert!(!dex.seen(MEW));
        assert!(dex.seen(BULBASAUR));
        assert_eq!(save.as_raw()[INTERNATIONAL.dex_caught + 18], 0x40);
    }
}
