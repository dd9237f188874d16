use pkvault_gamedb::{GameVersion, Generation, Language};

use crate::pkm::{Gender, Pkm};

pub trait SaveClone {
    fn clone_box(&self) -> Box<dyn Save + Sync + Send>;
}

impl<T> SaveClone for T
where
    T: 'static + Save + Sync + Send + Clone,
{
    fn clone_box(&self) -> Box<dyn Save + Sync + Send> {
        Box::new(self.clone())
    }
}

pub trait Save
where
    Self: SaveClone + TransferTarget,
{
    fn to_vec(&self) -> Vec<u8>;
    fn as_raw(&self) -> &[u8];

    fn rebuild_checksum(&mut self);

    /// Opens an edit session. Accessors write through immediately; counts and checksums may be stale until
    /// `finish_editing`.
    fn begin_editing(&mut self) {}

    /// Closes an edit session: stores the active box, compacts lists, repairs pouches and rebuilds checksums.
    fn finish_editing(&mut self);

    fn view_trainer(&self) -> Option<Box<dyn TrainerView + '_>> {
        None
    }

    fn view_trainer_mut(&mut self) -> Option<Box<dyn TrainerViewMut + '_>> {
        None
    }

    fn view_boxes(&self) -> Option<Box<dyn BoxesView + '_>> {
        None
    }

    fn view_boxes_mut(&mut self) -> Option<Box<dyn BoxesViewMut + '_>> {
        None
    }

    fn view_party(&self) -> Option<Box<dyn PartyView + '_>> {
        None
    }

    fn view_party_mut(&mut self) -> Option<Box<dyn PartyViewMut + '_>> {
        None
    }

    fn view_pouches(&self) -> Option<Box<dyn PouchesView + '_>> {
        None
    }

    fn view_pouches_mut(&mut self) -> Option<Box<dyn PouchesViewMut + '_>> {
        None
    }

    fn view_dex(&self) -> Option<Box<dyn DexView + '_>> {
        None
    }

    fn view_dex_mut(&mut self) -> Option<Box<dyn DexViewMut + '_>> {
        None
    }
}

impl Clone for Box<dyn Save + Send + Sync> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

/// Trainer data stamped onto records converted for a destination game.
pub trait TransferTarget {
    fn generation(&self) -> Generation;
    fn version(&self) -> GameVersion;
    fn language(&self) -> Language;
    fn tid(&self) -> u16;
    fn sid(&self) -> u16 {
        0
    }
    fn ot_name(&self) -> String;
    fn ot_gender(&self) -> Gender {
        Gender::Male
    }
    fn country(&self) -> u8 {
        0
    }
    fn region(&self) -> u8 {
        0
    }
    fn console_region(&self) -> u8 {
        0
    }
    fn today(&self) -> chrono::NaiveDate {
        chrono::Local::now().date_naive()
    }
}

/// A destination trainer without a save container, for generations whose saves are not modelled here.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Trainer {
    pub version: GameVersion,
    pub language: Language,
    pub tid: u16,
    pub sid: u16,
    pub name: String,
    pub gender: Gender,
    pub country: u8,
    pub region: u8,
    pub console_region: u8,
    pub date: Option<chrono::NaiveDate>,
}

impl TransferTarget for Trainer {
    fn generation(&self) -> Generation {
        self.version.generation()
    }

    fn version(&self) -> GameVersion {
        self.version
    }

    fn language(&self) -> Language {
        self.language
    }

    fn tid(&self) -> u16 {
        self.tid
    }

    fn sid(&self) -> u16 {
        self.sid
    }

    fn ot_name(&self) -> String {
        self.name.clone()
    }

    fn ot_gender(&self) -> Gender {
        self.gender
    }

    fn country(&self) -> u8 {
        self.country
    }

    fn region(&self) -> u8 {
        self.region
    }

    fn console_region(&self) -> u8 {
        self.console_region
    }

    fn today(&self) -> chrono::NaiveDate {
        self.date.unwrap_or_else(|| chrono::Local::now().date_naive())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct PlayTime {
    pub hours: u16,
    pub minutes: u8,
    pub seconds: u8,
    pub frames: u8,
}

pub trait TrainerView<'a> {
    fn name(&self) -> String;
    fn rival_name(&self) -> Option<String> {
        None
    }
    fn tid(&self) -> u16;
    fn gender(&self) -> Gender {
        Gender::Male
    }
    fn money(&self) -> u32;
    fn max_money(&self) -> u32;
    fn coins(&self) -> u16;
    fn max_coins(&self) -> u16;
    fn badges(&self) -> u32;
    fn play_time(&self) -> PlayTime;
}

pub trait TrainerViewMut<'a> {
    fn set_name(&mut self, name: &str);
    fn set_rival_name(&mut self, _name: &str) {}
    fn set_tid(&mut self, tid: u16);
    fn set_gender(&mut self, _gender: Gender) {}
    /// Clamps to the game's maximum.
    fn set_money(&mut self, money: u32);
    fn set_coins(&mut self, coins: u16);
    fn set_badges(&mut self, badges: u32);
    fn set_play_time(&mut self, play_time: PlayTime);
}

pub trait BoxesView<'a> {
    fn box_count(&self) -> usize;
    fn slots_per_box(&self) -> usize;
    fn current_box(&self) -> usize;
    fn box_name(&self, _box_index: usize) -> Option<String> {
        None
    }
    fn count(&self, box_index: usize) -> usize;
    /// An owned copy of the record.
    fn pkm(&self, box_index: usize, slot: usize) -> Option<Box<dyn Pkm>>;
}

pub trait BoxesViewMut<'a> {
    /// Selects the box the game loads into its working area. Takes effect on `finish_editing`.
    fn set_current_box(&mut self, box_index: usize) -> bool;
    fn set_box_name(&mut self, _box_index: usize, _name: &str) -> bool {
        false
    }
    /// Stores a copy of `pkm`. Fails for records of another generation or slots past the end of the list.
    fn set_pkm(&mut self, box_index: usize, slot: usize, pkm: &dyn Pkm) -> bool;
    fn delete_pkm(&mut self, box_index: usize, slot: usize) -> bool;
    /// Edits a record in place. The record borrows the save and cannot outlive the next save mutation.
    fn pkm_mut(&mut self, box_index: usize, slot: usize) -> Option<Box<dyn Pkm + '_>>;
    fn compact(&mut self, box_index: usize);
}

pub trait PartyView<'a> {
    fn count(&self) -> usize;
    fn pkm(&self, slot: usize) -> Option<Box<dyn Pkm>>;
}

pub trait PartyViewMut<'a> {
    fn set_pkm(&mut self, slot: usize, pkm: &dyn Pkm) -> bool;
    fn delete_pkm(&mut self, slot: usize) -> bool;
    fn pkm_mut(&mut self, slot: usize) -> Option<Box<dyn Pkm + '_>>;
    fn compact(&mut self);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PouchKind {
    Items,
    KeyItems,
    Balls,
    TmHm,
    Pc,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct Item {
    pub id: u16,
    pub count: u16,
}

pub trait PouchesView<'a> {
    fn kinds(&self) -> Vec<PouchKind>;
    fn capacity(&self, kind: PouchKind) -> usize;
    fn items(&self, kind: PouchKind) -> Vec<Item>;
}

pub trait PouchesViewMut<'a> {
    fn set_item(&mut self, kind: PouchKind, slot: usize, item: Item) -> bool;
    fn fix_item_lists(&mut self);
}

pub trait DexView<'a> {
    fn seen(&self, species: u16) -> bool;
    fn caught(&self, species: u16) -> bool;
}

pub trait DexViewMut<'a> {
    fn set_seen(&mut self, species: u16, seen: bool);
    fn set_caught(&mut self, species: u16, caught: bool);
}

/// Reads one species bit from a dex bitset. Species ids start at 1.
pub fn dex_bit(buf: &[u8], offset: usize, len: usize, species: u16) -> bool {
    use bitvec::view::BitView as _;

    if species == 0 || species as usize > len * 8 {
        return false;
    }
    buf[offset..][..len].view_bits::<bitvec::order::Lsb0>()[species as usize - 1]
}

pub fn set_dex_bit(buf: &mut [u8], offset: usize, len: usize, species: u16, v: bool) {
    use bitvec::view::BitView as _;

    if species == 0 || species as usize > len * 8 {
        return;
    }
    buf[offset..][..len]
        .view_bits_mut::<bitvec::order::Lsb0>()
        .set(species as usize - 1, v);
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct LoadOptions {
    /// Language assumed for international Gen 1/2 saves, which do not record one.
    pub language: Language,
    pub verify_checksums: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            language: Language::English,
            verify_checksums: true,
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("invalid size: {0} bytes")]
    InvalidSize(usize),

    #[error("unrecognized save ({len} bytes)")]
    Unrecognized { len: usize },

    #[error("invalid checksum at {offset:#06x}: {actual:04x} != {expected:04x}")]
    ChecksumMismatch { offset: usize, expected: u16, actual: u16 },

    #[error("invalid list at {offset:#06x}: count {count}")]
    InvalidList { offset: usize, count: usize },
}
