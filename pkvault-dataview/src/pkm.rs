pub mod crypto;

use pkvault_gamedb::{GameVersion, Generation, Language};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, num_derive::FromPrimitive)]
pub enum Stat {
    Hp = 0,
    Atk = 1,
    Def = 2,
    Spe = 3,
    SpA = 4,
    SpD = 5,
}

impl Stat {
    pub const ALL: [Stat; 6] = [Stat::Hp, Stat::Atk, Stat::Def, Stat::Spe, Stat::SpA, Stat::SpD];

    pub fn from_index(i: usize) -> Option<Self> {
        num_traits::FromPrimitive::from_usize(i)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, num_derive::FromPrimitive)]
pub enum Gender {
    Male = 0,
    Female = 1,
    Genderless = 2,
}

impl Gender {
    pub fn from_id(id: u8) -> Option<Self> {
        num_traits::FromPrimitive::from_u8(id)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, num_derive::FromPrimitive)]
pub enum Type {
    Normal = 0,
    Fighting = 1,
    Flying = 2,
    Poison = 3,
    Ground = 4,
    Rock = 5,
    Bug = 6,
    Ghost = 7,
    Steel = 8,
    Fire = 9,
    Water = 10,
    Grass = 11,
    Electric = 12,
    Psychic = 13,
    Ice = 14,
    Dragon = 15,
    Dark = 16,
    Fairy = 17,
}

impl Type {
    pub fn from_id(id: u8) -> Option<Self> {
        num_traits::FromPrimitive::from_u8(id)
    }
}

pub const SPECIES_NONE: u16 = 0;
pub const MAX_IV: u8 = 31;
pub const MAX_GB_IV: u8 = 15;
pub const MOVE_STRUGGLE: u16 = 165;

pub trait PkmClone {
    fn clone_box(&self) -> Box<dyn Pkm>;
}

impl Clone for Box<dyn Pkm> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

/// A creature record of any generation. Concepts a generation does not model read as a fixed default and ignore
/// writes.
pub trait Pkm: PkmClone {
    fn generation(&self) -> Generation;
    fn is_party(&self) -> bool;

    /// The plain (decrypted) record bytes.
    fn to_bytes(&self) -> Vec<u8>;

    fn species(&self) -> u16;
    fn set_species(&mut self, species: u16);

    fn form(&self) -> u8 {
        0
    }
    fn set_form(&mut self, _form: u8) {}

    fn held_item(&self) -> u16 {
        0
    }
    fn set_held_item(&mut self, _item: u16) {}

    /// Gen 1's catch-rate byte, which Gen 2 reads back as a held item.
    fn catch_rate(&self) -> u8 {
        0
    }
    fn set_catch_rate(&mut self, _rate: u8) {}

    fn exp(&self) -> u32;
    fn set_exp(&mut self, exp: u32);

    fn level(&self) -> u8 {
        self.growth_rate().level_for_exp(self.exp())
    }

    fn set_level(&mut self, level: u8) {
        let exp = self.growth_rate().exp_for_level(level);
        self.set_exp(exp);
    }

    fn iv(&self, stat: Stat) -> u8;
    fn set_iv(&mut self, stat: Stat, v: u8);

    fn max_iv(&self) -> u8 {
        MAX_IV
    }

    fn ev(&self, stat: Stat) -> u16;
    fn set_ev(&mut self, stat: Stat, v: u16);

    fn move_id(&self, slot: usize) -> u16;
    fn set_move_id(&mut self, slot: usize, id: u16);
    fn pp(&self, slot: usize) -> u8;
    fn set_pp(&mut self, slot: usize, pp: u8);
    fn pp_ups(&self, slot: usize) -> u8;
    fn set_pp_ups(&mut self, slot: usize, ups: u8);

    fn relearn_move(&self, _slot: usize) -> u16 {
        0
    }
    fn set_relearn_move(&mut self, _slot: usize, _id: u16) {}

    fn tid(&self) -> u16;
    fn set_tid(&mut self, tid: u16);
    fn sid(&self) -> u16 {
        0
    }
    fn set_sid(&mut self, _sid: u16) {}

    fn ot_name(&self) -> String;
    fn set_ot_name(&mut self, name: &str);
    fn ot_gender(&self) -> Gender {
        Gender::Male
    }
    fn set_ot_gender(&mut self, _gender: Gender) {}
    fn ot_friendship(&self) -> u8 {
        self.friendship()
    }
    fn set_ot_friendship(&mut self, friendship: u8) {
        self.set_friendship(friendship)
    }

    fn nickname(&self) -> String;
    fn set_nickname(&mut self, name: &str);
    fn is_nicknamed(&self) -> bool;
    fn set_nicknamed(&mut self, _nicknamed: bool) {}

    fn language(&self) -> Language;
    fn set_language(&mut self, language: Language);

    fn version(&self) -> Option<GameVersion>;
    fn set_version(&mut self, _version: GameVersion) {}

    fn is_egg(&self) -> bool;
    fn set_egg(&mut self, egg: bool);

    fn friendship(&self) -> u8 {
        0
    }
    fn set_friendship(&mut self, _friendship: u8) {}

    fn pid(&self) -> u32 {
        0
    }
    fn set_pid(&mut self, _pid: u32) {}

    fn encryption_constant(&self) -> u32 {
        0
    }
    fn set_encryption_constant(&mut self, _ec: u32) {}

    fn nature(&self) -> u8 {
        0
    }
    fn set_nature(&mut self, _nature: u8) {}

    fn ability(&self) -> u16 {
        0
    }
    fn set_ability(&mut self, _ability: u16) {}

    /// 1, 2 or 4 (hidden) from Gen 6 on; Gen 3-5 report the PID/flag-derived slot the same way.
    fn ability_number(&self) -> u8 {
        0
    }
    fn set_ability_number(&mut self, _number: u8) {}

    fn gender(&self) -> Gender;
    fn set_gender(&mut self, gender: Gender);

    fn is_shiny(&self) -> bool;
    fn set_shiny(&mut self, shiny: bool);

    fn pokerus(&self) -> u8 {
        0
    }
    fn set_pokerus(&mut self, _pokerus: u8) {}

    fn ball(&self) -> u8 {
        BALL_POKE
    }
    fn set_ball(&mut self, _ball: u8) {}

    fn met_location(&self) -> u16 {
        0
    }
    fn set_met_location(&mut self, _location: u16) {}
    fn met_level(&self) -> u8 {
        0
    }
    fn set_met_level(&mut self, _level: u8) {}
    fn met_date(&self) -> Option<chrono::NaiveDate> {
        None
    }
    fn set_met_date(&mut self, _date: Option<chrono::NaiveDate>) {}

    fn egg_location(&self) -> u16 {
        0
    }
    fn set_egg_location(&mut self, _location: u16) {}
    fn egg_date(&self) -> Option<chrono::NaiveDate> {
        None
    }
    fn set_egg_date(&mut self, _date: Option<chrono::NaiveDate>) {}

    fn fateful_encounter(&self) -> bool {
        false
    }
    fn set_fateful_encounter(&mut self, _fateful: bool) {}

    fn country(&self) -> u8 {
        0
    }
    fn set_country(&mut self, _country: u8) {}
    fn region(&self) -> u8 {
        0
    }
    fn set_region(&mut self, _region: u8) {}
    fn console_region(&self) -> u8 {
        0
    }
    fn set_console_region(&mut self, _console_region: u8) {}

    /// 0 while with the original trainer, 1 once another trainer holds it.
    fn current_handler(&self) -> u8 {
        0
    }
    fn set_current_handler(&mut self, _handler: u8) {}
    fn ht_name(&self) -> String {
        String::new()
    }
    fn set_ht_name(&mut self, _name: &str) {}
    fn ht_gender(&self) -> Gender {
        Gender::Male
    }
    fn set_ht_gender(&mut self, _gender: Gender) {}
    fn ht_friendship(&self) -> u8 {
        0
    }
    fn set_ht_friendship(&mut self, _friendship: u8) {}

    /// Let's Go awakening values.
    fn av(&self, _stat: Stat) -> u8 {
        0
    }
    fn set_av(&mut self, _stat: Stat, _v: u8) {}

    fn status(&self) -> u8 {
        0
    }
    fn set_status(&mut self, _status: u8) {}

    /// Party stats as stored. Box records have none.
    fn stat(&self, _stat: Stat) -> u16 {
        0
    }
    fn set_stat(&mut self, _stat: Stat, _v: u16) {}
    fn current_hp(&self) -> u16 {
        0
    }
    fn set_current_hp(&mut self, _hp: u16) {}

    fn hidden_power_type(&self) -> Type {
        let bits = Stat::ALL
            .iter()
            .enumerate()
            .fold(0u32, |acc, (i, s)| acc | (((self.iv(*s) & 1) as u32) << i));
        Type::from_id((bits * 15 / 63) as u8 + 1).unwrap_or(Type::Fighting)
    }

    /// Adjusts the lowest IV bits to produce `ty`, keeping the IVs otherwise as close as possible.
    fn set_hidden_power_type(&mut self, ty: Type) {
        let target = (ty as u8).clamp(Type::Fighting as u8, Type::Dark as u8) as u32;
        let Some(bits) = (0..64u32).find(|bits| bits * 15 / 63 + 1 == target) else {
            return;
        };
        for (i, s) in Stat::ALL.iter().enumerate() {
            let iv = self.iv(*s);
            self.set_iv(*s, (iv & !1) | ((bits >> i) & 1) as u8);
        }
    }

    fn growth_rate(&self) -> crate::data::GrowthRate {
        self.personal().map(|p| p.growth_rate).unwrap_or_default()
    }

    fn personal(&self) -> Option<crate::data::PersonalInfo> {
        crate::data::get()
            .personal
            .info(self.generation(), self.species(), self.form())
    }

    /// Stats as the game would compute them for the current level, IVs and EVs.
    fn calc_stats(&self) -> Option<[u16; 6]> {
        let personal = self.personal()?;
        let level = self.level();
        Some(Stat::ALL.map(|s| {
            let base = personal.base_stats[s as usize];
            match self.generation() {
                Generation::One | Generation::Two => gb_stat(s, base, self.iv(s), self.ev(s), level),
                _ => {
                    if self.species() == SPECIES_SHEDINJA && s == Stat::Hp {
                        return 1;
                    }
                    // Let's Go ignores EVs; awakening values are added on top instead.
                    if self.generation() == Generation::Lgpe {
                        modern_stat(s, base, self.iv(s), 0, level, self.nature()) + self.av(s) as u16
                    } else {
                        modern_stat(s, base, self.iv(s), self.ev(s), level, self.nature())
                    }
                }
            }
        }))
    }

    /// Rewrites the party stat block from `calc_stats` and heals to full. No-op for box records.
    fn refresh_stats(&mut self) {
        if !self.is_party() {
            return;
        }
        let Some(stats) = self.calc_stats() else {
            return;
        };
        for s in Stat::ALL {
            self.set_stat(s, stats[s as usize]);
        }
        self.set_current_hp(stats[Stat::Hp as usize]);
    }

    fn refresh_checksum(&mut self) {}

    fn is_checksum_valid(&self) -> bool {
        true
    }
}

pub const BALL_POKE: u8 = 4;
pub const SPECIES_SHEDINJA: u16 = 292;

/// `ceil(sqrt(v))` in integers.
pub fn ceil_sqrt(v: u32) -> u32 {
    let v = v as u64;
    let mut r = (v as f64).sqrt() as u64;
    while r * r > v {
        r -= 1;
    }
    if r * r < v {
        r += 1;
    }
    r as u32
}

/// Gen 1/2 stat formula. `ev` is the stat experience word.
pub fn gb_stat(stat: Stat, base: u8, iv: u8, ev: u16, level: u8) -> u16 {
    let ev_term = ceil_sqrt(ev as u32).min(255) / 4;
    let v = (2 * (base as u32 + iv as u32) + ev_term) * level as u32 / 100;
    (match stat {
        Stat::Hp => v + level as u32 + 10,
        _ => v + 5,
    }) as u16
}

/// Gen 3 onward stat formula including the nature modifier.
pub fn modern_stat(stat: Stat, base: u8, iv: u8, ev: u16, level: u8, nature: u8) -> u16 {
    let v = (2 * base as u32 + iv as u32 + ev as u32 / 4) * level as u32 / 100;
    if stat == Stat::Hp {
        return (v + level as u32 + 10) as u16;
    }
    let v = v + 5;
    let up = nature / 5 + 1;
    let down = nature % 5 + 1;
    (if up == down {
        v
    } else if stat as u8 == up {
        v * 11 / 10
    } else if stat as u8 == down {
        v * 9 / 10
    } else {
        v
    }) as u16
}

/// Gen 3 onward shininess: trainer id, secret id and both PID halves XOR below the generation's threshold.
pub fn is_shiny_pid(pid: u32, tid: u16, sid: u16, generation: Generation) -> bool {
    let xor = (tid ^ sid ^ (pid >> 16) as u16 ^ pid as u16) as u32;
    xor < shiny_threshold(generation)
}

pub fn shiny_threshold(generation: Generation) -> u32 {
    if generation.number() >= 6 {
        16
    } else {
        8
    }
}

/// Shiny value of a trainer: records whose PID has the same value are shiny for them.
pub fn trainer_shiny_value(tid: u16, sid: u16) -> u16 {
    (tid ^ sid) >> 4
}

pub fn pid_shiny_value(pid: u32) -> u16 {
    ((pid >> 16) as u16 ^ pid as u16) >> 4
}

/// Gender from the PID's low byte against the species ratio (Gen 3 onward).
pub fn gender_from_pid(pid: u32, gender_ratio: u8) -> Gender {
    match gender_ratio {
        crate::data::GENDERLESS => Gender::Genderless,
        crate::data::GENDER_FEMALE_ONLY => Gender::Female,
        crate::data::GENDER_MALE_ONLY => Gender::Male,
        ratio => {
            if ((pid & 0xff) as u8) < ratio {
                Gender::Female
            } else {
                Gender::Male
            }
        }
    }
}

/// Whether `name` is the species' default name in any language the generation shipped in.
pub fn is_default_name(species: u16, name: &str, generation: Generation, uppercase: bool) -> bool {
    let names = &crate::data::get().names;
    Language::ALL
        .iter()
        .filter(|l| l.available_in(generation))
        .filter_map(|l| names.species_name(species, *l))
        .any(|default| {
            if uppercase {
                default.to_uppercase() == name
            } else {
                default == name
            }
        })
}

/// Default name for a species in `language`, or an empty string when no table is installed.
pub fn default_name(species: u16, language: Language, uppercase: bool) -> String {
    let name = crate::data::get()
        .names
        .species_name(species, language)
        .unwrap_or("")
        .to_string();
    if uppercase {
        name.to_uppercase()
    } else {
        name
    }
}
