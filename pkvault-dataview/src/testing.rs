//! A small installed game-data catalog shared by the unit tests.

use pkvault_gamedb::{Generation, Language};

use crate::data::{self, GrowthRate, ItemTable, NameTable, PersonalInfo, PersonalTable};

pub const ITEM_POTION_GEN3: u16 = 13;
pub const ITEM_POTION: u16 = 17;
pub const ITEM_LEFTOVERS_GEN3: u16 = 200;
pub const ITEM_LEFTOVERS: u16 = 234;

struct Species {
    id: u16,
    introduced: Generation,
    name: &'static str,
    info: PersonalInfo,
}

fn info(
    base_stats: [u8; 6],
    types: [u8; 2],
    catch_rate: u8,
    gender_ratio: u8,
    growth_rate: GrowthRate,
    abilities: [u16; 3],
) -> PersonalInfo {
    PersonalInfo {
        base_stats,
        types,
        catch_rate,
        gender_ratio,
        growth_rate,
        base_friendship: 70,
        abilities,
    }
}

fn species() -> Vec<Species> {
    const GRASS: u8 = 0x16;
    const POISON: u8 = 0x03;
    const ELECTRIC: u8 = 0x17;
    const NORMAL: u8 = 0x00;
    const FLYING: u8 = 0x02;
    const PSYCHIC: u8 = 0x18;

    vec![
        Species {
            id: 1,
            introduced: Generation::One,
            name: "Bulbasaur",
            info: info([45, 49, 49, 45, 65, 65], [GRASS, POISON], 45, 31, GrowthRate::MediumSlow, [65, 65, 34]),
        },
        Species {
            id: 25,
            introduced: Generation::One,
            name: "Pikachu",
            info: info([35, 55, 40, 90, 50, 50], [ELECTRIC, ELECTRIC], 190, 127, GrowthRate::MediumFast, [9, 9, 31]),
        },
        Species {
            id: 29,
            introduced: Generation::One,
            name: "Nidoran♀",
            info: info([55, 47, 52, 41, 40, 40], [POISON, POISON], 235, 254, GrowthRate::MediumSlow, [38, 79, 55]),
        },
        Species {
            id: 83,
            introduced: Generation::One,
            name: "Farfetch'd",
            info: info([52, 65, 55, 60, 58, 62], [NORMAL, FLYING], 45, 127, GrowthRate::MediumFast, [51, 39, 128]),
        },
        Species {
            id: 150,
            introduced: Generation::One,
            name: "Mewtwo",
            info: info([106, 110, 90, 130, 154, 154], [PSYCHIC, PSYCHIC], 3, 255, GrowthRate::Slow, [46, 46, 127]),
        },
        Species {
            id: 151,
            introduced: Generation::One,
            name: "Mew",
            info: info([100; 6], [PSYCHIC, PSYCHIC], 45, 255, GrowthRate::MediumSlow, [28, 28, 0]),
        },
        Species {
            id: 152,
            introduced: Generation::Two,
            name: "Chikorita",
            info: info([45, 49, 65, 45, 49, 65], [GRASS, GRASS], 45, 31, GrowthRate::MediumSlow, [65, 65, 102]),
        },
        Species {
            id: 201,
            introduced: Generation::Two,
            name: "Unown",
            info: info([48, 72, 48, 48, 72, 48], [PSYCHIC, PSYCHIC], 225, 255, GrowthRate::MediumFast, [26, 26, 0]),
        },
        Species {
            id: 251,
            introduced: Generation::Two,
            name: "Celebi",
            info: info([100; 6], [PSYCHIC, GRASS], 45, 255, GrowthRate::MediumSlow, [30, 30, 0]),
        },
        Species {
            id: 252,
            introduced: Generation::Three,
            name: "Treecko",
            info: info([40, 45, 35, 70, 65, 55], [GRASS, GRASS], 45, 31, GrowthRate::MediumSlow, [65, 65, 84]),
        },
        Species {
            id: 387,
            introduced: Generation::Four,
            name: "Turtwig",
            info: info([55, 68, 64, 31, 45, 55], [GRASS, GRASS], 45, 31, GrowthRate::MediumSlow, [65, 65, 75]),
        },
    ]
}

/// One name per line, indexed by national id, with `names` filled in and every other line empty.
fn name_lines(names: &[(u16, &str)]) -> String {
    let mut lines = vec![""; 388];
    lines[0] = "Egg";
    for (id, name) in names {
        lines[*id as usize] = *name;
    }
    lines.join("\n")
}

pub fn personal() -> PersonalTable {
    let mut personal = PersonalTable::new();
    for s in species() {
        personal.insert_from(s.introduced, s.id, s.info);
    }
    personal
}

/// Installs the fixture catalog. Safe to call from every test.
pub fn install() {
    let species = species();

    let mut names = NameTable::new();
    let english = species.iter().map(|s| (s.id, s.name)).collect::<Vec<_>>();
    names.parse_lines(Language::English, &name_lines(&english));
    names.parse_lines(Language::French, &name_lines(&[(1, "Bulbizarre"), (25, "Pikachu"), (150, "Mewtwo")]));
    names.parse_lines(Language::Japanese, &name_lines(&[(150, "ミュウツー"), (151, "ミュウ")]));

    let mut items = ItemTable::new();
    items.insert(ITEM_POTION_GEN3, ITEM_POTION);
    items.insert(ITEM_LEFTOVERS_GEN3, ITEM_LEFTOVERS);

    let _ = data::install(data::GameData {
        personal: Box::new(personal()),
        names: Box::new(names),
        items: Box::new(items),
    });
}
