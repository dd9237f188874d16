//! Moving records between generations.
//!
//! Every supported hop is an edge in [`EDGES`]; [`path`] decides which hops a conversion walks and [`convert`] runs
//! them, stopping at the first hop that cannot carry the record. Gen 1/2 records reach Gen 3 through 6 by way of
//! the Gen 7 Virtual Console transfer.

use itertools::Itertools as _;
use pkvault_gamedb::{GameVersion, Generation, Language};
use rand::seq::SliceRandom as _;
use rand::Rng as _;

use crate::data::Personal;
use crate::game::gen1::pk1::Pk1;
use crate::game::gen2::pk2::Pk2;
use crate::game::gen3::pk3::Pk3;
use crate::game::gen45::pk45::{self, Pk45};
use crate::game::gen67::pk67::{self, Pk67};
use crate::ids::location;
use crate::pkm::{Pkm, Stat, BALL_POKE, MAX_IV, MOVE_STRUGGLE};
use crate::save::TransferTarget;

const SPECIES_MEW: u16 = 151;
const SPECIES_CELEBI: u16 = 251;

/// Species that keep their first ability instead of the hidden one after a Virtual Console transfer.
const VC_LEGENDARIES: &[u16] = &[144, 145, 146, 150, 151, 243, 244, 245, 249, 250, 251];

/// Species whose Virtual Console transfer guarantees five perfect IVs instead of three.
const VC_FIVE_PERFECT: &[u16] = &[SPECIES_MEW, SPECIES_CELEBI];

/// What a conversion needs besides the record: the trainer receiving it, a random source and the species catalog
/// the hops check membership against.
pub struct ConvertContext<'a> {
    pub target: &'a dyn TransferTarget,
    pub rng: &'a mut dyn rand::RngCore,
    pub personal: &'a dyn Personal,
}

impl<'a> ConvertContext<'a> {
    pub fn new(target: &'a dyn TransferTarget, rng: &'a mut dyn rand::RngCore) -> Self {
        Self {
            target,
            rng,
            personal: &*crate::data::get().personal,
        }
    }

    fn allows(&self, generation: Generation, species: u16) -> bool {
        species != 0 && species <= generation.max_species() && self.personal.contains(generation, species)
    }
}

pub type Edge = fn(&dyn Pkm, &mut ConvertContext) -> Option<Box<dyn Pkm>>;

pub const EDGES: &[(Generation, Generation, Edge)] = &[
    (Generation::One, Generation::Two, gen1_to_gen2),
    (Generation::Two, Generation::One, gen2_to_gen1),
    (Generation::One, Generation::Seven, virtual_console),
    (Generation::Two, Generation::Seven, virtual_console),
    (Generation::Three, Generation::Four, pal_park),
    (Generation::Four, Generation::Five, poke_transfer),
    (Generation::Five, Generation::Six, transporter),
    (Generation::Six, Generation::Seven, bank),
    (Generation::Seven, Generation::Six, downgrade),
    (Generation::Six, Generation::Five, downgrade),
    (Generation::Five, Generation::Four, downgrade),
    (Generation::Four, Generation::Three, downgrade),
];

pub fn edge(from: Generation, to: Generation) -> Option<Edge> {
    EDGES
        .iter()
        .find(|(f, t, _)| *f == from && *t == to)
        .map(|(_, _, edge)| *edge)
}

/// The generations a conversion from `from` to `to` passes through, both ends included.
pub fn path(from: Generation, to: Generation) -> Option<Vec<Generation>> {
    if from == Generation::Lgpe || to == Generation::Lgpe || from == Generation::Eight || to == Generation::Eight {
        return (from == to).then(|| vec![from]);
    }
    let (a, b) = (from.number(), to.number());
    let walk = |a: u8, b: u8| -> Vec<Generation> {
        if a <= b {
            (a..=b).filter_map(Generation::from_number).collect()
        } else {
            (b..=a).rev().filter_map(Generation::from_number).collect()
        }
    };
    Some(match (a, b) {
        _ if a == b => vec![from],
        (1, 2) | (2, 1) => vec![from, to],
        (1 | 2, 3..=7) => std::iter::once(from).chain(walk(7, b)).collect(),
        (3..=7, 3..=7) => walk(a, b),
        _ => return None,
    })
}

/// Converts `pkm` to generation `to`. `None` when no path exists or a hop on it cannot carry the record.
pub fn convert(pkm: &dyn Pkm, to: Generation, ctx: &mut ConvertContext) -> Option<Box<dyn Pkm>> {
    let path = path(pkm.generation(), to)?;
    let mut current = pkm.clone_box();
    for hop in path.windows(2) {
        let Some(step) = edge(hop[0], hop[1]) else {
            log::debug!("no conversion edge {} -> {}", hop[0], hop[1]);
            return None;
        };
        match step(&*current, ctx) {
            Some(next) => current = next,
            None => {
                log::debug!(
                    "species {} cannot be converted {} -> {}",
                    current.species(),
                    hop[0],
                    hop[1]
                );
                return None;
            }
        }
    }
    Some(current)
}

/// Highest ball id each generation knows.
fn max_ball(generation: Generation) -> u8 {
    match generation.number() {
        0..=3 => 12,
        4 => 24,
        5 | 6 => 25,
        _ => 26,
    }
}

/// Moves `keep` rejects are dropped and the remaining ones shifted up.
fn copy_moves(src: &dyn Pkm, dst: &mut dyn Pkm, keep: impl Fn(u16) -> bool) {
    let moves = (0..4)
        .map(|slot| (src.move_id(slot), src.pp(slot), src.pp_ups(slot)))
        .filter(|(id, _, _)| *id != 0 && keep(*id))
        .pad_using(4, |_| (0, 0, 0));
    for (slot, (id, pp, ups)) in moves.enumerate() {
        dst.set_move_id(slot, id);
        dst.set_pp(slot, pp);
        dst.set_pp_ups(slot, ups);
    }
}

fn copy_names(src: &dyn Pkm, dst: &mut dyn Pkm) {
    dst.set_ot_name(&src.ot_name());
    if src.is_nicknamed() {
        dst.set_nickname(&src.nickname());
        dst.set_nicknamed(true);
    } else {
        dst.set_nicknamed(false);
    }
}

/// Copies everything both records model. Moves, items and versions the destination does not know are dropped.
fn copy_common(src: &dyn Pkm, dst: &mut dyn Pkm) {
    let generation = dst.generation();

    dst.set_species(src.species());
    dst.set_form(src.form());
    dst.set_language(src.language());
    dst.set_level(src.level());
    dst.set_exp(src.exp());
    for stat in Stat::ALL {
        dst.set_iv(stat, src.iv(stat));
        dst.set_ev(stat, src.ev(stat));
    }
    copy_moves(src, dst, |id| id <= generation.max_move());

    if src.held_item() <= generation.max_item() {
        dst.set_held_item(src.held_item());
    }

    dst.set_tid(src.tid());
    dst.set_sid(src.sid());
    dst.set_ot_gender(src.ot_gender());
    dst.set_friendship(src.friendship());
    copy_names(src, dst);

    if let Some(version) = src
        .version()
        .filter(|v| (3..=generation.number()).contains(&v.generation().number()))
    {
        dst.set_version(version);
    }

    dst.set_encryption_constant(src.encryption_constant());
    dst.set_pid(src.pid());
    dst.set_nature(src.nature());
    if src.ability() <= generation.max_ability() {
        dst.set_ability(src.ability());
    }
    dst.set_ability_number(src.ability_number());
    if generation.number() >= 4 {
        dst.set_gender(src.gender());
    }
    if generation.number() >= 3 && dst.is_shiny() != src.is_shiny() {
        dst.set_shiny(src.is_shiny());
    }

    dst.set_pokerus(src.pokerus());
    dst.set_ball(if src.ball() <= max_ball(generation) {
        src.ball()
    } else {
        BALL_POKE
    });
    dst.set_met_location(src.met_location());
    dst.set_met_level(src.met_level());
    dst.set_met_date(src.met_date());
    dst.set_egg_location(src.egg_location());
    dst.set_egg_date(src.egg_date());
    dst.set_fateful_encounter(src.fateful_encounter());

    dst.set_country(src.country());
    dst.set_region(src.region());
    dst.set_console_region(src.console_region());
    dst.set_ht_name(&src.ht_name());
    dst.set_ht_gender(src.ht_gender());
    dst.set_ht_friendship(src.ht_friendship());
    dst.set_current_handler(src.current_handler());
    dst.set_ot_friendship(src.ot_friendship());
}

/// Marks the record as held by the destination trainer.
fn hand_over(dst: &mut dyn Pkm, ctx: &ConvertContext, friendship: u8) {
    let target = ctx.target;
    if dst.tid() == target.tid() && dst.sid() == target.sid() && dst.ot_name() == target.ot_name() {
        dst.set_current_handler(0);
        return;
    }
    dst.set_ht_name(&target.ot_name());
    dst.set_ht_gender(target.ot_gender());
    dst.set_ht_friendship(friendship);
    dst.set_current_handler(1);
}

fn base_friendship(ctx: &ConvertContext, generation: Generation, species: u16) -> u8 {
    ctx.personal
        .info(generation, species, 0)
        .map(|p| p.base_friendship)
        .unwrap_or(70)
}

/// Time Capsule trade from Red/Blue/Yellow to Gold/Silver/Crystal.
fn gen1_to_gen2(src: &dyn Pkm, ctx: &mut ConvertContext) -> Option<Box<dyn Pkm>> {
    if !ctx.allows(Generation::Two, src.species()) {
        return None;
    }
    let mut pk = Pk2::new(src.language(), src.is_party());
    copy_common(src, &mut pk);
    pk.set_held_item(crate::ids::catch_rate_to_gen2_item(src.catch_rate()) as u16);
    pk.set_friendship(base_friendship(ctx, Generation::Two, src.species()));
    pk.set_status(src.status());
    pk.refresh_stats();
    Some(Box::new(pk))
}

/// Time Capsule trade back. Gen 2 species, eggs and moves Gen 1 lacks cannot go.
fn gen2_to_gen1(src: &dyn Pkm, ctx: &mut ConvertContext) -> Option<Box<dyn Pkm>> {
    if src.is_egg() || !ctx.allows(Generation::One, src.species()) {
        return None;
    }
    if (0..4).any(|slot| src.move_id(slot) > Generation::One.max_move()) {
        return None;
    }
    let mut pk = Pk1::new(src.language(), src.is_party());
    copy_common(src, &mut pk);
    pk.set_catch_rate(src.held_item() as u8);
    pk.set_status(src.status());
    pk.refresh_stats();
    Some(Box::new(pk))
}

/// Poké Transporter from the 3DS Virtual Console releases into Sun/Moon.
fn virtual_console(src: &dyn Pkm, ctx: &mut ConvertContext) -> Option<Box<dyn Pkm>> {
    let species = src.species();
    if src.is_egg() || !ctx.allows(Generation::Seven, species) {
        return None;
    }
    let personal = ctx.personal.info(Generation::Seven, species, 0)?;

    let mut pk = Pk67::new(pk67::Format::Gen7, false);
    pk.set_species(species);
    pk.set_language(match src.language() {
        Language::Japanese => Language::Japanese,
        _ => ctx.target.language(),
    });
    pk.set_level(src.level());
    pk.set_tid(src.tid());
    pk.set_sid(0);
    pk.set_ot_name(&src.ot_name());
    pk.set_ot_gender(src.ot_gender());
    if src.is_nicknamed() {
        pk.set_nickname(&src.nickname());
        pk.set_nicknamed(true);
    } else {
        pk.set_nicknamed(false);
    }
    pk.set_version(src.version().unwrap_or(match src.generation() {
        Generation::One => GameVersion::RD,
        _ => GameVersion::GD,
    }));

    pk.set_encryption_constant(ctx.rng.next_u32());
    pk.set_pid(ctx.rng.next_u32());
    pk.set_shiny(src.is_shiny());
    pk.set_nature((src.exp() % 25) as u8);
    pk.set_gender(src.gender());

    let number = if VC_LEGENDARIES.contains(&species) { 1 } else { 4 };
    pk.set_ability_number(number);
    pk.set_ability(personal.abilities[if number == 4 { 2 } else { 0 }]);

    let perfect = if VC_FIVE_PERFECT.contains(&species) { 5 } else { 3 };
    let mut stats = Stat::ALL;
    stats.shuffle(&mut *ctx.rng);
    for (i, stat) in stats.into_iter().enumerate() {
        let iv = if i < perfect {
            MAX_IV
        } else {
            ctx.rng.gen_range(0..=MAX_IV)
        };
        pk.set_iv(stat, iv);
    }

    copy_moves(src, &mut pk, |id| id != MOVE_STRUGGLE);
    pk.set_held_item(0);
    pk.set_fateful_encounter(matches!(species, SPECIES_MEW | SPECIES_CELEBI));

    pk.set_ball(BALL_POKE);
    pk.set_met_location(location::TRANSPORTER_VC);
    pk.set_met_level(src.level());
    pk.set_met_date(Some(ctx.target.today()));

    pk.set_ot_friendship(personal.base_friendship);
    pk.set_country(ctx.target.country());
    pk.set_region(ctx.target.region());
    pk.set_console_region(ctx.target.console_region());
    hand_over(&mut pk, ctx, personal.base_friendship);

    pk.refresh_checksum();
    Some(Box::new(pk))
}

/// Pal Park, Gen 3 into Diamond/Pearl/Platinum/HeartGold/SoulSilver.
fn pal_park(src: &dyn Pkm, ctx: &mut ConvertContext) -> Option<Box<dyn Pkm>> {
    if src.is_egg() || !ctx.allows(Generation::Four, src.species()) {
        return None;
    }
    let mut pk = Pk45::new(pk45::Format::Gen4, false);
    copy_common(src, &mut pk);
    pk.set_ability(src.ability());
    let item = crate::data::get().items.from_gen3(src.held_item()).unwrap_or(0);
    pk.set_held_item(item);
    pk.set_friendship(70);
    pk.set_gender(src.gender());
    pk.set_met_location(location::PAL_PARK);
    pk.set_met_level(src.level());
    pk.set_met_date(Some(ctx.target.today()));
    pk.refresh_checksum();
    Some(Box::new(pk))
}

/// Poké Transfer, Gen 4 into Black/White.
fn poke_transfer(src: &dyn Pkm, ctx: &mut ConvertContext) -> Option<Box<dyn Pkm>> {
    if src.is_egg() || !ctx.allows(Generation::Five, src.species()) {
        return None;
    }
    let mut pk = Pk45::new(pk45::Format::Gen5, false);
    copy_common(src, &mut pk);
    pk.set_nature((src.pid() % 25) as u8);
    pk.set_met_location(location::POKE_TRANSFER);
    pk.set_met_level(src.level());
    pk.set_met_date(Some(ctx.target.today()));
    pk.refresh_checksum();
    Some(Box::new(pk))
}

/// Poké Transporter, Gen 5 into X/Y/Omega Ruby/Alpha Sapphire.
fn transporter(src: &dyn Pkm, ctx: &mut ConvertContext) -> Option<Box<dyn Pkm>> {
    let species = src.species();
    if src.is_egg() || !ctx.allows(Generation::Six, species) {
        return None;
    }
    let mut pk = Pk67::new(pk67::Format::Gen6, false);
    copy_common(src, &mut pk);
    pk.set_encryption_constant(src.pid());
    pk.set_ability_number(src.ability_number());
    pk.set_ot_friendship(src.friendship());
    pk.set_country(ctx.target.country());
    pk.set_region(ctx.target.region());
    pk.set_console_region(ctx.target.console_region());
    hand_over(&mut pk, ctx, base_friendship(ctx, Generation::Six, species));
    pk.refresh_checksum();
    Some(Box::new(pk))
}

/// Pokémon Bank, Gen 6 into Gen 7. The layout is shared, so the bytes carry over.
fn bank(src: &dyn Pkm, ctx: &mut ConvertContext) -> Option<Box<dyn Pkm>> {
    if src.is_egg() || !ctx.allows(Generation::Seven, src.species()) {
        return None;
    }
    let bytes = src.to_bytes();
    let mut pk = Pk67::from_bytes(pk67::Format::Gen7, bytes.get(..pk67::BOX_SIZE)?)?;
    pk.refresh_checksum();
    Some(Box::new(pk))
}

/// Moves a record one generation back. The met location becomes the destination's faraway place.
fn downgrade(src: &dyn Pkm, ctx: &mut ConvertContext) -> Option<Box<dyn Pkm>> {
    let to = Generation::from_number(src.generation().number().checked_sub(1)?)?;
    if src.is_egg() || !ctx.allows(to, src.species()) {
        return None;
    }
    let mut pk: Box<dyn Pkm> = match to {
        Generation::Three => Box::new(Pk3::new(false)),
        Generation::Four => Box::new(Pk45::new(pk45::Format::Gen4, false)),
        Generation::Five => Box::new(Pk45::new(pk45::Format::Gen5, false)),
        Generation::Six => Box::new(Pk67::new(pk67::Format::Gen6, false)),
        _ => return None,
    };
    copy_common(src, &mut *pk);
    if to == Generation::Three {
        let item = crate::data::get().items.to_gen3(src.held_item()).unwrap_or(0);
        pk.set_held_item(item);
    }
    pk.set_met_location(location::faraway(to));
    pk.set_egg_location(0);
    pk.refresh_checksum();
    Some(pk)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::save::Trainer;

    const BULBASAUR: u16 = 1;
    const PIKACHU: u16 = 25;
    const MEWTWO: u16 = 150;
    const MEW: u16 = 151;
    const CELEBI: u16 = 251;
    const TREECKO: u16 = 252;

    fn trainer(version: GameVersion) -> Trainer {
        Trainer {
            version,
            language: Language::English,
            tid: 4321,
            sid: 8765,
            name: "Elio".to_string(),
            gender: crate::pkm::Gender::Male,
            country: 49,
            region: 7,
            console_region: 1,
            date: chrono::NaiveDate::from_ymd_opt(2017, 1, 2),
        }
    }

    fn seeded_rng() -> rand_pcg::Pcg32 {
        rand_pcg::Pcg32::new(0xcafe_f00d_d15e_a5e5, 0xa02b_dbf7_bb3c_0a7)
    }

    fn gen1_mon(species: u16, level: u8) -> Pk1<Vec<u8>> {
        let mut pk = Pk1::new(Language::English, false);
        pk.set_species(species);
        pk.set_level(level);
        pk.set_tid(12345);
        pk.set_ot_name("RED");
        pk.set_nicknamed(false);
        pk.set_move_id(0, 33);
        pk.set_move_id(1, MOVE_STRUGGLE);
        pk.set_move_id(2, 45);
        pk
    }

    #[test]
    fn test_paths() {
        use Generation::*;
        assert_eq!(path(One, Two), Some(vec![One, Two]));
        assert_eq!(path(One, Four), Some(vec![One, Seven, Six, Five, Four]));
        assert_eq!(path(Two, Seven), Some(vec![Two, Seven]));
        assert_eq!(path(Three, Six), Some(vec![Three, Four, Five, Six]));
        assert_eq!(path(Seven, Three), Some(vec![Seven, Six, Five, Four, Three]));
        assert_eq!(path(Three, One), None);
        assert_eq!(path(Seven, Lgpe), None);
        assert_eq!(path(Lgpe, Lgpe), Some(vec![Lgpe]));
        for from in [One, Two, Three, Four, Five, Six, Seven] {
            for to in [One, Two, Three, Four, Five, Six, Seven] {
                if let Some(path) = path(from, to) {
                    assert!(path.windows(2).all(|hop| edge(hop[0], hop[1]).is_some()));
                }
            }
        }
    }

    #[test]
    fn test_virtual_console() {
        crate::testing::install();
        let target = trainer(GameVersion::SN);
        let mut rng = seeded_rng();
        let mut ctx = ConvertContext::new(&target, &mut rng);

        let src = gen1_mon(PIKACHU, 25);
        let pk = convert(&src, Generation::Seven, &mut ctx).unwrap();
        assert_eq!(pk.generation(), Generation::Seven);
        assert_eq!(pk.species(), PIKACHU);
        assert_eq!(pk.level(), 25);
        assert_eq!(pk.nature() as u32, src.exp() % 25);
        assert_eq!(pk.met_location(), location::TRANSPORTER_VC);
        assert_eq!(pk.met_level(), 25);
        assert_eq!(pk.ball(), BALL_POKE);
        assert_eq!(pk.version(), Some(GameVersion::RD));
        assert_eq!(pk.ability_number(), 4);
        assert_eq!(pk.ability(), 31);
        assert_eq!(pk.nickname(), "Pikachu");
        assert!(!pk.is_nicknamed());
        assert_eq!(pk.ot_name(), "RED");
        assert_eq!((pk.tid(), pk.sid()), (12345, 0));
        assert_eq!(pk.ht_name(), "Elio");
        assert_eq!(pk.current_handler(), 1);
        assert_eq!(pk.country(), 49);
        assert_eq!((pk.move_id(0), pk.move_id(1), pk.move_id(2)), (33, 45, 0));
        assert_eq!(pk.held_item(), 0);
        assert!(!pk.fateful_encounter());
        assert!(pk.is_checksum_valid());
        assert!(Stat::ALL.iter().filter(|s| pk.iv(**s) == MAX_IV).count() >= 3);
    }

    #[test]
    fn test_virtual_console_mythicals() {
        crate::testing::install();
        let target = trainer(GameVersion::SN);
        let mut rng = seeded_rng();
        let mut ctx = ConvertContext::new(&target, &mut rng);

        let pk = convert(&gen1_mon(MEW, 5), Generation::Seven, &mut ctx).unwrap();
        assert!(pk.fateful_encounter());
        assert_eq!(pk.ability_number(), 1);
        assert!(Stat::ALL.iter().filter(|s| pk.iv(**s) == MAX_IV).count() >= 5);

        let pk = convert(&gen1_mon(MEWTWO, 70), Generation::Seven, &mut ctx).unwrap();
        assert!(!pk.fateful_encounter());
        assert_eq!(pk.ability_number(), 1);
        assert_eq!(pk.ability(), 46);
    }

    #[test]
    fn test_virtual_console_keeps_shininess() {
        crate::testing::install();
        let target = trainer(GameVersion::SN);
        for seed in 0..16 {
            let mut rng = rand_pcg::Pcg32::new(seed, 0xa02b_dbf7_bb3c_0a7);
            let mut ctx = ConvertContext::new(&target, &mut rng);

            let mut src = Pk2::new(Language::English, false);
            src.set_species(CELEBI);
            src.set_level(10);
            src.set_shiny(true);
            let pk = convert(&src, Generation::Seven, &mut ctx).unwrap();
            assert!(pk.is_shiny());

            src.set_shiny(false);
            let pk = convert(&src, Generation::Seven, &mut ctx).unwrap();
            assert!(!pk.is_shiny());
        }
    }

    #[test]
    fn test_gen2_eggs_do_not_transfer() {
        crate::testing::install();
        let target = trainer(GameVersion::SN);
        let mut rng = seeded_rng();
        let mut ctx = ConvertContext::new(&target, &mut rng);

        let mut egg = Pk2::new(Language::English, false);
        egg.set_species(CELEBI);
        egg.set_egg(true);
        assert!(convert(&egg, Generation::Seven, &mut ctx).is_none());
        assert!(convert(&egg, Generation::One, &mut ctx).is_none());
    }

    #[test]
    fn test_tradeback() {
        crate::testing::install();
        let target = trainer(GameVersion::C);
        let mut rng = seeded_rng();
        let mut ctx = ConvertContext::new(&target, &mut rng);

        let mut src = gen1_mon(MEWTWO, 70);
        src.set_catch_rate(0x19);
        src.set_iv(Stat::Atk, 12);
        src.set_ev(Stat::SpA, 4000);
        let pk2 = convert(&src, Generation::Two, &mut ctx).unwrap();
        assert_eq!(pk2.species(), MEWTWO);
        assert_eq!(pk2.level(), 70);
        assert_eq!(pk2.exp(), src.exp());
        assert_eq!(pk2.held_item(), crate::ids::GEN2_ITEM_LEFTOVERS as u16);
        assert_eq!(pk2.iv(Stat::Atk), 12);
        assert_eq!(pk2.ev(Stat::SpD), 4000);
        assert_eq!(pk2.nickname(), "MEWTWO");

        let back = convert(&*pk2, Generation::One, &mut ctx).unwrap();
        assert_eq!(back.catch_rate(), crate::ids::GEN2_ITEM_LEFTOVERS);
        assert_eq!(back.move_id(1), MOVE_STRUGGLE);

        let mut gen2_only = Pk2::new(Language::English, false);
        gen2_only.set_species(CELEBI);
        assert!(convert(&gen2_only, Generation::One, &mut ctx).is_none());

        let mut new_move = Pk2::new(Language::English, false);
        new_move.set_species(PIKACHU);
        new_move.set_move_id(0, 200);
        assert!(convert(&new_move, Generation::One, &mut ctx).is_none());
    }

    #[test]
    fn test_chain_stops_at_missing_species() {
        crate::testing::install();
        let target = trainer(GameVersion::D);
        let src = gen1_mon(BULBASAUR, 12);

        let mut rng = seeded_rng();
        let mut ctx = ConvertContext::new(&target, &mut rng);
        let pk = convert(&src, Generation::Four, &mut ctx).unwrap();
        assert_eq!(pk.generation(), Generation::Four);
        assert_eq!(pk.species(), BULBASAUR);
        assert_eq!(pk.met_location(), location::FARAWAY_GEN4);

        let mut personal = crate::testing::personal();
        personal.remove(Generation::Six, BULBASAUR);
        let mut rng = seeded_rng();
        let mut ctx = ConvertContext::new(&target, &mut rng);
        ctx.personal = &personal;
        assert!(convert(&src, Generation::Four, &mut ctx).is_none());
        assert!(convert(&src, Generation::Seven, &mut ctx).is_some());
    }

    #[test]
    fn test_forward_chain() {
        crate::testing::install();
        let target = trainer(GameVersion::SN);
        let mut rng = seeded_rng();
        let mut ctx = ConvertContext::new(&target, &mut rng);

        let mut pk3 = Pk3::new(false);
        pk3.set_pid(0x1234_5678);
        pk3.set_tid(100);
        pk3.set_sid(200);
        pk3.set_species(TREECKO);
        pk3.set_language(Language::English);
        pk3.set_level(30);
        pk3.set_ot_name("MAY");
        pk3.set_nicknamed(false);
        pk3.set_held_item(crate::testing::ITEM_LEFTOVERS_GEN3);
        pk3.set_move_id(0, 1);
        pk3.refresh_checksum();

        let pk4 = convert(&pk3, Generation::Four, &mut ctx).unwrap();
        assert_eq!(pk4.met_location(), location::PAL_PARK);
        assert_eq!(pk4.held_item(), crate::testing::ITEM_LEFTOVERS);
        assert_eq!(pk4.friendship(), 70);
        assert_eq!(pk4.nickname(), "TREECKO");
        assert_eq!(pk4.pid(), 0x1234_5678);
        assert_eq!(pk4.nature(), pk3.nature());

        let pk5 = convert(&*pk4, Generation::Five, &mut ctx).unwrap();
        assert_eq!(pk5.met_location(), location::POKE_TRANSFER);
        assert_eq!(pk5.nature() as u32, 0x1234_5678 % 25);
        assert_eq!(pk5.nickname(), "Treecko");

        let pk6 = convert(&*pk5, Generation::Six, &mut ctx).unwrap();
        assert_eq!(pk6.encryption_constant(), 0x1234_5678);
        assert_eq!(pk6.ht_name(), "Elio");
        assert_eq!(pk6.country(), 49);
        assert_eq!(pk6.level(), 30);

        let pk7 = convert(&*pk6, Generation::Seven, &mut ctx).unwrap();
        assert_eq!(pk7.generation(), Generation::Seven);
        assert_eq!(&pk7.to_bytes()[8..], &pk6.to_bytes()[8..]);
        assert!(pk7.is_checksum_valid());
    }

    #[test]
    fn test_downgrade() {
        crate::testing::install();
        let target = trainer(GameVersion::E);
        let mut rng = seeded_rng();
        let mut ctx = ConvertContext::new(&target, &mut rng);

        let mut pk7 = Pk67::new(pk67::Format::Gen7, false);
        pk7.set_encryption_constant(0xdead_beef);
        pk7.set_pid(0x0bad_cafe);
        pk7.set_species(TREECKO);
        pk7.set_language(Language::English);
        pk7.set_level(40);
        pk7.set_move_id(0, 700);
        pk7.set_move_id(1, 10);
        pk7.set_held_item(crate::testing::ITEM_POTION);
        pk7.set_nicknamed(false);
        pk7.refresh_checksum();

        let pk3 = convert(&pk7, Generation::Three, &mut ctx).unwrap();
        assert_eq!(pk3.generation(), Generation::Three);
        assert_eq!(pk3.species(), TREECKO);
        assert_eq!(pk3.level(), 40);
        assert_eq!((pk3.move_id(0), pk3.move_id(1)), (10, 0));
        assert_eq!(pk3.held_item(), crate::testing::ITEM_POTION_GEN3);
        assert_eq!(pk3.met_location(), location::FARAWAY_GEN3);
        assert!(pk3.is_checksum_valid());

        let mut turtwig = pk7.clone();
        turtwig.set_species(387);
        assert!(convert(&turtwig, Generation::Three, &mut ctx).is_none());
    }
}
