use pkvault_gamedb::{Generation, Language};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, num_derive::FromPrimitive)]
pub enum GrowthRate {
    #[default]
    MediumFast = 0,
    Erratic = 1,
    Fluctuating = 2,
    MediumSlow = 3,
    Fast = 4,
    Slow = 5,
}

impl GrowthRate {
    pub fn from_id(id: u8) -> Option<Self> {
        num_traits::FromPrimitive::from_u8(id)
    }

    /// Minimum experience for `level`, clamped to 1..=100.
    pub fn exp_for_level(self, level: u8) -> u32 {
        EXP_TABLE[self as usize][level.clamp(1, 100) as usize - 1]
    }

    /// Highest level whose threshold `exp` reaches.
    pub fn level_for_exp(self, exp: u32) -> u8 {
        let table = &EXP_TABLE[self as usize];
        let mut level = 1;
        while level < 100 && exp >= table[level as usize] {
            level += 1;
        }
        level
    }

    pub fn max_exp(self) -> u32 {
        self.exp_for_level(100)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct PersonalInfo {
    /// HP, Attack, Defense, Speed, Sp. Atk, Sp. Def. Gen 1 has a single Special; it is stored in both slots.
    pub base_stats: [u8; 6],
    pub types: [u8; 2],
    pub catch_rate: u8,
    /// 0 always male, 254 always female, 255 genderless; otherwise the female threshold.
    pub gender_ratio: u8,
    pub growth_rate: GrowthRate,
    pub base_friendship: u8,
    pub abilities: [u16; 3],
}

pub const GENDER_MALE_ONLY: u8 = 0;
pub const GENDER_FEMALE_ONLY: u8 = 254;
pub const GENDERLESS: u8 = 255;

/// Base-stat catalog. `None` means the species (or form) does not exist in that generation.
pub trait Personal: Send + Sync {
    fn info(&self, generation: Generation, species: u16, form: u8) -> Option<PersonalInfo>;

    fn contains(&self, generation: Generation, species: u16) -> bool {
        self.info(generation, species, 0).is_some()
    }
}

/// Localized species names.
pub trait SpeciesNames: Send + Sync {
    fn species_name(&self, species: u16, language: Language) -> Option<&str>;
}

/// Maps Gen 3 item ids to and from the item ids used by Gen 4 onward. `None` means not convertible.
pub trait ItemMap: Send + Sync {
    fn from_gen3(&self, item: u16) -> Option<u16>;
    fn to_gen3(&self, item: u16) -> Option<u16>;
}

#[derive(Clone, Default)]
pub struct PersonalTable {
    entries: std::collections::HashMap<(Generation, u16, u8), PersonalInfo>,
}

impl PersonalTable {
    pub fn new() -> Self {
        Self {
            entries: std::collections::HashMap::new(),
        }
    }

    pub fn insert(&mut self, generation: Generation, species: u16, form: u8, info: PersonalInfo) {
        self.entries.insert((generation, species, form), info);
    }

    /// Inserts `info` for every generation from `introduced` through Gen 8 whose catalog can hold `species`.
    pub fn insert_from(&mut self, introduced: Generation, species: u16, info: PersonalInfo) {
        for generation in [
            Generation::One,
            Generation::Two,
            Generation::Three,
            Generation::Four,
            Generation::Five,
            Generation::Six,
            Generation::Seven,
            Generation::Lgpe,
            Generation::Eight,
        ] {
            if generation.number() >= introduced.number() && species <= generation.max_species() {
                self.insert(generation, species, 0, info);
            }
        }
    }

    pub fn remove(&mut self, generation: Generation, species: u16) {
        self.entries.retain(|(g, s, _), _| !(*g == generation && *s == species));
    }
}

impl Personal for PersonalTable {
    fn info(&self, generation: Generation, species: u16, form: u8) -> Option<PersonalInfo> {
        self.entries
            .get(&(generation, species, form))
            .or_else(|| self.entries.get(&(generation, species, 0)))
            .copied()
    }
}

#[derive(Clone, Default)]
pub struct NameTable {
    names: std::collections::HashMap<Language, Vec<String>>,
}

impl NameTable {
    pub fn new() -> Self {
        Self {
            names: std::collections::HashMap::new(),
        }
    }

    /// Loads one name per line, line N being national species N. Line 0 is conventionally the egg.
    pub fn parse_lines(&mut self, language: Language, text: &str) {
        self.names.insert(
            language,
            text.lines().map(|l| l.trim_end_matches('\r').to_string()).collect(),
        );
    }
}

impl SpeciesNames for NameTable {
    fn species_name(&self, species: u16, language: Language) -> Option<&str> {
        self.names
            .get(&language)
            .and_then(|names| names.get(species as usize))
            .map(|s| s.as_str())
            .filter(|s| !s.is_empty())
    }
}

#[derive(Clone, Default)]
pub struct ItemTable {
    gen3_to_modern: std::collections::HashMap<u16, u16>,
    modern_to_gen3: std::collections::HashMap<u16, u16>,
}

impl ItemTable {
    pub fn new() -> Self {
        Self {
            gen3_to_modern: std::collections::HashMap::new(),
            modern_to_gen3: std::collections::HashMap::new(),
        }
    }

    pub fn insert(&mut self, gen3: u16, modern: u16) {
        self.gen3_to_modern.insert(gen3, modern);
        self.modern_to_gen3.insert(modern, gen3);
    }
}

impl ItemMap for ItemTable {
    fn from_gen3(&self, item: u16) -> Option<u16> {
        if item == 0 {
            return Some(0);
        }
        self.gen3_to_modern.get(&item).copied()
    }

    fn to_gen3(&self, item: u16) -> Option<u16> {
        if item == 0 {
            return Some(0);
        }
        self.modern_to_gen3.get(&item).copied()
    }
}

/// Process-wide lookup tables, installed once by the host.
pub struct GameData {
    pub personal: Box<dyn Personal>,
    pub names: Box<dyn SpeciesNames>,
    pub items: Box<dyn ItemMap>,
}

impl GameData {
    pub fn empty() -> Self {
        Self {
            personal: Box::new(PersonalTable::new()),
            names: Box::new(NameTable::new()),
            items: Box::new(ItemTable::new()),
        }
    }
}

static INSTALLED: once_cell::sync::OnceCell<GameData> = once_cell::sync::OnceCell::new();
static EMPTY: once_cell::sync::Lazy<GameData> = once_cell::sync::Lazy::new(GameData::empty);

/// Installs the game data. Only the first call takes effect; later calls hand the value back.
pub fn install(data: GameData) -> Result<(), GameData> {
    INSTALLED.set(data)
}

pub fn get() -> &'static GameData {
    INSTALLED.get().unwrap_or(&EMPTY)
}

static EXP_TABLE: [[u32; 100]; 6] = [
    // Medium Fast
    [
        0, 8, 27, 64, 125, 216, 343, 512, 729, 1000,
        1331, 1728, 2197, 2744, 3375, 4096, 4913, 5832, 6859, 8000,
        9261, 10648, 12167, 13824, 15625, 17576, 19683, 21952, 24389, 27000,
        29791, 32768, 35937, 39304, 42875, 46656, 50653, 54872, 59319, 64000,
        68921, 74088, 79507, 85184, 91125, 97336, 103823, 110592, 117649, 125000,
        132651, 140608, 148877, 157464, 166375, 175616, 185193, 195112, 205379, 216000,
        226981, 238328, 250047, 262144, 274625, 287496, 300763, 314432, 328509, 343000,
        357911, 373248, 389017, 405224, 421875, 438976, 456533, 474552, 493039, 512000,
        531441, 551368, 571787, 592704, 614125, 636056, 658503, 681472, 704969, 729000,
        753571, 778688, 804357, 830584, 857375, 884736, 912673, 941192, 970299, 1000000,
    ],
    // Erratic
    [
        0, 15, 52, 122, 237, 406, 637, 942, 1326, 1800,
        2369, 3041, 3822, 4719, 5737, 6881, 8155, 9564, 11111, 12800,
        14632, 16610, 18737, 21012, 23437, 26012, 28737, 31610, 34632, 37800,
        41111, 44564, 48155, 51881, 55737, 59719, 63822, 68041, 72369, 76800,
        81326, 85942, 90637, 95406, 100237, 105122, 110052, 115015, 120001, 125000,
        131324, 137795, 144410, 151165, 158056, 165079, 172229, 179503, 186894, 194400,
        202013, 209728, 217540, 225443, 233431, 241496, 249633, 257834, 267406, 276458,
        286328, 296358, 305767, 316074, 326531, 336255, 346965, 357812, 367807, 378880,
        390077, 400293, 411686, 423190, 433572, 445239, 457001, 467489, 479378, 491346,
        501878, 513934, 526049, 536557, 548720, 560922, 571333, 583539, 591882, 600000,
    ],
    // Fluctuating
    [
        0, 4, 13, 32, 65, 112, 178, 276, 393, 540,
        745, 967, 1230, 1591, 1957, 2457, 3046, 3732, 4526, 5440,
        6482, 7666, 9003, 10506, 12187, 14060, 16140, 18439, 20974, 23760,
        26811, 30146, 33780, 37731, 42017, 46656, 50653, 55969, 60505, 66560,
        71677, 78533, 84277, 91998, 98415, 107069, 114205, 123863, 131766, 142500,
        151222, 163105, 172697, 185807, 196322, 210739, 222231, 238036, 250562, 267840,
        281456, 300293, 315059, 335544, 351520, 373744, 390991, 415050, 433631, 459620,
        479600, 507617, 529063, 559209, 582187, 614566, 639146, 673863, 700115, 737280,
        765275, 804997, 834809, 877201, 908905, 954084, 987754, 1035837, 1071552, 1122660,
        1160499, 1214753, 1254796, 1312322, 1354652, 1415577, 1460276, 1524731, 1571884, 1640000,
    ],
    // Medium Slow
    [
        0, 9, 57, 96, 135, 179, 236, 314, 419, 560,
        742, 973, 1261, 1612, 2035, 2535, 3120, 3798, 4575, 5460,
        6458, 7577, 8825, 10208, 11735, 13411, 15244, 17242, 19411, 21760,
        24294, 27021, 29949, 33084, 36435, 40007, 43808, 47846, 52127, 56660,
        61450, 66505, 71833, 77440, 83335, 89523, 96012, 102810, 109923, 117360,
        125126, 133229, 141677, 150476, 159635, 169159, 179056, 189334, 199999, 211060,
        222522, 234393, 246681, 259392, 272535, 286115, 300140, 314618, 329555, 344960,
        360838, 377197, 394045, 411388, 429235, 447591, 466464, 485862, 505791, 526260,
        547274, 568841, 590969, 613664, 636935, 660787, 685228, 710266, 735907, 762160,
        789030, 816525, 844653, 873420, 902835, 932903, 963632, 995030, 1027103, 1059860,
    ],
    // Fast
    [
        0, 6, 21, 51, 100, 172, 274, 409, 583, 800,
        1064, 1382, 1757, 2195, 2700, 3276, 3930, 4665, 5487, 6400,
        7408, 8518, 9733, 11059, 12500, 14060, 15746, 17561, 19511, 21600,
        23832, 26214, 28749, 31443, 34300, 37324, 40522, 43897, 47455, 51200,
        55136, 59270, 63605, 68147, 72900, 77868, 83058, 88473, 94119, 100000,
        106120, 112486, 119101, 125971, 133100, 140492, 148154, 156089, 164303, 172800,
        181584, 190662, 200037, 209715, 219700, 229996, 240610, 251545, 262807, 274400,
        286328, 298598, 311213, 324179, 337500, 351180, 365226, 379641, 394431, 409600,
        425152, 441094, 457429, 474163, 491300, 508844, 526802, 545177, 563975, 583200,
        602856, 622950, 643485, 664467, 685900, 707788, 730138, 752953, 776239, 800000,
    ],
    // Slow
    [
        0, 10, 33, 80, 156, 270, 428, 640, 911, 1250,
        1663, 2160, 2746, 3430, 4218, 5120, 6141, 7290, 8573, 10000,
        11576, 13310, 15208, 17280, 19531, 21970, 24603, 27440, 30486, 33750,
        37238, 40960, 44921, 49130, 53593, 58320, 63316, 68590, 74148, 80000,
        86151, 92610, 99383, 106480, 113906, 121670, 129778, 138240, 147061, 156250,
        165813, 175760, 186096, 196830, 207968, 219520, 231491, 243890, 256723, 270000,
        283726, 297910, 312558, 327680, 343281, 359370, 375953, 393040, 410636, 428750,
        447388, 466560, 486271, 506530, 527343, 548720, 570666, 593190, 616298, 640000,
        664301, 689210, 714733, 740880, 767656, 795070, 823128, 851840, 881211, 911250,
        941963, 973360, 1005446, 1038230, 1071718, 1105920, 1140841, 1176490, 1212873, 1250000,
    ],
];
