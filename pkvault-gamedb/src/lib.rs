#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    num_derive::FromPrimitive,
    serde::Serialize,
    serde::Deserialize,
)]
pub enum Generation {
    One = 1,
    Two = 2,
    Three = 3,
    Four = 4,
    Five = 5,
    Six = 6,
    Seven = 7,
    Eight = 8,
    /// Let's Go Pikachu/Eevee. Shares Gen 7's record shape but none of its transfer paths.
    Lgpe = 0x7b,
}

impl Generation {
    pub fn from_number(n: u8) -> Option<Self> {
        num_traits::FromPrimitive::from_u8(n)
    }

    /// The mainline generation number; LGPE sorts with Gen 7.
    pub fn number(self) -> u8 {
        match self {
            Generation::Lgpe => 7,
            g => g as u8,
        }
    }

    pub fn bounds(self) -> &'static Bounds {
        match self {
            Generation::One => &GEN1_BOUNDS,
            Generation::Two => &GEN2_BOUNDS,
            Generation::Three => &GEN3_BOUNDS,
            Generation::Four => &GEN4_BOUNDS,
            Generation::Five => &GEN5_BOUNDS,
            Generation::Six => &GEN6_BOUNDS,
            Generation::Seven => &GEN7_BOUNDS,
            Generation::Eight => &GEN8_BOUNDS,
            Generation::Lgpe => &LGPE_BOUNDS,
        }
    }

    pub fn max_species(self) -> u16 {
        self.bounds().max_species
    }

    pub fn max_move(self) -> u16 {
        self.bounds().max_move
    }

    pub fn max_item(self) -> u16 {
        self.bounds().max_item
    }

    pub fn max_ability(self) -> u16 {
        self.bounds().max_ability
    }
}

impl std::fmt::Display for Generation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Generation::Lgpe => write!(f, "LGPE"),
            g => write!(f, "Gen {}", *g as u8),
        }
    }
}

pub struct Bounds {
    pub max_species: u16,
    pub max_move: u16,
    pub max_item: u16,
    pub max_ability: u16,
}

pub const GEN1_BOUNDS: Bounds = Bounds {
    max_species: 151,
    max_move: 165,
    max_item: 255,
    max_ability: 0,
};

pub const GEN2_BOUNDS: Bounds = Bounds {
    max_species: 251,
    max_move: 251,
    max_item: 255,
    max_ability: 0,
};

pub const GEN3_BOUNDS: Bounds = Bounds {
    max_species: 386,
    max_move: 354,
    max_item: 376,
    max_ability: 77,
};

pub const GEN4_BOUNDS: Bounds = Bounds {
    max_species: 493,
    max_move: 467,
    max_item: 536,
    max_ability: 123,
};

pub const GEN5_BOUNDS: Bounds = Bounds {
    max_species: 649,
    max_move: 559,
    max_item: 638,
    max_ability: 164,
};

pub const GEN6_BOUNDS: Bounds = Bounds {
    max_species: 721,
    max_move: 621,
    max_item: 775,
    max_ability: 191,
};

pub const GEN7_BOUNDS: Bounds = Bounds {
    max_species: 807,
    max_move: 728,
    max_item: 959,
    max_ability: 233,
};

pub const LGPE_BOUNDS: Bounds = Bounds {
    max_species: 809,
    max_move: 742,
    max_item: 1057,
    max_ability: 233,
};

pub const GEN8_BOUNDS: Bounds = Bounds {
    max_species: 898,
    max_move: 826,
    max_item: 1607,
    max_ability: 267,
};

#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    Default,
    num_derive::FromPrimitive,
    serde::Serialize,
    serde::Deserialize,
)]
pub enum Language {
    #[default]
    #[serde(rename = "ENG")]
    English = 2,
    #[serde(rename = "JPN")]
    Japanese = 1,
    #[serde(rename = "FRE")]
    French = 3,
    #[serde(rename = "ITA")]
    Italian = 4,
    #[serde(rename = "GER")]
    German = 5,
    #[serde(rename = "SPA")]
    Spanish = 7,
    #[serde(rename = "KOR")]
    Korean = 8,
    #[serde(rename = "CHS")]
    ChineseSimplified = 9,
    #[serde(rename = "CHT")]
    ChineseTraditional = 10,
}

impl Language {
    pub const ALL: &'static [Language] = &[
        Language::Japanese,
        Language::English,
        Language::French,
        Language::Italian,
        Language::German,
        Language::Spanish,
        Language::Korean,
        Language::ChineseSimplified,
        Language::ChineseTraditional,
    ];

    pub fn from_id(id: u8) -> Option<Self> {
        num_traits::FromPrimitive::from_u8(id)
    }

    pub fn id(self) -> u8 {
        self as u8
    }

    /// Languages a game of the given generation could have been released in.
    pub fn available_in(self, generation: Generation) -> bool {
        match self {
            Language::Korean => generation >= Generation::Two,
            Language::ChineseSimplified | Language::ChineseTraditional => generation.number() >= 7,
            _ => true,
        }
    }

    /// Gen 1/2 carts only ship in these three text layouts.
    pub fn gb_region(self) -> GbRegion {
        match self {
            Language::Japanese => GbRegion::Japanese,
            Language::Korean => GbRegion::Korean,
            _ => GbRegion::International,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GbRegion {
    Japanese,
    International,
    Korean,
}

#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    num_derive::FromPrimitive,
    serde::Serialize,
    serde::Deserialize,
)]
pub enum GameVersion {
    S = 1,
    R = 2,
    E = 3,
    FR = 4,
    LG = 5,
    HG = 7,
    SS = 8,
    D = 10,
    P = 11,
    Pt = 12,
    CXD = 15,
    W = 20,
    B = 21,
    W2 = 22,
    B2 = 23,
    X = 24,
    Y = 25,
    AS = 26,
    OR = 27,
    SN = 30,
    MN = 31,
    US = 32,
    UM = 33,
    RD = 35,
    GN = 36,
    BU = 37,
    YW = 38,
    GD = 39,
    SI = 40,
    C = 41,
    GP = 42,
    GE = 43,
}

impl GameVersion {
    pub fn from_id(id: u8) -> Option<Self> {
        num_traits::FromPrimitive::from_u8(id)
    }

    pub fn id(self) -> u8 {
        self as u8
    }

    pub fn generation(self) -> Generation {
        match self {
            GameVersion::RD | GameVersion::GN | GameVersion::BU | GameVersion::YW => Generation::One,
            GameVersion::GD | GameVersion::SI | GameVersion::C => Generation::Two,
            GameVersion::S | GameVersion::R | GameVersion::E | GameVersion::FR | GameVersion::LG | GameVersion::CXD => {
                Generation::Three
            }
            GameVersion::D | GameVersion::P | GameVersion::Pt | GameVersion::HG | GameVersion::SS => Generation::Four,
            GameVersion::W | GameVersion::B | GameVersion::W2 | GameVersion::B2 => Generation::Five,
            GameVersion::X | GameVersion::Y | GameVersion::AS | GameVersion::OR => Generation::Six,
            GameVersion::SN | GameVersion::MN | GameVersion::US | GameVersion::UM => Generation::Seven,
            GameVersion::GP | GameVersion::GE => Generation::Lgpe,
        }
    }

    pub fn name(self) -> &'static str {
        VERSIONS
            .iter()
            .find(|v| v.version == self)
            .map(|v| v.name)
            .unwrap_or("?")
    }
}

pub struct Version {
    pub version: GameVersion,
    pub name: &'static str,
}

pub const VERSIONS: &[Version] = &[
    Version {
        version: GameVersion::RD,
        name: "Red",
    },
    Version {
        version: GameVersion::GN,
        name: "Green",
    },
    Version {
        version: GameVersion::BU,
        name: "Blue",
    },
    Version {
        version: GameVersion::YW,
        name: "Yellow",
    },
    Version {
        version: GameVersion::GD,
        name: "Gold",
    },
    Version {
        version: GameVersion::SI,
        name: "Silver",
    },
    Version {
        version: GameVersion::C,
        name: "Crystal",
    },
    Version {
        version: GameVersion::R,
        name: "Ruby",
    },
    Version {
        version: GameVersion::S,
        name: "Sapphire",
    },
    Version {
        version: GameVersion::E,
        name: "Emerald",
    },
    Version {
        version: GameVersion::FR,
        name: "FireRed",
    },
    Version {
        version: GameVersion::LG,
        name: "LeafGreen",
    },
    Version {
        version: GameVersion::CXD,
        name: "Colosseum/XD",
    },
    Version {
        version: GameVersion::D,
        name: "Diamond",
    },
    Version {
        version: GameVersion::P,
        name: "Pearl",
    },
    Version {
        version: GameVersion::Pt,
        name: "Platinum",
    },
    Version {
        version: GameVersion::HG,
        name: "HeartGold",
    },
    Version {
        version: GameVersion::SS,
        name: "SoulSilver",
    },
    Version {
        version: GameVersion::B,
        name: "Black",
    },
    Version {
        version: GameVersion::W,
        name: "White",
    },
    Version {
        version: GameVersion::B2,
        name: "Black 2",
    },
    Version {
        version: GameVersion::W2,
        name: "White 2",
    },
    Version {
        version: GameVersion::X,
        name: "X",
    },
    Version {
        version: GameVersion::Y,
        name: "Y",
    },
    Version {
        version: GameVersion::OR,
        name: "Omega Ruby",
    },
    Version {
        version: GameVersion::AS,
        name: "Alpha Sapphire",
    },
    Version {
        version: GameVersion::SN,
        name: "Sun",
    },
    Version {
        version: GameVersion::MN,
        name: "Moon",
    },
    Version {
        version: GameVersion::US,
        name: "Ultra Sun",
    },
    Version {
        version: GameVersion::UM,
        name: "Ultra Moon",
    },
    Version {
        version: GameVersion::GP,
        name: "Let's Go, Pikachu!",
    },
    Version {
        version: GameVersion::GE,
        name: "Let's Go, Eevee!",
    },
];
