//! Game-local id spaces and the fixed tables that map them to national ids.

/// National dex number for each Gen 1 internal species index. 0 marks an unused index.
static GEN1_INTERNAL_TO_NATIONAL: [u16; 191] = [
    0, 112, 115, 32, 35, 21, 100, 34, 80, 2, 103, 108, 102, 88, 94, 29,
    31, 104, 111, 131, 59, 151, 130, 90, 72, 92, 123, 120, 9, 127, 114, 0,
    0, 58, 95, 22, 16, 79, 64, 75, 113, 67, 122, 106, 107, 24, 47, 54,
    96, 76, 0, 126, 0, 125, 82, 109, 0, 56, 86, 50, 128, 0, 0, 0,
    83, 48, 149, 0, 0, 0, 84, 60, 124, 146, 144, 145, 132, 52, 98, 0,
    0, 0, 37, 38, 25, 26, 0, 0, 147, 148, 140, 141, 116, 117, 0, 0,
    27, 28, 138, 139, 39, 40, 133, 136, 135, 134, 66, 41, 23, 46, 61, 62,
    13, 14, 15, 0, 85, 57, 51, 49, 87, 0, 0, 10, 11, 12, 68, 0,
    55, 97, 42, 150, 143, 129, 0, 0, 89, 0, 99, 91, 0, 101, 36, 110,
    53, 105, 0, 93, 63, 65, 17, 18, 121, 1, 3, 73, 0, 118, 119, 0,
    0, 0, 0, 77, 78, 19, 20, 33, 30, 74, 137, 142, 0, 81, 0, 0,
    4, 7, 5, 8, 6, 0, 0, 0, 0, 43, 44, 45, 69, 70, 71,
];

/// National dex numbers of Gen 3 internal indexes 277 onward.
static GEN3_INTERNAL_HOENN: [u16; 135] = [
    252, 253, 254, 255, 256, 257, 258, 259, 260, 261, 262, 263, 264, 265, 266,
    267, 268, 269, 270, 271, 272, 273, 274, 275, 290, 291, 292, 276, 277, 285,
    286, 327, 278, 279, 283, 284, 320, 321, 300, 301, 352, 343, 344, 299, 324,
    302, 339, 340, 370, 341, 342, 349, 350, 318, 319, 328, 329, 330, 296, 297,
    309, 310, 322, 323, 363, 364, 365, 331, 332, 361, 362, 337, 338, 298, 325,
    326, 311, 312, 303, 307, 308, 333, 334, 360, 355, 356, 315, 287, 288, 289,
    316, 317, 357, 293, 294, 295, 366, 367, 368, 359, 353, 354, 336, 335, 369,
    304, 305, 306, 351, 313, 314, 345, 346, 347, 348, 280, 281, 282, 371, 372,
    373, 374, 375, 376, 377, 378, 379, 382, 383, 384, 380, 381, 385, 386, 358,
];

const GEN3_HOENN_START: u16 = 277;

pub fn gen1_to_national(internal: u8) -> u16 {
    GEN1_INTERNAL_TO_NATIONAL.get(internal as usize).copied().unwrap_or(0)
}

pub fn national_to_gen1(species: u16) -> u8 {
    if species == 0 {
        return 0;
    }
    GEN1_INTERNAL_TO_NATIONAL
        .iter()
        .position(|s| *s == species)
        .map(|i| i as u8)
        .unwrap_or(0)
}

pub fn gen3_to_national(internal: u16) -> u16 {
    match internal {
        0..=251 => internal,
        GEN3_HOENN_START..=411 => GEN3_INTERNAL_HOENN[(internal - GEN3_HOENN_START) as usize],
        _ => 0,
    }
}

pub fn national_to_gen3(species: u16) -> u16 {
    match species {
        0..=251 => species,
        252..=386 => GEN3_INTERNAL_HOENN
            .iter()
            .position(|s| *s == species)
            .map(|i| i as u16 + GEN3_HOENN_START)
            .unwrap_or(0),
        _ => 0,
    }
}

pub const GEN2_ITEM_LEFTOVERS: u8 = 0x92;
pub const GEN2_ITEM_BITTER_BERRY: u8 = 0x53;
pub const GEN2_ITEM_GOLD_BERRY: u8 = 0xae;
pub const GEN2_ITEM_BERRY: u8 = 0xad;

/// How the Time Capsule reads a Gen 1 catch-rate byte as a Gen 2 held item. Bytes that are not
/// valid Gen 2 items are replaced; everything else passes through.
pub fn catch_rate_to_gen2_item(rate: u8) -> u8 {
    match rate {
        0x19 => GEN2_ITEM_LEFTOVERS,
        0x2d => GEN2_ITEM_BITTER_BERRY,
        0x32 => GEN2_ITEM_GOLD_BERRY,
        0x5a | 0x64 | 0x78 | 0x87 | 0xbe | 0xc3 | 0xdc | 0xfa | 0xff => GEN2_ITEM_BERRY,
        rate => rate,
    }
}

pub mod location {
    /// Virtual Console transfer through Poké Transporter.
    pub const TRANSPORTER_VC: u16 = 30013;
    pub const PAL_PARK: u16 = 55;
    pub const POKE_TRANSFER: u16 = 30001;

    pub const FARAWAY_GEN3: u16 = 254;
    pub const FARAWAY_GEN4: u16 = 3002;
    pub const FARAWAY: u16 = 30012;

    pub fn faraway(generation: pkvault_gamedb::Generation) -> u16 {
        match generation.number() {
            0..=3 => FARAWAY_GEN3,
            4 => FARAWAY_GEN4,
            _ => FARAWAY,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gen1_index_is_bijective() {
        let mut seen = vec![false; 152];
        for internal in 0..=255u8 {
            let species = gen1_to_national(internal);
            if species == 0 {
                continue;
            }
            assert!(!seen[species as usize], "species {} twice", species);
            seen[species as usize] = true;
            assert_eq!(national_to_gen1(species), internal);
        }
        assert!(seen[1..].iter().all(|s| *s));
    }

    #[test]
    fn test_gen1_well_known_indexes() {
        assert_eq!(gen1_to_national(0x99), 1);
        assert_eq!(gen1_to_national(0x54), 25);
        assert_eq!(gen1_to_national(0x15), 151);
        assert_eq!(gen1_to_national(0x1f), 0);
        assert_eq!(national_to_gen1(152), 0);
    }

    #[test]
    fn test_gen3_index() {
        assert_eq!(gen3_to_national(25), 25);
        assert_eq!(gen3_to_national(277), 252);
        assert_eq!(gen3_to_national(411), 358);
        assert_eq!(gen3_to_national(260), 0);
        for species in 1..=386 {
            assert_eq!(gen3_to_national(national_to_gen3(species)), species);
        }
    }

    #[test]
    fn test_time_capsule_items() {
        assert_eq!(catch_rate_to_gen2_item(0x19), GEN2_ITEM_LEFTOVERS);
        assert_eq!(catch_rate_to_gen2_item(0xff), GEN2_ITEM_BERRY);
        assert_eq!(catch_rate_to_gen2_item(0x2d), GEN2_ITEM_BITTER_BERRY);
        assert_eq!(catch_rate_to_gen2_item(0x04), 0x04);
    }
}
