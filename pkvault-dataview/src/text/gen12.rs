use once_cell::sync::Lazy;
use pkvault_gamedb::{GbRegion, Language};

use crate::text::Charset;

pub const TERMINATOR: u8 = 0x50;

/// Stands in for a trainer name that could not be carried across regions.
pub const TRAINER_PLACEHOLDER: u8 = 0x5d;

pub const POKE_GLYPH: &str = "ᴾᴷ";
pub const MON_GLYPH: &str = "ᴹᴺ";

fn common_rules(b: crate::text::CharsetBuilder) -> crate::text::CharsetBuilder {
    b.add_rule(&[0x7f], " ")
        .add_range_rules(0xf6, "0123456789")
        .add_rule(&[0xe6], "?")
        .add_rule(&[0xe7], "!")
        .add_rule(&[0xef], "♂")
        .add_rule(&[0xf5], "♀")
        .add_rule(&[0xf1], "×")
        .add_rule(&[0xf3], "/")
        .add_rule(&[0xf4], ",")
}

fn latin_rules(b: crate::text::CharsetBuilder) -> crate::text::CharsetBuilder {
    common_rules(b)
        .add_range_rules(0x80, "ABCDEFGHIJKLMNOPQRSTUVWXYZ")
        .add_range_rules(0xa0, "abcdefghijklmnopqrstuvwxyz")
        .add_rule(&[0x9a], "(")
        .add_rule(&[0x9b], ")")
        .add_rule(&[0x9c], ":")
        .add_rule(&[0x9d], ";")
        .add_rule(&[0x9e], "[")
        .add_rule(&[0x9f], "]")
        .add_rule(&[0xe0], "'")
        .add_rule(&[0xe1], POKE_GLYPH)
        .add_rule(&[0xe2], MON_GLYPH)
        .add_rule(&[0xe3], "-")
        .add_rule(&[0xe8], ".")
        .add_decode_rule(&[0xf2], ".")
        .add_rule(&[0xf0], "¥")
        .add_decode_rule(&[TRAINER_PLACEHOLDER], "TRAINER")
}

static INTERNATIONAL: Lazy<Charset> = Lazy::new(|| {
    latin_rules(Charset::builder(1, &[TERMINATOR]))
        .add_rule(&[0xba], "é")
        .add_rule(&[0xbb], "'d")
        .add_rule(&[0xbc], "'l")
        .add_rule(&[0xbd], "'s")
        .add_rule(&[0xbe], "'t")
        .add_rule(&[0xbf], "'v")
        .add_rule(&[0xe4], "'r")
        .add_rule(&[0xe5], "'m")
        .build()
});

static EUROPEAN: Lazy<Charset> = Lazy::new(|| {
    latin_rules(Charset::builder(1, &[TERMINATOR]))
        .add_range_rules(0xba, "àèéùßç")
        .add_range_rules(0xc0, "ÄÖÜäöü")
        .add_range_rules(0xc6, "ëïâôûêî")
        .build()
});

static JAPANESE: Lazy<Charset> = Lazy::new(|| {
    common_rules(Charset::builder(1, &[TERMINATOR]))
        .add_range_rules(0x05, "ガギグゲゴザジズゼゾダヂヅデド")
        .add_range_rules(
            0x80,
            "アイウエオカキクケコサシスセソタチツテトナニヌネノハヒフホマミムメモヤユヨラルレロワヲンッャュョィ",
        )
        .add_range_rules(
            0xb1,
            "あいうえおかきくけこさしすせそたちつてとなにぬねのはひふへほまみむめもやゆよらりるれろわをんっゃゅょ",
        )
        .add_rule(&[0xe3], "ー")
        .add_rule(&[0xe8], "。")
        .add_decode_rule(&[TRAINER_PLACEHOLDER], "トレーナー")
        .build()
});

pub fn charset(language: Language) -> &'static Charset {
    match language.gb_region() {
        GbRegion::Japanese => &JAPANESE,
        GbRegion::Korean => &INTERNATIONAL,
        GbRegion::International => match language {
            Language::English => &INTERNATIONAL,
            _ => &EUROPEAN,
        },
    }
}

/// Name field width including the terminator.
pub fn name_len(language: Language) -> usize {
    if language.gb_region() == GbRegion::Japanese {
        6
    } else {
        11
    }
}

pub fn decode(buf: &[u8], language: Language) -> String {
    charset(language).decode(buf)
}

pub fn write(field: &mut [u8], s: &str, language: Language) {
    charset(language).write_field(field, s)
}

/// Like `write`, but a name that does not fit the region's glyphs becomes the trainer placeholder.
pub fn write_or_placeholder(field: &mut [u8], s: &str, language: Language) {
    if charset(language).can_encode(s) {
        write(field, s, language);
        return;
    }
    field.fill(TERMINATOR);
    field[0] = TRAINER_PLACEHOLDER;
}

/// Decodes a name for carrying into a later generation's Unicode text: game-specific ligature glyphs are
/// spelled out.
pub fn decode_transporter(buf: &[u8], language: Language) -> String {
    decode(buf, language)
        .replace(POKE_GLYPH, "PK")
        .replace(MON_GLYPH, "MN")
        .replace('×', "x")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_international_name() {
        let mut field = [0u8; 11];
        write(&mut field, "PIKACHU", Language::English);
        assert_eq!(&field[..8], &[0x8f, 0x88, 0x8a, 0x80, 0x82, 0x87, 0x94, 0x50]);
        assert_eq!(decode(&field, Language::English), "PIKACHU");
    }

    #[test]
    fn test_international_contractions() {
        let mut field = [0u8; 11];
        write(&mut field, "FARFETCH'D", Language::English);
        assert_eq!(decode(&field, Language::English), "FARFETCH'D");
        write(&mut field, "Bob'd", Language::English);
        assert_eq!(field[3], 0xbb);
    }

    #[test]
    fn test_japanese_name() {
        let mut field = [0u8; 6];
        write(&mut field, "ピカチュウ", Language::Japanese);
        assert_eq!(field[5], TERMINATOR);
        write(&mut field, "ミュウ", Language::Japanese);
        assert_eq!(decode(&field, Language::Japanese), "ミュウ");
    }

    #[test]
    fn test_european_umlauts() {
        let mut field = [0u8; 11];
        write(&mut field, "MÖWE", Language::German);
        assert_eq!(field[1], 0xc1);
        assert_eq!(decode(&field, Language::German), "MÖWE");
    }

    #[test]
    fn test_placeholder_is_region_default() {
        let mut field = [0u8; 11];
        write_or_placeholder(&mut field, "サトシ", Language::English);
        assert_eq!(field[0], TRAINER_PLACEHOLDER);
        assert_eq!(decode(&field, Language::English), "TRAINER");
        assert_eq!(decode(&field, Language::Japanese), "トレーナー");

        write_or_placeholder(&mut field, "ASH", Language::English);
        assert_eq!(decode(&field, Language::English), "ASH");
    }

    #[test]
    fn test_transporter_spells_out_glyphs() {
        let mut field = [0u8; 11];
        field[..3].copy_from_slice(&[0xe1, 0xe2, TERMINATOR]);
        assert_eq!(decode(&field, Language::English), "ᴾᴷᴹᴺ");
        assert_eq!(decode_transporter(&field, Language::English), "PKMN");
    }
}
