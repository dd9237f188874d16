use once_cell::sync::Lazy;

use crate::text::Charset;

pub const TERMINATOR: u16 = 0xffff;

static TABLE: Lazy<Charset> = Lazy::new(|| {
    Charset::builder(2, &TERMINATOR.to_le_bytes())
        .add_range_rules(0x00a2, "０１２３４５６７８９")
        .add_range_rules(0x00ac, "ＡＢＣＤＥＦＧＨＩＪＫＬＭＮＯＰＱＲＳＴＵＶＷＸＹＺ")
        .add_range_rules(0x00c6, "ａｂｃｄｅｆｇｈｉｊｋｌｍｎｏｐｑｒｓｔｕｖｗｘｙｚ")
        .add_range_rules(0x0121, "0123456789")
        .add_range_rules(0x012b, "ABCDEFGHIJKLMNOPQRSTUVWXYZ")
        .add_range_rules(0x0145, "abcdefghijklmnopqrstuvwxyz")
        .add_range_rules(0x01ab, "!?,.…･/‘’“”„«»()♂♀+-*#=&~:;")
        .add_rule(&0x01b3u16.to_le_bytes(), "'")
        .add_decode_rule(&0x01b3u16.to_le_bytes(), "’")
        .add_rule(&0x01de_u16.to_le_bytes(), " ")
        .build()
});

pub fn charset() -> &'static Charset {
    &TABLE
}

pub fn decode(buf: &[u8]) -> String {
    TABLE.decode(buf)
}

pub fn write(field: &mut [u8], s: &str) {
    TABLE.write_field(field, s)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name() {
        let mut field = [0u8; 22];
        write(&mut field, "Turtwig");
        assert_eq!(&field[..4], &[0x3e, 0x01, 0x59, 0x01]);
        assert_eq!(&field[14..16], &[0xff, 0xff]);
        assert_eq!(decode(&field), "Turtwig");
    }

    #[test]
    fn test_space_and_punctuation() {
        let mut field = [0u8; 22];
        write(&mut field, "Mr. Mime");
        assert_eq!(decode(&field), "Mr. Mime");
        write(&mut field, "Farfetch'd");
        assert_eq!(decode(&field), "Farfetch’d");
    }
}
