use once_cell::sync::Lazy;

use crate::text::Charset;

pub const TERMINATOR: u8 = 0xff;

static WESTERN: Lazy<Charset> = Lazy::new(|| {
    Charset::builder(1, &[TERMINATOR])
        .add_rule(&[0x00], " ")
        .add_range_rules(0x01, "ÀÁÂÇÈÉÊËÌ")
        .add_range_rules(0x0b, "ÎÏÒÓÔŒÙÚÛÑßàá")
        .add_range_rules(0x19, "çèéêëì")
        .add_range_rules(0x20, "îïòóôœùúûñºª")
        .add_rule(&[0x2d], "&")
        .add_rule(&[0x2e], "+")
        .add_rule(&[0x35], "=")
        .add_rule(&[0x36], ";")
        .add_rule(&[0x51], "¿")
        .add_rule(&[0x52], "¡")
        .add_rule(&[0x5a], "Í")
        .add_rule(&[0x5b], "%")
        .add_rule(&[0x5c], "(")
        .add_rule(&[0x5d], ")")
        .add_rule(&[0x68], "â")
        .add_rule(&[0x6f], "í")
        .add_range_rules(0xa1, "0123456789!?.-")
        .add_range_rules(0xb0, "…“”‘’♂♀")
        .add_rule(&[0xb8], ",")
        .add_rule(&[0xb9], "×")
        .add_rule(&[0xba], "/")
        .add_range_rules(0xbb, "ABCDEFGHIJKLMNOPQRSTUVWXYZ")
        .add_range_rules(0xd5, "abcdefghijklmnopqrstuvwxyz")
        .add_range_rules(0xf0, ":ÄÖÜäöü")
        .build()
});

pub fn charset() -> &'static Charset {
    &WESTERN
}

pub fn decode(buf: &[u8]) -> String {
    WESTERN.decode(buf)
}

/// Gen 3 name fields need no terminator once full.
pub fn write(field: &mut [u8], s: &str) {
    WESTERN.fill_field(field, &s.replace('\'', "’"))
}
