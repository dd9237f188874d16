//! Gen 1/2 record lists (party and boxes): count byte, species index list, records, OT names, nicknames.

pub const TERMINATOR: u8 = 0xff;
/// Species index entry marking a Gen 2 egg.
pub const EGG: u8 = 0xfd;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct List {
    pub offset: usize,
    pub capacity: usize,
    pub record_size: usize,
    pub name_len: usize,
}

pub struct Slot {
    pub entry: std::ops::Range<usize>,
    pub core: std::ops::Range<usize>,
    pub ot: std::ops::Range<usize>,
    pub nickname: std::ops::Range<usize>,
}

impl List {
    pub fn size(&self) -> usize {
        1 + (self.capacity + 1) + self.capacity * (self.record_size + 2 * self.name_len)
    }

    fn species_offset(&self, i: usize) -> usize {
        self.offset + 1 + i
    }

    fn records_offset(&self) -> usize {
        self.offset + 1 + self.capacity + 1
    }

    fn ots_offset(&self) -> usize {
        self.records_offset() + self.capacity * self.record_size
    }

    fn nicknames_offset(&self) -> usize {
        self.ots_offset() + self.capacity * self.name_len
    }

    pub fn slot(&self, i: usize) -> Slot {
        let core = self.records_offset() + i * self.record_size;
        let ot = self.ots_offset() + i * self.name_len;
        let nickname = self.nicknames_offset() + i * self.name_len;
        Slot {
            entry: self.species_offset(i)..self.species_offset(i) + 1,
            core: core..core + self.record_size,
            ot: ot..ot + self.name_len,
            nickname: nickname..nickname + self.name_len,
        }
    }

    pub fn count(&self, buf: &[u8]) -> usize {
        (buf[self.offset] as usize).min(self.capacity)
    }

    pub fn species_entry(&self, buf: &[u8], i: usize) -> u8 {
        buf[self.species_offset(i)]
    }

    pub fn set_species_entry(&self, buf: &mut [u8], i: usize, v: u8) {
        buf[self.species_offset(i)] = v;
    }

    /// A plausible list: count within capacity and the species list terminated right after it.
    pub fn is_valid(&self, buf: &[u8]) -> bool {
        if self.offset + self.size() > buf.len() {
            return false;
        }
        let count = buf[self.offset] as usize;
        count <= self.capacity && buf[self.species_offset(count)] == TERMINATOR
    }

    /// A list as the games initialize an empty one.
    pub fn clear(&self, buf: &mut [u8]) {
        buf[self.offset..][..self.size()].fill(0);
        buf[self.species_offset(0)] = TERMINATOR;
        buf[self.ots_offset()..self.nicknames_offset() + self.capacity * self.name_len]
            .fill(crate::text::gen12::TERMINATOR);
    }

    fn is_present(&self, buf: &[u8], i: usize) -> bool {
        i < self.count(buf) && buf[self.slot(i).core.start] != 0
    }

    /// Marks `i` occupied, growing the count over any empty slots in between.
    pub fn occupy(&self, buf: &mut [u8], i: usize, entry: u8) {
        let count = self.count(buf);
        if i >= count {
            for j in count..i {
                self.clear_slot(buf, j);
            }
            buf[self.offset] = i as u8 + 1;
            buf[self.species_offset(i + 1)] = TERMINATOR;
        }
        buf[self.species_offset(i)] = entry;
    }

    pub fn clear_slot(&self, buf: &mut [u8], i: usize) {
        let slot = self.slot(i);
        buf[slot.core].fill(0);
        buf[slot.ot].fill(crate::text::gen12::TERMINATOR);
        buf[slot.nickname].fill(crate::text::gen12::TERMINATOR);
        buf[self.species_offset(i)] = 0;
    }

    /// Moves every present record to the front, keeping their order, then rewrites the count, the species list
    /// and its terminator. `entry` gives the species list value for a record's first byte; an existing egg marker
    /// is carried along with its record.
    pub fn compact(&self, buf: &mut [u8], entry: impl Fn(u8) -> u8) {
        let present = (0..self.capacity).filter(|i| self.is_present(buf, *i)).collect::<Vec<_>>();

        for (dst, src) in present.iter().copied().enumerate() {
            let marker = buf[self.species_offset(src)];
            if dst != src {
                let (from, to) = (self.slot(src), self.slot(dst));
                buf.copy_within(from.core, to.core.start);
                buf.copy_within(from.ot, to.ot.start);
                buf.copy_within(from.nickname, to.nickname.start);
            }
            let species = buf[self.slot(dst).core.start];
            buf[self.species_offset(dst)] = if marker == EGG { EGG } else { entry(species) };
        }

        let count = present.len();
        for i in count..self.capacity {
            self.clear_slot(buf, i);
        }
        buf[self.offset] = count as u8;
        buf[self.species_offset(count)] = TERMINATOR;
    }
}

/// Splits `buf` into the given ascending, non-overlapping ranges as separate mutable slices.
pub fn split_ranges<const N: usize>(mut buf: &mut [u8], ranges: [std::ops::Range<usize>; N]) -> [&mut [u8]; N] {
    let mut consumed = 0;
    ranges.map(|r| {
        let (_, rest) = std::mem::take(&mut buf).split_at_mut(r.start - consumed);
        let (field, rest) = rest.split_at_mut(r.end - r.start);
        buf = rest;
        consumed = r.end;
        field
    })
}

impl Slot {
    pub fn ranges(&self) -> [std::ops::Range<usize>; 4] {
        [self.entry.clone(), self.core.clone(), self.ot.clone(), self.nickname.clone()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LIST: List = List {
        offset: 2,
        capacity: 4,
        record_size: 3,
        name_len: 2,
    };

    fn list_with(records: &[u8], count: u8) -> Vec<u8> {
        let mut buf = vec![0u8; LIST.offset + LIST.size() + 2];
        LIST.clear(&mut buf);
        buf[LIST.offset] = count;
        for (i, r) in records.iter().enumerate() {
            let slot = LIST.slot(i);
            buf[slot.core.clone()].fill(*r);
            buf[slot.ot].fill(*r + 0x80);
            buf[slot.nickname].fill(*r + 0x90);
            buf[LIST.species_offset(i)] = *r;
        }
        buf[LIST.species_offset(count as usize)] = TERMINATOR;
        buf
    }

    #[test]
    fn test_size() {
        let party = List {
            offset: 0,
            capacity: 6,
            record_size: 44,
            name_len: 11,
        };
        assert_eq!(party.size(), 0x194);
        let gen1_box = List {
            offset: 0,
            capacity: 20,
            record_size: 33,
            name_len: 11,
        };
        assert_eq!(gen1_box.size(), 0x462);
    }

    #[test]
    fn test_compact_is_stable() {
        let mut buf = list_with(&[5, 0, 7, 9], 4);
        LIST.compact(&mut buf, |s| s);
        assert_eq!(LIST.count(&buf), 3);
        assert_eq!(&buf[LIST.species_offset(0)..][..4], &[5, 7, 9, TERMINATOR]);
        assert_eq!(buf[LIST.slot(1).core.start], 7);
        assert_eq!(buf[LIST.slot(1).ot.start], 7 + 0x80);
        assert_eq!(buf[LIST.slot(2).nickname.start], 9 + 0x90);
        assert_eq!(buf[LIST.slot(3).core.start], 0);
        assert!(LIST.is_valid(&buf));
    }

    #[test]
    fn test_compact_is_idempotent() {
        for records in [&[0u8, 0, 3, 0][..], &[1, 2, 3, 4], &[0, 4, 0, 6], &[]] {
            let mut once = list_with(records, records.len() as u8);
            LIST.compact(&mut once, |s| s);
            let mut twice = once.clone();
            LIST.compact(&mut twice, |s| s);
            assert_eq!(once, twice);
            assert_eq!(LIST.count(&once), records.iter().filter(|r| **r != 0).count());
        }
    }

    #[test]
    fn test_compact_ignores_slots_past_count() {
        let mut buf = list_with(&[1, 2, 3], 1);
        LIST.compact(&mut buf, |s| s);
        assert_eq!(LIST.count(&buf), 1);
        assert_eq!(buf[LIST.slot(1).core.start], 0);
    }

    #[test]
    fn test_compact_keeps_egg_marker() {
        let mut buf = list_with(&[0, 4, 6], 3);
        LIST.set_species_entry(&mut buf, 1, EGG);
        LIST.compact(&mut buf, |s| s);
        assert_eq!(&buf[LIST.species_offset(0)..][..3], &[EGG, 6, TERMINATOR]);
    }

    #[test]
    fn test_occupy_grows_count() {
        let mut buf = list_with(&[1], 1);
        LIST.occupy(&mut buf, 2, 8);
        assert_eq!(LIST.count(&buf), 3);
        assert_eq!(&buf[LIST.species_offset(0)..][..4], &[1, 0, 8, TERMINATOR]);
    }

    #[test]
    fn test_split_ranges() {
        let mut buf = (0..10u8).collect::<Vec<_>>();
        let [a, b, c] = split_ranges(&mut buf, [0..2, 4..5, 7..10]);
        a[0] = 0xaa;
        b[0] = 0xbb;
        c[2] = 0xcc;
        assert_eq!(buf, vec![0xaa, 1, 2, 3, 0xbb, 5, 6, 7, 8, 0xcc]);
    }

    #[test]
    fn test_slot_ranges_ascend() {
        let [entry, core, ot, nickname] = LIST.slot(3).ranges();
        assert!(entry.end <= core.start && core.end <= ot.start && ot.end <= nickname.start);
        assert_eq!(nickname.end, LIST.offset + LIST.size());
    }
}
