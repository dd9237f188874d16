use crate::save::{Item, PouchKind};

pub const TERMINATOR: u8 = 0xff;
pub const MAX_QUANTITY: u16 = 99;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Layout {
    /// Count byte, `capacity` (id, quantity) pairs, terminator.
    CountedPairs,
    /// Count byte, `capacity` ids, terminator.
    CountedIds,
    /// One quantity byte per TM/HM, indexed by machine number.
    TmQuantities,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pouch {
    pub kind: PouchKind,
    pub offset: usize,
    pub capacity: usize,
    pub layout: Layout,
}

const GEN2_TM01: u16 = 0xbf;
const GEN2_HM01: u16 = 0xf3;
const GEN2_TM_COUNT: usize = 50;

/// Gen 2 item id of TM/HM pocket slot `i` (TM01..TM50, HM01..HM07). Ids 0xc3 and 0xdc are unused gaps.
pub fn gen2_machine_item(i: usize) -> u16 {
    if i >= GEN2_TM_COUNT {
        return GEN2_HM01 + (i - GEN2_TM_COUNT) as u16;
    }
    GEN2_TM01 + i as u16 + (i >= 4) as u16 + (i >= 28) as u16
}

pub fn gen2_machine_slot(item: u16) -> Option<usize> {
    (0..GEN2_TM_COUNT + 7).find(|i| gen2_machine_item(*i) == item)
}

impl Pouch {
    pub fn size(&self) -> usize {
        match self.layout {
            Layout::CountedPairs => 2 + self.capacity * 2,
            Layout::CountedIds => 2 + self.capacity,
            Layout::TmQuantities => self.capacity,
        }
    }

    fn entry_size(&self) -> usize {
        match self.layout {
            Layout::CountedPairs => 2,
            _ => 1,
        }
    }

    fn entry_offset(&self, slot: usize) -> usize {
        self.offset + 1 + slot * self.entry_size()
    }

    pub fn count(&self, buf: &[u8]) -> usize {
        match self.layout {
            Layout::TmQuantities => buf[self.offset..][..self.capacity].iter().filter(|q| **q > 0).count(),
            _ => (buf[self.offset] as usize).min(self.capacity),
        }
    }

    pub fn items(&self, buf: &[u8]) -> Vec<Item> {
        match self.layout {
            Layout::TmQuantities => (0..self.capacity)
                .filter_map(|i| {
                    let count = buf[self.offset + i] as u16;
                    (count > 0).then(|| Item {
                        id: gen2_machine_item(i),
                        count,
                    })
                })
                .collect(),
            _ => (0..self.count(buf)).filter_map(|i| self.item(buf, i)).collect(),
        }
    }

    pub fn item(&self, buf: &[u8], slot: usize) -> Option<Item> {
        if slot >= self.capacity {
            return None;
        }
        match self.layout {
            Layout::CountedPairs => {
                let off = self.entry_offset(slot);
                Some(Item {
                    id: buf[off] as u16,
                    count: buf[off + 1] as u16,
                })
            }
            Layout::CountedIds => Some(Item {
                id: buf[self.entry_offset(slot)] as u16,
                count: 1,
            }),
            Layout::TmQuantities => Some(Item {
                id: gen2_machine_item(slot),
                count: buf[self.offset + slot] as u16,
            }),
        }
    }

    /// Writes `item` at `slot`. Writing past the current count grows the count. Quantities clamp to 99.
    pub fn set_item(&self, buf: &mut [u8], slot: usize, item: Item) -> bool {
        if slot >= self.capacity || item.id > 0xff {
            return false;
        }
        let count = item.count.min(MAX_QUANTITY) as u8;
        match self.layout {
            Layout::CountedPairs => {
                let off = self.entry_offset(slot);
                buf[off] = item.id as u8;
                buf[off + 1] = count;
            }
            Layout::CountedIds => {
                buf[self.entry_offset(slot)] = item.id as u8;
            }
            Layout::TmQuantities => {
                if gen2_machine_item(slot) != item.id && item.id != 0 {
                    return false;
                }
                buf[self.offset + slot] = count;
                return true;
            }
        }
        if slot >= buf[self.offset] as usize {
            buf[self.offset] = slot as u8 + 1;
            buf[self.entry_offset(slot + 1)] = TERMINATOR;
        }
        true
    }

    /// Recomputes the count from the first empty entry and terminates the list there.
    pub fn fix(&self, buf: &mut [u8]) {
        if self.layout == Layout::TmQuantities {
            return;
        }
        let count = (0..self.capacity)
            .position(|i| {
                let off = self.entry_offset(i);
                let id = buf[off];
                id == 0 || id == TERMINATOR || (self.layout == Layout::CountedPairs && buf[off + 1] == 0)
            })
            .unwrap_or(self.capacity);
        buf[self.offset] = count as u8;
        buf[self.entry_offset(count)] = TERMINATOR;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BAG: Pouch = Pouch {
        kind: PouchKind::Items,
        offset: 0,
        capacity: 4,
        layout: Layout::CountedPairs,
    };

    const POTION: u16 = 0x14;

    #[test]
    fn test_fix_item_lists() {
        let mut buf = vec![0u8; BAG.size()];
        buf[0] = 4;
        buf[1..5].copy_from_slice(&[POTION as u8, 3, POTION as u8, 1]);
        BAG.fix(&mut buf);
        assert_eq!(buf[0], 2);
        assert_eq!(buf[5], TERMINATOR);
        assert_eq!(BAG.items(&buf).len(), 2);
    }

    #[test]
    fn test_fix_full_pouch_writes_trailing_terminator() {
        let mut buf = vec![0u8; BAG.size()];
        for i in 0..4 {
            BAG.set_item(&mut buf, i, Item { id: POTION, count: 1 });
        }
        buf[BAG.size() - 1] = 0;
        BAG.fix(&mut buf);
        assert_eq!(buf[0], 4);
        assert_eq!(buf[BAG.size() - 1], TERMINATOR);
    }

    #[test]
    fn test_set_item_grows_count_and_clamps() {
        let mut buf = vec![0u8; BAG.size()];
        assert!(BAG.set_item(&mut buf, 0, Item { id: POTION, count: 150 }));
        assert_eq!(buf[0], 1);
        assert_eq!(BAG.item(&buf, 0), Some(Item { id: POTION, count: 99 }));
        assert_eq!(buf[3], TERMINATOR);
        assert!(BAG.set_item(&mut buf, 2, Item { id: POTION, count: 1 }));
        assert_eq!(buf[0], 3);
        assert!(!BAG.set_item(&mut buf, 4, Item { id: POTION, count: 1 }));
    }

    #[test]
    fn test_key_items() {
        let keys = Pouch {
            kind: PouchKind::KeyItems,
            offset: 0,
            capacity: 3,
            layout: Layout::CountedIds,
        };
        let mut buf = vec![0u8; keys.size()];
        keys.set_item(&mut buf, 0, Item { id: 0x7f, count: 5 });
        assert_eq!(keys.items(&buf), vec![Item { id: 0x7f, count: 1 }]);
        assert_eq!(buf[2], TERMINATOR);
    }

    #[test]
    fn test_machines() {
        assert_eq!(gen2_machine_item(0), 0xbf);
        assert_eq!(gen2_machine_item(4), 0xc4);
        assert_eq!(gen2_machine_item(49), 0xf2);
        assert_eq!(gen2_machine_item(50), 0xf3);
        assert_eq!(gen2_machine_slot(0xdd), Some(28));
        assert_eq!(gen2_machine_slot(0xc3), None);

        let tms = Pouch {
            kind: PouchKind::TmHm,
            offset: 0,
            capacity: 57,
            layout: Layout::TmQuantities,
        };
        let mut buf = vec![0u8; tms.size()];
        assert!(tms.set_item(&mut buf, 1, Item { id: 0xc0, count: 3 }));
        assert!(!tms.set_item(&mut buf, 1, Item { id: 0xc1, count: 3 }));
        assert_eq!(tms.items(&buf), vec![Item { id: 0xc0, count: 3 }]);
    }
}
