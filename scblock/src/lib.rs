//! Encrypted key/value block storage used by the Switch-era save files.
//!
//! A block list is a run of blocks laid end to end. Every block starts with a plaintext 32-bit key; everything after
//! it (type code, lengths, payload) is masked with an [`XorShift32`] stream seeded from that key.

mod table;
mod xorshift;

use byteorder::{ByteOrder, LittleEndian};
use num_traits::FromPrimitive;

pub use table::{BlockTable, Signer};
pub use xorshift::XorShift32;

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum Error {
    #[error("unknown block type {value:#04x} at offset {offset:#x}")]
    UnknownBlockType { offset: usize, value: u8 },

    #[error("unexpected eof in block at offset {offset:#x}")]
    UnexpectedEof { offset: usize },

    #[error("block table layout does not fit the buffer")]
    InvalidTable,

    #[error("block {key:#010x} holds {expected} bytes, got {actual}")]
    PayloadSize { key: u32, expected: usize, actual: usize },
}

#[repr(u8)]
#[derive(num_derive::FromPrimitive, Clone, Copy, Debug, PartialEq, Eq)]
pub enum BlockType {
    None = 0,
    /// A boolean block holding false. It has no payload.
    Bool1 = 1,
    /// A boolean block holding true. It has no payload.
    Bool2 = 2,
    /// Element type of boolean arrays.
    Bool3 = 3,
    Object = 4,
    Array = 5,
    U8 = 8,
    U16 = 9,
    U32 = 10,
    U64 = 11,
    I8 = 12,
    I16 = 13,
    I32 = 14,
    I64 = 15,
    F32 = 16,
    F64 = 17,
}

impl BlockType {
    /// The size of one value of this type, or `None` for types that cannot be stored as a scalar or array element.
    pub fn element_size(self) -> Option<usize> {
        Some(match self {
            BlockType::Bool1 | BlockType::Bool2 | BlockType::Bool3 => 1,
            BlockType::U8 | BlockType::I8 => 1,
            BlockType::U16 | BlockType::I16 => 2,
            BlockType::U32 | BlockType::I32 | BlockType::F32 => 4,
            BlockType::U64 | BlockType::I64 | BlockType::F64 => 8,
            BlockType::None | BlockType::Object | BlockType::Array => return None,
        })
    }

    /// Size of the block header for this type, key included.
    pub fn header_size(self) -> usize {
        match self {
            BlockType::Object => 9,
            BlockType::Array => 10,
            _ => 5,
        }
    }

    fn is_bool(self) -> bool {
        matches!(self, BlockType::Bool1 | BlockType::Bool2)
    }
}

/// A decoded block.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Block {
    pub key: u32,
    pub ty: BlockType,
    /// Element type, for arrays only.
    pub sub_type: Option<BlockType>,
    pub data: Vec<u8>,
}

impl Block {
    pub fn new_bool(key: u32, value: bool) -> Self {
        Self {
            key,
            ty: if value { BlockType::Bool2 } else { BlockType::Bool1 },
            sub_type: None,
            data: vec![],
        }
    }

    pub fn new_scalar(key: u32, ty: BlockType, data: Vec<u8>) -> Self {
        Self {
            key,
            ty,
            sub_type: None,
            data,
        }
    }

    pub fn new_object(key: u32, data: Vec<u8>) -> Self {
        Self {
            key,
            ty: BlockType::Object,
            sub_type: None,
            data,
        }
    }

    pub fn new_array(key: u32, sub_type: BlockType, data: Vec<u8>) -> Self {
        Self {
            key,
            ty: BlockType::Array,
            sub_type: Some(sub_type),
            data,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self.ty {
            BlockType::Bool1 => Some(false),
            BlockType::Bool2 => Some(true),
            _ => None,
        }
    }

    pub fn as_u32(&self) -> Option<u32> {
        if self.ty != BlockType::U32 {
            return None;
        }
        self.data.get(..4).map(LittleEndian::read_u32)
    }

    /// Number of elements of an array block.
    pub fn len(&self) -> usize {
        match self.sub_type.and_then(|t| t.element_size()) {
            Some(size) => self.data.len() / size,
            None => self.data.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// The plaintext encoding of the block.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(self.ty.header_size() + self.data.len());
        buf.extend(self.key.to_le_bytes());
        buf.push(self.ty as u8);
        match self.ty {
            BlockType::Object => {
                buf.extend((self.data.len() as u32).to_le_bytes());
            }
            BlockType::Array => {
                buf.extend((self.len() as u32).to_le_bytes());
                buf.push(self.sub_type.unwrap_or(BlockType::U8) as u8);
            }
            _ => {}
        }
        buf.extend(&self.data);
        buf
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mode {
    Read,
    Decrypt,
    Encrypt,
}

/// Where one block sits in the buffer.
struct Span {
    key: u32,
    ty: BlockType,
    sub_type: Option<BlockType>,
    payload: std::ops::Range<usize>,
}

struct Walker<'a> {
    data: &'a mut [u8],
    offset: usize,
    mode: Mode,
    xk: XorShift32,
}

impl<'a> Walker<'a> {
    fn byte(&mut self) -> Result<u8, Error> {
        let offset = self.offset;
        let raw = *self.data.get(offset).ok_or(Error::UnexpectedEof { offset })?;
        self.offset += 1;
        if self.mode == Mode::Read {
            return Ok(raw);
        }
        let masked = raw ^ self.xk.next_u8();
        self.data[offset] = masked;
        Ok(if self.mode == Mode::Decrypt { masked } else { raw })
    }

    fn u32(&mut self) -> Result<u32, Error> {
        Ok(u32::from_le_bytes([self.byte()?, self.byte()?, self.byte()?, self.byte()?]))
    }

    fn block_type(&mut self) -> Result<BlockType, Error> {
        let offset = self.offset;
        let value = self.byte()?;
        BlockType::from_u8(value)
            .filter(|t| *t != BlockType::None)
            .ok_or(Error::UnknownBlockType { offset, value })
    }

    fn skip(&mut self, len: usize) -> Result<(), Error> {
        let end = self.offset.checked_add(len).filter(|end| *end <= self.data.len());
        if end.is_none() {
            return Err(Error::UnexpectedEof { offset: self.data.len() });
        }
        for _ in 0..len {
            self.byte()?;
        }
        Ok(())
    }
}

/// Walks the block starting at `start`, transforming it in place according to `mode`.
fn walk_block(data: &mut [u8], start: usize, mode: Mode) -> Result<(Span, usize), Error> {
    if start + 4 > data.len() {
        return Err(Error::UnexpectedEof { offset: start });
    }
    let key = LittleEndian::read_u32(&data[start..]);
    let mut w = Walker {
        data,
        offset: start + 4,
        mode,
        xk: XorShift32::new(key),
    };

    let ty = w.block_type()?;
    let (sub_type, len) = match ty {
        BlockType::Bool1 | BlockType::Bool2 | BlockType::Bool3 => (None, 0),
        BlockType::Object => (None, w.u32()? as usize),
        BlockType::Array => {
            let count = w.u32()? as usize;
            let offset = w.offset;
            let sub_type = w.block_type()?;
            let size = sub_type.element_size().ok_or(Error::UnknownBlockType {
                offset,
                value: sub_type as u8,
            })?;
            let len = count.checked_mul(size).ok_or(Error::UnexpectedEof { offset })?;
            (Some(sub_type), len)
        }
        _ => (None, ty.element_size().unwrap_or(0)),
    };

    let payload_start = w.offset;
    w.skip(len)?;
    let end = w.offset;
    Ok((
        Span {
            key,
            ty,
            sub_type,
            payload: payload_start..end,
        },
        end,
    ))
}

fn walk(data: &mut [u8], mode: Mode) -> Result<Vec<Span>, Error> {
    let mut spans = vec![];
    let mut offset = 0;
    while offset < data.len() {
        let (span, end) = walk_block(data, offset, mode)?;
        spans.push(span);
        offset = end;
    }
    Ok(spans)
}

/// A run of blocks, kept in whichever state it was last toggled to.
#[derive(Clone, Debug)]
pub struct BlockList {
    data: Vec<u8>,
    encrypted: bool,
}

impl BlockList {
    pub fn from_encrypted(data: Vec<u8>) -> Self {
        Self { data, encrypted: true }
    }

    pub fn from_decrypted(data: Vec<u8>) -> Self {
        Self { data, encrypted: false }
    }

    pub fn from_blocks<'a>(blocks: impl IntoIterator<Item = &'a Block>) -> Self {
        Self::from_decrypted(blocks.into_iter().flat_map(|b| b.to_bytes()).collect())
    }

    pub fn is_encrypted(&self) -> bool {
        self.encrypted
    }

    pub fn as_raw(&self) -> &[u8] {
        &self.data
    }

    pub fn into_raw(self) -> Vec<u8> {
        self.data
    }

    /// Toggles the buffer to `encrypted`. A failed walk leaves the buffer untouched.
    fn toggle(&mut self, encrypted: bool) -> Result<(), Error> {
        if self.encrypted == encrypted {
            return Ok(());
        }
        let mut data = self.data.clone();
        walk(&mut data, if encrypted { Mode::Encrypt } else { Mode::Decrypt })?;
        self.data = data;
        self.encrypted = encrypted;
        Ok(())
    }

    /// Decrypts the list. Does nothing if it is already decrypted.
    pub fn decrypt(&mut self) -> Result<(), Error> {
        self.toggle(false)
    }

    /// Encrypts the list. Does nothing if it is already encrypted.
    pub fn encrypt(&mut self) -> Result<(), Error> {
        self.toggle(true)
    }

    fn plain(&self) -> Result<(std::borrow::Cow<'_, [u8]>, Vec<Span>), Error> {
        if !self.encrypted {
            let mut data = self.data.clone();
            let spans = walk(&mut data, Mode::Read)?;
            return Ok((std::borrow::Cow::Borrowed(&self.data), spans));
        }
        let mut data = self.data.clone();
        let spans = walk(&mut data, Mode::Decrypt)?;
        Ok((std::borrow::Cow::Owned(data), spans))
    }

    pub fn blocks(&self) -> Result<Vec<Block>, Error> {
        let (data, spans) = self.plain()?;
        Ok(spans
            .into_iter()
            .map(|span| Block {
                key: span.key,
                ty: span.ty,
                sub_type: span.sub_type,
                data: data[span.payload].to_vec(),
            })
            .collect())
    }

    pub fn find(&self, key: u32) -> Result<Option<Block>, Error> {
        Ok(self.blocks()?.into_iter().find(|b| b.key == key))
    }

    /// Runs `f` over the decrypted buffer and its block spans, restoring the encryption state afterwards.
    fn edit<T>(&mut self, f: impl FnOnce(&mut [u8], &[Span]) -> Result<T, Error>) -> Result<T, Error> {
        let was_encrypted = self.encrypted;
        self.decrypt()?;
        let mut data = self.data.clone();
        let spans = walk(&mut data, Mode::Read)?;
        let r = f(&mut self.data, &spans);
        if was_encrypted {
            self.encrypt()?;
        }
        r
    }

    /// Overwrites the payload of the block with `key`. Returns false if there is no such block.
    ///
    /// Blocks are rewritten in place, so the new payload must be exactly as long as the old one.
    pub fn write(&mut self, key: u32, payload: &[u8]) -> Result<bool, Error> {
        self.edit(|data, spans| {
            let Some(span) = spans.iter().find(|s| s.key == key) else {
                return Ok(false);
            };
            if span.payload.len() != payload.len() {
                return Err(Error::PayloadSize {
                    key,
                    expected: span.payload.len(),
                    actual: payload.len(),
                });
            }
            data[span.payload.clone()].copy_from_slice(payload);
            Ok(true)
        })
    }

    /// Sets a boolean block, which stores its value in the type code. Returns false if there is no boolean block
    /// with `key`.
    pub fn set_bool(&mut self, key: u32, value: bool) -> Result<bool, Error> {
        self.edit(|data, spans| {
            let Some(span) = spans.iter().find(|s| s.key == key && s.ty.is_bool()) else {
                return Ok(false);
            };
            let ty = if value { BlockType::Bool2 } else { BlockType::Bool1 };
            data[span.payload.start - 1] = ty as u8;
            Ok(true)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<Block> {
        vec![
            Block::new_scalar(0x12345678, BlockType::U32, 0x01020304u32.to_le_bytes().to_vec()),
            Block::new_bool(0x0badf00d, true),
            Block::new_object(0xcafebabe, vec![0xaa; 0x20]),
            Block::new_array(0xdeadbeef, BlockType::U16, vec![1, 0, 2, 0, 3, 0]),
        ]
    }

    #[test]
    fn test_header_sizes() {
        let blocks = sample();
        assert_eq!(blocks[0].to_bytes().len(), 5 + 4);
        assert_eq!(blocks[1].to_bytes().len(), 5);
        assert_eq!(blocks[2].to_bytes().len(), 9 + 0x20);
        assert_eq!(blocks[3].to_bytes().len(), 10 + 6);
        assert_eq!(blocks[3].len(), 3);
    }

    #[test]
    fn test_encrypt_scalar() {
        let mut list = BlockList::from_blocks(&sample()[..1]);
        list.encrypt().unwrap();
        assert_eq!(
            list.as_raw(),
            &[0x78, 0x56, 0x34, 0x12, 0x0a ^ 0xaf, 0x04 ^ 0x71, 0x03 ^ 0xc9, 0x02 ^ 0x07, 0x01 ^ 0xca]
        );
    }

    #[test]
    fn test_toggles_are_idempotent() {
        let plain = BlockList::from_blocks(&sample());
        let mut list = plain.clone();

        list.decrypt().unwrap();
        assert_eq!(list.as_raw(), plain.as_raw());

        list.encrypt().unwrap();
        let encrypted = list.as_raw().to_vec();
        assert_ne!(encrypted, plain.as_raw());
        list.encrypt().unwrap();
        assert_eq!(list.as_raw(), &encrypted[..]);

        list.decrypt().unwrap();
        assert!(!list.is_encrypted());
        assert_eq!(list.as_raw(), plain.as_raw());
    }

    #[test]
    fn test_blocks_from_either_state() {
        let mut list = BlockList::from_blocks(&sample());
        assert_eq!(list.blocks().unwrap(), sample());
        list.encrypt().unwrap();
        assert_eq!(list.blocks().unwrap(), sample());

        let found = list.find(0x12345678).unwrap().unwrap();
        assert_eq!(found.as_u32(), Some(0x01020304));
        assert_eq!(list.find(0x0badf00d).unwrap().unwrap().as_bool(), Some(true));
        assert!(list.find(0x11111111).unwrap().is_none());
    }

    #[test]
    fn test_write_in_place() {
        let mut list = BlockList::from_blocks(&sample());
        list.encrypt().unwrap();

        assert!(list.write(0xdeadbeef, &[9, 0, 8, 0, 7, 0]).unwrap());
        assert!(list.is_encrypted());
        assert_eq!(list.find(0xdeadbeef).unwrap().unwrap().data, vec![9, 0, 8, 0, 7, 0]);

        assert_eq!(
            list.write(0xdeadbeef, &[1, 2]),
            Err(Error::PayloadSize {
                key: 0xdeadbeef,
                expected: 6,
                actual: 2
            })
        );
        assert!(!list.write(0x11111111, &[]).unwrap());

        assert!(list.set_bool(0x0badf00d, false).unwrap());
        assert_eq!(list.find(0x0badf00d).unwrap().unwrap().as_bool(), Some(false));
        assert!(!list.set_bool(0x12345678, false).unwrap());
    }

    #[test]
    fn test_unknown_type() {
        let mut list = BlockList::from_decrypted(vec![1, 0, 0, 0, 0x07]);
        assert_eq!(
            list.blocks(),
            Err(Error::UnknownBlockType { offset: 4, value: 0x07 })
        );
        assert!(list.encrypt().is_err());
        assert!(!list.is_encrypted());
        assert_eq!(list.as_raw(), &[1, 0, 0, 0, 0x07]);
    }

    #[test]
    fn test_truncated() {
        let mut bytes = BlockList::from_blocks(&sample()).into_raw();
        bytes.truncate(bytes.len() - 1);
        let list = BlockList::from_decrypted(bytes);
        assert!(matches!(list.blocks(), Err(Error::UnexpectedEof { .. })));

        let list = BlockList::from_decrypted(vec![1, 2]);
        assert_eq!(list.blocks(), Err(Error::UnexpectedEof { offset: 0 }));
    }
}
