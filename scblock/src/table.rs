use byteorder::{ByteOrder, LittleEndian};
use sha2::Digest;

use crate::Error;

const CRC16: crc::Crc<u16> = crc::Crc::<u16>::new(&crc::CRC_16_GENIBUS);

/// Produces and checks the asymmetric signature over a table's digest. Key material lives with the implementor.
pub trait Signer {
    fn signature_len(&self) -> usize;
    fn sign(&self, digest: &[u8; 32]) -> Vec<u8>;
    fn verify(&self, digest: &[u8; 32], signature: &[u8]) -> bool;
}

/// A table of fixed-size entries followed by a signature.
///
/// Each entry ends with a little-endian CRC-16 of the bytes before it. The signature covers the SHA-256 digest of
/// every entry, checksums included.
#[derive(Clone, Copy, Debug)]
pub struct BlockTable {
    entry_size: usize,
}

impl BlockTable {
    pub fn new(entry_size: usize) -> Self {
        Self { entry_size }
    }

    /// Splits `buf` into the entry region and the signature, checking the layout.
    fn split<'a>(&self, buf: &'a [u8], signer: &dyn Signer) -> Result<(&'a [u8], &'a [u8]), Error> {
        let sig_len = signer.signature_len();
        if self.entry_size <= 2 || buf.len() < sig_len {
            return Err(Error::InvalidTable);
        }
        let (entries, signature) = buf.split_at(buf.len() - sig_len);
        if entries.len() % self.entry_size != 0 {
            return Err(Error::InvalidTable);
        }
        Ok((entries, signature))
    }

    fn entry_crc(entry: &[u8]) -> u16 {
        CRC16.checksum(&entry[..entry.len() - 2])
    }

    pub fn digest(&self, buf: &[u8], signer: &dyn Signer) -> Result<[u8; 32], Error> {
        let (entries, _) = self.split(buf, signer)?;
        Ok(sha2::Sha256::digest(entries).into())
    }

    /// Recomputes every entry checksum, then re-signs the table.
    pub fn refresh(&self, buf: &mut [u8], signer: &dyn Signer) -> Result<(), Error> {
        let entries_len = self.split(buf, signer)?.0.len();
        for entry in buf[..entries_len].chunks_exact_mut(self.entry_size) {
            let crc = Self::entry_crc(entry);
            let at = entry.len() - 2;
            LittleEndian::write_u16(&mut entry[at..], crc);
        }

        let digest = self.digest(buf, signer)?;
        let signature = signer.sign(&digest);
        if signature.len() != signer.signature_len() {
            return Err(Error::InvalidTable);
        }
        buf[entries_len..].copy_from_slice(&signature);
        Ok(())
    }

    /// Indexes of entries whose stored checksum does not match their contents.
    pub fn bad_entries(&self, buf: &[u8], signer: &dyn Signer) -> Result<Vec<usize>, Error> {
        let (entries, _) = self.split(buf, signer)?;
        Ok(entries
            .chunks_exact(self.entry_size)
            .enumerate()
            .filter(|(_, entry)| LittleEndian::read_u16(&entry[entry.len() - 2..]) != Self::entry_crc(entry))
            .map(|(i, _)| i)
            .collect())
    }

    pub fn verify(&self, buf: &[u8], signer: &dyn Signer) -> Result<bool, Error> {
        let bad = self.bad_entries(buf, signer)?;
        if !bad.is_empty() {
            log::debug!("block table entries with bad checksums: {:?}", bad);
            return Ok(false);
        }
        let (_, signature) = self.split(buf, signer)?;
        let ok = signer.verify(&self.digest(buf, signer)?, signature);
        if !ok {
            log::debug!("block table signature mismatch");
        }
        Ok(ok)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Signs by masking the first half of the digest with a fixed key.
    struct MaskSigner(u8);

    impl Signer for MaskSigner {
        fn signature_len(&self) -> usize {
            16
        }

        fn sign(&self, digest: &[u8; 32]) -> Vec<u8> {
            digest[..16].iter().map(|b| b ^ self.0).collect()
        }

        fn verify(&self, digest: &[u8; 32], signature: &[u8]) -> bool {
            self.sign(digest) == signature
        }
    }

    #[test]
    fn test_crc16_check_value() {
        assert_eq!(CRC16.checksum(b"123456789"), 0xd64e);
    }

    #[test]
    fn test_refresh_then_verify() {
        let table = BlockTable::new(8);
        let signer = MaskSigner(0x5a);
        let mut buf = (0..3 * 8 + 16).map(|i| i as u8).collect::<Vec<_>>();

        assert!(!table.verify(&buf, &signer).unwrap());
        table.refresh(&mut buf, &signer).unwrap();
        assert!(table.verify(&buf, &signer).unwrap());
        assert_eq!(LittleEndian::read_u16(&buf[6..8]), CRC16.checksum(&[0, 1, 2, 3, 4, 5]));

        buf[9] ^= 1;
        assert_eq!(table.bad_entries(&buf, &signer).unwrap(), vec![1]);
        assert!(!table.verify(&buf, &signer).unwrap());

        table.refresh(&mut buf, &signer).unwrap();
        assert!(table.verify(&buf, &signer).unwrap());
        assert!(!table.verify(&buf, &MaskSigner(0x11)).unwrap());
    }

    #[test]
    fn test_layout_must_fit() {
        let signer = MaskSigner(0);
        let mut buf = vec![0u8; 8 * 2 + 16 + 1];
        assert_eq!(BlockTable::new(8).refresh(&mut buf, &signer), Err(Error::InvalidTable));
        assert_eq!(BlockTable::new(2).verify(&buf[..18], &signer), Err(Error::InvalidTable));
        assert_eq!(BlockTable::new(8).verify(&buf[..4], &signer), Err(Error::InvalidTable));
    }
}
