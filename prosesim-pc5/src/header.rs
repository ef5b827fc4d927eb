//! Sidelink PDCP header
//!
//! Fixed 5-byte header carried in front of every sidelink PDCP SDU:
//!
//! ```text
//!  byte 0: SDU type (3 bits) | PGK index (5 bits)
//!  bytes 1-2: PTK identity (big endian)
//!  bytes 3-4: sequence number (big endian)
//! ```

use bytes::{Buf, BufMut, BytesMut};

use crate::codec::Pc5CodecError;

/// SDU type: IP packet
pub const SDU_TYPE_IP: u8 = 0;
/// SDU type: ARP packet
pub const SDU_TYPE_ARP: u8 = 1;
/// SDU type: PC5 signalling message
pub const SDU_TYPE_PC5_SIGNALLING: u8 = 2;
/// SDU type: non-IP payload
pub const SDU_TYPE_NON_IP: u8 = 3;

/// Serialized header length in bytes
pub const HEADER_LENGTH: usize = 5;

/// The sidelink PDCP header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SlPdcpHeader {
    sdu_type: u8,
    pgk_index: u8,
    security_identity: u16,
    sequence_number: u16,
}

impl SlPdcpHeader {
    /// Creates a header with all fields zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// SDU type (3 bits)
    pub fn sdu_type(&self) -> u8 {
        self.sdu_type
    }

    /// Sets the SDU type, keeping the low 3 bits.
    pub fn set_sdu_type(&mut self, sdu_type: u8) {
        self.sdu_type = sdu_type & 0x07;
    }

    /// PGK index (5 bits)
    pub fn pgk_index(&self) -> u8 {
        self.pgk_index
    }

    /// Sets the PGK index, keeping the low 5 bits.
    pub fn set_pgk_index(&mut self, pgk_index: u8) {
        self.pgk_index = pgk_index & 0x1F;
    }

    /// PTK security identity
    pub fn security_identity(&self) -> u16 {
        self.security_identity
    }

    /// Sets the PTK security identity.
    pub fn set_security_identity(&mut self, security_identity: u16) {
        self.security_identity = security_identity;
    }

    /// PDCP sequence number
    pub fn sequence_number(&self) -> u16 {
        self.sequence_number
    }

    /// Sets the PDCP sequence number.
    pub fn set_sequence_number(&mut self, sequence_number: u16) {
        self.sequence_number = sequence_number;
    }

    /// Serializes the header into `buf`.
    pub fn encode_into(&self, buf: &mut BytesMut) {
        buf.put_u8((self.sdu_type << 5) | self.pgk_index);
        buf.put_u16(self.security_identity);
        buf.put_u16(self.sequence_number);
    }

    /// Parses a header from the front of `data`.
    pub fn decode(data: &[u8]) -> Result<Self, Pc5CodecError> {
        if data.len() < HEADER_LENGTH {
            return Err(Pc5CodecError::BufferTooShort {
                needed: HEADER_LENGTH,
                available: data.len(),
            });
        }
        let mut buf = data;
        let first = buf.get_u8();
        Ok(Self {
            sdu_type: (first & 0xE0) >> 5,
            pgk_index: first & 0x1F,
            security_identity: buf.get_u16(),
            sequence_number: buf.get_u16(),
        })
    }
}
