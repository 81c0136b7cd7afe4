use bytes::Buf;

use crate::error::DecodeError;

/// Wire size of the fixed DNS header.
pub const HEADER_LEN: usize = 12;

/// The header's 16-bit flag word, unpacked into its individual fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Flags {
    pub qr: bool,   // Query (false) or Response (true)
    pub opcode: u8, // Operation code (0 = standard query)
    pub aa: bool,   // Authoritative Answer
    pub tc: bool,   // Truncation
    pub rd: bool,   // Recursion Desired
    pub ra: bool,   // Recursion Available
    pub z: u8,      // Reserved
    pub rcode: u8,  // Response code (0 = no error)
}

impl Flags {
    pub fn from_u16(flags: u16) -> Self {
        Flags {
            qr: (flags & (1 << 15)) != 0,
            opcode: ((flags >> 11) & 0xF) as u8,
            aa: (flags & (1 << 10)) != 0,
            tc: (flags & (1 << 9)) != 0,
            rd: (flags & (1 << 8)) != 0,
            ra: (flags & (1 << 7)) != 0,
            z: ((flags >> 4) & 0x7) as u8,
            rcode: (flags & 0xF) as u8,
        }
    }
}

/// The fixed 12-byte DNS header. All counts are converted from wire
/// big-endian to host order on decode.
#[derive(Debug, Clone, Copy)]
pub struct Header {
    pub id: u16,
    pub flags: Flags,
    pub qdcount: u16,
    pub ancount: u16,
    pub nscount: u16,
    pub arcount: u16,
}

impl Header {
    pub fn decode(msg: &[u8]) -> Result<Self, DecodeError> {
        if msg.len() < HEADER_LEN {
            return Err(DecodeError::BufferTooShort {
                offset: 0,
                needed: HEADER_LEN,
            });
        }

        let mut fields = &msg[..HEADER_LEN];
        Ok(Header {
            id: fields.get_u16(),
            flags: Flags::from_u16(fields.get_u16()),
            qdcount: fields.get_u16(),
            ancount: fields.get_u16(),
            nscount: fields.get_u16(),
            arcount: fields.get_u16(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_counts_and_id() {
        let wire = [0x12, 0x34, 0x01, 0x00, 0, 1, 0, 2, 0, 3, 0, 4];
        let header = Header::decode(&wire).unwrap();
        assert_eq!(header.id, 0x1234);
        assert_eq!(header.qdcount, 1);
        assert_eq!(header.ancount, 2);
        assert_eq!(header.nscount, 3);
        assert_eq!(header.arcount, 4);
    }

    #[test]
    fn unpacks_flag_fields() {
        // QR=1, Opcode=2, AA=1, TC=0, RD=1, RA=1, Z=0, RCODE=3
        let flags = Flags::from_u16(0b1_0010_1_0_1_1_000_0011);
        assert!(flags.qr);
        assert_eq!(flags.opcode, 2);
        assert!(flags.aa);
        assert!(!flags.tc);
        assert!(flags.rd);
        assert!(flags.ra);
        assert_eq!(flags.z, 0);
        assert_eq!(flags.rcode, 3);
    }

    #[test]
    fn standard_query_flags_are_zeroed() {
        let flags = Flags::from_u16(0x0100);
        assert!(!flags.qr);
        assert_eq!(flags.opcode, 0);
        assert!(flags.rd);
        assert_eq!(flags.rcode, 0);
    }

    #[test]
    fn short_buffer_is_rejected() {
        let err = Header::decode(&[0u8; 11]).unwrap_err();
        assert_eq!(
            err,
            DecodeError::BufferTooShort {
                offset: 0,
                needed: HEADER_LEN
            }
        );
    }
}
