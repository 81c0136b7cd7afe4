use std::net::{Ipv4Addr, Ipv6Addr};

use bytes::{Buf, Bytes};

use crate::error::DecodeError;
use crate::name::{decode_name, DomainName};

// Record types and classes with interpreted RDATA.
// https://www.iana.org/assignments/dns-parameters/dns-parameters.xhtml
pub const TYPE_A: u16 = 1;
pub const TYPE_CNAME: u16 = 5;
pub const TYPE_AAAA: u16 = 28;
pub const CLASS_IN: u16 = 1;

/// DNS Question Section
/// Format: QNAME + QTYPE (2 bytes) + QCLASS (2 bytes)
#[derive(Debug, Clone)]
pub struct Question {
    pub name: DomainName,
    pub qtype: u16,
    pub qclass: u16,
}

/// Interpreted resource data. Only class IN records of type A, AAAA and
/// CNAME get a structured form; every other (type, class) combination is
/// passed through as opaque bytes rather than rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RData {
    A(Ipv4Addr),
    Aaaa(Ipv6Addr),
    Cname(DomainName),
    Other(Bytes),
}

/// DNS Answer/Resource Record Section
/// Format: NAME + TYPE (2 bytes) + CLASS (2 bytes) + TTL (4 bytes) +
/// RDLENGTH (2 bytes) + RDATA
#[derive(Debug, Clone)]
pub struct ResourceRecord {
    pub name: DomainName,
    pub rtype: u16,
    pub rclass: u16,
    pub ttl: u32,
    pub rdlength: u16,
    pub rdata: RData,
}

/// Decode one question starting at `offset`.
/// Returns the question and the number of bytes it occupies.
pub fn decode_question(msg: &[u8], offset: usize) -> Result<(Question, usize), DecodeError> {
    let (name, name_len) = decode_name(msg, offset)?;

    let mut fields = field_slice(msg, offset + name_len, 4)?;
    let qtype = fields.get_u16();
    let qclass = fields.get_u16();

    Ok((
        Question {
            name,
            qtype,
            qclass,
        },
        name_len + 4,
    ))
}

/// Decode one resource record starting at `offset`.
///
/// The envelope (name, fixed fields, RDATA span) is fully bounds-checked
/// before any interpretation. If the envelope is sound but the RDATA cannot
/// be interpreted for its (type, class), the error is `InvalidRData` and
/// carries the record's exact wire length so the caller can skip it.
pub fn decode_resource_record(
    msg: &[u8],
    offset: usize,
) -> Result<(ResourceRecord, usize), DecodeError> {
    let (name, name_len) = decode_name(msg, offset)?;

    let mut fields = field_slice(msg, offset + name_len, 10)?;
    let rtype = fields.get_u16();
    let rclass = fields.get_u16();
    let ttl = fields.get_u32();
    let rdlength = fields.get_u16();

    let rdata_offset = offset + name_len + 10;
    let rdata_bytes = field_slice(msg, rdata_offset, usize::from(rdlength))?;
    let consumed = name_len + 10 + usize::from(rdlength);

    let rdata = interpret_rdata(msg, rdata_offset, rdata_bytes, rtype, rclass).map_err(
        |source| DecodeError::InvalidRData {
            consumed,
            source: Box::new(source),
        },
    )?;

    Ok((
        ResourceRecord {
            name,
            rtype,
            rclass,
            ttl,
            rdlength,
            rdata,
        },
        consumed,
    ))
}

fn field_slice(msg: &[u8], offset: usize, needed: usize) -> Result<&[u8], DecodeError> {
    msg.get(offset..offset + needed)
        .ok_or(DecodeError::BufferTooShort { offset, needed })
}

fn interpret_rdata(
    msg: &[u8],
    rdata_offset: usize,
    rdata: &[u8],
    rtype: u16,
    rclass: u16,
) -> Result<RData, DecodeError> {
    let rdata = match (rclass, rtype) {
        (CLASS_IN, TYPE_A) if rdata.len() == 4 => {
            RData::A(Ipv4Addr::new(rdata[0], rdata[1], rdata[2], rdata[3]))
        }
        (CLASS_IN, TYPE_AAAA) if rdata.len() == 16 => {
            let mut octets = [0u8; 16];
            octets.copy_from_slice(rdata);
            RData::Aaaa(Ipv6Addr::from(octets))
        }
        (CLASS_IN, TYPE_CNAME) => {
            // CNAME targets may be compressed, so the embedded name is
            // decoded against the whole message, starting at the RDATA span.
            let (target, _) = decode_name(msg, rdata_offset)?;
            RData::Cname(target)
        }
        _ => RData::Other(Bytes::copy_from_slice(rdata)),
    };
    Ok(rdata)
}
