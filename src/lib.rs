//! Passive, read-only decoder for DNS messages observed on a UDP/IP path.
//!
//! A capture collaborator (a network hook, a pcap loop, a test harness)
//! hands each UDP payload plus its IP/UDP metadata to a [`PacketInspector`],
//! which filters out anything that is not a plausible DNS exchange and runs
//! the wire-format decoder over the rest: label sequences, compression
//! pointers, and the counted Question and Answer sections. Decoded messages
//! and typed decode errors are pushed to a [`DnsObserver`]; the packet
//! itself is never mutated, answered or dropped.
//!
//! The decoder is hardened against hostile input: every offset is bounds
//! checked before use, compression pointers must target strictly earlier
//! offsets, and pointer chains are depth capped, so crafted pointer cycles
//! fail with a [`DecodeError`] instead of looping.
//!
//! Scope limitation: only the Question and Answer sections are decoded.
//! Authority and Additional counts are reported through the header but
//! their records are left as raw wire bytes.

mod error;
mod header;
mod inspect;
mod message;
mod name;
mod record;

pub use error::DecodeError;
pub use header::{Flags, Header, HEADER_LEN};
pub use inspect::{
    Direction, DnsObserver, LogObserver, PacketInspector, PacketMeta, Transport, DNS_PORT,
};
pub use message::{decode_message, DecodedMessage};
pub use name::{decode_name, decode_name_bounded, DomainName, MAX_NAME_LEN, MAX_POINTER_DEPTH};
pub use record::{
    decode_question, decode_resource_record, Question, RData, ResourceRecord, CLASS_IN, TYPE_A,
    TYPE_AAAA, TYPE_CNAME,
};
