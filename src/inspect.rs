use tracing::{debug, info, warn};

use crate::error::DecodeError;
use crate::header::Header;
use crate::message::{decode_message, DecodedMessage};
use crate::record::RData;

/// Well-known DNS server port.
pub const DNS_PORT: u16 = 53;

/// Transport protocol of the captured packet, as reported by the IP header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transport {
    Udp,
    Tcp,
    Other(u8),
}

/// Which way the packet was travelling relative to the host. Supplied by
/// the capture layer, never inferred.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Inbound,
    Outbound,
}

/// IP/UDP metadata for one captured packet, supplied alongside the payload
/// by an external capture collaborator.
#[derive(Debug, Clone, Copy)]
pub struct PacketMeta {
    pub transport: Transport,
    pub src_port: u16,
    pub dst_port: u16,
    pub direction: Direction,
}

impl PacketMeta {
    /// The port the DNS server side of the conversation owns: the
    /// destination for outbound traffic, the source for inbound.
    pub fn server_port(&self) -> u16 {
        match self.direction {
            Direction::Outbound => self.dst_port,
            Direction::Inbound => self.src_port,
        }
    }
}

/// Sink for decode outcomes. Inspection is observation-only: the packet is
/// never altered, dropped or answered, observers just get to look.
pub trait DnsObserver {
    fn on_message(&mut self, meta: &PacketMeta, message: &DecodedMessage);
    fn on_decode_error(&mut self, meta: &PacketMeta, error: &DecodeError);
}

/// Decides which captured packets are worth decoding and feeds the eligible
/// ones to an observer.
///
/// Invoked once per packet, synchronously, on whatever thread the capture
/// layer uses; it holds no shared state and never blocks.
pub struct PacketInspector<O> {
    port: u16,
    observer: O,
}

impl<O: DnsObserver> PacketInspector<O> {
    /// Inspector watching the standard DNS port.
    pub fn new(observer: O) -> Self {
        Self::with_port(DNS_PORT, observer)
    }

    /// Inspector watching a non-standard port.
    pub fn with_port(port: u16, observer: O) -> Self {
        PacketInspector { port, observer }
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    /// Whether a packet qualifies for decoding: UDP, the watched port on
    /// the server side, a standard-query opcode, no error response code,
    /// and at least one question.
    ///
    /// This is policy, not parsing. Ineligible packets are ignored, never
    /// reported as errors.
    pub fn is_eligible(&self, meta: &PacketMeta, payload: &[u8]) -> bool {
        if meta.transport != Transport::Udp {
            return false;
        }
        if meta.server_port() != self.port {
            return false;
        }
        let Ok(header) = Header::decode(payload) else {
            return false;
        };
        header.flags.opcode == 0 && header.flags.rcode == 0 && header.qdcount > 0
    }

    /// Inspect one captured packet: filter, decode, report.
    pub fn inspect(&mut self, meta: &PacketMeta, payload: &[u8]) {
        if !self.is_eligible(meta, payload) {
            debug!(
                direction = ?meta.direction,
                src = meta.src_port,
                dst = meta.dst_port,
                "packet not eligible for dns decoding"
            );
            return;
        }

        match decode_message(payload) {
            Ok(message) => self.observer.on_message(meta, &message),
            Err(error) => self.observer.on_decode_error(meta, &error),
        }
    }
}

/// Observer that dumps every decoded field through `tracing`, one event per
/// question and answer.
#[derive(Debug, Default)]
pub struct LogObserver;

impl DnsObserver for LogObserver {
    fn on_message(&mut self, meta: &PacketMeta, message: &DecodedMessage) {
        info!(
            direction = ?meta.direction,
            kind = if message.header.flags.qr { "response" } else { "query" },
            id = message.header.id,
            questions = message.header.qdcount,
            answers = message.header.ancount,
            "dns message"
        );

        for question in &message.questions {
            info!(
                qname = %question.name,
                qtype = question.qtype,
                qclass = question.qclass,
                "question"
            );
        }

        for answer in &message.answers {
            match &answer.rdata {
                RData::A(addr) => {
                    info!(name = %answer.name, ttl = answer.ttl, rdata = %addr, "answer (IPv4)");
                }
                RData::Aaaa(addr) => {
                    info!(name = %answer.name, ttl = answer.ttl, rdata = %addr, "answer (IPv6)");
                }
                RData::Cname(target) => {
                    info!(name = %answer.name, ttl = answer.ttl, rdata = %target, "answer (CNAME)");
                }
                RData::Other(bytes) => {
                    info!(
                        name = %answer.name,
                        rtype = answer.rtype,
                        rclass = answer.rclass,
                        ttl = answer.ttl,
                        rdlength = answer.rdlength,
                        rdata_len = bytes.len(),
                        "answer (opaque)"
                    );
                }
            }
        }
    }

    fn on_decode_error(&mut self, meta: &PacketMeta, error: &DecodeError) {
        warn!(direction = ?meta.direction, %error, "failed to decode dns message");
    }
}
