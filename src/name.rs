use std::fmt;

use crate::error::DecodeError;

/// Default output capacity for a reconstructed name, including the slot
/// reserved for a terminator. Label data on the wire historically tops out
/// at 255 octets.
pub const MAX_NAME_LEN: usize = 256;

/// Maximum number of compression pointers followed while decoding one name.
pub const MAX_POINTER_DEPTH: u8 = 32;

const POINTER_MASK: u8 = 0xC0;
const POINTER_OFFSET_MASK: u16 = 0x3FFF;

/// A domain name reconstructed from its wire form, dot-joined.
///
/// The text is an owned copy with no tie back to the message buffer. If the
/// wire name did not fit the output capacity the text is cut short and
/// [`DomainName::is_truncated`] reports it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainName {
    text: String,
    truncated: bool,
}

impl DomainName {
    /// The reconstructed name, possibly truncated.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Whether label bytes were dropped because the output capacity ran out.
    pub fn is_truncated(&self) -> bool {
        self.truncated
    }

    /// The reconstructed name, or `NameTooLong` if any of it was dropped.
    pub fn require_complete(&self) -> Result<&str, DecodeError> {
        if self.truncated {
            Err(DecodeError::NameTooLong)
        } else {
            Ok(&self.text)
        }
    }
}

impl fmt::Display for DomainName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Fixed-capacity output buffer for name reconstruction.
///
/// Once full it keeps accepting (and dropping) bytes, so the decoder can
/// still walk the remaining labels and account for every wire byte even
/// when the text no longer fits.
struct NameBuffer {
    bytes: Vec<u8>,
    capacity: usize,
    truncated: bool,
}

impl NameBuffer {
    fn new(capacity: usize) -> Self {
        // One slot is reserved for the terminating character.
        let capacity = capacity.saturating_sub(1);
        NameBuffer {
            bytes: Vec::with_capacity(capacity.min(MAX_NAME_LEN)),
            capacity,
            truncated: false,
        }
    }

    fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    fn push(&mut self, byte: u8) {
        if self.bytes.len() < self.capacity {
            self.bytes.push(byte);
        } else {
            self.truncated = true;
        }
    }

    fn finish(self) -> DomainName {
        DomainName {
            text: String::from_utf8_lossy(&self.bytes).into_owned(),
            truncated: self.truncated,
        }
    }
}

/// Decode one domain name starting at `offset`, with the default capacity.
///
/// Returns the name and the number of bytes it occupies at `offset`. A
/// trailing compression pointer counts as its own two bytes only; the bytes
/// at the pointer's target belong to a previously seen name and are never
/// part of this name's consumption.
pub fn decode_name(msg: &[u8], offset: usize) -> Result<(DomainName, usize), DecodeError> {
    decode_name_bounded(msg, offset, MAX_NAME_LEN)
}

/// Decode one domain name into an output buffer of `capacity` bytes, one of
/// which is reserved for a terminator. An overlong name is truncated, never
/// an error, and the consumed-byte count stays exact regardless.
pub fn decode_name_bounded(
    msg: &[u8],
    offset: usize,
    capacity: usize,
) -> Result<(DomainName, usize), DecodeError> {
    let mut out = NameBuffer::new(capacity);
    let consumed = decode_labels(msg, offset, &mut out, 0)?;
    Ok((out.finish(), consumed))
}

fn decode_labels(
    msg: &[u8],
    mut offset: usize,
    out: &mut NameBuffer,
    depth: u8,
) -> Result<usize, DecodeError> {
    let mut consumed = 0usize;

    loop {
        let length = *msg
            .get(offset)
            .ok_or(DecodeError::BufferTooShort { offset, needed: 1 })?;

        // Top two bits `11`: a two-byte pointer back to a prior name.
        if length & POINTER_MASK == POINTER_MASK {
            let second = *msg.get(offset + 1).ok_or(DecodeError::BufferTooShort {
                offset: offset + 1,
                needed: 1,
            })?;
            let target = usize::from(u16::from_be_bytes([length, second]) & POINTER_OFFSET_MASK);

            // A pointer may only reference a name that already appeared, so
            // targets must strictly decrease. Self and forward references
            // would otherwise loop forever on crafted input.
            if target >= offset || target >= msg.len() {
                return Err(DecodeError::PointerOutOfBounds { offset, target });
            }
            if depth >= MAX_POINTER_DEPTH {
                return Err(DecodeError::RecursionLimitExceeded);
            }

            decode_labels(msg, target, out, depth + 1)?;

            // A pointer always ends the label sequence, and only the two
            // pointer bytes belong to this name on the wire.
            return Ok(consumed + 2);
        }

        // Zero length: terminator. Only the outermost call owns this byte;
        // a recursive call is reconstructing text for someone else's name.
        if length == 0 {
            if depth == 0 {
                consumed += 1;
            }
            return Ok(consumed);
        }

        let length = usize::from(length);
        let start = offset + 1;
        let end = start + length;
        if end > msg.len() {
            return Err(DecodeError::MalformedLabel { offset, length });
        }

        if !out.is_empty() {
            out.push(b'.');
        }
        for &byte in &msg[start..end] {
            out.push(byte);
        }

        consumed += 1 + length;
        offset = end;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Wire-format encoder for building test buffers:
    /// "example.com" -> [7]example[3]com[0]
    fn encode(name: &str) -> Vec<u8> {
        let mut wire = Vec::new();
        for label in name.split('.').filter(|label| !label.is_empty()) {
            wire.push(label.len() as u8);
            wire.extend_from_slice(label.as_bytes());
        }
        wire.push(0);
        wire
    }

    #[test]
    fn literal_name_round_trips() {
        for name in ["example.com", "tw.yahoo.com", "a.b", "localhost"] {
            let wire = encode(name);
            let (decoded, consumed) = decode_name(&wire, 0).unwrap();
            assert_eq!(decoded.as_str(), name);
            assert_eq!(consumed, wire.len());
            assert!(!decoded.is_truncated());
            assert_eq!(encode(decoded.as_str()), wire);
        }
    }

    #[test]
    fn root_name_is_empty() {
        let (decoded, consumed) = decode_name(&[0], 0).unwrap();
        assert_eq!(decoded.as_str(), "");
        assert_eq!(consumed, 1);
    }

    #[test]
    fn full_pointer_matches_prior_name() {
        // "tw.yahoo.com" at offset 0, then a name that is nothing but a
        // pointer back to it.
        let mut wire = encode("tw.yahoo.com");
        let pointer_at = wire.len();
        wire.extend_from_slice(&[0xC0, 0x00]);

        let (decoded, consumed) = decode_name(&wire, pointer_at).unwrap();
        assert_eq!(decoded.as_str(), "tw.yahoo.com");
        assert_eq!(consumed, 2);
    }

    #[test]
    fn partial_compression_appends_suffix() {
        // "www" followed by a pointer to the "yahoo.com" suffix, which
        // starts at offset 3 (the label length of "yahoo").
        let mut wire = encode("tw.yahoo.com");
        let start = wire.len();
        wire.extend_from_slice(&[3, b'w', b'w', b'w', 0xC0, 0x03]);

        let (decoded, consumed) = decode_name(&wire, start).unwrap();
        assert_eq!(decoded.as_str(), "www.yahoo.com");
        assert_eq!(consumed, 6);
    }

    #[test]
    fn self_pointer_is_rejected() {
        let wire = [0xC0, 0x00];
        let err = decode_name(&wire, 0).unwrap_err();
        assert_eq!(
            err,
            DecodeError::PointerOutOfBounds {
                offset: 0,
                target: 0
            }
        );
    }

    #[test]
    fn forward_pointer_is_rejected() {
        let mut wire = vec![0xC0, 0x04, 0, 0];
        wire.extend_from_slice(&encode("a.b"));
        let err = decode_name(&wire, 0).unwrap_err();
        assert_eq!(
            err,
            DecodeError::PointerOutOfBounds {
                offset: 0,
                target: 4
            }
        );
    }

    #[test]
    fn pointer_chain_hits_depth_limit() {
        // A real name at offset 0, then 40 pointers each referencing the one
        // before it. Every target strictly decreases, so only the depth cap
        // can stop the walk.
        let mut wire = vec![1, b'x', 0];
        for i in 0u16..40 {
            let target = if i == 0 { 0 } else { 3 + 2 * (i - 1) };
            wire.extend_from_slice(&(0xC000 | target).to_be_bytes());
        }
        let start = wire.len() - 2;

        let err = decode_name(&wire, start).unwrap_err();
        assert_eq!(err, DecodeError::RecursionLimitExceeded);
    }

    #[test]
    fn pointer_chain_within_limit_decodes() {
        let mut wire = vec![1, b'x', 0];
        for i in 0u16..10 {
            let target = if i == 0 { 0 } else { 3 + 2 * (i - 1) };
            wire.extend_from_slice(&(0xC000 | target).to_be_bytes());
        }
        let start = wire.len() - 2;

        let (decoded, consumed) = decode_name(&wire, start).unwrap();
        assert_eq!(decoded.as_str(), "x");
        assert_eq!(consumed, 2);
    }

    #[test]
    fn overlong_name_truncates_but_counts_every_byte() {
        // 20 characters of reconstructed text against a 10-byte buffer:
        // 9 characters survive, the terminator slot stays reserved, and the
        // consumed count still covers the whole wire name.
        let wire = encode("aaaaaaaaaa.bbbbbbbbb");
        let (decoded, consumed) = decode_name_bounded(&wire, 0, 10).unwrap();
        assert_eq!(decoded.as_str(), "aaaaaaaaa");
        assert!(decoded.is_truncated());
        assert_eq!(decoded.require_complete(), Err(DecodeError::NameTooLong));
        assert_eq!(consumed, wire.len());
    }

    #[test]
    fn truncated_name_still_follows_trailing_pointer() {
        let mut wire = encode("suffix.example");
        let start = wire.len();
        wire.extend_from_slice(&[5, b'l', b'o', b'n', b'g', b'g', 0xC0, 0x00]);

        let (decoded, consumed) = decode_name_bounded(&wire, start, 5).unwrap();
        assert_eq!(decoded.as_str(), "long");
        assert!(decoded.is_truncated());
        assert_eq!(consumed, 8);
    }

    #[test]
    fn label_overrunning_buffer_is_malformed() {
        let wire = [5, b'a', b'b'];
        let err = decode_name(&wire, 0).unwrap_err();
        assert_eq!(err, DecodeError::MalformedLabel { offset: 0, length: 5 });
    }

    #[test]
    fn missing_terminator_is_too_short() {
        let wire = [3, b'a', b'b', b'c'];
        let err = decode_name(&wire, 0).unwrap_err();
        assert_eq!(err, DecodeError::BufferTooShort { offset: 4, needed: 1 });
    }

    #[test]
    fn dangling_pointer_byte_is_too_short() {
        let wire = [0xC0];
        let err = decode_name(&wire, 0).unwrap_err();
        assert_eq!(err, DecodeError::BufferTooShort { offset: 1, needed: 1 });
    }
}
