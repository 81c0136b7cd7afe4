use thiserror::Error;

/// Errors produced while decoding a DNS message from untrusted bytes.
///
/// Every variant maps to a bounds or well-formedness violation; the decoder
/// never reads outside the message buffer and never panics on hostile input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// A fixed-width field or RDATA read would run past the end of the buffer.
    #[error("buffer too short: need {needed} bytes at offset {offset}")]
    BufferTooShort { offset: usize, needed: usize },

    /// The reconstructed domain name did not fit the output capacity.
    /// Name decoding itself truncates instead of failing; this is only
    /// surfaced when a caller insists on the complete text.
    #[error("domain name exceeds output capacity")]
    NameTooLong,

    /// A compression pointer targets an offset outside the buffer or at/after
    /// the pointer itself. Targets must be strictly decreasing, so a
    /// self-reference or forward reference can never loop.
    #[error("compression pointer at offset {offset} targets invalid offset {target}")]
    PointerOutOfBounds { offset: usize, target: usize },

    /// A chain of compression pointers exceeded the recursion budget.
    #[error("compression pointer chain exceeds depth limit")]
    RecursionLimitExceeded,

    /// A label's declared length would read past the end of the buffer.
    #[error("label at offset {offset} with length {length} overruns buffer")]
    MalformedLabel { offset: usize, length: usize },

    /// A resource record's envelope decoded cleanly but its RDATA could not
    /// be interpreted for its (type, class). `consumed` is the record's full
    /// wire length, so the caller can skip it and keep scanning.
    #[error("resource record data could not be interpreted")]
    InvalidRData {
        consumed: usize,
        #[source]
        source: Box<DecodeError>,
    },
}
