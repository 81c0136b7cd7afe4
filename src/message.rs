use tracing::warn;

use crate::error::DecodeError;
use crate::header::{Header, HEADER_LEN};
use crate::record::{decode_question, decode_resource_record, Question, ResourceRecord};

/// One fully decoded DNS message.
///
/// Only the Question and Answer sections are decoded. Authority and
/// Additional records are visible through the header counts but their wire
/// bytes are left untouched; inspection stops after the last answer.
#[derive(Debug, Clone)]
pub struct DecodedMessage {
    pub header: Header,
    pub questions: Vec<Question>,
    pub answers: Vec<ResourceRecord>,
}

/// Decode the header, all questions and all answers of one DNS message.
///
/// Takes an immutable borrow of the payload, returns owned structures. The
/// first structural error aborts the whole decode; no partial message is
/// ever returned. The one exception is an answer whose envelope is sound
/// but whose RDATA cannot be interpreted: its wire length is known exactly,
/// so it is logged and skipped while the remaining answers are still decoded.
pub fn decode_message(payload: &[u8]) -> Result<DecodedMessage, DecodeError> {
    let header = Header::decode(payload)?;
    let mut offset = HEADER_LEN;

    let mut questions = Vec::new();
    for _ in 0..header.qdcount {
        let (question, consumed) = decode_question(payload, offset)?;
        questions.push(question);
        offset += consumed;
    }

    let mut answers = Vec::new();
    for index in 0..header.ancount {
        match decode_resource_record(payload, offset) {
            Ok((record, consumed)) => {
                answers.push(record);
                offset += consumed;
            }
            Err(DecodeError::InvalidRData { consumed, source }) => {
                warn!(answer = index, error = %source, "skipping answer with uninterpretable rdata");
                offset += consumed;
            }
            Err(err) => return Err(err),
        }
    }

    Ok(DecodedMessage {
        header,
        questions,
        answers,
    })
}
