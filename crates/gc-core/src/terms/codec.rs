//! Stored T&C acceptance record.
//!
//! The record is a tag-addressed structure in the Matter TLV layout (a small
//! subset of it):
//!
//! ```text
//! 0x15                      anonymous structure
//!   0x24 0x01 <u8>          serialization version
//!   0x25 0x02 <u16 le>      accepted acknowledgements
//!   0x25 0x03 <u16 le>      accepted acknowledgements version
//! 0x18                      end of container
//! ```
//!
//! Fields are looked up by tag, not position. Unknown unsigned-integer tags
//! are skipped so later revisions can append fields. Integer widths are
//! accepted as long as the value fits the field.

use bytes::{Buf, BufMut, BytesMut};
use thiserror::Error;

use super::TermsAndConditions;

/// Serialization version written into every record.
pub const ACCEPTANCE_RECORD_VERSION: u8 = 1;

const TAG_SERIALIZATION_VERSION: u8 = 1;
const TAG_ACCEPTED_ACKNOWLEDGEMENTS: u8 = 2;
const TAG_ACCEPTED_VERSION: u8 = 3;

const CONTROL_ANONYMOUS_STRUCTURE: u8 = 0x15;
const CONTROL_END_OF_CONTAINER: u8 = 0x18;
const TAG_CONTROL_MASK: u8 = 0xe0;
const TAG_CONTROL_CONTEXT: u8 = 0x20;
const ELEMENT_TYPE_MASK: u8 = 0x1f;
const ELEMENT_UINT8: u8 = 0x04;
const ELEMENT_UINT16: u8 = 0x05;
const ELEMENT_UINT32: u8 = 0x06;
const ELEMENT_UINT64: u8 = 0x07;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordCodecError {
    #[error("acceptance record truncated")]
    Truncated,

    #[error("unexpected element 0x{control:02x} in acceptance record")]
    UnexpectedElement { control: u8 },

    #[error("acceptance record field {tag} is missing")]
    MissingField { tag: u8 },

    #[error("acceptance record field {tag} out of range: {value}")]
    ValueOutOfRange { tag: u8, value: u64 },

    #[error("acceptance record version mismatch: expected {expected}, found {found}")]
    VersionMismatch { expected: u8, found: u8 },
}

/// Decoded acceptance record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AcceptanceRecord {
    pub acceptance: TermsAndConditions,
}

impl AcceptanceRecord {
    pub fn new(acceptance: TermsAndConditions) -> Self {
        Self { acceptance }
    }

    pub fn encode(&self) -> Vec<u8> {
        let mut buf = BytesMut::with_capacity(13);
        buf.put_u8(CONTROL_ANONYMOUS_STRUCTURE);
        buf.put_u8(TAG_CONTROL_CONTEXT | ELEMENT_UINT8);
        buf.put_u8(TAG_SERIALIZATION_VERSION);
        buf.put_u8(ACCEPTANCE_RECORD_VERSION);
        buf.put_u8(TAG_CONTROL_CONTEXT | ELEMENT_UINT16);
        buf.put_u8(TAG_ACCEPTED_ACKNOWLEDGEMENTS);
        buf.put_u16_le(self.acceptance.acknowledgements);
        buf.put_u8(TAG_CONTROL_CONTEXT | ELEMENT_UINT16);
        buf.put_u8(TAG_ACCEPTED_VERSION);
        buf.put_u16_le(self.acceptance.version);
        buf.put_u8(CONTROL_END_OF_CONTAINER);
        buf.to_vec()
    }

    /// Decode a stored record. A serialization version other than
    /// [`ACCEPTANCE_RECORD_VERSION`] is a hard failure.
    pub fn decode(bytes: &[u8]) -> Result<Self, RecordCodecError> {
        let mut buf = bytes;
        let opening = read_u8(&mut buf)?;
        if opening != CONTROL_ANONYMOUS_STRUCTURE {
            return Err(RecordCodecError::UnexpectedElement { control: opening });
        }

        let mut serialization_version = None;
        let mut acknowledgements = None;
        let mut version = None;

        loop {
            let control = read_u8(&mut buf)?;
            if control == CONTROL_END_OF_CONTAINER {
                break;
            }
            if control & TAG_CONTROL_MASK != TAG_CONTROL_CONTEXT {
                return Err(RecordCodecError::UnexpectedElement { control });
            }
            let tag = read_u8(&mut buf)?;
            let value = read_unsigned(&mut buf, control)?;
            match tag {
                TAG_SERIALIZATION_VERSION => serialization_version = Some(narrow::<u8>(tag, value)?),
                TAG_ACCEPTED_ACKNOWLEDGEMENTS => acknowledgements = Some(narrow::<u16>(tag, value)?),
                TAG_ACCEPTED_VERSION => version = Some(narrow::<u16>(tag, value)?),
                _ => {}
            }
        }

        let found = serialization_version.ok_or(RecordCodecError::MissingField {
            tag: TAG_SERIALIZATION_VERSION,
        })?;
        if found != ACCEPTANCE_RECORD_VERSION {
            return Err(RecordCodecError::VersionMismatch {
                expected: ACCEPTANCE_RECORD_VERSION,
                found,
            });
        }

        Ok(Self {
            acceptance: TermsAndConditions {
                acknowledgements: acknowledgements.ok_or(RecordCodecError::MissingField {
                    tag: TAG_ACCEPTED_ACKNOWLEDGEMENTS,
                })?,
                version: version.ok_or(RecordCodecError::MissingField {
                    tag: TAG_ACCEPTED_VERSION,
                })?,
            },
        })
    }
}

fn read_u8(buf: &mut &[u8]) -> Result<u8, RecordCodecError> {
    if buf.remaining() < 1 {
        return Err(RecordCodecError::Truncated);
    }
    Ok(buf.get_u8())
}

fn read_unsigned(buf: &mut &[u8], control: u8) -> Result<u64, RecordCodecError> {
    let width = match control & ELEMENT_TYPE_MASK {
        ELEMENT_UINT8 => 1,
        ELEMENT_UINT16 => 2,
        ELEMENT_UINT32 => 4,
        ELEMENT_UINT64 => 8,
        _ => return Err(RecordCodecError::UnexpectedElement { control }),
    };
    if buf.remaining() < width {
        return Err(RecordCodecError::Truncated);
    }
    Ok(buf.get_uint_le(width))
}

fn narrow<T: TryFrom<u64>>(tag: u8, value: u64) -> Result<T, RecordCodecError> {
    T::try_from(value).map_err(|_| RecordCodecError::ValueOutOfRange { tag, value })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_expected_layout() {
        let bytes = AcceptanceRecord::new(TermsAndConditions::new(0x0102, 3)).encode();
        assert_eq!(
            bytes,
            vec![0x15, 0x24, 0x01, 0x01, 0x25, 0x02, 0x02, 0x01, 0x25, 0x03, 0x03, 0x00, 0x18]
        );
    }

    #[test]
    fn decodes_fields_in_any_order_and_width() {
        let bytes = [
            0x15, // struct
            0x24, 0x03, 0x05, // version field as u8
            0x26, 0x09, 0xaa, 0xbb, 0xcc, 0xdd, // unknown tag, skipped
            0x25, 0x02, 0xff, 0x00, // acknowledgements
            0x24, 0x01, 0x01, // serialization version last
            0x18,
        ];

        let record = AcceptanceRecord::decode(&bytes).unwrap();

        assert_eq!(record.acceptance, TermsAndConditions::new(0x00ff, 5));
    }

    #[test]
    fn version_mismatch_is_rejected() {
        let mut bytes = AcceptanceRecord::new(TermsAndConditions::new(1, 1)).encode();
        bytes[3] = 2;

        assert_eq!(
            AcceptanceRecord::decode(&bytes).unwrap_err(),
            RecordCodecError::VersionMismatch {
                expected: 1,
                found: 2
            }
        );
    }

    #[test]
    fn truncated_record_is_rejected() {
        let bytes = AcceptanceRecord::new(TermsAndConditions::new(1, 1)).encode();
        assert_eq!(
            AcceptanceRecord::decode(&bytes[..bytes.len() - 1]).unwrap_err(),
            RecordCodecError::Truncated
        );
        assert_eq!(AcceptanceRecord::decode(&[]).unwrap_err(), RecordCodecError::Truncated);
    }

    #[test]
    fn missing_field_is_rejected() {
        let bytes = [0x15, 0x24, 0x01, 0x01, 0x25, 0x02, 0x01, 0x00, 0x18];
        assert_eq!(
            AcceptanceRecord::decode(&bytes).unwrap_err(),
            RecordCodecError::MissingField { tag: 3 }
        );
    }

    #[test]
    fn oversized_value_is_rejected() {
        let bytes = [
            0x15, 0x24, 0x01, 0x01, 0x26, 0x02, 0x00, 0x00, 0x01, 0x00, 0x25, 0x03, 0x01, 0x00,
            0x18,
        ];
        assert_eq!(
            AcceptanceRecord::decode(&bytes).unwrap_err(),
            RecordCodecError::ValueOutOfRange {
                tag: 2,
                value: 0x1_0000
            }
        );
    }

    #[test]
    fn non_structure_is_rejected() {
        assert_eq!(
            AcceptanceRecord::decode(&[0x24, 0x01, 0x01]).unwrap_err(),
            RecordCodecError::UnexpectedElement { control: 0x24 }
        );
    }
}
