//! PC5 signalling message encoding/decoding
//!
//! Wire format: message type (1 byte), sequence number (4 bytes, big
//! endian), then the message-specific fields.

use bytes::{Buf, BufMut, Bytes, BytesMut};
use thiserror::Error;

use prosesim_common::{log_pc5_message, Direction};

use crate::message::{MessageType, Pc5SignallingMessage, RejectReason, ReleaseReason};

/// Errors that can occur during PC5 message encoding/decoding
#[derive(Debug, Error)]
pub enum Pc5CodecError {
    /// Unknown message type
    #[error("unknown PC5 message type: {0}")]
    UnknownMessageType(u8),

    /// Unknown reject or release reason
    #[error("unknown PC5 reason code: {0}")]
    UnknownReason(u8),

    /// Buffer too short
    #[error("buffer too short: need {needed} bytes, have {available}")]
    BufferTooShort {
        /// Number of bytes needed
        needed: usize,
        /// Number of bytes available
        available: usize,
    },
}

/// Result type for PC5 codec operations
pub type Result<T> = std::result::Result<T, Pc5CodecError>;

/// Encodes a PC5 signalling message into a byte buffer
pub fn encode(msg: &Pc5SignallingMessage) -> Bytes {
    let mut buf = BytesMut::with_capacity(16);
    encode_into(msg, &mut buf);
    let frame = buf.freeze();
    log_pc5_message(Direction::Tx, msg.message_type().name(), &frame);
    frame
}

/// Encodes a PC5 signalling message into an existing buffer
pub fn encode_into(msg: &Pc5SignallingMessage, buf: &mut BytesMut) {
    buf.put_u8(msg.message_type() as u8);
    buf.put_u32(msg.sequence_number());

    match msg {
        Pc5SignallingMessage::DirectCommunicationReject { reason, .. } => {
            buf.put_u8(*reason as u8);
        }
        Pc5SignallingMessage::DirectCommunicationRelease { reason, .. } => {
            buf.put_u8(*reason as u8);
        }
        Pc5SignallingMessage::DirectSecurityModeCommand {
            security_mode_id, ..
        }
        | Pc5SignallingMessage::DirectSecurityModeComplete {
            security_mode_id, ..
        } => {
            buf.put_u8(*security_mode_id);
        }
        Pc5SignallingMessage::RemoteUeInfoResponse { imsi, .. } => {
            buf.put_u64(*imsi);
        }
        _ => {}
    }
}

/// Decodes a PC5 signalling message from a byte buffer
pub fn decode(data: &[u8]) -> Result<Pc5SignallingMessage> {
    let mut buf = data;

    // type + sequence number
    if buf.len() < 5 {
        return Err(Pc5CodecError::BufferTooShort {
            needed: 5,
            available: buf.len(),
        });
    }

    let msg_type_byte = buf.get_u8();
    let msg_type = MessageType::from_u8(msg_type_byte)
        .ok_or(Pc5CodecError::UnknownMessageType(msg_type_byte))?;
    let sequence_number = buf.get_u32();
    log_pc5_message(Direction::Rx, msg_type.name(), data);

    match msg_type {
        MessageType::DirectCommunicationRequest => {
            Ok(Pc5SignallingMessage::DirectCommunicationRequest { sequence_number })
        }
        MessageType::DirectCommunicationAccept => {
            Ok(Pc5SignallingMessage::DirectCommunicationAccept { sequence_number })
        }
        MessageType::DirectCommunicationReject => {
            let reason_byte = require_u8(&mut buf)?;
            let reason = RejectReason::from_u8(reason_byte)
                .ok_or(Pc5CodecError::UnknownReason(reason_byte))?;
            Ok(Pc5SignallingMessage::DirectCommunicationReject {
                sequence_number,
                reason,
            })
        }
        MessageType::DirectCommunicationKeepalive => {
            Ok(Pc5SignallingMessage::DirectCommunicationKeepalive { sequence_number })
        }
        MessageType::DirectCommunicationKeepaliveAck => {
            Ok(Pc5SignallingMessage::DirectCommunicationKeepaliveAck { sequence_number })
        }
        MessageType::DirectCommunicationRelease => {
            let reason_byte = require_u8(&mut buf)?;
            let reason = ReleaseReason::from_u8(reason_byte)
                .ok_or(Pc5CodecError::UnknownReason(reason_byte))?;
            Ok(Pc5SignallingMessage::DirectCommunicationRelease {
                sequence_number,
                reason,
            })
        }
        MessageType::DirectCommunicationReleaseAccept => {
            Ok(Pc5SignallingMessage::DirectCommunicationReleaseAccept { sequence_number })
        }
        MessageType::DirectSecurityModeCommand => {
            let security_mode_id = require_u8(&mut buf)?;
            Ok(Pc5SignallingMessage::DirectSecurityModeCommand {
                sequence_number,
                security_mode_id,
            })
        }
        MessageType::DirectSecurityModeComplete => {
            let security_mode_id = require_u8(&mut buf)?;
            Ok(Pc5SignallingMessage::DirectSecurityModeComplete {
                sequence_number,
                security_mode_id,
            })
        }
        MessageType::RemoteUeInfoRequest => {
            Ok(Pc5SignallingMessage::RemoteUeInfoRequest { sequence_number })
        }
        MessageType::RemoteUeInfoResponse => {
            if buf.len() < 8 {
                return Err(Pc5CodecError::BufferTooShort {
                    needed: 8,
                    available: buf.len(),
                });
            }
            let imsi = buf.get_u64();
            Ok(Pc5SignallingMessage::RemoteUeInfoResponse {
                sequence_number,
                imsi,
            })
        }
    }
}

fn require_u8(buf: &mut &[u8]) -> Result<u8> {
    if buf.is_empty() {
        return Err(Pc5CodecError::BufferTooShort {
            needed: 1,
            available: 0,
        });
    }
    Ok(buf.get_u8())
}
