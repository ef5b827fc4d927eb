//! PC5 signalling message types
//!
//! The direct-link signalling messages exchanged between a remote UE and a
//! relay UE during one-to-one connection setup, keepalive and release.

use std::fmt;

/// PC5 signalling message type identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum MessageType {
    /// Direct communication request
    DirectCommunicationRequest = 1,
    /// Direct communication accept
    DirectCommunicationAccept = 2,
    /// Direct communication reject
    DirectCommunicationReject = 3,
    /// Direct communication keepalive
    DirectCommunicationKeepalive = 4,
    /// Direct communication keepalive ack
    DirectCommunicationKeepaliveAck = 5,
    /// Direct communication release
    DirectCommunicationRelease = 6,
    /// Direct communication release accept
    DirectCommunicationReleaseAccept = 7,
    /// Direct security mode command
    DirectSecurityModeCommand = 8,
    /// Direct security mode complete
    DirectSecurityModeComplete = 9,
    /// Remote UE info request
    RemoteUeInfoRequest = 10,
    /// Remote UE info response
    RemoteUeInfoResponse = 11,
}

impl MessageType {
    /// Creates a MessageType from a u8 value
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            1 => Some(Self::DirectCommunicationRequest),
            2 => Some(Self::DirectCommunicationAccept),
            3 => Some(Self::DirectCommunicationReject),
            4 => Some(Self::DirectCommunicationKeepalive),
            5 => Some(Self::DirectCommunicationKeepaliveAck),
            6 => Some(Self::DirectCommunicationRelease),
            7 => Some(Self::DirectCommunicationReleaseAccept),
            8 => Some(Self::DirectSecurityModeCommand),
            9 => Some(Self::DirectSecurityModeComplete),
            10 => Some(Self::RemoteUeInfoRequest),
            11 => Some(Self::RemoteUeInfoResponse),
            _ => None,
        }
    }

    /// Wire-level message name, for log output.
    pub fn name(&self) -> &'static str {
        match self {
            Self::DirectCommunicationRequest => "DIRECT_COMMUNICATION_REQUEST",
            Self::DirectCommunicationAccept => "DIRECT_COMMUNICATION_ACCEPT",
            Self::DirectCommunicationReject => "DIRECT_COMMUNICATION_REJECT",
            Self::DirectCommunicationKeepalive => "DIRECT_COMMUNICATION_KEEPALIVE",
            Self::DirectCommunicationKeepaliveAck => "DIRECT_COMMUNICATION_KEEPALIVE_ACK",
            Self::DirectCommunicationRelease => "DIRECT_COMMUNICATION_RELEASE",
            Self::DirectCommunicationReleaseAccept => "DIRECT_COMMUNICATION_RELEASE_ACCEPT",
            Self::DirectSecurityModeCommand => "DIRECT_SECURITY_MODE_COMMAND",
            Self::DirectSecurityModeComplete => "DIRECT_SECURITY_MODE_COMPLETE",
            Self::RemoteUeInfoRequest => "REMOTE_UE_INFO_REQUEST",
            Self::RemoteUeInfoResponse => "REMOTE_UE_INFO_RESPONSE",
        }
    }
}

/// Reason carried in a direct communication reject
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum RejectReason {
    /// Direct communication to the target is not allowed
    CommNotAllowed = 1,
    /// Authentication failure
    AuthFailure = 2,
    /// Conflict of layer 2 identifiers
    ConflictL2Id = 3,
    /// Lack of resources for the link
    LackOfResources = 4,
    /// IP version mismatch
    IpMismatch = 5,
    /// Other errors
    OtherErrors = 6,
}

impl RejectReason {
    /// Creates a RejectReason from a u8 value
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            1 => Some(Self::CommNotAllowed),
            2 => Some(Self::AuthFailure),
            3 => Some(Self::ConflictL2Id),
            4 => Some(Self::LackOfResources),
            5 => Some(Self::IpMismatch),
            6 => Some(Self::OtherErrors),
            _ => None,
        }
    }
}

/// Reason carried in a direct communication release
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ReleaseReason {
    /// Communication to the peer is no longer needed
    CommNoLongerNeeded = 1,
    /// Communication to the peer is no longer allowed
    CommNoLongerAllowed = 2,
    /// Communication resources are no longer available
    CommNoLongerAvailable = 3,
}

impl ReleaseReason {
    /// Creates a ReleaseReason from a u8 value
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            1 => Some(Self::CommNoLongerNeeded),
            2 => Some(Self::CommNoLongerAllowed),
            3 => Some(Self::CommNoLongerAvailable),
            _ => None,
        }
    }
}

/// A PC5 signalling message
///
/// Every message carries the sequence number of the procedure it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Pc5SignallingMessage {
    /// Opens a one-to-one link towards a relay
    DirectCommunicationRequest {
        /// Procedure sequence number
        sequence_number: u32,
    },
    /// Confirms link establishment after security completes
    DirectCommunicationAccept {
        /// Procedure sequence number
        sequence_number: u32,
    },
    /// Refuses a link request
    DirectCommunicationReject {
        /// Procedure sequence number
        sequence_number: u32,
        /// Why the request was refused
        reason: RejectReason,
    },
    /// Periodic liveness probe from the remote UE
    DirectCommunicationKeepalive {
        /// Procedure sequence number
        sequence_number: u32,
    },
    /// Acknowledges a keepalive
    DirectCommunicationKeepaliveAck {
        /// Procedure sequence number
        sequence_number: u32,
    },
    /// Starts link teardown
    DirectCommunicationRelease {
        /// Procedure sequence number
        sequence_number: u32,
        /// Why the link is being released
        reason: ReleaseReason,
    },
    /// Acknowledges a release
    DirectCommunicationReleaseAccept {
        /// Procedure sequence number
        sequence_number: u32,
    },
    /// Orders the peer to activate security
    DirectSecurityModeCommand {
        /// Procedure sequence number
        sequence_number: u32,
        /// Identifier tying the complete to this command
        security_mode_id: u8,
    },
    /// Confirms security activation
    DirectSecurityModeComplete {
        /// Procedure sequence number
        sequence_number: u32,
        /// Identifier of the command being answered
        security_mode_id: u8,
    },
    /// Asks the remote UE for its identity
    RemoteUeInfoRequest {
        /// Procedure sequence number
        sequence_number: u32,
    },
    /// Reports the remote UE identity
    RemoteUeInfoResponse {
        /// Procedure sequence number
        sequence_number: u32,
        /// IMSI of the remote UE
        imsi: u64,
    },
}

impl Pc5SignallingMessage {
    /// Message type of this message
    pub fn message_type(&self) -> MessageType {
        match self {
            Self::DirectCommunicationRequest { .. } => MessageType::DirectCommunicationRequest,
            Self::DirectCommunicationAccept { .. } => MessageType::DirectCommunicationAccept,
            Self::DirectCommunicationReject { .. } => MessageType::DirectCommunicationReject,
            Self::DirectCommunicationKeepalive { .. } => MessageType::DirectCommunicationKeepalive,
            Self::DirectCommunicationKeepaliveAck { .. } => {
                MessageType::DirectCommunicationKeepaliveAck
            }
            Self::DirectCommunicationRelease { .. } => MessageType::DirectCommunicationRelease,
            Self::DirectCommunicationReleaseAccept { .. } => {
                MessageType::DirectCommunicationReleaseAccept
            }
            Self::DirectSecurityModeCommand { .. } => MessageType::DirectSecurityModeCommand,
            Self::DirectSecurityModeComplete { .. } => MessageType::DirectSecurityModeComplete,
            Self::RemoteUeInfoRequest { .. } => MessageType::RemoteUeInfoRequest,
            Self::RemoteUeInfoResponse { .. } => MessageType::RemoteUeInfoResponse,
        }
    }

    /// Sequence number of the procedure this message belongs to
    pub fn sequence_number(&self) -> u32 {
        match self {
            Self::DirectCommunicationRequest { sequence_number }
            | Self::DirectCommunicationAccept { sequence_number }
            | Self::DirectCommunicationReject {
                sequence_number, ..
            }
            | Self::DirectCommunicationKeepalive { sequence_number }
            | Self::DirectCommunicationKeepaliveAck { sequence_number }
            | Self::DirectCommunicationRelease {
                sequence_number, ..
            }
            | Self::DirectCommunicationReleaseAccept { sequence_number }
            | Self::DirectSecurityModeCommand {
                sequence_number, ..
            }
            | Self::DirectSecurityModeComplete {
                sequence_number, ..
            }
            | Self::RemoteUeInfoRequest { sequence_number }
            | Self::RemoteUeInfoResponse {
                sequence_number, ..
            } => *sequence_number,
        }
    }
}

impl fmt::Display for Pc5SignallingMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:?}[sn={}]",
            self.message_type(),
            self.sequence_number()
        )
    }
}
