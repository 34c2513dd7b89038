//! Session descriptors handed to command handlers by the dispatch layer.

use serde::{Deserialize, Serialize};

use crate::ids::{FabricIndex, NodeId};

/// Kind of session a command arrived on.
///
/// 命令所在会话的类型。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionType {
    /// Unsecured session (no authentication at all).
    Unauthenticated,
    /// Provisional passcode-authenticated session used while commissioning.
    Pase,
    /// Long-term, mutually authenticated certificate-based session.
    Case,
}

/// Identity of the party that invoked a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionDescriptor {
    pub session_type: SessionType,
    /// Accessing fabric; undefined on a PASE session before a NOC is installed.
    pub fabric_index: FabricIndex,
    pub peer_node_id: NodeId,
}

impl SessionDescriptor {
    pub fn case(fabric_index: FabricIndex, peer_node_id: NodeId) -> Self {
        Self {
            session_type: SessionType::Case,
            fabric_index,
            peer_node_id,
        }
    }

    pub fn pase(fabric_index: FabricIndex) -> Self {
        Self {
            session_type: SessionType::Pase,
            fabric_index,
            peer_node_id: NodeId::new(0),
        }
    }

    /// True for a long-term mutually authenticated session.
    pub fn is_case(&self) -> bool {
        self.session_type == SessionType::Case
    }
}
