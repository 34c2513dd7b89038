//! Scalar identifiers used across the commissioning domain.

use serde::{Deserialize, Serialize};

macro_rules! impl_scalar_id {
    ($($name:ident($inner:ty)),* $(,)?) => {
        $(
            impl $name {
                pub const fn new(raw: $inner) -> Self {
                    Self(raw)
                }

                pub const fn get(self) -> $inner {
                    self.0
                }
            }

            impl From<$inner> for $name {
                fn from(raw: $inner) -> Self {
                    Self(raw)
                }
            }

            impl From<$name> for $inner {
                fn from(id: $name) -> Self {
                    id.0
                }
            }
        )*
    };
}

/// Index of a fabric in the local fabric table.
///
/// `0` never names a real fabric; it is what an accessing session reports
/// before any operational credentials are installed (e.g. early PASE).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FabricIndex(u8);

/// Operational node identifier of a peer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(u64);

/// Endpoint on which a cluster instance lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EndpointId(u16);

impl_scalar_id!(FabricIndex(u8), NodeId(u64), EndpointId(u16));

impl FabricIndex {
    pub const UNDEFINED: FabricIndex = FabricIndex(0);

    pub fn is_defined(self) -> bool {
        self.0 != 0
    }
}

impl EndpointId {
    /// Root endpoint hosting the general commissioning cluster.
    pub const ROOT: EndpointId = EndpointId(0);
}

impl std::fmt::Display for FabricIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "0x{:016X}", self.0)
    }
}

impl std::fmt::Display for EndpointId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
