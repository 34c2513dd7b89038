use serde::{Deserialize, Serialize};

/// A bitmask of acknowledged disclosure items together with the version of
/// the terms they belong to.
///
/// Used both for what the device requires and for what the user accepted.
///
/// 确认位掩码 + 条款版本。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TermsAndConditions {
    pub acknowledgements: u16,
    pub version: u16,
}

impl TermsAndConditions {
    /// Nothing accepted, or nothing required.
    pub const NONE: TermsAndConditions = TermsAndConditions {
        acknowledgements: 0,
        version: 0,
    };

    pub const fn new(acknowledgements: u16, version: u16) -> Self {
        Self {
            acknowledgements,
            version,
        }
    }

    /// Whether these requirements demand anything at all.
    pub fn is_required(&self) -> bool {
        self.acknowledgements != 0 || self.version != 0
    }
}

impl std::fmt::Display for TermsAndConditions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "0x{:04x}@v{}", self.acknowledgements, self.version)
    }
}
