use serde::{Deserialize, Serialize};

/// Required length of a regulatory country code, in bytes.
pub const COUNTRY_CODE_LENGTH: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum RegulatoryLocationType {
    Indoor = 0,
    Outdoor = 1,
    IndoorOutdoor = 2,
}

impl RegulatoryLocationType {
    pub fn from_raw(raw: u8) -> Option<Self> {
        match raw {
            0 => Some(Self::Indoor),
            1 => Some(Self::Outdoor),
            2 => Some(Self::IndoorOutdoor),
            _ => None,
        }
    }

    pub fn raw(self) -> u8 {
        self as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_values_round_trip_and_reject_unknown() {
        for location in [
            RegulatoryLocationType::Indoor,
            RegulatoryLocationType::Outdoor,
            RegulatoryLocationType::IndoorOutdoor,
        ] {
            assert_eq!(RegulatoryLocationType::from_raw(location.raw()), Some(location));
        }
        assert_eq!(RegulatoryLocationType::from_raw(3), None);
    }
}
