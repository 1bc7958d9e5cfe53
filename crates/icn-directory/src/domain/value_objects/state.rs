//! State / Territory codes
//!
//! Australian states and territories plus the two New Zealand islands.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::address::GeoPoint;

/// Normalized state code
#[allow(clippy::upper_case_acronyms)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub enum StateCode {
    #[default]
    NSW,
    VIC,
    QLD,
    SA,
    WA,
    TAS,
    NT,
    ACT,
    /// New Zealand, North Island
    NI,
    /// New Zealand, South Island
    SI,
}

impl StateCode {
    pub const ALL: [StateCode; 10] = [
        StateCode::NSW,
        StateCode::VIC,
        StateCode::QLD,
        StateCode::SA,
        StateCode::WA,
        StateCode::TAS,
        StateCode::NT,
        StateCode::ACT,
        StateCode::NI,
        StateCode::SI,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            Self::NSW => "NSW",
            Self::VIC => "VIC",
            Self::QLD => "QLD",
            Self::SA => "SA",
            Self::WA => "WA",
            Self::TAS => "TAS",
            Self::NT => "NT",
            Self::ACT => "ACT",
            Self::NI => "NI",
            Self::SI => "SI",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::NSW => "New South Wales",
            Self::VIC => "Victoria",
            Self::QLD => "Queensland",
            Self::SA => "South Australia",
            Self::WA => "Western Australia",
            Self::TAS => "Tasmania",
            Self::NT => "Northern Territory",
            Self::ACT => "Australian Capital Territory",
            Self::NI => "North Island",
            Self::SI => "South Island",
        }
    }

    /// Approximate centre used when a record has no coordinates of its own
    pub fn default_location(&self) -> GeoPoint {
        let (latitude, longitude) = match self {
            Self::NSW => (-33.8688, 151.2093),
            Self::VIC => (-37.8136, 144.9631),
            Self::QLD => (-27.4698, 153.0251),
            Self::SA => (-34.9285, 138.6007),
            Self::WA => (-31.9505, 115.8605),
            Self::TAS => (-42.8821, 147.3272),
            Self::NT => (-12.4634, 130.8456),
            Self::ACT => (-35.2809, 149.1300),
            Self::NI => (-36.8485, 174.7633),
            Self::SI => (-43.5321, 172.6362),
        };
        GeoPoint { latitude, longitude }
    }

    /// Map free text (code, full name, abbreviation or a known city) to a code
    pub fn lookup(raw: &str) -> Option<Self> {
        let key = raw.trim().to_lowercase();
        let key = key.trim_end_matches('.');
        let code = match key {
            "nsw" | "n.s.w" | "new south wales" | "sydney" | "newcastle" | "wollongong" | "central coast" => {
                Self::NSW
            }
            "vic" | "victoria" | "melbourne" | "geelong" | "ballarat" | "bendigo" => Self::VIC,
            "qld" | "queensland" | "brisbane" | "gold coast" | "sunshine coast" | "townsville" | "cairns" => {
                Self::QLD
            }
            "sa" | "south australia" | "adelaide" => Self::SA,
            "wa" | "western australia" | "perth" | "fremantle" => Self::WA,
            "tas" | "tasmania" | "hobart" | "launceston" => Self::TAS,
            "nt" | "northern territory" | "darwin" | "alice springs" => Self::NT,
            "act" | "australian capital territory" | "canberra" => Self::ACT,
            "ni" | "north island" | "auckland" | "wellington" | "hamilton" => Self::NI,
            "si" | "south island" | "christchurch" | "dunedin" | "queenstown" => Self::SI,
            _ => return None,
        };
        Some(code)
    }

    /// Normalize a state field, falling back to the city and finally to NSW
    pub fn normalize(state: Option<&str>, city: Option<&str>) -> Self {
        state
            .and_then(Self::lookup)
            .or_else(|| city.and_then(Self::lookup))
            .unwrap_or_default()
    }
}

impl fmt::Display for StateCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for StateCode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::lookup(s).ok_or_else(|| format!("unknown state: {}", s))
    }
}
