//! TNM-derived stage grouping.
//!
//! Diagnosis stages arrive as free text (`"IIA"`, `"Stage IIIB"`, `"iv"`). Rules only care about
//! the roman-numeral group, so the text is parsed into a [`Stage`] with an ordered
//! [`StageGroup`] and an optional sub-stage letter.

use std::fmt;
use std::str::FromStr;

/// Anatomic stage group, ordered from least to most advanced.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StageGroup {
    Zero,
    I,
    II,
    III,
    IV,
}

impl StageGroup {
    fn as_str(self) -> &'static str {
        match self {
            StageGroup::Zero => "0",
            StageGroup::I => "I",
            StageGroup::II => "II",
            StageGroup::III => "III",
            StageGroup::IV => "IV",
        }
    }
}

/// A parsed stage such as `IIIB`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Stage {
    group: StageGroup,
    substage: Option<char>,
}

impl Stage {
    pub fn group(&self) -> StageGroup {
        self.group
    }

    pub fn substage(&self) -> Option<char> {
        self.substage
    }

    /// Stage IV disease (any sub-stage).
    pub fn is_metastatic(&self) -> bool {
        self.group == StageGroup::IV
    }

    /// Stage III or higher.
    pub fn is_advanced(&self) -> bool {
        self.group >= StageGroup::III
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.substage {
            Some(letter) => write!(f, "{}{}", self.group.as_str(), letter),
            None => write!(f, "{}", self.group.as_str()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognised stage: {0:?}")]
pub struct StageParseError(String);

impl FromStr for Stage {
    type Err = StageParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        let body = upper
            .strip_prefix("STAGE")
            .map(str::trim_start)
            .unwrap_or(upper.as_str());

        // Longest numeral first so that "IV" is not read as "I" + "V".
        const GROUPS: [(&str, StageGroup); 5] = [
            ("IV", StageGroup::IV),
            ("III", StageGroup::III),
            ("II", StageGroup::II),
            ("I", StageGroup::I),
            ("0", StageGroup::Zero),
        ];

        let (group, rest) = GROUPS
            .iter()
            .find_map(|(numeral, group)| body.strip_prefix(*numeral).map(|rest| (*group, rest)))
            .ok_or_else(|| StageParseError(s.to_string()))?;

        let substage = match rest {
            "" => None,
            letter if letter.len() == 1 && matches!(letter.as_bytes()[0], b'A'..=b'C') => {
                letter.chars().next()
            }
            _ => return Err(StageParseError(s.to_string())),
        };

        Ok(Stage { group, substage })
    }
}
