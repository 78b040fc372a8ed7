//! Patient age bands.

use serde::{Deserialize, Serialize};

/// Mutually exclusive age band; exactly one applies to any age.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum AgeBand {
    /// Under 2
    Infant,
    /// 2 to 11
    Child,
    /// 12 to 17
    Adolescent,
    /// 18 to 65, no band rules
    Adult,
    /// 66 to 75
    Elderly,
    /// Over 75
    VeryElderly,
}

impl AgeBand {
    /// Resolve the band for an age.
    ///
    /// Checked in a fixed order and the first match wins, so the over-75
    /// test must run before the over-65 one.
    pub fn for_age(age: u32) -> Self {
        if age < 2 {
            AgeBand::Infant
        } else if age < 12 {
            AgeBand::Child
        } else if age < 18 {
            AgeBand::Adolescent
        } else if age > 75 {
            AgeBand::VeryElderly
        } else if age > 65 {
            AgeBand::Elderly
        } else {
            AgeBand::Adult
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_band_boundaries() {
        assert_eq!(AgeBand::for_age(0), AgeBand::Infant);
        assert_eq!(AgeBand::for_age(1), AgeBand::Infant);
        assert_eq!(AgeBand::for_age(2), AgeBand::Child);
        assert_eq!(AgeBand::for_age(11), AgeBand::Child);
        assert_eq!(AgeBand::for_age(12), AgeBand::Adolescent);
        assert_eq!(AgeBand::for_age(17), AgeBand::Adolescent);
        assert_eq!(AgeBand::for_age(18), AgeBand::Adult);
        assert_eq!(AgeBand::for_age(65), AgeBand::Adult);
        assert_eq!(AgeBand::for_age(66), AgeBand::Elderly);
        assert_eq!(AgeBand::for_age(75), AgeBand::Elderly);
        assert_eq!(AgeBand::for_age(76), AgeBand::VeryElderly);
        assert_eq!(AgeBand::for_age(120), AgeBand::VeryElderly);
    }

    #[test]
    fn test_seventy_is_elderly_not_very_elderly() {
        assert_eq!(AgeBand::for_age(70), AgeBand::Elderly);
    }
}
