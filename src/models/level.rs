use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// Membership tier. The derive order gives the total ordering used as the
/// merge tie-breaker: Supporter < Non-Local < Circle Member
/// < Chapter Member < Organizer < Senior Organizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ActivistLevel {
    Supporter,
    NonLocal,
    CircleMember,
    ChapterMember,
    Organizer,
    SeniorOrganizer,
}

impl ActivistLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivistLevel::Supporter => "Supporter",
            ActivistLevel::NonLocal => "Non-Local",
            ActivistLevel::CircleMember => "Circle Member",
            ActivistLevel::ChapterMember => "Chapter Member",
            ActivistLevel::Organizer => "Organizer",
            ActivistLevel::SeniorOrganizer => "Senior Organizer",
        }
    }

    /// Numeric rank for comparisons against raw column values. Unknown
    /// strings rank lowest.
    pub fn rank_of(value: &str) -> u8 {
        ActivistLevel::from_str(value)
            .map(|l| l as u8)
            .unwrap_or(0)
    }
}

impl fmt::Display for ActivistLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActivistLevel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Supporter" => Ok(ActivistLevel::Supporter),
            "Non-Local" => Ok(ActivistLevel::NonLocal),
            "Circle Member" => Ok(ActivistLevel::CircleMember),
            "Chapter Member" => Ok(ActivistLevel::ChapterMember),
            "Organizer" => Ok(ActivistLevel::Organizer),
            "Senior Organizer" => Ok(ActivistLevel::SeniorOrganizer),
            other => Err(Error::validation(
                "activist_level",
                format!("unknown level {other:?}"),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordering_matches_tier_ladder() {
        assert!(ActivistLevel::Supporter < ActivistLevel::NonLocal);
        assert!(ActivistLevel::NonLocal < ActivistLevel::CircleMember);
        assert!(ActivistLevel::CircleMember < ActivistLevel::ChapterMember);
        assert!(ActivistLevel::ChapterMember < ActivistLevel::Organizer);
        assert!(ActivistLevel::Organizer < ActivistLevel::SeniorOrganizer);
    }

    #[test]
    fn round_trips_through_display() {
        for level in [
            ActivistLevel::Supporter,
            ActivistLevel::NonLocal,
            ActivistLevel::CircleMember,
            ActivistLevel::ChapterMember,
            ActivistLevel::Organizer,
            ActivistLevel::SeniorOrganizer,
        ] {
            assert_eq!(level.as_str().parse::<ActivistLevel>().unwrap(), level);
        }
    }

    #[test]
    fn rejects_unknown_level() {
        assert!("Grand Wizard".parse::<ActivistLevel>().is_err());
        assert_eq!(ActivistLevel::rank_of("Grand Wizard"), 0);
    }
}
