//! Team and region types.

use serde::{Deserialize, Serialize};

/// One of the four regions a team's side of the bracket is drawn into.
///
/// Rounds 5 and 6 (Final Four, Championship) are not associated with a
/// single region; callers use [`RegionOrFinalFour::FinalFour`] there.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum Region {
    South,
    West,
    East,
    Midwest,
}

impl Region {
    /// Seed-band fallback used only when no other region source is available.
    pub fn from_seed_band(overall_seed: u16) -> Self {
        match overall_seed {
            1..=16 => Region::South,
            17..=32 => Region::East,
            33..=48 => Region::West,
            _ => Region::Midwest,
        }
    }
}

/// A region, or the distinguished Final Four bucket used for round 5-6
/// scoring attribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum RegionOrFinalFour {
    Region(Region),
    FinalFour,
}

impl From<Region> for RegionOrFinalFour {
    fn from(r: Region) -> Self {
        RegionOrFinalFour::Region(r)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_band_fallback() {
        assert_eq!(Region::from_seed_band(1), Region::South);
        assert_eq!(Region::from_seed_band(16), Region::South);
        assert_eq!(Region::from_seed_band(17), Region::East);
        assert_eq!(Region::from_seed_band(33), Region::West);
        assert_eq!(Region::from_seed_band(64), Region::Midwest);
    }
}
