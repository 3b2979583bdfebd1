//! Rarity tiers and the declarative tier table
//!
//! The table drives both the weighted roll (cumulative thresholds in table
//! order) and color generation (per-tier HSL ranges).

use serde::{Deserialize, Serialize};

use crate::consts::TOTAL_WEIGHT;

/// Quality class of a hatched creature, ordered common < ... < legendary
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum Rarity {
    #[default]
    Common,
    Uncommon,
    Rare,
    Epic,
    Legendary,
}

impl Rarity {
    /// All tiers, lowest first
    pub const ALL: [Rarity; 5] = [
        Rarity::Common,
        Rarity::Uncommon,
        Rarity::Rare,
        Rarity::Epic,
        Rarity::Legendary,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Rarity::Common => "common",
            Rarity::Uncommon => "uncommon",
            Rarity::Rare => "rare",
            Rarity::Epic => "epic",
            Rarity::Legendary => "legendary",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        match id.trim().to_lowercase().as_str() {
            "common" => Some(Rarity::Common),
            "uncommon" => Some(Rarity::Uncommon),
            "rare" => Some(Rarity::Rare),
            "epic" => Some(Rarity::Epic),
            "legendary" => Some(Rarity::Legendary),
            _ => None,
        }
    }

    /// Parse a rarity id, falling back to `Common` for anything unknown
    pub fn from_id_or_common(id: &str) -> Self {
        Self::from_id(id).unwrap_or_else(|| {
            log::warn!("Unknown rarity id {:?}, falling back to common", id);
            Rarity::Common
        })
    }

    /// Ordinal rank: common = 1 ... legendary = 5
    pub fn rank(&self) -> i32 {
        match self {
            Rarity::Common => 1,
            Rarity::Uncommon => 2,
            Rarity::Rare => 3,
            Rarity::Epic => 4,
            Rarity::Legendary => 5,
        }
    }

    /// Epic and legendary reset the pity counter
    pub fn is_epic_or_better(&self) -> bool {
        matches!(self, Rarity::Epic | Rarity::Legendary)
    }
}

// Saved ids are matched case-insensitively; unknown ones load as common
impl From<String> for Rarity {
    fn from(id: String) -> Self {
        Rarity::from_id_or_common(&id)
    }
}

impl std::fmt::Display for Rarity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A `[min, max]` range for one HSL channel.
///
/// Hue ranges may wrap: when `min > max` the valid interval is
/// `[min, 360) ∪ [0, max]`. Saturation and lightness are percentages.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HslRange {
    pub min: f64,
    pub max: f64,
}

impl HslRange {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// True if this is a hue range crossing the 0°/360° boundary
    #[inline]
    pub fn wraps(&self) -> bool {
        self.min > self.max
    }

    /// Length of the valid interval in degrees (handles wraparound)
    pub fn span(&self) -> f64 {
        if self.wraps() {
            (360.0 - self.min) + self.max
        } else {
            self.max - self.min
        }
    }

    /// Check if a hue lies within the range (handles wraparound)
    pub fn contains_hue(&self, hue: f64) -> bool {
        if self.wraps() {
            (hue >= self.min && hue < 360.0) || (hue >= 0.0 && hue <= self.max)
        } else {
            hue >= self.min && hue <= self.max
        }
    }
}

/// Static descriptor for one rarity tier
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RarityTier {
    pub rarity: Rarity,
    /// Probability weight out of 100
    pub weight: u32,
    pub hue: HslRange,
    pub saturation: HslRange,
    pub lightness: HslRange,
    /// Display name
    pub name: &'static str,
    pub emoji: &'static str,
    /// Packed 0xRRGGBB swatch for badges
    pub swatch: u32,
}

/// Ordered tier table, lowest tier first
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RarityTable {
    tiers: Vec<RarityTier>,
}

impl Default for RarityTable {
    fn default() -> Self {
        Self::standard()
    }
}

impl RarityTable {
    /// The shipped 50/25/15/8/2 table
    pub fn standard() -> Self {
        Self {
            tiers: vec![
                RarityTier {
                    rarity: Rarity::Common,
                    weight: 50,
                    hue: HslRange::new(20.0, 60.0),
                    saturation: HslRange::new(20.0, 40.0),
                    lightness: HslRange::new(40.0, 60.0),
                    name: "Common",
                    emoji: "⚪",
                    swatch: 0x9E9E9E,
                },
                RarityTier {
                    rarity: Rarity::Uncommon,
                    weight: 25,
                    hue: HslRange::new(90.0, 150.0),
                    saturation: HslRange::new(45.0, 65.0),
                    lightness: HslRange::new(40.0, 55.0),
                    name: "Uncommon",
                    emoji: "🟢",
                    swatch: 0x4CAF50,
                },
                RarityTier {
                    rarity: Rarity::Rare,
                    weight: 15,
                    hue: HslRange::new(195.0, 235.0),
                    saturation: HslRange::new(60.0, 80.0),
                    lightness: HslRange::new(45.0, 60.0),
                    name: "Rare",
                    emoji: "🔵",
                    swatch: 0x2196F3,
                },
                RarityTier {
                    rarity: Rarity::Epic,
                    weight: 8,
                    hue: HslRange::new(265.0, 305.0),
                    saturation: HslRange::new(65.0, 85.0),
                    lightness: HslRange::new(45.0, 60.0),
                    name: "Epic",
                    emoji: "🟣",
                    swatch: 0x9C27B0,
                },
                RarityTier {
                    rarity: Rarity::Legendary,
                    weight: 2,
                    // Red through gold, crossing 0°
                    hue: HslRange::new(340.0, 50.0),
                    saturation: HslRange::new(85.0, 100.0),
                    lightness: HslRange::new(50.0, 62.0),
                    name: "Legendary",
                    emoji: "🟡",
                    swatch: 0xFFC107,
                },
            ],
        }
    }

    /// Build a custom table. Returns `None` (and logs) if the weights do not
    /// sum to 100 or the common tier is missing.
    pub fn new(mut tiers: Vec<RarityTier>) -> Option<Self> {
        let total: u32 = tiers.iter().map(|t| t.weight).sum();
        if total != TOTAL_WEIGHT {
            log::warn!("Rejecting rarity table: weights sum to {}, expected {}", total, TOTAL_WEIGHT);
            return None;
        }
        if !tiers.iter().any(|t| t.rarity == Rarity::Common) {
            log::warn!("Rejecting rarity table: no common tier");
            return None;
        }
        tiers.sort_by_key(|t| t.rarity);
        Some(Self { tiers })
    }

    pub fn iter(&self) -> impl Iterator<Item = &RarityTier> {
        self.tiers.iter()
    }

    /// Look up a tier; tiers missing from the table fall back to common
    pub fn tier(&self, rarity: Rarity) -> &RarityTier {
        self.tiers
            .iter()
            .find(|t| t.rarity == rarity)
            .unwrap_or_else(|| {
                log::warn!("No {} tier in table, using common", rarity);
                self.common()
            })
    }

    /// Look up a tier by string id; unknown ids fall back to common
    pub fn tier_for_id(&self, id: &str) -> &RarityTier {
        self.tier(Rarity::from_id_or_common(id))
    }

    fn common(&self) -> &RarityTier {
        // `new` guarantees a common tier
        &self.tiers[self
            .tiers
            .iter()
            .position(|t| t.rarity == Rarity::Common)
            .unwrap_or(0)]
    }

    /// Map a draw in [0, 100) onto a tier via cumulative weights
    pub fn pick(&self, roll: f64) -> Rarity {
        let mut threshold = 0.0;
        for tier in &self.tiers {
            threshold += tier.weight as f64;
            if roll < threshold {
                return tier.rarity;
            }
        }
        // roll >= 100 only on bad input; give the top tier like the
        // final "else" branch of a threshold chain
        self.tiers.last().map(|t| t.rarity).unwrap_or_default()
    }

    /// Percent chance that a fresh standard roll beats `rarity`
    pub fn chance_of_better(&self, rarity: Rarity) -> u32 {
        self.tiers
            .iter()
            .filter(|t| t.rarity > rarity)
            .map(|t| t.weight)
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rarity_ids_round_trip() {
        for rarity in Rarity::ALL {
            assert_eq!(Rarity::from_id(rarity.as_str()), Some(rarity));
        }
        assert_eq!(Rarity::from_id("  EPIC "), Some(Rarity::Epic));
        assert_eq!(Rarity::from_id("mythic"), None);
        assert_eq!(Rarity::from_id_or_common("mythic"), Rarity::Common);
    }

    #[test]
    fn test_lenient_deserialize() {
        let parsed: Vec<Rarity> = serde_json::from_str(r#"["Epic", "LEGENDARY", "mythic", "rare"]"#).unwrap();
        assert_eq!(
            parsed,
            vec![Rarity::Epic, Rarity::Legendary, Rarity::Common, Rarity::Rare]
        );
        assert_eq!(serde_json::to_string(&Rarity::Uncommon).unwrap(), "\"uncommon\"");
    }

    #[test]
    fn test_rank_order() {
        let ranks: Vec<i32> = Rarity::ALL.iter().map(|r| r.rank()).collect();
        assert_eq!(ranks, vec![1, 2, 3, 4, 5]);
        assert!(Rarity::Common < Rarity::Legendary);
    }

    #[test]
    fn test_standard_weights_sum_to_100() {
        let table = RarityTable::standard();
        let total: u32 = table.iter().map(|t| t.weight).sum();
        assert_eq!(total, TOTAL_WEIGHT);
        assert!(RarityTable::new(table.tiers.clone()).is_some());
    }

    #[test]
    fn test_pick_thresholds() {
        let table = RarityTable::standard();
        assert_eq!(table.pick(0.0), Rarity::Common);
        assert_eq!(table.pick(49.999), Rarity::Common);
        assert_eq!(table.pick(50.0), Rarity::Uncommon);
        assert_eq!(table.pick(74.9), Rarity::Uncommon);
        assert_eq!(table.pick(75.0), Rarity::Rare);
        assert_eq!(table.pick(89.9), Rarity::Rare);
        assert_eq!(table.pick(90.0), Rarity::Epic);
        assert_eq!(table.pick(97.9), Rarity::Epic);
        assert_eq!(table.pick(98.0), Rarity::Legendary);
        assert_eq!(table.pick(99.99), Rarity::Legendary);
    }

    #[test]
    fn test_rejects_bad_weights() {
        let mut tiers = RarityTable::standard().tiers;
        tiers[0].weight = 49;
        assert!(RarityTable::new(tiers).is_none());

        let tiers: Vec<RarityTier> = RarityTable::standard()
            .tiers
            .into_iter()
            .filter(|t| t.rarity != Rarity::Common)
            .collect();
        assert!(RarityTable::new(tiers).is_none());
    }

    #[test]
    fn test_unknown_id_falls_back_to_common() {
        let table = RarityTable::standard();
        assert_eq!(table.tier_for_id("shiny").rarity, Rarity::Common);
        assert_eq!(table.tier_for_id("rare").name, "Rare");
    }

    #[test]
    fn test_chance_of_better() {
        let table = RarityTable::standard();
        assert_eq!(table.chance_of_better(Rarity::Common), 50);
        assert_eq!(table.chance_of_better(Rarity::Uncommon), 25);
        assert_eq!(table.chance_of_better(Rarity::Rare), 10);
        assert_eq!(table.chance_of_better(Rarity::Epic), 2);
        assert_eq!(table.chance_of_better(Rarity::Legendary), 0);
    }

    #[test]
    fn test_hue_range_wraparound() {
        let range = HslRange::new(340.0, 20.0);
        assert!(range.wraps());
        assert!((range.span() - 40.0).abs() < 1e-9);
        assert!(range.contains_hue(350.0));
        assert!(range.contains_hue(0.0));
        assert!(range.contains_hue(20.0));
        assert!(!range.contains_hue(180.0));
        assert!(!range.contains_hue(339.0));
    }
}
