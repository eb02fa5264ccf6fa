//! Display tiers for bin and category chips.

use serde::{Deserialize, Serialize};

/// Display tier of a tag chip.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChipTier {
    /// Blue bin
    Primary,
    /// Brown bin
    Warning,
    /// Food caddy
    Success,
    /// Anything else
    #[default]
    Default,
}

impl ChipTier {
    /// Border, text and background utility classes for this tier.
    pub fn css_classes(&self) -> &'static str {
        match self {
            ChipTier::Primary => "border-blue-500 text-blue-700 bg-blue-100",
            ChipTier::Warning => "border-yellow-600 text-yellow-800 bg-yellow-100",
            ChipTier::Success => "border-green-600 text-green-800 bg-green-100",
            ChipTier::Default => "border-gray-400 text-gray-600 bg-gray-100",
        }
    }
}

/// Map a tag label to its display tier.
///
/// Matching is exact after lower-casing; note the caddy label has no space.
pub fn chip_tier(label: &str) -> ChipTier {
    match label.to_lowercase().as_str() {
        "blue bin" => ChipTier::Primary,
        "brown bin" => ChipTier::Warning,
        "greencaddy" => ChipTier::Success,
        _ => ChipTier::Default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_labels() {
        assert_eq!(chip_tier("Blue Bin"), ChipTier::Primary);
        assert_eq!(chip_tier("BROWN BIN"), ChipTier::Warning);
        assert_eq!(chip_tier("GreenCaddy"), ChipTier::Success);
    }

    #[test]
    fn test_unmatched_falls_through() {
        assert_eq!(chip_tier("Green Caddy"), ChipTier::Default);
        assert_eq!(chip_tier(" blue bin"), ChipTier::Default);
        assert_eq!(chip_tier(""), ChipTier::Default);
    }

    #[test]
    fn test_css_classes() {
        assert!(ChipTier::Primary.css_classes().contains("blue"));
        assert!(ChipTier::default().css_classes().contains("gray"));
    }

    #[test]
    fn test_serialized_name() {
        assert_eq!(serde_json::to_string(&ChipTier::Warning).unwrap(), "\"warning\"");
    }
}
