use serde::{Deserialize, Serialize};

use crate::error::UnknownConfidence;

/// A display color, shared by the terminal and web front ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Swatch {
    pub name: &'static str,
    pub hex: &'static str,
    pub rgb: (u8, u8, u8),
}

impl Swatch {
    pub const RED: Self = Self {
        name: "red",
        hex: "#dc2626",
        rgb: (220, 38, 38),
    };
    pub const ORANGE: Self = Self {
        name: "orange",
        hex: "#f97316",
        rgb: (249, 115, 22),
    };
    pub const YELLOW: Self = Self {
        name: "yellow",
        hex: "#eab308",
        rgb: (234, 179, 8),
    };
    pub const AMBER: Self = Self {
        name: "yellow",
        hex: "#ca8a04",
        rgb: (202, 138, 4),
    };
    pub const GREEN: Self = Self {
        name: "green",
        hex: "#16a34a",
        rgb: (22, 163, 74),
    };
}

struct TierStyle {
    swatch: Swatch,
    icon: &'static str,
    label: &'static str,
}

// Indexed by `Severity::index`.
const TIER_STYLES: [TierStyle; 3] = [
    TierStyle {
        swatch: Swatch::RED,
        icon: "🔴",
        label: "High",
    },
    TierStyle {
        swatch: Swatch::ORANGE,
        icon: "🟠",
        label: "Medium",
    },
    TierStyle {
        swatch: Swatch::YELLOW,
        icon: "🟡",
        label: "Low",
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    High,
    Medium,
    Low,
}

impl Severity {
    pub const ALL: [Self; 3] = [Self::High, Self::Medium, Self::Low];

    pub const fn index(self) -> usize {
        match self {
            Self::High => 0,
            Self::Medium => 1,
            Self::Low => 2,
        }
    }

    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Self::High),
            1 => Some(Self::Medium),
            2 => Some(Self::Low),
            _ => None,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::High => "HIGH",
            Self::Medium => "MEDIUM",
            Self::Low => "LOW",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "high" => Some(Self::High),
            "medium" => Some(Self::Medium),
            "low" => Some(Self::Low),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        TIER_STYLES[self.index()].label
    }

    pub const fn swatch(self) -> Swatch {
        TIER_STYLES[self.index()].swatch
    }

    pub const fn icon(self) -> &'static str {
        TIER_STYLES[self.index()].icon
    }
}

/// Detection confidence as reported by the sensor feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Confidence {
    Low,
    Nominal,
    High,
}

impl Confidence {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Nominal => "nominal",
            Self::High => "high",
        }
    }

    /// Accepts both the spelled-out tags and the single-letter VIIRS codes.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "low" | "l" => Some(Self::Low),
            "nominal" | "n" => Some(Self::Nominal),
            "high" | "h" => Some(Self::High),
            _ => None,
        }
    }
}

impl TryFrom<String> for Confidence {
    type Error = UnknownConfidence;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value).ok_or(UnknownConfidence(value))
    }
}

impl From<Confidence> for String {
    fn from(value: Confidence) -> Self {
        value.as_str().to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskTier {
    High,
    Medium,
    Low,
}

impl RiskTier {
    pub const fn label(self) -> &'static str {
        match self {
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
        }
    }

    pub const fn swatch(self) -> Swatch {
        match self {
            Self::High => Swatch::RED,
            Self::Medium => Swatch::AMBER,
            Self::Low => Swatch::GREEN,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tier_lookup_matches_dashboard_palette() {
        assert_eq!(Severity::High.swatch(), Swatch::RED);
        assert_eq!(Severity::Medium.swatch(), Swatch::ORANGE);
        assert_eq!(Severity::Low.swatch(), Swatch::YELLOW);
        assert_eq!(Severity::High.icon(), "🔴");
    }

    #[test]
    fn severity_index_round_trips() {
        for severity in Severity::ALL {
            assert_eq!(Severity::from_index(severity.index()), Some(severity));
        }
        assert_eq!(Severity::from_index(3), None);
    }

    #[test]
    fn confidence_accepts_viirs_letters() {
        assert_eq!(Confidence::parse("h"), Some(Confidence::High));
        assert_eq!(Confidence::parse(" Nominal "), Some(Confidence::Nominal));
        assert_eq!(Confidence::parse("x"), None);
    }

    #[test]
    fn risk_colors_follow_traffic_light() {
        assert_eq!(RiskTier::High.swatch().name, "red");
        assert_eq!(RiskTier::Medium.swatch().name, "yellow");
        assert_eq!(RiskTier::Low.swatch().name, "green");
    }
}
