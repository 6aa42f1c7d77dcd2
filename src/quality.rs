//! Quality tiers and the rendering parameters they stand for.
//!
//! The render step reads the scale factor and the encode step reads the
//! compression level; both come from [`resolve`] so a tier always means the
//! same thing on both sides.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Output quality chosen once per conversion run.
///
/// | Tier | Scale | JPEG quality |
/// |------|-------|--------------|
/// | `High`   | 2.0× | 0.95 |
/// | `Medium` | 1.5× | 0.85 |
/// | `Low`    | 1.0× | 0.75 |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QualityTier {
    High,
    #[default]
    Medium,
    Low,
}

impl QualityTier {
    pub const ALL: [QualityTier; 3] = [QualityTier::High, QualityTier::Medium, QualityTier::Low];

    pub fn as_str(self) -> &'static str {
        match self {
            QualityTier::High => "high",
            QualityTier::Medium => "medium",
            QualityTier::Low => "low",
        }
    }

    pub fn render_parameters(self) -> RenderParameters {
        resolve(self)
    }
}

impl fmt::Display for QualityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QualityTier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "high" => Ok(QualityTier::High),
            "medium" => Ok(QualityTier::Medium),
            "low" => Ok(QualityTier::Low),
            other => Err(format!("unknown quality tier '{other}' (expected high, medium or low)")),
        }
    }
}

/// Concrete parameters for rendering and encoding one page.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RenderParameters {
    /// Multiplier applied to the page's natural size (72 points per inch).
    pub scale_factor: f32,
    /// JPEG quality in `0.0..=1.0`.
    pub compression_level: f32,
}

impl RenderParameters {
    /// The compression level on the 1–100 scale JPEG encoders take.
    pub fn jpeg_quality(&self) -> u8 {
        crate::pipeline::encode::quality_percent(self.compression_level)
    }
}

/// Map a quality tier to its rendering parameters.
pub fn resolve(tier: QualityTier) -> RenderParameters {
    let (scale_factor, compression_level) = match tier {
        QualityTier::High => (2.0, 0.95),
        QualityTier::Medium => (1.5, 0.85),
        QualityTier::Low => (1.0, 0.75),
    };
    RenderParameters {
        scale_factor,
        compression_level,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tier_table() {
        assert_eq!(
            resolve(QualityTier::High),
            RenderParameters { scale_factor: 2.0, compression_level: 0.95 }
        );
        assert_eq!(
            resolve(QualityTier::Medium),
            RenderParameters { scale_factor: 1.5, compression_level: 0.85 }
        );
        assert_eq!(
            resolve(QualityTier::Low),
            RenderParameters { scale_factor: 1.0, compression_level: 0.75 }
        );
    }

    #[test]
    fn resolve_is_stable_and_distinct() {
        for tier in QualityTier::ALL {
            assert_eq!(resolve(tier), resolve(tier));
            assert_eq!(tier.render_parameters(), resolve(tier));
        }
        let [h, m, l] = QualityTier::ALL.map(resolve);
        assert_ne!(h, m);
        assert_ne!(m, l);
        assert_ne!(h, l);
    }

    #[test]
    fn jpeg_quality_scale() {
        assert_eq!(resolve(QualityTier::High).jpeg_quality(), 95);
        assert_eq!(resolve(QualityTier::Medium).jpeg_quality(), 85);
        assert_eq!(resolve(QualityTier::Low).jpeg_quality(), 75);
    }

    #[test]
    fn parse_tier_names() {
        assert_eq!("HIGH".parse::<QualityTier>(), Ok(QualityTier::High));
        assert_eq!(" low ".parse::<QualityTier>(), Ok(QualityTier::Low));
        assert!("ultra".parse::<QualityTier>().is_err());
        for tier in QualityTier::ALL {
            assert_eq!(tier.to_string().parse::<QualityTier>(), Ok(tier));
        }
    }

    #[test]
    fn serde_lowercase() {
        let json = serde_json::to_string(&QualityTier::Medium).unwrap();
        assert_eq!(json, "\"medium\"");
    }
}
