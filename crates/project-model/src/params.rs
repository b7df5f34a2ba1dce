//! Conversion parameters.
//!
//! A [`ParameterSet`] is built once per run (from the persisted settings plus
//! any operator overrides) and passed by reference into every stage. Nothing
//! downstream mutates it.

use std::fmt;
use std::str::FromStr;

use rand::seq::IndexedRandom;
use rand::Rng;
use serde::{Deserialize, Deserializer, Serialize};
use slidecast_common::error::{SlidecastError, SlidecastResult};

/// Every parameter that shapes a conversion run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParameterSet {
    /// How long each slide (except the last) stays on screen.
    #[serde(rename = "slide_duration", deserialize_with = "number_or_string")]
    pub slide_duration_secs: f64,

    /// Crossfade length handed to the transition filter.
    #[serde(rename = "transition_duration", deserialize_with = "number_or_string")]
    pub transition_duration_secs: f64,

    /// Encoder quality/speed preset.
    #[serde(rename = "video_quality")]
    pub quality: QualityTier,

    /// Background track gain, nominally `[0.0, 1.0]`.
    #[serde(deserialize_with = "number_or_string")]
    pub bgm_volume: f64,

    /// Target frame size.
    pub resolution: Resolution,

    /// Carried for the settings document only; no stage reads it.
    pub auto_next: bool,

    /// Write the slide text transcript before rasterizing.
    pub save_text: bool,

    /// Transition between slide segments.
    #[serde(rename = "transition_effect")]
    pub transition: TransitionEffect,
}

impl Default for ParameterSet {
    fn default() -> Self {
        Self {
            slide_duration_secs: 5.0,
            transition_duration_secs: 1.0,
            quality: QualityTier::High,
            bgm_volume: 1.0,
            resolution: Resolution::Auto,
            auto_next: true,
            save_text: true,
            transition: TransitionEffect::None,
        }
    }
}

/// Optional replacements for individual parameters.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParameterOverrides {
    pub slide_duration_secs: Option<f64>,
    pub transition_duration_secs: Option<f64>,
    pub quality: Option<QualityTier>,
    pub bgm_volume: Option<f64>,
    pub resolution: Option<Resolution>,
    pub auto_next: Option<bool>,
    pub save_text: Option<bool>,
    pub transition: Option<TransitionEffect>,
}

impl ParameterSet {
    /// Return a copy with every `Some` override applied.
    pub fn with_overrides(&self, overrides: &ParameterOverrides) -> Self {
        Self {
            slide_duration_secs: overrides
                .slide_duration_secs
                .unwrap_or(self.slide_duration_secs),
            transition_duration_secs: overrides
                .transition_duration_secs
                .unwrap_or(self.transition_duration_secs),
            quality: overrides.quality.unwrap_or(self.quality),
            bgm_volume: overrides.bgm_volume.unwrap_or(self.bgm_volume),
            resolution: overrides.resolution.unwrap_or(self.resolution),
            auto_next: overrides.auto_next.unwrap_or(self.auto_next),
            save_text: overrides.save_text.unwrap_or(self.save_text),
            transition: overrides.transition.unwrap_or(self.transition),
        }
    }
}

/// Parse a duration field. Only numeric validity is checked, not range.
pub fn parse_secs(field: &str, raw: &str) -> SlidecastResult<f64> {
    parse_number(field, raw)
}

/// Parse the background volume factor.
pub fn parse_volume(raw: &str) -> SlidecastResult<f64> {
    parse_number("bgm_volume", raw)
}

fn parse_number(field: &str, raw: &str) -> SlidecastResult<f64> {
    let value: f64 = raw.trim().parse().map_err(|_| {
        SlidecastError::invalid_parameter(format!("{field} must be a number, got {raw:?}"))
    })?;
    if !value.is_finite() {
        return Err(SlidecastError::invalid_parameter(format!(
            "{field} must be finite, got {raw:?}"
        )));
    }
    Ok(value)
}

/// Accepts `5`, `5.0` and `"5"`. Older settings files stored every number as a string.
fn number_or_string<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Number(value) => Ok(value),
        Raw::Text(text) => parse_number("value", &text).map_err(serde::de::Error::custom),
    }
}

/// Encoder quality preset. Each tier is a fixed CRF/preset pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QualityTier {
    #[serde(alias = "低质量")]
    Low,
    #[serde(alias = "中等质量")]
    Medium,
    #[default]
    #[serde(alias = "高质量")]
    High,
}

impl QualityTier {
    /// Constant rate factor passed to libx264.
    pub fn crf(self) -> u8 {
        match self {
            QualityTier::Low => 28,
            QualityTier::Medium => 23,
            QualityTier::High => 18,
        }
    }

    /// libx264 speed preset.
    pub fn preset(self) -> &'static str {
        match self {
            QualityTier::Low => "faster",
            QualityTier::Medium => "medium",
            QualityTier::High => "slow",
        }
    }

    /// The literal `-crf N -preset P` argument block.
    pub fn ffmpeg_args(self) -> [String; 4] {
        [
            "-crf".to_string(),
            self.crf().to_string(),
            "-preset".to_string(),
            self.preset().to_string(),
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            QualityTier::Low => "low",
            QualityTier::Medium => "medium",
            QualityTier::High => "high",
        }
    }
}

impl fmt::Display for QualityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QualityTier {
    type Err = SlidecastError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" | "低质量" => Ok(QualityTier::Low),
            "medium" | "中等质量" => Ok(QualityTier::Medium),
            "high" | "高质量" => Ok(QualityTier::High),
            other => Err(SlidecastError::invalid_parameter(format!(
                "unknown quality tier {other:?} (expected low, medium, high)"
            ))),
        }
    }
}

/// Output frame size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Resolution {
    /// Derive the size from the exported slides.
    #[default]
    Auto,
    Explicit { width: u32, height: u32 },
}

impl Resolution {
    /// Common presets offered to the operator.
    pub const PRESETS: [Resolution; 4] = [
        Resolution::Auto,
        Resolution::Explicit {
            width: 1280,
            height: 720,
        },
        Resolution::Explicit {
            width: 1920,
            height: 1080,
        },
        Resolution::Explicit {
            width: 2560,
            height: 1440,
        },
    ];

    pub fn dimensions(self) -> Option<(u32, u32)> {
        match self {
            Resolution::Auto => None,
            Resolution::Explicit { width, height } => Some((width, height)),
        }
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resolution::Auto => f.write_str("auto"),
            Resolution::Explicit { width, height } => write!(f, "{width}x{height}"),
        }
    }
}

impl FromStr for Resolution {
    type Err = SlidecastError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("auto") || trimmed == "自动" {
            return Ok(Resolution::Auto);
        }

        let invalid = || {
            SlidecastError::invalid_parameter(format!(
                "resolution must be \"auto\" or WIDTHxHEIGHT, got {s:?}"
            ))
        };
        let (w, h) = trimmed
            .split_once(['x', 'X'])
            .ok_or_else(invalid)?;
        let width: u32 = w.trim().parse().map_err(|_| invalid())?;
        let height: u32 = h.trim().parse().map_err(|_| invalid())?;
        if width == 0 || height == 0 {
            return Err(invalid());
        }
        Ok(Resolution::Explicit { width, height })
    }
}

impl TryFrom<String> for Resolution {
    type Error = SlidecastError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Resolution> for String {
    fn from(value: Resolution) -> Self {
        value.to_string()
    }
}

/// Transition effect offered to the operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransitionEffect {
    #[default]
    #[serde(alias = "无")]
    None,
    #[serde(alias = "淡入淡出")]
    Fade,
    #[serde(alias = "向左滑动")]
    SlideLeft,
    #[serde(alias = "向右滑动")]
    SlideRight,
    #[serde(alias = "向上滑动")]
    SlideUp,
    #[serde(alias = "向下滑动")]
    SlideDown,
    /// Resolved to one concrete effect when the run starts.
    #[serde(alias = "随机效果")]
    Random,
}

impl TransitionEffect {
    pub const ALL: [TransitionEffect; 7] = [
        TransitionEffect::None,
        TransitionEffect::Fade,
        TransitionEffect::SlideLeft,
        TransitionEffect::SlideRight,
        TransitionEffect::SlideUp,
        TransitionEffect::SlideDown,
        TransitionEffect::Random,
    ];

    /// The effects `Random` may resolve to.
    pub const CONCRETE: [TransitionEffect; 5] = [
        TransitionEffect::Fade,
        TransitionEffect::SlideLeft,
        TransitionEffect::SlideRight,
        TransitionEffect::SlideUp,
        TransitionEffect::SlideDown,
    ];

    /// ffmpeg `xfade` transition name. Empty for [`TransitionEffect::None`].
    pub fn filter_name(self) -> &'static str {
        match self {
            TransitionEffect::None => "",
            TransitionEffect::Fade => "fade",
            TransitionEffect::SlideLeft => "slideleft",
            TransitionEffect::SlideRight => "slideright",
            TransitionEffect::SlideUp => "slideup",
            TransitionEffect::SlideDown => "slidedown",
            TransitionEffect::Random => "random",
        }
    }

    /// Pick the concrete effect for this run.
    pub fn resolve<R: Rng + ?Sized>(self, rng: &mut R) -> ResolvedTransition {
        match self {
            TransitionEffect::None => ResolvedTransition(None),
            TransitionEffect::Random => {
                ResolvedTransition(Self::CONCRETE.choose(rng).copied())
            }
            concrete => ResolvedTransition(Some(concrete)),
        }
    }
}

impl fmt::Display for TransitionEffect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransitionEffect::None => f.write_str("none"),
            other => f.write_str(other.filter_name()),
        }
    }
}

impl FromStr for TransitionEffect {
    type Err = SlidecastError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        if wanted.is_empty() || wanted == "none" {
            return Ok(TransitionEffect::None);
        }
        Self::ALL
            .into_iter()
            .find(|effect| effect.filter_name() == wanted)
            .ok_or_else(|| {
                SlidecastError::invalid_parameter(format!(
                    "unknown transition {s:?} (expected none, fade, slideleft, slideright, slideup, slidedown, random)"
                ))
            })
    }
}

/// A transition decided for one run. Never `Random`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedTransition(Option<TransitionEffect>);

impl ResolvedTransition {
    pub const NONE: ResolvedTransition = ResolvedTransition(None);

    pub fn effect(self) -> Option<TransitionEffect> {
        self.0
    }

    /// Name for the filter graph; empty means no transition.
    pub fn filter_name(self) -> &'static str {
        self.0.map(TransitionEffect::filter_name).unwrap_or("")
    }
}
