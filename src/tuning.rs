//! Data-driven game balance
//!
//! A plain tuning table the app constructs and passes down, with an
//! explicit JSON file lifecycle (`load`/`save`/`reset`) and a
//! compile-time field registry so an in-game editor can enumerate and
//! edit every knob by name without any runtime type inspection.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::sim::state::{BrakeKind, InputKind};

/// Tuning I/O and editor errors
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("unknown tuning field `{0}`")]
    UnknownField(String),
    #[error("field `{field}` expects a {expected} value")]
    KindMismatch {
        field: &'static str,
        expected: &'static str,
    },
    #[error("`{value}` is not a valid choice for `{field}`")]
    UnknownChoice {
        field: &'static str,
        value: String,
    },
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Parse(#[from] serde_json::Error),
}

/// What kind of editor widget a field wants
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Float,
    Int,
    Bool,
    /// Dropdown over a fixed set of variant names
    Choice(&'static [&'static str]),
}

impl FieldKind {
    pub fn matches(&self, value: &FieldValue) -> bool {
        matches!(
            (self, value),
            (FieldKind::Float, FieldValue::Float(_))
                | (FieldKind::Int, FieldValue::Int(_))
                | (FieldKind::Bool, FieldValue::Bool(_))
                | (FieldKind::Choice(_), FieldValue::Choice(_))
        )
    }
}

/// One entry of the editor registry
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    /// Stable identifier, used with [`Tuning::get`] / [`Tuning::set`]
    pub name: &'static str,
    /// Display label for editor widgets
    pub label: &'static str,
    pub kind: FieldKind,
}

/// A field value crossing the editor boundary
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Float(f32),
    Int(u32),
    Bool(bool),
    Choice(String),
}

impl FieldValue {
    fn as_float(&self, field: &'static str) -> Result<f32, TuningError> {
        match self {
            FieldValue::Float(v) => Ok(*v),
            _ => Err(TuningError::KindMismatch {
                field,
                expected: "float",
            }),
        }
    }

    fn as_int(&self, field: &'static str) -> Result<u32, TuningError> {
        match self {
            FieldValue::Int(v) => Ok(*v),
            _ => Err(TuningError::KindMismatch {
                field,
                expected: "int",
            }),
        }
    }

    fn as_bool(&self, field: &'static str) -> Result<bool, TuningError> {
        match self {
            FieldValue::Bool(v) => Ok(*v),
            _ => Err(TuningError::KindMismatch {
                field,
                expected: "bool",
            }),
        }
    }

    fn as_choice(&self, field: &'static str) -> Result<&str, TuningError> {
        match self {
            FieldValue::Choice(v) => Ok(v),
            _ => Err(TuningError::KindMismatch {
                field,
                expected: "choice",
            }),
        }
    }
}

const INPUT_CHOICES: &[&str] = &["brake", "boost", "none"];
const BRAKE_CHOICES: &[&str] = &["flat", "proportional"];

/// Every editable field, in display order
pub const FIELDS: &[FieldSpec] = &[
    FieldSpec { name: "left_input", label: "Left input", kind: FieldKind::Choice(INPUT_CHOICES) },
    FieldSpec { name: "right_input", label: "Right input", kind: FieldKind::Choice(INPUT_CHOICES) },
    FieldSpec { name: "brake_kind", label: "Brake type", kind: FieldKind::Choice(BRAKE_CHOICES) },
    FieldSpec { name: "boost_delay", label: "Boost delay", kind: FieldKind::Float },
    FieldSpec { name: "boost_strength", label: "Boost strength", kind: FieldKind::Float },
    FieldSpec { name: "min_speed", label: "Min speed", kind: FieldKind::Float },
    FieldSpec { name: "max_speed", label: "Max speed", kind: FieldKind::Float },
    FieldSpec { name: "acceleration", label: "Acceleration speed", kind: FieldKind::Float },
    FieldSpec { name: "brake_strength", label: "Brake speed", kind: FieldKind::Float },
    FieldSpec { name: "speed_scores", label: "Speed scores", kind: FieldKind::Bool },
    FieldSpec { name: "platform_scores", label: "Platform scores", kind: FieldKind::Bool },
    FieldSpec { name: "max_platform_count", label: "Max platforms count", kind: FieldKind::Int },
    FieldSpec { name: "platform_distance", label: "Platform distance", kind: FieldKind::Float },
    FieldSpec {
        name: "platform_distance_scale",
        label: "Platform distance scale",
        kind: FieldKind::Float,
    },
    FieldSpec { name: "min_cam_size", label: "Cam size min", kind: FieldKind::Float },
    FieldSpec { name: "cam_scale", label: "Cam scale", kind: FieldKind::Float },
    FieldSpec {
        name: "near_miss_distance",
        label: "Near miss distance",
        kind: FieldKind::Float,
    },
];

/// Gameplay tuning table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub left_input: InputKind,
    pub right_input: InputKind,
    pub brake_kind: BrakeKind,

    /// Seconds between boosts
    pub boost_delay: f32,
    /// Speed added per boost
    pub boost_strength: f32,

    pub min_speed: f32,
    pub max_speed: f32,
    /// Coasting acceleration (units/s^2)
    pub acceleration: f32,
    /// Braking strength; flat deceleration or per-unit-speed factor,
    /// depending on `brake_kind`
    pub brake_strength: f32,

    /// Record the peak speed as the score
    pub speed_scores: bool,
    /// Score a point per gate passed
    pub platform_scores: bool,
    pub max_platform_count: u32,
    pub platform_distance: f32,
    pub platform_distance_scale: f32,

    pub min_cam_size: f32,
    pub cam_scale: f32,
    /// Gate clearance below which a pass counts as a near miss
    pub near_miss_distance: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            left_input: InputKind::Brake,
            right_input: InputKind::Brake,
            brake_kind: BrakeKind::Proportional,
            boost_delay: 3.0,
            boost_strength: 5.0,
            min_speed: 0.0,
            max_speed: 50.0,
            acceleration: 3.0,
            brake_strength: 1.5,
            speed_scores: true,
            platform_scores: false,
            max_platform_count: 6,
            platform_distance: 5.0,
            platform_distance_scale: 1.0,
            min_cam_size: 10.0,
            cam_scale: 1.0,
            near_miss_distance: 0.0,
        }
    }
}

impl Tuning {
    /// Read the current value of a registry field
    pub fn get(&self, name: &str) -> Result<FieldValue, TuningError> {
        let value = match name {
            "left_input" => FieldValue::Choice(self.left_input.as_str().to_owned()),
            "right_input" => FieldValue::Choice(self.right_input.as_str().to_owned()),
            "brake_kind" => FieldValue::Choice(self.brake_kind.as_str().to_owned()),
            "boost_delay" => FieldValue::Float(self.boost_delay),
            "boost_strength" => FieldValue::Float(self.boost_strength),
            "min_speed" => FieldValue::Float(self.min_speed),
            "max_speed" => FieldValue::Float(self.max_speed),
            "acceleration" => FieldValue::Float(self.acceleration),
            "brake_strength" => FieldValue::Float(self.brake_strength),
            "speed_scores" => FieldValue::Bool(self.speed_scores),
            "platform_scores" => FieldValue::Bool(self.platform_scores),
            "max_platform_count" => FieldValue::Int(self.max_platform_count),
            "platform_distance" => FieldValue::Float(self.platform_distance),
            "platform_distance_scale" => FieldValue::Float(self.platform_distance_scale),
            "min_cam_size" => FieldValue::Float(self.min_cam_size),
            "cam_scale" => FieldValue::Float(self.cam_scale),
            "near_miss_distance" => FieldValue::Float(self.near_miss_distance),
            _ => return Err(TuningError::UnknownField(name.to_owned())),
        };
        Ok(value)
    }

    /// Write a registry field, checking kind and choice validity
    pub fn set(&mut self, name: &str, value: FieldValue) -> Result<(), TuningError> {
        match name {
            "left_input" => {
                self.left_input = parse_input(value.as_choice("left_input")?, "left_input")?;
            }
            "right_input" => {
                self.right_input = parse_input(value.as_choice("right_input")?, "right_input")?;
            }
            "brake_kind" => {
                let raw = value.as_choice("brake_kind")?;
                self.brake_kind =
                    BrakeKind::from_str(raw).ok_or_else(|| TuningError::UnknownChoice {
                        field: "brake_kind",
                        value: raw.to_owned(),
                    })?;
            }
            "boost_delay" => self.boost_delay = value.as_float("boost_delay")?,
            "boost_strength" => self.boost_strength = value.as_float("boost_strength")?,
            "min_speed" => self.min_speed = value.as_float("min_speed")?,
            "max_speed" => self.max_speed = value.as_float("max_speed")?,
            "acceleration" => self.acceleration = value.as_float("acceleration")?,
            "brake_strength" => self.brake_strength = value.as_float("brake_strength")?,
            "speed_scores" => self.speed_scores = value.as_bool("speed_scores")?,
            "platform_scores" => self.platform_scores = value.as_bool("platform_scores")?,
            "max_platform_count" => {
                self.max_platform_count = value.as_int("max_platform_count")?;
            }
            "platform_distance" => self.platform_distance = value.as_float("platform_distance")?,
            "platform_distance_scale" => {
                self.platform_distance_scale = value.as_float("platform_distance_scale")?;
            }
            "min_cam_size" => self.min_cam_size = value.as_float("min_cam_size")?,
            "cam_scale" => self.cam_scale = value.as_float("cam_scale")?,
            "near_miss_distance" => {
                self.near_miss_distance = value.as_float("near_miss_distance")?;
            }
            _ => return Err(TuningError::UnknownField(name.to_owned())),
        }
        Ok(())
    }

    /// Load from a JSON file; a missing file means defaults
    pub fn load(path: &Path) -> Result<Self, TuningError> {
        if !path.exists() {
            log::info!("no tuning file at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        let tuning = serde_json::from_str(&content)?;
        log::info!("loaded tuning from {}", path.display());
        Ok(tuning)
    }

    /// Write the table to a JSON file
    pub fn save(&self, path: &Path) -> Result<(), TuningError> {
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        log::info!("tuning saved to {}", path.display());
        Ok(())
    }

    /// Delete the saved file and return the defaults
    pub fn reset(path: &Path) -> Result<Self, TuningError> {
        if path.exists() {
            fs::remove_file(path)?;
            log::info!("tuning file {} removed", path.display());
        }
        Ok(Self::default())
    }
}

fn parse_input(raw: &str, field: &'static str) -> Result<InputKind, TuningError> {
    InputKind::from_str(raw).ok_or_else(|| TuningError::UnknownChoice {
        field,
        value: raw.to_owned(),
    })
}
