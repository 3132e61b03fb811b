//! Configuration types for pedigree layout.
//!
//! This module provides configuration structures that control how a pedigree
//! is laid out. All types implement [`serde::Deserialize`] and every field is
//! defaulted, so an empty document is a valid configuration.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level application configuration.
//! - [`LayoutConfig`] - Direction, spacing and edge options of the layout.
//! - [`Spacing`] - Node size and row/column pitch.
//!
//! # Example
//!
//! ```
//! # use pedigree::config::{AppConfig, Direction};
//! let config = AppConfig::default();
//! assert_eq!(config.layout().direction(), Direction::TopToBottom);
//! assert!(config.layout().validate().is_ok());
//! ```

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised by [`LayoutConfig::validate`].
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("spacing value `{field}` must be positive, got {value}")]
    NonPositive { field: &'static str, value: f32 },

    #[error("h_spacing ({h_spacing}) must be at least node_width ({node_width})")]
    HorizontalPitch { h_spacing: f32, node_width: f32 },

    #[error("v_spacing ({v_spacing}) must be at least node_height ({node_height})")]
    VerticalPitch { v_spacing: f32, node_height: f32 },
}

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Layout configuration section.
    #[serde(default)]
    layout: LayoutConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] with the specified layout configuration.
    pub fn new(layout: LayoutConfig) -> Self {
        Self { layout }
    }

    /// Returns the layout configuration.
    pub fn layout(&self) -> &LayoutConfig {
        &self.layout
    }

    /// Returns the layout configuration for in-place overrides.
    pub fn layout_mut(&mut self) -> &mut LayoutConfig {
        &mut self.layout
    }
}

/// Orientation of the generations axis.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Generations grow downwards.
    #[default]
    TopToBottom,
    /// Generations grow to the right.
    LeftToRight,
}

impl From<Direction> for &'static str {
    fn from(val: Direction) -> Self {
        match val {
            Direction::TopToBottom => "top_to_bottom",
            Direction::LeftToRight => "left_to_right",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s: &'static str = (*self).into();
        write!(f, "{s}")
    }
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "top_to_bottom" | "tb" => Ok(Self::TopToBottom),
            "left_to_right" | "lr" => Ok(Self::LeftToRight),
            _ => Err(format!(
                "unknown direction `{s}`, expected `top_to_bottom` or `left_to_right`"
            )),
        }
    }
}

/// How descent lines are drawn for children of a couple.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DescentLines {
    /// One line from the couple, drawn from the lineage partner, when both
    /// parents are joined by a spousal edge.
    #[default]
    PerCouple,
    /// One line from every parent to every child.
    PerParent,
}

/// Node size and pitch of the layout grid.
///
/// `h_spacing` is the horizontal distance between the left edges of two
/// neighbours on a row, `v_spacing` the distance between two rows.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct Spacing {
    node_width: f32,
    node_height: f32,
    h_spacing: f32,
    v_spacing: f32,
    start_x: f32,
    start_y: f32,
}

impl Default for Spacing {
    fn default() -> Self {
        Self {
            node_width: 50.0,
            node_height: 50.0,
            h_spacing: 80.0,
            v_spacing: 100.0,
            start_x: 50.0,
            start_y: 50.0,
        }
    }
}

impl Spacing {
    pub fn with_node_size(mut self, width: f32, height: f32) -> Self {
        self.node_width = width;
        self.node_height = height;
        self
    }

    pub fn with_pitch(mut self, h_spacing: f32, v_spacing: f32) -> Self {
        self.h_spacing = h_spacing;
        self.v_spacing = v_spacing;
        self
    }

    pub fn with_origin(mut self, start_x: f32, start_y: f32) -> Self {
        self.start_x = start_x;
        self.start_y = start_y;
        self
    }

    pub fn node_width(&self) -> f32 {
        self.node_width
    }

    pub fn node_height(&self) -> f32 {
        self.node_height
    }

    pub fn h_spacing(&self) -> f32 {
        self.h_spacing
    }

    pub fn v_spacing(&self) -> f32 {
        self.v_spacing
    }

    pub fn start_x(&self) -> f32 {
        self.start_x
    }

    pub fn start_y(&self) -> f32 {
        self.start_y
    }

    /// Checks that sizes are positive and that the pitch leaves room for a node.
    ///
    /// # Errors
    ///
    /// Returns the first violated rule as a [`ConfigError`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        let sizes = [
            ("node_width", self.node_width),
            ("node_height", self.node_height),
            ("h_spacing", self.h_spacing),
            ("v_spacing", self.v_spacing),
        ];
        for (field, value) in sizes {
            if value.is_nan() || value <= 0.0 {
                return Err(ConfigError::NonPositive { field, value });
            }
        }
        if self.h_spacing < self.node_width {
            return Err(ConfigError::HorizontalPitch {
                h_spacing: self.h_spacing,
                node_width: self.node_width,
            });
        }
        if self.v_spacing < self.node_height {
            return Err(ConfigError::VerticalPitch {
                v_spacing: self.v_spacing,
                node_height: self.node_height,
            });
        }
        Ok(())
    }
}

/// Layout configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LayoutConfig {
    #[serde(default)]
    direction: Direction,

    #[serde(default)]
    spacing: Spacing,

    /// Draw a junction node with a sibling bar above every sibship of two
    /// or more children.
    #[serde(default)]
    sibling_bars: bool,

    #[serde(default)]
    descent_lines: DescentLines,
}

impl LayoutConfig {
    pub fn new(direction: Direction, spacing: Spacing) -> Self {
        Self {
            direction,
            spacing,
            ..Self::default()
        }
    }

    pub fn with_sibling_bars(mut self, sibling_bars: bool) -> Self {
        self.sibling_bars = sibling_bars;
        self
    }

    pub fn with_descent_lines(mut self, descent_lines: DescentLines) -> Self {
        self.descent_lines = descent_lines;
        self
    }

    pub fn set_direction(&mut self, direction: Direction) {
        self.direction = direction;
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn spacing(&self) -> &Spacing {
        &self.spacing
    }

    pub fn sibling_bars(&self) -> bool {
        self.sibling_bars
    }

    pub fn descent_lines(&self) -> DescentLines {
        self.descent_lines
    }

    /// Validates the spacing section.
    ///
    /// # Errors
    ///
    /// See [`Spacing::validate`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.spacing.validate()
    }
}
