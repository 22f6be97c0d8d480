//! Connection-strength scales.
//!
//! A connection score lives in `[MIN_SCORE, MAX_SCORE]`. Anything outside that range is
//! clamped and a missing or NaN score counts as `MIN_SCORE`, so every mapping here is total.

use serde::{Deserialize, Serialize};

use crate::graph::{Node, Role};

pub const MIN_SCORE: f32 = 1.0;
pub const MAX_SCORE: f32 = 10.0;

/// Minimum amount by which the focal disc outgrows the largest peripheral disc.
pub const FOCAL_RADIUS_MARGIN: f32 = 1.0;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScaleConfig {
    pub min_radius: f32,
    pub max_radius: f32,
    pub radius_exponent: f32,
    pub focal_radius: f32,
    pub max_rest_length: f32,
    pub min_rest_length: f32,
}

impl Default for ScaleConfig {
    fn default() -> Self {
        Self {
            min_radius: 4.0,
            max_radius: 55.0,
            radius_exponent: 2.0,
            focal_radius: 60.0,
            max_rest_length: 400.0,
            min_rest_length: 40.0,
        }
    }
}

pub fn clamp_score(score: Option<f32>) -> f32 {
    match score {
        Some(score) if !score.is_nan() => score.clamp(MIN_SCORE, MAX_SCORE),
        _ => MIN_SCORE,
    }
}

fn normalized(score: Option<f32>) -> f32 {
    (clamp_score(score) - MIN_SCORE) / (MAX_SCORE - MIN_SCORE)
}

impl ScaleConfig {
    /// Power-law radius: strong connections dominate visually.
    pub fn radius_of(&self, score: Option<f32>) -> f32 {
        let exponent = self.radius_exponent.max(0.1);
        self.min_radius + (self.max_radius - self.min_radius) * normalized(score).powf(exponent)
    }

    /// Inverse linear rest length: strong connections sit close to the focal node.
    pub fn rest_length_of(&self, score: Option<f32>) -> f32 {
        self.max_rest_length - (self.max_rest_length - self.min_rest_length) * normalized(score)
    }

    /// The focal radius ignores the score and always exceeds the largest peripheral.
    pub fn node_radius(&self, node: &Node) -> f32 {
        match node.role {
            Role::Focal => self
                .focal_radius
                .max(self.min_radius.max(self.max_radius) + FOCAL_RADIUS_MARGIN),
            Role::Peripheral => self.radius_of(node.connection_score),
        }
    }
}

pub fn radius_of(score: f32) -> f32 {
    ScaleConfig::default().radius_of(Some(score))
}

pub fn rest_length_of(score: f32) -> f32 {
    ScaleConfig::default().rest_length_of(Some(score))
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn endpoints_match_configured_ranges() {
        assert_eq!(radius_of(1.0), 4.0);
        assert_eq!(radius_of(10.0), 55.0);
        assert_eq!(rest_length_of(1.0), 400.0);
        assert_eq!(rest_length_of(10.0), 40.0);
    }

    #[test]
    fn out_of_range_scores_are_clamped() {
        assert_eq!(radius_of(0.0), radius_of(1.0));
        assert_eq!(radius_of(11.0), radius_of(10.0));
        assert_eq!(rest_length_of(-4.0), rest_length_of(1.0));
        assert_eq!(rest_length_of(f32::INFINITY), rest_length_of(10.0));
        assert_eq!(radius_of(f32::NEG_INFINITY), radius_of(1.0));
    }

    #[test]
    fn missing_and_nan_scores_default_to_weakest() {
        let scale = ScaleConfig::default();
        assert_eq!(scale.radius_of(None), scale.radius_of(Some(1.0)));
        assert_eq!(scale.rest_length_of(Some(f32::NAN)), 400.0);
    }

    #[test]
    fn radius_is_non_linear() {
        let midpoint = radius_of(5.5);
        assert!(midpoint < (radius_of(1.0) + radius_of(10.0)) / 2.0);
    }

    #[test]
    fn focal_radius_exceeds_every_peripheral() {
        let scale = ScaleConfig {
            focal_radius: 10.0,
            ..Default::default()
        };
        let focal = Node::focal("Van Gogh");
        assert!(scale.node_radius(&focal) > scale.radius_of(Some(MAX_SCORE)));

        let tie = ScaleConfig {
            focal_radius: 55.0,
            ..Default::default()
        };
        assert_eq!(tie.node_radius(&focal), 55.0 + FOCAL_RADIUS_MARGIN);
        assert_eq!(ScaleConfig::default().node_radius(&focal), 60.0);
    }

    proptest! {
        #[test]
        fn radius_increases_and_rest_length_decreases(a in 1.0f32..=10.0, b in 1.0f32..=10.0) {
            let (low, high) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(radius_of(low) <= radius_of(high));
            prop_assert!(rest_length_of(low) >= rest_length_of(high));
        }

        #[test]
        fn mappings_are_total(score in proptest::num::f32::ANY) {
            let radius = radius_of(score);
            let rest = rest_length_of(score);
            prop_assert!(radius.is_finite() && (4.0..=55.0).contains(&radius));
            prop_assert!(rest.is_finite() && (40.0..=400.0).contains(&rest));
        }
    }
}
