use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use eframe::egui::{Vec2, vec2};

const JIGGLE_MAGNITUDE: f32 = 1e-6;

/// Deterministic pair of values in `[-1, 1]` derived from `key`.
pub fn stable_pair<K: Hash + ?Sized>(key: &K) -> (f32, f32) {
    let mut hasher = DefaultHasher::new();
    key.hash(&mut hasher);
    let hash = hasher.finish();

    let x = ((hash & 0xffff_ffff) as f64 / u32::MAX as f64) as f32;
    let y = (((hash >> 32) & 0xffff_ffff) as f64 / u32::MAX as f64) as f32;
    ((x * 2.0) - 1.0, (y * 2.0) - 1.0)
}

/// Tiny non-zero offset used when two nodes sit exactly on top of each other.
/// `jiggle(a, b) == -jiggle(b, a)`, so a coincident pair is pushed apart symmetrically.
pub fn jiggle(a: usize, b: usize) -> Vec2 {
    if a > b {
        return -jiggle(b, a);
    }

    let (jx, jy) = stable_pair(&(a, b));
    let direction = vec2(jx, jy);
    if direction.length_sq() > 1e-8 {
        direction.normalized() * JIGGLE_MAGNITUDE
    } else {
        let angle = ((a as f32) * 0.618_034 + (b as f32) * 0.414_214) * std::f32::consts::TAU;
        vec2(angle.cos(), angle.sin()) * JIGGLE_MAGNITUDE
    }
}

pub fn truncate_label(label: &str, max_chars: usize) -> String {
    if label.chars().count() <= max_chars {
        return label.to_owned();
    }

    let mut truncated = label
        .chars()
        .take(max_chars.saturating_sub(1))
        .collect::<String>();
    truncated.push('…');
    truncated
}
