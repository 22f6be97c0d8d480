use eframe::egui::Vec2;

use super::quadtree::Cell;
use crate::util::jiggle;

/// Cached per-link spring parameters.
#[derive(Clone, Copy, Debug)]
pub(super) struct Spring {
    pub(super) source: usize,
    pub(super) target: usize,
    pub(super) rest_length: f32,
    pub(super) strength: f32,
    /// Share of the correction taken by the target; the source takes the rest.
    pub(super) bias: f32,
}

#[derive(Clone, Copy)]
pub(super) struct ChargeParams<'a> {
    pub(super) strength: f32,
    pub(super) energy: f32,
    pub(super) theta: f32,
    pub(super) distance_min_sq: f32,
    /// Fixed nodes still repel others but receive no impulse themselves.
    pub(super) fixed: &'a [bool],
}

#[derive(Clone, Copy)]
pub(super) struct CollisionParams<'a> {
    pub(super) strength: f32,
    pub(super) reach_sq: f32,
    pub(super) fixed: &'a [bool],
}

fn separation(from: Vec2, to: Vec2, a: usize, b: usize) -> Vec2 {
    let delta = to - from;
    if delta.length_sq() > 0.0 {
        delta
    } else {
        jiggle(a, b)
    }
}

/// Splits a correction between two ends. Fixed nodes are boundary conditions and take
/// no share; returns the share of the first end.
fn first_share(default_share: f32, first_fixed: bool, second_fixed: bool) -> f32 {
    match (first_fixed, second_fixed) {
        (true, false) => 0.0,
        (false, true) => 1.0,
        _ => default_share,
    }
}

// Gauss-Seidel style: each spring sees the velocities already updated by earlier springs.
pub(super) fn apply_springs(
    springs: &[Spring],
    positions: &[Vec2],
    fixed: &[bool],
    velocities: &mut [Vec2],
    energy: f32,
) {
    for spring in springs {
        let (source, target) = (spring.source, spring.target);
        let delta = separation(
            positions[source] + velocities[source],
            positions[target] + velocities[target],
            source,
            target,
        );
        let distance = delta.length();
        let correction =
            delta * ((distance - spring.rest_length) / distance * energy * spring.strength);

        let target_share = first_share(spring.bias, fixed[target], fixed[source]);
        velocities[target] -= correction * target_share;
        velocities[source] += correction * (1.0 - target_share);
    }
}

pub(super) fn apply_charge(
    tree: &Cell,
    positions: &[Vec2],
    velocities: &mut [Vec2],
    params: ChargeParams<'_>,
) {
    if params.strength == 0.0 {
        return;
    }

    for (index, velocity) in velocities.iter_mut().enumerate() {
        if params.fixed.get(index).copied().unwrap_or(false) {
            continue;
        }
        let mut impulse = Vec2::ZERO;
        accumulate_charge(tree, index, positions, params, &mut impulse);
        *velocity += impulse;
    }
}

fn softened(distance_sq: f32, distance_min_sq: f32) -> f32 {
    if distance_sq < distance_min_sq {
        (distance_min_sq * distance_sq).sqrt()
    } else {
        distance_sq
    }
}

fn accumulate_charge(
    cell: &Cell,
    index: usize,
    positions: &[Vec2],
    params: ChargeParams<'_>,
    impulse: &mut Vec2,
) {
    if cell.count == 0 {
        return;
    }

    let point = positions[index];
    let scale = params.strength * params.energy;

    if cell.is_leaf() {
        for &other in &cell.indices {
            if other == index {
                continue;
            }
            let delta = separation(point, positions[other], index, other);
            let distance_sq = softened(delta.length_sq(), params.distance_min_sq);
            *impulse += delta * (scale / distance_sq);
        }
        return;
    }

    let delta = cell.centroid - point;
    let distance_sq = delta.length_sq();
    let far_enough = !cell.square.contains(point)
        && distance_sq > 0.0
        && cell.square.width() / distance_sq.sqrt() < params.theta;

    if far_enough {
        let distance_sq = softened(distance_sq, params.distance_min_sq);
        *impulse += delta * (scale * cell.count as f32 / distance_sq);
        return;
    }

    for child in cell.children() {
        accumulate_charge(child, index, positions, params, impulse);
    }
}

/// Pushes apart every pair whose predicted circles overlap. `predicted` is position plus
/// velocity and `tree` must be built over it.
pub(super) fn apply_collisions(
    tree: &Cell,
    predicted: &[Vec2],
    radii: &[f32],
    velocities: &mut [Vec2],
    params: CollisionParams<'_>,
) {
    if params.strength <= 0.0 {
        return;
    }
    collide_cells(tree, tree, true, predicted, radii, params, velocities);
}

fn resolve_overlap(
    a: usize,
    b: usize,
    predicted: &[Vec2],
    radii: &[f32],
    params: CollisionParams<'_>,
    velocities: &mut [Vec2],
) {
    let reach = radii[a] + radii[b];
    let delta = predicted[a] - predicted[b];
    if delta.length_sq() >= reach * reach {
        return;
    }

    let delta = if delta.length_sq() > 0.0 {
        delta
    } else {
        jiggle(a, b)
    };
    let distance = delta.length();
    let push = delta * ((reach - distance) / distance * params.strength);

    let weight_a = radii[a] * radii[a];
    let weight_b = radii[b] * radii[b];
    let share_a = first_share(
        weight_b / (weight_a + weight_b).max(f32::EPSILON),
        params.fixed[a],
        params.fixed[b],
    );

    velocities[a] += push * share_a;
    velocities[b] -= push * (1.0 - share_a);
}

fn collide_cells(
    cell_a: &Cell,
    cell_b: &Cell,
    same_cell: bool,
    predicted: &[Vec2],
    radii: &[f32],
    params: CollisionParams<'_>,
    velocities: &mut [Vec2],
) {
    if cell_a.square.gap_sq(cell_b.square) > params.reach_sq {
        return;
    }

    if cell_a.is_leaf() && cell_b.is_leaf() {
        if same_cell {
            for (offset, &a) in cell_a.indices.iter().enumerate() {
                for &b in &cell_a.indices[offset + 1..] {
                    resolve_overlap(a, b, predicted, radii, params, velocities);
                }
            }
        } else {
            for &a in &cell_a.indices {
                for &b in &cell_b.indices {
                    resolve_overlap(a, b, predicted, radii, params, velocities);
                }
            }
        }
        return;
    }

    if same_cell {
        let children = cell_a.children().collect::<Vec<_>>();
        for (offset, child) in children.iter().enumerate() {
            collide_cells(child, child, true, predicted, radii, params, velocities);
            for other in &children[offset + 1..] {
                collide_cells(child, other, false, predicted, radii, params, velocities);
            }
        }
        return;
    }

    let split_a = !cell_a.is_leaf()
        && (cell_b.is_leaf() || cell_a.square.half_extent >= cell_b.square.half_extent);
    if split_a {
        for child in cell_a.children() {
            collide_cells(child, cell_b, false, predicted, radii, params, velocities);
        }
    } else {
        for child in cell_b.children() {
            collide_cells(cell_a, child, false, predicted, radii, params, velocities);
        }
    }
}

/// Translation that moves the centroid of `positions` `strength` of the way to `center`.
pub(super) fn centering_shift(positions: &[Vec2], center: Vec2, strength: f32) -> Vec2 {
    if positions.is_empty() {
        return Vec2::ZERO;
    }
    let centroid = positions.iter().fold(Vec2::ZERO, |sum, point| sum + *point)
        / positions.len() as f32;
    (center - centroid) * strength.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use eframe::egui::vec2;

    use super::*;

    #[test]
    fn spring_pulls_stretched_pair_together() {
        let positions = [vec2(0.0, 0.0), vec2(100.0, 0.0)];
        let mut velocities = [Vec2::ZERO; 2];
        let springs = [Spring {
            source: 0,
            target: 1,
            rest_length: 50.0,
            strength: 1.0,
            bias: 0.5,
        }];

        apply_springs(&springs, &positions, &[false, false], &mut velocities, 1.0);

        assert!(velocities[1].x < 0.0);
        assert!(velocities[0].x > 0.0);
        assert!((velocities[1].x + 25.0).abs() < 1e-4);
    }

    #[test]
    fn fixed_end_takes_no_share_of_the_spring() {
        let positions = [vec2(0.0, 0.0), vec2(100.0, 0.0)];
        let mut velocities = [Vec2::ZERO; 2];
        let springs = [Spring {
            source: 0,
            target: 1,
            rest_length: 50.0,
            strength: 1.0,
            bias: 0.5,
        }];

        apply_springs(&springs, &positions, &[true, false], &mut velocities, 1.0);

        assert_eq!(velocities[0], Vec2::ZERO);
        assert!((velocities[1].x + 50.0).abs() < 1e-4);
    }

    #[test]
    fn charge_repels_and_survives_coincident_points() {
        let positions = [vec2(0.0, 0.0), vec2(10.0, 0.0), vec2(10.0, 0.0)];
        let mut velocities = [Vec2::ZERO; 3];
        let tree = Cell::build(&positions).unwrap();

        apply_charge(
            &tree,
            &positions,
            &mut velocities,
            ChargeParams {
                strength: -30.0,
                energy: 1.0,
                theta: 0.9,
                distance_min_sq: 1.0,
                fixed: &[false; 3],
            },
        );

        assert!(velocities[0].x < 0.0);
        assert!(velocities.iter().all(|velocity| velocity.is_finite()));
        assert!(velocities[1] != velocities[2]);
    }

    #[test]
    fn fixed_node_repels_but_is_not_pushed() {
        let positions = [vec2(0.0, 0.0), vec2(10.0, 0.0)];
        let mut velocities = [Vec2::ZERO; 2];
        let tree = Cell::build(&positions).unwrap();

        apply_charge(
            &tree,
            &positions,
            &mut velocities,
            ChargeParams {
                strength: -30.0,
                energy: 1.0,
                theta: 0.9,
                distance_min_sq: 1.0,
                fixed: &[true, false],
            },
        );

        assert_eq!(velocities[0], Vec2::ZERO);
        assert!(velocities[1].x > 0.0);
    }

    #[test]
    fn collision_separates_overlapping_nodes_by_radius_share() {
        let predicted = [vec2(0.0, 0.0), vec2(5.0, 0.0)];
        let radii = [10.0, 10.0];
        let mut velocities = [Vec2::ZERO; 2];
        let tree = Cell::build(&predicted).unwrap();

        apply_collisions(
            &tree,
            &predicted,
            &radii,
            &mut velocities,
            CollisionParams {
                strength: 1.0,
                reach_sq: 400.0,
                fixed: &[false, false],
            },
        );

        assert!((velocities[0].x + 7.5).abs() < 1e-4);
        assert!((velocities[1].x - 7.5).abs() < 1e-4);
    }

    #[test]
    fn centering_moves_centroid_partway() {
        let positions = [vec2(0.0, 0.0), vec2(20.0, 0.0)];
        let shift = centering_shift(&positions, vec2(110.0, 0.0), 0.5);
        assert_eq!(shift, vec2(50.0, 0.0));
    }
}
