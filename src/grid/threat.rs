//! Hazard ingestion and threat-zone weighting
//!
//! Every hazard body segment inside the window stamps a set of concentric
//! square rings around its cell: a solid core of impassable cells, then
//! penalty bands whose weights fall off with distance, out to a baseline
//! band at five radii. Overlapping bands from different segments compose by
//! maximum, and a cell already marked impassable is never downgraded.
//!
//! The same pass distills one [`Aggressor`] record per hazard for the
//! steering layer: distance, relative position, heading, and the body
//! segment closest to the agent.

use super::{CellKind, CollisionGrid, Occupant};
use crate::snapshot::WorldSnapshot;
use glam::Vec2;
use std::cmp::Ordering;

/// The hazard body segment nearest to the agent.
#[derive(Debug, Clone, Copy)]
pub struct ClosestSegment {
    /// Segment index, or `None` when the head is the closest part
    pub segment: Option<usize>,
    /// World position of that part
    pub position: Vec2,
    /// Center distance squared minus both parties' squared radii; roughly
    /// the squared gap between the hulls, negative when they overlap
    pub adjusted_distance_sq: f32,
}

/// Per-hazard threat summary produced by a rebuild.
#[derive(Debug, Clone)]
pub struct Aggressor {
    /// Identity of the hazard
    pub hazard_id: u64,
    /// Head distance squared from the agent
    pub distance_sq: f32,
    /// Agent position minus hazard head position
    pub relative_position: Vec2,
    /// Unit vector of the hazard's heading
    pub heading: Vec2,
    /// Body part nearest to the agent, if any part was inside the window
    pub closest_segment: Option<ClosestSegment>,
}

/// Mark every hazard into the grid and build the aggressor list.
///
/// Hazards are processed nearest head first, so the dying-segment budget is
/// spent on the hazards that matter most; the aggressor list comes out
/// already sorted by head distance. Returns the list and the number of
/// dying segments dropped after the budget ran out.
pub(super) fn populate_hazards(
    grid: &mut CollisionGrid,
    snapshot: &WorldSnapshot,
) -> (Vec<Aggressor>, usize) {
    let agent_pos = snapshot.agent.position;
    let agent_radius = grid.segment_radius(snapshot.agent.radius_scale);
    let agent_radius_sq = agent_radius * agent_radius;

    let mut order: Vec<usize> = (0..snapshot.hazards.len())
        .filter(|&i| snapshot.hazards[i].id != snapshot.agent.id)
        .collect();
    order.sort_by(|&a, &b| {
        let da = snapshot.hazards[a].position.distance_squared(agent_pos);
        let db = snapshot.hazards[b].position.distance_squared(agent_pos);
        da.partial_cmp(&db).unwrap_or(Ordering::Equal)
    });

    let budget = grid.config().grid.dying_segment_budget;
    let head_scale = grid.config().grid.head_radius_scale;
    let min_radius = grid.config().grid.min_hazard_radius;

    let mut dying_used = 0usize;
    let mut dying_skipped = 0usize;
    let mut aggressors = Vec::with_capacity(order.len());

    for i in order {
        let hazard = &snapshot.hazards[i];
        let mut aggressor = Aggressor {
            hazard_id: hazard.id,
            distance_sq: hazard.position.distance_squared(agent_pos),
            relative_position: agent_pos - hazard.position,
            heading: hazard.heading_vector(),
            closest_segment: None,
        };

        let radius = grid.segment_radius(hazard.radius_scale);
        let threat_radius = radius.max(min_radius);
        let combined_radius_sq = agent_radius_sq + radius * radius;

        if grid.contains_world(hazard.position) {
            weight_segment(
                grid,
                hazard.position,
                threat_radius * head_scale,
                Occupant::Head { hazard: hazard.id },
            );
            track_closest(&mut aggressor, None, hazard.position, agent_pos, combined_radius_sq);
        }

        for (s, segment) in hazard.segments.iter().enumerate().rev() {
            if segment.dying {
                if dying_used >= budget {
                    dying_skipped += 1;
                    continue;
                }
                dying_used += 1;
            }
            if !grid.contains_world(segment.position) {
                continue;
            }
            weight_segment(
                grid,
                segment.position,
                threat_radius,
                Occupant::Segment {
                    hazard: hazard.id,
                    segment: s,
                },
            );
            track_closest(&mut aggressor, Some(s), segment.position, agent_pos, combined_radius_sq);
        }

        aggressors.push(aggressor);
    }

    (aggressors, dying_skipped)
}

/// Stamp the threat rings of one body part centered on its cell.
///
/// Band extents are Chebyshev distances derived from the part radius, so
/// each band is a square ring. The core band is impassable; the others only
/// raise the weight of empty cells and never touch food or hazard cells.
fn weight_segment(grid: &mut CollisionGrid, position: Vec2, radius: f32, occupant: Occupant) {
    let center = grid.world_to_cell(position);
    grid.mark_hazard(center, occupant);

    let core = grid.cells_for_radius(radius);
    let near = grid.cells_for_radius(radius * 1.5);
    let mid = grid.cells_for_radius(radius * 2.0);
    let far = grid.cells_for_radius(radius * 3.0);
    let outer = grid.cells_for_radius(radius * 5.0);
    let [near_weight, mid_weight, far_weight] = grid.config().grid.ring_weights;
    let baseline = grid.config().grid.baseline_weight;

    for dc in -outer..=outer {
        for dr in -outer..=outer {
            if dc == 0 && dr == 0 {
                continue;
            }
            let coord = center.offset(dc, dr);
            if !grid.in_bounds(coord) {
                continue;
            }
            // Food keeps its pull; only a segment core lands on top of it
            if matches!(grid.cell_at(coord), Some(c) if c.kind == CellKind::Food) {
                continue;
            }
            let band = dc.abs().max(dr.abs());
            if band <= core {
                grid.mark_hazard(coord, occupant);
            } else if band <= near {
                grid.bump_penalty(coord, near_weight);
            } else if band <= mid {
                grid.bump_penalty(coord, mid_weight);
            } else if band <= far {
                grid.bump_penalty(coord, far_weight);
            } else {
                grid.bump_penalty(coord, baseline);
            }
        }
    }
}

fn track_closest(
    aggressor: &mut Aggressor,
    segment: Option<usize>,
    position: Vec2,
    agent_pos: Vec2,
    combined_radius_sq: f32,
) {
    let adjusted = position.distance_squared(agent_pos) - combined_radius_sq;
    let better = match &aggressor.closest_segment {
        Some(existing) => adjusted < existing.adjusted_distance_sq,
        None => true,
    };
    if better {
        aggressor.closest_segment = Some(ClosestSegment {
            segment,
            position,
            adjusted_distance_sq: adjusted,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::NavConfig;
    use crate::grid::CellCoord;
    use crate::snapshot::{AgentState, Hazard, HazardSegment, WorldSnapshot};

    fn agent() -> AgentState {
        AgentState {
            id: 0,
            position: Vec2::ZERO,
            heading: 0.0,
            radius_scale: 1.0,
        }
    }

    fn snapshot(hazards: Vec<Hazard>) -> WorldSnapshot {
        WorldSnapshot {
            agent: agent(),
            hazards,
            food: Vec::new(),
            debug_enabled: false,
        }
    }

    fn hazard(id: u64, head: Vec2, segments: &[Vec2]) -> Hazard {
        Hazard {
            id,
            position: head,
            heading: 0.0,
            radius_scale: 1.0,
            segments: segments
                .iter()
                .map(|&position| HazardSegment {
                    position,
                    dying: false,
                })
                .collect(),
        }
    }

    fn test_grid() -> CollisionGrid {
        // 40x40 cells of 20 world units, base radius 14.5 clamped up to 20:
        // segment bands end at Chebyshev 1 (core), 2, 3 and 5
        CollisionGrid::new(NavConfig::default())
    }

    fn weight_at(grid: &CollisionGrid, coord: CellCoord) -> f32 {
        grid.cell_at(coord).map(|c| c.weight).unwrap_or(f32::NAN)
    }

    #[test]
    fn test_segment_ring_falloff() {
        let mut grid = test_grid();
        // Head far outside the window so only the segment stamps cells
        let segment = Vec2::new(100.0, 100.0);
        grid.rebuild(&snapshot(vec![hazard(1, Vec2::new(50_000.0, 0.0), &[segment])]));

        let center = grid.world_to_cell(segment);
        let at = |dc: i32| weight_at(&grid, center.offset(dc, 0));

        assert_eq!(grid.cell_at(center).unwrap().kind, CellKind::Hazard);
        assert_eq!(at(0), 0.0);
        assert_eq!(at(1), 0.0);
        assert_eq!(at(2), 3000.0);
        assert_eq!(at(3), 2000.0);
        assert_eq!(at(4), 1500.0);
        assert_eq!(at(5), 1500.0);
        // Beyond the outer band nothing is materialized
        assert!(grid.cell_at(center.offset(6, 0)).is_none());
    }

    #[test]
    fn test_rings_are_square() {
        let mut grid = test_grid();
        let segment = Vec2::new(100.0, 100.0);
        grid.rebuild(&snapshot(vec![hazard(1, Vec2::new(50_000.0, 0.0), &[segment])]));

        let center = grid.world_to_cell(segment);
        // Same Chebyshev distance, same band, diagonal or not
        assert_eq!(weight_at(&grid, center.offset(2, 2)), 3000.0);
        assert_eq!(weight_at(&grid, center.offset(-2, 1)), 3000.0);
        assert_eq!(weight_at(&grid, center.offset(3, -3)), 2000.0);
        assert_eq!(weight_at(&grid, center.offset(-5, 5)), 1500.0);
    }

    #[test]
    fn test_head_rings_are_doubled() {
        let mut grid = test_grid();
        let head = Vec2::new(100.0, 100.0);
        grid.rebuild(&snapshot(vec![hazard(1, head, &[])]));

        let center = grid.world_to_cell(head);
        // Head radius 40: core out to Chebyshev 2, first penalty band at 3
        assert_eq!(weight_at(&grid, center.offset(2, 0)), 0.0);
        assert_eq!(weight_at(&grid, center.offset(3, 0)), 5000.0);
        assert_eq!(weight_at(&grid, center.offset(4, 0)), 3000.0);
        assert_eq!(weight_at(&grid, center.offset(6, 0)), 2000.0);
        assert_eq!(weight_at(&grid, center.offset(7, 0)), 1500.0);
        assert_eq!(weight_at(&grid, center.offset(10, 0)), 1500.0);
        assert!(grid.cell_at(center.offset(11, 0)).is_none());
    }

    #[test]
    fn test_overlapping_bands_compose_by_max() {
        let mut grid = test_grid();
        let a = Vec2::new(100.0, 100.0);
        // Five cells to the east of a
        let b = Vec2::new(200.0, 100.0);
        grid.rebuild(&snapshot(vec![hazard(1, Vec2::new(50_000.0, 0.0), &[a, b])]));

        let center_a = grid.world_to_cell(a);
        // Chebyshev 3 from a (2000) but 2 from b (3000): the heavier wins
        assert_eq!(weight_at(&grid, center_a.offset(3, 0)), 3000.0);
        // Chebyshev 2 from a (3000) and 3 from b (2000): same outcome
        assert_eq!(weight_at(&grid, center_a.offset(2, 0)), 3000.0);
    }

    #[test]
    fn test_hazard_cells_never_downgraded() {
        let mut grid = test_grid();
        let a = Vec2::new(100.0, 100.0);
        let b = Vec2::new(160.0, 100.0);
        grid.rebuild(&snapshot(vec![hazard(1, Vec2::new(50_000.0, 0.0), &[a, b])]));

        // Each core sits inside the other's penalty bands yet stays impassable;
        // b is stamped first, so its core survives a's later band pass
        let center_a = grid.world_to_cell(a);
        let center_b = grid.world_to_cell(b);
        assert_eq!(grid.cell_at(center_a).unwrap().kind, CellKind::Hazard);
        assert_eq!(grid.cell_at(center_b).unwrap().kind, CellKind::Hazard);
        assert_eq!(weight_at(&grid, center_a), 0.0);
        assert_eq!(weight_at(&grid, center_b), 0.0);
    }

    #[test]
    fn test_core_cells_record_occupants() {
        let mut grid = test_grid();
        let segment = Vec2::new(100.0, 100.0);
        grid.rebuild(&snapshot(vec![hazard(7, Vec2::new(50_000.0, 0.0), &[segment])]));

        let cell = grid.cell_at(grid.world_to_cell(segment)).unwrap();
        assert!(cell
            .occupants
            .iter()
            .any(|o| *o == Occupant::Segment { hazard: 7, segment: 0 }));
    }

    #[test]
    fn test_dying_budget_keeps_first_three() {
        let mut grid = test_grid();
        // Six dying segments spread far enough apart not to overlap
        let positions: Vec<Vec2> = (0..6)
            .map(|i| Vec2::new(-300.0 + i as f32 * 120.0, 250.0))
            .collect();
        let mut h = hazard(1, Vec2::new(50_000.0, 0.0), &positions);
        for segment in &mut h.segments {
            segment.dying = true;
        }
        grid.rebuild(&snapshot(vec![h]));

        // Reverse iteration spends the budget on the last three indices
        for (i, &p) in positions.iter().enumerate() {
            let kind = grid.cell_at(grid.world_to_cell(p)).map(|c| c.kind);
            if i >= 3 {
                assert_eq!(kind, Some(CellKind::Hazard), "segment {i} should be solid");
            } else {
                assert_eq!(kind, None, "segment {i} should be dropped");
            }
        }
        assert_eq!(grid.stats().dying_skipped, 3);
    }

    #[test]
    fn test_self_is_excluded() {
        let mut grid = test_grid();
        // Same id as the agent
        let own = hazard(0, Vec2::new(100.0, 0.0), &[Vec2::new(60.0, 0.0)]);
        grid.rebuild(&snapshot(vec![own]));

        assert!(grid.aggressors().is_empty());
        assert_eq!(grid.stats().hazard_cells, 0);
    }

    #[test]
    fn test_aggressors_sorted_by_distance() {
        let mut grid = test_grid();
        let far = hazard(2, Vec2::new(300.0, 0.0), &[]);
        let near = hazard(1, Vec2::new(100.0, 0.0), &[]);
        grid.rebuild(&snapshot(vec![far, near]));

        let aggressors = grid.aggressors();
        assert_eq!(aggressors.len(), 2);
        assert_eq!(aggressors[0].hazard_id, 1);
        assert_eq!(aggressors[1].hazard_id, 2);
        assert!(aggressors[0].distance_sq < aggressors[1].distance_sq);
    }

    #[test]
    fn test_aggressor_fields() {
        let mut grid = test_grid();
        let mut h = hazard(5, Vec2::new(100.0, 50.0), &[]);
        h.heading = std::f32::consts::FRAC_PI_2;
        grid.rebuild(&snapshot(vec![h]));

        let aggressor = &grid.aggressors()[0];
        assert_eq!(aggressor.relative_position, Vec2::new(-100.0, -50.0));
        assert!(aggressor.heading.x.abs() < 1e-6);
        assert!((aggressor.heading.y - 1.0).abs() < 1e-6);
        assert_eq!(aggressor.distance_sq, 100.0 * 100.0 + 50.0 * 50.0);
    }

    #[test]
    fn test_closest_segment_uses_adjusted_distance() {
        let mut grid = test_grid();
        let head = Vec2::new(300.0, 0.0);
        let segments = [Vec2::new(200.0, 0.0), Vec2::new(100.0, 0.0)];
        grid.rebuild(&snapshot(vec![hazard(3, head, &segments)]));

        let closest = grid.aggressors()[0].closest_segment.unwrap();
        assert_eq!(closest.segment, Some(1));
        assert_eq!(closest.position, Vec2::new(100.0, 0.0));
        // Radii at scale 1.0 are 14.5 on both sides
        let expected = 100.0f32 * 100.0 - 2.0 * 14.5 * 14.5;
        assert!((closest.adjusted_distance_sq - expected).abs() < 1e-3);
    }

    #[test]
    fn test_out_of_window_parts_stamp_nothing() {
        let mut grid = test_grid();
        let h = hazard(4, Vec2::new(50_000.0, 0.0), &[Vec2::new(0.0, 50_000.0)]);
        grid.rebuild(&snapshot(vec![h]));

        assert_eq!(grid.stats().hazard_cells, 0);
        // The hazard is still reported as an aggressor
        assert_eq!(grid.aggressors().len(), 1);
        assert!(grid.aggressors()[0].closest_segment.is_none());
    }
}
