//! Food ingestion and group aggregation
//!
//! Food items pull the path search toward them through negative cell
//! weights. For target selection they are also clustered into a coarse
//! bucket grid (much larger than collision cells) centered on the agent;
//! each occupied bucket becomes a scored [`FoodGroup`], and the group list
//! is sorted by score per unit distance so the first entry is the best
//! feeding target.

use super::{CellCoord, CollisionGrid, Occupant};
use crate::snapshot::WorldSnapshot;
use glam::Vec2;
use rustc_hash::FxHashMap;
use std::cmp::Ordering;

/// Aggregate of all food items that fell into one coarse bucket.
#[derive(Debug, Clone)]
pub struct FoodGroup {
    /// Bucket address in the coarse grid
    pub bucket: CellCoord,
    /// Sum of member positions; divide by `count` for the centroid
    pub sum: Vec2,
    /// Number of member items
    pub count: usize,
    /// Total size of the members
    pub score: f32,
    /// Snapshot index of the largest member
    pub max_item: usize,
    /// Size of the largest member
    pub max_size: f32,
    /// Squared distance from the agent to the nearest member
    pub nearest_sq: f32,
    /// Squared distance from the agent to the farthest member
    pub farthest_sq: f32,
}

impl FoodGroup {
    /// Mean position of the member items
    #[must_use]
    pub fn centroid(&self) -> Vec2 {
        self.sum / self.count.max(1) as f32
    }

    /// Score divided by the distance to the nearest member.
    ///
    /// Distances under one world unit saturate at one so a group the agent
    /// is standing on does not divide by zero.
    #[must_use]
    pub fn value(&self) -> f32 {
        self.score / self.nearest_sq.sqrt().max(1.0)
    }
}

/// Bucket, score and mark every live food item near the agent.
///
/// Items outside the coarse window are ignored entirely; items inside it
/// are always grouped, and additionally stamp their fine cell when they lie
/// inside the collision window. Returns groups sorted best first.
pub(super) fn populate_food(grid: &mut CollisionGrid, snapshot: &WorldSnapshot) -> Vec<FoodGroup> {
    let agent_pos = snapshot.agent.position;
    let bucket_size = grid.config().food.bucket_cell_size;
    let buckets = grid.config().food.bucket_grid_size as i32;

    // Coarse window snapped to the bucket lattice, centered on the agent
    let sx = agent_pos.x.floor();
    let sx = sx - sx.rem_euclid(bucket_size);
    let sy = agent_pos.y.floor();
    let sy = sy - sy.rem_euclid(bucket_size);
    let half = buckets as f32 / 2.0 * bucket_size;
    let start = Vec2::new((sx - half).floor(), (sy - half).floor());
    let end = start + Vec2::splat(buckets as f32 * bucket_size);

    let mut groups: FxHashMap<CellCoord, FoodGroup> = FxHashMap::default();

    for (i, item) in snapshot.food.iter().enumerate() {
        if item.eaten {
            continue;
        }
        let p = item.position;
        if p.x <= start.x || p.x >= end.x || p.y <= start.y || p.y >= end.y {
            continue;
        }

        let col = (((p.x - start.x) / bucket_size).floor() as i32).clamp(0, buckets - 1);
        let row = (((p.y - start.y) / bucket_size).floor() as i32).clamp(0, buckets - 1);
        let bucket = CellCoord::new(col, row);
        let distance_sq = p.distance_squared(agent_pos);

        let group = groups.entry(bucket).or_insert_with(|| FoodGroup {
            bucket,
            sum: Vec2::ZERO,
            count: 0,
            score: 0.0,
            max_item: i,
            max_size: 0.0,
            nearest_sq: f32::MAX,
            farthest_sq: 0.0,
        });
        group.sum += p;
        group.count += 1;
        group.score += item.size;
        if item.size > group.max_size {
            group.max_size = item.size;
            group.max_item = i;
        }
        group.nearest_sq = group.nearest_sq.min(distance_sq);
        group.farthest_sq = group.farthest_sq.max(distance_sq);

        // Fine-cell marking only applies inside the collision window
        if grid.contains_world(p) {
            let coord = grid.world_to_cell(p);
            grid.mark_food(coord, -(item.size * item.size), Occupant::Food { item: i });
        }
    }

    let mut out: Vec<FoodGroup> = groups.into_values().collect();
    out.sort_by(|a, b| {
        b.value()
            .partial_cmp(&a.value())
            .unwrap_or(Ordering::Equal)
            .then_with(|| {
                a.nearest_sq
                    .partial_cmp(&b.nearest_sq)
                    .unwrap_or(Ordering::Equal)
            })
            .then_with(|| (a.bucket.col, a.bucket.row).cmp(&(b.bucket.col, b.bucket.row)))
    });
    out
}
