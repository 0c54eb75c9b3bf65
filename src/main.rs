//! Example bot loop demonstrating the navigation core

use navgrid::prelude::*;

/// Synthetic world driving the navigation core through a short run
struct DemoWorld {
    tick: u32,
}

impl DemoWorld {
    fn new() -> Self {
        Self { tick: 0 }
    }

    /// Agent drifts east, two hazards orbit it, food sits on a ring
    fn snapshot(&self) -> WorldSnapshot {
        let t = self.tick as f32 * 0.05;
        let agent_pos = Vec2::new(t * 40.0, 0.0);

        let mut snapshot = WorldSnapshot::new(AgentState {
            id: 1,
            position: agent_pos,
            heading: 0.0,
            radius_scale: 1.0,
        });
        snapshot.debug_enabled = true;

        for (id, phase) in [(2u64, 0.0f32), (3, std::f32::consts::PI)] {
            let angle = t + phase;
            let head = agent_pos + Vec2::new(angle.cos(), angle.sin()) * 220.0;
            let mut segments = Vec::new();
            for s in 1..=12 {
                let trail = angle - s as f32 * 0.08;
                segments.push(HazardSegment {
                    position: agent_pos + Vec2::new(trail.cos(), trail.sin()) * 220.0,
                    dying: false,
                });
            }
            // Tail-to-head order
            segments.reverse();
            snapshot.hazards.push(Hazard {
                id,
                position: head,
                heading: angle + std::f32::consts::FRAC_PI_2,
                radius_scale: 1.5,
                segments,
            });
        }

        for i in 0..24 {
            let angle = i as f32 * (std::f32::consts::TAU / 24.0);
            let distance = 150.0 + (i % 5) as f32 * 60.0;
            snapshot.food.push(FoodItem {
                position: agent_pos + Vec2::new(angle.cos(), angle.sin()) * distance,
                size: 2.0 + (i % 7) as f32,
                eaten: false,
            });
        }

        snapshot
    }
}

fn main() {
    env_logger::init();
    log::info!("Starting navigation demo");

    let config = NavConfig::default();
    let mut grid = CollisionGrid::new(config);
    let scanner = RadarScanner::new();
    let mut world = DemoWorld::new();

    for _ in 0..40 {
        let snapshot = world.snapshot();
        grid.rebuild(&snapshot);

        let agent_pos = snapshot.agent.position;
        let radar_config = grid.config().radar;
        let sweep = scanner.scan(&mut grid, agent_pos, &radar_config);

        // Head for the best food group, or straight ahead when none scored
        let target = grid
            .food_groups()
            .first()
            .map(|group| group.centroid())
            .unwrap_or_else(|| agent_pos + snapshot.agent.heading_vector() * 300.0);
        let path = grid.generate_path(agent_pos, target);

        let nearest_hazard = grid
            .aggressors()
            .first()
            .map(|a| a.distance_sq.sqrt())
            .unwrap_or(f32::INFINITY);

        log::info!(
            "tick {:02}: {} path steps (cost {:.0}) | radar {:.0}% open | nearest hazard {:.0}",
            world.tick,
            path.len(),
            path.cost,
            sweep.open_fraction * 100.0,
            nearest_hazard
        );

        world.tick += 1;
    }

    log::info!("Demo finished");
}
