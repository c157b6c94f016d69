//! Property tests: bounds, exclusive occupancy and replay over random roads

use std::collections::HashSet;

use proptest::prelude::*;
use traffic_ca::simulation::{Population, RoadVariant, SimConfig, World};

fn arb_road() -> impl Strategy<Value = RoadVariant> {
    prop_oneof![
        Just(RoadVariant::OneLane),
        (0.0f64..=1.0).prop_map(|p_change| RoadVariant::TwoLane { p_change }),
    ]
}

fn arb_config() -> impl Strategy<Value = SimConfig> {
    (
        1usize..40,
        arb_road(),
        0.0f64..=1.0,
        0usize..8,
        0.0f64..=1.0,
        any::<u64>(),
    )
        .prop_map(|(width, road, density, max_velocity, p_brake, seed)| SimConfig {
            width,
            road,
            population: Population::Density(density),
            max_velocity,
            p_brake,
            seed: Some(seed),
        })
}

proptest! {
    #[test]
    fn every_step_keeps_vehicles_on_distinct_cells(config in arb_config(), steps in 0usize..60) {
        let mut world = World::new(config.clone()).unwrap();
        let vehicle_count = world.vehicles().len();

        for _ in 0..steps {
            world.step().unwrap();

            let snapshot = world.snapshot();
            prop_assert_eq!(snapshot.len(), vehicle_count);

            let mut cells = HashSet::new();
            for vehicle in &snapshot {
                prop_assert!(vehicle.x < config.width);
                prop_assert!(vehicle.lane < config.lanes());
                prop_assert!(vehicle.velocity <= config.max_velocity);
                prop_assert!(cells.insert((vehicle.lane, vehicle.x)));
            }
            prop_assert_eq!(world.grid().occupied_count(), vehicle_count);
        }
    }

    #[test]
    fn identical_inputs_give_identical_series(config in arb_config(), steps in 0usize..40) {
        let mut a = World::new(config.clone()).unwrap();
        let mut b = World::new(config).unwrap();

        prop_assert_eq!(a.run(steps).unwrap(), b.run(steps).unwrap());
        prop_assert_eq!(a.snapshot(), b.snapshot());
    }
}
