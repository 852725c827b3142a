//! Integration tests for roro-deck.

use approx::assert_relative_eq;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use roro_core::{fits_within, overlaps, Position, Surface};
use roro_deck::{
    DeckConfig, Direction, Error, FixedColor, ImportPolicy, LayoutStore, VehicleCategory,
    VehicleEdit, VehiclePreset, VehicleSpec,
};

fn store(config: DeckConfig) -> LayoutStore {
    LayoutStore::new(config)
        .unwrap()
        .with_color_picker(FixedColor::new("#06D6A0"))
}

fn assert_layout_valid(store: &LayoutStore) {
    let surface = store.surface();
    let vehicles = store.vehicles();
    for (i, a) in vehicles.iter().enumerate() {
        assert!(
            fits_within(&a.rect(), &surface),
            "vehicle {} leaves the deck",
            a.id
        );
        for b in &vehicles[i + 1..] {
            assert!(
                !overlaps(&a.rect(), &b.rect()),
                "vehicles {} and {} overlap",
                a.id,
                b.id
            );
        }
    }
    assert!(store.check_invariants().is_ok());
}

mod scenario_tests {
    use super::*;

    #[test]
    fn test_two_trucks_side_by_side() {
        let mut store = store(DeckConfig::new().with_scan_step(0.5));
        let a = store.add_vehicle(VehiclePreset::Truck.spec()).unwrap();
        let b = store.add_vehicle(VehiclePreset::Truck.spec()).unwrap();

        let a = store.get(a).unwrap();
        let b = store.get(b).unwrap();
        assert_eq!(a.position(), Position::new(0.0, 0.0));
        assert_eq!(b.position(), Position::new(2.5, 0.0));
        assert!(a.x + a.width <= b.x);
    }

    #[test]
    fn test_move_past_right_edge_is_rejected() {
        let mut store = store(DeckConfig::new().with_surface(10.0, 5.0));
        let id = store.add_vehicle(VehiclePreset::Truck.spec()).unwrap();

        // x from 0 to 2.5 is valid, y must stay 0.
        store.move_vehicle(id, 2.5, 0.0).unwrap();
        store.move_vehicle(id, 1.0, 0.0).unwrap();
        assert!(matches!(
            store.move_vehicle(id, 2.6, 0.0),
            Err(Error::OutOfBounds { .. })
        ));
        assert!(matches!(
            store.move_vehicle(id, 1.0, 0.5),
            Err(Error::OutOfBounds { .. })
        ));
        assert_eq!(store.get(id).unwrap().position(), Position::new(1.0, 0.0));
    }

    #[test]
    fn test_shrink_evicts_exactly_one() {
        let mut store = store(DeckConfig::new());
        let bus = store.add_preset(VehiclePreset::Bus).unwrap();
        let car = store.add_preset(VehiclePreset::SmallCar).unwrap();
        let motor = store.add_preset(VehiclePreset::Motor).unwrap();
        let before: Vec<_> = [car, motor]
            .iter()
            .map(|&id| store.get(id).unwrap().position())
            .collect();

        let report = store.resize_surface(10.0, 15.0).unwrap();

        assert_eq!(report.evicted.len(), 1);
        assert_eq!(report.evicted[0].id, bus);
        assert!(report.relocated.is_empty());
        assert_eq!(store.len(), 2);
        let after: Vec<_> = [car, motor]
            .iter()
            .map(|&id| store.get(id).unwrap().position())
            .collect();
        assert_eq!(before, after);
        assert_layout_valid(&store);
    }

    #[test]
    fn test_repack_defragments() {
        let mut store = store(DeckConfig::new().with_surface(12.0, 7.5));
        let ids: Vec<_> = [
            VehiclePreset::SmallCar,
            VehiclePreset::Bus,
            VehiclePreset::SmallCar,
            VehiclePreset::Motor,
        ]
        .iter()
        .map(|&preset| store.add_preset(preset).unwrap())
        .collect();

        // Scatter them so the free space is fragmented.
        store.move_vehicle(ids[0], 5.5, 7.0).unwrap();
        store.move_vehicle(ids[3], 0.0, 8.0).unwrap();

        let report = store.repack();
        assert!(report.rejected.is_empty());
        assert_eq!(report.placed.len(), 4);
        assert_eq!(report.placed[0], ids[1]);
        assert_layout_valid(&store);
    }

    #[test]
    fn test_repack_reports_what_does_not_fit() {
        let mut store = store(DeckConfig::new().with_surface(12.0, 5.0).with_scan_step(0.5));
        let truck = store.add_preset(VehiclePreset::Truck).unwrap();
        let bus = store.add_preset(VehiclePreset::Bus).unwrap();
        // Narrow the deck through a permissive import so only one fits.
        let mut snapshot = store.export();
        snapshot.ship_layout.width = 4.0;
        store.import(snapshot).unwrap();

        let report = store.repack();
        assert_eq!(report.placed, vec![bus]);
        assert_eq!(report.rejected.len(), 1);
        assert_eq!(report.rejected[0].id, truck);
        assert!(store.get(truck).is_none());
        assert_layout_valid(&store);
    }
}

mod boundary_tests {
    use super::*;

    #[test]
    fn test_exact_fit_goes_to_origin() {
        let mut store = store(DeckConfig::new().with_surface(12.0, 2.5));
        let id = store.add_preset(VehiclePreset::Bus).unwrap();
        assert_eq!(store.get(id).unwrap().position(), Position::new(0.0, 0.0));
    }

    #[test]
    fn test_oversized_always_rejected() {
        let mut store = store(DeckConfig::new().with_surface(11.0, 15.0));
        assert!(matches!(
            store.add_preset(VehiclePreset::Bus),
            Err(Error::NoSpaceAvailable { .. })
        ));
        let wide = VehicleSpec::new("Barge", VehicleCategory::Custom, 2.0, 15.5);
        assert!(matches!(
            store.add_vehicle(wide),
            Err(Error::NoSpaceAvailable { .. })
        ));
        assert!(store.is_empty());
        assert_eq!(store.next_id(), 1);
    }

    #[test]
    fn test_default_capacity() {
        let mut store = store(DeckConfig::new());
        for _ in 0..20 {
            store.add_preset(VehiclePreset::Motor).unwrap();
        }
        assert_eq!(
            store.add_preset(VehiclePreset::Motor),
            Err(Error::CapacityExceeded { max: 20 })
        );
        assert_relative_eq!(store.stats().capacity_percent, 100.0);
    }
}

mod invariant_tests {
    use super::*;

    const DIRECTIONS: [Direction; 4] = [
        Direction::Forward,
        Direction::Back,
        Direction::Left,
        Direction::Right,
    ];

    /// Applies `steps` random operations, checking after each one that the
    /// layout is valid and that a failed operation changed nothing.
    fn run_random_operations(store: &mut LayoutStore, seed: u64, steps: usize) {
        let mut rng = StdRng::seed_from_u64(seed);

        for _ in 0..steps {
            let before = store.export();
            let result = match rng.gen_range(0..7) {
                0 | 1 => {
                    let preset = VehiclePreset::ALL[rng.gen_range(0..VehiclePreset::ALL.len())];
                    store.add_preset(preset).map(|_| ())
                }
                2 => match store.vehicles().first().map(|v| v.id) {
                    Some(id) => {
                        let (x, y) = (rng.gen_range(0.0..15.0), rng.gen_range(0.0..50.0));
                        store.move_vehicle(id, x, y)
                    }
                    None => Ok(()),
                },
                3 => match store.vehicles().last().map(|v| v.id) {
                    Some(id) => {
                        let direction = DIRECTIONS[rng.gen_range(0..DIRECTIONS.len())];
                        store.nudge(id, direction, 1.0)
                    }
                    None => Ok(()),
                },
                4 => match store.vehicles().first().map(|v| v.id) {
                    Some(id) => {
                        let edit =
                            VehicleEdit::resize(rng.gen_range(1.0..13.0), rng.gen_range(0.5..3.0));
                        store.edit_vehicle(id, edit).map(|_| ())
                    }
                    None => Ok(()),
                },
                5 => {
                    store.repack();
                    Ok(())
                }
                _ => store
                    .resize_surface(rng.gen_range(20.0..50.0), rng.gen_range(6.0..15.0))
                    .map(|_| ()),
            };

            if result.is_err() {
                assert_eq!(store.export(), before);
            }
            assert_layout_valid(store);
        }
    }

    #[test]
    fn test_random_operations_keep_invariants() {
        let mut store = store(DeckConfig::new().with_max_vehicles(30));
        run_random_operations(&mut store, 2024, 300);
    }

    #[test]
    fn test_random_operations_keep_invariants_on_grid() {
        // 8.7 / 5 and most random widths give lanes that are not exact in
        // binary.
        let config = DeckConfig::new()
            .with_surface(40.0, 8.7)
            .with_max_vehicles(30)
            .with_grid(5, 1.0);
        for seed in [7, 2024] {
            let mut store = store(config.clone());
            run_random_operations(&mut store, seed, 300);
        }
    }

    #[test]
    fn test_ids_are_never_reused() {
        let mut store = store(DeckConfig::new());
        let a = store.add_preset(VehiclePreset::Motor).unwrap();
        store.remove_vehicle(a);
        let b = store.add_preset(VehiclePreset::Motor).unwrap();
        store.clear();
        let c = store.add_preset(VehiclePreset::Motor).unwrap();
        assert!(a < b && b < c);
    }
}

mod snapshot_tests {
    use super::*;

    #[test]
    fn test_export_import_round_trip() {
        let mut source = store(DeckConfig::new());
        for preset in VehiclePreset::ALL {
            source.add_preset(preset).unwrap();
        }
        source.remove_vehicle(2);
        let json = source.export_json().unwrap();

        let mut target = store(DeckConfig::new().with_surface(10.0, 10.0));
        target.import_json(&json).unwrap();

        assert_eq!(target.surface(), source.surface());
        assert_eq!(target.vehicles(), source.vehicles());
        assert_eq!(target.next_id(), source.next_id());
        assert_eq!(target.next_id(), 6);
    }

    #[test]
    fn test_lenient_legacy_document() {
        let mut store = store(DeckConfig::new());
        let json = r##"{
            "ship_layout": {"length": 40, "width": 12},
            "vehicles": [
                {"id": 3, "name": "Van", "type": "van", "length": 5, "width": 2, "x": 0, "y": 0,
                 "color": "#FFD166", "icon": "🚐"}
            ]
        }"##;
        store.import_json(json).unwrap();

        assert_eq!(store.surface(), Surface::new(40.0, 12.0));
        assert_eq!(store.get(3).unwrap().category, VehicleCategory::Custom);
        assert_eq!(store.next_id(), 4);
        assert_eq!(store.add_preset(VehiclePreset::Motor).unwrap(), 4);
    }

    #[test]
    fn test_strict_policy_rejects_out_of_bounds() {
        let mut store = store(DeckConfig::new().with_import_policy(ImportPolicy::Strict));
        let json = r#"{"ship_layout": {"length": 10, "width": 5},
                       "vehicles": [{"id": 1, "length": 10, "width": 2.5, "x": 3, "y": 0}]}"#;
        assert!(matches!(store.import_json(json), Err(Error::InvalidSnapshot(_))));
        assert_eq!(store.surface(), Surface::new(50.0, 15.0));
    }
}

mod grid_tests {
    use super::*;

    #[test]
    fn test_grid_store_places_in_lanes() {
        let mut store = store(DeckConfig::new().with_grid(6, 1.0));
        let a = store.add_preset(VehiclePreset::SmallCar).unwrap();
        let b = store.add_preset(VehiclePreset::SmallCar).unwrap();
        let c = store.add_preset(VehiclePreset::Truck).unwrap();

        assert_eq!(store.get(a).unwrap().position(), Position::new(0.0, 0.0));
        assert_eq!(store.get(b).unwrap().position(), Position::new(2.5, 0.0));
        assert_eq!(store.get(c).unwrap().position(), Position::new(5.0, 0.0));
        assert_layout_valid(&store);
    }

    #[test]
    fn test_grid_lane_count_limits_width() {
        let mut store = store(DeckConfig::new().with_surface(20.0, 5.0).with_grid(2, 1.0));
        store.add_preset(VehiclePreset::Bus).unwrap();
        store.add_preset(VehiclePreset::Bus).unwrap();
        // Both lanes hold a bus for the first 12 rows; the motor goes behind.
        let motor = store.add_preset(VehiclePreset::Motor).unwrap();
        assert_eq!(store.get(motor).unwrap().position(), Position::new(0.0, 12.0));
        assert_layout_valid(&store);
    }

    #[test]
    fn test_lane_wide_vehicles_fill_every_lane() {
        for (width, lanes, vehicle_width) in [(8.7, 5, 1.74), (6.3, 7, 0.9), (5.6, 8, 0.7)] {
            let config = DeckConfig::new()
                .with_surface(20.0, width)
                .with_grid(lanes, 1.0);
            let mut store = store(config);
            for _ in 0..lanes {
                let spec = VehicleSpec::new("Car", VehicleCategory::SmallVehicle, 4.0, vehicle_width);
                store.add_vehicle(spec).unwrap();
            }
            assert_eq!(store.len(), lanes as usize);
            assert!(store.vehicles().iter().all(|v| v.y == 0.0), "{}m deck", width);
            assert_layout_valid(&store);
        }
    }

    #[test]
    fn test_repack_with_inexact_lanes_keeps_layout_valid() {
        let mut store = store(DeckConfig::new().with_surface(20.0, 8.7).with_grid(5, 1.0));
        let json = r#"{"vehicles": [
            {"id": 1, "type": "car", "length": 4, "width": 1.74, "x": 0, "y": 0},
            {"id": 2, "type": "car", "length": 4, "width": 1.74, "x": 1.74, "y": 0},
            {"id": 3, "type": "car", "length": 4, "width": 1.74, "x": 3.48, "y": 0},
            {"id": 4, "type": "car", "length": 4, "width": 1.74, "x": 5.22, "y": 0},
            {"id": 5, "type": "car", "length": 4, "width": 1.74, "x": 6.96, "y": 0}
        ]}"#;
        store.import_json(json).unwrap();
        assert_layout_valid(&store);

        let report = store.repack();
        assert!(report.rejected.is_empty());
        assert_eq!(report.placed, vec![1, 2, 3, 4, 5]);
        assert_layout_valid(&store);
    }

    #[test]
    fn test_grid_repack() {
        let mut store = store(DeckConfig::new().with_grid(6, 1.0));
        for preset in [VehiclePreset::Motor, VehiclePreset::Bus, VehiclePreset::MediumCar] {
            store.add_preset(preset).unwrap();
        }
        let report = store.repack();
        assert!(report.rejected.is_empty());
        assert_eq!(store.vehicles()[0].category, VehicleCategory::Bus);
        assert_layout_valid(&store);
    }
}

mod stats_tests {
    use super::*;

    #[test]
    fn test_stats_follow_the_store() {
        let mut store = store(DeckConfig::new());
        store.add_preset(VehiclePreset::Truck).unwrap();
        store.add_preset(VehiclePreset::Bus).unwrap();

        let stats = store.stats();
        assert_relative_eq!(stats.used_area, 55.0);
        assert_relative_eq!(stats.usage_percent, 100.0 * 55.0 / 750.0);
        assert_relative_eq!(stats.capacity_percent, 10.0);
        assert_eq!(stats.count(VehicleCategory::HeavyVehicle), 1);
        assert_eq!(stats.count(VehicleCategory::Bus), 1);

        store.clear();
        let stats = store.stats();
        assert_eq!(stats.vehicle_count, 0);
        assert_relative_eq!(stats.free_area, 750.0);
    }
}
