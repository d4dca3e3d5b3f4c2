//! Unit tests for dd-core primitives.

#[cfg(test)]
mod ids {
    use crate::{AgentId, ResourceId};

    #[test]
    fn ordering_follows_issue_order() {
        let first = AgentId(0);
        assert!(first < first.next());
        assert_eq!(first.next().next(), AgentId(2));
    }

    #[test]
    fn serialize_as_bare_integers() {
        assert_eq!(serde_json::to_string(&AgentId(4)).unwrap(), "4");
        assert_eq!(serde_json::from_str::<ResourceId>("9").unwrap(), ResourceId(9));
    }

    #[test]
    fn display() {
        assert_eq!(AgentId(7).to_string(), "AgentId(7)");
        assert_eq!(ResourceId(3).to_string(), "ResourceId(3)");
    }
}

#[cfg(test)]
mod coord {
    use crate::Coordinate;

    #[test]
    fn manhattan_ignores_sign() {
        let a = Coordinate::new(1, 4);
        let b = Coordinate::new(3, 1);
        assert_eq!(a.manhattan(b), 5);
        assert_eq!(b.manhattan(a), 5);
        assert_eq!(a.manhattan(a), 0);
    }

    #[test]
    fn from_tuple_and_display() {
        let c: Coordinate = (-1, 2).into();
        assert_eq!(c, Coordinate::new(-1, 2));
        assert_eq!(c.to_string(), "(-1, 2)");
        assert_eq!(c.offset(1, -2), Coordinate::ORIGIN);
    }
}

#[cfg(test)]
mod time {
    use crate::{ClockState, Cycle, SimClock};

    #[test]
    fn cycle_arithmetic() {
        let c = Cycle(10);
        assert_eq!(c.offset(3), Cycle(13));
        assert_eq!(c.to_string(), "C10");
    }

    #[test]
    fn clock_lifecycle() {
        let mut clock = SimClock::new();
        assert_eq!(clock.state, ClockState::Created);
        assert!(!clock.is_running());

        assert!(clock.start());
        assert!(clock.is_running());
        assert!(!clock.start(), "start is only valid from Created");

        clock.advance();
        clock.advance();
        assert_eq!(clock.current, Cycle(2));

        clock.stop();
        assert_eq!(clock.state, ClockState::Stopped);
        assert!(!clock.start());
    }
}

#[cfg(test)]
mod rng {
    use crate::{SimRng, mix_seed};

    #[test]
    fn same_seed_same_sequence() {
        let mut a = SimRng::new(99);
        let mut b = SimRng::new(99);
        let xs: Vec<u64> = (0..16).map(|_| a.random()).collect();
        let ys: Vec<u64> = (0..16).map(|_| b.random()).collect();
        assert_eq!(xs, ys);
    }

    #[test]
    fn different_seeds_diverge() {
        let mut a = SimRng::new(1);
        let mut b = SimRng::new(2);
        let xs: Vec<u64> = (0..4).map(|_| a.random()).collect();
        let ys: Vec<u64> = (0..4).map(|_| b.random()).collect();
        assert_ne!(xs, ys);
    }

    #[test]
    fn gen_range_stays_in_range() {
        let mut rng = SimRng::new(5);
        for _ in 0..1_000 {
            let v: i64 = rng.gen_range(3..7);
            assert!((3..7).contains(&v));
        }
    }

    #[test]
    fn choose_empty_is_none() {
        let mut rng = SimRng::new(0);
        let empty: [u8; 0] = [];
        assert!(rng.choose(&empty).is_none());
        assert_eq!(rng.choose(&[4]), Some(&4));
    }

    #[test]
    fn mix_seed_spreads_keys() {
        assert_ne!(mix_seed(7, 0), mix_seed(7, 1));
        assert_ne!(mix_seed(7, 0), 7);
        assert_eq!(mix_seed(7, 3), mix_seed(7, 3));
    }
}

#[cfg(test)]
mod config {
    use crate::config::attr;
    use crate::{DdError, SimConfig, StrategyKind, StrategySpec, StrategySpecMap};

    #[test]
    fn defaults_validate() {
        let config = SimConfig::default();
        config.validate().unwrap();
        assert_eq!(config.world.width, 10);
        assert!(!config.world.torus);
        assert!(config.arena.contains(attr::SEED_PLACEMENT));
        assert!(config.resources.contains(attr::MAX_TOTAL_ENERGY));
    }

    #[test]
    fn zero_width_rejected() {
        let mut config = SimConfig::default();
        config.world.width = 0;
        assert!(matches!(config.validate(), Err(DdError::Config(_))));
    }

    #[test]
    fn missing_stop_condition_rejected() {
        let mut config = SimConfig::default();
        config.stop.max_cycles = None;
        config.stop.stop_on_extinction = false;
        assert!(config.validate().is_err());
    }

    #[test]
    fn spec_map_keeps_document_order() {
        let json = r#"{
            "seed": 3,
            "world": { "width": 5, "height": 4 },
            "arena": {
                "Zeta":  { "type": "Generation", "function": "fixed_value", "args": { "value": 3 } },
                "Alpha": { "type": "Placement", "function": "random_location", "dependency": "Zeta" }
            }
        }"#;
        let config = SimConfig::from_json_str(json).unwrap();
        let names: Vec<&str> = config.arena.iter().map(|(n, _)| n).collect();
        assert_eq!(names, ["Zeta", "Alpha"]);

        let alpha = config.arena.get("Alpha").unwrap();
        assert_eq!(alpha.kind, StrategyKind::Placement);
        assert_eq!(alpha.dependency.as_deref(), Some("Zeta"));
        assert_eq!(config.arena.get("Zeta").unwrap().args.get("value"), Some(3.0));

        // Omitted sections fall back to defaults.
        assert!(!config.world.torus);
        assert_eq!(config.resources, StrategySpecMap::default_resources());
    }

    #[test]
    fn duplicate_attribute_is_a_parse_error() {
        let json = r#"{
            "seed": 1,
            "arena": {
                "A": { "type": "Generation", "function": "fixed_value" },
                "A": { "type": "Generation", "function": "fixed_value" }
            }
        }"#;
        assert!(matches!(SimConfig::from_json_str(json), Err(DdError::Parse(_))));
    }

    #[test]
    fn json_round_trip_preserves_config() {
        let config = SimConfig::default();
        let text = config.to_json_pretty().unwrap();
        assert_eq!(SimConfig::from_json_str(&text).unwrap(), config);
    }

    #[test]
    fn insert_replaces_in_place() {
        let mut map = StrategySpecMap::new()
            .with("A", StrategySpec::generation("fixed_value"))
            .with("B", StrategySpec::generation("fixed_value"));
        map.insert("A", StrategySpec::generation("uniform_distribution"));
        let names: Vec<&str> = map.iter().map(|(n, _)| n).collect();
        assert_eq!(names, ["A", "B"]);
        assert_eq!(map.get("A").unwrap().function, "uniform_distribution");
    }

    #[test]
    fn snapshot_interval() {
        let mut config = SimConfig::default();
        config.output_interval_cycles = 3;
        assert!(config.is_snapshot_cycle(crate::Cycle(0)));
        assert!(!config.is_snapshot_cycle(crate::Cycle(2)));
        assert!(config.is_snapshot_cycle(crate::Cycle(6)));
        config.output_interval_cycles = 0;
        assert!(!config.is_snapshot_cycle(crate::Cycle(0)));
    }
}
