use super::*;

fn running_scene(seed: u64) -> StrandScene {
    let mut s = StrandScene::new(StrandConfig::default());
    s.initialize(1920.0, 1080.0, seed);
    s.update(1234.0);
    s
}

#[test]
fn taper_is_solid_until_forty_percent() {
    assert_eq!(taper_at(0.0), 1.0);
    assert_eq!(taper_at(0.25), 1.0);
    assert_eq!(taper_at(0.4), 1.0);
}

#[test]
fn taper_dissolves_monotonically_to_zero() {
    let mut prev = 1.0;
    let mut progress = 0.4;
    while progress <= 1.0 {
        let t = taper_at(progress);
        assert!(t <= prev + 1e-12, "taper must not increase past 0.4");
        prev = t;
        progress += 0.01;
    }
    assert!(taper_at(1.0) <= 0.005);
}

#[test]
fn helix_zone_endpoints_taper_as_specified() {
    let s = running_scene(11);
    let start_x = 0.30 * 1920.0;
    let end_x = 0.70 * 1920.0;
    assert_eq!(s.sample(start_x, 0).taper, 1.0);
    assert!(s.sample(end_x, 0).taper < 0.01);
}

#[test]
fn lattice_spawns_in_region_with_valid_targets() {
    let s = running_scene(5);
    assert_eq!(s.nodes().len(), 25);
    for node in s.nodes() {
        assert!((0.05 * 1920.0..=0.22 * 1920.0).contains(&node.base.x));
        assert!((0.35 * 1080.0..=0.85 * 1080.0).contains(&node.base.y));
        assert!(node.target_strand < 4);
    }
}

#[test]
fn same_seed_reproduces_lattice() {
    let a = running_scene(5);
    let b = running_scene(5);
    for (na, nb) in a.nodes().iter().zip(b.nodes()) {
        assert_eq!(na.base, nb.base);
        assert_eq!(na.phase, nb.phase);
        assert_eq!(na.target_strand, nb.target_strand);
    }
}

#[test]
fn nodes_drift_around_anchors_without_translating() {
    let mut s = running_scene(5);
    let anchors: Vec<Point> = s.nodes().iter().map(|n| n.base).collect();
    for step in 0..200u32 {
        s.update(f64::from(step) * 333.0);
        for (node, &anchor) in s.nodes().iter().zip(&anchors) {
            assert_eq!(node.base, anchor, "anchors are immutable");
            let dx = (node.pos.x - anchor.x).abs();
            let dy = (node.pos.y - anchor.y).abs();
            assert!(dx <= 15.0 + 1e-9 && dy <= 15.0 + 1e-9);
        }
    }
}

#[test]
fn atoms_are_depth_sorted_ascending() {
    for t_ms in [0.0, 750.0, 4321.0, 60_000.0] {
        let mut s = running_scene(13);
        s.update(t_ms);
        let atoms = s.molecule_atoms();
        assert!(!atoms.is_empty());
        for pair in atoms.windows(2) {
            assert!(pair[0].depth <= pair[1].depth, "draw order must be far to near");
        }
        for atom in &atoms {
            assert!((-1.0..=1.0).contains(&atom.depth));
        }
    }
}

#[test]
fn dissolved_tail_emits_no_atoms() {
    let s = running_scene(13);
    let end_x = 0.70 * 1920.0;
    for atom in s.molecule_atoms() {
        assert!(atom.pos.x < end_x, "fully tapered samples must be skipped");
    }
}

#[test]
fn wave_phase_uses_the_outward_sign_convention() {
    // The sign pairing is `-ω·t + k·x`: phase falls as time advances at any
    // fixed point, and rises with distance under the pure spatial term.
    let total = 1920.0 - 0.70 * 1920.0;
    for dist in [10.0, 200.0, 500.0] {
        let mut early = running_scene(3);
        early.update(1000.0);
        let mut late = running_scene(3);
        late.update(2000.0);
        assert!(late.wave_phase(dist, total) < early.wave_phase(dist, total));
    }
    let mut t0 = running_scene(3);
    t0.update(0.0);
    assert!(t0.wave_phase(300.0, total) > t0.wave_phase(100.0, total));
}

#[test]
fn feeder_highlights_cycle_with_one_active_unit_in_four() {
    assert_eq!(feeder_highlight_progress(0.0, 1.0, 0.0), Some(0.0));
    assert_eq!(feeder_highlight_progress(0.5, 1.0, 0.0), Some(0.5));
    assert_eq!(feeder_highlight_progress(2.0, 1.0, 0.0), None);
    assert_eq!(feeder_highlight_progress(3.9, 1.0, 0.0), None);
    let p = feeder_highlight_progress(4.25, 1.0, 0.0).unwrap();
    assert!((p - 0.25).abs() < 1e-9);
    // Phase staggers the window per node.
    assert_eq!(feeder_highlight_progress(0.0, 1.0, 2.0), None);
    assert_eq!(feeder_highlight_progress(2.5, 1.0, 2.0), Some(0.5));
}

#[test]
fn config_validation_rejects_nonsense() {
    let cfg = StrandConfig {
        helix_zone: (0.7, 0.3),
        ..StrandConfig::default()
    };
    assert!(cfg.validate().is_err());

    let cfg = StrandConfig {
        steps: 0,
        ..StrandConfig::default()
    };
    assert!(cfg.validate().is_err());

    let cfg = StrandConfig {
        node_count: 0,
        ..StrandConfig::default()
    };
    assert!(cfg.validate().is_err());

    assert!(StrandConfig::default().validate().is_ok());
}
