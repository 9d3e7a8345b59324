use super::*;

fn running_scene(width: f64, height: f64, seed: u64) -> ParticleGraphScene {
    let mut s = ParticleGraphScene::new(ParticleGraphConfig::default());
    s.initialize(width, height, seed);
    s
}

#[test]
fn initialization_is_fixed_size_and_in_bounds() {
    let s = running_scene(1920.0, 1080.0, 42);
    assert_eq!(s.state(), SceneState::Running);
    assert_eq!(s.particles().len(), 130);
    for p in s.particles() {
        assert!((0.0..=1920.0).contains(&p.pos.x));
        assert!((0.0..=1080.0).contains(&p.pos.y));
        assert!(p.vel.x.abs() <= s.config().max_speed);
        assert!(p.vel.y.abs() <= s.config().max_speed);
    }
}

#[test]
fn same_seed_reproduces_population() {
    let a = running_scene(800.0, 600.0, 7);
    let b = running_scene(800.0, 600.0, 7);
    assert_eq!(a.particles().len(), b.particles().len());
    for (pa, pb) in a.particles().iter().zip(b.particles()) {
        assert_eq!(pa.pos, pb.pos);
        assert_eq!(pa.vel, pb.vel);
    }
}

#[test]
fn thousand_frames_stay_in_bounds() {
    let mut s = running_scene(1920.0, 1080.0, 9);
    assert_eq!(s.config().connection_distance, 180.0);
    for frame in 0..1000u32 {
        s.update(f64::from(frame) * 16.7);
    }
    assert_eq!(s.particles().len(), 130);
    for p in s.particles() {
        assert!((0.0..=1920.0).contains(&p.pos.x), "x out of bounds: {}", p.pos.x);
        assert!((0.0..=1080.0).contains(&p.pos.y), "y out of bounds: {}", p.pos.y);
    }
}

#[test]
fn wall_contact_reflects_velocity() {
    let mut p = Particle {
        pos: Point::new(99.9, 50.0),
        vel: Vec2::new(0.05, 0.0),
    };
    integrate(&mut p, 16.0, 100.0, 100.0);
    assert!(p.vel.x < 0.0, "velocity must reflect, not clamp");
    assert!(p.pos.x <= 100.0);

    let mut p = Particle {
        pos: Point::new(50.0, 0.1),
        vel: Vec2::new(0.0, -0.05),
    };
    integrate(&mut p, 16.0, 100.0, 100.0);
    assert!(p.vel.y > 0.0);
    assert!(p.pos.y >= 0.0);
}

#[test]
fn zone_alpha_is_zero_inside_clear_band() {
    let cfg = ParticleGraphConfig::default();
    let h = 1000.0;
    // Clear band spans the middle 50% of the surface.
    assert_eq!(zone_alpha(500.0, h, &cfg), 0.0);
    assert_eq!(zone_alpha(250.0, h, &cfg), 0.0);
    assert_eq!(zone_alpha(750.0, h, &cfg), 0.0);
}

#[test]
fn zone_alpha_ramps_linearly_then_caps() {
    let cfg = ParticleGraphConfig::default();
    let h = 1000.0;
    let band_edge = 750.0;
    let a = zone_alpha(band_edge + 50.0, h, &cfg);
    assert!((a - 0.5).abs() < 1e-9);
    assert_eq!(zone_alpha(band_edge + 500.0, h, &cfg), cfg.max_alpha);
    assert_eq!(zone_alpha(0.0, h, &cfg), cfg.max_alpha);
}

#[test]
fn update_is_a_noop_unless_running() {
    let mut s = ParticleGraphScene::new(ParticleGraphConfig::default());
    s.update(100.0);
    assert!(s.particles().is_empty());

    let mut s = running_scene(800.0, 600.0, 3);
    s.update(0.0);
    s.stop();
    let frozen: Vec<Point> = s.particles().iter().map(|p| p.pos).collect();
    s.update(10_000.0);
    let after: Vec<Point> = s.particles().iter().map(|p| p.pos).collect();
    assert_eq!(frozen, after);
}

#[test]
fn reinitialize_replaces_population_same_count() {
    let mut s = running_scene(800.0, 600.0, 3);
    for frame in 0..50u32 {
        s.update(f64::from(frame) * 16.7);
    }
    let before: Vec<Point> = s.particles().iter().map(|p| p.pos).collect();
    s.initialize(1600.0, 600.0, 3);
    assert_eq!(s.particles().len(), 130);
    let after: Vec<Point> = s.particles().iter().map(|p| p.pos).collect();
    assert_ne!(before, after);
}

#[test]
fn config_validation_rejects_nonsense() {
    let cfg = ParticleGraphConfig {
        count: 0,
        ..ParticleGraphConfig::default()
    };
    assert!(cfg.validate().is_err());

    let cfg = ParticleGraphConfig {
        clear_band_frac: 0.7,
        ..ParticleGraphConfig::default()
    };
    assert!(cfg.validate().is_err());

    assert!(ParticleGraphConfig::default().validate().is_ok());
}
