use glam::Vec3;
use msph_core::config::{EosMode, SimConfig};
use msph_core::grid::UniformGrid;
use msph_core::particle::ParticleSet;
use msph_core::pipeline::{alpha, pressure};

fn two_phase_config() -> SimConfig {
    let mut cfg = SimConfig::default();
    cfg.bound = [50.0, 50.0, 50.0];
    cfg.emitter.blocks = vec![];
    cfg.emitter.wall = None;
    cfg
}

/// One isolated particle with the given fractions, densities and pressure
/// already evaluated.
fn single_particle(cfg: &SimConfig, fractions: &[f32]) -> ParticleSet {
    let mut p = ParticleSet::new(
        vec![Vec3::new(25.0, 25.0, 25.0)],
        fractions.to_vec(),
        1,
        cfg.phases,
    );
    let mut grid = UniformGrid::new(
        cfg.bound_vec(),
        cfg.cell_size,
        cfg.h,
        cfg.cell_capacity,
        cfg.neighbor_capacity,
        1,
    );
    grid.build(&p.pos, 1);
    pressure::update(&mut p, &grid, cfg);
    p
}

#[test]
fn test_oversum_rescaled() {
    // alpha = (0.8, 0.5) sums to 1.3 and is rescaled by 1/1.3.
    let cfg = two_phase_config();
    let mut p = single_particle(&cfg, &[0.8, 0.5]);
    let p_before = p.pressure[0];

    alpha::normalize(&mut p, &cfg);

    assert!((p.alpha[0] - 0.8 / 1.3).abs() < 1e-6);
    assert!((p.alpha[1] - 0.5 / 1.3).abs() < 1e-6);

    // The pressure moved by exactly the EOS-consistent correction.
    let cases: [(f32, f32); 2] = [(0.8 / 1.3, 0.8), (0.5 / 1.3, 0.5)];
    let mut expected = 0.0f32;
    for (ph, (after, before)) in cases.iter().enumerate() {
        expected -= pressure::alpha_pressure_slope(&cfg, ph, p.rho_m[0], p.rho_bar[0])
            * (after - before);
    }
    let moved = p.pressure[0] - p_before;
    assert!(
        (moved - expected).abs() <= expected.abs() * 1e-4 + 1e-3,
        "pressure correction {moved} vs expected {expected}"
    );
}

#[test]
fn test_negative_fraction_clamped() {
    // alpha = (1.2, -0.2): the negative entry is clamped, the positive one
    // carries the whole total.
    let cfg = two_phase_config();
    let mut p = single_particle(&cfg, &[1.2, -0.2]);

    alpha::normalize(&mut p, &cfg);

    assert!((p.alpha[0] - 1.0).abs() < 1e-6, "alpha0 = {}", p.alpha[0]);
    assert_eq!(p.alpha[1], 0.0);
}

#[test]
fn test_all_zero_fractions_redistributed() {
    let cfg = two_phase_config();
    let mut p = single_particle(&cfg, &[0.0, 0.0]);

    alpha::normalize(&mut p, &cfg);

    assert!((p.alpha[0] - 0.5).abs() < 1e-6);
    assert!((p.alpha[1] - 0.5).abs() < 1e-6);
}

#[test]
fn test_normalize_is_idempotent() {
    let cfg = two_phase_config();
    let mut p = single_particle(&cfg, &[0.7, 0.6]);

    alpha::normalize(&mut p, &cfg);
    let first: Vec<f32> = p.alpha.clone();
    let p_first = p.pressure[0];

    alpha::normalize(&mut p, &cfg);

    for (a, b) in p.alpha.iter().zip(first.iter()) {
        assert!((a - b).abs() < 1e-6, "fractions changed on second pass");
    }
    assert!(
        (p.pressure[0] - p_first).abs() < 1e-3,
        "pressure changed on second pass: {} vs {p_first}",
        p.pressure[0]
    );
}

#[test]
fn test_post_invariants_for_many_inputs() {
    let cfg = two_phase_config();
    let inputs: &[[f32; 2]] = &[
        [0.5, 0.5],
        [1.0, 0.0],
        [0.0, 1.0],
        [2.0, 3.0],
        [-0.5, 1.2],
        [-1.0, -1.0],
        [1e-8, 0.0],
        [0.3, -0.1],
    ];
    for fractions in inputs {
        let mut p = single_particle(&cfg, fractions);
        alpha::normalize(&mut p, &cfg);

        let sum: f32 = p.alpha_row(0).iter().sum();
        assert!(
            (sum - 1.0).abs() < 1e-5,
            "input {fractions:?}: fractions sum to {sum}"
        );
        for a in p.alpha_row(0) {
            assert!(
                (0.0..=1.0 + 1e-6).contains(a),
                "input {fractions:?}: fraction {a} out of range"
            );
        }
    }
}

#[test]
fn test_correction_with_linear_eos() {
    let mut cfg = two_phase_config();
    cfg.eos_mode = EosMode::Linear;
    let mut p = single_particle(&cfg, &[0.8, 0.5]);
    let p_before = p.pressure[0];

    alpha::normalize(&mut p, &cfg);

    // Linear slope is density-independent: k3 * rho0.
    let expected = -(cfg.k3 * cfg.rho0[0] * (0.8 / 1.3 - 0.8)
        + cfg.k3 * cfg.rho0[1] * (0.5 / 1.3 - 0.5));
    let moved = p.pressure[0] - p_before;
    assert!(
        (moved - expected).abs() < expected.abs() * 1e-4 + 1e-3,
        "linear correction {moved} vs {expected}"
    );
}

#[test]
fn test_advection_conserves_uniform_fractions() {
    // Identical composition and zero velocity everywhere: both transport
    // terms vanish and the fractions stay put.
    let cfg = two_phase_config();
    let mut pos = Vec::new();
    let mut fractions = Vec::new();
    for x in 0..4 {
        for y in 0..4 {
            pos.push(Vec3::new(20.0 + x as f32 * 1.3, 20.0 + y as f32 * 1.3, 25.0));
            fractions.extend_from_slice(&[0.6, 0.4]);
        }
    }
    let n = pos.len();
    let mut p = ParticleSet::new(pos, fractions, n, 2);
    let mut grid = UniformGrid::new(
        cfg.bound_vec(),
        cfg.cell_size,
        cfg.h,
        cfg.cell_capacity,
        cfg.neighbor_capacity,
        n,
    );
    grid.build(&p.pos, n);
    pressure::update(&mut p, &grid, &cfg);

    let before = p.alpha.clone();
    let mut delta = vec![0.0; n * 2];
    alpha::advect(&mut p, &grid, &cfg, &mut delta);

    for (a, b) in p.alpha.iter().zip(before.iter()) {
        assert!(
            (a - b).abs() < 1e-6,
            "fractions drifted without any flow: {a} vs {b}"
        );
    }
}
