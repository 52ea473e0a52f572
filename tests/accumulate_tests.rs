// Bounded accumulation against the full-scan reference, plus a golden value.

use rain_ripples::constants::{CAPILLARY_DAMPING_RATIO, SPLASH_CROWN_DEPTH};
use rain_ripples::{
    accumulate, accumulate_full_scan, accumulate_par_rows, cell_jitter, sample_cell, Grid,
    InkChannels, InkInjection, RippleConfig, World,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn max_abs_diff(a: &[f32], b: &[f32]) -> f32 {
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y).abs())
        .fold(0.0, f32::max)
}

#[test]
fn bounded_matches_full_scan_on_random_drops() {
    let grid = Grid::new(160, 120);
    let config = RippleConfig {
        drops: 6,
        seed: 3,
        ink: true,
        ..RippleConfig::default()
    };
    let mut rng = StdRng::seed_from_u64(0xD20F);
    for round in 0..8 {
        let mut world = World::new(&config);
        world.init(0.0);
        let mut drops = world.drops().to_vec();
        for d in &mut drops {
            d.x = rng.gen_range(-20.0..180.0);
            d.y = rng.gen_range(-20.0..140.0);
            d.t0 = rng.gen_range(0.0..1.2);
        }
        let t = rng.gen_range(0.0..1.6);

        let mut bounded = vec![0.0; grid.len()];
        let mut reference = vec![0.0; grid.len()];
        let mut ink_b = InkChannels::new(grid.len());
        let mut ink_r = InkChannels::new(grid.len());
        accumulate(
            grid,
            &mut bounded,
            Some(InkInjection {
                channels: &mut ink_b,
                gain: 1.0,
            }),
            &drops,
            t,
        );
        accumulate_full_scan(
            grid,
            &mut reference,
            Some(InkInjection {
                channels: &mut ink_r,
                gain: 1.0,
            }),
            &drops,
            t,
        );

        let dh = max_abs_diff(&bounded, &reference);
        assert!(dh < 3e-3, "round {round}: height diff {dh}");
        for (a, b) in [(&ink_b.r, &ink_r.r), (&ink_b.g, &ink_r.g), (&ink_b.b, &ink_r.b)] {
            let di = max_abs_diff(a, b);
            assert!(di < 3e-3, "round {round}: ink diff {di}");
        }
    }
}

#[test]
fn row_parallel_matches_sequential_bitwise() {
    let config = RippleConfig {
        drops: 12,
        seed: 21,
        ..RippleConfig::default()
    };
    let mut world = World::new(&config);
    world.init(0.0);
    let grid = world.grid();
    for t in [0.05, 0.2, 0.9, 1.7] {
        let mut seq = vec![0.0; grid.len()];
        let mut par = vec![0.0; grid.len()];
        accumulate(grid, &mut seq, None, world.drops(), t);
        accumulate_par_rows(grid, &mut par, None, world.drops(), t);
        assert_eq!(seq, par, "t = {t}");
    }
}

#[test]
fn ink_persists_between_passes() {
    let config = RippleConfig {
        drops: 2,
        seed: 4,
        ink: true,
        ..RippleConfig::default()
    };
    let mut world = World::new(&config);
    world.init(0.0);
    let grid = world.grid();
    let mut field = vec![0.0; grid.len()];
    let mut ink = InkChannels::new(grid.len());
    for _ in 0..2 {
        accumulate(
            grid,
            &mut field,
            Some(InkInjection {
                channels: &mut ink,
                gain: 0.5,
            }),
            world.drops(),
            0.5,
        );
    }
    let mut once = InkChannels::new(grid.len());
    accumulate(
        grid,
        &mut field,
        Some(InkInjection {
            channels: &mut once,
            gain: 0.5,
        }),
        world.drops(),
        0.5,
    );
    let total_twice: f32 = ink.r.iter().chain(&ink.g).chain(&ink.b).sum();
    let total_once: f32 = once.r.iter().chain(&once.g).chain(&once.b).sum();
    assert!(total_once > 0.0);
    assert!((total_twice - 2.0 * total_once).abs() <= 1e-3 * total_twice);
}

#[test]
fn golden_value_at_drop_centre() {
    let config = RippleConfig {
        width: 640,
        height: 480,
        drops: 1,
        seed: 42,
        ..RippleConfig::default()
    };
    let mut world = World::new(&config);
    world.init(0.0);
    // centre of cell (320, 240)
    {
        let d = &mut world.drops_mut()[0];
        d.x = 320.5;
        d.y = 240.5;
        d.t0 = 2.0;
    }
    let d = world.drops()[0];
    let t = d.t0 + 0.1;
    let grid = world.grid();
    let mut field = vec![0.0; grid.len()];
    let mut ink = InkChannels::new(grid.len());
    let gain = 0.6;
    accumulate(
        grid,
        &mut field,
        Some(InkInjection {
            channels: &mut ink,
            gain,
        }),
        world.drops(),
        t,
    );
    let got = field[grid.index(320, 240)];

    let tau = t - d.t0;
    let dist = cell_jitter(320, 240);
    let ring = d.speed * tau;
    let att = 1.0 / (1.0 + 0.015 * dist).sqrt();
    let s = (dist - ring) / d.sigma;
    let main = d.a0 * (-d.alpha * tau).exp() * (-s * (-0.5 * s * s).exp()) * att;
    let s1 = (dist - (ring - d.cap_delta)) / d.cap_sigma;
    let s2 = (dist - (ring + d.cap_delta)) / d.cap_sigma;
    let g = |s: f32| -s * (-0.5 * s * s).exp();
    let cap = d.cap_gain
        * d.a0
        * (-d.alpha * CAPILLARY_DAMPING_RATIO * tau).exp()
        * 0.5
        * (g(s1) + g(s2))
        * att;
    // at the exact centre the crown angle is zero
    let splash = d.splash_amp
        * (-d.splash_decay * tau).exp()
        * (1.0 + SPLASH_CROWN_DEPTH * d.splash_phase.cos());
    let want = main + cap + splash;

    assert!((got - want).abs() < 1e-5, "{got} vs {want}");
    assert_eq!(got, sample_cell(320, 240, t, &d));
    assert!(got > 0.0);

    // ink deposit: gain * exp(-alpha tau) * exp(-s^2 / 2) * att * tint, at the
    // centre and on the crest where the envelope peaks
    let crest_x = 320 + ring.round() as usize;
    for (x, y) in [(320, 240), (crest_x, 240)] {
        let dx = x as f32 + 0.5 - d.x;
        let dy = y as f32 + 0.5 - d.y;
        let dist = (dx * dx + dy * dy).sqrt() + cell_jitter(x, y);
        let att = 1.0 / (1.0 + 0.015 * dist).sqrt();
        let s = (dist - ring) / d.sigma;
        let w = gain * (-d.alpha * tau).exp() * (-0.5 * s * s).exp() * att;
        let idx = grid.index(x, y);
        let deposited = [ink.r[idx], ink.g[idx], ink.b[idx]];
        for c in 0..3 {
            let want = w * d.tint[c];
            assert!(
                (deposited[c] - want).abs() <= 1e-5 * want.abs() + 1e-9,
                "channel {c} at ({x}, {y}): {} vs {want}",
                deposited[c]
            );
        }
    }
    let crest = grid.index(crest_x, 240);
    assert!(ink.r[crest] > 0.1 * gain * d.tint[0] * (-d.alpha * tau).exp());
}
