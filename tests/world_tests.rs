// Drop pool lifecycle: expiry and the tint cycle.

use rain_ripples::constants::DROP_TINTS;
use rain_ripples::{RippleConfig, World};

fn world(drops: usize, spawn_rate: f32) -> World {
    let mut w = World::new(&RippleConfig {
        drops,
        seed: 7,
        spawn_rate,
        ..RippleConfig::default()
    });
    w.init(0.0);
    w
}

#[test]
fn expiry_uses_strict_inequality() {
    let mut w = world(1, 1.0);
    {
        let d = &mut w.drops_mut()[0];
        d.t0 = 1.0;
        d.max_life = 2.0;
    }
    let before = w.drops()[0];
    assert_eq!(w.maybe_respawn(3.0), 0);
    assert_eq!(w.drops()[0], before);
    assert_eq!(w.maybe_respawn(3.001), 1);
    assert_ne!(w.drops()[0], before);
}

#[test]
fn tints_cycle_across_respawns() {
    let mut w = world(3, 1.0);
    for (i, d) in w.drops().iter().enumerate() {
        assert_eq!(d.tint, DROP_TINTS[i]);
    }
    for d in w.drops_mut() {
        d.t0 = -100.0;
    }
    assert_eq!(w.maybe_respawn(0.0), 3);
    for (i, d) in w.drops().iter().enumerate() {
        assert_eq!(d.tint, DROP_TINTS[(3 + i) % DROP_TINTS.len()]);
    }
    assert_eq!(w.respawn_count(), 6);
    assert_eq!(w.next_tint(), 2);
}

#[test]
fn population_stays_constant() {
    let mut w = world(8, 4.0);
    let mut t = 0.0;
    let mut total = 0;
    while t < 20.0 {
        t += 1.0 / 30.0;
        total += w.maybe_respawn(t);
        assert_eq!(w.drops().len(), 8);
        for d in w.drops() {
            assert!(d.age(t) <= d.max_life);
        }
    }
    // lifetimes are 0.5..1 s at four times the rate
    assert!(total >= 8 * 15);
}

#[test]
fn spawn_rate_shortens_lifetimes() {
    let slow = world(64, 0.5);
    let fast = world(64, 5.0);
    let mean = |w: &World| w.drops().iter().map(|d| d.max_life).sum::<f32>() / 64.0;
    assert!(mean(&slow) > 4.0);
    assert!(mean(&fast) < 0.8);
}
