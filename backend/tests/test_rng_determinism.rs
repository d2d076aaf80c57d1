//! Tests for deterministic randomness
//!
//! Same seed MUST produce the same sequence.

use pizza_shop_core_rs::{RandomSource, RngManager, ScriptedRng};

#[test]
fn test_rng_next_deterministic() {
    let mut rng1 = RngManager::new(12345);
    let mut rng2 = RngManager::new(12345);

    for _ in 0..100 {
        assert_eq!(rng1.next(), rng2.next(), "RNG not deterministic!");
    }
}

#[test]
fn test_rng_different_seeds_different_sequences() {
    let mut rng1 = RngManager::new(12345);
    let mut rng2 = RngManager::new(54321);

    assert_ne!(
        rng1.next(),
        rng2.next(),
        "Different seeds should produce different values"
    );
}

#[test]
fn test_price_range_stays_inclusive() {
    let mut rng = RngManager::new(2024);
    let mut min_seen = i64::MAX;
    let mut max_seen = i64::MIN;

    for _ in 0..5_000 {
        let price = rng.int_inclusive(100, 200);
        assert!((100..=200).contains(&price), "price {} out of range", price);
        min_seen = min_seen.min(price);
        max_seen = max_seen.max(price);
    }

    assert_eq!(min_seen, 100);
    assert_eq!(max_seen, 200);
}

#[test]
fn test_scripted_values_are_clamped() {
    let mut rng = ScriptedRng::new([7, -3]);
    assert_eq!(rng.int_inclusive(0, 2), 2);
    assert_eq!(rng.int_inclusive(0, 2), 0);
    assert_eq!(rng.remaining(), 0);
}

#[test]
fn test_scripted_exhaustion_returns_min() {
    let mut rng = ScriptedRng::new([1]);
    rng.int_inclusive(0, 2);
    assert_eq!(rng.int_inclusive(100, 200), 100);

    rng.push(150);
    assert_eq!(rng.int_inclusive(100, 200), 150);
}

#[test]
fn test_boxed_source_delegates() {
    let mut boxed: Box<dyn RandomSource> = Box::new(ScriptedRng::new([1]));
    assert_eq!(boxed.int_inclusive(0, 2), 1);
}
