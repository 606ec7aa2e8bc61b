use std::time::Duration;

use delivery_rush_system_difficulty::difficulty;

#[test]
fn level_four_raises_wave_size_and_speed() {
    let difficulty = difficulty(4);

    assert_eq!(difficulty.min_enemies, 3);
    assert_eq!(difficulty.max_enemies, 5);
    assert_eq!(difficulty.spawn_interval, Duration::from_millis(1_400));
    assert!(
        (difficulty.speed_multiplier - 1.3).abs() < 1e-5,
        "expected multiplier 1.3, got {}",
        difficulty.speed_multiplier
    );
}

#[test]
fn curve_is_monotonic_in_every_parameter() {
    let mut previous = difficulty(1);
    for level in 2..=30 {
        let current = difficulty(level);
        assert!(current.min_enemies >= previous.min_enemies, "level {level}");
        assert!(current.max_enemies >= previous.max_enemies, "level {level}");
        assert!(current.min_enemies <= current.max_enemies, "level {level}");
        assert!(
            current.spawn_interval <= previous.spawn_interval,
            "level {level}"
        );
        assert!(
            current.spawn_interval >= Duration::from_millis(700),
            "level {level}"
        );
        assert!(
            current.speed_multiplier >= previous.speed_multiplier,
            "level {level}"
        );
        previous = current;
    }
}
