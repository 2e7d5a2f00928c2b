use chrono::{Duration, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;

use adaptiq::engine::{curation, skills, weighting};
use adaptiq::models::ProgressionStrategy;

// --- Weighting ---

#[test]
fn never_used_question_gets_the_full_freshness_bonus() {
    let now = Utc::now();
    let w = weighting::weight(0, None, now, Duration::days(365));
    assert_eq!(w, 150.0);
}

#[test]
fn freshness_bonus_scales_with_the_time_gap_and_caps_at_the_horizon() {
    let now = Utc::now();
    let horizon = Duration::days(365);

    let just_used = weighting::weight(0, Some(now), now, horizon);
    assert!((just_used - 100.0).abs() < 0.01);

    let half_year = weighting::weight(0, Some(now - Duration::days(183)), now, horizon);
    assert!(half_year > 120.0 && half_year < 130.0);

    let beyond_horizon = weighting::weight(0, Some(now - Duration::days(800)), now, horizon);
    assert_eq!(beyond_horizon, 150.0);
}

#[test]
fn heavy_usage_is_floored_at_the_minimum_weight() {
    let now = Utc::now();
    let w = weighting::weight(1000, None, now, Duration::days(365));
    assert_eq!(w, 1.0);
}

#[test]
fn weighted_select_favors_heavy_candidates_and_covers_the_pool() {
    let mut rng = StdRng::seed_from_u64(7);
    let weights = [1.0, 1.0, 98.0];
    let mut hits = [0usize; 3];

    for _ in 0..1000 {
        let idx = weighting::weighted_select(&weights, &mut rng).expect("non-empty pool");
        hits[idx] += 1;
    }

    assert_eq!(hits.iter().sum::<usize>(), 1000);
    assert!(hits[2] > 900, "heavy candidate got {} of 1000", hits[2]);
}

#[test]
fn weighted_select_handles_degenerate_pools() {
    let mut rng = StdRng::seed_from_u64(1);
    assert_eq!(weighting::weighted_select(&[], &mut rng), None);
    assert_eq!(weighting::weighted_select(&[42.0], &mut rng), Some(0));
}

// --- Curation walk ---

#[test]
fn curation_walk_starts_easy_steps_by_one_and_stays_in_range() {
    for seed in 0..20 {
        let mut rng = StdRng::seed_from_u64(seed);
        let walk = curation::curation_walk(20, &mut rng);

        assert_eq!(walk.len(), 20);
        assert_eq!(walk[0], 1);
        assert!(walk.iter().all(|d| (1..=5).contains(d)));
        for pair in walk.windows(2) {
            assert!((pair[1] - pair[0]).abs() <= 1);
        }
    }
}

// --- Progression strategies ---

#[test]
fn immediate_strategy_steps_both_ways() {
    let s = ProgressionStrategy::Immediate;
    // start at 3: a correct answer promotes, the following miss demotes back
    assert_eq!(s.next_difficulty(3, true, &[true]), 4);
    assert_eq!(s.next_difficulty(4, false, &[true, false]), 3);
}

#[test]
fn immediate_strategy_clamps_at_the_bounds() {
    let s = ProgressionStrategy::Immediate;
    assert_eq!(s.next_difficulty(5, true, &[true]), 5);
    assert_eq!(s.next_difficulty(1, false, &[false]), 1);
}

#[test]
fn gradual_strategy_promotes_on_two_of_the_last_three() {
    let s = ProgressionStrategy::Gradual;
    assert_eq!(s.next_difficulty(2, false, &[true, true, false]), 3);
}

#[test]
fn gradual_strategy_never_demotes_before_three_answers() {
    let s = ProgressionStrategy::Gradual;
    assert_eq!(s.next_difficulty(3, false, &[false]), 3);
    assert_eq!(s.next_difficulty(3, false, &[false, false]), 3);
    assert_eq!(s.next_difficulty(3, false, &[false, false, false]), 2);
}

#[test]
fn gradual_strategy_promotes_early_when_both_answers_are_correct() {
    let s = ProgressionStrategy::Gradual;
    assert_eq!(s.next_difficulty(1, true, &[true, true]), 2);
}

#[test]
fn gradual_strategy_only_inspects_the_last_three() {
    let s = ProgressionStrategy::Gradual;
    // three early corrects, then three misses: the window says demote
    assert_eq!(
        s.next_difficulty(4, false, &[true, true, true, false, false, false]),
        3
    );
}

#[test]
fn ml_strategy_steps_toward_the_accuracy_target_without_jumping() {
    let s = ProgressionStrategy::MlBased;
    // perfect accuracy targets 5, but only one step is taken
    assert_eq!(s.next_difficulty(1, true, &[true]), 2);
    // zero accuracy targets 1
    assert_eq!(s.next_difficulty(4, false, &[false, false]), 3);
    // 50% accuracy targets ceil(2.5) = 3; already there
    assert_eq!(s.next_difficulty(3, true, &[true, false]), 3);
}

#[test]
fn ml_strategy_stays_in_range() {
    let s = ProgressionStrategy::MlBased;
    assert_eq!(s.next_difficulty(5, true, &[true, true, true]), 5);
    assert_eq!(s.next_difficulty(1, false, &[false]), 1);
}

// --- Skill aggregation tables ---

#[test]
fn skill_table_matches_the_platform_scale() {
    let t = skills::SkillTable::default();
    assert_eq!(t.points_delta(1, true), 1.0);
    assert_eq!(t.points_delta(1, false), -2.5);
    assert_eq!(t.points_delta(3, true), 3.0);
    assert_eq!(t.points_delta(3, false), -1.5);
    assert_eq!(t.points_delta(5, true), 5.0);
    assert_eq!(t.points_delta(5, false), -0.5);
}

#[test]
fn skill_levels_follow_the_thresholds() {
    assert_eq!(skills::level_for_points(0.0), 0);
    assert_eq!(skills::level_for_points(24.9), 0);
    assert_eq!(skills::level_for_points(25.0), 1);
    assert_eq!(skills::level_for_points(99.0), 2);
    assert_eq!(skills::level_for_points(100.0), 3);
    assert_eq!(skills::level_for_points(399.9), 4);
    assert_eq!(skills::level_for_points(400.0), 5);
    assert_eq!(skills::level_for_points(1000.0), 5);
}
