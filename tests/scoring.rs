use std::path::PathBuf;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use compass_harness::hooks::NoopObserver;
use compass_harness::scoring::{aggregate, Coordinates};
use compass_harness::style::{interpret, StylePosition};
use compass_harness::{
    generate_scenarios_seeded, load_config_from_path, AssessmentConfig, GeneratedScenario,
    RawResponse,
};

fn shipped_config() -> AssessmentConfig {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("config/assessments/scholarly-identity.json");
    load_config_from_path(path).unwrap()
}

/// Slider value that favors `category` with full strength, or neutral if the
/// scenario does not offer it.
fn favor(scenario: &GeneratedScenario, category: &str) -> i64 {
    if scenario.left_category == category {
        0
    } else if scenario.right_category == category {
        10
    } else {
        5
    }
}

#[test]
fn max_preference_for_first_pole_scores_minus_one() {
    let cfg = shipped_config();
    let scenarios = generate_scenarios_seeded(&cfg, 9).unwrap();
    let responses: Vec<RawResponse> = scenarios
        .iter()
        .map(|s| {
            let value = if s.dimension == "scope" {
                favor(s, "isolating")
            } else {
                5
            };
            RawResponse::new(&s.id, value)
        })
        .collect();

    let score = aggregate(&cfg, &scenarios, &responses, &NoopObserver).unwrap();
    assert!((score.coordinates.x + 1.0).abs() < 1e-12);
    assert_eq!(score.coordinates.y, 0.0);

    let isolating = score.category("isolating").unwrap();
    assert_eq!(isolating.appearances, 5);
    assert_eq!(isolating.raw_score, 25.0);
    assert_eq!(isolating.normalized_score, 1.0);

    let style = interpret(score.coordinates, &cfg);
    assert_eq!(style.position, StylePosition::BorderWest);
    assert_eq!(style.style, "Disciplinary Scholarship");
}

#[test]
fn scores_stay_in_range_for_random_responses() {
    let cfg = shipped_config();
    for seed in 0..50u64 {
        let scenarios = generate_scenarios_seeded(&cfg, seed).unwrap();
        let mut rng = StdRng::seed_from_u64(seed ^ 0xA5A5);
        let responses: Vec<RawResponse> = scenarios
            .iter()
            .map(|s| RawResponse::new(&s.id, rng.gen_range(0..=10)))
            .collect();
        let score = aggregate(&cfg, &scenarios, &responses, &NoopObserver).unwrap();

        for c in &score.category_scores {
            assert!((0.0..=1.0).contains(&c.normalized_score), "{c:?}");
            if c.appearances == 0 {
                assert_eq!(c.normalized_score, 0.0);
            }
        }
        for d in &score.dimension_scores {
            assert!((-1.0..=1.0).contains(&d.balance), "{d:?}");
            if d.score_a == 0.0 && d.score_b == 0.0 {
                assert_eq!(d.balance, 0.0);
            }
        }
        assert_eq!(score.total_questions, 10);
    }
}

#[test]
fn aggregate_is_idempotent() {
    let cfg = shipped_config();
    let scenarios = generate_scenarios_seeded(&cfg, 1).unwrap();
    let responses: Vec<RawResponse> = scenarios
        .iter()
        .enumerate()
        .map(|(i, s)| RawResponse::new(&s.id, (i as i64 * 3) % 11))
        .collect();

    let first = aggregate(&cfg, &scenarios, &responses, &NoopObserver).unwrap();
    let second = aggregate(&cfg, &scenarios, &responses, &NoopObserver).unwrap();
    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[test]
fn opposite_design_preference_mirrors_coordinates() {
    let cfg = shipped_config();
    let scenarios = generate_scenarios_seeded(&cfg, 4).unwrap();
    let respond = |scope: &str, purpose: &str| -> Vec<RawResponse> {
        scenarios
            .iter()
            .map(|s| {
                let target = if s.dimension == "scope" { scope } else { purpose };
                RawResponse::new(&s.id, favor(s, target))
            })
            .collect()
    };

    let clinical = aggregate(&cfg, &scenarios, &respond("merging", "design"), &NoopObserver)
        .unwrap();
    assert_eq!(clinical.coordinates, Coordinates::new(1.0, 1.0));
    assert_eq!(
        interpret(clinical.coordinates, &cfg).style,
        "Clinical Scholarship"
    );

    let theoretical = aggregate(
        &cfg,
        &scenarios,
        &respond("isolating", "descriptive"),
        &NoopObserver,
    )
    .unwrap();
    assert_eq!(theoretical.coordinates, Coordinates::new(-1.0, -1.0));
    assert_eq!(
        interpret(theoretical.coordinates, &cfg).position,
        StylePosition::Quadrant3
    );
}

#[test]
fn interpretation_table_matches_examples() {
    let cfg = shipped_config();
    assert_eq!(
        interpret(Coordinates::new(0.5, 0.5), &cfg).position,
        StylePosition::Quadrant1
    );
    assert_eq!(
        interpret(Coordinates::new(-0.05, 0.5), &cfg).position,
        StylePosition::BorderNorth
    );
    let center = interpret(Coordinates::new(0.0, 0.0), &cfg);
    assert_eq!(center.position, StylePosition::Center);
    assert_eq!(center.style, "The Entrepreneurial Scholar");
    assert_eq!(center.traits.len(), 3);
}

#[test]
fn missing_style_definition_falls_back_to_key() {
    let mut cfg = shipped_config();
    cfg.style_definitions.remove(StylePosition::Quadrant4);
    let style = interpret(Coordinates::new(0.8, -0.8), &cfg);
    assert_eq!(style.position, StylePosition::Quadrant4);
    assert_eq!(style.style, "quadrant4");
    assert!(style.description.is_empty());
    assert!(style.traits.is_empty());
}
