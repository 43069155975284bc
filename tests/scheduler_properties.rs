//! Whole-plan properties of the rebuild algorithm.

use chrono::NaiveDate;

use iterplan::backlog::Backlog;
use iterplan::calendar;
use iterplan::config::ProjectConfig;
use iterplan::scheduler::{rebuild, IterationPlan};
use iterplan::story::{Column, Story};

fn config() -> ProjectConfig {
    ProjectConfig {
        name: "props".to_string(),
        // 2011-07-25 is a Monday
        start_date: Some("2011/07/25".to_string()),
        iteration_start_day: 1,
        iteration_length: 1,
        default_velocity: 10,
    }
}

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

fn story(id: u64, column: Column, estimate: u32) -> Story {
    Story {
        estimate: Some(estimate),
        ..Story::new(id, column)
    }
}

fn done_story(id: u64, estimate: u32, iteration_number: u32) -> Story {
    Story {
        iteration_number: Some(iteration_number),
        ..story(id, Column::Done, estimate)
    }
}

fn assert_contiguous(plan: &IterationPlan) {
    let numbers: Vec<u32> = plan.iterations.iter().map(|i| i.number).collect();
    assert!(!numbers.is_empty());
    let expected: Vec<u32> = (numbers[0]..=*numbers.last().unwrap()).collect();
    assert_eq!(numbers, expected, "iteration numbers must be an unbroken run");
}

fn assert_capacity(plan: &IterationPlan) {
    for iteration in &plan.iterations {
        if iteration.column != Column::Backlog {
            continue;
        }
        let maximum = iteration.maximum_points.expect("backlog iterations are capped");
        if iteration.points() > maximum {
            // Single-story overflow is the only permitted excess
            assert_eq!(
                iteration.stories.len(),
                1,
                "multi-story overflow in iteration {}",
                iteration.number
            );
            assert!(iteration.stories[0].points() > maximum);
        }
    }
}

fn assert_conservation(plan: &IterationPlan, mut expected_ids: Vec<u64>) {
    let mut placed: Vec<u64> = plan
        .iterations
        .iter()
        .flat_map(|iteration| iteration.stories.iter().map(|s| s.id))
        .collect();
    placed.sort_unstable();
    expected_ids.sort_unstable();
    assert_eq!(placed, expected_ids, "stories lost or duplicated");
}

#[test]
fn mixed_backlog_preserves_all_invariants() {
    let stories = vec![
        done_story(1, 4, 1),
        done_story(2, 6, 1),
        done_story(3, 5, 4),
        story(4, Column::InProgress, 2),
        story(5, Column::InProgress, 3),
        story(6, Column::Backlog, 8),
        story(7, Column::Backlog, 1),
        story(8, Column::Backlog, 13),
        story(9, Column::Backlog, 2),
        story(10, Column::Backlog, 2),
        story(11, Column::Backlog, 5),
    ];
    let ids: Vec<u64> = stories.iter().map(|s| s.id).collect();
    let backlog = Backlog::from_stories(stories);

    let plan = rebuild(&config(), &backlog, date(2011, 9, 5)).expect("rebuild");

    assert_contiguous(&plan);
    assert_capacity(&plan);
    assert_conservation(&plan, ids);
    assert!(plan.velocity >= 1);
}

#[test]
fn heavily_overflowing_backlog_stays_contiguous() {
    let stories = vec![
        done_story(1, 1, 1),
        done_story(2, 1, 2),
        done_story(3, 1, 3),
        story(4, Column::InProgress, 1),
        story(5, Column::Backlog, 7),
        story(6, Column::Backlog, 3),
        story(7, Column::Backlog, 1),
        story(8, Column::Backlog, 11),
        story(9, Column::Backlog, 1),
    ];
    let ids: Vec<u64> = stories.iter().map(|s| s.id).collect();
    let backlog = Backlog::from_stories(stories);

    // Velocity 1 forces every multi-point story into single-story overflow
    let plan = rebuild(&config(), &backlog, date(2011, 8, 15)).expect("rebuild");
    assert_eq!(plan.velocity, 1);

    assert_contiguous(&plan);
    assert_capacity(&plan);
    assert_conservation(&plan, ids);
}

#[test]
fn velocity_floor_holds_for_zero_point_history() {
    let backlog = Backlog::from_stories(vec![
        done_story(1, 0, 1),
        done_story(2, 0, 2),
        done_story(3, 0, 3),
    ]);
    let plan = rebuild(&config(), &backlog, date(2011, 8, 15)).expect("rebuild");
    assert_eq!(plan.velocity, 1);
}

#[test]
fn default_velocity_used_without_history() {
    // Scenario B: zero done iterations
    let backlog = Backlog::from_stories(vec![story(1, Column::Backlog, 3)]);
    let plan = rebuild(&config(), &backlog, date(2011, 8, 15)).expect("rebuild");
    assert_eq!(plan.velocity, 10);
}

#[test]
fn velocity_averages_last_three_done_iterations() {
    // Scenario C: three done iterations with points [8, 12, 10]
    let backlog = Backlog::from_stories(vec![
        done_story(1, 8, 1),
        done_story(2, 12, 2),
        done_story(3, 10, 3),
    ]);
    let plan = rebuild(&config(), &backlog, date(2011, 8, 15)).expect("rebuild");
    assert_eq!(plan.velocity, 10);
}

#[test]
fn current_iteration_tracks_today() {
    // Scenario A: two-week iterations starting Monday, project start on a
    // Wednesday canonicalizes to the Monday two days prior
    let config = ProjectConfig {
        start_date: Some("2011/07/27".to_string()),
        iteration_length: 2,
        ..config()
    };

    let monday = date(2011, 7, 25);
    let number = calendar::iteration_number_for_date(&config, monday, monday).expect("number");
    assert_eq!(number, 1);

    let two_weeks_later = date(2011, 8, 8);
    let number =
        calendar::iteration_number_for_date(&config, monday, two_weeks_later).expect("number");
    assert_eq!(number, 2);
}

#[test]
fn date_round_trips_for_all_iteration_numbers() {
    for length in 1..=4u32 {
        let config = ProjectConfig {
            iteration_length: length,
            ..config()
        };
        let fallback = date(2011, 7, 25);
        for number in 1..=50u32 {
            let start =
                calendar::date_for_iteration_number(&config, fallback, number).expect("date");
            let roundtrip =
                calendar::iteration_number_for_date(&config, fallback, start).expect("number");
            assert_eq!(roundtrip, number, "length {length}, iteration {number}");
        }
    }
}

#[test]
fn in_progress_iteration_precedes_first_backlog_iteration() {
    let backlog = Backlog::from_stories(vec![story(1, Column::Backlog, 4)]);
    let plan = rebuild(&config(), &backlog, date(2011, 8, 15)).expect("rebuild");

    let current_position = plan
        .iterations
        .iter()
        .position(|i| i.column == Column::InProgress)
        .expect("in-progress iteration");
    let first_backlog_position = plan
        .iterations
        .iter()
        .position(|i| i.column == Column::Backlog)
        .expect("backlog iteration");

    assert_eq!(plan.iterations[current_position].number, plan.current_iteration_number);
    assert_eq!(first_backlog_position, current_position + 1);
}
