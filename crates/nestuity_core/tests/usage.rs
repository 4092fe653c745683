use nestuity_core::usage::{project, MISSING_WEIGHT_MESSAGE};
use nestuity_core::DiaperSupply;

fn supply(remaining: f64, per_box: f64, min_days: u32) -> DiaperSupply {
    DiaperSupply {
        remaining_diapers: remaining,
        diapers_per_box: per_box,
        preferred_min_days: min_days,
    }
}

#[test]
fn missing_weight_only_prompts() {
    for weight in [None, Some(0.0), Some(-1.0)] {
        let projection = project(weight, 8, &supply(100.0, 50.0, 14));
        assert_eq!(projection.message.as_deref(), Some(MISSING_WEIGHT_MESSAGE));
        assert_eq!(projection.remaining_supply, None);
        assert_eq!(projection.recommended_purchase, 0);
    }
}

#[test]
fn recommends_boxes_to_reach_preferred_supply() {
    // 50 diapers at 8 a day last 6 days; 14 - 6 = 8 days short, 64 diapers, 2 boxes of 40.
    let projection = project(Some(6.0), 8, &supply(50.0, 40.0, 14));
    assert_eq!(projection.days_left, 6);
    assert_eq!(projection.recommended_purchase, 2);
    assert_eq!(projection.remaining_supply, Some(50.0));
    assert!(projection.message.is_none());
}

#[test]
fn enough_supply_reports_days_left() {
    let projection = project(Some(6.0), 8, &supply(200.0, 40.0, 14));
    assert_eq!(projection.days_left, 25);
    assert_eq!(projection.recommended_purchase, 0);
    assert_eq!(
        projection.message.as_deref(),
        Some("You have enough diapers for at least 25 days!")
    );
}

#[test]
fn zero_usage_or_box_size_never_recommends() {
    assert_eq!(project(Some(6.0), 0, &supply(50.0, 40.0, 14)).days_left, 0);
    assert_eq!(project(Some(6.0), 0, &supply(50.0, 40.0, 14)).recommended_purchase, 0);
    assert_eq!(project(Some(6.0), 8, &supply(50.0, 0.0, 14)).recommended_purchase, 0);
    assert_eq!(project(Some(6.0), 8, &supply(50.0, 40.0, 0)).recommended_purchase, 0);
}

#[test]
fn boxes_convert_to_single_diapers() {
    let supply = DiaperSupply::from_boxes(1.5, 40.0, Some(7));
    let projection = project(Some(5.0), 10, &supply);
    assert_eq!(projection.days_left, 6);
    assert_eq!(projection.recommended_purchase, 1);
}
