#![allow(clippy::unwrap_used)]

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::*;
use crate::analytics::{evaluate_budget, evaluate_trend};
use crate::config::{AlertThresholds, InsightConfig};
use crate::error::AnalyticsError;
use crate::models::{
    CategoryAggregate, CategoryId, CategorySeries, Impact, InsightKind, MonthlyAggregate, Severity,
};

fn series(amounts: &[Decimal]) -> Vec<MonthlyAggregate> {
    amounts
        .iter()
        .enumerate()
        .map(|(i, amount)| MonthlyAggregate {
            period_label: format!("2024-{:02}", i + 1),
            period_start: NaiveDate::from_ymd_opt(2024, i as u32 + 1, 1).unwrap(),
            total_amount: *amount,
        })
        .collect()
}

fn history(category: CategoryId, amounts: &[Decimal]) -> CategorySeries {
    CategorySeries {
        category,
        totals: series(amounts),
    }
}

fn config() -> InsightConfig {
    InsightConfig::default()
}

// ── Empty input ───────────────────────────────────────────────

#[test]
fn test_empty_inputs_give_no_insights() {
    let items = generate_insights(&InsightInputs::default(), &config()).unwrap();
    assert!(items.is_empty());
}

// ── Anomalies ─────────────────────────────────────────────────

#[test]
fn test_anomaly_above_threshold() {
    // baseline (100+100+100)/3 = 100, current 135 → +35%
    let hist = vec![history(CategoryId::Food, &[dec!(100), dec!(100), dec!(100), dec!(135)])];
    let inputs = InsightInputs {
        history: &hist,
        ..Default::default()
    };
    let items = generate_insights(&inputs, &config()).unwrap();
    assert_eq!(items.len(), 1);
    let item = &items[0];
    assert_eq!(item.kind, InsightKind::Anomaly);
    assert_eq!(item.impact, Impact::Negative);
    assert_eq!(item.category, Some(CategoryId::Food));
    assert_eq!(item.magnitude_percent, Some(dec!(35)));
    assert_eq!(item.title, "Unusual spending in Food & Dining");
    assert!(item.description.contains("35%"));
}

#[test]
fn test_anomaly_at_threshold_not_flagged() {
    let hist = vec![history(CategoryId::Food, &[dec!(100), dec!(125)])];
    let inputs = InsightInputs {
        history: &hist,
        ..Default::default()
    };
    assert!(generate_insights(&inputs, &config()).unwrap().is_empty());
}

#[test]
fn test_anomaly_just_above_threshold_flagged() {
    // 25.004% over baseline; rounds to 25.00 but still exceeds 25
    let hist = vec![history(CategoryId::Food, &[dec!(1000), dec!(1250.04)])];
    let inputs = InsightInputs {
        history: &hist,
        ..Default::default()
    };
    let items = generate_insights(&inputs, &config()).unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].id, "anomaly-food");
    assert_eq!(items[0].magnitude_percent, Some(dec!(25.00)));
}

#[test]
fn test_anomaly_huge_ratio_is_overflow_error() {
    let hist = vec![history(CategoryId::Food, &[dec!(1), dec!(10000000000000000000000000000)])];
    let inputs = InsightInputs {
        history: &hist,
        ..Default::default()
    };
    let err = generate_insights(&inputs, &config()).unwrap_err();
    assert!(matches!(err, AnalyticsError::Overflow { .. }));
}

#[test]
fn test_anomaly_uses_lookback_window_only() {
    // Only the last 3 prior periods count: (100+100+100)/3 = 100.
    // The old 1000 would otherwise push the baseline above current.
    let hist = vec![history(
        CategoryId::Shopping,
        &[dec!(1000), dec!(100), dec!(100), dec!(100), dec!(150)],
    )];
    let inputs = InsightInputs {
        history: &hist,
        ..Default::default()
    };
    let items = generate_insights(&inputs, &config()).unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].magnitude_percent, Some(dec!(50)));

    let wide = InsightConfig {
        lookback_periods: 4,
        ..config()
    };
    assert!(generate_insights(&inputs, &wide).unwrap().is_empty());
}

#[test]
fn test_anomaly_custom_threshold() {
    let hist = vec![history(CategoryId::Food, &[dec!(100), dec!(110)])];
    let inputs = InsightInputs {
        history: &hist,
        ..Default::default()
    };
    let strict = InsightConfig {
        anomaly_threshold_percent: dec!(5),
        ..config()
    };
    assert_eq!(generate_insights(&inputs, &strict).unwrap().len(), 1);
    assert!(generate_insights(&inputs, &config()).unwrap().is_empty());
}

#[test]
fn test_anomaly_skips_without_baseline() {
    let hist = vec![
        history(CategoryId::Food, &[dec!(500)]),
        history(CategoryId::Travel, &[Decimal::ZERO, Decimal::ZERO, dec!(900)]),
    ];
    let inputs = InsightInputs {
        history: &hist,
        ..Default::default()
    };
    assert!(generate_insights(&inputs, &config()).unwrap().is_empty());
}

// ── Budget warnings ───────────────────────────────────────────

#[test]
fn test_budget_warnings_only_for_alerts() {
    let t = AlertThresholds::default();
    let statuses = vec![
        evaluate_budget(CategoryId::Food, dec!(685), dec!(700), &t).unwrap(),
        evaluate_budget(CategoryId::Transport, dec!(10), dec!(300), &t).unwrap(),
        evaluate_budget(CategoryId::Shopping, dec!(720), dec!(700), &t).unwrap(),
    ];
    let inputs = InsightInputs {
        budget_statuses: &statuses,
        ..Default::default()
    };
    let items = generate_insights(&inputs, &config()).unwrap();
    assert_eq!(items.len(), 2);

    // exceeded ranks first
    assert_eq!(items[0].id, "budget-shopping");
    assert_eq!(items[0].kind, InsightKind::Warning);
    assert_eq!(items[0].severity, Severity::Critical);
    assert_eq!(items[0].impact, Impact::Negative);
    assert_eq!(items[0].magnitude_percent, Some(dec!(102.86)));

    assert_eq!(items[1].id, "budget-food");
    assert_eq!(items[1].impact, Impact::Neutral);
    assert_eq!(items[1].magnitude_percent, Some(dec!(97.86)));
    assert!(items[1].description.contains("98%"));
}

// ── Trends ────────────────────────────────────────────────────

#[test]
fn test_overall_trend_increase_is_negative() {
    let trend = evaluate_trend(&series(&[dec!(1200), dec!(1350)])).unwrap();
    let inputs = InsightInputs {
        trend: Some(&trend),
        ..Default::default()
    };
    let items = generate_insights(&inputs, &config()).unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].id, "trend-overall");
    assert_eq!(items[0].impact, Impact::Negative);
    assert_eq!(items[0].severity, Severity::Medium);
    assert_eq!(items[0].magnitude_percent, Some(dec!(12.5)));
    assert!(items[0].description.contains("12.5% more"));
}

#[test]
fn test_overall_trend_decrease_is_positive() {
    let trend = evaluate_trend(&series(&[dec!(1350), dec!(1100)])).unwrap();
    let inputs = InsightInputs {
        trend: Some(&trend),
        ..Default::default()
    };
    let items = generate_insights(&inputs, &config()).unwrap();
    assert_eq!(items[0].impact, Impact::Positive);
    assert_eq!(items[0].severity, Severity::Low);
    assert_eq!(items[0].magnitude_percent, Some(dec!(18.52)));
}

#[test]
fn test_overall_trend_from_zero() {
    let trend = evaluate_trend(&series(&[Decimal::ZERO, dec!(50)])).unwrap();
    let inputs = InsightInputs {
        trend: Some(&trend),
        ..Default::default()
    };
    let items = generate_insights(&inputs, &config()).unwrap();
    assert_eq!(items[0].magnitude_percent, None);
    assert_eq!(items[0].severity, Severity::High);
    assert!(items[0].description.contains("no spending"));
}

#[test]
fn test_category_trends_filtered_by_threshold() {
    let food = evaluate_trend(&series(&[dec!(100), dec!(105)])).unwrap();
    let transport = evaluate_trend(&series(&[dec!(200), dec!(164)])).unwrap();
    let health = evaluate_trend(&series(&[dec!(60), dec!(60)])).unwrap();
    let trends = vec![
        (CategoryId::Food, food),
        (CategoryId::Transport, transport),
        (CategoryId::Health, health),
    ];
    let inputs = InsightInputs {
        category_trends: &trends,
        ..Default::default()
    };
    let items = generate_insights(&inputs, &config()).unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].id, "trend-transport");
    assert_eq!(items[0].title, "Reduced Transportation costs");
    assert_eq!(items[0].impact, Impact::Positive);
    assert_eq!(items[0].magnitude_percent, Some(dec!(18)));
}

#[test]
fn test_category_trend_suppressed_when_anomalous() {
    let hist = vec![history(CategoryId::Food, &[dec!(100), dec!(200)])];
    let food_trend = evaluate_trend(&hist[0].totals).unwrap();
    let trends = vec![(CategoryId::Food, food_trend)];
    let inputs = InsightInputs {
        history: &hist,
        category_trends: &trends,
        ..Default::default()
    };
    let items = generate_insights(&inputs, &config()).unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].kind, InsightKind::Anomaly);
}

// ── Informational notes ───────────────────────────────────────

#[test]
fn test_top_category_note() {
    let aggregates = vec![
        CategoryAggregate {
            category: CategoryId::Food,
            total_amount: dec!(450),
            share_of_total: dec!(33.33),
        },
        CategoryAggregate {
            category: CategoryId::Utilities,
            total_amount: dec!(900),
            share_of_total: dec!(66.67),
        },
    ];
    let inputs = InsightInputs {
        category_aggregates: &aggregates,
        ..Default::default()
    };
    let items = generate_insights(&inputs, &config()).unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].id, "share-utilities");
    assert_eq!(items[0].impact, Impact::Neutral);
    assert_eq!(items[0].severity, Severity::Low);
}

#[test]
fn test_single_category_has_no_note() {
    let aggregates = vec![CategoryAggregate {
        category: CategoryId::Food,
        total_amount: dec!(450),
        share_of_total: dec!(100),
    }];
    let inputs = InsightInputs {
        category_aggregates: &aggregates,
        ..Default::default()
    };
    assert!(generate_insights(&inputs, &config()).unwrap().is_empty());
}

// ── Ranking ───────────────────────────────────────────────────

#[test]
fn test_ranking_severity_then_magnitude() {
    let t = AlertThresholds::default();
    let statuses = vec![
        evaluate_budget(CategoryId::Food, dec!(685), dec!(700), &t).unwrap(),
        evaluate_budget(CategoryId::Travel, dec!(1500), dec!(1000), &t).unwrap(),
        evaluate_budget(CategoryId::Shopping, dec!(720), dec!(700), &t).unwrap(),
    ];
    let hist = vec![
        history(CategoryId::Entertainment, &[dec!(100), dec!(140)]),
        history(CategoryId::Health, &[dec!(100), dec!(300)]),
    ];
    let trend = evaluate_trend(&series(&[dec!(1000), dec!(900)])).unwrap();
    let aggregates = vec![
        CategoryAggregate {
            category: CategoryId::Travel,
            total_amount: dec!(1500),
            share_of_total: dec!(60),
        },
        CategoryAggregate {
            category: CategoryId::Food,
            total_amount: dec!(1000),
            share_of_total: dec!(40),
        },
    ];
    let inputs = InsightInputs {
        category_aggregates: &aggregates,
        trend: Some(&trend),
        category_trends: &[],
        budget_statuses: &statuses,
        history: &hist,
    };
    let ids: Vec<String> = generate_insights(&inputs, &config())
        .unwrap()
        .into_iter()
        .map(|i| i.id)
        .collect();
    assert_eq!(
        ids,
        vec![
            "budget-travel",
            "budget-shopping",
            "anomaly-health",
            "anomaly-entertainment",
            "budget-food",
            "share-travel",
            "trend-overall",
        ]
    );
}

#[test]
fn test_max_items_truncates_after_ranking() {
    let t = AlertThresholds::default();
    let statuses = vec![
        evaluate_budget(CategoryId::Food, dec!(685), dec!(700), &t).unwrap(),
        evaluate_budget(CategoryId::Shopping, dec!(720), dec!(700), &t).unwrap(),
    ];
    let inputs = InsightInputs {
        budget_statuses: &statuses,
        ..Default::default()
    };
    let capped = InsightConfig {
        max_items: Some(1),
        ..config()
    };
    let items = generate_insights(&inputs, &capped).unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].id, "budget-shopping");
}

#[test]
fn test_generation_is_idempotent() {
    let hist = vec![history(CategoryId::Food, &[dec!(100), dec!(100), dec!(180)])];
    let inputs = InsightInputs {
        history: &hist,
        ..Default::default()
    };
    let first = generate_insights(&inputs, &config()).unwrap();
    let second = generate_insights(&inputs, &config()).unwrap();
    assert_eq!(first, second);
}
