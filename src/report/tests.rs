#![allow(clippy::unwrap_used)]

use chrono::NaiveDate;
use rust_decimal_macros::dec;

use super::*;
use crate::analytics::{evaluate_budget, summarize_budgets};
use crate::config::AlertThresholds;
use crate::models::{CategoryId, InsightKind, Severity};

#[test]
fn test_render_categories() {
    let text = render_categories(&[
        CategoryAggregate {
            category: CategoryId::Food,
            total_amount: dec!(150),
            share_of_total: dec!(75.00),
        },
        CategoryAggregate {
            category: CategoryId::Transport,
            total_amount: dec!(50),
            share_of_total: dec!(25.00),
        },
    ]);
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("Food & Dining"));
    assert!(lines[0].contains("$150.00"));
    assert!(lines[0].ends_with("75.00%"));
    assert!(lines[1].starts_with("Transportation"));
}

#[test]
fn test_render_categories_empty() {
    assert_eq!(render_categories(&[]), "No expenses\n");
}

#[test]
fn test_render_trend() {
    let signal = TrendSignal {
        direction: TrendDirection::Increase,
        delta_percent: Some(dec!(12.5)),
        previous_label: "2024-01".into(),
        previous_amount: dec!(1200),
        current_label: "2024-02".into(),
        current_amount: dec!(1350),
    };
    assert_eq!(
        render_trend(&signal),
        "▲ 2024-02 $1,350.00 vs 2024-01 $1,200.00: +12.5% (increase)\n"
    );
}

#[test]
fn test_render_budgets_marks_alerts() {
    let thresholds = AlertThresholds::default();
    let statuses = vec![
        evaluate_budget(CategoryId::Shopping, dec!(720), dec!(700), &thresholds).unwrap(),
        evaluate_budget(CategoryId::Food, dec!(685), dec!(700), &thresholds).unwrap(),
        evaluate_budget(CategoryId::Travel, dec!(10), dec!(700), &thresholds).unwrap(),
    ];
    let text = render_budgets(&statuses, &summarize_budgets(&statuses).unwrap());
    let lines: Vec<&str> = text.lines().collect();
    assert!(lines[0].ends_with("EXCEEDED"));
    assert!(lines[0].contains(&"█".repeat(BAR_WIDTH)));
    assert!(lines[1].ends_with("warning"));
    assert!(lines[1].contains("$685.00/$700.00"));
    assert!(!lines[2].contains("warning"));
    assert!(text.contains("Total: $1,415.00 of $2,100.00 spent, $685.00 remaining"));
}

#[test]
fn test_render_budgets_empty() {
    let summary = summarize_budgets(&[]).unwrap();
    assert_eq!(render_budgets(&[], &summary), "No budgets configured\n");
}

#[test]
fn test_render_insights() {
    let items = vec![InsightItem {
        id: "budget-food".into(),
        kind: InsightKind::Warning,
        title: "Food & Dining budget alert".into(),
        description: "You have used 98% of your Food & Dining budget.".into(),
        impact: Impact::Neutral,
        severity: Severity::Medium,
        category: Some(CategoryId::Food),
        magnitude_percent: Some(dec!(97.86)),
    }];
    let text = render_insights(&items);
    assert!(text.starts_with("· [warning] Food & Dining budget alert\n"));
    assert!(text.contains("    You have used 98%"));
    assert_eq!(render_insights(&[]), "No insights yet\n");
}

#[test]
fn test_render_records() {
    let records = vec![
        ExpenseRecord::new(
            "1",
            dec!(4.5),
            Some(CategoryId::Food),
            "Morning coffee",
            NaiveDate::from_ymd_opt(2024, 3, 2).unwrap(),
        ),
        ExpenseRecord::new(
            "2",
            dec!(12),
            None,
            "Mystery charge",
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
        ),
    ];
    let text = render_records(&records);
    let lines: Vec<&str> = text.lines().collect();
    assert!(lines[0].starts_with("2024-03-02  Morning coffee"));
    assert!(lines[0].ends_with("$4.50"));
    assert!(lines[1].contains("Uncategorized"));
}

#[test]
fn test_render_overview() {
    let overview = crate::analytics::overview(
        &[ExpenseRecord::new(
            "1",
            dec!(40),
            Some(CategoryId::Health),
            "Pharmacy",
            NaiveDate::from_ymd_opt(2024, 3, 2).unwrap(),
        )],
        &Default::default(),
        &AlertThresholds::default(),
        Default::default(),
    )
    .unwrap();
    let text = render_overview(&overview);
    assert!(text.contains("Period:     2024-03 (1 records)"));
    assert!(text.contains("Spent:      $40.00"));
    assert!(text.contains("Top:        Healthcare $40.00 (100%)"));
    // no second period, no budgets
    assert!(!text.contains("Change:"));
    assert!(!text.contains("Budget:"));
}
