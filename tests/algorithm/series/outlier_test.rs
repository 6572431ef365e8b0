//! Tests for IQR outlier bounding

use weekly_cases::algorithm::series::{IqrBounds, bound_outliers};
use weekly_cases::utils::test::{increment_series, increments};
use weekly_cases::{OutlierConfig, SeriesError, Sex};

#[test]
fn test_values_outside_bounds_are_clipped() {
    let mut table = increment_series("Sonora", 2020, &[-25, 10, 20, 30, 75]);
    let config = OutlierConfig::iqr([Sex::Male.increment_column()]);

    let reports = bound_outliers(&mut table, &config).unwrap();

    assert_eq!(reports.len(), 1);
    let bounds = reports[0].bounds;
    assert_eq!((bounds.q1, bounds.q3, bounds.iqr), (10.0, 30.0, 20.0));
    assert_eq!((bounds.lower, bounds.upper), (-20.0, 60.0));
    assert_eq!((reports[0].below, reports[0].above), (1, 1));

    assert_eq!(increments(&table, Sex::Male), vec![-20, 10, 20, 30, 60]);
    // Columns not listed are left alone
    assert_eq!(increments(&table, Sex::Female), vec![-25, 10, 20, 30, 75]);
}

#[test]
fn test_disabled_treatment_leaves_table_unchanged() {
    let mut table = increment_series("Sonora", 2020, &[1, 2, 3, 400]);
    let config = OutlierConfig {
        enabled: false,
        ..OutlierConfig::iqr([Sex::Male.increment_column()])
    };

    let reports = bound_outliers(&mut table, &config).unwrap();

    assert!(reports.is_empty());
    assert_eq!(increments(&table, Sex::Male), vec![1, 2, 3, 400]);
}

#[test]
fn test_unknown_column_is_rejected() {
    let mut table = increment_series("Sonora", 2020, &[1, 2, 3]);
    let config = OutlierConfig::iqr(["Incremento_total"]);

    let err = bound_outliers(&mut table, &config).unwrap_err();

    assert!(matches!(err, SeriesError::UnknownColumn(name) if name == "Incremento_total"));
}

#[test]
fn test_zero_factor_clips_to_quartiles() {
    let mut table = increment_series("Sonora", 2020, &[0, 10, 20, 30, 40]);
    let config = OutlierConfig::iqr(Sex::ALL.map(Sex::increment_column)).with_factor(0.0);

    let reports = bound_outliers(&mut table, &config).unwrap();

    assert_eq!(reports.len(), 2);
    assert_eq!(increments(&table, Sex::Male), vec![10, 10, 20, 30, 30]);
    assert_eq!(increments(&table, Sex::Female), vec![10, 10, 20, 30, 30]);
}

#[test]
fn test_fractional_bounds_are_rounded_half_even() {
    // Q1 = 1.75, Q3 = 3.25, IQR = 1.5, bounds [-0.5, 5.5]
    let bounds = IqrBounds::from_values(&[1, 2, 3, 4], 1.5).unwrap();
    assert_eq!((bounds.q1, bounds.q3), (1.75, 3.25));
    assert_eq!(bounds.clip(-3), 0);
    assert_eq!(bounds.clip(9), 6);
}

#[test]
fn test_empty_column_has_no_bounds() {
    assert!(IqrBounds::from_values(&[], 1.5).is_none());
}
