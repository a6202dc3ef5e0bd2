//! Tests for extent editing through the entry fields.

use diana_common::extent::{Extent, ExtentEntry, ExtentField, MAX_LONGITUDE};
use diana_common::DianaError;

// ============================================================================
// Storage tests
// ============================================================================

#[test]
fn test_set_extent_reads_back_exactly() {
    let extent = Extent::from_array([-10.0, 10.0, -5.0, 5.0]);
    assert_eq!(extent.to_array(), [-10.0, 10.0, -5.0, 5.0]);
    assert_eq!(extent.min_lon, -10.0);
    assert_eq!(extent.max_lon, 10.0);
    assert_eq!(extent.min_lat, -5.0);
    assert_eq!(extent.max_lat, 5.0);
}

#[test]
fn test_default_is_global() {
    assert_eq!(Extent::default(), Extent::new(-180.0, 180.0, -90.0, 90.0));
}

#[test]
fn test_spans() {
    let extent = Extent::new(6.97, 32.33, 75.5, 81.2);
    assert!((extent.lon_span() - 25.36).abs() < 1e-9);
    assert!((extent.lat_span() - 5.7).abs() < 1e-9);
}

#[test]
fn test_validate_rejects_huge_longitudes() {
    let result = Extent::new(1e17, 2e17, -5.0, 5.0).validate();
    assert!(matches!(result, Err(DianaError::InvalidExtent(_))));
    assert!(Extent::new(-400.0, 10.0, -5.0, 5.0).validate().is_err());
}

#[test]
fn test_validate_accepts_longitudes_up_to_limit() {
    assert!(Extent::new(0.0, MAX_LONGITUDE, -90.0, 90.0).validate().is_ok());
    assert!(Extent::new(-MAX_LONGITUDE, 0.0, -90.0, 90.0).validate().is_ok());
    assert!(Extent::default().validate().is_ok());
}

// ============================================================================
// Entry field tests
// ============================================================================

#[test]
fn test_entry_all_numeric() {
    let mut extent = Extent::global();
    let rejected = extent.apply_entry(&ExtentEntry::all(["-10", "10", "-5", "5"]));
    assert!(rejected.is_empty());
    assert_eq!(extent, Extent::new(-10.0, 10.0, -5.0, 5.0));
}

#[test]
fn test_entry_non_numeric_keeps_previous_bound() {
    let mut extent = Extent::new(-10.0, 10.0, -5.0, 5.0);
    let rejected = extent.apply_entry(&ExtentEntry::all(["abc", "20", "-5", "5"]));
    assert_eq!(rejected, vec![ExtentField::MinLon]);
    assert_eq!(extent.min_lon, -10.0);
    assert_eq!(extent.max_lon, 20.0);
}

#[test]
fn test_entry_rejects_nan_and_infinity() {
    let mut extent = Extent::new(-10.0, 10.0, -5.0, 5.0);
    let rejected = extent.apply_entry(&ExtentEntry::all(["NaN", "inf", "-5", "5"]));
    assert_eq!(rejected, vec![ExtentField::MinLon, ExtentField::MaxLon]);
    assert_eq!(extent, Extent::new(-10.0, 10.0, -5.0, 5.0));
}

#[test]
fn test_entry_empty_fields_are_ignored() {
    let mut extent = Extent::new(-10.0, 10.0, -5.0, 5.0);
    let rejected = extent.apply_entry(&ExtentEntry::single(ExtentField::MaxLat, " 7.5 "));
    assert!(rejected.is_empty());
    assert_eq!(extent, Extent::new(-10.0, 10.0, -5.0, 7.5));
}

#[test]
fn test_field_labels() {
    assert_eq!(ExtentField::from_label("min-lon"), Some(ExtentField::MinLon));
    assert_eq!(ExtentField::from_label("MAX_LAT"), Some(ExtentField::MaxLat));
    assert_eq!(ExtentField::from_label("north"), None);
}

#[test]
fn test_get_set_round_trip_per_field() {
    let mut extent = Extent::global();
    for (i, field) in ExtentField::ALL.into_iter().enumerate() {
        extent.set(field, i as f64);
        assert_eq!(extent.get(field), i as f64);
    }
}
