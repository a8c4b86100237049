//! Integration tests for the public re-exports of pricer_core.

use std::sync::Arc;

use approx::assert_relative_eq;
use pricer_core::market_data::{FlatCurve, MarketEnvironment, MarketSnapshot, YieldCurve};
use pricer_core::types::{
    BusinessCalendar, BusinessCenter, BusinessDayConvention, CalendarResolver, Currency, Date,
    DayCountConvention, SharedCalendar, StaticCalendarResolver,
};

/// Calendars resolved through the trait object can roll payment dates.
#[test]
fn test_resolved_calendar_rolls_payment_date() {
    let usny = BusinessCenter::new("USNY").unwrap();
    let mut resolver = StaticCalendarResolver::new();
    resolver.register(usny.clone(), [Date::from_ymd(2025, 12, 25).unwrap()]);

    let calendar: SharedCalendar = resolver.resolve(&[usny]).unwrap();
    let adjusted = calendar
        .adjust(
            Date::from_ymd(2025, 12, 25).unwrap(),
            BusinessDayConvention::ModifiedFollowing,
        )
        .unwrap();
    assert_eq!(adjusted, Date::from_ymd(2025, 12, 26).unwrap());
}

/// A resolver can sit behind a trait object.
#[test]
fn test_resolver_trait_object() {
    let resolver: Box<dyn CalendarResolver> = Box::new(StaticCalendarResolver::with_weekend_fallback());
    let centers = vec![
        BusinessCenter::new("AUSY").unwrap(),
        BusinessCenter::new("GBLO").unwrap(),
    ];
    let calendar = resolver.resolve(&centers).unwrap();
    assert_eq!(calendar.name(), "AUSY-GBLO");
}

/// Snapshot curves discount consistently with the curve itself.
#[test]
fn test_snapshot_discounting_matches_curve() {
    let curve = FlatCurve::new(0.025);
    let expected = curve.discount_factor(2.0).unwrap();
    let market = MarketSnapshot::new("EOD").with_discount_curve(Currency::EUR, Arc::new(curve));

    let today = Date::from_ymd(2025, 1, 1).unwrap();
    // 730 days on ACT/365 is exactly two years
    let later = today.add_days(730).unwrap();
    let df = market.discount_factor(Currency::EUR, today, later).unwrap();
    assert_relative_eq!(df, expected, epsilon = 1e-12);
}

/// The market environment trait is usable as a shared trait object.
#[test]
fn test_market_environment_trait_object() {
    let market: Arc<dyn MarketEnvironment> = Arc::new(
        MarketSnapshot::new("shared")
            .with_forecast_curve("USD-SOFR", Arc::new(FlatCurve::new(0.045)))
            .with_asset_price("BHP", 45.2),
    );
    assert_eq!(market.name(), "shared");
    let fwd = market
        .forecast_curve("USD-SOFR")
        .unwrap()
        .forward_rate(1.0, 2.0)
        .unwrap();
    assert_relative_eq!(fwd, 0.045, epsilon = 1e-12);
    assert_relative_eq!(market.asset_price("BHP").unwrap(), 45.2);
}

#[test]
fn test_day_count_parse_roundtrip_names() {
    for convention in [
        DayCountConvention::ActualActual365,
        DayCountConvention::ActualActual360,
        DayCountConvention::Thirty360,
    ] {
        assert_eq!(convention.name().parse::<DayCountConvention>().unwrap(), convention);
    }
}
