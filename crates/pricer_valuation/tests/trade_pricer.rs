//! Integration tests for trade binding, party relative pricing and reports.

mod common;

use std::sync::Arc;

use adapter_fpml::{
    keys, AdjustableDate, BusinessDayAdjustments, CollateralTerms, GenericProduct, Money, Product,
    ProductType, TradeType,
};
use approx::assert_relative_eq;
use common::*;
use pricer_core::market_data::MarketEnvironment;
use pricer_core::types::{BusinessCenter, BusinessDayConvention, Currency, StaticCalendarResolver};
use pricer_valuation::{
    supported_product_types, ClassificationPath, GridValue, MarketScenario, Metric,
    PartyContextPolicy, PricerConfig, PricerFactory, TradePricer, ValuationError,
    ValuationReportType, XL_HEADINGS,
};

fn scenario(requesting: &str) -> MarketScenario {
    MarketScenario::new(market(), valuation_date(), Currency::AUD, requesting)
        .with_metrics(vec![Metric::Npv, Metric::ImpliedQuote])
}

fn irs_pricer(fixed_rate: f64) -> TradePricer {
    let trade = trade("IRS-1", Product::Swap(swap(fixed_rate)));
    TradePricer::new(&trade, &props("BankA"), &[], None).unwrap()
}

// ============================================================================
// Binding
// ============================================================================

#[test]
fn test_every_supported_product_type_binds_and_prices() {
    let mut bound = 0;
    for product_type in supported_product_types() {
        let (product, props) = sample(product_type)
            .unwrap_or_else(|| panic!("no sample payload for {}", product_type));
        let trade = trade(&format!("T-{}", product_type), product);
        let pricer = TradePricer::new(&trade, &props, &[], None)
            .unwrap_or_else(|e| panic!("{} failed to bind: {}", product_type, e));

        assert_eq!(pricer.product_type(), product_type);
        assert_eq!(pricer.classification_path(), ClassificationPath::Explicit);
        assert_eq!(pricer.reporter().trade_type(), trade.trade_type());
        assert_eq!(pricer.build_the_product(), trade.product);
        assert!(pricer.do_report().is_ok());

        let npv = pricer
            .npv("BankA", Currency::AUD, valuation_date(), market())
            .unwrap_or_else(|e| panic!("{} failed to price: {}", product_type, e));
        assert!(npv.is_finite(), "{} NPV {}", product_type, npv);
        bound += 1;
    }
    assert_eq!(bound, 17);
}

#[test]
fn test_legacy_path_binds_from_payload() {
    let pricer = irs_pricer(0.04);
    assert_eq!(pricer.product_type(), ProductType::InterestRateSwap);
    assert_eq!(pricer.classification_path(), ClassificationPath::Legacy);
    assert_eq!(pricer.trade_identifier().id, "IRS-1");
    assert_eq!(pricer.party_names(), &["BankA".to_string(), "BankB".to_string()]);
}

#[test]
fn test_unknown_discriminant_is_unsupported() {
    let other = Product::Other(GenericProduct {
        trade_type: TradeType::Repo,
        description: "GC repo".to_string(),
    });
    let err = TradePricer::new(&trade("R-1", other.clone()), &props("BankA"), &[], None).unwrap_err();
    assert!(matches!(err, ValuationError::UnsupportedProductType(_)));

    let explicit = props("BankA").with(keys::PRODUCT_TYPE, "CreditDefaultSwap");
    let err = TradePricer::new(&trade("R-2", other), &explicit, &[], None).unwrap_err();
    assert_eq!(err, ValuationError::UnsupportedProductType("CreditDefaultSwap".to_string()));
}

#[test]
fn test_unknown_explicit_tag_is_unsupported() {
    let tagged = props("BankA").with(keys::PRODUCT_TYPE, "Spaceship");

    // a swap payload would bind on the legacy path; the tag still decides
    let irs = trade("IRS-X", Product::Swap(swap(0.04)));
    let err = TradePricer::new(&irs, &tagged, &[], None).unwrap_err();
    assert_eq!(err, ValuationError::UnsupportedProductType("Spaceship".to_string()));

    let repo = Product::Other(GenericProduct {
        trade_type: TradeType::Repo,
        description: "GC repo".to_string(),
    });
    let err = TradePricer::new(&trade("R-3", repo), &tagged, &[], None).unwrap_err();
    assert_eq!(err, ValuationError::UnsupportedProductType("Spaceship".to_string()));
}

#[test]
fn test_explicit_tag_must_match_payload() {
    let props = props("BankA").with(keys::PRODUCT_TYPE, "FRA");
    let err = TradePricer::new(&trade("IRS-2", Product::Swap(swap(0.04))), &props, &[], None)
        .unwrap_err();
    assert!(matches!(err, ValuationError::ProductMismatch { expected: TradeType::Fra, .. }));
}

#[test]
fn test_required_properties() {
    let no_party2 = adapter_fpml::TradeProperties::new().with(keys::PARTY1, "BankA");
    let err = TradePricer::new(&trade("IRS-3", Product::Swap(swap(0.04))), &no_party2, &[], None)
        .unwrap_err();
    assert_eq!(err, ValuationError::MissingProperty(keys::PARTY2.to_string()));

    let (bond, _) = sample(ProductType::BondTransaction).unwrap();
    let err = TradePricer::new(&trade("B-1", bond), &props("BankA"), &[], None).unwrap_err();
    assert_eq!(err, ValuationError::MissingProperty(keys::EFFECTIVE_DATE.to_string()));

    let (future, _) = sample(ProductType::FutureTransaction).unwrap();
    let bad = props("BankA").with(keys::FUTURES_TYPE, "Spaceship");
    let err = TradePricer::new(&trade("F-1", future), &bad, &[], None).unwrap_err();
    assert!(matches!(err, ValuationError::InvalidEnumValue { ref field, .. } if field == keys::FUTURES_TYPE));
}

#[test]
fn test_party_context_follows_policy() {
    let collateral = CollateralTerms {
        independent_amount: Some(Money::new(100_000.0, Currency::AUD)),
        currency: Currency::AUD,
    };
    let trade = trade("IRS-4", Product::Swap(swap(0.04))).with_collateral(collateral);
    let explicit = props("BankA").with(keys::PRODUCT_TYPE, "InterestRateSwap");

    let legacy = TradePricer::new(&trade, &props("BankA"), &[], None).unwrap();
    assert!(legacy.priceable_product().is_collateralised());
    assert!(legacy.priceable_product().party_names().is_some());

    let strict = TradePricer::new(&trade, &explicit, &[], None).unwrap();
    assert!(!strict.priceable_product().is_collateralised());
    assert!(strict.priceable_product().party_names().is_none());

    let config = PricerConfig {
        party_context: PartyContextPolicy::AllPaths,
        ..PricerConfig::default()
    };
    let factory = PricerFactory::new(Arc::new(StaticCalendarResolver::new()), config);
    let all = factory.construct(&trade, &explicit, &[], None).unwrap();
    assert!(all.priceable_product().is_collateralised());
    assert_eq!(
        all.priceable_product().party_names(),
        Some(&["BankA".to_string(), "BankB".to_string()])
    );
}

// ============================================================================
// Bullet payment calendar
// ============================================================================

#[test]
fn test_bullet_payment_resolves_calendar_from_payment_date() {
    // 2026-01-17 is a Saturday
    let adjustments = BusinessDayAdjustments::new(
        BusinessDayConvention::Following,
        vec![BusinessCenter::new("USNY").unwrap()],
    );
    let product = bullet(AdjustableDate::adjusted(d(2026, 1, 17), adjustments));
    let pricer = TradePricer::new(&trade("BP-1", product.clone()), &props("BankA"), &[], None).unwrap();

    let summary = pricer.do_report().unwrap();
    assert_eq!(summary.get("PaymentCalendar"), Some(&GridValue::from("USNY")));
    assert_eq!(summary.get("PaymentDate"), Some(&GridValue::Date(d(2026, 1, 19))));

    let strict = PricerFactory::new(Arc::new(StaticCalendarResolver::new()), PricerConfig::default());
    let err = strict.construct(&trade("BP-1", product), &props("BankA"), &[], None).unwrap_err();
    assert!(matches!(err, ValuationError::Calendar(_)));
}

#[test]
fn test_bullet_payment_without_calendar() {
    let product = bullet(AdjustableDate::unadjusted(d(2026, 1, 17)));
    let pricer = TradePricer::new(&trade("BP-2", product), &props("BankA"), &[], None).unwrap();

    let summary = pricer.do_report().unwrap();
    assert_eq!(summary.get("PaymentCalendar"), Some(&GridValue::Empty));
    assert_eq!(summary.get("PaymentDate"), Some(&GridValue::Date(d(2026, 1, 17))));
    assert!(pricer
        .npv("BankB", Currency::USD, valuation_date(), market())
        .unwrap()
        > 0.0);
}

// ============================================================================
// Party relative valuation
// ============================================================================

#[test]
fn test_counterparty_sees_negated_value() {
    let pricer = irs_pricer(0.05);
    let bank_a = pricer.price(&scenario("BankA"), ValuationReportType::Default).unwrap();
    let bank_b = pricer.price(&scenario("BankB"), ValuationReportType::Default).unwrap();

    let a = bank_a.valuation().unwrap().quote(Metric::Npv).unwrap();
    let b = bank_b.valuation().unwrap().quote(Metric::Npv).unwrap();
    // BankA pays 5% fixed against a 4% curve
    assert!(a < 0.0);
    assert_relative_eq!(a, -b, epsilon = 1e-9);
    let again = pricer.price(&scenario("BankA"), ValuationReportType::Default).unwrap();
    assert_eq!(again.valuation().unwrap().quote(Metric::Npv), Some(a));

    let qa = bank_a.valuation().unwrap().quote(Metric::ImpliedQuote).unwrap();
    let qb = bank_b.valuation().unwrap().quote(Metric::ImpliedQuote).unwrap();
    assert_eq!(qa, qb);
}

#[test]
fn test_role_and_name_requests_agree() {
    let pricer = irs_pricer(0.05);
    let by_name = pricer.npv("BankB", Currency::AUD, valuation_date(), market()).unwrap();
    let by_role = pricer.npv("Party2", Currency::AUD, valuation_date(), market()).unwrap();
    assert_eq!(by_name, by_role);
}

#[test]
fn test_base_party2_flips_perspective() {
    let trade = trade("IRS-5", Product::Swap(swap(0.05)));
    let from_a = TradePricer::new(&trade, &props("BankA"), &[], None).unwrap();
    let from_b = TradePricer::new(&trade, &props("BankB"), &[], None).unwrap();
    for requesting in ["BankA", "BankB"] {
        assert_relative_eq!(
            from_a.npv(requesting, Currency::AUD, valuation_date(), market()).unwrap(),
            from_b.npv(requesting, Currency::AUD, valuation_date(), market()).unwrap(),
            epsilon = 1e-9
        );
    }
}

#[test]
fn test_neutral_scenario_values_to_zero() {
    let pricer = irs_pricer(0.05);
    let neutral = scenario("BankB").with_counterparty_neutral(true);
    let report = pricer.price(&neutral, ValuationReportType::Default).unwrap();
    assert_eq!(report.valuation().unwrap().quote(Metric::Npv), Some(0.0));
    assert!(report.valuation().unwrap().quote(Metric::ImpliedQuote).unwrap() > 0.0);

    let stranger = scenario("BankC").with_counterparty_neutral(true);
    assert!(pricer.price(&stranger, ValuationReportType::Default).is_ok());
}

#[test]
fn test_unknown_requesting_party() {
    let err = irs_pricer(0.05)
        .price(&scenario("BankC"), ValuationReportType::Default)
        .unwrap_err();
    assert_eq!(err, ValuationError::UnknownParty("BankC".to_string()));
}

#[test]
fn test_missing_market_is_null_prerequisite() {
    let scenario = MarketScenario::without_market(valuation_date(), Currency::AUD, "BankA");
    let err = irs_pricer(0.05)
        .price(&scenario, ValuationReportType::Full)
        .unwrap_err();
    assert_eq!(err, ValuationError::NullPrerequisite("market environment"));
}

#[test]
fn test_swap_at_par_rate_is_worthless() {
    let par = irs_pricer(0.05).par_rate("BankA", valuation_date(), market()).unwrap();
    let at_par = irs_pricer(par);
    for requesting in ["BankA", "BankB"] {
        assert_relative_eq!(
            at_par.npv(requesting, Currency::AUD, valuation_date(), market()).unwrap(),
            0.0,
            epsilon = 1e-4
        );
    }
}

#[test]
fn test_par_rate_unsupported_without_quote() {
    let product = bullet(AdjustableDate::unadjusted(d(2026, 1, 15)));
    let pricer = TradePricer::new(&trade("BP-3", product), &props("BankA"), &[], None).unwrap();
    let err = pricer.par_rate("BankA", valuation_date(), market()).unwrap_err();
    assert!(matches!(err, ValuationError::UnsupportedOperation(_)));
}

// ============================================================================
// Reports
// ============================================================================

#[test]
fn test_full_report_rebuilds_product() {
    let pricer = irs_pricer(0.05);
    let full = pricer.price(&scenario("BankA"), ValuationReportType::Full).unwrap();
    assert!(full.has_product_snapshot());
    let record = &full.items[0].trade;
    assert_eq!(record.product_type, Some(ProductType::InterestRateSwap));
    assert_eq!(record.product, Some(pricer.build_the_product()));
    assert_eq!(record.id, "IRS-1");
    assert_eq!(full.market, "EOD");

    for report_type in [ValuationReportType::Summary, ValuationReportType::Default] {
        let report = pricer.price(&scenario("BankA"), report_type).unwrap();
        assert!(!report.has_product_snapshot());
        assert_eq!(report.items[0].trade.product_type, None);
        assert_eq!(report.items.len(), 1);
    }
}

#[test]
fn test_batch_returns_one_report_per_scenario_in_order() {
    let pricer = irs_pricer(0.05);
    let scenarios: Vec<MarketScenario> = (0..12_i64)
        .map(|i| {
            MarketScenario::new(market(), d(2025, 3, 3).add_days(i * 7).unwrap(), Currency::AUD, "BankB")
                .with_metrics(vec![Metric::Npv])
        })
        .collect();

    let reports = pricer.price_batch(&scenarios, ValuationReportType::Summary).unwrap();
    assert_eq!(reports.len(), scenarios.len());
    for (report, scenario) in reports.iter().zip(&scenarios) {
        let quote = &report.valuation().unwrap().quotes[0];
        assert_eq!(quote.valuation_date, scenario.valuation_date());
        let single = pricer.price(scenario, ValuationReportType::Summary).unwrap();
        assert_eq!(quote.value, single.valuation().unwrap().quotes[0].value);
    }
}

#[test]
fn test_batch_fails_as_a_whole() {
    let mut scenarios = vec![scenario("BankA"), scenario("BankB")];
    scenarios.push(MarketScenario::without_market(valuation_date(), Currency::AUD, "BankA"));
    let err = irs_pricer(0.05)
        .price_batch(&scenarios, ValuationReportType::Summary)
        .unwrap_err();
    assert_eq!(err, ValuationError::NullPrerequisite("market environment"));
}

#[test]
fn test_scenario_without_metrics_uses_configured_defaults() {
    let bare = MarketScenario::new(market(), valuation_date(), Currency::AUD, "BankA");
    let report = irs_pricer(0.05).price(&bare, ValuationReportType::Default).unwrap();
    let measures: Vec<Metric> = report.valuation().unwrap().quotes.iter().map(|q| q.measure).collect();
    assert_eq!(measures, vec![Metric::Npv]);
}

#[test]
fn test_report_delegation() {
    let pricer = irs_pricer(0.05);
    let market = market();

    let rows = pricer.do_expected_cashflow_report(valuation_date(), market.as_ref()).unwrap();
    assert_eq!(rows.len(), 20);

    let grid = pricer.do_xl_report(valuation_date(), market.as_ref()).unwrap();
    assert_eq!(grid.headings().len(), XL_HEADINGS.len());
    assert_eq!(grid.len(), rows.len());
    assert_eq!(grid.cell(10, "Leg"), Some(&GridValue::from("Leg2")));
    assert_eq!(grid.cell(10, "Coupon").and_then(GridValue::as_number), Some(1.0));

    let product = pricer.do_product_report(&props("BankA")).unwrap();
    assert_eq!(product.cell(0, "Value"), Some(&GridValue::from("swap")));
    assert!(product.rows().iter().any(|r| r[0] == GridValue::from("Property.BaseParty")));
    assert_eq!(market.name(), "EOD");
}

#[test]
fn test_report_serialises_to_json() {
    let report = irs_pricer(0.05)
        .price(&scenario("BankA"), ValuationReportType::Full)
        .unwrap();
    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["report_type"], "Full");
    assert_eq!(json["items"][0]["valuation"]["object_reference"], "IRS-1");
    assert!(json["items"][0]["trade"]["product"].is_object());
}
