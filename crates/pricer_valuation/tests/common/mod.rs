//! Sample trades and market data shared by the integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use adapter_fpml::{
    keys, AdjustableDate, BondTransaction, BulletPayment, CapFloor, EquityTransaction, Fra,
    Frequency, FutureTransaction, FxOption, FxSingleLeg, FxSwap, LeaseTransaction, LegRate, Money,
    OptionType, Party, PartyRole, Payment, Product, ProductType, PropertyTransaction, Swap, SwapLeg,
    Swaption, TermDeposit, Trade, TradeHeader, TradeProperties,
};
use pricer_core::market_data::{FlatCurve, MarketSnapshot};
use pricer_core::types::{Currency, Date, DayCountConvention};

pub const INDEX: &str = "AUD-BBSW-6M";

pub fn d(y: i32, m: u32, day: u32) -> Date {
    Date::from_ymd(y, m, day).unwrap()
}

pub fn valuation_date() -> Date {
    d(2025, 3, 3)
}

pub fn market() -> Arc<MarketSnapshot> {
    Arc::new(
        MarketSnapshot::new("EOD")
            .with_discount_curve(Currency::AUD, Arc::new(FlatCurve::new(0.04)))
            .with_discount_curve(Currency::USD, Arc::new(FlatCurve::new(0.045)))
            .with_fx_rate(Currency::AUD, Currency::USD, 0.65)
            .with_asset_price("PROP-1", 2_100_000.0)
            .with_asset_price("BHP.AX", 47.5)
            .with_asset_price("YTM5", 96.30)
            .with_volatility(INDEX, 0.25)
            .with_volatility("AUDUSD", 0.10),
    )
}

pub fn props(base_party: &str) -> TradeProperties {
    TradeProperties::new()
        .with(keys::PARTY1, "BankA")
        .with(keys::PARTY2, "BankB")
        .with(keys::BASE_PARTY, base_party)
}

pub fn trade(id: &str, product: Product) -> Trade {
    Trade::new(
        TradeHeader {
            trade_id: id.to_string(),
            trade_date: Some(d(2025, 1, 10)),
        },
        [Party::new("p1", "BankA"), Party::new("p2", "BankB")],
        product,
    )
}

fn aud(amount: f64) -> Money {
    Money::new(amount, Currency::AUD)
}

pub fn swap_leg(payer: PartyRole, rate: LegRate) -> SwapLeg {
    SwapLeg {
        payer,
        receiver: payer.other(),
        notional: aud(10_000_000.0),
        effective_date: d(2025, 1, 15),
        termination_date: d(2030, 1, 15),
        frequency: Frequency::SemiAnnual,
        day_count: DayCountConvention::ActualActual365,
        payment_adjustments: None,
        rate,
        principal_exchange: false,
    }
}

pub fn floating() -> LegRate {
    LegRate::Floating {
        index: INDEX.to_string(),
        spread: 0.0,
    }
}

/// Party1 pays fixed, Party2 pays floating.
pub fn swap(fixed_rate: f64) -> Swap {
    Swap {
        legs: vec![
            swap_leg(PartyRole::Party1, LegRate::Fixed(fixed_rate)),
            swap_leg(PartyRole::Party2, floating()),
        ],
    }
}

pub fn bullet(payment_date: AdjustableDate) -> Product {
    Product::BulletPayment(BulletPayment {
        payment: Payment {
            payer: PartyRole::Party1,
            receiver: PartyRole::Party2,
            amount: Money::new(1_000_000.0, Currency::USD),
            payment_date,
        },
    })
}

fn fx_leg(value_date: Date, usd: f64) -> FxSingleLeg {
    FxSingleLeg {
        currency1_payer: PartyRole::Party1,
        currency1: aud(1_000_000.0),
        currency2: Money::new(usd, Currency::USD),
        value_date,
    }
}

/// A payload the product type can be priced from, plus the properties it requires.
pub fn sample(product_type: ProductType) -> Option<(Product, TradeProperties)> {
    let base = props("BankA").with(keys::PRODUCT_TYPE, product_type.code());
    let product = match product_type {
        ProductType::PropertyTransaction => Product::PropertyTransaction(PropertyTransaction {
            property_id: "PROP-1".to_string(),
            buyer: PartyRole::Party1,
            seller: PartyRole::Party2,
            purchase_price: aud(2_000_000.0),
            payment_date: AdjustableDate::unadjusted(d(2025, 6, 30)),
        }),
        ProductType::LeaseTransaction => Product::LeaseTransaction(LeaseTransaction {
            lease_id: "LEASE-1".to_string(),
            tenant: PartyRole::Party2,
            landlord: PartyRole::Party1,
            start_date: d(2025, 1, 1),
            payment_frequency: Frequency::Monthly,
            number_of_payments: 24,
            rent: aud(10_000.0),
            annual_escalation: 0.03,
        }),
        ProductType::EquityTransaction => {
            let product = Product::EquityTransaction(EquityTransaction {
                equity_id: "BHP.AX".to_string(),
                buyer: PartyRole::Party1,
                seller: PartyRole::Party2,
                number_of_units: 10_000.0,
                unit_price: aud(45.0),
            });
            return Some((product, base.with(keys::EFFECTIVE_DATE, "2025-03-05")));
        }
        ProductType::BondTransaction => {
            let product = Product::BondTransaction(BondTransaction {
                bond_id: "ACGB-2030".to_string(),
                buyer: PartyRole::Party1,
                seller: PartyRole::Party2,
                notional: aud(1_000_000.0),
                coupon_rate: 0.05,
                coupon_frequency: Frequency::SemiAnnual,
                day_count: DayCountConvention::ActualActual365,
                maturity_date: d(2030, 2, 1),
                purchase_price: 101.5,
            });
            return Some((product, base.with(keys::EFFECTIVE_DATE, "2025-03-05")));
        }
        ProductType::FutureTransaction => {
            let product = Product::FutureTransaction(FutureTransaction {
                contract_code: "YTM5".to_string(),
                buyer: PartyRole::Party1,
                seller: PartyRole::Party2,
                number_of_contracts: 10.0,
                point_value: 1_000.0,
                trade_price: 96.10,
                currency: Currency::AUD,
                last_trading_date: d(2025, 6, 13),
            });
            return Some((product, base.with(keys::FUTURES_TYPE, "bondfuture")));
        }
        ProductType::InterestRateSwap | ProductType::AssetSwap => Product::Swap(swap(0.04)),
        ProductType::CrossCurrencySwap => {
            let mut usd_leg = swap_leg(PartyRole::Party2, floating());
            usd_leg.notional = Money::new(6_500_000.0, Currency::USD);
            usd_leg.principal_exchange = true;
            let mut aud_leg = swap_leg(PartyRole::Party1, LegRate::Fixed(0.04));
            aud_leg.principal_exchange = true;
            Product::Swap(Swap {
                legs: vec![aud_leg, usd_leg],
            })
        }
        ProductType::FRA => Product::Fra(Fra {
            buyer: PartyRole::Party1,
            seller: PartyRole::Party2,
            notional: aud(5_000_000.0),
            adjusted_effective_date: d(2025, 9, 15),
            adjusted_termination_date: d(2026, 3, 16),
            payment_date: AdjustableDate::unadjusted(d(2025, 9, 15)),
            fixed_rate: 0.041,
            index: INDEX.to_string(),
            day_count: DayCountConvention::ActualActual365,
        }),
        ProductType::CapFloor => Product::CapFloor(CapFloor {
            buyer: PartyRole::Party1,
            seller: PartyRole::Party2,
            floating_leg: swap_leg(PartyRole::Party2, floating()),
            cap_rate: Some(0.045),
            floor_rate: None,
            premium: None,
        }),
        ProductType::FxSpot => Product::FxSingleLeg(fx_leg(d(2025, 3, 5), 650_000.0)),
        ProductType::FxForward => Product::FxSingleLeg(fx_leg(d(2025, 9, 5), 652_000.0)),
        ProductType::FxSwap => Product::FxSwap(FxSwap {
            near_leg: fx_leg(d(2025, 3, 5), 650_000.0),
            far_leg: fx_leg(d(2025, 9, 5), 652_000.0),
        }),
        ProductType::FxOption => Product::FxOption(FxOption {
            buyer: PartyRole::Party1,
            seller: PartyRole::Party2,
            option_type: OptionType::Call,
            notional: aud(1_000_000.0),
            counter_currency: Currency::USD,
            strike: 0.66,
            expiry_date: d(2025, 9, 3),
            value_date: d(2025, 9, 5),
            premium: None,
        }),
        ProductType::BulletPayment => bullet(AdjustableDate::unadjusted(d(2026, 1, 15))),
        ProductType::InterestRateSwaption => {
            let product = Product::Swaption(Swaption {
                buyer: PartyRole::Party1,
                seller: PartyRole::Party2,
                swap: swap(0.045),
                expiry_date: d(2025, 1, 13),
                premium: None,
            });
            return Some((product, base.with(keys::EFFECTIVE_DATE, "2025-01-15")));
        }
        ProductType::TermDeposit => Product::TermDeposit(TermDeposit {
            initial_payer: PartyRole::Party1,
            initial_receiver: PartyRole::Party2,
            start_date: d(2025, 3, 5),
            maturity_date: d(2025, 9, 5),
            principal: aud(5_000_000.0),
            fixed_rate: 0.042,
            day_count: DayCountConvention::ActualActual365,
        }),
        _ => return None,
    };
    Some((product, base))
}
