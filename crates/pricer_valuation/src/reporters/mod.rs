//! Product reporters.
//!
//! A [`ProductReporter`] is paired with each product table row and projects
//! a bound product into reports: a key/value summary, the projected
//! cashflows, a field/value grid of the payload and a spreadsheet style
//! cashflow grid. Reporters compute nothing themselves; every number comes
//! from the bound [`PriceableProduct`].

mod grid;

pub use grid::{GridValue, ReportGrid};

use std::collections::HashMap;
use std::fmt;

use adapter_fpml::{LegRate, Product, TradeProperties, TradeType};
use pricer_core::market_data::MarketEnvironment;
use pricer_core::types::Date;
use serde::Serialize;
use tracing::debug;

use crate::error::ValuationError;
use crate::pricers::{CashflowRow, PriceableProduct, PricerKind};

/// Column headings of [`ProductReporter::do_xl_report`].
pub const XL_HEADINGS: [&str; 15] = [
    "Leg",
    "Coupon",
    "PriceableCouponType",
    "NotionalAmount",
    "Rate",
    "ForecastAmount",
    "Currency",
    "AccrualStartDate",
    "AccrualEndDate",
    "PaymentDate",
    "PaymentDiscountFactor",
    "NPV",
    "CouponYearFraction",
    "IsDiscounted",
    "IsRealised",
];

/// Report projection strategy of one product family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ProductReporter {
    /// Property purchase
    PropertyTransaction,
    /// Property lease
    LeaseTransaction,
    /// Share purchase
    EquityTransaction,
    /// Bond purchase
    BondTransaction,
    /// Futures position
    FutureTransaction,
    /// Interest rate, asset and cross currency swaps
    InterestRateSwap,
    /// Forward rate agreement
    ForwardRateAgreement,
    /// Cap, floor or collar
    CapFloor,
    /// FX spot or outright forward
    FxSingleLeg,
    /// FX swap
    FxSwap,
    /// FX option
    FxOptionLeg,
    /// Single payment
    BulletPayment,
    /// Swaption
    InterestRateSwaption,
    /// Term deposit
    TermDeposit,
}

/// Key/value summary of a bound product.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductSummary {
    /// Reporter that produced the summary
    pub reporter: ProductReporter,
    /// Entries in report order
    pub entries: Vec<(String, GridValue)>,
}

impl ProductSummary {
    fn new(reporter: ProductReporter) -> Self {
        Self {
            reporter,
            entries: Vec::new(),
        }
    }

    fn push(&mut self, key: impl Into<String>, value: impl Into<GridValue>) {
        self.entries.push((key.into(), value.into()));
    }

    /// Value of the first entry named `key`.
    pub fn get(&self, key: &str) -> Option<&GridValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// The summary as a two column grid.
    pub fn to_grid(&self) -> ReportGrid {
        let mut grid = ReportGrid::new(["Field", "Value"]);
        for (key, value) in &self.entries {
            grid.push_row(vec![key.as_str().into(), value.clone()]);
        }
        grid
    }
}

impl ProductReporter {
    /// Reporter name.
    pub fn name(&self) -> &'static str {
        match self {
            ProductReporter::PropertyTransaction => "PropertyTransaction",
            ProductReporter::LeaseTransaction => "LeaseTransaction",
            ProductReporter::EquityTransaction => "EquityTransaction",
            ProductReporter::BondTransaction => "BondTransaction",
            ProductReporter::FutureTransaction => "FutureTransaction",
            ProductReporter::InterestRateSwap => "InterestRateSwap",
            ProductReporter::ForwardRateAgreement => "ForwardRateAgreement",
            ProductReporter::CapFloor => "CapFloor",
            ProductReporter::FxSingleLeg => "FxSingleLeg",
            ProductReporter::FxSwap => "FxSwap",
            ProductReporter::FxOptionLeg => "FxOptionLeg",
            ProductReporter::BulletPayment => "BulletPayment",
            ProductReporter::InterestRateSwaption => "InterestRateSwaption",
            ProductReporter::TermDeposit => "TermDeposit",
        }
    }

    /// Payload kind the reporter reads.
    pub fn trade_type(&self) -> TradeType {
        match self {
            ProductReporter::PropertyTransaction => TradeType::PropertyTransaction,
            ProductReporter::LeaseTransaction => TradeType::LeaseTransaction,
            ProductReporter::EquityTransaction => TradeType::EquityTransaction,
            ProductReporter::BondTransaction => TradeType::BondTransaction,
            ProductReporter::FutureTransaction => TradeType::FutureTransaction,
            ProductReporter::InterestRateSwap => TradeType::Swap,
            ProductReporter::ForwardRateAgreement => TradeType::Fra,
            ProductReporter::CapFloor => TradeType::CapFloor,
            ProductReporter::FxSingleLeg => TradeType::FxSingleLeg,
            ProductReporter::FxSwap => TradeType::FxSwap,
            ProductReporter::FxOptionLeg => TradeType::FxOption,
            ProductReporter::BulletPayment => TradeType::BulletPayment,
            ProductReporter::InterestRateSwaption => TradeType::Swaption,
            ProductReporter::TermDeposit => TradeType::TermDeposit,
        }
    }

    fn unsupported(&self, what: impl fmt::Display) -> ValuationError {
        ValuationError::UnsupportedOperation(format!("{} reporter cannot report {}", self, what))
    }

    fn check_bound(&self, product: &PriceableProduct) -> Result<(), ValuationError> {
        if product.build_the_product().trade_type() == self.trade_type() {
            Ok(())
        } else {
            Err(self.unsupported(format_args!("a {} product", product.product_type())))
        }
    }

    /// Key/value summary of `product`, logged at debug level.
    ///
    /// # Errors
    ///
    /// `UnsupportedOperation` when `product` is not of this reporter's kind.
    pub fn do_report(&self, product: &PriceableProduct) -> Result<ProductSummary, ValuationError> {
        let mut summary = ProductSummary::new(*self);
        summary.push("TradeId", product.identifier().unique_identifier());
        summary.push("ProductType", product.product_type().to_string());
        summary.push("BaseParty", product.base_party().to_string());
        if let Some([party1, party2]) = product.party_names() {
            summary.push("Party1", party1.as_str());
            summary.push("Party2", party2.as_str());
        }
        summary.push("IsCollateralised", product.is_collateralised());
        let currencies: Vec<&str> = product.payment_currencies().iter().map(|c| c.code()).collect();
        summary.push("PaymentCurrencies", currencies.join(","));

        self.summarise_kind(product.kind(), &mut summary)
            .ok_or_else(|| self.unsupported(format_args!("a {} product", product.product_type())))??;

        for (key, value) in &summary.entries {
            debug!(reporter = %self, trade = %product.identifier(), key = %key, value = %value, "Product report");
        }
        Ok(summary)
    }

    /// Product specific entries; `None` when `kind` is not this reporter's.
    fn summarise_kind(
        &self,
        kind: &PricerKind,
        s: &mut ProductSummary,
    ) -> Option<Result<(), ValuationError>> {
        match (self, kind) {
            (ProductReporter::PropertyTransaction, PricerKind::PropertyTransaction(p)) => {
                s.push("PropertyIdentifier", p.property_key.as_str());
                s.push("TradeDate", p.trade_date);
                s.push("SettlementDate", p.settlement_date);
                s.push("PurchasePrice", p.payload.purchase_price.amount);
            }
            (ProductReporter::LeaseTransaction, PricerKind::LeaseTransaction(p)) => {
                let schedule = match p.rent_schedule() {
                    Ok(schedule) => schedule,
                    Err(e) => return Some(Err(e)),
                };
                s.push("LeaseIdentifier", p.lease_reference.as_str());
                s.push("TradeDate", p.trade_date);
                s.push("StartDate", p.payload.start_date);
                s.push("NumberOfPayments", f64::from(p.payload.number_of_payments));
                s.push("Rent", p.payload.rent.amount);
                s.push("AnnualEscalation", p.payload.annual_escalation);
                s.push("FinalPaymentDate", schedule.last().map(|(date, _)| *date));
            }
            (ProductReporter::EquityTransaction, PricerKind::EquityTransaction(p)) => {
                s.push("ReferenceEquity", p.equity_key.as_str());
                s.push("TradeDate", p.trade_date);
                s.push("EffectiveDate", p.effective_date);
                s.push("SettlementDate", p.settlement_date);
                s.push("NumberOfUnits", p.payload.number_of_units);
                s.push("UnitPrice", p.payload.unit_price.amount);
            }
            (ProductReporter::BondTransaction, PricerKind::BondTransaction(p)) => {
                s.push("BondId", p.payload.bond_id.as_str());
                s.push("BondType", p.bond_type.clone());
                s.push("TradeDate", p.trade_date);
                s.push("EffectiveDate", p.effective_date);
                s.push("SettlementDate", p.settlement_date);
                s.push("CouponRate", p.payload.coupon_rate);
                s.push("MaturityDate", p.payload.maturity_date);
                s.push("RemainingCoupons", p.coupons.len() as f64);
            }
            (ProductReporter::FutureTransaction, PricerKind::FutureTransaction(p)) => {
                s.push("ContractCode", p.payload.contract_code.as_str());
                s.push("FuturesType", p.futures_type.to_string());
                s.push("RateQuoted", p.futures_type.is_rate_quoted());
                s.push("TradeDate", p.trade_date);
                s.push("NumberOfContracts", p.payload.number_of_contracts);
                s.push("TradePrice", p.payload.trade_price);
                s.push("LastTradingDate", p.payload.last_trading_date);
            }
            (ProductReporter::InterestRateSwap, PricerKind::Swap(p)) => {
                s.push("Legs", p.payload.legs.len() as f64);
                for (i, (leg, schedule)) in p.payload.legs.iter().zip(&p.schedules).enumerate() {
                    let prefix = format!("Leg{}", i + 1);
                    match &leg.rate {
                        LegRate::Fixed(rate) => s.push(format!("{}.FixedRate", prefix), *rate),
                        LegRate::Floating { index, spread } => {
                            s.push(format!("{}.Index", prefix), index.as_str());
                            s.push(format!("{}.Spread", prefix), *spread);
                        }
                    }
                    s.push(format!("{}.Notional", prefix), leg.notional.amount);
                    s.push(format!("{}.Currency", prefix), leg.notional.currency.code());
                    s.push(format!("{}.Periods", prefix), schedule.periods.len() as f64);
                }
            }
            (ProductReporter::ForwardRateAgreement, PricerKind::Fra(p)) => {
                s.push("Index", p.payload.index.as_str());
                s.push("FixedRate", p.payload.fixed_rate);
                s.push("FixingDate", p.fixing_date);
                s.push("PaymentDate", p.payment_date);
                s.push("Notional", p.payload.notional.amount);
            }
            (ProductReporter::CapFloor, PricerKind::CapFloor(p)) => {
                s.push("CapRate", p.payload.cap_rate);
                s.push("FloorRate", p.payload.floor_rate);
                s.push("Optionlets", p.schedule.periods.len() as f64);
                s.push("FirstFixingDate", p.fixing_dates.first().copied());
                s.push("PremiumDate", p.premium_date);
            }
            (ProductReporter::FxSingleLeg, PricerKind::FxSingleLeg(p)) => {
                s.push("Currency1", p.payload.currency1.currency.code());
                s.push("Currency2", p.payload.currency2.currency.code());
                s.push("ContractRate", p.payload.contract_rate());
                s.push("ValueDate", p.payload.value_date);
            }
            (ProductReporter::FxSwap, PricerKind::FxSwap(p)) => {
                s.push("NearRate", p.payload.near_leg.contract_rate());
                s.push("NearValueDate", p.payload.near_leg.value_date);
                s.push("FarRate", p.payload.far_leg.contract_rate());
                s.push("FarValueDate", p.payload.far_leg.value_date);
            }
            (ProductReporter::FxOptionLeg, PricerKind::FxOption(p)) => {
                s.push("OptionType", format!("{:?}", p.payload.option_type));
                s.push("CurrencyPair", p.pair());
                s.push("Strike", p.payload.strike);
                s.push("ExpiryDate", p.expiry_date);
                s.push("ValueDate", p.value_date);
            }
            (ProductReporter::BulletPayment, PricerKind::BulletPayment(p)) => {
                s.push("Amount", p.payload.payment.amount.amount);
                s.push("PaymentDate", p.payment_date);
                s.push("PaymentCalendar", p.calendar_name.clone());
            }
            (ProductReporter::InterestRateSwaption, PricerKind::Swaption(p)) => {
                s.push("EffectiveDate", p.effective_date);
                s.push("ExpiryDate", p.payload.expiry_date);
                s.push("Legs", p.payload.swap.legs.len() as f64);
            }
            (ProductReporter::TermDeposit, PricerKind::TermDeposit(p)) => {
                s.push("Principal", p.payload.principal.amount);
                s.push("FixedRate", p.payload.fixed_rate);
                s.push("StartDate", p.payload.start_date);
                s.push("MaturityDate", p.payload.maturity_date);
            }
            _ => return None,
        }
        Some(Ok(()))
    }

    /// Projected cashflows of `product`.
    ///
    /// # Errors
    ///
    /// `UnsupportedOperation` for a product of another kind, `MarketData`
    /// when curves or quotes are missing.
    pub fn do_expected_cashflow_report(
        &self,
        product: &PriceableProduct,
        valuation_date: Date,
        market: &dyn MarketEnvironment,
    ) -> Result<Vec<CashflowRow>, ValuationError> {
        self.check_bound(product)?;
        product.expected_cashflows(valuation_date, market)
    }

    /// Field/value grid of a payload and the trade properties it was booked with.
    ///
    /// # Errors
    ///
    /// `UnsupportedOperation` when `product` is not of this reporter's kind.
    pub fn do_product_report(
        &self,
        product: &Product,
        properties: &TradeProperties,
    ) -> Result<ReportGrid, ValuationError> {
        if product.trade_type() != self.trade_type() {
            return Err(self.unsupported(format_args!("a {} payload", product.trade_type())));
        }
        let mut grid = ReportGrid::new(["Field", "Value"]);
        grid.push_row(vec!["TradeType".into(), product.trade_type().to_string().into()]);
        for (field, value) in payload_fields(product) {
            grid.push_row(vec![field.into(), value]);
        }
        for (key, value) in properties.iter() {
            grid.push_row(vec![format!("Property.{}", key).into(), value.into()]);
        }
        Ok(grid)
    }

    /// One row per projected cashflow under [`XL_HEADINGS`].
    ///
    /// # Errors
    ///
    /// As [`do_expected_cashflow_report`](Self::do_expected_cashflow_report).
    pub fn do_xl_report(
        &self,
        product: &PriceableProduct,
        valuation_date: Date,
        market: &dyn MarketEnvironment,
    ) -> Result<ReportGrid, ValuationError> {
        let rows = self.do_expected_cashflow_report(product, valuation_date, market)?;
        let mut grid = ReportGrid::new(XL_HEADINGS);
        let mut coupon_numbers: HashMap<&str, usize> = HashMap::new();
        for row in &rows {
            let n = coupon_numbers.entry(row.leg.as_str()).or_insert(0);
            *n += 1;
            grid.push_row(vec![
                row.leg.as_str().into(),
                (*n as f64).into(),
                row.kind.name().into(),
                row.notional.into(),
                row.rate.into(),
                row.amount.into(),
                row.currency.code().into(),
                row.accrual_start.into(),
                row.accrual_end.into(),
                row.payment_date.into(),
                row.discount_factor.into(),
                row.present_value.into(),
                row.year_fraction.into(),
                row.is_discounted.into(),
                row.is_realised.into(),
            ]);
        }
        Ok(grid)
    }
}

impl fmt::Display for ProductReporter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Headline fields of a payload.
fn payload_fields(product: &Product) -> Vec<(&'static str, GridValue)> {
    match product {
        Product::PropertyTransaction(p) => vec![
            ("PropertyId", p.property_id.as_str().into()),
            ("Buyer", p.buyer.as_str().into()),
            ("Seller", p.seller.as_str().into()),
            ("PurchasePrice", p.purchase_price.amount.into()),
            ("Currency", p.purchase_price.currency.code().into()),
            ("PaymentDate", p.payment_date.unadjusted_date.into()),
        ],
        Product::LeaseTransaction(p) => vec![
            ("LeaseId", p.lease_id.as_str().into()),
            ("Tenant", p.tenant.as_str().into()),
            ("Landlord", p.landlord.as_str().into()),
            ("StartDate", p.start_date.into()),
            ("PaymentFrequency", p.payment_frequency.to_string().into()),
            ("NumberOfPayments", f64::from(p.number_of_payments).into()),
            ("Rent", p.rent.amount.into()),
            ("Currency", p.rent.currency.code().into()),
        ],
        Product::EquityTransaction(p) => vec![
            ("EquityId", p.equity_id.as_str().into()),
            ("Buyer", p.buyer.as_str().into()),
            ("Seller", p.seller.as_str().into()),
            ("NumberOfUnits", p.number_of_units.into()),
            ("UnitPrice", p.unit_price.amount.into()),
            ("Currency", p.unit_price.currency.code().into()),
        ],
        Product::BondTransaction(p) => vec![
            ("BondId", p.bond_id.as_str().into()),
            ("Buyer", p.buyer.as_str().into()),
            ("Notional", p.notional.amount.into()),
            ("Currency", p.notional.currency.code().into()),
            ("CouponRate", p.coupon_rate.into()),
            ("CouponFrequency", p.coupon_frequency.to_string().into()),
            ("MaturityDate", p.maturity_date.into()),
            ("PurchasePrice", p.purchase_price.into()),
        ],
        Product::FutureTransaction(p) => vec![
            ("ContractCode", p.contract_code.as_str().into()),
            ("Buyer", p.buyer.as_str().into()),
            ("NumberOfContracts", p.number_of_contracts.into()),
            ("PointValue", p.point_value.into()),
            ("TradePrice", p.trade_price.into()),
            ("Currency", p.currency.code().into()),
            ("LastTradingDate", p.last_trading_date.into()),
        ],
        Product::Swap(p) => {
            let mut out: Vec<(&'static str, GridValue)> = vec![("Legs", (p.legs.len() as f64).into())];
            if let Some(fixed) = p.fixed_leg() {
                if let LegRate::Fixed(rate) = fixed.rate {
                    out.push(("FixedRate", rate.into()));
                }
            }
            if let Some(first) = p.legs.first() {
                out.push(("EffectiveDate", first.effective_date.into()));
                out.push(("TerminationDate", first.termination_date.into()));
            }
            out
        }
        Product::Fra(p) => vec![
            ("Buyer", p.buyer.as_str().into()),
            ("Notional", p.notional.amount.into()),
            ("Currency", p.notional.currency.code().into()),
            ("AdjustedEffectiveDate", p.adjusted_effective_date.into()),
            ("AdjustedTerminationDate", p.adjusted_termination_date.into()),
            ("FixedRate", p.fixed_rate.into()),
            ("Index", p.index.as_str().into()),
        ],
        Product::CapFloor(p) => vec![
            ("Buyer", p.buyer.as_str().into()),
            ("Notional", p.floating_leg.notional.amount.into()),
            ("Currency", p.floating_leg.notional.currency.code().into()),
            ("CapRate", p.cap_rate.into()),
            ("FloorRate", p.floor_rate.into()),
            ("TerminationDate", p.floating_leg.termination_date.into()),
        ],
        Product::FxSingleLeg(p) => vec![
            ("Currency1Payer", p.currency1_payer.as_str().into()),
            ("Currency1Amount", p.currency1.amount.into()),
            ("Currency1", p.currency1.currency.code().into()),
            ("Currency2Amount", p.currency2.amount.into()),
            ("Currency2", p.currency2.currency.code().into()),
            ("ValueDate", p.value_date.into()),
        ],
        Product::FxSwap(p) => vec![
            ("NearValueDate", p.near_leg.value_date.into()),
            ("NearRate", p.near_leg.contract_rate().into()),
            ("FarValueDate", p.far_leg.value_date.into()),
            ("FarRate", p.far_leg.contract_rate().into()),
        ],
        Product::FxOption(p) => vec![
            ("Buyer", p.buyer.as_str().into()),
            ("OptionType", format!("{:?}", p.option_type).into()),
            ("Notional", p.notional.amount.into()),
            ("Currency", p.notional.currency.code().into()),
            ("CounterCurrency", p.counter_currency.code().into()),
            ("Strike", p.strike.into()),
            ("ExpiryDate", p.expiry_date.into()),
        ],
        Product::BulletPayment(p) => vec![
            ("Payer", p.payment.payer.as_str().into()),
            ("Receiver", p.payment.receiver.as_str().into()),
            ("Amount", p.payment.amount.amount.into()),
            ("Currency", p.payment.amount.currency.code().into()),
            ("PaymentDate", p.payment.payment_date.unadjusted_date.into()),
        ],
        Product::Swaption(p) => vec![
            ("Buyer", p.buyer.as_str().into()),
            ("ExpiryDate", p.expiry_date.into()),
            ("Legs", (p.swap.legs.len() as f64).into()),
        ],
        Product::TermDeposit(p) => vec![
            ("InitialPayer", p.initial_payer.as_str().into()),
            ("Principal", p.principal.amount.into()),
            ("Currency", p.principal.currency.code().into()),
            ("FixedRate", p.fixed_rate.into()),
            ("StartDate", p.start_date.into()),
            ("MaturityDate", p.maturity_date.into()),
        ],
        Product::Other(generic) => vec![("Description", generic.description.as_str().into())],
    }
}
