//! # pricer_valuation: Trade classification and party relative valuation
//!
//! ## Pricer Layer Role
//!
//! pricer_valuation binds an [`adapter_fpml::Trade`] to a pricing strategy and
//! values it from either counterparty's side:
//! - [`TradeClassifier`]: explicit `ProductType` tag, else the legacy `TradeType`
//! - [`PricerFactory`]: one product table row per product type, required and
//!   optional property extraction, calendar binding
//! - [`PartyRelativeValuator`]: resolves the [`Multiplier`] for the requesting party
//! - [`ValuationReportAssembler`]: wraps valuations into [`ValuationReport`]s
//! - [`TradePricer`]: the bound result; pricing, batch pricing and report delegation
//!
//! ## Usage Examples
//!
//! ```rust
//! use std::sync::Arc;
//! use adapter_fpml::{
//!     keys, AdjustableDate, BulletPayment, Money, Party, PartyRole, Payment, Product, Trade,
//!     TradeHeader, TradeProperties,
//! };
//! use pricer_core::market_data::{FlatCurve, MarketSnapshot};
//! use pricer_core::types::{Currency, Date};
//! use pricer_valuation::{MarketScenario, Metric, TradePricer, ValuationReportType};
//!
//! let trade = Trade::new(
//!     TradeHeader { trade_id: "BP-7".into(), trade_date: None },
//!     [Party::new("p1", "BankA"), Party::new("p2", "BankB")],
//!     Product::BulletPayment(BulletPayment {
//!         payment: Payment {
//!             payer: PartyRole::Party1,
//!             receiver: PartyRole::Party2,
//!             amount: Money::new(500_000.0, Currency::USD),
//!             payment_date: AdjustableDate::unadjusted(Date::from_ymd(2026, 6, 30).unwrap()),
//!         },
//!     }),
//! );
//! let props = TradeProperties::new()
//!     .with(keys::PARTY1, "BankA")
//!     .with(keys::PARTY2, "BankB")
//!     .with(keys::BASE_PARTY, "BankA");
//! let pricer = TradePricer::new(&trade, &props, &[], None).unwrap();
//!
//! let market = MarketSnapshot::new("EOD")
//!     .with_discount_curve(Currency::USD, Arc::new(FlatCurve::new(0.04)));
//! let scenario = MarketScenario::new(
//!     Arc::new(market),
//!     Date::from_ymd(2025, 6, 30).unwrap(),
//!     Currency::USD,
//!     "BankB",
//! )
//! .with_metrics(vec![Metric::Npv]);
//!
//! let report = pricer.price(&scenario, ValuationReportType::Full).unwrap();
//! assert!(report.valuation().unwrap().quote(Metric::Npv).unwrap() > 0.0);
//! assert!(report.has_product_snapshot());
//! ```
//!
//! ## Feature Flags
//!
//! - `parallel` (default): price large scenario batches on the rayon pool

#![warn(missing_docs)]

pub mod classifier;
pub mod config;
pub mod error;
pub mod factory;
pub mod pricers;
pub mod report;
pub mod reporters;
pub mod scenario;
pub mod trade_pricer;
pub mod valuator;

pub use classifier::{Classification, ClassificationPath, TradeClassifier};
pub use config::{ConfigError, PartyContextPolicy, PricerConfig};
pub use error::ValuationError;
pub use factory::{supported_product_types, CalendarPair, PricerFactory};
pub use pricers::{CashflowKind, CashflowRow, PriceableProduct};
pub use report::{
    TradeRecord, TradeValuationItem, ValuationReport, ValuationReportAssembler, ValuationReportType,
};
pub use reporters::{GridValue, ProductReporter, ProductSummary, ReportGrid, XL_HEADINGS};
pub use scenario::{AssetValuation, MarketScenario, Metric, Multiplier, Quotation};
pub use trade_pricer::TradePricer;
pub use valuator::{resolve_multiplier, PartyRelativeValuator};
