//! # adapter_fpml: FpML-shaped trade model
//!
//! ## Adapter Layer Role
//!
//! adapter_fpml holds the trade representation consumed by the valuation
//! layer:
//! - [`Trade`]: header, ordered counterparty pair, [`Product`] payload and
//!   optional [`CollateralTerms`]
//! - [`Product`]: tagged union of payloads ([`Swap`], [`Fra`], [`BulletPayment`], ...)
//! - [`TradeType`] / [`ProductType`]: the legacy payload discriminant and the
//!   explicit product classification
//! - [`TradeProperties`]: string property bag with typed getters, keyed by [`keys`]
//! - [`TradeIdentifier`]: trade identity derived from properties
//!
//! ## Usage Examples
//!
//! ```rust
//! use adapter_fpml::{
//!     keys, AdjustableDate, BulletPayment, Money, Party, PartyRole, Payment, Product, Trade,
//!     TradeHeader, TradeProperties, TradeType,
//! };
//! use pricer_core::types::{Currency, Date};
//!
//! let payment = Payment {
//!     payer: PartyRole::Party1,
//!     receiver: PartyRole::Party2,
//!     amount: Money::new(250_000.0, Currency::USD),
//!     payment_date: AdjustableDate::unadjusted(Date::from_ymd(2026, 3, 20).unwrap()),
//! };
//! let trade = Trade::new(
//!     TradeHeader { trade_id: "BP-1".into(), trade_date: None },
//!     [Party::new("p1", "BankA"), Party::new("p2", "BankB")],
//!     Product::BulletPayment(BulletPayment { payment }),
//! );
//! assert_eq!(trade.trade_type(), TradeType::BulletPayment);
//!
//! let props = TradeProperties::new()
//!     .with(keys::PARTY1, "BankA")
//!     .with(keys::PARTY2, "BankB");
//! assert_eq!(props.len(), 2);
//! ```

#![warn(missing_docs)]

pub mod error;
pub mod product;
pub mod properties;
pub mod trade;
pub mod types;

pub use error::{FpmlError, PropertyError};
pub use product::{
    BondTransaction, BulletPayment, CapFloor, EquityTransaction, Fra, FutureTransaction, FxOption,
    FxSingleLeg, FxSwap, GenericProduct, LeaseTransaction, LegRate, OptionType, Payment, Product,
    PropertyTransaction, Swap, SwapLeg, Swaption, TermDeposit,
};
pub use properties::{keys, TradeProperties};
pub use trade::{
    AdjustableDate, BusinessDayAdjustments, CollateralTerms, Money, Party, PartyRole, Trade,
    TradeHeader, TradeIdentifier,
};
pub use types::{ExchangeContractType, Frequency, ProductType, TradeType};
