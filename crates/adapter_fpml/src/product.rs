//! Product payloads.
//!
//! [`Product`] is the tagged union carried by a [`Trade`](crate::Trade); one
//! variant per FpML payload element. Counterparties are referenced by
//! [`PartyRole`].

use pricer_core::types::{Currency, Date, DayCountConvention};

use crate::trade::{AdjustableDate, BusinessDayAdjustments, Money, PartyRole};
use crate::types::{Frequency, TradeType};

/// A single cash payment between the counterparties.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Payment {
    /// Paying party
    pub payer: PartyRole,
    /// Receiving party
    pub receiver: PartyRole,
    /// Amount paid
    pub amount: Money,
    /// When it is paid
    pub payment_date: AdjustableDate,
}

/// Purchase of a physical property.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PropertyTransaction {
    /// Property reference
    pub property_id: String,
    /// Buyer
    pub buyer: PartyRole,
    /// Seller
    pub seller: PartyRole,
    /// Agreed purchase price
    pub purchase_price: Money,
    /// Settlement of the purchase price
    pub payment_date: AdjustableDate,
}

/// Lease of a property: a schedule of rent payments from tenant to landlord.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LeaseTransaction {
    /// Lease reference
    pub lease_id: String,
    /// Rent payer
    pub tenant: PartyRole,
    /// Rent receiver
    pub landlord: PartyRole,
    /// First rent payment date
    pub start_date: Date,
    /// Rent frequency
    pub payment_frequency: Frequency,
    /// Number of rent payments
    pub number_of_payments: u32,
    /// Initial rent per period
    pub rent: Money,
    /// Annual rent escalation, e.g. 0.03 for 3%
    pub annual_escalation: f64,
}

/// Purchase of a number of shares at a fixed price.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EquityTransaction {
    /// Equity identifier (ticker)
    pub equity_id: String,
    /// Buyer
    pub buyer: PartyRole,
    /// Seller
    pub seller: PartyRole,
    /// Number of shares
    pub number_of_units: f64,
    /// Agreed price per share
    pub unit_price: Money,
}

/// Purchase of a fixed coupon bond.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BondTransaction {
    /// Bond identifier
    pub bond_id: String,
    /// Buyer
    pub buyer: PartyRole,
    /// Seller
    pub seller: PartyRole,
    /// Face amount bought
    pub notional: Money,
    /// Annual coupon rate
    pub coupon_rate: f64,
    /// Coupon frequency
    pub coupon_frequency: Frequency,
    /// Coupon accrual basis
    pub day_count: DayCountConvention,
    /// Final redemption date
    pub maturity_date: Date,
    /// Agreed price, percent of face
    pub purchase_price: f64,
}

/// Position in an exchange traded future.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FutureTransaction {
    /// Exchange contract code, e.g. `IRH5`
    pub contract_code: String,
    /// Long party
    pub buyer: PartyRole,
    /// Short party
    pub seller: PartyRole,
    /// Number of contracts
    pub number_of_contracts: f64,
    /// Value of one point per contract
    pub point_value: f64,
    /// Traded price
    pub trade_price: f64,
    /// Settlement currency
    pub currency: Currency,
    /// Last trading date
    pub last_trading_date: Date,
}

/// Rate paid on a swap leg.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LegRate {
    /// Fixed annual rate
    Fixed(f64),
    /// Index rate plus spread
    Floating {
        /// Rate index name, e.g. `AUD-BBSW-3M`
        index: String,
        /// Spread over the index
        spread: f64,
    },
}

/// One stream of a swap.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SwapLeg {
    /// Party paying this leg
    pub payer: PartyRole,
    /// Party receiving this leg
    pub receiver: PartyRole,
    /// Notional and leg currency
    pub notional: Money,
    /// Accrual start
    pub effective_date: Date,
    /// Accrual end
    pub termination_date: Date,
    /// Coupon frequency
    pub frequency: Frequency,
    /// Accrual basis
    pub day_count: DayCountConvention,
    /// Payment date adjustment
    pub payment_adjustments: Option<BusinessDayAdjustments>,
    /// Fixed or floating rate
    pub rate: LegRate,
    /// Whether notional is exchanged at start and end
    pub principal_exchange: bool,
}

impl SwapLeg {
    /// Returns `true` for a fixed leg.
    pub fn is_fixed(&self) -> bool {
        matches!(self.rate, LegRate::Fixed(_))
    }
}

/// Interest rate, asset or cross currency swap.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Swap {
    /// Swap streams
    pub legs: Vec<SwapLeg>,
}

impl Swap {
    /// The first fixed leg, if any.
    pub fn fixed_leg(&self) -> Option<&SwapLeg> {
        self.legs.iter().find(|leg| leg.is_fixed())
    }

    /// Distinct leg currencies in leg order.
    pub fn currencies(&self) -> Vec<Currency> {
        let mut out = Vec::new();
        for leg in &self.legs {
            if !out.contains(&leg.notional.currency) {
                out.push(leg.notional.currency);
            }
        }
        out
    }
}

/// Forward rate agreement.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Fra {
    /// Fixed rate payer
    pub buyer: PartyRole,
    /// Fixed rate receiver
    pub seller: PartyRole,
    /// Notional
    pub notional: Money,
    /// Accrual start
    pub adjusted_effective_date: Date,
    /// Accrual end
    pub adjusted_termination_date: Date,
    /// Settlement date
    pub payment_date: AdjustableDate,
    /// Contract rate
    pub fixed_rate: f64,
    /// Floating rate index
    pub index: String,
    /// Accrual basis
    pub day_count: DayCountConvention,
}

/// Interest rate cap, floor or collar on a floating stream.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CapFloor {
    /// Option holder
    pub buyer: PartyRole,
    /// Option writer
    pub seller: PartyRole,
    /// The capped or floored floating stream
    pub floating_leg: SwapLeg,
    /// Cap strike
    pub cap_rate: Option<f64>,
    /// Floor strike
    pub floor_rate: Option<f64>,
    /// Upfront premium
    pub premium: Option<Payment>,
}

/// FX spot or outright forward: two currency amounts exchanged on one date.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FxSingleLeg {
    /// Payer of the first currency amount (receiver of the second)
    pub currency1_payer: PartyRole,
    /// First exchanged amount
    pub currency1: Money,
    /// Second exchanged amount
    pub currency2: Money,
    /// Settlement date
    pub value_date: Date,
}

impl FxSingleLeg {
    /// Agreed rate in units of currency 2 per currency 1.
    pub fn contract_rate(&self) -> f64 {
        if self.currency1.amount == 0.0 {
            return 0.0;
        }
        self.currency2.amount / self.currency1.amount
    }
}

/// FX swap: a near and a far exchange.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FxSwap {
    /// Near exchange
    pub near_leg: FxSingleLeg,
    /// Far exchange
    pub far_leg: FxSingleLeg,
}

/// Call or put.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OptionType {
    /// Right to buy
    Call,
    /// Right to sell
    Put,
}

/// European FX option on the base currency.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FxOption {
    /// Option holder
    pub buyer: PartyRole,
    /// Option writer
    pub seller: PartyRole,
    /// Call or put on the base currency
    pub option_type: OptionType,
    /// Base currency notional
    pub notional: Money,
    /// Counter currency
    pub counter_currency: Currency,
    /// Strike, counter currency per base currency
    pub strike: f64,
    /// Expiry date
    pub expiry_date: Date,
    /// Settlement date
    pub value_date: Date,
    /// Upfront premium
    pub premium: Option<Payment>,
}

/// Single fixed payment.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BulletPayment {
    /// The payment
    pub payment: Payment,
}

/// European option to enter an underlying swap.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Swaption {
    /// Option holder
    pub buyer: PartyRole,
    /// Option writer
    pub seller: PartyRole,
    /// Underlying swap; the holder takes the fixed leg payer side if it is the buyer
    pub swap: Swap,
    /// Exercise date
    pub expiry_date: Date,
    /// Upfront premium
    pub premium: Option<Payment>,
}

/// Fixed rate deposit: principal out at start, principal plus interest back at maturity.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TermDeposit {
    /// Depositor (pays the initial principal)
    pub initial_payer: PartyRole,
    /// Deposit taker
    pub initial_receiver: PartyRole,
    /// Start date
    pub start_date: Date,
    /// Maturity date
    pub maturity_date: Date,
    /// Principal
    pub principal: Money,
    /// Deposit rate
    pub fixed_rate: f64,
    /// Interest basis
    pub day_count: DayCountConvention,
}

/// Payload of a kind this model does not describe in detail.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GenericProduct {
    /// Payload element name
    pub trade_type: TradeType,
    /// Free text description
    pub description: String,
}

/// Product payload of a trade.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Product {
    /// Property purchase
    PropertyTransaction(PropertyTransaction),
    /// Property lease
    LeaseTransaction(LeaseTransaction),
    /// Equity purchase
    EquityTransaction(EquityTransaction),
    /// Bond purchase
    BondTransaction(BondTransaction),
    /// Future position
    FutureTransaction(FutureTransaction),
    /// Swap
    Swap(Swap),
    /// Forward rate agreement
    Fra(Fra),
    /// Cap or floor
    CapFloor(CapFloor),
    /// FX spot or forward
    FxSingleLeg(FxSingleLeg),
    /// FX swap
    FxSwap(FxSwap),
    /// FX option
    FxOption(FxOption),
    /// Bullet payment
    BulletPayment(BulletPayment),
    /// Swaption
    Swaption(Swaption),
    /// Term deposit
    TermDeposit(TermDeposit),
    /// Any other payload
    Other(GenericProduct),
}

impl Product {
    /// Payload element name.
    ///
    /// ```
    /// use adapter_fpml::{GenericProduct, Product, TradeType};
    ///
    /// let product = Product::Other(GenericProduct {
    ///     trade_type: TradeType::Repo,
    ///     description: "GC repo".into(),
    /// });
    /// assert_eq!(product.trade_type(), TradeType::Repo);
    /// ```
    pub fn trade_type(&self) -> TradeType {
        match self {
            Product::PropertyTransaction(_) => TradeType::PropertyTransaction,
            Product::LeaseTransaction(_) => TradeType::LeaseTransaction,
            Product::EquityTransaction(_) => TradeType::EquityTransaction,
            Product::BondTransaction(_) => TradeType::BondTransaction,
            Product::FutureTransaction(_) => TradeType::FutureTransaction,
            Product::Swap(_) => TradeType::Swap,
            Product::Fra(_) => TradeType::Fra,
            Product::CapFloor(_) => TradeType::CapFloor,
            Product::FxSingleLeg(_) => TradeType::FxSingleLeg,
            Product::FxSwap(_) => TradeType::FxSwap,
            Product::FxOption(_) => TradeType::FxOption,
            Product::BulletPayment(_) => TradeType::BulletPayment,
            Product::Swaption(_) => TradeType::Swaption,
            Product::TermDeposit(_) => TradeType::TermDeposit,
            Product::Other(generic) => generic.trade_type,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leg(rate: LegRate, ccy: Currency) -> SwapLeg {
        SwapLeg {
            payer: PartyRole::Party1,
            receiver: PartyRole::Party2,
            notional: Money::new(1_000_000.0, ccy),
            effective_date: Date::from_ymd(2025, 1, 15).unwrap(),
            termination_date: Date::from_ymd(2027, 1, 15).unwrap(),
            frequency: Frequency::Quarterly,
            day_count: DayCountConvention::ActualActual365,
            payment_adjustments: None,
            rate,
            principal_exchange: false,
        }
    }

    #[test]
    fn test_swap_currencies_are_distinct_in_leg_order() {
        let swap = Swap {
            legs: vec![
                leg(LegRate::Fixed(0.04), Currency::AUD),
                leg(
                    LegRate::Floating {
                        index: "USD-SOFR".into(),
                        spread: 0.0,
                    },
                    Currency::USD,
                ),
                leg(LegRate::Fixed(0.01), Currency::AUD),
            ],
        };
        assert_eq!(swap.currencies(), vec![Currency::AUD, Currency::USD]);
        assert_eq!(swap.fixed_leg().map(|l| l.notional.currency), Some(Currency::AUD));
    }

    #[test]
    fn test_fx_contract_rate() {
        let fx = FxSingleLeg {
            currency1_payer: PartyRole::Party1,
            currency1: Money::new(1_000_000.0, Currency::AUD),
            currency2: Money::new(650_000.0, Currency::USD),
            value_date: Date::from_ymd(2025, 6, 18).unwrap(),
        };
        assert!((fx.contract_rate() - 0.65).abs() < 1e-12);
    }

    #[test]
    fn test_payload_trade_types() {
        let swap = Product::Swap(Swap { legs: vec![] });
        assert_eq!(swap.trade_type(), TradeType::Swap);
    }
}
