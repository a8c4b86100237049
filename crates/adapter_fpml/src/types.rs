//! Coded enumerations of the trade model.
//!
//! - [`TradeType`]: the payload element name of an FpML trade (legacy discriminant)
//! - [`ProductType`]: the explicit product classification carried in trade properties
//! - [`ExchangeContractType`]: futures contract classes
//! - [`Frequency`]: coupon and rent payment frequencies
//!
//! All codes parse case-insensitively and print in their FpML spelling.

use std::fmt;
use std::str::FromStr;

use crate::error::FpmlError;

macro_rules! coded_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $kind:literal {
            $( $(#[$vmeta:meta])* $variant:ident => $code:literal, )+
        }
    ) => {
        $(#[$meta])*
        #[non_exhaustive]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        pub enum $name {
            $( $(#[$vmeta])* $variant, )+
        }

        impl $name {
            /// Every variant, in declaration order.
            pub const ALL: &'static [$name] = &[ $( $name::$variant, )+ ];

            /// FpML spelling of the code.
            pub fn code(&self) -> &'static str {
                match self {
                    $( $name::$variant => $code, )+
                }
            }
        }

        impl FromStr for $name {
            type Err = FpmlError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let wanted = s.trim();
                $name::ALL
                    .iter()
                    .copied()
                    .find(|v| v.code().eq_ignore_ascii_case(wanted))
                    .ok_or_else(|| FpmlError::UnknownCode {
                        kind: $kind,
                        value: s.to_string(),
                    })
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.code())
            }
        }
    };
}

coded_enum! {
    /// Payload element name of a trade.
    ///
    /// Older trade records carry only this discriminant; it is mapped onto a
    /// [`ProductType`] when no explicit product type is present.
    ///
    /// ```
    /// use adapter_fpml::TradeType;
    ///
    /// let tt: TradeType = "fxSingleLeg".parse().unwrap();
    /// assert_eq!(tt, TradeType::FxSingleLeg);
    /// assert_eq!(tt.to_string(), "fxSingleLeg");
    /// ```
    TradeType, "trade type" {
        /// Physical property purchase.
        PropertyTransaction => "propertyTransaction",
        /// Property lease.
        LeaseTransaction => "leaseTransaction",
        /// Equity purchase or sale.
        EquityTransaction => "equityTransaction",
        /// Bond purchase or sale.
        BondTransaction => "bondTransaction",
        /// Exchange traded future position.
        FutureTransaction => "futureTransaction",
        /// Interest rate or cross currency swap.
        Swap => "swap",
        /// Forward rate agreement.
        Fra => "fra",
        /// Interest rate cap or floor.
        CapFloor => "capFloor",
        /// FX spot or outright forward.
        FxSingleLeg => "fxSingleLeg",
        /// FX swap (near and far leg).
        FxSwap => "fxSwap",
        /// Vanilla FX option.
        FxOption => "fxOption",
        /// Single fixed payment.
        BulletPayment => "bulletPayment",
        /// Option on an interest rate swap.
        Swaption => "swaption",
        /// Fixed rate term deposit.
        TermDeposit => "termDeposit",
        /// Commodity forward.
        CommodityForward => "commodityForward",
        /// Credit default swap.
        CreditDefaultSwap => "creditDefaultSwap",
        /// Equity option.
        EquityOption => "equityOption",
        /// Bond option.
        BondOption => "bondOption",
        /// Equity forward.
        EquityForward => "equityForward",
        /// Repurchase agreement.
        Repo => "repo",
    }
}

coded_enum! {
    /// Explicit product classification.
    ///
    /// `Undefined` means "not classified"; classification then falls back to
    /// the trade's [`TradeType`].
    ProductType, "product type" {
        /// No classification supplied.
        Undefined => "Undefined",
        /// Physical property purchase.
        PropertyTransaction => "PropertyTransaction",
        /// Property lease.
        LeaseTransaction => "LeaseTransaction",
        /// Equity purchase or sale.
        EquityTransaction => "EquityTransaction",
        /// Bond purchase or sale.
        BondTransaction => "BondTransaction",
        /// Exchange traded future position.
        FutureTransaction => "FutureTransaction",
        /// Single currency interest rate swap.
        InterestRateSwap => "InterestRateSwap",
        /// Asset swap.
        AssetSwap => "AssetSwap",
        /// Cross currency swap.
        CrossCurrencySwap => "CrossCurrencySwap",
        /// Forward rate agreement.
        FRA => "FRA",
        /// Interest rate cap or floor.
        CapFloor => "CapFloor",
        /// FX spot.
        FxSpot => "FxSpot",
        /// FX outright forward.
        FxForward => "FxForward",
        /// FX swap.
        FxSwap => "FxSwap",
        /// Vanilla FX option.
        FxOption => "FxOption",
        /// Single fixed payment.
        BulletPayment => "BulletPayment",
        /// Option on an interest rate swap.
        InterestRateSwaption => "InterestRateSwaption",
        /// Fixed rate term deposit.
        TermDeposit => "TermDeposit",
        /// Commodity forward.
        CommodityForward => "CommodityForward",
        /// Inflation swap.
        InflationSwap => "InflationSwap",
        /// Credit default swap.
        CreditDefaultSwap => "CreditDefaultSwap",
        /// Total return swap.
        TotalReturnSwap => "TotalReturnSwap",
        /// Variance swap.
        VarianceSwap => "VarianceSwap",
        /// Equity option.
        EquityOption => "EquityOption",
        /// Bond option.
        BondOption => "BondOption",
        /// Equity forward.
        EquityForward => "EquityForward",
        /// Dividend swap.
        DividendSwap => "DividendSwap",
        /// Loan.
        Loan => "Loan",
        /// Repurchase agreement.
        Repo => "Repo",
    }
}

coded_enum! {
    /// Futures contract class, required to price a future transaction.
    ExchangeContractType, "futures type" {
        /// Interest rate future.
        IRFuture => "IRFuture",
        /// Option on an interest rate future.
        IRFutureOption => "IRFutureOption",
        /// Bond future.
        BondFuture => "BondFuture",
        /// Option on a bond future.
        BondFutureOption => "BondFutureOption",
        /// Equity index or single stock future.
        EquityFuture => "EquityFuture",
        /// Option on an equity future.
        EquityFutureOption => "EquityFutureOption",
        /// Commodity future.
        CommodityFuture => "CommodityFuture",
        /// Option on a commodity future.
        CommodityFutureOption => "CommodityFutureOption",
        /// FX future.
        FxFuture => "FxFuture",
    }
}

coded_enum! {
    /// Regular payment frequency of coupons and rent.
    ///
    /// ```
    /// use adapter_fpml::Frequency;
    ///
    /// assert_eq!(Frequency::Quarterly.months(), 3);
    /// assert_eq!("6M".parse::<Frequency>().unwrap(), Frequency::SemiAnnual);
    /// ```
    Frequency, "frequency" {
        /// Every twelve months.
        Annual => "1Y",
        /// Every six months.
        SemiAnnual => "6M",
        /// Every three months.
        Quarterly => "3M",
        /// Every month.
        Monthly => "1M",
    }
}

impl Frequency {
    /// Months in one regular period.
    #[inline]
    pub fn months(&self) -> u32 {
        match self {
            Frequency::Annual => 12,
            Frequency::SemiAnnual => 6,
            Frequency::Quarterly => 3,
            Frequency::Monthly => 1,
        }
    }

    /// Regular periods per year.
    #[inline]
    pub fn periods_per_year(&self) -> u32 {
        12 / self.months()
    }
}

impl ExchangeContractType {
    /// Returns `true` for options on futures.
    pub fn is_option(&self) -> bool {
        matches!(
            self,
            ExchangeContractType::IRFutureOption
                | ExchangeContractType::BondFutureOption
                | ExchangeContractType::EquityFutureOption
                | ExchangeContractType::CommodityFutureOption
        )
    }

    /// Returns `true` when the contract is quoted as `100 - rate`.
    pub fn is_rate_quoted(&self) -> bool {
        matches!(
            self,
            ExchangeContractType::IRFuture | ExchangeContractType::IRFutureOption
        )
    }
}

impl ProductType {
    /// Returns `true` for the "no classification" marker.
    #[inline]
    pub fn is_undefined(&self) -> bool {
        matches!(self, ProductType::Undefined)
    }
}
