//! Product table.
//!
//! One row per supported [`ProductType`]: the payload it is priced from, the
//! properties it needs, the pricer constructor and the reporter. The legacy
//! payload discriminant mapping lives next to it.

use adapter_fpml::{keys, ProductType, TradeType};

use super::BuildInput;
use crate::error::ValuationError;
use crate::pricers::{
    BondPricer, BulletPaymentPricer, CapFloorPricer, EquityPricer, FraPricer, FuturePricer,
    FxOptionPricer, FxSingleLegPricer, FxSwapPricer, LeasePricer, PricerKind, PropertyPricer,
    SwapPricer, SwaptionPricer, TermDepositPricer,
};
use crate::reporters::ProductReporter;

/// Pricer constructor.
pub(crate) type BuildFn = fn(&BuildInput<'_>) -> Result<PricerKind, ValuationError>;

/// Binding of a product type.
pub(crate) struct ProductSpec {
    pub product_type: ProductType,
    pub trade_type: TradeType,
    pub required: &'static [&'static str],
    pub optional: &'static [&'static str],
    pub reporter: ProductReporter,
    pub build: BuildFn,
}

impl ProductSpec {
    /// Whether `key` is read for this product.
    pub fn reads(&self, key: &str) -> bool {
        self.required.contains(&key) || self.optional.contains(&key)
    }
}

const NONE: &[&str] = &[];

static PRODUCT_TABLE: &[ProductSpec] = &[
    ProductSpec {
        product_type: ProductType::PropertyTransaction,
        trade_type: TradeType::PropertyTransaction,
        required: NONE,
        optional: &[keys::TRADE_DATE, keys::PROPERTY_IDENTIFIER],
        reporter: ProductReporter::PropertyTransaction,
        build: PropertyPricer::build,
    },
    ProductSpec {
        product_type: ProductType::LeaseTransaction,
        trade_type: TradeType::LeaseTransaction,
        required: NONE,
        optional: &[keys::TRADE_DATE, keys::LEASE_IDENTIFIER],
        reporter: ProductReporter::LeaseTransaction,
        build: LeasePricer::build,
    },
    ProductSpec {
        product_type: ProductType::EquityTransaction,
        trade_type: TradeType::EquityTransaction,
        required: &[keys::EFFECTIVE_DATE],
        optional: &[keys::TRADE_DATE, keys::REFERENCE_EQUITY],
        reporter: ProductReporter::EquityTransaction,
        build: EquityPricer::build,
    },
    ProductSpec {
        product_type: ProductType::BondTransaction,
        trade_type: TradeType::BondTransaction,
        required: &[keys::EFFECTIVE_DATE],
        optional: &[keys::TRADE_DATE, keys::BOND_TYPE],
        reporter: ProductReporter::BondTransaction,
        build: BondPricer::build,
    },
    ProductSpec {
        product_type: ProductType::FutureTransaction,
        trade_type: TradeType::FutureTransaction,
        required: &[keys::FUTURES_TYPE],
        optional: &[keys::TRADE_DATE],
        reporter: ProductReporter::FutureTransaction,
        build: FuturePricer::build,
    },
    ProductSpec {
        product_type: ProductType::InterestRateSwap,
        trade_type: TradeType::Swap,
        required: NONE,
        optional: NONE,
        reporter: ProductReporter::InterestRateSwap,
        build: SwapPricer::build,
    },
    ProductSpec {
        product_type: ProductType::AssetSwap,
        trade_type: TradeType::Swap,
        required: NONE,
        optional: NONE,
        reporter: ProductReporter::InterestRateSwap,
        build: SwapPricer::build,
    },
    ProductSpec {
        product_type: ProductType::CrossCurrencySwap,
        trade_type: TradeType::Swap,
        required: NONE,
        optional: NONE,
        reporter: ProductReporter::InterestRateSwap,
        build: SwapPricer::build,
    },
    ProductSpec {
        product_type: ProductType::FRA,
        trade_type: TradeType::Fra,
        required: NONE,
        optional: NONE,
        reporter: ProductReporter::ForwardRateAgreement,
        build: FraPricer::build,
    },
    ProductSpec {
        product_type: ProductType::CapFloor,
        trade_type: TradeType::CapFloor,
        required: NONE,
        optional: NONE,
        reporter: ProductReporter::CapFloor,
        build: CapFloorPricer::build,
    },
    ProductSpec {
        product_type: ProductType::FxSpot,
        trade_type: TradeType::FxSingleLeg,
        required: NONE,
        optional: NONE,
        reporter: ProductReporter::FxSingleLeg,
        build: FxSingleLegPricer::build,
    },
    ProductSpec {
        product_type: ProductType::FxForward,
        trade_type: TradeType::FxSingleLeg,
        required: NONE,
        optional: NONE,
        reporter: ProductReporter::FxSingleLeg,
        build: FxSingleLegPricer::build,
    },
    ProductSpec {
        product_type: ProductType::FxSwap,
        trade_type: TradeType::FxSwap,
        required: NONE,
        optional: NONE,
        reporter: ProductReporter::FxSwap,
        build: FxSwapPricer::build,
    },
    ProductSpec {
        product_type: ProductType::FxOption,
        trade_type: TradeType::FxOption,
        required: NONE,
        optional: NONE,
        reporter: ProductReporter::FxOptionLeg,
        build: FxOptionPricer::build,
    },
    ProductSpec {
        product_type: ProductType::BulletPayment,
        trade_type: TradeType::BulletPayment,
        required: NONE,
        optional: NONE,
        reporter: ProductReporter::BulletPayment,
        build: BulletPaymentPricer::build,
    },
    ProductSpec {
        product_type: ProductType::InterestRateSwaption,
        trade_type: TradeType::Swaption,
        required: &[keys::EFFECTIVE_DATE],
        optional: NONE,
        reporter: ProductReporter::InterestRateSwaption,
        build: SwaptionPricer::build,
    },
    ProductSpec {
        product_type: ProductType::TermDeposit,
        trade_type: TradeType::TermDeposit,
        required: NONE,
        optional: NONE,
        reporter: ProductReporter::TermDeposit,
        build: TermDepositPricer::build,
    },
];

static LEGACY_TYPES: &[(TradeType, ProductType)] = &[
    (TradeType::LeaseTransaction, ProductType::LeaseTransaction),
    (TradeType::PropertyTransaction, ProductType::PropertyTransaction),
    (TradeType::EquityTransaction, ProductType::EquityTransaction),
    (TradeType::BondTransaction, ProductType::BondTransaction),
    (TradeType::FutureTransaction, ProductType::FutureTransaction),
    (TradeType::Swap, ProductType::InterestRateSwap),
    (TradeType::Fra, ProductType::FRA),
    (TradeType::CapFloor, ProductType::CapFloor),
    (TradeType::FxSingleLeg, ProductType::FxSpot),
    (TradeType::FxSwap, ProductType::FxSwap),
    (TradeType::BulletPayment, ProductType::BulletPayment),
    (TradeType::TermDeposit, ProductType::TermDeposit),
    (TradeType::Swaption, ProductType::InterestRateSwaption),
    (TradeType::FxOption, ProductType::FxOption),
];

/// Table row of `product_type`.
pub(crate) fn spec_for(product_type: ProductType) -> Option<&'static ProductSpec> {
    PRODUCT_TABLE.iter().find(|spec| spec.product_type == product_type)
}

/// Legacy mapping of a payload discriminant.
pub(crate) fn legacy_product_type(trade_type: TradeType) -> Option<ProductType> {
    LEGACY_TYPES
        .iter()
        .find(|(tt, _)| *tt == trade_type)
        .map(|(_, pt)| *pt)
}

/// Product types a pricer can be bound to, in table order.
pub fn supported_product_types() -> impl Iterator<Item = ProductType> {
    PRODUCT_TABLE.iter().map(|spec| spec.product_type)
}
