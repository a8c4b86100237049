//! Valuation reports.

use std::fmt;
use std::str::FromStr;

use adapter_fpml::{Product, ProductType, TradeHeader};
use serde::{Deserialize, Serialize};

use crate::error::ValuationError;
use crate::pricers::PriceableProduct;
use crate::scenario::{AssetValuation, MarketScenario};

/// Selects what a valuation report carries besides the valuation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ValuationReportType {
    /// Valuation plus a rebuilt structural snapshot of the product.
    Full,
    /// Valuation only.
    Summary,
    /// Valuation only.
    #[default]
    Default,
}

impl ValuationReportType {
    /// Whether the report carries a product snapshot.
    #[inline]
    pub fn includes_product(&self) -> bool {
        matches!(self, ValuationReportType::Full)
    }
}

impl fmt::Display for ValuationReportType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

impl FromStr for ValuationReportType {
    type Err = ValuationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "full" => Ok(ValuationReportType::Full),
            "summary" => Ok(ValuationReportType::Summary),
            "default" | "" => Ok(ValuationReportType::Default),
            _ => Err(ValuationError::InvalidEnumValue {
                field: "ValuationReportType".to_string(),
                value: s.to_string(),
            }),
        }
    }
}

/// Trade as carried by a report item.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TradeRecord {
    /// Trade reference, `source.id`
    pub id: String,
    /// Trade header
    pub header: TradeHeader,
    /// Rebuilt product, `Full` reports only
    pub product: Option<Product>,
    /// Classified product type, `Full` reports only
    pub product_type: Option<ProductType>,
}

/// One trade and its valuation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TradeValuationItem {
    /// Computed measures
    pub valuation: AssetValuation,
    /// Valued trade
    pub trade: TradeRecord,
}

/// Output of one pricing request: one scenario, fresh on every call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValuationReport {
    /// Report type requested
    pub report_type: ValuationReportType,
    /// Name of the market environment priced against
    pub market: String,
    /// Requesting party the values are expressed for
    pub requesting_party: String,
    /// Valued trades
    pub items: Vec<TradeValuationItem>,
}

impl ValuationReport {
    /// Valuation of the first item.
    pub fn valuation(&self) -> Option<&AssetValuation> {
        self.items.first().map(|item| &item.valuation)
    }

    /// Returns `true` when every item carries a product snapshot.
    pub fn has_product_snapshot(&self) -> bool {
        !self.items.is_empty() && self.items.iter().all(|item| item.trade.product.is_some())
    }
}

/// Wraps valuations into [`ValuationReport`]s.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValuationReportAssembler;

impl ValuationReportAssembler {
    /// Report over one valuation of `product`.
    ///
    /// Only [`ValuationReportType::Full`] rebuilds the product.
    pub fn assemble(
        valuation: AssetValuation,
        report_type: ValuationReportType,
        scenario: &MarketScenario,
        header: &TradeHeader,
        product: &PriceableProduct,
    ) -> ValuationReport {
        let (snapshot, product_type) = if report_type.includes_product() {
            (Some(product.build_the_product()), Some(product.product_type()))
        } else {
            (None, None)
        };
        let trade = TradeRecord {
            id: product.identifier().unique_identifier(),
            header: header.clone(),
            product: snapshot,
            product_type,
        };
        ValuationReport {
            report_type,
            market: scenario
                .market()
                .map(|m| m.name().to_string())
                .unwrap_or_default(),
            requesting_party: scenario.requesting_party().to_string(),
            items: vec![TradeValuationItem { valuation, trade }],
        }
    }
}
