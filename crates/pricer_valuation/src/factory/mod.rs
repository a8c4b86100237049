//! Pricer construction.
//!
//! [`PricerFactory::construct`] turns a trade, its properties and its
//! calendars into a bound [`TradePricer`]:
//!
//! 1. derive the [`TradeIdentifier`] and the ordered party names;
//! 2. resolve the base party;
//! 3. classify the trade ([`TradeClassifier`]);
//! 4. look up the product table row, check the payload and extract the
//!    row's required and optional properties;
//! 5. build the pricer and pair it with the row's reporter;
//! 6. attach party names and the collateral flag, per [`PartyContextPolicy`].

pub(crate) mod table;

use std::sync::Arc;

use adapter_fpml::{
    keys, AdjustableDate, ExchangeContractType, PartyRole, Product, ProductType, PropertyError,
    Trade, TradeIdentifier, TradeProperties, TradeType,
};
use pricer_core::types::{BusinessDayConvention, CalendarResolver, Date, SharedCalendar};
use tracing::{debug, warn};

use crate::classifier::{ClassificationPath, TradeClassifier};
use crate::config::{PartyContextPolicy, PricerConfig};
use crate::error::ValuationError;
use crate::pricers::schedule;
use crate::pricers::{PriceableProduct, PricerCommon};
use crate::trade_pricer::TradePricer;

pub use table::supported_product_types;

/// Two calendars supplied for one leg or settlement of a trade.
///
/// By convention `first` is the fixing or settlement calendar and `second`
/// the payment calendar.
#[derive(Debug, Clone, Default)]
pub struct CalendarPair {
    first: Option<SharedCalendar>,
    second: Option<SharedCalendar>,
}

impl CalendarPair {
    /// Creates a pair.
    pub fn new(first: Option<SharedCalendar>, second: Option<SharedCalendar>) -> Self {
        Self { first, second }
    }

    /// A pair with the same calendar in both positions.
    pub fn both(calendar: SharedCalendar) -> Self {
        Self {
            first: Some(calendar.clone()),
            second: Some(calendar),
        }
    }

    /// Fixing calendar.
    #[inline]
    pub fn fixing(&self) -> Option<&SharedCalendar> {
        self.first.as_ref()
    }

    /// Settlement calendar (the fixing position).
    #[inline]
    pub fn settlement(&self) -> Option<&SharedCalendar> {
        self.first.as_ref()
    }

    /// Payment calendar.
    #[inline]
    pub fn payment(&self) -> Option<&SharedCalendar> {
        self.second.as_ref()
    }
}

/// Properties read for the bound product type.
#[derive(Debug, Clone, Default)]
pub(crate) struct ExtractedFields {
    pub trade_date: Option<Date>,
    pub effective_date: Option<Date>,
    pub reference: Option<String>,
    pub bond_type: Option<String>,
    pub futures_type: Option<ExchangeContractType>,
}

impl ExtractedFields {
    fn extract(
        props: &TradeProperties,
        spec: &table::ProductSpec,
        identifier: &TradeIdentifier,
    ) -> Result<Self, ValuationError> {
        for key in spec.required {
            props.require_str(key)?;
        }

        let mut fields = ExtractedFields {
            trade_date: identifier.trade_date,
            ..ExtractedFields::default()
        };
        if spec.reads(keys::EFFECTIVE_DATE) {
            fields.effective_date = props.get_date(keys::EFFECTIVE_DATE)?;
        }
        if spec.reads(keys::FUTURES_TYPE) {
            fields.futures_type = props.get_parsed(keys::FUTURES_TYPE)?;
        }
        if spec.reads(keys::BOND_TYPE) {
            fields.bond_type = props.get_str(keys::BOND_TYPE).map(str::to_string);
        }
        fields.reference = [
            keys::PROPERTY_IDENTIFIER,
            keys::LEASE_IDENTIFIER,
            keys::REFERENCE_EQUITY,
        ]
        .into_iter()
        .filter(|key| spec.reads(key))
        .find_map(|key| props.get_str(key))
        .map(str::to_string);
        Ok(fields)
    }
}

/// Everything a pricer constructor may read.
pub(crate) struct BuildInput<'a> {
    pub trade: &'a Trade,
    pub product_type: ProductType,
    pub base_party: PartyRole,
    pub calendars: &'a [CalendarPair],
    pub fields: &'a ExtractedFields,
    pub resolver: &'a dyn CalendarResolver,
}

impl BuildInput<'_> {
    /// Payload mismatch for a constructor expecting `expected`.
    pub fn mismatch(&self, expected: TradeType) -> ValuationError {
        ValuationError::ProductMismatch {
            product_type: self.product_type.to_string(),
            expected,
            found: self.trade.trade_type(),
        }
    }

    /// Settlement calendar: first calendar of the first pair.
    pub fn settlement_calendar(&self) -> Option<SharedCalendar> {
        self.calendars.first().and_then(|p| p.settlement().cloned())
    }

    /// Fixing calendar: first calendar of the first pair.
    pub fn fixing_calendar(&self) -> Option<SharedCalendar> {
        self.calendars.first().and_then(|p| p.fixing().cloned())
    }

    /// Payment calendar: second calendar of the first pair.
    pub fn payment_calendar(&self) -> Option<SharedCalendar> {
        self.calendars.first().and_then(|p| p.payment().cloned())
    }

    /// Payment calendar of leg `index`: second calendar of the leg's pair.
    pub fn leg_payment_calendar(&self, index: usize) -> Option<SharedCalendar> {
        self.calendars.get(index).and_then(|p| p.payment().cloned())
    }

    /// Effective date property, which the table marks required.
    pub fn effective_date(&self) -> Result<Date, ValuationError> {
        self.fields
            .effective_date
            .ok_or_else(|| ValuationError::MissingProperty(keys::EFFECTIVE_DATE.to_string()))
    }

    /// `date` adjusted on `calendar` under its own clause, else `fallback`.
    pub fn adjust(
        &self,
        calendar: Option<&SharedCalendar>,
        date: &AdjustableDate,
        fallback: BusinessDayConvention,
    ) -> Result<Date, ValuationError> {
        let convention = date
            .adjustments
            .as_ref()
            .map(|a| a.convention)
            .unwrap_or(fallback);
        schedule::adjust(calendar.map(|c| c.as_ref()), date.unadjusted_date, convention)
    }

    /// Calendar for a bullet payment: the supplied payment calendar, else one
    /// resolved from the payment date's business centres, else none.
    pub fn bullet_payment_calendar(
        &self,
        payment_date: &AdjustableDate,
    ) -> Result<Option<SharedCalendar>, ValuationError> {
        if let Some(calendar) = self.payment_calendar() {
            return Ok(Some(calendar));
        }
        match &payment_date.adjustments {
            Some(adjustments) if !adjustments.business_centers.is_empty() => {
                let calendar = self.resolver.resolve(&adjustments.business_centers)?;
                debug!(calendar = %calendar.name(), "Resolved payment calendar from payment date");
                Ok(Some(calendar))
            }
            _ => Ok(None),
        }
    }
}

/// Builds [`TradePricer`]s.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use adapter_fpml::{
///     keys, AdjustableDate, BulletPayment, Money, Party, PartyRole, Payment, Product, Trade,
///     TradeHeader, TradeProperties,
/// };
/// use pricer_core::types::{Currency, Date, StaticCalendarResolver};
/// use pricer_valuation::{PricerConfig, PricerFactory};
///
/// let trade = Trade::new(
///     TradeHeader { trade_id: "BP-1".into(), trade_date: None },
///     [Party::new("p1", "BankA"), Party::new("p2", "BankB")],
///     Product::BulletPayment(BulletPayment {
///         payment: Payment {
///             payer: PartyRole::Party1,
///             receiver: PartyRole::Party2,
///             amount: Money::new(1_000_000.0, Currency::USD),
///             payment_date: AdjustableDate::unadjusted(Date::from_ymd(2026, 3, 20).unwrap()),
///         },
///     }),
/// );
/// let props = TradeProperties::new()
///     .with(keys::PARTY1, "BankA")
///     .with(keys::PARTY2, "BankB");
///
/// let factory = PricerFactory::new(Arc::new(StaticCalendarResolver::new()), PricerConfig::default());
/// let pricer = factory.construct(&trade, &props, &[], None).unwrap();
/// assert_eq!(pricer.trade_identifier().id, "BP-1");
/// ```
#[derive(Clone)]
pub struct PricerFactory {
    resolver: Arc<dyn CalendarResolver>,
    config: PricerConfig,
}

impl PricerFactory {
    /// Creates a factory.
    pub fn new(resolver: Arc<dyn CalendarResolver>, config: PricerConfig) -> Self {
        Self { resolver, config }
    }

    /// Configuration handed to every pricer built.
    pub fn config(&self) -> &PricerConfig {
        &self.config
    }

    /// Binds `trade` to its pricer and reporter.
    ///
    /// `forecast_rate_interpolation` falls back to the configured default.
    ///
    /// # Errors
    ///
    /// - `MissingProperty` when `Party1`, `Party2` or a property the product
    ///   requires is absent
    /// - `InvalidEnumValue` when `BaseParty`, `FuturesType` or a date property
    ///   does not parse
    /// - `UnsupportedProductType` when the `ProductType` tag is not a known code
    ///   or no pricer is bound to the classification
    /// - `ProductMismatch` when the explicit product type disagrees with the payload
    /// - `Calendar` when a payment calendar cannot be resolved
    pub fn construct(
        &self,
        trade: &Trade,
        props: &TradeProperties,
        calendar_pairs: &[CalendarPair],
        forecast_rate_interpolation: Option<bool>,
    ) -> Result<TradePricer, ValuationError> {
        let identifier =
            TradeIdentifier::from_properties(props, &trade.header).map_err(|err| match err {
                PropertyError::InvalidValue { key, value, .. } if key == keys::PRODUCT_TYPE => {
                    ValuationError::UnsupportedProductType(value)
                }
                other => other.into(),
            })?;
        let party_names = [
            props.require_str(keys::PARTY1)?.to_string(),
            props.require_str(keys::PARTY2)?.to_string(),
        ];
        let base_party = resolve_base_party(props, &party_names)?;

        let classification = TradeClassifier::classify(identifier.product_type, trade.trade_type())?;
        let spec = table::spec_for(classification.product_type).ok_or_else(|| {
            ValuationError::UnsupportedProductType(classification.product_type.to_string())
        })?;
        if spec.trade_type != trade.trade_type() {
            return Err(ValuationError::ProductMismatch {
                product_type: spec.product_type.to_string(),
                expected: spec.trade_type,
                found: trade.trade_type(),
            });
        }
        if let Product::Other(generic) = &trade.product {
            return Err(ValuationError::UnsupportedProductType(generic.trade_type.to_string()));
        }

        let fields = ExtractedFields::extract(props, spec, &identifier)?;
        let input = BuildInput {
            trade,
            product_type: spec.product_type,
            base_party,
            calendars: calendar_pairs,
            fields: &fields,
            resolver: self.resolver.as_ref(),
        };
        let kind = (spec.build)(&input)?;

        let common = PricerCommon {
            product_type: spec.product_type,
            identifier: identifier.clone(),
            base_party,
            party_names: None,
            is_collateralised: false,
            forecast_rate_interpolation: forecast_rate_interpolation
                .unwrap_or(self.config.forecast_rate_interpolation),
        };
        let mut product = PriceableProduct::new(common, kind);

        let attach = classification.path == ClassificationPath::Legacy
            || self.config.party_context == PartyContextPolicy::AllPaths;
        if attach {
            product.attach_party_context(party_names.clone(), trade.is_collateralised());
        } else {
            warn!(
                trade = %identifier,
                product_type = %spec.product_type,
                "Party context not attached on the explicit classification path"
            );
        }

        debug!(
            trade = %identifier,
            product_type = %spec.product_type,
            reporter = ?spec.reporter,
            base_party = %base_party,
            path = %classification.path,
            "Bound trade pricer"
        );

        Ok(TradePricer::from_parts(
            product,
            spec.reporter,
            classification,
            party_names,
            trade.header.clone(),
            self.config.clone(),
        ))
    }
}

impl std::fmt::Debug for PricerFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PricerFactory")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// `BaseParty` holds a role or one of the party names; absent means `Party1`.
fn resolve_base_party(
    props: &TradeProperties,
    party_names: &[String; 2],
) -> Result<PartyRole, ValuationError> {
    let Some(value) = props.get_str(keys::BASE_PARTY) else {
        return Ok(PartyRole::Party1);
    };
    if let Ok(role) = value.parse::<PartyRole>() {
        return Ok(role);
    }
    if value == party_names[0] {
        Ok(PartyRole::Party1)
    } else if value == party_names[1] {
        Ok(PartyRole::Party2)
    } else {
        Err(ValuationError::InvalidEnumValue {
            field: keys::BASE_PARTY.to_string(),
            value: value.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names() -> [String; 2] {
        ["BankA".to_string(), "BankB".to_string()]
    }

    #[test]
    fn test_base_party_defaults_to_party1() {
        let props = TradeProperties::new();
        assert_eq!(resolve_base_party(&props, &names()).unwrap(), PartyRole::Party1);
    }

    #[test]
    fn test_base_party_by_role_or_name() {
        let props = TradeProperties::new().with(keys::BASE_PARTY, "party2");
        assert_eq!(resolve_base_party(&props, &names()).unwrap(), PartyRole::Party2);

        let props = TradeProperties::new().with(keys::BASE_PARTY, "BankB");
        assert_eq!(resolve_base_party(&props, &names()).unwrap(), PartyRole::Party2);

        let props = TradeProperties::new().with(keys::BASE_PARTY, "BankA");
        assert_eq!(resolve_base_party(&props, &names()).unwrap(), PartyRole::Party1);
    }

    #[test]
    fn test_base_party_unknown_value() {
        let props = TradeProperties::new().with(keys::BASE_PARTY, "BankC");
        assert_eq!(
            resolve_base_party(&props, &names()).unwrap_err(),
            ValuationError::InvalidEnumValue {
                field: "BaseParty".to_string(),
                value: "BankC".to_string(),
            }
        );
    }

    #[test]
    fn test_calendar_pair_positions() {
        use pricer_core::types::{BusinessCalendar, BusinessCenter, HolidayCalendar};
        let cal: SharedCalendar =
            Arc::new(HolidayCalendar::weekends_only(vec![BusinessCenter::new("GBLO").unwrap()]));
        let pair = CalendarPair::new(Some(cal.clone()), None);
        assert!(pair.fixing().is_some());
        assert!(pair.settlement().is_some());
        assert!(pair.payment().is_none());
        assert!(CalendarPair::default().fixing().is_none());

        let both = CalendarPair::both(cal);
        assert_eq!(both.fixing().map(|c| c.name()), Some("GBLO".to_string()));
        assert_eq!(both.payment().map(|c| c.name()), Some("GBLO".to_string()));
    }
}
