//! Party relative valuation.
//!
//! Every pricer values its trade from the base party's side. The valuator
//! resolves which [`Multiplier`] expresses that value from the requesting
//! party's side and hands it to the calculation as an argument; nothing on
//! the bound product changes.
//!
//! Exactly one rule decides the multiplier, first match wins:
//!
//! | Rule | Multiplier |
//! |---|---|
//! | scenario is counterparty neutral | `Neutral` |
//! | requesting party is a role (`Party1`/`Party2`) | `Positive` if it is the base party, else `Negative` |
//! | requesting party is a party name, `Party1`'s name checked first | `Positive` if it names the base party, else `Negative` |
//! | otherwise | `UnknownParty` error |

use adapter_fpml::PartyRole;
use tracing::trace;

use crate::error::ValuationError;
use crate::pricers::PriceableProduct;
use crate::scenario::{AssetValuation, MarketScenario, Metric, Multiplier};

/// Resolves the multiplier for `requesting_party` against `base_party`.
///
/// # Examples
///
/// ```
/// use adapter_fpml::PartyRole;
/// use pricer_valuation::{resolve_multiplier, Multiplier};
///
/// let names = ["BankA".to_string(), "BankB".to_string()];
/// let m = resolve_multiplier(PartyRole::Party1, &names, "BankB", false).unwrap();
/// assert_eq!(m, Multiplier::Negative);
///
/// let m = resolve_multiplier(PartyRole::Party1, &names, "BankB", true).unwrap();
/// assert_eq!(m, Multiplier::Neutral);
/// ```
///
/// # Errors
///
/// `UnknownParty` when the scenario is not neutral and `requesting_party`
/// is neither a role nor one of `party_names`.
pub fn resolve_multiplier(
    base_party: PartyRole,
    party_names: &[String; 2],
    requesting_party: &str,
    counterparty_neutral: bool,
) -> Result<Multiplier, ValuationError> {
    if counterparty_neutral {
        return Ok(Multiplier::Neutral);
    }
    let requesting = match requesting_party.parse::<PartyRole>() {
        Ok(role) => role,
        Err(_) if requesting_party == party_names[0] => PartyRole::Party1,
        Err(_) if requesting_party == party_names[1] => PartyRole::Party2,
        Err(_) => return Err(ValuationError::UnknownParty(requesting_party.to_string())),
    };
    Ok(if requesting == base_party {
        Multiplier::Positive
    } else {
        Multiplier::Negative
    })
}

/// Values a bound product from a scenario's requesting party.
#[derive(Debug, Clone, Copy)]
pub struct PartyRelativeValuator<'a> {
    base_party: PartyRole,
    party_names: &'a [String; 2],
}

impl<'a> PartyRelativeValuator<'a> {
    /// Creates a valuator for a trade between `party_names` seen from `base_party`.
    pub fn new(base_party: PartyRole, party_names: &'a [String; 2]) -> Self {
        Self {
            base_party,
            party_names,
        }
    }

    /// Multiplier for the scenario's requesting party.
    ///
    /// # Errors
    ///
    /// As [`resolve_multiplier`].
    pub fn multiplier_for(&self, scenario: &MarketScenario) -> Result<Multiplier, ValuationError> {
        resolve_multiplier(
            self.base_party,
            self.party_names,
            scenario.requesting_party(),
            scenario.is_counterparty_neutral(),
        )
    }

    /// Computes `metrics` for `product` under `scenario`.
    ///
    /// Prerequisites are checked before anything is calculated.
    ///
    /// # Errors
    ///
    /// - `NullPrerequisite` when `product` or the scenario's market environment is absent
    /// - `UnknownParty` when the requesting party is not a counterparty
    /// - any calculation error of the product
    pub fn value(
        &self,
        product: Option<&PriceableProduct>,
        scenario: &MarketScenario,
        metrics: &[Metric],
    ) -> Result<AssetValuation, ValuationError> {
        let product = product.ok_or(ValuationError::NullPrerequisite("priceable product"))?;
        scenario.market()?;
        let multiplier = self.multiplier_for(scenario)?;

        trace!(
            trade = %product.identifier(),
            base_party = %self.base_party,
            requesting_party = scenario.requesting_party(),
            multiplier = multiplier.value(),
            "Resolved valuation multiplier"
        );
        product.calculate(scenario, metrics, multiplier)
    }
}
