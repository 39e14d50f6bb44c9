use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

use crate::coerce::{lenient_f64, lenient_u32, parse_number};

/// One rentable unit of the property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Unit {
    /// Unique within one rent roll. Missing, zero or repeated ids are
    /// renumbered when the roll is read.
    #[serde(default, deserialize_with = "lenient_u32")]
    pub id: u32,
    #[serde(default, deserialize_with = "lenient_u32")]
    pub bedrooms: u32,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub bathrooms: f64,
    /// Monthly rent
    #[serde(default, deserialize_with = "lenient_f64")]
    pub rent: f64,
}

impl Unit {
    pub fn new(id: u32, bedrooms: u32, bathrooms: f64, rent: f64) -> Self {
        Self {
            id,
            bedrooms,
            bathrooms,
            rent,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ManagementMode {
    #[default]
    Percent,
    Flat,
}

impl fmt::Display for ManagementMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ManagementMode::Percent => f.write_str("percent"),
            ManagementMode::Flat => f.write_str("flat"),
        }
    }
}

impl FromStr for ManagementMode {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "percent" | "pct" | "%" => Ok(ManagementMode::Percent),
            "flat" | "fixed" => Ok(ManagementMode::Flat),
            other => Err(FieldError::InvalidMode(other.to_string())),
        }
    }
}

/// The management fee that actually applies, as selected by the active mode.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ManagementFee {
    /// Whole-number percent of potential gross income.
    PercentOfGross(f64),
    /// Annual amount used verbatim.
    Flat(f64),
}

#[derive(Debug, Error, PartialEq)]
pub enum FieldError {
    #[error("unknown input field: {0}")]
    Unknown(String),

    #[error("invalid management mode: {0} (expected 'percent' or 'flat')")]
    InvalidMode(String),
}

/// Persisted names of every editable scalar field, in form order.
pub const FIELD_NAMES: &[&str] = &[
    "address",
    "listingId",
    "purchasePrice",
    "downPayment",
    "interestRate",
    "loanTerm",
    "closingCosts",
    "initialCapEx",
    "vacancyRate",
    "maintenance",
    "otherExpenses",
    "propertyTaxRate",
    "insurance",
    "managementMode",
    "managementPercent",
    "managementFlat",
];

/// The full assumption set behind one analysis.
///
/// Percent fields (`interest_rate`, `vacancy_rate`, `property_tax_rate`,
/// `management_percent`) hold whole-number percents such as `6.5`; callers
/// divide by 100 where they use them. Both management values are kept no
/// matter which mode is active so toggling the mode loses nothing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct InputSnapshot {
    pub address: String,
    pub listing_id: String,
    #[serde(deserialize_with = "lenient_f64")]
    pub purchase_price: f64,
    #[serde(deserialize_with = "lenient_f64")]
    pub down_payment: f64,
    #[serde(deserialize_with = "lenient_f64")]
    pub interest_rate: f64,
    /// Years
    #[serde(deserialize_with = "lenient_f64")]
    pub loan_term: f64,
    #[serde(deserialize_with = "lenient_f64")]
    pub closing_costs: f64,
    #[serde(deserialize_with = "lenient_f64")]
    pub initial_cap_ex: f64,
    #[serde(deserialize_with = "lenient_f64")]
    pub vacancy_rate: f64,
    #[serde(deserialize_with = "lenient_f64")]
    pub maintenance: f64,
    /// Annual other / HOA expense
    #[serde(deserialize_with = "lenient_f64")]
    pub other_expenses: f64,
    #[serde(deserialize_with = "lenient_f64")]
    pub property_tax_rate: f64,
    #[serde(deserialize_with = "lenient_f64")]
    pub insurance: f64,
    pub management_mode: ManagementMode,
    #[serde(deserialize_with = "lenient_f64")]
    pub management_percent: f64,
    #[serde(deserialize_with = "lenient_f64")]
    pub management_flat: f64,
    #[serde(deserialize_with = "rent_roll")]
    pub units: Vec<Unit>,
}

fn rent_roll<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<Unit>, D::Error> {
    let mut units = Option::<Vec<Unit>>::deserialize(d)?.unwrap_or_default();
    repair_unit_ids(&mut units);
    Ok(units)
}

/// Keeps the first holder of each non-zero id and gives every other unit a
/// fresh one.
fn repair_unit_ids(units: &mut [Unit]) {
    let mut taken: HashSet<u32> = HashSet::new();
    let mut clashing = Vec::new();
    for (i, unit) in units.iter().enumerate() {
        if unit.id == 0 || !taken.insert(unit.id) {
            clashing.push(i);
        }
    }
    for i in clashing {
        let id = free_unit_id(&taken);
        taken.insert(id);
        units[i].id = id;
    }
}

/// One past the highest id, or the lowest free id once that would overflow.
fn free_unit_id(taken: &HashSet<u32>) -> u32 {
    match taken.iter().copied().max() {
        None => 1,
        Some(max) => max.checked_add(1).unwrap_or_else(|| {
            (1..=u32::MAX)
                .find(|id| !taken.contains(id))
                .unwrap_or_default()
        }),
    }
}

impl Default for InputSnapshot {
    fn default() -> Self {
        Self {
            address: String::new(),
            listing_id: String::new(),
            purchase_price: 500_000.0,
            down_payment: 125_000.0,
            interest_rate: 6.5,
            loan_term: 30.0,
            closing_costs: 15_000.0,
            initial_cap_ex: 5_000.0,
            vacancy_rate: 5.0,
            maintenance: 2_500.0,
            other_expenses: 500.0,
            property_tax_rate: 1.25,
            insurance: 1_200.0,
            management_mode: ManagementMode::Percent,
            management_percent: 8.0,
            management_flat: 0.0,
            units: vec![
                Unit::new(1, 2, 1.0, 1_200.0),
                Unit::new(2, 2, 1.0, 1_200.0),
                Unit::new(3, 1, 1.0, 950.0),
                Unit::new(4, 1, 1.0, 950.0),
            ],
        }
    }
}

impl InputSnapshot {
    pub fn management_fee(&self) -> ManagementFee {
        match self.management_mode {
            ManagementMode::Percent => ManagementFee::PercentOfGross(self.management_percent),
            ManagementMode::Flat => ManagementFee::Flat(self.management_flat),
        }
    }

    pub fn set_management_mode(&mut self, mode: ManagementMode) {
        self.management_mode = mode;
    }

    /// Appends a blank unit (1 bd / 1 ba, no rent) with the next free id.
    pub fn add_unit(&mut self) -> &Unit {
        let taken: HashSet<u32> = self.units.iter().map(|u| u.id).collect();
        let id = free_unit_id(&taken);
        self.units.push(Unit::new(id, 1, 1.0, 0.0));
        &self.units[self.units.len() - 1]
    }

    pub fn remove_unit(&mut self, id: u32) -> bool {
        let before = self.units.len();
        self.units.retain(|u| u.id != id);
        self.units.len() != before
    }

    pub fn unit_mut(&mut self, id: u32) -> Option<&mut Unit> {
        self.units.iter_mut().find(|u| u.id == id)
    }

    /// Sets a scalar field by its persisted name from raw form text.
    /// Numeric fields that fail to parse become 0.
    pub fn set_field(&mut self, field: &str, raw: &str) -> Result<(), FieldError> {
        let slot = match field {
            "address" => {
                self.address = raw.to_string();
                return Ok(());
            }
            "listingId" => {
                self.listing_id = raw.to_string();
                return Ok(());
            }
            "managementMode" => {
                self.management_mode = raw.parse()?;
                return Ok(());
            }
            "purchasePrice" => &mut self.purchase_price,
            "downPayment" => &mut self.down_payment,
            "interestRate" => &mut self.interest_rate,
            "loanTerm" => &mut self.loan_term,
            "closingCosts" => &mut self.closing_costs,
            "initialCapEx" => &mut self.initial_cap_ex,
            "vacancyRate" => &mut self.vacancy_rate,
            "maintenance" => &mut self.maintenance,
            "otherExpenses" => &mut self.other_expenses,
            "propertyTaxRate" => &mut self.property_tax_rate,
            "insurance" => &mut self.insurance,
            "managementPercent" => &mut self.management_percent,
            "managementFlat" => &mut self.management_flat,
            other => return Err(FieldError::Unknown(other.to_string())),
        };
        *slot = parse_number(raw);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_management_fee_follows_active_mode() {
        let mut input = InputSnapshot {
            management_percent: 8.0,
            management_flat: 3_600.0,
            ..Default::default()
        };
        assert_eq!(input.management_fee(), ManagementFee::PercentOfGross(8.0));

        input.set_management_mode(ManagementMode::Flat);
        assert_eq!(input.management_fee(), ManagementFee::Flat(3_600.0));

        // Switching back keeps the percent value intact
        input.set_management_mode(ManagementMode::Percent);
        assert_eq!(input.management_fee(), ManagementFee::PercentOfGross(8.0));
        assert_eq!(input.management_flat, 3_600.0);
    }

    #[test]
    fn test_add_unit_allocates_next_id() {
        let mut input = InputSnapshot::default();
        let added = input.add_unit().clone();
        assert_eq!(added.id, 5);
        assert_eq!(added.rent, 0.0);
        assert_eq!(input.units.len(), 5);

        let mut empty = InputSnapshot {
            units: vec![],
            ..Default::default()
        };
        assert_eq!(empty.add_unit().id, 1);
    }

    #[test]
    fn test_unit_ids_are_repaired_on_read() {
        let input: InputSnapshot = serde_json::from_str(
            r#"{"units": [
                {"rent": 900},
                {"id": 3, "rent": 1000},
                {"id": 3, "rent": 1100},
                {"id": "7", "rent": 1200}
            ]}"#,
        )
        .unwrap();
        let ids: Vec<u32> = input.units.iter().map(|u| u.id).collect();
        assert_eq!(ids, vec![8, 3, 9, 7]);
        assert_eq!(input.units[0].rent, 900.0);

        let empty: InputSnapshot = serde_json::from_str(r#"{"units": null}"#).unwrap();
        assert!(empty.units.is_empty());
    }

    #[test]
    fn test_oversized_unit_id_saturates_and_add_still_works() {
        let mut input: InputSnapshot =
            serde_json::from_str(r#"{"units": [{"id": 1714564800000, "rent": 950}]}"#).unwrap();
        assert_eq!(input.units[0].id, u32::MAX);
        assert_eq!(input.add_unit().id, 1);
        assert_eq!(input.add_unit().id, 2);
    }

    #[test]
    fn test_remove_unit() {
        let mut input = InputSnapshot::default();
        assert!(input.remove_unit(2));
        assert!(!input.remove_unit(2));
        let ids: Vec<u32> = input.units.iter().map(|u| u.id).collect();
        assert_eq!(ids, vec![1, 3, 4]);
        // Ids are never reused while a higher one exists
        assert_eq!(input.add_unit().id, 5);
    }

    #[test]
    fn test_unit_mut_edits_in_place() {
        let mut input = InputSnapshot::default();
        input.unit_mut(3).unwrap().rent = 1_000.0;
        assert_eq!(input.units[2].rent, 1_000.0);
        assert!(input.unit_mut(99).is_none());
    }

    #[test]
    fn test_set_field_coerces_numbers() {
        let mut input = InputSnapshot::default();
        input.set_field("purchasePrice", "650000").unwrap();
        input.set_field("interestRate", "7.25").unwrap();
        input.set_field("insurance", "n/a").unwrap();
        input.set_field("address", "12 Elm St").unwrap();
        assert_eq!(input.purchase_price, 650_000.0);
        assert_eq!(input.interest_rate, 7.25);
        assert_eq!(input.insurance, 0.0);
        assert_eq!(input.address, "12 Elm St");
    }

    #[test]
    fn test_set_field_rejects_unknown_names_and_modes() {
        let mut input = InputSnapshot::default();
        assert_eq!(
            input.set_field("price", "1"),
            Err(FieldError::Unknown("price".to_string()))
        );
        assert!(matches!(
            input.set_field("managementMode", "hourly"),
            Err(FieldError::InvalidMode(_))
        ));
        input.set_field("managementMode", "Flat").unwrap();
        assert_eq!(input.management_mode, ManagementMode::Flat);
    }

    #[test]
    fn test_every_field_name_is_settable() {
        let mut input = InputSnapshot::default();
        for name in FIELD_NAMES {
            let raw = if *name == "managementMode" { "flat" } else { "1" };
            assert!(input.set_field(name, raw).is_ok(), "field {name}");
        }
    }

    #[test]
    fn test_json_uses_camel_case_and_whole_percents() {
        let json = serde_json::to_value(InputSnapshot::default()).unwrap();
        assert_eq!(json["interestRate"], 6.5);
        assert_eq!(json["propertyTaxRate"], 1.25);
        assert_eq!(json["initialCapEx"], 5000.0);
        assert_eq!(json["managementMode"], "percent");
        assert_eq!(json["managementFlat"], 0.0);
        assert_eq!(json["units"][0]["rent"], 1200.0);
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        let input: InputSnapshot =
            serde_json::from_str(r#"{"purchasePrice": "420000", "units": [{"id": 7, "rent": "x"}]}"#)
                .unwrap();
        assert_eq!(input.purchase_price, 420_000.0);
        assert_eq!(input.interest_rate, 6.5);
        assert_eq!(input.management_mode, ManagementMode::Percent);
        assert_eq!(input.units, vec![Unit::new(7, 0, 0.0, 0.0)]);
    }
}
