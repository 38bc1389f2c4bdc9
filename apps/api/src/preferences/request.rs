//! Inbound wire shape of a build submission and its conversion into a validated
//! `PreferenceModel`.
//!
//! The front-end posts raw form values, so the budget can arrive as a numeric string and
//! accessory selections as one comma-separated string. Everything is normalised here;
//! nothing downstream ever sees the sentinel `"Any"`.

use serde::Deserialize;

use crate::errors::AppError;
use crate::money::{format_inr, parse_amount};
use crate::preferences::models::{FormFactor, PcType, PreferenceModel};

/// Value the form uses for "no preference".
pub const ANY_SENTINEL: &str = "Any";

/// Largest budget accepted: ₹1 crore.
pub const MAX_BUDGET: f64 = 10_000_000.0;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum BudgetInput {
    Amount(f64),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum AccessoryInput {
    List(Vec<String>),
    Csv(String),
}

/// Request body for POST /api/get-build-recommendation.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PreferenceRequest {
    pub budget: Option<BudgetInput>,
    pub pc_type: Option<String>,
    pub style: Option<String>,
    pub form_factor: Option<String>,
    pub cpu_brand: Option<String>,
    pub gpu_brand: Option<String>,
    pub accessories: Option<AccessoryInput>,
    pub exclude_accessories: Option<AccessoryInput>,
}

impl TryFrom<PreferenceRequest> for PreferenceModel {
    type Error = AppError;

    fn try_from(request: PreferenceRequest) -> Result<Self, Self::Error> {
        let budget = parse_budget(request.budget)?;

        let pc_type = request
            .pc_type
            .as_deref()
            .ok_or_else(|| missing("pc_type"))
            .and_then(PcType::parse)?;

        let form_factor = request
            .form_factor
            .as_deref()
            .ok_or_else(|| missing("form_factor"))
            .and_then(FormFactor::parse)?;

        let include_accessories = accessory_set(request.accessories);
        let exclude_accessories = accessory_set(request.exclude_accessories);
        ensure_disjoint(&include_accessories, &exclude_accessories)?;

        Ok(PreferenceModel {
            budget,
            pc_type,
            style: constraint(request.style),
            form_factor,
            cpu_brand: constraint(request.cpu_brand),
            gpu_brand: constraint(request.gpu_brand),
            include_accessories,
            exclude_accessories,
        })
    }
}

fn missing(field: &str) -> AppError {
    AppError::InvalidPreferences(format!("'{field}' is required"))
}

fn parse_budget(input: Option<BudgetInput>) -> Result<f64, AppError> {
    let amount = match input.ok_or_else(|| missing("budget"))? {
        BudgetInput::Amount(value) => Some(value),
        BudgetInput::Text(text) => parse_amount(&text),
    };

    match amount {
        Some(value) if value > MAX_BUDGET => Err(AppError::InvalidPreferences(format!(
            "Budget cannot exceed {}",
            format_inr(MAX_BUDGET)
        ))),
        Some(value) if value.is_finite() && value > 0.0 => Ok(value),
        _ => Err(AppError::InvalidPreferences(
            "Budget must be a positive amount in INR".to_string(),
        )),
    }
}

/// Maps the `"Any"` sentinel and blank strings to "no constraint".
fn constraint(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty() && !v.eq_ignore_ascii_case(ANY_SENTINEL))
}

/// Trims names, drops blanks and collapses case-insensitive duplicates, keeping first-seen order.
fn accessory_set(input: Option<AccessoryInput>) -> Vec<String> {
    let raw: Vec<String> = match input {
        None => Vec::new(),
        Some(AccessoryInput::List(items)) => items,
        Some(AccessoryInput::Csv(text)) => text.split(',').map(str::to_string).collect(),
    };

    let mut set: Vec<String> = Vec::with_capacity(raw.len());
    for name in raw {
        let name = name.trim();
        if name.is_empty() || set.iter().any(|seen| seen.eq_ignore_ascii_case(name)) {
            continue;
        }
        set.push(name.to_string());
    }
    set
}

fn ensure_disjoint(include: &[String], exclude: &[String]) -> Result<(), AppError> {
    let overlap: Vec<&str> = include
        .iter()
        .filter(|name| exclude.iter().any(|other| other.eq_ignore_ascii_case(name)))
        .map(String::as_str)
        .collect();

    if overlap.is_empty() {
        Ok(())
    } else {
        Err(AppError::InvalidPreferences(format!(
            "Accessories cannot be both included and excluded: {}",
            overlap.join(", ")
        )))
    }
}
