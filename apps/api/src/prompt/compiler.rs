//! Prompt Compiler — turns a validated `PreferenceModel` into the exact instruction text
//! sent to the completion API.
//!
//! `compile` is pure and total: same preferences in, byte-identical prompt out. Optional
//! constraints that are absent produce no line at all, because the model weighs a stated
//! "Any" differently from silence.

use std::fmt;

use crate::money::{group_inr, CURRENCY};
use crate::preferences::{FormFactor, PreferenceModel};
use crate::prompt::policy::{render_listing_order, render_priority, DESKTOP_LISTING_ORDER};
use crate::prompt::prompts::{
    DESKTOP_RULES_TEMPLATE, FALLBACK_INSTRUCTION, FINAL_CHECK, LAPTOP_RULES, PRIORITY_TEMPLATE,
    RESPONSE_SCHEMA_TEMPLATE, ROLE_HEADER,
};

const SECTION_BREAK: &str = "\n\n";

/// Instruction text ready to be sent as the sole user message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledPrompt(String);

impl CompiledPrompt {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CompiledPrompt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

pub fn compile(preferences: &PreferenceModel) -> CompiledPrompt {
    let form_rules = match preferences.form_factor() {
        FormFactor::Desktop => {
            DESKTOP_RULES_TEMPLATE.replace("{listing_order}", &render_listing_order())
        }
        FormFactor::Laptop => LAPTOP_RULES.to_string(),
    };

    let priority = PRIORITY_TEMPLATE
        .replace("{pc_type}", preferences.pc_type().label())
        .replace("{priority}", &render_priority(preferences.pc_type()));

    let part_type = match preferences.form_factor() {
        FormFactor::Desktop => format!("one of {}", DESKTOP_LISTING_ORDER.join(" | ")),
        FormFactor::Laptop => "Laptop".to_string(),
    };
    let schema = RESPONSE_SCHEMA_TEMPLATE.replace("{part_type}", &part_type);

    let sections = [
        ROLE_HEADER.to_string(),
        form_rules,
        context_section(preferences),
        priority,
        schema,
        FALLBACK_INSTRUCTION.to_string(),
        FINAL_CHECK.to_string(),
    ];

    CompiledPrompt(sections.join(SECTION_BREAK))
}

/// The user's constraints, one line per present field, in a fixed order.
fn context_section(preferences: &PreferenceModel) -> String {
    let mut lines = vec!["# Context".to_string()];

    lines.push(format!(
        "- Target Budget: {} {CURRENCY}",
        group_inr(preferences.budget())
    ));
    lines.push(format!("- Primary Use: {}", preferences.pc_type()));
    if let Some(style) = preferences.style() {
        lines.push(format!("- Style Preference: {style}"));
    }
    lines.push(format!("- Form Factor: {}", preferences.form_factor()));
    if let Some(brand) = preferences.cpu_brand() {
        lines.push(format!("- CPU Brand Preference: {brand}"));
    }
    if let Some(brand) = preferences.gpu_brand() {
        lines.push(format!("- GPU Brand Preference: {brand}"));
    }
    if !preferences.include_accessories().is_empty() {
        lines.push(format!(
            "- Include Accessories: {}",
            preferences.include_accessories().join(", ")
        ));
    }
    if !preferences.exclude_accessories().is_empty() {
        lines.push(format!(
            "- Exclude Accessories: {}",
            preferences.exclude_accessories().join(", ")
        ));
    }

    lines.join("\n")
}
