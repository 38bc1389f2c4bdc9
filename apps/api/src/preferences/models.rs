use std::fmt;

use crate::errors::AppError;

/// Primary use of the build. Drives the budget allocation policy in the prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PcType {
    Gaming,
    ContentCreation,
    Office,
}

impl PcType {
    /// Accepts the labels the front-end submits as well as the enum spellings.
    pub fn parse(raw: &str) -> Result<Self, AppError> {
        let key: String = raw
            .trim()
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();

        match key.as_str() {
            "gaming" => Ok(PcType::Gaming),
            "contentcreation" => Ok(PcType::ContentCreation),
            "office" | "officeuse" => Ok(PcType::Office),
            _ => Err(AppError::InvalidPreferences(format!(
                "Unknown PC type '{}'. Expected Gaming, Content Creation or Office Use",
                raw.trim()
            ))),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PcType::Gaming => "Gaming",
            PcType::ContentCreation => "Content Creation",
            PcType::Office => "Office Use",
        }
    }
}

impl fmt::Display for PcType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Desktop builds get a component breakdown; laptops are a single line item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormFactor {
    Desktop,
    Laptop,
}

impl FormFactor {
    pub fn parse(raw: &str) -> Result<Self, AppError> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "desktop" => Ok(FormFactor::Desktop),
            "laptop" => Ok(FormFactor::Laptop),
            _ => Err(AppError::InvalidPreferences(format!(
                "Unknown form factor '{}'. Expected Desktop or Laptop",
                raw.trim()
            ))),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FormFactor::Desktop => "Desktop",
            FormFactor::Laptop => "Laptop",
        }
    }
}

impl fmt::Display for FormFactor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Validated build preferences for a single submission.
///
/// Fields are private: a `PreferenceModel` only exists if it satisfied the invariants
/// (positive budget, known form factor, disjoint accessory sets) at construction.
/// Optional constraints whose value was the `"Any"` sentinel or blank are stored as `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct PreferenceModel {
    pub(super) budget: f64,
    pub(super) pc_type: PcType,
    pub(super) style: Option<String>,
    pub(super) form_factor: FormFactor,
    pub(super) cpu_brand: Option<String>,
    pub(super) gpu_brand: Option<String>,
    pub(super) include_accessories: Vec<String>,
    pub(super) exclude_accessories: Vec<String>,
}

impl PreferenceModel {
    pub fn budget(&self) -> f64 {
        self.budget
    }

    pub fn pc_type(&self) -> PcType {
        self.pc_type
    }

    pub fn style(&self) -> Option<&str> {
        self.style.as_deref()
    }

    pub fn form_factor(&self) -> FormFactor {
        self.form_factor
    }

    pub fn cpu_brand(&self) -> Option<&str> {
        self.cpu_brand.as_deref()
    }

    pub fn gpu_brand(&self) -> Option<&str> {
        self.gpu_brand.as_deref()
    }

    pub fn include_accessories(&self) -> &[String] {
        &self.include_accessories
    }

    pub fn exclude_accessories(&self) -> &[String] {
        &self.exclude_accessories
    }
}
