//! Budget allocation and listing-order policies embedded in every desktop/laptop prompt.

use crate::preferences::PcType;

/// Budget buckets the allocation policy ranks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BudgetBucket {
    Cpu,
    Gpu,
    Ram,
    Storage,
}

impl BudgetBucket {
    pub fn label(self) -> &'static str {
        match self {
            BudgetBucket::Cpu => "CPU",
            BudgetBucket::Gpu => "GPU",
            BudgetBucket::Ram => "RAM",
            BudgetBucket::Storage => "Storage",
        }
    }
}

/// Where the budget goes first for each use case.
pub fn allocation_priority(pc_type: PcType) -> [BudgetBucket; 4] {
    use BudgetBucket::*;
    match pc_type {
        PcType::Gaming => [Gpu, Cpu, Ram, Storage],
        PcType::ContentCreation => [Cpu, Ram, Gpu, Storage],
        PcType::Office => [Storage, Cpu, Ram, Gpu],
    }
}

/// Renders the policy as it appears in the prompt, e.g. `GPU > CPU > RAM > Storage`.
pub fn render_priority(pc_type: PcType) -> String {
    allocation_priority(pc_type)
        .iter()
        .map(|bucket| bucket.label())
        .collect::<Vec<_>>()
        .join(" > ")
}

/// Fixed order desktop parts are listed in, so the price sum can be checked by hand.
pub const DESKTOP_LISTING_ORDER: [&str; 8] = [
    "CPU",
    "GPU",
    "Motherboard",
    "RAM",
    "SSD",
    "PSU",
    "Case",
    "Accessories",
];

pub fn render_listing_order() -> String {
    DESKTOP_LISTING_ORDER.join(" → ")
}
