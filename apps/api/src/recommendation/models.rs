use serde::Serialize;

/// One line of the recommended build. For laptops there is exactly one, typed `"Laptop"`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Part {
    #[serde(rename = "type")]
    pub part_type: String,
    pub name: String,
    /// Amount in `RecommendationResponse::currency`.
    pub price: f64,
    pub specs: String,
    pub reason: String,
}

/// Free-text performance estimates, passed through as the model wrote them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PerformanceBenchmarks {
    pub gaming_1080p: String,
    pub gaming_1440p: String,
    pub productivity_score: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompatibilityMatrix {
    pub cpu_motherboard: String,
    pub ram_motherboard: String,
    pub gpu_case: String,
    pub psu_wattage: String,
}

/// A build suggestion that passed schema validation. Ready to render; never mutated again.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecommendationResponse {
    pub total_cost: f64,
    pub currency: &'static str,
    /// Model's explanation, followed by any advisories raised during validation.
    pub notes: String,
    /// Empty means no build fits the budget.
    pub parts: Vec<Part>,
    /// Sum of part prices; absent when `parts` is empty.
    pub parts_total: Option<f64>,
    pub performance_benchmarks: PerformanceBenchmarks,
    pub compatibility_matrix: CompatibilityMatrix,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub advisories: Vec<String>,
}
