// Preference Model: validated build constraints for one submission.
// Constructed only through `PreferenceModel::try_from(PreferenceRequest)`.

pub mod models;
pub mod request;

pub use models::{FormFactor, PcType, PreferenceModel};
pub use request::PreferenceRequest;
