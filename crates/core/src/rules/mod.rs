//! The ten oncology guideline rules.
//!
//! Each rule is a unit struct implementing [`Rule`](crate::registry::Rule) with a `const`
//! [`RuleDefinition`](crate::registry::RuleDefinition). Shared drug lists live here because more
//! than one rule inspects Tamoxifen-class therapy.

mod adjuvant;
mod cardiac;
mod fertility;
mod genetics;
mod interactions;
mod receptor;
mod staging;

pub use adjuvant::AdjuvantDuration;
pub use cardiac::AnthracyclineCardiacMonitoring;
pub use fertility::FertilityPreservation;
pub use genetics::BrcaGeneticCounselling;
pub use interactions::TamoxifenInteraction;
pub use receptor::{EstrogenReceptorTherapy, Her2TargetedTherapy, ProgesteroneReceptorStatus};
pub use staging::{AdvancedStagePathology, MetastaticStaging};

use crate::registry::Rule;

/// Brand and generic names treated as Tamoxifen.
pub const TAMOXIFEN_CLASS: &[&str] = &["Tamoxifen", "Nolvadex", "Soltamox"];

pub const AROMATASE_INHIBITORS: &[&str] = &["Letrozole", "Anastrozole", "Exemestane"];

/// Selective estrogen receptor degraders.
pub const SERDS: &[&str] = &["Fulvestrant"];

/// Registry order: R001..R010.
pub fn standard_rules() -> Vec<Box<dyn Rule>> {
    vec![
        Box::new(EstrogenReceptorTherapy),
        Box::new(Her2TargetedTherapy),
        Box::new(BrcaGeneticCounselling),
        Box::new(FertilityPreservation),
        Box::new(TamoxifenInteraction),
        Box::new(AnthracyclineCardiacMonitoring),
        Box::new(AdjuvantDuration),
        Box::new(MetastaticStaging),
        Box::new(AdvancedStagePathology),
        Box::new(ProgesteroneReceptorStatus),
    ]
}
