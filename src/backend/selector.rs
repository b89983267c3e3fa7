//! One-time backend tier selection.
//!
//! The selector is consulted once per process: it probes compute capability,
//! picks a generative model tier, and caches the resulting
//! [`BackendProfile`] behind an async once-cell so concurrent requests never
//! race to initialize the same heavyweight backend. A failed high-capacity
//! probe demotes to the lightweight tier permanently; there is no
//! per-request re-probing.

#[cfg(test)]
mod tests;

use std::future::Future;

use tokio::sync::OnceCell;
use tracing::{info, warn};

use super::device;

/// Minimum declared accelerator memory (GiB) required for the
/// high-capacity tier.
pub const HIGH_TIER_MIN_MEMORY_GB: f64 = 12.0;

/// Which kind of compute the process runs generative inference on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComputeTarget {
    /// GPU (Metal or CUDA) device available.
    Accelerated,
    /// CPU only.
    GeneralPurpose,
}

/// Generative model tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelTier {
    /// Large instruction-tuned model; requires accelerated compute with
    /// sufficient memory.
    HighCapacity,
    /// Small model suitable for general-purpose compute.
    Lightweight,
}

impl ModelTier {
    /// Short identifier used in logs and readiness reporting.
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelTier::HighCapacity => "high-capacity",
            ModelTier::Lightweight => "lightweight",
        }
    }
}

/// Input/output budgets a backend call must respect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerationLimits {
    /// Maximum prompt length in characters.
    pub max_input_chars: usize,
    /// Maximum tokens the backend may generate.
    pub max_output_tokens: u32,
}

impl GenerationLimits {
    /// Budgets for the chosen generative tier's context window.
    pub fn for_tier(tier: ModelTier) -> Self {
        match tier {
            ModelTier::HighCapacity => Self {
                max_input_chars: 24_000,
                max_output_tokens: 1024,
            },
            ModelTier::Lightweight => Self {
                max_input_chars: 8_000,
                max_output_tokens: 512,
            },
        }
    }

    /// Budgets for per-slide condensation (tier-independent: condensation
    /// always runs on the lightweight model).
    pub fn for_condensation() -> Self {
        Self {
            max_input_chars: 4_000,
            max_output_tokens: 160,
        }
    }
}

/// Declared/detected compute capability of this process.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ComputeCapability {
    /// Whether an accelerated device could be initialized.
    pub accelerated: bool,
    /// Declared accelerator memory in GiB (0 when unknown).
    pub memory_gb: f64,
}

impl ComputeCapability {
    /// Probes the compute device and combines it with declared memory.
    pub fn detect(declared_memory_gb: f64) -> Self {
        Self {
            accelerated: device::accelerated_available(),
            memory_gb: declared_memory_gb,
        }
    }
}

/// Resolved backend choice for the process lifetime.
#[derive(Debug, Clone, PartialEq)]
pub struct BackendProfile {
    pub tier: ModelTier,
    pub target: ComputeTarget,
    /// Generative model identifier for the selected tier.
    pub model: String,
    /// Budgets for structured reasoning calls.
    pub limits: GenerationLimits,
    /// Budgets for condensation calls.
    pub condense_limits: GenerationLimits,
}

/// Picks a [`BackendProfile`] once and caches it for the process lifetime.
pub struct BackendSelector {
    capability: ComputeCapability,
    high_model: String,
    lite_model: String,
    cell: OnceCell<BackendProfile>,
}

impl std::fmt::Debug for BackendSelector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendSelector")
            .field("capability", &self.capability)
            .field("high_model", &self.high_model)
            .field("lite_model", &self.lite_model)
            .field("selected", &self.cell.get().map(|p| p.tier))
            .finish()
    }
}

impl BackendSelector {
    /// Creates a selector for the given capability and tier model names.
    pub fn new(
        capability: ComputeCapability,
        high_model: impl Into<String>,
        lite_model: impl Into<String>,
    ) -> Self {
        Self {
            capability,
            high_model: high_model.into(),
            lite_model: lite_model.into(),
            cell: OnceCell::new(),
        }
    }

    /// Returns the cached profile, computing it on first call.
    ///
    /// `probe` is invoked only when the policy selects the high-capacity
    /// tier; returning `false` (initialization failure) demotes to the
    /// lightweight tier for the rest of the process lifetime. The once-cell
    /// guarantees a single initialization even under concurrent callers.
    pub async fn profile<P, F>(&self, probe: P) -> &BackendProfile
    where
        P: FnOnce(&BackendProfile) -> F,
        F: Future<Output = bool>,
    {
        self.cell
            .get_or_init(|| async {
                let candidate = self.candidate_tier();
                let mut profile = self.profile_for(candidate);

                if candidate == ModelTier::HighCapacity && !probe(&profile).await {
                    warn!(
                        model = %profile.model,
                        "High-capacity tier failed to initialize, \
                         falling back to lightweight tier for process lifetime"
                    );
                    profile = self.profile_for(ModelTier::Lightweight);
                }

                info!(
                    tier = profile.tier.as_str(),
                    model = %profile.model,
                    accelerated = self.capability.accelerated,
                    memory_gb = self.capability.memory_gb,
                    "Backend profile selected"
                );

                profile
            })
            .await
    }

    /// Returns the profile if already selected.
    pub fn selected(&self) -> Option<&BackendProfile> {
        self.cell.get()
    }

    // First match wins: accelerated compute with enough memory takes the
    // high-capacity tier, everything else the lightweight one.
    fn candidate_tier(&self) -> ModelTier {
        if self.capability.accelerated && self.capability.memory_gb >= HIGH_TIER_MIN_MEMORY_GB {
            ModelTier::HighCapacity
        } else {
            ModelTier::Lightweight
        }
    }

    fn profile_for(&self, tier: ModelTier) -> BackendProfile {
        let target = if self.capability.accelerated {
            ComputeTarget::Accelerated
        } else {
            ComputeTarget::GeneralPurpose
        };

        let model = match tier {
            ModelTier::HighCapacity => self.high_model.clone(),
            ModelTier::Lightweight => self.lite_model.clone(),
        };

        BackendProfile {
            tier,
            target,
            model,
            limits: GenerationLimits::for_tier(tier),
            condense_limits: GenerationLimits::for_condensation(),
        }
    }
}
