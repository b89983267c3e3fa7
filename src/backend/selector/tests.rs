use super::*;

fn selector(accelerated: bool, memory_gb: f64) -> BackendSelector {
    BackendSelector::new(
        ComputeCapability {
            accelerated,
            memory_gb,
        },
        "big-model",
        "small-model",
    )
}

#[tokio::test]
async fn test_accelerated_with_memory_selects_high_capacity() {
    let selector = selector(true, 24.0);
    let profile = selector.profile(|_| async { true }).await;

    assert_eq!(profile.tier, ModelTier::HighCapacity);
    assert_eq!(profile.target, ComputeTarget::Accelerated);
    assert_eq!(profile.model, "big-model");
    assert_eq!(profile.limits, GenerationLimits::for_tier(ModelTier::HighCapacity));
}

#[tokio::test]
async fn test_cpu_only_selects_lightweight() {
    let selector = selector(false, 64.0);
    let profile = selector.profile(|_| async { true }).await;

    assert_eq!(profile.tier, ModelTier::Lightweight);
    assert_eq!(profile.target, ComputeTarget::GeneralPurpose);
    assert_eq!(profile.model, "small-model");
}

#[tokio::test]
async fn test_insufficient_memory_selects_lightweight() {
    let selector = selector(true, HIGH_TIER_MIN_MEMORY_GB - 1.0);
    let profile = selector.profile(|_| async { true }).await;

    assert_eq!(profile.tier, ModelTier::Lightweight);
    // Compute target still reflects the hardware.
    assert_eq!(profile.target, ComputeTarget::Accelerated);
}

#[tokio::test]
async fn test_failed_probe_demotes_permanently() {
    let selector = selector(true, 24.0);

    let profile = selector.profile(|_| async { false }).await;
    assert_eq!(profile.tier, ModelTier::Lightweight);

    // Second consult must not re-probe: a now-succeeding probe is ignored.
    let profile = selector.profile(|_| async { true }).await;
    assert_eq!(profile.tier, ModelTier::Lightweight);
}

#[tokio::test]
async fn test_probe_not_invoked_for_lightweight_candidate() {
    let selector = selector(false, 0.0);
    let profile = selector
        .profile(|_| async { panic!("probe must not run for lightweight tier") })
        .await;

    assert_eq!(profile.tier, ModelTier::Lightweight);
}

#[tokio::test]
async fn test_selected_returns_cached_profile() {
    let selector = selector(false, 0.0);
    assert!(selector.selected().is_none());

    selector.profile(|_| async { true }).await;
    assert_eq!(selector.selected().unwrap().tier, ModelTier::Lightweight);
}

#[test]
fn test_condensation_limits_are_tier_independent() {
    assert_eq!(
        GenerationLimits::for_condensation(),
        GenerationLimits::for_condensation()
    );
    assert!(
        GenerationLimits::for_condensation().max_output_tokens
            < GenerationLimits::for_tier(ModelTier::Lightweight).max_output_tokens
    );
}
