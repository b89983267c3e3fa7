//! Podium HTTP server entrypoint.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use mimalloc::MiMalloc;
use tokio::net::TcpListener;
use tokio::signal;

use podium::backend::{
    BackendSelector, ComputeCapability, DeckEmbedder, EmbedderConfig, GenerateBackend,
    GenerationLimits, ProviderBackend,
};
use podium::condense::CondensationStage;
use podium::config::Config;
use podium::gateway::{HandlerState, create_router_with_state};
use podium::orchestrator::Orchestrator;
use podium::reasoning::ReasoningEvaluator;
use podium::semantic::SemanticScorer;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    println!(
        r#"
██████╗  ██████╗ ██████╗ ██╗██╗   ██╗███╗   ███╗
██╔══██╗██╔═══██╗██╔══██╗██║██║   ██║████╗ ████║
██████╔╝██║   ██║██║  ██║██║██║   ██║██╔████╔██║
██╔═══╝ ██║   ██║██║  ██║██║██║   ██║██║╚██╔╝██║
██║     ╚██████╔╝██████╔╝██║╚██████╔╝██║ ╚═╝ ██║
╚═╝      ╚═════╝ ╚═════╝ ╚═╝ ╚═════╝ ╚═╝     ╚═╝

        CONDENSE. SCORE. JUDGE.
                                        AGPL-3.0
"#
    );

    if std::env::args().any(|arg| arg == "--health-check") {
        std::process::exit(run_health_check());
    }

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = Config::from_env()?;
    config.validate()?;
    let addr: SocketAddr = config.socket_addr().parse()?;

    tracing::info!(
        bind_addr = %config.bind_addr,
        port = config.port,
        "Podium starting"
    );

    let capability = ComputeCapability::detect(config.accel_memory_gb);
    let selector = BackendSelector::new(capability, &config.gen_model, &config.gen_model_lite);

    let generate_timeout = Duration::from_secs(config.generate_timeout_secs);
    let profile = selector
        .profile(|candidate| {
            let backend = ProviderBackend::new(candidate.model.clone());
            let timeout = generate_timeout;
            async move {
                let limits = GenerationLimits {
                    max_input_chars: 256,
                    max_output_tokens: 8,
                };
                match tokio::time::timeout(timeout, backend.generate("Reply with OK.", &limits))
                    .await
                {
                    Ok(Ok(_)) => true,
                    Ok(Err(e)) => {
                        tracing::warn!(error = %e, "High-capacity probe request failed");
                        false
                    }
                    Err(_) => {
                        tracing::warn!("High-capacity probe request timed out");
                        false
                    }
                }
            }
        })
        .await
        .clone();

    let embedder_config = if let Some(path) = &config.embed_model_path {
        EmbedderConfig::new(path.clone())
    } else {
        tracing::warn!("No PODIUM_EMBED_MODEL_PATH configured, running embedder in stub mode");
        EmbedderConfig::stub()
    };
    let embedder = Arc::new(DeckEmbedder::load(embedder_config)?);
    let embedder_stub = embedder.is_stub();

    // Condensation always runs on the lightweight model.
    let condense_backend = Arc::new(ProviderBackend::new(config.gen_model_lite.clone()));
    let condenser = CondensationStage::new(
        condense_backend,
        profile.condense_limits,
        Duration::from_secs(config.condense_timeout_secs),
        config.condense_batch_size,
    );

    let generate_backend = Arc::new(ProviderBackend::new(profile.model.clone()));
    let reasoner = ReasoningEvaluator::new(
        generate_backend,
        profile.limits,
        config.retry_budget,
        generate_timeout,
    );

    let orchestrator = Arc::new(Orchestrator::new(
        condenser,
        Arc::new(SemanticScorer::new(embedder)),
        reasoner,
    ));

    let state = HandlerState::new(orchestrator, profile.tier, profile.model, embedder_stub);
    let app = create_router_with_state(state);

    let listener = TcpListener::bind(addr).await?;
    tracing::info!(addr = %addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Podium shutdown complete");
    Ok(())
}

fn run_health_check() -> i32 {
    let port = std::env::var("PODIUM_PORT")
        .ok()
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(8080);

    let url = format!("http://127.0.0.1:{}/healthz", port);

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("failed to build runtime");

    rt.block_on(async {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(1))
            .build()
            .expect("failed to build client");

        match client.get(&url).send().await {
            Ok(res) if res.status().is_success() => 0,
            _ => 1,
        }
    })
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
