use anyhow::Context;
use kube::Client;
use tracing::{info, warn};

use cluster::{ClusterReader, KubeReader};
use config::{AuditConfig, ReportFormat};
use detector::Detections;

mod cluster;
mod config;
mod detector;
mod error;
mod model;
mod report;
mod router;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt::init();

    let cfg = AuditConfig::from_env()?;
    info!("Starting Portworx scheduler audit");
    info!("Target namespaces: {}", cfg.namespaces.join(", "));

    let client = Client::try_default()
        .await
        .context("Can't connect to Kubernetes API")?;
    info!("Connected to Kubernetes API...");
    let reader = KubeReader::new(client);

    let mut detections = Detections::default();
    for namespace in &cfg.namespaces {
        let pods = match reader.list_pods(namespace).await {
            Ok(pods) => pods,
            Err(err) => {
                warn!("Skipping namespace {namespace}: {err}");
                continue;
            }
        };
        info!("Auditing {} pods in {namespace}", pods.len());
        let found = detector::detect(&cfg, &pods, &reader).await;
        detections.violations.extend(found.violations);
        detections.unresolved.extend(found.unresolved);
    }
    info!(
        "Found {} violations, {} unresolved claims",
        detections.violations.len(),
        detections.unresolved.len()
    );

    let routed = router::route(&cfg, &detections.violations, &reader).await;

    match cfg.format {
        ReportFormat::Text => print!("{}", report::render_text(&routed, &detections.unresolved)),
        ReportFormat::Json => println!(
            "{}",
            report::render_json(&routed, &detections.unresolved)
                .context("Failed to serialize the report")?
        ),
    }

    Ok(())
}
