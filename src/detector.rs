use std::collections::HashMap;

use k8s_openapi::api::core::v1::Pod;
use tracing::{debug, warn};

use crate::cluster::ClusterReader;
use crate::config::AuditConfig;
use crate::error::LookupError;
use crate::model::{PodRef, ProvisioningInfo, UnresolvedClaim, VolumeBinding, classify_volume};

/// Scheduler assigned by the apiserver when a pod spec names none.
const DEFAULT_SCHEDULER: &str = "default-scheduler";

/// Outcome of one detection pass.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Detections {
    /// Confirmed violations, one entry per triggering volume.
    pub violations: Vec<PodRef>,
    /// Suspected violations whose claim lookup failed.
    pub unresolved: Vec<UnresolvedClaim>,
}

/// Finds pods that use Portworx-backed storage without the required
/// scheduler. A pod is emitted once per offending volume; claim lookups are
/// memoized per (namespace, claim) within the pass.
pub async fn detect(
    cfg: &AuditConfig,
    pods: &[Pod],
    reader: &impl ClusterReader,
) -> Detections {
    let mut out = Detections::default();
    let mut claim_cache: HashMap<(String, String), Result<ProvisioningInfo, LookupError>> =
        HashMap::new();

    for pod in pods {
        let Some(spec) = &pod.spec else { continue };
        let scheduler = spec.scheduler_name.as_deref().unwrap_or(DEFAULT_SCHEDULER);
        if scheduler == cfg.scheduler_name {
            continue;
        }

        let pod_ref = PodRef::from_pod(pod);
        for volume in spec.volumes.as_deref().unwrap_or_default() {
            match classify_volume(volume) {
                VolumeBinding::Portworx => {
                    debug!(
                        "Pod {}/{} uses a direct Portworx volume with scheduler {scheduler}",
                        pod_ref.namespace, pod_ref.name
                    );
                    out.violations.push(pod_ref.clone());
                }
                VolumeBinding::Claim(claim) => {
                    let key = (pod_ref.namespace.clone(), claim.clone());
                    let resolved = match claim_cache.get(&key) {
                        Some(cached) => cached.clone(),
                        None => {
                            let resolved = reader
                                .claim_annotations(&pod_ref.namespace, &claim)
                                .await
                                .map(|annotations| {
                                    ProvisioningInfo::from_annotations(
                                        &annotations,
                                        &cfg.provisioner_key,
                                        &cfg.legacy_provisioner_key,
                                    )
                                });
                            claim_cache.insert(key, resolved.clone());
                            resolved
                        }
                    };
                    match resolved {
                        Ok(info) if info.provisioner.as_deref() == Some(cfg.provisioner.as_str()) => {
                            debug!(
                                "Pod {}/{} uses Portworx claim {claim} with scheduler {scheduler}",
                                pod_ref.namespace, pod_ref.name
                            );
                            out.violations.push(pod_ref.clone());
                        }
                        Ok(_) => {}
                        Err(err) => {
                            warn!(
                                "Can't resolve claim {}/{claim}: {err}",
                                pod_ref.namespace
                            );
                            out.unresolved.push(UnresolvedClaim {
                                pod: pod_ref.clone(),
                                claim,
                                reason: err.to_string(),
                            });
                        }
                    }
                }
                VolumeBinding::Other => {}
            }
        }
    }

    out
}
