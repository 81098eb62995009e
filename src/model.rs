use std::collections::BTreeMap;

use k8s_openapi::api::core::v1::{Pod, Volume};
use serde::Serialize;

/// Identity of a pod that failed the scheduler policy check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PodRef {
    pub name: String,
    pub namespace: String,
}

impl PodRef {
    pub fn from_pod(pod: &Pod) -> Self {
        Self {
            name: pod.metadata.name.clone().unwrap_or_default(),
            namespace: pod.metadata.namespace.clone().unwrap_or_default(),
        }
    }
}

/// How a single pod volume relates to Portworx storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VolumeBinding {
    /// Portworx volume declared directly in the pod spec.
    Portworx,
    /// PersistentVolumeClaim reference, resolved lazily via its claim name.
    Claim(String),
    Other,
}

pub fn classify_volume(volume: &Volume) -> VolumeBinding {
    if volume.portworx_volume.is_some() {
        return VolumeBinding::Portworx;
    }
    if let Some(pvc) = &volume.persistent_volume_claim {
        return VolumeBinding::Claim(pvc.claim_name.clone());
    }
    VolumeBinding::Other
}

/// Provisioning metadata resolved from a PVC's annotations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisioningInfo {
    pub provisioner: Option<String>,
}

impl ProvisioningInfo {
    /// The current annotation key wins; the legacy key is a fallback only.
    pub fn from_annotations(
        annotations: &BTreeMap<String, String>,
        key: &str,
        legacy_key: &str,
    ) -> Self {
        let provisioner = annotations
            .get(key)
            .or_else(|| annotations.get(legacy_key))
            .cloned();
        Self { provisioner }
    }
}

/// A suspected violation whose claim could not be resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnresolvedClaim {
    pub pod: PodRef,
    pub claim: String,
    pub reason: String,
}
