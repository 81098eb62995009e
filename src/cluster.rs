use std::collections::BTreeMap;
use std::time::Duration;

use k8s_openapi::api::core::v1::{Namespace, PersistentVolumeClaim, Pod};
use kube::{Api, Client, api::ListParams};
use tokio::time::sleep;
use tracing::warn;

use crate::error::LookupError;

/// Read-only view of cluster state consumed by the audit passes.
///
/// The detector and router only ever read through this trait, which keeps
/// both passes pure transforms and testable against an in-memory fake.
pub trait ClusterReader {
    async fn list_pods(&self, namespace: &str) -> Result<Vec<Pod>, LookupError>;

    async fn claim_annotations(
        &self,
        namespace: &str,
        claim: &str,
    ) -> Result<BTreeMap<String, String>, LookupError>;

    async fn namespace_annotations(
        &self,
        name: &str,
    ) -> Result<BTreeMap<String, String>, LookupError>;
}

const READ_ATTEMPTS: u32 = 3;
const RETRY_DELAY: Duration = Duration::from_secs(2);

/// Cluster reader backed by the Kubernetes API.
///
/// Transient read errors are retried a bounded number of times; whatever
/// still fails is surfaced as a `LookupError` instead of terminating the
/// audit.
pub struct KubeReader {
    client: Client,
}

impl KubeReader {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

fn is_not_found(err: &kube::Error) -> bool {
    matches!(err, kube::Error::Api(resp) if resp.code == 404)
}

impl ClusterReader for KubeReader {
    async fn list_pods(&self, namespace: &str) -> Result<Vec<Pod>, LookupError> {
        let api: Api<Pod> = Api::namespaced(self.client.clone(), namespace);
        let mut attempt = 0;
        loop {
            match api.list(&ListParams::default()).await {
                Ok(pods) => return Ok(pods.items),
                Err(err) if is_not_found(&err) => return Err(LookupError::NotFound),
                Err(err) => {
                    attempt += 1;
                    if attempt >= READ_ATTEMPTS {
                        return Err(LookupError::Read(err.to_string()));
                    }
                    warn!("Error listing pods in {namespace}: {err}");
                    warn!("Retrying in {} seconds...", RETRY_DELAY.as_secs());
                    sleep(RETRY_DELAY).await;
                }
            }
        }
    }

    async fn claim_annotations(
        &self,
        namespace: &str,
        claim: &str,
    ) -> Result<BTreeMap<String, String>, LookupError> {
        let api: Api<PersistentVolumeClaim> = Api::namespaced(self.client.clone(), namespace);
        let mut attempt = 0;
        loop {
            match api.get(claim).await {
                Ok(pvc) => return Ok(pvc.metadata.annotations.unwrap_or_default()),
                Err(err) if is_not_found(&err) => return Err(LookupError::NotFound),
                Err(err) => {
                    attempt += 1;
                    if attempt >= READ_ATTEMPTS {
                        return Err(LookupError::Read(err.to_string()));
                    }
                    warn!("Error reading claim {namespace}/{claim}: {err}");
                    warn!("Retrying in {} seconds...", RETRY_DELAY.as_secs());
                    sleep(RETRY_DELAY).await;
                }
            }
        }
    }

    async fn namespace_annotations(
        &self,
        name: &str,
    ) -> Result<BTreeMap<String, String>, LookupError> {
        let api: Api<Namespace> = Api::all(self.client.clone());
        let mut attempt = 0;
        loop {
            match api.get(name).await {
                Ok(ns) => return Ok(ns.metadata.annotations.unwrap_or_default()),
                Err(err) if is_not_found(&err) => return Err(LookupError::NotFound),
                Err(err) => {
                    attempt += 1;
                    if attempt >= READ_ATTEMPTS {
                        return Err(LookupError::Read(err.to_string()));
                    }
                    warn!("Error reading namespace {name}: {err}");
                    warn!("Retrying in {} seconds...", RETRY_DELAY.as_secs());
                    sleep(RETRY_DELAY).await;
                }
            }
        }
    }
}
