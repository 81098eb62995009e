use std::collections::{BTreeMap, HashMap};

use serde::Serialize;
use tracing::warn;

use crate::cluster::ClusterReader;
use crate::config::AuditConfig;
use crate::model::PodRef;

/// Violations grouped by contact address. Built fresh per run.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct ViolationReport {
    /// Per-email pod lists, in detection order.
    pub by_contact: BTreeMap<String, Vec<PodRef>>,
    /// Violations whose namespace yielded no usable contact address.
    pub unknown_contact: Vec<PodRef>,
}

impl ViolationReport {
    pub fn is_empty(&self) -> bool {
        self.by_contact.is_empty() && self.unknown_contact.is_empty()
    }
}

/// Splits a raw contacts annotation into individual addresses.
///
/// Tokens are trimmed and empty tokens dropped, so `"a@x.com; b@x.com;"`
/// yields exactly two addresses.
pub fn parse_contacts(raw: &str) -> Vec<String> {
    raw.split(';')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(String::from)
        .collect()
}

/// Groups violations by the technical contacts annotated on their
/// namespaces. Namespace lookups are memoized; a namespace that cannot be
/// resolved routes its violations to the unknown-contact bucket instead of
/// aborting the pass.
pub async fn route(
    cfg: &AuditConfig,
    violations: &[PodRef],
    reader: &impl ClusterReader,
) -> ViolationReport {
    let mut report = ViolationReport::default();
    let mut contact_cache: HashMap<String, Vec<String>> = HashMap::new();

    for pod in violations {
        let contacts = match contact_cache.get(&pod.namespace) {
            Some(cached) => cached.clone(),
            None => {
                let contacts = match reader.namespace_annotations(&pod.namespace).await {
                    Ok(annotations) => annotations
                        .get(&cfg.contacts_key)
                        .map(|raw| parse_contacts(raw))
                        .unwrap_or_default(),
                    Err(err) => {
                        warn!("Can't resolve contacts for namespace {}: {err}", pod.namespace);
                        Vec::new()
                    }
                };
                contact_cache.insert(pod.namespace.clone(), contacts.clone());
                contacts
            }
        };

        if contacts.is_empty() {
            report.unknown_contact.push(pod.clone());
            continue;
        }
        for email in &contacts {
            report
                .by_contact
                .entry(email.clone())
                .or_default()
                .push(pod.clone());
        }
    }

    report
}
