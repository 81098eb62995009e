use serde::Serialize;

use crate::model::{PodRef, UnresolvedClaim};
use crate::router::ViolationReport;

#[derive(Serialize)]
struct JsonReport<'a> {
    contacts: &'a std::collections::BTreeMap<String, Vec<PodRef>>,
    unknown_contact: &'a [PodRef],
    unresolved_claims: &'a [UnresolvedClaim],
}

pub fn render_text(report: &ViolationReport, unresolved: &[UnresolvedClaim]) -> String {
    let mut out = String::new();

    if report.is_empty() && unresolved.is_empty() {
        out.push_str("No violations found.\n");
        return out;
    }

    for (email, pods) in &report.by_contact {
        out.push_str(&format!("E-mail: {email}\n"));
        for pod in pods {
            out.push_str(&format!(
                "  Pod: {}  Namespace: {}\n",
                pod.name, pod.namespace
            ));
        }
    }

    if !report.unknown_contact.is_empty() {
        out.push_str("Violations with no known contact:\n");
        for pod in &report.unknown_contact {
            out.push_str(&format!(
                "  Pod: {}  Namespace: {}\n",
                pod.name, pod.namespace
            ));
        }
    }

    if !unresolved.is_empty() {
        out.push_str("Claims that could not be resolved:\n");
        for entry in unresolved {
            out.push_str(&format!(
                "  Pod: {}  Namespace: {}  Claim: {} ({})\n",
                entry.pod.name, entry.pod.namespace, entry.claim, entry.reason
            ));
        }
    }

    out
}

pub fn render_json(
    report: &ViolationReport,
    unresolved: &[UnresolvedClaim],
) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&JsonReport {
        contacts: &report.by_contact,
        unknown_contact: &report.unknown_contact,
        unresolved_claims: unresolved,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pod_ref(name: &str, namespace: &str) -> PodRef {
        PodRef {
            name: name.to_string(),
            namespace: namespace.to_string(),
        }
    }

    fn sample_report() -> ViolationReport {
        let mut report = ViolationReport::default();
        report
            .by_contact
            .insert("a@x.com".to_string(), vec![pod_ref("p1", "ns1")]);
        report.unknown_contact.push(pod_ref("p5", "ns2"));
        report
    }

    #[test]
    fn empty_report_says_so() {
        let rendered = render_text(&ViolationReport::default(), &[]);
        assert_eq!(rendered, "No violations found.\n");
    }

    #[test]
    fn text_report_lists_contacts_and_unknown_bucket() {
        let unresolved = vec![UnresolvedClaim {
            pod: pod_ref("p6", "ns1"),
            claim: "ghost".to_string(),
            reason: "not found".to_string(),
        }];
        let rendered = render_text(&sample_report(), &unresolved);
        assert!(rendered.contains("E-mail: a@x.com"));
        assert!(rendered.contains("Pod: p1  Namespace: ns1"));
        assert!(rendered.contains("Violations with no known contact:"));
        assert!(rendered.contains("Pod: p5  Namespace: ns2"));
        assert!(rendered.contains("Claim: ghost (not found)"));
    }

    #[test]
    fn json_report_round_trips_through_serde() {
        let rendered = render_json(&sample_report(), &[]).unwrap();
        let value: serde_json::Value = serde_json::from_str(&rendered).unwrap();
        assert_eq!(value["contacts"]["a@x.com"][0]["name"], "p1");
        assert_eq!(value["unknown_contact"][0]["namespace"], "ns2");
        assert_eq!(value["unresolved_claims"], serde_json::json!([]));
    }
}
