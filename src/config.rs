use crate::{config_err, error::ConfigError};

pub const PORTWORX_SCHEDULER: &str = "stork";
pub const PORTWORX_PROVISIONER: &str = "pxd.portworx.com";
pub const PROVISIONER_ANNOTATION: &str = "volume.kubernetes.io/storage-provisioner";
pub const PROVISIONER_ANNOTATION_LEGACY: &str = "volume.beta.kubernetes.io/storage-provisioner";
pub const CONTACTS_ANNOTATION: &str = "managedprojects/technical-contacts";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Text,
    Json,
}

impl ReportFormat {
    fn parse(raw: &str) -> Result<Self, ConfigError> {
        match raw {
            "text" => Ok(ReportFormat::Text),
            "json" => Ok(ReportFormat::Json),
            other => config_err!("Unknown report format: {other} (expected 'text' or 'json')"),
        }
    }
}

/// Fixed audit parameters, resolved once at startup.
#[derive(Debug, Clone)]
pub struct AuditConfig {
    /// Scheduler every Portworx-backed pod is required to use.
    pub scheduler_name: String,
    /// Provisioner identifier marking a PVC as Portworx-backed.
    pub provisioner: String,
    pub provisioner_key: String,
    pub legacy_provisioner_key: String,
    /// Namespace annotation holding the semicolon-delimited contact list.
    pub contacts_key: String,
    pub namespaces: Vec<String>,
    pub format: ReportFormat,
}

impl AuditConfig {
    pub fn new(namespaces: Vec<String>) -> Self {
        Self {
            scheduler_name: PORTWORX_SCHEDULER.to_string(),
            provisioner: PORTWORX_PROVISIONER.to_string(),
            provisioner_key: PROVISIONER_ANNOTATION.to_string(),
            legacy_provisioner_key: PROVISIONER_ANNOTATION_LEGACY.to_string(),
            contacts_key: CONTACTS_ANNOTATION.to_string(),
            namespaces,
            format: ReportFormat::Text,
        }
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        let namespaces = std::env::var("AUDIT_NAMESPACES")
            .map_err(|_| ConfigError::new("AUDIT_NAMESPACES is not set"))?;
        let namespaces = namespaces
            .split(',')
            .map(str::trim)
            .filter(|ns| !ns.is_empty())
            .map(String::from)
            .collect();

        let mut cfg = Self::new(namespaces);
        if let Ok(scheduler) = std::env::var("AUDIT_SCHEDULER") {
            cfg.scheduler_name = scheduler;
        }
        if let Ok(provisioner) = std::env::var("AUDIT_PROVISIONER") {
            cfg.provisioner = provisioner;
        }
        if let Ok(annotation) = std::env::var("AUDIT_CONTACTS_ANNOTATION") {
            cfg.contacts_key = annotation;
        }
        if let Ok(format) = std::env::var("REPORT_FORMAT") {
            cfg.format = ReportFormat::parse(&format)?;
        }
        cfg.validate()?;
        Ok(cfg)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.namespaces.is_empty() {
            return config_err!("No target namespaces configured");
        }
        if self.scheduler_name.is_empty() {
            return config_err!("Required scheduler name must not be empty");
        }
        if self.provisioner.is_empty() {
            return config_err!("Provisioner identifier must not be empty");
        }
        if self.contacts_key.is_empty() {
            return config_err!("Contacts annotation key must not be empty");
        }
        Ok(())
    }
}
