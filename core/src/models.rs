//! Resource models for the compute API.
//!
//! Response models ignore fields they do not know. Request models skip
//! `None` fields entirely, which is what merge-patch semantics require: an
//! absent member means "leave unchanged", while `null` would mean "clear".

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Link to a page of a list response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageLink {
    pub href: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvVar {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    /// Secret or config map the value is read from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
}

impl EnvVar {
    pub fn literal(name: &str, value: &str) -> Self {
        Self {
            kind: Some("literal".to_string()),
            name: Some(name.to_string()),
            value: Some(value.to_string()),
            reference: None,
            key: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Projects
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub crn: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub resource_group_id: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub href: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectPrototype {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_group_id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectEgressIps {
    #[serde(default)]
    pub private: Vec<String>,
    #[serde(default)]
    pub public: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectStatusDetails {
    #[serde(default)]
    pub domain: Option<String>,
    #[serde(default)]
    pub project: Option<String>,
    #[serde(default)]
    pub vpe_not_enabled: Option<bool>,
}

// ---------------------------------------------------------------------------
// Apps
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct App {
    pub name: String,
    pub image_reference: String,
    #[serde(default)]
    pub project_id: Option<String>,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub entity_tag: Option<String>,
    #[serde(default)]
    pub endpoint: Option<String>,
    #[serde(default)]
    pub image_port: Option<u16>,
    #[serde(default)]
    pub scale_min_instances: Option<u32>,
    #[serde(default)]
    pub scale_max_instances: Option<u32>,
    #[serde(default)]
    pub run_env_variables: Vec<EnvVar>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppPrototype {
    pub name: String,
    pub image_reference: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_port: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_secret: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub managed_domain_mappings: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub run_env_variables: Vec<EnvVar>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale_min_instances: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale_max_instances: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale_cpu_limit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale_memory_limit: Option<String>,
}

/// Merge patch for an app. Only the fields that are `Some` are changed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_reference: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_port: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_secret: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub run_env_variables: Option<Vec<EnvVar>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale_min_instances: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale_max_instances: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale_cpu_limit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale_memory_limit: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppRevision {
    pub name: String,
    #[serde(default)]
    pub app_name: Option<String>,
    #[serde(default)]
    pub image_reference: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppInstance {
    pub name: String,
    #[serde(default)]
    pub app_name: Option<String>,
    #[serde(default)]
    pub revision_name: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub restarts: Option<u32>,
}

// ---------------------------------------------------------------------------
// Jobs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    pub name: String,
    pub image_reference: String,
    #[serde(default)]
    pub project_id: Option<String>,
    #[serde(default)]
    pub entity_tag: Option<String>,
    #[serde(default)]
    pub run_mode: Option<String>,
    #[serde(default)]
    pub run_arguments: Vec<String>,
    #[serde(default)]
    pub run_env_variables: Vec<EnvVar>,
    #[serde(default)]
    pub scale_array_spec: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobPrototype {
    pub name: String,
    pub image_reference: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_secret: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub run_mode: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub run_arguments: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub run_env_variables: Vec<EnvVar>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale_array_spec: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale_max_execution_time: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale_retry_limit: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_reference: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_secret: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub run_mode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub run_arguments: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub run_env_variables: Option<Vec<EnvVar>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale_array_spec: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale_retry_limit: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobRun {
    pub name: String,
    #[serde(default)]
    pub job_name: Option<String>,
    #[serde(default)]
    pub image_reference: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobRunPrototype {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_reference: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub run_arguments: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub run_env_variables: Vec<EnvVar>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale_array_spec: Option<String>,
}

// ---------------------------------------------------------------------------
// Builds
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Build {
    pub name: String,
    pub output_image: String,
    pub source_url: String,
    pub strategy_type: String,
    #[serde(default)]
    pub entity_tag: Option<String>,
    #[serde(default)]
    pub source_revision: Option<String>,
    #[serde(default)]
    pub source_context_dir: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildPrototype {
    pub name: String,
    pub output_image: String,
    pub output_secret: String,
    pub source_url: String,
    pub strategy_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_revision: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_context_dir: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_secret: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strategy_size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_secret: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_revision: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strategy_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strategy_size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildRun {
    pub name: String,
    #[serde(default)]
    pub build_name: Option<String>,
    #[serde(default)]
    pub output_image: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildRunPrototype {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strategy_type: Option<String>,
}

// ---------------------------------------------------------------------------
// Bindings
// ---------------------------------------------------------------------------

/// A component (app or job) inside a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentRef {
    pub name: String,
    pub resource_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Binding {
    pub id: String,
    pub component: ComponentRef,
    pub prefix: String,
    pub secret_name: String,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BindingPrototype {
    pub component: ComponentRef,
    pub prefix: String,
    pub secret_name: String,
}

// ---------------------------------------------------------------------------
// Secrets
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Secret {
    pub name: String,
    pub format: String,
    #[serde(default)]
    pub entity_tag: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecretPrototype {
    pub name: String,
    pub format: String,
    #[serde(default, skip_serializing_if = "std::collections::BTreeMap::is_empty")]
    pub data: std::collections::BTreeMap<String, String>,
}

/// Full replacement of a secret's data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecretReplace {
    pub format: String,
    #[serde(default)]
    pub data: std::collections::BTreeMap<String, String>,
}

// ---------------------------------------------------------------------------
// Domain mappings
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainMapping {
    pub name: String,
    pub component: ComponentRef,
    pub tls_secret: String,
    #[serde(default)]
    pub entity_tag: Option<String>,
    #[serde(default)]
    pub cname_target: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainMappingPrototype {
    pub name: String,
    pub component: ComponentRef,
    pub tls_secret: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainMappingPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component: Option<ComponentRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tls_secret: Option<String>,
}
