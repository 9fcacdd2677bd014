//! Canonical settings schema and compiled-in defaults.
//!
//! The typed structs below define the shape of the settings document: which
//! keys exist and the scalar kind at every leaf. Deployment profiles and
//! command-line overrides may only set values at existing leaf paths; they
//! can never introduce new keys or change a leaf's kind.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Version of the settings document layout.
pub const SETTINGS_VERSION: u32 = 6;

/// Root settings document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    /// Settings-document layout version.
    pub version: u32,
    pub application: ApplicationSettings,
    pub container_engine: ContainerEngineSettings,
    pub virtual_machine: VirtualMachineSettings,
    pub kubernetes: KubernetesSettings,
    pub port_forwarding: PortForwardingSettings,
    pub images: ImageSettings,
    pub diagnostics: DiagnosticsSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ApplicationSettings {
    pub admin_access: bool,
    pub debug: bool,
    pub telemetry: TelemetrySettings,
    pub updater: UpdaterSettings,
    pub auto_start: bool,
    pub start_in_background: bool,
    pub hide_notification_icon: bool,
    pub window: WindowSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TelemetrySettings {
    pub enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdaterSettings {
    pub enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WindowSettings {
    pub quit_on_close: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContainerEngineSettings {
    pub name: ContainerEngineKind,
    pub allowed_images: AllowedImagesSettings,
}

/// Which container engine backs the virtual machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ContainerEngineKind {
    #[default]
    Moby,
    Containerd,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AllowedImagesSettings {
    pub enabled: bool,
    pub patterns: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VirtualMachineSettings {
    #[serde(rename = "memoryInGB")]
    pub memory_in_gb: u32,
    #[serde(rename = "numberCPUs")]
    pub number_cpus: u32,
    pub host_resolver: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct KubernetesSettings {
    pub version: String,
    pub port: u16,
    pub enabled: bool,
    pub options: KubernetesOptions,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct KubernetesOptions {
    pub traefik: bool,
    pub flannel: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PortForwardingSettings {
    pub include_kubernetes_services: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ImageSettings {
    pub show_all: bool,
    pub namespace: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DiagnosticsSettings {
    pub show_muted: bool,
    /// Check id -> muted. Keys are dynamic, so nothing inside this object is
    /// addressable by command-line accessors.
    pub muted_checks: BTreeMap<String, bool>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            version: SETTINGS_VERSION,
            application: ApplicationSettings::default(),
            container_engine: ContainerEngineSettings::default(),
            virtual_machine: VirtualMachineSettings::default(),
            kubernetes: KubernetesSettings::default(),
            port_forwarding: PortForwardingSettings::default(),
            images: ImageSettings::default(),
            diagnostics: DiagnosticsSettings::default(),
        }
    }
}

impl Default for ApplicationSettings {
    fn default() -> Self {
        Self {
            admin_access: true,
            debug: false,
            telemetry: TelemetrySettings { enabled: true },
            updater: UpdaterSettings { enabled: true },
            auto_start: false,
            start_in_background: false,
            hide_notification_icon: false,
            window: WindowSettings {
                quit_on_close: false,
            },
        }
    }
}

impl Default for TelemetrySettings {
    fn default() -> Self {
        Self { enabled: true }
    }
}

impl Default for UpdaterSettings {
    fn default() -> Self {
        Self { enabled: true }
    }
}

impl Default for WindowSettings {
    fn default() -> Self {
        Self {
            quit_on_close: false,
        }
    }
}

impl Default for ContainerEngineSettings {
    fn default() -> Self {
        Self {
            name: ContainerEngineKind::Moby,
            allowed_images: AllowedImagesSettings::default(),
        }
    }
}

impl Default for AllowedImagesSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            patterns: Vec::new(),
        }
    }
}

impl Default for VirtualMachineSettings {
    fn default() -> Self {
        Self {
            memory_in_gb: 4,
            number_cpus: 2,
            host_resolver: true,
        }
    }
}

impl Default for KubernetesSettings {
    fn default() -> Self {
        Self {
            version: "1.29.4".to_string(),
            port: 6443,
            enabled: true,
            options: KubernetesOptions::default(),
        }
    }
}

impl Default for KubernetesOptions {
    fn default() -> Self {
        Self {
            traefik: true,
            flannel: false,
        }
    }
}

impl Default for PortForwardingSettings {
    fn default() -> Self {
        Self {
            include_kubernetes_services: false,
        }
    }
}

impl Default for ImageSettings {
    fn default() -> Self {
        Self {
            show_all: true,
            namespace: "k8s.io".to_string(),
        }
    }
}

impl Default for DiagnosticsSettings {
    fn default() -> Self {
        Self {
            show_muted: false,
            muted_checks: BTreeMap::new(),
        }
    }
}

impl Settings {
    /// Compiled-in defaults as a JSON tree. This is the canonical shape every
    /// overlay and override is checked against.
    pub fn default_tree() -> Value {
        serde_json::to_value(Settings::default())
            .expect("default settings always serialize to JSON")
    }
}
