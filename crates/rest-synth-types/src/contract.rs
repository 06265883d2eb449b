//! Interface contracts: the declarative input to synthesis.
//!
//! A contract is plain data. It can be built in code with the builder
//! methods or loaded from a JSON/YAML file:
//!
//! ```yaml
//! version: 1
//! name: widgets::IWidgetApi
//! methods:
//!   - name: get_widget
//!     params: [{ name: id, type: i64 }]
//!     returns: Future<Widget>
//!     route: { path: "/widgets/{id}", method: GET }
//! ```

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

use crate::route::{HttpVerb, RouteTemplate};

pub const SUPPORTED_CONTRACT_VERSION: u32 = 1;

/// A remote-call interface to synthesize.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterfaceContract {
    #[serde(default = "default_contract_version")]
    pub version: u32,
    /// Interface identity, optionally `::`-qualified (`widgets::IWidgetApi`).
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub methods: Vec<MethodContract>,
}

/// One method of an interface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodContract {
    pub name: String,
    #[serde(default)]
    pub params: Vec<Param>,
    /// Declared return type; absent means the method returns nothing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub returns: Option<String>,
    /// Methods without a route are not synthesized.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub route: Option<Route>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Param {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: String,
}

/// Route annotation: `{ path, method }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    pub path: String,
    pub method: HttpVerb,
}

impl Route {
    pub fn new(method: HttpVerb, path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            method,
        }
    }

    pub fn template(&self) -> RouteTemplate {
        RouteTemplate::parse(&self.path)
    }
}

impl Param {
    pub fn new(name: impl Into<String>, ty: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
        }
    }
}

impl MethodContract {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: Vec::new(),
            returns: None,
            route: None,
        }
    }

    pub fn param(mut self, name: impl Into<String>, ty: impl Into<String>) -> Self {
        self.params.push(Param::new(name, ty));
        self
    }

    pub fn returns(mut self, ty: impl Into<String>) -> Self {
        self.returns = Some(ty.into());
        self
    }

    pub fn route(mut self, method: HttpVerb, path: impl Into<String>) -> Self {
        self.route = Some(Route::new(method, path));
        self
    }

    pub fn is_routed(&self) -> bool {
        self.route.is_some()
    }
}

impl InterfaceContract {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            version: SUPPORTED_CONTRACT_VERSION,
            name: name.into(),
            description: None,
            methods: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_method(mut self, method: MethodContract) -> Self {
        self.methods.push(method);
        self
    }

    /// Last `::` segment of the interface identity.
    pub fn short_name(&self) -> &str {
        self.name.rsplit("::").next().unwrap_or(&self.name)
    }

    pub fn method(&self, name: &str) -> Option<&MethodContract> {
        self.methods.iter().find(|m| m.name == name)
    }

    pub fn routed_methods(&self) -> impl Iterator<Item = &MethodContract> {
        self.methods.iter().filter(|m| m.is_routed())
    }

    /// SHA-256 over the canonical JSON form, hex encoded.
    pub fn fingerprint(&self) -> String {
        // Struct field order is fixed, so the JSON form is stable.
        let canonical = serde_json::to_vec(self).unwrap_or_default();
        hex::encode(Sha256::digest(&canonical))
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read contract {}", path.display()))?;
        let ext = path
            .extension()
            .and_then(|value| value.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();

        let contract = if ext == "yaml" || ext == "yml" {
            serde_yaml::from_str::<Self>(&raw)
                .with_context(|| format!("Invalid YAML contract in {}", path.display()))?
        } else {
            serde_json::from_str::<Self>(&raw)
                .with_context(|| format!("Invalid JSON contract in {}", path.display()))?
        };

        contract.validate()?;
        Ok(contract)
    }

    pub fn from_json_str(raw: &str) -> Result<Self> {
        let contract: Self = serde_json::from_str(raw).context("Invalid JSON contract")?;
        contract.validate()?;
        Ok(contract)
    }

    pub fn from_yaml_str(raw: &str) -> Result<Self> {
        let contract: Self = serde_yaml::from_str(raw).context("Invalid YAML contract")?;
        contract.validate()?;
        Ok(contract)
    }

    /// Check the contract's shape, reporting every issue at once.
    ///
    /// Semantic problems (unsupported return shapes, duplicate method names,
    /// nothing to synthesize) are left to synthesis.
    pub fn validate(&self) -> Result<()> {
        let mut issues = Vec::new();
        self.collect_validation_issues(&mut issues);
        if issues.is_empty() {
            return Ok(());
        }

        let formatted = issues
            .into_iter()
            .enumerate()
            .map(|(idx, issue)| format!("  {}. {}", idx + 1, issue))
            .collect::<Vec<_>>()
            .join("\n");
        bail!("Contract validation failed:\n{formatted}");
    }

    fn collect_validation_issues(&self, issues: &mut Vec<String>) {
        if self.version != SUPPORTED_CONTRACT_VERSION {
            issues.push(format!(
                "version {} is not supported (expected {})",
                self.version, SUPPORTED_CONTRACT_VERSION
            ));
        }
        if self.name.trim().is_empty() {
            issues.push("name cannot be empty".to_string());
        }
        if matches!(self.description.as_deref(), Some(description) if description.trim().is_empty())
        {
            issues.push("description cannot be empty".to_string());
        }

        for (idx, method) in self.methods.iter().enumerate() {
            let label = format_method_label(method, idx + 1);
            if method.name.trim().is_empty() {
                issues.push(format!("{label}: name cannot be empty"));
            }
            if matches!(method.returns.as_deref(), Some(ty) if ty.trim().is_empty()) {
                issues.push(format!(
                    "{label}: `returns` cannot be empty (omit it for no return value)"
                ));
            }

            let mut seen_params = HashSet::new();
            for param in &method.params {
                if param.name.trim().is_empty() {
                    issues.push(format!("{label}: parameter name cannot be empty"));
                } else if !seen_params.insert(param.name.as_str()) {
                    issues.push(format!("{label}: duplicate parameter `{}`", param.name));
                }
                if param.ty.trim().is_empty() {
                    issues.push(format!(
                        "{label}: parameter `{}` has an empty type",
                        param.name
                    ));
                }
            }

            if let Some(route) = &method.route {
                if route.path.trim().is_empty() {
                    issues.push(format!("{label}: route `path` cannot be empty"));
                }
            }
        }
    }
}

fn format_method_label(method: &MethodContract, index: usize) -> String {
    if method.name.trim().is_empty() {
        format!("method {index}")
    } else {
        format!("method {index} (`{}`)", method.name)
    }
}

fn default_contract_version() -> u32 {
    SUPPORTED_CONTRACT_VERSION
}
