//! # Isolation Policy
//!
//! Capability allow-list for the preview context. Anything not listed is
//! denied. Top-level navigation can never be granted.

use crate::PreviewError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// One grantable sandbox capability, named after its iframe token
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SandboxCapability {
    #[serde(rename = "allow-scripts")]
    Scripts,
    #[serde(rename = "allow-same-origin")]
    SameOrigin,
    #[serde(rename = "allow-forms")]
    Forms,
    #[serde(rename = "allow-modals")]
    Modals,
    #[serde(rename = "allow-popups")]
    Popups,
    #[serde(rename = "allow-downloads")]
    Downloads,
    #[serde(rename = "allow-pointer-lock")]
    PointerLock,
    #[serde(rename = "allow-presentation")]
    Presentation,
    #[serde(rename = "allow-top-navigation")]
    TopNavigation,
    #[serde(rename = "allow-top-navigation-by-user-activation")]
    TopNavigationByUserActivation,
}

impl SandboxCapability {
    pub fn token(&self) -> &'static str {
        match self {
            SandboxCapability::Scripts => "allow-scripts",
            SandboxCapability::SameOrigin => "allow-same-origin",
            SandboxCapability::Forms => "allow-forms",
            SandboxCapability::Modals => "allow-modals",
            SandboxCapability::Popups => "allow-popups",
            SandboxCapability::Downloads => "allow-downloads",
            SandboxCapability::PointerLock => "allow-pointer-lock",
            SandboxCapability::Presentation => "allow-presentation",
            SandboxCapability::TopNavigation => "allow-top-navigation",
            SandboxCapability::TopNavigationByUserActivation => {
                "allow-top-navigation-by-user-activation"
            }
        }
    }

    /// Capabilities that would let the preview escape into the host page
    pub fn is_forbidden(&self) -> bool {
        matches!(
            self,
            SandboxCapability::TopNavigation | SandboxCapability::TopNavigationByUserActivation
        )
    }
}

impl fmt::Display for SandboxCapability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// Set of capabilities granted to the preview context
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SandboxPolicy {
    allowed: BTreeSet<SandboxCapability>,
}

impl SandboxPolicy {
    /// Policy granting nothing
    pub fn deny_all() -> Self {
        Self {
            allowed: BTreeSet::new(),
        }
    }

    /// Grant one more capability
    pub fn allow(mut self, capability: SandboxCapability) -> Result<Self, PreviewError> {
        if capability.is_forbidden() {
            return Err(PreviewError::ForbiddenCapability(capability));
        }
        self.allowed.insert(capability);
        Ok(self)
    }

    pub fn permits(&self, capability: SandboxCapability) -> bool {
        self.allowed.contains(&capability)
    }

    /// Reject policies that were deserialized with a forbidden capability
    pub fn validate(&self) -> Result<(), PreviewError> {
        match self.allowed.iter().find(|c| c.is_forbidden()) {
            Some(capability) => Err(PreviewError::ForbiddenCapability(*capability)),
            None => Ok(()),
        }
    }

    /// Value for the iframe `sandbox` attribute
    pub fn attribute(&self) -> String {
        self.allowed
            .iter()
            .map(|c| c.token())
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn capabilities(&self) -> impl Iterator<Item = SandboxCapability> + '_ {
        self.allowed.iter().copied()
    }
}

impl Default for SandboxPolicy {
    /// Scripts, same-origin DOM, forms and modal dialogs
    fn default() -> Self {
        let allowed = [
            SandboxCapability::Scripts,
            SandboxCapability::SameOrigin,
            SandboxCapability::Forms,
            SandboxCapability::Modals,
        ]
        .into_iter()
        .collect();

        Self { allowed }
    }
}
