//! License / entitlement stub
//!
//! Entitlement checks live outside this core. The stub always reports
//! licensed so the engine's gate compiles against a stable interface.

/// Entitlement state consulted before dispatching an enhancement.
#[derive(Debug, Default, Clone, Copy)]
pub struct LicenseState;

impl LicenseState {
    pub fn new() -> Self {
        Self
    }

    /// Whether enhancement features are entitled. Always true in this stub.
    pub fn is_licensed(&self) -> bool {
        true
    }
}
