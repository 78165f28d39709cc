//! Readiness gate for the marker fetch
//!
//! The map screen may only request marker data once the map surface has
//! loaded, the user is authenticated, the app core has initialized and the
//! app is in the foreground. Camera following is deliberately not gated.

use serde::{Deserialize, Serialize};

/// One of the four independent readiness inputs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadinessFlag {
    SurfaceLoaded,
    Authenticated,
    CoreInitialized,
    Foregrounded,
}

impl ReadinessFlag {
    pub const ALL: [ReadinessFlag; 4] = [
        ReadinessFlag::SurfaceLoaded,
        ReadinessFlag::Authenticated,
        ReadinessFlag::CoreInitialized,
        ReadinessFlag::Foregrounded,
    ];
}

impl std::fmt::Display for ReadinessFlag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReadinessFlag::SurfaceLoaded => write!(f, "surface_loaded"),
            ReadinessFlag::Authenticated => write!(f, "authenticated"),
            ReadinessFlag::CoreInitialized => write!(f, "core_initialized"),
            ReadinessFlag::Foregrounded => write!(f, "foregrounded"),
        }
    }
}

/// Edge produced by changing one readiness input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateTransition {
    BecameReady,
    BecameNotReady,
    Unchanged,
}

/// Derived `ready` signal over the four readiness inputs
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LifecycleGate {
    surface_loaded: bool,
    authenticated: bool,
    core_initialized: bool,
    foregrounded: bool,
}

impl LifecycleGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ready(&self) -> bool {
        self.surface_loaded && self.authenticated && self.core_initialized && self.foregrounded
    }

    pub fn get(&self, flag: ReadinessFlag) -> bool {
        match flag {
            ReadinessFlag::SurfaceLoaded => self.surface_loaded,
            ReadinessFlag::Authenticated => self.authenticated,
            ReadinessFlag::CoreInitialized => self.core_initialized,
            ReadinessFlag::Foregrounded => self.foregrounded,
        }
    }

    /// Update one input and report how `ready` moved
    pub fn set(&mut self, flag: ReadinessFlag, value: bool) -> GateTransition {
        let was_ready = self.ready();

        let slot = match flag {
            ReadinessFlag::SurfaceLoaded => &mut self.surface_loaded,
            ReadinessFlag::Authenticated => &mut self.authenticated,
            ReadinessFlag::CoreInitialized => &mut self.core_initialized,
            ReadinessFlag::Foregrounded => &mut self.foregrounded,
        };
        *slot = value;

        match (was_ready, self.ready()) {
            (false, true) => GateTransition::BecameReady,
            (true, false) => GateTransition::BecameNotReady,
            _ => GateTransition::Unchanged,
        }
    }

    /// Inputs still holding the gate closed
    pub fn missing(&self) -> Vec<ReadinessFlag> {
        ReadinessFlag::ALL
            .into_iter()
            .filter(|flag| !self.get(*flag))
            .collect()
    }
}
