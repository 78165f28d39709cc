//! Camera follow state machine
//!
//! Decides the next camera command from location samples, the lock toggle,
//! user gestures and server recenter suggestions.
//!
//! | From               | Event                        | To                     |
//! |--------------------|------------------------------|------------------------|
//! | `Idle`             | first fix                    | `Following*` (by lock) |
//! | `FollowingUnlocked`| user gesture                 | `UserOverridden`       |
//! | `UserOverridden`   | recenter or lock flip        | `Following*`           |
//! | `Following*`       | lock flip                    | the other `Following*` |
//! | any                | fix lost                     | `Idle`                 |

use serde::Serialize;
use tracing::debug;

use crate::config::CameraSettings;
use crate::gesture::GestureKind;
use fieldmap_core::{CameraCommand, Fix, Heading, LngLat, LocationSample, RecommendedCenter};

/// Follow mode of the camera
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CameraMode {
    /// No fix yet (or fix lost): nothing to show
    #[default]
    Idle,
    FollowingUnlocked,
    FollowingLocked,
    /// The user moved the map while unlocked; automatic follow is suspended
    UserOverridden,
}

impl CameraMode {
    fn following(locked: bool) -> Self {
        if locked {
            CameraMode::FollowingLocked
        } else {
            CameraMode::FollowingUnlocked
        }
    }

}

impl std::fmt::Display for CameraMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CameraMode::Idle => write!(f, "idle"),
            CameraMode::FollowingUnlocked => write!(f, "following_unlocked"),
            CameraMode::FollowingLocked => write!(f, "following_locked"),
            CameraMode::UserOverridden => write!(f, "user_overridden"),
        }
    }
}

/// Owns the camera mode and the last location sample.
///
/// Every method is a synchronous transition that returns at most one
/// command; samples must be fed in arrival order.
#[derive(Debug, Clone)]
pub struct CameraController {
    profile: CameraSettings,
    mode: CameraMode,
    sample: Option<LocationSample>,
    locked: bool,
    /// Lock flag carried by the previous sample
    reported_lock: Option<bool>,
    /// Set once `set_locked` has been used
    lock_toggled: bool,
}

impl CameraController {
    pub fn new(profile: CameraSettings) -> Self {
        Self {
            profile,
            mode: CameraMode::Idle,
            sample: None,
            locked: false,
            reported_lock: None,
            lock_toggled: false,
        }
    }

    pub fn mode(&self) -> CameraMode {
        self.mode
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub fn is_overridden(&self) -> bool {
        self.mode == CameraMode::UserOverridden
    }

    pub fn current_sample(&self) -> Option<&LocationSample> {
        self.sample.as_ref()
    }

    /// Feed a new location sample.
    ///
    /// The sample's `is_locked` counts as a lock toggle only when it changed
    /// from the previous sample, so a feed that keeps reporting a stale lock
    /// does not undo `set_locked`. The very first sample sets the lock unless
    /// it was already toggled explicitly. Otherwise a changed sample produces
    /// a follow command unless the user has overridden the camera.
    pub fn on_sample(&mut self, sample: LocationSample) -> Option<CameraCommand> {
        let previous = self.sample.replace(sample);

        let lock_edge = match self.reported_lock.replace(sample.is_locked) {
            Some(reported) => reported != sample.is_locked,
            None => !self.lock_toggled,
        };
        if lock_edge && sample.is_locked != self.locked {
            return self.apply_lock(sample.is_locked);
        }

        let Some(fix) = sample.fix() else {
            self.enter(CameraMode::Idle);
            return None;
        };

        match self.mode {
            CameraMode::Idle => {
                self.enter(CameraMode::following(self.locked));
                Some(self.follow_command(fix, sample.heading))
            }
            CameraMode::UserOverridden => None,
            CameraMode::FollowingUnlocked | CameraMode::FollowingLocked => {
                if previous == Some(sample) {
                    return None;
                }
                Some(self.follow_command(fix, sample.heading))
            }
        }
    }

    /// Explicit lock toggle. A no-op when the lock already has this value.
    pub fn set_locked(&mut self, locked: bool) -> Option<CameraCommand> {
        self.lock_toggled = true;
        if locked == self.locked {
            return None;
        }
        self.apply_lock(locked)
    }

    /// Feed a classified camera change from the gesture tracker.
    /// Returns true when this gesture started an override.
    pub fn on_gesture(&mut self, kind: GestureKind) -> bool {
        if kind == GestureKind::UserInitiated && self.mode == CameraMode::FollowingUnlocked {
            self.enter(CameraMode::UserOverridden);
            return true;
        }
        false
    }

    /// User-invoked recenter: drop any override and re-issue the follow
    /// command for the current sample.
    pub fn recenter(&mut self) -> Option<CameraCommand> {
        let sample = self.sample?;
        let Some(fix) = sample.fix() else {
            debug!("Recenter ignored: no fix");
            return None;
        };
        self.enter(CameraMode::following(self.locked));
        Some(self.follow_command(fix, sample.heading))
    }

    /// One-shot server suggestion. Only honoured while following unlocked.
    pub fn apply_suggestion(&mut self, center: RecommendedCenter) -> Option<CameraCommand> {
        if self.mode != CameraMode::FollowingUnlocked {
            debug!(mode = %self.mode, "Recommended center not applied");
            return None;
        }
        Some(CameraCommand {
            center: LngLat::new(center.longitude, center.latitude),
            zoom: center.zoom,
            heading: Some(0.0),
            pitch: 0.0,
            animation_duration_ms: self.profile.unlocked_animation_ms,
        })
    }

    /// Forget everything (screen unmount)
    pub fn reset(&mut self) {
        self.enter(CameraMode::Idle);
        self.sample = None;
        self.locked = false;
        self.reported_lock = None;
        self.lock_toggled = false;
    }

    fn apply_lock(&mut self, locked: bool) -> Option<CameraCommand> {
        self.locked = locked;

        let Some(sample) = self.sample else {
            debug!(locked, "Lock changed before any sample");
            return None;
        };
        let Some(fix) = sample.fix() else {
            self.enter(CameraMode::Idle);
            return None;
        };

        self.enter(CameraMode::following(locked));
        if locked {
            Some(self.locked_command(fix, sample.heading))
        } else {
            Some(self.unlocked_command(fix))
        }
    }

    fn enter(&mut self, mode: CameraMode) {
        if self.mode != mode {
            debug!(from = %self.mode, to = %mode, "Camera mode transition");
            self.mode = mode;
        }
    }

    fn follow_command(&self, fix: Fix, heading: Heading) -> CameraCommand {
        if self.locked {
            self.locked_command(fix, heading)
        } else {
            self.unlocked_command(fix)
        }
    }

    fn locked_command(&self, fix: Fix, heading: Heading) -> CameraCommand {
        CameraCommand {
            center: fix.into(),
            zoom: self.profile.locked_zoom,
            heading: heading.value(),
            pitch: self.profile.locked_pitch,
            animation_duration_ms: self.profile.locked_animation_ms,
        }
    }

    fn unlocked_command(&self, fix: Fix) -> CameraCommand {
        CameraCommand {
            center: fix.into(),
            zoom: self.profile.unlocked_zoom,
            heading: Some(0.0),
            pitch: 0.0,
            animation_duration_ms: self.profile.unlocked_animation_ms,
        }
    }
}

impl Default for CameraController {
    fn default() -> Self {
        Self::new(CameraSettings::default())
    }
}
