use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A key the fly camera reacts to.
///
/// Two schemes coexist: the look keys step an orientation angle by a fixed
/// amount per update, the move keys translate the camera scaled by elapsed time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ControlKey {
    /// Raise the vertical angle (W).
    LookUp,
    /// Lower the vertical angle (S).
    LookDown,
    /// Raise the horizontal angle (A).
    TurnLeft,
    /// Lower the horizontal angle (D).
    TurnRight,
    /// Move along the view direction (Up arrow).
    Forward,
    /// Move against the view direction (Down arrow).
    Backward,
    /// Move along the right vector (Right arrow).
    StrafeRight,
    /// Move against the right vector (Left arrow).
    StrafeLeft,
}

impl ControlKey {
    pub const ALL: [ControlKey; 8] = [
        ControlKey::LookUp,
        ControlKey::LookDown,
        ControlKey::TurnLeft,
        ControlKey::TurnRight,
        ControlKey::Forward,
        ControlKey::Backward,
        ControlKey::StrafeRight,
        ControlKey::StrafeLeft,
    ];

    fn bit(self) -> u8 {
        1 << self as u8
    }

    pub fn name(self) -> &'static str {
        match self {
            ControlKey::LookUp => "look-up",
            ControlKey::LookDown => "look-down",
            ControlKey::TurnLeft => "turn-left",
            ControlKey::TurnRight => "turn-right",
            ControlKey::Forward => "forward",
            ControlKey::Backward => "backward",
            ControlKey::StrafeRight => "strafe-right",
            ControlKey::StrafeLeft => "strafe-left",
        }
    }
}

impl fmt::Display for ControlKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown control key: {0}")]
pub struct ParseControlKeyError(pub String);

impl FromStr for ControlKey {
    type Err = ParseControlKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ControlKey::ALL
            .into_iter()
            .find(|k| k.name() == s)
            .ok_or_else(|| ParseControlKeyError(s.to_string()))
    }
}

/// Snapshot of which control keys are currently held.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ControlKeys {
    held: u8,
}

impl ControlKeys {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot with exactly the given keys held.
    pub fn holding(keys: &[ControlKey]) -> Self {
        let mut out = Self::new();
        for key in keys {
            out.press(*key);
        }
        out
    }

    pub fn press(&mut self, key: ControlKey) {
        self.held |= key.bit();
    }

    pub fn release(&mut self, key: ControlKey) {
        self.held &= !key.bit();
    }

    /// Record a key transition from the window system.
    pub fn set(&mut self, key: ControlKey, pressed: bool) {
        if pressed {
            self.press(key);
        } else {
            self.release(key);
        }
    }

    pub fn is_held(&self, key: ControlKey) -> bool {
        self.held & key.bit() != 0
    }

    pub fn is_empty(&self) -> bool {
        self.held == 0
    }

    /// Whether any translation key is held.
    pub fn any_movement(&self) -> bool {
        [
            ControlKey::Forward,
            ControlKey::Backward,
            ControlKey::StrafeRight,
            ControlKey::StrafeLeft,
        ]
        .into_iter()
        .any(|k| self.is_held(k))
    }

    pub fn iter(&self) -> impl Iterator<Item = ControlKey> + '_ {
        ControlKey::ALL.into_iter().filter(|k| self.is_held(*k))
    }
}
