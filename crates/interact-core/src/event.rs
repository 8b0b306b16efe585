#![forbid(unsafe_code)]

//! Pointer and drag event types.
//!
//! # Design Notes
//!
//! - `Modifiers` use bitflags so hosts can pass the raw key state through.
//! - Cancelable events carry an explicit `default_prevented` flag; the host
//!   reads it back after dispatch and calls the platform `preventDefault`.
//! - Effect names use the platform spelling (`copyMove`, `linkMove`, ...).

use std::fmt;
use std::str::FromStr;

use bitflags::bitflags;
use interact_dom::NodeId;

bitflags! {
    /// Modifier keys held during a pointer event.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Modifiers: u8 {
        /// No modifiers.
        const NONE  = 0b0000;
        /// Shift key.
        const SHIFT = 0b0001;
        /// Alt/Option key.
        const ALT   = 0b0010;
        /// Control key.
        const CTRL  = 0b0100;
        /// Super/Meta/Command key.
        const SUPER = 0b1000;
    }
}

impl Default for Modifiers {
    fn default() -> Self {
        Self::NONE
    }
}

/// A primary-button pointer-down delivered to the container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointerDown {
    /// Innermost node under the pointer.
    pub target: NodeId,
    /// Modifier keys held.
    pub modifiers: Modifiers,
    default_prevented: bool,
}

impl PointerDown {
    /// A pointer-down with no modifiers.
    #[must_use]
    pub const fn new(target: NodeId) -> Self {
        Self {
            target,
            modifiers: Modifiers::NONE,
            default_prevented: false,
        }
    }

    /// Set the held modifiers.
    #[must_use]
    pub const fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Mark the event as already handled by an earlier listener.
    #[must_use]
    pub const fn prevented(mut self) -> Self {
        self.default_prevented = true;
        self
    }

    /// Suppress the platform default for this event.
    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    /// Whether some listener suppressed the platform default.
    #[must_use]
    pub const fn is_default_prevented(&self) -> bool {
        self.default_prevented
    }
}

/// Outcome of a drag as negotiated by the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum DropEffect {
    /// Nothing was dropped.
    #[default]
    None,
    /// The target received a copy.
    Copy,
    /// The target took the data; the source should remove it.
    Move,
    /// The target received a link.
    Link,
}

impl DropEffect {
    /// Platform spelling.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Copy => "copy",
            Self::Move => "move",
            Self::Link => "link",
        }
    }
}

impl fmt::Display for DropEffect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unrecognized effect name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown drag effect {0:?}")]
pub struct UnknownEffect(pub String);

impl FromStr for DropEffect {
    type Err = UnknownEffect;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(Self::None),
            "copy" => Ok(Self::Copy),
            "move" => Ok(Self::Move),
            "link" => Ok(Self::Link),
            other => Err(UnknownEffect(other.to_owned())),
        }
    }
}

/// Effects the drag source permits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub enum EffectAllowed {
    None,
    Copy,
    Move,
    Link,
    CopyMove,
    LinkMove,
    CopyLink,
    All,
    #[default]
    Uninitialized,
}

impl EffectAllowed {
    /// Platform spelling.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Copy => "copy",
            Self::Move => "move",
            Self::Link => "link",
            Self::CopyMove => "copyMove",
            Self::LinkMove => "linkMove",
            Self::CopyLink => "copyLink",
            Self::All => "all",
            Self::Uninitialized => "uninitialized",
        }
    }

    /// Combine a set of effects into the matching allowance.
    ///
    /// `DropEffect::None` entries are ignored; an empty set is `None`.
    #[must_use]
    pub fn from_effects(effects: &[DropEffect]) -> Self {
        let has = |effect| effects.contains(&effect);
        match (
            has(DropEffect::Copy),
            has(DropEffect::Move),
            has(DropEffect::Link),
        ) {
            (false, false, false) => Self::None,
            (true, false, false) => Self::Copy,
            (false, true, false) => Self::Move,
            (false, false, true) => Self::Link,
            (true, true, false) => Self::CopyMove,
            (false, true, true) => Self::LinkMove,
            (true, false, true) => Self::CopyLink,
            (true, true, true) => Self::All,
        }
    }

    /// Whether a drop with `effect` is permitted.
    #[must_use]
    pub const fn allows(self, effect: DropEffect) -> bool {
        match effect {
            DropEffect::None => true,
            DropEffect::Copy => matches!(
                self,
                Self::Copy | Self::CopyMove | Self::CopyLink | Self::All | Self::Uninitialized
            ),
            DropEffect::Move => matches!(
                self,
                Self::Move | Self::CopyMove | Self::LinkMove | Self::All | Self::Uninitialized
            ),
            DropEffect::Link => matches!(
                self,
                Self::Link | Self::LinkMove | Self::CopyLink | Self::All | Self::Uninitialized
            ),
        }
    }
}

impl fmt::Display for EffectAllowed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EffectAllowed {
    type Err = UnknownEffect;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(Self::None),
            "copy" => Ok(Self::Copy),
            "move" => Ok(Self::Move),
            "link" => Ok(Self::Link),
            "copyMove" => Ok(Self::CopyMove),
            "linkMove" => Ok(Self::LinkMove),
            "copyLink" => Ok(Self::CopyLink),
            "all" => Ok(Self::All),
            "uninitialized" => Ok(Self::Uninitialized),
            other => Err(UnknownEffect(other.to_owned())),
        }
    }
}
