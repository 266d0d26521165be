//! Gesture to key dispatch
//!
//! A poll can report several motions at once, but only one key is tapped
//! per poll: the first binding (in config order) whose motion is set.

use anyhow::{anyhow, Result};
use evdev::Key;
use gesture_mapper_client::{GestureFlags, Motion};
use gesture_mapper_config::{resolve_key, GestureBinding};

/// What to do with one polled gesture code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Nothing was detected
    Idle,
    /// Tap `key` for the matched `motion`
    Tap { motion: Motion, key: Key },
    /// Motions were detected but none of them is bound
    Unbound(GestureFlags),
}

/// Resolved, ordered bindings
#[derive(Debug, Clone)]
pub struct Dispatcher {
    bindings: Vec<(Motion, Key)>,
}

impl Dispatcher {
    /// Resolve the configured bindings to evdev keys
    pub fn from_bindings(bindings: &[GestureBinding]) -> Result<Self> {
        let bindings = bindings
            .iter()
            .map(|b| {
                resolve_key(&b.key)
                    .map(|key| (b.motion, key))
                    .ok_or_else(|| anyhow!("Unknown key `{}` bound to {}", b.key, b.motion))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { bindings })
    }

    pub fn resolve(&self, flags: GestureFlags) -> Action {
        if flags.is_none() {
            return Action::Idle;
        }

        self.bindings
            .iter()
            .find(|(motion, _)| flags.contains(*motion))
            .map(|&(motion, key)| Action::Tap { motion, key })
            .unwrap_or(Action::Unbound(flags))
    }

    /// Keys any binding can emit
    pub fn keys(&self) -> impl Iterator<Item = Key> + '_ {
        self.bindings.iter().map(|(_, key)| *key)
    }

    pub fn binding_count(&self) -> usize {
        self.bindings.len()
    }
}
