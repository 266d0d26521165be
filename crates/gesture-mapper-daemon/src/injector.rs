//! Virtual keyboard injection via uinput
//!
//! The daemon creates one virtual keyboard that can emit exactly the keys
//! the configured bindings use, and taps a key for each matched gesture.

use anyhow::{Context, Result};
use evdev::{uinput::VirtualDeviceBuilder, AttributeSet, EventType, InputEvent, Key};

use crate::poller::KeySink;

/// A virtual keyboard for injecting key taps
pub struct VirtualKeyboard {
    device: evdev::uinput::VirtualDevice,
}

impl VirtualKeyboard {
    /// Create a virtual keyboard named `name` able to emit `keys`
    ///
    /// # Errors
    ///
    /// Returns an error if the device cannot be created (e.g., insufficient
    /// permissions to access /dev/uinput).
    pub fn new(name: &str, keys: impl IntoIterator<Item = Key>) -> Result<Self> {
        let mut supported = AttributeSet::<Key>::new();
        for key in keys {
            supported.insert(key);
        }

        let device = VirtualDeviceBuilder::new()
            .context("Failed to open /dev/uinput")?
            .name(name)
            .with_keys(&supported)?
            .build()
            .context("Failed to create virtual keyboard")?;

        Ok(Self { device })
    }

    fn emit_key(&mut self, key: Key, value: i32) -> Result<()> {
        let event = InputEvent::new(EventType::KEY, key.code(), value);
        let syn = InputEvent::new(EventType::SYNCHRONIZATION, 0, 0);
        self.device.emit(&[event, syn])?;
        Ok(())
    }
}

impl KeySink for VirtualKeyboard {
    fn tap(&mut self, key: Key) -> Result<()> {
        self.emit_key(key, 1)?;
        self.emit_key(key, 0)
    }
}
