//! Decoding of the gesture bitmask returned by a poll
//!
//! Each bit flags one motion primitive independently, so a single poll can
//! report several motions at once (e.g. a clockwise twist during a down
//! swipe reads as `0x50`).

use std::fmt;
use std::ops::BitOr;
use std::str::FromStr;

use thiserror::Error;

/// A single motion primitive the recognizer can flag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Motion {
    /// Pulling motion
    Backward,
    /// Pushing motion
    Forward,
    /// Right swipe
    Right,
    /// Left swipe
    Left,
    /// Down swipe
    Down,
    /// Up swipe
    Up,
    /// Clockwise twist
    Clockwise,
    /// Counterclockwise twist
    CounterClockwise,
}

impl Motion {
    /// All motions in bit order (bit 0 first)
    pub const ALL: [Motion; 8] = [
        Motion::Backward,
        Motion::Forward,
        Motion::Right,
        Motion::Left,
        Motion::Down,
        Motion::Up,
        Motion::Clockwise,
        Motion::CounterClockwise,
    ];

    /// Bit mask of this motion in the gesture code
    pub const fn mask(self) -> u8 {
        match self {
            Motion::Backward => 0x01,
            Motion::Forward => 0x02,
            Motion::Right => 0x04,
            Motion::Left => 0x08,
            Motion::Down => 0x10,
            Motion::Up => 0x20,
            Motion::Clockwise => 0x40,
            Motion::CounterClockwise => 0x80,
        }
    }

    /// Canonical lowercase name, as used in configuration files
    pub const fn name(self) -> &'static str {
        match self {
            Motion::Backward => "backward",
            Motion::Forward => "forward",
            Motion::Right => "right",
            Motion::Left => "left",
            Motion::Down => "down",
            Motion::Up => "up",
            Motion::Clockwise => "clockwise",
            Motion::CounterClockwise => "counterclockwise",
        }
    }
}

impl fmt::Display for Motion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Returned when a motion name is not recognized
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown motion: {0}")]
pub struct ParseMotionError(pub String);

impl FromStr for Motion {
    type Err = ParseMotionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace(['-', '_'], "").as_str() {
            "backward" | "pull" => Ok(Motion::Backward),
            "forward" | "push" => Ok(Motion::Forward),
            "right" => Ok(Motion::Right),
            "left" => Ok(Motion::Left),
            "down" => Ok(Motion::Down),
            "up" => Ok(Motion::Up),
            "clockwise" | "cw" => Ok(Motion::Clockwise),
            "counterclockwise" | "anticlockwise" | "ccw" => Ok(Motion::CounterClockwise),
            _ => Err(ParseMotionError(s.to_string())),
        }
    }
}

/// Gesture bitmask reported by one poll of the recognition service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct GestureFlags(u8);

impl GestureFlags {
    /// No gesture detected
    pub const NONE: GestureFlags = GestureFlags(0);

    pub const fn from_bits(bits: u8) -> Self {
        GestureFlags(bits)
    }

    pub const fn bits(self) -> u8 {
        self.0
    }

    /// True when no motion was detected
    pub const fn is_none(self) -> bool {
        self.0 == 0
    }

    /// True when `motion`'s bit is set
    pub const fn contains(self, motion: Motion) -> bool {
        self.0 & motion.mask() != 0
    }

    pub const fn is_backward(self) -> bool {
        self.contains(Motion::Backward)
    }

    pub const fn is_forward(self) -> bool {
        self.contains(Motion::Forward)
    }

    pub const fn is_right(self) -> bool {
        self.contains(Motion::Right)
    }

    pub const fn is_left(self) -> bool {
        self.contains(Motion::Left)
    }

    pub const fn is_down(self) -> bool {
        self.contains(Motion::Down)
    }

    pub const fn is_up(self) -> bool {
        self.contains(Motion::Up)
    }

    pub const fn is_clockwise(self) -> bool {
        self.contains(Motion::Clockwise)
    }

    pub const fn is_counter_clockwise(self) -> bool {
        self.contains(Motion::CounterClockwise)
    }

    /// Iterate over the detected motions in bit order
    pub fn motions(self) -> impl Iterator<Item = Motion> {
        Motion::ALL.into_iter().filter(move |m| self.contains(*m))
    }
}

impl From<u8> for GestureFlags {
    fn from(bits: u8) -> Self {
        GestureFlags(bits)
    }
}

impl From<Motion> for GestureFlags {
    fn from(motion: Motion) -> Self {
        GestureFlags(motion.mask())
    }
}

impl FromIterator<Motion> for GestureFlags {
    fn from_iter<I: IntoIterator<Item = Motion>>(iter: I) -> Self {
        iter.into_iter()
            .fold(GestureFlags::NONE, |acc, motion| acc | motion)
    }
}

impl BitOr for GestureFlags {
    type Output = GestureFlags;

    fn bitor(self, rhs: GestureFlags) -> GestureFlags {
        GestureFlags(self.0 | rhs.0)
    }
}

impl BitOr<Motion> for GestureFlags {
    type Output = GestureFlags;

    fn bitor(self, rhs: Motion) -> GestureFlags {
        GestureFlags(self.0 | rhs.mask())
    }
}

impl fmt::Display for GestureFlags {
    /// `none`, or the detected motions joined with `+` (e.g. `0x50` is `down+clockwise`)
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_none() {
            return f.write_str("none");
        }
        let names: Vec<&str> = self.motions().map(Motion::name).collect();
        f.write_str(&names.join("+"))
    }
}

impl fmt::LowerHex for GestureFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::LowerHex::fmt(&self.0, f)
    }
}
