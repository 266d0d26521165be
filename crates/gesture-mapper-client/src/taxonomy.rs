//! Higher-level gesture taxonomy
//!
//! These are the single-gesture meanings the recognizer documents, numbered
//! 0-12. A poll never returns them: it returns a [`GestureFlags`] bitmask,
//! and there is no defined mapping between the two. The enum is kept for
//! display and for tools that talk about gestures by name.
//!
//! [`GestureFlags`]: crate::GestureFlags

use std::fmt;

/// Documented gesture meanings, numbered as the recognizer numbers them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Gesture {
    None = 0,
    Clockwise = 1,
    CounterClockwise = 2,
    Up = 3,
    Down = 4,
    Left = 5,
    Right = 6,
    Forward = 7,
    Backward = 8,
    UpLeft = 9,
    UpRight = 10,
    DownLeft = 11,
    DownRight = 12,
}

impl Gesture {
    pub const ALL: [Gesture; 13] = [
        Gesture::None,
        Gesture::Clockwise,
        Gesture::CounterClockwise,
        Gesture::Up,
        Gesture::Down,
        Gesture::Left,
        Gesture::Right,
        Gesture::Forward,
        Gesture::Backward,
        Gesture::UpLeft,
        Gesture::UpRight,
        Gesture::DownLeft,
        Gesture::DownRight,
    ];

    pub fn number(self) -> u8 {
        self as u8
    }

    pub fn name(self) -> &'static str {
        match self {
            Gesture::None => "none",
            Gesture::Clockwise => "clockwise",
            Gesture::CounterClockwise => "counterclockwise",
            Gesture::Up => "up",
            Gesture::Down => "down",
            Gesture::Left => "left",
            Gesture::Right => "right",
            Gesture::Forward => "forward",
            Gesture::Backward => "backward",
            Gesture::UpLeft => "up_left",
            Gesture::UpRight => "up_right",
            Gesture::DownLeft => "down_left",
            Gesture::DownRight => "down_right",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Gesture::None => "no gesture recognized",
            Gesture::Clockwise => "clockwise twisting motion",
            Gesture::CounterClockwise => "counterclockwise twisting motion",
            Gesture::Up => "upward swiping motion",
            Gesture::Down => "downward swiping motion",
            Gesture::Left => "left swiping motion",
            Gesture::Right => "right swiping motion",
            Gesture::Forward => "pushing motion",
            Gesture::Backward => "pulling motion",
            Gesture::UpLeft => "upward and leftward diagonal motion",
            Gesture::UpRight => "upward and rightward diagonal motion",
            Gesture::DownLeft => "downward and leftward diagonal motion",
            Gesture::DownRight => "downward and rightward diagonal motion",
        }
    }
}

impl TryFrom<u8> for Gesture {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Gesture::ALL.get(value as usize).copied().ok_or(value)
    }
}

impl fmt::Display for Gesture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numbers_are_dense() {
        for (index, gesture) in Gesture::ALL.iter().enumerate() {
            assert_eq!(gesture.number() as usize, index);
            assert_eq!(Gesture::try_from(index as u8), Ok(*gesture));
        }
    }

    #[test]
    fn test_out_of_range_rejected() {
        assert_eq!(Gesture::try_from(13), Err(13));
        assert_eq!(Gesture::try_from(255), Err(255));
    }

    #[test]
    fn test_names() {
        assert_eq!(Gesture::DownRight.to_string(), "down_right");
        assert_eq!(Gesture::None.name(), "none");
    }
}
