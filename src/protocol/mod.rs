//! Single-byte operator command protocol
//!
//! | Byte        | Command                          |
//! |-------------|----------------------------------|
//! | `'1'`-`'9'` | digit x 10 kHz, default duty     |
//! | `'0'`       | 100 kHz, default duty            |
//! | `','`       | duty cycle down 1%               |
//! | `'.'`       | duty cycle up 1%                 |
//! | `' '`       | toggle duty between ceiling and fallback |
//!
//! Anything else is ignored.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// Frequency in units of the configured kHz step, 1..=10
    SelectFrequency(u8),
    DecreaseDuty,
    IncreaseDuty,
    ToggleDuty,
}

impl Command {
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            // Decade wrap: '0' sits after '9' on the keyboard row
            b'0' => Some(Command::SelectFrequency(10)),
            b'1'..=b'9' => Some(Command::SelectFrequency(byte - b'0')),
            b',' => Some(Command::DecreaseDuty),
            b'.' => Some(Command::IncreaseDuty),
            b' ' => Some(Command::ToggleDuty),
            _ => None,
        }
    }
}
