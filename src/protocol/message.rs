//! # Message Types and Protocol Constants
//!
//! Core definitions for the broadcast link between controller, kite and
//! telemetry receiver. Every frame has the same fixed size regardless of
//! mode so that a receiver can reject foreign traffic by length alone.

/// Number of control channels carried in every frame
pub const NUM_CHANNELS: usize = 6;

/// Number of telemetry samples carried in every frame
pub const NUM_SAMPLES: usize = 23;

/// Fixed encoded frame size: mode word + 6 channels + 23 samples,
/// each 4 bytes wide, no padding
pub const FRAME_SIZE: usize = 4 + NUM_CHANNELS * 4 + NUM_SAMPLES * 4;

/// Out-of-band sentinel added to channel 0 of the first frame a
/// controller sends after power-on. A kite that sees a channel 0 value
/// at or above this threshold re-seeds its calibration offsets.
pub const CALIBRATION_SENTINEL: u32 = 1_000_000;

/// Mode word on the wire: Control = 0, Data = 1
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageMode {
    /// Pilot input channel values, controller to kite
    Control,
    /// Telemetry sample values, kite to telemetry receiver
    Data,
}

impl MessageMode {
    /// Decode the wire representation of the mode word.
    ///
    /// Returns `None` for any value other than 0 or 1; callers discard
    /// such frames without interpreting the payload.
    #[must_use]
    pub fn from_wire(raw: u32) -> Option<Self> {
        match raw {
            0 => Some(MessageMode::Control),
            1 => Some(MessageMode::Data),
            _ => None,
        }
    }

    /// Wire representation of the mode word
    #[must_use]
    pub fn to_wire(self) -> u32 {
        match self {
            MessageMode::Control => 0,
            MessageMode::Data => 1,
        }
    }
}

/// A single wire frame.
///
/// Both halves of the payload are always present; the mode selects which
/// half is meaningful. Control frames carry zero-filled samples and Data
/// frames carry zero-filled channels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Message {
    /// Payload interpretation selector
    pub mode: MessageMode,
    /// Raw potentiometer/switch readings (Control mode)
    pub channels: [u32; NUM_CHANNELS],
    /// Sampled flight telemetry (Data mode)
    pub samples: [f32; NUM_SAMPLES],
}

impl Message {
    /// Build a Control frame from raw channel readings.
    ///
    /// # Examples
    ///
    /// ```
    /// use kite_link::protocol::message::{Message, MessageMode};
    ///
    /// let msg = Message::control([2048; 6]);
    /// assert_eq!(msg.mode, MessageMode::Control);
    /// assert!(msg.samples.iter().all(|&s| s == 0.0));
    /// ```
    #[must_use]
    pub fn control(channels: [u32; NUM_CHANNELS]) -> Self {
        Self {
            mode: MessageMode::Control,
            channels,
            samples: [0.0; NUM_SAMPLES],
        }
    }

    /// Build a Data frame from a telemetry sample set.
    ///
    /// # Examples
    ///
    /// ```
    /// use kite_link::protocol::message::{Message, MessageMode};
    ///
    /// let msg = Message::data([1.5; 23]);
    /// assert_eq!(msg.mode, MessageMode::Data);
    /// assert!(msg.channels.iter().all(|&c| c == 0));
    /// ```
    #[must_use]
    pub fn data(samples: [f32; NUM_SAMPLES]) -> Self {
        Self {
            mode: MessageMode::Data,
            channels: [0; NUM_CHANNELS],
            samples,
        }
    }
}
