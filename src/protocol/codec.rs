//! # Frame Codec
//!
//! Serializes messages to the fixed 120-byte wire frame and back.
//!
//! Field order is mode word, then the 6 channel values, then the 23
//! sample values, all little-endian with no padding. The layout is
//! declared here explicitly rather than derived from the in-memory
//! struct, so the wire format is stable across builds and platforms.

use bytes::{Buf, BufMut};

use super::message::{Message, MessageMode, FRAME_SIZE, NUM_CHANNELS, NUM_SAMPLES};
use crate::error::{KiteLinkError, Result};

/// Encode a message into a complete wire frame.
///
/// # Arguments
///
/// * `msg` - Message to encode
///
/// # Returns
///
/// * `Vec<u8>` - Exactly [`FRAME_SIZE`] bytes, the exact inverse of [`decode`]
///
/// # Examples
///
/// ```
/// use kite_link::protocol::codec::encode;
/// use kite_link::protocol::message::{Message, FRAME_SIZE};
///
/// let frame = encode(&Message::control([0; 6]));
/// assert_eq!(frame.len(), FRAME_SIZE);
/// ```
#[must_use]
pub fn encode(msg: &Message) -> Vec<u8> {
    let mut frame = Vec::with_capacity(FRAME_SIZE);

    frame.put_u32_le(msg.mode.to_wire());
    for &channel in &msg.channels {
        frame.put_u32_le(channel);
    }
    for &sample in &msg.samples {
        frame.put_f32_le(sample);
    }

    debug_assert_eq!(frame.len(), FRAME_SIZE);
    frame
}

/// Decode a wire frame into a message.
///
/// The length is validated before any payload field is read; a truncated
/// or oversized buffer is never partially decoded.
///
/// # Arguments
///
/// * `bytes` - Received frame
///
/// # Returns
///
/// * `Result<Message>` - Decoded message, bit-identical to the encoder input
///
/// # Errors
///
/// Returns [`KiteLinkError::MalformedLength`] if `bytes.len()` differs from
/// [`FRAME_SIZE`], and [`KiteLinkError::UnknownMode`] if the mode word is
/// neither Control nor Data. Callers treat both as silent discards.
pub fn decode(bytes: &[u8]) -> Result<Message> {
    if bytes.len() != FRAME_SIZE {
        return Err(KiteLinkError::MalformedLength {
            expected: FRAME_SIZE,
            actual: bytes.len(),
        });
    }

    let mut buf = bytes;

    let mode_raw = buf.get_u32_le();
    let mode = MessageMode::from_wire(mode_raw).ok_or(KiteLinkError::UnknownMode(mode_raw))?;

    let mut channels = [0u32; NUM_CHANNELS];
    for channel in &mut channels {
        *channel = buf.get_u32_le();
    }

    let mut samples = [0f32; NUM_SAMPLES];
    for sample in &mut samples {
        *sample = buf.get_f32_le();
    }

    Ok(Message {
        mode,
        channels,
        samples,
    })
}
