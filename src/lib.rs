//! # Overview
//!
//! `midly_wire` builds and decodes messages of the MIDI wire protocol, the byte-oriented format
//! spoken by instruments over 5-pin cables, USB and virtual ports.
//!
//! There are two halves to the crate:
//!
//! - [`Message`](struct.Message.html), an owned byte buffer holding exactly one wire message,
//!   with one builder method per message kind.
//! - [`MessageParser`](struct.MessageParser.html), a streaming decoder that accumulates raw
//!   bytes arriving in arbitrary chunks and hands every completed message to a category-specific
//!   callback.
//!
//! Both halves share a single grammar, so anything built by a `Message` is recognized by the
//! parser byte-for-byte:
//!
//! ```rust
//! use midly_wire::{Message, MessageParser};
//!
//! let mut note = Message::new();
//! note.note_on(60, 100, 1);
//!
//! let mut received = Vec::new();
//! {
//!     let mut parser = MessageParser::default();
//!     parser.bind_channel_voice(|msg| received.push(msg.to_vec()));
//!
//!     // Bytes may arrive split in any way
//!     parser.process_data(&note[..1]);
//!     parser.process_data(&note[1..]);
//! }
//! assert_eq!(received, vec![vec![0x91, 60, 100]]);
//! ```
//!
//! # Building messages
//!
//! Every builder replaces the previous contents of the message, clamping out-of-range arguments
//! instead of rejecting them:
//!
//! ```rust
//! use midly_wire::Message;
//!
//! let mut msg = Message::new();
//! msg.note_on(200, 200, 20);
//! assert_eq!(msg.as_slice(), &[0x9F, 127, 127]);
//!
//! msg.cc_volume(100, 0);
//! assert_eq!(msg.as_slice(), &[0xB0, 0x07, 100]);
//! ```
//!
//! The only builders that reject their input are the channel mode commands with exactly two legal
//! values (Omni and Mono/Poly), which leave the message empty.
//!
//! # Decoding streams
//!
//! The parser has eight callback slots: channel voice, control change, real time, system common,
//! system exclusive, MIDI time code, MIDI show control and a default slot.
//! Completed messages go to the first bound slot of their fallback chain, for example a Control
//! Change tries the control change slot, then the channel voice slot, then the default slot.
//!
//! Malformed input never stalls the stream: messages that overflow the parser buffer, SysEx dumps
//! interrupted by a new status byte and stray data bytes are silently discarded.
//! Running status is not supported, every message must carry its own status byte.
//!
//! Buffers passed to the callbacks are only valid for the duration of the call. Copy them if they
//! must outlive it.
//!
//! # Typed access
//!
//! The raw bytes of a message can be decoded into an [`Event`](enum.Event.html) for pattern
//! matching:
//!
//! ```rust
//! use midly_wire::{ChannelMessage, Event, Message};
//!
//! let mut msg = Message::new();
//! msg.program_change(12, 3);
//! match msg.event().unwrap() {
//!     Event::Channel { channel, message: ChannelMessage::ProgramChange { program } } => {
//!         assert_eq!(channel.as_int(), 3);
//!         assert_eq!(program.as_int(), 12);
//!     }
//!     _ => unreachable!(),
//! }
//! ```
//!
//! # About features
//!
//! - The `std` feature (enabled by default) implements `std::error::Error` for the error type.
//!   Disabling it makes the crate `no_std + alloc`.
//! - The `strict` feature makes typed decoding reject data bytes with the top bit set and channel
//!   mode values outside their legal set. The builders and the streaming parser are unaffected.

#![cfg_attr(not(any(test, feature = "std")), no_std)]

extern crate alloc;

macro_rules! bail {
    ($err:expr) => {{
        return Err($err.into());
    }};
}
macro_rules! ensure {
    ($cond:expr, $err:expr) => {{
        if !$cond {
            bail!($err)
        }
    }};
}

/// All of the errors this crate produces.
#[macro_use]
mod error;

mod prelude {
    pub(crate) use crate::{
        error::{ErrorKind, Result, ResultExt, StdResult},
        message::Message,
        primitive::{u14, u4, u7},
        protocol::Category,
    };
    pub(crate) use alloc::{boxed::Box, vec::Vec};
    pub(crate) use core::{fmt, ops};
}

mod callback;
mod event;
mod message;
pub mod mtc;
mod parser;
mod primitive;
pub mod processor;
pub mod protocol;

pub use crate::{
    callback::Callback,
    error::{Error, ErrorKind, Result},
    event::{ChannelMessage, Event, SystemCommon, SystemRealtime},
    message::{Message, PitchBendValue, MTC_ALL_CHANNELS},
    parser::{MessageParser, ParserStatus},
    protocol::Category,
};

/// Exotically-sized integers used by the MIDI standard.
pub mod num {
    pub use crate::primitive::{u14, u4, u7};
}
