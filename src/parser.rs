//! Streaming decoder for raw MIDI byte streams.

use crate::{callback::Callback, error::Error, prelude::*, protocol::status};

/// The capacity of a parser built through `Default`, enough for the longest non-SysEx message.
pub const DEFAULT_CAPACITY: usize = 3;

/// The state of a [`MessageParser`](struct.MessageParser.html) between two bytes.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Hash)]
pub enum ParserStatus {
    /// Waiting for a status byte. Data bytes are ignored.
    Idle,
    /// Accumulating a message started by any status byte other than `0xF0`.
    Processing,
    /// Accumulating a System Exclusive dump, until a `0xF7` arrives.
    ProcessingSysEx,
}

/// The eight callback slots, one per message category plus a catch-all.
#[derive(Default, Debug)]
struct Slots<'a> {
    channel_voice: Callback<'a, Message>,
    control_change: Callback<'a, Message>,
    real_time: Callback<'a, Message>,
    system_common: Callback<'a, Message>,
    sys_ex: Callback<'a, Message>,
    mtc: Callback<'a, Message>,
    msc: Callback<'a, Message>,
    default: Callback<'a, Message>,
}
impl<'a> Slots<'a> {
    /// Hand the message to the first bound slot in the fallback chain of its category.
    ///
    /// Returns `false` if no slot in the chain is bound.
    fn dispatch(&mut self, category: Category, msg: &Message) -> bool {
        match category {
            Category::ControlChange => {
                self.control_change.invoke(msg)
                    || self.channel_voice.invoke(msg)
                    || self.default.invoke(msg)
            }
            Category::ChannelVoice => self.channel_voice.invoke(msg) || self.default.invoke(msg),
            Category::RealTime => self.real_time.invoke(msg) || self.default.invoke(msg),
            Category::MtcQuarterFrame => {
                self.mtc.invoke(msg) || self.system_common.invoke(msg) || self.default.invoke(msg)
            }
            Category::SystemCommon => self.system_common.invoke(msg) || self.default.invoke(msg),
            Category::SystemExclusive => self.sys_ex.invoke(msg) || self.default.invoke(msg),
        }
    }
}

/// A streaming MIDI parser, taking raw undelimited bytes as they arrive from a port and
/// handing every completed message to a callback.
///
/// Bytes can be fed in chunks of any size through
/// [`process_data`](#method.process_data): feeding a stream in many small pieces produces the
/// same callbacks as feeding it whole.
///
/// # Callbacks
///
/// Each completed message is handed to the first bound slot in the fallback chain of its
/// category:
///
/// | Message | Fallback chain |
/// |---|---|
/// | Control Change | control change, channel voice, default |
/// | Other channel voice | channel voice, default |
/// | System Realtime | real time, default |
/// | MTC Quarter Frame | mtc, system common, default |
/// | Other System Common | system common, default |
/// | System Exclusive | sys ex, default |
///
/// Messages with no bound slot in their chain are dropped.
/// The MSC (MIDI Show Control) slot is reserved and never invoked.
///
/// The message handed to a callback is overwritten as soon as the callback returns. Copy it if it
/// must be kept.
///
/// # Buffer capacity
///
/// Messages longer than the parser capacity are dropped. The default capacity of 3 bytes fits
/// every channel voice and system common message, but only the shortest SysEx dumps.
///
/// # Malformed input
///
/// The parser never fails. A SysEx dump interrupted by any status byte other than `0xF7` is
/// dropped together with the interrupting byte, and data bytes arriving while idle are ignored.
/// A new status byte abandons any incomplete message, including System Realtime bytes arriving
/// in the middle of a message. Status bytes that start no message (`0xF4`, `0xF5`, `0xF9`,
/// `0xFD` and a `0xF7` outside of SysEx) are dropped and leave the parser idle.
/// Running status is not supported.
///
/// ```rust
/// use midly_wire::{Message, MessageParser};
///
/// let mut notes = 0;
/// let mut clocks = 0;
/// {
///     let mut parser = MessageParser::new(16);
///     parser.bind_channel_voice(|_msg| notes += 1);
///     parser.bind_real_time(|_msg| clocks += 1);
///     parser.process_data(&[0x90, 60, 100, 0xF8, 0xF8, 0x80, 60]);
///     parser.process_data(&[0, 0xF8]);
/// }
/// assert_eq!((notes, clocks), (2, 3));
/// ```
#[derive(Debug)]
pub struct MessageParser<'a> {
    status: ParserStatus,
    /// The accumulated bytes of the message in flight.
    ///
    /// Its allocation always holds at least `capacity` bytes.
    message: Message,
    capacity: usize,
    slots: Slots<'a>,
}

macro_rules! slot_methods {
    ($(
        $(#[$attr:meta])*
        $slot:ident => $bind:ident, $unbind:ident;
    )*) => {$(
        $(#[$attr])*
        ///
        /// Replaces the handler previously bound to this slot, if any.
        #[inline]
        pub fn $bind<F>(&mut self, handler: F)
        where
            F: FnMut(&Message) + 'a,
        {
            self.slots.$slot.bind(handler);
        }

        #[inline]
        pub fn $unbind(&mut self) {
            self.slots.$slot.unbind();
        }
    )*};
}

impl<'a> MessageParser<'a> {
    /// Create an idle parser able to hold messages of up to `capacity` bytes.
    pub fn new(capacity: usize) -> MessageParser<'a> {
        MessageParser {
            status: ParserStatus::Idle,
            message: Message::with_capacity(capacity),
            capacity,
            slots: Slots::default(),
        }
    }

    /// The maximum length of a message this parser can accumulate.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Change the maximum message length.
    ///
    /// The message in flight is kept, truncated to the new capacity if it does not fit anymore.
    /// # Errors
    ///
    /// Fails with `ErrorKind::Invalid` if the larger buffer cannot be allocated, in which case the
    /// parser is left untouched. This is a resource failure, not a problem with the MIDI data.
    pub fn resize_buffer(&mut self, capacity: usize) -> Result<()> {
        let raw = self.message.raw_mut();
        if capacity > raw.capacity() {
            let additional = capacity - raw.len();
            if raw.try_reserve_exact(additional).is_err() {
                tracing::debug!(capacity, "failed to grow parser buffer");
                bail!(Error::new(err_invalid!("failed to allocate parser buffer")));
            }
        } else {
            raw.truncate(capacity);
            raw.shrink_to(capacity);
        }
        tracing::trace!(from = self.capacity, to = capacity, "resized parser buffer");
        self.capacity = capacity;
        Ok(())
    }

    #[inline]
    pub fn status(&self) -> ParserStatus {
        self.status
    }

    /// The bytes accumulated so far for the incomplete message in flight.
    #[inline]
    pub fn pending(&self) -> &[u8] {
        self.message.as_slice()
    }

    /// Drop any incomplete message and go back to idle. Bound callbacks are kept.
    #[inline]
    pub fn reset(&mut self) {
        self.status = ParserStatus::Idle;
        self.message.clear();
    }

    /// Feed a chunk of raw bytes, invoking the bound callbacks for every message completed
    /// within it, in order.
    pub fn process_data(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            if let Some(category) = self.feed_byte(byte) {
                if !self.slots.dispatch(category, &self.message) {
                    tracing::trace!(?category, "no callback bound for message");
                }
                self.reset();
            }
        }
    }

    /// Feed a chunk of raw bytes, calling `handle_msg` for every message completed within it
    /// instead of the bound callbacks.
    ///
    /// ```rust
    /// use midly_wire::{Category, MessageParser};
    ///
    /// let mut parser = MessageParser::default();
    /// let mut seen = Vec::new();
    /// parser.feed(&[0xB0, 7, 100, 0xFC], |category, msg| seen.push((category, msg.len())));
    /// assert_eq!(seen, [(Category::ControlChange, 3), (Category::RealTime, 1)]);
    /// ```
    pub fn feed(&mut self, bytes: &[u8], mut handle_msg: impl FnMut(Category, &Message)) {
        for &byte in bytes {
            if let Some(category) = self.feed_byte(byte) {
                handle_msg(category, &self.message);
                self.reset();
            }
        }
    }

    /// Advance the state machine by one byte.
    ///
    /// Returns the category of the message if it is now complete, in which case it is left in
    /// `self.message` for the caller to dispatch and reset.
    fn feed_byte(&mut self, byte: u8) -> Option<Category> {
        if status::is_status(byte) {
            match (self.status, byte) {
                (ParserStatus::ProcessingSysEx, status::SYSEX_END) => {}
                (ParserStatus::ProcessingSysEx, _) => {
                    tracing::debug!(
                        len = self.message.len(),
                        status = byte,
                        "system exclusive interrupted by status byte"
                    );
                    self.reset();
                    return None;
                }
                (_, status::SYSEX_START) => {
                    self.status = ParserStatus::ProcessingSysEx;
                    self.message.clear();
                }
                _ => {
                    if !self.message.is_empty() {
                        tracing::trace!(len = self.message.len(), "incomplete message abandoned");
                    }
                    if Category::classify_status(byte).is_none() {
                        tracing::trace!(status = byte, "undefined status byte");
                        self.reset();
                        return None;
                    }
                    self.status = ParserStatus::Processing;
                    self.message.clear();
                }
            }
        } else if self.status == ParserStatus::Idle {
            tracing::trace!(byte, "stray data byte");
            return None;
        }

        let raw = self.message.raw_mut();
        if raw.len() >= self.capacity {
            tracing::debug!(capacity = self.capacity, "message overflowed parser buffer");
            self.reset();
            return None;
        }
        raw.push(byte);

        match self.status {
            ParserStatus::Processing => {
                let (category, len) = Category::classify_status(raw[0])?;
                if raw.len() == len {
                    Some(category)
                } else {
                    None
                }
            }
            ParserStatus::ProcessingSysEx if byte == status::SYSEX_END => {
                Some(Category::SystemExclusive)
            }
            _ => None,
        }
    }

    slot_methods! {
        /// Bind the handler for Note On/Off, AfterTouch, Program Change, Channel Pressure and
        /// Pitch Bend messages.
        /// Also receives Control Change messages if the control change slot is unbound.
        channel_voice => bind_channel_voice, unbind_channel_voice;
        /// Bind the handler for Control Change messages, including channel mode messages.
        control_change => bind_control_change, unbind_control_change;
        /// Bind the handler for single-byte System Realtime messages.
        real_time => bind_real_time, unbind_real_time;
        /// Bind the handler for Song Position Pointer, Song Select and Tuning Request messages.
        /// Also receives MTC Quarter Frame messages if the mtc slot is unbound.
        system_common => bind_system_common, unbind_system_common;
        /// Bind the handler for complete System Exclusive dumps, framing bytes included.
        sys_ex => bind_sys_ex, unbind_sys_ex;
        /// Bind the handler for MTC Quarter Frame messages.
        mtc => bind_mtc, unbind_mtc;
        /// Bind the handler for MIDI Show Control messages.
        ///
        /// This slot is reserved: no message is currently routed to it.
        msc => bind_msc, unbind_msc;
        /// Bind the catch-all handler, receiving any message whose more specific slots are all
        /// unbound.
        default => bind_default, unbind_default;
    }

    /// Unbind every callback slot.
    pub fn unbind_all(&mut self) {
        self.slots = Slots::default();
    }
}
impl<'a> Default for MessageParser<'a> {
    #[inline]
    fn default() -> MessageParser<'a> {
        MessageParser::new(DEFAULT_CAPACITY)
    }
}
