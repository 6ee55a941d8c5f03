//! An owned buffer holding a single MIDI wire message, with one builder per message kind.

use crate::{
    event::Event,
    mtc::{FrameRate, TimeComponent},
    prelude::*,
    protocol::{status, sysex, ChannelMode, Controller, LocalControl},
};

/// The SysEx channel addressing every device, the usual target of MTC Full Frame messages.
pub const MTC_ALL_CHANNELS: u8 = sysex::ALL_CHANNELS;

/// A single MIDI message, stored as its raw wire bytes.
///
/// Every builder method replaces the previous contents of the message and returns `&mut Self`
/// so that calls can be chained into a send:
///
/// ```rust
/// use midly_wire::Message;
///
/// let mut out = Vec::new();
/// let mut msg = Message::new();
/// out.extend_from_slice(msg.cc_bank_select(2, 0));
/// out.extend_from_slice(msg.program_change(7, 0));
/// assert_eq!(out, [0xB0, 0x00, 2, 0xC0, 7]);
/// ```
///
/// Arguments are clamped into their legal range rather than rejected: channels saturate at 15
/// and 7-bit values saturate at 127. The allocation is reused across builder calls.
#[derive(Clone, Default, PartialEq, Eq, Hash, Debug)]
pub struct Message {
    bytes: Vec<u8>,
}

/// Clamp a channel number into a status nibble.
#[inline]
fn ch(channel: u8) -> u8 {
    u4::saturating(channel).as_int()
}

/// Clamp a value into a data byte.
#[inline]
fn data(value: u8) -> u8 {
    u7::saturating(value).as_int()
}

impl Message {
    /// Create an empty message.
    #[inline]
    pub fn new() -> Message {
        Message { bytes: Vec::new() }
    }

    /// Create an empty message with room for `capacity` bytes before reallocating.
    #[inline]
    pub fn with_capacity(capacity: usize) -> Message {
        Message {
            bytes: Vec::with_capacity(capacity),
        }
    }

    #[inline]
    fn set(&mut self, raw: &[u8]) -> &mut Message {
        self.bytes.clear();
        self.bytes.extend_from_slice(raw);
        self
    }

    /// Note Off: `0x80 | channel, pitch, velocity`.
    pub fn note_off(&mut self, pitch: u8, velocity: u8, channel: u8) -> &mut Message {
        self.set(&[status::NOTE_OFF | ch(channel), data(pitch), data(velocity)])
    }

    /// Note On: `0x90 | channel, pitch, velocity`.
    pub fn note_on(&mut self, pitch: u8, velocity: u8, channel: u8) -> &mut Message {
        self.set(&[status::NOTE_ON | ch(channel), data(pitch), data(velocity)])
    }

    /// Polyphonic key pressure: `0xA0 | channel, pitch, pressure`.
    pub fn after_touch(&mut self, pitch: u8, pressure: u8, channel: u8) -> &mut Message {
        self.set(&[status::AFTER_TOUCH | ch(channel), data(pitch), data(pressure)])
    }

    /// Control Change: `0xB0 | channel, controller, value`.
    pub fn control_change(&mut self, controller: u8, value: u8, channel: u8) -> &mut Message {
        self.set(&[
            status::CONTROL_CHANGE | ch(channel),
            data(controller),
            data(value),
        ])
    }

    /// Program Change: `0xC0 | channel, program`.
    pub fn program_change(&mut self, program: u8, channel: u8) -> &mut Message {
        self.set(&[status::PROGRAM_CHANGE | ch(channel), data(program)])
    }

    /// Channel pressure: `0xD0 | channel, pressure`.
    pub fn channel_pressure(&mut self, pressure: u8, channel: u8) -> &mut Message {
        self.set(&[status::CHANNEL_PRESSURE | ch(channel), data(pressure)])
    }

    /// Pitch Bend: `0xE0 | channel, lsb, msb`.
    ///
    /// The interpretation of `value` depends on its type, see
    /// [`PitchBendValue`](trait.PitchBendValue.html).
    ///
    /// ```rust
    /// use midly_wire::Message;
    ///
    /// let mut msg = Message::new();
    /// assert_eq!(msg.pitch_bend(0i16, 0).as_slice(), &[0xE0, 0x00, 0x40]);
    /// assert_eq!(msg.pitch_bend(-8192i16, 0).as_slice(), &[0xE0, 0x00, 0x00]);
    /// assert_eq!(msg.pitch_bend(0x3FFFu16, 0).as_slice(), &[0xE0, 0x7F, 0x7F]);
    /// ```
    pub fn pitch_bend<V: PitchBendValue>(&mut self, value: V, channel: u8) -> &mut Message {
        let [lsb, msb] = value.to_bend().split();
        self.set(&[
            status::PITCH_BEND | ch(channel),
            lsb.as_int(),
            msb.as_int(),
        ])
    }

    fn cc(&mut self, controller: Controller, value: u8, channel: u8) -> &mut Message {
        self.control_change(controller.as_int(), value, channel)
    }

    pub fn cc_bank_select(&mut self, value: u8, channel: u8) -> &mut Message {
        self.cc(Controller::BankSelect, value, channel)
    }

    pub fn cc_modulation(&mut self, value: u8, channel: u8) -> &mut Message {
        self.cc(Controller::Modulation, value, channel)
    }

    pub fn cc_breath_control(&mut self, value: u8, channel: u8) -> &mut Message {
        self.cc(Controller::BreathControl, value, channel)
    }

    pub fn cc_foot_pedal(&mut self, value: u8, channel: u8) -> &mut Message {
        self.cc(Controller::FootPedal, value, channel)
    }

    pub fn cc_portamento(&mut self, value: u8, channel: u8) -> &mut Message {
        self.cc(Controller::Portamento, value, channel)
    }

    pub fn cc_volume(&mut self, value: u8, channel: u8) -> &mut Message {
        self.cc(Controller::Volume, value, channel)
    }

    pub fn cc_balance(&mut self, value: u8, channel: u8) -> &mut Message {
        self.cc(Controller::Balance, value, channel)
    }

    /// See the [`pan`](protocol/pan/index.html) constants for the extremes and the center.
    pub fn cc_pan(&mut self, value: u8, channel: u8) -> &mut Message {
        self.cc(Controller::Pan, value, channel)
    }

    pub fn cc_expression(&mut self, value: u8, channel: u8) -> &mut Message {
        self.cc(Controller::Expression, value, channel)
    }

    /// Send any channel mode message, with the value its controller expects.
    ///
    /// Local Control is sent as "on", use the `cc_local_control*` methods to choose.
    pub fn cc_channel_mode(&mut self, mode: ChannelMode, channel: u8) -> &mut Message {
        let value = match mode {
            ChannelMode::LocalControl => LocalControl::On as u8,
            _ => 0,
        };
        self.control_change(mode.as_int(), value, channel)
    }

    /// Silence every sounding voice, including release tails.
    pub fn cc_all_sound_off(&mut self, channel: u8) -> &mut Message {
        self.cc_channel_mode(ChannelMode::AllSoundOff, channel)
    }

    pub fn cc_reset_all_controllers(&mut self, channel: u8) -> &mut Message {
        self.cc_channel_mode(ChannelMode::ResetAllControllers, channel)
    }

    /// Release every held note.
    pub fn cc_all_notes_off(&mut self, channel: u8) -> &mut Message {
        self.cc_channel_mode(ChannelMode::AllNotesOff, channel)
    }

    pub fn cc_local_control(&mut self, mode: LocalControl, channel: u8) -> &mut Message {
        self.cc_local_control_raw(mode as u8, channel)
    }

    /// Local Control with an arbitrary value. Receivers treat anything but `0` as "on".
    pub fn cc_local_control_raw(&mut self, value: u8, channel: u8) -> &mut Message {
        self.control_change(ChannelMode::LocalControl.as_int(), value, channel)
    }

    pub fn cc_local_control_on(&mut self, channel: u8) -> &mut Message {
        self.cc_local_control(LocalControl::On, channel)
    }

    pub fn cc_local_control_off(&mut self, channel: u8) -> &mut Message {
        self.cc_local_control(LocalControl::Off, channel)
    }

    /// Omni mode, where `mode` is the controller number `0x7C` (off) or `0x7D` (on).
    ///
    /// Any other value leaves the message empty.
    ///
    /// ```rust
    /// use midly_wire::Message;
    ///
    /// let mut msg = Message::new();
    /// assert_eq!(msg.cc_omni_mode(0x7D, 1).as_slice(), &[0xB1, 0x7D, 0]);
    /// assert!(msg.cc_omni_mode(0x05, 1).is_empty());
    /// ```
    pub fn cc_omni_mode(&mut self, mode: u8, channel: u8) -> &mut Message {
        match ChannelMode::from_int(mode) {
            Some(mode @ ChannelMode::OmniOff) | Some(mode @ ChannelMode::OmniOn) => {
                self.cc_channel_mode(mode, channel)
            }
            _ => {
                tracing::trace!(mode, "rejected omni mode value");
                self.clear()
            }
        }
    }

    pub fn cc_omni_on(&mut self, channel: u8) -> &mut Message {
        self.cc_channel_mode(ChannelMode::OmniOn, channel)
    }

    pub fn cc_omni_off(&mut self, channel: u8) -> &mut Message {
        self.cc_channel_mode(ChannelMode::OmniOff, channel)
    }

    /// Mono/Poly mode, where `mode` is the controller number `0x7E` (mono) or `0x7F` (poly).
    ///
    /// Any other value leaves the message empty.
    pub fn cc_polyphony(&mut self, mode: u8, channel: u8) -> &mut Message {
        match ChannelMode::from_int(mode) {
            Some(mode @ ChannelMode::Mono) | Some(mode @ ChannelMode::Poly) => {
                self.cc_channel_mode(mode, channel)
            }
            _ => {
                tracing::trace!(mode, "rejected polyphony mode value");
                self.clear()
            }
        }
    }

    pub fn cc_mono(&mut self, channel: u8) -> &mut Message {
        self.cc_channel_mode(ChannelMode::Mono, channel)
    }

    pub fn cc_poly(&mut self, channel: u8) -> &mut Message {
        self.cc_channel_mode(ChannelMode::Poly, channel)
    }

    pub fn timing_tick(&mut self) -> &mut Message {
        self.set(&[status::TIMING_TICK])
    }

    pub fn start(&mut self) -> &mut Message {
        self.set(&[status::START])
    }

    /// The Continue message. Named with a trailing underscore since `continue` is a keyword.
    pub fn continue_(&mut self) -> &mut Message {
        self.set(&[status::CONTINUE])
    }

    pub fn stop(&mut self) -> &mut Message {
        self.set(&[status::STOP])
    }

    pub fn active_sensing(&mut self) -> &mut Message {
        self.set(&[status::ACTIVE_SENSING])
    }

    pub fn system_reset(&mut self) -> &mut Message {
        self.set(&[status::SYSTEM_RESET])
    }

    /// Song Position Pointer, in MIDI beats since the start of the song. Only the low 14 bits of
    /// `position` are sent.
    pub fn song_position_pointer(&mut self, position: u16) -> &mut Message {
        let [lsb, msb] = u14::new(position).split();
        self.set(&[status::SONG_POSITION_POINTER, lsb.as_int(), msb.as_int()])
    }

    /// Song Select. Only the low 7 bits of `song` are sent.
    pub fn song_select(&mut self, song: u8) -> &mut Message {
        self.set(&[status::SONG_SELECT, u7::new(song).as_int()])
    }

    pub fn tuning_request(&mut self) -> &mut Message {
        self.set(&[status::TUNING_REQUEST])
    }

    /// MTC Quarter Frame, packing a 3-bit time component code and a 4-bit value.
    pub fn mtc_quarter_frame(&mut self, time_component: u8, value: u8) -> &mut Message {
        self.set(&[
            status::MTC_QUARTER_FRAME,
            ((time_component & 0x07) << 4) | (value & 0x0F),
        ])
    }

    pub fn mtc_quarter_frame_component(
        &mut self,
        time_component: TimeComponent,
        value: u8,
    ) -> &mut Message {
        self.mtc_quarter_frame(time_component.as_code(), value)
    }

    /// MTC Full Frame, a universal real time SysEx locating the transport at an absolute
    /// position.
    ///
    /// `rate` is the 2-bit frame rate code, carried in the top bits of the hours byte.
    /// Components are masked to the width of their fields, and the SysEx channel saturates at
    /// `0x7F`.
    ///
    /// ```rust
    /// use midly_wire::{Message, MTC_ALL_CHANNELS};
    ///
    /// let mut msg = Message::new();
    /// msg.mtc_full_frame(1, 2, 3, 4, 3, MTC_ALL_CHANNELS);
    /// assert_eq!(msg.as_slice(), &[0xF0, 0x7F, 0x01, 0x61, 2, 3, 4, 0xF7]);
    /// ```
    pub fn mtc_full_frame(
        &mut self,
        hours: u8,
        minutes: u8,
        seconds: u8,
        frames: u8,
        rate: u8,
        sysex_channel: u8,
    ) -> &mut Message {
        self.set(&[
            status::SYSEX_START,
            data(sysex_channel),
            sysex::MTC_FULL_FRAME,
            ((rate & 0x03) << 5) | (hours & 0x1F),
            minutes & 0x3F,
            seconds & 0x3F,
            frames & 0x1F,
            status::SYSEX_END,
        ])
    }

    pub fn mtc_full_frame_rate(
        &mut self,
        hours: u8,
        minutes: u8,
        seconds: u8,
        frames: u8,
        rate: FrameRate,
        sysex_channel: u8,
    ) -> &mut Message {
        self.mtc_full_frame(hours, minutes, seconds, frames, rate.as_code(), sysex_channel)
    }

    /// System Exclusive, copying `payload` and adding the `0xF0`/`0xF7` framing bytes only when
    /// they are missing.
    ///
    /// An empty payload leaves the message untouched.
    ///
    /// ```rust
    /// use midly_wire::Message;
    ///
    /// let mut msg = Message::new();
    /// msg.system_exclusive(&[0x43, 0x10]);
    /// assert_eq!(msg.as_slice(), &[0xF0, 0x43, 0x10, 0xF7]);
    /// msg.system_exclusive(&[]);
    /// assert_eq!(msg.len(), 4);
    /// ```
    pub fn system_exclusive(&mut self, payload: &[u8]) -> &mut Message {
        let (first, last) = match (payload.first(), payload.last()) {
            (Some(&first), Some(&last)) => (first, last),
            _ => return self,
        };
        self.bytes.clear();
        self.bytes.reserve(payload.len() + 2);
        if first != status::SYSEX_START {
            self.bytes.push(status::SYSEX_START);
        }
        self.bytes.extend_from_slice(payload);
        if last != status::SYSEX_END {
            self.bytes.push(status::SYSEX_END);
        }
        self
    }

    /// Replace the contents with arbitrary bytes. No validation is done.
    #[inline]
    pub fn set_raw_data(&mut self, raw: &[u8]) -> &mut Message {
        self.set(raw)
    }

    #[inline]
    pub(crate) fn raw_mut(&mut self) -> &mut Vec<u8> {
        &mut self.bytes
    }

    /// Remove all bytes, keeping the allocation.
    #[inline]
    pub fn clear(&mut self) -> &mut Message {
        self.bytes.clear();
        self
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Same as `len`.
    #[inline]
    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// The raw bytes, or `None` if the message is empty.
    #[inline]
    pub fn buffer(&self) -> Option<&[u8]> {
        if self.bytes.is_empty() {
            None
        } else {
            Some(&self.bytes)
        }
    }

    /// The byte at `index`, or `0` if the index is out of range.
    #[inline]
    pub fn data(&self, index: usize) -> u8 {
        self.bytes.get(index).copied().unwrap_or(0)
    }

    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        &self.bytes
    }

    /// Consume the message, yielding its bytes.
    #[inline]
    pub fn into_vec(self) -> Vec<u8> {
        self.bytes
    }

    /// Classify the message the same way the streaming parser does.
    ///
    /// Returns `None` if the bytes are not exactly one complete message.
    #[inline]
    pub fn category(&self) -> Option<Category> {
        Category::of(&self.bytes)
    }

    /// Decode the message into a typed event borrowing from it.
    #[inline]
    pub fn event(&self) -> Result<Event<'_>> {
        Event::parse(&self.bytes)
    }
}

impl ops::Deref for Message {
    type Target = [u8];
    #[inline]
    fn deref(&self) -> &[u8] {
        &self.bytes
    }
}
impl AsRef<[u8]> for Message {
    #[inline]
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}
impl From<Vec<u8>> for Message {
    #[inline]
    fn from(bytes: Vec<u8>) -> Message {
        Message { bytes }
    }
}
impl From<&[u8]> for Message {
    #[inline]
    fn from(raw: &[u8]) -> Message {
        Message { bytes: raw.to_vec() }
    }
}
impl From<Message> for Vec<u8> {
    #[inline]
    fn from(msg: Message) -> Vec<u8> {
        msg.bytes
    }
}

/// A value type accepted by [`Message::pitch_bend`](struct.Message.html#method.pitch_bend).
///
/// Each integer type maps onto the 14-bit bend range, centered at `0x2000`, in its own way:
///
/// - `i16`: an offset from the center, clamped to `-8192 ..= 8191`.
/// - `i8`: a coarse offset from the center, scaled by 64.
/// - `u8`: a coarse absolute position, scaled by 64.
/// - `u16`: an absolute position, clamped to `0x3FFF`.
pub trait PitchBendValue: Copy {
    /// Map the value onto the raw 14-bit bend.
    fn to_bend(self) -> u14;
}
impl PitchBendValue for i16 {
    #[inline]
    fn to_bend(self) -> u14 {
        let clamped = self.max(-8192).min(8191);
        u14::new((clamped + 8192) as u16)
    }
}
impl PitchBendValue for i8 {
    #[inline]
    fn to_bend(self) -> u14 {
        let scaled = (self as i16).abs() << 6;
        let raw = if self >= 0 { 8192 + scaled } else { 8192 - scaled };
        u14::saturating(raw as u16)
    }
}
impl PitchBendValue for u8 {
    #[inline]
    fn to_bend(self) -> u14 {
        u14::new((self as u16) << 6)
    }
}
impl PitchBendValue for u16 {
    #[inline]
    fn to_bend(self) -> u14 {
        u14::saturating(self)
    }
}
impl PitchBendValue for u14 {
    #[inline]
    fn to_bend(self) -> u14 {
        self
    }
}
