//! Pipeline stages that consume MIDI, transform it and emit it again.
//!
//! A [`Processor`](trait.Processor.html) receives raw bytes through
//! [`midi_input`](trait.Processor.html#method.midi_input) and sends whatever it produces to its
//! output callback. Stages driven by time additionally receive
//! [`update`](trait.Processor.html#method.update) and
//! [`clock_tick`](trait.Processor.html#method.clock_tick) calls.
//!
//! ```rust
//! use midly_wire::processor::{ChannelReassign, Processor};
//!
//! let mut out = Vec::new();
//! {
//!     let mut reassign = ChannelReassign::new();
//!     reassign.set_output_channels(0b0110);
//!     reassign.bind_midi_out(|msg| out.push(msg.to_vec()));
//!     reassign.midi_input(&[0x95, 60, 100]);
//! }
//! assert_eq!(out, [[0x91, 60, 100], [0x92, 60, 100]]);
//! ```

use crate::{callback::Callback, parser::MessageParser, prelude::*};

/// A set of features a processor supports.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Hash, Default)]
pub struct Capabilities(u32);
impl Capabilities {
    pub const NONE: Capabilities = Capabilities(0);
    /// Consumes MIDI through `midi_input`.
    pub const MIDI_IN: Capabilities = Capabilities(1 << 0);
    /// Produces MIDI through its output callback.
    pub const MIDI_OUT: Capabilities = Capabilities(1 << 1);
    /// Follows an external clock through `clock_tick`.
    pub const EXT_CLOCK: Capabilities = Capabilities(1 << 2);
    /// Keeps its own time through `update`.
    pub const INTERNAL_CLOCK: Capabilities = Capabilities(1 << 3);

    #[inline]
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Whether every capability in `other` is also in `self`.
    #[inline]
    pub const fn contains(self, other: Capabilities) -> bool {
        self.0 & other.0 == other.0
    }
}
impl ops::BitOr for Capabilities {
    type Output = Capabilities;
    #[inline]
    fn bitor(self, rhs: Capabilities) -> Capabilities {
        Capabilities(self.0 | rhs.0)
    }
}
impl ops::BitOrAssign for Capabilities {
    #[inline]
    fn bitor_assign(&mut self, rhs: Capabilities) {
        self.0 |= rhs.0;
    }
}

/// A MIDI pipeline stage.
///
/// Only `capabilities` and access to the output slot are required, every other method defaults
/// to doing nothing.
pub trait Processor<'a> {
    /// The features this processor supports.
    fn capabilities(&self) -> Capabilities;

    /// The slot receiving the messages this processor produces.
    fn midi_out(&self) -> &Callback<'a, [u8]>;

    fn midi_out_mut(&mut self) -> &mut Callback<'a, [u8]>;

    #[inline]
    fn has_capability(&self, capability: Capabilities) -> bool {
        self.capabilities().contains(capability)
    }

    /// Bind the handler receiving produced messages, replacing the previous one.
    #[inline]
    fn bind_midi_out<F>(&mut self, handler: F)
    where
        F: FnMut(&[u8]) + 'a,
        Self: Sized,
    {
        self.midi_out_mut().bind(handler);
    }

    #[inline]
    fn unbind_midi_out(&mut self) {
        self.midi_out_mut().unbind();
    }

    /// Whether a handler is bound to receive produced messages.
    #[inline]
    fn midi_out_bound(&self) -> bool {
        self.midi_out().is_bound()
    }

    /// Consume raw MIDI bytes, in chunks of any size.
    #[inline]
    fn midi_input(&mut self, _bytes: &[u8]) {}

    /// Consume a single complete message.
    #[inline]
    fn midi_input_message(&mut self, msg: &Message) {
        self.midi_input(msg.as_slice());
    }

    /// Advance internal time, given the current time in microseconds.
    #[inline]
    fn update(&mut self, _now_us: u64) {}

    /// Advance by one tick of an external clock.
    #[inline]
    fn clock_tick(&mut self) {}
}

/// Moves channel voice messages from one set of channels onto another.
///
/// Three-byte channel voice messages (notes, aftertouch, control changes and pitch bends)
/// arriving on a channel in the input set are sent once per channel in the output set, keeping
/// their type and data. Everything else is forwarded unchanged.
///
/// Channel sets are 16-bit masks, where bit `n` stands for channel `n`. By default every channel
/// is an input and channel 0 is the only output, merging all input onto a single channel.
#[derive(Debug)]
pub struct ChannelReassign<'a> {
    parser: MessageParser<'static>,
    input_channels: u16,
    output_channels: u16,
    midi_out: Callback<'a, [u8]>,
}
impl<'a> ChannelReassign<'a> {
    pub fn new() -> ChannelReassign<'a> {
        ChannelReassign {
            parser: MessageParser::default(),
            input_channels: 0xFFFF,
            output_channels: 0x0001,
            midi_out: Callback::new(),
        }
    }

    #[inline]
    pub fn input_channels(&self) -> u16 {
        self.input_channels
    }

    #[inline]
    pub fn set_input_channels(&mut self, mask: u16) {
        self.input_channels = mask;
    }

    #[inline]
    pub fn output_channels(&self) -> u16 {
        self.output_channels
    }

    #[inline]
    pub fn set_output_channels(&mut self, mask: u16) {
        self.output_channels = mask;
    }

    /// Change the longest message the input parser can hold, 3 bytes by default.
    ///
    /// Longer messages, such as most SysEx dumps, are dropped instead of forwarded.
    #[inline]
    pub fn resize_buffer(&mut self, capacity: usize) -> Result<()> {
        self.parser.resize_buffer(capacity)
    }
}
impl<'a> Default for ChannelReassign<'a> {
    #[inline]
    fn default() -> ChannelReassign<'a> {
        ChannelReassign::new()
    }
}
impl<'a> Processor<'a> for ChannelReassign<'a> {
    #[inline]
    fn capabilities(&self) -> Capabilities {
        Capabilities::MIDI_IN | Capabilities::MIDI_OUT
    }

    #[inline]
    fn midi_out(&self) -> &Callback<'a, [u8]> {
        &self.midi_out
    }

    #[inline]
    fn midi_out_mut(&mut self) -> &mut Callback<'a, [u8]> {
        &mut self.midi_out
    }

    fn midi_input(&mut self, bytes: &[u8]) {
        let ChannelReassign {
            parser,
            input_channels,
            output_channels,
            midi_out,
        } = self;
        parser.feed(bytes, |category, msg| {
            let reassign = match category {
                Category::ChannelVoice | Category::ControlChange => {
                    msg.len() == 3 && *input_channels >> (msg[0] & 0x0F) & 1 != 0
                }
                _ => false,
            };
            if !reassign {
                midi_out.invoke(msg.as_slice());
                return;
            }
            for channel in 0..16 {
                if *output_channels >> channel & 1 != 0 {
                    midi_out.invoke(&[(msg[0] & 0xF0) | channel, msg[1], msg[2]][..]);
                }
            }
        });
    }
}
