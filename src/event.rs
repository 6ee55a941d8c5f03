//! Typed views over complete wire messages.
//!
//! The streaming parser and the `Message` builders work on raw bytes, which is what a MIDI port
//! consumes and produces. When the contents matter, a complete message can be decoded into an
//! [`Event`](enum.Event.html) and pattern-matched instead.

use crate::{
    mtc::TimeComponent,
    prelude::*,
    protocol::{status, ChannelMode},
};

/// A complete MIDI message, decoded from its raw bytes.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Hash)]
pub enum Event<'a> {
    /// A message associated with a channel, carrying musical data.
    ///
    /// Status byte in the range `0x80 ..= 0xEF`.
    Channel {
        /// The MIDI channel that this message is associated with.
        channel: u4,
        /// The message type and associated data.
        message: ChannelMessage,
    },
    /// A System Common message, including System Exclusive dumps.
    ///
    /// Status byte in the range `0xF0 ..= 0xF6`.
    Common(SystemCommon<'a>),
    /// A one-byte System Realtime message.
    ///
    /// Status byte in the range `0xF8 ..= 0xFF`.
    Realtime(SystemRealtime),
}
impl<'a> Event<'a> {
    /// Decode a complete MIDI message from its raw bytes.
    ///
    /// The first byte must be a status byte. Bytes following a complete fixed-length message are
    /// ignored. Data bytes with the top bit set are masked, unless the `strict` feature is
    /// enabled, in which case they are rejected.
    ///
    /// ```rust
    /// use midly_wire::{Event, SystemRealtime};
    ///
    /// assert_eq!(Event::parse(&[0xFA]).unwrap(), Event::Realtime(SystemRealtime::Start));
    /// assert!(Event::parse(&[0x90, 60]).is_err());
    /// ```
    pub fn parse(raw: &'a [u8]) -> Result<Event<'a>> {
        let (&status, data) = raw
            .split_first()
            .ok_or_else(|| err_invalid!("no status byte"))?;
        ensure!(
            status::is_status(status),
            err_invalid!("expected status byte")
        );
        match status {
            0x80..=0xEF => {
                let (channel, message) = ChannelMessage::read(status, data)?;
                Ok(Event::Channel { channel, message })
            }
            0xF8..=0xFF => Ok(Event::Realtime(SystemRealtime::read(status)?)),
            _ => Ok(Event::Common(SystemCommon::read(status, data)?)),
        }
    }

    /// Encode this event into `out`, replacing its previous contents.
    ///
    /// The resulting bytes are identical to those produced by the corresponding `Message`
    /// builder.
    pub fn encode(&self, out: &mut Message) {
        match *self {
            Event::Channel { channel, message } => message.encode(channel, out),
            Event::Common(common) => common.encode(out),
            Event::Realtime(realtime) => {
                out.set_raw_data(&[realtime.encode()]);
            }
        }
    }

    /// The category the streaming parser routes this event through.
    pub fn category(&self) -> Category {
        match self {
            Event::Channel {
                message: ChannelMessage::Controller { .. },
                ..
            } => Category::ControlChange,
            Event::Channel { .. } => Category::ChannelVoice,
            Event::Common(SystemCommon::SysEx(..)) => Category::SystemExclusive,
            Event::Common(SystemCommon::MtcQuarterFrame(..)) => Category::MtcQuarterFrame,
            Event::Common(..) => Category::SystemCommon,
            Event::Realtime(..) => Category::RealTime,
        }
    }
}

/// The contents of a channel voice message, without its channel.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Hash)]
pub enum ChannelMessage {
    /// Stop playing a note.
    NoteOff {
        /// The key to stop playing.
        key: u7,
        /// The release velocity.
        vel: u7,
    },
    /// Start playing a note.
    ///
    /// By convention a `NoteOn` with a velocity of 0 is equivalent to a `NoteOff`.
    NoteOn { key: u7, vel: u7 },
    /// Modify the pressure on a key after it has been played.
    Aftertouch { key: u7, vel: u7 },
    /// Modify the value of a controller, or send a channel mode message if the controller
    /// number is in the range `0x78 ..= 0x7F`.
    Controller { controller: u7, value: u7 },
    /// Change the program (instrument) of the channel.
    ProgramChange { program: u7 },
    /// Modify the pressure of every key in the channel at once.
    ChannelPressure { pressure: u7 },
    /// Set the pitch bend of the entire channel.
    ///
    /// The raw 14-bit value is centered at `0x2000`.
    PitchBend { bend: u14 },
}
impl ChannelMessage {
    /// Amount of data bytes following the status byte.
    pub(crate) fn msg_length(status: u8) -> usize {
        const LENGTH_BY_STATUS: [u8; 16] = [0, 0, 0, 0, 0, 0, 0, 0, 2, 2, 2, 2, 1, 1, 2, 0];
        LENGTH_BY_STATUS[(status >> 4) as usize] as usize
    }

    /// Read the channel and message out of a channel status byte and its data bytes.
    fn read(status: u8, raw: &[u8]) -> Result<(u4, ChannelMessage)> {
        let len = Self::msg_length(status);
        ensure!(raw.len() >= len, err_invalid!("truncated midi message"));
        let mut data = [u7::new(0); 2];
        for (slot, &byte) in data.iter_mut().zip(&raw[..len]) {
            *slot = read_data_byte(byte)?;
        }
        let channel = u4::from(status);
        let [d0, d1] = data;
        let msg = match status >> 4 {
            0x8 => ChannelMessage::NoteOff { key: d0, vel: d1 },
            0x9 => ChannelMessage::NoteOn { key: d0, vel: d1 },
            0xA => ChannelMessage::Aftertouch { key: d0, vel: d1 },
            0xB => {
                check_channel_mode(d0, d1)?;
                ChannelMessage::Controller {
                    controller: d0,
                    value: d1,
                }
            }
            0xC => ChannelMessage::ProgramChange { program: d0 },
            0xD => ChannelMessage::ChannelPressure { pressure: d0 },
            _ => ChannelMessage::PitchBend {
                bend: u14::join(d0, d1),
            },
        };
        Ok((channel, msg))
    }

    /// Get the raw status nibble for this message type.
    pub fn status_nibble(&self) -> u8 {
        match self {
            ChannelMessage::NoteOff { .. } => 0x8,
            ChannelMessage::NoteOn { .. } => 0x9,
            ChannelMessage::Aftertouch { .. } => 0xA,
            ChannelMessage::Controller { .. } => 0xB,
            ChannelMessage::ProgramChange { .. } => 0xC,
            ChannelMessage::ChannelPressure { .. } => 0xD,
            ChannelMessage::PitchBend { .. } => 0xE,
        }
    }

    fn encode(&self, channel: u4, out: &mut Message) {
        let ch = channel.as_int();
        match *self {
            ChannelMessage::NoteOff { key, vel } => out.note_off(key.as_int(), vel.as_int(), ch),
            ChannelMessage::NoteOn { key, vel } => out.note_on(key.as_int(), vel.as_int(), ch),
            ChannelMessage::Aftertouch { key, vel } => {
                out.after_touch(key.as_int(), vel.as_int(), ch)
            }
            ChannelMessage::Controller { controller, value } => {
                out.control_change(controller.as_int(), value.as_int(), ch)
            }
            ChannelMessage::ProgramChange { program } => out.program_change(program.as_int(), ch),
            ChannelMessage::ChannelPressure { pressure } => {
                out.channel_pressure(pressure.as_int(), ch)
            }
            ChannelMessage::PitchBend { bend } => out.pitch_bend(bend, ch),
        };
    }
}

/// Masks or rejects the top bit of a data byte, depending on the `strict` feature.
fn read_data_byte(byte: u8) -> Result<u7> {
    if cfg!(feature = "strict") {
        Ok(u7::check_int(byte).context(err_malformed!("data byte with top bit set"))?)
    } else {
        Ok(u7::from(byte))
    }
}

/// Omni and Poly carry no value. Only checked with the `strict` feature.
fn check_channel_mode(controller: u7, value: u7) -> Result<()> {
    if cfg!(feature = "strict") {
        match ChannelMode::from_int(controller.as_int()) {
            Some(ChannelMode::OmniOff) | Some(ChannelMode::OmniOn) | Some(ChannelMode::Poly) => {
                ensure!(
                    value.as_int() == 0,
                    err_malformed!("channel mode message with a non-zero value")
                );
            }
            _ => {}
        }
    }
    Ok(())
}

/// A System Common message, as defined by the MIDI standard.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Hash)]
pub enum SystemCommon<'a> {
    /// A System Exclusive dump, without the `0xF0` and `0xF7` framing bytes.
    ///
    /// MTC Full Frame messages are carried as SysEx dumps, see
    /// [`Timecode::from_full_frame`](mtc/struct.Timecode.html#method.from_full_frame).
    SysEx(&'a [u7]),
    /// An MTC Quarter Frame, carrying one nibble of the current timecode.
    MtcQuarterFrame(TimeComponent, u4),
    /// The number of MIDI beats (6 x MIDI clocks) that have elapsed since the start of the
    /// song.
    SongPosition(u14),
    /// Select a given song index.
    SongSelect(u7),
    /// Request the device to tune itself.
    TuneRequest,
}
impl<'a> SystemCommon<'a> {
    fn read(status: u8, data: &'a [u8]) -> Result<SystemCommon<'a>> {
        let ev = match status {
            status::SYSEX_START => {
                let payload = match data.split_last() {
                    Some((&status::SYSEX_END, payload)) => payload,
                    _ => bail!(err_invalid!("unterminated sysex")),
                };
                if cfg!(feature = "strict") {
                    SystemCommon::SysEx(
                        u7::slice_try_from_int(payload)
                            .ok_or_else(|| err_malformed!("status byte inside sysex"))?,
                    )
                } else {
                    SystemCommon::SysEx(u7::slice_from_int(payload))
                }
            }
            status::MTC_QUARTER_FRAME => {
                let byte = read_data(data, 1)?[0];
                SystemCommon::MtcQuarterFrame(
                    TimeComponent::from_code(byte.as_int() >> 4),
                    u4::from(byte.as_int()),
                )
            }
            status::SONG_POSITION_POINTER => {
                let data = read_data(data, 2)?;
                SystemCommon::SongPosition(u14::join(data[0], data[1]))
            }
            status::SONG_SELECT => SystemCommon::SongSelect(read_data(data, 1)?[0]),
            status::TUNING_REQUEST => SystemCommon::TuneRequest,
            status::SYSEX_END => bail!(err_invalid!("stray sysex end byte")),
            _ => bail!(err_invalid!("undefined status byte")),
        };
        Ok(ev)
    }

    fn encode(&self, out: &mut Message) {
        match *self {
            SystemCommon::SysEx(payload) => {
                let raw = out.raw_mut();
                raw.clear();
                raw.reserve(payload.len() + 2);
                raw.push(status::SYSEX_START);
                raw.extend_from_slice(u7::slice_as_int(payload));
                raw.push(status::SYSEX_END);
            }
            SystemCommon::MtcQuarterFrame(component, value) => {
                out.mtc_quarter_frame_component(component, value.as_int());
            }
            SystemCommon::SongPosition(pos) => {
                out.song_position_pointer(pos.as_int());
            }
            SystemCommon::SongSelect(song) => {
                out.song_select(song.as_int());
            }
            SystemCommon::TuneRequest => {
                out.tuning_request();
            }
        }
    }
}

/// Read `len` data bytes, where `len <= 2`.
fn read_data(data: &[u8], len: usize) -> Result<[u7; 2]> {
    ensure!(data.len() >= len, err_invalid!("truncated midi message"));
    let mut out = [u7::new(0); 2];
    for (slot, &byte) in out.iter_mut().zip(&data[..len]) {
        *slot = read_data_byte(byte)?;
    }
    Ok(out)
}

/// System Realtime messages, one byte in size.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Hash)]
pub enum SystemRealtime {
    /// If sent, they should be sent 24 times per quarter note.
    TimingClock,
    /// Request the device to start playing at position 0.
    Start,
    /// Request the device to continue playing without resetting the position.
    Continue,
    /// Request the device to stop playing, but keep track of the position where it stopped.
    Stop,
    /// Once one of these messages is transmitted, a message should arrive every 300ms or else
    /// the connection is considered broken.
    ActiveSensing,
    /// Request the device to reset itself, usually to the same state as it was after turning on.
    /// Usually, turns off all playing notes, clears running status, sets song position to 0, etc...
    Reset,
}
impl SystemRealtime {
    fn read(status: u8) -> Result<SystemRealtime> {
        use self::SystemRealtime::*;
        Ok(match status {
            status::TIMING_TICK => TimingClock,
            status::START => Start,
            status::CONTINUE => Continue,
            status::STOP => Stop,
            status::ACTIVE_SENSING => ActiveSensing,
            status::SYSTEM_RESET => Reset,
            _ => bail!(err_invalid!("undefined status byte")),
        })
    }

    /// Get the status byte of this message.
    pub fn encode(self) -> u8 {
        use self::SystemRealtime::*;
        match self {
            TimingClock => status::TIMING_TICK,
            Start => status::START,
            Continue => status::CONTINUE,
            Stop => status::STOP,
            ActiveSensing => status::ACTIVE_SENSING,
            Reset => status::SYSTEM_RESET,
        }
    }
}
