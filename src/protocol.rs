//! Status codes, controller numbers and message categories defined by the MIDI standard.

/// Channel voice status codes. The low nibble of the status byte carries the channel.
pub mod status {
    pub const NOTE_OFF: u8 = 0x80;
    pub const NOTE_ON: u8 = 0x90;
    pub const AFTER_TOUCH: u8 = 0xA0;
    pub const CONTROL_CHANGE: u8 = 0xB0;
    pub const PROGRAM_CHANGE: u8 = 0xC0;
    pub const CHANNEL_PRESSURE: u8 = 0xD0;
    pub const PITCH_BEND: u8 = 0xE0;

    pub const SYSEX_START: u8 = 0xF0;
    pub const MTC_QUARTER_FRAME: u8 = 0xF1;
    pub const SONG_POSITION_POINTER: u8 = 0xF2;
    pub const SONG_SELECT: u8 = 0xF3;
    pub const TUNING_REQUEST: u8 = 0xF6;
    pub const SYSEX_END: u8 = 0xF7;

    pub const TIMING_TICK: u8 = 0xF8;
    pub const START: u8 = 0xFA;
    pub const CONTINUE: u8 = 0xFB;
    pub const STOP: u8 = 0xFC;
    pub const ACTIVE_SENSING: u8 = 0xFE;
    pub const SYSTEM_RESET: u8 = 0xFF;

    /// Whether the byte has its top bit set.
    #[inline]
    pub const fn is_status(byte: u8) -> bool {
        byte & 0x80 != 0
    }

    /// Whether the byte is one of the six defined System Realtime codes.
    #[inline]
    pub const fn is_realtime(byte: u8) -> bool {
        matches!(
            byte,
            TIMING_TICK | START | CONTINUE | STOP | ACTIVE_SENSING | SYSTEM_RESET
        )
    }
}

/// Sub-identifiers used inside universal real time SysEx messages.
pub mod sysex {
    /// The "all devices" SysEx channel.
    pub const ALL_CHANNELS: u8 = 0x7F;
    /// Sub-ID of an MTC Full Frame message.
    pub const MTC_FULL_FRAME: u8 = 0x01;
}

/// Well known controller numbers for Control Change messages.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Hash)]
#[repr(u8)]
pub enum Controller {
    BankSelect = 0x00,
    Modulation = 0x01,
    BreathControl = 0x02,
    FootPedal = 0x04,
    Portamento = 0x05,
    DataEntryMsb = 0x06,
    Volume = 0x07,
    Balance = 0x08,
    Pan = 0x0A,
    Expression = 0x0B,
    DataEntryLsb = 0x26,
    NrpnDataIncrement = 0x60,
    NrpnDataDecrement = 0x61,
    NrpnLsb = 0x62,
    NrpnMsb = 0x63,
    RpnLsb = 0x64,
    RpnMsb = 0x65,
}
impl Controller {
    /// The controller number as sent on the wire.
    #[inline]
    pub fn as_int(self) -> u8 {
        self as u8
    }
}

/// Pan values for the extremes and the center.
pub mod pan {
    pub const LEFT: u8 = 0x00;
    pub const CENTER: u8 = 0x40;
    pub const RIGHT: u8 = 0x7F;
}

/// Channel mode messages, sent as Control Change messages with reserved controller numbers
/// `0x78 ..= 0x7F`.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Hash)]
#[repr(u8)]
pub enum ChannelMode {
    AllSoundOff = 0x78,
    ResetAllControllers = 0x79,
    LocalControl = 0x7A,
    AllNotesOff = 0x7B,
    OmniOff = 0x7C,
    OmniOn = 0x7D,
    Mono = 0x7E,
    Poly = 0x7F,
}
impl ChannelMode {
    /// The controller number as sent on the wire.
    #[inline]
    pub fn as_int(self) -> u8 {
        self as u8
    }

    /// Get the channel mode corresponding to a controller number, if any.
    pub fn from_int(controller: u8) -> Option<ChannelMode> {
        use self::ChannelMode::*;
        Some(match controller {
            0x78 => AllSoundOff,
            0x79 => ResetAllControllers,
            0x7A => LocalControl,
            0x7B => AllNotesOff,
            0x7C => OmniOff,
            0x7D => OmniOn,
            0x7E => Mono,
            0x7F => Poly,
            _ => return None,
        })
    }
}

/// The value carried by a Local Control channel mode message.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Hash)]
#[repr(u8)]
pub enum LocalControl {
    Off = 0x00,
    On = 0x7F,
}

/// The category a complete wire message belongs to, which determines the callback chain it is
/// routed through by the parser.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Hash)]
pub enum Category {
    /// Note On/Off, AfterTouch, Program Change, Channel Pressure and Pitch Bend.
    ChannelVoice,
    /// A Control Change message, a special case of channel voice messages.
    ControlChange,
    /// A single-byte System Realtime message.
    RealTime,
    /// Song Position Pointer, Song Select and Tuning Request.
    SystemCommon,
    /// An MTC Quarter Frame message, a special case of system common messages.
    MtcQuarterFrame,
    /// A System Exclusive message, framed by `0xF0` and `0xF7`.
    SystemExclusive,
}
impl Category {
    /// Classify a complete wire message, using the same grammar as the streaming parser.
    ///
    /// Returns `None` if the bytes are not exactly one complete message.
    ///
    /// ```rust
    /// use midly_wire::Category;
    ///
    /// assert_eq!(Category::of(&[0xB3, 7, 100]), Some(Category::ControlChange));
    /// assert_eq!(Category::of(&[0xF8]), Some(Category::RealTime));
    /// assert_eq!(Category::of(&[0x90, 60]), None);
    /// ```
    pub fn of(bytes: &[u8]) -> Option<Category> {
        let status = *bytes.first()?;
        if status == status::SYSEX_START {
            return match bytes.last() {
                Some(&status::SYSEX_END) if bytes.len() >= 2 => Some(Category::SystemExclusive),
                _ => None,
            };
        }
        let (category, len) = Self::classify_status(status)?;
        if bytes.len() == len {
            Some(category)
        } else {
            None
        }
    }

    /// Get the category and fixed message length implied by a non-SysEx status byte.
    pub(crate) fn classify_status(status: u8) -> Option<(Category, usize)> {
        Some(match status {
            0x80..=0xAF | 0xE0..=0xEF => (Category::ChannelVoice, 3),
            0xB0..=0xBF => (Category::ControlChange, 3),
            0xC0..=0xDF => (Category::ChannelVoice, 2),
            status::MTC_QUARTER_FRAME => (Category::MtcQuarterFrame, 2),
            status::SONG_POSITION_POINTER => (Category::SystemCommon, 3),
            status::SONG_SELECT => (Category::SystemCommon, 2),
            status::TUNING_REQUEST => (Category::SystemCommon, 1),
            s if status::is_realtime(s) => (Category::RealTime, 1),
            _ => return None,
        })
    }
}
