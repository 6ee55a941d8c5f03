//! MIDI Time Code, the SMPTE timestamps carried by Quarter Frame and Full Frame messages.

use crate::{
    prelude::*,
    protocol::{status, sysex},
};

/// Which nibble of the timecode a Quarter Frame message carries.
///
/// A complete timecode takes eight consecutive quarter frames, sent in this order when the
/// transport runs forwards.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Hash)]
pub enum TimeComponent {
    /// The low nibble of the frame count.
    FramesLsb,
    /// The high nibble of the frame count.
    FramesMsb,
    /// The low nibble of the second count.
    SecondsLsb,
    /// The high nibble of the second count.
    SecondsMsb,
    /// The low nibble of the minute count.
    MinutesLsb,
    /// The high nibble of the minute count.
    MinutesMsb,
    /// The low nibble of the hour count.
    HoursLsb,
    /// The top bit of the hour count, together with the frame rate code.
    HoursMsb,
}
impl TimeComponent {
    /// All eight components, in transmission order.
    pub const ALL: [TimeComponent; 8] = [
        TimeComponent::FramesLsb,
        TimeComponent::FramesMsb,
        TimeComponent::SecondsLsb,
        TimeComponent::SecondsMsb,
        TimeComponent::MinutesLsb,
        TimeComponent::MinutesMsb,
        TimeComponent::HoursLsb,
        TimeComponent::HoursMsb,
    ];

    /// The 3-bit code placed in the high nibble of the quarter frame data byte.
    #[inline]
    pub fn as_code(self) -> u8 {
        self as u8
    }

    /// Get the component for a 3-bit code. Extra bits are ignored.
    #[inline]
    pub fn from_code(code: u8) -> TimeComponent {
        Self::ALL[(code & 0x07) as usize]
    }
}

/// One of the four frame rates MIDI Time Code can express.
///
/// The discriminants are the 2-bit codes carried in the hours byte of a Full Frame message.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Hash)]
pub enum FrameRate {
    /// 24 frames per second.
    Fps24 = 0,
    /// 25 frames per second.
    Fps25 = 1,
    /// 29.97 frames per second, counted as 30 with frames dropped at each minute.
    Fps30Drop = 2,
    /// 30 frames per second.
    Fps30 = 3,
}
impl FrameRate {
    /// The 2-bit frame rate code.
    #[inline]
    pub fn as_code(self) -> u8 {
        self as u8
    }

    /// Get the frame rate for a 2-bit code. Extra bits are ignored.
    #[inline]
    pub fn from_code(code: u8) -> FrameRate {
        match code & 0x03 {
            0 => FrameRate::Fps24,
            1 => FrameRate::Fps25,
            2 => FrameRate::Fps30Drop,
            _ => FrameRate::Fps30,
        }
    }

    /// The amount of frame numbers in a second, ie. the exclusive upper bound of the frame count.
    #[inline]
    pub fn frame_limit(self) -> u8 {
        match self {
            FrameRate::Fps24 => 24,
            FrameRate::Fps25 => 25,
            FrameRate::Fps30Drop | FrameRate::Fps30 => 30,
        }
    }
}

/// A timecode position, in hours, minutes, seconds and frames.
///
/// Values are always valid:
/// - `hours` is inside [0, 31] (the field is 5 bits wide; counting wraps at 24)
/// - `minutes` is inside [0, 59]
/// - `seconds` is inside [0, 59]
/// - `frames` is inside [0, frame limit - 1]
/// - at drop-frame rate, frames 0 and 1 do not exist at the start of every minute except
///   minutes 0, 10, 20, 30, 40 and 50
#[derive(Copy, Clone, PartialEq, Eq, Debug, Hash)]
pub struct Timecode {
    hours: u8,
    minutes: u8,
    seconds: u8,
    frames: u8,
    rate: FrameRate,
}
impl Timecode {
    /// Create a new timecode, or `None` if the components do not form a valid position.
    ///
    /// ```rust
    /// use midly_wire::mtc::{FrameRate, Timecode};
    ///
    /// assert!(Timecode::new(1, 2, 3, 4, FrameRate::Fps25).is_some());
    /// assert!(Timecode::new(1, 2, 3, 25, FrameRate::Fps25).is_none());
    /// // Dropped frame
    /// assert!(Timecode::new(0, 1, 0, 0, FrameRate::Fps30Drop).is_none());
    /// ```
    pub fn new(
        hours: u8,
        minutes: u8,
        seconds: u8,
        frames: u8,
        rate: FrameRate,
    ) -> Option<Timecode> {
        macro_rules! check {
            ($cond:expr) => {{
                if !{ $cond } {
                    return None;
                }
            }};
        }
        check!(hours < 32);
        check!(minutes < 60);
        check!(seconds < 60);
        check!(frames < rate.frame_limit());
        check!(!Self::is_dropped(minutes, seconds, frames, rate));
        Some(Timecode {
            hours,
            minutes,
            seconds,
            frames,
            rate,
        })
    }

    fn is_dropped(minutes: u8, seconds: u8, frames: u8, rate: FrameRate) -> bool {
        rate == FrameRate::Fps30Drop && seconds == 0 && minutes % 10 != 0 && frames < 2
    }

    #[inline]
    pub fn hours(&self) -> u8 {
        self.hours
    }

    #[inline]
    pub fn minutes(&self) -> u8 {
        self.minutes
    }

    #[inline]
    pub fn seconds(&self) -> u8 {
        self.seconds
    }

    #[inline]
    pub fn frames(&self) -> u8 {
        self.frames
    }

    #[inline]
    pub fn rate(&self) -> FrameRate {
        self.rate
    }

    /// The 4-bit payload of the quarter frame carrying the given component.
    pub fn nibble(&self, component: TimeComponent) -> u8 {
        use self::TimeComponent::*;
        match component {
            FramesLsb => self.frames & 0x0F,
            FramesMsb => (self.frames >> 4) & 0x0F,
            SecondsLsb => self.seconds & 0x0F,
            SecondsMsb => (self.seconds >> 4) & 0x0F,
            MinutesLsb => self.minutes & 0x0F,
            MinutesMsb => (self.minutes >> 4) & 0x0F,
            HoursLsb => self.hours & 0x0F,
            HoursMsb => ((self.hours >> 4) & 0x01) | (self.rate.as_code() << 1),
        }
    }

    /// Advance by a single frame, carrying into seconds, minutes and hours.
    ///
    /// Hours wrap around after 23. At drop-frame rate the dropped frame numbers are skipped.
    ///
    /// ```rust
    /// use midly_wire::mtc::{FrameRate, Timecode};
    ///
    /// let mut tc = Timecode::new(0, 0, 59, 29, FrameRate::Fps30Drop).unwrap();
    /// tc.increment_frame();
    /// assert_eq!((tc.minutes(), tc.seconds(), tc.frames()), (1, 0, 2));
    /// ```
    pub fn increment_frame(&mut self) {
        self.frames += 1;
        if self.frames < self.rate.frame_limit() {
            return;
        }
        self.frames = 0;
        self.seconds += 1;
        if self.seconds == 60 {
            self.seconds = 0;
            self.minutes += 1;
            if self.minutes == 60 {
                self.minutes = 0;
                self.hours += 1;
                if self.hours >= 24 {
                    self.hours = 0;
                }
            }
        }
        if Self::is_dropped(self.minutes, self.seconds, self.frames, self.rate) {
            self.frames = 2;
        }
    }

    /// Build the Quarter Frame message carrying the given component of this timecode.
    pub fn quarter_frame(&self, component: TimeComponent) -> Message {
        let mut msg = Message::new();
        msg.mtc_quarter_frame_component(component, self.nibble(component));
        msg
    }

    /// Build the eight Quarter Frame messages describing this timecode, in transmission order.
    pub fn quarter_frames(&self) -> [Message; 8] {
        let mut out: [Message; 8] = Default::default();
        for (msg, &component) in out.iter_mut().zip(TimeComponent::ALL.iter()) {
            msg.mtc_quarter_frame_component(component, self.nibble(component));
        }
        out
    }

    /// Build the Full Frame message locating this timecode, addressed to the given SysEx channel.
    ///
    /// Use [`MTC_ALL_CHANNELS`](../constant.MTC_ALL_CHANNELS.html) to address every device.
    pub fn full_frame(&self, sysex_channel: u8) -> Message {
        let mut msg = Message::new();
        msg.mtc_full_frame_rate(
            self.hours,
            self.minutes,
            self.seconds,
            self.frames,
            self.rate,
            sysex_channel,
        );
        msg
    }

    /// Read the target SysEx channel and the timecode out of the raw bytes of a Full Frame
    /// message.
    ///
    /// Returns `None` if the bytes are not a Full Frame message or the timecode is invalid.
    ///
    /// ```rust
    /// use midly_wire::mtc::{FrameRate, Timecode};
    ///
    /// let tc = Timecode::new(10, 20, 30, 12, FrameRate::Fps25).unwrap();
    /// let msg = tc.full_frame(0x7F);
    /// assert_eq!(Timecode::from_full_frame(&msg), Some((0x7F, tc)));
    /// ```
    pub fn from_full_frame(raw: &[u8]) -> Option<(u8, Timecode)> {
        match *raw {
            [status::SYSEX_START, channel, sysex::MTC_FULL_FRAME, hours_rate, minutes, seconds, frames, status::SYSEX_END] =>
            {
                let rate = FrameRate::from_code(hours_rate >> 5);
                let tc = Timecode::new(hours_rate & 0x1F, minutes, seconds, frames, rate)?;
                Some((channel, tc))
            }
            _ => None,
        }
    }
}
