//! Device-level brightness and duration codes.
//!
//! Human-facing values (a normalized intensity, a number of seconds) are
//! turned into device codes by external collaborators: a [`BrightnessCurve`]
//! and a [`DurationConversion`]. Any `Fn` with the matching signature works.

/// Device brightness code in `[0, 255]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Brightness(pub u8);

impl Brightness {
    pub const MIN: Self = Self(u8::MIN);
    pub const MAX: Self = Self(u8::MAX);

    pub const fn code(self) -> u8 {
        self.0
    }
}

impl From<u8> for Brightness {
    fn from(code: u8) -> Self {
        Self(code)
    }
}

/// Device timing code, big-endian on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct DeviceDuration(pub u16);

impl DeviceDuration {
    pub const fn code(self) -> u16 {
        self.0
    }
}

impl From<u16> for DeviceDuration {
    fn from(code: u16) -> Self {
        Self(code)
    }
}

/// Maps a normalized intensity in `[0.0, 1.0]` to a device brightness code.
pub trait BrightnessCurve {
    fn brightness(&self, normal: f32) -> Brightness;
}

impl<F> BrightnessCurve for F
where
    F: Fn(f32) -> Brightness,
{
    fn brightness(&self, normal: f32) -> Brightness {
        self(normal)
    }
}

/// Maps a non-negative number of seconds to a device duration code.
pub trait DurationConversion {
    fn duration(&self, seconds: f32) -> DeviceDuration;
}

impl<F> DurationConversion for F
where
    F: Fn(f32) -> DeviceDuration,
{
    fn duration(&self, seconds: f32) -> DeviceDuration {
        self(seconds)
    }
}
