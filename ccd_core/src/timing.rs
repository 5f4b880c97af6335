//! Duration to timing-word encoding.
//!
//! The timing board counts waveform durations in one of two units selected by
//! bit 7 of an 8-bit field: 320 ns when set, 40 ns when clear. Bits 0-6 carry
//! the multiplier. The field travels in bits 16-23 of the command argument.
//!
//! Encoding rules, in order:
//! 1. Clamp the request to `0..=163` us (reported as a warning).
//! 2. Truncate `us * 1000` toward zero to get nanoseconds.
//! 3. Above 4000 ns always use the 320 ns unit. At or below, pick the unit
//!    whose nearest multiple is closer, preferring 320 ns on ties.
//! 4. The multiplier is `ns / unit`, truncated, regardless of which multiple
//!    was nearest.
//!
//! Above 40.96 us the 320 ns multiplier needs more than 7 bits. The word is
//! still built as `(M | 0x80) << 16`, so the high bits spill into bit 7 and
//! bit 24; [`Encoding::multiplier_overflows`] reports this.

use core::fmt;

/// Largest duration the encoder accepts before clamping.
pub const MAX_DURATION_US: f64 = 163.0;
/// Nanoseconds per timing unit when the unit flag is set.
pub const BIG_UNIT_NS: u32 = 320;
/// Nanoseconds per timing unit when the unit flag is clear.
pub const LITTLE_UNIT_NS: u32 = 40;
/// At or below this many ns the encoder chooses the unit by nearest fit.
pub const NEAREST_FIT_LIMIT_NS: u32 = 4000;

const UNIT_FLAG: u32 = 0x80;
const MULTIPLIER_MASK: u32 = 0x7F;
const FIELD_SHIFT: u32 = 16;
const NS_PER_US: f64 = 1000.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimingUnit {
    /// 40 ns
    Little,
    /// 320 ns
    Big,
}

impl TimingUnit {
    pub const fn ns(self) -> u32 {
        match self {
            TimingUnit::Little => LITTLE_UNIT_NS,
            TimingUnit::Big => BIG_UNIT_NS,
        }
    }
}

/// Encoded duration as sent to the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimingWord(u32);

impl TimingWord {
    /// Build from a raw 32-bit command argument.
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Unit flag and multiplier before the shift into bits 16-23.
    pub const fn field(self) -> u32 {
        self.0 >> FIELD_SHIFT
    }

    pub const fn unit(self) -> TimingUnit {
        if self.field() & UNIT_FLAG != 0 {
            TimingUnit::Big
        } else {
            TimingUnit::Little
        }
    }

    /// The 7-bit multiplier as the board decodes it.
    pub const fn multiplier(self) -> u32 {
        self.field() & MULTIPLIER_MASK
    }

    /// Duration the board will actually produce, in ns.
    pub const fn effective_ns(self) -> u32 {
        self.multiplier() * self.unit().ns()
    }
}

impl From<TimingWord> for u32 {
    fn from(word: TimingWord) -> Self {
        word.0
    }
}

impl fmt::Display for TimingWord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#010x}", self.0)
    }
}

/// A requested duration was outside `0..=163` us and was substituted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RangeClamped {
    pub requested_us: f64,
    pub applied_us: f64,
}

impl fmt::Display for RangeClamped {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "requested {} us is outside 0..={MAX_DURATION_US} us; using {} us",
            self.requested_us, self.applied_us
        )
    }
}

/// Full result of an encoding, with the diagnostics that `encode` only logs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Encoding {
    pub word: TimingWord,
    pub requested_us: f64,
    pub applied_us: f64,
    pub duration_ns: u32,
    /// Multiplier before packing; may exceed 7 bits, see module docs.
    pub multiplier: u32,
    pub unit: TimingUnit,
    pub clamped: Option<RangeClamped>,
}

impl Encoding {
    pub fn multiplier_overflows(&self) -> bool {
        self.multiplier > MULTIPLIER_MASK
    }
}

/// Encode a duration in microseconds into a timing word.
pub fn encode(duration_us: f64) -> TimingWord {
    encode_checked(duration_us).word
}

/// Like [`encode`], but also returns the intermediate values and the clamp
/// diagnostic.
pub fn encode_checked(duration_us: f64) -> Encoding {
    let applied_us = clamp_duration_us(duration_us);
    let clamped = if applied_us == duration_us {
        None
    } else {
        tracing::warn!(
            requested_us = duration_us,
            applied_us,
            "timing range is 0 to {MAX_DURATION_US} us; restricting duration"
        );
        Some(RangeClamped {
            requested_us: duration_us,
            applied_us,
        })
    };

    let duration_ns = us_to_ns(applied_us);
    let (multiplier, unit) = select_unit(duration_ns);
    let field = match unit {
        TimingUnit::Big => multiplier | UNIT_FLAG,
        TimingUnit::Little => multiplier,
    };
    if multiplier > MULTIPLIER_MASK {
        tracing::debug!(duration_ns, multiplier, "multiplier exceeds 7 bits");
    }

    Encoding {
        word: TimingWord(field << FIELD_SHIFT),
        requested_us: duration_us,
        applied_us,
        duration_ns,
        multiplier,
        unit,
        clamped,
    }
}

/// NaN maps to 0; everything else is clamped into `0..=MAX_DURATION_US`.
#[inline]
fn clamp_duration_us(us: f64) -> f64 {
    if us.is_nan() {
        0.0
    } else {
        us.clamp(0.0, MAX_DURATION_US)
    }
}

/// Truncating conversion; `us` is already within `0..=MAX_DURATION_US`.
#[inline]
fn us_to_ns(us: f64) -> u32 {
    (us * NS_PER_US) as u32
}

fn select_unit(ns: u32) -> (u32, TimingUnit) {
    if ns > NEAREST_FIT_LIMIT_NS {
        return (ns / BIG_UNIT_NS, TimingUnit::Big);
    }
    let big_rem = distance_to_multiple(ns, BIG_UNIT_NS);
    let little_rem = distance_to_multiple(ns, LITTLE_UNIT_NS);
    if big_rem <= little_rem {
        (ns / BIG_UNIT_NS, TimingUnit::Big)
    } else {
        (ns / LITTLE_UNIT_NS, TimingUnit::Little)
    }
}

/// Distance from `ns` to the nearest multiple of `unit`; exact halves count
/// toward the lower multiple.
#[inline]
fn distance_to_multiple(ns: u32, unit: u32) -> u32 {
    let r = ns % unit;
    if r > unit / 2 { unit - r } else { r }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_halves_stay_low() {
        assert_eq!(distance_to_multiple(160, 320), 160);
        assert_eq!(distance_to_multiple(161, 320), 159);
        assert_eq!(distance_to_multiple(20, 40), 20);
        assert_eq!(distance_to_multiple(21, 40), 19);
        assert_eq!(distance_to_multiple(640, 320), 0);
    }

    #[test]
    fn big_unit_wins_ties() {
        // 640 ns is an exact multiple of both units.
        assert_eq!(select_unit(640), (2, TimingUnit::Big));
        // 630 ns is 10 ns below 640 in both units; the multiplier still truncates.
        assert_eq!(select_unit(630), (1, TimingUnit::Big));
    }

    #[test]
    fn ns_conversion_truncates() {
        assert_eq!(us_to_ns(0.0399), 39);
        assert_eq!(us_to_ns(4.0), 4000);
        assert_eq!(us_to_ns(163.0), 163_000);
    }

    #[test]
    fn clamp_handles_non_finite() {
        assert_eq!(clamp_duration_us(f64::NAN), 0.0);
        assert_eq!(clamp_duration_us(f64::INFINITY), MAX_DURATION_US);
        assert_eq!(clamp_duration_us(f64::NEG_INFINITY), 0.0);
        assert_eq!(clamp_duration_us(-1.0), 0.0);
    }

    #[test]
    fn word_accessors_decode_as_the_board_does() {
        let w = encode(4.0);
        assert_eq!(w.unit(), TimingUnit::Little);
        assert_eq!(w.multiplier(), 100);
        assert_eq!(w.effective_ns(), 4000);

        let w = encode(10.0);
        assert_eq!(w.field(), 31 | 0x80);
        assert_eq!(w.unit(), TimingUnit::Big);
        assert_eq!(w.effective_ns(), 9920);
        assert_eq!(w.to_string(), "0x009f0000");
    }
}
