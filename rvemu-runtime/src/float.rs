//! Floating-point helpers with RISC-V semantics
//!
//! Host arithmetic supplies the IEEE results. The helpers here cover the
//! places where RISC-V pins down behaviour the host leaves open: NaN
//! handling in min/max, classification, and saturating float to integer
//! conversion under an explicit rounding mode.

/// Canonical double-precision NaN.
pub const CANONICAL_NAN_F64: u64 = 0x7ff8_0000_0000_0000;

/// Rounding modes as encoded in `rm` / `frm`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rounding {
    /// Round to nearest, ties to even
    Rne,
    /// Round towards zero
    Rtz,
    /// Round down
    Rdn,
    /// Round up
    Rup,
    /// Round to nearest, ties to max magnitude
    Rmm,
}

impl Rounding {
    /// Effective rounding mode: `rm` 7 selects `frm`. Reserved values give
    /// `None`.
    pub fn resolve(rm: u8, frm: u8) -> Option<Self> {
        let rm = if rm == 7 { frm } else { rm };
        match rm {
            0 => Some(Rounding::Rne),
            1 => Some(Rounding::Rtz),
            2 => Some(Rounding::Rdn),
            3 => Some(Rounding::Rup),
            4 => Some(Rounding::Rmm),
            _ => None,
        }
    }

    /// Round to an integral value.
    pub fn round(self, x: f64) -> f64 {
        match self {
            Rounding::Rne => {
                let r = x.round();
                if (x - x.trunc()).abs() == 0.5 {
                    2.0 * (x / 2.0).round()
                } else {
                    r
                }
            }
            Rounding::Rtz => x.trunc(),
            Rounding::Rdn => x.floor(),
            Rounding::Rup => x.ceil(),
            Rounding::Rmm => x.round(),
        }
    }
}

/// `fmin`: a NaN operand yields the other operand, `-0.0 < +0.0`.
pub fn fmin(a: f64, b: f64) -> f64 {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => f64::from_bits(CANONICAL_NAN_F64),
        (true, false) => b,
        (false, true) => a,
        _ if a == b => {
            if a.is_sign_negative() {
                a
            } else {
                b
            }
        }
        _ => a.min(b),
    }
}

/// `fmax`: a NaN operand yields the other operand, `+0.0 > -0.0`.
pub fn fmax(a: f64, b: f64) -> f64 {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => f64::from_bits(CANONICAL_NAN_F64),
        (true, false) => b,
        (false, true) => a,
        _ if a == b => {
            if a.is_sign_positive() {
                a
            } else {
                b
            }
        }
        _ => a.max(b),
    }
}

fn classify(negative: bool, exp_zero: bool, exp_max: bool, frac_zero: bool, quiet: bool) -> u64 {
    let bit = match (exp_max, exp_zero, frac_zero) {
        (true, _, true) => {
            if negative {
                0
            } else {
                7
            }
        }
        (true, _, false) => {
            if quiet {
                9
            } else {
                8
            }
        }
        (false, true, true) => {
            if negative {
                3
            } else {
                4
            }
        }
        (false, true, false) => {
            if negative {
                2
            } else {
                5
            }
        }
        (false, false, _) => {
            if negative {
                1
            } else {
                6
            }
        }
    };
    1 << bit
}

/// `fclass.s` result mask.
pub fn fclass32(bits: u32) -> u64 {
    let exp = (bits >> 23) & 0xff;
    let frac = bits & 0x7f_ffff;
    classify(bits >> 31 != 0, exp == 0, exp == 0xff, frac == 0, frac & 0x40_0000 != 0)
}

/// `fclass.d` result mask.
pub fn fclass64(bits: u64) -> u64 {
    let exp = (bits >> 52) & 0x7ff;
    let frac = bits & 0x000f_ffff_ffff_ffff;
    classify(bits >> 63 != 0, exp == 0, exp == 0x7ff, frac == 0, frac & 0x0008_0000_0000_0000 != 0)
}

/// Float to signed integer in `[min, max]`; NaN saturates to `max`.
pub fn to_signed(x: f64, rm: Rounding, min: i64, max: i64) -> i64 {
    if x.is_nan() {
        return max;
    }
    let r = rm.round(x);
    if r <= min as f64 {
        min
    } else if r >= max as f64 {
        max
    } else {
        r as i64
    }
}

/// Float to unsigned integer in `[0, max]`; NaN saturates to `max`.
pub fn to_unsigned(x: f64, rm: Rounding, max: u64) -> u64 {
    if x.is_nan() {
        return max;
    }
    let r = rm.round(x);
    if r <= 0.0 {
        0
    } else if r >= max as f64 {
        max
    } else {
        r as u64
    }
}
