//! Arithmetic handlers: the ADD/SUB/MUL/DIV families plus the miscellaneous
//! single-operand operations (FCHS, FABS, FSQRT, FSCALE, FRNDINT, FXTRACT,
//! FPREM, FPREM1).
//!
//! Every binary form funnels through two drivers, one for memory operands
//! and one for register operands. `swap` selects the operand order so the
//! reversed forms (FSUBR/FDIVR and the ST(i)-destination encodings) share
//! the same body.

use super::{read_operand, MemOp};
use crate::host::{Host, Result};
use crate::state::{X87, SW_C0, SW_C1, SW_C2, SW_C3, SW_IE, SW_ZE};
use crate::Fx80;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Kind {
    Add,
    Sub,
    Mul,
    Div,
}

/// Pre-check invalid cases, then run the precision façade.
///
/// Signaling NaNs are invalid for the whole family. For ADD, opposite-signed
/// infinities are invalid; for SUB (`a - b`), like-signed infinities are.
/// MUL/DIV leave their other invalid cases (0*inf, 0/0, inf/inf) to the
/// kernel's flag word.
fn compute(fpu: &mut X87, kind: Kind, a: Fx80, b: Fx80) -> Fx80 {
    let snan = a.is_signaling_nan() || b.is_signaling_nan();
    let inf_invalid = match kind {
        Kind::Add => a.is_inf() && b.is_inf() && (a.high ^ b.high) & 0x8000 != 0,
        Kind::Sub => a.is_inf() && b.is_inf() && (a.high ^ b.high) & 0x8000 == 0,
        Kind::Mul | Kind::Div => false,
    };
    if snan || inf_invalid {
        fpu.sw |= SW_IE;
        return Fx80::INDEFINITE;
    }

    match kind {
        Kind::Add => fpu.arith_add(a, b),
        Kind::Sub => fpu.arith_sub(a, b),
        Kind::Mul => fpu.arith_mul(a, b),
        Kind::Div => fpu.arith_div(a, b),
    }
}

pub(crate) fn mem<H: Host>(
    fpu: &mut X87,
    host: &mut H,
    modrm: u8,
    w: MemOp,
    swap: bool,
    kind: Kind,
    cycles: u32,
) -> Result<()> {
    let ea = host.ea(modrm, false);
    let result = if fpu.is_st_empty(0) {
        fpu.set_stack_underflow();
        Fx80::INDEFINITE
    } else {
        let m = read_operand(fpu, host, ea, w)?;
        let st0 = fpu.st(0);
        let (a, b) = if swap { (m, st0) } else { (st0, m) };
        compute(fpu, kind, a, b)
    };

    if fpu.check_exceptions(host) {
        fpu.write_stack(0, result, true);
    }

    host.cycles(cycles);
    Ok(())
}

pub(crate) fn reg<H: Host>(
    fpu: &mut X87,
    host: &mut H,
    modrm: u8,
    dest_sti: bool,
    pop: bool,
    swap: bool,
    kind: Kind,
    cycles: u32,
) -> Result<()> {
    let i = (modrm & 7) as usize;
    let result = if fpu.is_st_empty(0) || fpu.is_st_empty(i) {
        fpu.set_stack_underflow();
        Fx80::INDEFINITE
    } else {
        let (st0, sti) = (fpu.st(0), fpu.st(i));
        let (a, b) = if swap { (sti, st0) } else { (st0, sti) };
        compute(fpu, kind, a, b)
    };

    if fpu.check_exceptions(host) {
        fpu.write_stack(if dest_sti { i } else { 0 }, result, true);
        if pop {
            fpu.inc_stack();
        }
    }

    host.cycles(cycles);
    Ok(())
}

pub(crate) fn fchs<H: Host>(fpu: &mut X87, host: &mut H) -> Result<()> {
    let value = if fpu.is_st_empty(0) {
        fpu.set_stack_underflow();
        Fx80::INDEFINITE
    } else {
        fpu.sw &= !SW_C1;
        fpu.st(0).chs()
    };

    if fpu.check_exceptions(host) {
        fpu.write_stack(0, value, false);
    }

    host.cycles(6);
    Ok(())
}

pub(crate) fn fabs<H: Host>(fpu: &mut X87, host: &mut H) -> Result<()> {
    let value = if fpu.is_st_empty(0) {
        fpu.set_stack_underflow();
        Fx80::INDEFINITE
    } else {
        fpu.sw &= !SW_C1;
        fpu.st(0).abs()
    };

    if fpu.check_exceptions(host) {
        fpu.write_stack(0, value, false);
    }

    host.cycles(6);
    Ok(())
}

pub(crate) fn fsqrt<H: Host>(fpu: &mut X87, host: &mut H) -> Result<()> {
    let result = if fpu.is_st_empty(0) {
        fpu.set_stack_underflow();
        Fx80::INDEFINITE
    } else {
        let value = fpu.st(0);
        if (!value.is_zero() && value.is_sign_negative()) || value.is_denormal() {
            fpu.sw |= SW_IE;
            Fx80::INDEFINITE
        } else {
            fpu.fp.sqrt(value)
        }
    };

    if fpu.check_exceptions(host) {
        fpu.write_stack(0, result, true);
    }

    host.cycles(8);
    Ok(())
}

pub(crate) fn fscale<H: Host>(fpu: &mut X87, host: &mut H) -> Result<()> {
    let value = if fpu.is_st_empty(0) || fpu.is_st_empty(1) {
        fpu.set_stack_underflow();
        Fx80::INDEFINITE
    } else {
        fpu.sw &= !SW_C1;
        let (st0, st1) = (fpu.st(0), fpu.st(1));
        fpu.fp.scale(st0, st1)
    };

    if fpu.check_exceptions(host) {
        fpu.write_stack(0, value, false);
    }

    host.cycles(31);
    Ok(())
}

pub(crate) fn frndint<H: Host>(fpu: &mut X87, host: &mut H) -> Result<()> {
    let value = if fpu.is_st_empty(0) {
        fpu.set_stack_underflow();
        Fx80::INDEFINITE
    } else {
        fpu.sw &= !SW_C1;
        let st0 = fpu.st(0);
        fpu.fp.round_to_int(st0)
    };

    if fpu.check_exceptions(host) {
        fpu.write_stack(0, value, true);
    }

    host.cycles(21);
    Ok(())
}

/// Split ST(0) into significand and unbiased exponent, pushing the
/// significand over the exponent.
pub(crate) fn fxtract<H: Host>(fpu: &mut X87, host: &mut H) -> Result<()> {
    let (sig80, exp80) = if fpu.is_st_empty(0) {
        fpu.set_stack_underflow();
        (Fx80::INDEFINITE, Fx80::INDEFINITE)
    } else if !fpu.is_st_empty(7) {
        fpu.set_stack_overflow();
        (Fx80::INDEFINITE, Fx80::INDEFINITE)
    } else {
        let value = fpu.st(0);
        if value.is_zero() {
            fpu.sw |= SW_ZE;
            (Fx80::ZERO, Fx80::NEG_INF)
        } else {
            let exp = fpu.fp.from_i64(value.exponent() as i64 - 0x3FFF);
            // Same significand, true exponent forced to zero.
            let sig = Fx80::new((value.high & 0x8000) | 0x3FFF, value.low);
            (sig, exp)
        }
    };

    if fpu.check_exceptions(host) {
        fpu.write_stack(0, exp80, true);
        fpu.dec_stack();
        fpu.write_stack(0, sig80, true);
    }

    host.cycles(21);
    Ok(())
}

/// One step of the partial remainder reduction shared by FPREM and FPREM1;
/// only the quotient rounding differs.
fn partial_remainder(fpu: &mut X87, nearest: bool) -> Fx80 {
    let a0 = fpu.st(0);
    let b1 = fpu.st(1);

    fpu.sw &= !SW_C2;

    let d = (a0.high & 0x7FFF) as i32 - (b1.high & 0x7FFF) as i32;
    if d < 64 {
        let t = fpu.fp.div_ext(a0, b1);
        let q = if nearest {
            let rounded = {
                let saved = fpu.fp.rounding();
                fpu.fp
                    .set_rounding(rustc_apfloat::Round::NearestTiesToEven);
                let r = fpu.fp.round_to_int(t);
                fpu.fp.set_rounding(saved);
                r
            };
            fpu.fp.to_i64_trunc(rounded)
        } else {
            fpu.fp.to_i64_trunc(t)
        };
        let qf = fpu.fp.from_i64(q);
        let tt = fpu.fp.mul_ext(b1, qf);
        let result = fpu.fp.sub_ext(a0, tt);

        fpu.sw &= !(SW_C0 | SW_C3 | SW_C1);
        let q = q.unsigned_abs();
        if q & 1 != 0 {
            fpu.sw |= SW_C1;
        }
        if q & 2 != 0 {
            fpu.sw |= SW_C3;
        }
        if q & 4 != 0 {
            fpu.sw |= SW_C0;
        }
        result
    } else {
        // Reduction incomplete: scale one chunk of 2^(d-63) quotient bits out.
        fpu.sw |= SW_C2;
        let ef = Fx80::new((0x3FFF + (d - 63)).min(0x7FFE) as u16, 0x8000_0000_0000_0000);
        let t = fpu.fp.div_ext(a0, b1);
        let td = fpu.fp.div_ext(t, ef);
        let qq = fpu.fp.to_i64_trunc(td);
        let qqf = fpu.fp.from_i64(qq);
        let tt = fpu.fp.mul_ext(b1, qqf);
        let ttt = fpu.fp.mul_ext(tt, ef);
        fpu.fp.sub_ext(a0, ttt)
    }
}

pub(crate) fn fprem<H: Host>(fpu: &mut X87, host: &mut H) -> Result<()> {
    let result = if fpu.is_st_empty(0) || fpu.is_st_empty(1) {
        fpu.set_stack_underflow();
        Fx80::INDEFINITE
    } else {
        partial_remainder(fpu, false)
    };

    if fpu.check_exceptions(host) {
        fpu.write_stack(0, result, true);
    }

    host.cycles(84);
    Ok(())
}

pub(crate) fn fprem1<H: Host>(fpu: &mut X87, host: &mut H) -> Result<()> {
    let result = if fpu.is_st_empty(0) || fpu.is_st_empty(1) {
        fpu.set_stack_underflow();
        Fx80::INDEFINITE
    } else {
        partial_remainder(fpu, true)
    };

    if fpu.check_exceptions(host) {
        fpu.write_stack(0, result, true);
    }

    host.cycles(94);
    Ok(())
}
