//! Comparison handlers.
//!
//! The classical compares write {C3, C2, C0}; the `*I` forms write the host
//! ZF/PF/CF directly with the same truth table. Ordered compares treat any
//! NaN as invalid; the unordered (`FUCOM*`) forms only object to signaling
//! NaNs.

use core::cmp::Ordering;

use super::{read_operand, MemOp};
use crate::host::{Host, Result};
use crate::state::{X87, SW_C0, SW_C1, SW_C2, SW_C3, SW_IE};
use crate::Fx80;

/// Write the condition codes for `ST(0) cmp op`, latching IE per the
/// compare flavor.
fn codes(fpu: &mut X87, a: Fx80, b: Fx80, quiet: bool) {
    if a.is_nan() || b.is_nan() {
        fpu.set_compare_codes(false, false, true);
        if !quiet || a.is_signaling_nan() || b.is_signaling_nan() {
            fpu.sw |= SW_IE;
        }
    } else {
        let ord = fpu.fp.cmp(a, b);
        fpu.set_compare_codes(ord == Some(Ordering::Equal), ord == Some(Ordering::Less), false);
    }
}

pub(crate) fn com_mem<H: Host>(
    fpu: &mut X87,
    host: &mut H,
    modrm: u8,
    w: MemOp,
    pop: bool,
    cycles: u32,
) -> Result<()> {
    let ea = host.ea(modrm, false);
    if fpu.is_st_empty(0) {
        fpu.set_stack_underflow();
        fpu.sw |= SW_C3 | SW_C2 | SW_C0;
    } else {
        let b = read_operand(fpu, host, ea, w)?;
        let a = fpu.st(0);
        codes(fpu, a, b, false);
    }

    let ok = fpu.check_exceptions(host);
    if ok && pop {
        fpu.inc_stack();
    }

    host.cycles(cycles);
    Ok(())
}

pub(crate) fn com_st<H: Host>(
    fpu: &mut X87,
    host: &mut H,
    modrm: u8,
    fixed_st1: bool,
    pops: u8,
    quiet: bool,
    cycles: u32,
) -> Result<()> {
    let i = if fixed_st1 { 1 } else { (modrm & 7) as usize };

    if fpu.is_st_empty(0) || fpu.is_st_empty(i) {
        fpu.set_stack_underflow();
        fpu.sw |= SW_C3 | SW_C2 | SW_C0;
    } else {
        let (a, b) = (fpu.st(0), fpu.st(i));
        codes(fpu, a, b, quiet);
    }

    if fpu.check_exceptions(host) {
        for _ in 0..pops {
            fpu.inc_stack();
        }
    }

    host.cycles(cycles);
    Ok(())
}

/// FCOMI/FUCOMI: same truth table, written to the host flags.
pub(crate) fn comi<H: Host>(
    fpu: &mut X87,
    host: &mut H,
    modrm: u8,
    quiet: bool,
    pop: bool,
) -> Result<()> {
    let i = (modrm & 7) as usize;

    if fpu.is_st_empty(0) || fpu.is_st_empty(i) {
        fpu.set_stack_underflow();
        host.set_zf(true);
        host.set_pf(true);
        host.set_cf(true);
    } else {
        fpu.sw &= !SW_C1;
        let (a, b) = (fpu.st(0), fpu.st(i));

        if a.is_nan() || b.is_nan() {
            host.set_zf(true);
            host.set_pf(true);
            host.set_cf(true);
            if !quiet || a.is_signaling_nan() || b.is_signaling_nan() {
                fpu.sw |= SW_IE;
            }
        } else {
            let ord = fpu.fp.cmp(a, b);
            host.set_zf(ord == Some(Ordering::Equal));
            host.set_pf(false);
            host.set_cf(ord == Some(Ordering::Less));
        }
    }

    let ok = fpu.check_exceptions(host);
    if ok && pop {
        fpu.inc_stack();
    }

    host.cycles(4);
    Ok(())
}

pub(crate) fn ftst<H: Host>(fpu: &mut X87, host: &mut H) -> Result<()> {
    if fpu.is_st_empty(0) {
        fpu.set_stack_underflow();
        fpu.sw |= SW_C3 | SW_C2 | SW_C0;
    } else {
        let a = fpu.st(0);
        if a.is_nan() {
            fpu.set_compare_codes(false, false, true);
            fpu.sw |= SW_IE;
        } else {
            let ord = fpu.fp.cmp(a, Fx80::ZERO);
            fpu.set_compare_codes(ord == Some(Ordering::Equal), ord == Some(Ordering::Less), false);
        }
    }

    fpu.check_exceptions(host);

    host.cycles(4);
    Ok(())
}

/// Classify ST(0) into the architectural (C3, C2, C0) encoding, with C1
/// reflecting the sign.
pub(crate) fn fxam<H: Host>(fpu: &mut X87, host: &mut H) -> Result<()> {
    let value = fpu.st(0);

    fpu.sw &= !(SW_C3 | SW_C2 | SW_C1 | SW_C0);

    if fpu.is_st_empty(0) {
        fpu.sw |= SW_C3 | SW_C0;
    } else if value.is_nan() {
        fpu.sw |= SW_C0;
    } else if value.is_inf() {
        fpu.sw |= SW_C2 | SW_C0;
    } else if value.is_zero() {
        fpu.sw |= SW_C3;
    } else if value.is_denormal() {
        fpu.sw |= SW_C3 | SW_C2;
    } else if value.low & 0x8000_0000_0000_0000 == 0 {
        // Unnormal: nonzero exponent with a clear integer bit. Unsupported
        // on 387 and later; all three bits stay clear.
    } else {
        fpu.sw |= SW_C2;
    }

    if value.high & 0x8000 != 0 {
        fpu.sw |= SW_C1;
    }

    host.cycles(8);
    Ok(())
}
