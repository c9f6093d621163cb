//! Transcendental handlers.
//!
//! These run through the double-precision fallback: the operand drops to
//! f64, the host's libm does the work, and the result widens back to
//! extended. The final multiply for the FYL2X forms stays in extended
//! precision. C2 is always cleared by the trigonometric group since the
//! fallback cannot prove domain reduction.

use crate::host::{Host, Result};
use crate::state::{X87, SW_C2, SW_IE};
use crate::Fx80;

pub(crate) fn f2xm1<H: Host>(fpu: &mut X87, host: &mut H) -> Result<()> {
    let result = if fpu.is_st_empty(0) {
        fpu.set_stack_underflow();
        Fx80::INDEFINITE
    } else {
        let st0 = fpu.st(0);
        let x = fpu.fp.to_f64_lossy(st0);
        fpu.fp.from_f64(x.exp2() - 1.0)
    };

    if fpu.check_exceptions(host) {
        fpu.write_stack(0, result, true);
    }

    host.cycles(242);
    Ok(())
}

pub(crate) fn fyl2x<H: Host>(fpu: &mut X87, host: &mut H) -> Result<()> {
    let result = if fpu.is_st_empty(0) || fpu.is_st_empty(1) {
        fpu.set_stack_underflow();
        Fx80::INDEFINITE
    } else {
        let x = fpu.st(0);
        let y = fpu.st(1);

        if x.is_zero() || x.is_sign_negative() {
            fpu.sw |= SW_IE;
            Fx80::INDEFINITE
        } else {
            let l2x = fpu.fp.to_f64_lossy(x).log2();
            let l2x = fpu.fp.from_f64(l2x);
            fpu.fp.mul_ext(l2x, y)
        }
    };

    if fpu.check_exceptions(host) {
        fpu.write_stack(1, result, true);
        fpu.inc_stack();
    }

    host.cycles(250);
    Ok(())
}

pub(crate) fn fyl2xp1<H: Host>(fpu: &mut X87, host: &mut H) -> Result<()> {
    let result = if fpu.is_st_empty(0) || fpu.is_st_empty(1) {
        fpu.set_stack_underflow();
        Fx80::INDEFINITE
    } else {
        let x = fpu.st(0);
        let y = fpu.st(1);

        let l2x1 = (fpu.fp.to_f64_lossy(x) + 1.0).log2();
        let l2x1 = fpu.fp.from_f64(l2x1);
        fpu.fp.mul_ext(l2x1, y)
    };

    if fpu.check_exceptions(host) {
        fpu.write_stack(1, result, true);
        fpu.inc_stack();
    }

    host.cycles(313);
    Ok(())
}

pub(crate) fn fptan<H: Host>(fpu: &mut X87, host: &mut H) -> Result<()> {
    let (result1, result2) = if fpu.is_st_empty(0) {
        fpu.set_stack_underflow();
        (Fx80::INDEFINITE, Fx80::INDEFINITE)
    } else if !fpu.is_st_empty(7) {
        fpu.set_stack_overflow();
        (Fx80::INDEFINITE, Fx80::INDEFINITE)
    } else {
        let st0 = fpu.st(0);
        let x = fpu.fp.to_f64_lossy(st0).tan();
        fpu.sw &= !SW_C2;
        (fpu.fp.from_f64(x), Fx80::ONE)
    };

    if fpu.check_exceptions(host) {
        fpu.write_stack(0, result1, true);
        fpu.dec_stack();
        fpu.write_stack(0, result2, true);
    }

    host.cycles(244);
    Ok(())
}

pub(crate) fn fpatan<H: Host>(fpu: &mut X87, host: &mut H) -> Result<()> {
    let result = if fpu.is_st_empty(0) || fpu.is_st_empty(1) {
        fpu.set_stack_underflow();
        Fx80::INDEFINITE
    } else {
        let st0 = fpu.st(0);
        let st1 = fpu.st(1);
        let val = fpu.fp.to_f64_lossy(st1).atan2(fpu.fp.to_f64_lossy(st0));
        fpu.fp.from_f64(val)
    };

    if fpu.check_exceptions(host) {
        fpu.write_stack(1, result, true);
        fpu.inc_stack();
    }

    host.cycles(289);
    Ok(())
}

pub(crate) fn fsin<H: Host>(fpu: &mut X87, host: &mut H) -> Result<()> {
    let result = if fpu.is_st_empty(0) {
        fpu.set_stack_underflow();
        Fx80::INDEFINITE
    } else {
        let st0 = fpu.st(0);
        let x = fpu.fp.to_f64_lossy(st0).sin();
        fpu.sw &= !SW_C2;
        fpu.fp.from_f64(x)
    };

    if fpu.check_exceptions(host) {
        fpu.write_stack(0, result, true);
    }

    host.cycles(241);
    Ok(())
}

pub(crate) fn fcos<H: Host>(fpu: &mut X87, host: &mut H) -> Result<()> {
    let result = if fpu.is_st_empty(0) {
        fpu.set_stack_underflow();
        Fx80::INDEFINITE
    } else {
        let st0 = fpu.st(0);
        let x = fpu.fp.to_f64_lossy(st0).cos();
        fpu.sw &= !SW_C2;
        fpu.fp.from_f64(x)
    };

    if fpu.check_exceptions(host) {
        fpu.write_stack(0, result, true);
    }

    host.cycles(241);
    Ok(())
}

pub(crate) fn fsincos<H: Host>(fpu: &mut X87, host: &mut H) -> Result<()> {
    let (s_result, c_result) = if fpu.is_st_empty(0) {
        fpu.set_stack_underflow();
        (Fx80::INDEFINITE, Fx80::INDEFINITE)
    } else if !fpu.is_st_empty(7) {
        fpu.set_stack_overflow();
        (Fx80::INDEFINITE, Fx80::INDEFINITE)
    } else {
        let st0 = fpu.st(0);
        let x = fpu.fp.to_f64_lossy(st0);
        fpu.sw &= !SW_C2;
        (fpu.fp.from_f64(x.sin()), fpu.fp.from_f64(x.cos()))
    };

    if fpu.check_exceptions(host) {
        fpu.write_stack(0, s_result, true);
        fpu.dec_stack();
        fpu.write_stack(0, c_result, true);
    }

    host.cycles(291);
    Ok(())
}
