//! Load and store handlers, constant loads, and the FCMOVcc family.
//!
//! Loads read their memory operand before touching the stack so a faulting
//! access leaves the register file and TOP unmodified; the push happens only
//! once the operand is in hand. Stores stage everything in locals, convert as
//! part of the compute step, and only touch memory and the stack on a clean
//! exception check.

use super::{read_operand, MemOp};
use crate::bcd;
use crate::host::{Host, Result};
use crate::state::{Tag, X87, SW_C1, SW_IE};
use crate::Fx80;

// --- real loads -----------------------------------------------------------

fn f32_is_signaling_nan(bits: u32) -> bool {
    (bits >> 23) & 0xFF == 0xFF && bits & 0x007F_FFFF != 0 && bits & 0x0040_0000 == 0
}

fn f32_is_denormal(bits: u32) -> bool {
    (bits >> 23) & 0xFF == 0 && bits & 0x007F_FFFF != 0
}

fn f64_is_signaling_nan(bits: u64) -> bool {
    (bits >> 52) & 0x7FF == 0x7FF
        && bits & 0x000F_FFFF_FFFF_FFFF != 0
        && bits & 0x0008_0000_0000_0000 == 0
}

fn f64_is_denormal(bits: u64) -> bool {
    (bits >> 52) & 0x7FF == 0 && bits & 0x000F_FFFF_FFFF_FFFF != 0
}

pub(crate) fn fld_m32<H: Host>(fpu: &mut X87, host: &mut H, modrm: u8) -> Result<()> {
    let ea = host.ea(modrm, false);
    let bits = host.read_u32(ea)?;

    let value = if fpu.dec_stack() {
        fpu.sw &= !SW_C1;
        if f32_is_signaling_nan(bits) || f32_is_denormal(bits) {
            fpu.sw |= SW_IE;
            Fx80::INDEFINITE
        } else {
            fpu.fp.f32_to_ext(bits)
        }
    } else {
        Fx80::INDEFINITE
    };

    if fpu.check_exceptions(host) {
        fpu.write_stack(0, value, true);
    }

    host.cycles(3);
    Ok(())
}

pub(crate) fn fld_m64<H: Host>(fpu: &mut X87, host: &mut H, modrm: u8) -> Result<()> {
    let ea = host.ea(modrm, false);
    let bits = host.read_u64(ea)?;

    let value = if fpu.dec_stack() {
        fpu.sw &= !SW_C1;
        if f64_is_signaling_nan(bits) || f64_is_denormal(bits) {
            fpu.sw |= SW_IE;
            Fx80::INDEFINITE
        } else {
            fpu.fp.f64_to_ext(bits)
        }
    } else {
        Fx80::INDEFINITE
    };

    if fpu.check_exceptions(host) {
        fpu.write_stack(0, value, true);
    }

    host.cycles(3);
    Ok(())
}

pub(crate) fn fld_m80<H: Host>(fpu: &mut X87, host: &mut H, modrm: u8) -> Result<()> {
    let ea = host.ea(modrm, false);
    let raw = host.read_f80(ea)?;

    let value = if fpu.dec_stack() {
        fpu.sw &= !SW_C1;
        raw
    } else {
        Fx80::INDEFINITE
    };

    if fpu.check_exceptions(host) {
        fpu.write_stack(0, value, true);
    }

    host.cycles(6);
    Ok(())
}

pub(crate) fn fld_sti<H: Host>(fpu: &mut X87, host: &mut H, modrm: u8) -> Result<()> {
    let value = if fpu.dec_stack() {
        fpu.sw &= !SW_C1;
        // TOP has already moved, so the source sits one slot further down.
        fpu.st(((modrm as usize) + 1) & 7)
    } else {
        Fx80::INDEFINITE
    };

    if fpu.check_exceptions(host) {
        fpu.write_stack(0, value, true);
    }

    host.cycles(4);
    Ok(())
}

// --- integer loads --------------------------------------------------------

pub(crate) fn fild<H: Host>(
    fpu: &mut X87,
    host: &mut H,
    modrm: u8,
    w: MemOp,
    cycles: u32,
) -> Result<()> {
    let ea = host.ea(modrm, false);
    let m = read_operand(fpu, host, ea, w)?;

    let value = if fpu.dec_stack() {
        fpu.sw &= !SW_C1;
        m
    } else {
        Fx80::INDEFINITE
    };

    if fpu.check_exceptions(host) {
        fpu.write_stack(0, value, true);
    }

    host.cycles(cycles);
    Ok(())
}

pub(crate) fn fild_m64<H: Host>(fpu: &mut X87, host: &mut H, modrm: u8) -> Result<()> {
    let ea = host.ea(modrm, false);
    let m = host.read_u64(ea)? as i64;

    let value = if fpu.dec_stack() {
        fpu.sw &= !SW_C1;
        fpu.fp.from_i64(m)
    } else {
        Fx80::INDEFINITE
    };

    if fpu.check_exceptions(host) {
        fpu.write_stack(0, value, true);
    }

    host.cycles(10);
    Ok(())
}

pub(crate) fn fbld<H: Host>(fpu: &mut X87, host: &mut H, modrm: u8) -> Result<()> {
    let ea = host.ea(modrm, false);
    let raw = host.read_f80(ea)?;

    let value = if fpu.dec_stack() {
        fpu.sw &= !SW_C1;
        let (magnitude, negative) = bcd::unpack(raw);
        let mut value = fpu.fp.from_i64(magnitude as i64);
        if negative {
            value.high |= 0x8000;
        }
        value
    } else {
        Fx80::INDEFINITE
    };

    if fpu.check_exceptions(host) {
        fpu.write_stack(0, value, true);
    }

    host.cycles(75);
    Ok(())
}

// --- stores ---------------------------------------------------------------

pub(crate) fn fst_real<H: Host>(
    fpu: &mut X87,
    host: &mut H,
    modrm: u8,
    wide: bool,
    pop: bool,
    cycles: u32,
) -> Result<()> {
    let ea = host.ea(modrm, true);
    let value = if fpu.is_st_empty(0) {
        fpu.set_stack_underflow();
        Fx80::INDEFINITE
    } else {
        fpu.sw &= !SW_C1;
        fpu.st(0)
    };

    // Narrowing is part of the compute step; its flags gate the commit.
    let bits64;
    let bits32;
    if wide {
        bits64 = fpu.fp.ext_to_f64(value);
        bits32 = 0;
    } else {
        bits32 = fpu.fp.ext_to_f32(value);
        bits64 = 0;
    }

    if fpu.check_exceptions(host) {
        if wide {
            host.write_u64(ea, bits64)?;
        } else {
            host.write_u32(ea, bits32)?;
        }
        if pop {
            fpu.inc_stack();
        }
    }

    host.cycles(cycles);
    Ok(())
}

pub(crate) fn fstp_m80<H: Host>(fpu: &mut X87, host: &mut H, modrm: u8) -> Result<()> {
    let value = if fpu.is_st_empty(0) {
        fpu.set_stack_underflow();
        Fx80::INDEFINITE
    } else {
        fpu.sw &= !SW_C1;
        fpu.st(0)
    };

    let ea = host.ea(modrm, true);
    if fpu.check_exceptions(host) {
        host.write_f80(ea, value)?;
        fpu.inc_stack();
    }

    host.cycles(6);
    Ok(())
}

pub(crate) fn fst_sti<H: Host>(fpu: &mut X87, host: &mut H, modrm: u8, pop: bool) -> Result<()> {
    let i = (modrm & 7) as usize;
    let value = if fpu.is_st_empty(0) {
        fpu.set_stack_underflow();
        Fx80::INDEFINITE
    } else {
        fpu.sw &= !SW_C1;
        fpu.st(0)
    };

    if fpu.check_exceptions(host) {
        fpu.write_stack(i, value, true);
        if pop {
            fpu.inc_stack();
        }
    }

    host.cycles(3);
    Ok(())
}

#[derive(Clone, Copy, Debug)]
pub(crate) enum IntWidth {
    W16,
    W32,
    W64,
}

impl IntWidth {
    fn limits(self) -> (i64, i64) {
        match self {
            IntWidth::W16 => (i16::MIN as i64, i16::MAX as i64),
            IntWidth::W32 => (i32::MIN as i64, i32::MAX as i64),
            IntWidth::W64 => (i64::MIN, i64::MAX),
        }
    }

    /// The "integer indefinite" pattern for the width.
    fn indefinite(self) -> i64 {
        match self {
            IntWidth::W16 => i16::MIN as i64,
            IntWidth::W32 => i32::MIN as i64,
            IntWidth::W64 => i64::MIN,
        }
    }
}

pub(crate) fn fist<H: Host>(
    fpu: &mut X87,
    host: &mut H,
    modrm: u8,
    width: IntWidth,
    pop: bool,
    cycles: u32,
) -> Result<()> {
    let ea = host.ea(modrm, true);
    let value = if fpu.is_st_empty(0) {
        fpu.set_stack_underflow();
        width.indefinite()
    } else {
        let st0 = fpu.st(0);
        let rounded = fpu.fp.round_to_int(st0);
        fpu.sw &= !SW_C1;

        let (lo, hi) = width.limits();
        let lo = fpu.fp.from_i64(lo);
        let hi = fpu.fp.from_i64(hi);
        use core::cmp::Ordering::*;
        let in_range = matches!(fpu.fp.cmp(rounded, lo), Some(Greater | Equal))
            && matches!(fpu.fp.cmp(rounded, hi), Some(Less | Equal));
        if in_range {
            fpu.fp.to_i64(rounded)
        } else {
            fpu.sw |= SW_IE;
            width.indefinite()
        }
    };

    if fpu.check_exceptions(host) {
        match width {
            IntWidth::W16 => host.write_u16(ea, value as u16)?,
            IntWidth::W32 => host.write_u32(ea, value as u32)?,
            IntWidth::W64 => host.write_u64(ea, value as u64)?,
        }
        if pop {
            fpu.inc_stack();
        }
    }

    host.cycles(cycles);
    Ok(())
}

pub(crate) fn fbstp<H: Host>(fpu: &mut X87, host: &mut H, modrm: u8) -> Result<()> {
    let image = if fpu.is_st_empty(0) {
        fpu.set_stack_underflow();
        Fx80::INDEFINITE
    } else {
        let st0 = fpu.st(0);
        let magnitude = fpu.fp.to_i64_trunc(st0.abs()).max(0) as u64;
        bcd::pack(magnitude, st0.is_sign_negative())
    };

    let ea = host.ea(modrm, true);
    if fpu.check_exceptions(host) {
        host.write_f80(ea, image)?;
        fpu.inc_stack();
    }

    host.cycles(175);
    Ok(())
}

// --- constant loads -------------------------------------------------------

const RC_NEAREST: u16 = 0;
const RC_UP: u16 = 2;

pub(crate) fn const_one(_rc: u16) -> Fx80 {
    Fx80::ONE
}

pub(crate) fn const_zero(_rc: u16) -> Fx80 {
    Fx80::ZERO
}

pub(crate) fn const_l2t(rc: u16) -> Fx80 {
    // log2(10); only round-up takes the incremented mantissa.
    Fx80::new(
        0x4000,
        if rc == RC_UP {
            0xD49A_784B_CD1B_8AFF
        } else {
            0xD49A_784B_CD1B_8AFE
        },
    )
}

pub(crate) fn const_l2e(rc: u16) -> Fx80 {
    // log2(e)
    Fx80::new(
        0x3FFF,
        if rc == RC_UP || rc == RC_NEAREST {
            0xB8AA_3B29_5C17_F0BC
        } else {
            0xB8AA_3B29_5C17_F0BB
        },
    )
}

pub(crate) fn const_pi(rc: u16) -> Fx80 {
    Fx80::new(
        0x4000,
        if rc == RC_UP || rc == RC_NEAREST {
            0xC90F_DAA2_2168_C235
        } else {
            0xC90F_DAA2_2168_C234
        },
    )
}

pub(crate) fn const_lg2(rc: u16) -> Fx80 {
    // log10(2)
    Fx80::new(
        0x3FFD,
        if rc == RC_UP || rc == RC_NEAREST {
            0x9A20_9A84_FBCF_F799
        } else {
            0x9A20_9A84_FBCF_F798
        },
    )
}

pub(crate) fn const_ln2(rc: u16) -> Fx80 {
    Fx80::new(
        0x3FFE,
        if rc == RC_UP || rc == RC_NEAREST {
            0xB172_17F7_D1CF_79AC
        } else {
            0xB172_17F7_D1CF_79AB
        },
    )
}

/// Push a ROM constant. The tag is preset rather than derived because the
/// failed-push path substitutes the indefinite NaN.
pub(crate) fn fld_const<H: Host>(
    fpu: &mut X87,
    host: &mut H,
    pick: fn(u16) -> Fx80,
    tag: Tag,
    cycles: u32,
) -> Result<()> {
    let rc = (fpu.cw >> 10) & 3;
    let (value, tag) = if fpu.dec_stack() {
        fpu.sw &= !SW_C1;
        (pick(rc), tag)
    } else {
        (Fx80::INDEFINITE, Tag::Special)
    };

    if fpu.check_exceptions(host) {
        let phys = fpu.phys(0);
        fpu.set_tag(phys, tag);
        fpu.write_stack(0, value, false);
    }

    host.cycles(cycles);
    Ok(())
}

// --- conditional moves ----------------------------------------------------

#[derive(Clone, Copy, Debug)]
pub(crate) enum Cond {
    B,
    E,
    Be,
    U,
    Nb,
    Ne,
    Nbe,
    Nu,
}

impl Cond {
    fn holds<H: Host>(self, host: &H) -> bool {
        match self {
            Cond::B => host.cf(),
            Cond::E => host.zf(),
            Cond::Be => host.cf() || host.zf(),
            Cond::U => host.pf(),
            Cond::Nb => !host.cf(),
            Cond::Ne => !host.zf(),
            Cond::Nbe => !host.cf() && !host.zf(),
            Cond::Nu => !host.pf(),
        }
    }
}

/// Copy ST(i) to ST(0) when the flag condition holds; a failed condition is
/// a complete no-op (no tag change, no exception).
pub(crate) fn cmov<H: Host>(fpu: &mut X87, host: &mut H, modrm: u8, cond: Cond) -> Result<()> {
    let i = (modrm & 7) as usize;

    if cond.holds(host) {
        let result = if fpu.is_st_empty(i) {
            fpu.set_stack_underflow();
            Fx80::INDEFINITE
        } else {
            fpu.st(i)
        };

        if fpu.check_exceptions(host) {
            fpu.write_stack(0, result, true);
        }
    }

    host.cycles(4);
    Ok(())
}
