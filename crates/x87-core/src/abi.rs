//! Host-cooperation bypass surface.
//!
//! A host emulator whose own x87 is trustworthy can short-circuit coarse
//! control operations against this table instead of feeding opcodes through
//! the decoder. The operations take the FPU context explicitly; semantics
//! match the corresponding in-core handlers, minus trap delivery (there is
//! no host on this path, so unmasked exceptions only latch in SW).
//!
//! `fsave`/`frstor` here use the bypass image: a 6-byte CW/SW/TW header
//! followed by the eight registers, 86 bytes total. Buffers shorter than
//! that are a caller bug and panic on the slice bounds.

use crate::softfp::SoftFp;
use crate::state::X87;
use crate::Fx80;

/// Length of the bypass save image.
pub const SAVE_IMAGE_LEN: usize = 6 + 8 * 10;

/// Function table handed to the host. `#[repr(C)]` so a foreign host can
/// hold it as a plain struct of code pointers.
#[repr(C)]
pub struct X87FunctionTable {
    pub fldcw: fn(&mut X87, u16),
    pub wait: fn(&mut X87),
    pub fninit: fn(&mut X87),
    pub fstcw: fn(&X87) -> u16,
    pub fstsw: fn(&X87) -> u16,
    pub frndint: fn(&mut X87),
    pub fclex: fn(&mut X87),
    pub fsave: fn(&X87, &mut [u8]),
    pub frstor: fn(&mut X87, &[u8]),
    pub fistp: fn(&mut X87, u16) -> u32,
}

pub fn load_x87_functions() -> X87FunctionTable {
    X87FunctionTable {
        fldcw,
        wait,
        fninit,
        fstcw,
        fstsw,
        frndint,
        fclex,
        fsave,
        frstor,
        fistp,
    }
}

pub fn fldcw(fpu: &mut X87, cw: u16) {
    fpu.write_cw(cw);
    let _ = fpu.flush_flags();
}

pub fn wait(_fpu: &mut X87) {}

pub fn fninit(fpu: &mut X87) {
    fpu.reset();
}

pub fn fstcw(fpu: &X87) -> u16 {
    fpu.control_word()
}

pub fn fstsw(fpu: &X87) -> u16 {
    fpu.status_word()
}

pub fn frndint(fpu: &mut X87) {
    let value = if fpu.is_st_empty(0) {
        fpu.set_stack_underflow();
        Fx80::INDEFINITE
    } else {
        fpu.sw &= !crate::state::SW_C1;
        let st0 = fpu.st(0);
        fpu.fp.round_to_int(st0)
    };

    if fpu.flush_flags() {
        fpu.write_stack(0, value, true);
    }
}

pub fn fclex(fpu: &mut X87) {
    fpu.sw &= !0x80FF;
}

fn put16(buf: &mut [u8], off: usize, v: u16) {
    buf[off..off + 2].copy_from_slice(&v.to_le_bytes());
}

fn get16(buf: &[u8], off: usize) -> u16 {
    u16::from_le_bytes([buf[off], buf[off + 1]])
}

pub fn fsave(fpu: &X87, buf: &mut [u8]) {
    put16(buf, 0, fpu.control_word());
    put16(buf, 2, fpu.status_word());
    put16(buf, 4, fpu.tag_word());
    for i in 0..8 {
        let v = fpu.st(i);
        let off = 6 + i * 10;
        buf[off..off + 8].copy_from_slice(&v.low.to_le_bytes());
        put16(buf, off + 8, v.high);
    }
}

pub fn frstor(fpu: &mut X87, buf: &[u8]) {
    fpu.write_cw(get16(buf, 0));
    fpu.sw = get16(buf, 2);
    fpu.tw = get16(buf, 4);
    for i in 0..8 {
        let off = 6 + i * 10;
        let low = u64::from_le_bytes([
            buf[off],
            buf[off + 1],
            buf[off + 2],
            buf[off + 3],
            buf[off + 4],
            buf[off + 5],
            buf[off + 6],
            buf[off + 7],
        ]);
        let high = get16(buf, off + 8);
        fpu.write_stack(i, Fx80 { high, low }, false);
    }
}

/// FISTP m32 with an explicit rounding override. The adapter's mode is
/// saved and restored around the conversion so the caller's CW stays in
/// force afterwards.
pub fn fistp(fpu: &mut X87, round: u16) -> u32 {
    let mut m32int = 0x8000_0000u32;

    if !fpu.is_st_empty(0) {
        let saved = fpu.fp.rounding();
        fpu.fp.set_rounding(SoftFp::rounding_for_rc(round & 3));

        let st0 = fpu.st(0);
        let rounded = fpu.fp.round_to_int(st0);

        use core::cmp::Ordering::*;
        let lo = fpu.fp.from_i64(i32::MIN as i64);
        let hi = fpu.fp.from_i64(i32::MAX as i64);
        let in_range = matches!(fpu.fp.cmp(rounded, lo), Some(Greater | Equal))
            && matches!(fpu.fp.cmp(rounded, hi), Some(Less | Equal));
        if in_range {
            m32int = fpu.fp.to_i64(rounded) as u32;
        }

        fpu.inc_stack();
        fpu.fp.set_rounding(saved);
    }

    m32int
}
