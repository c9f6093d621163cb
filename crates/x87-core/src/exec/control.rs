//! Control handlers and the environment/state image forms.
//!
//! The FSTENV/FLDENV/FSAVE/FRSTOR images come in four flavors keyed by
//! (CR0.PE, operand size). The instruction/data pointer and opcode fields are
//! reserved (not populated), which collapses the real/protected pairs to the
//! same bytes here; only the 16/32-bit offsets differ. FSAVE/FRSTOR append
//! the eight registers in architectural ST(0..7) order.

use crate::host::{Host, Result, CR0_PE};
use crate::state::{Tag, X87, SW_C1};
use crate::Fx80;

pub(crate) fn fnop<H: Host>(_fpu: &mut X87, host: &mut H) -> Result<()> {
    host.cycles(3);
    Ok(())
}

pub(crate) fn fincstp<H: Host>(fpu: &mut X87, host: &mut H) -> Result<()> {
    fpu.sw &= !SW_C1;
    let top = fpu.phys(1);
    fpu.set_top(top);
    host.cycles(3);
    Ok(())
}

pub(crate) fn fdecstp<H: Host>(fpu: &mut X87, host: &mut H) -> Result<()> {
    fpu.sw &= !SW_C1;
    let top = fpu.phys(7);
    fpu.set_top(top);
    host.cycles(3);
    Ok(())
}

pub(crate) fn fclex<H: Host>(fpu: &mut X87, host: &mut H) -> Result<()> {
    // Exception latches, SF, ES and the busy bit.
    fpu.sw &= !0x80FF;
    host.cycles(7);
    Ok(())
}

pub(crate) fn ffree<H: Host>(fpu: &mut X87, host: &mut H, modrm: u8) -> Result<()> {
    let phys = fpu.phys((modrm & 7) as usize);
    fpu.set_tag(phys, Tag::Empty);
    host.cycles(3);
    Ok(())
}

pub(crate) fn finit<H: Host>(fpu: &mut X87, host: &mut H) -> Result<()> {
    fpu.reset();
    host.cycles(17);
    Ok(())
}

pub(crate) fn fldcw<H: Host>(fpu: &mut X87, host: &mut H, modrm: u8) -> Result<()> {
    let ea = host.ea(modrm, false);
    let cw = host.read_u16(ea)?;

    fpu.write_cw(cw);
    fpu.check_exceptions(host);

    host.cycles(4);
    Ok(())
}

pub(crate) fn fstcw<H: Host>(fpu: &mut X87, host: &mut H, modrm: u8) -> Result<()> {
    let ea = host.ea(modrm, true);
    host.write_u16(ea, fpu.cw)?;

    host.cycles(3);
    Ok(())
}

pub(crate) fn fstsw_ax<H: Host>(fpu: &mut X87, host: &mut H) -> Result<()> {
    host.set_ax(fpu.sw);
    host.cycles(3);
    Ok(())
}

pub(crate) fn fstsw_m16<H: Host>(fpu: &mut X87, host: &mut H, modrm: u8) -> Result<()> {
    let ea = host.ea(modrm, true);
    host.write_u16(ea, fpu.sw)?;

    host.cycles(3);
    Ok(())
}

/// Environment image geometry for the current mode tuple: offsets of SW and
/// TW (CW is always at 0) and the total header size.
fn env_layout<H: Host>(host: &H) -> (u32, u32, u32) {
    if host.operand_size_32() {
        (4, 8, 28)
    } else {
        (2, 4, 14)
    }
}

fn store_env<H: Host>(fpu: &mut X87, host: &mut H, ea: u32) -> Result<u32> {
    let (sw_off, tw_off, size) = env_layout(host);
    host.write_u16(ea, fpu.cw)?;
    host.write_u16(ea + sw_off, fpu.sw)?;
    host.write_u16(ea + tw_off, fpu.tw)?;
    // Instruction/data pointer and opcode fields are reserved.
    Ok(ea + size)
}

fn load_env<H: Host>(fpu: &mut X87, host: &mut H, ea: u32) -> Result<u32> {
    let (sw_off, tw_off, size) = env_layout(host);
    let cw = host.read_u16(ea)?;
    let sw = host.read_u16(ea + sw_off)?;
    let tw = host.read_u16(ea + tw_off)?;
    fpu.write_cw(cw);
    fpu.sw = sw;
    fpu.tw = tw;
    Ok(ea + size)
}

pub(crate) fn fldenv<H: Host>(fpu: &mut X87, host: &mut H, modrm: u8) -> Result<()> {
    let ea = host.ea(modrm, false);
    load_env(fpu, host, ea)?;

    // The restored SW may carry latched exceptions that are unmasked under
    // the restored CW; the funnel decides whether #MF is due.
    fpu.check_exceptions(host);

    host.cycles(if host.cr0() & CR0_PE != 0 { 34 } else { 44 });
    Ok(())
}

pub(crate) fn fstenv<H: Host>(fpu: &mut X87, host: &mut H, modrm: u8) -> Result<()> {
    let ea = host.ea(modrm, true);
    store_env(fpu, host, ea)?;

    host.cycles(if host.cr0() & CR0_PE != 0 { 56 } else { 67 });
    Ok(())
}

pub(crate) fn fsave<H: Host>(fpu: &mut X87, host: &mut H, modrm: u8) -> Result<()> {
    let ea = host.ea(modrm, true);
    let mut ea = store_env(fpu, host, ea)?;

    for i in 0..8 {
        host.write_f80(ea, fpu.st(i))?;
        ea += 10;
    }

    host.cycles(if host.cr0() & CR0_PE != 0 { 56 } else { 67 });
    Ok(())
}

pub(crate) fn frstor<H: Host>(fpu: &mut X87, host: &mut H, modrm: u8) -> Result<()> {
    let ea = host.ea(modrm, false);
    let mut ea = load_env(fpu, host, ea)?;

    // Tags come from the environment's TW image; re-deriving them could not
    // reproduce EMPTY slots.
    for i in 0..8 {
        let value = host.read_f80(ea)?;
        fpu.write_stack(i, value, false);
        ea += 10;
    }

    host.cycles(if host.cr0() & CR0_PE != 0 { 34 } else { 44 });
    Ok(())
}

pub(crate) fn fxch_sti<H: Host>(fpu: &mut X87, host: &mut H, modrm: u8) -> Result<()> {
    let i = (modrm & 7) as usize;

    // Stage both operands, substituting the indefinite NaN for empty
    // sources; nothing reaches the register file until the funnel clears.
    let (mut v0, mut t0) = (fpu.st(0), fpu.st_tag(0));
    let (mut vi, mut ti) = (fpu.st(i), fpu.st_tag(i));
    if t0 == Tag::Empty {
        v0 = Fx80::INDEFINITE;
        t0 = Tag::Special;
        fpu.set_stack_underflow();
    }
    if ti == Tag::Empty {
        vi = Fx80::INDEFINITE;
        ti = Tag::Special;
        fpu.set_stack_underflow();
    }

    if fpu.check_exceptions(host) {
        let phys0 = fpu.phys(0);
        let physi = fpu.phys(i);
        fpu.write_stack(0, vi, false);
        fpu.set_tag(phys0, ti);
        fpu.write_stack(i, v0, false);
        fpu.set_tag(physi, t0);
    }

    host.cycles(4);
    Ok(())
}
