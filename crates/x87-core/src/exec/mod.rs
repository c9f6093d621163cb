//! Instruction dispatch.
//!
//! Each ESC group (D8-DF) owns a 256-entry table indexed by the ModR/M byte.
//! Below 0xC0 the reg field (bits 5:3) selects one of eight memory-form
//! operations; from 0xC0 up the full byte selects a register-form operation.
//! The handler set is closed, so the tables are plain `static` arrays of an
//! `Op` enum built by `const fn` loops, and a single generic match routes
//! each `Op` to its handler. Unpopulated entries resolve to [`Op::Invalid`],
//! which reports a fatal decode error through the host error channel.

pub(crate) mod arith;
pub(crate) mod compare;
pub(crate) mod control;
pub(crate) mod loadstore;
pub(crate) mod transc;

use crate::host::{Fault, Host, Result};
use crate::state::{Tag, X87};
use crate::Fx80;

use arith::Kind;
use loadstore::{Cond, IntWidth};

/// Memory operand forms shared by the arithmetic and compare families.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum MemOp {
    F32,
    F64,
    I16,
    I32,
}

/// Read and widen a memory operand to extended precision.
pub(crate) fn read_operand<H: Host>(
    fpu: &mut X87,
    host: &mut H,
    ea: u32,
    op: MemOp,
) -> Result<Fx80> {
    Ok(match op {
        MemOp::F32 => {
            let bits = host.read_u32(ea)?;
            fpu.fp.f32_to_ext(bits)
        }
        MemOp::F64 => {
            let bits = host.read_u64(ea)?;
            fpu.fp.f64_to_ext(bits)
        }
        MemOp::I16 => {
            let v = host.read_u16(ea)? as i16;
            fpu.fp.from_i64(v as i64)
        }
        MemOp::I32 => {
            let v = host.read_u32(ea)? as i32;
            fpu.fp.from_i64(v as i64)
        }
    })
}

/// One semantic x87 operation. Variant names follow the mnemonic plus the
/// operand form (`M32`/`M64`/`M16`/`M80` memory widths, `St` = ST(0) dest,
/// `Str` = ST(i) dest, trailing `p` = pop).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Op {
    FaddM32,
    FaddM64,
    FiaddM16,
    FiaddM32,
    FaddSt,
    FaddStr,
    Faddp,
    FsubM32,
    FsubM64,
    FisubM16,
    FisubM32,
    FsubSt,
    FsubStr,
    Fsubp,
    FsubrM32,
    FsubrM64,
    FisubrM16,
    FisubrM32,
    FsubrSt,
    FsubrStr,
    Fsubrp,
    FmulM32,
    FmulM64,
    FimulM16,
    FimulM32,
    FmulSt,
    FmulStr,
    Fmulp,
    FdivM32,
    FdivM64,
    FidivM16,
    FidivM32,
    FdivSt,
    FdivStr,
    Fdivp,
    FdivrM32,
    FdivrM64,
    FidivrM16,
    FidivrM32,
    FdivrSt,
    FdivrStr,
    Fdivrp,
    FcmovB,
    FcmovE,
    FcmovBe,
    FcmovU,
    FcmovNb,
    FcmovNe,
    FcmovNbe,
    FcmovNu,
    Fchs,
    Fabs,
    Fsqrt,
    Fscale,
    Frndint,
    Fxtract,
    Fprem,
    Fprem1,
    F2xm1,
    Fyl2x,
    Fyl2xp1,
    Fptan,
    Fpatan,
    Fsin,
    Fcos,
    Fsincos,
    FldM32,
    FldM64,
    FldM80,
    FldSt,
    FildM16,
    FildM32,
    FildM64,
    Fbld,
    FstM32,
    FstM64,
    FstSt,
    FstpM32,
    FstpM64,
    FstpM80,
    FstpSt,
    FistM16,
    FistM32,
    FistpM16,
    FistpM32,
    FistpM64,
    Fbstp,
    Fld1,
    Fldl2t,
    Fldl2e,
    Fldpi,
    Fldlg2,
    Fldln2,
    Fldz,
    Ftst,
    Fxam,
    FcomM32,
    FcomM64,
    FcomSt,
    FcompM32,
    FcompM64,
    FcompSt,
    Fcompp,
    FicomM16,
    FicomM32,
    FicompM16,
    FicompM32,
    FucomSt,
    FucompSt,
    Fucompp,
    Fcomi,
    Fcomip,
    Fucomi,
    Fucomip,
    Fnop,
    Fdecstp,
    Fincstp,
    Fclex,
    Ffree,
    Finit,
    Fldcw,
    Fstcw,
    Fldenv,
    Fstenv,
    Fsave,
    Frstor,
    Fxch,
    FstswAx,
    FstswM16,
    Invalid,
}

const fn build_d8() -> [Op; 256] {
    let mut t = [Op::Invalid; 256];
    let mut m = 0;
    while m < 256 {
        t[m] = if m < 0xC0 {
            match (m >> 3) & 7 {
                0 => Op::FaddM32,
                1 => Op::FmulM32,
                2 => Op::FcomM32,
                3 => Op::FcompM32,
                4 => Op::FsubM32,
                5 => Op::FsubrM32,
                6 => Op::FdivM32,
                _ => Op::FdivrM32,
            }
        } else {
            match m {
                0xC0..=0xC7 => Op::FaddSt,
                0xC8..=0xCF => Op::FmulSt,
                0xD0..=0xD7 => Op::FcomSt,
                0xD8..=0xDF => Op::FcompSt,
                0xE0..=0xE7 => Op::FsubSt,
                0xE8..=0xEF => Op::FsubrSt,
                0xF0..=0xF7 => Op::FdivSt,
                _ => Op::FdivrSt,
            }
        };
        m += 1;
    }
    t
}

const fn build_d9() -> [Op; 256] {
    let mut t = [Op::Invalid; 256];
    let mut m = 0;
    while m < 256 {
        t[m] = if m < 0xC0 {
            match (m >> 3) & 7 {
                0 => Op::FldM32,
                2 => Op::FstM32,
                3 => Op::FstpM32,
                4 => Op::Fldenv,
                5 => Op::Fldcw,
                6 => Op::Fstenv,
                7 => Op::Fstcw,
                _ => Op::Invalid,
            }
        } else {
            match m {
                0xC0..=0xC7 => Op::FldSt,
                0xC8..=0xCF => Op::Fxch,
                0xD0 => Op::Fnop,
                0xE0 => Op::Fchs,
                0xE1 => Op::Fabs,
                0xE4 => Op::Ftst,
                0xE5 => Op::Fxam,
                0xE8 => Op::Fld1,
                0xE9 => Op::Fldl2t,
                0xEA => Op::Fldl2e,
                0xEB => Op::Fldpi,
                0xEC => Op::Fldlg2,
                0xED => Op::Fldln2,
                0xEE => Op::Fldz,
                0xF0 => Op::F2xm1,
                0xF1 => Op::Fyl2x,
                0xF2 => Op::Fptan,
                0xF3 => Op::Fpatan,
                0xF4 => Op::Fxtract,
                0xF5 => Op::Fprem1,
                0xF6 => Op::Fdecstp,
                0xF7 => Op::Fincstp,
                0xF8 => Op::Fprem,
                0xF9 => Op::Fyl2xp1,
                0xFA => Op::Fsqrt,
                0xFB => Op::Fsincos,
                0xFC => Op::Frndint,
                0xFD => Op::Fscale,
                0xFE => Op::Fsin,
                0xFF => Op::Fcos,
                _ => Op::Invalid,
            }
        };
        m += 1;
    }
    t
}

const fn build_da() -> [Op; 256] {
    let mut t = [Op::Invalid; 256];
    let mut m = 0;
    while m < 256 {
        t[m] = if m < 0xC0 {
            match (m >> 3) & 7 {
                0 => Op::FiaddM32,
                1 => Op::FimulM32,
                2 => Op::FicomM32,
                3 => Op::FicompM32,
                4 => Op::FisubM32,
                5 => Op::FisubrM32,
                6 => Op::FidivM32,
                _ => Op::FidivrM32,
            }
        } else {
            match m {
                0xC0..=0xC7 => Op::FcmovB,
                0xC8..=0xCF => Op::FcmovE,
                0xD0..=0xD7 => Op::FcmovBe,
                0xD8..=0xDF => Op::FcmovU,
                0xE9 => Op::Fucompp,
                _ => Op::Invalid,
            }
        };
        m += 1;
    }
    t
}

const fn build_db() -> [Op; 256] {
    let mut t = [Op::Invalid; 256];
    let mut m = 0;
    while m < 256 {
        t[m] = if m < 0xC0 {
            match (m >> 3) & 7 {
                0 => Op::FildM32,
                2 => Op::FistM32,
                3 => Op::FistpM32,
                5 => Op::FldM80,
                7 => Op::FstpM80,
                _ => Op::Invalid,
            }
        } else {
            match m {
                0xC0..=0xC7 => Op::FcmovNb,
                0xC8..=0xCF => Op::FcmovNe,
                0xD0..=0xD7 => Op::FcmovNbe,
                0xD8..=0xDF => Op::FcmovNu,
                // FENI/FDISI/FSETPM are 287 relics that execute as no-ops.
                0xE0 | 0xE1 | 0xE4 => Op::Fnop,
                0xE2 => Op::Fclex,
                0xE3 => Op::Finit,
                0xE8..=0xEF => Op::Fucomi,
                0xF0..=0xF7 => Op::Fcomi,
                _ => Op::Invalid,
            }
        };
        m += 1;
    }
    t
}

const fn build_dc() -> [Op; 256] {
    let mut t = [Op::Invalid; 256];
    let mut m = 0;
    while m < 256 {
        t[m] = if m < 0xC0 {
            match (m >> 3) & 7 {
                0 => Op::FaddM64,
                1 => Op::FmulM64,
                2 => Op::FcomM64,
                3 => Op::FcompM64,
                4 => Op::FsubM64,
                5 => Op::FsubrM64,
                6 => Op::FdivM64,
                _ => Op::FdivrM64,
            }
        } else {
            match m {
                0xC0..=0xC7 => Op::FaddStr,
                0xC8..=0xCF => Op::FmulStr,
                0xE0..=0xE7 => Op::FsubrStr,
                0xE8..=0xEF => Op::FsubStr,
                0xF0..=0xF7 => Op::FdivrStr,
                0xF8..=0xFF => Op::FdivStr,
                _ => Op::Invalid,
            }
        };
        m += 1;
    }
    t
}

const fn build_dd() -> [Op; 256] {
    let mut t = [Op::Invalid; 256];
    let mut m = 0;
    while m < 256 {
        t[m] = if m < 0xC0 {
            match (m >> 3) & 7 {
                0 => Op::FldM64,
                2 => Op::FstM64,
                3 => Op::FstpM64,
                4 => Op::Frstor,
                6 => Op::Fsave,
                7 => Op::FstswM16,
                _ => Op::Invalid,
            }
        } else {
            match m {
                0xC0..=0xC7 => Op::Ffree,
                0xC8..=0xCF => Op::Fxch,
                0xD0..=0xD7 => Op::FstSt,
                0xD8..=0xDF => Op::FstpSt,
                0xE0..=0xE7 => Op::FucomSt,
                0xE8..=0xEF => Op::FucompSt,
                _ => Op::Invalid,
            }
        };
        m += 1;
    }
    t
}

const fn build_de() -> [Op; 256] {
    let mut t = [Op::Invalid; 256];
    let mut m = 0;
    while m < 256 {
        t[m] = if m < 0xC0 {
            match (m >> 3) & 7 {
                0 => Op::FiaddM16,
                1 => Op::FimulM16,
                2 => Op::FicomM16,
                3 => Op::FicompM16,
                4 => Op::FisubM16,
                5 => Op::FisubrM16,
                6 => Op::FidivM16,
                _ => Op::FidivrM16,
            }
        } else {
            match m {
                0xC0..=0xC7 => Op::Faddp,
                0xC8..=0xCF => Op::Fmulp,
                0xD9 => Op::Fcompp,
                0xE0..=0xE7 => Op::Fsubrp,
                0xE8..=0xEF => Op::Fsubp,
                0xF0..=0xF7 => Op::Fdivrp,
                0xF8..=0xFF => Op::Fdivp,
                _ => Op::Invalid,
            }
        };
        m += 1;
    }
    t
}

const fn build_df() -> [Op; 256] {
    let mut t = [Op::Invalid; 256];
    let mut m = 0;
    while m < 256 {
        t[m] = if m < 0xC0 {
            match (m >> 3) & 7 {
                0 => Op::FildM16,
                2 => Op::FistM16,
                3 => Op::FistpM16,
                4 => Op::Fbld,
                5 => Op::FildM64,
                6 => Op::Fbstp,
                7 => Op::FistpM64,
                _ => Op::Invalid,
            }
        } else {
            match m {
                0xE0 => Op::FstswAx,
                0xE8..=0xEF => Op::Fucomip,
                0xF0..=0xF7 => Op::Fcomip,
                _ => Op::Invalid,
            }
        };
        m += 1;
    }
    t
}

pub(crate) static TABLE_D8: [Op; 256] = build_d8();
pub(crate) static TABLE_D9: [Op; 256] = build_d9();
pub(crate) static TABLE_DA: [Op; 256] = build_da();
pub(crate) static TABLE_DB: [Op; 256] = build_db();
pub(crate) static TABLE_DC: [Op; 256] = build_dc();
pub(crate) static TABLE_DD: [Op; 256] = build_dd();
pub(crate) static TABLE_DE: [Op; 256] = build_de();
pub(crate) static TABLE_DF: [Op; 256] = build_df();

pub(crate) fn run<H: Host>(
    fpu: &mut X87,
    host: &mut H,
    group: u8,
    op: Op,
    modrm: u8,
) -> Result<()> {
    use MemOp::*;
    use Op::*;

    match op {
        FaddM32 => arith::mem(fpu, host, modrm, F32, false, Kind::Add, 8),
        FaddM64 => arith::mem(fpu, host, modrm, F64, false, Kind::Add, 8),
        FiaddM16 => arith::mem(fpu, host, modrm, I16, false, Kind::Add, 20),
        FiaddM32 => arith::mem(fpu, host, modrm, I32, false, Kind::Add, 19),
        FaddSt => arith::reg(fpu, host, modrm, false, false, false, Kind::Add, 8),
        FaddStr => arith::reg(fpu, host, modrm, true, false, false, Kind::Add, 8),
        Faddp => arith::reg(fpu, host, modrm, true, true, false, Kind::Add, 8),

        FsubM32 => arith::mem(fpu, host, modrm, F32, false, Kind::Sub, 8),
        FsubM64 => arith::mem(fpu, host, modrm, F64, false, Kind::Sub, 8),
        FisubM16 => arith::mem(fpu, host, modrm, I16, false, Kind::Sub, 20),
        FisubM32 => arith::mem(fpu, host, modrm, I32, false, Kind::Sub, 19),
        FsubSt => arith::reg(fpu, host, modrm, false, false, false, Kind::Sub, 8),
        FsubStr => arith::reg(fpu, host, modrm, true, false, true, Kind::Sub, 8),
        Fsubp => arith::reg(fpu, host, modrm, true, true, true, Kind::Sub, 8),

        FsubrM32 => arith::mem(fpu, host, modrm, F32, true, Kind::Sub, 8),
        FsubrM64 => arith::mem(fpu, host, modrm, F64, true, Kind::Sub, 8),
        FisubrM16 => arith::mem(fpu, host, modrm, I16, true, Kind::Sub, 20),
        FisubrM32 => arith::mem(fpu, host, modrm, I32, true, Kind::Sub, 19),
        FsubrSt => arith::reg(fpu, host, modrm, false, false, true, Kind::Sub, 8),
        FsubrStr => arith::reg(fpu, host, modrm, true, false, false, Kind::Sub, 8),
        Fsubrp => arith::reg(fpu, host, modrm, true, true, false, Kind::Sub, 8),

        FmulM32 => arith::mem(fpu, host, modrm, F32, false, Kind::Mul, 11),
        FmulM64 => arith::mem(fpu, host, modrm, F64, false, Kind::Mul, 14),
        FimulM16 => arith::mem(fpu, host, modrm, I16, false, Kind::Mul, 22),
        FimulM32 => arith::mem(fpu, host, modrm, I32, false, Kind::Mul, 22),
        FmulSt => arith::reg(fpu, host, modrm, false, false, false, Kind::Mul, 16),
        FmulStr => arith::reg(fpu, host, modrm, true, false, false, Kind::Mul, 16),
        Fmulp => arith::reg(fpu, host, modrm, true, true, false, Kind::Mul, 16),

        FdivM32 => arith::mem(fpu, host, modrm, F32, false, Kind::Div, 73),
        FdivM64 => arith::mem(fpu, host, modrm, F64, false, Kind::Div, 73),
        FidivM16 => arith::mem(fpu, host, modrm, I16, false, Kind::Div, 73),
        FidivM32 => arith::mem(fpu, host, modrm, I32, false, Kind::Div, 73),
        FdivSt => arith::reg(fpu, host, modrm, false, false, false, Kind::Div, 73),
        FdivStr => arith::reg(fpu, host, modrm, true, false, true, Kind::Div, 73),
        Fdivp => arith::reg(fpu, host, modrm, true, true, true, Kind::Div, 73),

        FdivrM32 => arith::mem(fpu, host, modrm, F32, true, Kind::Div, 73),
        FdivrM64 => arith::mem(fpu, host, modrm, F64, true, Kind::Div, 73),
        FidivrM16 => arith::mem(fpu, host, modrm, I16, true, Kind::Div, 73),
        FidivrM32 => arith::mem(fpu, host, modrm, I32, true, Kind::Div, 73),
        FdivrSt => arith::reg(fpu, host, modrm, false, false, true, Kind::Div, 73),
        FdivrStr => arith::reg(fpu, host, modrm, true, false, false, Kind::Div, 73),
        Fdivrp => arith::reg(fpu, host, modrm, true, true, false, Kind::Div, 73),

        FcmovB => loadstore::cmov(fpu, host, modrm, Cond::B),
        FcmovE => loadstore::cmov(fpu, host, modrm, Cond::E),
        FcmovBe => loadstore::cmov(fpu, host, modrm, Cond::Be),
        FcmovU => loadstore::cmov(fpu, host, modrm, Cond::U),
        FcmovNb => loadstore::cmov(fpu, host, modrm, Cond::Nb),
        FcmovNe => loadstore::cmov(fpu, host, modrm, Cond::Ne),
        FcmovNbe => loadstore::cmov(fpu, host, modrm, Cond::Nbe),
        FcmovNu => loadstore::cmov(fpu, host, modrm, Cond::Nu),

        Fchs => arith::fchs(fpu, host),
        Fabs => arith::fabs(fpu, host),
        Fsqrt => arith::fsqrt(fpu, host),
        Fscale => arith::fscale(fpu, host),
        Frndint => arith::frndint(fpu, host),
        Fxtract => arith::fxtract(fpu, host),
        Fprem => arith::fprem(fpu, host),
        Fprem1 => arith::fprem1(fpu, host),

        F2xm1 => transc::f2xm1(fpu, host),
        Fyl2x => transc::fyl2x(fpu, host),
        Fyl2xp1 => transc::fyl2xp1(fpu, host),
        Fptan => transc::fptan(fpu, host),
        Fpatan => transc::fpatan(fpu, host),
        Fsin => transc::fsin(fpu, host),
        Fcos => transc::fcos(fpu, host),
        Fsincos => transc::fsincos(fpu, host),

        FldM32 => loadstore::fld_m32(fpu, host, modrm),
        FldM64 => loadstore::fld_m64(fpu, host, modrm),
        FldM80 => loadstore::fld_m80(fpu, host, modrm),
        FldSt => loadstore::fld_sti(fpu, host, modrm),
        FildM16 => loadstore::fild(fpu, host, modrm, I16, 13),
        FildM32 => loadstore::fild(fpu, host, modrm, I32, 9),
        FildM64 => loadstore::fild_m64(fpu, host, modrm),
        Fbld => loadstore::fbld(fpu, host, modrm),

        FstM32 => loadstore::fst_real(fpu, host, modrm, false, false, 7),
        FstpM32 => loadstore::fst_real(fpu, host, modrm, false, true, 7),
        FstM64 => loadstore::fst_real(fpu, host, modrm, true, false, 8),
        FstpM64 => loadstore::fst_real(fpu, host, modrm, true, true, 8),
        FstpM80 => loadstore::fstp_m80(fpu, host, modrm),
        FstSt => loadstore::fst_sti(fpu, host, modrm, false),
        FstpSt => loadstore::fst_sti(fpu, host, modrm, true),
        FistM16 => loadstore::fist(fpu, host, modrm, IntWidth::W16, false, 29),
        FistpM16 => loadstore::fist(fpu, host, modrm, IntWidth::W16, true, 29),
        FistM32 => loadstore::fist(fpu, host, modrm, IntWidth::W32, false, 28),
        FistpM32 => loadstore::fist(fpu, host, modrm, IntWidth::W32, true, 29),
        FistpM64 => loadstore::fist(fpu, host, modrm, IntWidth::W64, true, 29),
        Fbstp => loadstore::fbstp(fpu, host, modrm),

        Fld1 => loadstore::fld_const(fpu, host, loadstore::const_one, Tag::Valid, 4),
        Fldl2t => loadstore::fld_const(fpu, host, loadstore::const_l2t, Tag::Valid, 8),
        Fldl2e => loadstore::fld_const(fpu, host, loadstore::const_l2e, Tag::Valid, 8),
        Fldpi => loadstore::fld_const(fpu, host, loadstore::const_pi, Tag::Valid, 8),
        Fldlg2 => loadstore::fld_const(fpu, host, loadstore::const_lg2, Tag::Valid, 8),
        Fldln2 => loadstore::fld_const(fpu, host, loadstore::const_ln2, Tag::Valid, 8),
        Fldz => loadstore::fld_const(fpu, host, loadstore::const_zero, Tag::Zero, 4),

        Ftst => compare::ftst(fpu, host),
        Fxam => compare::fxam(fpu, host),
        FcomM32 => compare::com_mem(fpu, host, modrm, F32, false, 4),
        FcomM64 => compare::com_mem(fpu, host, modrm, F64, false, 4),
        FcompM32 => compare::com_mem(fpu, host, modrm, F32, true, 4),
        FcompM64 => compare::com_mem(fpu, host, modrm, F64, true, 4),
        FicomM16 => compare::com_mem(fpu, host, modrm, I16, false, 16),
        FicomM32 => compare::com_mem(fpu, host, modrm, I32, false, 15),
        FicompM16 => compare::com_mem(fpu, host, modrm, I16, true, 16),
        FicompM32 => compare::com_mem(fpu, host, modrm, I32, true, 15),
        FcomSt => compare::com_st(fpu, host, modrm, false, 0, false, 4),
        FcompSt => compare::com_st(fpu, host, modrm, false, 1, false, 4),
        Fcompp => compare::com_st(fpu, host, modrm, true, 2, false, 5),
        FucomSt => compare::com_st(fpu, host, modrm, false, 0, true, 4),
        FucompSt => compare::com_st(fpu, host, modrm, false, 1, true, 4),
        Fucompp => compare::com_st(fpu, host, modrm, true, 2, true, 4),
        Fcomi => compare::comi(fpu, host, modrm, false, false),
        Fcomip => compare::comi(fpu, host, modrm, false, true),
        Fucomi => compare::comi(fpu, host, modrm, true, false),
        Fucomip => compare::comi(fpu, host, modrm, true, true),

        Fnop => control::fnop(fpu, host),
        Fdecstp => control::fdecstp(fpu, host),
        Fincstp => control::fincstp(fpu, host),
        Fclex => control::fclex(fpu, host),
        Ffree => control::ffree(fpu, host, modrm),
        Finit => control::finit(fpu, host),
        Fldcw => control::fldcw(fpu, host, modrm),
        Fstcw => control::fstcw(fpu, host, modrm),
        Fldenv => control::fldenv(fpu, host, modrm),
        Fstenv => control::fstenv(fpu, host, modrm),
        Fsave => control::fsave(fpu, host, modrm),
        Frstor => control::frstor(fpu, host, modrm),
        Fxch => control::fxch_sti(fpu, host, modrm),
        FstswAx => control::fstsw_ax(fpu, host),
        FstswM16 => control::fstsw_m16(fpu, host, modrm),

        Invalid => {
            tracing::error!("invalid x87 opcode: group {group:#04x}, modrm {modrm:#04x}");
            Err(Fault::InvalidOpcode { group, modrm })
        }
    }
}

impl X87 {
    pub fn group_d8<H: Host>(&mut self, host: &mut H) -> Result<()> {
        let modrm = host.fetch();
        run(self, host, 0xD8, TABLE_D8[modrm as usize], modrm)
    }

    pub fn group_d9<H: Host>(&mut self, host: &mut H) -> Result<()> {
        let modrm = host.fetch();
        run(self, host, 0xD9, TABLE_D9[modrm as usize], modrm)
    }

    pub fn group_da<H: Host>(&mut self, host: &mut H) -> Result<()> {
        let modrm = host.fetch();
        run(self, host, 0xDA, TABLE_DA[modrm as usize], modrm)
    }

    pub fn group_db<H: Host>(&mut self, host: &mut H) -> Result<()> {
        let modrm = host.fetch();
        run(self, host, 0xDB, TABLE_DB[modrm as usize], modrm)
    }

    pub fn group_dc<H: Host>(&mut self, host: &mut H) -> Result<()> {
        let modrm = host.fetch();
        run(self, host, 0xDC, TABLE_DC[modrm as usize], modrm)
    }

    pub fn group_dd<H: Host>(&mut self, host: &mut H) -> Result<()> {
        let modrm = host.fetch();
        run(self, host, 0xDD, TABLE_DD[modrm as usize], modrm)
    }

    pub fn group_de<H: Host>(&mut self, host: &mut H) -> Result<()> {
        let modrm = host.fetch();
        run(self, host, 0xDE, TABLE_DE[modrm as usize], modrm)
    }

    pub fn group_df<H: Host>(&mut self, host: &mut H) -> Result<()> {
        let modrm = host.fetch();
        run(self, host, 0xDF, TABLE_DF[modrm as usize], modrm)
    }
}
