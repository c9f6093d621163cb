//! End-to-end instruction scenarios through the group entry points.

mod common;

use common::{run_program, TestHost, MINUS_INF, ONE, PLUS_INF};
use pretty_assertions::assert_eq;
use x87_core::state::{SW_C1, SW_IE, SW_SF, SW_ZE};
use x87_core::{Fx80, Tag, X87};

const FINIT: [u8; 2] = [0xDB, 0xE3];
const FLD1: [u8; 2] = [0xD9, 0xE8];
const FLDZ: [u8; 2] = [0xD9, 0xEE];
const FLDPI: [u8; 2] = [0xD9, 0xEB];

#[test]
fn add_after_two_pushes_leaves_one_slot() {
    let mut fpu = X87::new();
    let mut host = TestHost::new();

    // FINIT; FLD1; FLDZ; FADDP ST(1)
    run_program(&mut fpu, &mut host, &[0xDB, 0xE3, 0xD9, 0xE8, 0xD9, 0xEE, 0xDE, 0xC1]);

    assert_eq!(fpu.st(0), ONE);
    assert_eq!(fpu.st_tag(0), Tag::Valid);
    assert_eq!(fpu.top(), 7);
    assert_eq!(fpu.st_tag(1), Tag::Empty);
}

#[test]
fn pi_stores_as_the_nearest_double() {
    let mut fpu = X87::new();
    let mut host = TestHost::new();

    run_program(&mut fpu, &mut host, &FINIT);
    run_program(&mut fpu, &mut host, &FLDPI);
    run_program(&mut fpu, &mut host, &[0xDD, 0x1D]); // FSTP m64

    assert_eq!(host.get_u64(host.ea), 0x4009_21FB_5444_2D18);
    assert_eq!(fpu.tag_word(), 0xFFFF);
}

#[test]
fn one_minus_one_is_positive_zero() {
    let mut fpu = X87::new();
    let mut host = TestHost::new();

    // FSUB ST(0), ST(0)
    run_program(&mut fpu, &mut host, &[0xDB, 0xE3, 0xD9, 0xE8, 0xD9, 0xE8, 0xD8, 0xE0]);

    assert_eq!(fpu.st(0), Fx80::ZERO);
    assert_eq!(fpu.st_tag(0), Tag::Zero);
    assert_eq!(fpu.status_word() & SW_C1, 0);
}

#[test]
fn masked_divide_by_zero_returns_infinity() {
    let mut fpu = X87::new();
    let mut host = TestHost::new();

    // FLDZ; FLD1; FDIV ST(0), ST(1)
    run_program(&mut fpu, &mut host, &[0xDB, 0xE3, 0xD9, 0xEE, 0xD9, 0xE8, 0xD8, 0xF1]);

    assert_eq!(fpu.st(0), PLUS_INF);
    assert_eq!(fpu.st_tag(0), Tag::Special);
    assert_ne!(fpu.status_word() & SW_ZE, 0);
    assert_eq!(host.traps, 0);
}

#[test]
fn unmasked_divide_by_zero_traps_without_writeback() {
    let mut fpu = X87::new();
    let mut host = TestHost::new();

    run_program(&mut fpu, &mut host, &FINIT);

    // Unmask ZE, then divide 1.0 by 0.0.
    host.set_u16(host.ea, 0x037B);
    run_program(&mut fpu, &mut host, &[0xD9, 0x2D]); // FLDCW
    run_program(&mut fpu, &mut host, &FLDZ);
    run_program(&mut fpu, &mut host, &FLD1);
    run_program(&mut fpu, &mut host, &[0xD8, 0xF1]); // FDIV ST(0), ST(1)

    assert_eq!(fpu.st(0), ONE); // no commit
    assert_ne!(fpu.status_word() & SW_ZE, 0);
    assert_eq!(host.traps, 1);
}

#[test]
fn signaling_nan_load_substitutes_indefinite() {
    let mut fpu = X87::new();
    let mut host = TestHost::new();

    run_program(&mut fpu, &mut host, &FINIT);
    host.set_u32(host.ea, 0x7F80_0001);
    run_program(&mut fpu, &mut host, &[0xD9, 0x05]); // FLD m32

    assert_eq!(fpu.st(0), Fx80::INDEFINITE);
    assert_eq!(fpu.st_tag(0), Tag::Special);
    assert_ne!(fpu.status_word() & SW_IE, 0);
}

#[test]
fn fstsw_ax_reads_a_fresh_status_word() {
    let mut fpu = X87::new();
    let mut host = TestHost::new();
    host.ax = 0xBEEF;

    run_program(&mut fpu, &mut host, &[0xDB, 0xE3, 0xDF, 0xE0]);

    assert_eq!(host.ax, 0x0000);
}

#[test]
fn opposite_infinities_are_invalid() {
    let mut fpu = X87::new();
    let mut host = TestHost::new();

    run_program(&mut fpu, &mut host, &FINIT);
    host.set_f80(host.ea, PLUS_INF);
    run_program(&mut fpu, &mut host, &[0xDB, 0x2D]); // FLD m80
    host.ea = 0x120;
    host.set_f80(host.ea, MINUS_INF);
    run_program(&mut fpu, &mut host, &[0xDB, 0x2D]);

    run_program(&mut fpu, &mut host, &[0xDE, 0xC1]); // FADDP

    assert_eq!(fpu.st(0), Fx80::INDEFINITE);
    assert_ne!(fpu.status_word() & SW_IE, 0);
}

#[test]
fn like_infinities_add_cleanly() {
    let mut fpu = X87::new();
    let mut host = TestHost::new();

    run_program(&mut fpu, &mut host, &FINIT);
    host.set_f80(host.ea, PLUS_INF);
    run_program(&mut fpu, &mut host, &[0xDB, 0x2D]);
    run_program(&mut fpu, &mut host, &[0xDB, 0x2D]);

    run_program(&mut fpu, &mut host, &[0xDE, 0xC1]); // FADDP

    assert_eq!(fpu.st(0), PLUS_INF);
    assert_eq!(fpu.status_word() & SW_IE, 0);
}

#[test]
fn fist_of_nan_is_integer_indefinite() {
    let mut fpu = X87::new();
    let mut host = TestHost::new();

    run_program(&mut fpu, &mut host, &FINIT);
    host.set_u64(host.ea, 0x7FF8_0000_0000_0000); // quiet NaN
    run_program(&mut fpu, &mut host, &[0xDD, 0x05]); // FLD m64
    assert_eq!(fpu.status_word() & SW_IE, 0);

    host.ea = 0x140;
    run_program(&mut fpu, &mut host, &[0xDB, 0x15]); // FIST m32

    assert_eq!(host.get_u32(0x140), 0x8000_0000);
    assert_ne!(fpu.status_word() & SW_IE, 0);
}

#[test]
fn push_onto_full_stack_substitutes_indefinite() {
    let mut fpu = X87::new();
    let mut host = TestHost::new();

    run_program(&mut fpu, &mut host, &FINIT);
    for _ in 0..8 {
        run_program(&mut fpu, &mut host, &FLD1);
    }
    assert_eq!(fpu.status_word() & (SW_IE | SW_SF), 0);

    run_program(&mut fpu, &mut host, &FLD1);

    let sw = fpu.status_word();
    assert_ne!(sw & SW_IE, 0);
    assert_ne!(sw & SW_SF, 0);
    assert_ne!(sw & SW_C1, 0);
    assert_eq!(fpu.st(0), Fx80::INDEFINITE);
    assert_eq!(fpu.st_tag(0), Tag::Special);
}

#[test]
fn compare_sets_condition_codes() {
    use x87_core::state::{SW_C0, SW_C2, SW_C3};

    let mut fpu = X87::new();
    let mut host = TestHost::new();

    // 1.0 vs 0.0: greater -> all clear.
    run_program(&mut fpu, &mut host, &[0xDB, 0xE3, 0xD9, 0xEE, 0xD9, 0xE8, 0xD8, 0xD1]);
    assert_eq!(fpu.status_word() & (SW_C3 | SW_C2 | SW_C0), 0);

    // 0.0 vs 1.0 via FXCH: less -> C0.
    run_program(&mut fpu, &mut host, &[0xD9, 0xC9, 0xD8, 0xD1]);
    assert_eq!(fpu.status_word() & (SW_C3 | SW_C2 | SW_C0), SW_C0);

    // Equal -> C3.
    run_program(&mut fpu, &mut host, &[0xD8, 0xD0]); // FCOM ST(0)
    assert_eq!(fpu.status_word() & (SW_C3 | SW_C2 | SW_C0), SW_C3);
}

#[test]
fn fcomi_writes_host_flags() {
    let mut fpu = X87::new();
    let mut host = TestHost::new();

    // ST(0)=1.0, ST(1)=0.0; FCOMI ST(0), ST(1): greater -> all clear.
    run_program(&mut fpu, &mut host, &[0xDB, 0xE3, 0xD9, 0xEE, 0xD9, 0xE8, 0xDB, 0xF1]);
    assert!(!host.cf && !host.zf && !host.pf);

    run_program(&mut fpu, &mut host, &[0xD9, 0xC9, 0xDB, 0xF1]); // FXCH; FCOMI
    assert!(host.cf && !host.zf && !host.pf);
}

#[test]
fn fcmov_moves_only_when_condition_holds() {
    let mut fpu = X87::new();
    let mut host = TestHost::new();

    run_program(&mut fpu, &mut host, &[0xDB, 0xE3, 0xD9, 0xEE, 0xD9, 0xE8]);

    host.cf = false;
    run_program(&mut fpu, &mut host, &[0xDA, 0xC1]); // FCMOVB ST(0), ST(1)
    assert_eq!(fpu.st(0), ONE);

    host.cf = true;
    run_program(&mut fpu, &mut host, &[0xDA, 0xC1]);
    assert_eq!(fpu.st(0), Fx80::ZERO);
    assert_eq!(fpu.st_tag(0), Tag::Zero);
}

#[test]
fn ftst_against_zero() {
    use x87_core::state::{SW_C0, SW_C2, SW_C3};

    let mut fpu = X87::new();
    let mut host = TestHost::new();

    run_program(&mut fpu, &mut host, &[0xDB, 0xE3, 0xD9, 0xE8, 0xD9, 0xE4]); // FLD1; FTST
    assert_eq!(fpu.status_word() & (SW_C3 | SW_C2 | SW_C0), 0);

    run_program(&mut fpu, &mut host, &[0xD9, 0xEE, 0xD9, 0xE4]); // FLDZ; FTST
    assert_eq!(fpu.status_word() & (SW_C3 | SW_C2 | SW_C0), SW_C3);
}

#[test]
fn fxam_classifies_st0() {
    use x87_core::state::{SW_C0, SW_C1, SW_C2, SW_C3};

    let mut fpu = X87::new();
    let mut host = TestHost::new();

    run_program(&mut fpu, &mut host, &FINIT);
    run_program(&mut fpu, &mut host, &[0xD9, 0xE5]); // FXAM on empty
    assert_eq!(fpu.status_word() & (SW_C3 | SW_C2 | SW_C0), SW_C3 | SW_C0);

    run_program(&mut fpu, &mut host, &FLD1);
    run_program(&mut fpu, &mut host, &[0xD9, 0xE0, 0xD9, 0xE5]); // FCHS; FXAM
    let sw = fpu.status_word();
    assert_eq!(sw & (SW_C3 | SW_C2 | SW_C0), SW_C2); // normal
    assert_ne!(sw & SW_C1, 0); // negative

    host.set_f80(host.ea, PLUS_INF);
    run_program(&mut fpu, &mut host, &[0xDB, 0x2D, 0xD9, 0xE5]); // FLD m80; FXAM
    assert_eq!(fpu.status_word() & (SW_C3 | SW_C2 | SW_C0), SW_C2 | SW_C0);
}

#[test]
fn fsqrt_of_four_is_two() {
    let mut fpu = X87::new();
    let mut host = TestHost::new();

    run_program(&mut fpu, &mut host, &FINIT);
    host.set_u64(host.ea, 0x4010_0000_0000_0000); // 4.0
    run_program(&mut fpu, &mut host, &[0xDD, 0x05, 0xD9, 0xFA]); // FLD m64; FSQRT

    assert_eq!(fpu.st(0), Fx80::new(0x4000, 0x8000_0000_0000_0000));
}

#[test]
fn fsqrt_of_negative_is_invalid() {
    let mut fpu = X87::new();
    let mut host = TestHost::new();

    // FLD1; FCHS; FSQRT
    run_program(&mut fpu, &mut host, &[0xDB, 0xE3, 0xD9, 0xE8, 0xD9, 0xE0, 0xD9, 0xFA]);

    assert_eq!(fpu.st(0), Fx80::INDEFINITE);
    assert_ne!(fpu.status_word() & SW_IE, 0);
}

#[test]
fn fscale_doubles_by_powers_of_two() {
    let mut fpu = X87::new();
    let mut host = TestHost::new();

    run_program(&mut fpu, &mut host, &FINIT);
    host.set_u32(host.ea, 3);
    run_program(&mut fpu, &mut host, &[0xDB, 0x05]); // FILD m32 -> 3
    run_program(&mut fpu, &mut host, &FLD1);
    run_program(&mut fpu, &mut host, &[0xD9, 0xFD]); // FSCALE

    assert_eq!(fpu.st(0), Fx80::new(0x4002, 0x8000_0000_0000_0000)); // 8.0
}

#[test]
fn frndint_respects_rounding_control() {
    let mut fpu = X87::new();
    let mut host = TestHost::new();

    run_program(&mut fpu, &mut host, &FINIT);
    host.set_u64(host.ea, 0x3FF8_0000_0000_0000); // 1.5
    run_program(&mut fpu, &mut host, &[0xDD, 0x05, 0xD9, 0xFC]); // FLD m64; FRNDINT
    assert_eq!(fpu.st(0), Fx80::new(0x4000, 0x8000_0000_0000_0000)); // ties-to-even -> 2.0

    // Truncate mode.
    host.ea = 0x160;
    host.set_u16(host.ea, 0x0F7F);
    run_program(&mut fpu, &mut host, &[0xD9, 0x2D]); // FLDCW
    host.ea = 0x168;
    host.set_u64(host.ea, 0x3FF8_0000_0000_0000);
    run_program(&mut fpu, &mut host, &[0xDD, 0x05, 0xD9, 0xFC]);
    assert_eq!(fpu.st(0), ONE);
}

#[test]
fn fprem_emits_quotient_bits() {
    use x87_core::state::{SW_C0, SW_C2, SW_C3};

    let mut fpu = X87::new();
    let mut host = TestHost::new();

    run_program(&mut fpu, &mut host, &FINIT);
    host.set_u32(host.ea, 3);
    run_program(&mut fpu, &mut host, &[0xDB, 0x05]); // FILD -> 3 (divisor, ST(1))
    host.ea = 0x120;
    host.set_u32(host.ea, 17);
    run_program(&mut fpu, &mut host, &[0xDB, 0x05]); // FILD -> 17 (ST(0))

    run_program(&mut fpu, &mut host, &[0xD9, 0xF8]); // FPREM: 17 mod 3 = 2, q = 5

    let two = Fx80::new(0x4000, 0x8000_0000_0000_0000);
    assert_eq!(fpu.st(0), two);
    let sw = fpu.status_word();
    assert_eq!(sw & SW_C2, 0);
    assert_ne!(sw & SW_C1, 0); // q bit 0
    assert_eq!(sw & SW_C3, 0); // q bit 1
    assert_ne!(sw & SW_C0, 0); // q bit 2
}

#[test]
fn fxtract_splits_exponent_and_significand() {
    let mut fpu = X87::new();
    let mut host = TestHost::new();

    run_program(&mut fpu, &mut host, &FINIT);
    host.set_u64(host.ea, 0x4020_0000_0000_0000); // 8.0
    run_program(&mut fpu, &mut host, &[0xDD, 0x05, 0xD9, 0xF4]); // FLD m64; FXTRACT

    // ST(0) = significand 1.0, ST(1) = exponent 3.
    assert_eq!(fpu.st(0), ONE);
    assert_eq!(fpu.st(1), Fx80::new(0x4000, 0xC000_0000_0000_0000)); // 3.0
}

#[test]
fn fbld_and_fbstp_round_trip_decimal() {
    let mut fpu = X87::new();
    let mut host = TestHost::new();

    run_program(&mut fpu, &mut host, &FINIT);

    // 123456 as packed BCD.
    host.set_f80(host.ea, Fx80::new(0, 0x12_3456));
    run_program(&mut fpu, &mut host, &[0xDF, 0x25]); // FBLD

    host.ea = 0x200;
    run_program(&mut fpu, &mut host, &[0xDF, 0x35]); // FBSTP

    assert_eq!(host.get_f80(0x200), Fx80::new(0, 0x12_3456));
    assert_eq!(fpu.tag_word(), 0xFFFF);
}

#[test]
fn fild_fistp_round_trip() {
    let mut fpu = X87::new();
    let mut host = TestHost::new();

    run_program(&mut fpu, &mut host, &FINIT);
    host.set_u16(host.ea, (-1234i16) as u16);
    run_program(&mut fpu, &mut host, &[0xDF, 0x05]); // FILD m16

    host.ea = 0x180;
    run_program(&mut fpu, &mut host, &[0xDF, 0x1D]); // FISTP m16
    assert_eq!(host.get_u16(0x180) as i16, -1234);
    assert_eq!(fpu.tag_word(), 0xFFFF);
}

#[test]
fn transcendentals_cover_the_double_path() {
    let mut fpu = X87::new();
    let mut host = TestHost::new();

    // F2XM1 of 1.0 = 1.0.
    run_program(&mut fpu, &mut host, &[0xDB, 0xE3, 0xD9, 0xE8, 0xD9, 0xF0]);
    assert_eq!(fpu.st(0), ONE);

    // FYL2X with ST(1)=1.0, ST(0)=2.0: 1*log2(2) = 1, pops to one slot.
    let mut fpu = X87::new();
    let mut host = TestHost::new();
    run_program(&mut fpu, &mut host, &FINIT);
    run_program(&mut fpu, &mut host, &FLD1);
    host.set_u64(host.ea, 0x4000_0000_0000_0000); // 2.0
    run_program(&mut fpu, &mut host, &[0xDD, 0x05, 0xD9, 0xF1]); // FLD m64; FYL2X
    assert_eq!(fpu.st(0), ONE);
    assert_eq!(fpu.top(), 7);
}

#[test]
fn fyl2x_of_nonpositive_is_invalid() {
    let mut fpu = X87::new();
    let mut host = TestHost::new();

    // ST(1)=1.0, ST(0)=0.0.
    run_program(&mut fpu, &mut host, &[0xDB, 0xE3, 0xD9, 0xE8, 0xD9, 0xEE, 0xD9, 0xF1]);

    assert_eq!(fpu.st(0), Fx80::INDEFINITE);
    assert_ne!(fpu.status_word() & SW_IE, 0);
}

#[test]
fn fptan_pushes_one() {
    let mut fpu = X87::new();
    let mut host = TestHost::new();

    run_program(&mut fpu, &mut host, &[0xDB, 0xE3, 0xD9, 0xEE, 0xD9, 0xF2]); // FLDZ; FPTAN

    assert_eq!(fpu.st(0), ONE);
    assert_eq!(fpu.st(1), Fx80::ZERO);
    assert_eq!(fpu.top(), 6);
}

#[test]
fn constant_rounding_variants() {
    let mut fpu = X87::new();
    let mut host = TestHost::new();

    run_program(&mut fpu, &mut host, &FINIT);
    run_program(&mut fpu, &mut host, &FLDPI);
    assert_eq!(fpu.st(0), Fx80::new(0x4000, 0xC90F_DAA2_2168_C235));

    // Round-down picks the truncated mantissa.
    let mut fpu = X87::new();
    let mut host = TestHost::new();
    run_program(&mut fpu, &mut host, &FINIT);
    host.set_u16(host.ea, 0x077F);
    run_program(&mut fpu, &mut host, &[0xD9, 0x2D]); // FLDCW (RC=down)
    run_program(&mut fpu, &mut host, &FLDPI);
    assert_eq!(fpu.st(0), Fx80::new(0x4000, 0xC90F_DAA2_2168_C234));
}
