#![allow(dead_code)]

//! Shared test harness: a scriptable host with flat memory, a code queue
//! for ModR/M bytes, and recorded flag/trap/cycle traffic.

use x87_core::host::{CR0_NE, CR0_PE};
use x87_core::{Fault, Fx80, Host, Result, X87};

pub struct TestHost {
    pub mem: Vec<u8>,
    pub code: Vec<u8>,
    pub pc: usize,
    /// Address handed out for every memory-form instruction.
    pub ea: u32,
    pub ax: u16,
    pub cf: bool,
    pub zf: bool,
    pub pf: bool,
    pub cycles: u64,
    pub traps: u32,
    pub cr0: u32,
    pub op32: bool,
}

impl Default for TestHost {
    fn default() -> Self {
        TestHost {
            mem: vec![0; 4096],
            code: Vec::new(),
            pc: 0,
            ea: 0x100,
            ax: 0,
            cf: false,
            zf: false,
            pf: false,
            cycles: 0,
            traps: 0,
            cr0: CR0_NE,
            op32: true,
        }
    }
}

impl TestHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn protected(mut self) -> Self {
        self.cr0 |= CR0_PE;
        self
    }

    pub fn with_op16(mut self) -> Self {
        self.op32 = false;
        self
    }

    pub fn set_u16(&mut self, addr: u32, v: u16) {
        self.mem[addr as usize..addr as usize + 2].copy_from_slice(&v.to_le_bytes());
    }

    pub fn set_u32(&mut self, addr: u32, v: u32) {
        self.mem[addr as usize..addr as usize + 4].copy_from_slice(&v.to_le_bytes());
    }

    pub fn set_u64(&mut self, addr: u32, v: u64) {
        self.mem[addr as usize..addr as usize + 8].copy_from_slice(&v.to_le_bytes());
    }

    pub fn set_f80(&mut self, addr: u32, v: Fx80) {
        self.set_u64(addr, v.low);
        self.set_u16(addr + 8, v.high);
    }

    pub fn get_u16(&self, addr: u32) -> u16 {
        let i = addr as usize;
        u16::from_le_bytes([self.mem[i], self.mem[i + 1]])
    }

    pub fn get_u32(&self, addr: u32) -> u32 {
        let i = addr as usize;
        u32::from_le_bytes(self.mem[i..i + 4].try_into().unwrap())
    }

    pub fn get_u64(&self, addr: u32) -> u64 {
        let i = addr as usize;
        u64::from_le_bytes(self.mem[i..i + 8].try_into().unwrap())
    }

    pub fn get_f80(&self, addr: u32) -> Fx80 {
        Fx80 {
            low: self.get_u64(addr),
            high: self.get_u16(addr + 8),
        }
    }
}

impl Host for TestHost {
    fn fetch(&mut self) -> u8 {
        let b = self.code[self.pc];
        self.pc += 1;
        b
    }

    fn ea(&mut self, _modrm: u8, _write: bool) -> u32 {
        self.ea
    }

    fn read_u16(&mut self, ea: u32) -> Result<u16> {
        let i = ea as usize;
        self.mem
            .get(i..i + 2)
            .map(|b| u16::from_le_bytes([b[0], b[1]]))
            .ok_or(Fault::Memory)
    }

    fn read_u32(&mut self, ea: u32) -> Result<u32> {
        let i = ea as usize;
        self.mem
            .get(i..i + 4)
            .map(|b| u32::from_le_bytes(b.try_into().unwrap()))
            .ok_or(Fault::Memory)
    }

    fn read_u64(&mut self, ea: u32) -> Result<u64> {
        let i = ea as usize;
        self.mem
            .get(i..i + 8)
            .map(|b| u64::from_le_bytes(b.try_into().unwrap()))
            .ok_or(Fault::Memory)
    }

    fn write_u16(&mut self, ea: u32, val: u16) -> Result<()> {
        let i = ea as usize;
        self.mem
            .get_mut(i..i + 2)
            .map(|b| b.copy_from_slice(&val.to_le_bytes()))
            .ok_or(Fault::Memory)
    }

    fn write_u32(&mut self, ea: u32, val: u32) -> Result<()> {
        let i = ea as usize;
        self.mem
            .get_mut(i..i + 4)
            .map(|b| b.copy_from_slice(&val.to_le_bytes()))
            .ok_or(Fault::Memory)
    }

    fn write_u64(&mut self, ea: u32, val: u64) -> Result<()> {
        let i = ea as usize;
        self.mem
            .get_mut(i..i + 8)
            .map(|b| b.copy_from_slice(&val.to_le_bytes()))
            .ok_or(Fault::Memory)
    }

    fn cf(&self) -> bool {
        self.cf
    }

    fn zf(&self) -> bool {
        self.zf
    }

    fn pf(&self) -> bool {
        self.pf
    }

    fn set_cf(&mut self, v: bool) {
        self.cf = v;
    }

    fn set_zf(&mut self, v: bool) {
        self.zf = v;
    }

    fn set_pf(&mut self, v: bool) {
        self.pf = v;
    }

    fn set_ax(&mut self, sw: u16) {
        self.ax = sw;
    }

    fn cycles(&mut self, n: u32) {
        self.cycles += n as u64;
    }

    fn trap_mf(&mut self) {
        self.traps += 1;
    }

    fn operand_size_32(&self) -> bool {
        self.op32
    }

    fn cr0(&self) -> u32 {
        self.cr0
    }
}

/// Execute one instruction: the next code byte must be an ESC opcode, the
/// byte after it the ModR/M.
pub fn step_raw(fpu: &mut X87, host: &mut TestHost) -> Result<()> {
    let esc = host.code[host.pc];
    host.pc += 1;
    match esc {
        0xD8 => fpu.group_d8(host),
        0xD9 => fpu.group_d9(host),
        0xDA => fpu.group_da(host),
        0xDB => fpu.group_db(host),
        0xDC => fpu.group_dc(host),
        0xDD => fpu.group_dd(host),
        0xDE => fpu.group_de(host),
        0xDF => fpu.group_df(host),
        other => panic!("not an ESC opcode: {other:#04x}"),
    }
}

pub fn step(fpu: &mut X87, host: &mut TestHost) {
    step_raw(fpu, host).expect("instruction faulted");
}

/// Queue a byte sequence and run it to completion.
pub fn run_program(fpu: &mut X87, host: &mut TestHost, bytes: &[u8]) {
    host.code.extend_from_slice(bytes);
    while host.pc < host.code.len() {
        step(fpu, host);
    }
}

// Handy extended-precision images.
pub const ONE: Fx80 = Fx80 {
    high: 0x3FFF,
    low: 0x8000_0000_0000_0000,
};
pub const PLUS_INF: Fx80 = Fx80 {
    high: 0x7FFF,
    low: 0x8000_0000_0000_0000,
};
pub const MINUS_INF: Fx80 = Fx80 {
    high: 0xFFFF,
    low: 0x8000_0000_0000_0000,
};
