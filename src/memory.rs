use crate::{
    decode::RawInstruction,
    error::LoadError,
    registers::{IndexRegister, ProgramCounter},
};

pub type TypeAddr = u16; // in reality u12

pub const MEMORY_SIZE: usize = 4096;
pub const ADDR_MASK: TypeAddr = 0x0FFF;
pub const PROGRAM_START: TypeAddr = 0x200;
pub const MAX_PROGRAM_LEN: usize = MEMORY_SIZE - PROGRAM_START as usize;

pub const FONT_ADDR: TypeAddr = 0x000;
pub const FONT_GLYPH_LEN: u16 = 5;

pub const STACK_DEPTH: usize = 16;

type FontBytes = [u8; 5 * 16];

const DEFAULT_FONT: FontBytes = [
    0xF0, 0x90, 0x90, 0x90, 0xF0, // 0
    0x20, 0x60, 0x20, 0x20, 0x70, // 1
    0xF0, 0x10, 0xF0, 0x80, 0xF0, // 2
    0xF0, 0x10, 0xF0, 0x10, 0xF0, // 3
    0x90, 0x90, 0xF0, 0x10, 0x10, // 4
    0xF0, 0x80, 0xF0, 0x10, 0xF0, // 5
    0xF0, 0x80, 0xF0, 0x90, 0xF0, // 6
    0xF0, 0x10, 0x20, 0x40, 0x40, // 7
    0xF0, 0x90, 0xF0, 0x90, 0xF0, // 8
    0xF0, 0x90, 0xF0, 0x10, 0xF0, // 9
    0xF0, 0x90, 0xF0, 0x90, 0x90, // A
    0xE0, 0x90, 0xE0, 0x90, 0xE0, // B
    0xF0, 0x80, 0x80, 0x80, 0xF0, // C
    0xE0, 0x90, 0x90, 0x90, 0xE0, // D
    0xF0, 0x80, 0xF0, 0x80, 0xF0, // E
    0xF0, 0x80, 0xF0, 0x80, 0x80, // F
];

pub struct Memory {
    // 4k bytes
    // font glyphs at 000 -> 04F, program from 200
    bytes: [u8; MEMORY_SIZE],
    pub pc: ProgramCounter,
    pub index: IndexRegister,
    pub stack: Stack,
}

impl Memory {
    pub fn new() -> Self {
        let mut bytes = [0; MEMORY_SIZE];
        let start = FONT_ADDR as usize;
        bytes[start..start + DEFAULT_FONT.len()].copy_from_slice(&DEFAULT_FONT);

        Self {
            bytes,
            pc: ProgramCounter(PROGRAM_START, PROGRAM_START),
            index: IndexRegister(0x0),
            stack: Stack::new(),
        }
    }

    pub fn set(&mut self, addr: TypeAddr, val: u8) {
        self.bytes[(addr & ADDR_MASK) as usize] = val;
    }

    pub fn get(&self, addr: TypeAddr) -> u8 {
        self.bytes[(addr & ADDR_MASK) as usize]
    }

    pub fn next_instruction(&mut self) -> RawInstruction {
        let pc = self.pc.0;
        let raw = RawInstruction::from_bytes(self.get(pc), self.get(pc.wrapping_add(1)));
        self.pc.increment();
        raw
    }

    pub fn increment_pc(&mut self) {
        self.pc.increment();
    }

    pub fn set_pc(&mut self, addr: TypeAddr) {
        self.pc.set_addr(addr);
    }

    pub fn set_index(&mut self, addr: TypeAddr) {
        self.index.set_addr(addr);
    }

    pub fn read_from_index(&self, len: u8) -> Vec<u8> {
        let base = self.index.addr();
        (0..len as u16)
            .map(|offset| self.get(base.wrapping_add(offset)))
            .collect()
    }

    pub fn write_at_index(&mut self, offset: u16, val: u8) {
        self.set(self.index.addr().wrapping_add(offset), val);
    }

    // copies the program in starting at address 0x200
    pub fn load_rom(&mut self, bytes: &[u8]) -> Result<(), LoadError> {
        if bytes.len() > MAX_PROGRAM_LEN {
            return Err(LoadError::ProgramTooLarge {
                len: bytes.len(),
                max: MAX_PROGRAM_LEN,
            });
        }
        let start_index = PROGRAM_START as usize;
        self.bytes[start_index..start_index + bytes.len()].copy_from_slice(bytes);
        self.pc.set_end(bytes.len());
        self.pc.set_addr(PROGRAM_START);
        Ok(())
    }

    pub fn program_end(&self) -> TypeAddr {
        self.pc.1
    }
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}

// fixed depth, never wraps
pub struct Stack {
    addresses: [TypeAddr; STACK_DEPTH],
    sp: usize,
}

impl Stack {
    pub fn new() -> Self {
        Self {
            addresses: [0; STACK_DEPTH],
            sp: 0,
        }
    }

    pub fn push(&mut self, addr: TypeAddr) -> bool {
        if self.sp >= STACK_DEPTH {
            return false;
        }
        self.addresses[self.sp] = addr;
        self.sp += 1;
        true
    }

    pub fn pop(&mut self) -> Option<TypeAddr> {
        if self.sp == 0 {
            return None;
        }
        self.sp -= 1;
        Some(self.addresses[self.sp])
    }

    pub fn sp(&self) -> usize {
        self.sp
    }

    pub fn entries(&self) -> &[TypeAddr] {
        &self.addresses[..self.sp]
    }
}

impl Default for Stack {
    fn default() -> Self {
        Self::new()
    }
}
