use crate::memory::{TypeAddr, ADDR_MASK, PROGRAM_START};

/// VF doubles as carry, borrow and collision output.
pub const FLAG_REGISTER: u8 = 0xF;

pub struct Registers {
    registers: [u8; 16],
}

impl Registers {
    pub fn new() -> Self {
        Self { registers: [0; 16] }
    }

    pub fn set_register(&mut self, reg_num: u8, value: u8) {
        self.registers[(reg_num & 0xF) as usize] = value;
    }

    /// Wrapping add; returns whether the true sum exceeded 255.
    pub fn add_to_register(&mut self, reg_num: u8, value: u8) -> bool {
        let (total, overflowed) = self.get(reg_num).overflowing_add(value);
        self.set_register(reg_num, total);
        overflowed
    }

    pub fn get(&self, reg_num: u8) -> u8 {
        self.registers[(reg_num & 0xF) as usize]
    }

    pub fn set_flag(&mut self, set: bool) {
        self.set_register(FLAG_REGISTER, set as u8);
    }
}

impl Default for Registers {
    fn default() -> Self {
        Self::new()
    }
}

// Special registers

/// Address of the next instruction, plus the end of the loaded program.
#[derive(Debug)]
pub struct ProgramCounter(pub TypeAddr, pub TypeAddr);

impl ProgramCounter {
    pub fn increment(&mut self) {
        self.0 = self.0.wrapping_add(2);
    }

    pub fn set_end(&mut self, len: usize) {
        self.1 = PROGRAM_START + (len as u16);
    }

    pub fn set_addr(&mut self, addr: TypeAddr) {
        self.0 = addr;
    }

    // [0x200, end)
    pub fn in_bounds(&self) -> bool {
        (PROGRAM_START..self.1).contains(&self.0)
    }
}

pub struct IndexRegister(pub u16);

impl IndexRegister {
    pub fn set_addr(&mut self, addr: TypeAddr) {
        self.0 = addr;
    }

    pub fn add(&mut self, value: u8) {
        self.0 = self.0.wrapping_add(value as u16);
    }

    pub fn addr(&self) -> TypeAddr {
        self.0 & ADDR_MASK
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_wraps_and_reports() {
        let mut regs = Registers::new();
        regs.set_register(3, 250);
        assert!(!regs.add_to_register(3, 5));
        assert_eq!(regs.get(3), 255);
        assert!(regs.add_to_register(3, 2));
        assert_eq!(regs.get(3), 1);
    }

    #[test]
    fn test_flag_register_is_vf() {
        let mut regs = Registers::new();
        regs.set_flag(true);
        assert_eq!(regs.get(0xF), 1);
        regs.set_flag(false);
        assert_eq!(regs.get(0xF), 0);
    }

    #[test]
    fn test_pc_bounds() {
        let mut pc = ProgramCounter(PROGRAM_START, 0);
        pc.set_end(4);
        assert!(pc.in_bounds());
        pc.increment();
        assert!(pc.in_bounds());
        pc.increment();
        assert!(!pc.in_bounds());
        pc.set_addr(0x1FE);
        assert!(!pc.in_bounds());
    }

    #[test]
    fn test_index_masks_on_access() {
        let mut index = IndexRegister(0xFFF);
        index.add(2);
        assert_eq!(index.0, 0x1001);
        assert_eq!(index.addr(), 0x001);
    }
}
