use crate::{
    config::{AddOverflow, Config},
    decode::OpCodes,
    display::FrameBuffer,
    error::{LoadError, VmError},
    keyboard::{InputState, Keypad},
    memory::{Memory, FONT_ADDR, FONT_GLYPH_LEN},
    registers::Registers,
    timer::{Cadence, Timer},
};
use rand::{rngs::StdRng, Rng, SeedableRng};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEdge {
    Start,
    Stop,
}

/// What happened during one `Emulator::frame` call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameReport {
    pub executed: bool,
    pub redraw: bool,
    pub sound: Option<SoundEdge>,
}

pub struct Emulator {
    fb: FrameBuffer,
    pub(crate) regs: Registers,
    pub(crate) mem: Memory,
    delay_timer: Timer,
    sound_timer: Timer,
    cpu_clock: Cadence,
    redraw_clock: Cadence,
    input: InputState,
    status: Option<VmError>,
    rng: StdRng,
    add_overflow: AddOverflow,
    sound_playing: bool,
}

impl Emulator {
    pub fn new(program: &[u8], config: &Config) -> Result<Self, LoadError> {
        let mut mem = Memory::new();
        mem.load_rom(program)?;

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Ok(Self {
            fb: FrameBuffer::new(),
            regs: Registers::new(),
            mem,
            delay_timer: Timer::new(0, config.timer_hz),
            sound_timer: Timer::new(0, config.timer_hz),
            cpu_clock: Cadence::from_hz(config.instruction_hz),
            redraw_clock: Cadence::from_hz(config.redraw_hz),
            input: InputState::Running,
            status: None,
            rng,
            add_overflow: config.add_overflow,
            sound_playing: false,
        })
    }

    /// Advances the machine by `dt` seconds of wall-clock time.
    ///
    /// Timers decay first. Then, unless blocked on FX0A, at most one
    /// instruction runs if the instruction interval has passed. While
    /// blocked, `key_press` (0..=F) completes the wait instead; fetching
    /// resumes on the following frame.
    pub fn frame(
        &mut self,
        dt: f64,
        keys: &impl Keypad,
        key_press: Option<u8>,
    ) -> Result<FrameReport, VmError> {
        if let Some(err) = self.status {
            return Err(err);
        }

        let mut report = FrameReport::default();
        self.sync_timers(dt);

        if self.input.is_waiting() {
            if let Some((reg, key)) = key_press.and_then(|key| self.input.deliver(key)) {
                self.regs.set_register(reg, key);
                self.cpu_clock.reset();
            }
        } else if self.cpu_clock.tick(dt) {
            self.tick(keys)?;
            report.executed = true;
        }

        report.redraw = self.sync_display(dt);
        report.sound = self.sync_sound();
        Ok(report)
    }

    // one fetch/decode/execute cycle followed by the program bounds check
    pub fn tick(&mut self, keys: &impl Keypad) -> Result<(), VmError> {
        if let Some(err) = self.status {
            return Err(err);
        }
        // FX0A holds fetch until a key arrives through `frame`
        if self.input.is_waiting() {
            return Ok(());
        }

        let pc = self.mem.pc.0;
        let operation = self.fetch_decode();
        log::trace!("{pc:#05x}: {operation:?}");

        let result = self
            .execute_ins(operation, keys)
            .and_then(|()| self.check_bounds());
        if let Err(err) = result {
            log::error!("{err} at {pc:#05x}");
            self.status = Some(err);
        }
        result
    }

    fn fetch_decode(&mut self) -> OpCodes {
        let ins = self.mem.next_instruction();
        OpCodes::decode_raw(ins.0)
    }

    fn check_bounds(&self) -> Result<(), VmError> {
        if self.mem.pc.in_bounds() {
            Ok(())
        } else {
            Err(VmError::OutOfBoundsMemoryAccess)
        }
    }

    // PC already points past the instruction
    fn execute_ins(&mut self, ins: OpCodes, keys: &impl Keypad) -> Result<(), VmError> {
        match ins {
            OpCodes::Jump(addr) => {
                self.mem.set_pc(addr);
            }
            OpCodes::SetRegister(vx, nn) => {
                self.regs.set_register(vx, nn);
            }
            OpCodes::AddToRegister(vx, nn) => match self.add_overflow {
                AddOverflow::Wrap => {
                    if self.regs.add_to_register(vx, nn) {
                        log::debug!("V{vx:X} += {nn:#04x} wrapped");
                    }
                }
                AddOverflow::Fault => {
                    if self.regs.get(vx).checked_add(nn).is_none() {
                        return Err(VmError::ArithmeticOverflow);
                    }
                    self.regs.add_to_register(vx, nn);
                }
            },
            OpCodes::SetIndexRegister(addr) => self.mem.set_index(addr),
            OpCodes::ClearScreen => {
                self.fb.clear_buffer();
            }
            OpCodes::Display(reg_x, reg_y, height) => {
                let (x, y) = (self.regs.get(reg_x), self.regs.get(reg_y));
                // rows I..I+N, each 8 pixels wide
                let sprite = self.mem.read_from_index(height);
                let vf = self.fb.paint(x, y, &sprite);
                self.regs.set_flag(vf);
            }
            OpCodes::PushSubroutine(addr) => {
                // return to the instruction after the call
                if !self.mem.stack.push(self.mem.pc.0) {
                    return Err(VmError::StackOverflow);
                }
                self.mem.set_pc(addr);
            }
            OpCodes::PopSubroutine => {
                let addr = self.mem.stack.pop().ok_or(VmError::StackUnderflow)?;
                self.mem.set_pc(addr);
            }
            OpCodes::CopyRegister(vx, vy) => {
                self.regs.set_register(vx, self.regs.get(vy));
            }
            OpCodes::Or(vx, vy) => {
                self.regs
                    .set_register(vx, self.regs.get(vy) | self.regs.get(vx));
            }
            OpCodes::And(vx, vy) => {
                self.regs
                    .set_register(vx, self.regs.get(vy) & self.regs.get(vx));
            }
            OpCodes::XOr(vx, vy) => {
                self.regs
                    .set_register(vx, self.regs.get(vy) ^ self.regs.get(vx));
            }
            OpCodes::Add(vx, vy) => {
                let (x, y) = (self.regs.get(vx), self.regs.get(vy));
                let (z, carry) = x.overflowing_add(y);
                self.regs.set_register(vx, z);
                self.regs.set_flag(carry);
            }
            OpCodes::SubtractForward(vx, vy) => {
                let (x, y) = (self.regs.get(vx), self.regs.get(vy));
                self.regs.set_register(vx, x.wrapping_sub(y));
                self.regs.set_flag(x > y); // no borrow
            }
            OpCodes::SubtractBackward(vx, vy) => {
                let (x, y) = (self.regs.get(vx), self.regs.get(vy));
                self.regs.set_register(vx, y.wrapping_sub(x));
                self.regs.set_flag(y > x); // no borrow
            }
            OpCodes::LeftShift(vx, _) => {
                let vx_value = self.regs.get(vx);

                let vf = (vx_value >> 7) & 1;
                let vx_value = vx_value << 1;

                self.regs.set_register(vx, vx_value);
                self.regs.set_flag(vf == 1);
            }
            OpCodes::RightShift(vx, _) => {
                let vx_value = self.regs.get(vx);

                let vf = vx_value & 1;
                let vx_value = vx_value >> 1;

                self.regs.set_register(vx, vx_value);
                self.regs.set_flag(vf == 1);
            }
            OpCodes::Random(vx, nn) => {
                let ransuu: u8 = self.rng.gen();
                self.regs.set_register(vx, nn & ransuu);
            }
            OpCodes::JumpWithOffset(addr) => {
                self.mem.set_pc(addr.wrapping_add(self.regs.get(0) as u16));
            }
            OpCodes::AddToIndex(vx) => {
                self.mem.index.add(self.regs.get(vx));
            }
            OpCodes::SkipEqualConstant(vx, nn) => {
                if self.regs.get(vx) == nn {
                    self.mem.increment_pc();
                }
            }
            OpCodes::SkipNotEqualConstant(vx, nn) => {
                if self.regs.get(vx) != nn {
                    self.mem.increment_pc();
                }
            }
            OpCodes::SkipEqualRegister(vx, vy) => {
                if self.regs.get(vx) == self.regs.get(vy) {
                    self.mem.increment_pc();
                }
            }
            OpCodes::SkipNotEqualRegister(vx, vy) => {
                if self.regs.get(vx) != self.regs.get(vy) {
                    self.mem.increment_pc();
                }
            }
            OpCodes::PointChar(vx) => {
                let glyph = self.regs.get(vx) as u16;
                self.mem.set_index(FONT_ADDR + glyph * FONT_GLYPH_LEN);
            }
            OpCodes::ToDecimal(vx) => {
                let value = self.regs.get(vx);
                let digits = [value / 100, (value / 10) % 10, value % 10];
                for (i, digit) in digits.into_iter().enumerate() {
                    self.mem.write_at_index(i as u16, digit);
                }
            }
            OpCodes::SkipIfPressed(vx) => {
                if keys.is_key_down(self.regs.get(vx)) {
                    self.mem.increment_pc();
                }
            }
            OpCodes::SkipIfNotPressed(vx) => {
                if !keys.is_key_down(self.regs.get(vx)) {
                    self.mem.increment_pc();
                }
            }
            OpCodes::CopyDelayToRegister(vx) => self.regs.set_register(vx, self.delay_timer.count),
            OpCodes::CopyRegisterToDelay(vx) => self.delay_timer.set(self.regs.get(vx)),
            OpCodes::CopyRegisterToSound(vx) => self.sound_timer.set(self.regs.get(vx)),
            OpCodes::GetKey(vx) => {
                self.input = InputState::AwaitingInput(vx);
            }
            OpCodes::LoadRegisterFromMemory(vx) => {
                let values = self.mem.read_from_index((vx & 0xF) + 1);
                for (reg, reg_val) in values.into_iter().enumerate() {
                    self.regs.set_register(reg as u8, reg_val);
                }
            }
            OpCodes::StoreRegisterToMemory(vx) => {
                for reg in 0..=(vx & 0xF) {
                    self.mem.write_at_index(reg as u16, self.regs.get(reg));
                }
            }
            OpCodes::Unknown(ins) => {
                log::warn!("skipping unknown instruction {ins:04x}");
            }
        }
        Ok(())
    }

    pub fn sync_timers(&mut self, dt: f64) {
        self.delay_timer.sync(dt);
        self.sound_timer.sync(dt);
    }

    // clears the dirty flag when it reports a redraw
    pub fn sync_display(&mut self, dt: f64) -> bool {
        if self.redraw_clock.tick(dt) && self.fb.is_dirty() {
            self.fb.clear_dirty();
            true
        } else {
            false
        }
    }

    fn sync_sound(&mut self) -> Option<SoundEdge> {
        let should_play = self.should_play_sound();
        if should_play == self.sound_playing {
            return None;
        }
        self.sound_playing = should_play;
        Some(if should_play {
            SoundEdge::Start
        } else {
            SoundEdge::Stop
        })
    }

    pub fn registers(&self) -> &Registers {
        &self.regs
    }

    pub fn memory(&self) -> &Memory {
        &self.mem
    }

    pub fn framebuffer(&self) -> &FrameBuffer {
        &self.fb
    }

    pub fn pixel(&self, x: usize, y: usize) -> bool {
        self.fb.get_pixel(x, y)
    }

    pub fn is_dirty(&self) -> bool {
        self.fb.is_dirty()
    }

    pub fn should_play_sound(&self) -> bool {
        self.sound_timer.count > 0
    }

    pub fn status(&self) -> Option<VmError> {
        self.status
    }

    pub fn is_awaiting_input(&self) -> bool {
        self.input.is_waiting()
    }

    pub fn delay_timer(&self) -> u8 {
        self.delay_timer.count
    }

    pub fn sound_timer(&self) -> u8 {
        self.sound_timer.count
    }
}
