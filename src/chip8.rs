use log::{debug, trace, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fs;
use std::ops::Range;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

mod error;
mod font;

pub use error::{Chip8Error, Result};
pub use font::{glyph, glyph_address, FONTSET, FONT_BASE, GLYPH_SIZE};

pub const MEMORY_SIZE: usize = 4096;
/// programs are loaded here, everything below is reserved for the interpreter
pub const PROGRAM_START: u16 = 0x200;
pub const MAX_ROM_SIZE: usize = MEMORY_SIZE - PROGRAM_START as usize;
pub const REGISTER_COUNT: usize = 16;
pub const STACK_SIZE: usize = 16;
pub const KEY_COUNT: usize = 16;
pub const VIDEO_WIDTH: usize = 64;
pub const VIDEO_HEIGHT: usize = 32;
pub const PIXEL_ON: u32 = 0xFFFF_FFFF;
pub const PIXEL_OFF: u32 = 0;

type OpcodeFn = fn(&mut Chip8) -> Result<()>;

pub struct Chip8 {
    // CHIP-8 VM
    opcode: u16,                            // current opcode
    memory: [u8; MEMORY_SIZE],              // system memory
    v: [u8; REGISTER_COUNT],                // registers V0-VE (VF is flag for some instructions)
    i: u16,                                 // address register
    pc: u16,                                // program counter
    gfx: [u32; VIDEO_WIDTH * VIDEO_HEIGHT], // pixels state, PIXEL_ON or PIXEL_OFF
    delay_timer: u8,
    sound_timer: u8, // both count down once per cycle
    stack: [u16; STACK_SIZE],
    sp: usize,              // stack pointer
    key: [bool; KEY_COUNT], // hex keypad state

    // emulator resources
    draw_flag: bool,
    rng: StdRng,
    opcode_fns: [OpcodeFn; 16],
}

impl Default for Chip8 {
    fn default() -> Self {
        Self::new()
    }
}

impl Chip8 {
    /// A machine whose random source is seeded from the system clock.
    pub fn new() -> Self {
        let seed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or_default();
        Self::with_seed(seed)
    }

    /// A machine with a fixed random seed, for reproducible runs.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            opcode: 0,
            memory: Self::initial_memory(),
            v: [0; REGISTER_COUNT],
            i: 0,
            pc: PROGRAM_START,
            gfx: [PIXEL_OFF; VIDEO_WIDTH * VIDEO_HEIGHT],
            delay_timer: 0,
            sound_timer: 0,
            stack: [0; STACK_SIZE],
            sp: 0,
            key: [false; KEY_COUNT],

            draw_flag: false,
            rng: StdRng::seed_from_u64(seed),
            opcode_fns: [
                Self::sys,  // 00E0, 00EE
                Self::jmp,  // 1NNN
                Self::call, // 2NNN
                Self::eb,   // 3XNN
                Self::neb,  // 4XNN
                Self::er,   // 5XY0
                Self::ld,   // 6XNN
                Self::addb, // 7XNN
                Self::alu,  // 8XY*
                Self::ner,  // 9XY0
                Self::si,   // ANNN
                Self::jmpo, // BNNN
                Self::rng,  // CXNN
                Self::draw, // DXYN
                Self::skp,  // EX9E, EXA1
                Self::ex,   // FX**
            ],
        }
    }

    fn initial_memory() -> [u8; MEMORY_SIZE] {
        let mut memory = [0; MEMORY_SIZE];
        let font = FONT_BASE as usize;
        memory[font..font + FONTSET.len()].copy_from_slice(&FONTSET);
        memory
    }

    /// Put everything back the way `new` left it. The random source keeps
    /// running, it is only ever seeded once.
    pub fn reset(&mut self) {
        self.opcode = 0;
        self.memory = Self::initial_memory();
        self.v = [0; REGISTER_COUNT];
        self.i = 0;
        self.pc = PROGRAM_START;
        self.gfx = [PIXEL_OFF; VIDEO_WIDTH * VIDEO_HEIGHT];
        self.delay_timer = 0;
        self.sound_timer = 0;
        self.stack = [0; STACK_SIZE];
        self.sp = 0;
        self.key = [false; KEY_COUNT];
        self.draw_flag = false;
        debug!("machine reset");
    }

    /// Copy a program image into memory at 0x200. Images that don't fit are
    /// rejected before anything is written.
    pub fn load(&mut self, rom: &[u8]) -> Result<()> {
        if rom.len() > MAX_ROM_SIZE {
            return Err(Chip8Error::RomTooLarge {
                size: rom.len(),
                max_size: MAX_ROM_SIZE,
            });
        }
        let start = PROGRAM_START as usize;
        self.memory[start..start + rom.len()].copy_from_slice(rom);
        debug!("loaded {} byte ROM at {:#05X}", rom.len(), PROGRAM_START);
        Ok(())
    }

    pub fn load_rom<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let rom = fs::read(path)?;
        self.load(&rom)
    }

    /// Run exactly one fetch/decode/execute cycle, then tick the timers.
    pub fn step(&mut self) -> Result<()> {
        let pc = self.pc as usize;
        if pc + 1 >= MEMORY_SIZE {
            return Err(Chip8Error::FetchOutOfBounds { pc: self.pc });
        }
        // two-byte opcodes
        self.opcode = (self.memory[pc] as u16) << 8 | self.memory[pc + 1] as u16;
        trace!("{:#05X}: {:04X}", self.pc, self.opcode);

        // jumps overwrite this, skips add to it
        self.pc += 2;
        self.draw_flag = false;

        let f = self.opcode_fns[(self.opcode >> 12) as usize];
        f(self)?;

        if self.delay_timer > 0 {
            self.delay_timer -= 1;
        }
        if self.sound_timer > 0 {
            self.sound_timer -= 1;
        }
        Ok(())
    }

    pub fn draw_flag(&self) -> bool {
        self.draw_flag
    }

    /// row-major, `VIDEO_WIDTH` pixels per row
    pub fn framebuffer(&self) -> &[u32] {
        &self.gfx
    }

    pub fn pixel(&self, x: usize, y: usize) -> bool {
        self.gfx[VIDEO_WIDTH * (y % VIDEO_HEIGHT) + x % VIDEO_WIDTH] == PIXEL_ON
    }

    pub fn register(&self, x: usize) -> u8 {
        self.v[x & 0xF]
    }

    pub fn index(&self) -> u16 {
        self.i
    }

    pub fn pc(&self) -> u16 {
        self.pc
    }

    pub fn opcode(&self) -> u16 {
        self.opcode
    }

    pub fn stack_depth(&self) -> usize {
        self.sp
    }

    pub fn memory(&self) -> &[u8] {
        &self.memory
    }

    pub fn delay_timer(&self) -> u8 {
        self.delay_timer
    }

    pub fn sound_timer(&self) -> u8 {
        self.sound_timer
    }

    pub fn sound_active(&self) -> bool {
        self.sound_timer > 0
    }

    pub fn key(&self, key: usize) -> bool {
        key < KEY_COUNT && self.key[key]
    }

    pub fn set_key(&mut self, key: usize, pressed: bool) {
        if key >= KEY_COUNT {
            warn!("ignoring state change for key {:#X}, only 0x0-0xF exist", key);
            return;
        }
        self.key[key] = pressed;
    }

    pub fn clear_keys(&mut self) {
        self.key = [false; KEY_COUNT];
    }

    // opcode fields
    fn x(&self) -> usize {
        ((self.opcode & 0xF00) >> 8) as usize
    }

    fn y(&self) -> usize {
        ((self.opcode & 0xF0) >> 4) as usize
    }

    fn n(&self) -> usize {
        (self.opcode & 0xF) as usize
    }

    fn nn(&self) -> u8 {
        (self.opcode & 0xFF) as u8
    }

    fn nnn(&self) -> u16 {
        self.opcode & 0xFFF
    }

    fn skip_if(&mut self, condition: bool) {
        if condition {
            self.pc += 2;
        }
    }

    fn checked_range(address: usize, len: usize) -> Result<Range<usize>> {
        if address + len > MEMORY_SIZE {
            return Err(Chip8Error::MemoryOutOfBounds { address, len });
        }
        Ok(address..address + len)
    }

    fn nop(&mut self) -> Result<()> {
        debug!("ignoring unknown opcode {:04X}", self.opcode);
        Ok(())
    }

    fn sys(&mut self) -> Result<()> {
        match self.opcode {
            0x00E0 => {
                // clear screen
                self.gfx = [PIXEL_OFF; VIDEO_WIDTH * VIDEO_HEIGHT];
                self.draw_flag = true;
            }
            0x00EE => {
                // return from subroutine
                if self.sp == 0 {
                    return Err(Chip8Error::StackUnderflow { pc: self.pc - 2 });
                }
                self.sp -= 1;
                self.pc = self.stack[self.sp];
            }
            // 0NNN machine code routines don't exist here
            _ => return self.nop(),
        }
        Ok(())
    }

    fn jmp(&mut self) -> Result<()> {
        // 1NNN
        self.pc = self.nnn();
        Ok(())
    }

    fn call(&mut self) -> Result<()> {
        // 2NNN
        // pc already points past the call, which is where we come back to
        if self.sp >= STACK_SIZE {
            return Err(Chip8Error::StackOverflow { pc: self.pc - 2 });
        }
        self.stack[self.sp] = self.pc;
        self.sp += 1;
        self.pc = self.nnn();
        Ok(())
    }

    fn eb(&mut self) -> Result<()> {
        // 3XNN
        // skip if VX == NN
        self.skip_if(self.v[self.x()] == self.nn());
        Ok(())
    }

    fn neb(&mut self) -> Result<()> {
        // 4XNN
        // skip if VX != NN
        self.skip_if(self.v[self.x()] != self.nn());
        Ok(())
    }

    fn er(&mut self) -> Result<()> {
        // 5XY0
        // skip if VX == VY
        self.skip_if(self.v[self.x()] == self.v[self.y()]);
        Ok(())
    }

    fn ld(&mut self) -> Result<()> {
        // 6XNN
        self.v[self.x()] = self.nn();
        Ok(())
    }

    fn addb(&mut self) -> Result<()> {
        // 7XNN
        // add NN to VX, no carry
        let x = self.x();
        self.v[x] = self.v[x].wrapping_add(self.nn());
        Ok(())
    }

    fn alu(&mut self) -> Result<()> {
        // 8XY*
        // VF is always written after VX so the flag survives when X is F
        let x = self.x();
        let vx = self.v[x];
        let vy = self.v[self.y()];
        match self.n() {
            0x0 => self.v[x] = vy,
            0x1 => self.v[x] = vx | vy,
            0x2 => self.v[x] = vx & vy,
            0x3 => self.v[x] = vx ^ vy,
            0x4 => {
                // VF = 1 on carry
                let (sum, carry) = vx.overflowing_add(vy);
                self.v[x] = sum;
                self.v[0xF] = carry as u8;
            }
            0x5 => {
                // VF = 1 if there's no borrow
                self.v[x] = vx.wrapping_sub(vy);
                self.v[0xF] = (vx >= vy) as u8;
            }
            0x6 => {
                // VF = the bit shifted out
                self.v[x] = vx >> 1;
                self.v[0xF] = vx & 0x1;
            }
            0x7 => {
                // VX = VY - VX, VF = 1 if there's no borrow
                self.v[x] = vy.wrapping_sub(vx);
                self.v[0xF] = (vy >= vx) as u8;
            }
            0xE => {
                self.v[x] = vx << 1;
                self.v[0xF] = vx >> 7;
            }
            _ => return self.nop(),
        }
        Ok(())
    }

    fn ner(&mut self) -> Result<()> {
        // 9XY0
        // skip if VX != VY
        self.skip_if(self.v[self.x()] != self.v[self.y()]);
        Ok(())
    }

    fn si(&mut self) -> Result<()> {
        // ANNN
        self.i = self.nnn();
        Ok(())
    }

    fn jmpo(&mut self) -> Result<()> {
        // BNNN
        // jump to NNN + V0, landing past the end of memory fails on the next fetch
        self.pc = self.nnn() + self.v[0] as u16;
        Ok(())
    }

    fn rng(&mut self) -> Result<()> {
        // CXNN
        let x = self.x();
        self.v[x] = self.rng.gen::<u8>() & self.nn();
        Ok(())
    }

    fn draw(&mut self) -> Result<()> {
        // DXYN
        // N rows of 8 pixels from memory at I, XORed onto the screen at VX,VY.
        // The origin wraps, and so does every pixel of a sprite hanging off an edge.
        // VF is set to 1 if any pixel gets switched off
        let rows = Self::checked_range(self.i as usize, self.n())?;
        let vx = self.v[self.x()] as usize % VIDEO_WIDTH;
        let vy = self.v[self.y()] as usize % VIDEO_HEIGHT;

        let mut collision = false;
        for (row, &sprite) in self.memory[rows].iter().enumerate() {
            for col in 0..8 {
                if sprite & (0x80 >> col) == 0 {
                    continue;
                }
                let offset = VIDEO_WIDTH * ((vy + row) % VIDEO_HEIGHT) + (vx + col) % VIDEO_WIDTH;
                let pixel = &mut self.gfx[offset];
                if *pixel == PIXEL_ON {
                    collision = true;
                }
                *pixel ^= PIXEL_ON;
            }
        }

        self.v[0xF] = collision as u8;
        self.draw_flag = true;
        Ok(())
    }

    fn skp(&mut self) -> Result<()> {
        // only the low nibble of VX names a key
        let pressed = self.key[(self.v[self.x()] & 0xF) as usize];
        match self.nn() {
            // EX9E
            0x9E => self.skip_if(pressed),
            // EXA1
            0xA1 => self.skip_if(!pressed),
            _ => return self.nop(),
        }
        Ok(())
    }

    fn ex(&mut self) -> Result<()> {
        let x = self.x();
        let vx = self.v[x];
        match self.nn() {
            0x07 => {
                // FX07
                self.v[x] = self.delay_timer;
            }
            0x0A => {
                // FX0A
                // wait for a key by running this instruction again next cycle,
                // so the timers keep ticking while we wait
                match self.key.iter().position(|&pressed| pressed) {
                    Some(key) => self.v[x] = key as u8,
                    None => self.pc -= 2,
                }
            }
            0x15 => {
                // FX15
                self.delay_timer = vx;
            }
            0x18 => {
                // FX18
                self.sound_timer = vx;
            }
            0x1E => {
                // FX1E
                self.i = self.i.wrapping_add(vx as u16);
            }
            0x29 => {
                // FX29
                self.i = glyph_address(vx);
            }
            0x33 => {
                // FX33
                // so 193 becomes [1, 9, 3] in memory at I
                let bcd = Self::checked_range(self.i as usize, 3)?;
                self.memory[bcd].copy_from_slice(&[vx / 100, (vx / 10) % 10, vx % 10]);
            }
            0x55 => {
                // FX55
                // store V0 to VX (inclusive) in memory at I, I is left alone
                let block = Self::checked_range(self.i as usize, x + 1)?;
                self.memory[block].copy_from_slice(&self.v[..=x]);
            }
            0x65 => {
                // FX65
                let block = Self::checked_range(self.i as usize, x + 1)?;
                self.v[..=x].copy_from_slice(&self.memory[block]);
            }
            _ => return self.nop(),
        }
        Ok(())
    }
}
