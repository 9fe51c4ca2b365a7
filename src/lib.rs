//! A CHIP-8 interpreter core.
//!
//! [`Chip8`] owns the whole machine: registers, memory, stack, timers, the
//! 64x32 framebuffer and the hex keypad. A host loads a program with
//! [`Chip8::load`] and then calls [`Chip8::step`] once per cycle, reading the
//! framebuffer and feeding key state in between.

pub mod chip8;

pub use crate::chip8::{
    Chip8, Chip8Error, Result, KEY_COUNT, MAX_ROM_SIZE, MEMORY_SIZE, PIXEL_OFF, PIXEL_ON,
    PROGRAM_START, VIDEO_HEIGHT, VIDEO_WIDTH,
};
