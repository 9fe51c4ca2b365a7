mod graphics;

use anyhow::{Context, Result};
use chip8::Chip8;
use clap::Parser;
use graphics::Graphics;
use log::{error, info};
use std::path::PathBuf;
use std::thread;
use std::time::{Duration, Instant};

#[derive(Parser, Debug)]
#[command(version, about = "CHIP-8 interpreter", long_about = None)]
struct Args {
    #[arg(short, long, default_value_t = 10, help = "Window pixels per CHIP-8 pixel")]
    scale: u32,

    #[arg(
        short,
        long,
        default_value_t = 16,
        help = "Milliseconds between cycles, 16 runs the timers at about 60Hz"
    )]
    delay: u64,

    #[arg(help = "Path to the ROM file to run")]
    rom: PathBuf,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut emu = Chip8::new();
    emu.load_rom(&args.rom)
        .with_context(|| format!("failed to load {}", args.rom.display()))?;
    info!(
        "running {} at scale {} with {}ms between cycles",
        args.rom.display(),
        args.scale,
        args.delay
    );

    let mut graphics = Graphics::new("CHIP-8", args.scale)?;
    let cycle = Duration::from_millis(args.delay);
    let mut last_cycle = Instant::now();

    loop {
        if graphics.process_input(&mut emu) {
            break;
        }

        if last_cycle.elapsed() < cycle {
            thread::sleep(Duration::from_millis(1));
            continue;
        }
        last_cycle = Instant::now();

        if let Err(e) = emu.step() {
            error!("cycle failed with opcode {:04X}: {}", emu.opcode(), e);
            return Err(e.into());
        }
        if emu.draw_flag() {
            graphics.update(emu.framebuffer())?;
        }
    }

    info!("bye");
    Ok(())
}
