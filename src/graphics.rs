use anyhow::{anyhow, Result};
use chip8::{Chip8, PIXEL_ON, VIDEO_HEIGHT, VIDEO_WIDTH};
use sdl2::event::Event;
use sdl2::gfx::primitives::DrawRenderer;
use sdl2::keyboard::Keycode;
use sdl2::pixels;
use sdl2::render::WindowCanvas;
use sdl2::{EventPump, Sdl};

/// SDL window showing the framebuffer, and the keyboard feeding the keypad
pub struct Graphics {
    _sdl_ctx: Sdl,
    canvas: WindowCanvas,
    event_pump: EventPump,
    scale: u32,
}

impl Graphics {
    pub fn new(title: &str, scale: u32) -> Result<Self> {
        let sdl_ctx = sdl2::init().map_err(|e| anyhow!("failed to initialise SDL: {}", e))?;
        let video = sdl_ctx
            .video()
            .map_err(|e| anyhow!("failed to initialise SDL video: {}", e))?;

        let window = video
            .window(
                title,
                VIDEO_WIDTH as u32 * scale,
                VIDEO_HEIGHT as u32 * scale,
            )
            .position_centered()
            .build()
            .map_err(|e| anyhow!("failed to create window: {}", e))?;
        let mut canvas = window
            .into_canvas()
            .build()
            .map_err(|e| anyhow!("failed to create canvas: {}", e))?;

        canvas.set_draw_color(pixels::Color::RGB(0, 0, 0));
        canvas.clear();
        canvas.present();

        let event_pump = sdl_ctx
            .event_pump()
            .map_err(|e| anyhow!("failed to get SDL event pump: {}", e))?;

        Ok(Self {
            _sdl_ctx: sdl_ctx,
            canvas,
            event_pump,
            scale,
        })
    }

    pub fn update(&mut self, framebuffer: &[u32]) -> Result<()> {
        let white = pixels::Color::RGB(255, 255, 255);
        self.canvas.set_draw_color(pixels::Color::RGB(0, 0, 0));
        self.canvas.clear();

        let scale = self.scale as i16;
        for (i, p) in framebuffer.iter().enumerate() {
            if *p != PIXEL_ON {
                continue;
            }
            let x = (i % VIDEO_WIDTH) as i16 * scale;
            let y = (i / VIDEO_WIDTH) as i16 * scale;
            self.canvas
                .box_(x, y, x + scale - 1, y + scale - 1, white)
                .map_err(|e| anyhow!("failed to draw pixel: {}", e))?;
        }
        self.canvas.present();
        Ok(())
    }

    /// Push key events into the keypad. Returns true once the user wants out.
    pub fn process_input(&mut self, chip8: &mut Chip8) -> bool {
        for e in self.event_pump.poll_iter() {
            match e {
                Event::Quit { .. }
                | Event::KeyDown {
                    keycode: Some(Keycode::Escape),
                    ..
                } => return true,
                Event::KeyDown {
                    keycode: Some(keycode),
                    ..
                } => {
                    if let Some(key) = keymap(keycode) {
                        chip8.set_key(key, true);
                    }
                }
                Event::KeyUp {
                    keycode: Some(keycode),
                    ..
                } => {
                    if let Some(key) = keymap(keycode) {
                        chip8.set_key(key, false);
                    }
                }
                _ => {}
            }
        }
        false
    }
}

/// left-hand side of a qwerty keyboard:
///
/// ```text
/// 1 2 3 C      1 2 3 4
/// 4 5 6 D      Q W E R
/// 7 8 9 E      A S D F
/// A 0 B F      Z X C V
/// ```
fn keymap(keycode: Keycode) -> Option<usize> {
    let key = match keycode {
        Keycode::X => 0x0,
        Keycode::Num1 => 0x1,
        Keycode::Num2 => 0x2,
        Keycode::Num3 => 0x3,
        Keycode::Q => 0x4,
        Keycode::W => 0x5,
        Keycode::E => 0x6,
        Keycode::A => 0x7,
        Keycode::S => 0x8,
        Keycode::D => 0x9,
        Keycode::Z => 0xA,
        Keycode::C => 0xB,
        Keycode::Num4 => 0xC,
        Keycode::R => 0xD,
        Keycode::F => 0xE,
        Keycode::V => 0xF,
        _ => return None,
    };
    Some(key)
}
