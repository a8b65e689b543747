use minifb::{Key, KeyRepeat, Scale, Window, WindowOptions};

use crate::{
    display::{FrameBuffer, HEIGHT, WIDTH},
    keyboard::{key_to_num, KeyState},
};

const ON_COLOUR: u32 = from_u8_rgb(0, 127, 255);
const OFF_COLOUR: u32 = from_u8_rgb(0, 0, 0);

/// Host window: shows the framebuffer and reads the keyboard.
pub struct Frontend {
    window: Window,
    pixel_buffer: Vec<u32>,
}

impl Frontend {
    pub fn new(scale: Scale) -> Result<Self, minifb::Error> {
        let mut window = Window::new(
            "chipvm - ESC to exit",
            WIDTH,
            HEIGHT,
            WindowOptions {
                scale,
                ..WindowOptions::default()
            },
        )?;
        window.set_position(500, 300);
        // the machine paces itself from frame deltas
        window.limit_update_rate(None);
        Ok(Self {
            window,
            pixel_buffer: vec![OFF_COLOUR; WIDTH * HEIGHT],
        })
    }

    pub fn is_open(&self) -> bool {
        self.window.is_open() && !self.window.is_key_down(Key::Escape)
    }

    pub fn key_state(&self) -> KeyState {
        let mut keys = KeyState::new();
        for key in self.window.get_keys() {
            keys.update_key(&key);
        }
        keys
    }

    /// First hex key pressed since the last window update.
    pub fn pressed_key(&self) -> Option<u8> {
        self.window
            .get_keys_pressed(KeyRepeat::No)
            .into_iter()
            .find_map(key_to_num)
    }

    pub fn render(&mut self, fb: &FrameBuffer) -> Result<(), minifb::Error> {
        fill_pixels(fb.pixels(), &mut self.pixel_buffer);
        self.window
            .update_with_buffer(&self.pixel_buffer, WIDTH, HEIGHT)
    }

    pub fn poll(&mut self) {
        self.window.update();
    }
}

pub fn scale_from_factor(factor: u8) -> Scale {
    match factor {
        0 | 1 => Scale::X1,
        2 => Scale::X2,
        3 | 4 => Scale::X4,
        5..=8 => Scale::X8,
        9..=16 => Scale::X16,
        _ => Scale::X32,
    }
}

const fn from_u8_rgb(r: u8, g: u8, b: u8) -> u32 {
    let (r, g, b) = (r as u32, g as u32, b as u32);
    (r << 16) | (g << 8) | b
}

fn fill_pixels(bits: &[u8], out: &mut [u32]) {
    for (bit, pixel) in bits.iter().zip(out.iter_mut()) {
        *pixel = if *bit == 1 { ON_COLOUR } else { OFF_COLOUR };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_pixels() {
        let mut fb = FrameBuffer::new();
        fb.paint(1, 0, &[0x80]);
        let mut out = vec![0xDEAD; WIDTH * HEIGHT];
        fill_pixels(fb.pixels(), &mut out);
        assert_eq!(out[0], OFF_COLOUR);
        assert_eq!(out[1], ON_COLOUR);
        assert_eq!(ON_COLOUR, 0x007FFF);
    }

    #[test]
    fn test_scale_from_factor() {
        assert!(matches!(scale_from_factor(1), Scale::X1));
        assert!(matches!(scale_from_factor(16), Scale::X16));
        assert!(matches!(scale_from_factor(200), Scale::X32));
    }
}
