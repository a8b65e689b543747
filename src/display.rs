pub const WIDTH: usize = 64;
pub const HEIGHT: usize = 32;

/// Monochrome pixel grid, one byte (0 or 1) per pixel.
pub struct FrameBuffer {
    bit_buffer: Vec<u8>,
    dirty: bool,
}

impl FrameBuffer {
    pub fn new() -> Self {
        // starts dirty so the host shows the blank screen straight away
        Self {
            bit_buffer: vec![0; WIDTH * HEIGHT],
            dirty: true,
        }
    }

    pub fn clear_buffer(&mut self) {
        self.bit_buffer.fill(0);
        self.dirty = true;
    }

    fn index(x: usize, y: usize) -> usize {
        (y % HEIGHT) * WIDTH + (x % WIDTH)
    }

    // wraps both axes; true when a set pixel was turned off
    pub fn xor_pixel(&mut self, x: usize, y: usize, bit: u8) -> bool {
        if bit == 0 {
            return false;
        }
        let index = Self::index(x, y);
        let previous = self.bit_buffer[index];
        self.bit_buffer[index] = previous ^ 1;
        self.dirty = true;
        previous == 1
    }

    /// Draws 8-pixel-wide rows, most significant bit leftmost. Returns the
    /// collision flag for the whole sprite.
    pub fn paint(&mut self, x: u8, y: u8, sprite: &[u8]) -> bool {
        let mut vf = false;
        for (i, row) in sprite.iter().enumerate() {
            for j in 0..8 {
                let bit = (row >> (7 - j)) & 1;
                vf |= self.xor_pixel(x as usize + j, y as usize + i, bit);
            }
        }
        vf
    }

    pub fn get_pixel(&self, x: usize, y: usize) -> bool {
        self.bit_buffer[Self::index(x, y)] == 1
    }

    pub fn pixels(&self) -> &[u8] {
        &self.bit_buffer
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn clear_dirty(&mut self) {
        self.dirty = false;
    }
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_blank_and_dirty() {
        let fb = FrameBuffer::new();
        assert!(fb.pixels().iter().all(|p| *p == 0));
        assert_eq!(fb.pixels().len(), 2048);
        assert!(fb.is_dirty());
    }

    #[test]
    fn test_paint_msb_first() {
        let mut fb = FrameBuffer::new();
        assert!(!fb.paint(0, 0, &[0b1000_0001]));
        assert!(fb.get_pixel(0, 0));
        assert!(!fb.get_pixel(1, 0));
        assert!(fb.get_pixel(7, 0));
    }

    #[test]
    fn test_paint_twice_erases_and_collides() {
        let mut fb = FrameBuffer::new();
        let sprite = [0xF0, 0x90, 0x90, 0x90, 0xF0];
        assert!(!fb.paint(10, 5, &sprite));
        assert!(fb.get_pixel(10, 5));
        assert!(fb.paint(10, 5, &sprite));
        assert!(fb.pixels().iter().all(|p| *p == 0));
    }

    #[test]
    fn test_paint_wraps_both_axes() {
        let mut fb = FrameBuffer::new();
        fb.paint(62, 31, &[0xFF, 0x80]);
        assert!(fb.get_pixel(62, 31));
        assert!(fb.get_pixel(63, 31));
        assert!(fb.get_pixel(0, 31));
        assert!(fb.get_pixel(5, 31));
        assert!(fb.get_pixel(62, 0));
    }

    #[test]
    fn test_dirty_tracking() {
        let mut fb = FrameBuffer::new();
        fb.clear_dirty();
        fb.paint(0, 0, &[0x00]);
        assert!(!fb.is_dirty());
        fb.paint(0, 0, &[0x01]);
        assert!(fb.is_dirty());
        fb.clear_dirty();
        fb.clear_buffer();
        assert!(fb.is_dirty());
    }
}
