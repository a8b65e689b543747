// 16 8-bit data registers named V0 to VF
// I -> address register, masked to 12 bits on access
//
// Stack of 16 return addresses; overflow and underflow halt the machine
//
// Delay timer & Sound timer: Count down at 60 times / s until 0
// Beep while sound timer is non-zero
//
// Display res: 64 width, 32 height
//
// 35 opcodes, each are 2 bytes (big-endian)
//      NNN: address
//      NN: 8-bit constant
//      N: 4-bit constant
//      X and Y: 4-bit register identifier
//
// Separately paced from the host's frame deltas:
// CPU: 240 times per second (configurable), at most once per frame
// Display: 60 times per second
// Timer: 60 times per second

pub mod config;
pub mod decode;
pub mod display;
pub mod emulator;
pub mod error;
pub mod frontend;
pub mod keyboard;
pub mod memory;
pub mod registers;
pub mod sound;
pub mod timer;

pub use config::{AddOverflow, Config};
pub use decode::{OpCodes, RawInstruction};
pub use display::{FrameBuffer, HEIGHT, WIDTH};
pub use emulator::{Emulator, FrameReport, SoundEdge};
pub use error::{LoadError, SoundError, VmError};
pub use keyboard::{InputState, KeyState, Keypad};
