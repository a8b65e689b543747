use thiserror::Error;

/// Fatal halt conditions. Once one is recorded the machine stops executing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum VmError {
    #[error("stack overflow")]
    StackOverflow,
    #[error("stack underflow")]
    StackUnderflow,
    #[error("out of bounds memory access")]
    OutOfBoundsMemoryAccess,
    #[error("arithmetic overflow")]
    ArithmeticOverflow,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LoadError {
    #[error("program is {len} bytes, at most {max} fit in memory")]
    ProgramTooLarge { len: usize, max: usize },
}

#[derive(Debug, Error)]
pub enum SoundError {
    #[error("no output device available")]
    NoDevice,
    #[error("error while querying configs: {0}")]
    Config(#[from] cpal::DefaultStreamConfigError),
    #[error("unsupported sample format '{0}'")]
    Format(cpal::SampleFormat),
    #[error("could not build stream: {0}")]
    Build(#[from] cpal::BuildStreamError),
    #[error("could not start stream: {0}")]
    Play(#[from] cpal::PlayStreamError),
    #[error("could not pause stream: {0}")]
    Pause(#[from] cpal::PauseStreamError),
}
