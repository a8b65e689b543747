use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{FromSample, Sample, SizedSample};

use crate::{emulator::SoundEdge, error::SoundError};

const TONE_HZ: f32 = 440.0;

/// A looping tone on the default output device, started and stopped on
/// sound timer edges.
pub struct Beeper {
    stream: cpal::Stream,
    playing: bool,
}

impl Beeper {
    pub fn new() -> Result<Self, SoundError> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or(SoundError::NoDevice)?;
        let supported_config = device.default_output_config()?;
        let sample_format = supported_config.sample_format();
        let config: cpal::StreamConfig = supported_config.into();

        let stream = match sample_format {
            cpal::SampleFormat::I8 => build::<i8>(&device, &config),
            cpal::SampleFormat::I16 => build::<i16>(&device, &config),
            cpal::SampleFormat::I32 => build::<i32>(&device, &config),
            cpal::SampleFormat::I64 => build::<i64>(&device, &config),
            cpal::SampleFormat::U8 => build::<u8>(&device, &config),
            cpal::SampleFormat::U16 => build::<u16>(&device, &config),
            cpal::SampleFormat::U32 => build::<u32>(&device, &config),
            cpal::SampleFormat::U64 => build::<u64>(&device, &config),
            cpal::SampleFormat::F32 => build::<f32>(&device, &config),
            cpal::SampleFormat::F64 => build::<f64>(&device, &config),
            sample_format => return Err(SoundError::Format(sample_format)),
        }?;
        // some backends start streams as soon as they are built
        stream.pause()?;

        Ok(Self {
            stream,
            playing: false,
        })
    }

    pub fn apply(&mut self, edge: SoundEdge) -> Result<(), SoundError> {
        match edge {
            SoundEdge::Start if !self.playing => {
                self.stream.play()?;
                self.playing = true;
            }
            SoundEdge::Stop if self.playing => {
                self.stream.pause()?;
                self.playing = false;
            }
            _ => {}
        }
        Ok(())
    }
}

fn build<T>(device: &cpal::Device, config: &cpal::StreamConfig) -> Result<cpal::Stream, SoundError>
where
    T: SizedSample + FromSample<f32>,
{
    let sample_rate = config.sample_rate.0 as f32;
    let channels = config.channels as usize;

    let mut sample_clock = 0f32;
    let mut next_value = move || {
        sample_clock = (sample_clock + 1.0) % sample_rate;
        tone(sample_clock, sample_rate)
    };

    let err_fn = |err| log::error!("an error occurred on stream: {err}");

    let stream = device.build_output_stream(
        config,
        move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
            write_data(data, channels, &mut next_value)
        },
        err_fn,
        None,
    )?;
    Ok(stream)
}

// square wave at a quarter of full scale
fn tone(sample_clock: f32, sample_rate: f32) -> f32 {
    let phase = (sample_clock * TONE_HZ / sample_rate).fract();
    if phase < 0.5 {
        0.25
    } else {
        -0.25
    }
}

fn write_data<T>(output: &mut [T], channels: usize, next_sample: &mut dyn FnMut() -> f32)
where
    T: Sample + FromSample<f32>,
{
    for frame in output.chunks_mut(channels) {
        let value: T = T::from_sample(next_sample());
        for sample in frame.iter_mut() {
            *sample = value;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_data_fills_every_channel() {
        let mut out = [0f32; 6];
        let mut values = [0.5f32, -0.5, 0.25].into_iter();
        let mut next = move || values.next().unwrap_or(0.0);
        write_data(&mut out, 2, &mut next);
        assert_eq!(out, [0.5, 0.5, -0.5, -0.5, 0.25, 0.25]);
    }

    #[test]
    fn test_tone_is_square() {
        let rate = 44_100.0;
        assert_eq!(tone(0.0, rate), 0.25);
        // half a period of 440 Hz is ~50 samples
        assert_eq!(tone(60.0, rate), -0.25);
        assert_eq!(tone(110.0, rate), 0.25);
    }
}
