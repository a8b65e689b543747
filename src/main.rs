use std::fs;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{bail, Context, Result};
use chipvm::{
    frontend::{scale_from_factor, Frontend},
    sound::Beeper,
    AddOverflow, Config, Emulator,
};
use clap::{ArgAction, CommandFactory, Parser};

// keeps the loop from spinning a core flat out
const LOOP_SLEEP: Duration = Duration::from_micros(500);

#[derive(Parser, Debug)]
#[command(name = "chipvm")]
#[command(about = "CHIP-8 interpreter", long_about = None)]
struct Args {
    /// Path to the ROM image
    rom: Option<PathBuf>,

    /// Instructions executed per second
    #[arg(long, default_value_t = 240.0, value_parser = parse_hz)]
    hz: f64,

    /// Window scale factor (1, 2, 4, 8, 16 or 32)
    #[arg(long, default_value_t = 16)]
    scale: u8,

    /// Seed for the random number instruction
    #[arg(long)]
    seed: Option<u64>,

    /// Halt instead of wrapping when 7XNN overflows a register
    #[arg(long, action = ArgAction::SetTrue)]
    strict_add: bool,

    /// Disable audio output
    #[arg(long, action = ArgAction::SetTrue)]
    mute: bool,
}

impl Args {
    fn config(&self) -> Config {
        let add_overflow = if self.strict_add {
            AddOverflow::Fault
        } else {
            AddOverflow::Wrap
        };
        Config::default()
            .with_instruction_hz(self.hz)
            .with_add_overflow(add_overflow)
            .with_seed(self.seed)
    }
}

fn parse_hz(s: &str) -> Result<f64, String> {
    let hz: f64 = s.parse().map_err(|err| format!("{err}"))?;
    if hz.is_finite() && hz > 0.0 {
        Ok(hz)
    } else {
        Err(format!("{s} is not a positive rate"))
    }
}

fn load(rom: &Path, config: &Config) -> Result<Emulator> {
    let program =
        fs::read(rom).with_context(|| format!("cannot open file {}", rom.display()))?;
    let emu = Emulator::new(&program, config)
        .with_context(|| format!("cannot load {}", rom.display()))?;
    log::info!("loaded {} bytes from {}", program.len(), rom.display());
    Ok(emu)
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("chipvm=info"))
        .init();

    run(Args::parse())
}

fn run(args: Args) -> Result<()> {
    let Some(rom) = args.rom.as_deref() else {
        Args::command().print_help()?;
        println!();
        return Ok(());
    };
    let mut emu = load(rom, &args.config())?;

    let mut frontend = Frontend::new(scale_from_factor(args.scale))?;
    let mut beeper = if args.mute {
        None
    } else {
        match Beeper::new() {
            Ok(beeper) => Some(beeper),
            Err(err) => {
                log::warn!("running muted: {err}");
                None
            }
        }
    };

    let mut last = Instant::now();
    while frontend.is_open() {
        let now = Instant::now();
        let dt = now.duration_since(last).as_secs_f64();
        last = now;

        let keys = frontend.key_state();
        let report = match emu.frame(dt, &keys, frontend.pressed_key()) {
            Ok(report) => report,
            Err(err) => {
                let regs: Vec<u8> = (0..16).map(|r| emu.registers().get(r)).collect();
                log::debug!("registers at halt: {regs:02x?}");
                bail!("machine halted at {:#05x}: {err}", emu.memory().pc.0)
            }
        };

        if let (Some(edge), Some(b)) = (report.sound, beeper.as_mut()) {
            if let Err(err) = b.apply(edge) {
                log::warn!("sound {edge:?} failed: {err}");
            }
        }

        if report.redraw {
            frontend.render(emu.framebuffer())?;
        } else {
            frontend.poll();
        }
        thread::sleep(LOOP_SLEEP);
    }

    log::info!("window closed");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chipvm::memory::MAX_PROGRAM_LEN;

    fn scratch_rom(name: &str, bytes: &[u8]) -> PathBuf {
        let path = std::env::temp_dir().join(format!("chipvm-{}-{name}.ch8", std::process::id()));
        fs::write(&path, bytes).unwrap();
        path
    }

    #[test]
    fn test_args_definition() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_no_rom_prints_usage_and_succeeds() {
        let args = Args::try_parse_from(["chipvm"]).unwrap();
        assert!(args.rom.is_none());
        assert!(run(args).is_ok());
    }

    #[test]
    fn test_hz_must_be_positive() {
        assert!(Args::try_parse_from(["chipvm", "--hz", "0"]).is_err());
        assert!(Args::try_parse_from(["chipvm", "--hz=-60"]).is_err());
        assert!(Args::try_parse_from(["chipvm", "--hz", "inf"]).is_err());
        assert!(Args::try_parse_from(["chipvm", "--hz", "fast"]).is_err());
        let args = Args::try_parse_from(["chipvm", "--hz", "500"]).unwrap();
        assert_eq!(args.config().instruction_hz, 500.0);
    }

    #[test]
    fn test_flags_map_onto_config() {
        let args =
            Args::try_parse_from(["chipvm", "--strict-add", "--seed", "9", "game.ch8"]).unwrap();
        let config = args.config();
        assert_eq!(config.add_overflow, AddOverflow::Fault);
        assert_eq!(config.seed, Some(9));
        assert_eq!(args.rom, Some(PathBuf::from("game.ch8")));

        let config = Args::try_parse_from(["chipvm"]).unwrap().config();
        assert_eq!(config.add_overflow, AddOverflow::Wrap);
        assert_eq!(config.instruction_hz, 240.0);
    }

    #[test]
    fn test_missing_rom_fails() {
        let path = std::env::temp_dir().join("chipvm-does-not-exist.ch8");
        let err = load(&path, &Config::default()).err().unwrap();
        assert!(err.to_string().starts_with("cannot open file"));
    }

    #[test]
    fn test_oversized_rom_fails() {
        let path = scratch_rom("big", &vec![0; MAX_PROGRAM_LEN + 1]);
        let err = load(&path, &Config::default()).err().unwrap();
        fs::remove_file(&path).unwrap();
        assert!(err.to_string().starts_with("cannot load"));
    }

    #[test]
    fn test_rom_loads() {
        let path = scratch_rom("idle", &[0x12, 0x00]);
        let emu = load(&path, &Config::default()).unwrap();
        fs::remove_file(&path).unwrap();
        assert_eq!(emu.memory().program_end(), 0x202);
    }
}
