use std::env;
use std::error::Error;
use std::fs::File;
use std::time::{Duration, Instant};

use chip8_emu::display::{Display, MonoTermDisplay, DISPLAY_HEIGHT, DISPLAY_WIDTH};
use chip8_emu::input::{Input, StdinInput};
use chip8_emu::interpreter::{Chip8Interpreter, Settings, TICK_RATE_HZ};

/// terminals only report key-down events, so a pressed key is held for this
/// many frames before being released
const KEY_HOLD_FRAMES: u32 = 6;

const USAGE: &str = "usage: chip8-emu <rom> [--quirks jmsr] [--speed 500]";

struct Args {
    rom_path: String,
    settings: Settings,
}

fn parse_args(argv: &[String]) -> Result<Args, Box<dyn Error>> {
    let rom_path = argv.first().ok_or(USAGE)?.clone();
    let mut settings = Settings::default();

    let mut iter = argv[1..].iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--quirks" => {
                let letters = iter.next().ok_or("--quirks needs a value")?;
                for letter in letters.chars() {
                    match letter {
                        'j' => settings.jumping = true,
                        'm' => settings.memory = true,
                        's' => settings.shifting = true,
                        'r' => settings.vf_reset = true,
                        _ => return Err(format!("unknown quirk '{}'", letter).into()),
                    }
                }
            }
            "--speed" => {
                let hz: u32 = iter.next().ok_or("--speed needs a value")?.parse()?;
                settings.cycles_per_tick = Settings::from_speed(hz).cycles_per_tick;
            }
            other => return Err(format!("unknown argument '{}'\n{}", other, USAGE).into()),
        }
    }
    Ok(Args { rom_path, settings })
}

fn main() -> Result<(), Box<dyn Error>> {
    let argv: Vec<String> = env::args().skip(1).collect();
    let args = parse_args(&argv)?;

    // initialise
    let mut display = MonoTermDisplay::new(DISPLAY_WIDTH, DISPLAY_HEIGHT)?;
    let mut input = StdinInput::new();
    let mut chip8 = Chip8Interpreter::new();
    *chip8.settings_mut() = args.settings;

    // load a program
    let mut f = File::open(&args.rom_path)?;
    chip8.load_program(&mut f)?;

    // 60Hz main loop: keys in, one tick, frame out
    let frame = Duration::from_secs(1) / TICK_RATE_HZ;
    let mut frame_count: u32 = 0;
    loop {
        let start = Instant::now();

        if frame_count % KEY_HOLD_FRAMES == 0 {
            chip8.release_all_keys();
            input.flush_keys()?;
        }
        let keys = input.peek_keys()?.to_vec();
        for key in keys {
            chip8.press_key(key);
        }

        chip8.tick()?;
        display.draw(chip8.display())?;

        frame_count = frame_count.wrapping_add(1);
        spin_sleep::sleep(frame.saturating_sub(start.elapsed()));
    }
}
