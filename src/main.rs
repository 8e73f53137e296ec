mod terminal;

use std::path::PathBuf;

use anyhow::Context;
use chip::{chip8::ChipSet, config::Config, definitions::cpu, resources::Rom, Runner};
use clap::Parser;
use log::LevelFilter;
use simple_logger::SimpleLogger;

use terminal::{TerminalDisplay, TerminalKeyboard};

/// Runs a chip 8 program inside the terminal.
///
/// The keys `1 2 3 4 / q w e r / a s d f / z x c v` map to the hex keypad,
/// `Esc` quits.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// The program file to run
    program: PathBuf,

    /// Use the original COSMAC VIP behaviour for the shift, jump with offset
    /// and register block instructions
    #[arg(long)]
    legacy: bool,

    /// Instructions per second
    #[arg(long, default_value_t = cpu::HERTZ)]
    hertz: u64,

    /// The maximum level of the log messages written
    #[arg(long, default_value_t = LevelFilter::Warn)]
    log_level: LevelFilter,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    SimpleLogger::new().with_level(args.log_level).init()?;

    let rom = Rom::from_file(&args.program)
        .with_context(|| format!("unable to load {}", args.program.display()))?;

    let config = if args.legacy {
        Config::legacy()
    } else {
        Config::default()
    }
    .with_hertz(args.hertz);

    let title = format!("{} ({})", rom.get_name(), config.compatibility.name());
    let chip = ChipSet::new(rom, config);

    let display = TerminalDisplay::new(title).context("unable to set up the terminal")?;
    let keyboard = TerminalKeyboard::new();

    // the terminal is restored once the runner is done
    let chip = Runner::new(chip, display, keyboard)
        .run()
        .context("the program stopped with a fault")?;

    log::info!("stopped\n{}", chip);

    Ok(())
}
