//! LED Board Driver
//!
//! Command-line driver for the 6x64 UART LED display board.
//!
//! # Usage
//!
//! ```bash
//! # Scroll some text across the board
//! ledboard --port /dev/ttyUSB0 show "HELLO WORLD" "SECOND MESSAGE"
//!
//! # Try it without hardware
//! ledboard --simulate show --row-shift-in --row-shift-out "HELLO WORLD"
//!
//! # Stream lines from another program
//! some-generator | ledboard --simulate show --hold-time 2
//!
//! # Bring-up checks
//! ledboard all-on
//! ledboard test-pattern --cycles 3
//!
//! # List serial ports (requires the serial feature)
//! ledboard ports
//! ```

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

use ledboard::builder::FrameBuilder;
use ledboard::config::{Config, Overrides};
use ledboard::font::{FontTable, GlyphSource, DEFAULT_FONT};
use ledboard::pattern::{run_test_pattern, show_all_on};
use ledboard::render::{render, render_lines, Player, RenderOptions};
use ledboard::sink::{OutputSink, SimulatorSink, ThreadSleeper, WriterSink};
use ledboard::ROWS;

#[cfg(feature = "serial")]
use ledboard::serial::{self, PortConfig, SerialConnection};

/// LED Board Driver
///
/// Renders text on the 6x64 UART LED display board
#[derive(Parser)]
#[command(name = "ledboard")]
#[command(author = "Prasanna Gautam")]
#[command(version = "0.1.0")]
#[command(about = "Render and scroll text on the 6x64 UART LED display board")]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file (TOML)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Serial port path (e.g., /dev/ttyUSB0)
    #[arg(short, long, global = true)]
    port: Option<String>,

    /// Baud rate (default: 38400)
    #[arg(short, long, global = true)]
    baud: Option<u32>,

    /// Use ASCII-art to simulate the board for testing (wins over --output)
    #[arg(long, global = true)]
    simulate: bool,

    /// Write the raw wire stream to a file or pty instead of a serial port
    #[arg(short, long, global = true)]
    output: Option<PathBuf>,

    /// Glyph table file (default: built-in 4x6 font)
    #[arg(long, global = true)]
    font: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Render strings on the board (reads lines from stdin if none given)
    Show(ShowArgs),

    /// Turn all 384 LEDs on
    AllOn,

    /// Sweep each row, then each column
    TestPattern {
        /// Number of sweeps (default: run until interrupted)
        #[arg(long)]
        cycles: Option<usize>,
    },

    /// List available serial ports
    #[cfg(feature = "serial")]
    Ports,

    /// Print the glyph table, or TEXT rendered with it, as ASCII art
    Font {
        /// Text to preview
        text: Option<String>,
    },
}

#[derive(Args)]
struct ShowArgs {
    /// Don't scroll horizontally, truncate
    #[arg(long)]
    truncate: bool,

    /// Shift in from the top at start
    #[arg(long)]
    row_shift_in: bool,

    /// Shift out through the bottom at end
    #[arg(long)]
    row_shift_out: bool,

    /// How long to wait before scrolling after a row shift in
    #[arg(long, value_name = "SECS")]
    row_in_hold: Option<f64>,

    /// How long to wait after rowshifting out
    #[arg(long, value_name = "SECS")]
    row_out_hold: Option<f64>,

    /// How long to leave each string up
    #[arg(long, value_name = "SECS")]
    hold_time: Option<f64>,

    /// Sleep time between each individual row shift
    #[arg(long, value_name = "SECS")]
    row_shift: Option<f64>,

    /// Sleep time between each column shift
    #[arg(long, value_name = "SECS")]
    col_shift: Option<f64>,

    /// Strings to write to the LEDs (stdin if none)
    strings: Vec<String>,
}

impl ShowArgs {
    /// Config values with command-line overrides applied
    fn options(&self, config: &Config) -> Result<RenderOptions> {
        config.render_options()?.with_overrides(&Overrides {
            truncate: self.truncate,
            row_shift_in: self.row_shift_in,
            row_shift_out: self.row_shift_out,
            row_shift: self.row_shift,
            col_shift: self.col_shift,
            row_in_hold: self.row_in_hold,
            row_out_hold: self.row_out_hold,
            hold_time: self.hold_time,
        })
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logger
    let default_filter = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter)).init();

    let config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    match &cli.command {
        Commands::Show(args) => handle_show(&cli, &config, args),
        Commands::AllOn => {
            let mut sink = open_sink(&cli, &config)?;
            let mut sleeper = ThreadSleeper;
            let mut player = Player::new(sink.as_mut(), &mut sleeper);
            show_all_on(&mut player)?;
            Ok(())
        }
        Commands::TestPattern { cycles } => {
            let mut sink = open_sink(&cli, &config)?;
            let mut sleeper = ThreadSleeper;
            let mut player = Player::new(sink.as_mut(), &mut sleeper);
            run_test_pattern(&mut player, *cycles)?;
            Ok(())
        }
        #[cfg(feature = "serial")]
        Commands::Ports => serial::print_ports(),
        Commands::Font { text } => handle_font(&cli, &config, text.as_deref()),
    }
}

fn handle_show(cli: &Cli, config: &Config, args: &ShowArgs) -> Result<()> {
    let options = args.options(config)?;
    let custom = load_font(cli, config)?;
    let font: &FontTable = custom.as_ref().unwrap_or(&*DEFAULT_FONT);

    let mut sink = open_sink(cli, config)?;
    let mut sleeper = ThreadSleeper;
    let mut player = Player::new(sink.as_mut(), &mut sleeper);

    if args.strings.is_empty() {
        log::info!("Reading lines from stdin");
        render_lines(&mut player, font, io::stdin().lock(), &options)?;
    } else {
        render(&mut player, font, args.strings.as_slice(), &options)?;
    }

    Ok(())
}

fn handle_font(cli: &Cli, config: &Config, text: Option<&str>) -> Result<()> {
    let custom = load_font(cli, config)?;
    let font: &FontTable = custom.as_ref().unwrap_or(&*DEFAULT_FONT);
    let builder = FrameBuilder::new(font);

    if let Some(text) = text {
        let frame = builder.build(text)?;
        for row in 0..ROWS {
            println!("[ {} ]", frame.row_string(row));
        }
        return Ok(());
    }

    println!("{}", "=".repeat(70));
    println!(
        "{}",
        format!("Glyph Table: {} glyphs, {}x{}", font.len(), font.glyph_width(), ROWS)
            .cyan()
            .bold()
    );
    println!("{}", "=".repeat(70));

    let characters: Vec<char> = font.characters().collect();
    for chunk in characters.chunks(16) {
        let text: String = chunk.iter().collect();
        let labels: String = chunk
            .iter()
            .map(|c| format!("{:<width$}", c, width = font.glyph_width()))
            .collect();
        println!("\n  {}", labels.white().bold());

        let frame = builder.build(&text)?;
        for row in 0..ROWS {
            println!("  {}", frame.row_string(row));
        }
    }

    println!("\n{}", "=".repeat(70));
    Ok(())
}

/// Glyph table from `--font` or the config file, if one was named
fn load_font(cli: &Cli, config: &Config) -> Result<Option<FontTable>> {
    cli.font
        .as_deref()
        .or(config.display.font.as_deref())
        .map(FontTable::load)
        .transpose()
}

/// Pick the output transport: simulator, raw file/pty, or serial port
fn open_sink(cli: &Cli, config: &Config) -> Result<Box<dyn OutputSink>> {
    if cli.simulate {
        log::info!("Simulating board on stdout");
        return Ok(Box::new(SimulatorSink::new(io::stdout())));
    }

    if let Some(path) = &cli.output {
        return open_file_sink(path);
    }

    open_serial_sink(cli, config)
}

fn open_file_sink(path: &Path) -> Result<Box<dyn OutputSink>> {
    let file = File::create(path)
        .with_context(|| format!("Failed to open output: {}", path.display()))?;
    log::info!("Writing wire stream to {}", path.display());
    Ok(Box::new(WriterSink::new(file)))
}

#[cfg(feature = "serial")]
fn open_serial_sink(cli: &Cli, config: &Config) -> Result<Box<dyn OutputSink>> {
    let port = cli.port.as_deref().unwrap_or(&config.serial.port);
    let baud = cli.baud.unwrap_or(config.serial.baud_rate);

    println!(
        "{} Connecting to {} at {} baud",
        "[*]".cyan().bold(),
        port.white(),
        baud
    );

    let conn = SerialConnection::open(PortConfig::new(port).with_baud_rate(baud))?;
    Ok(Box::new(WriterSink::new(conn)))
}

#[cfg(not(feature = "serial"))]
fn open_serial_sink(cli: &Cli, config: &Config) -> Result<Box<dyn OutputSink>> {
    let port = cli.port.as_deref().unwrap_or(&config.serial.port);
    let baud = cli.baud.unwrap_or(config.serial.baud_rate);
    anyhow::bail!(
        "Cannot open {} at {} baud: built without serial support. Rebuild with --features serial, or use --simulate / --output",
        port,
        baud
    )
}
