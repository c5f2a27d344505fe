//! Command-line front end for the adaptive Morse decoder/encoder.

use std::io::{self, Read};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use morse::{encode_text, exit_code, mor, Codebook, ConvertMode, MorseConfig, MorseDecoder, RenewingDecoder};

#[derive(Parser)]
#[command(name = "morse-cli")]
#[command(about = "Decode or encode Morse code with an adaptively learned unit length")]
#[command(version)]
struct Cli {
    /// Path to a TOML config file overriding the default tuning knobs.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Path to a JSON codebook overriding the built-in ITU dialect.
    #[arg(long, global = true)]
    codebook: Option<PathBuf>,

    /// Increase log verbosity (-v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Decode a `.mor` sample stream into text.
    Decode {
        /// Input `.mor` file; reads stdin when omitted.
        input: Option<PathBuf>,

        /// Emit raw dot/dash patterns instead of decoded letters.
        #[arg(long)]
        morse_view: bool,

        /// Discard learned state and start a fresh learning session whenever
        /// a long pause is detected, instead of carrying it across.
        #[arg(long)]
        renew: bool,
    },
    /// Encode a line of text into a `.mor` sample stream.
    Encode {
        /// Text to encode.
        text: String,

        /// Unit length in milliseconds; overrides the config's `unit`.
        #[arg(long)]
        unit: Option<f64>,

        /// Output `.mor` file; writes stdout when omitted.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = run(cli);
    if let Err(e) = &result {
        tracing::error!(error = %e, "morse-cli failed");
        eprintln!("error: {e}");
    }
    ExitCode::from(exit_code(&result) as u8)
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "morse_cli=info,morse=warn",
        1 => "morse_cli=debug,morse=info",
        _ => "morse_cli=trace,morse=debug",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG").unwrap_or_else(|_| default_level.to_string()),
        )
        .init();
}

fn run(cli: Cli) -> morse::Result<()> {
    let config = match &cli.config {
        Some(path) => MorseConfig::load(path)?,
        None => MorseConfig::default(),
    };
    let config = config.apply_env_overrides()?;
    let codebook = match &cli.codebook {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .map_err(|e| morse::MorseError::process(format!("cannot read codebook: {e}")))?;
            Codebook::from_json(&text)?
        }
        None => Codebook::itu(),
    };

    match cli.command {
        Command::Decode {
            input,
            morse_view,
            renew,
        } => decode(config, codebook, input, morse_view, renew),
        Command::Encode { text, unit, output } => encode(config, codebook, text, unit, output),
    }
}

fn decode(
    mut config: MorseConfig,
    codebook: Codebook,
    input: Option<PathBuf>,
    morse_view: bool,
    renew: bool,
) -> morse::Result<()> {
    let samples = match input {
        Some(path) => mor::read(path)?,
        None => {
            let mut text = String::new();
            io::stdin()
                .read_to_string(&mut text)
                .map_err(|e| morse::MorseError::process(format!("cannot read stdin: {e}")))?;
            mor::read_str(&text)?
        }
    };

    config.enable_renewal = config.enable_renewal || renew;

    let mut out = String::new();
    if config.enable_renewal {
        // RenewingDecoder always decodes in alphabet view today; morse-view
        // renewal is left for a future revision since a mid-stream restart
        // would otherwise splice two codebook dialects' patterns together.
        let mut decoder = RenewingDecoder::spawn(config, codebook);
        for sample in samples {
            decoder.put(sample)?;
        }
        decoder.wait()?;
        loop {
            match decoder.try_get() {
                Ok(chunk) => out.push_str(&chunk),
                Err(e) if e.code() == morse::MorseError::CODE_TRANSLATOR => break,
                Err(e) => return Err(e),
            }
        }
        decoder.close()?;
    } else {
        let mode = if morse_view {
            ConvertMode::MorseView
        } else {
            ConvertMode::Alphabet
        };
        let mut decoder = MorseDecoder::spawn_with_mode(config, codebook, mode);
        for sample in samples {
            decoder.put(sample)?;
        }
        decoder.wait()?;
        while let Ok(chunk) = decoder.try_get() {
            out.push_str(&chunk);
        }
        decoder.close()?;
    }

    println!("{out}");
    Ok(())
}

fn encode(
    config: MorseConfig,
    codebook: Codebook,
    text: String,
    unit: Option<f64>,
    output: Option<PathBuf>,
) -> morse::Result<()> {
    let unit = unit.unwrap_or(config.unit);
    let samples = encode_text(&text.to_ascii_uppercase(), &codebook, unit)?;
    match output {
        Some(path) => mor::write(path, &samples)?,
        None => print!("{}", mor::write_str(&samples)),
    }
    Ok(())
}
