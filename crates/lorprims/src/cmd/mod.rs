use clap::{ArgGroup, Args, Subcommand};
use lorprims_frame::{Channel, UnitId};

use crate::exit::CliResult;
use crate::output::OutputFormat;

pub mod encode;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Encode a broadcast heartbeat.
    Heartbeat,
    /// Encode a bare action for a whole unit.
    UnitAction(UnitActionArgs),
    /// Encode an action for channels of a unit.
    ChannelAction(ChannelActionArgs),
    /// Encode a timed fade.
    Fade(FadeArgs),
    /// Encode a foreground action joined with a fade.
    FadeWith(FadeWithArgs),
    /// Encode an immediate brightness change.
    SetBrightness(SetBrightnessArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Version(args) => version::run(args),
        other => encode::run(other, format),
    }
}

#[derive(Args, Debug)]
#[command(group(
    ArgGroup::new("address")
        .required(true)
        .args(["id", "mask8", "mask16"])
))]
pub struct ChannelArgs {
    /// Address a single channel by id.
    #[arg(long, value_parser = parse_u8)]
    pub id: Option<u8>,
    /// Address up to 8 channels by mask.
    #[arg(long, value_parser = parse_u8)]
    pub mask8: Option<u8>,
    /// Address up to 16 channels by mask.
    #[arg(long, value_parser = parse_u16)]
    pub mask16: Option<u16>,
    /// Chained sub-unit (0 = not chained).
    #[arg(long, value_parser = parse_u8, default_value = "0")]
    pub chain: u8,
}

impl ChannelArgs {
    pub fn channel(&self) -> Channel {
        let channel = match (self.id, self.mask8, self.mask16) {
            (Some(id), _, _) => Channel::id(id),
            (_, Some(mask), _) => Channel::mask8(mask),
            (_, _, Some(mask)) => Channel::mask16(mask),
            // The required arg group guarantees one of the above.
            (None, None, None) => Channel::mask8(0),
        };
        channel.with_chain_index(self.chain)
    }
}

#[derive(Args, Debug)]
pub struct UnitActionArgs {
    /// Target unit id.
    #[arg(long, value_parser = parse_u8)]
    pub unit: UnitId,
    /// Device-defined unit action code.
    #[arg(long, value_parser = parse_u8)]
    pub action: u8,
}

#[derive(Args, Debug)]
pub struct ChannelActionArgs {
    /// Target unit id.
    #[arg(long, value_parser = parse_u8)]
    pub unit: UnitId,
    /// Action name (on, set-brightness, fade, shimmer, twinkle) or code.
    #[arg(long)]
    pub action: String,
    #[command(flatten)]
    pub channel: ChannelArgs,
}

#[derive(Args, Debug)]
pub struct FadeArgs {
    /// Target unit id.
    #[arg(long, value_parser = parse_u8)]
    pub unit: UnitId,
    /// Starting brightness code.
    #[arg(long, value_parser = parse_u8)]
    pub from: u8,
    /// Final brightness code.
    #[arg(long, value_parser = parse_u8)]
    pub to: u8,
    /// Device duration code.
    #[arg(long, value_parser = parse_u16)]
    pub duration: u16,
    #[command(flatten)]
    pub channel: ChannelArgs,
}

#[derive(Args, Debug)]
pub struct FadeWithArgs {
    /// Foreground action name or code.
    #[arg(long)]
    pub action: String,
    #[command(flatten)]
    pub fade: FadeArgs,
}

#[derive(Args, Debug)]
pub struct SetBrightnessArgs {
    /// Target unit id.
    #[arg(long, value_parser = parse_u8)]
    pub unit: UnitId,
    /// Brightness code.
    #[arg(long, value_parser = parse_u8)]
    pub to: u8,
    #[command(flatten)]
    pub channel: ChannelArgs,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}

/// Parse a decimal or `0x`-prefixed hex number.
pub fn parse_number(input: &str) -> Result<u64, String> {
    let input = input.trim();
    let parsed = match input
        .strip_prefix("0x")
        .or_else(|| input.strip_prefix("0X"))
    {
        Some(hex) => u64::from_str_radix(hex, 16),
        None => input.parse(),
    };
    parsed.map_err(|_| format!("invalid number: {input}"))
}

fn parse_u8(input: &str) -> Result<u8, String> {
    let value = parse_number(input)?;
    u8::try_from(value).map_err(|_| format!("{input} does not fit in 8 bits"))
}

fn parse_u16(input: &str) -> Result<u16, String> {
    let value = parse_number(input)?;
    u16::try_from(value).map_err(|_| format!("{input} does not fit in 16 bits"))
}
