use lorprims_frame::{Brightness, ChannelAction, Command as FrameCommand, DeviceDuration, UnitAction};

use crate::cmd::{parse_number, Command, FadeWithArgs};
use crate::exit::{frame_error, CliError, CliResult, SUCCESS, USAGE};
use crate::output::{print_encoded, OutputFormat};

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    let frame_command = build_command(command)?;
    let bytes = frame_command
        .to_bytes()
        .map_err(|err| frame_error("encode failed", err))?;

    tracing::debug!(
        command = frame_command.kind(),
        size = bytes.len(),
        "encoded command"
    );
    print_encoded(&frame_command, &bytes, format)?;
    Ok(SUCCESS)
}

fn build_command(command: Command) -> CliResult<FrameCommand> {
    let built = match command {
        Command::Heartbeat => FrameCommand::Heartbeat,
        Command::UnitAction(args) => FrameCommand::UnitAction {
            unit: args.unit,
            action: UnitAction(args.action),
        },
        Command::ChannelAction(args) => FrameCommand::ChannelAction {
            unit: args.unit,
            action: resolve_action(&args.action)?,
            channel: args.channel.channel(),
        },
        Command::Fade(args) => FrameCommand::ChannelFade {
            unit: args.unit,
            channel: args.channel.channel(),
            from: Brightness(args.from),
            to: Brightness(args.to),
            duration: DeviceDuration(args.duration),
        },
        Command::FadeWith(args) => {
            let FadeWithArgs { action, fade } = args;
            FrameCommand::ChannelFadeWith {
                unit: fade.unit,
                foreground: resolve_action(&action)?,
                channel: fade.channel.channel(),
                from: Brightness(fade.from),
                to: Brightness(fade.to),
                duration: DeviceDuration(fade.duration),
            }
        }
        Command::SetBrightness(args) => FrameCommand::ChannelSetBrightness {
            unit: args.unit,
            channel: args.channel.channel(),
            to: Brightness(args.to),
        },
        Command::Version(_) => {
            return Err(CliError::new(USAGE, "version is not an encodable command"));
        }
    };
    Ok(built)
}

/// Resolve an action given by name or numeric code.
fn resolve_action(input: &str) -> CliResult<ChannelAction> {
    if let Some(action) = ChannelAction::from_name(input) {
        return Ok(action);
    }

    let code = parse_number(input)
        .map_err(|_| CliError::new(USAGE, format!("unknown channel action: {input}")))?;
    let code = u8::try_from(code)
        .map_err(|_| CliError::new(USAGE, format!("channel action out of range: {input}")))?;

    ChannelAction::new(code).map_err(|err| frame_error("invalid channel action", err))
}
