use bytes::{Bytes, BytesMut};
use tracing::{debug, trace};

use crate::action::{ChannelAction, UnitAction, UnitId};
use crate::channel::{AddressingMode, Channel};
use crate::error::Result;
use crate::level::{Brightness, BrightnessCurve, DeviceDuration, DurationConversion};
use crate::protocol::{
    AND_MAGIC, BRIGHTNESS_SIZE, BROADCAST_UNIT_ID, CHANNEL_ID_MASK_MAGIC, DURATION_SIZE,
    HEARTBEAT_MAGIC, HEARTBEAT_SIZE, UNIT_ACTION_SIZE,
};
use crate::writer::FrameWriter;

/// Size of the `unit, magic|action` header shared by channel commands.
const CHANNEL_HEADER_SIZE: usize = 2;

/// Size of the `magic|FADE, from, to, duration` tail.
const FADE_TAIL_SIZE: usize = 1 + 2 * BRIGHTNESS_SIZE + DURATION_SIZE;

/// A single command, ready to be encoded.
///
/// Commands carry no state between encodes; encoding the same value twice
/// produces the same bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Broadcast keep-alive.
    Heartbeat,
    /// Bare action targeting a whole unit.
    UnitAction { unit: UnitId, action: UnitAction },
    /// Action targeting channels of a unit.
    ChannelAction {
        unit: UnitId,
        action: ChannelAction,
        channel: Channel,
    },
    /// Timed brightness transition.
    ChannelFade {
        unit: UnitId,
        channel: Channel,
        from: Brightness,
        to: Brightness,
        duration: DeviceDuration,
    },
    /// Foreground action joined with a fade in one transmission.
    ChannelFadeWith {
        unit: UnitId,
        foreground: ChannelAction,
        channel: Channel,
        from: Brightness,
        to: Brightness,
        duration: DeviceDuration,
    },
    /// Immediate brightness change.
    ChannelSetBrightness {
        unit: UnitId,
        channel: Channel,
        to: Brightness,
    },
}

impl Command {
    /// Stable lowercase name, used in logs and CLI output.
    pub fn kind(&self) -> &'static str {
        match self {
            Command::Heartbeat => "heartbeat",
            Command::UnitAction { .. } => "unit-action",
            Command::ChannelAction { .. } => "channel-action",
            Command::ChannelFade { .. } => "fade",
            Command::ChannelFadeWith { .. } => "fade-with",
            Command::ChannelSetBrightness { .. } => "set-brightness",
        }
    }

    /// Exact number of bytes this command occupies on the wire.
    pub fn wire_size(&self) -> usize {
        match self {
            Command::Heartbeat => HEARTBEAT_SIZE,
            Command::UnitAction { .. } => UNIT_ACTION_SIZE,
            Command::ChannelAction { channel, .. } => channel_action_size(channel),
            Command::ChannelFade { channel, .. } => channel_fade_size(channel),
            Command::ChannelFadeWith { channel, .. } => channel_fade_with_size(channel),
            Command::ChannelSetBrightness { channel, .. } => channel_set_brightness_size(channel),
        }
    }

    /// Encode into `dst`, returning the number of bytes written.
    pub fn encode(&self, dst: &mut [u8]) -> Result<usize> {
        let result = match *self {
            Command::Heartbeat => write_heartbeat(dst),
            Command::UnitAction { unit, action } => write_unit_action(unit, action, dst),
            Command::ChannelAction {
                unit,
                action,
                channel,
            } => write_channel_action(unit, action, channel, dst),
            Command::ChannelFade {
                unit,
                channel,
                from,
                to,
                duration,
            } => write_channel_fade(unit, channel, from, to, duration, dst),
            Command::ChannelFadeWith {
                unit,
                foreground,
                channel,
                from,
                to,
                duration,
            } => write_channel_fade_with(unit, foreground, channel, from, to, duration, dst),
            Command::ChannelSetBrightness { unit, channel, to } => {
                write_channel_set_brightness(unit, channel, to, dst)
            }
        };

        match &result {
            Ok(len) => trace!(command = self.kind(), len, "encoded command"),
            Err(err) => debug!(command = self.kind(), error = %err, "rejected command"),
        }
        result
    }

    /// Append the encoding to `dst`. On error `dst` is left unchanged.
    pub fn encode_to(&self, dst: &mut BytesMut) -> Result<usize> {
        let start = dst.len();
        dst.resize(start + self.wire_size(), 0);
        match self.encode(&mut dst[start..]) {
            Ok(written) => {
                dst.truncate(start + written);
                Ok(written)
            }
            Err(err) => {
                dst.truncate(start);
                Err(err)
            }
        }
    }

    /// Encode into a freshly allocated buffer.
    pub fn to_bytes(&self) -> Result<Bytes> {
        let mut buf = BytesMut::with_capacity(self.wire_size());
        self.encode_to(&mut buf)?;
        Ok(buf.freeze())
    }
}

/// Write the broadcast keep-alive: `BROADCAST, AND, HEARTBEAT`.
pub fn write_heartbeat(dst: &mut [u8]) -> Result<usize> {
    let mut writer = FrameWriter::new(dst);
    writer.ensure(HEARTBEAT_SIZE)?;
    writer.put_slice(&[BROADCAST_UNIT_ID, AND_MAGIC, HEARTBEAT_MAGIC])?;
    Ok(writer.finish())
}

/// Write a device brightness code verbatim.
pub fn write_brightness(brightness: Brightness, dst: &mut [u8]) -> Result<usize> {
    let mut writer = FrameWriter::new(dst);
    writer.put_u8(brightness.code())?;
    Ok(writer.finish())
}

/// Apply `curve` to a normalized intensity and write the resulting code.
pub fn write_brightness_with<C>(normal: f32, curve: &C, dst: &mut [u8]) -> Result<usize>
where
    C: BrightnessCurve + ?Sized,
{
    write_brightness(curve.brightness(normal), dst)
}

/// Write a device duration code, big-endian.
pub fn write_duration(duration: DeviceDuration, dst: &mut [u8]) -> Result<usize> {
    let mut writer = FrameWriter::new(dst);
    writer.put_u16(duration.code())?;
    Ok(writer.finish())
}

/// Convert `seconds` with `conversion` and write the resulting code.
pub fn write_duration_secs<D>(seconds: f32, conversion: &D, dst: &mut [u8]) -> Result<usize>
where
    D: DurationConversion + ?Sized,
{
    write_duration(conversion.duration(seconds), dst)
}

/// Write a channel address: optional chain index, then 1 or 2 address bytes.
pub fn write_channel(channel: Channel, dst: &mut [u8]) -> Result<usize> {
    channel.validate()?;
    let mut writer = FrameWriter::new(dst);
    writer.ensure(channel.wire_size())?;
    put_channel(&mut writer, &channel)?;
    Ok(writer.finish())
}

/// Write `unit, magic|action, channel`.
pub fn write_channel_action(
    unit: UnitId,
    action: ChannelAction,
    channel: Channel,
    dst: &mut [u8],
) -> Result<usize> {
    channel.validate()?;
    let mut writer = FrameWriter::new(dst);
    writer.ensure(channel_action_size(&channel))?;
    put_channel_action(&mut writer, unit, action, &channel)?;
    Ok(writer.finish())
}

/// Write `unit, magic|FADE, from, to, duration, channel`.
///
/// Brightness and duration come before the address here, unlike a plain
/// channel action.
pub fn write_channel_fade(
    unit: UnitId,
    channel: Channel,
    from: Brightness,
    to: Brightness,
    duration: DeviceDuration,
    dst: &mut [u8],
) -> Result<usize> {
    channel.validate()?;
    let mut writer = FrameWriter::new(dst);
    writer.ensure(channel_fade_size(&channel))?;
    writer.put_u8(unit)?;
    put_fade_tail(&mut writer, &channel, from, to, duration)?;
    put_channel(&mut writer, &channel)?;
    Ok(writer.finish())
}

/// Write a foreground action and a fade joined by `AND`:
/// `unit, magic|fg, channel, AND, magic|FADE, from, to, duration`.
pub fn write_channel_fade_with(
    unit: UnitId,
    foreground: ChannelAction,
    channel: Channel,
    from: Brightness,
    to: Brightness,
    duration: DeviceDuration,
    dst: &mut [u8],
) -> Result<usize> {
    channel.validate()?;
    let mut writer = FrameWriter::new(dst);
    writer.ensure(channel_fade_with_size(&channel))?;
    put_channel_action(&mut writer, unit, foreground, &channel)?;
    writer.put_u8(AND_MAGIC)?;
    put_fade_tail(&mut writer, &channel, from, to, duration)?;
    Ok(writer.finish())
}

/// Write `unit, magic|SET_BRIGHTNESS, to, channel`.
pub fn write_channel_set_brightness(
    unit: UnitId,
    channel: Channel,
    to: Brightness,
    dst: &mut [u8],
) -> Result<usize> {
    channel.validate()?;
    let mut writer = FrameWriter::new(dst);
    writer.ensure(channel_set_brightness_size(&channel))?;
    writer.put_u8(unit)?;
    writer.put_u8(ChannelAction::SET_BRIGHTNESS.with_magic(channel.magic()))?;
    writer.put_u8(to.code())?;
    put_channel(&mut writer, &channel)?;
    Ok(writer.finish())
}

/// Write `unit, action`.
pub fn write_unit_action(unit: UnitId, action: UnitAction, dst: &mut [u8]) -> Result<usize> {
    let mut writer = FrameWriter::new(dst);
    writer.ensure(UNIT_ACTION_SIZE)?;
    writer.put_u8(unit)?;
    writer.put_u8(action.code())?;
    Ok(writer.finish())
}

fn put_channel(writer: &mut FrameWriter<'_>, channel: &Channel) -> Result<()> {
    if let Some(index) = channel.chain_index {
        writer.put_u8(index.get())?;
    }
    // validate() has already bounded `bits` to the mode's width.
    match channel.mode {
        AddressingMode::Id => writer.put_u8(CHANNEL_ID_MASK_MAGIC | channel.bits as u8),
        AddressingMode::Mask8 => writer.put_u8(channel.bits as u8),
        AddressingMode::Mask16 => writer.put_u16(channel.bits),
    }
}

fn put_channel_action(
    writer: &mut FrameWriter<'_>,
    unit: UnitId,
    action: ChannelAction,
    channel: &Channel,
) -> Result<()> {
    writer.put_u8(unit)?;
    writer.put_u8(action.with_magic(channel.magic()))?;
    put_channel(writer, channel)
}

fn put_fade_tail(
    writer: &mut FrameWriter<'_>,
    channel: &Channel,
    from: Brightness,
    to: Brightness,
    duration: DeviceDuration,
) -> Result<()> {
    writer.put_u8(ChannelAction::FADE.with_magic(channel.magic()))?;
    writer.put_u8(from.code())?;
    writer.put_u8(to.code())?;
    writer.put_u16(duration.code())
}

fn channel_action_size(channel: &Channel) -> usize {
    CHANNEL_HEADER_SIZE + channel.wire_size()
}

fn channel_fade_size(channel: &Channel) -> usize {
    1 + FADE_TAIL_SIZE + channel.wire_size()
}

fn channel_fade_with_size(channel: &Channel) -> usize {
    channel_action_size(channel) + 1 + FADE_TAIL_SIZE
}

fn channel_set_brightness_size(channel: &Channel) -> usize {
    CHANNEL_HEADER_SIZE + BRIGHTNESS_SIZE + channel.wire_size()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FrameError;
    use crate::protocol::{
        CHANNEL_MAGIC_ID, CHANNEL_MAGIC_MASK16, CHANNEL_MAGIC_MASK8, MAX_COMMAND_SIZE,
    };

    fn encode(command: &Command) -> Vec<u8> {
        let mut buf = [0u8; MAX_COMMAND_SIZE];
        let n = command.encode(&mut buf).unwrap();
        buf[..n].to_vec()
    }

    fn sample_channels() -> Vec<Channel> {
        vec![
            Channel::id(0x05),
            Channel::mask8(0xA5),
            Channel::mask16(0x00FF),
            Channel::id(0x7F).with_chain_index(1),
            Channel::mask8(0x01).with_chain_index(3),
            Channel::mask16(0xFFFF).with_chain_index(255),
        ]
    }

    fn sample_commands() -> Vec<Command> {
        let mut commands = vec![
            Command::Heartbeat,
            Command::UnitAction {
                unit: 2,
                action: UnitAction(0x41),
            },
        ];
        for channel in sample_channels() {
            commands.push(Command::ChannelAction {
                unit: 1,
                action: ChannelAction::ON,
                channel,
            });
            commands.push(Command::ChannelFade {
                unit: 1,
                channel,
                from: Brightness(0),
                to: Brightness(255),
                duration: DeviceDuration(0x0102),
            });
            commands.push(Command::ChannelFadeWith {
                unit: 1,
                foreground: ChannelAction::SET_SHIMMER,
                channel,
                from: Brightness(10),
                to: Brightness(20),
                duration: DeviceDuration(0x0A0B),
            });
            commands.push(Command::ChannelSetBrightness {
                unit: 1,
                channel,
                to: Brightness(128),
            });
        }
        commands
    }

    #[test]
    fn heartbeat_bytes() {
        let mut buf = [0u8; 8];
        let n = write_heartbeat(&mut buf).unwrap();
        assert_eq!(n, 3);
        assert_eq!(&buf[..n], &[0xFF, 0x81, 0x56]);
    }

    #[test]
    fn brightness_is_verbatim() {
        let mut buf = [0u8; 1];
        assert_eq!(write_brightness(Brightness(200), &mut buf).unwrap(), 1);
        assert_eq!(buf, [200]);
    }

    #[test]
    fn brightness_curve_is_applied() {
        let curve = |normal: f32| Brightness((normal * 100.0) as u8);
        let mut buf = [0u8; 1];
        assert_eq!(write_brightness_with(0.5, &curve, &mut buf).unwrap(), 1);
        assert_eq!(buf, [50]);
    }

    #[test]
    fn duration_is_big_endian() {
        let mut buf = [0u8; 2];
        assert_eq!(write_duration(DeviceDuration(0x1234), &mut buf).unwrap(), 2);
        assert_eq!(buf, [0x12, 0x34]);
    }

    #[test]
    fn duration_conversion_is_applied() {
        let tenths = |seconds: f32| DeviceDuration((seconds * 10.0) as u16);
        let mut buf = [0u8; 2];
        assert_eq!(write_duration_secs(30.0, &tenths, &mut buf).unwrap(), 2);
        assert_eq!(buf, [0x01, 0x2C]);
    }

    #[test]
    fn channel_address_layouts() {
        let mut buf = [0u8; 3];

        let n = write_channel(Channel::id(0x05), &mut buf).unwrap();
        assert_eq!(&buf[..n], &[0x85]);

        let n = write_channel(Channel::mask8(0xA5), &mut buf).unwrap();
        assert_eq!(&buf[..n], &[0xA5]);

        let n = write_channel(Channel::mask16(0xBEEF), &mut buf).unwrap();
        assert_eq!(&buf[..n], &[0xBE, 0xEF]);

        let n = write_channel(Channel::mask16(0x0102).with_chain_index(7), &mut buf).unwrap();
        assert_eq!(&buf[..n], &[0x07, 0x01, 0x02]);
    }

    #[test]
    fn channel_address_length_formula() {
        for channel in sample_channels() {
            let mut buf = [0u8; 3];
            let n = write_channel(channel, &mut buf).unwrap();
            let chain = usize::from(channel.chain_index.is_some());
            let width = match channel.mode {
                AddressingMode::Id | AddressingMode::Mask8 => 1,
                AddressingMode::Mask16 => 2,
            };
            assert_eq!(n, chain + width, "{channel:?}");
        }
    }

    #[test]
    fn chain_index_boundary() {
        let mut buf = [0u8; 3];

        let n = write_channel(Channel::mask8(0x0F).with_chain_index(0), &mut buf).unwrap();
        assert_eq!(&buf[..n], &[0x0F]);

        let n = write_channel(Channel::mask8(0x0F).with_chain_index(1), &mut buf).unwrap();
        assert_eq!(&buf[..n], &[0x01, 0x0F]);
    }

    #[test]
    fn mask16_channel_action() {
        let bytes = encode(&Command::ChannelAction {
            unit: 5,
            action: ChannelAction::ON,
            channel: Channel::mask16(0x00FF),
        });
        assert_eq!(bytes, vec![5, CHANNEL_MAGIC_MASK16 | 0x01, 0x00, 0xFF]);
    }

    #[test]
    fn id_channel_action_with_chain() {
        let bytes = encode(&Command::ChannelAction {
            unit: 0x10,
            action: ChannelAction::SET_TWINKLE,
            channel: Channel::id(0x02).with_chain_index(4),
        });
        assert_eq!(bytes, vec![0x10, CHANNEL_MAGIC_ID | 0x07, 0x04, 0x82]);
    }

    #[test]
    fn channel_fade_layout() {
        let bytes = encode(&Command::ChannelFade {
            unit: 3,
            channel: Channel::mask8(0x81),
            from: Brightness(0x01),
            to: Brightness(0xF0),
            duration: DeviceDuration(0x0203),
        });
        assert_eq!(
            bytes,
            vec![3, CHANNEL_MAGIC_MASK8 | 0x04, 0x01, 0xF0, 0x02, 0x03, 0x81]
        );
    }

    #[test]
    fn channel_fade_with_layout() {
        let bytes = encode(&Command::ChannelFadeWith {
            unit: 3,
            foreground: ChannelAction::SET_SHIMMER,
            channel: Channel::mask16(0x1234).with_chain_index(2),
            from: Brightness(0x00),
            to: Brightness(0xFF),
            duration: DeviceDuration(0x0050),
        });
        assert_eq!(
            bytes,
            vec![
                3,
                CHANNEL_MAGIC_MASK16 | 0x06,
                0x02,
                0x12,
                0x34,
                AND_MAGIC,
                CHANNEL_MAGIC_MASK16 | 0x04,
                0x00,
                0xFF,
                0x00,
                0x50,
            ]
        );
        assert_eq!(bytes.len(), MAX_COMMAND_SIZE);
    }

    #[test]
    fn fade_with_is_action_and_fade_tail() {
        for channel in sample_channels() {
            let (from, to, duration) = (Brightness(9), Brightness(99), DeviceDuration(0xABCD));
            let combined = encode(&Command::ChannelFadeWith {
                unit: 7,
                foreground: ChannelAction::SET_TWINKLE,
                channel,
                from,
                to,
                duration,
            });

            let mut expected = encode(&Command::ChannelAction {
                unit: 7,
                action: ChannelAction::SET_TWINKLE,
                channel,
            });
            expected.push(AND_MAGIC);
            let mut tail = [0u8; FADE_TAIL_SIZE];
            let mut writer = FrameWriter::new(&mut tail);
            put_fade_tail(&mut writer, &channel, from, to, duration).unwrap();
            assert_eq!(writer.finish(), FADE_TAIL_SIZE);
            expected.extend_from_slice(&tail);

            assert_eq!(combined, expected, "{channel:?}");
        }
    }

    #[test]
    fn set_brightness_layout() {
        let bytes = encode(&Command::ChannelSetBrightness {
            unit: 9,
            channel: Channel::id(0x00),
            to: Brightness(0x40),
        });
        assert_eq!(bytes, vec![9, CHANNEL_MAGIC_ID | 0x03, 0x40, 0x80]);
    }

    #[test]
    fn unit_action_layout() {
        let mut buf = [0u8; 2];
        assert_eq!(write_unit_action(0x22, UnitAction(0x41), &mut buf).unwrap(), 2);
        assert_eq!(buf, [0x22, 0x41]);
    }

    #[test]
    fn wire_size_matches_encoding() {
        for command in sample_commands() {
            assert_eq!(encode(&command).len(), command.wire_size(), "{command:?}");
        }
    }

    #[test]
    fn encoding_is_idempotent() {
        for command in sample_commands() {
            let mut first = [0u8; MAX_COMMAND_SIZE];
            let mut second = [0xEEu8; MAX_COMMAND_SIZE];
            let a = command.encode(&mut first).unwrap();
            let b = command.encode(&mut second).unwrap();
            assert_eq!(&first[..a], &second[..b], "{command:?}");
        }
    }

    #[test]
    fn invalid_bits_rejected_before_writing() {
        let channel = Channel::new(AddressingMode::Id, 0x0100);
        let mut buf = [0u8; MAX_COMMAND_SIZE];
        let err = write_channel_fade_with(
            1,
            ChannelAction::ON,
            channel,
            Brightness(1),
            Brightness(2),
            DeviceDuration(3),
            &mut buf,
        )
        .unwrap_err();

        assert!(matches!(err, FrameError::InvalidChannelBits { .. }));
        assert_eq!(buf, [0u8; MAX_COMMAND_SIZE]);
    }

    #[test]
    fn short_buffer_rejected_before_writing() {
        for command in sample_commands() {
            let size = command.wire_size();
            let mut buf = vec![0u8; size - 1];
            let err = command.encode(&mut buf).unwrap_err();
            assert_eq!(
                err,
                FrameError::BufferTooSmall {
                    needed: size,
                    available: size - 1,
                },
                "{command:?}"
            );
            assert!(buf.iter().all(|b| *b == 0), "partial write for {command:?}");
        }
    }

    #[test]
    fn larger_buffer_is_fine() {
        let mut buf = [0u8; 64];
        let n = Command::Heartbeat.encode(&mut buf).unwrap();
        assert_eq!(n, 3);
        assert!(buf[n..].iter().all(|b| *b == 0));
    }

    #[test]
    fn encode_to_appends() {
        let mut buf = BytesMut::new();
        Command::Heartbeat.encode_to(&mut buf).unwrap();
        Command::UnitAction {
            unit: 1,
            action: UnitAction(2),
        }
        .encode_to(&mut buf)
        .unwrap();
        assert_eq!(buf.as_ref(), &[0xFF, 0x81, 0x56, 0x01, 0x02]);
    }

    #[test]
    fn encode_to_leaves_buffer_on_error() {
        let mut buf = BytesMut::from(&[0xAA][..]);
        let command = Command::ChannelAction {
            unit: 1,
            action: ChannelAction::ON,
            channel: Channel::new(AddressingMode::Mask8, 0x1FF),
        };
        assert!(command.encode_to(&mut buf).is_err());
        assert_eq!(buf.as_ref(), &[0xAA]);
    }

    #[test]
    fn to_bytes_matches_encode() {
        for command in sample_commands() {
            let bytes = command.to_bytes().unwrap();
            assert_eq!(bytes.as_ref(), encode(&command).as_slice());
        }
    }

    #[test]
    fn kinds() {
        let kinds: Vec<_> = sample_commands().iter().take(6).map(Command::kind).collect();
        assert_eq!(
            kinds,
            vec![
                "heartbeat",
                "unit-action",
                "channel-action",
                "fade",
                "fade-with",
                "set-brightness",
            ]
        );
    }
}
