use bytes::{Buf, BufMut, Bytes, BytesMut};
use tsarchive_schema::{Channel, Header, ValueType};

use crate::config::CodecConfig;
use crate::error::{CodecError, Result};
use crate::varint::{get_u8, get_varint, put_varint};

/// Magic bytes: "TA" (0x54 0x41).
pub const MAGIC: [u8; 2] = [0x54, 0x41];

/// Current header format version.
pub const VERSION: u8 = 1;

/// Encode a header. The header is frozen by this call.
///
/// Wire format:
/// ```text
/// ┌──────────┬─────────┬──────┬──────────────────┬──────────┬─────────┐
/// │ "TA" (2) │ version │ name │ timestamp_origin │ n_records│ records │
/// └──────────┴─────────┴──────┴──────────────────┴──────────┴─────────┘
/// record:  record_id, record_name, n_channels, channels
/// channel: channel_name, value_type (u8), n_labels, labels
/// ```
/// Integers are varints; strings are a varint byte length followed by UTF-8.
pub fn encode_header(header: &Header) -> Result<Bytes> {
    header.freeze();

    let mut dst = BytesMut::new();
    dst.put_slice(&MAGIC);
    dst.put_u8(VERSION);
    put_string(&mut dst, header.name())?;
    put_varint(&mut dst, header.timestamp_origin());
    put_len(&mut dst, "record count", header.len())?;

    for record in header.records() {
        put_varint(&mut dst, record.id());
        put_string(&mut dst, record.name())?;
        put_len(&mut dst, "channel count", record.channel_count())?;
        for channel in record.channels() {
            put_string(&mut dst, channel.name())?;
            dst.put_u8(channel.value_type().tag());
            put_len(&mut dst, "label count", channel.labels().len())?;
            for label in channel.labels() {
                put_string(&mut dst, label)?;
            }
        }
    }

    tracing::debug!(header = %header.name(), bytes = dst.len(), "encoded header");
    Ok(dst.freeze())
}

/// Decode a header with default limits.
pub fn decode_header(src: &[u8]) -> Result<Header> {
    decode_header_with_config(src, &CodecConfig::default())
}

/// Decode a header, bounding every length and count by `config`.
///
/// Records are replayed through [`Header::add_record`], so a header that
/// violates a schema invariant fails with [`CodecError::Schema`]. The
/// returned header is frozen.
pub fn decode_header_with_config(mut src: &[u8], config: &CodecConfig) -> Result<Header> {
    if src.len() < MAGIC.len() {
        return Err(CodecError::TruncatedInput);
    }
    if src[..MAGIC.len()] != MAGIC {
        return Err(CodecError::InvalidMagic);
    }
    src.advance(MAGIC.len());

    let version = get_u8(&mut src)?;
    if version != VERSION {
        return Err(CodecError::UnsupportedVersion(version));
    }

    let name = get_string(&mut src, config)?;
    let timestamp_origin = get_varint(&mut src)?;
    let mut header = Header::new(name, timestamp_origin);

    let record_count = get_len(&mut src, "record count", config.max_records)?;
    for _ in 0..record_count {
        let record_id = get_varint(&mut src)?;
        let record_name = get_string(&mut src, config)?;
        let channel_count = get_len(&mut src, "channel count", config.max_channels_per_record)?;

        let mut channels = Vec::with_capacity(channel_count.min(src.len()));
        for _ in 0..channel_count {
            let channel_name = get_string(&mut src, config)?;
            let tag = get_u8(&mut src)?;
            let value_type = ValueType::from_tag(tag).ok_or(CodecError::UnknownValueType(tag))?;
            let label_count = get_len(&mut src, "label count", config.max_labels_per_channel)?;
            let mut labels = Vec::with_capacity(label_count.min(src.len()));
            for _ in 0..label_count {
                labels.push(get_string(&mut src, config)?);
            }
            channels.push(Channel::new(channel_name, value_type).with_labels(labels));
        }
        header.add_record(record_id, record_name, channels)?;
    }

    if !src.is_empty() {
        return Err(CodecError::TrailingData(src.len()));
    }

    header.freeze();
    Ok(header)
}

fn put_len(dst: &mut BytesMut, what: &'static str, len: usize) -> Result<()> {
    let len = u32::try_from(len).map_err(|_| CodecError::LimitExceeded {
        what,
        size: len,
        max: u32::MAX as usize,
    })?;
    put_varint(dst, len);
    Ok(())
}

fn put_string(dst: &mut BytesMut, value: &str) -> Result<()> {
    put_len(dst, "string", value.len())?;
    dst.put_slice(value.as_bytes());
    Ok(())
}

fn get_len(src: &mut &[u8], what: &'static str, max: usize) -> Result<usize> {
    let len = get_varint(src)? as usize;
    if len > max {
        return Err(CodecError::LimitExceeded {
            what,
            size: len,
            max,
        });
    }
    Ok(len)
}

fn get_string(src: &mut &[u8], config: &CodecConfig) -> Result<String> {
    let len = get_len(src, "string", config.max_string_len)?;
    if src.len() < len {
        return Err(CodecError::TruncatedInput);
    }
    let data: &[u8] = *src;
    let (bytes, rest) = data.split_at(len);
    let value = std::str::from_utf8(bytes)
        .map_err(|_| CodecError::InvalidUtf8)?
        .to_string();
    *src = rest;
    Ok(value)
}
