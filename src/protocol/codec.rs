//! Protocol codec
//!
//! Encoding and decoding functions for the wire protocol.
//!
//! Every frame is `tag (1) + payload_len (4, big-endian) + payload`. GET,
//! PUT and RESOLVE payloads start with a 4-byte length-prefixed key; PUT
//! appends the value as the remainder of the payload.

use std::io::{Read, Write};

use crate::error::{Result, RingKvError};

use super::{Command, Response, Status};

/// Header size: 1 byte command/status + 4 bytes length
pub const HEADER_SIZE: usize = 5;

/// Maximum payload size (16 MB)
pub const MAX_PAYLOAD_SIZE: u32 = 16 * 1024 * 1024;

// =============================================================================
// Command Encoding/Decoding
// =============================================================================

/// Encode a command to bytes
///
/// Format: cmd_type (1) + payload_len (4) + payload
pub fn encode_command(command: &Command) -> Vec<u8> {
    let payload = match command {
        Command::Get { key } | Command::Resolve { key } => key_field(key, 0),
        Command::Put { key, value } => {
            let mut payload = key_field(key, value.len());
            payload.extend_from_slice(value);
            payload
        }
        Command::Ping => Vec::new(),
    };

    frame(command.command_type() as u8, &payload)
}

/// Decode a command from bytes
pub fn decode_command(bytes: &[u8]) -> Result<Command> {
    let (tag, payload) = split_frame(bytes)?;

    match tag {
        0x01 => {
            let (key, rest) = read_key_field(payload)?;
            expect_empty(rest, "GET")?;
            Ok(Command::Get { key })
        }
        0x02 => {
            let (key, value) = read_key_field(payload)?;
            Ok(Command::Put {
                key,
                value: value.to_vec(),
            })
        }
        0x03 => {
            let (key, rest) = read_key_field(payload)?;
            expect_empty(rest, "RESOLVE")?;
            Ok(Command::Resolve { key })
        }
        0x04 => {
            expect_empty(payload, "PING")?;
            Ok(Command::Ping)
        }
        other => Err(RingKvError::Protocol(format!(
            "unknown command type: 0x{other:02x}"
        ))),
    }
}

// =============================================================================
// Response Encoding/Decoding
// =============================================================================

/// Encode a response to bytes
///
/// Format: status (1) + payload_len (4) + payload
pub fn encode_response(response: &Response) -> Vec<u8> {
    let payload = response.payload.as_deref().unwrap_or(&[]);
    frame(response.status as u8, payload)
}

/// Decode a response from bytes
pub fn decode_response(bytes: &[u8]) -> Result<Response> {
    let (tag, payload) = split_frame(bytes)?;

    let status = match tag {
        0x00 => Status::Ok,
        0x01 => Status::NotFound,
        0x02 => Status::Error,
        0x03 => Status::Unavailable,
        other => {
            return Err(RingKvError::Protocol(format!(
                "unknown response status: 0x{other:02x}"
            )))
        }
    };

    let payload = (!payload.is_empty()).then(|| payload.to_vec());

    Ok(Response { status, payload })
}

// =============================================================================
// Stream-based I/O helpers
// =============================================================================

/// Read a complete command from a stream
///
/// Blocks until a complete command is received or an error occurs
pub fn read_command<R: Read>(reader: &mut R) -> Result<Command> {
    decode_command(&read_frame(reader)?)
}

/// Write a command to a stream
pub fn write_command<W: Write>(writer: &mut W, command: &Command) -> Result<()> {
    writer.write_all(&encode_command(command))?;
    writer.flush()?;
    Ok(())
}

/// Read a complete response from a stream
pub fn read_response<R: Read>(reader: &mut R) -> Result<Response> {
    decode_response(&read_frame(reader)?)
}

/// Write a response to a stream
pub fn write_response<W: Write>(writer: &mut W, response: &Response) -> Result<()> {
    writer.write_all(&encode_response(response))?;
    writer.flush()?;
    Ok(())
}

// =============================================================================
// Framing internals
// =============================================================================

/// Build `tag + len + payload`.
fn frame(tag: u8, payload: &[u8]) -> Vec<u8> {
    let mut message = Vec::with_capacity(HEADER_SIZE + payload.len());
    message.push(tag);
    message.extend_from_slice(&(payload.len() as u32).to_be_bytes());
    message.extend_from_slice(payload);
    message
}

/// Split a buffer into its tag and payload, validating the header.
fn split_frame(bytes: &[u8]) -> Result<(u8, &[u8])> {
    if bytes.len() < HEADER_SIZE {
        return Err(RingKvError::Protocol(format!(
            "incomplete header: expected {} bytes, got {}",
            HEADER_SIZE,
            bytes.len()
        )));
    }

    let tag = bytes[0];
    let payload_len = payload_len(&bytes[1..HEADER_SIZE])?;

    let total_len = HEADER_SIZE + payload_len;
    if bytes.len() < total_len {
        return Err(RingKvError::Protocol(format!(
            "incomplete payload: expected {} bytes, got {}",
            total_len,
            bytes.len()
        )));
    }

    Ok((tag, &bytes[HEADER_SIZE..total_len]))
}

/// Read one whole frame (header + payload) off a stream.
fn read_frame<R: Read>(reader: &mut R) -> Result<Vec<u8>> {
    let mut header = [0u8; HEADER_SIZE];
    reader.read_exact(&mut header)?;

    let payload_len = payload_len(&header[1..])?;

    let mut message = vec![0u8; HEADER_SIZE + payload_len];
    message[..HEADER_SIZE].copy_from_slice(&header);
    if payload_len > 0 {
        reader.read_exact(&mut message[HEADER_SIZE..])?;
    }

    Ok(message)
}

/// Parse and bound-check the 4-byte payload length.
fn payload_len(bytes: &[u8]) -> Result<usize> {
    let len = u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
    if len > MAX_PAYLOAD_SIZE {
        return Err(RingKvError::Protocol(format!(
            "payload too large: {len} bytes (max {MAX_PAYLOAD_SIZE})"
        )));
    }
    Ok(len as usize)
}

/// Encode a length-prefixed key, reserving capacity for `trailing` bytes.
fn key_field(key: &[u8], trailing: usize) -> Vec<u8> {
    let mut payload = Vec::with_capacity(4 + key.len() + trailing);
    payload.extend_from_slice(&(key.len() as u32).to_be_bytes());
    payload.extend_from_slice(key);
    payload
}

/// Decode a length-prefixed key, returning it and the rest of the payload.
fn read_key_field(payload: &[u8]) -> Result<(Vec<u8>, &[u8])> {
    if payload.len() < 4 {
        return Err(RingKvError::Protocol("missing key length".to_string()));
    }

    let key_len = u32::from_be_bytes([payload[0], payload[1], payload[2], payload[3]]) as usize;
    if payload.len() < 4 + key_len {
        return Err(RingKvError::Protocol(format!(
            "incomplete key: expected {key_len} bytes, got {}",
            payload.len() - 4
        )));
    }

    Ok((payload[4..4 + key_len].to_vec(), &payload[4 + key_len..]))
}

fn expect_empty(rest: &[u8], what: &str) -> Result<()> {
    if rest.is_empty() {
        Ok(())
    } else {
        Err(RingKvError::Protocol(format!(
            "{what} command: unexpected trailing {} bytes",
            rest.len()
        )))
    }
}
