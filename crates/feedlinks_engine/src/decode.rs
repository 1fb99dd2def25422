use std::borrow::Cow;
use std::fmt;

use encoding_rs::{Encoding, UTF_16BE, UTF_16LE, UTF_8, WINDOWS_1250};
use feedlinks_logging::{feed_debug, feed_trace};

/// Bytes windows-1250 leaves unassigned. `encoding_rs` maps them to C1
/// controls, so the strict decoder rejects them explicitly.
const WINDOWS_1250_UNDEFINED: [u8; 5] = [0x81, 0x83, 0x88, 0x90, 0x98];

/// Candidate encodings, tried in [`TextEncoding::CANDIDATE_ORDER`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextEncoding {
    Utf7,
    Utf8,
    Utf32Be,
    Utf32Le,
    Utf16Be,
    Utf16Le,
    Windows1250,
}

impl TextEncoding {
    /// Fixed priority list. This is not charset detection: the first
    /// candidate that decodes cleanly wins, and the last one doubles as the
    /// lossy fallback.
    pub const CANDIDATE_ORDER: [TextEncoding; 7] = [
        TextEncoding::Utf7,
        TextEncoding::Utf8,
        TextEncoding::Utf32Be,
        TextEncoding::Utf32Le,
        TextEncoding::Utf16Be,
        TextEncoding::Utf16Le,
        TextEncoding::Windows1250,
    ];

    pub fn label(self) -> &'static str {
        match self {
            TextEncoding::Utf7 => "UTF-7",
            TextEncoding::Utf8 => "UTF-8",
            TextEncoding::Utf32Be => "UTF-32BE",
            TextEncoding::Utf32Le => "UTF-32LE",
            TextEncoding::Utf16Be => "UTF-16BE",
            TextEncoding::Utf16Le => "UTF-16LE",
            TextEncoding::Windows1250 => "windows-1250",
        }
    }

    /// Decode `bytes` with this encoding alone, failing on the first
    /// malformed sequence. Byte order marks are kept as U+FEFF.
    pub fn decode_strict(self, bytes: &[u8]) -> Result<String, DecodeError> {
        match self {
            TextEncoding::Utf7 => decode_utf7(bytes).map_err(|message| self.failure(message)),
            TextEncoding::Utf8 => decode_with(bytes, UTF_8).ok_or_else(|| self.malformed()),
            TextEncoding::Utf32Be => {
                decode_utf32(bytes, u32::from_be_bytes).map_err(|message| self.failure(message))
            }
            TextEncoding::Utf32Le => {
                decode_utf32(bytes, u32::from_le_bytes).map_err(|message| self.failure(message))
            }
            TextEncoding::Utf16Be => decode_with(bytes, UTF_16BE).ok_or_else(|| self.malformed()),
            TextEncoding::Utf16Le => decode_with(bytes, UTF_16LE).ok_or_else(|| self.malformed()),
            TextEncoding::Windows1250 => {
                if let Some(position) = bytes
                    .iter()
                    .position(|b| WINDOWS_1250_UNDEFINED.contains(b))
                {
                    return Err(self.failure(format!(
                        "undefined byte 0x{:02x} at offset {position}",
                        bytes[position]
                    )));
                }
                decode_with(bytes, WINDOWS_1250).ok_or_else(|| self.malformed())
            }
        }
    }

    fn failure(self, message: impl Into<String>) -> DecodeError {
        DecodeError::DecodeFailure {
            encoding: self.label().to_string(),
            message: message.into(),
        }
    }

    fn malformed(self) -> DecodeError {
        self.failure("malformed byte sequence")
    }
}

impl fmt::Display for TextEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedDocument {
    pub text: String,
    pub encoding: TextEncoding,
    /// True when no candidate succeeded and invalid bytes were dropped.
    pub lossy: bool,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("failed to decode bytes with {encoding}: {message}")]
    DecodeFailure { encoding: String, message: String },
}

/// Decode raw bytes into text by walking [`TextEncoding::CANDIDATE_ORDER`].
///
/// Never fails: when every candidate rejects the input, the bytes are decoded as
/// windows-1250 with its undefined bytes skipped.
pub fn decode_document(bytes: &[u8]) -> DecodedDocument {
    for encoding in TextEncoding::CANDIDATE_ORDER {
        match encoding.decode_strict(bytes) {
            Ok(text) => {
                return DecodedDocument {
                    text,
                    encoding,
                    lossy: false,
                }
            }
            Err(err) => feed_trace!("Candidate rejected: {}", err),
        }
    }

    feed_debug!(
        "No encoding decoded {} bytes cleanly, falling back to lossy windows-1250",
        bytes.len()
    );
    let filtered: Vec<u8> = bytes
        .iter()
        .copied()
        .filter(|b| !WINDOWS_1250_UNDEFINED.contains(b))
        .collect();
    let (text, _) = WINDOWS_1250.decode_without_bom_handling(&filtered);
    DecodedDocument {
        text: text.into_owned(),
        encoding: TextEncoding::Windows1250,
        lossy: true,
    }
}

fn decode_with(bytes: &[u8], enc: &'static Encoding) -> Option<String> {
    enc.decode_without_bom_handling_and_without_replacement(bytes)
        .map(Cow::into_owned)
}

fn decode_utf32(bytes: &[u8], to_u32: fn([u8; 4]) -> u32) -> Result<String, String> {
    if bytes.len() % 4 != 0 {
        return Err(format!("length {} is not a multiple of 4", bytes.len()));
    }
    let mut text = String::with_capacity(bytes.len() / 4);
    for (index, chunk) in bytes.chunks_exact(4).enumerate() {
        let unit = to_u32([chunk[0], chunk[1], chunk[2], chunk[3]]);
        let ch = char::from_u32(unit)
            .ok_or_else(|| format!("invalid code point 0x{unit:08x} at offset {}", index * 4))?;
        text.push(ch);
    }
    Ok(text)
}

/// RFC 2152 decoding. Direct characters are any byte below 0x80 except `+`;
/// `+` opens a modified-base64 run of UTF-16 code units.
fn decode_utf7(bytes: &[u8]) -> Result<String, String> {
    let mut text = String::with_capacity(bytes.len());
    let mut index = 0;

    while index < bytes.len() {
        let byte = bytes[index];
        if byte >= 0x80 {
            return Err(format!("unexpected byte 0x{byte:02x} at offset {index}"));
        }
        if byte != b'+' {
            text.push(char::from(byte));
            index += 1;
            continue;
        }

        let start = index;
        index += 1;
        match bytes.get(index) {
            Some(b'-') => {
                text.push('+');
                index += 1;
                continue;
            }
            Some(&next) if base64_value(next).is_none() => {
                return Err(format!("ill-formed sequence at offset {start}"));
            }
            _ => {}
        }

        let mut shift = ShiftState::default();
        while let Some(value) = bytes.get(index).copied().and_then(base64_value) {
            if let Some(ch) = shift.push(value).map_err(|m| format!("{m} at offset {start}"))? {
                text.push(ch);
            }
            index += 1;
        }
        shift.finish().map_err(|m| format!("{m} at offset {start}"))?;

        // A '-' closes the run silently; any other terminator is a direct char.
        if bytes.get(index) == Some(&b'-') {
            index += 1;
        }
    }

    Ok(text)
}

#[derive(Default)]
struct ShiftState {
    bits: u32,
    bit_count: u32,
    high_surrogate: Option<u16>,
}

impl ShiftState {
    fn push(&mut self, value: u8) -> Result<Option<char>, &'static str> {
        self.bits = (self.bits << 6) | u32::from(value);
        self.bit_count += 6;
        if self.bit_count < 16 {
            return Ok(None);
        }
        self.bit_count -= 16;
        let unit = ((self.bits >> self.bit_count) & 0xFFFF) as u16;
        self.bits &= (1 << self.bit_count) - 1;
        self.unit(unit)
    }

    fn unit(&mut self, unit: u16) -> Result<Option<char>, &'static str> {
        match (self.high_surrogate.take(), unit) {
            (Some(high), 0xDC00..=0xDFFF) => {
                let scalar =
                    0x10000 + ((u32::from(high) - 0xD800) << 10) + (u32::from(unit) - 0xDC00);
                char::from_u32(scalar)
                    .map(Some)
                    .ok_or("invalid surrogate pair")
            }
            (Some(_), _) => Err("unpaired high surrogate"),
            (None, 0xD800..=0xDBFF) => {
                self.high_surrogate = Some(unit);
                Ok(None)
            }
            (None, 0xDC00..=0xDFFF) => Err("unpaired low surrogate"),
            (None, _) => char::from_u32(u32::from(unit))
                .map(Some)
                .ok_or("invalid code unit"),
        }
    }

    fn finish(&self) -> Result<(), &'static str> {
        if self.high_surrogate.is_some() {
            Err("unpaired high surrogate")
        } else if self.bit_count >= 6 {
            Err("partial character in shift sequence")
        } else if self.bits != 0 {
            Err("non-zero padding bits in shift sequence")
        } else {
            Ok(())
        }
    }
}

fn base64_value(byte: u8) -> Option<u8> {
    match byte {
        b'A'..=b'Z' => Some(byte - b'A'),
        b'a'..=b'z' => Some(byte - b'a' + 26),
        b'0'..=b'9' => Some(byte - b'0' + 52),
        b'+' => Some(62),
        b'/' => Some(63),
        _ => None,
    }
}
