//! Multipart frame codec.
//!
//! One long-lived response carries repeating units of
//! `\r\n--<boundary>\r\n`, a part header with `Content-Type`,
//! `Content-Length`, and `X-Timestamp`, then exactly `Content-Length` bytes
//! of JPEG payload. The boundary token is fixed; clients key on it from the
//! response's `Content-Type`.

use framecast_core::FrameTimestamp;
use thiserror::Error;

/// The fixed boundary token, as it appears in the content type.
pub const BOUNDARY_TOKEN: &str = "123456789000000000000987654321";

/// Content type of the streaming response.
pub const STREAM_CONTENT_TYPE: &str =
    "multipart/x-mixed-replace;boundary=123456789000000000000987654321";

/// Boundary marker written before every part.
pub const BOUNDARY: &str = "\r\n--123456789000000000000987654321\r\n";

/// Render the header block of one part.
///
/// `len` must be the exact byte length of the JPEG payload that follows.
pub fn part_header(len: usize, timestamp: &FrameTimestamp) -> String {
    format!(
        "Content-Type: image/jpeg\r\nContent-Length: {}\r\nX-Timestamp: {}\r\n\r\n",
        len, timestamp
    )
}

/// Errors that can occur while decoding a multipart unit.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    /// Input does not start with the boundary marker.
    #[error("input does not start with the stream boundary")]
    MissingBoundary,
    /// The header block never terminates.
    #[error("part header is incomplete")]
    TruncatedHeader,
    /// A required header field is missing or unreadable.
    #[error("part header field missing or malformed: {0}")]
    MalformedHeader(&'static str),
    /// Fewer payload bytes than the declared Content-Length.
    #[error("payload shorter than declared Content-Length")]
    TruncatedPayload,
}

/// One decoded multipart unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Part {
    /// The declared Content-Length.
    pub content_length: usize,
    /// The X-Timestamp value, verbatim (`<sec>.<usec6>`).
    pub timestamp: String,
    pub payload: Vec<u8>,
}

/// Decode one part from the front of `input`, returning it along with the
/// unconsumed remainder.
pub fn parse_part(input: &[u8]) -> Result<(Part, &[u8]), ParseError> {
    let rest = input
        .strip_prefix(BOUNDARY.as_bytes())
        .ok_or(ParseError::MissingBoundary)?;

    let header_end = find(rest, b"\r\n\r\n").ok_or(ParseError::TruncatedHeader)?;
    let header = std::str::from_utf8(&rest[..header_end])
        .map_err(|_| ParseError::MalformedHeader("non-utf8 header"))?;

    let mut content_length: Option<usize> = None;
    let mut timestamp: Option<&str> = None;
    for line in header.split("\r\n") {
        if let Some(v) = line.strip_prefix("Content-Length: ") {
            content_length = v.parse().ok();
        } else if let Some(v) = line.strip_prefix("X-Timestamp: ") {
            timestamp = Some(v);
        }
    }
    let content_length =
        content_length.ok_or(ParseError::MalformedHeader("Content-Length"))?;
    let timestamp = timestamp.ok_or(ParseError::MalformedHeader("X-Timestamp"))?;

    let body = &rest[header_end + 4..];
    if body.len() < content_length {
        return Err(ParseError::TruncatedPayload);
    }

    let part = Part {
        content_length,
        timestamp: timestamp.to_string(),
        payload: body[..content_length].to_vec(),
    };
    Ok((part, &body[content_length..]))
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constants_agree_on_token() {
        assert!(STREAM_CONTENT_TYPE.ends_with(BOUNDARY_TOKEN));
        assert_eq!(BOUNDARY, format!("\r\n--{}\r\n", BOUNDARY_TOKEN));
    }

    #[test]
    fn test_part_header_is_wire_exact() {
        let header = part_header(4096, &FrameTimestamp::new(17, 42));
        assert_eq!(
            header,
            "Content-Type: image/jpeg\r\nContent-Length: 4096\r\nX-Timestamp: 17.000042\r\n\r\n"
        );
    }

    #[test]
    fn test_parse_round_trip() {
        let payload = b"\xff\xd8some jpeg bytes\xff\xd9";
        let mut wire = Vec::new();
        wire.extend_from_slice(BOUNDARY.as_bytes());
        wire.extend_from_slice(part_header(payload.len(), &FrameTimestamp::new(9, 1)).as_bytes());
        wire.extend_from_slice(payload);

        let (part, rest) = parse_part(&wire).unwrap();
        assert_eq!(part.content_length, payload.len());
        assert_eq!(part.timestamp, "9.000001");
        assert_eq!(part.payload, payload);
        assert!(rest.is_empty());
    }

    #[test]
    fn test_parse_consumes_sequence_of_parts() {
        let mut wire = Vec::new();
        for (i, payload) in [b"aaaa".as_slice(), b"bb".as_slice()].iter().enumerate() {
            wire.extend_from_slice(BOUNDARY.as_bytes());
            wire.extend_from_slice(
                part_header(payload.len(), &FrameTimestamp::new(i as i64, 0)).as_bytes(),
            );
            wire.extend_from_slice(payload);
        }

        let (first, rest) = parse_part(&wire).unwrap();
        assert_eq!(first.payload, b"aaaa");
        let (second, rest) = parse_part(rest).unwrap();
        assert_eq!(second.payload, b"bb");
        assert_eq!(second.timestamp, "1.000000");
        assert!(rest.is_empty());
    }

    #[test]
    fn test_parse_rejects_missing_boundary() {
        assert_eq!(
            parse_part(b"Content-Type: image/jpeg").unwrap_err(),
            ParseError::MissingBoundary
        );
    }

    #[test]
    fn test_parse_rejects_short_payload() {
        let mut wire = Vec::new();
        wire.extend_from_slice(BOUNDARY.as_bytes());
        wire.extend_from_slice(part_header(10, &FrameTimestamp::new(0, 0)).as_bytes());
        wire.extend_from_slice(b"abc");
        assert_eq!(parse_part(&wire).unwrap_err(), ParseError::TruncatedPayload);
    }

    #[test]
    fn test_parse_rejects_headerless_part() {
        let mut wire = Vec::new();
        wire.extend_from_slice(BOUNDARY.as_bytes());
        wire.extend_from_slice(b"no terminator here");
        assert_eq!(parse_part(&wire).unwrap_err(), ParseError::TruncatedHeader);
    }
}
