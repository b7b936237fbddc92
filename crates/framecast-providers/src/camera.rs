//! Synthetic camera platform.
//!
//! `PatternCamera` renders a deterministic moving gradient so the full
//! stream/capture path can run without camera hardware. In JPEG mode frames
//! come out pre-encoded (like a sensor with a hardware JPEG pipeline); in
//! RGB mode they come out raw and exercise the software encoder.

use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

use bytes::Bytes;
use image::codecs::jpeg::JpegEncoder;
use image::ExtendedColorType;

use framecast_core::{
    CameraPlatform, CaptureError, EncodeError, Frame, FrameFormat, FrameTimestamp, StorageError,
};

/// Test-pattern camera with filesystem snapshot storage.
pub struct PatternCamera {
    width: u32,
    height: u32,
    emit_jpeg: bool,
    quality: u8,
    ticks: AtomicU64,
}

impl PatternCamera {
    /// Camera producing raw RGB888 frames.
    pub fn rgb(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            emit_jpeg: false,
            quality: 80,
            ticks: AtomicU64::new(0),
        }
    }

    /// Camera producing frames already JPEG-encoded at `quality`.
    pub fn jpeg(width: u32, height: u32, quality: u8) -> Self {
        Self {
            width,
            height,
            emit_jpeg: true,
            quality,
            ticks: AtomicU64::new(0),
        }
    }

    /// Render one RGB888 frame of the moving gradient.
    fn render(&self, tick: u64) -> Vec<u8> {
        let mut rgb = Vec::with_capacity((self.width * self.height * 3) as usize);
        let shift = (tick % 256) as u32;
        for y in 0..self.height {
            for x in 0..self.width {
                rgb.push(((x + shift) % 256) as u8);
                rgb.push(((y + shift) % 256) as u8);
                rgb.push(((x + y) % 256) as u8);
            }
        }
        rgb
    }
}

fn encode_rgb(rgb: &[u8], width: u32, height: u32, quality: u8) -> Result<Vec<u8>, EncodeError> {
    let mut out = Vec::new();
    let mut encoder = JpegEncoder::new_with_quality(&mut out, quality);
    encoder
        .encode(rgb, width, height, ExtendedColorType::Rgb8)
        .map_err(|e| EncodeError::Encoder(e.to_string()))?;
    Ok(out)
}

impl CameraPlatform for PatternCamera {
    fn capture(&self) -> Result<Frame, CaptureError> {
        let tick = self.ticks.fetch_add(1, Ordering::Relaxed);
        let rgb = self.render(tick);
        let timestamp = FrameTimestamp::now();

        if self.emit_jpeg {
            let data = encode_rgb(&rgb, self.width, self.height, self.quality)
                .map_err(|e| CaptureError::Device(e.to_string()))?;
            Ok(Frame {
                data: Bytes::from(data),
                format: FrameFormat::Jpeg,
                timestamp,
            })
        } else {
            Ok(Frame {
                data: Bytes::from(rgb),
                format: FrameFormat::Raw {
                    width: self.width,
                    height: self.height,
                },
                timestamp,
            })
        }
    }

    fn encode_jpeg(&self, frame: Frame, quality: u8) -> Result<Bytes, EncodeError> {
        match frame.format {
            FrameFormat::Jpeg => Err(EncodeError::UnsupportedFormat),
            FrameFormat::Raw { width, height } => {
                let expected = width as usize * height as usize * 3;
                if frame.data.len() != expected {
                    return Err(EncodeError::BufferMismatch {
                        len: frame.data.len(),
                        width,
                        height,
                    });
                }
                encode_rgb(&frame.data, width, height, quality).map(Bytes::from)
            }
        }
    }

    fn persist(&self, path: &Path, data: &[u8]) -> Result<(), StorageError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(path, data)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const JPEG_SOI: [u8; 2] = [0xff, 0xd8];

    #[test]
    fn test_rgb_capture_has_expected_size() {
        let camera = PatternCamera::rgb(160, 120);
        let frame = camera.capture().unwrap();
        assert_eq!(frame.len(), 160 * 120 * 3);
        assert_eq!(
            frame.format,
            FrameFormat::Raw {
                width: 160,
                height: 120
            }
        );
    }

    #[test]
    fn test_jpeg_capture_is_encoded() {
        let camera = PatternCamera::jpeg(64, 48, 80);
        let frame = camera.capture().unwrap();
        assert!(frame.format.is_jpeg());
        assert_eq!(&frame.data[..2], &JPEG_SOI);
    }

    #[test]
    fn test_encode_jpeg_produces_jpeg_magic() {
        let camera = PatternCamera::rgb(32, 32);
        let frame = camera.capture().unwrap();
        let encoded = camera.encode_jpeg(frame, 80).unwrap();
        assert_eq!(&encoded[..2], &JPEG_SOI);
    }

    #[test]
    fn test_encode_rejects_already_encoded_frames() {
        let camera = PatternCamera::rgb(32, 32);
        let frame = Frame {
            data: Bytes::from_static(b"\xff\xd8\xff\xd9"),
            format: FrameFormat::Jpeg,
            timestamp: FrameTimestamp::new(0, 0),
        };
        assert!(matches!(
            camera.encode_jpeg(frame, 80),
            Err(EncodeError::UnsupportedFormat)
        ));
    }

    #[test]
    fn test_encode_rejects_mismatched_buffer() {
        let camera = PatternCamera::rgb(32, 32);
        let frame = Frame {
            data: Bytes::from_static(&[0u8; 10]),
            format: FrameFormat::Raw {
                width: 32,
                height: 32,
            },
            timestamp: FrameTimestamp::new(0, 0),
        };
        assert!(matches!(
            camera.encode_jpeg(frame, 80),
            Err(EncodeError::BufferMismatch { len: 10, .. })
        ));
    }

    #[test]
    fn test_persist_overwrites_snapshot() {
        let camera = PatternCamera::rgb(8, 8);
        let path = std::env::temp_dir().join(format!(
            "framecast-test-{}-capture.jpg",
            std::process::id()
        ));

        camera.persist(&path, b"first").unwrap();
        camera.persist(&path, b"second").unwrap();
        let on_disk = fs::read(&path).unwrap();
        assert_eq!(on_disk, b"second");

        fs::remove_file(&path).ok();
    }
}
