//! iTerm2 inline-image encoder for headless terminal output.
//!
//! Frames are PNG-encoded, base64-wrapped and framed in an
//! `ESC ] 1337 ; File=...` sequence. Buffers are reused between frames.

use std::io::Write;

use base64::Engine;

use crate::error::Result;
use crate::export::encode_png;

#[derive(Default)]
pub struct Iterm2Encoder {
    png_buf: Vec<u8>,
    b64_buf: String,
    seq_buf: Vec<u8>,
}

impl Iterm2Encoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Encode an RGBA pixel buffer into an iTerm2 inline image escape sequence.
    ///
    /// `width`/`height` are the image dimensions; `disp_w`/`disp_h` are the
    /// pixel size the terminal should scale it to.
    pub fn encode(
        &mut self,
        rgba: &[u8],
        width: usize,
        height: usize,
        disp_w: usize,
        disp_h: usize,
    ) -> Result<&[u8]> {
        self.png_buf.clear();
        encode_png(rgba, width, height, &mut self.png_buf)?;

        self.b64_buf.clear();
        base64::engine::general_purpose::STANDARD.encode_string(&self.png_buf, &mut self.b64_buf);

        self.seq_buf.clear();
        write!(
            self.seq_buf,
            "\x1b]1337;File=inline=1;size={};width={}px;height={}px;preserveAspectRatio=0:{}\x07",
            self.png_buf.len(),
            disp_w,
            disp_h,
            self.b64_buf,
        )?;

        Ok(self.seq_buf.as_slice())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_test_rgba(width: usize, height: usize) -> Vec<u8> {
        let mut rgba = vec![0u8; width * height * 4];
        for y in 0..height {
            for x in 0..width {
                let i = (y * width + x) * 4;
                rgba[i] = (x * 255 / width.max(1)) as u8; // R
                rgba[i + 1] = (y * 255 / height.max(1)) as u8; // G
                rgba[i + 2] = 128; // B
                rgba[i + 3] = 255; // A
            }
        }
        rgba
    }

    fn payload(seq: &[u8]) -> Vec<u8> {
        let as_str = std::str::from_utf8(seq).expect("Should be valid UTF-8");
        let colon_pos = as_str.rfind(':').expect("Should contain colon separator");
        let b64_data = &as_str[colon_pos + 1..as_str.len() - 1]; // strip trailing BEL
        base64::engine::general_purpose::STANDARD
            .decode(b64_data)
            .expect("Base64 payload should decode")
    }

    #[test]
    fn test_encode_produces_valid_escape_sequence() {
        let mut encoder = Iterm2Encoder::new();
        let rgba = make_test_rgba(32, 16);
        let result = encoder.encode(&rgba, 32, 16, 32, 16).unwrap();

        assert!(
            result.starts_with(b"\x1b]1337;File="),
            "Should start with iTerm2 escape prefix, got {:?}",
            &result[..result.len().min(20)]
        );
        assert_eq!(result.last(), Some(&0x07), "Should end with BEL character");

        let as_str = std::str::from_utf8(result).expect("Should be valid UTF-8");
        assert!(as_str.contains("inline=1"), "Should contain inline=1");
    }

    #[test]
    fn test_payload_is_decodable_png() {
        let mut encoder = Iterm2Encoder::new();
        let rgba = make_test_rgba(16, 8);
        let png_bytes = payload(encoder.encode(&rgba, 16, 8, 16, 8).unwrap());

        let decoder = png::Decoder::new(std::io::Cursor::new(&png_bytes));
        let mut reader = decoder.read_info().expect("PNG should be decodable");
        let mut buf = vec![0u8; reader.output_buffer_size()];
        let info = reader.next_frame(&mut buf).expect("PNG frame should be readable");
        assert_eq!((info.width, info.height), (16, 8));
        assert_eq!(info.color_type, png::ColorType::Rgba);
        assert_eq!(&buf[..info.buffer_size()], &rgba[..], "RGBA should pass through");
    }

    #[test]
    fn test_size_field_matches_png_length() {
        let mut encoder = Iterm2Encoder::new();
        let rgba = make_test_rgba(8, 6);
        let seq = encoder.encode(&rgba, 8, 6, 8, 6).unwrap().to_vec();
        let png_len = payload(&seq).len();
        let as_str = std::str::from_utf8(&seq).unwrap();
        assert!(as_str.contains(&format!("size={};", png_len)));
    }

    #[test]
    fn test_encode_reuse_buffers() {
        let mut encoder = Iterm2Encoder::new();
        let len1 = encoder.encode(&make_test_rgba(8, 6), 8, 6, 8, 6).unwrap().len();
        let result2 = encoder.encode(&make_test_rgba(64, 48), 64, 48, 64, 48).unwrap();
        assert!(result2.len() > len1, "Larger image should produce larger output");
        assert!(result2.starts_with(b"\x1b]1337;File="));
        assert_eq!(result2.last(), Some(&0x07));
    }

    #[test]
    fn test_encode_display_dimensions_differ_from_image() {
        let mut encoder = Iterm2Encoder::new();
        let rgba = make_test_rgba(16, 8);
        let result = encoder.encode(&rgba, 16, 8, 640, 320).unwrap();

        let as_str = std::str::from_utf8(result).expect("Valid UTF-8");
        assert!(as_str.contains("width=640px"), "Should use display width");
        assert!(as_str.contains("height=320px"), "Should use display height");
        assert!(!as_str.contains("width=16px"), "Should NOT use image width");
    }

    #[test]
    fn test_encode_rejects_short_buffer() {
        let mut encoder = Iterm2Encoder::new();
        assert!(encoder.encode(&[0u8; 8], 4, 4, 4, 4).is_err());
    }
}
