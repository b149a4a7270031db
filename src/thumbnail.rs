use std::path::Path;
use std::process::{Command, Stdio};

use anyhow::{anyhow, Context, Result};
use image::codecs::jpeg::JpegEncoder;
use image::{imageops::FilterType, DynamicImage};
use tracing::debug;

use crate::error::MediaError;

/// Minimum frame offset when picking a representative video frame. Skips
/// the black or blank lead-in common at the start of recordings while
/// still working for very short clips.
const MIN_SEEK_FRAME: u64 = 30;

/// Decode a still image and produce JPEG thumbnail bytes. The longer edge
/// ends up at `size` pixels (never upscaled past the original) with the
/// aspect ratio preserved; transparency is flattened away.
pub fn image_thumbnail(path: &Path, size: u32, quality: u8) -> Result<Vec<u8>, MediaError> {
    let img = image::open(path).map_err(|err| MediaError::decode(path, err))?;
    resize_and_encode(img, size, quality).map_err(|err| MediaError::decode(path, err))
}

/// Extract a representative frame from a video and thumbnail it exactly
/// like a still image. Seeks to frame `max(30, totalFrames / 10)`; if that
/// lands past the end of a short or malformed clip, the read fails and the
/// whole call reports a decode error.
pub fn video_frame_thumbnail(path: &Path, size: u32, quality: u8) -> Result<Vec<u8>, MediaError> {
    let frame = extract_frame(path).map_err(|err| MediaError::decode(path, err))?;
    let img = image::load_from_memory(&frame).map_err(|err| MediaError::decode(path, err))?;
    resize_and_encode(img, size, quality).map_err(|err| MediaError::decode(path, err))
}

fn resize_and_encode(img: DynamicImage, size: u32, quality: u8) -> Result<Vec<u8>> {
    // flatten alpha and palette modes to opaque three-channel
    let rgb = img.to_rgb8();
    let (width, height) = rgb.dimensions();

    // never upscale beyond the original
    let target = size.min(width.max(height));
    let resized = DynamicImage::ImageRgb8(rgb)
        .resize(target, target, FilterType::Lanczos3)
        .to_rgb8();

    let mut out = Vec::new();
    let mut encoder = JpegEncoder::new_with_quality(&mut out, quality);
    encoder
        .encode_image(&resized)
        .context("encoding thumbnail as JPEG")?;
    Ok(out)
}

/// Run ffmpeg to decode one PNG-encoded frame to stdout.
fn extract_frame(path: &Path) -> Result<Vec<u8>> {
    let (total_frames, fps) = probe_video(path)?;
    let target_frame = MIN_SEEK_FRAME.max(total_frames / 10);
    let seek_seconds = target_frame as f64 / fps;

    debug!(
        path = %path.display(),
        total_frames,
        target_frame,
        "extracting video frame"
    );

    let output = Command::new("ffmpeg")
        .arg("-v")
        .arg("error")
        .arg("-ss")
        .arg(format!("{seek_seconds:.3}"))
        .arg("-i")
        .arg(path)
        .arg("-frames:v")
        .arg("1")
        .arg("-f")
        .arg("image2pipe")
        .arg("-vcodec")
        .arg("png")
        .arg("-")
        .stdin(Stdio::null())
        .output()
        .context("failed to run ffmpeg")?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(anyhow!("ffmpeg failed: {}", stderr.trim()));
    }

    if output.stdout.is_empty() {
        // seek target past the last frame; nothing was decoded
        return Err(anyhow!("no frame at {seek_seconds:.3}s"));
    }

    Ok(output.stdout)
}

/// Ask ffprobe for the frame count and frame rate of the first video
/// stream. Containers that omit `nb_frames` fall back to duration × fps.
fn probe_video(path: &Path) -> Result<(u64, f64)> {
    let output = Command::new("ffprobe")
        .arg("-v")
        .arg("error")
        .arg("-select_streams")
        .arg("v:0")
        .arg("-show_entries")
        .arg("stream=nb_frames,avg_frame_rate,duration")
        .arg("-of")
        .arg("json")
        .arg(path)
        .stdin(Stdio::null())
        .output()
        .context("failed to run ffprobe")?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(anyhow!("ffprobe failed: {}", stderr.trim()));
    }

    let probed: serde_json::Value =
        serde_json::from_slice(&output.stdout).context("parsing ffprobe output")?;
    let stream = probed
        .get("streams")
        .and_then(|streams| streams.get(0))
        .ok_or_else(|| anyhow!("no video stream"))?;

    let fps = stream
        .get("avg_frame_rate")
        .and_then(|rate| rate.as_str())
        .and_then(parse_frame_rate)
        .unwrap_or(25.0);

    let total_frames = stream
        .get("nb_frames")
        .and_then(|frames| frames.as_str())
        .and_then(|frames| frames.parse::<u64>().ok())
        .or_else(|| {
            let duration = stream
                .get("duration")
                .and_then(|duration| duration.as_str())
                .and_then(|duration| duration.parse::<f64>().ok())?;
            Some((duration * fps) as u64)
        })
        .unwrap_or(0);

    Ok((total_frames, fps))
}

fn parse_frame_rate(rate: &str) -> Option<f64> {
    let (num, den) = rate.split_once('/')?;
    let num: f64 = num.parse().ok()?;
    let den: f64 = den.parse().ok()?;
    if num > 0.0 && den > 0.0 {
        Some(num / den)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, Rgba, RgbaImage};
    use std::fs;

    fn write_png(path: &Path, width: u32, height: u32) {
        let img = RgbaImage::from_pixel(width, height, Rgba([120, 40, 200, 128]));
        img.save(path).unwrap();
    }

    #[test]
    fn resizes_longer_edge_and_keeps_aspect() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("wide.png");
        write_png(&source, 400, 100);

        let bytes = image_thumbnail(&source, 200, 85).unwrap();
        let thumb = image::load_from_memory(&bytes).unwrap();
        assert_eq!((thumb.width(), thumb.height()), (200, 50));
    }

    #[test]
    fn never_upscales_small_sources() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("tiny.png");
        write_png(&source, 12, 8);

        let bytes = image_thumbnail(&source, 400, 85).unwrap();
        let thumb = image::load_from_memory(&bytes).unwrap();
        assert_eq!((thumb.width(), thumb.height()), (12, 8));
    }

    #[test]
    fn output_is_opaque_jpeg() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("alpha.png");
        write_png(&source, 64, 64);

        let bytes = image_thumbnail(&source, 50, 85).unwrap();
        assert_eq!(image::guess_format(&bytes).unwrap(), image::ImageFormat::Jpeg);
        // JPEG has no alpha channel to carry transparency through
        let thumb = image::load_from_memory(&bytes).unwrap();
        assert_eq!(thumb.color(), image::ColorType::Rgb8);
    }

    #[test]
    fn flattening_discards_transparency() {
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(
            4,
            4,
            Rgba([10, 20, 30, 0]),
        ));
        let rgb = img.to_rgb8();
        assert_eq!(rgb.get_pixel(0, 0), &Rgb([10, 20, 30]));
    }

    #[test]
    fn renamed_text_file_fails_with_decode_error() {
        let dir = tempfile::tempdir().unwrap();
        let fake = dir.path().join("not_an_image.jpg");
        fs::write(&fake, "definitely not pixels").unwrap();

        let err = image_thumbnail(&fake, 100, 85).unwrap_err();
        assert!(matches!(err, MediaError::Decode { .. }));
    }

    #[test]
    fn unreadable_video_fails_with_decode_error() {
        let dir = tempfile::tempdir().unwrap();
        let fake = dir.path().join("broken.mp4");
        fs::write(&fake, "not a container").unwrap();

        let err = video_frame_thumbnail(&fake, 100, 85).unwrap_err();
        assert!(matches!(err, MediaError::Decode { .. }));
    }

    #[test]
    fn frame_rate_parsing_handles_odd_inputs() {
        assert_eq!(parse_frame_rate("30/1"), Some(30.0));
        assert_eq!(parse_frame_rate("30000/1001").map(|f| f.round()), Some(30.0));
        assert_eq!(parse_frame_rate("0/0"), None);
        assert_eq!(parse_frame_rate("garbage"), None);
    }
}
