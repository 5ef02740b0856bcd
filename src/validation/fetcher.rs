//! Retrieval and inspection of remote images.
//!
//! Network access sits behind [`ImageFetcher`] so the orchestrator can be driven
//! from memory. Failures never escape this module: they are folded into
//! [`ImageInfo::Unreadable`] and reported by the caller as an unreadable image.

use std::io::Cursor;
use std::time::Duration;

use image::{GenericImageView, ImageFormat, ImageReader};
use log::{debug, warn};
use reqwest::blocking::Client;

use super::errors::FetchError;
use super::types::{ImageInfo, ImageMeta};

/// Source of raw image bytes for a URL
pub trait ImageFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError>;
}

/// Blocking HTTP fetcher with a per-request timeout
pub struct HttpImageFetcher {
    client: Client,
}

impl HttpImageFetcher {
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }
}

impl ImageFetcher for HttpImageFetcher {
    /// Any non-2xx response is an error carrying the status
    fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let response = self.client.get(url).send()?.error_for_status()?;
        Ok(response.bytes()?.to_vec())
    }
}

/// What decoding tells us about an image, independent of where it came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    pub width: u32,
    pub height: u32,
    pub format: String,
    pub has_transparency: bool,
}

/// Decodes the image fully so truncated payloads are rejected, not just bad headers
pub fn inspect_image(bytes: &[u8]) -> Result<DecodedImage, image::ImageError> {
    let reader = ImageReader::new(Cursor::new(bytes)).with_guessed_format()?;
    let format = reader.format();
    let img = reader.decode()?;
    let (width, height) = img.dimensions();

    // GIF frames always decode to RGBA, so the declared transparent index decides
    let has_transparency = match format {
        Some(ImageFormat::Gif) => gif_declares_transparency(bytes)?,
        _ => img.color().has_alpha(),
    };

    Ok(DecodedImage {
        width,
        height,
        format: format_name(format),
        has_transparency,
    })
}

/// True when the first frame's graphic control extension names a transparent index
fn gif_declares_transparency(bytes: &[u8]) -> Result<bool, image::ImageError> {
    let mut options = gif::DecodeOptions::new();
    options.set_color_output(gif::ColorOutput::Indexed);
    let declared = options
        .read_info(Cursor::new(bytes))
        .and_then(|mut decoder| {
            let declared = decoder
                .next_frame_info()?
                .is_some_and(|frame| frame.transparent.is_some());
            Ok(declared)
        })
        .map_err(|e| {
            image::ImageError::Decoding(image::error::DecodingError::new(
                ImageFormat::Gif.into(),
                e,
            ))
        })?;
    Ok(declared)
}

/// Lowercase format name. All netpbm variants share one name.
fn format_name(format: Option<ImageFormat>) -> String {
    let name = match format {
        Some(ImageFormat::Jpeg) => "jpeg",
        Some(ImageFormat::Png) => "png",
        Some(ImageFormat::Gif) => "gif",
        Some(ImageFormat::WebP) => "webp",
        Some(ImageFormat::Bmp) => "bmp",
        Some(ImageFormat::Tiff) => "tiff",
        Some(ImageFormat::Ico) => "ico",
        Some(ImageFormat::Pnm) => "ppm",
        Some(ImageFormat::Tga) => "tga",
        Some(ImageFormat::Dds) => "dds",
        Some(ImageFormat::Hdr) => "hdr",
        Some(ImageFormat::OpenExr) => "exr",
        Some(ImageFormat::Farbfeld) => "farbfeld",
        Some(ImageFormat::Avif) => "avif",
        Some(ImageFormat::Qoi) => "qoi",
        Some(other) => other.extensions_str().first().copied().unwrap_or("unknown"),
        None => "unknown",
    };
    name.to_string()
}

/// Fetches and inspects one URL, capturing any failure
pub fn get_image_info(fetcher: &dyn ImageFetcher, url: &str) -> ImageInfo {
    let result = fetcher
        .fetch(url)
        .and_then(|bytes| Ok((inspect_image(&bytes)?, bytes.len())));

    match result {
        Ok((decoded, byte_len)) => {
            debug!(
                "Fetched {}: {}x{} {} ({} bytes)",
                url, decoded.width, decoded.height, decoded.format, byte_len
            );
            ImageInfo::Readable(ImageMeta {
                url: url.to_string(),
                width: decoded.width,
                height: decoded.height,
                size_kb: byte_len as f64 / 1024.0,
                format: decoded.format,
                has_transparency: decoded.has_transparency,
            })
        }
        Err(e) => {
            warn!("Could not read image {}: {}", url, e);
            ImageInfo::Unreadable {
                url: url.to_string(),
                error: e.to_string(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{BufRead, BufReader, Write};
    use std::net::TcpListener;
    use std::thread;

    fn encode(img: &image::DynamicImage, format: ImageFormat) -> Vec<u8> {
        let mut buffer = Vec::new();
        img.write_to(&mut Cursor::new(&mut buffer), format)
            .expect("Failed to create test image");
        buffer
    }

    /// Serves exactly one HTTP response on a local port and returns its URL
    fn serve_once(status_line: &'static str, body: Vec<u8>) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        thread::spawn(move || {
            if let Ok((mut stream, _)) = listener.accept() {
                // Drain the request head before answering
                {
                    let mut reader = BufReader::new(&stream);
                    let mut line = String::new();
                    while reader.read_line(&mut line).map(|n| n > 0).unwrap_or(false)
                        && line != "\r\n"
                    {
                        line.clear();
                    }
                }
                let head = format!(
                    "HTTP/1.1 {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                    status_line,
                    body.len()
                );
                let _ = stream.write_all(head.as_bytes());
                let _ = stream.write_all(&body);
            }
        });
        format!("http://{}/image.png", addr)
    }

    #[test]
    fn test_inspect_png_with_alpha() {
        let img = image::DynamicImage::ImageRgba8(image::RgbaImage::new(40, 20));
        let decoded = inspect_image(&encode(&img, ImageFormat::Png)).unwrap();
        assert_eq!((decoded.width, decoded.height), (40, 20));
        assert_eq!(decoded.format, "png");
        assert!(decoded.has_transparency);
    }

    #[test]
    fn test_inspect_jpeg_is_opaque() {
        let img = image::DynamicImage::ImageRgb8(image::RgbImage::new(64, 48));
        let decoded = inspect_image(&encode(&img, ImageFormat::Jpeg)).unwrap();
        assert_eq!(decoded.format, "jpeg");
        assert!(!decoded.has_transparency);
    }

    /// 1x1 GIF whose only pixel uses palette index 0
    fn gif(transparent: Option<u8>) -> Vec<u8> {
        let mut buffer = Vec::new();
        {
            let palette = [0, 0, 0, 255, 255, 255];
            let mut encoder = gif::Encoder::new(&mut buffer, 1, 1, &palette).unwrap();
            let frame = gif::Frame {
                width: 1,
                height: 1,
                buffer: vec![0].into(),
                transparent,
                ..Default::default()
            };
            encoder.write_frame(&frame).unwrap();
            encoder.into_inner().unwrap();
        }
        buffer
    }

    /// 2x1 indexed PNG with opaque pixels and an optional tRNS chunk
    fn indexed_png(trns: Option<Vec<u8>>) -> Vec<u8> {
        let mut buffer = Vec::new();
        {
            let mut encoder = png::Encoder::new(&mut buffer, 2, 1);
            encoder.set_color(png::ColorType::Indexed);
            encoder.set_depth(png::BitDepth::Eight);
            encoder.set_palette(vec![0, 0, 0, 255, 255, 255]);
            if let Some(trns) = trns {
                encoder.set_trns(trns);
            }
            let mut writer = encoder.write_header().unwrap();
            writer.write_image_data(&[0, 0]).unwrap();
            writer.finish().unwrap();
        }
        buffer
    }

    #[test]
    fn test_gif_with_transparent_index_is_transparent() {
        // The declared index is unused by any pixel
        let decoded = inspect_image(&gif(Some(1))).unwrap();
        assert_eq!(decoded.format, "gif");
        assert!(decoded.has_transparency);

        let decoded = inspect_image(&gif(None)).unwrap();
        assert!(!decoded.has_transparency);
    }

    #[test]
    fn test_indexed_png_with_trns_is_transparent() {
        let decoded = inspect_image(&indexed_png(Some(vec![255, 0]))).unwrap();
        assert_eq!(decoded.format, "png");
        assert!(decoded.has_transparency);

        let decoded = inspect_image(&indexed_png(None)).unwrap();
        assert!(!decoded.has_transparency);
    }

    #[test]
    fn test_format_names() {
        assert_eq!(format_name(Some(ImageFormat::Pnm)), "ppm");
        assert_eq!(format_name(Some(ImageFormat::OpenExr)), "exr");
        assert_eq!(format_name(Some(ImageFormat::Qoi)), "qoi");
        assert_eq!(format_name(None), "unknown");
    }

    #[test]
    fn test_inspect_rejects_garbage() {
        assert!(inspect_image(&[0u8; 100]).is_err());

        let img = image::DynamicImage::ImageRgb8(image::RgbImage::new(64, 48));
        let mut truncated = encode(&img, ImageFormat::Png);
        truncated.truncate(truncated.len() / 2);
        assert!(inspect_image(&truncated).is_err());
    }

    #[test]
    fn test_http_fetch_success() {
        let img = image::DynamicImage::ImageRgb8(image::RgbImage::new(10, 10));
        let body = encode(&img, ImageFormat::Png);
        let expected_kb = body.len() as f64 / 1024.0;
        let url = serve_once("200 OK", body);

        let fetcher = HttpImageFetcher::new(Duration::from_secs(5)).unwrap();
        match get_image_info(&fetcher, &url) {
            ImageInfo::Readable(meta) => {
                assert_eq!(meta.width, 10);
                assert_eq!(meta.size_kb, expected_kb);
                assert_eq!(meta.url, url);
            }
            other => panic!("expected a readable image, got {:?}", other),
        }
    }

    #[test]
    fn test_http_404_is_unreadable() {
        let url = serve_once("404 Not Found", Vec::new());
        let fetcher = HttpImageFetcher::new(Duration::from_secs(5)).unwrap();
        match get_image_info(&fetcher, &url) {
            ImageInfo::Unreadable { error, .. } => assert!(error.contains("404")),
            other => panic!("expected an unreadable image, got {:?}", other),
        }
    }
}
