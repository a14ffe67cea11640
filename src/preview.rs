// Preview generation: thumbnails for images, PDFs and videos, category icons for everything else
use crate::domain::{FileCategory, FileRecord};
use image::{DynamicImage, Rgb, RgbImage};
use pdfium_render::prelude::*;
use ratatui::{
    style::{Color, Style},
    text::{Line, Span},
};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::time::{Duration, Instant};
use thiserror::Error;

/// Bounding box every thumbnail is scaled down to fit
pub const THUMBNAIL_MAX_WIDTH: u32 = 500;
pub const THUMBNAIL_MAX_HEIGHT: u32 = 200;
/// Edge length of the generated category icons
pub const ICON_SIZE: u32 = 128;

pub const DEFAULT_FFMPEG: &str = "ffmpeg";

/// ffmpeg is killed when it takes longer than this to produce a frame
pub const VIDEO_FRAME_TIMEOUT: Duration = Duration::from_secs(8);

#[derive(Debug, Error)]
pub enum PreviewError {
    #[error("image decoding error: {0}")]
    Decode(#[from] image::ImageError),

    #[error("Pdfium library not available. Install libpdfium to enable PDF previews.")]
    PdfiumUnavailable,

    #[error("PDF rendering error: {0}")]
    Pdf(String),

    #[error("video frame extraction failed: {0}")]
    Video(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("no thumbnail renderer for {0:?} files")]
    Unsupported(FileCategory),
}

/// Where the preview raster came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreviewSource {
    /// Rendered from the file's own content
    Thumbnail,
    /// Generic icon for the file's category
    Icon,
}

#[derive(Debug, Clone)]
pub struct Preview {
    pub image: RgbImage,
    pub source: PreviewSource,
    /// Shown under the image when the preview is a stand-in
    pub note: Option<String>,
}

impl Preview {
    /// Category icon standing in for a thumbnail that could not be produced
    pub fn unavailable(category: FileCategory) -> Self {
        Preview {
            image: category_icon(category),
            source: PreviewSource::Icon,
            note: Some(format!("{} preview not available", category.label())),
        }
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }
}

/// Produces a preview for any file. Never fails: anything that cannot be
/// rendered degrades to its category icon.
#[derive(Debug, Clone)]
pub struct PreviewProvider {
    ffmpeg: PathBuf,
    frame_timeout: Duration,
}

impl Default for PreviewProvider {
    fn default() -> Self {
        Self::new(DEFAULT_FFMPEG)
    }
}

impl PreviewProvider {
    pub fn new(ffmpeg: impl Into<PathBuf>) -> Self {
        Self {
            ffmpeg: ffmpeg.into(),
            frame_timeout: VIDEO_FRAME_TIMEOUT,
        }
    }

    pub fn with_frame_timeout(mut self, timeout: Duration) -> Self {
        self.frame_timeout = timeout;
        self
    }

    pub fn ffmpeg(&self) -> &Path {
        &self.ffmpeg
    }

    pub fn preview(&self, record: &FileRecord) -> Preview {
        match self.render_thumbnail(record) {
            Ok(image) => Preview {
                image,
                source: PreviewSource::Thumbnail,
                note: None,
            },
            Err(PreviewError::Unsupported(category)) => Preview {
                image: category_icon(category),
                source: PreviewSource::Icon,
                note: unsupported_note(category),
            },
            Err(e) => {
                log::debug!("Preview failed for {}: {}", record.path.display(), e);
                Preview::unavailable(record.category)
            }
        }
    }

    /// Renders the file content scaled to fit the thumbnail box
    pub fn render_thumbnail(&self, record: &FileRecord) -> Result<RgbImage, PreviewError> {
        let full = match record.category {
            FileCategory::Image => load_image(&record.path)?,
            FileCategory::Pdf => render_pdf_first_page(&record.path)?,
            FileCategory::Video => self.extract_video_frame(&record.path)?,
            other => return Err(PreviewError::Unsupported(other)),
        };

        Ok(thumbnail(&full, THUMBNAIL_MAX_WIDTH, THUMBNAIL_MAX_HEIGHT))
    }

    /// Grabs the first frame of a video through the ffmpeg executable.
    ///
    /// ffmpeg is killed if it has not finished within the frame timeout.
    pub fn extract_video_frame(&self, path: &Path) -> Result<DynamicImage, PreviewError> {
        let mut child = Command::new(&self.ffmpeg)
            .args(["-v", "error", "-i"])
            .arg(path)
            .args(["-frames:v", "1", "-f", "image2pipe", "-vcodec", "png", "-"])
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| match e.kind() {
                io::ErrorKind::NotFound => {
                    PreviewError::Video(format!("{} not found", self.ffmpeg.display()))
                }
                _ => PreviewError::Io(e),
            })?;

        // Drain both pipes on their own threads so a large frame cannot fill
        // the pipe buffer and stall ffmpeg
        let stdout = child.stdout.take();
        let stderr = child.stderr.take();
        let stdout_reader = std::thread::spawn(move || read_pipe(stdout));
        let stderr_reader = std::thread::spawn(move || read_pipe(stderr));

        let Some(status) = wait_with_deadline(&mut child, self.frame_timeout)? else {
            return Err(PreviewError::Video(format!(
                "ffmpeg gave no frame within {} ms",
                self.frame_timeout.as_millis()
            )));
        };

        let frame = stdout_reader.join().unwrap_or_default();
        let errors = stderr_reader.join().unwrap_or_default();

        if !status.success() {
            let stderr = String::from_utf8_lossy(&errors);
            return Err(PreviewError::Video(stderr.trim().to_string()));
        }
        if frame.is_empty() {
            return Err(PreviewError::Video("no frame decoded".to_string()));
        }

        Ok(image::load_from_memory(&frame)?)
    }
}

fn read_pipe(pipe: Option<impl Read>) -> Vec<u8> {
    let mut buf = Vec::new();
    if let Some(mut pipe) = pipe {
        let _ = pipe.read_to_end(&mut buf);
    }
    buf
}

/// Polls `child` until it exits or `timeout` passes. On timeout the child is
/// killed and `None` is returned.
fn wait_with_deadline(child: &mut Child, timeout: Duration) -> io::Result<Option<ExitStatus>> {
    let deadline = Instant::now() + timeout;
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(Some(status));
        }
        if Instant::now() >= deadline {
            let _ = child.kill();
            let _ = child.wait();
            return Ok(None);
        }
        std::thread::sleep(Duration::from_millis(20));
    }
}

fn unsupported_note(category: FileCategory) -> Option<String> {
    match category {
        FileCategory::Executable => None,
        _ => Some(
            "Preview not available\n(Only images, PDFs, videos, and apps are previewed)"
                .to_string(),
        ),
    }
}

/// Loads an image from a file path
pub fn load_image(path: &Path) -> Result<DynamicImage, PreviewError> {
    Ok(image::open(path)?)
}

/// Drops the alpha channel by compositing onto a white background
pub fn flatten_onto_white(img: &DynamicImage) -> RgbImage {
    if !img.color().has_alpha() {
        return img.to_rgb8();
    }

    let rgba = img.to_rgba8();
    RgbImage::from_fn(rgba.width(), rgba.height(), |x, y| {
        let [r, g, b, a] = rgba.get_pixel(x, y).0;
        let alpha = u32::from(a);
        let blend = |c: u8| ((u32::from(c) * alpha + 255 * (255 - alpha)) / 255) as u8;
        Rgb([blend(r), blend(g), blend(b)])
    })
}

/// Flattens and scales an image down to fit `max_width` × `max_height`
pub fn thumbnail(img: &DynamicImage, max_width: u32, max_height: u32) -> RgbImage {
    let flat = flatten_onto_white(img);
    let (width, height) = calculate_resize_dimensions(flat.width(), flat.height(), max_width, max_height);

    if (width, height) == flat.dimensions() {
        return flat;
    }

    image::imageops::resize(
        &flat,
        width.max(1),
        height.max(1),
        image::imageops::FilterType::Triangle,
    )
}

/// Calculates new dimensions to fit image within max width and height while preserving aspect ratio
pub fn calculate_resize_dimensions(
    original_width: u32,
    original_height: u32,
    max_width: u32,
    max_height: u32,
) -> (u32, u32) {
    if original_width == 0 || original_height == 0 {
        return (0, 0);
    }

    let width_ratio = max_width as f64 / original_width as f64;
    let height_ratio = max_height as f64 / original_height as f64;

    let ratio = width_ratio.min(height_ratio);

    if ratio >= 1.0 {
        // Image is smaller than max dimensions, don't upscale
        (original_width, original_height)
    } else {
        let new_width = (original_width as f64 * ratio) as u32;
        let new_height = (original_height as f64 * ratio) as u32;
        (new_width, new_height)
    }
}

/// Accent color used for a category's icon and label
pub fn category_color(category: FileCategory) -> Rgb<u8> {
    match category {
        FileCategory::Image => Rgb([46, 160, 67]),
        FileCategory::Pdf => Rgb([208, 52, 44]),
        FileCategory::Video => Rgb([130, 80, 223]),
        FileCategory::Executable => Rgb([31, 111, 235]),
        FileCategory::Other => Rgb([110, 118, 129]),
    }
}

/// Draws a page-with-folded-corner icon tinted with the category color
pub fn category_icon(category: FileCategory) -> RgbImage {
    const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
    const PAPER: Rgb<u8> = Rgb([244, 246, 248]);

    let accent = category_color(category);
    let (left, right, top, bottom) = (24u32, 104u32, 8u32, 120u32);
    let fold = 24u32;
    let band = (72u32, 96u32);

    RgbImage::from_fn(ICON_SIZE, ICON_SIZE, |x, y| {
        if x < left || x >= right || y < top || y >= bottom {
            return WHITE;
        }

        // Distance into the top-right corner; the fold is cut along the diagonal
        let dx = x - left;
        let dy = y - top;
        let from_right = right - 1 - x;
        if from_right + dy < fold {
            return if from_right + dy + 2 >= fold { accent } else { WHITE };
        }
        if dx < 2 || from_right < 2 || dy < 2 || bottom - 1 - y < 2 {
            return accent;
        }
        if y >= band.0 && y < band.1 {
            return accent;
        }
        PAPER
    })
}

/// Converts an image to styled lines using half-block characters for terminal display.
/// Uses the upper half block character (▀) with foreground color for the upper pixel
/// and background color for the lower pixel, effectively displaying 2 pixels per cell.
pub fn image_to_halfblock_lines(img: &RgbImage, width: u32, height: u32) -> Vec<Line<'static>> {
    if width == 0 || height == 0 {
        return Vec::new();
    }

    let height = if height % 2 == 0 { height } else { height + 1 };

    // Triangle is fast and good enough at terminal resolution
    let img = image::imageops::resize(img, width, height, image::imageops::FilterType::Triangle);

    let term_height = height / 2;
    let mut lines = Vec::with_capacity(term_height as usize);

    for y in 0..term_height {
        let upper_y = y * 2;
        let lower_y = upper_y + 1;

        let spans: Vec<Span<'static>> = (0..width)
            .map(|x| {
                let upper = img.get_pixel(x, upper_y).0;
                let lower = img.get_pixel(x, lower_y).0;
                let style = Style::default()
                    .fg(Color::Rgb(upper[0], upper[1], upper[2]))
                    .bg(Color::Rgb(lower[0], lower[1], lower[2]));
                Span::styled("▀", style)
            })
            .collect();

        lines.push(Line::from(spans));
    }

    lines
}

/// Fits a preview into a `cols` × `rows` cell area (two pixel rows per cell)
pub fn preview_to_lines(preview: &Preview, cols: u16, rows: u16) -> Vec<Line<'static>> {
    let (width, height) = preview.dimensions();
    let (new_width, new_height) =
        calculate_resize_dimensions(width, height, u32::from(cols), u32::from(rows) * 2);
    image_to_halfblock_lines(&preview.image, new_width, new_height)
}

/// Attempts to create a Pdfium instance using explicit binding (no panic)
fn try_create_pdfium() -> Option<Pdfium> {
    // Search order: system library paths, PDFIUM_DYNAMIC_LIB_PATH, ./lib/, ./
    if let Ok(bindings) = Pdfium::bind_to_system_library() {
        return Some(Pdfium::new(bindings));
    }

    if let Ok(lib_path) = std::env::var("PDFIUM_DYNAMIC_LIB_PATH") {
        if let Ok(bindings) =
            Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path(&lib_path))
        {
            return Some(Pdfium::new(bindings));
        }
    }

    for dir in ["./lib/", "./"] {
        if let Ok(bindings) =
            Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path(dir))
        {
            return Some(Pdfium::new(bindings));
        }
    }

    None
}

/// Checks if Pdfium library is available by attempting to initialize it
pub fn is_pdfium_available() -> bool {
    try_create_pdfium().is_some()
}

/// Loads a PDF and renders the first page to an image
pub fn render_pdf_first_page(path: &Path) -> Result<DynamicImage, PreviewError> {
    let pdfium = try_create_pdfium().ok_or(PreviewError::PdfiumUnavailable)?;

    let document = pdfium
        .load_pdf_from_file(path, None)
        .map_err(|e| PreviewError::Pdf(format!("loading failed: {}", e)))?;

    let page = document
        .pages()
        .get(0)
        .map_err(|e| PreviewError::Pdf(format!("page access failed: {}", e)))?;

    let render_config = PdfRenderConfig::new()
        .set_target_width(1024)
        .set_maximum_height(1024);

    let bitmap = page
        .render_with_config(&render_config)
        .map_err(|e| PreviewError::Pdf(e.to_string()))?;

    let width = bitmap.width() as u32;
    let height = bitmap.height() as u32;
    if width == 0 || height == 0 {
        return Err(PreviewError::Pdf("empty page".to_string()));
    }

    // Rows may carry alignment padding beyond width * 4 bytes
    let raw_buffer = bitmap.as_raw_bytes();
    let stride = raw_buffer.len() / (height as usize);
    let row_bytes = (width as usize) * 4;

    let mut buffer: Vec<u8> = if stride > row_bytes {
        raw_buffer
            .chunks(stride)
            .flat_map(|row| &row[..row_bytes.min(row.len())])
            .copied()
            .collect()
    } else {
        raw_buffer.to_vec()
    };

    // pdfium bitmaps are BGRA
    for pixel in buffer.chunks_exact_mut(4) {
        pixel.swap(0, 2);
    }

    let img_buffer = image::RgbaImage::from_vec(width, height, buffer).ok_or_else(|| {
        PreviewError::Pdf(format!(
            "bitmap buffer of {} bytes does not match {}x{}",
            raw_buffer.len(),
            width,
            height
        ))
    })?;

    Ok(DynamicImage::ImageRgba8(img_buffer))
}
