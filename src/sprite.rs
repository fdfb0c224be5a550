use base64::{engine::general_purpose, Engine as _};
use image::{imageops::FilterType, RgbaImage};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use serde::{Deserialize, Serialize};

const ALPHA_CUTOFF: u8 = 128;

#[derive(Debug, thiserror::Error)]
pub enum SpriteError {
    #[error("image decode failed: {0}")]
    Decode(#[from] image::ImageError),
    #[error("image has no visible pixels")]
    Blank,
    #[error("sprite payload is corrupt")]
    Payload,
}

/// Decoded RGBA pixels, base64 encoded so the sprite can ride inside actions.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpriteData {
    pub width: u32,
    pub height: u32,
    pub payload: String,
}

impl SpriteData {
    pub fn from_rgba(image: &RgbaImage) -> Self {
        let (width, height) = image.dimensions();
        Self {
            width,
            height,
            payload: general_purpose::STANDARD.encode(image.as_raw()),
        }
    }

    pub fn to_rgba(&self) -> Result<RgbaImage, SpriteError> {
        let bytes = general_purpose::STANDARD
            .decode(&self.payload)
            .map_err(|_| SpriteError::Payload)?;
        RgbaImage::from_raw(self.width, self.height, bytes).ok_or(SpriteError::Payload)
    }

    /// Pixel grid that fits `cols` x `rows` half-block cells, aspect preserved.
    pub fn fit(&self, cols: u16, rows: u16) -> (u32, u32) {
        if self.width == 0 || self.height == 0 || cols == 0 || rows == 0 {
            return (0, 0);
        }
        let max_w = cols as f32;
        let max_h = rows as f32 * 2.0;
        let scale = (max_w / self.width as f32).min(max_h / self.height as f32);
        let width = ((self.width as f32 * scale).floor() as u32).clamp(1, cols as u32);
        let height = ((self.height as f32 * scale).floor() as u32).clamp(1, rows as u32 * 2);
        (width, height)
    }

    /// Renders the sprite as `▀` cells: top pixel in fg, bottom pixel in bg.
    pub fn half_block_lines(
        &self,
        cols: u16,
        rows: u16,
        background: Color,
    ) -> Result<Vec<Line<'static>>, SpriteError> {
        let (width, height) = self.fit(cols, rows);
        if width == 0 {
            return Ok(Vec::new());
        }
        let image = self.to_rgba()?;
        let scaled = image::imageops::resize(&image, width, height, FilterType::Nearest);

        let lines = (0..height)
            .step_by(2)
            .map(|y| {
                let spans: Vec<Span<'static>> = (0..width)
                    .map(|x| {
                        let top = pixel_color(&scaled, x, y, background);
                        let bottom = pixel_color(&scaled, x, y + 1, background);
                        Span::styled("▀", Style::default().fg(top).bg(bottom))
                    })
                    .collect();
                Line::from(spans)
            })
            .collect();
        Ok(lines)
    }
}

/// Decodes image bytes and crops the transparent margin around the figure.
pub fn decode_sprite(bytes: &[u8]) -> Result<SpriteData, SpriteError> {
    let image = image::load_from_memory(bytes)?.to_rgba8();
    let cropped = crop_to_content(&image).ok_or(SpriteError::Blank)?;
    Ok(SpriteData::from_rgba(&cropped))
}

fn crop_to_content(image: &RgbaImage) -> Option<RgbaImage> {
    let mut bounds: Option<(u32, u32, u32, u32)> = None;
    for (x, y, pixel) in image.enumerate_pixels() {
        if pixel[3] < ALPHA_CUTOFF {
            continue;
        }
        bounds = Some(match bounds {
            None => (x, y, x, y),
            Some((x0, y0, x1, y1)) => (x0.min(x), y0.min(y), x1.max(x), y1.max(y)),
        });
    }
    let (x0, y0, x1, y1) = bounds?;
    Some(image::imageops::crop_imm(image, x0, y0, x1 - x0 + 1, y1 - y0 + 1).to_image())
}

fn pixel_color(image: &RgbaImage, x: u32, y: u32, background: Color) -> Color {
    if y >= image.height() {
        return background;
    }
    let [r, g, b, a] = image.get_pixel(x, y).0;
    if a < ALPHA_CUTOFF {
        background
    } else {
        Color::Rgb(r, g, b)
    }
}
