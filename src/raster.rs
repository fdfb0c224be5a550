//! Turns a rendered cell buffer into pixels.
//!
//! Every cell becomes a `CELL_WIDTH` x `CELL_HEIGHT` block. The background is
//! filled first, then block elements are drawn as exact fills and any other
//! glyph comes from the 8x8 bitmap font stretched to double height.

use font8x8::{UnicodeFonts, BASIC_FONTS, BLOCK_FONTS, BOX_FONTS, LATIN_FONTS};
use image::{Rgb, RgbImage};
use ratatui::buffer::{Buffer, Cell};
use ratatui::style::{Color, Modifier};

pub const CELL_WIDTH: u32 = 8;
pub const CELL_HEIGHT: u32 = 16;

const DEFAULT_FG: Rgb<u8> = Rgb([255, 255, 255]);
const DEFAULT_BG: Rgb<u8> = Rgb([0, 0, 0]);

const ANSI: [[u8; 3]; 16] = [
    [0, 0, 0],
    [205, 49, 49],
    [13, 188, 121],
    [229, 229, 16],
    [36, 114, 200],
    [188, 63, 188],
    [17, 168, 205],
    [229, 229, 229],
    [102, 102, 102],
    [241, 76, 76],
    [35, 209, 139],
    [245, 245, 67],
    [59, 142, 234],
    [214, 112, 214],
    [41, 184, 219],
    [255, 255, 255],
];

pub fn rasterize(buffer: &Buffer) -> RgbImage {
    let area = buffer.area;
    let mut image = RgbImage::from_pixel(
        area.width as u32 * CELL_WIDTH,
        area.height as u32 * CELL_HEIGHT,
        DEFAULT_BG,
    );
    for y in 0..area.height {
        for x in 0..area.width {
            let cell = &buffer[(area.x + x, area.y + y)];
            paint_cell(
                &mut image,
                x as u32 * CELL_WIDTH,
                y as u32 * CELL_HEIGHT,
                cell,
            );
        }
    }
    image
}

pub fn color_to_rgb(color: Color, fallback: Rgb<u8>) -> Rgb<u8> {
    let ansi = |idx: usize| Rgb(ANSI[idx]);
    match color {
        Color::Reset => fallback,
        Color::Rgb(r, g, b) => Rgb([r, g, b]),
        Color::Black => ansi(0),
        Color::Red => ansi(1),
        Color::Green => ansi(2),
        Color::Yellow => ansi(3),
        Color::Blue => ansi(4),
        Color::Magenta => ansi(5),
        Color::Cyan => ansi(6),
        Color::Gray => ansi(7),
        Color::DarkGray => ansi(8),
        Color::LightRed => ansi(9),
        Color::LightGreen => ansi(10),
        Color::LightYellow => ansi(11),
        Color::LightBlue => ansi(12),
        Color::LightMagenta => ansi(13),
        Color::LightCyan => ansi(14),
        Color::White => ansi(15),
        Color::Indexed(idx) => indexed_color(idx),
    }
}

fn indexed_color(idx: u8) -> Rgb<u8> {
    match idx {
        0..=15 => Rgb(ANSI[idx as usize]),
        16..=231 => {
            let level = |v: u8| if v == 0 { 0 } else { 55 + v * 40 };
            let n = idx - 16;
            Rgb([level(n / 36), level((n / 6) % 6), level(n % 6)])
        }
        _ => {
            let gray = 8 + (idx - 232) * 10;
            Rgb([gray, gray, gray])
        }
    }
}

fn cell_colors(cell: &Cell) -> (Rgb<u8>, Rgb<u8>) {
    let fg = color_to_rgb(cell.fg, DEFAULT_FG);
    let bg = color_to_rgb(cell.bg, DEFAULT_BG);
    if cell.modifier.contains(Modifier::REVERSED) {
        (bg, fg)
    } else {
        (fg, bg)
    }
}

fn paint_cell(image: &mut RgbImage, x0: u32, y0: u32, cell: &Cell) {
    let (fg, bg) = cell_colors(cell);
    fill(image, x0, y0, CELL_WIDTH, CELL_HEIGHT, bg);

    let Some(ch) = cell.symbol().chars().next() else {
        return;
    };
    match ch {
        ' ' => {}
        '█' => fill(image, x0, y0, CELL_WIDTH, CELL_HEIGHT, fg),
        '▀' => fill(image, x0, y0, CELL_WIDTH, CELL_HEIGHT / 2, fg),
        '▄' => fill(image, x0, y0 + CELL_HEIGHT / 2, CELL_WIDTH, CELL_HEIGHT / 2, fg),
        '▌' => fill(image, x0, y0, CELL_WIDTH / 2, CELL_HEIGHT, fg),
        '▐' => fill(image, x0 + CELL_WIDTH / 2, y0, CELL_WIDTH / 2, CELL_HEIGHT, fg),
        '\u{2581}'..='\u{2587}' => {
            let eighths = ch as u32 - 0x2580;
            let height = CELL_HEIGHT * eighths / 8;
            fill(image, x0, y0 + CELL_HEIGHT - height, CELL_WIDTH, height, fg);
        }
        _ => {
            if let Some(glyph) = lookup_glyph(ch) {
                draw_glyph(image, x0, y0, &glyph, fg);
            }
        }
    }
}

fn lookup_glyph(ch: char) -> Option<[u8; 8]> {
    BASIC_FONTS
        .get(ch)
        .or_else(|| LATIN_FONTS.get(ch))
        .or_else(|| BOX_FONTS.get(ch))
        .or_else(|| BLOCK_FONTS.get(ch))
}

fn draw_glyph(image: &mut RgbImage, x0: u32, y0: u32, glyph: &[u8; 8], color: Rgb<u8>) {
    let scale = CELL_HEIGHT / 8;
    for (row, bits) in glyph.iter().enumerate() {
        for col in 0..8u32 {
            if bits & (1 << col) == 0 {
                continue;
            }
            let y = y0 + row as u32 * scale;
            fill(image, x0 + col, y, 1, scale, color);
        }
    }
}

fn fill(image: &mut RgbImage, x0: u32, y0: u32, width: u32, height: u32, color: Rgb<u8>) {
    let x_end = (x0 + width).min(image.width());
    let y_end = (y0 + height).min(image.height());
    for y in y0..y_end {
        for x in x0..x_end {
            image.put_pixel(x, y, color);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::layout::Rect;
    use ratatui::style::Style;

    #[test]
    fn raster_dimensions_follow_cell_grid() {
        let buffer = Buffer::empty(Rect::new(0, 0, 6, 3));
        let image = rasterize(&buffer);
        assert_eq!(image.dimensions(), (6 * CELL_WIDTH, 3 * CELL_HEIGHT));
    }

    #[test]
    fn upper_half_block_splits_cell() {
        let mut buffer = Buffer::empty(Rect::new(0, 0, 1, 1));
        buffer.set_string(
            0,
            0,
            "▀",
            Style::default()
                .fg(Color::Rgb(200, 0, 0))
                .bg(Color::Rgb(0, 0, 200)),
        );
        let image = rasterize(&buffer);
        assert_eq!(image.get_pixel(3, 0).0, [200, 0, 0]);
        assert_eq!(image.get_pixel(3, CELL_HEIGHT / 2 - 1).0, [200, 0, 0]);
        assert_eq!(image.get_pixel(3, CELL_HEIGHT / 2).0, [0, 0, 200]);
        assert_eq!(image.get_pixel(3, CELL_HEIGHT - 1).0, [0, 0, 200]);
    }

    #[test]
    fn eighth_blocks_fill_from_bottom() {
        let mut buffer = Buffer::empty(Rect::new(0, 0, 1, 1));
        buffer.set_string(0, 0, "▂", Style::default().fg(Color::Rgb(0, 255, 0)));
        let image = rasterize(&buffer);
        assert_eq!(image.get_pixel(0, CELL_HEIGHT - 1).0, [0, 255, 0]);
        assert_eq!(image.get_pixel(0, CELL_HEIGHT - 4).0, [0, 255, 0]);
        assert_eq!(image.get_pixel(0, CELL_HEIGHT - 5).0, DEFAULT_BG.0);
    }

    #[test]
    fn letters_draw_foreground_pixels() {
        let mut buffer = Buffer::empty(Rect::new(0, 0, 1, 1));
        buffer.set_string(0, 0, "A", Style::default().fg(Color::Rgb(9, 9, 9)));
        let image = rasterize(&buffer);
        let lit = image.pixels().filter(|p| p.0 == [9, 9, 9]).count();
        assert!(lit > 0);
        assert!(lit < (CELL_WIDTH * CELL_HEIGHT) as usize);
    }

    #[test]
    fn reversed_cells_swap_colors() {
        let mut buffer = Buffer::empty(Rect::new(0, 0, 1, 1));
        buffer.set_string(
            0,
            0,
            " ",
            Style::default()
                .fg(Color::Rgb(1, 2, 3))
                .bg(Color::Rgb(4, 5, 6))
                .add_modifier(Modifier::REVERSED),
        );
        let image = rasterize(&buffer);
        assert_eq!(image.get_pixel(0, 0).0, [1, 2, 3]);
    }

    #[test]
    fn indexed_palette_covers_cube_and_grays() {
        assert_eq!(indexed_color(16).0, [0, 0, 0]);
        assert_eq!(indexed_color(231).0, [255, 255, 255]);
        assert_eq!(indexed_color(232).0, [8, 8, 8]);
    }
}
