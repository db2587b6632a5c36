//! Minimal aliased rasterization onto RGBA images

use glam::Vec2;
use image::RgbaImage;

use crate::render::colors::Color;

/// Fill a triangle, sampling at pixel centers. Degenerate triangles draw nothing.
pub fn fill_triangle(image: &mut RgbaImage, corners: [Vec2; 3], color: Color) {
    let [a, b, c] = corners;
    let area = edge(a, b, c);
    if area.abs() < f32::EPSILON {
        return;
    }

    let (width, height) = image.dimensions();
    let min = a.min(b).min(c).floor().max(Vec2::ZERO);
    let max = a.max(b).max(c).ceil();
    let x_end = (max.x.max(0.0) as u32).min(width);
    let y_end = (max.y.max(0.0) as u32).min(height);
    let rgba = color.to_rgba();

    for y in min.y as u32..y_end {
        for x in min.x as u32..x_end {
            let p = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
            let w0 = edge(b, c, p);
            let w1 = edge(c, a, p);
            let w2 = edge(a, b, p);
            let inside = if area > 0.0 {
                w0 >= 0.0 && w1 >= 0.0 && w2 >= 0.0
            } else {
                w0 <= 0.0 && w1 <= 0.0 && w2 <= 0.0
            };
            if inside {
                image.put_pixel(x, y, rgba);
            }
        }
    }
}

/// Outline a closed polygon with 1px lines
pub fn stroke_polygon(image: &mut RgbaImage, corners: &[Vec2], color: Color) {
    for (i, &from) in corners.iter().enumerate() {
        let to = corners[(i + 1) % corners.len()];
        stroke_line(image, from, to, color);
    }
}

/// Bresenham line between the pixels containing `from` and `to`, clipped
/// to the image.
pub fn stroke_line(image: &mut RgbaImage, from: Vec2, to: Vec2, color: Color) {
    let (width, height) = image.dimensions();
    let rgba = color.to_rgba();

    let (mut x0, mut y0) = (from.x.floor() as i64, from.y.floor() as i64);
    let (x1, y1) = (to.x.floor() as i64, to.y.floor() as i64);

    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        if x0 >= 0 && y0 >= 0 && (x0 as u64) < width as u64 && (y0 as u64) < height as u64 {
            image.put_pixel(x0 as u32, y0 as u32, rgba);
        }

        if x0 == x1 && y0 == y1 {
            break;
        }

        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}

/// Twice the signed area of `(a, b, p)`
#[inline]
fn edge(a: Vec2, b: Vec2, p: Vec2) -> f32 {
    (b - a).perp_dot(p - a)
}
