//! Map file loading: `<name>.gif` (or `.png`) bitmap plus `<name>.map` adjacency

use std::fs;
use std::path::{Path, PathBuf};

use image::{DynamicImage, GenericImageView};
use tracing::debug;

use crate::core::error::MapLoadError;
use crate::map::adjacency::{parse_adjacency, AdjacencyEntry};
use crate::map::grid::{Grid, PixelGrid};
use crate::map::region_map::RegionMap;

/// Bitmap extensions tried in order
const BITMAP_EXTENSIONS: [&str; 2] = ["gif", "png"];

/// Intensity grid of a decoded bitmap
///
/// A cell is `255 - K` where K is the pixel's CMYK black component, which
/// works out to the brightest RGB channel. White stays 255 (unclaimed).
pub fn pixel_grid_from_image(image: &DynamicImage) -> PixelGrid {
    let (width, height) = image.dimensions();
    let rgb = image.to_rgb8();
    let data = rgb
        .pixels()
        .map(|p| p.0[0].max(p.0[1]).max(p.0[2]))
        .collect();
    Grid::from_vec(width as usize, height as usize, data)
        .unwrap_or_else(|| Grid::new(0, 0))
}

pub fn load_pixel_grid(path: &Path) -> Result<PixelGrid, MapLoadError> {
    let image = image::open(path)?;
    debug!(path = %path.display(), "decoded map bitmap");
    Ok(pixel_grid_from_image(&image))
}

pub fn load_adjacency(path: &Path) -> Result<Vec<AdjacencyEntry>, MapLoadError> {
    let text = fs::read_to_string(path)?;
    parse_adjacency(&text)
}

/// Load map `name` from `dir`
pub fn load_map(dir: &Path, name: &str) -> Result<RegionMap, MapLoadError> {
    let bitmap = bitmap_path(dir, name)?;
    let pixels = load_pixel_grid(&bitmap)?;
    let adjacency = load_adjacency(&dir.join(format!("{}.map", name)))?;
    RegionMap::new(&pixels, &adjacency)
}

fn bitmap_path(dir: &Path, name: &str) -> Result<PathBuf, MapLoadError> {
    BITMAP_EXTENSIONS
        .iter()
        .map(|ext| dir.join(format!("{}.{}", name, ext)))
        .find(|path| path.is_file())
        .ok_or_else(|| {
            MapLoadError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("no {}.gif or {}.png in {}", name, name, dir.display()),
            ))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::RegionId;
    use image::{Rgb, RgbImage};
    use tempfile::TempDir;

    /// `<dir>/world.png` with regions 1 and 2 side by side, plus `world.map`
    fn write_world(dir: &TempDir) {
        let mut img = RgbImage::new(3, 2);
        for (x, y, pixel) in img.enumerate_pixels_mut() {
            *pixel = match x {
                0 => Rgb([1, 1, 1]),
                1 => Rgb([0, 2, 0]),
                _ if y == 0 => Rgb([2, 0, 0]),
                _ => Rgb([255, 255, 255]),
            };
        }
        img.save(dir.path().join("world.png")).unwrap();
        fs::write(dir.path().join("world.map"), "1: 2\n2: 1\n").unwrap();
    }

    #[test]
    fn test_intensity_is_brightest_channel() {
        let mut img = RgbImage::new(3, 1);
        img.put_pixel(0, 0, Rgb([255, 255, 255]));
        img.put_pixel(1, 0, Rgb([3, 3, 3]));
        img.put_pixel(2, 0, Rgb([0, 7, 2]));
        let grid = pixel_grid_from_image(&DynamicImage::ImageRgb8(img));

        assert_eq!(grid.width(), 3);
        assert_eq!(grid.as_slice(), &[255, 3, 7]);
    }

    #[test]
    fn test_load_map_from_png_and_adjacency() {
        let dir = TempDir::new().unwrap();
        write_world(&dir);

        let map = load_map(dir.path(), "world").unwrap();
        assert_eq!(map.countries(), 2);
        assert_eq!((map.width(), map.height()), (3, 2));
        assert_eq!(map.region_at(0, 1), Some(RegionId(1)));
        assert_eq!(map.region_at(2, 0), Some(RegionId(2)));
        assert_eq!(map.region_at(2, 1), Some(RegionId::NONE));
        assert_eq!(map.neighbors_of(RegionId(1)), &[RegionId(2)]);
    }

    #[test]
    fn test_undecodable_bitmap() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("world.png"), b"not an image").unwrap();
        fs::write(dir.path().join("world.map"), "1 2\n").unwrap();

        let err = load_map(dir.path(), "world").unwrap_err();
        assert!(matches!(err, MapLoadError::Decode(_)));
    }

    #[test]
    fn test_missing_adjacency_file() {
        let dir = TempDir::new().unwrap();
        write_world(&dir);
        fs::remove_file(dir.path().join("world.map")).unwrap();

        let err = load_map(dir.path(), "world").unwrap_err();
        assert!(matches!(err, MapLoadError::Io(_)));
    }

    #[test]
    fn test_zero_sized_bitmap_is_empty() {
        let grid = pixel_grid_from_image(&DynamicImage::new_rgb8(0, 0));
        let err = RegionMap::new(&grid, &[]).unwrap_err();
        assert!(matches!(err, MapLoadError::EmptyBitmap { width: 0, height: 0 }));
    }

    #[test]
    fn test_missing_map_is_io_error() {
        let err = load_map(Path::new("/nonexistent-map-dir"), "world").unwrap_err();
        assert!(matches!(err, MapLoadError::Io(_)));
    }
}
