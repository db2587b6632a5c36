//! Region extraction from a color-coded bitmap
//!
//! Each bitmap intensity below 255 names a region; one scan labels pixels,
//! finds the disjoint blobs of every region, flags border pixels and sums
//! coordinates for centroids. The result is immutable.

use tracing::{info, warn};

use crate::core::error::MapLoadError;
use crate::core::types::{PixelCoord, RegionId};
use crate::map::adjacency::{AdjacencyEntry, AdjacencyTable};
use crate::map::grid::{Grid, PixelGrid};
use crate::map::walker::{walk_component, VisitMask};

/// Geometry of one region
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Region {
    pub id: RegionId,
    /// Integer mean of member pixel coordinates; `None` if the id has no pixels
    pub centroid: Option<PixelCoord>,
    /// One seed pixel per disjoint blob, in scan order
    pub key_points: Vec<PixelCoord>,
    pub pixel_count: usize,
}

/// Labeled regions, borders, centroids and adjacency of a map
#[derive(Debug, Clone)]
pub struct RegionMap {
    labels: Grid<RegionId>,
    border: Grid<bool>,
    /// Indexed by region id; slot 0 is the empty `RegionId::NONE` sentinel
    regions: Vec<Region>,
    adjacency: AdjacencyTable,
    countries: u16,
}

impl RegionMap {
    /// Build the map from raw intensities and parsed adjacency entries
    pub fn new(pixels: &PixelGrid, adjacency: &[AdjacencyEntry]) -> Result<Self, MapLoadError> {
        let (width, height) = (pixels.width(), pixels.height());
        if width == 0 || height == 0 {
            return Err(MapLoadError::EmptyBitmap { width, height });
        }

        let labels = pixels.map(|&value| RegionId::from_intensity(value));
        let countries = labels.as_slice().iter().map(|id| id.0).max().unwrap_or(0);
        if countries == 0 {
            return Err(MapLoadError::NoRegions);
        }

        let mut sums = vec![(0u64, 0u64, 0u64); countries as usize + 1];
        let mut key_points = vec![Vec::new(); countries as usize + 1];
        let mut border = Grid::new(width, height);
        let mut visited = VisitMask::new(width, height);

        for y in 0..height {
            for x in 0..width {
                let id = labels[(x, y)];
                if id.is_none() {
                    continue;
                }

                let sum = &mut sums[id.index()];
                sum.0 += 1;
                sum.1 += x as u64;
                sum.2 += y as u64;

                if walk_component(&labels, (x, y), &mut visited, |_, _| {}) > 0 {
                    key_points[id.index()].push(PixelCoord::from((x, y)));
                }

                border[(x, y)] = labels
                    .neighbors4(x, y)
                    .any(|(nx, ny)| labels[(nx, ny)] != id);
            }
        }

        let regions = sums
            .into_iter()
            .zip(key_points)
            .enumerate()
            .map(|(index, ((count, sum_x, sum_y), key_points))| {
                let id = RegionId(index as u16);
                let centroid = (count > 0 && !id.is_none())
                    .then(|| PixelCoord::new((sum_x / count) as u32, (sum_y / count) as u32));
                if centroid.is_none() && !id.is_none() {
                    warn!(region = %id, "region id has no pixels in the bitmap");
                }
                Region {
                    id,
                    centroid,
                    key_points,
                    pixel_count: count as usize,
                }
            })
            .collect();

        let adjacency = AdjacencyTable::build(adjacency, countries)?;

        info!(
            width,
            height,
            countries,
            edges = adjacency.edge_count(),
            "region map built"
        );

        Ok(Self {
            labels,
            border,
            regions,
            adjacency,
            countries,
        })
    }

    /// Highest region id present in the bitmap
    pub fn countries(&self) -> u16 {
        self.countries
    }

    pub fn width(&self) -> usize {
        self.labels.width()
    }

    pub fn height(&self) -> usize {
        self.labels.height()
    }

    /// Region under a pixel; `None` outside the bitmap
    pub fn region_at(&self, x: usize, y: usize) -> Option<RegionId> {
        self.labels.get(x, y).copied()
    }

    /// Whether a labeled pixel touches a differently labeled 4-neighbour.
    /// Unclaimed and out-of-bounds pixels are never borders.
    pub fn is_border(&self, x: usize, y: usize) -> bool {
        self.border.get(x, y).copied().unwrap_or(false)
    }

    pub fn centroid_of(&self, region: RegionId) -> Option<PixelCoord> {
        self.region(region).and_then(|r| r.centroid)
    }

    pub fn key_points(&self, region: RegionId) -> &[PixelCoord] {
        self.region(region)
            .map(|r| r.key_points.as_slice())
            .unwrap_or(&[])
    }

    /// Regions that `region` can attack, in adjacency-file order
    pub fn neighbors_of(&self, region: RegionId) -> &[RegionId] {
        self.adjacency.neighbors_of(region)
    }

    pub fn adjacency(&self) -> &AdjacencyTable {
        &self.adjacency
    }

    /// Region record; `None` for the sentinel and unknown ids
    pub fn region(&self, region: RegionId) -> Option<&Region> {
        if region.is_none() {
            return None;
        }
        self.regions.get(region.index())
    }

    /// Ids `1..=countries`
    pub fn region_ids(&self) -> impl Iterator<Item = RegionId> {
        (1..=self.countries).map(RegionId)
    }

    /// All real regions, sentinel excluded
    pub fn regions(&self) -> impl Iterator<Item = &Region> {
        self.regions.iter().skip(1)
    }

    pub fn labels(&self) -> &Grid<RegionId> {
        &self.labels
    }
}
