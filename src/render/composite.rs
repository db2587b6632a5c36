//! Composited map images
//!
//! The renderer owns one base image that always shows confirmed ownership.
//! Hover previews are drawn on private copies of it. Attack arrows are
//! rendered ahead of time into transparent full-size overlays, cached per
//! `(attacker, defender, color)` and published as immutable `Arc` snapshots.

use std::ops::Deref;
use std::sync::Arc;

use ahash::AHashMap;
use image::RgbaImage;
use tracing::{debug, info, warn};

use crate::core::config::RenderConfig;
use crate::core::error::LookupError;
use crate::core::types::{PlayerId, RegionId};
use crate::map::region_map::RegionMap;
use crate::map::walker::{walk_component, VisitSet};
use crate::render::colors::Color;
use crate::render::raster::{fill_triangle, stroke_polygon};
use crate::render::request::ImageRequest;

/// Cache key of an attack overlay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OverlayKey {
    pub attacker: RegionId,
    pub defender: RegionId,
    pub color: Color,
}

/// Image handed back for a request
#[derive(Debug, Clone)]
pub enum MapImage<'a> {
    /// The shared base composite
    Base(&'a RgbaImage),
    /// A private copy with the hovered region highlighted
    Hover(RgbaImage),
    /// A published attack overlay
    Overlay(Arc<RgbaImage>),
}

impl MapImage<'_> {
    pub fn into_owned(self) -> RgbaImage {
        match self {
            MapImage::Base(image) => image.clone(),
            MapImage::Hover(image) => image,
            MapImage::Overlay(image) => {
                Arc::try_unwrap(image).unwrap_or_else(|shared| (*shared).clone())
            }
        }
    }
}

impl Deref for MapImage<'_> {
    type Target = RgbaImage;

    fn deref(&self) -> &RgbaImage {
        match self {
            MapImage::Base(image) => image,
            MapImage::Hover(image) => image,
            MapImage::Overlay(image) => image,
        }
    }
}

/// Owner state plus every raster derived from it
#[derive(Debug)]
pub struct CompositeRenderer {
    map: RegionMap,
    config: RenderConfig,
    base: RgbaImage,
    /// Owner per region id; slot 0 unused
    owners: Vec<PlayerId>,
    colors: AHashMap<PlayerId, Color>,
    overlays: AHashMap<OverlayKey, Arc<RgbaImage>>,
}

impl CompositeRenderer {
    /// Paint the base image with every region owned by the neutral player
    /// and cache the neutral-colored attack overlays.
    pub fn new(map: RegionMap, config: RenderConfig) -> Self {
        let (width, height) = (map.width() as u32, map.height() as u32);
        let base = RgbaImage::from_pixel(width, height, config.background_color.to_rgba());
        let owners = vec![PlayerId::NEUTRAL; map.countries() as usize + 1];
        let mut colors = AHashMap::new();
        colors.insert(PlayerId::NEUTRAL, config.neutral_color);

        let mut renderer = Self {
            map,
            config,
            base,
            owners,
            colors,
            overlays: AHashMap::new(),
        };

        let neutral = renderer.config.neutral_color;
        for region in renderer.map.region_ids() {
            draw_country(
                &renderer.map,
                &mut renderer.base,
                region,
                neutral,
                renderer.config.border_darken,
                renderer.config.normal_lighten,
            );
        }
        let regions: Vec<RegionId> = renderer.map.region_ids().collect();
        for region in regions {
            renderer.cache_overlays(region, neutral, false);
        }

        info!(
            width,
            height,
            countries = renderer.map.countries(),
            overlays = renderer.overlays.len(),
            "composite renderer ready"
        );
        renderer
    }

    pub fn region_map(&self) -> &RegionMap {
        &self.map
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Native image size; requests are always served at this size
    pub fn native_size(&self) -> (u32, u32) {
        self.base.dimensions()
    }

    /// The shared base composite
    pub fn base_image(&self) -> &RgbaImage {
        &self.base
    }

    pub fn owner_of(&self, region: RegionId) -> Option<PlayerId> {
        if region.is_none() {
            return None;
        }
        self.owners.get(region.index()).copied()
    }

    pub fn player_color(&self, player: PlayerId) -> Option<Color> {
        self.colors.get(&player).copied()
    }

    /// Regions currently owned by `player`, ascending
    pub fn regions_of(&self, player: PlayerId) -> Vec<RegionId> {
        self.map
            .region_ids()
            .filter(|r| self.owners[r.index()] == player)
            .collect()
    }

    pub fn overlay_count(&self) -> usize {
        self.overlays.len()
    }

    /// Record `player`'s display color.
    ///
    /// Overlays of every region the player owns are regenerated in the new
    /// color (their old-color entries are dropped) and those regions are
    /// repainted in the base image. Other overlays are left untouched.
    pub fn set_player_color(&mut self, player: PlayerId, color: Color) {
        let previous = self.colors.insert(player, color);
        let owned = self.regions_of(player);

        if let Some(old) = previous.filter(|old| *old != color) {
            self.overlays
                .retain(|key, _| key.color != old || !owned.contains(&key.attacker));
        }

        let mut regenerated = 0;
        for &region in &owned {
            draw_country(
                &self.map,
                &mut self.base,
                region,
                color,
                self.config.border_darken,
                self.config.normal_lighten,
            );
            regenerated += self.cache_overlays(region, color, true);
        }

        debug!(%player, %color, regions = owned.len(), regenerated, "player color set");
    }

    /// Hand `region` to `player` and repaint it in the player's color
    pub fn set_country_owner(&mut self, region: RegionId, player: PlayerId) -> Result<(), LookupError> {
        if self.map.region(region).is_none() {
            return Err(LookupError::UnknownRegion(region));
        }
        let color = self
            .player_color(player)
            .ok_or(LookupError::UnknownPlayer(player))?;

        self.owners[region.index()] = player;
        draw_country(
            &self.map,
            &mut self.base,
            region,
            color,
            self.config.border_darken,
            self.config.normal_lighten,
        );
        let added = self.cache_overlays(region, color, false);

        debug!(%region, %player, added, "country owner set");
        Ok(())
    }

    /// Transparent full-size raster with an arrow from the attacker's
    /// centroid to the defender's. The arrow's base is `arrow_radius` either
    /// side of the attacker centroid, perpendicular to the direction of attack.
    pub fn render_attack_overlay(&self, attacker: RegionId, defender: RegionId, color: Color) -> RgbaImage {
        let (width, height) = self.native_size();
        let mut image = RgbaImage::new(width, height);

        let (Some(from), Some(to)) = (self.map.centroid_of(attacker), self.map.centroid_of(defender)) else {
            warn!(%attacker, %defender, "attack between regions without pixels");
            return image;
        };
        let (from, to) = (from.as_vec2(), to.as_vec2());
        let Some(direction) = (to - from).try_normalize() else {
            warn!(%attacker, %defender, "attack endpoints share a centroid");
            return image;
        };

        let offset = direction.perp() * self.config.arrow_radius;
        let corners = [from + offset, from - offset, to];
        fill_triangle(&mut image, corners, color);
        if let Some(outline) = self.config.arrow_outline {
            stroke_polygon(&mut image, &corners, outline);
        }
        image
    }

    /// Serve an image request
    pub fn request(&self, request: &ImageRequest) -> Result<MapImage<'_>, LookupError> {
        match *request {
            ImageRequest::Background { hover: None } => Ok(MapImage::Base(&self.base)),
            ImageRequest::Background { hover: Some(p) } => {
                Ok(self.hover_image(p.x as usize, p.y as usize))
            }
            ImageRequest::Attack {
                attacker,
                defender,
                color,
            } => self
                .attack_overlay(attacker, defender, color)
                .map(MapImage::Overlay),
        }
    }

    /// Base image with the region under `(x, y)` highlighted.
    ///
    /// Unclaimed or out-of-bounds positions get the base image itself.
    pub fn hover_image(&self, x: usize, y: usize) -> MapImage<'_> {
        let region = match self.map.region_at(x, y) {
            Some(region) if !region.is_none() => region,
            _ => return MapImage::Base(&self.base),
        };

        let color = self
            .owner_of(region)
            .and_then(|owner| self.player_color(owner))
            .unwrap_or(self.config.neutral_color);
        let mut image = self.base.clone();
        draw_country(
            &self.map,
            &mut image,
            region,
            color,
            self.config.border_darken,
            self.config.hover_lighten,
        );
        MapImage::Hover(image)
    }

    /// Cached overlay for an exact `(attacker, defender, color)` key
    pub fn attack_overlay(
        &self,
        attacker: RegionId,
        defender: RegionId,
        color: Color,
    ) -> Result<Arc<RgbaImage>, LookupError> {
        let key = OverlayKey {
            attacker,
            defender,
            color,
        };
        self.overlays
            .get(&key)
            .cloned()
            .ok_or(LookupError::MissingOverlay {
                attacker,
                defender,
                color,
            })
    }

    /// Render `attacker`'s overlays in `color`; existing entries are only
    /// replaced when `force` is set. Returns how many were rendered.
    fn cache_overlays(&mut self, attacker: RegionId, color: Color, force: bool) -> usize {
        let mut rendered = 0;
        for &defender in self.map.neighbors_of(attacker) {
            let key = OverlayKey {
                attacker,
                defender,
                color,
            };
            if !force && self.overlays.contains_key(&key) {
                continue;
            }
            let image = self.render_attack_overlay(attacker, defender, color);
            self.overlays.insert(key, Arc::new(image));
            rendered += 1;
        }
        rendered
    }
}

/// Paint every blob of `region`: border pixels darkened, interior lightened
fn draw_country(
    map: &RegionMap,
    image: &mut RgbaImage,
    region: RegionId,
    color: Color,
    border_darken: u32,
    lighten: u32,
) {
    let border = color.darker(border_darken).to_rgba();
    let inner = color.lighter(lighten).to_rgba();
    let mut visited = VisitSet::new();

    for key in map.key_points(region) {
        walk_component(map.labels(), (key.x as usize, key.y as usize), &mut visited, |x, y| {
            let rgba = if map.is_border(x, y) { border } else { inner };
            image.put_pixel(x as u32, y as u32, rgba);
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::adjacency::AdjacencyEntry;
    use crate::map::grid::Grid;

    const U: u8 = 255;

    fn renderer() -> CompositeRenderer {
        #[rustfmt::skip]
        let pixels = Grid::from_vec(6, 3, vec![
            1, 1, 1, 2, 2, 2,
            1, 1, 1, 2, 2, 2,
            U, U, U, 2, 2, 2,
        ]).unwrap();
        let adjacency = vec![AdjacencyEntry::new(1, vec![2]), AdjacencyEntry::new(2, vec![1])];
        let map = RegionMap::new(&pixels, &adjacency).unwrap();
        CompositeRenderer::new(map, RenderConfig::default())
    }

    #[test]
    fn test_initial_paint() {
        let r = renderer();
        let neutral = r.config().neutral_color;
        assert_eq!(r.base_image().get_pixel(0, 2).0, Color::WHITE.to_rgba().0);
        // (0, 0) only touches region 1 and the grid edge
        assert_eq!(r.base_image().get_pixel(0, 0).0, neutral.lighter(125).to_rgba().0);
        // (0, 1) touches unclaimed pixels below
        assert_eq!(r.base_image().get_pixel(0, 1).0, neutral.darker(200).to_rgba().0);
        assert_eq!(r.owner_of(RegionId(1)), Some(PlayerId::NEUTRAL));
    }

    #[test]
    fn test_neutral_overlays_primed() {
        let r = renderer();
        assert_eq!(r.overlay_count(), 2);
        assert!(r.attack_overlay(RegionId(1), RegionId(2), r.config().neutral_color).is_ok());
    }

    #[test]
    fn test_owner_needs_known_player_and_region() {
        let mut r = renderer();
        assert_eq!(
            r.set_country_owner(RegionId(1), PlayerId(4)),
            Err(LookupError::UnknownPlayer(PlayerId(4)))
        );
        r.set_player_color(PlayerId(4), Color::RED);
        assert_eq!(
            r.set_country_owner(RegionId(9), PlayerId(4)),
            Err(LookupError::UnknownRegion(RegionId(9)))
        );
        assert_eq!(
            r.set_country_owner(RegionId::NONE, PlayerId(4)),
            Err(LookupError::UnknownRegion(RegionId::NONE))
        );
        assert!(r.set_country_owner(RegionId(1), PlayerId(4)).is_ok());
        assert_eq!(r.regions_of(PlayerId(4)), vec![RegionId(1)]);
    }

    #[test]
    fn test_owner_change_caches_new_color_overlays() {
        let mut r = renderer();
        r.set_player_color(PlayerId(1), Color::GREEN);
        r.set_country_owner(RegionId(2), PlayerId(1)).unwrap();
        assert!(r.attack_overlay(RegionId(2), RegionId(1), Color::GREEN).is_ok());
        assert!(r.attack_overlay(RegionId(1), RegionId(2), Color::GREEN).is_err());
    }

    #[test]
    fn test_overlay_arrow_geometry() {
        let r = renderer();
        // centroids: region 1 at (1, 0), region 2 at (4, 1)
        let overlay = r.render_attack_overlay(RegionId(1), RegionId(2), Color::BLUE);
        assert_eq!(overlay.dimensions(), r.native_size());
        assert!(overlay.pixels().any(|p| p.0 == Color::BLUE.to_rgba().0));
        // outline passes through the tip pixel
        assert_eq!(overlay.get_pixel(4, 1).0, Color::BLACK.to_rgba().0);
        assert_eq!(overlay.get_pixel(5, 2).0[3], 0);
    }

    #[test]
    fn test_same_centroid_gives_empty_overlay() {
        let r = renderer();
        let overlay = r.render_attack_overlay(RegionId(1), RegionId(1), Color::BLUE);
        assert!(overlay.pixels().all(|p| p.0[3] == 0));
    }

    #[test]
    fn test_map_image_deref_and_into_owned() {
        let r = renderer();
        let image = r.request(&ImageRequest::background()).unwrap();
        assert_eq!(image.dimensions(), (6, 3));
        assert_eq!(&image.into_owned(), r.base_image());
    }
}
