//! Integration tests for the composite renderer

use std::sync::Arc;

use conquest_map::core::config::RenderConfig;
use conquest_map::core::error::LookupError;
use conquest_map::core::types::{PlayerId, RegionId};
use conquest_map::map::{AdjacencyEntry, Grid, RegionMap};
use conquest_map::render::{Color, CompositeRenderer, ImageRequest, MapImage};

const U: u8 = 255;

/// Three regions in a row above an unclaimed strip; 1-2 and 2-3 touch
fn create_test_renderer() -> CompositeRenderer {
    #[rustfmt::skip]
    let pixels = Grid::from_vec(9, 4, vec![
        1, 1, 1, 2, 2, 2, 3, 3, 3,
        1, 1, 1, 2, 2, 2, 3, 3, 3,
        1, 1, 1, 2, 2, 2, 3, 3, 3,
        U, U, U, U, U, U, U, U, U,
    ]).unwrap();
    let adjacency = vec![
        AdjacencyEntry::new(1, vec![2]),
        AdjacencyEntry::new(2, vec![1, 3]),
        AdjacencyEntry::new(3, vec![2]),
    ];
    let map = RegionMap::new(&pixels, &adjacency).unwrap();
    CompositeRenderer::new(map, RenderConfig::default())
}

/// Coordinates where two images differ
fn changed_pixels(a: &image::RgbaImage, b: &image::RgbaImage) -> Vec<(u32, u32)> {
    a.enumerate_pixels()
        .filter(|(x, y, p)| b.get_pixel(*x, *y) != *p)
        .map(|(x, y, _)| (x, y))
        .collect()
}

fn pixels_of(renderer: &CompositeRenderer, region: RegionId) -> Vec<(u32, u32)> {
    let map = renderer.region_map();
    let mut pixels = Vec::new();
    for y in 0..map.height() {
        for x in 0..map.width() {
            if map.region_at(x, y) == Some(region) {
                pixels.push((x as u32, y as u32));
            }
        }
    }
    pixels
}

#[test]
fn test_owner_change_repaints_only_that_region() {
    let mut renderer = create_test_renderer();
    renderer.set_player_color(PlayerId(1), Color::GREEN);
    let before = renderer.base_image().clone();

    renderer.set_country_owner(RegionId(2), PlayerId(1)).unwrap();

    let changed = changed_pixels(&before, renderer.base_image());
    assert_eq!(changed, pixels_of(&renderer, RegionId(2)));

    // (4, 1) is interior, (3, 1) borders region 1
    let after = renderer.base_image();
    assert_eq!(after.get_pixel(4, 1).0, Color::GREEN.lighter(125).to_rgba().0);
    assert_eq!(after.get_pixel(3, 1).0, Color::GREEN.darker(200).to_rgba().0);
}

#[test]
fn test_hover_leaves_base_untouched() {
    let renderer = create_test_renderer();
    let before = renderer.base_image().clone();

    let hovered = renderer.request(&ImageRequest::hover(4, 1)).unwrap();
    assert!(matches!(hovered, MapImage::Hover(_)));

    // only the interior of region 2 is relit; its border keeps the dark shade
    let changed = changed_pixels(&before, &hovered);
    assert_eq!(changed, vec![(4, 0), (4, 1)]);
    let neutral = renderer.config().neutral_color;
    assert_eq!(hovered.get_pixel(4, 1).0, neutral.lighter(170).to_rgba().0);
    assert_eq!(renderer.base_image(), &before);
}

#[test]
fn test_hover_outside_regions_serves_base() {
    let renderer = create_test_renderer();
    assert!(matches!(renderer.hover_image(0, 3), MapImage::Base(_)));
    assert!(matches!(renderer.hover_image(40, 40), MapImage::Base(_)));
}

#[test]
fn test_player_color_change_is_exact() {
    let mut renderer = create_test_renderer();
    let neutral = renderer.config().neutral_color;
    renderer.set_player_color(PlayerId(1), Color::GREEN);
    renderer.set_player_color(PlayerId(2), Color::BLUE);
    renderer.set_country_owner(RegionId(1), PlayerId(1)).unwrap();
    renderer.set_country_owner(RegionId(3), PlayerId(2)).unwrap();

    let other_player = renderer.attack_overlay(RegionId(3), RegionId(2), Color::BLUE).unwrap();
    let neutral_region = renderer.attack_overlay(RegionId(2), RegionId(1), neutral).unwrap();
    let old_green = renderer.attack_overlay(RegionId(1), RegionId(2), Color::GREEN).unwrap();

    renderer.set_player_color(PlayerId(1), Color::RED);

    assert!(renderer.attack_overlay(RegionId(1), RegionId(2), Color::RED).is_ok());
    assert_eq!(
        renderer.attack_overlay(RegionId(1), RegionId(2), Color::GREEN),
        Err(LookupError::MissingOverlay {
            attacker: RegionId(1),
            defender: RegionId(2),
            color: Color::GREEN,
        })
    );

    let still_blue = renderer.attack_overlay(RegionId(3), RegionId(2), Color::BLUE).unwrap();
    let still_neutral = renderer.attack_overlay(RegionId(2), RegionId(1), neutral).unwrap();
    assert!(Arc::ptr_eq(&other_player, &still_blue));
    assert!(Arc::ptr_eq(&neutral_region, &still_neutral));

    // published snapshots outlive regeneration
    assert!(old_green.pixels().any(|p| p.0 == Color::GREEN.to_rgba().0));

    // region 1 repainted in the new color
    assert_eq!(
        renderer.base_image().get_pixel(0, 0).0,
        Color::RED.lighter(125).to_rgba().0
    );
}

#[test]
fn test_non_adjacent_attack_is_missing() {
    let renderer = create_test_renderer();
    let neutral = renderer.config().neutral_color;
    let request = ImageRequest::attack(RegionId(1), RegionId(3), neutral);
    assert!(matches!(
        renderer.request(&request),
        Err(LookupError::MissingOverlay { .. })
    ));
}

#[test]
fn test_textual_request_serves_overlay() {
    let renderer = create_test_renderer();
    let request: ImageRequest = "attack 2 3 #505052".parse().unwrap();
    let image = renderer.request(&request).unwrap();
    assert!(matches!(image, MapImage::Overlay(_)));
    assert_eq!(image.dimensions(), renderer.native_size());

    let bad = "attack two 3 #505052".parse::<ImageRequest>();
    assert!(matches!(bad, Err(LookupError::MalformedRequest(_))));
}

#[test]
fn test_translucent_player_overlay_found_from_text_id() {
    let mut renderer = create_test_renderer();
    let translucent = Color::from_hex("#ff000080").unwrap();
    renderer.set_player_color(PlayerId(1), translucent);
    renderer.set_country_owner(RegionId(1), PlayerId(1)).unwrap();

    let request = ImageRequest::attack(RegionId(1), RegionId(2), translucent);
    let id = request.to_string();
    assert_eq!(id, "attack 1 2 #ff000080");

    let parsed: ImageRequest = id.parse().unwrap();
    assert_eq!(parsed, request);
    let direct = renderer.attack_overlay(RegionId(1), RegionId(2), translucent).unwrap();
    match renderer.request(&parsed).unwrap() {
        MapImage::Overlay(image) => assert!(Arc::ptr_eq(&image, &direct)),
        _ => panic!("attack request should serve an overlay"),
    }

    // scene events carry the same color text as the request id
    assert_eq!(serde_json::to_string(&translucent).unwrap(), "\"#ff000080\"");
}
