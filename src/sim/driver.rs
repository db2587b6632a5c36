//! Random event driver
//!
//! Stands in for a real game: hands out random owners and army counts and
//! launches random attacks along adjacency edges, keeping the renderer and
//! the scene in step. There are no game rules here.

use std::time::Duration;

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info};

use crate::core::config::SimulationConfig;
use crate::core::error::{LookupError, MapError};
use crate::core::types::{PixelCoord, PlayerId, RegionId};
use crate::render::composite::CompositeRenderer;
use crate::sim::events::{SceneEvent, SceneSink};

pub struct SimulationDriver {
    config: SimulationConfig,
    seed: u64,
    rng: ChaCha8Rng,
    /// Attacks launched so far, in launch order
    attacks: Vec<(RegionId, RegionId)>,
    /// Army count per region id
    armies: Vec<u32>,
    tick: u64,
}

impl SimulationDriver {
    /// Fails with `MapError::Invalid` when the config cannot drive a game
    /// (no players, or an empty army range).
    pub fn new(config: SimulationConfig) -> Result<Self, MapError> {
        config.validate().map_err(MapError::Invalid)?;
        let seed = config.seed.unwrap_or_else(rand::random);
        Ok(Self {
            config,
            seed,
            rng: ChaCha8Rng::seed_from_u64(seed),
            attacks: Vec::new(),
            armies: Vec::new(),
            tick: 0,
        })
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Number of real players (ids `1..=players`)
    pub fn players(&self) -> u32 {
        self.config.player_colors.len() as u32
    }

    pub fn attacks(&self) -> &[(RegionId, RegionId)] {
        &self.attacks
    }

    pub fn army_of(&self, region: RegionId) -> u32 {
        self.armies.get(region.index()).copied().unwrap_or(0)
    }

    pub fn ticks(&self) -> u64 {
        self.tick
    }

    /// Pause between ticks when driving a live scene
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.config.tick_interval_ms)
    }

    /// Announce every country, assign player colors, then hand each country
    /// to a random player with a random army.
    pub fn populate<S: SceneSink>(
        &mut self,
        renderer: &mut CompositeRenderer,
        sink: &mut S,
    ) -> Result<(), LookupError> {
        let countries = placed_regions(renderer);
        self.armies = vec![0; renderer.region_map().countries() as usize + 1];

        for &(region, at) in &countries {
            sink.emit(SceneEvent::AddCountry { region, at });
        }

        for (index, &color) in self.config.player_colors.iter().enumerate() {
            renderer.set_player_color(PlayerId(index as u32 + 1), color);
        }

        let players = self.players();
        for &(region, at) in &countries {
            let player = PlayerId(self.rng.gen_range(1..=players));
            self.assign_owner(renderer, sink, region, at, player)?;

            let armies = self.rng.gen_range(1..=self.config.max_initial_army);
            self.set_army(sink, region, at, armies);
        }

        info!(
            seed = self.seed,
            countries = countries.len(),
            players = self.players(),
            "scene populated"
        );
        Ok(())
    }

    /// One round of random changes followed by a reload
    pub fn tick<S: SceneSink>(
        &mut self,
        renderer: &mut CompositeRenderer,
        sink: &mut S,
    ) -> Result<(), LookupError> {
        let countries = placed_regions(renderer);
        if countries.is_empty() {
            return Ok(());
        }
        if self.armies.len() <= renderer.region_map().countries() as usize {
            self.armies = vec![0; renderer.region_map().countries() as usize + 1];
        }

        self.random_army(sink, &countries);
        self.random_owner(renderer, sink, &countries)?;
        self.random_attack(renderer, sink, &countries)?;
        sink.emit(SceneEvent::Reload);

        self.tick += 1;
        debug!(tick = self.tick, attacks = self.attacks.len(), "tick done");
        Ok(())
    }

    fn random_army<S: SceneSink>(&mut self, sink: &mut S, countries: &[(RegionId, PixelCoord)]) {
        if let Some(&(region, at)) = countries.choose(&mut self.rng) {
            let armies = self.rng.gen_range(1..=self.config.max_army);
            self.set_army(sink, region, at, armies);
        }
    }

    fn random_owner<S: SceneSink>(
        &mut self,
        renderer: &mut CompositeRenderer,
        sink: &mut S,
        countries: &[(RegionId, PixelCoord)],
    ) -> Result<(), LookupError> {
        let Some(&(region, at)) = countries.choose(&mut self.rng) else {
            return Ok(());
        };
        let players = self.players();
        let player = PlayerId(self.rng.gen_range(0..=players));
        self.assign_owner(renderer, sink, region, at, player)?;

        for &(attacker, defender) in &self.attacks {
            if attacker == region {
                sink.emit(SceneEvent::HideAttack { attacker, defender });
            }
        }
        Ok(())
    }

    fn random_attack<S: SceneSink>(
        &mut self,
        renderer: &CompositeRenderer,
        sink: &mut S,
        countries: &[(RegionId, PixelCoord)],
    ) -> Result<(), LookupError> {
        let Some(&(attacker, _)) = countries.choose(&mut self.rng) else {
            return Ok(());
        };
        let Some(&defender) = renderer
            .region_map()
            .neighbors_of(attacker)
            .choose(&mut self.rng)
        else {
            return Ok(());
        };

        let owner = renderer
            .owner_of(attacker)
            .ok_or(LookupError::UnknownRegion(attacker))?;
        let color = renderer
            .player_color(owner)
            .ok_or(LookupError::UnknownPlayer(owner))?;

        if self.attacks.contains(&(attacker, defender)) {
            sink.emit(SceneEvent::ShowAttack {
                attacker,
                defender,
                color,
            });
        } else {
            self.attacks.push((attacker, defender));
            sink.emit(SceneEvent::AddAttack {
                attacker,
                defender,
                color,
            });
        }
        Ok(())
    }

    fn assign_owner<S: SceneSink>(
        &mut self,
        renderer: &mut CompositeRenderer,
        sink: &mut S,
        region: RegionId,
        at: PixelCoord,
        player: PlayerId,
    ) -> Result<(), LookupError> {
        renderer.set_country_owner(region, player)?;
        let color = renderer
            .player_color(player)
            .ok_or(LookupError::UnknownPlayer(player))?;
        sink.emit(SceneEvent::SetCountryColor {
            at,
            color: color.darker(200),
        });
        Ok(())
    }

    fn set_army<S: SceneSink>(
        &mut self,
        sink: &mut S,
        region: RegionId,
        at: PixelCoord,
        armies: u32,
    ) {
        if let Some(slot) = self.armies.get_mut(region.index()) {
            *slot = armies;
        }
        sink.emit(SceneEvent::SetCountryArmy { at, armies });
    }
}

/// Regions that have pixels, with their centroids
fn placed_regions(renderer: &CompositeRenderer) -> Vec<(RegionId, PixelCoord)> {
    renderer
        .region_map()
        .regions()
        .filter_map(|r| r.centroid.map(|at| (r.id, at)))
        .collect()
}
