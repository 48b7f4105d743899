//! Particle bursts and emitters.
//!
//! A burst spawns short-lived sprite nodes that fly outward from a point,
//! shrinking, fading and spinning each frame until they become transparent
//! and are despawned. Emitters fire a burst every N frames while playing.

use std::collections::BTreeMap;
use std::f32::consts::TAU;
use glam::Vec2;
use crate::api::error::{HexiError, Result};
use crate::api::types::NodeId;
use crate::components::node::{DisplayNode, NodeKind, ShapeStyle};
use crate::components::texture::Texture;
use crate::core::lifecycle::FrameModule;
use crate::core::scene::Scene;
use crate::systems::rng::Rng;

/// Settings for one burst of particles.
#[derive(Debug, Clone)]
pub struct ParticleBurst {
    pub count: u32,
    /// Emission angle range in radians.
    pub angle_range: (f32, f32),
    /// Particle diameter range in pixels.
    pub size_range: (f32, f32),
    /// Initial speed range in pixels per frame.
    pub speed_range: (f32, f32),
    /// Scale lost per frame.
    pub scale_speed_range: (f32, f32),
    /// Alpha lost per frame.
    pub alpha_speed_range: (f32, f32),
    /// Radians turned per frame.
    pub rotation_speed_range: (f32, f32),
    /// Added to vertical velocity every frame.
    pub gravity: f32,
    /// Random angles when true, evenly spaced across the range otherwise.
    pub random_spacing: bool,
    /// Frames to pick from; a plain filled circle is used when empty.
    pub textures: Vec<Texture>,
    /// Fill of the fallback circle.
    pub color: u32,
}

impl Default for ParticleBurst {
    fn default() -> Self {
        Self {
            count: 20,
            angle_range: (0.0, TAU),
            size_range: (4.0, 16.0),
            speed_range: (0.3, 3.0),
            scale_speed_range: (0.01, 0.05),
            alpha_speed_range: (0.02, 0.02),
            rotation_speed_range: (0.01, 0.03),
            gravity: 0.0,
            random_spacing: true,
            textures: Vec::new(),
            color: 0xFFFFFF,
        }
    }
}

impl ParticleBurst {
    pub fn new() -> Self {
        Self::default()
    }

    // -- Builder pattern --

    pub fn with_count(mut self, count: u32) -> Self {
        self.count = count;
        self
    }

    pub fn with_angle_range(mut self, min: f32, max: f32) -> Self {
        self.angle_range = (min, max);
        self
    }

    pub fn with_size_range(mut self, min: f32, max: f32) -> Self {
        self.size_range = (min, max);
        self
    }

    pub fn with_speed_range(mut self, min: f32, max: f32) -> Self {
        self.speed_range = (min, max);
        self
    }

    pub fn with_scale_speed_range(mut self, min: f32, max: f32) -> Self {
        self.scale_speed_range = (min, max);
        self
    }

    pub fn with_alpha_speed_range(mut self, min: f32, max: f32) -> Self {
        self.alpha_speed_range = (min, max);
        self
    }

    pub fn with_rotation_speed_range(mut self, min: f32, max: f32) -> Self {
        self.rotation_speed_range = (min, max);
        self
    }

    pub fn with_gravity(mut self, gravity: f32) -> Self {
        self.gravity = gravity;
        self
    }

    pub fn with_random_spacing(mut self, random: bool) -> Self {
        self.random_spacing = random;
        self
    }

    pub fn with_textures(mut self, textures: Vec<Texture>) -> Self {
        self.textures = textures;
        self
    }

    pub fn with_color(mut self, color: u32) -> Self {
        self.color = color;
        self
    }
}

/// Per-particle motion state. The visuals live on the node.
#[derive(Debug, Clone)]
pub struct Particle {
    pub node: NodeId,
    pub vel: Vec2,
    pub gravity: f32,
    pub scale_speed: f32,
    pub alpha_speed: f32,
    pub rotation_speed: f32,
}

impl Particle {
    /// Advance one frame. Returns false once the particle is fully transparent.
    pub fn tick(&mut self, node: &mut DisplayNode) -> bool {
        self.vel.y += self.gravity;
        node.pos += self.vel;
        if node.scale.x - self.scale_speed > 0.0 {
            node.scale.x -= self.scale_speed;
        }
        if node.scale.y - self.scale_speed > 0.0 {
            node.scale.y -= self.scale_speed;
        }
        node.rotation += self.rotation_speed;
        node.alpha -= self.alpha_speed;
        node.alpha > 0.0
    }
}

/// Handle to an emitter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EmitterId(pub u32);

/// Fires a burst every `interval` frames while playing.
#[derive(Debug, Clone)]
pub struct Emitter {
    pub burst: ParticleBurst,
    pub parent: NodeId,
    pub origin: Vec2,
    pub interval: u32,
    pub playing: bool,
    timer: u32,
}

/// Owns live particles and emitters.
pub struct ParticleSystem {
    rng: Rng,
    particles: Vec<Particle>,
    emitters: BTreeMap<EmitterId, Emitter>,
    next_emitter: u32,
}

impl ParticleSystem {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Rng::new(seed),
            particles: Vec::with_capacity(256),
            emitters: BTreeMap::new(),
            next_emitter: 0,
        }
    }

    /// Spawn a burst under `parent`, centred on `origin` in the parent's space.
    pub fn burst(
        &mut self,
        scene: &mut Scene,
        parent: NodeId,
        origin: Vec2,
        burst: &ParticleBurst,
    ) -> Result<Vec<NodeId>> {
        spawn_burst(&mut self.rng, &mut self.particles, scene, parent, origin, burst)
    }

    /// Register a stopped emitter.
    pub fn add_emitter(&mut self, parent: NodeId, origin: Vec2, interval: u32, burst: ParticleBurst) -> EmitterId {
        let id = EmitterId(self.next_emitter);
        self.next_emitter += 1;
        self.emitters.insert(
            id,
            Emitter {
                burst,
                parent,
                origin,
                interval: interval.max(1),
                playing: false,
                timer: 0,
            },
        );
        id
    }

    pub fn play_emitter(&mut self, id: EmitterId) {
        if let Some(emitter) = self.emitters.get_mut(&id) {
            emitter.playing = true;
        }
    }

    pub fn stop_emitter(&mut self, id: EmitterId) {
        if let Some(emitter) = self.emitters.get_mut(&id) {
            emitter.playing = false;
            emitter.timer = 0;
        }
    }

    pub fn remove_emitter(&mut self, id: EmitterId) -> bool {
        self.emitters.remove(&id).is_some()
    }

    pub fn emitter(&self, id: EmitterId) -> Option<&Emitter> {
        self.emitters.get(&id)
    }

    /// Live particle count.
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Advance every particle one frame and fire due emitters.
    pub fn tick(&mut self, scene: &mut Scene) {
        self.particles.retain_mut(|particle| {
            let alive = match scene.get_mut(particle.node) {
                Some(node) => particle.tick(node),
                None => return false,
            };
            if !alive {
                scene.despawn(particle.node);
            }
            alive
        });

        for emitter in self.emitters.values_mut() {
            if !emitter.playing {
                continue;
            }
            emitter.timer += 1;
            if emitter.timer < emitter.interval {
                continue;
            }
            emitter.timer = 0;
            let fired = spawn_burst(
                &mut self.rng,
                &mut self.particles,
                scene,
                emitter.parent,
                emitter.origin,
                &emitter.burst,
            );
            if let Err(err) = fired {
                log::warn!("Emitter stopped: {}", err);
                emitter.playing = false;
            }
        }
    }
}

impl FrameModule for ParticleSystem {
    fn name(&self) -> &str {
        "particles"
    }

    fn update(&mut self, scene: &mut Scene, _dt: f32) {
        self.tick(scene);
    }
}

fn spawn_burst(
    rng: &mut Rng,
    particles: &mut Vec<Particle>,
    scene: &mut Scene,
    parent: NodeId,
    origin: Vec2,
    burst: &ParticleBurst,
) -> Result<Vec<NodeId>> {
    if !scene.contains(parent) {
        return Err(HexiError::UnknownNode(parent));
    }
    let (min_angle, max_angle) = burst.angle_range;
    let spacing = if burst.count > 1 {
        (max_angle - min_angle) / (burst.count - 1) as f32
    } else {
        0.0
    };

    let mut spawned = Vec::with_capacity(burst.count as usize);
    for i in 0..burst.count {
        let angle = if burst.random_spacing {
            rng.range_f32(min_angle, max_angle)
        } else {
            min_angle + spacing * i as f32
        };
        let size = rng.range_f32(burst.size_range.0, burst.size_range.1);
        let speed = rng.range_f32(burst.speed_range.0, burst.speed_range.1);

        let id = scene.next_id();
        let mut node = if burst.textures.is_empty() {
            DisplayNode::new(id, NodeKind::Circle(ShapeStyle::filled(burst.color)))
                .with_base_size(Vec2::splat(size))
        } else {
            let pick = rng.range_int(0, burst.textures.len() as i32 - 1) as usize;
            let texture = burst.textures[pick].clone();
            let mut node = DisplayNode::new(id, NodeKind::Sprite).with_textures(vec![texture]);
            if node.base_size.x > 0.0 && node.base_size.y > 0.0 {
                node.scale = Vec2::splat(size) / node.base_size;
            }
            node
        };
        node.pos = origin - Vec2::splat(size / 2.0);
        node.tag = "particle".into();
        scene.spawn(node);
        scene.add_child(parent, id)?;

        particles.push(Particle {
            node: id,
            vel: Vec2::new(speed * angle.cos(), speed * angle.sin()),
            gravity: burst.gravity,
            scale_speed: rng.range_f32(burst.scale_speed_range.0, burst.scale_speed_range.1),
            alpha_speed: rng.range_f32(burst.alpha_speed_range.0, burst.alpha_speed_range.1),
            rotation_speed: rng.range_f32(burst.rotation_speed_range.0, burst.rotation_speed_range.1),
        });
        spawned.push(id);
    }
    Ok(spawned)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn stage() -> Scene {
        Scene::new(Vec2::new(200.0, 200.0))
    }

    #[test]
    fn burst_spawns_children_at_origin() {
        let mut scene = stage();
        let mut system = ParticleSystem::new(42);
        let root = scene.root();
        let burst = ParticleBurst::new().with_count(5).with_size_range(10.0, 10.0);

        let ids = system.burst(&mut scene, root, Vec2::new(100.0, 50.0), &burst).unwrap();
        assert_eq!(ids.len(), 5);
        assert_eq!(system.len(), 5);
        for id in ids {
            let node = scene.get(id).unwrap();
            assert_eq!(node.parent(), Some(root));
            assert_relative_eq!(node.pos.x, 95.0);
            assert_relative_eq!(node.pos.y, 45.0);
        }
    }

    #[test]
    fn even_spacing_covers_the_range() {
        let mut scene = stage();
        let mut system = ParticleSystem::new(1);
        let burst = ParticleBurst::new()
            .with_count(3)
            .with_random_spacing(false)
            .with_angle_range(0.0, std::f32::consts::PI)
            .with_speed_range(2.0, 2.0);
        let root = scene.root();
        system.burst(&mut scene, root, Vec2::ZERO, &burst).unwrap();

        let vels: Vec<Vec2> = system.particles.iter().map(|p| p.vel).collect();
        assert_relative_eq!(vels[0].x, 2.0);
        assert_relative_eq!(vels[1].y, 2.0);
        assert_relative_eq!(vels[2].x, -2.0, epsilon = 1e-5);
    }

    #[test]
    fn transparent_particles_are_despawned() {
        let mut scene = stage();
        let mut system = ParticleSystem::new(3);
        let burst = ParticleBurst::new().with_count(4).with_alpha_speed_range(0.5, 0.5);
        let root = scene.root();
        system.burst(&mut scene, root, Vec2::ZERO, &burst).unwrap();
        assert_eq!(scene.len(), 5);

        system.update(&mut scene, 1.0 / 60.0);
        assert_eq!(system.len(), 4);
        system.update(&mut scene, 1.0 / 60.0);
        assert!(system.is_empty());
        assert_eq!(scene.len(), 1);
    }

    #[test]
    fn gravity_bends_trajectory() {
        let mut scene = stage();
        let mut system = ParticleSystem::new(5);
        let burst = ParticleBurst::new()
            .with_count(1)
            .with_angle_range(0.0, 0.0)
            .with_speed_range(1.0, 1.0)
            .with_gravity(0.5);
        let root = scene.root();
        system.burst(&mut scene, root, Vec2::ZERO, &burst).unwrap();
        system.tick(&mut scene);
        system.tick(&mut scene);
        assert_relative_eq!(system.particles[0].vel.y, 1.0);
    }

    #[test]
    fn emitter_fires_every_interval_while_playing() {
        let mut scene = stage();
        let mut system = ParticleSystem::new(9);
        let burst = ParticleBurst::new().with_count(2).with_alpha_speed_range(0.01, 0.01);
        let id = system.add_emitter(scene.root(), Vec2::new(10.0, 10.0), 3, burst);

        for _ in 0..3 {
            system.tick(&mut scene);
        }
        assert!(system.is_empty());

        system.play_emitter(id);
        for _ in 0..6 {
            system.tick(&mut scene);
        }
        assert_eq!(system.len(), 4);

        system.stop_emitter(id);
        for _ in 0..6 {
            system.tick(&mut scene);
        }
        assert_eq!(system.len(), 4);
    }

    #[test]
    fn emitter_with_missing_parent_stops() {
        let mut scene = stage();
        let mut system = ParticleSystem::new(9);
        let id = system.add_emitter(NodeId(999), Vec2::ZERO, 1, ParticleBurst::new());
        system.play_emitter(id);
        system.tick(&mut scene);
        assert!(!system.emitter(id).unwrap().playing);
    }
}
