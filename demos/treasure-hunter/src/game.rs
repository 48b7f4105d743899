use glam::Vec2;
use hexi::{keys, Bounds, Game, Hexi, HexiConfig, NodeId, Result, ShapeStyle};

const CANVAS_SIZE: f32 = 512.0;
const ATLAS: &str = "images/treasureHunter.json";
const CHIME: &str = "sounds/chime.ogg";

const EXPLORER_SPEED: f32 = 3.0;
const BLOB_COUNT: usize = 6;
const BLOB_SPACING: f32 = 48.0;
const BLOB_X_OFFSET: f32 = 150.0;
const BLOB_SPEED: f32 = 2.0;
const HEALTH_WIDTH: f32 = 128.0;
const HEALTH_HEIGHT: f32 = 8.0;

/// The dungeon floor inside the walls.
const PLAY_AREA: Bounds = Bounds {
    x: 28.0,
    y: 10.0,
    width: 488.0,
    height: 480.0,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Won,
    Lost,
}

/// Node ids created by setup.
#[derive(Debug, Clone)]
struct World {
    game_scene: NodeId,
    game_over_scene: NodeId,
    explorer: NodeId,
    treasure: NodeId,
    door: NodeId,
    blobs: Vec<NodeId>,
    health: NodeId,
    message: NodeId,
}

/// Guide the explorer to the treasure and carry it out of the door while
/// dodging the blobs.
pub struct TreasureHunter {
    world: Option<World>,
    carrying: bool,
    outcome: Option<Outcome>,
}

impl TreasureHunter {
    pub fn new() -> Self {
        Self {
            world: None,
            carrying: false,
            outcome: None,
        }
    }

    #[cfg(test)]
    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }
}

impl Default for TreasureHunter {
    fn default() -> Self {
        Self::new()
    }
}

impl Game for TreasureHunter {
    fn config(&self) -> HexiConfig<Self> {
        HexiConfig::new(CANVAS_SIZE, CANVAS_SIZE)
            .with_assets([ATLAS, CHIME])
            .with_load(load)
            .with_setup(setup)
            .with_scale_to_window(true)
            .with_background_color(0x000000)
    }
}

fn load(_: &mut TreasureHunter, hexi: &mut Hexi<TreasureHunter>) {
    if let Err(err) = hexi.loading_bar() {
        log::warn!("No loading bar: {}", err);
    }
}

fn setup(game: &mut TreasureHunter, hexi: &mut Hexi<TreasureHunter>) {
    match build(hexi) {
        Ok(world) => {
            game.world = Some(world);
            hexi.on_key(keys::ESCAPE, true, toggle_pause);
            hexi.set_state(play);
        }
        Err(err) => log::error!("Treasure Hunter setup failed: {}", err),
    }
}

fn place(hexi: &mut Hexi<TreasureHunter>, id: NodeId, x: f32, y: f32) {
    if let Some(mut node) = hexi.node_mut(id) {
        node.set_position(x, y);
    }
}

fn size(hexi: &Hexi<TreasureHunter>, id: NodeId) -> Vec2 {
    hexi.node(id).map_or(Vec2::ZERO, |n| Vec2::new(n.width(), n.height()))
}

fn build(hexi: &mut Hexi<TreasureHunter>) -> Result<World> {
    let dungeon = hexi.sprite("dungeon.png")?;

    let door = hexi.sprite("door.png")?;
    place(hexi, door, 32.0, 0.0);

    let explorer = hexi.sprite("explorer.png")?;
    let explorer_size = size(hexi, explorer);
    place(hexi, explorer, 68.0, (CANVAS_SIZE - explorer_size.y) / 2.0);

    let treasure = hexi.sprite("treasure.png")?;
    let treasure_size = size(hexi, treasure);
    place(
        hexi,
        treasure,
        CANVAS_SIZE - treasure_size.x - 48.0,
        (CANVAS_SIZE - treasure_size.y) / 2.0,
    );

    let mut blobs = Vec::with_capacity(BLOB_COUNT);
    let mut direction = 1.0;
    for i in 0..BLOB_COUNT {
        let blob = hexi.sprite("blob.png")?;
        let height = size(hexi, blob).y;
        let y = hexi.random_int(0, (CANVAS_SIZE - height) as i32) as f32;
        place(hexi, blob, BLOB_SPACING * i as f32 + BLOB_X_OFFSET, y);
        if let Some(mut node) = hexi.node_mut(blob) {
            node.set_velocity(0.0, BLOB_SPEED * direction);
        }
        direction = -direction;
        blobs.push(blob);
    }

    let back = hexi.rectangle(HEALTH_WIDTH, HEALTH_HEIGHT, ShapeStyle::filled(0x000000));
    let health = hexi.rectangle(HEALTH_WIDTH, HEALTH_HEIGHT, ShapeStyle::filled(0xFF3300));
    let health_bar = hexi.group(&[back, health])?;
    place(hexi, health_bar, CANVAS_SIZE - 170.0, 4.0);

    let mut members = vec![dungeon, door, explorer, treasure];
    members.extend_from_slice(&blobs);
    members.push(health_bar);
    let game_scene = hexi.group(&members)?;

    let message = hexi.text("The End!", "64px Futura", 0x00FF00);
    place(hexi, message, 120.0, CANVAS_SIZE / 2.0 - 64.0);
    let game_over_scene = hexi.group(&[message])?;
    if let Some(mut node) = hexi.node_mut(game_over_scene) {
        node.set_visible(false);
    }

    Ok(World {
        game_scene,
        game_over_scene,
        explorer,
        treasure,
        door,
        blobs,
        health,
        message,
    })
}

fn toggle_pause(_: &mut TreasureHunter, hexi: &mut Hexi<TreasureHunter>) {
    if hexi.is_paused() {
        hexi.resume();
    } else {
        hexi.pause();
    }
}

fn explorer_velocity(hexi: &Hexi<TreasureHunter>) -> Vec2 {
    let mut v = Vec2::ZERO;
    if hexi.is_key_down(keys::LEFT) || hexi.is_key_down(keys::A) {
        v.x -= EXPLORER_SPEED;
    }
    if hexi.is_key_down(keys::RIGHT) || hexi.is_key_down(keys::D) {
        v.x += EXPLORER_SPEED;
    }
    if hexi.is_key_down(keys::UP) || hexi.is_key_down(keys::W) {
        v.y -= EXPLORER_SPEED;
    }
    if hexi.is_key_down(keys::DOWN) || hexi.is_key_down(keys::S) {
        v.y += EXPLORER_SPEED;
    }
    v
}

fn play(game: &mut TreasureHunter, hexi: &mut Hexi<TreasureHunter>) {
    let Some(world) = game.world.as_ref() else {
        return;
    };

    let v = explorer_velocity(hexi);
    if let Some(mut node) = hexi.node_mut(world.explorer) {
        node.set_velocity(v.x, v.y);
    }
    hexi.move_node(&[world.explorer]);
    let _ = hexi.contain(world.explorer, Some(PLAY_AREA), false);

    let mut explorer_hit = false;
    hexi.move_node(&world.blobs);
    for &blob in &world.blobs {
        let _ = hexi.contain(blob, Some(PLAY_AREA), true);
        if hexi.hit_test_rectangle(world.explorer, blob).unwrap_or(false) {
            explorer_hit = true;
        }
    }

    let health = hexi.node(world.health).map_or(0.0, |n| n.width());
    if let Some(mut node) = hexi.node_mut(world.explorer) {
        node.set_alpha(if explorer_hit { 0.5 } else { 1.0 });
    }
    if explorer_hit {
        if let Some(mut node) = hexi.node_mut(world.health) {
            node.set_width((health - 1.0).max(0.0));
        }
    }

    let mut carrying = game.carrying;
    if hexi.hit_test_rectangle(world.explorer, world.treasure).unwrap_or(false) {
        if !carrying {
            if let Err(err) = hexi.play_sound(CHIME) {
                log::warn!("{}", err);
            }
            carrying = true;
        }
        let (x, y) = hexi.node(world.explorer).map_or((0.0, 0.0), |n| (n.x(), n.y()));
        place(hexi, world.treasure, x + 8.0, y + 8.0);
    }

    let outcome = if hexi.hit_test_rectangle(world.treasure, world.door).unwrap_or(false) {
        Some(Outcome::Won)
    } else if explorer_hit && health <= 1.0 {
        Some(Outcome::Lost)
    } else {
        None
    };

    game.carrying = carrying;
    if outcome.is_some() {
        game.outcome = outcome;
        hexi.set_state(end);
    }
}

fn end(game: &mut TreasureHunter, hexi: &mut Hexi<TreasureHunter>) {
    let Some(world) = game.world.as_ref() else {
        return;
    };
    if let Some(mut node) = hexi.node_mut(world.game_scene) {
        node.set_visible(false);
    }
    if let Some(mut node) = hexi.node_mut(world.game_over_scene) {
        node.set_visible(true);
    }
    let text = match game.outcome {
        Some(Outcome::Won) => "You won!",
        _ => "You lost!",
    };
    if let Err(err) = hexi.set_text(world.message, text) {
        log::warn!("{}", err);
    }
    hexi.clear_state();
}
