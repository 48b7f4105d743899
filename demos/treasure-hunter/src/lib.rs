use wasm_bindgen::prelude::*;

mod game;
use game::TreasureHunter;

hexi_web::export_game!(TreasureHunter, "treasure-hunter");
