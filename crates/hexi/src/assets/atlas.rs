use std::collections::BTreeMap;
use serde::{Deserialize, Serialize};
use crate::components::texture::FrameRect;

/// A texture atlas in TexturePacker's JSON hash format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Atlas {
    /// Frame name -> where it sits in the atlas image.
    pub frames: BTreeMap<String, AtlasFrame>,
    #[serde(default)]
    pub meta: AtlasMeta,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AtlasFrame {
    pub frame: FrameRect,
    #[serde(default)]
    pub rotated: bool,
    #[serde(default)]
    pub trimmed: bool,
    #[serde(default)]
    pub source_size: Option<AtlasSize>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AtlasSize {
    pub w: f32,
    pub h: f32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AtlasMeta {
    /// Atlas image file, relative to the JSON file.
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub size: Option<AtlasSize>,
}

impl Atlas {
    /// JSON with a `frames` object is treated as an atlas.
    pub fn is_atlas(value: &serde_json::Value) -> bool {
        value.get("frames").is_some_and(|f| f.is_object())
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn from_value(value: serde_json::Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }

    pub fn image(&self) -> &str {
        &self.meta.image
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_texture_packer_hash() {
        let json = r#"{
            "frames": {
                "blob.png": {
                    "frame": { "x": 55, "y": 2, "w": 32, "h": 24 },
                    "rotated": false,
                    "trimmed": false,
                    "spriteSourceSize": { "x": 0, "y": 0, "w": 32, "h": 24 },
                    "sourceSize": { "w": 32, "h": 24 }
                }
            },
            "meta": { "image": "treasureHunter.png", "size": { "w": 512, "h": 512 } }
        }"#;
        let atlas = Atlas::from_json(json).unwrap();
        assert_eq!(atlas.image(), "treasureHunter.png");
        let blob = &atlas.frames["blob.png"];
        assert_eq!(blob.frame, FrameRect::new(55.0, 2.0, 32.0, 24.0));
        assert_eq!(blob.source_size.map(|s| s.w), Some(32.0));
    }

    #[test]
    fn only_frame_objects_are_atlases() {
        let atlas: serde_json::Value = serde_json::from_str(r#"{ "frames": {} }"#).unwrap();
        let level: serde_json::Value = serde_json::from_str(r#"{ "frames": 3 }"#).unwrap();
        assert!(Atlas::is_atlas(&atlas));
        assert!(!Atlas::is_atlas(&level));
    }
}
