use std::collections::HashMap;
use serde::Serialize;
use crate::api::error::{HexiError, Result};
use crate::api::types::SoundHandle;
use crate::assets::atlas::Atlas;
use crate::components::texture::{FrameRect, ScaleMode, Texture, TextureId};

/// What a resource path holds, decided by its file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum AssetKind {
    Image,
    Font,
    Json,
    Xml,
    Audio,
    /// Anything else, kept as text.
    Other,
}

impl AssetKind {
    pub fn from_path(path: &str) -> Self {
        let ext = path
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "png" | "jpg" | "jpeg" | "gif" | "webp" => AssetKind::Image,
            "ttf" | "otf" | "ttc" | "woff" | "woff2" => AssetKind::Font,
            "json" => AssetKind::Json,
            "xml" | "fnt" => AssetKind::Xml,
            "mp3" | "ogg" | "wav" | "webm" => AssetKind::Audio,
            _ => AssetKind::Other,
        }
    }
}

/// A fetched payload as the host delivers it.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// A decoded image; only its pixel size matters here.
    Image { width: f32, height: f32 },
    Text(String),
    Bytes(Vec<u8>),
}

/// A loaded resource.
#[derive(Debug, Clone, PartialEq)]
pub enum Resource {
    Image(TextureId),
    /// Font family the host registered for this file.
    Font { family: String },
    Json(serde_json::Value),
    /// Texture atlas JSON; its frames are in the texture table.
    Atlas { frames: Vec<TextureId> },
    Xml(String),
    /// `None` until the host reports the decode.
    Sound(Option<SoundHandle>),
    Text(String),
}

impl Resource {
    pub fn kind(&self) -> AssetKind {
        match self {
            Resource::Image(_) => AssetKind::Image,
            Resource::Font { .. } => AssetKind::Font,
            Resource::Json(_) | Resource::Atlas { .. } => AssetKind::Json,
            Resource::Xml(_) => AssetKind::Xml,
            Resource::Sound(_) => AssetKind::Audio,
            Resource::Text(_) => AssetKind::Other,
        }
    }
}

/// Font family derived from a font path: `fonts/puzzler.otf` -> `puzzler`.
pub fn font_family(path: &str) -> String {
    let file = path.rsplit('/').next().unwrap_or(path);
    file.split_once('.').map_or(file, |(stem, _)| stem).to_string()
}

/// Directory part of a path including the trailing slash, or empty.
fn base_dir(path: &str) -> &str {
    path.rfind('/').map_or("", |i| &path[..=i])
}

/// Every loaded resource plus the texture table render instances index into.
#[derive(Debug, Default)]
pub struct ResourceTable {
    resources: HashMap<String, Resource>,
    textures: Vec<Texture>,
    texture_names: HashMap<String, TextureId>,
}

impl ResourceTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.resources.contains_key(name) || self.texture_names.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&Resource> {
        self.resources.get(name)
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    /// All textures, indexed by `TextureId`.
    pub fn textures(&self) -> &[Texture] {
        &self.textures
    }

    fn add_texture(&mut self, name: &str, source: &str, frame: FrameRect) -> TextureId {
        if let Some(&id) = self.texture_names.get(name) {
            self.textures[id.0 as usize].frame = frame;
            return id;
        }
        let id = TextureId(self.textures.len() as u32);
        self.textures.push(Texture {
            id,
            name: name.to_string(),
            source: source.to_string(),
            frame,
            scale_mode: ScaleMode::Linear,
        });
        self.texture_names.insert(name.to_string(), id);
        id
    }

    /// Store a fetched payload under its path. Returns the resource kind and,
    /// for atlases, the image the frames are cut from.
    pub fn store(&mut self, path: &str, payload: Payload) -> Result<(AssetKind, Option<String>)> {
        let kind = AssetKind::from_path(path);
        let mismatch = || HexiError::PayloadMismatch(path.to_string());
        let mut atlas_image = None;
        let resource = match (kind, payload) {
            (AssetKind::Image, Payload::Image { width, height }) => {
                Resource::Image(self.add_texture(path, path, FrameRect::new(0.0, 0.0, width, height)))
            }
            (AssetKind::Image, _) => return Err(mismatch()),
            (AssetKind::Font, _) => Resource::Font { family: font_family(path) },
            (AssetKind::Audio, Payload::Bytes(_)) => Resource::Sound(None),
            (AssetKind::Audio, _) => return Err(mismatch()),
            (AssetKind::Json, Payload::Text(text)) => {
                let value: serde_json::Value = serde_json::from_str(&text).map_err(|source| HexiError::Json {
                    path: path.to_string(),
                    source,
                })?;
                if Atlas::is_atlas(&value) {
                    let atlas = Atlas::from_value(value).map_err(|source| HexiError::Json {
                        path: path.to_string(),
                        source,
                    })?;
                    let image = format!("{}{}", base_dir(path), atlas.image());
                    let frames = atlas
                        .frames
                        .iter()
                        .map(|(name, frame)| self.add_texture(name, &image, frame.frame))
                        .collect();
                    log::debug!("Atlas {} holds {} frame(s) from {}", path, atlas.frames.len(), image);
                    if !atlas.image().is_empty() {
                        atlas_image = Some(image);
                    }
                    Resource::Atlas { frames }
                } else {
                    Resource::Json(value)
                }
            }
            (AssetKind::Xml, Payload::Text(text)) => Resource::Xml(text),
            (AssetKind::Other, Payload::Text(text)) => Resource::Text(text),
            (AssetKind::Json | AssetKind::Xml | AssetKind::Other, _) => return Err(mismatch()),
        };
        self.resources.insert(path.to_string(), resource);
        Ok((kind, atlas_image))
    }

    /// Record the host's handle for a decoded sound.
    pub fn set_sound(&mut self, path: &str, handle: SoundHandle) -> Result<()> {
        match self.resources.get_mut(path) {
            Some(Resource::Sound(slot)) => {
                *slot = Some(handle);
                Ok(())
            }
            Some(other) => Err(HexiError::WrongKind {
                name: path.to_string(),
                expected: AssetKind::Audio,
                found: other.kind(),
            }),
            None => Err(HexiError::UnexpectedResource(path.to_string())),
        }
    }

    /// Decoded sounds by path.
    pub fn sound_objects(&self) -> impl Iterator<Item = (&str, SoundHandle)> {
        self.resources.iter().filter_map(|(path, r)| match r {
            Resource::Sound(Some(handle)) => Some((path.as_str(), *handle)),
            _ => None,
        })
    }

    /// A texture by image path or atlas frame name.
    pub fn texture(&self, name: &str) -> Result<&Texture> {
        let id = self.texture_names.get(name).copied().ok_or_else(|| self.missing_or_wrong(name, AssetKind::Image))?;
        self.texture_by_id(id).ok_or_else(|| HexiError::MissingResource(name.to_string()))
    }

    pub fn texture_by_id(&self, id: TextureId) -> Option<&Texture> {
        self.textures.get(id.0 as usize)
    }

    pub fn texture_mut(&mut self, id: TextureId) -> Option<&mut Texture> {
        self.textures.get_mut(id.0 as usize)
    }

    pub fn sound(&self, name: &str) -> Result<SoundHandle> {
        match self.resources.get(name) {
            Some(Resource::Sound(Some(handle))) => Ok(*handle),
            Some(Resource::Sound(None)) => Err(HexiError::MissingResource(name.to_string())),
            _ => Err(self.missing_or_wrong(name, AssetKind::Audio)),
        }
    }

    pub fn json(&self, name: &str) -> Result<&serde_json::Value> {
        match self.resources.get(name) {
            Some(Resource::Json(value)) => Ok(value),
            _ => Err(self.missing_or_wrong(name, AssetKind::Json)),
        }
    }

    pub fn xml(&self, name: &str) -> Result<&str> {
        match self.resources.get(name) {
            Some(Resource::Xml(text)) => Ok(text),
            _ => Err(self.missing_or_wrong(name, AssetKind::Xml)),
        }
    }

    /// Family name of a loaded font file.
    pub fn font(&self, name: &str) -> Result<&str> {
        match self.resources.get(name) {
            Some(Resource::Font { family }) => Ok(family),
            _ => Err(self.missing_or_wrong(name, AssetKind::Font)),
        }
    }

    fn missing_or_wrong(&self, name: &str, expected: AssetKind) -> HexiError {
        match self.resources.get(name) {
            Some(found) => HexiError::WrongKind {
                name: name.to_string(),
                expected,
                found: found.kind(),
            },
            None => HexiError::MissingResource(name.to_string()),
        }
    }
}
