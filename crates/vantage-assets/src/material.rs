use std::collections::BTreeMap;

use vantage_core::Color;

use crate::texture::TextureAsset;

/// The fixed set of texture slots a material may populate.
///
/// Disposal enumerates exactly this set, so a released material can never
/// strand a texture in a slot the lifecycle manager does not know about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TextureSlot {
    Diffuse,
    Light,
    Bump,
    Normal,
    Specular,
    Environment,
    Alpha,
    AmbientOcclusion,
    Displacement,
    Emissive,
    Metalness,
    Roughness,
}

impl TextureSlot {
    pub const ALL: [TextureSlot; 12] = [
        TextureSlot::Diffuse,
        TextureSlot::Light,
        TextureSlot::Bump,
        TextureSlot::Normal,
        TextureSlot::Specular,
        TextureSlot::Environment,
        TextureSlot::Alpha,
        TextureSlot::AmbientOcclusion,
        TextureSlot::Displacement,
        TextureSlot::Emissive,
        TextureSlot::Metalness,
        TextureSlot::Roughness,
    ];
}

/// Surface description attached to a single mesh node.
///
/// Materials are instantiated per node at load time and never shared, so the
/// lifecycle manager can release them without reference counting.
#[derive(Debug, Clone)]
pub struct Material {
    pub name: String,
    pub base_color: Color,
    pub metallic: f32,
    pub roughness: f32,
    pub double_sided: bool,
    textures: BTreeMap<TextureSlot, TextureAsset>,
}

impl Material {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Neutral gray used when a format carries no material of its own
    pub fn untextured_default() -> Self {
        Self::new("default")
    }

    pub fn with_base_color(mut self, color: Color) -> Self {
        self.base_color = color;
        self
    }

    pub fn set_texture(&mut self, slot: TextureSlot, texture: TextureAsset) {
        self.textures.insert(slot, texture);
    }

    pub fn texture(&self, slot: TextureSlot) -> Option<&TextureAsset> {
        self.textures.get(&slot)
    }

    /// Occupied slots in a stable order
    pub fn texture_slots(&self) -> impl Iterator<Item = TextureSlot> + '_ {
        self.textures.keys().copied()
    }

    pub fn texture_count(&self) -> usize {
        self.textures.len()
    }
}

impl Default for Material {
    fn default() -> Self {
        Self {
            name: "default".to_string(),
            base_color: Color::rgb(0.67, 0.67, 0.67),
            metallic: 0.25,
            roughness: 0.6,
            double_sided: true,
            textures: BTreeMap::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slot_set_is_complete_and_stable() {
        assert_eq!(TextureSlot::ALL.len(), 12);
        let mut sorted = TextureSlot::ALL.to_vec();
        sorted.sort();
        sorted.dedup();
        assert_eq!(sorted.len(), 12);
    }

    #[test]
    fn texture_slots_enumerate_in_order() {
        let mut material = Material::new("painted");
        material.set_texture(TextureSlot::Normal, TextureAsset::from_rgba8(1, 1, vec![0; 4]));
        material.set_texture(TextureSlot::Diffuse, TextureAsset::from_rgba8(1, 1, vec![0; 4]));
        let slots: Vec<_> = material.texture_slots().collect();
        assert_eq!(slots, vec![TextureSlot::Diffuse, TextureSlot::Normal]);
        assert_eq!(material.texture_count(), 2);
    }
}
