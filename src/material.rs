//! Brain region material registry.
//!
//! Materials are opaque handles owned by the render layer. The manager only
//! checks that a requested name exists before assigning it to a side.

use rustc_hash::FxHashMap;

use crate::options::MaterialOptions;

/// A named material.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Material {
    /// Registry name.
    pub name: String,
    /// Whether the render layer blends this material.
    pub transparent: bool,
}

impl Material {
    fn named(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            transparent: name.starts_with("transparent"),
        }
    }
}

/// Materials addressable by name.
#[derive(Debug, Clone, Default)]
pub struct MaterialRegistry {
    materials: FxHashMap<String, Material>,
    default: String,
}

impl MaterialRegistry {
    /// Build the registry from configured names.
    #[must_use]
    pub fn from_options(options: &MaterialOptions) -> Self {
        let mut registry = Self {
            materials: FxHashMap::default(),
            default: options.default.clone(),
        };
        for name in &options.names {
            let _ = registry.insert(Material::named(name));
        }
        if !registry.contains(&options.default) {
            log::warn!(
                "default material {} is not in the material list, adding it",
                options.default
            );
            let _ = registry.insert(Material::named(&options.default));
        }
        registry
    }

    /// Add or replace a material, returning the previous entry.
    pub fn insert(&mut self, material: Material) -> Option<Material> {
        self.materials.insert(material.name.clone(), material)
    }

    /// Look up a material by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Material> {
        self.materials.get(name)
    }

    /// Whether a material with this name exists.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.materials.contains_key(name)
    }

    /// Name of the default material.
    #[must_use]
    pub fn default_name(&self) -> &str {
        &self.default
    }

    /// Number of registered materials.
    #[must_use]
    pub fn len(&self) -> usize {
        self.materials.len()
    }

    /// Whether the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_options_register_builtin_materials() {
        let registry =
            MaterialRegistry::from_options(&MaterialOptions::default());
        assert!(registry.contains("opaque-lit"));
        assert!(registry.get("transparent-unlit").unwrap().transparent);
        assert!(!registry.get("opaque-unlit").unwrap().transparent);
        assert_eq!(registry.default_name(), "default");
        assert!(!registry.contains("glass"));
    }

    #[test]
    fn missing_default_is_added() {
        let options = MaterialOptions {
            names: vec!["opaque-lit".to_owned()],
            default: "unlit".to_owned(),
        };
        let registry = MaterialRegistry::from_options(&options);
        assert_eq!(registry.len(), 2);
        assert!(registry.contains("unlit"));
    }
}
