//! Named user presets for kernels and structuring elements.
//!
//! Persistence is the host's job. A store only keeps the name to value
//! mapping and guards the names of the built-in presets, which can be
//! neither overwritten nor removed. [`MemoryPresetStore::presets`]
//! serializes to the `{ "name": [[...], ...] }` file shape.

use std::collections::BTreeMap;

use crate::error::{EditError, Result};
use crate::filter::{Kernel, KernelPreset};
use crate::morphology::{ElementShape, StructuringElement};

/// Name shown for a hand-edited kernel or element. Always reserved.
pub const MANUAL_PRESET: &str = "Manual";

/// Storage for named presets.
pub trait PresetStore<V> {
    /// Stored preset names in sorted order.
    fn list(&self) -> Vec<String>;

    fn load(&self, name: &str) -> Result<V>;

    /// Store `value` under `name`, replacing an existing preset.
    fn save(&mut self, name: &str, value: V) -> Result<()>;

    fn rename(&mut self, from: &str, to: &str) -> Result<()>;

    fn delete(&mut self, name: &str) -> Result<()>;
}

/// In-memory [`PresetStore`].
#[derive(Debug, Clone)]
pub struct MemoryPresetStore<V> {
    presets: BTreeMap<String, V>,
    reserved: Vec<&'static str>,
}

impl MemoryPresetStore<Kernel> {
    /// Store for convolution kernels; built-in kernel names are reserved.
    pub fn kernels() -> Self {
        Self::with_reserved(KernelPreset::ALL.iter().map(|p| p.name()).collect())
    }
}

impl MemoryPresetStore<StructuringElement> {
    /// Store for structuring elements; built-in shape names are reserved.
    pub fn elements() -> Self {
        Self::with_reserved(ElementShape::ALL.iter().map(|s| s.name()).collect())
    }
}

impl<V: Clone> MemoryPresetStore<V> {
    pub fn with_reserved(mut reserved: Vec<&'static str>) -> Self {
        reserved.push(MANUAL_PRESET);
        Self {
            presets: BTreeMap::new(),
            reserved,
        }
    }

    /// Whether `name` belongs to a built-in preset (blank names included).
    pub fn is_reserved(&self, name: &str) -> bool {
        let name = name.trim();
        name.is_empty() || self.reserved.iter().any(|r| *r == name)
    }

    /// Stored presets, for the host to persist.
    pub fn presets(&self) -> &BTreeMap<String, V> {
        &self.presets
    }

    /// Merge previously persisted presets. Reserved names are skipped.
    ///
    /// Names are trimmed, so entries differing only in surrounding
    /// whitespace collide; the later one wins. Returns the number of new
    /// names added.
    pub fn extend(&mut self, entries: BTreeMap<String, V>) -> usize {
        let mut added = 0;
        for (name, value) in entries {
            if self.is_reserved(&name) {
                log::debug!("skipping stored preset with reserved name '{}'", name);
                continue;
            }
            let key = name.trim().to_string();
            if self.presets.insert(key, value).is_some() {
                log::debug!("stored preset '{}' replaced an existing entry", name);
            } else {
                added += 1;
            }
        }
        added
    }

    fn check_name(&self, name: &str) -> Result<()> {
        if self.is_reserved(name) {
            Err(EditError::ReservedPresetName(name.to_string()))
        } else {
            Ok(())
        }
    }
}

impl<V: Clone> PresetStore<V> for MemoryPresetStore<V> {
    fn list(&self) -> Vec<String> {
        self.presets.keys().cloned().collect()
    }

    fn load(&self, name: &str) -> Result<V> {
        self.presets
            .get(name.trim())
            .cloned()
            .ok_or_else(|| EditError::PresetNotFound(name.to_string()))
    }

    fn save(&mut self, name: &str, value: V) -> Result<()> {
        self.check_name(name)?;
        self.presets.insert(name.trim().to_string(), value);
        Ok(())
    }

    fn rename(&mut self, from: &str, to: &str) -> Result<()> {
        self.check_name(from)?;
        self.check_name(to)?;
        let (from, to) = (from.trim(), to.trim());
        if from == to {
            return if self.presets.contains_key(from) {
                Ok(())
            } else {
                Err(EditError::PresetNotFound(from.to_string()))
            };
        }
        if self.presets.contains_key(to) {
            return Err(EditError::PresetExists(to.to_string()));
        }
        let value = self
            .presets
            .remove(from)
            .ok_or_else(|| EditError::PresetNotFound(from.to_string()))?;
        self.presets.insert(to.to_string(), value);
        Ok(())
    }

    fn delete(&mut self, name: &str) -> Result<()> {
        self.check_name(name)?;
        self.presets
            .remove(name.trim())
            .map(|_| ())
            .ok_or_else(|| EditError::PresetNotFound(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_load_list() {
        let mut store = MemoryPresetStore::kernels();
        store.save("blur 5", KernelPreset::BoxBlur.kernel(5, 5)).unwrap();
        store.save(" edge ", KernelPreset::SobelX.kernel(3, 3)).unwrap();
        assert_eq!(store.list(), vec!["blur 5".to_string(), "edge".to_string()]);
        assert_eq!(store.load("edge").unwrap(), KernelPreset::SobelX.kernel(3, 3));
    }

    #[test]
    fn test_save_overwrites() {
        let mut store = MemoryPresetStore::kernels();
        store.save("k", Kernel::identity(3, 3)).unwrap();
        store.save("k", Kernel::identity(5, 5)).unwrap();
        assert_eq!(store.load("k").unwrap().rows(), 5);
        assert_eq!(store.list().len(), 1);
    }

    #[test]
    fn test_reserved_names() {
        let mut store = MemoryPresetStore::kernels();
        for name in ["Sharpen", "Identity", MANUAL_PRESET, "   "] {
            assert!(matches!(
                store.save(name, Kernel::identity(3, 3)),
                Err(EditError::ReservedPresetName(_))
            ));
        }
        assert!(matches!(store.delete("Emboss"), Err(EditError::ReservedPresetName(_))));

        let elements = MemoryPresetStore::elements();
        assert!(elements.is_reserved("Cross"));
        assert!(!elements.is_reserved("Sharpen"));
    }

    #[test]
    fn test_load_missing() {
        let store = MemoryPresetStore::elements();
        assert!(matches!(store.load("nope"), Err(EditError::PresetNotFound(_))));
    }

    #[test]
    fn test_rename() {
        let mut store = MemoryPresetStore::elements();
        store.save("a", StructuringElement::square(3)).unwrap();
        store.save("b", StructuringElement::square(5)).unwrap();

        assert!(matches!(store.rename("a", "b"), Err(EditError::PresetExists(_))));
        assert!(matches!(store.rename("a", "Square"), Err(EditError::ReservedPresetName(_))));
        assert!(matches!(store.rename("zzz", "c"), Err(EditError::PresetNotFound(_))));

        store.rename("a", "c").unwrap();
        assert_eq!(store.list(), vec!["b".to_string(), "c".to_string()]);
        assert_eq!(store.load("c").unwrap(), StructuringElement::square(3));
        store.rename("c", "c").unwrap();
    }

    #[test]
    fn test_delete() {
        let mut store = MemoryPresetStore::kernels();
        store.save("x", Kernel::identity(3, 3)).unwrap();
        store.delete("x").unwrap();
        assert!(store.list().is_empty());
        assert!(matches!(store.delete("x"), Err(EditError::PresetNotFound(_))));
    }

    #[test]
    fn test_persisted_shape() {
        let mut store = MemoryPresetStore::elements();
        store.save("plus", StructuringElement::shape(ElementShape::Cross, 3, 3)).unwrap();
        let json = serde_json::to_string(store.presets()).unwrap();
        assert_eq!(json, r#"{"plus":[[0,1,0],[1,1,1],[0,1,0]]}"#);
    }

    #[test]
    fn test_extend_counts_trimmed_collisions_once() {
        let mut entries = BTreeMap::new();
        entries.insert(" soft".to_string(), Kernel::identity(3, 3));
        entries.insert("soft".to_string(), Kernel::identity(5, 5));
        let mut store = MemoryPresetStore::kernels();
        assert_eq!(store.extend(entries), 1);
        assert_eq!(store.list(), vec!["soft".to_string()]);
        // "soft" sorts after " soft", so it is the one kept
        assert_eq!(store.load("soft").unwrap().rows(), 5);

        let mut again = BTreeMap::new();
        again.insert("soft".to_string(), Kernel::identity(3, 3));
        assert_eq!(store.extend(again), 0);
        assert_eq!(store.load("soft").unwrap().rows(), 3);
    }

    #[test]
    fn test_extend_from_json_skips_reserved() {
        let json = r#"{"soft":[[1,1,1],[1,2,1],[1,1,1]],"Sharpen":[[1]],"odd":[[1,2]]}"#;
        let entries: BTreeMap<String, Kernel> = serde_json::from_str(json).unwrap();
        let mut store = MemoryPresetStore::kernels();
        assert_eq!(store.extend(entries), 2);
        assert_eq!(store.list(), vec!["odd".to_string(), "soft".to_string()]);
        // Even widths are padded on load
        assert_eq!(store.load("odd").unwrap().cols(), 3);
        assert_eq!(store.load("soft").unwrap().sum(), 10.0);
    }
}
