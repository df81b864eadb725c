//! Object class table.
//!
//! One list serves three roles: its order is the contiguous class index, its
//! semantic ids are the valid-object set, and its `mean_size` column is the
//! size-class anchor table.

use serde::{Deserialize, Serialize};

use crate::core::Point3;

/// One supervised object class
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ClassEntry {
    /// Raw semantic id in the scene annotations
    pub semantic_id: u32,
    /// Human-readable class name
    pub name: String,
    /// Mean box extents for this class (meters)
    pub mean_size: [f32; 3],
}

/// Ordered class table
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClassTable {
    entries: Vec<ClassEntry>,
}

/// ScanNet detection classes (NYU40 ids) with their mean sizes.
const SCANNET: [(u32, &str, [f32; 3]); 18] = [
    (3, "cabinet", [0.769_667_3, 0.811_602_1, 0.925_737_44]),
    (4, "bed", [1.876_858, 1.842_559_5, 1.193_156_6]),
    (5, "chair", [0.613_28, 0.614_860_9, 0.718_270_1]),
    (6, "sofa", [1.395_500_7, 1.512_154_5, 0.834_435_64]),
    (7, "table", [0.979_495_94, 1.067_514_9, 0.632_968_7]),
    (8, "door", [0.531_663, 0.595_557_7, 1.750_014_8]),
    (9, "window", [0.962_470_6, 0.724_623_26, 1.148_186_8]),
    (10, "bookshelf", [0.832_219_24, 1.049_093_6, 1.687_566_3]),
    (11, "picture", [0.211_322_14, 0.420_615_9, 0.537_284_6]),
    (12, "counter", [1.444_007_3, 1.897_083_3, 0.269_857_47]),
    (14, "desk", [1.029_426_2, 1.404_079_7, 0.875_543_24]),
    (16, "curtain", [1.376_641_2, 0.655_217_95, 1.681_312_9]),
    (24, "refrigerator", [0.665_081_9, 0.711_119_23, 1.298_853]),
    (28, "showercurtain", [0.419_991_73, 0.379_069_48, 1.751_397_1]),
    (33, "toilet", [0.593_595_56, 0.591_249_2, 0.739_190_16]),
    (34, "sink", [0.508_675_93, 0.506_560_86, 0.301_362_37]),
    (36, "bathtub", [1.151_152_6, 1.054_629_6, 0.497_067_93]),
    (39, "garbagebin", [0.475_352_85, 0.492_494_94, 0.580_211_7]),
];

impl Default for ClassTable {
    fn default() -> Self {
        Self::scannet()
    }
}

impl ClassTable {
    /// Build a table from entries (order defines the class index).
    pub fn new(entries: Vec<ClassEntry>) -> Self {
        Self { entries }
    }

    /// The 18 ScanNet detection classes.
    pub fn scannet() -> Self {
        Self {
            entries: SCANNET
                .iter()
                .map(|&(semantic_id, name, mean_size)| ClassEntry {
                    semantic_id,
                    name: name.to_string(),
                    mean_size,
                })
                .collect(),
        }
    }

    /// Number of classes
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no class is supervised
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All entries in class-index order
    pub fn entries(&self) -> &[ClassEntry] {
        &self.entries
    }

    /// Contiguous class index of a semantic id
    pub fn class_index(&self, semantic_id: u32) -> Option<usize> {
        self.entries.iter().position(|e| e.semantic_id == semantic_id)
    }

    /// True if `semantic_id` is a supervised object class
    pub fn is_valid(&self, semantic_id: u32) -> bool {
        self.class_index(semantic_id).is_some()
    }

    /// Semantic id of a class index
    pub fn semantic_id(&self, class: usize) -> Option<u32> {
        self.entries.get(class).map(|e| e.semantic_id)
    }

    /// Mean size of a class index
    pub fn mean_size(&self, class: usize) -> Option<Point3> {
        self.entries.get(class).map(|e| Point3::from_array(e.mean_size))
    }

    /// Class name of a class index
    pub fn name(&self, class: usize) -> Option<&str> {
        self.entries.get(class).map(|e| e.name.as_str())
    }

    /// Replace the mean size of the class with `semantic_id`.
    ///
    /// Returns false if the id is not in the table.
    pub fn set_mean_size(&mut self, semantic_id: u32, mean_size: [f32; 3]) -> bool {
        match self.entries.iter_mut().find(|e| e.semantic_id == semantic_id) {
            Some(entry) => {
                entry.mean_size = mean_size;
                true
            }
            None => false,
        }
    }

    /// Check for duplicate ids and non-positive mean sizes.
    pub fn validate(&self) -> Result<(), String> {
        if self.entries.is_empty() {
            return Err("class table is empty".to_string());
        }
        for (i, entry) in self.entries.iter().enumerate() {
            if entry.semantic_id == 0 {
                return Err(format!("class {} uses reserved semantic id 0", entry.name));
            }
            if self.entries[..i].iter().any(|e| e.semantic_id == entry.semantic_id) {
                return Err(format!("duplicate semantic id {}", entry.semantic_id));
            }
            if entry.mean_size.iter().any(|&s| !(s > 0.0 && s.is_finite())) {
                return Err(format!("class {} has a non-positive mean size", entry.name));
            }
        }
        Ok(())
    }
}
