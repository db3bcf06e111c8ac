//! Serialized program model
//!
//! A snapshot is a resolved model written out by some front end as JSON or
//! YAML. Loading it builds a qualified-name index over every type, nested
//! ones included.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;
use crate::model::{Package, ProgramModel, TypeDecl};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotFormat {
    Json,
    Yaml,
}

impl SnapshotFormat {
    /// Pick the format from a file extension.
    pub fn from_path(path: &Path) -> Result<Self, ModelError> {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .as_deref()
        {
            Some("json") => Ok(SnapshotFormat::Json),
            Some("yaml") | Some("yml") => Ok(SnapshotFormat::Yaml),
            _ => Err(ModelError::UnsupportedExtension(path.to_path_buf())),
        }
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct SnapshotData {
    #[serde(default)]
    packages: Vec<Package>,
    #[serde(default)]
    types: Vec<TypeDecl>,
}

/// Index path from a top-level type down through `nested_types`.
/// The first declaration of a qualified name wins.
type TypePath = Vec<usize>;

/// A [`ProgramModel`] backed by a deserialized snapshot.
#[derive(Debug, Default)]
pub struct ModelSnapshot {
    data: SnapshotData,
    index: HashMap<String, TypePath>,
}

impl ModelSnapshot {
    pub fn new(packages: Vec<Package>, types: Vec<TypeDecl>) -> Self {
        let data = SnapshotData { packages, types };
        let index = Self::build_index(&data.types);
        ModelSnapshot { data, index }
    }

    /// Load a snapshot file; the extension selects the format.
    pub fn load(path: &Path) -> Result<Self, ModelError> {
        let format = SnapshotFormat::from_path(path)?;
        let text = std::fs::read_to_string(path).map_err(|source| ModelError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let snapshot = Self::parse(&text, format)?;
        tracing::debug!(
            "Loaded model {}: {} packages, {} types",
            path.display(),
            snapshot.data.packages.len(),
            snapshot.index.len()
        );
        Ok(snapshot)
    }

    pub fn parse(text: &str, format: SnapshotFormat) -> Result<Self, ModelError> {
        let data: SnapshotData = match format {
            SnapshotFormat::Json => serde_json::from_str(text)?,
            SnapshotFormat::Yaml => serde_yaml::from_str(text)?,
        };
        Ok(Self::new(data.packages, data.types))
    }

    /// Total number of declared types, nested ones included.
    pub fn type_count(&self) -> usize {
        self.index.len()
    }

    fn build_index(types: &[TypeDecl]) -> HashMap<String, TypePath> {
        let mut index = HashMap::new();
        let mut stack: Vec<(TypePath, &TypeDecl)> = types
            .iter()
            .enumerate()
            .rev()
            .map(|(i, t)| (vec![i], t))
            .collect();
        while let Some((path, ty)) = stack.pop() {
            for (i, nested) in ty.nested_types.iter().enumerate().rev() {
                let mut child = path.clone();
                child.push(i);
                stack.push((child, nested));
            }
            if index.contains_key(&ty.qualified_name) {
                tracing::warn!("Type {} declared more than once", ty.qualified_name);
                continue;
            }
            index.insert(ty.qualified_name.clone(), path);
        }
        index
    }
}

impl ProgramModel for ModelSnapshot {
    fn packages(&self) -> &[Package] {
        &self.data.packages
    }

    fn types(&self) -> &[TypeDecl] {
        &self.data.types
    }

    fn find_type(&self, qualified_name: &str) -> Option<&TypeDecl> {
        let path = self.index.get(qualified_name)?;
        let (first, rest) = path.split_first()?;
        let mut ty = self.data.types.get(*first)?;
        for &i in rest {
            ty = ty.nested_types.get(i)?;
        }
        Some(ty)
    }
}
