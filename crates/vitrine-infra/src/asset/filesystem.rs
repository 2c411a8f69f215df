// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Reads model files from a directory.

use std::path::{Component, Path, PathBuf};
use vitrine_core::asset::{AssetPath, AssetSource, LoadError};

/// Resolves asset paths against a root directory.
#[derive(Debug, Clone)]
pub struct FileSystemSource {
    root: PathBuf,
}

impl FileSystemSource {
    /// Serves files below `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The directory paths are resolved against.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, path: &AssetPath) -> Result<PathBuf, LoadError> {
        let relative = Path::new(path.normalized());
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if escapes {
            return Err(LoadError::Fetch {
                path: path.clone(),
                message: "path leaves the asset root".into(),
            });
        }
        Ok(self.root.join(relative))
    }
}

impl AssetSource for FileSystemSource {
    fn fetch(&self, path: &AssetPath) -> Result<Vec<u8>, LoadError> {
        let full = self.resolve(path)?;
        std::fs::read(&full).map_err(|e| LoadError::Fetch {
            path: path.clone(),
            message: format!("{}: {e}", full.display()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn reads_relative_to_root() {
        let dir = tempdir().unwrap();
        std::fs::create_dir(dir.path().join("glbs")).unwrap();
        std::fs::write(dir.path().join("glbs/0001.glb"), b"glTF").unwrap();

        let source = FileSystemSource::new(dir.path());
        let bytes = source.fetch(&AssetPath::new("/glbs/0001.glb")).unwrap();
        assert_eq!(bytes, b"glTF");
    }

    #[test]
    fn missing_files_are_fetch_errors() {
        let dir = tempdir().unwrap();
        let source = FileSystemSource::new(dir.path());
        let err = source.fetch(&AssetPath::new("glbs/0404.glb")).unwrap_err();
        assert!(matches!(err, LoadError::Fetch { .. }));
        assert_eq!(err.path().as_str(), "glbs/0404.glb");
    }

    #[test]
    fn parent_components_are_rejected() {
        let dir = tempdir().unwrap();
        let source = FileSystemSource::new(dir.path().join("assets"));
        let err = source.fetch(&AssetPath::new("../secret.glb")).unwrap_err();
        assert!(err.to_string().contains("leaves the asset root"));
    }
}
