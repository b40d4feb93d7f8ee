//! Scene loading from a directory of RON models.
//!
//! Layout:
//! - `<root>/main.ron`: the main container model.
//! - exhibit models and exhibit object models at the paths named by region metadata,
//!   relative to `<root>`.

use std::{
    fs::File,
    io::Read,
    path::{Path, PathBuf},
};

use gallery_shared::{
    ContainerModel, LoadError, LoadProgress, LoadRequest, ProgressSink, SceneLoader,
};

pub const MAIN_MODEL_FILE: &str = "main.ron";

/// Read size between progress reports.
pub const DEFAULT_CHUNK_SIZE: usize = 16 * 1024;

#[derive(Clone, Debug)]
pub struct FsSceneLoader {
    root: PathBuf,
    chunk_size: usize,
}

impl FsSceneLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }

    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    #[inline]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The main container model. Read in one go; it is resident for the whole session.
    pub fn load_main(&self) -> Result<ContainerModel, LoadError> {
        let path = self.root.join(MAIN_MODEL_FILE);
        let text = std::fs::read_to_string(&path).map_err(|source| LoadError::Io {
            path: path.display().to_string(),
            source,
        })?;
        parse_model(&path, &text)
    }

    /// Read one model file in chunks, reporting progress as model `index` of `total`.
    fn read_model(
        &self,
        relative: &str,
        index: usize,
        total: usize,
        progress: &mut dyn ProgressSink,
    ) -> Result<ContainerModel, LoadError> {
        let path = self.root.join(relative);
        let io_error = |source: std::io::Error| LoadError::Io {
            path: path.display().to_string(),
            source,
        };

        let mut file = File::open(&path).map_err(io_error)?;
        let len = file.metadata().map_err(io_error)?.len() as usize;

        let mut bytes = Vec::with_capacity(len);
        let mut chunk = vec![0u8; self.chunk_size];
        loop {
            let read = file.read(&mut chunk).map_err(io_error)?;
            if read == 0 {
                break;
            }
            bytes.extend_from_slice(&chunk[..read]);
            let percent = if len == 0 {
                100.0
            } else {
                (bytes.len() as f32 / len as f32 * 100.0).min(100.0)
            };
            progress.report(LoadProgress {
                model: index,
                total,
                percent,
            });
        }

        let text = String::from_utf8(bytes).map_err(|e| LoadError::Parse {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        parse_model(&path, &text)
    }
}

fn parse_model(path: &Path, text: &str) -> Result<ContainerModel, LoadError> {
    ron::from_str(text).map_err(|e| LoadError::Parse {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}

impl SceneLoader for FsSceneLoader {
    async fn load_exhibit(
        &self,
        request: &LoadRequest,
        progress: &mut dyn ProgressSink,
    ) -> Result<ContainerModel, LoadError> {
        let total = request.model_count();
        let mut model = self.read_model(&request.exhibit_model, 1, total, progress)?;
        if let Some(objects) = &request.exhibit_objects {
            let objects = self.read_model(objects, 2, total, progress)?;
            model.merge(objects);
        }
        log::debug!(
            "read exhibit `{}` ({} meshes)",
            request.exhibit_model,
            model.meshes.len()
        );
        Ok(model)
    }
}
