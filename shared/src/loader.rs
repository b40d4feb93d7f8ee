//! Scene loading seam.
//!
//! Exhibit models are fetched asynchronously by whatever the host provides (disk, network,
//! an in-memory table). This is the only await point of the core.

use std::{collections::HashMap, fmt, future::Future};

use crate::{error::LoadError, locator::Region, model::ContainerModel};

/// What to fetch for one exhibit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoadRequest {
    /// Region that triggered the load.
    pub region: String,
    pub exhibit_model: String,
    /// Extra objects merged into the exhibit after the main model.
    pub exhibit_objects: Option<String>,
}

impl LoadRequest {
    pub fn from_region(region: &Region) -> Result<Self, LoadError> {
        let exhibit_model = region
            .meta
            .exhibit_model
            .clone()
            .ok_or_else(|| LoadError::NoExhibitModel(region.name.clone()))?;
        Ok(Self {
            region: region.name.clone(),
            exhibit_model,
            exhibit_objects: region.meta.exhibit_objects.clone(),
        })
    }

    /// Number of model files behind this request.
    #[inline]
    pub fn model_count(&self) -> usize {
        if self.exhibit_objects.is_some() { 2 } else { 1 }
    }
}

/// Progress of the in-flight fetch. Observational only.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LoadProgress {
    /// 1-based index of the model being fetched.
    pub model: usize,
    pub total: usize,
    /// 0..=100
    pub percent: f32,
}

impl fmt::Display for LoadProgress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Loading model {}/{}: {:.0}%",
            self.model, self.total, self.percent
        )
    }
}

pub trait ProgressSink {
    fn report(&mut self, progress: LoadProgress);
}

impl<F: FnMut(LoadProgress)> ProgressSink for F {
    fn report(&mut self, progress: LoadProgress) {
        self(progress)
    }
}

pub trait SceneLoader {
    /// Fetch the exhibit model (merged with its objects model, if any).
    fn load_exhibit(
        &self,
        request: &LoadRequest,
        progress: &mut dyn ProgressSink,
    ) -> impl Future<Output = Result<ContainerModel, LoadError>>;
}

/// Models keyed by path, resolved without I/O.
#[derive(Clone, Debug, Default)]
pub struct MemorySceneLoader {
    models: HashMap<String, ContainerModel>,
}

impl MemorySceneLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_model(mut self, path: impl Into<String>, model: ContainerModel) -> Self {
        self.models.insert(path.into(), model);
        self
    }

    fn fetch(&self, path: &str) -> Result<ContainerModel, LoadError> {
        self.models.get(path).cloned().ok_or_else(|| LoadError::Io {
            path: path.to_owned(),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        })
    }
}

impl SceneLoader for MemorySceneLoader {
    async fn load_exhibit(
        &self,
        request: &LoadRequest,
        progress: &mut dyn ProgressSink,
    ) -> Result<ContainerModel, LoadError> {
        let total = request.model_count();
        let mut model = self.fetch(&request.exhibit_model)?;
        progress.report(LoadProgress {
            model: 1,
            total,
            percent: 100.0,
        });

        if let Some(objects) = &request.exhibit_objects {
            model.merge(self.fetch(objects)?);
            progress.report(LoadProgress {
                model: 2,
                total,
                percent: 100.0,
            });
        }
        Ok(model)
    }
}
