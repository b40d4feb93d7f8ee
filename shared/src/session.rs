/*!
Frame loop for one visitor.

A [`Session`] owns everything the core needs: parameters, the visitor, the resident
containers, the transition detector, the camera rig and the scene loader. There is no
hidden global state; hosts drive it with [`Session::tick`] once per display frame.

Loop discipline:
- `frame` runs the sub-steps synchronously and never awaits.
- A change into an exhibit stops the loop and leaves a pending request. `tick` (or
  `complete_transition`) awaits the loader, swaps containers and restarts the loop.
- A failed load keeps the loop stopped until [`Session::recover`].
*/

use crate::{
    camera::CameraRig,
    collision::{Iso, Point3, Vec3},
    config::SimParams,
    constants::{
        DEFAULT_CAMERA_POSITION, LOAD_ERROR_TEXT, MAIN_CONTAINER, RESET_ORBIT_DEGREES,
    },
    container::Container,
    error::{ConfigError, LoadError},
    loader::{LoadProgress, LoadRequest, SceneLoader},
    locator::{Region, locate},
    model::{ContainerModel, Environment},
    movement::{StepOutcome, step},
    transition::{TransitionDetector, TransitionEvent, TransitionPlan},
    visitor::{MoveInput, Owner, Visitor},
};

/// User-visible loading status.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum LoadStatus {
    #[default]
    Idle,
    /// Latest progress text of the in-flight fetch.
    Loading(String),
    /// Error message of the last failed fetch.
    Failed(String),
}

impl LoadStatus {
    /// Text for the loading indicator.
    pub fn text(&self) -> &str {
        match self {
            Self::Idle => "",
            Self::Loading(progress) => progress,
            Self::Failed(_) => LOAD_ERROR_TEXT,
        }
    }
}

/// What one frame produced, for the rendering and UI collaborators.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameOutput {
    /// Visitor position, world space. Also the mini-map marker position.
    pub position: Point3,
    pub on_ground: bool,
    /// Navigable region under the visitor, if any.
    pub floor: Option<String>,
    pub event: TransitionEvent,
    /// Region whose exhibit is waiting to be loaded.
    pub pending: Option<String>,
    /// Fall-through resets during this frame.
    pub resets: u32,
    pub map_heading: f32,
}

pub struct Session<L> {
    params: SimParams,
    visitor: Visitor,
    main: Container,
    exhibit: Option<Container>,
    detector: TransitionDetector,
    loader: L,
    running: bool,
    status: LoadStatus,
    camera: CameraRig,
    /// World space.
    entry_point: Point3,
    pending: Option<Region>,
}

impl<L: SceneLoader> Session<L> {
    /// Validate `params`, build the main container and place the visitor at its entry point.
    pub fn new(params: SimParams, main_model: &ContainerModel, loader: L) -> Result<Self, ConfigError> {
        params.validate()?;
        let capsule = params.capsule()?;
        let main = Container::build(main_model, Owner::Main, Iso::identity(), &params)?;

        let entry_point = main
            .entry_point()
            .map(|p| main.to_world(p))
            .unwrap_or_else(|| params.entry_point());
        let visitor = Visitor::new(capsule, main.from_world(entry_point));

        let mut camera = CameraRig::new(entry_point, Point3::from(DEFAULT_CAMERA_POSITION));
        camera.follow(entry_point, params.height_offset());

        log::info!("session started at {:?}", entry_point);

        Ok(Self {
            params,
            visitor,
            main,
            exhibit: None,
            detector: TransitionDetector::new(MAIN_CONTAINER),
            loader,
            running: true,
            status: LoadStatus::Idle,
            camera,
            entry_point,
            pending: None,
        })
    }

    #[inline]
    pub fn params(&self) -> &SimParams {
        &self.params
    }

    #[inline]
    pub fn visitor(&self) -> &Visitor {
        &self.visitor
    }

    #[inline]
    pub fn camera(&self) -> &CameraRig {
        &self.camera
    }

    /// Orbit controls write here.
    #[inline]
    pub fn camera_mut(&mut self) -> &mut CameraRig {
        &mut self.camera
    }

    #[inline]
    pub fn status(&self) -> &LoadStatus {
        &self.status
    }

    #[inline]
    pub fn detector(&self) -> &TransitionDetector {
        &self.detector
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.running
    }

    #[inline]
    pub fn main(&self) -> &Container {
        &self.main
    }

    #[inline]
    pub fn exhibit(&self) -> Option<&Container> {
        self.exhibit.as_ref()
    }

    /// The container the visitor currently belongs to.
    pub fn active(&self) -> &Container {
        active(&self.main, self.exhibit.as_ref(), &self.visitor.owner)
    }

    pub fn environment(&self) -> &Environment {
        self.active().environment()
    }

    pub fn world_position(&self) -> Point3 {
        self.active().to_world(self.visitor.position)
    }

    #[inline]
    pub fn entry_point(&self) -> Point3 {
        self.entry_point
    }

    pub fn start_animation(&mut self) {
        self.running = true;
    }

    pub fn stop_animation(&mut self) {
        self.running = false;
    }

    /// Run one frame of `raw_dt` seconds with `input` held.
    ///
    /// A stopped loop does nothing. Otherwise the clamped delta is split into
    /// `physics_steps` sub-steps; after each, the floor is located and fed to the
    /// transition detector. A change that needs another container ends the frame.
    pub fn frame(&mut self, raw_dt: f32, input: MoveInput) -> FrameOutput {
        let mut event = TransitionEvent::default();
        let mut resets = 0;

        if self.running {
            self.visitor.input = input;
            let dt = self.params.sub_step_delta(self.params.clamp_delta(raw_dt));
            let azimuth = self.camera.azimuth();

            for _ in 0..self.params.physics_steps {
                let container = active(&self.main, self.exhibit.as_ref(), &self.visitor.owner);
                let entry = container.from_world(self.entry_point);
                let outcome = step(
                    &mut self.visitor,
                    azimuth,
                    dt,
                    container.collider(),
                    &self.params,
                    entry,
                );

                let world = container.to_world(self.visitor.position);
                self.camera.follow(world, self.params.height_offset());
                if let StepOutcome::Reset = outcome {
                    resets += 1;
                    self.camera.rotate_orbit(RESET_ORBIT_DEGREES);
                }

                let located = locate(self.visitor.position, container.regions()).cloned();
                self.visitor.current_floor = located.as_ref().map(|r| r.name.clone());

                let loaded = self.exhibit.as_ref().and_then(|c| match c.owner() {
                    Owner::Exhibit { region } => Some(region.as_str()),
                    Owner::Main => None,
                });
                let Some(transition) =
                    self.detector
                        .observe(&mut self.visitor, located.as_ref(), &self.params, loaded)
                else {
                    continue;
                };

                event = transition.event;
                match transition.plan {
                    TransitionPlan::Stay => {}
                    TransitionPlan::Exit => {
                        self.enter_main();
                        break;
                    }
                    TransitionPlan::Exhibit(region) => {
                        log::info!("stopping loop to load exhibit for `{}`", region.name);
                        self.stop_animation();
                        self.pending = Some(region);
                        break;
                    }
                }
            }
        }

        self.output(event, resets)
    }

    /// [`Self::frame`], then finish any exhibit transition it started.
    pub async fn tick(&mut self, raw_dt: f32, input: MoveInput) -> FrameOutput {
        let out = self.frame(raw_dt, input);
        if out.pending.is_none() {
            return out;
        }
        self.complete_transition().await;
        FrameOutput {
            position: self.world_position(),
            on_ground: self.visitor.on_ground,
            pending: self.pending.as_ref().map(|r| r.name.clone()),
            ..out
        }
    }

    /// Await the pending exhibit load, if any, and enter the exhibit.
    ///
    /// On failure the error is logged, the status shows the error text and the loop stays
    /// stopped.
    pub async fn complete_transition(&mut self) {
        let Some(region) = self.pending.take() else {
            return;
        };

        match self.fetch_exhibit(&region).await {
            Ok(exhibit) => {
                let from = *self.active().transform();
                self.visitor.reparent(exhibit.owner().clone(), &from, exhibit.transform());
                log::info!(
                    "entered exhibit `{}` through `{}`",
                    exhibit.name(),
                    region.name
                );
                self.exhibit = Some(exhibit);
                self.detector.complete(&mut self.visitor);
                self.status = LoadStatus::Idle;
                self.start_animation();
            }
            Err(err) => {
                log::error!("Failed to load exhibit for `{}`: {err}", region.name);
                self.detector.fail(err.to_string());
                self.status = LoadStatus::Failed(err.to_string());
            }
        }
    }

    async fn fetch_exhibit(&mut self, region: &Region) -> Result<Container, LoadError> {
        let request = LoadRequest::from_region(region)?;
        log::info!("loading exhibit `{}`", request.exhibit_model);

        let status = &mut self.status;
        let mut sink = |progress: LoadProgress| {
            log::debug!("{progress}");
            *status = LoadStatus::Loading(progress.to_string());
        };
        let model = self.loader.load_exhibit(&request, &mut sink).await?;

        let owner = Owner::Exhibit {
            region: region.name.clone(),
        };
        let exhibit = Container::build(&model, owner, Iso::identity(), &self.params)?;
        Ok(exhibit.with_environment(Environment::from_region(&region.meta, &self.params)))
    }

    /// Back to the main container; the exhibit is dropped.
    fn enter_main(&mut self) {
        let Some(exhibit) = self.exhibit.take() else {
            return;
        };
        if !self.visitor.owner.is_main() {
            self.visitor
                .reparent(Owner::Main, exhibit.transform(), self.main.transform());
        }
        log::info!("left exhibit `{}`", exhibit.name());
    }

    /// Put the visitor back at the entry point, lifted by `reset_lift`, and turn the camera
    /// around. A pending load is not cancelled.
    pub fn reset_visitor(&mut self) {
        log::info!("reset visitor");
        let container = active(&self.main, self.exhibit.as_ref(), &self.visitor.owner);
        let lifted = self.entry_point + Vec3::new(0.0, self.params.reset_lift, 0.0);
        self.visitor.teleport(container.from_world(lifted));
        self.camera.follow(lifted, self.params.height_offset());
        self.camera.rotate_orbit(RESET_ORBIT_DEGREES);
    }

    /// Mini-map label click: make the region's centre the entry point and reset there.
    ///
    /// Returns false if neither the active nor the main container has such a region.
    pub fn teleport_to_region(&mut self, name: &str) -> bool {
        let container = self.active();
        let found = container
            .region(name)
            .map(|r| container.to_world(r.centroid))
            .or_else(|| self.main.region(name).map(|r| self.main.to_world(r.centroid)));
        let Some(target) = found else {
            log::warn!("no region named `{name}` to teleport to");
            return false;
        };
        self.entry_point = target;
        self.reset_visitor();
        true
    }

    /// Manual intervention after a failed load: clear the failure and restart the loop.
    pub fn recover(&mut self) {
        if !self.detector.is_failed() {
            return;
        }
        log::info!("recovering from failed load");
        self.detector.recover(&self.visitor);
        self.status = LoadStatus::Idle;
        self.start_animation();
    }

    fn output(&self, event: TransitionEvent, resets: u32) -> FrameOutput {
        FrameOutput {
            position: self.world_position(),
            on_ground: self.visitor.on_ground,
            floor: self.visitor.current_floor.clone(),
            event,
            pending: self.pending.as_ref().map(|r| r.name.clone()),
            resets,
            map_heading: self.camera.map_heading(),
        }
    }
}

fn active<'a>(main: &'a Container, exhibit: Option<&'a Container>, owner: &Owner) -> &'a Container {
    match (owner, exhibit) {
        (Owner::Exhibit { .. }, Some(exhibit)) => exhibit,
        _ => main,
    }
}
