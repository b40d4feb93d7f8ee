//! Transition detector.
//!
//! Watches the floor locator output and decides when the visitor changes container.
//!
//! States:
//! - `Idle { floor }`: the visitor's committed floor is `floor`.
//! - `Loading { target }`: an exhibit for `target` is being fetched. Further requests are
//!   rejected until it resolves.
//! - `Failed { target, reason }`: the fetch failed. Nothing moves until [`TransitionDetector::recover`].
//!
//! Exits to the main container and floor changes that need no new container commit
//! immediately and never pass through `Loading`.

use crate::{config::SimParams, locator::Region, visitor::Visitor};

/// Produced at most once per floor change.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TransitionEvent {
    pub changed: bool,
    pub new_floor_name: Option<String>,
}

impl TransitionEvent {
    fn changed_to(name: &str) -> Self {
        Self {
            changed: true,
            new_floor_name: Some(name.to_owned()),
        }
    }
}

/// What the caller has to do for a detected change.
#[derive(Clone, Debug, PartialEq)]
pub enum TransitionPlan {
    /// Re-parent to the main container and drop the exhibit. Synchronous.
    Exit,
    /// Fetch and enter the exhibit attached to this region. Asynchronous.
    Exhibit(Region),
    /// Only the floor name changes.
    Stay,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Transition {
    pub event: TransitionEvent,
    pub plan: TransitionPlan,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TransitionState {
    Idle { floor: String },
    Loading { target: String },
    Failed { target: String, reason: String },
}

#[derive(Debug)]
pub struct TransitionDetector {
    state: TransitionState,
}

impl TransitionDetector {
    pub fn new(floor: impl Into<String>) -> Self {
        Self {
            state: TransitionState::Idle {
                floor: floor.into(),
            },
        }
    }

    #[inline]
    pub fn state(&self) -> &TransitionState {
        &self.state
    }

    #[inline]
    pub fn is_loading(&self) -> bool {
        matches!(self.state, TransitionState::Loading { .. })
    }

    #[inline]
    pub fn is_failed(&self) -> bool {
        matches!(self.state, TransitionState::Failed { .. })
    }

    /// Feed one locator result.
    ///
    /// `loaded_exhibit` names the region whose exhibit is currently resident, if any; a
    /// request for that same exhibit does not fetch it again.
    pub fn observe(
        &mut self,
        visitor: &mut Visitor,
        located: Option<&Region>,
        params: &SimParams,
        loaded_exhibit: Option<&str>,
    ) -> Option<Transition> {
        let region = located?;
        if region.name == visitor.last_floor_name {
            return None;
        }

        match &self.state {
            TransitionState::Idle { .. } => {}
            TransitionState::Loading { target } => {
                if *target != region.name {
                    log::debug!(
                        "ignoring floor `{}` while loading `{target}`",
                        region.name
                    );
                }
                return None;
            }
            TransitionState::Failed { .. } => return None,
        }

        log::info!(
            "floor changed: `{}` -> `{}`",
            visitor.last_floor_name,
            region.name
        );
        let event = TransitionEvent::changed_to(&region.name);

        let plan = if params.is_exit(&region.name) {
            TransitionPlan::Exit
        } else if region.meta.exhibit_model.is_none() {
            TransitionPlan::Stay
        } else if loaded_exhibit == Some(region.name.as_str()) {
            log::debug!("exhibit for `{}` already loaded", region.name);
            TransitionPlan::Stay
        } else {
            self.state = TransitionState::Loading {
                target: region.name.clone(),
            };
            return Some(Transition {
                event,
                plan: TransitionPlan::Exhibit(region.clone()),
            });
        };

        self.commit(visitor, &region.name);
        Some(Transition { event, plan })
    }

    /// The pending exhibit is in place.
    pub fn complete(&mut self, visitor: &mut Visitor) {
        if let TransitionState::Loading { target } = &self.state {
            let target = target.clone();
            self.commit(visitor, &target);
        }
    }

    /// The pending exhibit could not be loaded.
    pub fn fail(&mut self, reason: impl Into<String>) {
        if let TransitionState::Loading { target } = &self.state {
            self.state = TransitionState::Failed {
                target: target.clone(),
                reason: reason.into(),
            };
        }
    }

    /// Back to `Idle` on the last committed floor. Standing on the failed target afterwards
    /// requests it again.
    pub fn recover(&mut self, visitor: &Visitor) {
        self.state = TransitionState::Idle {
            floor: visitor.last_floor_name.clone(),
        };
    }

    fn commit(&mut self, visitor: &mut Visitor, floor: &str) {
        visitor.last_floor_name = floor.to_owned();
        self.state = TransitionState::Idle {
            floor: floor.to_owned(),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        collision::{Capsule, Point3, Vec3},
        constants::MAIN_CONTAINER,
        model::{RegionKind, RegionMeta},
    };

    fn visitor() -> Visitor {
        let capsule = Capsule::new(0.2, Vec3::zeros(), Vec3::new(0.0, 0.5, 0.0)).expect("capsule");
        Visitor::new(capsule, Point3::origin())
    }

    fn region(name: &str, exhibit: Option<&str>) -> Region {
        Region {
            name: name.to_owned(),
            kind: RegionKind::Room,
            meta: RegionMeta {
                exhibit_model: exhibit.map(str::to_owned),
                ..RegionMeta::default()
            },
            centroid: Point3::origin(),
        }
    }

    #[test]
    fn emits_once_per_change() {
        let params = SimParams::default();
        let mut v = visitor();
        v.last_floor_name = "RoomA".to_owned();
        let mut detector = TransitionDetector::new("RoomA");
        let a = region("RoomA", None);
        let b = region("RoomB", None);

        let changes = [&a, &a, &b]
            .into_iter()
            .filter_map(|r| detector.observe(&mut v, Some(r), &params, None))
            .collect::<Vec<_>>();

        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].event.new_floor_name.as_deref(), Some("RoomB"));
        assert_eq!(changes[0].plan, TransitionPlan::Stay);
        assert_eq!(v.last_floor_name, "RoomB");
    }

    #[test]
    fn gaps_do_not_change_the_floor() {
        let params = SimParams::default();
        let mut v = visitor();
        let mut detector = TransitionDetector::new(MAIN_CONTAINER);
        assert!(detector.observe(&mut v, None, &params, None).is_none());
        assert_eq!(v.last_floor_name, MAIN_CONTAINER);
    }

    #[test]
    fn exit_commits_without_loading() {
        let params = SimParams::default();
        let mut v = visitor();
        let mut detector = TransitionDetector::new(MAIN_CONTAINER);
        let out = region("FloorOut", Some("ignored.ron"));
        let t = detector
            .observe(&mut v, Some(&out), &params, None)
            .expect("change");
        assert_eq!(t.plan, TransitionPlan::Exit);
        assert!(!detector.is_loading());
        assert_eq!(v.last_floor_name, "FloorOut");
    }

    #[test]
    fn requests_are_rejected_while_loading() {
        let params = SimParams::default();
        let mut v = visitor();
        let mut detector = TransitionDetector::new(MAIN_CONTAINER);
        let a = region("RoomA", Some("a.ron"));
        let b = region("RoomB", Some("b.ron"));

        let t = detector.observe(&mut v, Some(&a), &params, None).expect("change");
        assert!(matches!(t.plan, TransitionPlan::Exhibit(ref r) if r.name == "RoomA"));
        assert!(detector.is_loading());
        // Not committed until the load finishes.
        assert_eq!(v.last_floor_name, MAIN_CONTAINER);

        assert!(detector.observe(&mut v, Some(&a), &params, None).is_none());
        assert!(detector.observe(&mut v, Some(&b), &params, None).is_none());

        detector.complete(&mut v);
        assert_eq!(v.last_floor_name, "RoomA");
        assert_eq!(
            detector.state(),
            &TransitionState::Idle {
                floor: "RoomA".to_owned()
            }
        );
    }

    #[test]
    fn failure_blocks_until_recovered() {
        let params = SimParams::default();
        let mut v = visitor();
        let mut detector = TransitionDetector::new(MAIN_CONTAINER);
        let a = region("RoomA", Some("a.ron"));

        detector.observe(&mut v, Some(&a), &params, None);
        detector.fail("missing file");
        assert!(detector.is_failed());
        assert!(detector.observe(&mut v, Some(&a), &params, None).is_none());

        detector.recover(&v);
        let retry = detector.observe(&mut v, Some(&a), &params, None).expect("retry");
        assert!(matches!(retry.plan, TransitionPlan::Exhibit(_)));
    }

    #[test]
    fn resident_exhibit_is_not_fetched_again() {
        let params = SimParams::default();
        let mut v = visitor();
        let mut detector = TransitionDetector::new(MAIN_CONTAINER);
        let a = region("RoomA", Some("a.ron"));
        let t = detector
            .observe(&mut v, Some(&a), &params, Some("RoomA"))
            .expect("change");
        assert_eq!(t.plan, TransitionPlan::Stay);
        assert!(t.event.changed);
        assert!(!detector.is_loading());
    }
}
