//! Keeps the viewports of a sync group aligned in logical space.
//!
//! The coordinator only stores viewport ids; the session owns the states and
//! lends them to every broadcast. Broadcasts skip the originating viewport and
//! push absolute values to the siblings, so replaying one is a no-op.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{NebulaError, Result};
use crate::geometry::Point;
use crate::viewport::{ViewportId, ViewportState};

/// Viewports owned by a session, ordered by id.
pub type ViewportMap = BTreeMap<ViewportId, ViewportState>;

/// Which parts of the navigation state are shared across the group.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncPolicy {
    pub zoom_locked: bool,
    pub pan_locked: bool,
}

impl Default for SyncPolicy {
    fn default() -> Self {
        Self {
            zoom_locked: true,
            pan_locked: true,
        }
    }
}

impl SyncPolicy {
    pub const UNLOCKED: SyncPolicy = SyncPolicy {
        zoom_locked: false,
        pan_locked: false,
    };

    pub fn is_unlocked(&self) -> bool {
        !self.zoom_locked && !self.pan_locked
    }
}

#[derive(Clone, Debug, Default)]
pub struct SyncCoordinator {
    policy: SyncPolicy,
    members: Vec<ViewportId>,
}

impl SyncCoordinator {
    pub fn new(policy: SyncPolicy) -> Self {
        Self {
            policy,
            members: Vec::new(),
        }
    }

    pub fn policy(&self) -> SyncPolicy {
        self.policy
    }

    pub fn members(&self) -> &[ViewportId] {
        &self.members
    }

    pub fn contains(&self, id: ViewportId) -> bool {
        self.members.contains(&id)
    }

    /// Change the policy. Locks that get switched on realign the group to its
    /// first member; nothing moves when locks are only released.
    pub fn set_policy(&mut self, policy: SyncPolicy, viewports: &mut ViewportMap) -> Result<()> {
        let newly_locked = SyncPolicy {
            zoom_locked: policy.zoom_locked && !self.policy.zoom_locked,
            pan_locked: policy.pan_locked && !self.policy.pan_locked,
        };
        self.policy = policy;
        if newly_locked.is_unlocked() {
            return Ok(());
        }
        let Some(&reference) = self.members.first() else {
            return Ok(());
        };
        let others: Vec<ViewportId> = self.members[1..].to_vec();
        for id in others {
            align(reference, id, newly_locked, viewports)?;
        }
        Ok(())
    }

    /// Add a viewport to the group and align it to the group's first member.
    /// Existing members are left untouched.
    pub fn join(&mut self, id: ViewportId, viewports: &mut ViewportMap) -> Result<()> {
        if !viewports.contains_key(&id) {
            return Err(NebulaError::UnknownViewport(id));
        }
        if self.contains(id) {
            return Ok(());
        }
        if let Some(&reference) = self.members.first() {
            align(reference, id, self.policy, viewports)?;
        }
        self.members.push(id);
        debug!(viewport = %id, members = self.members.len(), "Viewport joined sync group");
        Ok(())
    }

    /// Remove a viewport from the group. Returns false if it was not a member.
    pub fn leave(&mut self, id: ViewportId) -> bool {
        let before = self.members.len();
        self.members.retain(|m| *m != id);
        before != self.members.len()
    }

    /// Propagate a zoom that happened at `origin` around `logical_anchor`.
    ///
    /// Returns the number of siblings that were updated.
    pub fn broadcast_zoom(
        &self,
        origin: ViewportId,
        logical_anchor: Point,
        viewports: &mut ViewportMap,
    ) -> Result<usize> {
        let (zoom, pan) = origin_state(origin, viewports)?;
        if !self.contains(origin) || self.policy.is_unlocked() {
            return Ok(0);
        }

        let mut updated = 0;
        for sibling in self.siblings(origin, viewports) {
            let Some(vp) = viewports.get_mut(&sibling) else {
                continue;
            };
            match (self.policy.zoom_locked, self.policy.pan_locked) {
                (true, true) => {
                    if vp.zoom() == zoom && vp.pan() == pan {
                        continue;
                    }
                    vp.set_zoom(zoom)?;
                    vp.set_pan(pan)?;
                }
                (true, false) => {
                    if vp.zoom() == zoom {
                        continue;
                    }
                    vp.zoom_about_logical(logical_anchor, zoom)?;
                }
                (false, true) => {
                    if vp.pan() == pan {
                        continue;
                    }
                    vp.set_pan(pan)?;
                }
                (false, false) => continue,
            }
            report_visibility(vp);
            updated += 1;
        }
        debug!(origin = %origin, updated, zoom, "Zoom broadcast");
        Ok(updated)
    }

    /// Propagate a pan that happened at `origin`.
    ///
    /// Returns the number of siblings that were updated.
    pub fn broadcast_pan(&self, origin: ViewportId, viewports: &mut ViewportMap) -> Result<usize> {
        let (_, pan) = origin_state(origin, viewports)?;
        if !self.contains(origin) || !self.policy.pan_locked {
            return Ok(0);
        }

        let mut updated = 0;
        for sibling in self.siblings(origin, viewports) {
            let Some(vp) = viewports.get_mut(&sibling) else {
                continue;
            };
            if vp.pan() == pan {
                continue;
            }
            vp.set_pan(pan)?;
            report_visibility(vp);
            updated += 1;
        }
        debug!(origin = %origin, updated, "Pan broadcast");
        Ok(updated)
    }

    fn siblings(&self, origin: ViewportId, viewports: &ViewportMap) -> Vec<ViewportId> {
        self.members
            .iter()
            .copied()
            .filter(|id| *id != origin)
            .filter(|id| {
                let known = viewports.contains_key(id);
                if !known {
                    warn!(viewport = %id, "Sync group references a missing viewport");
                }
                known
            })
            .collect()
    }
}

fn origin_state(origin: ViewportId, viewports: &ViewportMap) -> Result<(f64, Point)> {
    viewports
        .get(&origin)
        .map(|vp| (vp.zoom(), vp.pan()))
        .ok_or(NebulaError::UnknownViewport(origin))
}

fn align(
    reference: ViewportId,
    target: ViewportId,
    locks: SyncPolicy,
    viewports: &mut ViewportMap,
) -> Result<()> {
    if reference == target {
        return Ok(());
    }
    let (zoom, pan) = origin_state(reference, viewports)?;
    let vp = viewports
        .get_mut(&target)
        .ok_or(NebulaError::UnknownViewport(target))?;
    if locks.zoom_locked {
        vp.set_zoom(zoom)?;
    }
    if locks.pan_locked {
        vp.set_pan(pan)?;
    }
    Ok(())
}

// Sync is applied even when it hides the sibling's content entirely.
fn report_visibility(vp: &ViewportState) {
    if !vp.shows_image() {
        debug!(
            viewport = %vp.id(),
            visible = ?vp.visible_logical_rect(),
            image = ?vp.image_logical_rect(),
            "Image is outside the visible area after sync"
        );
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::geometry::{point, size, vector};
    use crate::image::Image;
    use crate::transform::ZoomLimits;

    fn map(count: u32) -> ViewportMap {
        (0..count)
            .map(|i| {
                let image = Arc::new(Image::blank(100, 100).unwrap());
                let vp = ViewportState::new(
                    ViewportId(i),
                    image,
                    size(100.0, 100.0),
                    ZoomLimits::default(),
                )
                .unwrap();
                (ViewportId(i), vp)
            })
            .collect()
    }

    fn group(policy: SyncPolicy, viewports: &mut ViewportMap) -> SyncCoordinator {
        let mut sync = SyncCoordinator::new(policy);
        let ids: Vec<ViewportId> = viewports.keys().copied().collect();
        for id in ids {
            sync.join(id, viewports).unwrap();
        }
        sync
    }

    #[test]
    fn test_pan_broadcast_copies_top_left() {
        let mut vps = map(3);
        let sync = group(SyncPolicy::default(), &mut vps);
        vps.get_mut(&ViewportId(1))
            .unwrap()
            .pan_by(vector(5.0, 7.0))
            .unwrap();
        assert_eq!(sync.broadcast_pan(ViewportId(1), &mut vps).unwrap(), 2);
        for vp in vps.values() {
            assert_eq!(vp.visible_logical_rect().min, point(5.0, 7.0));
        }
    }

    #[test]
    fn test_unlocked_policy_broadcasts_nothing() {
        let mut vps = map(2);
        let sync = group(SyncPolicy::UNLOCKED, &mut vps);
        vps.get_mut(&ViewportId(0))
            .unwrap()
            .zoom_at(point(10.0, 10.0), 0.5)
            .unwrap();
        let anchor = vps[&ViewportId(0)].to_image(point(10.0, 10.0));
        assert_eq!(sync.broadcast_zoom(ViewportId(0), anchor, &mut vps).unwrap(), 0);
        assert_eq!(vps[&ViewportId(1)].zoom(), 1.0);
    }

    #[test]
    fn test_unknown_origin_is_reported() {
        let mut vps = map(1);
        let sync = group(SyncPolicy::default(), &mut vps);
        assert_eq!(
            sync.broadcast_pan(ViewportId(9), &mut vps),
            Err(NebulaError::UnknownViewport(ViewportId(9)))
        );
    }

    #[test]
    fn test_non_member_moves_alone() {
        let mut vps = map(3);
        let mut sync = group(SyncPolicy::default(), &mut vps);
        assert!(sync.leave(ViewportId(2)));
        assert!(!sync.leave(ViewportId(2)));
        vps.get_mut(&ViewportId(2))
            .unwrap()
            .pan_by(vector(3.0, 3.0))
            .unwrap();
        assert_eq!(sync.broadcast_pan(ViewportId(2), &mut vps).unwrap(), 0);
        assert_eq!(vps[&ViewportId(0)].pan(), Point::ORIGIN);
    }

    #[test]
    fn test_join_aligns_newcomer_only() {
        let mut vps = map(3);
        let mut sync = SyncCoordinator::new(SyncPolicy::default());
        sync.join(ViewportId(0), &mut vps).unwrap();
        sync.join(ViewportId(1), &mut vps).unwrap();
        {
            let vp = vps.get_mut(&ViewportId(0)).unwrap();
            vp.set_zoom(0.5).unwrap();
            vp.set_pan(point(20.0, 30.0)).unwrap();
        }
        sync.broadcast_zoom(ViewportId(0), point(20.0, 30.0), &mut vps)
            .unwrap();
        sync.join(ViewportId(2), &mut vps).unwrap();
        assert_eq!(vps[&ViewportId(2)].zoom(), 0.5);
        assert_eq!(vps[&ViewportId(2)].pan(), point(20.0, 30.0));
        assert_eq!(vps[&ViewportId(0)].pan(), point(20.0, 30.0));
    }

    #[test]
    fn test_enabling_lock_realigns_group() {
        let mut vps = map(2);
        let mut sync = group(SyncPolicy::UNLOCKED, &mut vps);
        vps.get_mut(&ViewportId(1)).unwrap().set_zoom(3.0).unwrap();
        sync.set_policy(
            SyncPolicy {
                zoom_locked: true,
                pan_locked: false,
            },
            &mut vps,
        )
        .unwrap();
        assert_eq!(vps[&ViewportId(1)].zoom(), 1.0);
    }
}
