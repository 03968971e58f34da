pub mod events;
pub mod snapshot;

pub use events::{EventOutcome, InputEvent};
pub use snapshot::{ReticleSnapshot, SessionSnapshot, ViewportSnapshot};

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::config::SessionConfig;
use crate::error::{NebulaError, Result};
use crate::geometry::{Point, Size, Vector};
use crate::image::Image;
use crate::reticle::{MarkerId, ProjectedMarker, ReticleManager};
use crate::sync::{SyncCoordinator, SyncPolicy, ViewportMap};
use crate::viewport::{ViewportId, ViewportState};

/// Composition root: owns the viewports, the sync coordinator and the
/// reticules, and routes input to them.
///
/// All calls are synchronous. When a call returns, every sibling viewport
/// has already followed, so a renderer never sees a half-applied sync.
#[derive(Debug)]
pub struct Session {
    config: SessionConfig,
    viewports: ViewportMap,
    sync: SyncCoordinator,
    reticles: ReticleManager,
    next_viewport: u32,
}

impl Default for Session {
    fn default() -> Self {
        Self::from_valid_config(SessionConfig::default())
    }
}

impl Session {
    pub fn new(config: SessionConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::from_valid_config(config))
    }

    fn from_valid_config(config: SessionConfig) -> Self {
        Self {
            sync: SyncCoordinator::new(config.sync),
            reticles: ReticleManager::new(&config.reticle),
            viewports: ViewportMap::new(),
            next_viewport: 0,
            config,
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    // -----------------------------------------------------------------------
    // Viewports
    // -----------------------------------------------------------------------

    /// Register a decoded image and create its viewport. The viewport joins
    /// the sync group and adopts the group's navigation state.
    pub fn add_image(&mut self, image: Arc<Image>, screen_size: Size) -> Result<ViewportId> {
        let id = ViewportId(self.next_viewport);
        let viewport = ViewportState::new(id, image, screen_size, self.config.zoom)?;
        self.next_viewport += 1;
        info!(
            viewport = %id,
            width = viewport.image().width(),
            height = viewport.image().height(),
            scale = viewport.image().scale(),
            "Viewport added"
        );
        self.viewports.insert(id, viewport);
        self.sync.join(id, &mut self.viewports)?;
        Ok(id)
    }

    /// Drop a viewport. Markers live in logical space and are kept.
    pub fn remove_viewport(&mut self, id: ViewportId) -> Result<()> {
        if self.viewports.remove(&id).is_none() {
            warn!(viewport = %id, "Cannot remove unknown viewport");
            return Err(NebulaError::UnknownViewport(id));
        }
        self.sync.leave(id);
        info!(viewport = %id, remaining = self.viewports.len(), "Viewport removed");
        Ok(())
    }

    pub fn viewport(&self, id: ViewportId) -> Result<&ViewportState> {
        self.viewports
            .get(&id)
            .ok_or(NebulaError::UnknownViewport(id))
    }

    pub fn viewports(&self) -> impl Iterator<Item = &ViewportState> {
        self.viewports.values()
    }

    pub fn viewport_ids(&self) -> Vec<ViewportId> {
        self.viewports.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.viewports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.viewports.is_empty()
    }

    pub fn resize_viewport(&mut self, id: ViewportId, screen_size: Size) -> Result<()> {
        self.viewport_mut(id)?.resize(screen_size)
    }

    /// Move the image of `id` to `offset` in logical space, e.g. to register
    /// a capture that is shifted relative to the others.
    pub fn set_image_offset(&mut self, id: ViewportId, offset: Point) -> Result<()> {
        self.viewport_mut(id)?.set_image_offset(offset)?;
        debug!(viewport = %id, x = offset.x, y = offset.y, "Image offset changed");
        Ok(())
    }

    /// Give every image the offset of the image shown in `id`.
    pub fn share_image_offset(&mut self, id: ViewportId) -> Result<()> {
        let offset = self.viewport(id)?.image().offset();
        for vp in self.viewports.values_mut() {
            vp.set_image_offset(offset)?;
        }
        Ok(())
    }

    fn viewport_mut(&mut self, id: ViewportId) -> Result<&mut ViewportState> {
        match self.viewports.get_mut(&id) {
            Some(vp) => Ok(vp),
            None => {
                warn!(viewport = %id, "Unknown viewport");
                Err(NebulaError::UnknownViewport(id))
            }
        }
    }

    // -----------------------------------------------------------------------
    // Sync group
    // -----------------------------------------------------------------------

    pub fn sync_policy(&self) -> SyncPolicy {
        self.sync.policy()
    }

    pub fn set_sync_policy(&mut self, policy: SyncPolicy) -> Result<()> {
        debug!(?policy, "Sync policy changed");
        self.sync.set_policy(policy, &mut self.viewports)
    }

    pub fn is_synced(&self, id: ViewportId) -> bool {
        self.sync.contains(id)
    }

    pub fn join_sync(&mut self, id: ViewportId) -> Result<()> {
        self.sync.join(id, &mut self.viewports)
    }

    /// Returns false when the viewport was not in the group.
    pub fn leave_sync(&mut self, id: ViewportId) -> Result<bool> {
        self.viewport(id)?;
        Ok(self.sync.leave(id))
    }

    // -----------------------------------------------------------------------
    // Navigation
    // -----------------------------------------------------------------------

    /// Zoom viewport `id` around a screen anchor and let the group follow.
    /// Returns the number of siblings updated.
    pub fn zoom_at(&mut self, id: ViewportId, screen_anchor: Point, factor_delta: f64) -> Result<usize> {
        let vp = self.viewport_mut(id)?;
        vp.zoom_at(screen_anchor, factor_delta)?;
        let logical_anchor = vp.to_image(screen_anchor);
        self.sync.broadcast_zoom(id, logical_anchor, &mut self.viewports)
    }

    /// Set an absolute zoom, keeping the visible top-left in place.
    pub fn set_zoom(&mut self, id: ViewportId, zoom: f64) -> Result<usize> {
        let vp = self.viewport_mut(id)?;
        vp.set_zoom(zoom)?;
        let logical_anchor = vp.pan();
        self.sync.broadcast_zoom(id, logical_anchor, &mut self.viewports)
    }

    /// Shift the pan offset of `id` by a screen delta and let the group follow.
    pub fn pan_by(&mut self, id: ViewportId, screen_delta: Vector) -> Result<usize> {
        self.viewport_mut(id)?.pan_by(screen_delta)?;
        self.sync.broadcast_pan(id, &mut self.viewports)
    }

    /// Fit the image of `id` in its viewport and let the group follow.
    pub fn fit_to_view(&mut self, id: ViewportId) -> Result<usize> {
        let vp = self.viewport_mut(id)?;
        vp.fit_to_view()?;
        let logical_anchor = vp.image_logical_rect().center();
        self.sync.broadcast_zoom(id, logical_anchor, &mut self.viewports)
    }

    /// Magnify every viewport by `magnification` around its centre.
    /// The sync group moves as one, anchored on its first member.
    pub fn zoom_all(&mut self, magnification: f64) -> Result<()> {
        if !magnification.is_finite() || magnification <= 0.0 {
            return Err(NebulaError::DegenerateTransform(format!(
                "magnification must be finite and > 0, got {magnification}"
            )));
        }
        let factor = 1.0 / magnification;
        for id in self.zoom_drivers() {
            let center = self.viewport(id)?.screen_rect().center();
            self.zoom_at(id, center, factor)?;
        }
        Ok(())
    }

    pub fn zoom_in(&mut self) -> Result<()> {
        self.zoom_all(self.config.input.zoom_in_step)
    }

    pub fn zoom_out(&mut self) -> Result<()> {
        self.zoom_all(self.config.input.zoom_out_step)
    }

    /// Back to one image pixel per screen pixel. Under a zoom lock, synced
    /// viewports take the native zoom of the group's first member.
    pub fn reset_zoom(&mut self) -> Result<()> {
        for id in self.zoom_drivers() {
            let native = self.viewport(id)?.native_zoom();
            self.set_zoom(id, native)?;
        }
        Ok(())
    }

    // Viewports a group-wide zoom must drive directly. Under a zoom lock the
    // group follows its first member; otherwise every viewport is driven.
    fn zoom_drivers(&self) -> Vec<ViewportId> {
        let leader = self.sync.members().first().copied();
        let follows = |id: ViewportId| {
            self.sync.policy().zoom_locked && self.sync.contains(id) && Some(id) != leader
        };
        self.viewport_ids().into_iter().filter(|id| !follows(*id)).collect()
    }

    // -----------------------------------------------------------------------
    // Input
    // -----------------------------------------------------------------------

    /// Apply one input event. Unknown viewports are rejected before anything changes.
    pub fn handle(&mut self, event: InputEvent) -> Result<EventOutcome> {
        let id = event.viewport();
        self.viewport_mut(id)?;

        match event {
            // Tracked even while reticules are hidden; visibility only affects drawing.
            InputEvent::PointerMove { position, .. } => {
                let logical = self.viewport(id)?.to_image(position);
                self.reticles.set_live_position(logical)?;
                Ok(EventOutcome::LiveMoved(logical))
            }
            InputEvent::Scroll {
                position, delta, ..
            } => {
                if !delta.is_finite() {
                    return Err(NebulaError::DegenerateTransform(format!(
                        "scroll delta must be finite, got {delta}"
                    )));
                }
                // Beyond the full zoom span the result clamps anyway; bounding the
                // exponent keeps exp() finite and > 0.
                let span = (self.config.zoom.max / self.config.zoom.min).ln() + 1.0;
                let exponent = (-delta * self.config.input.scroll_sensitivity).clamp(-span, span);
                let factor = exponent.exp();
                let synced = self.zoom_at(id, position, factor)?;
                Ok(EventOutcome::Zoomed {
                    zoom: self.viewport(id)?.zoom(),
                    synced,
                })
            }
            InputEvent::Click { position, .. } => {
                let logical = self.viewport(id)?.to_image(position);
                let marker = self.reticles.fix_at(logical)?;
                Ok(EventOutcome::MarkerFixed(marker))
            }
            InputEvent::Drag { delta, .. } => {
                let synced = self.pan_by(id, -delta)?;
                Ok(EventOutcome::Panned {
                    pan: self.viewport(id)?.pan(),
                    synced,
                })
            }
        }
    }

    // -----------------------------------------------------------------------
    // Reticules
    // -----------------------------------------------------------------------

    pub fn reticles(&self) -> &ReticleManager {
        &self.reticles
    }

    /// Style changes, labels, clearing and the other marker operations.
    pub fn reticles_mut(&mut self) -> &mut ReticleManager {
        &mut self.reticles
    }

    pub fn fix_current(&mut self) -> Option<MarkerId> {
        self.reticles.fix_current()
    }

    pub fn unfix(&mut self, marker: MarkerId) -> Result<()> {
        self.reticles.unfix(marker).map(|_| ())
    }

    /// Every marker projected through the transform of viewport `id`.
    pub fn projected_positions(&self, id: ViewportId) -> Result<Vec<ProjectedMarker>> {
        let vp = self.viewport(id)?;
        Ok(self.reticles.projected_positions(vp))
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let style = self.reticles.style();
        SessionSnapshot {
            policy: self.sync.policy(),
            reticle: ReticleSnapshot {
                color: style.color(),
                opacity: style.opacity(),
                visible: style.visible(),
            },
            viewports: self
                .viewports
                .values()
                .map(|vp| ViewportSnapshot {
                    id: vp.id(),
                    name: vp.image().name().map(str::to_owned),
                    pixel_width: vp.image().width(),
                    pixel_height: vp.image().height(),
                    scale: vp.image().scale(),
                    offset: vp.image().offset(),
                    screen_size: vp.screen_size(),
                    zoom: vp.zoom(),
                    pan: vp.pan(),
                    synced: self.sync.contains(vp.id()),
                    visible_logical_rect: vp.visible_logical_rect(),
                    image_screen_rect: vp.image_screen_rect(),
                    projected: self.reticles.projected_positions(vp),
                })
                .collect(),
            markers: self.reticles.markers().cloned().collect(),
        }
    }
}
