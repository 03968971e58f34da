pub mod marker;
pub mod style;

pub use marker::{Marker, MarkerId, MarkerKind, ProjectedMarker};
pub use style::{Color, ReticleConfig, ReticleStyle};

use tracing::{info, warn};

use crate::error::{NebulaError, Result};
use crate::geometry::Point;
use crate::viewport::ViewportState;

/// Owns every reticule, in logical coordinates shared by all viewports.
#[derive(Clone, Debug, Default)]
pub struct ReticleManager {
    live: Option<Marker>,
    /// Ordered by id.
    fixed: Vec<Marker>,
    next_id: u64,
    style: ReticleStyle,
}

impl ReticleManager {
    pub fn new(config: &ReticleConfig) -> Self {
        Self {
            style: ReticleStyle::from_config(config),
            ..Default::default()
        }
    }

    pub fn style(&self) -> &ReticleStyle {
        &self.style
    }

    pub fn live(&self) -> Option<&Marker> {
        self.live.as_ref()
    }

    pub fn fixed(&self) -> &[Marker] {
        &self.fixed
    }

    pub fn get(&self, id: MarkerId) -> Option<&Marker> {
        self.fixed.iter().find(|m| m.kind == MarkerKind::Fixed(id))
    }

    /// Live marker first, then fixed markers by id.
    pub fn markers(&self) -> impl Iterator<Item = &Marker> {
        self.live.iter().chain(self.fixed.iter())
    }

    pub fn len(&self) -> usize {
        self.fixed.len() + usize::from(self.live.is_some())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn set_live_position(&mut self, logical: Point) -> Result<()> {
        if !logical.is_finite() {
            return Err(NebulaError::DegenerateTransform(format!(
                "marker position must be finite, got ({}, {})",
                logical.x, logical.y
            )));
        }
        let color = self.style.color();
        match self.live.as_mut() {
            Some(live) => live.position = logical,
            None => {
                self.live = Some(Marker {
                    kind: MarkerKind::Live,
                    position: logical,
                    color,
                    label: None,
                })
            }
        }
        Ok(())
    }

    /// Pin a copy of the live marker. The live marker keeps tracking the
    /// pointer. Returns `None` when there is nothing to pin.
    pub fn fix_current(&mut self) -> Option<MarkerId> {
        let position = self.live.as_ref()?.position;
        Some(self.push_fixed(position))
    }

    /// Move the live marker to `logical` and pin it there.
    pub fn fix_at(&mut self, logical: Point) -> Result<MarkerId> {
        self.set_live_position(logical)?;
        Ok(self.push_fixed(logical))
    }

    fn push_fixed(&mut self, position: Point) -> MarkerId {
        let id = MarkerId(self.next_id);
        self.next_id += 1;
        self.fixed.push(Marker {
            kind: MarkerKind::Fixed(id),
            position,
            color: self.style.color(),
            label: None,
        });
        info!(marker = %id, x = position.x, y = position.y, "Reticule fixed");
        id
    }

    pub fn unfix(&mut self, id: MarkerId) -> Result<Marker> {
        match self.fixed.iter().position(|m| m.kind == MarkerKind::Fixed(id)) {
            Some(index) => {
                info!(marker = %id, "Reticule removed");
                Ok(self.fixed.remove(index))
            }
            None => {
                warn!(marker = %id, "Cannot remove unknown reticule");
                Err(NebulaError::UnknownMarker(id))
            }
        }
    }

    /// Remove the fixed marker nearest to the live one.
    pub fn remove_closest_fixed(&mut self) -> Option<MarkerId> {
        let target = self.live.as_ref()?.position;
        let closest = self
            .fixed
            .iter()
            .min_by(|a, b| {
                a.position
                    .distance_squared(target)
                    .total_cmp(&b.position.distance_squared(target))
            })?
            .kind
            .id()?;
        self.unfix(closest).ok().map(|_| closest)
    }

    pub fn clear_all(&mut self) {
        self.live = None;
        self.fixed.clear();
    }

    pub fn set_label(&mut self, id: MarkerId, label: impl Into<String>) -> Result<()> {
        let marker = self
            .fixed
            .iter_mut()
            .find(|m| m.kind == MarkerKind::Fixed(id))
            .ok_or(NebulaError::UnknownMarker(id))?;
        marker.label = Some(label.into());
        Ok(())
    }

    /// Screen position of every marker in `viewport`, off-screen ones included.
    pub fn projected_positions(&self, viewport: &ViewportState) -> Vec<ProjectedMarker> {
        let bounds = viewport.screen_rect();
        self.markers()
            .map(|m| {
                let screen = viewport.to_screen(m.position);
                ProjectedMarker {
                    kind: m.kind,
                    screen,
                    on_screen: bounds.contains(screen),
                }
            })
            .collect()
    }

    /// Switch to the next palette colour; the live marker follows it.
    pub fn cycle_color(&mut self) -> Color {
        let color = self.style.cycle_color();
        if let Some(live) = self.live.as_mut() {
            live.color = color;
        }
        color
    }

    pub fn cycle_opacity(&mut self) -> f64 {
        self.style.cycle_opacity()
    }

    pub fn toggle_visibility(&mut self) -> bool {
        self.style.toggle_visibility()
    }
}
