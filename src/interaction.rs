//! Interaction coordinator: hover/select propagation across a reaction's
//! neighborhood, and the zoom-level interpolation feeding opacity and label
//! scaling. Pure state + functions; the hosting shell owns the actual event
//! loop and applies the returned mutations.

use crate::diagram::types::Elements;
use crate::properties::Properties;

/// Zoom window (in percent) over which detail styling ramps.
const ZOOM_DETAIL_START: f64 = 130.0;
const ZOOM_DETAIL_END: f64 = 150.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Hover,
    DeHover,
    Select,
}

/// Per-instance re-entrancy guards. Each diagram view (main, comparison,
/// legend) owns its own coordinator, so guards are never shared between
/// views.
#[derive(Debug, Default)]
pub struct Interaction {
    hovering: bool,
    de_hovering: bool,
    selecting: bool,
}

impl Interaction {
    pub fn new() -> Self {
        Self::default()
    }

    fn flag_mut(&mut self, action: Action) -> &mut bool {
        match action {
            Action::Hover => &mut self.hovering,
            Action::DeHover => &mut self.de_hovering,
            Action::Select => &mut self.selecting,
        }
    }

    /// Try to enter an action; returns false when the same action is already
    /// in flight on this instance (an event handler re-triggered itself).
    pub fn begin(&mut self, action: Action) -> bool {
        let flag = self.flag_mut(action);
        if *flag {
            return false;
        }
        *flag = true;
        true
    }

    pub fn end(&mut self, action: Action) {
        *self.flag_mut(action) = false;
    }

    /// A reaction node plus every edge touching it; hover and select treat
    /// the whole neighborhood as one unit.
    pub fn reaction_neighborhood(elements: &Elements, reaction_id: &str) -> Vec<String> {
        let mut ids = vec![reaction_id.to_string()];
        for edge in &elements.edges {
            if edge.data.source == reaction_id || edge.data.target == reaction_id {
                ids.push(edge.data.id.clone());
            }
        }
        ids
    }

    /// Elements gaining the hover class; empty when re-entered.
    pub fn hover_reaction(&mut self, elements: &Elements, reaction_id: &str) -> Vec<String> {
        self.guarded(Action::Hover, elements, reaction_id)
    }

    /// Elements losing the hover class; empty when re-entered.
    pub fn leave_reaction(&mut self, elements: &Elements, reaction_id: &str) -> Vec<String> {
        self.guarded(Action::DeHover, elements, reaction_id)
    }

    /// Elements to select alongside the reaction; empty when re-entered.
    pub fn select_reaction(&mut self, elements: &Elements, reaction_id: &str) -> Vec<String> {
        self.guarded(Action::Select, elements, reaction_id)
    }

    fn guarded(&mut self, action: Action, elements: &Elements, reaction_id: &str) -> Vec<String> {
        if !self.begin(action) {
            return Vec::new();
        }
        let ids = Self::reaction_neighborhood(elements, reaction_id);
        self.end(action);
        ids
    }
}

/// Style values that track the zoom level.
#[derive(Debug, Clone, PartialEq)]
pub struct ZoomStyle {
    /// Underlay opacity of subpathway cluster edges, 0..1.
    pub shadow_opacity: f64,
    /// Text opacity of cluster labels, 0..1.
    pub shadow_label_opacity: f64,
    /// Opacity of trivial molecules, 0..1.
    pub trivial_opacity: f64,
    pub font_size: f64,
    /// Label margin and width as percentages of the node box.
    pub label_margin: f64,
    pub label_max_width: f64,
}

/// Resolve the zoom-dependent styles at a zoom factor (1.0 = 100%).
pub fn zoom_style(properties: &Properties, zoom: f64) -> ZoomStyle {
    let z = zoom * 100.0;
    let base_font_size = properties.font.size.extract();
    let detail = [(ZOOM_DETAIL_START, 0.0), (ZOOM_DETAIL_END, 1.0)];

    ZoomStyle {
        shadow_opacity: interpolate(z, &properties.shadow.opacity.extract()) / 100.0,
        shadow_label_opacity: interpolate(z, &properties.shadow.label_opacity.extract()) / 100.0,
        trivial_opacity: interpolate(z, &properties.trivial.opacity.extract()) / 100.0,
        font_size: base_font_size - interpolate(z, &detail) * base_font_size / 2.0,
        label_margin: interpolate(z, &detail) * 25.0,
        label_max_width: 100.0 - interpolate(z, &detail) * 50.0,
    }
}

/// The zoom floor: never further out than where cluster labels are fully
/// opaque.
pub fn min_zoom(properties: &Properties, current: f64) -> f64 {
    let label_opacity = properties.shadow.label_opacity.extract();
    let floor = label_opacity.first().map(|&(z, _)| z / 100.0).unwrap_or(0.0);
    current.min(floor)
}

/// Piecewise-linear interpolation over ordered `(x, y)` control points,
/// clamped to the first/last value outside the range.
pub fn interpolate(x: f64, points: &[(f64, f64)]) -> f64 {
    let Some(&(first_x, first_y)) = points.first() else {
        return 0.0;
    };
    let &(last_x, last_y) = points.last().expect("non-empty");
    if x <= first_x {
        return first_y;
    }
    if x >= last_x {
        return last_y;
    }
    for pair in points.windows(2) {
        let (x0, y0) = pair[0];
        let (x1, y1) = pair[1];
        if x >= x0 && x <= x1 {
            return lerp(x, (x0, y0), (x1, y1));
        }
    }
    last_y
}

fn lerp(x: f64, p0: (f64, f64), p1: (f64, f64)) -> f64 {
    (p0.1 * (p1.0 - x) + p1.1 * (x - p0.0)) / (p1.0 - p0.0)
}

#[cfg(test)]
mod tests {
    use super::{Action, Interaction, interpolate, min_zoom, zoom_style};
    use crate::diagram::types::{EdgeData, EdgeDefinition, Elements, NodeData, NodeDefinition};
    use crate::properties::Properties;

    fn elements() -> Elements {
        let node = |id: &str, classes: &[&str]| NodeDefinition {
            data: NodeData {
                id: id.to_string(),
                ..Default::default()
            },
            classes: classes.iter().map(|c| c.to_string()).collect(),
            ..Default::default()
        };
        let edge = |id: &str, source: &str, target: &str| EdgeDefinition {
            data: EdgeData {
                id: id.to_string(),
                source: source.to_string(),
                target: target.to_string(),
                ..Default::default()
            },
            ..Default::default()
        };
        Elements {
            nodes: vec![
                node("1", &["Protein", "PhysicalEntity"]),
                node("10", &["transition", "reaction"]),
                node("2", &["Molecule", "PhysicalEntity"]),
            ],
            edges: vec![edge("1 --- 10", "1", "10"), edge("10 --> 2", "10", "2")],
        }
    }

    #[test]
    fn hover_propagates_to_adjacent_edges() {
        let elements = elements();
        let mut interaction = Interaction::new();
        let ids = interaction.hover_reaction(&elements, "10");
        assert_eq!(ids, vec!["10", "1 --- 10", "10 --> 2"]);
    }

    #[test]
    fn reentrant_actions_are_blocked_per_instance() {
        let elements = elements();
        let mut first = Interaction::new();
        let mut second = Interaction::new();

        assert!(first.begin(Action::Hover));
        // Re-entering the same action on the same instance is refused, and
        // the guarded helpers return nothing.
        assert!(!first.begin(Action::Hover));
        assert!(first.hover_reaction(&elements, "10").is_empty());
        // A different action, and a different instance, are unaffected.
        assert!(first.begin(Action::Select));
        assert!(second.begin(Action::Hover));

        first.end(Action::Hover);
        assert!(first.begin(Action::Hover));
    }

    #[test]
    fn interpolation_clamps_and_blends() {
        let curve = [(20.0, 100.0), (40.0, 0.0)];
        assert_eq!(interpolate(10.0, &curve), 100.0);
        assert_eq!(interpolate(50.0, &curve), 0.0);
        assert_eq!(interpolate(30.0, &curve), 50.0);
        assert_eq!(interpolate(20.0, &curve), 100.0);
    }

    #[test]
    fn zoom_style_follows_the_default_curves() {
        let properties = Properties::default();

        // Fully zoomed out: clusters visible, trivial entities hidden.
        let out = zoom_style(&properties, 0.2);
        assert_eq!(out.shadow_opacity, 0.2);
        assert_eq!(out.shadow_label_opacity, 1.0);
        assert_eq!(out.trivial_opacity, 0.0);
        assert_eq!(out.font_size, 12.0);
        assert_eq!(out.label_max_width, 100.0);

        // Deep zoom: clusters gone, labels shrink to make room.
        let deep = zoom_style(&properties, 1.5);
        assert_eq!(deep.shadow_opacity, 0.0);
        assert_eq!(deep.trivial_opacity, 1.0);
        assert_eq!(deep.font_size, 6.0);
        assert_eq!(deep.label_margin, 25.0);
        assert_eq!(deep.label_max_width, 50.0);
    }

    #[test]
    fn min_zoom_is_bounded_by_the_label_curve() {
        let properties = Properties::default();
        assert_eq!(min_zoom(&properties, 1.0), 0.2);
        assert_eq!(min_zoom(&properties, 0.1), 0.1);
    }
}
