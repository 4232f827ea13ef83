//! Declutter pass for subpathway cluster labels. Their centroid-derived
//! positions routinely coincide; a fixed-iteration separation relaxation
//! pushes overlapping labels apart. No randomness anywhere, so identical
//! input always produces identical output.

use crate::fonts::TextMeasure;

use super::model::Position;
use super::types::NodeDefinition;

/// Matches the label size the style sheet gives shadow labels.
const LABEL_FONT_SIZE: f32 = 80.0;
/// Breathing room kept between separated labels.
const SPACING: f64 = 30.0;
const MAX_ITERATIONS: usize = 200;

/// Size each definition to its rendered label box and relax until no two
/// boxes overlap, then write the final positions back.
pub fn declutter(nodes: &mut [NodeDefinition], measure: &mut dyn TextMeasure) {
    if nodes.len() < 2 {
        return;
    }

    let boxes: Vec<(f64, f64)> = nodes
        .iter()
        .map(|node| {
            let label = node.data.display_name.as_deref().unwrap_or("");
            let wrap_width = node.data.width.map(|w| w as f32);
            let (w, h) = measure.measure_label(label, LABEL_FONT_SIZE, wrap_width);
            let w = if w > 0.0 {
                w as f64
            } else {
                node.data.width.unwrap_or(0.0)
            };
            let h = if h > 0.0 {
                h as f64
            } else {
                node.data.height.unwrap_or(0.0)
            };
            (w, h)
        })
        .collect();

    let mut positions: Vec<Position> = nodes.iter().map(|node| node.position).collect();

    for _ in 0..MAX_ITERATIONS {
        let mut moved = false;
        for i in 0..positions.len() {
            for j in (i + 1)..positions.len() {
                let dx = positions[j].x - positions[i].x;
                let dy = positions[j].y - positions[i].y;
                let min_dx = (boxes[i].0 + boxes[j].0) / 2.0 + SPACING;
                let min_dy = (boxes[i].1 + boxes[j].1) / 2.0 + SPACING;
                let overlap_x = min_dx - dx.abs();
                let overlap_y = min_dy - dy.abs();
                if overlap_x <= 0.0 || overlap_y <= 0.0 {
                    continue;
                }
                moved = true;
                // Separate along the axis of least penetration; coincident
                // centres resolve by index order so reruns agree.
                if overlap_x < overlap_y {
                    let dir = if dx != 0.0 { dx.signum() } else { 1.0 };
                    let shift = overlap_x / 2.0 * dir;
                    positions[i].x -= shift;
                    positions[j].x += shift;
                } else {
                    let dir = if dy != 0.0 { dy.signum() } else { 1.0 };
                    let shift = overlap_y / 2.0 * dir;
                    positions[i].y -= shift;
                    positions[j].y += shift;
                }
            }
        }
        if !moved {
            break;
        }
    }

    for (node, position) in nodes.iter_mut().zip(positions) {
        node.position = position;
    }
}

#[cfg(test)]
mod tests {
    use super::declutter;
    use crate::diagram::model::Position;
    use crate::diagram::types::{NodeData, NodeDefinition};
    use crate::fonts::TextMeasure;

    /// Deterministic stand-in: every character is ten units wide, one line of
    /// twenty units high.
    struct StubMeasure;

    impl TextMeasure for StubMeasure {
        fn measure_label(&mut self, text: &str, _size: f32, _max: Option<f32>) -> (f32, f32) {
            (text.chars().count() as f32 * 10.0, 20.0)
        }
    }

    fn shadow(id: &str, name: &str, x: f64, y: f64) -> NodeDefinition {
        NodeDefinition {
            data: NodeData {
                id: id.to_string(),
                display_name: Some(name.to_string()),
                width: Some(200.0),
                height: Some(100.0),
                ..Default::default()
            },
            classes: vec!["Shadow".to_string()],
            position: Position::new(x, y),
            selectable: true,
        }
    }

    fn overlapping(a: &NodeDefinition, b: &NodeDefinition, w: f64, h: f64) -> bool {
        (a.position.x - b.position.x).abs() < w && (a.position.y - b.position.y).abs() < h
    }

    #[test]
    fn coincident_labels_end_up_apart() {
        let mut nodes = vec![shadow("a", "Signaling", 50.0, 50.0), shadow("b", "Signaling", 50.0, 50.0)];
        declutter(&mut nodes, &mut StubMeasure);
        assert_ne!(nodes[0].position, nodes[1].position);
        // Label box is 90x20; after the pass they are fully separated.
        assert!(!overlapping(&nodes[0], &nodes[1], 90.0, 20.0));
    }

    #[test]
    fn pass_is_deterministic() {
        let build = || {
            let mut nodes = vec![
                shadow("a", "Transport", 0.0, 0.0),
                shadow("b", "Metabolism", 10.0, 5.0),
                shadow("c", "Signaling", 5.0, -3.0),
            ];
            declutter(&mut nodes, &mut StubMeasure);
            nodes
        };
        let first = build();
        let second = build();
        for (a, b) in first.iter().zip(&second) {
            assert_eq!(a.position, b.position);
        }
    }

    #[test]
    fn separated_labels_are_left_alone() {
        let mut nodes = vec![shadow("a", "A", 0.0, 0.0), shadow("b", "B", 5000.0, 0.0)];
        declutter(&mut nodes, &mut StubMeasure);
        assert_eq!(nodes[0].position, Position::new(0.0, 0.0));
        assert_eq!(nodes[1].position, Position::new(5000.0, 0.0));
    }
}
