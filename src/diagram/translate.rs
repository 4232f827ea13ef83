//! Geometry translator: turns one diagram + companion graph into the full
//! set of renderer node/edge definitions, converting the absolute polyline
//! layout into the renderer's edge-local relative coordinates.
//!
//! Curated layout data is imperfect; everything here degrades gracefully.
//! Dangling references drop the affected element, geometric sanity checks are
//! logged diagnostics, and missing optional geometry falls back to sensible
//! positions. The translator never fails a whole diagram.

use std::collections::{HashMap, HashSet};

use log::{debug, warn};

use crate::fonts::TextMeasure;
use crate::xml::sanitize_xml_text;

use super::model::{
    Compartment, ConnectorType, Diagram, DiagramEdge, DiagramNode, Graph, GraphEdge, GraphNode,
    Position, Prop,
};
use super::overlap;
use super::types::{EdgeData, EdgeDefinition, Elements, GraphRef, NodeData, NodeDefinition};

/// Everything in the source documents is in source units; consumers work at
/// twice that.
const SCALE: f64 = 2.0;

const COMPARTMENT_SHIFT: f64 = 35.0;
const INNER_CORNER_RADIUS: f64 = 10.0;
const MAX_CORNER_GAP: f64 = 100.0;

const T: f64 = 4.0;
const ARROW_MULT: f64 = 1.5;
const EDGE_MARGIN: f64 = 6.0;
const REACTION_RADIUS: f64 = 3.0 * T;
const MIN_VISIBLE_DIST: f64 = EDGE_MARGIN;

/// Two faded/plain reactions this close (squared, scaled units) count as the
/// same drawing spot.
const REACTION_PAIRING_DIST_SQ: f64 = 5.0 * 5.0;

fn scale_pos(p: Position) -> Position {
    Position::new(p.x * SCALE, p.y * SCALE)
}

fn scale_len(v: f64) -> f64 {
    v * SCALE
}

/// Chain keys are scoped per edge so identical coordinates on different
/// reactions cannot collide.
fn chain_key(edge_id: i64, p: Position) -> String {
    format!("{}-{},{}", edge_id, p.x, p.y)
}

fn point_key(p: Position) -> String {
    format!("{};{}", p.x, p.y)
}

fn equal(a: Position, b: Position) -> bool {
    a.x == b.x && a.y == b.y
}

fn squared_dist(a: Position, b: Position) -> f64 {
    (b.x - a.x).powi(2) + (b.y - a.y).powi(2)
}

fn dist(a: Position, b: Position) -> f64 {
    squared_dist(a, b).sqrt()
}

fn avg(positions: &[Position]) -> Position {
    let mut sum = Position::default();
    for p in positions {
        sum.x += p.x;
        sum.y += p.y;
    }
    Position::new(sum.x / positions.len() as f64, sum.y / positions.len() as f64)
}

/// The diagram point nearest the centroid, rather than the centroid itself,
/// so cluster markers land on an actual member instead of empty space.
fn closest_to_average(positions: &[Position]) -> Position {
    let average = avg(positions);
    let mut closest = positions[0];
    let mut min = squared_dist(closest, average);
    for &p in &positions[1..] {
        let d = squared_dist(p, average);
        if d < min {
            min = d;
            closest = p;
        }
    }
    closest
}

/// Zero-width breaks after separator characters let the renderer wrap long
/// biochemical names.
fn soft_break(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for c in name.chars() {
        out.push(c);
        if matches!(c, '/' | ',' | ':' | ';' | '-') {
            out.push('\u{200b}');
        }
    }
    out
}

fn rect_of(node: &DiagramNode) -> (f64, f64, f64, f64) {
    let half_width = node.prop.width / 2.0;
    let half_height = node.prop.height / 2.0;
    (
        node.position.x - half_width,
        node.position.x + half_width,
        node.position.y - half_height,
        node.position.y + half_height,
    )
}

/// True when `b` covers at least `limit` of `a`'s own area (or they sit at
/// the exact same point).
fn overlap_limited(a: &DiagramNode, b: &DiagramNode, limit: f64) -> bool {
    if equal(a.position, b.position) {
        return true;
    }
    let (a_left, a_right, a_top, a_bottom) = rect_of(a);
    let (b_left, b_right, b_top, b_bottom) = rect_of(b);
    let left = a_left.max(b_left);
    let right = a_right.min(b_right);
    let top = a_top.max(b_top);
    let bottom = a_bottom.min(b_bottom);
    if left >= right || top >= bottom {
        return false;
    }
    let own_area = (a_right - a_left) * (a_bottom - a_top);
    ((right - left) * (bottom - top)) / own_area > limit
}

/// Relative-coordinate encoding of intermediate edge points.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RelativePoints {
    pub weights: Vec<f64>,
    pub distances: Vec<f64>,
}

/// Express each point in the edge's own frame: the (non-normalized) edge
/// vector gives the weight along the edge, its normalized perpendicular the
/// offset in pixels. Inverting the 2x2 basis matrix maps absolute offsets
/// into that frame.
///
/// A degenerate zero-length edge has no usable frame; the conversion is
/// skipped and the edge renders as a plain straight segment.
pub fn absolute_to_relative(
    source: Position,
    target: Position,
    points: &[Position],
) -> RelativePoints {
    let mut relatives = RelativePoints::default();
    if points.is_empty() {
        return relatives;
    }

    let main = Position::new(target.x - source.x, target.y - source.y);
    if main.x == 0.0 && main.y == 0.0 {
        debug!("Degenerate zero-length edge; skipping relative conversion");
        return relatives;
    }
    let ortho_len = (main.x * main.x + main.y * main.y).sqrt();
    let ortho = Position::new(-main.y / ortho_len, main.x / ortho_len);

    // Rows of the basis matrix are (main, ortho); always invertible since
    // ortho is perpendicular to main.
    let det = main.x * ortho.y - main.y * ortho.x;
    let inv = [
        [ortho.y / det, -main.y / det],
        [-ortho.x / det, main.x / det],
    ];

    for point in points {
        let v = Position::new(point.x - source.x, point.y - source.y);
        relatives.weights.push(v.x * inv[0][0] + v.y * inv[1][0]);
        relatives.distances.push(v.x * inv[0][1] + v.y * inv[1][1]);
    }
    relatives
}

/// Inverse of [`absolute_to_relative`], used to validate the round trip.
pub fn relative_to_absolute(
    source: Position,
    target: Position,
    relatives: &RelativePoints,
) -> Vec<Position> {
    let main = Position::new(target.x - source.x, target.y - source.y);
    let ortho_len = (main.x * main.x + main.y * main.y).sqrt();
    if ortho_len == 0.0 {
        return Vec::new();
    }
    let ortho = Position::new(-main.y / ortho_len, main.x / ortho_len);

    relatives
        .weights
        .iter()
        .zip(&relatives.distances)
        .map(|(&w, &d)| {
            Position::new(
                source.x + w * main.x + d * ortho.x,
                source.y + w * main.y + d * ortho.y,
            )
        })
        .collect()
}

enum ChainDirection {
    Forward,
    Backward,
}

/// Extend the point list by following the per-edge auxiliary segment chain
/// until the expected stop position, a missing entry, or a cycle in the
/// underlying data.
fn follow_chain(
    edge_id: i64,
    points: &mut Vec<Position>,
    direction: ChainDirection,
    stop: Position,
    map: &HashMap<String, Position>,
) {
    let stop_key = chain_key(edge_id, stop);
    let mut visited: HashSet<String> = HashSet::new();
    loop {
        let at = match direction {
            ChainDirection::Forward => *points.last().expect("chain walk needs a seed point"),
            ChainDirection::Backward => *points.first().expect("chain walk needs a seed point"),
        };
        let key = chain_key(edge_id, at);
        if key == stop_key {
            break;
        }
        let Some(&next) = map.get(&key) else {
            break;
        };
        if !visited.insert(key) {
            warn!("Cyclic segment chain on edge {}; stopping the walk", edge_id);
            break;
        }
        match direction {
            ChainDirection::Forward => points.push(next),
            ChainDirection::Backward => points.insert(0, next),
        }
    }
}

/// Endpoint offsets are relative to the owning element's position.
fn endpoint(source: Position, point: Position) -> String {
    format!("{} {}", point.x - source.x, point.y - source.y)
}

fn join_floats(values: &[f64]) -> Option<String> {
    if values.is_empty() {
        return None;
    }
    Some(
        values
            .iter()
            .map(|v| v.to_string())
            .collect::<Vec<_>>()
            .join(" "),
    )
}

fn reaction_classes(reaction_type: Option<&str>) -> Vec<String> {
    let kind = match reaction_type {
        None | Some("transition") | Some("Transition") | Some("Process") => "transition",
        Some("binding") | Some("Association") => "association",
        Some("dissociation") | Some("Dissociation") => "dissociation",
        Some("omitted") | Some("Omitted Process") => "omitted",
        Some("uncertain") | Some("Uncertain Process") => "uncertain",
        Some(other) => {
            debug!("Unknown reaction type '{}', rendering as transition", other);
            "transition"
        }
    };
    vec![kind.to_string(), "reaction".to_string()]
}

fn entity_classes(renderable_class: &str) -> Vec<String> {
    let classes: &[&str] = match renderable_class {
        "Gene" => &["Gene", "PhysicalEntity"],
        "RNA" => &["RNA", "PhysicalEntity"],
        "Protein" => &["Protein", "PhysicalEntity"],
        "Entity" => &["GenomeEncodedEntity", "PhysicalEntity"],
        "Complex" => &["Complex", "PhysicalEntity"],
        "EntitySet" => &["EntitySet", "PhysicalEntity"],
        "Chemical" => &["Molecule", "PhysicalEntity"],
        "Cell" => &["Cell", "PhysicalEntity"],
        "ProteinDrug" => &["Protein", "PhysicalEntity", "drug"],
        "ComplexDrug" => &["Complex", "PhysicalEntity", "drug"],
        "ChemicalDrug" => &["Molecule", "PhysicalEntity", "drug"],
        "EntitySetDrug" => &["EntitySet", "PhysicalEntity", "drug"],
        "ProcessNode" => &["SUB", "Pathway"],
        "EncapsulatedNode" => &["Interacting", "Pathway"],
        other => return vec![other.to_lowercase()],
    };
    classes.iter().map(|c| c.to_string()).collect()
}

fn connector_classes(connector_type: ConnectorType) -> Vec<String> {
    let classes: &[&str] = match connector_type {
        ConnectorType::Input => &["consumption", "incoming", "reaction"],
        ConnectorType::Activator | ConnectorType::Required => {
            &["positive-regulation", "incoming", "reaction"]
        }
        ConnectorType::Inhibitor => &["negative-regulation", "incoming", "reaction"],
        ConnectorType::Catalyst => &["catalysis", "incoming", "reaction"],
        ConnectorType::Output => &["production", "outgoing", "reaction"],
    };
    classes.iter().map(|c| c.to_string()).collect()
}

fn link_classes(renderable_class: &str) -> Vec<String> {
    let classes: &[&str] = match renderable_class {
        "EntitySetAndMemberLink" | "EntitySetAndEntitySetLink" => &["set-to-member", "incoming"],
        "Interaction" | "FlowLine" => &["production", "outgoing"],
        other => {
            debug!("Unknown link class '{}', rendering as flow line", other);
            &["production", "outgoing"]
        }
    };
    classes.iter().map(|c| c.to_string()).collect()
}

fn graph_node_ref(node: &GraphNode) -> GraphRef {
    GraphRef {
        db_id: node.db_id,
        st_id: node.st_id.clone(),
        display_name: node.display_name.clone(),
        identifier: node.identifier.clone(),
    }
}

fn graph_edge_ref(edge: &GraphEdge) -> GraphRef {
    GraphRef {
        db_id: edge.db_id,
        st_id: edge.st_id.clone(),
        display_name: edge.display_name.clone(),
        identifier: None,
    }
}

fn compartment_nodes(compartment: &Compartment) -> Vec<NodeDefinition> {
    let scaled_rect = |prop: &Prop| {
        [
            scale_len(prop.x),
            scale_len(prop.y),
            scale_len(prop.x + prop.width),
            scale_len(prop.y + prop.height),
        ]
    };

    let outer_radius = compartment.insets.as_ref().map(|insets| {
        let outer = scaled_rect(&compartment.prop);
        let inner = scaled_rect(insets);
        let gap = outer
            .iter()
            .zip(&inner)
            .map(|(o, i)| (o - i).abs())
            .fold(f64::MAX, f64::min);
        INNER_CORNER_RADIUS + gap.min(MAX_CORNER_GAP)
    });

    let mut layers = vec![NodeDefinition {
        data: NodeData {
            id: format!("{}-outer", compartment.id),
            display_name: Some(compartment.display_name.clone()),
            text_x: Some(
                scale_len(
                    compartment.text_position.x - (compartment.prop.x + compartment.prop.width),
                ) + COMPARTMENT_SHIFT,
            ),
            text_y: Some(
                scale_len(
                    compartment.text_position.y - (compartment.prop.y + compartment.prop.height),
                ) + COMPARTMENT_SHIFT,
            ),
            width: Some(scale_len(compartment.prop.width)),
            height: Some(scale_len(compartment.prop.height)),
            radius: outer_radius,
            ..Default::default()
        },
        classes: vec!["Compartment".to_string(), "outer".to_string()],
        position: scale_pos(compartment.position),
        selectable: false,
    }];

    if let Some(insets) = &compartment.insets {
        layers.push(NodeDefinition {
            data: NodeData {
                id: format!("{}-inner", compartment.id),
                width: Some(scale_len(insets.width)),
                height: Some(scale_len(insets.height)),
                radius: Some(INNER_CORNER_RADIUS),
                ..Default::default()
            },
            classes: vec!["Compartment".to_string(), "inner".to_string()],
            position: scale_pos(Position::new(
                insets.x + insets.width / 2.0,
                insets.y + insets.height / 2.0,
            )),
            selectable: false,
        });
    }
    layers
}

/// Translate one diagram + graph into renderer element definitions.
pub fn build(diagram: &Diagram, graph: &Graph, measure: &mut dyn TextMeasure) -> Elements {
    let id_to_edge: HashMap<i64, &DiagramEdge> =
        diagram.edges.iter().map(|edge| (edge.id, edge)).collect();
    let id_to_node: HashMap<i64, &DiagramNode> =
        diagram.nodes.iter().map(|node| (node.id, node)).collect();
    // Biological identities are shared across diagram entities, so this is
    // many-to-one with last-write-wins; it only feeds the shadow centroid
    // lookup below.
    let reactome_id_to_edge: HashMap<i64, &DiagramEdge> = diagram
        .edges
        .iter()
        .map(|edge| (edge.reactome_id, edge))
        .collect();

    // Auxiliary per-edge segment chains, both directions. Colliding keys mean
    // two segments share an endpoint on the same edge; the later one wins,
    // which is a known data-quality wart upstream.
    let mut forward_chain: HashMap<String, Position> = HashMap::new();
    let mut backward_chain: HashMap<String, Position> = HashMap::new();
    for edge in &diagram.edges {
        for segment in &edge.segments {
            let from = scale_pos(segment.from);
            let to = scale_pos(segment.to);
            if forward_chain.insert(chain_key(edge.id, from), to).is_some() {
                warn!(
                    "Two segments of edge {} start from the same point; chain data lost",
                    edge.id
                );
            }
            if backward_chain.insert(chain_key(edge.id, to), from).is_some() {
                warn!(
                    "Two segments of edge {} end at the same point; chain data lost",
                    edge.id
                );
            }
        }
    }

    let subpathway_ids: HashSet<i64> = diagram
        .shadows
        .iter()
        .map(|shadow| shadow.reactome_id)
        .collect();
    let mut event_to_subpathway: HashMap<i64, i64> = HashMap::new();
    let mut subpathway_to_events: HashMap<i64, &Vec<i64>> = HashMap::new();
    for subpathway in &graph.subpathways {
        subpathway_to_events.insert(subpathway.db_id, &subpathway.events);
        if subpathway_ids.contains(&subpathway.db_id) {
            for &event in &subpathway.events {
                event_to_subpathway.insert(event, subpathway.db_id);
            }
        }
    }

    // Diagram id to graph node, collapsing single-child wrappers onto the
    // child entity.
    let db_id_to_graph_node: HashMap<i64, &GraphNode> =
        graph.nodes.iter().map(|node| (node.db_id, node)).collect();
    let mut id_to_graph_node: HashMap<i64, &GraphNode> = HashMap::new();
    for node in &graph.nodes {
        let target = if node.children.len() == 1 {
            db_id_to_graph_node.get(&node.children[0]).copied()
        } else {
            Some(node)
        };
        if let (Some(ids), Some(target)) = (&node.diagram_ids, target) {
            for &id in ids {
                id_to_graph_node.insert(id, target);
            }
        }
    }
    let db_id_to_graph_edge: HashMap<i64, &GraphEdge> =
        graph.edges.iter().map(|edge| (edge.db_id, edge)).collect();

    // Fade/replacement pairing material: faded elements belong to the
    // background pass and pair up with the plain element drawn at the same
    // spot.
    let faded_nodes: Vec<&DiagramNode> =
        diagram.nodes.iter().filter(|n| n.is_fade_out).collect();
    let plain_nodes: Vec<&DiagramNode> =
        diagram.nodes.iter().filter(|n| !n.is_fade_out).collect();
    let pos_to_faded_node: HashMap<String, &DiagramNode> = faded_nodes
        .iter()
        .map(|n| (point_key(n.position), *n))
        .collect();
    let pos_to_plain_node: HashMap<String, &DiagramNode> = plain_nodes
        .iter()
        .map(|n| (point_key(n.position), *n))
        .collect();

    let faded_edges: Vec<&DiagramEdge> =
        diagram.edges.iter().filter(|e| e.is_fade_out).collect();
    let plain_edges: Vec<&DiagramEdge> =
        diagram.edges.iter().filter(|e| !e.is_fade_out).collect();
    let pos_to_faded_edge: HashMap<String, &DiagramEdge> = faded_edges
        .iter()
        .map(|e| (point_key(e.position), *e))
        .collect();
    let pos_to_plain_edge: HashMap<String, &DiagramEdge> = plain_edges
        .iter()
        .map(|e| (point_key(e.position), *e))
        .collect();

    let compartments: Vec<NodeDefinition> = diagram
        .compartments
        .iter()
        .flat_map(compartment_nodes)
        .collect();

    let mut replacement_map: HashMap<String, String> = HashMap::new();

    // One renderer node per reaction, at its own diagram position.
    let mut reaction_nodes: Vec<NodeDefinition> = Vec::with_capacity(diagram.edges.len());
    for edge in &diagram.edges {
        let mut replaced_by = None;
        let mut replacement = None;
        if edge.is_fade_out {
            replaced_by = pos_to_plain_edge
                .get(&point_key(edge.position))
                .map(|e| e.id.to_string())
                .or_else(|| {
                    plain_edges
                        .iter()
                        .find(|other| {
                            squared_dist(scale_pos(other.position), scale_pos(edge.position))
                                < REACTION_PAIRING_DIST_SQ
                        })
                        .map(|e| e.id.to_string())
                });
            if let Some(replaced_by) = &replaced_by {
                replacement_map.insert(edge.id.to_string(), replaced_by.clone());
                replacement_map.insert(replaced_by.clone(), edge.id.to_string());
            }
        } else {
            replacement = pos_to_faded_edge
                .get(&point_key(edge.position))
                .map(|e| e.id.to_string())
                .or_else(|| {
                    faded_edges
                        .iter()
                        .find(|other| {
                            squared_dist(scale_pos(other.position), scale_pos(edge.position))
                                < REACTION_PAIRING_DIST_SQ
                        })
                        .map(|e| e.id.to_string())
                });
        }

        reaction_nodes.push(NodeDefinition {
            data: NodeData {
                id: edge.id.to_string(),
                reactome_id: Some(edge.reactome_id),
                reaction_id: Some(edge.id),
                is_fade_out: Some(edge.is_fade_out),
                is_background: Some(edge.is_fade_out),
                replacement,
                replaced_by,
                graph: db_id_to_graph_edge
                    .get(&edge.reactome_id)
                    .map(|e| graph_edge_ref(e)),
                ..Default::default()
            },
            classes: reaction_classes(edge.reaction_type.as_deref()),
            position: scale_pos(edge.position),
            selectable: true,
        });
    }

    // Entity nodes, plus one derived node per attachment.
    let mut node_background: HashMap<i64, bool> = HashMap::new();
    let mut entity_nodes: Vec<NodeDefinition> = Vec::with_capacity(diagram.nodes.len());
    for node in &diagram.nodes {
        let mut classes = entity_classes(&node.renderable_class);
        if node.is_disease {
            classes.push("disease".to_string());
        }
        if node.is_crossed {
            classes.push("crossed".to_string());
        }
        if node.trivial {
            classes.push("trivial".to_string());
        }
        if node.need_dashed_border {
            classes.push("loss-of-function".to_string());
        }

        let mut replaced_by = None;
        let mut replacement = None;
        if node.is_fade_out {
            replaced_by = pos_to_plain_node
                .get(&point_key(node.position))
                .map(|n| n.id.to_string())
                .or_else(|| {
                    plain_nodes
                        .iter()
                        .find(|other| overlap_limited(node, other, 0.8))
                        .map(|n| n.id.to_string())
                });
            if let Some(replaced_by) = &replaced_by {
                replacement_map.insert(node.id.to_string(), replaced_by.clone());
                replacement_map.insert(replaced_by.clone(), node.id.to_string());
            }
        } else {
            replacement = pos_to_faded_node
                .get(&point_key(node.position))
                .map(|n| n.id.to_string());
        }

        // Category-specific box corrections before scaling.
        let mut prop = node.prop;
        if classes.iter().any(|c| c == "RNA") {
            prop.height -= 10.0;
        }
        if classes.iter().any(|c| c == "Cell") {
            prop.height /= 2.0;
        }

        let is_background = node.is_fade_out
            || classes.iter().any(|c| c == "Pathway")
            || node.connectors.iter().any(|c| c.is_fade_out);
        node_background.insert(node.id, is_background);
        if is_background && !node.is_fade_out {
            replacement_map.insert(node.id.to_string(), node.id.to_string());
        }
        let is_fade_out = !node.is_crossed && node.is_fade_out;

        let width = scale_len(prop.width);
        let height = scale_len(prop.height);
        let graph_node = id_to_graph_node.get(&node.id);
        let acc = graph_node.and_then(|n| n.identifier.clone());

        entity_nodes.push(NodeDefinition {
            data: NodeData {
                id: node.id.to_string(),
                reactome_id: Some(node.reactome_id),
                display_name: Some(soft_break(&sanitize_xml_text(&node.display_name))),
                width: Some(width),
                height: Some(height),
                graph: graph_node.map(|n| graph_node_ref(n)),
                acc,
                is_fade_out: Some(is_fade_out),
                is_background: Some(is_background),
                replacement: replacement.clone(),
                replaced_by: replaced_by.clone(),
                ..Default::default()
            },
            classes,
            position: scale_pos(node.position),
            selectable: true,
        });

        for attachment in &node.node_attachments {
            entity_nodes.push(NodeDefinition {
                data: NodeData {
                    id: format!("{}-{}", node.id, attachment.reactome_id),
                    reactome_id: Some(attachment.reactome_id),
                    node_id: Some(node.id),
                    node_reactome_id: Some(node.reactome_id),
                    display_name: Some(attachment.label.clone()),
                    width: Some(scale_len(attachment.shape.b.x - attachment.shape.a.x)),
                    height: Some(scale_len(attachment.shape.b.y - attachment.shape.a.y)),
                    is_fade_out: Some(is_fade_out),
                    is_background: Some(is_background),
                    replacement: replacement.clone(),
                    replaced_by: replaced_by.clone(),
                    ..Default::default()
                },
                classes: vec!["Modification".to_string()],
                position: scale_pos(attachment.shape.centre),
                selectable: true,
            });
        }
    }

    // Subpathway cluster markers, placed on the member reaction closest to
    // the cluster centroid, then decluttered.
    let mut shadow_nodes: Vec<NodeDefinition> = Vec::with_capacity(diagram.shadows.len());
    for shadow in &diagram.shadows {
        let member_positions: Vec<Position> = subpathway_to_events
            .get(&shadow.reactome_id)
            .map(|events| {
                events
                    .iter()
                    .filter_map(|event| reactome_id_to_edge.get(event))
                    .map(|edge| scale_pos(edge.position))
                    .collect()
            })
            .unwrap_or_default();
        let position = if member_positions.is_empty() {
            warn!(
                "Subpathway {} has no resolvable member reactions; using its own position",
                shadow.reactome_id
            );
            scale_pos(shadow.position)
        } else {
            closest_to_average(&member_positions)
        };

        shadow_nodes.push(NodeDefinition {
            data: NodeData {
                id: shadow.id.to_string(),
                display_name: Some(shadow.display_name.clone()),
                width: Some(scale_len(shadow.prop.width)),
                height: Some(scale_len(shadow.prop.height)),
                reactome_id: Some(shadow.reactome_id),
                ..Default::default()
            },
            classes: vec!["Shadow".to_string()],
            position,
            selectable: true,
        });
    }
    overlap::declutter(&mut shadow_nodes, measure);

    // One renderer edge per (node, connector) pair.
    let mut edge_ids: HashMap<String, u32> = HashMap::new();
    let mut edges: Vec<EdgeDefinition> = Vec::new();
    for node in &diagram.nodes {
        for (connector_index, connector) in node.connectors.iter().enumerate() {
            let Some(reaction) = id_to_edge.get(&connector.edge_id).copied() else {
                warn!(
                    "Connector of node {} references missing edge {}; skipped",
                    node.id, connector.edge_id
                );
                continue;
            };

            let reaction_p = scale_pos(reaction.position);
            let node_p = scale_pos(node.position);

            // OUTPUT edges run reaction -> node; everything else runs into
            // the reaction.
            let (source_id, target_id, source_p, target_p) =
                if connector.connector_type != ConnectorType::Output {
                    (node.id, reaction.id, node_p, reaction_p)
                } else {
                    (reaction.id, node.id, reaction_p, node_p)
                };

            let mut points: Vec<Position> = Vec::new();
            for (i, segment) in connector.segments.iter().enumerate() {
                if i == 0 {
                    points.push(scale_pos(segment.from));
                }
                points.push(scale_pos(segment.to));
            }
            if connector.connector_type == ConnectorType::Output {
                points.reverse();
            }
            if points.is_empty() {
                points.push(reaction_p);
            }

            follow_chain(
                reaction.id,
                &mut points,
                ChainDirection::Backward,
                source_p,
                &backward_chain,
            );
            follow_chain(
                reaction.id,
                &mut points,
                ChainDirection::Forward,
                target_p,
                &forward_chain,
            );

            // Reactions without visible connector segments keep a sensible
            // straight edge from the node to the reaction box.
            let from = if points.len() > 1 {
                points.remove(0)
            } else {
                node_p
            };
            let mut to = points.pop().unwrap_or(reaction_p);
            if connector.connector_type == ConnectorType::Catalyst {
                // Catalysis arrows stop at the recorded end-shape centre, a
                // fixed offset short of the reaction box.
                if let Some(end_shape) = &connector.end_shape {
                    to = scale_pos(end_shape.centre);
                }
            }

            let relatives = absolute_to_relative(from, to, &points);

            let mut classes = connector_classes(connector.connector_type);
            if reaction.is_disease {
                classes.push("disease".to_string());
            }
            if node.trivial {
                classes.push("trivial".to_string());
            }
            if event_to_subpathway.contains_key(&reaction.reactome_id) {
                classes.push("shadow".to_string());
            }

            let mut visible = dist(from, to);
            if equal(from, reaction_p) || equal(to, reaction_p) {
                visible -= REACTION_RADIUS;
            }
            if classes
                .iter()
                .any(|c| c == "positive-regulation" || c == "catalysis" || c == "production")
            {
                visible -= ARROW_MULT * T;
            }
            if visible <= MIN_VISIBLE_DIST {
                warn!(
                    "Edge between reaction {} and entity {} has visible length {:.1}, below {}",
                    reaction.reactome_id, node.reactome_id, visible, MIN_VISIBLE_DIST
                );
            }

            let mut replacement = None;
            let mut replaced_by = None;
            if connector.is_fade_out {
                // Both endpoints must have a plain counterpart for the faded
                // connector to be replaceable.
                replaced_by = match (
                    replacement_map.get(&node.id.to_string()),
                    replacement_map.get(&reaction.id.to_string()),
                ) {
                    (Some(_), Some(reaction_replacement)) => Some(reaction_replacement.clone()),
                    _ => None,
                };
            } else {
                // Same node reused between plain and faded context first,
                // separate faded twins second.
                replacement = node
                    .connectors
                    .iter()
                    .enumerate()
                    .find(|(other_index, other)| {
                        *other_index != connector_index
                            && other.is_fade_out
                            && id_to_edge
                                .get(&other.edge_id)
                                .is_some_and(|other_reaction| {
                                    equal(other_reaction.position, reaction.position)
                                })
                    })
                    .map(|(_, other)| other.edge_id.to_string());
                if replacement.is_none()
                    && pos_to_faded_node.contains_key(&point_key(node.position))
                {
                    replacement = pos_to_faded_edge
                        .get(&point_key(reaction.position))
                        .map(|e| e.id.to_string());
                }
            }

            let base_id = format!(
                "{} --{} {}",
                source_id,
                connector.connector_type.glyph(),
                target_id
            );
            let id = match edge_ids.get_mut(&base_id) {
                Some(count) => {
                    *count += 1;
                    let id = format!("{} ({})", base_id, count);
                    warn!("Conflicting edge id: {}", id);
                    id
                }
                None => {
                    edge_ids.insert(base_id.clone(), 0);
                    base_id
                }
            };

            edges.push(EdgeDefinition {
                data: EdgeData {
                    id,
                    source: source_id.to_string(),
                    target: target_id.to_string(),
                    stoichiometry: Some(connector.stoichiometry.value),
                    weights: join_floats(&relatives.weights),
                    distances: join_floats(&relatives.distances),
                    source_endpoint: Some(endpoint(source_p, from)),
                    target_endpoint: Some(endpoint(target_p, to)),
                    pathway: event_to_subpathway.get(&reaction.reactome_id).copied(),
                    reactome_id: Some(reaction.reactome_id),
                    reaction_id: Some(reaction.id),
                    is_fade_out: Some(reaction.is_fade_out),
                    is_background: Some(reaction.is_fade_out),
                    replacement,
                    replaced_by,
                    graph: db_id_to_graph_edge
                        .get(&reaction.reactome_id)
                        .map(|e| graph_edge_ref(e)),
                    ..Default::default()
                },
                classes,
                selectable: true,
            });
        }
    }

    // Non-reaction relations; set-membership self-loops are meaningless and
    // skipped.
    let mut link_edges: Vec<EdgeDefinition> = Vec::new();
    for link in &diagram.links {
        let (Some(input), Some(output)) = (link.inputs.first(), link.outputs.first()) else {
            warn!("Link {} is missing an endpoint; skipped", link.id);
            continue;
        };
        if link.renderable_class.contains("EntitySet") && input.id == output.id {
            continue;
        }
        let (Some(source), Some(target)) = (id_to_node.get(&input.id), id_to_node.get(&output.id))
        else {
            warn!("Link {} references missing nodes; skipped", link.id);
            continue;
        };

        let source_p = scale_pos(source.position);
        let target_p = scale_pos(target.position);

        let mut points: Vec<Position> = Vec::new();
        for (i, segment) in link.segments.iter().enumerate() {
            if i == 0 {
                points.push(scale_pos(segment.from));
            }
            points.push(scale_pos(segment.to));
        }

        let from = if points.is_empty() {
            source_p
        } else {
            points.remove(0)
        };
        let to = points.pop().unwrap_or(target_p);

        let relatives = absolute_to_relative(from, to, &points);

        let mut classes = link_classes(&link.renderable_class);
        if link.is_disease {
            classes.push("disease".to_string());
        }
        let is_background = link.is_fade_out
            || (node_background.get(&source.id).copied().unwrap_or(false)
                && node_background.get(&target.id).copied().unwrap_or(false));

        link_edges.push(EdgeDefinition {
            data: EdgeData {
                id: link.id.to_string(),
                source: input.id.to_string(),
                target: output.id.to_string(),
                weights: join_floats(&relatives.weights),
                distances: join_floats(&relatives.distances),
                source_endpoint: Some(endpoint(source_p, from)),
                target_endpoint: Some(endpoint(target_p, to)),
                is_fade_out: Some(link.is_fade_out),
                is_background: Some(is_background),
                ..Default::default()
            },
            classes,
            selectable: false,
        });
    }

    let mut nodes = compartments;
    nodes.append(&mut reaction_nodes);
    nodes.append(&mut entity_nodes);
    nodes.append(&mut shadow_nodes);
    let mut all_edges = edges;
    all_edges.append(&mut link_edges);

    Elements {
        nodes,
        edges: all_edges,
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::diagram::model::{
        Compartment, EdgeConnector, Link, NodeConnector, Prop, Segment, Shape, Stoichiometry,
        SubPathway,
    };
    use crate::diagram::model::{Graph, GraphSubPathway};

    struct StubMeasure;

    impl TextMeasure for StubMeasure {
        fn measure_label(&mut self, text: &str, _size: f32, _max: Option<f32>) -> (f32, f32) {
            (text.chars().count() as f32 * 10.0, 20.0)
        }
    }

    fn pos(x: f64, y: f64) -> Position {
        Position::new(x, y)
    }

    fn segment(from: (f64, f64), to: (f64, f64)) -> Segment {
        Segment {
            from: pos(from.0, from.1),
            to: pos(to.0, to.1),
        }
    }

    fn connector(
        edge_id: i64,
        connector_type: ConnectorType,
        segments: Vec<Segment>,
    ) -> NodeConnector {
        NodeConnector {
            edge_id,
            connector_type,
            segments,
            stoichiometry: Stoichiometry { value: 1 },
            end_shape: None,
            is_fade_out: false,
        }
    }

    fn entity(id: i64, at: (f64, f64), connectors: Vec<NodeConnector>) -> DiagramNode {
        DiagramNode {
            id,
            reactome_id: id + 100,
            display_name: format!("PE{}", id),
            position: pos(at.0, at.1),
            renderable_class: "Protein".to_string(),
            prop: Prop {
                x: at.0 - 50.0,
                y: at.1 - 25.0,
                width: 100.0,
                height: 50.0,
            },
            connectors,
            ..Default::default()
        }
    }

    fn reaction(id: i64, at: (f64, f64)) -> DiagramEdge {
        DiagramEdge {
            id,
            reactome_id: id + 100,
            display_name: format!("r{}", id),
            position: pos(at.0, at.1),
            renderable_class: "Reaction".to_string(),
            reaction_type: Some("Transition".to_string()),
            ..Default::default()
        }
    }

    fn diagram(nodes: Vec<DiagramNode>, edges: Vec<DiagramEdge>) -> Diagram {
        Diagram {
            display_name: "test".to_string(),
            nodes,
            edges,
            ..Default::default()
        }
    }

    fn build_elements(diagram: &Diagram, graph: &Graph) -> Elements {
        build(diagram, graph, &mut StubMeasure)
    }

    fn find_edge<'a>(elements: &'a Elements, id: &str) -> &'a EdgeDefinition {
        elements
            .edges
            .iter()
            .find(|e| e.data.id == id)
            .unwrap_or_else(|| panic!("missing edge {}", id))
    }

    fn find_node<'a>(elements: &'a Elements, id: &str) -> &'a NodeDefinition {
        elements
            .nodes
            .iter()
            .find(|n| n.data.id == id)
            .unwrap_or_else(|| panic!("missing node {}", id))
    }

    #[test]
    fn empty_connector_falls_back_to_node_and_reaction_positions() {
        let d = diagram(
            vec![entity(1, (5.0, 5.0), vec![connector(10, ConnectorType::Input, vec![])])],
            vec![reaction(10, (50.0, 5.0))],
        );
        let elements = build_elements(&d, &Graph::default());

        let edge = find_edge(&elements, "1 --- 10");
        assert_eq!(edge.data.source, "1");
        assert_eq!(edge.data.target, "10");
        // from anchors on the node, to on the reaction; both offsets zero.
        assert_eq!(edge.data.source_endpoint.as_deref(), Some("0 0"));
        assert_eq!(edge.data.target_endpoint.as_deref(), Some("0 0"));
        assert_eq!(edge.data.weights, None);
        assert_eq!(edge.data.distances, None);
    }

    #[test]
    fn extra_point_chain_is_spliced_into_the_point_list() {
        let mut r = reaction(10, (40.0, 0.0));
        r.segments = vec![segment((20.0, 0.0), (30.0, 0.0)), segment((30.0, 0.0), (40.0, 0.0))];
        let d = diagram(
            vec![entity(
                1,
                (0.0, 0.0),
                vec![connector(
                    10,
                    ConnectorType::Input,
                    vec![segment((0.0, 0.0), (20.0, 0.0))],
                )],
            )],
            vec![r],
        );
        let elements = build_elements(&d, &Graph::default());

        let edge = find_edge(&elements, "1 --- 10");
        // The chain extends (40,0) -> (60,0) -> (80,0) in scaled units; the
        // two interior points encode as fractions along the edge.
        assert_eq!(edge.data.weights.as_deref(), Some("0.5 0.75"));
        assert_eq!(edge.data.distances.as_deref(), Some("0 0"));
        assert_eq!(edge.data.source_endpoint.as_deref(), Some("0 0"));
        assert_eq!(edge.data.target_endpoint.as_deref(), Some("0 0"));
    }

    #[test]
    fn output_connectors_run_from_the_reaction_to_the_node() {
        let d = diagram(
            vec![entity(1, (5.0, 5.0), vec![connector(10, ConnectorType::Output, vec![])])],
            vec![reaction(10, (50.0, 5.0))],
        );
        let elements = build_elements(&d, &Graph::default());

        let edge = find_edge(&elements, "10 --> 1");
        assert_eq!(edge.data.source, "10");
        assert_eq!(edge.data.target, "1");
        assert!(edge.classes.iter().any(|c| c == "production"));
        assert!(edge.classes.iter().any(|c| c == "outgoing"));
    }

    #[test]
    fn catalyst_edges_stop_at_the_recorded_end_shape() {
        let mut c = connector(10, ConnectorType::Catalyst, vec![]);
        c.end_shape = Some(Shape {
            centre: pos(45.0, 5.0),
            ..Default::default()
        });
        let d = diagram(
            vec![entity(1, (5.0, 5.0), vec![c])],
            vec![reaction(10, (50.0, 5.0))],
        );
        let elements = build_elements(&d, &Graph::default());

        let edge = find_edge(&elements, "1 --o 10");
        // to = (90,10) scaled; reaction sits at (100,10): offset -10 0.
        assert_eq!(edge.data.target_endpoint.as_deref(), Some("-10 0"));
        assert!(edge.classes.iter().any(|c| c == "catalysis"));
    }

    #[test]
    fn same_position_fade_pairing_is_symmetric() {
        let mut faded = entity(1, (10.0, 10.0), vec![]);
        faded.is_fade_out = true;
        let plain = entity(2, (10.0, 10.0), vec![]);
        let d = diagram(vec![faded, plain], vec![]);
        let elements = build_elements(&d, &Graph::default());

        assert_eq!(find_node(&elements, "1").data.replaced_by.as_deref(), Some("2"));
        assert_eq!(find_node(&elements, "2").data.replacement.as_deref(), Some("1"));
    }

    #[test]
    fn fade_pairing_falls_back_to_bounding_box_overlap() {
        let mut faded = entity(1, (10.0, 10.0), vec![]);
        faded.is_fade_out = true;
        // Shifted by 5 out of 100: well above the 0.8 overlap threshold, but
        // not an exact position match.
        let plain = entity(2, (15.0, 10.0), vec![]);
        let d = diagram(vec![faded, plain], vec![]);
        let elements = build_elements(&d, &Graph::default());

        assert_eq!(find_node(&elements, "1").data.replaced_by.as_deref(), Some("2"));
    }

    #[test]
    fn unmatched_fade_leaves_both_sides_unset() {
        let mut faded = entity(1, (10.0, 10.0), vec![]);
        faded.is_fade_out = true;
        let plain = entity(2, (500.0, 500.0), vec![]);
        let d = diagram(vec![faded, plain], vec![]);
        let elements = build_elements(&d, &Graph::default());

        assert_eq!(find_node(&elements, "1").data.replaced_by, None);
        assert_eq!(find_node(&elements, "2").data.replacement, None);
    }

    #[test]
    fn pathway_nodes_are_background() {
        let mut node = entity(1, (10.0, 10.0), vec![]);
        node.renderable_class = "ProcessNode".to_string();
        let d = diagram(vec![node], vec![]);
        let elements = build_elements(&d, &Graph::default());

        let def = find_node(&elements, "1");
        assert!(def.has_class("SUB") && def.has_class("Pathway"));
        assert_eq!(def.data.is_background, Some(true));
        // Self-replacement marker for plain background nodes.
        assert_eq!(def.data.replacement, None);
    }

    #[test]
    fn attachments_become_modification_nodes() {
        let mut node = entity(1, (10.0, 10.0), vec![]);
        node.node_attachments = vec![crate::diagram::model::Attachment {
            label: "P".to_string(),
            reactome_id: 77,
            shape: Shape {
                a: pos(18.0, 4.0),
                b: pos(24.0, 10.0),
                centre: pos(21.0, 7.0),
                ..Default::default()
            },
            ..Default::default()
        }];
        let d = diagram(vec![node], vec![]);
        let elements = build_elements(&d, &Graph::default());

        let ptm = find_node(&elements, "1-77");
        assert!(ptm.has_class("Modification"));
        assert_eq!(ptm.position, pos(42.0, 14.0));
        assert_eq!(ptm.data.width, Some(12.0));
        assert_eq!(ptm.data.height, Some(12.0));
        assert_eq!(ptm.data.node_id, Some(1));
    }

    #[test]
    fn rna_and_cell_boxes_are_trimmed() {
        let mut rna = entity(1, (10.0, 10.0), vec![]);
        rna.renderable_class = "RNA".to_string();
        let mut cell = entity(2, (300.0, 10.0), vec![]);
        cell.renderable_class = "Cell".to_string();
        let d = diagram(vec![rna, cell], vec![]);
        let elements = build_elements(&d, &Graph::default());

        // Base prop height 50: RNA loses 10 source units, Cell halves.
        assert_eq!(find_node(&elements, "1").data.height, Some(80.0));
        assert_eq!(find_node(&elements, "2").data.height, Some(50.0));
    }

    #[test]
    fn compartment_outer_radius_tracks_the_inset_gap() {
        let d = Diagram {
            display_name: "c".to_string(),
            compartments: vec![Compartment {
                id: 40,
                display_name: "cytosol".to_string(),
                position: pos(50.0, 50.0),
                prop: Prop {
                    x: 0.0,
                    y: 0.0,
                    width: 100.0,
                    height: 100.0,
                },
                insets: Some(Prop {
                    x: 10.0,
                    y: 10.0,
                    width: 80.0,
                    height: 80.0,
                }),
                text_position: pos(60.0, 90.0),
                ..Default::default()
            }],
            ..Default::default()
        };
        let elements = build_elements(&d, &Graph::default());

        let outer = find_node(&elements, "40-outer");
        // Minimum scaled gap between the boxes is 20, plus the inner radius.
        assert_eq!(outer.data.radius, Some(30.0));
        assert!(!outer.selectable);
        let inner = find_node(&elements, "40-inner");
        assert_eq!(inner.data.radius, Some(10.0));
        assert_eq!(inner.position, pos(100.0, 100.0));
    }

    #[test]
    fn shadow_lands_on_the_member_closest_to_the_centroid() {
        let d = Diagram {
            display_name: "s".to_string(),
            edges: vec![
                reaction(401, (0.0, 0.0)),
                reaction(402, (10.0, 0.0)),
                reaction(403, (100.0, 0.0)),
            ],
            shadows: vec![SubPathway {
                id: 90,
                reactome_id: 900,
                display_name: "cluster".to_string(),
                prop: Prop {
                    x: 0.0,
                    y: 0.0,
                    width: 100.0,
                    height: 40.0,
                },
                ..Default::default()
            }],
            ..Default::default()
        };
        let graph = Graph {
            subpathways: vec![GraphSubPathway {
                db_id: 900,
                events: vec![501, 502, 503],
                ..Default::default()
            }],
            ..Default::default()
        };
        let elements = build_elements(&d, &graph);

        // Scaled member positions are (0,0), (20,0), (200,0); the mean is
        // (73.3, 0) and (20,0) is nearest to it.
        assert_eq!(find_node(&elements, "90").position, pos(20.0, 0.0));
    }

    #[test]
    fn subpathway_membership_tags_edges() {
        let d = diagram(
            vec![entity(1, (0.0, 0.0), vec![connector(10, ConnectorType::Input, vec![])])],
            vec![reaction(10, (50.0, 0.0))],
        );
        let mut d = d;
        d.shadows = vec![SubPathway {
            id: 90,
            reactome_id: 900,
            display_name: "cluster".to_string(),
            ..Default::default()
        }];
        let graph = Graph {
            subpathways: vec![GraphSubPathway {
                db_id: 900,
                // reaction(10) has reactome id 110.
                events: vec![110],
                ..Default::default()
            }],
            ..Default::default()
        };
        let elements = build_elements(&d, &graph);

        let edge = find_edge(&elements, "1 --- 10");
        assert!(edge.classes.iter().any(|c| c == "shadow"));
        assert_eq!(edge.data.pathway, Some(900));
    }

    #[test]
    fn conflicting_edge_ids_get_a_counter_suffix() {
        let d = diagram(
            vec![entity(
                1,
                (5.0, 5.0),
                vec![
                    connector(10, ConnectorType::Input, vec![]),
                    connector(10, ConnectorType::Input, vec![]),
                ],
            )],
            vec![reaction(10, (50.0, 5.0))],
        );
        let elements = build_elements(&d, &Graph::default());

        assert!(elements.edges.iter().any(|e| e.data.id == "1 --- 10"));
        assert!(elements.edges.iter().any(|e| e.data.id == "1 --- 10 (1)"));
    }

    #[test]
    fn dangling_connector_is_skipped() {
        let d = diagram(
            vec![entity(1, (5.0, 5.0), vec![connector(99, ConnectorType::Input, vec![])])],
            vec![reaction(10, (50.0, 5.0))],
        );
        let elements = build_elements(&d, &Graph::default());
        assert!(elements.edges.is_empty());
    }

    #[test]
    fn set_membership_self_loops_are_skipped() {
        let mut d = diagram(vec![entity(1, (5.0, 5.0), vec![])], vec![]);
        d.links = vec![Link {
            id: 60,
            renderable_class: "EntitySetAndMemberLink".to_string(),
            inputs: vec![EdgeConnector {
                id: 1,
                ..Default::default()
            }],
            outputs: vec![EdgeConnector {
                id: 1,
                ..Default::default()
            }],
            ..Default::default()
        }];
        let elements = build_elements(&d, &Graph::default());
        assert!(elements.edges.is_empty());
    }

    #[test]
    fn links_between_background_nodes_are_background() {
        let mut a = entity(1, (5.0, 5.0), vec![]);
        a.renderable_class = "ProcessNode".to_string();
        let mut b = entity(2, (200.0, 5.0), vec![]);
        b.renderable_class = "ProcessNode".to_string();
        let mut d = diagram(vec![a, b], vec![]);
        d.links = vec![Link {
            id: 60,
            renderable_class: "FlowLine".to_string(),
            inputs: vec![EdgeConnector {
                id: 1,
                ..Default::default()
            }],
            outputs: vec![EdgeConnector {
                id: 2,
                ..Default::default()
            }],
            ..Default::default()
        }];
        let elements = build_elements(&d, &Graph::default());

        let link = find_edge(&elements, "60");
        assert_eq!(link.data.is_background, Some(true));
        assert!(!link.selectable);
        assert!(link.classes.iter().any(|c| c == "production"));
    }

    #[test]
    fn display_names_get_soft_breaks() {
        let mut node = entity(1, (5.0, 5.0), vec![]);
        node.display_name = "NADP+:NADPH-oxidase".to_string();
        let d = diagram(vec![node], vec![]);
        let elements = build_elements(&d, &Graph::default());

        let name = find_node(&elements, "1").data.display_name.clone().unwrap();
        assert_eq!(name, "NADP+:\u{200b}NADPH-\u{200b}oxidase");
    }

    #[test]
    fn reaction_type_lookup() {
        assert_eq!(reaction_classes(None)[0], "transition");
        assert_eq!(reaction_classes(Some("Association"))[0], "association");
        assert_eq!(reaction_classes(Some("dissociation"))[0], "dissociation");
        assert_eq!(reaction_classes(Some("Omitted Process"))[0], "omitted");
        assert_eq!(reaction_classes(Some("uncertain"))[0], "uncertain");
        assert_eq!(reaction_classes(Some("???"))[0], "transition");
    }

    #[test]
    fn zero_length_edges_skip_relative_conversion() {
        let p = pos(10.0, 10.0);
        let relatives = absolute_to_relative(p, p, &[pos(5.0, 5.0)]);
        assert!(relatives.weights.is_empty());
        assert!(relatives.distances.is_empty());
    }

    #[test]
    fn known_relative_conversion() {
        let relatives =
            absolute_to_relative(pos(0.0, 0.0), pos(100.0, 0.0), &[pos(50.0, 10.0)]);
        assert_eq!(relatives.weights, vec![0.5]);
        assert_eq!(relatives.distances, vec![10.0]);
    }

    proptest! {
        #[test]
        fn relative_round_trip(
            sx in -500.0f64..500.0, sy in -500.0f64..500.0,
            dx in 1.0f64..500.0, dy in -500.0f64..500.0,
            points in prop::collection::vec((-500.0f64..500.0, -500.0f64..500.0), 1..6),
        ) {
            let source = pos(sx, sy);
            let target = pos(sx + dx, sy + dy);
            let points: Vec<Position> = points.into_iter().map(|(x, y)| pos(x, y)).collect();
            let relatives = absolute_to_relative(source, target, &points);
            let recovered = relative_to_absolute(source, target, &relatives);
            prop_assert_eq!(points.len(), recovered.len());
            for (original, recovered) in points.iter().zip(&recovered) {
                prop_assert!((original.x - recovered.x).abs() < 1e-6);
                prop_assert!((original.y - recovered.y).abs() < 1e-6);
            }
        }
    }
}
