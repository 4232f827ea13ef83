//! Input documents: the diagram layout and its companion identity graph,
//! exactly as served. Both are read-only source material for the translator;
//! unknown fields are ignored and optional ones default, since curated data
//! is not uniformly populated.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize, Serialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Bounding box in diagram units.
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
pub struct Prop {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
pub struct Segment {
    pub from: Position,
    pub to: Position,
}

/// Generic drawn shape: attachment boxes, connector end shapes, reaction
/// glyph boxes.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Shape {
    pub a: Position,
    pub b: Position,
    pub centre: Position,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub empty: bool,
    pub s: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConnectorType {
    Input,
    Output,
    Catalyst,
    Activator,
    Inhibitor,
    Required,
}

impl ConnectorType {
    /// Short glyph used when composing stable edge identifiers.
    pub fn glyph(self) -> &'static str {
        match self {
            ConnectorType::Input => "-",
            ConnectorType::Output => ">",
            ConnectorType::Catalyst => "o",
            ConnectorType::Activator => "+",
            ConnectorType::Inhibitor => "|",
            ConnectorType::Required => "+>",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Stoichiometry {
    pub value: i64,
}

impl Default for Stoichiometry {
    fn default() -> Self {
        Self { value: 1 }
    }
}

/// Per-node view of one connection to a reaction.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeConnector {
    pub edge_id: i64,
    #[serde(rename = "type")]
    pub connector_type: ConnectorType,
    #[serde(default)]
    pub segments: Vec<Segment>,
    #[serde(default)]
    pub stoichiometry: Stoichiometry,
    #[serde(default)]
    pub end_shape: Option<Shape>,
    #[serde(default)]
    pub is_fade_out: bool,
}

/// Post-translational modification marker attached to a node.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Attachment {
    pub description: Option<String>,
    pub label: String,
    pub reactome_id: i64,
    pub shape: Shape,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DiagramNode {
    pub id: i64,
    pub reactome_id: i64,
    pub display_name: String,
    pub position: Position,
    pub renderable_class: String,
    pub schema_class: Option<String>,
    pub is_disease: bool,
    pub is_fade_out: bool,
    pub is_crossed: bool,
    pub prop: Prop,
    pub connectors: Vec<NodeConnector>,
    pub node_attachments: Vec<Attachment>,
    pub need_dashed_border: bool,
    pub trivial: bool,
}

/// Participant reference inside a reaction or link record.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EdgeConnector {
    pub id: i64,
    pub points: Option<Vec<Position>>,
    pub stoichiometry: Option<i64>,
    pub is_fade_out: bool,
}

/// A reaction: rendered as its own node, carrying the polyline backbone its
/// participant edges get stitched onto.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DiagramEdge {
    pub id: i64,
    pub reactome_id: i64,
    pub display_name: String,
    pub position: Position,
    pub renderable_class: String,
    pub is_disease: bool,
    pub is_fade_out: bool,
    pub is_crossed: bool,
    pub reaction_shape: Option<Shape>,
    pub reaction_type: Option<String>,
    pub segments: Vec<Segment>,
    pub catalysts: Vec<EdgeConnector>,
    pub inputs: Vec<EdgeConnector>,
    pub outputs: Vec<EdgeConnector>,
    pub inhibitors: Vec<EdgeConnector>,
    pub activators: Vec<EdgeConnector>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Compartment {
    pub id: i64,
    pub reactome_id: i64,
    pub display_name: String,
    pub position: Position,
    pub renderable_class: String,
    pub component_ids: Vec<i64>,
    pub prop: Prop,
    pub insets: Option<Prop>,
    pub text_position: Position,
}

/// Entity-to-entity relation independent of reactions.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Link {
    pub id: i64,
    pub inputs: Vec<EdgeConnector>,
    pub outputs: Vec<EdgeConnector>,
    pub renderable_class: String,
    pub segments: Vec<Segment>,
    pub is_fade_out: bool,
    pub is_disease: bool,
}

/// Named cluster grouping the reactions of one sub-process.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SubPathway {
    pub id: i64,
    pub reactome_id: i64,
    pub display_name: String,
    pub position: Position,
    pub renderable_class: String,
    pub prop: Prop,
    pub colour: Option<String>,
}

/// One pathway's full visual layout; the sole source of truth for a render
/// session, fetched once and never mutated.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Diagram {
    pub display_name: String,
    pub nodes: Vec<DiagramNode>,
    pub edges: Vec<DiagramEdge>,
    pub compartments: Vec<Compartment>,
    pub links: Vec<Link>,
    pub shadows: Vec<SubPathway>,
}

impl Diagram {
    pub fn from_json(content: &str) -> Result<Self, String> {
        serde_json::from_str(content).map_err(|e| format!("Failed to parse diagram JSON: {}", e))
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GraphNode {
    pub db_id: i64,
    pub st_id: Option<String>,
    pub display_name: String,
    pub diagram_ids: Option<Vec<i64>>,
    pub identifier: Option<String>,
    pub parents: Vec<i64>,
    pub children: Vec<i64>,
    pub schema_class: Option<String>,
    pub reference_type: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GraphEdge {
    pub db_id: i64,
    pub st_id: Option<String>,
    pub display_name: String,
    pub schema_class: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GraphSubPathway {
    pub db_id: i64,
    pub st_id: Option<String>,
    pub display_name: String,
    pub events: Vec<i64>,
}

/// Companion identity document: stable database identities plus hierarchical
/// groupings for the diagram's elements.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Graph {
    pub db_id: i64,
    pub st_id: Option<String>,
    pub species_name: Option<String>,
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
    pub subpathways: Vec<GraphSubPathway>,
}

impl Graph {
    pub fn from_json(content: &str) -> Result<Self, String> {
        serde_json::from_str(content).map_err(|e| format!("Failed to parse graph JSON: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::{ConnectorType, Diagram, Graph};

    #[test]
    fn parses_a_minimal_diagram() {
        let diagram = Diagram::from_json(
            r#"{
              "displayName": "Test pathway",
              "nodes": [{
                "id": 1, "reactomeId": 101, "displayName": "PE",
                "position": {"x": 10, "y": 20},
                "renderableClass": "Protein",
                "prop": {"x": 0, "y": 0, "width": 80, "height": 40},
                "connectors": [{
                  "edgeId": 2, "type": "INPUT",
                  "segments": [{"from": {"x": 10, "y": 20}, "to": {"x": 30, "y": 20}}],
                  "stoichiometry": {"value": 2}
                }]
              }],
              "edges": [{
                "id": 2, "reactomeId": 102, "displayName": "r",
                "position": {"x": 50, "y": 20},
                "renderableClass": "Reaction",
                "reactionType": "Transition",
                "segments": [],
                "inputs": [{"id": 1}], "outputs": []
              }],
              "compartments": [], "links": [], "shadows": []
            }"#,
        )
        .expect("valid diagram");

        assert_eq!(diagram.display_name, "Test pathway");
        let connector = &diagram.nodes[0].connectors[0];
        assert_eq!(connector.connector_type, ConnectorType::Input);
        assert_eq!(connector.stoichiometry.value, 2);
        assert_eq!(diagram.edges[0].reaction_type.as_deref(), Some("Transition"));
    }

    #[test]
    fn missing_optional_fields_default() {
        let diagram = Diagram::from_json(
            r#"{"displayName": "x", "nodes": [], "edges": [], "compartments": [], "links": [], "shadows": []}"#,
        )
        .expect("valid diagram");
        assert!(diagram.nodes.is_empty());

        let graph =
            Graph::from_json(r#"{"dbId": 5, "nodes": [], "edges": []}"#).expect("valid graph");
        assert_eq!(graph.db_id, 5);
        assert!(graph.subpathways.is_empty());
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let graph = Graph::from_json(r#"{"dbId": 5, "unknown": 1, "nodes": [], "edges": []}"#);
        assert!(graph.is_ok());
    }
}
