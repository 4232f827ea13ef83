//! Renderer-facing element definitions: what the translator produces and a
//! graph-rendering library consumes. Data keys serialize in camelCase to
//! match the style selectors (`data(displayName)` and friends).

use serde::Serialize;

use super::model::Position;

fn is_true(b: &bool) -> bool {
    *b
}

/// Reference to the companion graph document entry backing an element.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphRef {
    pub db_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub st_id: Option<String>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub display_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeData {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reactome_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reaction_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub radius: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_x: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_y: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_fade_out: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_background: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub replacement: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub replaced_by: Option<String>,
    /// Accession of the backing reference entity, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub acc: Option<String>,
    /// Owning node, for attachment-derived nodes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub node_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub node_reactome_id: Option<i64>,
    /// Subpathway palette color, assigned by the style compiler.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub graph: Option<GraphRef>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeDefinition {
    pub data: NodeData,
    pub classes: Vec<String>,
    pub position: Position,
    #[serde(skip_serializing_if = "is_true")]
    pub selectable: bool,
}

impl Default for NodeDefinition {
    fn default() -> Self {
        Self {
            data: NodeData::default(),
            classes: Vec::new(),
            position: Position::default(),
            selectable: true,
        }
    }
}

impl NodeDefinition {
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeData {
    pub id: String,
    pub source: String,
    pub target: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stoichiometry: Option<i64>,
    /// Relative-coordinate encodings of the intermediate points, one value
    /// per point, space-joined in the renderer's native format.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weights: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distances: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_endpoint: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_endpoint: Option<String>,
    /// Owning subpathway, when the reaction belongs to one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pathway: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reactome_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reaction_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_fade_out: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_background: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub replacement: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub replaced_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub graph: Option<GraphRef>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EdgeDefinition {
    pub data: EdgeData,
    pub classes: Vec<String>,
    #[serde(skip_serializing_if = "is_true")]
    pub selectable: bool,
}

impl Default for EdgeDefinition {
    fn default() -> Self {
        Self {
            data: EdgeData::default(),
            classes: Vec::new(),
            selectable: true,
        }
    }
}

impl EdgeDefinition {
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }
}

/// The complete renderer input for one diagram.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Elements {
    pub nodes: Vec<NodeDefinition>,
    pub edges: Vec<EdgeDefinition>,
}

#[cfg(test)]
mod tests {
    use super::{NodeData, NodeDefinition};
    use crate::diagram::model::Position;

    #[test]
    fn serialization_uses_camel_case_and_drops_unset_fields() {
        let node = NodeDefinition {
            data: NodeData {
                id: "7".to_string(),
                display_name: Some("PE".to_string()),
                width: Some(80.0),
                ..Default::default()
            },
            classes: vec!["Protein".to_string(), "PhysicalEntity".to_string()],
            position: Position::new(1.0, 2.0),
            selectable: true,
        };
        let json = serde_json::to_string(&node).expect("serializable");
        assert!(json.contains("\"displayName\":\"PE\""));
        assert!(!json.contains("reactomeId"));
        // Default selectable nodes don't spell it out.
        assert!(!json.contains("selectable"));
    }
}
