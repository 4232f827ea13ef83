//! Style-rule compiler: maps resolved properties onto the ordered selector /
//! declaration list a graph-rendering library applies. Most values are
//! literals captured at compile time; image-driven node properties are
//! resolved per node through the image engine.

use std::collections::HashMap;

use serde::Serialize;
use serde_json::{Map, Value, json};

use crate::color::spaced_palette;
use crate::diagram::types::Elements;
use crate::image::{ImageEngine, NodeHandle, omitted_icon};
use crate::properties::Properties;

#[derive(Debug, Clone, Serialize)]
pub struct StyleRule {
    pub selector: String,
    pub style: Map<String, Value>,
}

fn rule(selector: &str, entries: Vec<(&str, Value)>) -> StyleRule {
    StyleRule {
        selector: selector.to_string(),
        style: entries
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect(),
    }
}

/// Reference to a per-element data field, in the renderer's native notation.
fn data(field: &str) -> Value {
    json!(format!("data({field})"))
}

/// Compile the full rule list for the current property values. Recompile (and
/// clear the image engine) whenever those values change.
pub fn compile(properties: &Properties) -> Vec<StyleRule> {
    let p = properties;
    let t = p.global.thickness.extract();
    let font_size = p.font.size.extract();

    vec![
        rule(
            "*",
            vec![
                ("font-family", json!("Roboto")),
                ("font-weight", json!(600)),
                ("z-index", json!(1)),
            ],
        ),
        rule(
            "node.Compartment",
            vec![
                ("shape", json!("round-rectangle")),
                ("width", data("width")),
                ("height", data("height")),
                ("border-style", json!("double")),
                ("z-index", json!(0)),
                ("z-compound-depth", json!("bottom")),
                ("overlay-opacity", json!(0)),
                ("color", json!(p.compartment.fill.extract())),
                ("border-color", json!(p.compartment.fill.extract())),
                ("background-color", json!(p.compartment.fill.extract())),
                ("background-opacity", json!(p.compartment.opacity.extract())),
                ("border-width", json!(3.0 * t)),
            ],
        ),
        rule(
            "node.Compartment.inner, node.Compartment.outer",
            vec![("border-style", json!("solid")), ("border-width", json!(t))],
        ),
        rule(
            "node.Compartment.outer",
            vec![
                ("label", data("displayName")),
                ("text-opacity", json!(1)),
                ("text-valign", json!("bottom")),
                ("text-halign", json!("right")),
                ("text-margin-x", data("textX")),
                ("text-margin-y", data("textY")),
            ],
        ),
        rule("node[?radius]", vec![("corner-radius", data("radius"))]),
        rule(
            "node.Shadow",
            vec![
                ("label", data("displayName")),
                ("font-size", json!(80)),
                ("background-opacity", json!(0)),
                ("shape", json!("rectangle")),
                ("text-valign", json!("center")),
                ("text-halign", json!("center")),
                ("text-outline-color", json!(p.global.surface.extract())),
                ("text-outline-width", json!(15)),
                ("text-wrap", json!("wrap")),
                ("text-max-width", data("width")),
            ],
        ),
        rule("node.Shadow[?color]", vec![("color", data("color"))]),
        rule(
            "node.drug",
            vec![
                ("text-margin-x", json!(4)),
                ("font-style", json!("italic")),
            ],
        ),
        rule(
            "node.PhysicalEntity, node.Pathway, node.Modification, node.Protein",
            vec![
                ("font-size", json!(font_size)),
                ("text-margin-x", json!(0)),
                ("label", data("displayName")),
                ("width", data("width")),
                ("height", data("height")),
                ("background-fit", json!("none")),
                ("text-halign", json!("center")),
                ("text-valign", json!("center")),
                ("text-wrap", json!("wrap")),
                ("text-max-width", data("width")),
                ("color", json!(p.global.on_primary.extract())),
            ],
        ),
        rule(
            "node.PhysicalEntity.disease",
            vec![
                ("border-color", json!(p.global.negative_contrast.extract())),
                ("color", json!(p.global.negative_contrast.extract())),
                ("border-width", json!(t)),
            ],
        ),
        rule(
            "node.Protein",
            vec![
                ("shape", json!("round-rectangle")),
                ("background-color", json!(p.protein.fill.extract())),
            ],
        ),
        rule(
            "node.Protein.drug",
            vec![("background-color", json!(p.protein.drug.extract()))],
        ),
        rule(
            "node.GenomeEncodedEntity",
            vec![
                ("shape", json!("round-rectangle")),
                ("background-opacity", json!(0)),
                (
                    "background-color",
                    json!(p.genome_encoded_entity.fill.extract()),
                ),
                (
                    "text-margin-y",
                    json!(p.genome_encoded_entity.top_radius.extract() / 10.0),
                ),
                ("border-width", json!(0)),
            ],
        ),
        rule(
            "node.RNA",
            vec![
                ("shape", json!("bottom-round-rectangle")),
                ("background-color", json!(p.rna.fill.extract())),
            ],
        ),
        rule(
            "node.RNA.drug",
            vec![("background-color", json!(p.rna.drug.extract()))],
        ),
        rule(
            "node.Gene",
            vec![
                ("shape", json!("bottom-round-rectangle")),
                ("background-opacity", json!(0)),
                ("background-color", json!(p.gene.fill.extract())),
                (
                    "bounds-expansion",
                    json!(p.gene.decoration_extra_width.extract()),
                ),
                (
                    "text-margin-y",
                    json!(p.gene.decoration_height.extract() / 2.0),
                ),
                ("border-width", json!(0)),
            ],
        ),
        rule(
            "node.Molecule",
            vec![
                ("shape", json!("round-rectangle")),
                ("color", json!(p.molecule.stroke.extract())),
                ("background-color", json!(p.molecule.fill.extract())),
                ("border-color", json!(p.molecule.stroke.extract())),
                ("border-width", json!(t)),
            ],
        ),
        rule(
            "node.Molecule.drug",
            vec![
                ("color", json!(p.molecule.drug.extract())),
                ("border-color", json!(p.molecule.drug.extract())),
            ],
        ),
        rule(
            "node.EntitySet",
            vec![
                ("background-opacity", json!(0)),
                ("shape", json!("round-rectangle")),
                ("border-width", json!(0)),
            ],
        ),
        rule(
            "node.Complex",
            vec![
                ("shape", json!("cut-rectangle")),
                ("background-opacity", json!(0)),
                ("border-width", json!(0)),
            ],
        ),
        rule(
            "node.Cell",
            vec![
                ("background-opacity", json!(0)),
                ("shape", json!("round-rectangle")),
                ("corner-radius", json!(999999)),
                ("border-width", json!(0)),
            ],
        ),
        rule(
            "node.Pathway",
            vec![
                ("background-color", json!(p.pathway.fill.extract())),
                ("text-margin-x", json!(18)),
            ],
        ),
        rule(
            "node.Interacting.Pathway",
            vec![
                ("shape", json!("rectangle")),
                ("border-color", json!(p.pathway.stroke.extract())),
                ("border-width", json!(3.0 * t)),
                ("border-position", json!("inside")),
            ],
        ),
        rule(
            "node.SUB.Pathway",
            vec![
                ("background-opacity", json!(0)),
                ("shape", json!("round-rectangle")),
            ],
        ),
        rule(
            "node.Pathway.disease",
            vec![
                ("border-color", json!(p.global.negative_contrast.extract())),
                ("color", json!(p.global.negative_contrast.extract())),
            ],
        ),
        rule(
            "node.Modification",
            vec![
                ("background-color", json!(p.modification.fill.extract())),
                ("shape", json!("round-rectangle")),
            ],
        ),
        rule(
            "node.loss-of-function",
            vec![
                ("border-style", json!("dashed")),
                ("border-dash-pattern", json!([t, 2.0 * t])),
                ("border-cap", json!("round")),
            ],
        ),
        rule(
            "node.DiseaseInteractor",
            vec![
                ("shape", json!("round-hexagon")),
                ("background-color", json!(p.global.negative.extract())),
                ("background-opacity", json!(0)),
                ("color", json!(p.global.on_primary.extract())),
                ("text-wrap", json!("ellipsis")),
            ],
        ),
        rule(
            "node.reaction",
            vec![
                ("width", json!(6.0 * t)),
                ("height", json!(6.0 * t)),
                ("shape", json!("round-rectangle")),
                ("text-halign", json!("center")),
                ("text-valign", json!("center")),
                ("border-width", json!(t)),
                ("border-color", json!(p.global.on_surface.extract())),
                ("color", json!(p.global.on_surface.extract())),
                ("background-color", json!(p.global.surface.extract())),
            ],
        ),
        rule(
            "node.reaction[?displayName]",
            vec![
                ("label", data("displayName")),
                ("font-weight", json!(400)),
                ("text-valign", json!("top")),
                ("text-margin-y", json!(-5)),
            ],
        ),
        rule(
            "node.reaction.hover",
            vec![
                ("border-width", json!(t)),
                ("border-color", json!(p.global.hover_edge.extract())),
            ],
        ),
        rule(
            "node.reaction:selected",
            vec![
                ("border-width", json!(1.5 * t)),
                ("border-color", json!(p.global.select_edge.extract())),
            ],
        ),
        rule(
            "node.reaction.flag",
            vec![
                ("outline-width", json!(1.5 * t)),
                ("outline-color", json!(p.global.flag.extract())),
            ],
        ),
        rule(
            "node.association",
            vec![
                ("shape", json!("ellipse")),
                ("background-color", json!(p.global.on_surface.extract())),
            ],
        ),
        rule(
            "node.dissociation",
            vec![
                ("shape", json!("ellipse")),
                ("border-style", json!("double")),
                ("border-width", json!(3.0 * t)),
            ],
        ),
        rule(
            "node.uncertain",
            vec![
                ("label", json!("?")),
                ("text-valign", json!("center")),
                ("text-margin-y", json!(0)),
                ("font-weight", json!(600)),
            ],
        ),
        rule(
            "node.omitted",
            vec![
                ("background-image", json!(omitted_icon(p))),
                ("background-fit", json!("cover")),
                ("background-height", json!("100%")),
                ("background-width", json!("100%")),
            ],
        ),
        rule(
            "edge",
            vec![
                ("curve-style", json!("straight")),
                ("line-cap", json!("round")),
                ("source-endpoint", json!("outside-to-node")),
                ("arrow-scale", json!(1.5)),
                ("width", json!(t)),
                ("color", json!(p.global.on_surface.extract())),
                ("line-color", json!(p.global.on_surface.extract())),
                ("target-arrow-color", json!(p.global.on_surface.extract())),
                ("source-arrow-color", json!(p.global.on_surface.extract())),
            ],
        ),
        rule(
            "edge.disease",
            vec![
                ("color", json!(p.global.negative.extract())),
                ("line-color", json!(p.global.negative.extract())),
                ("target-arrow-color", json!(p.global.negative.extract())),
                ("source-arrow-color", json!(p.global.negative.extract())),
            ],
        ),
        rule(
            "edge.hover",
            vec![
                ("line-color", json!(p.global.hover_edge.extract())),
                ("width", json!(1.5 * t)),
                ("arrow-scale", json!(1)),
                ("source-arrow-color", json!(p.global.hover_edge.extract())),
                ("target-arrow-color", json!(p.global.hover_edge.extract())),
                ("z-index", json!(2)),
            ],
        ),
        rule(
            "edge:selected",
            vec![
                ("line-color", json!(p.global.select_edge.extract())),
                ("width", json!(2.0 * t)),
                ("arrow-scale", json!(1)),
                ("source-arrow-color", json!(p.global.select_edge.extract())),
                ("target-arrow-color", json!(p.global.select_edge.extract())),
                ("z-index", json!(3)),
            ],
        ),
        rule(
            "edge.consumption",
            vec![
                ("target-endpoint", json!("inside-to-node")),
                ("source-endpoint", json!("outside-to-node")),
            ],
        ),
        rule(
            "edge.production",
            vec![("target-arrow-shape", json!("triangle"))],
        ),
        rule(
            "edge.catalysis",
            vec![
                ("target-arrow-shape", json!("circle")),
                ("target-arrow-fill", json!("hollow")),
                ("target-arrow-color", json!(p.global.positive.extract())),
            ],
        ),
        rule(
            "edge.positive-regulation",
            vec![
                ("target-arrow-shape", json!("triangle")),
                ("target-arrow-fill", json!("hollow")),
                ("target-arrow-color", json!(p.global.positive.extract())),
            ],
        ),
        rule(
            "edge.negative-regulation",
            vec![
                ("target-arrow-shape", json!("tee")),
                ("line-cap", json!("butt")),
                ("source-endpoint", json!("inside-to-node")),
                ("target-arrow-color", json!(p.global.negative.extract())),
            ],
        ),
        rule(
            "edge.set-to-member",
            vec![
                ("target-arrow-shape", json!("circle")),
                ("line-style", json!("dashed")),
                ("line-dash-pattern", json!([6, 10])),
                ("opacity", json!(0.5)),
            ],
        ),
        rule(
            "edge[stoichiometry > 1]",
            vec![
                ("text-background-color", json!(p.global.surface.extract())),
                ("text-background-opacity", json!(1)),
                ("text-border-width", json!(t / 2.0)),
                ("text-border-opacity", json!(1)),
                ("text-border-color", json!(p.global.on_surface.extract())),
                ("text-background-shape", json!("roundrectangle")),
                ("text-background-padding", json!(format!("{t}px"))),
            ],
        ),
        rule(
            "edge[stoichiometry > 1].incoming",
            vec![
                ("source-label", data("stoichiometry")),
                ("source-text-offset", json!(30)),
            ],
        ),
        rule(
            "edge[stoichiometry > 1].outgoing",
            vec![
                ("target-label", data("stoichiometry")),
                ("target-text-offset", json!(35)),
            ],
        ),
        rule(
            "edge.shadow[?color]",
            vec![
                ("underlay-color", data("color")),
                ("underlay-padding", json!(20)),
                (
                    "underlay-opacity",
                    json!(shadow_rest_opacity(p) / 100.0),
                ),
            ],
        ),
        rule(
            "edge.flag",
            vec![
                ("underlay-color", json!(p.global.flag.extract())),
                ("underlay-padding", json!(10)),
                ("underlay-opacity", json!(1)),
            ],
        ),
        rule(
            "edge[?weights]",
            vec![
                ("curve-style", json!("round-segments")),
                ("segment-distances", data("distances")),
                ("segment-weights", data("weights")),
                ("segment-radius", json!(30)),
                ("radius-type", json!("influence-radius")),
                ("edge-distances", json!("endpoints")),
            ],
        ),
        rule(
            "edge[?sourceEndpoint]",
            vec![("source-endpoint", data("sourceEndpoint"))],
        ),
        rule(
            "edge[?targetEndpoint]",
            vec![("target-endpoint", data("targetEndpoint"))],
        ),
        rule(".trivial", vec![("opacity", json!(0))]),
    ]
}

/// The shadow underlay opacity at full zoom-out, the first control point of
/// the zoom curve.
fn shadow_rest_opacity(properties: &Properties) -> f64 {
    properties
        .shadow
        .opacity
        .extract()
        .first()
        .map(|&(_, v)| v)
        .unwrap_or(0.0)
}

/// Resolve the image-driven declarations for one node. These are the
/// per-element style functions of the rule list; they go through the image
/// engine so repeated applications hit the cache.
pub fn node_image_style(engine: &ImageEngine, node: &NodeHandle) -> Map<String, Value> {
    let image = engine.build_image(node);
    let mut style = Map::new();
    style.insert("background-image".to_string(), json!(image.background_image));
    style.insert(
        "background-position-x".to_string(),
        json!(image.background_position_x),
    );
    style.insert(
        "background-position-y".to_string(),
        json!(image.background_position_y),
    );
    style.insert("background-width".to_string(), json!(image.background_width));
    style.insert(
        "background-height".to_string(),
        json!(image.background_height),
    );
    style.insert("background-clip".to_string(), json!(image.background_clip));
    style.insert(
        "background-image-containment".to_string(),
        json!(image.background_image_containment),
    );
    style.insert(
        "background-image-opacity".to_string(),
        json!(image.background_image_opacity),
    );
    style.insert(
        "bounds-expansion".to_string(),
        json!(image.bounds_expansion.first().copied().unwrap_or(0.0)),
    );
    style
}

/// Give every subpathway cluster an evenly hue-spaced color and propagate it
/// to the member reaction edges, so cluster underlays match their label.
pub fn assign_subpathway_colors(properties: &Properties, elements: &mut Elements) {
    let shadow_count = elements
        .nodes
        .iter()
        .filter(|n| n.has_class("Shadow"))
        .count();
    let palette = spaced_palette(shadow_count, properties.shadow.luminosity.extract() as f32);

    let mut color_by_reactome: HashMap<i64, String> = HashMap::new();
    let mut next = 0;
    for node in elements.nodes.iter_mut() {
        if !node.has_class("Shadow") {
            continue;
        }
        let hex = palette[next].to_hex();
        next += 1;
        node.data.color = Some(hex.clone());
        if let Some(reactome_id) = node.data.reactome_id {
            color_by_reactome.insert(reactome_id, hex);
        }
    }

    for edge in elements.edges.iter_mut() {
        if let Some(pathway) = edge.data.pathway {
            edge.data.color = color_by_reactome.get(&pathway).cloned();
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{assign_subpathway_colors, compile, node_image_style};
    use crate::diagram::types::{EdgeData, EdgeDefinition, Elements, NodeData, NodeDefinition};
    use crate::image::{ImageEngine, NodeHandle};
    use crate::properties::Properties;

    fn find<'a>(rules: &'a [super::StyleRule], selector: &str) -> &'a super::StyleRule {
        rules
            .iter()
            .find(|r| r.selector == selector)
            .unwrap_or_else(|| panic!("missing rule {}", selector))
    }

    #[test]
    fn category_rules_carry_their_fill() {
        let rules = compile(&Properties::default());
        assert_eq!(
            find(&rules, "node.Protein").style["background-color"],
            json!("#001F29")
        );
        assert_eq!(
            find(&rules, "node.reaction").style["width"],
            json!(24.0)
        );
        assert_eq!(
            find(&rules, "edge.catalysis").style["target-arrow-shape"],
            json!("circle")
        );
    }

    #[test]
    fn omitted_reactions_get_an_icon() {
        let rules = compile(&Properties::default());
        let icon = &find(&rules, "node.omitted").style["background-image"];
        assert!(icon.as_str().unwrap().starts_with("data:image/svg+xml"));
    }

    #[test]
    fn image_style_resolves_through_the_engine() {
        let engine = ImageEngine::new(Properties::default());
        let node = NodeHandle {
            id: "1".to_string(),
            classes: vec!["Protein".to_string(), "flag".to_string()],
            width: 100.0,
            height: 60.0,
            selected: false,
        };
        let style = node_image_style(&engine, &node);
        assert_eq!(style["background-image"].as_array().unwrap().len(), 1);
        assert_eq!(style["bounds-expansion"], json!(8.0));
    }

    #[test]
    fn subpathway_colors_are_distinct_and_propagate() {
        let shadow = |id: &str, reactome_id: i64| NodeDefinition {
            data: NodeData {
                id: id.to_string(),
                reactome_id: Some(reactome_id),
                ..Default::default()
            },
            classes: vec!["Shadow".to_string()],
            ..Default::default()
        };
        let mut elements = Elements {
            nodes: vec![shadow("90", 900), shadow("91", 901)],
            edges: vec![EdgeDefinition {
                data: EdgeData {
                    id: "e".to_string(),
                    pathway: Some(901),
                    ..Default::default()
                },
                classes: vec!["shadow".to_string()],
                ..Default::default()
            }],
        };
        assign_subpathway_colors(&Properties::default(), &mut elements);

        let first = elements.nodes[0].data.color.clone().unwrap();
        let second = elements.nodes[1].data.color.clone().unwrap();
        assert_ne!(first, second);
        assert_eq!(elements.edges[0].data.color.as_deref(), Some(second.as_str()));
    }
}
