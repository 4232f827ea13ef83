use std::num::NonZeroUsize;
use std::sync::Arc;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use lru::LruCache;
use parking_lot::Mutex;
use serde::Serialize;

use crate::properties::Properties;
use crate::shape::{self, Image, NodeCategory, Shape, ShapeFlags, ShapeParams};

const SHAPE_CACHE_SIZE: usize = 256;
const AGGREGATE_CACHE_SIZE: usize = 4096;

/// A node as the image engine sees it: identity, class list, dimensions and
/// selection state. Mirrors the handle a rendering library passes to its
/// per-node style resolvers.
#[derive(Debug, Clone)]
pub struct NodeHandle {
    pub id: String,
    pub classes: Vec<String>,
    pub width: f64,
    pub height: f64,
    pub selected: bool,
}

impl NodeHandle {
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    fn shape_flags(&self) -> ShapeFlags {
        ShapeFlags {
            drug: self.has_class("drug"),
            disease: self.has_class("disease"),
            crossed: self.has_class("crossed"),
            interactor: self.has_class("Interactor"),
            loss_of_function: self.has_class("loss-of-function"),
        }
    }
}

/// Flattened layer stack. Every property holds one entry per layer so a
/// multi-background renderer can composite them in registration order;
/// `bounds-expansion` is collapsed to the single maximum across layers.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct AggregatedImage {
    pub background_image: Vec<String>,
    pub background_position_x: Vec<f64>,
    pub background_position_y: Vec<f64>,
    pub background_width: Vec<String>,
    pub background_height: Vec<String>,
    pub background_fit: Vec<String>,
    pub background_clip: Vec<String>,
    pub background_image_opacity: Vec<f64>,
    pub background_image_containment: Vec<String>,
    pub background_image_smoothing: Vec<String>,
    pub background_repeat: Vec<String>,
    pub bounds_expansion: Vec<f64>,
}

#[derive(Hash, PartialEq, Eq, Clone)]
struct ShapeKey {
    category: NodeCategory,
    width_bits: u64,
    height_bits: u64,
    flags: ShapeFlags,
}

#[derive(Hash, PartialEq, Eq, Clone)]
struct AggregateKey {
    id: String,
    classes: String,
    selected: bool,
}

impl AggregateKey {
    fn new(node: &NodeHandle) -> Self {
        let mut classes = node.classes.clone();
        classes.sort();
        Self {
            id: node.id.clone(),
            classes: classes.join(" "),
            selected: node.selected,
        }
    }
}

/// Builds and caches the per-node layer stacks.
///
/// Two independent memo layers: shape artwork keyed on the generator inputs,
/// and the flattened aggregate keyed on node identity + class list +
/// selection. Both embed resolved property values, so both are dropped
/// together by [`ImageEngine::clear`] whenever those values change.
pub struct ImageEngine {
    properties: Properties,
    shape_cache: Mutex<LruCache<ShapeKey, Arc<Shape>>>,
    aggregate_cache: Mutex<LruCache<AggregateKey, Arc<AggregatedImage>>>,
}

impl ImageEngine {
    pub fn new(properties: Properties) -> Self {
        Self {
            properties,
            shape_cache: Mutex::new(LruCache::new(
                NonZeroUsize::new(SHAPE_CACHE_SIZE).unwrap(),
            )),
            aggregate_cache: Mutex::new(LruCache::new(
                NonZeroUsize::new(AGGREGATE_CACHE_SIZE).unwrap(),
            )),
        }
    }

    pub fn properties(&self) -> &Properties {
        &self.properties
    }

    /// Drop every cached shape and aggregate in one step. Must be called
    /// before restyling whenever resolved property values change; cached SVG
    /// embeds colors literally, so stale entries would be wrong, not merely
    /// slow.
    pub fn clear(&self) {
        let mut shapes = self.shape_cache.lock();
        let mut aggregates = self.aggregate_cache.lock();
        shapes.clear();
        aggregates.clear();
    }

    pub fn shape_for(&self, category: NodeCategory, params: &ShapeParams) -> Arc<Shape> {
        let key = ShapeKey {
            category,
            width_bits: params.width.to_bits(),
            height_bits: params.height.to_bits(),
            flags: params.flags,
        };
        if let Some(shape) = self.shape_cache.lock().get(&key) {
            return Arc::clone(shape);
        }
        let shape = Arc::new(shape::draw(category, &self.properties, params));
        self.shape_cache.lock().put(key, Arc::clone(&shape));
        shape
    }

    /// Resolve a node handle into its flattened, cached layer stack.
    pub fn build_image(&self, node: &NodeHandle) -> Arc<AggregatedImage> {
        let key = AggregateKey::new(node);
        if let Some(aggregated) = self.aggregate_cache.lock().get(&key) {
            return Arc::clone(aggregated);
        }

        let aggregated = Arc::new(self.compose(node));
        self.aggregate_cache.lock().put(key, Arc::clone(&aggregated));
        aggregated
    }

    fn compose(&self, node: &NodeHandle) -> AggregatedImage {
        let category = node
            .classes
            .iter()
            .find_map(|class| NodeCategory::from_class(class));
        let Some(category) = category else {
            return aggregate(&[], node);
        };

        let flags = node.shape_flags();
        let params = ShapeParams {
            width: node.width,
            height: node.height,
            flags,
        };
        let shape = self.shape_for(category, &params);

        let mut layers: Vec<Image> = Vec::new();

        if node.has_class("flag") {
            if let Some(flag) = &shape.flag {
                layers.push(flag.clone());
            }
        }
        if let Some(background) = &shape.background {
            layers.push(background.clone());
        }
        if node.selected {
            if let Some(select) = &shape.select {
                layers.push(select.clone());
            }
        }
        if node.has_class("hover") {
            if let Some(hover) = &shape.hover {
                layers.push(hover.clone());
            }
        }
        layers.extend(shape.decorators.iter().cloned());

        if flags.drug {
            layers.push(self.drug_marker(&params, category));
        }
        if node.has_class("Pathway") {
            layers.push(self.pathway_marker(&params));
        }
        if flags.crossed {
            layers.push(self.cross_overlay(&params));
        }

        aggregate(&layers, node)
    }

    /// "Rx" prescription glyph shown on drug variants. Molecules are light so
    /// they take the drug contrast color instead of the on-primary one.
    fn drug_marker(&self, params: &ShapeParams, category: NodeCategory) -> Image {
        let t = self.properties.global.thickness.extract();
        let color = if category != NodeCategory::Molecule {
            self.properties.global.on_primary.extract()
        } else {
            self.properties.molecule.drug.extract()
        };
        let inset = if category != NodeCategory::EntitySet {
            0.0
        } else {
            self.properties.entity_set.radius.extract()
        };
        let x = inset + 3.0 * t;

        Image {
            markup: format!(
                r#"<path style="transform: scale(2)" fill="{color}" stroke-width="0.4" stroke="{color}" d="M3.2 4C3.3 4 3.4 4 3.6 4L6.75 8.81L5.7 10.15C5.7 10.15 5.53985 10.3884 5.31824 10.6092C5.00434 10.922 4.6582 11.3 4.28711 11.3C4.19141 11.3 4.2 11.3 4.1 11.3V11.5H6.4V11.3C6.2 11.3 6 11.3 5.9 11.2C5.8 11.1 5.8 11 5.8 10.9C5.8 10.6301 5.9 10.5547 6.16055 10.226L7 9.2L7.65291 10.226C7.82889 10.5025 8 10.7344 8 10.9C8 11.0656 7.90095 11.3 7.65291 11.3C7.55291 11.3 7.6 11.3 7.4 11.3V11.5H10.2V11.3C9.9 11.3 9.7 11.2 9.5 11C9.24121 10.7412 9 10.5 8.6 10L7.6 8.5L8.48711 7.35309C8.55228 7.28792 8.61656 7.21558 8.68081 7.13924C9.09787 6.6437 9.64859 6 10.2 6.01309V5.81309H7.8V6.01309C8 6.01309 8.2 6.01309 8.3 6.01309C8.45586 6.01309 8.6 6.20329 8.6 6.31309C8.6 6.62136 8.43963 6.81922 8.2462 7.03337L7.3 8.1L4.5 3.9C5.1 3.8 5.4 3.61 5.7 3.31C6 3.01 6.2 2.6 6.2 2.2C6.2 1.8 6.08711 1.47 5.78711 1.17C5.52798 0.910875 5.3 0.8 5 0.7C4.6 0.6 4.1 0.5 3.4 0.5H1V0.7H1.2C1.82201 0.7 2 1.14292 2 1.7V6C2 6.59634 2 6.9 1.2 6.9H1V7.1H3.8V6.9H3.6C2.9041 6.9 2.9 6.61047 2.9 6V4H3H3.2ZM3 3.7C3 3.7 3 3.7 2.9 3.7L2.88711 1C3.18711 0.9 3.4 0.9 3.6 0.9C4.47782 0.9 5 1.42405 5 2.3C5 3.40743 4.15401 3.7 3.2 3.7H3Z"/>"#,
            ),
            position_x: Some(x),
            position_y: Some(params.height / 2.0 - 11.0),
            width: Some(22.0),
            height: Some(24.0),
            ..Default::default()
        }
    }

    /// Interlocking-links glyph marking pathway nodes.
    fn pathway_marker(&self, params: &ShapeParams) -> Image {
        let t = self.properties.global.thickness.extract();
        let color = if !params.flags.disease {
            self.properties.global.on_primary.extract()
        } else {
            self.properties.global.negative_contrast.extract()
        };

        Image {
            markup: format!(
                r#"<path style="transform: scale(1.5)" fill="{color}" stroke-width="0.4" stroke="{color}" d="M19.6864 21.0381C19.0364 21.0381 18.4531 20.8508 17.9364 20.4761C17.4197 20.1008 17.0614 19.6214 16.8614 19.0381H11.6864C10.5864 19.0381 9.64473 18.6464 8.8614 17.8631C8.07807 17.0798 7.6864 16.1381 7.6864 15.0381C7.6864 13.9381 8.07807 12.9964 8.8614 12.2131C9.64473 11.4298 10.5864 11.0381 11.6864 11.0381H13.6864C14.2364 11.0381 14.7074 10.8421 15.0994 10.4501C15.4907 10.0588 15.6864 9.58809 15.6864 9.03809C15.6864 8.48809 15.4907 8.01709 15.0994 7.62509C14.7074 7.23375 14.2364 7.03809 13.6864 7.03809H8.5114C8.29473 7.62142 7.9324 8.10075 7.4244 8.47609C6.91573 8.85075 6.3364 9.03809 5.6864 9.03809C4.85307 9.03809 4.14473 8.74642 3.5614 8.16309C2.97807 7.57975 2.6864 6.87142 2.6864 6.03809C2.6864 5.20475 2.97807 4.49642 3.5614 3.91309C4.14473 3.32975 4.85307 3.03809 5.6864 3.03809C6.3364 3.03809 6.91573 3.22542 7.4244 3.60009C7.9324 3.97542 8.29473 4.45475 8.5114 5.03809H13.6864C14.7864 5.03809 15.7281 5.42975 16.5114 6.21309C17.2947 6.99642 17.6864 7.93809 17.6864 9.03809C17.6864 10.1381 17.2947 11.0798 16.5114 11.8631C15.7281 12.6464 14.7864 13.0381 13.6864 13.0381H11.6864C11.1364 13.0381 10.6657 13.2338 10.2744 13.6251C9.8824 14.0171 9.6864 14.4881 9.6864 15.0381C9.6864 15.5881 9.8824 16.0591 10.2744 16.4511C10.6657 16.8424 11.1364 17.0381 11.6864 17.0381H16.8614C17.0781 16.4548 17.4407 15.9754 17.9494 15.6001C18.4574 15.2254 19.0364 15.0381 19.6864 15.0381C20.5197 15.0381 21.2281 15.3298 21.8114 15.9131C22.3947 16.4964 22.6864 17.2048 22.6864 18.0381C22.6864 18.8714 22.3947 19.5798 21.8114 20.1631C21.2281 20.7464 20.5197 21.0381 19.6864 21.0381ZM5.6864 7.03809C5.96973 7.03809 6.2074 6.94242 6.3994 6.75109C6.59073 6.55909 6.6864 6.32142 6.6864 6.03809C6.6864 5.75475 6.59073 5.51709 6.3994 5.32509C6.2074 5.13375 5.96973 5.03809 5.6864 5.03809C5.40307 5.03809 5.1654 5.13375 4.9734 5.32509C4.78207 5.51709 4.6864 5.75475 4.6864 6.03809C4.6864 6.32142 4.78207 6.55909 4.9734 6.75109C5.1654 6.94242 5.40307 7.03809 5.6864 7.03809Z" />"#,
            ),
            position_x: Some(5.0 * t),
            position_y: Some(params.height / 2.0 - 18.0),
            width: Some(36.0),
            height: Some(36.0),
            ..Default::default()
        }
    }

    /// Cross-out drawn over the whole node box.
    fn cross_overlay(&self, params: &ShapeParams) -> Image {
        let s = self.properties.global.negative.extract();
        let t = self.properties.global.thickness.extract();
        let (w, h) = (params.width, params.height);
        Image {
            markup: format!(
                r#"<line x1="{t}" y1="{t}" x2="{x2}" y2="{y2}" stroke-width="{sw}" stroke-linecap="round" stroke="{s}"/><line x1="{t}" y1="{y2}" x2="{x2}" y2="{t}" stroke-width="{sw}" stroke-linecap="round" stroke="{s}"/>"#,
                x2 = w - t,
                y2 = h - t,
                sw = 2.0 * t,
            ),
            opacity: Some(1.0),
            ..Default::default()
        }
    }
}

/// Hash-mark icon for omitted-process reaction boxes; rendered once per style
/// application, not per node, so it is not routed through the caches.
pub fn omitted_icon(properties: &Properties) -> String {
    let s = properties.global.on_surface.extract();
    svg_data_uri(
        &format!(
            r#"<line x1="2.5" y1="3" x2="4.5" y2="7" stroke-width="1.5" stroke-linecap="round" stroke="{s}"/><line x1="5.5" y1="3" x2="7.5" y2="7" stroke-width="1.5" stroke-linecap="round" stroke="{s}"/>"#
        ),
        10.0,
        10.0,
    )
}

/// Wrap an SVG fragment into a standalone document sized to the layer.
pub fn standalone_svg(fragment: &str, width: f64, height: f64) -> String {
    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?><svg xmlns='http://www.w3.org/2000/svg' version='1.1' width='{width}' height='{height}'>{fragment}</svg>"
    )
}

pub fn svg_data_uri(fragment: &str, width: f64, height: f64) -> String {
    format!(
        "data:image/svg+xml;base64,{}",
        BASE64.encode(standalone_svg(fragment, width, height))
    )
}

fn aggregate(layers: &[Image], node: &NodeHandle) -> AggregatedImage {
    let mut aggregated = AggregatedImage {
        background_image: Vec::with_capacity(layers.len()),
        background_position_x: Vec::with_capacity(layers.len()),
        background_position_y: Vec::with_capacity(layers.len()),
        background_width: Vec::with_capacity(layers.len()),
        background_height: Vec::with_capacity(layers.len()),
        background_fit: Vec::with_capacity(layers.len()),
        background_clip: Vec::with_capacity(layers.len()),
        background_image_opacity: Vec::with_capacity(layers.len()),
        background_image_containment: Vec::with_capacity(layers.len()),
        background_image_smoothing: Vec::with_capacity(layers.len()),
        background_repeat: Vec::with_capacity(layers.len()),
        bounds_expansion: Vec::new(),
    };

    let mut max_expansion: f64 = 0.0;
    for layer in layers {
        let width = layer.width.unwrap_or(node.width);
        let height = layer.height.unwrap_or(node.height);
        aggregated
            .background_image
            .push(svg_data_uri(&layer.markup, width, height));
        aggregated
            .background_position_x
            .push(layer.position_x.unwrap_or(0.0));
        aggregated
            .background_position_y
            .push(layer.position_y.unwrap_or(0.0));
        aggregated.background_width.push(
            layer
                .width
                .map_or_else(|| "100%".to_string(), |w| w.to_string()),
        );
        aggregated.background_height.push(
            layer
                .height
                .map_or_else(|| "100%".to_string(), |h| h.to_string()),
        );
        aggregated.background_fit.push("none".to_string());
        aggregated
            .background_clip
            .push(layer.clip.unwrap_or("none").to_string());
        aggregated
            .background_image_opacity
            .push(layer.opacity.unwrap_or(1.0));
        aggregated
            .background_image_containment
            .push(layer.containment.unwrap_or("over").to_string());
        aggregated
            .background_image_smoothing
            .push("yes".to_string());
        aggregated.background_repeat.push("no-repeat".to_string());
        max_expansion = max_expansion.max(layer.bounds_expansion.unwrap_or(0.0));
    }
    // The clickable bounds grow only as far as the most expansive layer, so
    // the collapse is a max, never a sum.
    aggregated.bounds_expansion = vec![max_expansion];
    aggregated
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use parking_lot::Mutex;

    use super::{ImageEngine, NodeHandle, svg_data_uri};
    use crate::properties::{Properties, Property, UserProperties};
    use crate::theme::ThemeVars;

    fn protein_node(id: &str, classes: &[&str], selected: bool) -> NodeHandle {
        NodeHandle {
            id: id.to_string(),
            classes: classes.iter().map(|c| c.to_string()).collect(),
            width: 100.0,
            height: 60.0,
            selected,
        }
    }

    #[test]
    fn aggregate_arrays_are_uniform_length() {
        let engine = ImageEngine::new(Properties::default());
        let node = protein_node(
            "1",
            &["Protein", "PhysicalEntity", "flag", "hover", "drug"],
            true,
        );
        let image = engine.build_image(&node);
        // flag + select + hover + drug marker for a protein.
        let layers = image.background_image.len();
        assert_eq!(layers, 4);
        assert_eq!(image.background_position_x.len(), layers);
        assert_eq!(image.background_position_y.len(), layers);
        assert_eq!(image.background_width.len(), layers);
        assert_eq!(image.background_height.len(), layers);
        assert_eq!(image.background_clip.len(), layers);
        assert_eq!(image.background_image_opacity.len(), layers);
        // Collapsed, not per-layer.
        assert_eq!(image.bounds_expansion.len(), 1);
    }

    #[test]
    fn bounds_expansion_is_the_max_not_the_sum() {
        let engine = ImageEngine::new(Properties::default());
        let node = protein_node("1", &["Protein", "PhysicalEntity", "flag", "hover"], true);
        let image = engine.build_image(&node);
        // flag expands by 2t = 8, hover/select by t = 4.
        assert_eq!(image.bounds_expansion, vec![8.0]);
    }

    #[test]
    fn unknown_category_composes_an_empty_stack() {
        let engine = ImageEngine::new(Properties::default());
        let node = protein_node("c0", &["Compartment", "outer"], false);
        let image = engine.build_image(&node);
        assert!(image.background_image.is_empty());
        assert_eq!(image.bounds_expansion, vec![0.0]);
    }

    #[test]
    fn same_state_returns_the_cached_object_until_cleared() {
        let fill = Arc::new(Mutex::new("#001F29".to_string()));
        let fill_reader = Arc::clone(&fill);

        let mut properties = Properties::resolve(UserProperties::default(), ThemeVars::default());
        properties.protein.fill = Property::Provider(Arc::new(move || fill_reader.lock().clone()));

        let engine = ImageEngine::new(properties);
        let node = protein_node("1", &["Protein", "PhysicalEntity", "flag"], false);

        let first = engine.build_image(&node);
        let second = engine.build_image(&node);
        assert!(Arc::ptr_eq(&first, &second));

        // The provider value changes, but the cache still answers until it is
        // explicitly invalidated.
        *fill.lock() = "#ff0000".to_string();
        let stale = engine.build_image(&node);
        assert!(Arc::ptr_eq(&first, &stale));

        engine.clear();
        let fresh = engine.build_image(&node);
        assert!(!Arc::ptr_eq(&first, &fresh));
        assert_ne!(first.background_image, fresh.background_image);
    }

    #[test]
    fn selection_is_part_of_the_cache_key() {
        let engine = ImageEngine::new(Properties::default());
        let unselected = engine.build_image(&protein_node("1", &["Protein"], false));
        let selected = engine.build_image(&protein_node("1", &["Protein"], true));
        assert_ne!(
            unselected.background_image.len(),
            selected.background_image.len()
        );
    }

    #[test]
    fn data_uri_is_base64_svg() {
        let uri = svg_data_uri("<rect width=\"4\" height=\"4\"/>", 4.0, 4.0);
        assert!(uri.starts_with("data:image/svg+xml;base64,"));
    }
}
