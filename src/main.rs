use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser;
use pathvis::diagram::{self, Diagram, Graph};
use pathvis::fonts::CosmicTextMeasure;
use pathvis::image::standalone_svg;
use pathvis::properties::{Properties, UserProperties};
use pathvis::shape::{self, Image, NodeCategory, ShapeFlags, ShapeParams};
use pathvis::style;
use pathvis::theme::ThemeVars;
use pathvis::xml::escape_xml;
use resvg::usvg;
use tiny_skia::{Pixmap, Transform};

/// Pathway diagram translator: layout JSON in, renderer-ready elements out
#[derive(Parser, Debug)]
#[command(name = "pathvis")]
#[command(version)]
#[command(about = "Translate pathway diagram JSON into renderer-ready elements and styles", long_about = None)]
struct Args {
    /// Diagram JSON file, or a bare pathway identifier when --server is given
    #[arg(value_name = "INPUT")]
    input: String,

    /// Companion graph JSON file (defaults to INPUT with a .graph.json suffix)
    #[arg(short, long, value_name = "GRAPH")]
    graph: Option<PathBuf>,

    /// Output file for the element/style document (stdout if omitted)
    #[arg(short, long, value_name = "OUTPUT")]
    output: Option<PathBuf>,

    /// Theme token file (TOML or YAML)
    #[arg(short, long, value_name = "THEME")]
    theme: Option<PathBuf>,

    /// Property override file (JSON)
    #[arg(short, long, value_name = "PROPERTIES")]
    properties: Option<PathBuf>,

    /// Base URL serving <id>.json and <id>.graph.json documents
    #[arg(short, long, value_name = "SERVER")]
    server: Option<String>,

    /// Directory to dump per-category icon artwork into
    #[arg(long, value_name = "DIR")]
    icons: Option<PathBuf>,

    /// Also rasterize dumped icons to PNG
    #[arg(long)]
    raster: bool,

    /// Raster scale multiplier for PNG output (e.g. 2.0 for sharper output)
    #[arg(long, default_value_t = 1.0)]
    png_scale: f32,
}

fn main() -> Result<(), String> {
    env_logger::init();
    let args = Args::parse();

    // Load theme tokens
    let vars = if let Some(ref theme_path) = args.theme {
        if theme_path.exists() && theme_path.is_file() {
            let content = fs::read_to_string(theme_path)
                .map_err(|e| format!("Failed to read theme file: {}", e))?;

            // Try TOML first, then YAML
            if let Ok(vars) = ThemeVars::from_toml(&content) {
                vars
            } else if let Ok(vars) = ThemeVars::from_yaml(&content) {
                vars
            } else {
                return Err("Failed to parse theme file as TOML or YAML".to_string());
            }
        } else {
            return Err(format!("Theme file not found: {}", theme_path.display()));
        }
    } else {
        ThemeVars::default()
    };

    let user = if let Some(ref properties_path) = args.properties {
        let content = fs::read_to_string(properties_path)
            .map_err(|e| format!("Failed to read properties file: {}", e))?;
        serde_json::from_str::<UserProperties>(&content)
            .map_err(|e| format!("Failed to parse properties file: {}", e))?
    } else {
        UserProperties::default()
    };
    let properties = Properties::resolve(user, vars);

    // Both documents must be ready before any translation happens; a failed
    // fetch is reported as-is and nothing renders.
    let (diagram_text, graph_text) = if let Some(ref server) = args.server {
        let base = server.trim_end_matches('/');
        (
            fetch(&format!("{}/{}.json", base, args.input))?,
            fetch(&format!("{}/{}.graph.json", base, args.input))?,
        )
    } else {
        let input = PathBuf::from(&args.input);
        let graph_path = args
            .graph
            .clone()
            .unwrap_or_else(|| derive_graph_path(&input));
        (
            fs::read_to_string(&input)
                .map_err(|e| format!("Failed to read input file: {}", e))?,
            fs::read_to_string(&graph_path)
                .map_err(|e| format!("Failed to read graph file: {}", e))?,
        )
    };

    let diagram = Diagram::from_json(&diagram_text)?;
    let graph = Graph::from_json(&graph_text)?;

    let mut measure = CosmicTextMeasure::new()?;
    let mut elements = diagram::build(&diagram, &graph, &mut measure);
    style::assign_subpathway_colors(&properties, &mut elements);
    let styles = style::compile(&properties);

    let document = serde_json::json!({ "elements": elements, "style": styles });
    let serialized = serde_json::to_string_pretty(&document)
        .map_err(|e| format!("Failed to serialize output: {}", e))?;

    match &args.output {
        Some(path) => {
            fs::write(path, serialized).map_err(|e| format!("Failed to write output: {}", e))?;
            eprintln!("Elements saved to: {}", path.display());
        }
        None => println!("{}", serialized),
    }

    if let Some(ref dir) = args.icons {
        dump_icons(&properties, dir, args.raster, args.png_scale)?;
    }

    Ok(())
}

fn fetch(url: &str) -> Result<String, String> {
    let mut response = ureq::get(url)
        .call()
        .map_err(|e| format!("Failed to fetch {}: {}", url, e))?;
    response
        .body_mut()
        .read_to_string()
        .map_err(|e| format!("Failed to read response from {}: {}", url, e))
}

fn derive_graph_path(input: &Path) -> PathBuf {
    match input.to_str() {
        Some(s) if s.ends_with(".json") => {
            PathBuf::from(format!("{}.graph.json", s.trim_end_matches(".json")))
        }
        _ => input.with_extension("graph.json"),
    }
}

/// Write each category's per-state artwork as standalone SVG documents, a
/// quick way to eyeball generator output without a host application.
fn dump_icons(
    properties: &Properties,
    dir: &Path,
    raster: bool,
    png_scale: f32,
) -> Result<(), String> {
    fs::create_dir_all(dir).map_err(|e| format!("Failed to create icon directory: {}", e))?;

    let params = ShapeParams {
        width: 200.0,
        height: 100.0,
        flags: ShapeFlags::default(),
    };

    for category in NodeCategory::ALL {
        let drawn = shape::draw(category, properties, &params);
        let mut layers: Vec<(String, &Image)> = Vec::new();
        if let Some(image) = &drawn.background {
            layers.push(("background".to_string(), image));
        }
        if let Some(image) = &drawn.hover {
            layers.push(("hover".to_string(), image));
        }
        if let Some(image) = &drawn.select {
            layers.push(("select".to_string(), image));
        }
        if let Some(image) = &drawn.flag {
            layers.push(("flag".to_string(), image));
        }
        for (i, image) in drawn.decorators.iter().enumerate() {
            layers.push((format!("decorator-{}", i), image));
        }

        for (state, image) in layers {
            let width = image.width.unwrap_or(params.width);
            let height = image.height.unwrap_or(params.height);
            let title = escape_xml(&format!("{} {}", category.as_class(), state));
            let svg = standalone_svg(
                &format!("<title>{}</title>{}", title, image.markup),
                width,
                height,
            );
            let name = format!("{}-{}", category.as_class().to_lowercase(), state);
            fs::write(dir.join(format!("{}.svg", name)), &svg)
                .map_err(|e| format!("Failed to write icon SVG: {}", e))?;
            if raster {
                let png = svg_to_png(&svg, png_scale)?;
                fs::write(dir.join(format!("{}.png", name)), png)
                    .map_err(|e| format!("Failed to write icon PNG: {}", e))?;
            }
        }
    }

    eprintln!("Icon artwork saved to: {}", dir.display());
    Ok(())
}

fn svg_to_png(svg: &str, scale: f32) -> Result<Vec<u8>, String> {
    if !scale.is_finite() || scale <= 0.0 {
        return Err(format!("Invalid --png-scale value: {}", scale));
    }

    let opts = usvg::Options::default();
    let tree =
        usvg::Tree::from_str(svg, &opts).map_err(|e| format!("Failed to parse SVG: {}", e))?;

    let svg_width = (tree.size().width() * scale).ceil() as u32;
    let svg_height = (tree.size().height() * scale).ceil() as u32;

    let mut pixmap = Pixmap::new(svg_width, svg_height).ok_or("Failed to create pixmap")?;
    let transform = Transform::from_scale(scale, scale);

    resvg::render(&tree, transform, &mut pixmap.as_mut());

    pixmap
        .encode_png()
        .map_err(|e| format!("Failed to encode PNG: {}", e))
}
