use std::fmt;
use std::sync::Arc;

use serde::Deserialize;

use crate::theme::ThemeVars;

pub type Provider<T> = Arc<dyn Fn() -> T + Send + Sync>;

/// A configuration cell holding either a fixed value or a provider that is
/// re-evaluated on every extraction.
#[derive(Clone)]
pub enum Property<T> {
    Value(T),
    Provider(Provider<T>),
}

impl<T: Clone> Property<T> {
    pub fn extract(&self) -> T {
        match self {
            Property::Value(value) => value.clone(),
            Property::Provider(provider) => provider(),
        }
    }
}

impl<T: Clone> From<T> for Property<T> {
    fn from(value: T) -> Self {
        Property::Value(value)
    }
}

impl<T: fmt::Debug> fmt::Debug for Property<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Property::Value(value) => write!(f, "Value({:?})", value),
            Property::Provider(_) => write!(f, "Provider(..)"),
        }
    }
}

pub type Curve = Vec<(f64, f64)>;

#[derive(Debug, Clone)]
pub struct GlobalProps {
    pub thickness: Property<f64>,
    pub surface: Property<String>,
    pub on_surface: Property<String>,
    pub primary: Property<String>,
    pub on_primary: Property<String>,
    pub positive: Property<String>,
    pub negative: Property<String>,
    pub negative_contrast: Property<String>,
    pub select_node: Property<String>,
    pub select_edge: Property<String>,
    pub hover_node: Property<String>,
    pub hover_edge: Property<String>,
    pub flag: Property<String>,
}

#[derive(Debug, Clone)]
pub struct CompartmentProps {
    pub fill: Property<String>,
    pub opacity: Property<f64>,
}

#[derive(Debug, Clone)]
pub struct ShadowProps {
    pub luminosity: Property<f64>,
    pub opacity: Property<Curve>,
    pub label_opacity: Property<Curve>,
}

#[derive(Debug, Clone)]
pub struct ProteinProps {
    pub fill: Property<String>,
    pub drug: Property<String>,
    pub radius: Property<f64>,
}

#[derive(Debug, Clone)]
pub struct GenomeEncodedEntityProps {
    pub fill: Property<String>,
    pub drug: Property<String>,
    pub bottom_radius: Property<f64>,
    pub top_radius: Property<f64>,
}

#[derive(Debug, Clone)]
pub struct RnaProps {
    pub fill: Property<String>,
    pub drug: Property<String>,
    pub radius: Property<f64>,
}

#[derive(Debug, Clone)]
pub struct GeneProps {
    pub fill: Property<String>,
    pub decoration_height: Property<f64>,
    pub decoration_extra_width: Property<f64>,
    pub arrow_head_size: Property<f64>,
    pub border_radius: Property<f64>,
    pub arrow_radius: Property<f64>,
}

#[derive(Debug, Clone)]
pub struct MoleculeProps {
    pub fill: Property<String>,
    pub stroke: Property<String>,
    pub drug: Property<String>,
}

#[derive(Debug, Clone)]
pub struct ComplexProps {
    pub fill: Property<String>,
    pub stroke: Property<String>,
    pub drug: Property<String>,
    pub cut: Property<f64>,
}

#[derive(Debug, Clone)]
pub struct EntitySetProps {
    pub fill: Property<String>,
    pub stroke: Property<String>,
    pub drug: Property<String>,
    pub radius: Property<f64>,
}

#[derive(Debug, Clone)]
pub struct CellProps {
    pub thickness: Property<f64>,
    pub fill: Property<String>,
    pub stroke: Property<String>,
}

#[derive(Debug, Clone)]
pub struct PathwayProps {
    pub fill: Property<String>,
    pub stroke: Property<String>,
}

#[derive(Debug, Clone)]
pub struct ModificationProps {
    pub fill: Property<String>,
}

#[derive(Debug, Clone)]
pub struct InteractorProps {
    pub fill: Property<String>,
    pub stroke: Property<String>,
    pub decoration_width: Property<f64>,
}

#[derive(Debug, Clone)]
pub struct TrivialProps {
    pub opacity: Property<Curve>,
}

#[derive(Debug, Clone)]
pub struct FontProps {
    pub size: Property<f64>,
}

/// The full resolved property tree consumed by the shape generators, the
/// image engine and the style compiler.
#[derive(Debug, Clone)]
pub struct Properties {
    pub global: GlobalProps,
    pub compartment: CompartmentProps,
    pub shadow: ShadowProps,
    pub protein: ProteinProps,
    pub genome_encoded_entity: GenomeEncodedEntityProps,
    pub rna: RnaProps,
    pub gene: GeneProps,
    pub molecule: MoleculeProps,
    pub complex: ComplexProps,
    pub entity_set: EntitySetProps,
    pub cell: CellProps,
    pub pathway: PathwayProps,
    pub modification: ModificationProps,
    pub interactor: InteractorProps,
    pub trivial: TrivialProps,
    pub font: FontProps,
}

fn themed_color(
    user: Option<String>,
    vars: &Arc<ThemeVars>,
    key: &'static str,
    fallback: &'static str,
) -> Property<String> {
    match user {
        Some(value) => Property::Value(value),
        None => {
            let vars = Arc::clone(vars);
            Property::Provider(Arc::new(move || {
                vars.color(key).unwrap_or_else(|| fallback.to_string())
            }))
        }
    }
}

fn themed_number(
    user: Option<f64>,
    vars: &Arc<ThemeVars>,
    key: &'static str,
    fallback: f64,
) -> Property<f64> {
    match user {
        Some(value) => Property::Value(value),
        None => {
            let vars = Arc::clone(vars);
            Property::Provider(Arc::new(move || vars.number(key).unwrap_or(fallback)))
        }
    }
}

fn themed_curve(
    user: Option<Vec<[f64; 2]>>,
    vars: &Arc<ThemeVars>,
    key: &'static str,
    fallback: &'static [(f64, f64)],
) -> Property<Curve> {
    match user {
        Some(points) => Property::Value(points.iter().map(|p| (p[0], p[1])).collect()),
        None => {
            let vars = Arc::clone(vars);
            Property::Provider(Arc::new(move || {
                vars.curve(key).unwrap_or_else(|| fallback.to_vec())
            }))
        }
    }
}

fn fixed_number(user: Option<f64>, fallback: f64) -> Property<f64> {
    Property::Value(user.unwrap_or(fallback))
}

/// Chain a property to another group's cell, so a late override of the source
/// cell is still observed.
fn chained(source: &Property<String>) -> Property<String> {
    let source = source.clone();
    Property::Provider(Arc::new(move || source.extract()))
}

impl Properties {
    /// Resolve the property tree: user override first, then the theme token,
    /// then the hardcoded default.
    pub fn resolve(user: UserProperties, vars: ThemeVars) -> Self {
        let vars = Arc::new(vars);

        let global = GlobalProps {
            thickness: fixed_number(user.global.thickness, 4.0),
            surface: themed_color(user.global.surface, &vars, "surface", "#F6FEFF"),
            on_surface: themed_color(user.global.on_surface, &vars, "on-surface", "#001F24"),
            primary: themed_color(user.global.primary, &vars, "primary", "#006782"),
            on_primary: themed_color(user.global.on_primary, &vars, "on-primary", "#FFFFFF"),
            positive: themed_color(user.global.positive, &vars, "positive", "#0C9509"),
            negative: themed_color(user.global.negative, &vars, "negative", "#BA1A1A"),
            negative_contrast: themed_color(
                user.global.negative_contrast,
                &vars,
                "negative-contrast",
                "#ea7d7d",
            ),
            select_node: themed_color(user.global.select_node, &vars, "select-node", "#6EB3E4"),
            select_edge: themed_color(user.global.select_edge, &vars, "select-edge", "#0561A6"),
            hover_node: themed_color(user.global.hover_node, &vars, "hover-node", "#78E076"),
            hover_edge: themed_color(user.global.hover_edge, &vars, "hover-edge", "#04B601"),
            flag: themed_color(user.global.flag, &vars, "flag", "#DE75B4"),
        };

        let compartment = CompartmentProps {
            fill: themed_color(user.compartment.fill, &vars, "compartment", "#E5834A"),
            opacity: themed_number(user.compartment.opacity, &vars, "compartment-opacity", 0.06),
        };

        let shadow = ShadowProps {
            luminosity: themed_number(user.shadow.luminosity, &vars, "shadow-luminosity", 40.0),
            opacity: themed_curve(
                user.shadow.opacity,
                &vars,
                "shadow-opacity",
                &[(20.0, 20.0), (40.0, 0.0)],
            ),
            label_opacity: themed_curve(
                user.shadow.label_opacity,
                &vars,
                "shadow-label-opacity",
                &[(20.0, 100.0), (40.0, 0.0)],
            ),
        };

        let protein = ProteinProps {
            fill: themed_color(user.protein.fill, &vars, "primary-contrast-1", "#001F29"),
            drug: themed_color(user.protein.drug, &vars, "drug-contrast-1", "#3E001D"),
            radius: fixed_number(user.protein.radius, 8.0),
        };

        let genome_encoded_entity = GenomeEncodedEntityProps {
            fill: themed_color(
                user.genome_encoded_entity.fill,
                &vars,
                "primary-contrast-4",
                "#006782",
            ),
            drug: themed_color(
                user.genome_encoded_entity.drug,
                &vars,
                "drug-contrast-4",
                "#BB557A",
            ),
            bottom_radius: fixed_number(user.genome_encoded_entity.bottom_radius, 6.0),
            top_radius: fixed_number(user.genome_encoded_entity.top_radius, 40.0),
        };

        let rna = RnaProps {
            fill: themed_color(user.rna.fill, &vars, "primary-contrast-2", "#003545"),
            drug: themed_color(user.rna.drug, &vars, "drug-contrast-2", "#610B33"),
            radius: fixed_number(user.rna.radius, 8.0),
        };

        let gene = GeneProps {
            fill: themed_color(user.gene.fill, &vars, "primary-contrast-3", "#004D62"),
            decoration_height: fixed_number(user.gene.decoration_height, 20.0),
            decoration_extra_width: fixed_number(user.gene.decoration_extra_width, 17.0),
            arrow_head_size: fixed_number(user.gene.arrow_head_size, 10.0),
            border_radius: fixed_number(user.gene.border_radius, 8.0),
            arrow_radius: fixed_number(user.gene.arrow_radius, 8.0),
        };

        let molecule = MoleculeProps {
            fill: match user.molecule.fill {
                Some(value) => Property::Value(value),
                None => chained(&global.surface),
            },
            stroke: match user.molecule.stroke {
                Some(value) => Property::Value(value),
                None => chained(&global.on_surface),
            },
            drug: themed_color(user.molecule.drug, &vars, "drug-contrast-3", "#9C3D61"),
        };

        let complex = ComplexProps {
            fill: themed_color(user.complex.fill, &vars, "tertiary-contrast-1", "#00315C"),
            stroke: themed_color(user.complex.stroke, &vars, "on-tertiary", "#FFFFFF"),
            drug: themed_color(user.complex.drug, &vars, "drug-contrast-3", "#7E2549"),
            cut: fixed_number(user.complex.cut, 8.0),
        };

        let entity_set = EntitySetProps {
            fill: themed_color(user.entity_set.fill, &vars, "tertiary-contrast-3", "#1660A5"),
            stroke: themed_color(user.entity_set.stroke, &vars, "on-tertiary", "#FFFFFF"),
            drug: themed_color(user.entity_set.drug, &vars, "drug-contrast-4", "#BB557A"),
            radius: fixed_number(user.entity_set.radius, 8.0),
        };

        let cell = CellProps {
            thickness: themed_number(user.cell.thickness, &vars, "cell-thickness", 16.0),
            fill: themed_color(user.cell.fill, &vars, "tertiary-contrast-2", "#004882"),
            stroke: themed_color(user.cell.stroke, &vars, "on-tertiary", "#FFFFFF"),
        };

        let pathway = PathwayProps {
            fill: themed_color(user.pathway.fill, &vars, "primary-contrast-4", "#006782"),
            stroke: match user.pathway.stroke {
                Some(value) => Property::Value(value),
                None => chained(&global.on_primary),
            },
        };

        let modification = ModificationProps {
            fill: themed_color(user.modification.fill, &vars, "primary-contrast-2", "#003545"),
        };

        let interactor = InteractorProps {
            fill: themed_color(user.interactor.fill, &vars, "interactor-fill", "#68297C"),
            stroke: themed_color(user.interactor.stroke, &vars, "interactor-stroke", "#9f5cb5"),
            decoration_width: themed_number(
                user.interactor.decoration_width,
                &vars,
                "decoration-width",
                20.0,
            ),
        };

        let trivial = TrivialProps {
            opacity: themed_curve(
                user.trivial.opacity,
                &vars,
                "trivial-opacity",
                &[(40.0, 0.0), (60.0, 100.0)],
            ),
        };

        let font = FontProps {
            size: fixed_number(user.font.size, 12.0),
        };

        Self {
            global,
            compartment,
            shadow,
            protein,
            genome_encoded_entity,
            rna,
            gene,
            molecule,
            complex,
            entity_set,
            cell,
            pathway,
            modification,
            interactor,
            trivial,
            font,
        }
    }
}

impl Default for Properties {
    fn default() -> Self {
        Self::resolve(UserProperties::default(), ThemeVars::default())
    }
}

/// Construction-time overrides; every field is optional and falls back to the
/// theme token / hardcoded default when unset.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct UserProperties {
    pub global: GlobalOverrides,
    pub compartment: CompartmentOverrides,
    pub shadow: ShadowOverrides,
    pub protein: ProteinOverrides,
    pub genome_encoded_entity: GenomeEncodedEntityOverrides,
    pub rna: RnaOverrides,
    pub gene: GeneOverrides,
    pub molecule: MoleculeOverrides,
    pub complex: ComplexOverrides,
    pub entity_set: EntitySetOverrides,
    pub cell: CellOverrides,
    pub pathway: PathwayOverrides,
    pub modification: ModificationOverrides,
    pub interactor: InteractorOverrides,
    pub trivial: TrivialOverrides,
    pub font: FontOverrides,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GlobalOverrides {
    pub thickness: Option<f64>,
    pub surface: Option<String>,
    pub on_surface: Option<String>,
    pub primary: Option<String>,
    pub on_primary: Option<String>,
    pub positive: Option<String>,
    pub negative: Option<String>,
    pub negative_contrast: Option<String>,
    pub select_node: Option<String>,
    pub select_edge: Option<String>,
    pub hover_node: Option<String>,
    pub hover_edge: Option<String>,
    pub flag: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CompartmentOverrides {
    pub fill: Option<String>,
    pub opacity: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ShadowOverrides {
    pub luminosity: Option<f64>,
    pub opacity: Option<Vec<[f64; 2]>>,
    pub label_opacity: Option<Vec<[f64; 2]>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ProteinOverrides {
    pub fill: Option<String>,
    pub drug: Option<String>,
    pub radius: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GenomeEncodedEntityOverrides {
    pub fill: Option<String>,
    pub drug: Option<String>,
    pub bottom_radius: Option<f64>,
    pub top_radius: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RnaOverrides {
    pub fill: Option<String>,
    pub drug: Option<String>,
    pub radius: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GeneOverrides {
    pub fill: Option<String>,
    pub decoration_height: Option<f64>,
    pub decoration_extra_width: Option<f64>,
    pub arrow_head_size: Option<f64>,
    pub border_radius: Option<f64>,
    pub arrow_radius: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MoleculeOverrides {
    pub fill: Option<String>,
    pub stroke: Option<String>,
    pub drug: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ComplexOverrides {
    pub fill: Option<String>,
    pub stroke: Option<String>,
    pub drug: Option<String>,
    pub cut: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct EntitySetOverrides {
    pub fill: Option<String>,
    pub stroke: Option<String>,
    pub drug: Option<String>,
    pub radius: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CellOverrides {
    pub thickness: Option<f64>,
    pub fill: Option<String>,
    pub stroke: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PathwayOverrides {
    pub fill: Option<String>,
    pub stroke: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ModificationOverrides {
    pub fill: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct InteractorOverrides {
    pub fill: Option<String>,
    pub stroke: Option<String>,
    pub decoration_width: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TrivialOverrides {
    pub opacity: Option<Vec<[f64; 2]>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FontOverrides {
    pub size: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::{Properties, UserProperties};
    use crate::theme::ThemeVars;

    #[test]
    fn hardcoded_defaults() {
        let props = Properties::default();
        assert_eq!(props.global.thickness.extract(), 4.0);
        assert_eq!(props.global.surface.extract(), "#F6FEFF");
        assert_eq!(props.protein.radius.extract(), 8.0);
        assert_eq!(
            props.shadow.opacity.extract(),
            vec![(20.0, 20.0), (40.0, 0.0)]
        );
    }

    #[test]
    fn theme_token_beats_default() {
        let vars = ThemeVars::from_toml("surface = \"#101418\"").expect("valid theme");
        let props = Properties::resolve(UserProperties::default(), vars);
        assert_eq!(props.global.surface.extract(), "#101418");
        // Unset tokens still fall through to the hardcoded value.
        assert_eq!(props.global.on_surface.extract(), "#001F24");
    }

    #[test]
    fn user_override_beats_theme_token() {
        let vars = ThemeVars::from_toml("surface = \"#101418\"").expect("valid theme");
        let mut user = UserProperties::default();
        user.global.surface = Some("#222222".to_string());
        let props = Properties::resolve(user, vars);
        assert_eq!(props.global.surface.extract(), "#222222");
    }

    #[test]
    fn molecule_fill_follows_surface() {
        let vars = ThemeVars::from_toml("surface = \"#101418\"").expect("valid theme");
        let props = Properties::resolve(UserProperties::default(), vars);
        assert_eq!(props.molecule.fill.extract(), "#101418");

        let mut user = UserProperties::default();
        user.global.surface = Some("#0A0A0A".to_string());
        let props = Properties::resolve(user, ThemeVars::default());
        assert_eq!(props.molecule.fill.extract(), "#0A0A0A");
    }

    #[test]
    fn user_properties_deserialize_from_json() {
        let user: UserProperties = serde_json::from_str(
            r#"{"global": {"thickness": 6.0}, "protein": {"radius": 10.0}}"#,
        )
        .expect("valid overrides");
        let props = Properties::resolve(user, ThemeVars::default());
        assert_eq!(props.global.thickness.extract(), 6.0);
        assert_eq!(props.protein.radius.extract(), 10.0);
        assert_eq!(props.rna.radius.extract(), 8.0);
    }
}
