pub mod cell;
pub mod complex;
pub mod entity_set;
pub mod gene;
pub mod genome_encoded_entity;
pub mod interactor;
pub mod molecule;
pub mod pathway;
pub mod protein;
pub mod rna;

use crate::properties::Properties;

/// Node categories with procedural artwork. Class-list input is mapped onto
/// this enum once, at the translation boundary; everything downstream
/// dispatches on the enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeCategory {
    Protein,
    GenomeEncodedEntity,
    Rna,
    Gene,
    Molecule,
    Complex,
    EntitySet,
    Cell,
    InteractingPathway,
    SubPathway,
    DiseaseInteractor,
}

impl NodeCategory {
    pub const ALL: [NodeCategory; 11] = [
        NodeCategory::Protein,
        NodeCategory::GenomeEncodedEntity,
        NodeCategory::Rna,
        NodeCategory::Gene,
        NodeCategory::Molecule,
        NodeCategory::Complex,
        NodeCategory::EntitySet,
        NodeCategory::Cell,
        NodeCategory::InteractingPathway,
        NodeCategory::SubPathway,
        NodeCategory::DiseaseInteractor,
    ];

    /// The class tag the renderer sees for this category.
    pub fn as_class(self) -> &'static str {
        match self {
            NodeCategory::Protein => "Protein",
            NodeCategory::GenomeEncodedEntity => "GenomeEncodedEntity",
            NodeCategory::Rna => "RNA",
            NodeCategory::Gene => "Gene",
            NodeCategory::Molecule => "Molecule",
            NodeCategory::Complex => "Complex",
            NodeCategory::EntitySet => "EntitySet",
            NodeCategory::Cell => "Cell",
            NodeCategory::InteractingPathway => "Interacting",
            NodeCategory::SubPathway => "SUB",
            NodeCategory::DiseaseInteractor => "DiseaseInteractor",
        }
    }

    pub fn from_class(class: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|c| c.as_class() == class)
    }
}

/// Boolean modifiers affecting a category's artwork. `crossed` is consumed by
/// the composition layer only, but is part of the cache key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ShapeFlags {
    pub drug: bool,
    pub disease: bool,
    pub crossed: bool,
    pub interactor: bool,
    pub loss_of_function: bool,
}

/// Inputs to one shape generator call: the node's base box plus modifiers.
#[derive(Debug, Clone, Copy)]
pub struct ShapeParams {
    pub width: f64,
    pub height: f64,
    pub flags: ShapeFlags,
}

/// One visual layer: an SVG fragment plus the directives telling the renderer
/// how to place it relative to the node box. `None` fields fall back to the
/// aggregate defaults when layers are flattened.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Image {
    pub markup: String,
    pub position_x: Option<f64>,
    pub position_y: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub clip: Option<&'static str>,
    pub containment: Option<&'static str>,
    pub opacity: Option<f64>,
    pub bounds_expansion: Option<f64>,
}

/// Artwork bundle for one category under one set of flags. State layers may
/// extend past the node's base box; callers must not clip them to it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Shape {
    pub background: Option<Image>,
    pub select: Option<Image>,
    pub hover: Option<Image>,
    pub flag: Option<Image>,
    pub decorators: Vec<Image>,
}

/// Generate the artwork for a category. Pure: the result depends only on the
/// resolved property values and `params`, which is what makes the shape cache
/// sound.
pub fn draw(category: NodeCategory, properties: &Properties, params: &ShapeParams) -> Shape {
    match category {
        NodeCategory::Protein => protein::draw(properties, params),
        NodeCategory::GenomeEncodedEntity => genome_encoded_entity::draw(properties, params),
        NodeCategory::Rna => rna::draw(properties, params),
        NodeCategory::Gene => gene::draw(properties, params),
        NodeCategory::Molecule => molecule::draw(properties, params),
        NodeCategory::Complex => complex::draw(properties, params),
        NodeCategory::EntitySet => entity_set::draw(properties, params),
        NodeCategory::Cell => cell::draw(properties, params),
        NodeCategory::InteractingPathway => pathway::draw_interacting(properties, params),
        NodeCategory::SubPathway => pathway::draw_sub(properties, params),
        NodeCategory::DiseaseInteractor => interactor::draw(properties, params),
    }
}
