use super::{Image, Shape, ShapeParams};
use crate::properties::Properties;

/// Asymmetric box: wide arc on top, tight radius at the bottom. The top
/// radius is clamped so it never exceeds the box itself.
pub fn draw(properties: &Properties, params: &ShapeParams) -> Shape {
    let width = params.width;
    let height = params.height;

    let fill = if !params.flags.drug {
        properties.complex.fill.extract()
    } else {
        properties.genome_encoded_entity.drug.extract()
    };
    let select = properties.global.select_node.extract();
    let hover = properties.global.hover_node.extract();
    let flag = properties.global.flag.extract();
    let t = properties.global.thickness.extract();
    let t_2 = t / 2.0;
    let bottom_r = properties.genome_encoded_entity.bottom_radius.extract();
    let stroke = if params.flags.interactor {
        Some(properties.interactor.fill.extract())
    } else if params.flags.disease {
        Some(properties.global.negative_contrast.extract())
    } else {
        None
    };

    let top_r = properties
        .genome_encoded_entity
        .top_radius
        .extract()
        .min(height - bottom_r)
        .min(width / 2.0 - t);
    let v = height - bottom_r - top_r;

    let top_or = top_r + t;
    let top_ir = top_r - t;

    let bottom_or = bottom_r + t;
    let bottom_ir = bottom_r - t;

    let stroke_attrs = match &stroke {
        Some(stroke) => format!(r#" stroke="{stroke}" stroke-width="{t}""#),
        None => String::new(),
    };
    let dash_attrs = if params.flags.loss_of_function {
        format!(r#" stroke-dasharray="{t} {dash}""#, dash = t * 2.0)
    } else {
        String::new()
    };

    Shape {
        background: Some(Image {
            markup: format!(
                r#"<path fill="{fill}" stroke-linecap="round" transform="translate({t_2} {t_2})"{stroke_attrs}{dash_attrs} d="
      M {top_r} 0
      H {top_stop}
      a {top_r} {top_r} 0 0 1 {top_r} {top_r}
      v {v}
      a {bottom_r} {bottom_r} 0 0 1 -{bottom_r} {bottom_r}
      H {bottom_r}
      a {bottom_r} {bottom_r} 0 0 1 -{bottom_r} -{bottom_r}
      v -{v}
      a {top_r} {top_r} 0 0 1 {top_r} -{top_r}
      Z
      "/>"#,
                top_stop = width - top_r,
            ),
            bounds_expansion: Some(t / 2.0),
            clip: Some("none"),
            containment: Some("over"),
            position_x: Some(-t_2),
            position_y: Some(-t_2),
            width: Some(width + t),
            height: Some(height + t),
            ..Default::default()
        }),
        hover: Some(Image {
            markup: format!(
                r#"<path fill="{hover}" stroke-linejoin="round" stroke-linecap="round" d="
            M 0 {top_or}
            a {top_or} {top_or} 0 0 1 {top_or} -{top_or}
            h {h_span}
            a {top_or} {top_or} 0 0 1 {top_or} {top_or}
            a {top_or} {top_ir} 0 0 0 -{top_or} -{top_ir}
            h -{h_span}
            a {top_or} {top_ir} 0 0 0 -{top_or} {top_ir}
            Z"/>"#,
                h_span = width - 2.0 * top_or,
            ),
            position_y: Some(-t),
            bounds_expansion: Some(t),
            clip: Some("none"),
            containment: Some("over"),
            height: Some(top_or),
            ..Default::default()
        }),
        select: Some(Image {
            markup: format!(
                r#"<path fill="{select}" stroke-linejoin="round" stroke-linecap="round" d="
            M 0 0
            a {bottom_or} {bottom_or} 0 0 0 {bottom_or} {bottom_or}
            h {h_span}
            a {bottom_or} {bottom_or} 0 0 0 {bottom_or} -{bottom_or}
            a {bottom_or} {bottom_ir} 0 0 1 -{bottom_or} {bottom_ir}
            h -{h_span}
            a {bottom_or} {bottom_ir} 0 0 1 -{bottom_or} -{bottom_ir}
            Z"/>"#,
                h_span = width - 2.0 * bottom_or,
            ),
            position_y: Some(height - bottom_r),
            bounds_expansion: Some(t),
            clip: Some("none"),
            containment: Some("over"),
            height: Some(bottom_or),
            ..Default::default()
        }),
        flag: Some(Image {
            markup: format!(
                r#"<path fill="{flag}" d="
      M {top_or} 0
      H {top_stop}
      a {top_halo} {top_or} 0 0 1 {top_halo} {top_or}
      v {v}
      a {bottom_halo} {bottom_or} 0 0 1 -{bottom_halo} {bottom_or}
      H {bottom_halo}
      a {bottom_halo} {bottom_or} 0 0 1 -{bottom_halo} -{bottom_or}
      v -{v}
      a {top_halo} {top_or} 0 0 1 {top_halo} -{top_or}
      Z
      "/>"#,
                top_stop = width + 3.0 * t - top_or,
                top_halo = top_or + t,
                bottom_halo = bottom_or + t,
            ),
            position_x: Some(-2.0 * t),
            position_y: Some(-t),
            bounds_expansion: Some(2.0 * t),
            clip: Some("none"),
            containment: Some("over"),
            width: Some(width + 4.0 * t),
            height: Some(height + 2.0 * t),
            ..Default::default()
        }),
        ..Default::default()
    }
}
