use super::{Image, Shape, ShapeParams};
use crate::properties::Properties;

/// Encapsulated pathway that interacts with the diagram: a plain box whose
/// hover/select states are thin strips and whose flag is a pair of side bars.
pub fn draw_interacting(properties: &Properties, params: &ShapeParams) -> Shape {
    let width = params.width;
    let height = params.height;

    let select = properties.global.select_node.extract();
    let hover = properties.global.hover_node.extract();
    let flag = properties.global.flag.extract();
    let thick = properties.global.thickness.extract();

    let t = 3.0 * thick;

    Shape {
        hover: Some(Image {
            markup: format!(r#"<rect fill="{hover}" width="{width}" height="{t}"/>"#),
            width: Some(width),
            height: Some(t),
            ..Default::default()
        }),
        select: Some(Image {
            markup: format!(r#"<rect fill="{select}" width="{width}" height="{t}"/>"#),
            position_y: Some(height - t),
            width: Some(width),
            height: Some(t),
            ..Default::default()
        }),
        flag: Some(Image {
            markup: format!(
                r#"<rect fill="{flag}" width="{t}" height="{height}"/>
<rect fill="{flag}" width="{t}" height="{height}" x="{x_right}"/>"#,
                x_right = width + t,
            ),
            width: Some(width + 4.0 * t),
            position_x: Some(-t),
            height: Some(height),
            bounds_expansion: Some(2.0 * t),
            clip: Some("none"),
            containment: Some("over"),
            ..Default::default()
        }),
        ..Default::default()
    }
}

/// Collapsed sub-pathway pill.
pub fn draw_sub(properties: &Properties, params: &ShapeParams) -> Shape {
    let width = params.width;
    let height = params.height;

    let select = properties.global.select_node.extract();
    let hover = properties.global.hover_node.extract();
    let flag = properties.global.flag.extract();
    let thick = properties.global.thickness.extract() * 3.0;
    let stroke = if !params.flags.disease {
        properties.pathway.stroke.extract()
    } else {
        properties.global.negative_contrast.extract()
    };
    let fill = properties.pathway.fill.extract();

    let ht = thick / 2.0;
    let half_height = height / 2.0;
    let o_r = half_height;
    let i_r = half_height - thick;
    let o_rx = o_r.min(width / 2.0);

    Shape {
        background: Some(Image {
            markup: format!(
                r#"<rect x="{ht}" y="{ht}" width="{w_in}" height="{h_in}" rx="{half_height}" stroke="{stroke}" fill="{fill}" stroke-width="{thick}"/>"#,
                w_in = width - thick,
                h_in = height - thick,
            ),
            ..Default::default()
        }),
        hover: Some(Image {
            markup: format!(
                r#"<path fill="{hover}" stroke-linejoin="round" stroke-linecap="round" d="
            M 0 {o_r}
            a {o_rx} {o_r} 0 0 1 {o_rx} -{o_r}
            h {h_span}
            a {o_rx} {o_r} 0 0 1 {o_rx} {o_r}
            a {o_rx} {i_r} 0 0 0 -{o_rx} -{i_r}
            h -{h_span}
            a {o_rx} {i_r} 0 0 0 -{o_rx} {i_r}
            Z"/>"#,
                h_span = width - 2.0 * o_rx,
            ),
            clip: Some("none"),
            containment: Some("over"),
            height: Some(o_r),
            ..Default::default()
        }),
        select: Some(Image {
            markup: format!(
                r#"<path fill="{select}" stroke-linejoin="round" stroke-linecap="round" d="
            M 0 0
            a {o_rx} {o_r} 0 0 0 {o_rx} {o_r}
            h {h_span}
            a {o_rx} {o_r} 0 0 0 {o_rx} -{o_r}
            a {o_rx} {i_r} 0 0 1 -{o_rx} {i_r}
            h -{h_span}
            a {o_rx} {i_r} 0 0 1 -{o_rx} -{i_r}
            Z"/>"#,
                h_span = width - 2.0 * o_rx,
            ),
            position_y: Some(half_height),
            clip: Some("none"),
            containment: Some("over"),
            height: Some(o_r),
            ..Default::default()
        }),
        flag: Some(Image {
            markup: format!(
                r#"<rect width="{w_out}" height="{height}" rx="{rx_out}" ry="{o_r}" fill="{flag}"/>"#,
                w_out = width + 2.0 * thick,
                rx_out = o_r + thick,
            ),
            position_x: Some(-thick),
            bounds_expansion: Some(2.0 * thick),
            clip: Some("none"),
            containment: Some("over"),
            width: Some(width + 2.0 * thick),
            ..Default::default()
        }),
        ..Default::default()
    }
}
