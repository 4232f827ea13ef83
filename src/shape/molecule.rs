use super::{Image, Shape, ShapeParams};
use crate::properties::Properties;

/// Stadium-shaped small molecule. The horizontal arc radius is capped at half
/// the width so narrow molecules stay well formed.
pub fn draw(properties: &Properties, params: &ShapeParams) -> Shape {
    let width = params.width;
    let height = params.height;

    let select = properties.global.select_node.extract();
    let hover = properties.global.hover_node.extract();
    let flag = properties.global.flag.extract();
    let thick = properties.global.thickness.extract();
    let stroke = if params.flags.interactor {
        properties.interactor.fill.extract()
    } else if params.flags.drug {
        properties.molecule.drug.extract()
    } else {
        properties.molecule.stroke.extract()
    };
    let fill = properties.molecule.fill.extract();

    let half_height = height / 2.0;
    let o_r = half_height + thick;
    let i_r = half_height - thick;
    let o_rx = o_r.min(width / 2.0);

    Shape {
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
                h_span = width - 2.0 * o_rx + thick,
            ),
            position_y: Some(-thick),
            position_x: Some(-thick / 2.0),
            bounds_expansion: Some(thick),
            clip: Some("none"),
            containment: Some("over"),
            height: Some(o_r),
            width: Some(width + thick),
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
                h_span = width - 2.0 * o_rx + thick,
            ),
            position_y: Some(half_height),
            position_x: Some(-thick / 2.0),
            bounds_expansion: Some(thick),
            clip: Some("none"),
            containment: Some("over"),
            height: Some(o_r),
            width: Some(width + thick),
            ..Default::default()
        }),
        flag: Some(Image {
            markup: format!(
                r#"<rect width="{w_out}" height="{h_out}" rx="{rx_out}" ry="{o_r}" fill="{flag}"/>
<rect x="{x_in}" y="{thick}" width="{width}" height="{height}" rx="{o_r}" fill="{fill}" stroke="{stroke}" stroke-width="{thick}"/>"#,
                w_out = width + 4.0 * thick,
                h_out = height + 2.0 * thick,
                rx_out = o_r + 2.0 * thick,
                x_in = 2.0 * thick,
            ),
            position_x: Some(-2.0 * thick),
            position_y: Some(-thick),
            bounds_expansion: Some(2.0 * thick),
            clip: Some("none"),
            containment: Some("over"),
            width: Some(width + 4.0 * thick),
            height: Some(height + 2.0 * thick),
            ..Default::default()
        }),
        ..Default::default()
    }
}
