use super::{Image, Shape, ShapeParams};
use crate::properties::Properties;

/// Cell drawn as a double-walled stadium: outer membrane stroke plus an inner
/// body inset by the membrane thickness.
pub fn draw(properties: &Properties, params: &ShapeParams) -> Shape {
    let width = params.width;
    let height = params.height;

    let select = properties.global.select_node.extract();
    let hover = properties.global.hover_node.extract();
    let flag = properties.global.flag.extract();
    let thick = properties.global.thickness.extract();
    let cell_thick = properties.cell.thickness.extract();
    let stroke = properties.cell.stroke.extract();
    let fill = properties.cell.fill.extract();

    let ht = thick / 2.0;
    let half_height = height / 2.0;
    let o_r = half_height + thick;
    let i_r = half_height - thick;
    let o_rx = o_r.min(width / 2.0);

    Shape {
        background: Some(Image {
            markup: format!(
                r#"<rect x="{ht}" y="{ht}" width="{w_out}" height="{h_out}" rx="{half_height}" stroke="{fill}" fill="{stroke}" stroke-width="{thick}"/>
<rect x="{x_in}" y="{y_in}" width="{w_in}" height="{h_in}" ry="{half_height}" rx="{rx_in}" fill="{fill}" stroke-width="0"/>"#,
                w_out = width - thick,
                h_out = height - thick,
                x_in = ht + cell_thick,
                y_in = 2.0 * thick,
                w_in = width - 2.0 * cell_thick - thick,
                h_in = height - 4.0 * thick,
                rx_in = half_height - cell_thick,
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
            position_y: Some(-thick),
            bounds_expansion: Some(thick),
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
            bounds_expansion: Some(thick),
            clip: Some("none"),
            containment: Some("over"),
            height: Some(o_r),
            ..Default::default()
        }),
        flag: Some(Image {
            markup: format!(
                r#"<rect width="{w_out}" height="{h_out}" rx="{rx_out}" ry="{o_r}" fill="{flag}"/>"#,
                w_out = width + 4.0 * thick,
                h_out = height + 2.0 * thick,
                rx_out = o_r + 2.0 * thick,
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
