use super::{Image, Shape, ShapeParams};
use crate::properties::Properties;

/// Bottom-rounded rectangle; the flat top edge carries a thin hover strip
/// instead of an inflated arc.
pub fn draw(properties: &Properties, params: &ShapeParams) -> Shape {
    let width = params.width;
    let height = params.height;

    let thick = properties.global.thickness.extract();
    let select = properties.global.select_node.extract();
    let hover = properties.global.hover_node.extract();
    let flag = properties.global.flag.extract();
    let fill = properties.rna.fill.extract();

    let r = properties.rna.radius.extract();
    let o_r = r + thick;
    let i_r = r - thick;

    Shape {
        hover: Some(Image {
            markup: format!(
                r#"<rect x="0" y="0" width="{width}" height="{h}" fill="{hover}"/>"#,
                h = 2.0 * thick,
            ),
            position_y: Some(-thick),
            bounds_expansion: Some(thick),
            clip: Some("none"),
            containment: Some("over"),
            height: Some(2.0 * thick),
            ..Default::default()
        }),
        select: Some(Image {
            markup: format!(
                r#"<path fill="{select}" stroke-linejoin="round" stroke-linecap="round" d="
            M 0 0
            a {o_r} {o_r} 0 0 0 {o_r} {o_r}
            h {h_span}
            a {o_r} {o_r} 0 0 0 {o_r} -{o_r}
            a {o_r} {i_r} 0 0 1 -{o_r} {i_r}
            h -{h_span}
            a {o_r} {i_r} 0 0 1 -{o_r} -{i_r}
            Z"/>"#,
                h_span = width - 2.0 * o_r,
            ),
            position_y: Some(height - r),
            bounds_expansion: Some(thick),
            clip: Some("none"),
            containment: Some("over"),
            height: Some(o_r),
            ..Default::default()
        }),
        flag: Some(Image {
            markup: format!(
                r#"<path fill="{flag}" d="
       M 0 0
       H {w_out}
       V {v_stop}
       a {halo_r} {o_r} 0 0 1 -{halo_r} {o_r}
       H {halo_r}
       a {halo_r} {o_r} 0 0 1 -{halo_r} -{o_r}
       Z
       "/>
       <path fill="{fill}" d="
       M {x_in} {thick}
       H {w_in}
       V {v_stop}
       a {r} {r} 0 0 1 -{r} {r}
       H {r_in}
       a {r} {r} 0 0 1 -{r} -{r}
       Z"/>"#,
                w_out = width + 4.0 * thick,
                v_stop = height - r + thick,
                halo_r = o_r + thick,
                x_in = 2.0 * thick,
                w_in = width + 2.0 * thick,
                r_in = r + 2.0 * thick,
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
