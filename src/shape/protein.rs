use super::{Image, Shape, ShapeParams};
use crate::properties::Properties;

/// Rounded-rectangle entity. The base fill comes from the renderer's own
/// background color; only the state collars and the flag halo are drawn here.
pub fn draw(properties: &Properties, params: &ShapeParams) -> Shape {
    let width = params.width;
    let height = params.height;

    let fill = properties.protein.fill.extract();
    let select = properties.global.select_node.extract();
    let hover = properties.global.hover_node.extract();
    let flag = properties.global.flag.extract();
    let thick = properties.global.thickness.extract();
    let radius = properties.protein.radius.extract();

    let o_r = radius + thick;
    let i_r = radius - thick;

    Shape {
        hover: Some(Image {
            markup: format!(
                r#"<path fill="{hover}" stroke-linejoin="round" stroke-linecap="round" d="
            M 0 {o_r}
            a {o_r} {o_r} 0 0 1 {o_r} -{o_r}
            h {h_span}
            a {o_r} {o_r} 0 0 1 {o_r} {o_r}
            a {o_r} {i_r} 0 0 0 -{o_r} -{i_r}
            h -{h_span}
            a {o_r} {i_r} 0 0 0 -{o_r} {i_r}
            Z"/>"#,
                h_span = width - 2.0 * o_r,
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
            a {o_r} {o_r} 0 0 0 {o_r} {o_r}
            h {h_span}
            a {o_r} {o_r} 0 0 0 {o_r} -{o_r}
            a {o_r} {i_r} 0 0 1 -{o_r} {i_r}
            h -{h_span}
            a {o_r} {i_r} 0 0 1 -{o_r} -{i_r}
            Z"/>"#,
                h_span = width - 2.0 * o_r,
            ),
            position_y: Some(height - radius),
            bounds_expansion: Some(thick),
            clip: Some("none"),
            containment: Some("over"),
            height: Some(o_r),
            ..Default::default()
        }),
        flag: Some(Image {
            markup: format!(
                r#"<rect width="{w_out}" height="{h_out}" rx="{o_r}" fill="{flag}"/>
<rect x="{x_in}" y="{thick}" width="{width}" height="{height}" rx="{radius}" fill="{fill}"/>"#,
                w_out = width + 4.0 * thick,
                h_out = height + 2.0 * thick,
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

#[cfg(test)]
mod tests {
    use super::draw;
    use crate::properties::Properties;
    use crate::shape::{ShapeFlags, ShapeParams};

    #[test]
    fn hover_collar_height_is_radius_plus_thickness() {
        let properties = Properties::default();
        let shape = draw(
            &properties,
            &ShapeParams {
                width: 100.0,
                height: 60.0,
                flags: ShapeFlags::default(),
            },
        );
        // Defaults: radius 8, thickness 4.
        let hover = shape.hover.expect("hover collar");
        assert_eq!(hover.height, Some(12.0));
        assert_eq!(hover.position_y, Some(-4.0));

        let select = shape.select.expect("select collar");
        assert_eq!(select.height, Some(12.0));
        assert_eq!(select.position_y, Some(52.0));
    }

    #[test]
    fn flag_halo_extends_past_the_base_box() {
        let properties = Properties::default();
        let shape = draw(
            &properties,
            &ShapeParams {
                width: 100.0,
                height: 60.0,
                flags: ShapeFlags::default(),
            },
        );
        let flag = shape.flag.expect("flag halo");
        assert_eq!(flag.width, Some(116.0));
        assert_eq!(flag.height, Some(68.0));
        assert_eq!(flag.bounds_expansion, Some(8.0));
    }
}
