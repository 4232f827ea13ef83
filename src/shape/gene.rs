use super::{Image, Shape, ShapeParams};
use crate::properties::Properties;

/// Gene box with the transcription-arrow decorator rising from the top edge.
/// The decorator overhangs both the top and the right side of the base box.
pub fn draw(properties: &Properties, params: &ShapeParams) -> Shape {
    let width = params.width;
    let height = params.height;

    let t = properties.global.thickness.extract();
    let d_height = properties.gene.decoration_height.extract();
    let d_width = properties.gene.decoration_extra_width.extract();
    let head_size = properties.gene.arrow_head_size.extract();
    let radius = properties.gene.arrow_radius.extract();
    let fill = properties.gene.fill.extract();
    let stroke = if params.flags.interactor {
        Some(properties.interactor.fill.extract())
    } else if params.flags.disease {
        Some(properties.global.negative_contrast.extract())
    } else {
        None
    };
    let select = properties.global.select_node.extract();
    let hover = properties.global.hover_node.extract();
    let flag = properties.global.flag.extract();
    // Arrow head is an equilateral triangle; this is its height.
    let hh = (head_size * head_size * 3.0 / 4.0).sqrt();

    let half_width = width / 2.0;

    let r = properties.gene.border_radius.extract();
    let o_r = r + t;
    let i_r = r - t;
    let t_2 = t / 2.0;
    let t2 = t * 2.0;

    let stroke_attrs = match &stroke {
        Some(stroke) => format!(r#" stroke="{stroke}" stroke-width="{t}""#),
        None => String::new(),
    };
    let dash_attrs = if params.flags.loss_of_function {
        format!(r#" stroke-dasharray="{t} {t2}""#)
    } else {
        String::new()
    };

    Shape {
        background: Some(Image {
            markup: format!(
                r#"<path fill="{fill}" stroke-linecap="round" transform="translate({t_2} {t_2})"{stroke_attrs}{dash_attrs} d="
            M 0 {d_height}
            H {width}
            v {v_span}
            a {radius} {radius} 0 0 1 -{radius} {radius}
            H {radius}
            a {radius} {radius} 0 0 1 -{radius} -{radius}
            Z
          "/>"#,
                v_span = height - d_height - radius,
            ),
            bounds_expansion: Some(t_2),
            clip: Some("none"),
            containment: Some("over"),
            position_x: Some(-t / 2.0),
            position_y: Some(-t / 2.0),
            width: Some(width + t),
            height: Some(height + t),
            ..Default::default()
        }),
        decorators: vec![Image {
            markup: format!(
                r#"<path fill="none" stroke="{fill}" stroke-width="{t}" d="
            M {half_width} {stem_base}
            v -{stem_span}
            a {radius} {radius} 0 0 1 {radius} -{radius}
            h {arm_span}
          "/>
            <path fill="{fill}" stroke="{fill}" stroke-width="{t}" stroke-linejoin="round" d="
            M {head_x} {head_y}
            v -{head_half}
            l {hh} {head_half}
            l -{hh} {head_half}
            v -{head_half}
            z
          "/>"#,
                stem_base = d_height + 2.0 * t,
                stem_span = d_height - radius - (head_size + t) / 2.0 + 2.0 * t,
                arm_span = half_width - t - radius + d_width,
                head_x = width - hh - t_2 + d_width,
                head_y = head_size / 2.0 + t_2,
                head_half = head_size / 2.0,
            ),
            position_y: Some(-t / 2.0),
            bounds_expansion: Some(d_height),
            height: Some(d_height + 1.5 * t),
            width: Some(width + d_width),
            clip: Some("none"),
            containment: Some("over"),
            ..Default::default()
        }],
        hover: Some(Image {
            markup: format!(
                r#"<rect x="0" y="0" width="{width}" height="{h}" fill="{hover}"/>"#,
                h = 2.0 * t,
            ),
            position_y: Some(d_height - t),
            bounds_expansion: Some(t),
            clip: Some("none"),
            containment: Some("over"),
            height: Some(2.0 * t),
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
            bounds_expansion: Some(t),
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
       "/>"#,
                w_out = width + 4.0 * t,
                v_stop = height - d_height - r + t,
                halo_r = o_r + t,
            ),
            position_x: Some(-2.0 * t),
            position_y: Some(d_height - t),
            bounds_expansion: Some(2.0 * t),
            clip: Some("none"),
            containment: Some("over"),
            width: Some(width + 4.0 * t),
            height: Some(height + 2.0 * t - d_height),
            ..Default::default()
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::draw;
    use crate::properties::Properties;
    use crate::shape::{ShapeFlags, ShapeParams};

    #[test]
    fn disease_outline_uses_contrast_stroke() {
        let properties = Properties::default();
        let plain = draw(
            &properties,
            &ShapeParams {
                width: 120.0,
                height: 60.0,
                flags: ShapeFlags::default(),
            },
        );
        let diseased = draw(
            &properties,
            &ShapeParams {
                width: 120.0,
                height: 60.0,
                flags: ShapeFlags {
                    disease: true,
                    ..Default::default()
                },
            },
        );
        assert!(!plain.background.unwrap().markup.contains("stroke=\"#ea7d7d\""));
        assert!(diseased.background.unwrap().markup.contains("stroke=\"#ea7d7d\""));
    }

    #[test]
    fn loss_of_function_dashes_the_outline() {
        let properties = Properties::default();
        let shape = draw(
            &properties,
            &ShapeParams {
                width: 120.0,
                height: 60.0,
                flags: ShapeFlags {
                    loss_of_function: true,
                    ..Default::default()
                },
            },
        );
        assert!(shape.background.unwrap().markup.contains("stroke-dasharray=\"4 8\""));
    }

    #[test]
    fn decorator_overhangs_by_the_decoration_height() {
        let properties = Properties::default();
        let shape = draw(
            &properties,
            &ShapeParams {
                width: 120.0,
                height: 60.0,
                flags: ShapeFlags::default(),
            },
        );
        assert_eq!(shape.decorators[0].bounds_expansion, Some(20.0));
        assert_eq!(shape.decorators[0].width, Some(137.0));
    }
}
