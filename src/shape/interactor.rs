use super::{Image, Shape, ShapeParams};
use crate::properties::Properties;

/// Disease interactor hexagon. The body is a decorator so the renderer's own
/// background stays transparent behind the pointed ends.
pub fn draw(properties: &Properties, params: &ShapeParams) -> Shape {
    let width = params.width;
    let height = params.height;

    let hover = properties.global.hover_node.extract();
    let select = properties.global.select_node.extract();
    let fill = properties.global.negative.extract();
    let t = properties.global.thickness.extract();
    let decoration_width = properties.interactor.decoration_width.extract();
    let t4 = t * 4.0;
    let t2 = t * 2.0;
    let h = height / 2.0 + t2;
    let mid_h = height / 2.0;

    Shape {
        decorators: vec![Image {
            markup: format!(
                r#"<path fill="{fill}" stroke-linejoin="round" stroke-linecap="round" stroke-width="{t4}" stroke="{fill}" d="
      M {t2} {mid_h}
      L {x_left} {t2}
      H {x_right}
      L {far} {mid_h}
      L {x_right} {y_bottom}
      H {x_left}
      Z
      " />"#,
                x_left = decoration_width + t2,
                x_right = width - (decoration_width + t2),
                far = width - t2,
                y_bottom = height - t2,
            ),
            ..Default::default()
        }],
        hover: Some(Image {
            markup: format!(
                r#"<path stroke="{hover}" stroke-linejoin="round" stroke-linecap="round" stroke-width="{t4}" fill="none" d="
      M {t2} {y_mid}
      L {x_left} {t2}
      H {x_right}
      L {far} {y_mid}
      Z
      " />"#,
                y_mid = mid_h + t2,
                x_left = decoration_width + t2,
                x_right = width - (decoration_width + t2),
                far = width - t2,
            ),
            position_y: Some(-t2),
            height: Some(h),
            clip: Some("none"),
            bounds_expansion: Some(t2),
            containment: Some("over"),
            ..Default::default()
        }),
        select: Some(Image {
            markup: format!(
                r#"<path stroke="{select}" stroke-linejoin="round" stroke-linecap="round" stroke-width="{t4}" fill="none" d="
      M {t2} 0
      L {x_left} {mid_h}
      H {x_right}
      L {far} 0
      Z
      " />"#,
                x_left = decoration_width + t2,
                x_right = width - (decoration_width + t2),
                far = width - t2,
            ),
            position_y: Some(mid_h),
            height: Some(h),
            clip: Some("none"),
            bounds_expansion: Some(t2),
            containment: Some("over"),
            ..Default::default()
        }),
        ..Default::default()
    }
}
