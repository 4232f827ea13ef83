use super::{Image, Shape, ShapeParams};
use crate::properties::Properties;

/// Octagon-cut box. The outline path is defined once in `<defs>` and reused
/// by both the fill pass and the stroke decorator.
pub fn draw(properties: &Properties, params: &ShapeParams) -> Shape {
    let width = params.width;
    let height = params.height;

    let select = properties.global.select_node.extract();
    let hover = properties.global.hover_node.extract();
    let flag = properties.global.flag.extract();

    let t = properties.global.thickness.extract();
    let cut = properties.complex.cut.extract();
    let fill = if params.flags.drug {
        properties.complex.drug.extract()
    } else if params.flags.interactor {
        properties.interactor.fill.extract()
    } else {
        properties.complex.fill.extract()
    };

    let stroke = if !params.flags.disease {
        properties.complex.stroke.extract()
    } else {
        properties.global.negative_contrast.extract()
    };

    let cut2 = cut * 2.0;
    let t2 = t * 2.0;
    let v = height - cut2 - 2.0 * t2;

    let state_height = height / 2.0 + t;

    let defs = format!(
        r#"<defs>
  <path id="octagon" d="
      M {left} {t2}
      H {right}
      l {cut} {cut}
      v {v}
      l -{cut} {cut}
      H {left}
      l -{cut} -{cut}
      v -{v}
      l  {cut} -{cut}
      Z
      "/>
  </defs>"#,
        left = cut + t2,
        right = width - cut - t2,
    );

    let dash_attrs = if params.flags.loss_of_function {
        format!(r#" stroke-dasharray="{t2}""#)
    } else {
        String::new()
    };

    Shape {
        background: Some(Image {
            markup: format!(
                r##"{defs}
      <use href="#octagon" fill="{fill}" stroke="{fill}" stroke-width="{sw}" stroke-linejoin="round"/>"##,
                sw = 2.0 * t2,
            ),
            ..Default::default()
        }),
        hover: Some(Image {
            markup: format!(
                r#"<path stroke="{hover}" stroke-width="{sw}" stroke-linejoin="round" fill="none" d="
      M {t2} {state_height}
      v -{half_v}
      l {cut} -{rise}
      H {right}
      l {cut} {rise}
      v {half_v}
      " />"#,
                sw = 2.0 * t2,
                half_v = v / 2.0,
                rise = cut + t,
                right = width - cut - t2,
            ),
            position_y: Some(-t),
            height: Some(state_height),
            clip: Some("none"),
            bounds_expansion: Some(t),
            ..Default::default()
        }),
        select: Some(Image {
            markup: format!(
                r#"<path stroke="{select}" stroke-width="{sw}" stroke-linejoin="round" fill="none" d="
      M {t2} 0
      v {half_v}
      l {cut} {rise}
      H {right}
      l {cut} -{rise}
      v -{half_v}
      " />"#,
                sw = 2.0 * t2,
                half_v = v / 2.0,
                rise = cut + t,
                right = width - cut - t2,
            ),
            position_y: Some(height / 2.0),
            height: Some(state_height),
            clip: Some("none"),
            bounds_expansion: Some(t),
            ..Default::default()
        }),
        flag: Some(Image {
            markup: format!(
                r#"<path d="
      M {mid} {top}
      H {right}
      l {wide_cut} {cut}
      v {v}
      l -{wide_cut} {cut}
      H {left}
      l -{wide_cut} -{cut}
      v -{v}
      l  {wide_cut} -{cut}
      Z
      " stroke="{flag}" stroke-width="{sw}" stroke-linejoin="round" fill="none"/>"#,
                mid = width / 2.0,
                top = 3.0 * t,
                right = width - cut,
                wide_cut = cut + t,
                left = cut + 2.0 * t2,
                sw = 3.0 * t2,
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
        decorators: vec![Image {
            markup: format!(
                r##"{defs}
         <use href="#octagon" fill="none" stroke="{stroke}" stroke-width="{t2}" stroke-linejoin="round"{dash_attrs} />
         <use href="#octagon" fill="{fill}"/>"##,
            ),
            ..Default::default()
        }],
    }
}
