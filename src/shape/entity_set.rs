use super::{Image, Shape, ShapeParams};
use crate::properties::Properties;

/// Set outline drawn as facing curly brackets. The drawn box is wider than
/// the node box by one bracket radius on each side.
pub fn draw(properties: &Properties, params: &ShapeParams) -> Shape {
    let height = params.height;

    let select = properties.global.select_node.extract();
    let hover = properties.global.hover_node.extract();
    let flag = properties.global.flag.extract();

    let t = properties.global.thickness.extract();
    let mut r = properties.entity_set.radius.extract();

    if 2.0 * r > height / 2.0 - t {
        r = height / 4.0 - t / 2.0;
    }

    let width = params.width + 2.0 * r;

    let fill = if params.flags.interactor {
        properties.interactor.fill.extract()
    } else if params.flags.drug {
        properties.entity_set.drug.extract()
    } else {
        properties.entity_set.fill.extract()
    };
    let stroke = if !params.flags.disease {
        properties.entity_set.stroke.extract()
    } else {
        properties.global.negative_contrast.extract()
    };

    let r2 = r * 2.0;
    let t2 = t * 2.0;
    let v = height / 2.0 - r2 - t;
    let state_height = height / 2.0 + t;
    let braces_offset = r2 + t2;

    // Dashes must cover the straight run between the brackets with whole
    // on/off cycles so the line ends on a dash.
    let mut real_dash_length = width;
    if params.flags.loss_of_function {
        let hiding_length = width - 2.0 * braces_offset;
        let ideal_dash_length = t2;
        let dash_number = ((hiding_length / ideal_dash_length + 1.0) / 2.0).round();
        real_dash_length = hiding_length / (2.0 * dash_number - 1.0);
    }

    let defs = format!(
        r##"<defs>
   <path id="curly" d="
       M {start} {t}
       H {end}
       a {r} {r} 0 0 1 {r} {r}

       v {v}
       a {r} {r} 0 0 0 {r} {r}
       a {r} {r} 0 0 0 -{r} {r}
       v {v}

       a {r} {r} 0 0 1 -{r} {r}
       H {start}
       a {r} {r} 0 0 1 -{r} -{r}

       v -{v}
       a {r} {r} 0 0 0 -{r} -{r}
       a {r} {r} 0 0 0 {r} -{r}
       v -{v}

       a {r} {r} 0 0 1 {r} -{r}
       Z
       "/>
   <clipPath id="inside">
     <use href="#curly"/>
   </clipPath>
 </defs>"##,
        start = r2 + t,
        end = width - r2 - t,
    );

    let dash_attrs = if params.flags.loss_of_function {
        format!(r#" stroke-dasharray="{real_dash_length}""#)
    } else {
        String::new()
    };

    Shape {
        background: Some(Image {
            markup: format!(
                r##"{defs}
       <use href="#curly" fill="{fill}" stroke="{fill}" stroke-width="{t2}" stroke-linejoin="round"/>"##,
            ),
            position_x: Some(-r),
            width: Some(width + 2.0 * r),
            clip: Some("none"),
            bounds_expansion: Some(2.0 * t),
            ..Default::default()
        }),
        hover: Some(Image {
            markup: format!(
                r#"<path stroke="{hover}" stroke-width="{t2}" fill="none" stroke-linejoin="round" d="
         M {x0} {y0}
         a {r} {r} 0 0 0 -{r} -{r}
         a {r} {r} 0 0 0 {r} -{r}
         v -{v}
         a {r} {ry} 0 0 1 {r} -{ry}
         H {end}
         a {r} {ry} 0 0 1 {r} {ry}
         v {v}
         a {r} {r} 0 0 0 {r} {r}
         a {r} {r} 0 0 0 -{r} {r}
       "/>"#,
                x0 = r + t,
                y0 = state_height + r,
                ry = r + t,
                end = width - r2 - t,
            ),
            position_x: Some(-r),
            width: Some(width + 2.0 * r),
            clip: Some("none"),
            bounds_expansion: Some(2.0 * t),
            position_y: Some(-t),
            height: Some(state_height),
            ..Default::default()
        }),
        select: Some(Image {
            markup: format!(
                r#"<path stroke="{select}" stroke-width="{t2}" fill="none" stroke-linejoin="round" d="
         M {x0} {y0}
         a {r} {r} 0 0 1 -{r} {r}
         a {r} {r} 0 0 1 {r} {r}
         v {v}
         a {r} {ry} 0 0 0 {r} {ry}
         H {end}
         a {r} {ry} 0 0 0 {r} -{ry}
         v -{v}
         a {r} {r} 0 0 1 {r} -{r}
         a {r} {r} 0 0 1 -{r} -{r}
       "/>"#,
                x0 = r + t,
                y0 = -r,
                ry = r + t,
                end = width - r2 - t,
            ),
            position_x: Some(-r),
            width: Some(width + 2.0 * r),
            clip: Some("none"),
            bounds_expansion: Some(2.0 * t),
            position_y: Some(height / 2.0),
            height: Some(state_height),
            ..Default::default()
        }),
        flag: Some(Image {
            markup: format!(
                r#"<rect width="{width}" height="{h_out}" rx="{rx}" ry="{ry}" fill="{flag}"/>"#,
                h_out = height + 2.0 * t,
                rx = r + 3.0 * t,
                ry = r + t2,
            ),
            position_x: Some(-2.0 * t),
            position_y: Some(-t),
            bounds_expansion: Some(2.0 * t),
            clip: Some("none"),
            containment: Some("over"),
            width: Some(width),
            height: Some(height + 2.0 * t),
            ..Default::default()
        }),
        decorators: vec![Image {
            markup: format!(
                r##"{defs}
       <use href="#curly" fill="none" stroke="{stroke}" stroke-width="{t2}" clip-path="url(#inside)"/>
       <line x1="{braces_offset}" x2="{line_end}" y1="{t2}" y2="{t2}" stroke-width="{t2}"{dash_attrs} stroke="{fill}"/>
       <line x1="{braces_offset}" x2="{line_end}" y1="{y_bottom}" y2="{y_bottom}" stroke-width="{t2}"{dash_attrs} stroke="{fill}"/>"##,
                line_end = width - braces_offset,
                y_bottom = height - t2,
            ),
            position_x: Some(-r),
            bounds_expansion: Some(r),
            clip: Some("none"),
            width: Some(width + 2.0 * r),
            ..Default::default()
        }],
    }
}

#[cfg(test)]
mod tests {
    use super::draw;
    use crate::properties::Properties;
    use crate::shape::{ShapeFlags, ShapeParams};

    #[test]
    fn bracket_radius_shrinks_on_short_nodes() {
        let properties = Properties::default();
        // height 30: 2r = 16 > 30/2 - 4 = 11, so r becomes 30/4 - 2 = 5.5
        // and the drawn width grows by 2r.
        let shape = draw(
            &properties,
            &ShapeParams {
                width: 100.0,
                height: 30.0,
                flags: ShapeFlags::default(),
            },
        );
        assert_eq!(shape.background.unwrap().position_x, Some(-5.5));
    }

    #[test]
    fn loss_of_function_recomputes_dash_length() {
        let properties = Properties::default();
        let shape = draw(
            &properties,
            &ShapeParams {
                width: 100.0,
                height: 60.0,
                flags: ShapeFlags {
                    loss_of_function: true,
                    ..Default::default()
                },
            },
        );
        // width 116, braces offset 24 => hiding length 68; ideal dash 8
        // => 5 dashes => dash length 68/9.
        let markup = shape.decorators[0].markup.clone();
        let expected = 68.0 / 9.0;
        assert!(markup.contains(&format!("stroke-dasharray=\"{expected}\"")));
    }
}
