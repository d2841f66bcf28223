//! Dispatcher of the `[Colours]` section.

use super::{Result, invalid};
use crate::beatmap::model::{Colours, Rgb};

/// Parses an `r,g,b` triplet. A fourth alpha component, written by some tools, is ignored.
fn rgb(field: &str, value: &str) -> Result<Rgb> {
    let mut components = value.split(',').map(|raw| raw.trim().parse::<u8>());
    let mut next = || {
        components
            .next()
            .and_then(std::result::Result::ok)
            .ok_or_else(|| invalid(field, value))
    };
    Ok(Rgb {
        r: next()?,
        g: next()?,
        b: next()?,
    })
}

pub(crate) fn colour(colours: &mut Colours, key: &str, value: &str) -> Result<()> {
    if key == "SliderTrackOverride" {
        colours.slider_track_override = Some(rgb(key, value)?);
    } else if key == "SliderBorder" {
        colours.slider_border = Some(rgb(key, value)?);
    } else if key.starts_with("Combo") {
        // Combo colours keep their order of appearance; the digit in the key does not reorder
        // them.
        colours.combo.push(rgb(key, value)?);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::colour;
    use crate::beatmap::model::{Colours, Rgb};

    #[test]
    fn combo_colours_keep_file_order() {
        let mut colours = Colours::default();
        colour(&mut colours, "Combo2", "255,0,0").expect("must parse");
        colour(&mut colours, "Combo1", "0,255,0").expect("must parse");

        assert_eq!(
            colours.combo,
            vec![Rgb { r: 255, g: 0, b: 0 }, Rgb { r: 0, g: 255, b: 0 }]
        );
    }

    #[test]
    fn alpha_component_is_ignored() {
        let mut colours = Colours::default();
        colour(&mut colours, "SliderBorder", "10,20,30,255").expect("must parse");
        assert_eq!(colours.slider_border, Some(Rgb { r: 10, g: 20, b: 30 }));
    }

    #[test]
    fn bad_component_warns() {
        let mut colours = Colours::default();
        colour(&mut colours, "Combo1", "255,0").expect_err("must warn");
        assert_eq!(colours.combo, vec![]);
    }
}
