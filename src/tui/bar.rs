//! Position-on-a-scale bar and fixed-width value column.

#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]

use crate::core::parameter::Parameter;

/// Left and right track delimiter.
pub const BAR_DELIMITER: char = '|';
/// Track cell that does not hold the marker.
pub const BAR_FILLER: char = '.';
/// Marker glyph for the current value.
pub const BAR_MARKER: char = '!';

/// Cell index of the marker on a track of `track_len` cells.
///
/// Rounds to nearest with ties away from zero (`f64::round`), so on an
/// 11-cell track a proportion of 0.05 lands on cell 1, not 0.
#[must_use]
pub fn marker_index(proportion: f64, track_len: usize) -> usize {
    if track_len == 0 {
        return 0;
    }
    let last = track_len - 1;
    let p = if proportion.is_finite() {
        proportion.clamp(0.0, 1.0)
    } else {
        0.0
    };
    ((p * last as f64).round() as usize).min(last)
}

/// Render a track such as `|.....!.....|` for a parameter.
#[must_use]
pub fn render_bar(param: &Parameter, track_len: usize) -> String {
    render_track(marker_index(param.proportion(), track_len), track_len)
}

fn render_track(marker: usize, track_len: usize) -> String {
    let mut s = String::with_capacity(track_len + 2);
    s.push(BAR_DELIMITER);
    s.extend((0..track_len).map(|i| if i == marker { BAR_MARKER } else { BAR_FILLER }));
    s.push(BAR_DELIMITER);
    s
}

/// Cut the value's canonical decimal text to `width` characters.
///
/// Characters are dropped, never rounded: `0.123456` at width 6 shows as
/// `0.1234`, and `0.6000000000000001` as `0.6000`.
#[must_use]
pub fn truncate_value(value: f64, width: usize) -> String {
    value.to_string().chars().take(width).collect()
}

/// Cut a name to `width` characters for the name column.
#[must_use]
pub fn truncate_name(name: &str, width: usize) -> String {
    name.chars().take(width).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit(value: f64) -> Parameter {
        Parameter::new("p", 0.0, 1.0, value).unwrap()
    }

    #[test]
    fn half_value_marks_middle_cell() {
        let bar = render_bar(&unit(0.5), 11);
        assert_eq!(bar, "|.....!.....|");
        assert_eq!(bar.chars().position(|c| c == BAR_MARKER), Some(6));
    }

    #[test]
    fn min_value_marks_first_cell() {
        assert_eq!(render_bar(&unit(0.0), 11), "|!..........|");
    }

    #[test]
    fn max_value_marks_last_cell() {
        assert_eq!(render_bar(&unit(1.0), 11), "|..........!|");
    }

    #[test]
    fn bar_has_fixed_width() {
        for v in [0.0, 0.13, 0.5, 0.77, 1.0] {
            assert_eq!(render_bar(&unit(v), 11).chars().count(), 13);
        }
    }

    #[test]
    fn ties_round_away_from_zero() {
        // 0.25 * 10 = 2.5 -> 3, 0.05 * 10 = 0.5 -> 1
        assert_eq!(marker_index(0.25, 11), 3);
        assert_eq!(marker_index(0.05, 11), 1);
    }

    #[test]
    fn degenerate_bounds_mark_first_cell() {
        let p = Parameter::new("fixed", 2.0, 2.0, 2.0).unwrap();
        assert_eq!(render_bar(&p, 5), "|!....|");
    }

    #[test]
    fn non_unit_bounds_scale() {
        let p = Parameter::new("pan", -2.0, 2.0, 1.0).unwrap();
        // proportion 0.75 * 10 = 7.5 -> 8
        assert_eq!(marker_index(p.proportion(), 11), 8);
    }

    #[test]
    fn marker_index_guards_bad_input() {
        assert_eq!(marker_index(f64::NAN, 11), 0);
        assert_eq!(marker_index(2.0, 11), 10);
        assert_eq!(marker_index(0.5, 0), 0);
    }

    #[test]
    fn value_is_truncated_not_rounded() {
        assert_eq!(truncate_value(0.123_456_7, 6), "0.1234");
        assert_eq!(truncate_value(0.5 + 0.05 + 0.05, 6), "0.6000");
        assert_eq!(truncate_value(0.55, 6), "0.55");
        assert_eq!(truncate_value(-1.987_65, 4), "-1.9");
    }

    #[test]
    fn name_is_cut_to_column() {
        assert_eq!(truncate_name("left_shoulder_pitch", 10), "left_shoul");
        assert_eq!(truncate_name("hip", 10), "hip");
    }
}
