//! Keyboard heat map.
//!
//! Each key of a layout is drawn as a colored tile whose color reflects how
//! often its character appears in the layout's language. Prevalence `p` is
//! mapped to a heat score
//!
//! ```text
//! score = 30p + ln(1 + 120p)
//! ```
//!
//! The linear term spreads out common letters; the logarithmic term keeps rare
//! ones distinguishable from keys that are never typed. The score then drives
//! the linear color ramp in [`HeatConfig`].

use crate::config::{HeatConfig, KeyboardConfig};
use crate::frequency::FrequencyTable;
use maud::{Markup, html};

/// Heat score for a prevalence in `[0, 1]`. `heat_score(0.0) == 0.0`.
pub fn heat_score(prevalence: f64) -> f64 {
    prevalence * 30.0 + (prevalence * 120.0).ln_1p()
}

/// An RGB triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub fn to_css(self) -> String {
        format!("rgb({}, {}, {})", self.0, self.1, self.2)
    }
}

fn channel(value: f64) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}

/// Color for a heat score: red rises, green and blue fall, all from the same
/// baseline.
pub fn heat_color(score: f64, heat: &HeatConfig) -> Rgb {
    Rgb(
        channel(heat.baseline + heat.red * score),
        channel(heat.baseline - heat.green * score),
        channel(heat.baseline - heat.blue * score),
    )
}

/// Percentage rounded to two decimals, printed in its shortest form but with
/// at least one decimal place (`12.0`, `3.25`).
pub fn format_percentage(prevalence: f64) -> String {
    let pct = (prevalence * 100.0 * 100.0).round() / 100.0;
    format!("{pct:?}")
}

/// Tooltip shown when hovering a key.
pub fn key_title(prevalence: f64) -> String {
    format!("Key usage: {}%", format_percentage(prevalence))
}

fn render_key(key: char, table: &FrequencyTable, heat: &HeatConfig) -> Markup {
    let prevalence = table.prevalence(key);
    let color = heat_color(heat_score(prevalence), heat);
    let style = format!("background-color: {}", color.to_css());
    html! {
        div.key style=(style) title=(key_title(prevalence)) { (key) }
    }
}

fn render_gap() -> Markup {
    html! { div.key-gap {} }
}

/// Render the key tiles for a layout, one fragment per line.
///
/// A gap tile follows every position listed in `keyboard.row_breaks`.
pub fn render_keyboard(
    keys: &[char],
    table: &FrequencyTable,
    keyboard: &KeyboardConfig,
    heat: &HeatConfig,
) -> String {
    let mut fragments = Vec::with_capacity(keys.len() + keyboard.row_breaks.len());
    for (idx, &key) in keys.iter().enumerate() {
        fragments.push(render_key(key, table, heat).into_string());
        if keyboard.row_breaks.contains(&idx) {
            fragments.push(render_gap().into_string());
        }
    }
    fragments.join("\n    ")
}
