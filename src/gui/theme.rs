use eframe::egui::{
    self,
    RichText,
};
use egui::{
    style::{
        Selection,
        WidgetVisuals,
        Widgets,
    },
    Color32,
    Stroke,
    Visuals,
};

use crate::core::config::ThemeMode;

#[derive(Clone)]
pub struct Theme {
    dark: ThemeDetails,
    light: ThemeDetails,
    pub fretboard: FretboardColors,
}

impl Default for Theme {
    fn default() -> Self {
        Self { dark: ThemeDetails::dark(), light: ThemeDetails::light(), fretboard: FretboardColors::wood() }
    }
}

impl Theme {
    pub fn heading(&self, dark_mode: bool, content: &str) -> RichText {
        RichText::new(content).color(self.accent(dark_mode)).underline()
    }

    pub fn accent(&self, dark_mode: bool) -> Color32 {
        if dark_mode { self.dark.accent } else { self.light.accent }
    }

    pub fn chord_name(&self, content: &str) -> RichText {
        RichText::new(content).size(28.0).strong()
    }
}

#[derive(Clone)]
struct ThemeDetails {
    background: Color32,
    foreground: Color32,
    panel: Color32,
    stripe: Color32,
    header: Color32,
    accent: Color32,
    warning: Color32,
}

impl ThemeDetails {
    fn dark() -> Self {
        Self {
            background: Color32::from_rgb(0x2e, 0x2e, 0x2e),
            foreground: Color32::from_rgb(0xff, 0xff, 0xff),
            panel: Color32::from_rgb(0x24, 0x24, 0x24),
            stripe: Color32::from_rgb(0x3a, 0x3a, 0x3a),
            header: Color32::from_rgb(0x1e, 0x1e, 0x1e),
            accent: Color32::from_rgb(0xd4, 0xa3, 0x73),
            warning: Color32::from_rgb(0xe0, 0x6c, 0x5a),
        }
    }

    fn light() -> Self {
        Self {
            background: Color32::from_rgb(0xf0, 0xf0, 0xf0),
            foreground: Color32::from_rgb(0x00, 0x00, 0x00),
            panel: Color32::from_rgb(0xfa, 0xfa, 0xfa),
            stripe: Color32::from_rgb(0xe0, 0xe0, 0xe0),
            header: Color32::from_rgb(0xd0, 0xd0, 0xd0),
            accent: Color32::from_rgb(0x6b, 0x4c, 0x3b),
            warning: Color32::from_rgb(0x8b, 0x00, 0x00),
        }
    }
}

/// The fretboard keeps its wood look in both modes.
#[derive(Clone)]
pub struct FretboardColors {
    pub wood: Color32,
    pub label: Color32,
    pub string: Color32,
    pub fret: Color32,
    pub marker: Color32,
    pub marker_text: Color32,
}

impl FretboardColors {
    fn wood() -> Self {
        Self {
            wood: Color32::from_rgb(0xf3, 0xe9, 0xd2),
            label: Color32::from_rgb(0x3b, 0x3b, 0x3b),
            string: Color32::from_rgb(0x4a, 0x4a, 0x4a),
            fret: Color32::from_rgb(0x6b, 0x4c, 0x3b),
            marker: Color32::from_rgb(0x8b, 0x00, 0x00),
            marker_text: Color32::WHITE,
        }
    }
}

/// Registers both variants; the active one follows `mode`.
pub fn set_theme(ctx: &egui::Context, theme: &Theme, mode: ThemeMode) {
    set_theme_variant(ctx, &theme.dark, true);
    set_theme_variant(ctx, &theme.light, false);
    apply_theme_mode(ctx, mode);
}

pub fn apply_theme_mode(ctx: &egui::Context, mode: ThemeMode) {
    let (theme, preference) = match mode {
        ThemeMode::Dark => (egui::Theme::Dark, egui::ThemePreference::Dark),
        ThemeMode::Light => (egui::Theme::Light, egui::ThemePreference::Light),
    };
    ctx.set_theme(theme);
    ctx.options_mut(|o| o.theme_preference = preference);
}

fn set_theme_variant(ctx: &egui::Context, theme: &ThemeDetails, is_dark: bool) {
    let (default, variant) = match is_dark {
        true => (Visuals::dark(), egui::Theme::Dark),
        false => (Visuals::light(), egui::Theme::Light),
    };

    ctx.set_visuals_of(
        variant,
        Visuals {
            dark_mode: is_dark,
            widgets: Widgets {
                noninteractive: WidgetVisuals {
                    bg_fill: theme.background,
                    bg_stroke: Stroke { color: theme.header, ..default.widgets.noninteractive.bg_stroke },
                    fg_stroke: Stroke {
                        color: theme.foreground,
                        ..default.widgets.noninteractive.fg_stroke
                    },
                    ..default.widgets.noninteractive
                },
                inactive: WidgetVisuals {
                    bg_fill: theme.stripe,
                    weak_bg_fill: theme.stripe,
                    fg_stroke: Stroke { color: theme.foreground, ..default.widgets.inactive.fg_stroke },
                    ..default.widgets.inactive
                },
                hovered: WidgetVisuals {
                    bg_stroke: Stroke { color: theme.accent, ..default.widgets.hovered.bg_stroke },
                    ..default.widgets.hovered
                },
                ..default.widgets
            },
            selection: Selection {
                bg_fill: theme.accent.linear_multiply(0.4),
                stroke: Stroke { color: theme.foreground, ..default.selection.stroke },
            },
            faint_bg_color: theme.stripe,
            extreme_bg_color: theme.header,
            panel_fill: theme.panel,
            window_fill: theme.background,
            warn_fg_color: theme.warning,
            ..default
        },
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heading_accent_follows_mode() {
        let theme = Theme::default();

        assert_eq!(theme.accent(true), ThemeDetails::dark().accent);
        assert_eq!(theme.accent(false), ThemeDetails::light().accent);
        assert_ne!(theme.accent(true), theme.accent(false));
    }
}
