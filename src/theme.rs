use crate::persona::AccentColor;
use eframe::egui::{self, Color32, CornerRadius, FontId, Frame, Margin, Stroke, TextStyle};

#[derive(Debug, Clone)]
pub struct Theme {
    pub surface_0: Color32,
    pub surface_1: Color32,
    pub surface_2: Color32,
    pub surface_3: Color32,
    pub accent_green: Color32,
    pub accent_blue: Color32,
    pub accent_yellow: Color32,
    pub accent_purple: Color32,
    pub text_primary: Color32,
    pub text_muted: Color32,
    pub text_on_accent: Color32,
    pub border_subtle: Color32,
    pub spacing_4: f32,
    pub spacing_8: f32,
    pub spacing_12: f32,
    pub radius_12: u8,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            surface_0: Color32::from_rgb(0x0F, 0x11, 0x15),
            surface_1: Color32::from_rgb(0x16, 0x1A, 0x20),
            surface_2: Color32::from_rgb(0x1C, 0x22, 0x2B),
            surface_3: Color32::from_rgb(0x22, 0x2A, 0x35),
            accent_green: Color32::from_rgb(0x22, 0xC5, 0x5E),
            accent_blue: Color32::from_rgb(0x3B, 0x82, 0xF6),
            accent_yellow: Color32::from_rgb(0xEA, 0xB3, 0x08),
            accent_purple: Color32::from_rgb(0xA8, 0x55, 0xF7),
            text_primary: Color32::from_rgb(0xE6, 0xED, 0xF3),
            text_muted: Color32::from_rgb(0x8B, 0x94, 0x9E),
            text_on_accent: Color32::from_rgb(0xF8, 0xFB, 0xFF),
            border_subtle: Color32::from_rgba_premultiplied(255, 255, 255, 13),
            spacing_4: 4.0,
            spacing_8: 8.0,
            spacing_12: 12.0,
            radius_12: 12,
        }
    }
}

impl Theme {
    pub fn accent(&self, accent: AccentColor) -> Color32 {
        match accent {
            AccentColor::Green => self.accent_green,
            AccentColor::Blue => self.accent_blue,
            AccentColor::Yellow => self.accent_yellow,
            AccentColor::Purple => self.accent_purple,
        }
    }

    pub fn apply_visuals(&self, ctx: &egui::Context) {
        let mut visuals = egui::Visuals::dark();
        visuals.panel_fill = self.surface_1;
        visuals.override_text_color = Some(self.text_primary);
        visuals.widgets.noninteractive.fg_stroke.color = self.text_primary;
        visuals.widgets.noninteractive.bg_fill = self.surface_2;
        visuals.widgets.noninteractive.weak_bg_fill = self.surface_2;
        visuals.widgets.noninteractive.bg_stroke = Stroke::NONE;
        visuals.widgets.inactive.bg_fill = self.surface_2;
        visuals.widgets.inactive.fg_stroke.color = self.text_primary;
        visuals.widgets.inactive.bg_stroke = Stroke::NONE;
        visuals.widgets.hovered.bg_fill = self.surface_3;
        visuals.widgets.hovered.bg_stroke = Stroke::NONE;
        visuals.widgets.hovered.fg_stroke.color = self.text_primary;
        visuals.widgets.active.bg_fill = self.surface_3;
        visuals.widgets.active.bg_stroke = Stroke::NONE;
        visuals.widgets.active.fg_stroke.color = self.text_primary;
        visuals.selection.bg_fill = self.accent_blue;
        visuals.window_fill = self.surface_1;
        visuals.window_stroke = Stroke::NONE;

        let mut style = (*ctx.style()).clone();
        style.visuals = visuals;
        style.spacing.item_spacing = egui::vec2(8.0, 8.0);
        style.spacing.button_padding = egui::vec2(12.0, 8.0);
        style.text_styles.insert(TextStyle::Heading, FontId::proportional(17.0));
        style.text_styles.insert(TextStyle::Body, FontId::proportional(14.0));
        style.text_styles.insert(TextStyle::Small, FontId::proportional(11.0));
        ctx.set_style(style);
    }

    pub fn card_frame(&self) -> Frame {
        Frame::new()
            .fill(self.surface_2)
            .inner_margin(Margin::same(self.spacing_12 as i8))
            .corner_radius(CornerRadius::same(self.radius_12))
            .stroke(Stroke::new(1.0, self.border_subtle))
    }

    pub fn user_bubble_frame(&self, accent: Color32) -> Frame {
        Frame::new()
            .fill(accent)
            .inner_margin(Margin::symmetric(self.spacing_12 as i8, self.spacing_8 as i8))
            .corner_radius(CornerRadius::same(self.radius_12))
            .stroke(Stroke::NONE)
    }

    pub fn bot_bubble_frame(&self) -> Frame {
        Frame::new()
            .fill(self.surface_2)
            .inner_margin(Margin::symmetric(self.spacing_12 as i8, self.spacing_8 as i8))
            .corner_radius(CornerRadius::same(self.radius_12))
            .stroke(Stroke::new(1.0, self.border_subtle))
    }

    pub fn composer_frame(&self) -> Frame {
        Frame::new()
            .fill(self.surface_2)
            .inner_margin(Margin::symmetric(self.spacing_12 as i8, 10))
            .corner_radius(CornerRadius::same(self.radius_12))
            .stroke(Stroke::NONE)
    }
}
