use eframe::egui::{Color32, Painter, Pos2, Rect};

use crate::graph::EntityKind;
use crate::payload::CampaignLabel;

pub(super) fn dim_color(color: Color32, factor: f32) -> Color32 {
    let factor = factor.clamp(0.0, 1.0);
    Color32::from_rgba_unmultiplied(
        (color.r() as f32 * factor) as u8,
        (color.g() as f32 * factor) as u8,
        (color.b() as f32 * factor) as u8,
        (color.a() as f32 * (0.45 + (factor * 0.55))) as u8,
    )
}

pub(super) fn draw_background(painter: &Painter, rect: Rect) {
    painter.rect_filled(rect, 0.0, Color32::from_rgb(19, 23, 29));
}

pub(super) fn circle_visible(rect: Rect, position: Pos2, radius: f32) -> bool {
    !(position.x + radius < rect.left()
        || position.x - radius > rect.right()
        || position.y + radius < rect.top()
        || position.y - radius > rect.bottom())
}

pub(super) fn entity_color(kind: EntityKind) -> Color32 {
    match kind {
        EntityKind::Campaign => Color32::from_rgb(0x8b, 0x5c, 0xf6),
        EntityKind::User => Color32::from_rgb(0xec, 0x48, 0x99),
        EntityKind::Keyword => Color32::from_rgb(0xf4, 0xf4, 0xf5),
    }
}

/// World-space sphere radius per entity kind.
pub(super) fn entity_size(kind: EntityKind) -> f32 {
    match kind {
        EntityKind::Campaign => 1.0,
        EntityKind::User => 0.6,
        EntityKind::Keyword => 0.3,
    }
}

pub(super) fn label_color(label: CampaignLabel) -> Color32 {
    match label {
        CampaignLabel::AntiIndia => Color32::from_rgb(190, 52, 64),
        CampaignLabel::NotAnti => Color32::from_rgb(46, 140, 120),
        CampaignLabel::Unlabelled => Color32::from_rgb(34, 38, 46),
    }
}
