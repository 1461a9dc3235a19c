//! Layout utilities

use ratatui::layout::{Constraint, Direction, Layout, Rect};

use crate::app::state::PanelVisibility;

/// Minimum width for the chapter list panel
const CHAPTERS_MIN_WIDTH: u16 = 24;

/// Split the reader area into the visible panels, left to right
pub fn panel_layout(area: Rect, visibility: &PanelVisibility) -> Vec<Rect> {
    let mut constraints = Vec::new();

    // Chapter list (left): 20% width, min 24 cols
    if visibility.chapters {
        constraints.push(Constraint::Length((area.width / 5).max(CHAPTERS_MIN_WIDTH)));
    }

    // Content (center): flexible
    constraints.push(Constraint::Min(30));

    // Notes (right): 25% width
    if visibility.notes {
        constraints.push(Constraint::Length(area.width / 4));
    }

    Layout::default().direction(Direction::Horizontal).constraints(constraints).split(area).to_vec()
}

/// Create a centered rectangle with the given percentage of width and height
pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::vertical([
        Constraint::Percentage((100 - percent_y) / 2),
        Constraint::Percentage(percent_y),
        Constraint::Percentage((100 - percent_y) / 2),
    ])
    .split(r);

    Layout::horizontal([
        Constraint::Percentage((100 - percent_x) / 2),
        Constraint::Percentage(percent_x),
        Constraint::Percentage((100 - percent_x) / 2),
    ])
    .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_with_all_panels() {
        let area = Rect::new(0, 0, 120, 40);
        let chunks = panel_layout(area, &PanelVisibility { chapters: true, notes: true });
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].width, 24);
        assert_eq!(chunks[2].width, 30);
    }

    #[test]
    fn layout_with_chapters_only() {
        let area = Rect::new(0, 0, 100, 40);
        let chunks = panel_layout(area, &PanelVisibility { chapters: true, notes: false });
        assert_eq!(chunks.len(), 2);
    }

    #[test]
    fn layout_with_content_only() {
        let area = Rect::new(0, 0, 80, 40);
        let chunks = panel_layout(area, &PanelVisibility { chapters: false, notes: false });
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].width, 80);
    }

    #[test]
    fn centered_rect_is_inside() {
        let area = Rect::new(0, 0, 100, 50);
        let rect = centered_rect(60, 40, area);
        assert_eq!(rect.width, 60);
        assert_eq!(rect.height, 20);
        assert_eq!(rect.x, 20);
    }
}
