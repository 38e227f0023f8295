use ratatui::layout::{Constraint, Direction, Layout, Rect};

pub struct QuizLayout {
    pub header_area: Rect,
    pub progress_area: Rect,
    pub body_area: Rect,
    pub help_area: Rect,
}

pub struct ListLayout {
    pub header_area: Rect,
    pub content_area: Rect,
    pub footer_area: Rect,
}

pub fn calculate_quiz_chunks(area: Rect) -> QuizLayout {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Min(6),
            Constraint::Length(3),
        ])
        .split(area);

    QuizLayout {
        header_area: chunks[0],
        progress_area: chunks[1],
        body_area: chunks[2],
        help_area: chunks[3],
    }
}

pub fn calculate_list_chunks(area: Rect) -> ListLayout {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(3),
        ])
        .split(area);

    ListLayout {
        header_area: chunks[0],
        content_area: chunks[1],
        footer_area: chunks[2],
    }
}

/// Popup area centered in `area`, sized in percent of it.
pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quiz_layout() {
        let layout = calculate_quiz_chunks(Rect::new(0, 0, 100, 40));

        assert_eq!(layout.header_area.height, 3);
        assert_eq!(layout.progress_area.height, 1);
        assert_eq!(layout.help_area.height, 3);
        // 40 - 2 margin - 3 - 1 - 3
        assert_eq!(layout.body_area.height, 31);
    }

    #[test]
    fn test_list_layout() {
        let layout = calculate_list_chunks(Rect::new(0, 0, 100, 100));

        assert_eq!(layout.header_area.height, 3);
        assert_eq!(layout.footer_area.height, 3);
        assert_eq!(layout.content_area.height, 92);
    }

    #[test]
    fn test_centered_rect_stays_inside() {
        let area = Rect::new(0, 0, 100, 50);
        let popup = centered_rect(60, 40, area);

        assert_eq!(popup.width, 60);
        assert_eq!(popup.height, 20);
        assert!(popup.x >= area.x && popup.right() <= area.right());
        assert!(popup.y >= area.y && popup.bottom() <= area.bottom());
    }
}
