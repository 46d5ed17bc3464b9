/// First row to draw so that `selected_index` stays inside the window.
pub const fn scroll_offset(
    total_rows: usize,
    max_visible_rows: usize,
    selected_index: usize,
) -> usize {
    if total_rows <= max_visible_rows || selected_index < max_visible_rows {
        return 0;
    }

    selected_index + 1 - max_visible_rows
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_tables_never_scroll() {
        assert_eq!(scroll_offset(5, 10, 4), 0);
        assert_eq!(scroll_offset(0, 10, 0), 0);
    }

    #[test]
    fn selection_near_top_keeps_first_page() {
        assert_eq!(scroll_offset(40, 10, 0), 0);
        assert_eq!(scroll_offset(40, 10, 9), 0);
    }

    #[test]
    fn selection_past_window_scrolls_to_bottom_edge() {
        assert_eq!(scroll_offset(40, 10, 10), 1);
        assert_eq!(scroll_offset(40, 10, 39), 30);
    }
}
