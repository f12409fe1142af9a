//! Pure helpers shared by the lookup update and view code.

/// How close to the end of a scroll container the user must be, in
/// pixels, before the next page is requested.
pub const LOAD_MORE_PROXIMITY_PX: i32 = 600;

/// Proximity predicate evaluated on every scroll event of a history
/// list. The three arguments come straight from the container element.
pub fn near_bottom(scroll_top: i32, client_height: i32, scroll_height: i32) -> bool {
    scroll_top + client_height + LOAD_MORE_PROXIMITY_PX >= scroll_height
}

/// Share of searches that hit, as a percentage, or `None` while no
/// search was recorded yet.
pub fn success_rate(found_total: u64, not_found_total: u64) -> Option<f64> {
    let total = found_total + not_found_total;
    if total == 0 {
        return None;
    }
    Some(found_total as f64 * 100.0 / total as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn near_bottom_fires_within_the_proximity_band() {
        // 2000px of content, 600px viewport: the threshold sits at 800px.
        assert!(!near_bottom(700, 600, 2000));
        assert!(near_bottom(800, 600, 2000));
        assert!(near_bottom(1400, 600, 2000));
    }

    #[test]
    fn near_bottom_is_true_when_content_fits_the_viewport() {
        assert!(near_bottom(0, 600, 400));
    }

    #[test]
    fn success_rate_is_undefined_without_searches() {
        assert_eq!(success_rate(0, 0), None);
        assert_eq!(success_rate(3, 1), Some(75.0));
        assert_eq!(success_rate(0, 4), Some(0.0));
    }
}
