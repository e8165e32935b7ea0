//! Input rules shared by every surface.

/// Viewport width (logical pixels) at or below which Enter inserts a newline.
pub const DEFAULT_SUBMIT_MIN_WIDTH_PX: u32 = 800;

/// Trim raw input; `None` means there is nothing to send.
pub fn normalize_input(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Decides whether Enter submits or inserts a newline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyPolicy {
    /// Viewport must be strictly wider than this for Enter to submit.
    pub submit_min_width_px: u32,
}

impl Default for KeyPolicy {
    fn default() -> Self {
        Self {
            submit_min_width_px: DEFAULT_SUBMIT_MIN_WIDTH_PX,
        }
    }
}

impl KeyPolicy {
    /// Create a policy with a custom width threshold.
    pub fn new(submit_min_width_px: u32) -> Self {
        Self {
            submit_min_width_px,
        }
    }

    /// Whether Enter (with or without Shift) should submit.
    ///
    /// `viewport_width_px` is `None` when the surface cannot report a pixel
    /// width; such viewports count as wide.
    pub fn enter_submits(&self, shift: bool, viewport_width_px: Option<u32>) -> bool {
        if shift {
            return false;
        }
        viewport_width_px.is_none_or(|width| width > self.submit_min_width_px)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_input_trims() {
        assert_eq!(normalize_input("  hello world \n"), Some("hello world".into()));
    }

    #[test]
    fn test_normalize_input_blank_is_none() {
        assert_eq!(normalize_input(""), None);
        assert_eq!(normalize_input("   "), None);
        assert_eq!(normalize_input("\n\t \n"), None);
    }

    #[test]
    fn test_enter_submits_on_wide_viewport() {
        let policy = KeyPolicy::default();
        assert!(policy.enter_submits(false, Some(1024)));
        assert!(!policy.enter_submits(true, Some(1024)));
    }

    #[test]
    fn test_enter_inserts_newline_on_narrow_viewport() {
        let policy = KeyPolicy::default();
        assert!(!policy.enter_submits(false, Some(800)));
        assert!(!policy.enter_submits(false, Some(375)));
        assert!(policy.enter_submits(false, Some(801)));
    }

    #[test]
    fn test_unknown_width_counts_as_wide() {
        assert!(KeyPolicy::new(800).enter_submits(false, None));
        assert!(!KeyPolicy::new(800).enter_submits(true, None));
    }
}
