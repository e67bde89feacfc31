use serde::{Deserialize, Serialize};

/// Device frame the preview is rendered into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Viewport {
    #[default]
    Desktop,
    Tablet,
    Mobile,
}

impl Viewport {
    /// Fixed frame size in CSS pixels, `None` when filling the container
    pub fn dimensions(&self) -> Option<(u32, u32)> {
        match self {
            Viewport::Desktop => None,
            Viewport::Tablet => Some((768, 1024)),
            Viewport::Mobile => Some((375, 667)),
        }
    }

    /// Inline style for the preview frame
    pub fn frame_style(&self) -> String {
        match self.dimensions() {
            None => "width: 100%; height: 100%; border: none;".to_string(),
            Some((width, height)) => format!(
                "width: {width}px; height: {height}px; margin: 0 auto; \
                 border: 1px solid #ddd; border-radius: 8px;"
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_device_sizes() {
        assert_eq!(Viewport::Mobile.dimensions(), Some((375, 667)));
        assert_eq!(Viewport::Tablet.dimensions(), Some((768, 1024)));
        assert!(Viewport::Desktop.frame_style().contains("100%"));
        assert!(Viewport::Mobile.frame_style().starts_with("width: 375px; height: 667px;"));
    }
}
