use crate::config::AnimationConfig;

/// Pixel widths read from an expanded row.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Measurements {
    /// Inner width of the whole row.
    pub row_width: f64,
    /// Width of the fixed `"<platform>:"` label.
    pub label_width: f64,
    /// Natural width of the detail text.
    pub text_width: f64,
}

impl Measurements {
    pub fn available_width(&self, animation: &AnimationConfig) -> f64 {
        self.row_width - self.label_width - animation.scroll_margin_px
    }

    pub fn plan(&self, animation: &AnimationConfig) -> ScrollDecision {
        let available = self.available_width(animation);
        let threshold = animation.scroll_threshold_px.max(0.0);
        if self.text_width > available + threshold {
            ScrollDecision::Animate {
                distance: self.text_width - available,
            }
        } else {
            ScrollDecision::Static
        }
    }
}

/// How the detail text is presented once measured.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum ScrollDecision {
    #[default]
    Static,
    /// Slide left by `distance` pixels so the trailing edge becomes visible.
    Animate { distance: f64 },
}

impl ScrollDecision {
    pub fn is_animated(&self) -> bool {
        matches!(self, ScrollDecision::Animate { .. })
    }

    pub fn container_class(&self) -> &'static str {
        match self {
            ScrollDecision::Static => "date-scroll-container",
            ScrollDecision::Animate { .. } => "date-scroll-container animate-scroll",
        }
    }

    /// Inline style carrying the CSS custom property read by the keyframes.
    pub fn container_style(&self) -> Option<String> {
        match self {
            ScrollDecision::Static => None,
            ScrollDecision::Animate { distance } => Some(format!("--scroll-distance: -{distance}px")),
        }
    }
}
