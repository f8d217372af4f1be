//! Node render color policy.
//!
//! A pure mapping from (node, active highlight set, reference key) to a
//! render color. Keeping this out of the session means the view can recolor
//! every frame without touching search state.

use std::collections::HashSet;

use crate::graph::{GraphNode, NodeKind};

/// Opacity applied to non-matching nodes while a highlight is active.
pub const DIMMED_ALPHA: f32 = 0.15;

/// An RGBA render color.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Opacity in `[0, 1]`.
    pub a: f32,
}

impl Color {
    /// Fully opaque color.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// The same hue at a different opacity.
    pub const fn with_alpha(self, a: f32) -> Self {
        Self {
            r: self.r,
            g: self.g,
            b: self.b,
            a,
        }
    }

    /// CSS form: hex when opaque, `rgba(...)` otherwise.
    pub fn to_css(self) -> String {
        if self.a >= 1.0 {
            format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
        } else {
            format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
        }
    }
}

/// The reference profile's color (cyan).
pub const REFERENCE: Color = Color::rgb(0x06, 0xB6, 0xD4);

/// Base article color (amber).
pub const ARTICLE: Color = Color::rgb(0xF5, 0x9E, 0x0B);

/// Base profile color (gray).
pub const PROFILE: Color = Color::rgb(0xD1, 0xD5, 0xDB);

/// Highlighted-match color (bright amber).
pub const EMPHASIS: Color = Color::rgb(0xFB, 0xBF, 0x24);

/// Resolves the render color for one node.
///
/// The reference profile always keeps its color at full opacity, even while
/// a highlight is active. With an active highlight, matches get the
/// emphasis color and everything else is dimmed to [`DIMMED_ALPHA`] of its
/// base hue. With no highlight, nodes wear their base population color.
pub fn node_color(
    node: &GraphNode,
    highlight: Option<&HashSet<String>>,
    reference_key: Option<&str>,
) -> Color {
    if reference_key == Some(node.key.as_str()) {
        return REFERENCE;
    }

    let base = match node.kind {
        NodeKind::Article => ARTICLE,
        NodeKind::Profile => PROFILE,
    };

    match highlight {
        Some(matches) if matches.contains(&node.key) => EMPHASIS,
        Some(_) => base.with_alpha(DIMMED_ALPHA),
        None => base,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(key: &str, kind: NodeKind) -> GraphNode {
        GraphNode {
            key: key.to_string(),
            id: key.split(':').nth(1).unwrap_or(key).to_string(),
            kind,
            label: String::new(),
            x: 0.0,
            y: 0.0,
            z: 0.0,
        }
    }

    #[test]
    fn test_base_colors_without_highlight() {
        let article = node("article:a", NodeKind::Article);
        let profile = node("profile:p", NodeKind::Profile);
        assert_eq!(node_color(&article, None, None), ARTICLE);
        assert_eq!(node_color(&profile, None, None), PROFILE);
    }

    #[test]
    fn test_reference_color_overrides_everything() {
        let profile = node("profile:me", NodeKind::Profile);
        let highlight: HashSet<String> = HashSet::new();
        assert_eq!(node_color(&profile, None, Some("profile:me")), REFERENCE);
        // Still full reference color while a highlight dims the rest.
        assert_eq!(
            node_color(&profile, Some(&highlight), Some("profile:me")),
            REFERENCE
        );
    }

    #[test]
    fn test_matches_are_emphasized_and_rest_dimmed() {
        let hit = node("article:hit", NodeKind::Article);
        let miss = node("article:miss", NodeKind::Article);
        let bystander = node("profile:p", NodeKind::Profile);
        let highlight: HashSet<String> = ["article:hit".to_string()].into_iter().collect();

        assert_eq!(node_color(&hit, Some(&highlight), None), EMPHASIS);
        assert_eq!(
            node_color(&miss, Some(&highlight), None),
            ARTICLE.with_alpha(DIMMED_ALPHA)
        );
        assert_eq!(
            node_color(&bystander, Some(&highlight), None),
            PROFILE.with_alpha(DIMMED_ALPHA)
        );
    }

    #[test]
    fn test_css_forms() {
        assert_eq!(REFERENCE.to_css(), "#06B6D4");
        assert_eq!(
            ARTICLE.with_alpha(0.15).to_css(),
            "rgba(245, 158, 11, 0.15)"
        );
    }
}
