use std::f64::consts::TAU;

use serde::Serialize;

use super::utilities::{LayoutEngine, group_by};

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// The y axis grows downwards on screen, so the sine term is subtracted.
pub fn polar_to_cartesian(center_x: f64, center_y: f64, alpha: f64, radius: f64) -> Point {
    Point {
        x: center_x + radius * alpha.cos(),
        y: center_y - radius * alpha.sin(),
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct LayoutNode {
    pub public_key: String,
    pub ring: usize,
    pub alpha: f64,
    pub position: Point,
}

impl LayoutNode {
    pub fn new(public_key: impl Into<String>, ring: usize) -> Self {
        Self {
            public_key: public_key.into(),
            ring,
            alpha: 0.0,
            position: Point::default(),
        }
    }
}

pub fn apply_alpha_linear(nodes: &mut [LayoutNode], alpha_start: f64, alpha_end: f64) {
    let n = nodes.len();
    if n == 0 {
        return;
    }

    let step = (alpha_end - alpha_start) / n as f64;
    for (index, node) in nodes.iter_mut().enumerate() {
        node.alpha = alpha_start + index as f64 * step;
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RadialLayoutConfig {
    pub center: Point,
    pub ring_spacing: f64,
    pub alpha_start: f64,
    pub alpha_end: f64,
}

impl Default for RadialLayoutConfig {
    fn default() -> Self {
        Self {
            center: Point::default(),
            ring_spacing: 220.0,
            alpha_start: 0.0,
            alpha_end: TAU,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct RadialLayout {
    config: RadialLayoutConfig,
    placed: Vec<LayoutNode>,
}

impl RadialLayout {
    pub fn new(config: RadialLayoutConfig) -> Self {
        Self {
            config,
            placed: Vec::new(),
        }
    }

    pub fn nodes(&self) -> &[LayoutNode] {
        &self.placed
    }

    pub fn into_nodes(self) -> Vec<LayoutNode> {
        self.placed
    }
}

impl LayoutEngine for RadialLayout {
    type Node = LayoutNode;

    fn initialize(&mut self, nodes: Vec<LayoutNode>) {
        let RadialLayoutConfig {
            center,
            ring_spacing,
            alpha_start,
            alpha_end,
        } = self.config;

        let mut rings = group_by(nodes, |node| Some(node.ring));
        rings.sort_unstable_keys();

        self.placed.clear();
        for (ring, mut members) in rings {
            let ring_radius = ring.unwrap_or_default() as f64 * ring_spacing;
            apply_alpha_linear(&mut members, alpha_start, alpha_end);
            for node in &mut members {
                node.position = polar_to_cartesian(center.x, center.y, node.alpha, ring_radius);
            }
            self.placed.extend(members);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::f64::consts::{FRAC_PI_2, PI};

    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn polar_to_cartesian_inverts_y() {
        let up = polar_to_cartesian(100.0, 100.0, FRAC_PI_2, 10.0);
        assert!(close(up.x, 100.0));
        assert!(close(up.y, 90.0));

        let left = polar_to_cartesian(0.0, 0.0, PI, 5.0);
        assert!(close(left.x, -5.0));
        assert!(close(left.y, 0.0));
    }

    #[test]
    fn zero_radius_is_the_center() {
        let point = polar_to_cartesian(3.0, -4.0, 1.234, 0.0);

        assert_eq!(point, Point { x: 3.0, y: -4.0 });
    }

    #[test]
    fn alpha_linear_spreads_evenly() {
        let mut nodes = (0..4)
            .map(|index| LayoutNode::new(format!("n{index}"), 1))
            .collect::<Vec<_>>();
        apply_alpha_linear(&mut nodes, 0.0, TAU);

        let alphas = nodes.iter().map(|node| node.alpha).collect::<Vec<_>>();
        assert!(close(alphas[0], 0.0));
        assert!(close(alphas[1], FRAC_PI_2));
        assert!(close(alphas[2], PI));
        assert!(close(alphas[3], 3.0 * FRAC_PI_2));
    }

    #[test]
    fn alpha_linear_on_empty_slice_is_noop() {
        let mut nodes: Vec<LayoutNode> = Vec::new();
        apply_alpha_linear(&mut nodes, 0.0, TAU);

        assert!(nodes.is_empty());
    }

    #[test]
    fn radial_layout_places_rings() {
        let mut layout = RadialLayout::new(RadialLayoutConfig {
            ring_spacing: 100.0,
            ..RadialLayoutConfig::default()
        });
        layout.initialize(vec![
            LayoutNode::new("A", 1),
            LayoutNode::new("focus", 0),
            LayoutNode::new("B", 1),
        ]);

        let nodes = layout.nodes();
        assert_eq!(nodes.len(), 3);
        assert_eq!(nodes[0].public_key, "focus");
        assert_eq!(nodes[0].position, Point::default());

        assert_eq!(nodes[1].public_key, "A");
        assert!(close(nodes[1].position.x, 100.0));
        assert!(close(nodes[1].position.y, 0.0));

        assert_eq!(nodes[2].public_key, "B");
        assert!(close(nodes[2].alpha, PI));
        assert!(close(nodes[2].position.x, -100.0));
    }
}
