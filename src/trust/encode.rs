use std::sync::Arc;

use super::graph::{GraphData, Link, Node};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VisualRange {
    min: f64,
    max: f64,
}

impl VisualRange {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn midpoint(&self) -> f64 {
        (self.min + self.max) / 2.0
    }

    pub fn interpolate(&self, value: f64, lo: f64, hi: f64) -> f64 {
        let range = hi - lo;
        if range.is_nan() || range <= 0.0 {
            return self.midpoint();
        }

        let t = ((value - lo) / range).clamp(0.0, 1.0);
        self.min + (self.max - self.min) * t
    }
}

#[derive(Clone, Debug)]
pub struct NodeEncoder {
    radius: VisualRange,
    data: Arc<GraphData>,
}

impl NodeEncoder {
    pub fn new(min_radius: f64, max_radius: f64, data: Arc<GraphData>) -> Self {
        Self {
            radius: VisualRange::new(min_radius, max_radius),
            data,
        }
    }

    pub fn calculate_radius(&self, node: &Node) -> f64 {
        self.radius.interpolate(
            node.total_traffic(),
            self.data.min_total_traffic,
            self.data.max_total_traffic,
        )
    }

    pub fn traffic_fraction(&self, node: &Node) -> f64 {
        VisualRange::new(0.0, 1.0).interpolate(
            node.total_traffic(),
            self.data.min_total_traffic,
            self.data.max_total_traffic,
        )
    }
}

#[derive(Clone, Debug)]
pub struct LinkEncoder {
    stroke_width: VisualRange,
    data: Arc<GraphData>,
}

impl LinkEncoder {
    pub fn new(stroke_width_min: f64, stroke_width_max: f64, data: Arc<GraphData>) -> Self {
        Self {
            stroke_width: VisualRange::new(stroke_width_min, stroke_width_max),
            data,
        }
    }

    pub fn calculate_stroke_width(&self, link: Option<&Link>) -> f64 {
        let Some(link) = link else {
            return self.stroke_width.midpoint();
        };

        self.stroke_width.interpolate(
            link.transmission(),
            self.data.min_transmission,
            self.data.max_transmission,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data(min_traffic: f64, max_traffic: f64, min_tx: f64, max_tx: f64) -> Arc<GraphData> {
        Arc::new(GraphData {
            min_total_traffic: min_traffic,
            max_total_traffic: max_traffic,
            min_transmission: min_tx,
            max_transmission: max_tx,
            ..GraphData::default()
        })
    }

    #[test]
    fn stroke_width_halfway() {
        let encoder = LinkEncoder::new(2.0, 10.0, data(0.0, 0.0, 40.0, 100.0));
        let link = Link::new("A", "B", 30.0, 40.0);

        assert_eq!(encoder.calculate_stroke_width(Some(&link)), 6.0);
    }

    #[test]
    fn stroke_width_at_bounds() {
        let encoder = LinkEncoder::new(2.0, 10.0, data(0.0, 0.0, 40.0, 100.0));

        let heaviest = Link::new("A", "B", 60.0, 40.0);
        let lightest = Link::new("A", "B", 40.0, 0.0);
        assert_eq!(encoder.calculate_stroke_width(Some(&heaviest)), 10.0);
        assert_eq!(encoder.calculate_stroke_width(Some(&lightest)), 2.0);
    }

    #[test]
    fn flat_transmission_uses_midpoint() {
        let encoder = LinkEncoder::new(2.0, 10.0, data(0.0, 0.0, 100.0, 100.0));
        let link = Link::new("A", "B", 1.0, 2.0);

        assert_eq!(encoder.calculate_stroke_width(Some(&link)), 6.0);
        assert_eq!(encoder.calculate_stroke_width(None), 6.0);
    }

    #[test]
    fn missing_link_is_midpoint_even_with_spread() {
        let encoder = LinkEncoder::new(2.0, 10.0, data(0.0, 0.0, 40.0, 100.0));

        assert_eq!(encoder.calculate_stroke_width(None), 6.0);
    }

    #[test]
    fn radius_at_minimum_traffic() {
        let encoder = NodeEncoder::new(15.0, 25.0, data(1.0, 2.0, 0.0, 0.0));
        let node = Node::new("A", 0.0, 1.0);

        assert_eq!(encoder.calculate_radius(&node), 15.0);
    }

    #[test]
    fn flat_traffic_uses_midpoint_radius() {
        let encoder = NodeEncoder::new(15.0, 25.0, data(7.0, 7.0, 0.0, 0.0));

        assert_eq!(encoder.calculate_radius(&Node::new("A", 3.0, 4.0)), 20.0);
        assert_eq!(encoder.calculate_radius(&Node::new("B", 0.0, 0.0)), 20.0);
    }

    #[test]
    fn tiny_traffic_range_still_interpolates() {
        let encoder = NodeEncoder::new(15.0, 25.0, data(0.0, 1e-16, 0.0, 0.0));

        assert_eq!(encoder.calculate_radius(&Node::new("A", 1e-16, 0.0)), 25.0);
        assert_eq!(encoder.calculate_radius(&Node::new("B", 0.0, 0.0)), 15.0);
    }

    #[test]
    fn tiny_transmission_range_still_interpolates() {
        let encoder = LinkEncoder::new(2.0, 10.0, data(0.0, 0.0, 0.0, 1e-16));

        let link = Link::new("A", "B", 1e-16, 0.0);

        assert_eq!(encoder.calculate_stroke_width(Some(&link)), 10.0);
    }

    #[test]
    fn stale_aggregate_stays_in_range() {
        let encoder = NodeEncoder::new(15.0, 25.0, data(0.0, 10.0, 0.0, 0.0));

        assert_eq!(encoder.calculate_radius(&Node::new("A", 100.0, 0.0)), 25.0);
        assert_eq!(encoder.calculate_radius(&Node::new("B", -5.0, 0.0)), 15.0);
    }

    #[test]
    fn traffic_fraction_is_normalized() {
        let encoder = NodeEncoder::new(15.0, 25.0, data(0.0, 10.0, 0.0, 0.0));

        assert_eq!(encoder.traffic_fraction(&Node::new("A", 2.5, 0.0)), 0.25);
    }
}
