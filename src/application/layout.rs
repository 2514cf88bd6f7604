// Graph layout engine contract and a force-directed default
use crate::application::view_model::Point;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutNode {
    pub charge: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutLink {
    pub source: usize,
    pub target: usize,
    pub distance: f64,
}

/// Pluggable layout: the topology view only needs positions per tick.
pub trait LayoutEngine {
    fn start(&mut self, nodes: Vec<LayoutNode>, links: Vec<LayoutLink>, size: (f64, f64));
    /// Advance one tick; `false` once the layout has converged
    fn step(&mut self) -> bool;
    fn positions(&self) -> &[Point];
    fn is_running(&self) -> bool;
    /// Hold a node at `to` and reheat the simulation
    fn drag(&mut self, node: usize, to: Point);
    fn release(&mut self, node: usize);
}

const ALPHA_START: f64 = 0.1;
const ALPHA_DECAY: f64 = 0.99;
const ALPHA_MIN: f64 = 0.005;
const FRICTION: f64 = 0.9;

/// Verlet force layout: link springs, pairwise charge, gravity to the center.
#[derive(Debug)]
pub struct ForceLayout {
    gravity: f64,
    alpha: f64,
    size: (f64, f64),
    nodes: Vec<LayoutNode>,
    links: Vec<LayoutLink>,
    weights: Vec<f64>,
    positions: Vec<Point>,
    previous: Vec<Point>,
    held: Vec<bool>,
}

impl ForceLayout {
    pub fn new(gravity: f64) -> Self {
        Self {
            gravity,
            alpha: 0.0,
            size: (0.0, 0.0),
            nodes: Vec::new(),
            links: Vec::new(),
            weights: Vec::new(),
            positions: Vec::new(),
            previous: Vec::new(),
            held: Vec::new(),
        }
    }

    fn seed_positions(&mut self) {
        // Sunflower spiral around the center, deterministic and non-overlapping
        let (cx, cy) = (self.size.0 / 2.0, self.size.1 / 2.0);
        let golden = std::f64::consts::PI * (3.0 - 5f64.sqrt());
        self.positions = (0..self.nodes.len())
            .map(|i| {
                let r = 10.0 * (i as f64 + 0.5).sqrt();
                let theta = i as f64 * golden;
                Point::new(cx + r * theta.cos(), cy + r * theta.sin())
            })
            .collect();
        self.previous = self.positions.clone();
    }

    fn apply_links(&mut self) {
        for link in &self.links {
            let (s, t) = (link.source, link.target);
            if s >= self.positions.len() || t >= self.positions.len() || s == t {
                continue;
            }
            let mut dx = self.positions[t].x - self.positions[s].x;
            let mut dy = self.positions[t].y - self.positions[s].y;
            let len = (dx * dx + dy * dy).sqrt();
            if len == 0.0 {
                continue;
            }
            let l = self.alpha * (len - link.distance) / len;
            dx *= l;
            dy *= l;
            let k = self.weights[s] / (self.weights[t] + self.weights[s]);
            self.positions[t].x -= dx * k;
            self.positions[t].y -= dy * k;
            let k = 1.0 - k;
            self.positions[s].x += dx * k;
            self.positions[s].y += dy * k;
        }
    }

    fn apply_gravity(&mut self) {
        let k = self.alpha * self.gravity;
        let (cx, cy) = (self.size.0 / 2.0, self.size.1 / 2.0);
        for p in &mut self.positions {
            p.x += (cx - p.x) * k;
            p.y += (cy - p.y) * k;
        }
    }

    fn apply_charges(&mut self) {
        let n = self.positions.len();
        for i in 0..n {
            if self.held[i] {
                continue;
            }
            for j in 0..n {
                if i == j {
                    continue;
                }
                let dx = self.positions[j].x - self.positions[i].x;
                let dy = self.positions[j].y - self.positions[i].y;
                let d2 = dx * dx + dy * dy;
                if d2 == 0.0 {
                    continue;
                }
                let k = self.alpha * self.nodes[j].charge / d2;
                self.previous[i].x -= dx * k;
                self.previous[i].y -= dy * k;
            }
        }
    }

    fn integrate(&mut self) {
        for i in 0..self.positions.len() {
            if self.held[i] {
                self.positions[i] = self.previous[i];
                continue;
            }
            let p = self.positions[i];
            let prev = self.previous[i];
            self.positions[i] = Point::new(
                p.x - (prev.x - p.x) * FRICTION,
                p.y - (prev.y - p.y) * FRICTION,
            );
            self.previous[i] = p;
        }
    }
}

impl LayoutEngine for ForceLayout {
    fn start(&mut self, nodes: Vec<LayoutNode>, links: Vec<LayoutLink>, size: (f64, f64)) {
        self.weights = vec![0.0; nodes.len()];
        for link in &links {
            if link.source < nodes.len() && link.target < nodes.len() {
                self.weights[link.source] += 1.0;
                self.weights[link.target] += 1.0;
            }
        }
        // Isolated nodes still need a weight for the spring split
        for w in &mut self.weights {
            if *w == 0.0 {
                *w = 1.0;
            }
        }
        self.held = vec![false; nodes.len()];
        self.nodes = nodes;
        self.links = links;
        self.size = size;
        self.alpha = ALPHA_START;
        self.seed_positions();
    }

    fn step(&mut self) -> bool {
        self.alpha *= ALPHA_DECAY;
        if self.alpha < ALPHA_MIN {
            self.alpha = 0.0;
            return false;
        }
        self.apply_links();
        self.apply_gravity();
        self.apply_charges();
        self.integrate();
        true
    }

    fn positions(&self) -> &[Point] {
        &self.positions
    }

    fn is_running(&self) -> bool {
        self.alpha > 0.0
    }

    fn drag(&mut self, node: usize, to: Point) {
        if node >= self.positions.len() {
            return;
        }
        self.held[node] = true;
        self.positions[node] = to;
        self.previous[node] = to;
        self.alpha = self.alpha.max(ALPHA_START);
    }

    fn release(&mut self, node: usize) {
        if let Some(held) = self.held.get_mut(node) {
            *held = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair(distance: f64) -> ForceLayout {
        let mut layout = ForceLayout::new(0.12);
        layout.start(
            vec![LayoutNode { charge: -50.0 }; 2],
            vec![LayoutLink {
                source: 0,
                target: 1,
                distance,
            }],
            (400.0, 300.0),
        );
        layout
    }

    #[test]
    fn test_converges_and_stops() {
        let mut layout = pair(15.0);
        assert!(layout.is_running());
        let mut ticks = 0;
        while layout.step() {
            ticks += 1;
            assert!(ticks < 10_000);
        }
        assert!(!layout.is_running());
        assert!(layout.positions().iter().all(|p| p.x.is_finite() && p.y.is_finite()));
    }

    #[test]
    fn test_longer_links_spread_nodes() {
        let distance = |layout: &ForceLayout| {
            let p = layout.positions();
            ((p[0].x - p[1].x).powi(2) + (p[0].y - p[1].y).powi(2)).sqrt()
        };
        let mut short = pair(15.0);
        let mut long = pair(100.0);
        while short.step() {}
        while long.step() {}
        assert!(distance(&long) > distance(&short));
    }

    #[test]
    fn test_drag_reheats_and_holds() {
        let mut layout = pair(15.0);
        while layout.step() {}
        layout.drag(0, Point::new(10.0, 20.0));
        assert!(layout.is_running());
        layout.step();
        assert_eq!(layout.positions()[0], Point::new(10.0, 20.0));
        layout.release(0);
        layout.drag(9, Point::new(0.0, 0.0));
    }
}
