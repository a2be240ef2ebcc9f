// ABOUTME: Circuit-trace animation: jittered node grid joined by Manhattan paths.
// ABOUTME: A fixed pool of packets travels the traces, re-targeting on arrival.

use mpl_core::Color;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::engine::Animation;
use crate::surface::Surface;

struct Node {
    x: f32,
    y: f32,
    connections: Vec<usize>,
}

struct Packet {
    from: usize,
    to: usize,
    progress: f32,
    speed: f32,
}

pub struct Circuit {
    rng: SmallRng,
    color: Color,
    nodes: Vec<Node>,
    packets: Vec<Packet>,
}

const PACKET_COUNT: usize = 10;

impl Circuit {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
            color: Color::ACCENT,
            nodes: Vec::new(),
            packets: Vec::new(),
        }
    }

    /// Rebuild the node grid and packet pool from scratch
    fn generate(&mut self, surface: &Surface) {
        let w = surface.width() as f32;
        let h = surface.height() as f32;

        // Grid spacing scales down with the surface so small demo
        // surfaces still get a usable mesh
        let spacing = (w.min(h) / 5.0).clamp(16.0, 150.0);
        let jitter = spacing / 3.0;
        let cols = (w / spacing).ceil() as usize + 1;
        let rows = (h / spacing).ceil() as usize + 1;

        self.nodes = Vec::with_capacity(cols * rows);
        for row in 0..rows {
            for col in 0..cols {
                self.nodes.push(Node {
                    x: col as f32 * spacing + (self.rng.gen::<f32>() - 0.5) * jitter,
                    y: row as f32 * spacing + (self.rng.gen::<f32>() - 0.5) * jitter,
                    connections: Vec::new(),
                });
            }
        }

        // Connect each node to 1-3 geometrically nearby neighbors
        let near_min = spacing / 3.0;
        let near_max = spacing * 1.4;
        for i in 0..self.nodes.len() {
            let candidates: Vec<usize> = (0..self.nodes.len())
                .filter(|&j| {
                    if i == j {
                        return false;
                    }
                    let dx = self.nodes[j].x - self.nodes[i].x;
                    let dy = self.nodes[j].y - self.nodes[i].y;
                    let dist = (dx * dx + dy * dy).sqrt();
                    dist > near_min && dist < near_max
                })
                .collect();
            if candidates.is_empty() {
                continue;
            }
            let wanted = self.rng.gen_range(1..=3);
            for _ in 0..wanted {
                let target = candidates[self.rng.gen_range(0..candidates.len())];
                if !self.nodes[i].connections.contains(&target) {
                    self.nodes[i].connections.push(target);
                }
            }
        }

        self.packets = (0..PACKET_COUNT)
            .map(|_| {
                let from = self.rng.gen_range(0..self.nodes.len().max(1));
                let to = pick_connection(&self.nodes, from, &mut self.rng).unwrap_or(from);
                Packet {
                    from,
                    to,
                    progress: 0.0,
                    speed: self.rng.gen_range(0.01..0.03),
                }
            })
            .collect();
    }
}

/// Random outgoing edge of a node, if it has any
fn pick_connection(nodes: &[Node], from: usize, rng: &mut SmallRng) -> Option<usize> {
    let connections = &nodes.get(from)?.connections;
    if connections.is_empty() {
        None
    } else {
        Some(connections[rng.gen_range(0..connections.len())])
    }
}

/// Position along the two-segment Manhattan path between two nodes.
/// The longer axis is traversed first, matching the drawn traces.
fn manhattan_point(from: &Node, to: &Node, progress: f32) -> (f32, f32) {
    let horizontal_first = (from.x - to.x).abs() > (from.y - to.y).abs();
    if progress < 0.5 {
        let t = progress * 2.0;
        if horizontal_first {
            (from.x + (to.x - from.x) * t, from.y)
        } else {
            (from.x, from.y + (to.y - from.y) * t)
        }
    } else {
        let t = (progress - 0.5) * 2.0;
        if horizontal_first {
            (to.x, from.y + (to.y - from.y) * t)
        } else {
            (from.x + (to.x - from.x) * t, to.y)
        }
    }
}

impl Animation for Circuit {
    fn name(&self) -> &'static str {
        "circuit"
    }

    fn init(&mut self, surface: &mut Surface, color: Color) {
        self.color = color;
        self.generate(surface);
    }

    fn step(&mut self, surface: &mut Surface) {
        surface.fade(Color::BACKGROUND, 0.1);

        let trace = self.color.with_alpha(0.12);
        let node_fill = self.color.with_alpha(0.25);

        for i in 0..self.nodes.len() {
            for c in 0..self.nodes[i].connections.len() {
                let target = self.nodes[i].connections[c];
                let (nx, ny) = (self.nodes[i].x as i32, self.nodes[i].y as i32);
                let (tx, ty) = (self.nodes[target].x as i32, self.nodes[target].y as i32);
                // Circuit-style 90 degree routing
                if (nx - tx).abs() > (ny - ty).abs() {
                    surface.line(nx, ny, tx, ny, trace);
                    surface.line(tx, ny, tx, ty, trace);
                } else {
                    surface.line(nx, ny, nx, ty, trace);
                    surface.line(nx, ty, tx, ty, trace);
                }
            }
            let (nx, ny) = (self.nodes[i].x as i32, self.nodes[i].y as i32);
            surface.fill_rect(nx - 1, ny - 1, 3, 3, node_fill);
        }

        for p in 0..self.packets.len() {
            let packet = &self.packets[p];
            let (from, to) = (packet.from, packet.to);
            if from >= self.nodes.len() || to >= self.nodes.len() {
                continue;
            }
            let (x, y) = manhattan_point(&self.nodes[from], &self.nodes[to], packet.progress);

            surface.fill_rect(x as i32 - 1, y as i32 - 1, 3, 3, self.color);
            surface.soft_circle(x, y, 4.0, self.color.with_alpha(0.3));

            let packet = &mut self.packets[p];
            packet.progress += packet.speed;
            if packet.progress >= 1.0 {
                packet.from = packet.to;
                packet.to =
                    pick_connection(&self.nodes, packet.from, &mut self.rng).unwrap_or(packet.from);
                packet.progress = 0.0;
                packet.speed = self.rng.gen_range(0.01..0.03);
            }
        }
    }

    fn resize(&mut self, surface: &mut Surface) {
        self.generate(surface);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connections_stay_in_bounds() {
        let mut surface = Surface::new(120, 90);
        let mut anim = Circuit::new(11);
        anim.init(&mut surface, Color::ACCENT);
        for node in &anim.nodes {
            for &c in &node.connections {
                assert!(c < anim.nodes.len());
            }
            assert!(node.connections.len() <= 3);
        }
    }

    #[test]
    fn test_packet_retargets_on_arrival() {
        let mut surface = Surface::new(120, 90);
        let mut anim = Circuit::new(11);
        anim.init(&mut surface, Color::ACCENT);
        // Enough ticks for every packet to arrive at least once
        for _ in 0..200 {
            anim.step(&mut surface);
        }
        for packet in &anim.packets {
            assert!(packet.progress < 1.0);
        }
    }

    #[test]
    fn test_manhattan_path_endpoints() {
        let from = Node { x: 0.0, y: 0.0, connections: vec![] };
        let to = Node { x: 10.0, y: 4.0, connections: vec![] };
        assert_eq!(manhattan_point(&from, &to, 0.0), (0.0, 0.0));
        assert_eq!(manhattan_point(&from, &to, 0.5), (10.0, 0.0));
        let (x, y) = manhattan_point(&from, &to, 0.999);
        assert!((x - 10.0).abs() < 1e-3 && (y - 4.0).abs() < 0.1);
    }

    #[test]
    fn test_resize_regenerates_layout() {
        let mut surface = Surface::new(120, 90);
        let mut anim = Circuit::new(11);
        anim.init(&mut surface, Color::ACCENT);
        let before = anim.nodes.len();
        surface.resize(240, 180);
        anim.resize(&mut surface);
        assert!(anim.nodes.len() > before);
    }
}
