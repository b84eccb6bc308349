//! Force-directed layout
//!
//! A velocity Verlet simulation in the style of d3-force: link springs,
//! many-body repulsion, a centering force and weak x/y positioning forces.
//! Each tick cools `alpha` toward `alpha_target`; the simulation is settled
//! once both drop below `alpha_min`. Dragging pins a node at a fixed position
//! and warms the simulation so its neighbours follow.

use std::collections::{HashMap, HashSet};
use std::f64::consts::PI;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::config::SimulationConfig;
use crate::network::NetworkView;

/// Alpha the simulation is warmed to while a node is being dragged
pub const DRAG_ALPHA_TARGET: f64 = 0.3;

const INITIAL_RADIUS: f64 = 10.0;
const DISTANCE_MIN2: f64 = 1.0;
/// Fixed so repeated layouts of the same view are identical
const JIGGLE_SEED: u64 = 1;

#[derive(Clone, Debug, PartialEq)]
pub struct ForceParams {
    pub link_distance: f64,
    /// Negative values repel
    pub charge_strength: f64,
    pub position_strength: f64,
    pub center: (f64, f64),
    pub alpha_min: f64,
    pub alpha_decay: f64,
    pub velocity_decay: f64,
}

impl ForceParams {
    pub fn new(config: &SimulationConfig, width: f64, height: f64) -> Self {
        Self {
            link_distance: config.link_distance,
            charge_strength: config.charge_strength,
            position_strength: config.position_strength,
            center: (width / 2.0, height / 2.0),
            alpha_min: config.alpha_min,
            // reach alpha_min from 1.0 in `cooling_ticks` ticks
            alpha_decay: 1.0 - config.alpha_min.powf(1.0 / config.cooling_ticks.max(1) as f64),
            velocity_decay: config.velocity_decay,
        }
    }
}

impl Default for ForceParams {
    fn default() -> Self {
        Self::new(&SimulationConfig::default(), 900.0, 600.0)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Body {
    pub id: i64,
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    pub fx: Option<f64>,
    pub fy: Option<f64>,
}

#[derive(Clone, Debug)]
struct Spring {
    source: usize,
    target: usize,
    strength: f64,
    bias: f64,
}

/// Node position snapshot sent to the page on every tick
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Frame {
    pub alpha: f64,
    pub nodes: Vec<FramePoint>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct FramePoint {
    pub id: i64,
    pub x: f64,
    pub y: f64,
}

/// Tiny random offset separating coincident nodes
fn jiggle(rng: &mut StdRng) -> f64 {
    (rng.gen::<f64>() - 0.5) * 1e-6
}

#[derive(Clone, Debug)]
pub struct Simulation {
    bodies: Vec<Body>,
    springs: Vec<Spring>,
    index: HashMap<i64, usize>,
    params: ForceParams,
    alpha: f64,
    alpha_target: f64,
    dragging: HashSet<usize>,
    ticks: usize,
    random: StdRng,
}

impl Simulation {
    /// Place the nodes of `view` on a phyllotaxis spiral around the center
    ///
    /// Links whose endpoints are not nodes of the view are ignored.
    pub fn new(view: &NetworkView, params: ForceParams) -> Self {
        let angle_step = PI * (3.0 - 5f64.sqrt());
        let (cx, cy) = params.center;
        let bodies: Vec<Body> = view
            .nodes
            .iter()
            .enumerate()
            .map(|(i, node)| {
                let radius = INITIAL_RADIUS * (0.5 + i as f64).sqrt();
                let angle = i as f64 * angle_step;
                Body {
                    id: node.id,
                    x: cx + radius * angle.cos(),
                    y: cy + radius * angle.sin(),
                    vx: 0.0,
                    vy: 0.0,
                    fx: None,
                    fy: None,
                }
            })
            .collect();
        let index = view.index();

        let pairs: Vec<(usize, usize)> = view
            .links
            .iter()
            .filter_map(|link| Some((*index.get(&link.source)?, *index.get(&link.target)?)))
            .collect();
        let mut degree = vec![0usize; bodies.len()];
        for &(source, target) in &pairs {
            degree[source] += 1;
            degree[target] += 1;
        }
        let springs = pairs
            .into_iter()
            .map(|(source, target)| Spring {
                source,
                target,
                strength: 1.0 / degree[source].min(degree[target]) as f64,
                bias: degree[source] as f64 / (degree[source] + degree[target]) as f64,
            })
            .collect();

        Self {
            bodies,
            springs,
            index,
            params,
            alpha: 1.0,
            alpha_target: 0.0,
            dragging: HashSet::new(),
            ticks: 0,
            random: StdRng::seed_from_u64(JIGGLE_SEED),
        }
    }

    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    pub fn body(&self, id: i64) -> Option<&Body> {
        self.index.get(&id).map(|&idx| &self.bodies[idx])
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Number of links that made it into the simulation
    pub fn spring_count(&self) -> usize {
        self.springs.len()
    }

    pub fn is_settled(&self) -> bool {
        self.alpha < self.params.alpha_min && self.alpha_target < self.params.alpha_min
    }

    /// Advance the simulation by one step
    pub fn tick(&mut self) {
        self.alpha += (self.alpha_target - self.alpha) * self.params.alpha_decay;
        self.apply_springs();
        self.apply_charge();
        self.apply_center();
        self.apply_positioning();

        let keep = 1.0 - self.params.velocity_decay;
        for body in &mut self.bodies {
            match body.fx {
                Some(fx) => {
                    body.x = fx;
                    body.vx = 0.0;
                }
                None => {
                    body.vx *= keep;
                    body.x += body.vx;
                }
            }
            match body.fy {
                Some(fy) => {
                    body.y = fy;
                    body.vy = 0.0;
                }
                None => {
                    body.vy *= keep;
                    body.y += body.vy;
                }
            }
        }
        self.ticks += 1;
    }

    /// Tick until settled or `max_ticks` is reached; returns the ticks taken
    pub fn run_until_settled(&mut self, max_ticks: usize) -> usize {
        let start = self.ticks;
        while !self.is_settled() && self.ticks - start < max_ticks {
            self.tick();
        }
        self.ticks - start
    }

    /// Pin node `id` at (x, y) and warm the simulation
    pub fn drag_start(&mut self, id: i64, x: f64, y: f64) -> bool {
        let Some(&idx) = self.index.get(&id) else {
            return false;
        };
        if self.dragging.is_empty() {
            self.alpha_target = DRAG_ALPHA_TARGET;
        }
        self.dragging.insert(idx);
        self.pin(idx, x, y);
        true
    }

    /// Move a dragged node's pin
    pub fn drag_to(&mut self, id: i64, x: f64, y: f64) -> bool {
        match self.index.get(&id) {
            Some(&idx) if self.dragging.contains(&idx) => {
                self.pin(idx, x, y);
                true
            }
            _ => false,
        }
    }

    /// Release the pin; the simulation cools down once no drag is active
    pub fn drag_end(&mut self, id: i64) -> bool {
        let Some(&idx) = self.index.get(&id) else {
            return false;
        };
        if !self.dragging.remove(&idx) {
            return false;
        }
        let body = &mut self.bodies[idx];
        body.fx = None;
        body.fy = None;
        if self.dragging.is_empty() {
            self.alpha_target = 0.0;
        }
        true
    }

    pub fn frame(&self) -> Frame {
        Frame {
            alpha: self.alpha,
            nodes: self
                .bodies
                .iter()
                .map(|body| FramePoint {
                    id: body.id,
                    x: body.x,
                    y: body.y,
                })
                .collect(),
        }
    }

    fn pin(&mut self, idx: usize, x: f64, y: f64) {
        let body = &mut self.bodies[idx];
        body.fx = Some(x);
        body.fy = Some(y);
    }

    fn apply_springs(&mut self) {
        let alpha = self.alpha;
        let distance = self.params.link_distance;
        for spring in &self.springs {
            let (source, target) = (&self.bodies[spring.source], &self.bodies[spring.target]);
            let mut dx = target.x + target.vx - source.x - source.vx;
            let mut dy = target.y + target.vy - source.y - source.vy;
            if dx == 0.0 {
                dx = jiggle(&mut self.random);
            }
            if dy == 0.0 {
                dy = jiggle(&mut self.random);
            }
            let len = (dx * dx + dy * dy).sqrt();
            let scale = (len - distance) / len * alpha * spring.strength;
            dx *= scale;
            dy *= scale;

            let target = &mut self.bodies[spring.target];
            target.vx -= dx * spring.bias;
            target.vy -= dy * spring.bias;
            let source = &mut self.bodies[spring.source];
            source.vx += dx * (1.0 - spring.bias);
            source.vy += dy * (1.0 - spring.bias);
        }
    }

    fn apply_charge(&mut self) {
        let weight = self.params.charge_strength * self.alpha;
        let count = self.bodies.len();
        for i in 0..count {
            let (mut ax, mut ay) = (0.0, 0.0);
            for j in 0..count {
                if i == j {
                    continue;
                }
                let mut dx = self.bodies[j].x - self.bodies[i].x;
                let mut dy = self.bodies[j].y - self.bodies[i].y;
                if dx == 0.0 {
                    dx = jiggle(&mut self.random);
                }
                if dy == 0.0 {
                    dy = jiggle(&mut self.random);
                }
                let mut dist2 = dx * dx + dy * dy;
                if dist2 < DISTANCE_MIN2 {
                    dist2 = (DISTANCE_MIN2 * dist2).sqrt();
                }
                ax += dx * weight / dist2;
                ay += dy * weight / dist2;
            }
            self.bodies[i].vx += ax;
            self.bodies[i].vy += ay;
        }
    }

    fn apply_center(&mut self) {
        if self.bodies.is_empty() {
            return;
        }
        let count = self.bodies.len() as f64;
        let (cx, cy) = self.params.center;
        let sx = self.bodies.iter().map(|b| b.x).sum::<f64>() / count - cx;
        let sy = self.bodies.iter().map(|b| b.y).sum::<f64>() / count - cy;
        for body in &mut self.bodies {
            body.x -= sx;
            body.y -= sy;
        }
    }

    fn apply_positioning(&mut self) {
        let k = self.params.position_strength * self.alpha;
        let (cx, cy) = self.params.center;
        for body in &mut self.bodies {
            body.vx += (cx - body.x) * k;
            body.vy += (cy - body.y) * k;
        }
    }
}
