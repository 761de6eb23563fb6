use alloc::vec::Vec;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::behavior::{self, Steering};
use crate::{Boid, Vector2D};

/// Order in which a step commits new velocities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UpdateStrategy {
    /// Each boid is steered and moved before the next one is looked at, so boid
    /// `k` already sees this frame's state for every boid before it.
    #[default]
    Sequential,
    /// Every velocity is computed from the state at the start of the step, then
    /// all boids are moved together. Trajectories differ from `Sequential`.
    TwoPhase,
}

/// How alignment and cohesion behave for a boid with no neighbors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IsolationPolicy {
    /// Alignment and cohesion still run against a zero average velocity and the
    /// world origin, which slows a lone boid and drags it toward `(0, 0)`.
    #[default]
    PullToOrigin,
    /// Alignment and cohesion are skipped when the neighborhood is empty.
    Ignore,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FlockConfig {
    pub steering: Steering,
    pub strategy: UpdateStrategy,
    pub isolation: IsolationPolicy,
}

/// Rectangle `[0, width) x [0, height)` used for random placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    pub width: u32,
    pub height: u32,
}

impl Bounds {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// A population of boids steered toward a shared destination.
pub struct Flock<A> {
    boids: Vec<Boid<A>>,
    destination: Vector2D,
    config: FlockConfig,
    rng: SmallRng,
}

impl<A> Flock<A> {
    /// Smallest radius handed out by [`Flock::populate`].
    pub const MIN_RADIUS: u32 = 2;
    /// Radii from [`Flock::populate`] stay below this.
    pub const MAX_RADIUS: u32 = 8;

    /// Creates an empty flock whose jitter comes from a generator seeded from the OS.
    #[cfg(feature = "std")]
    pub fn new() -> Self {
        Self::with_rng(SmallRng::from_entropy(), FlockConfig::default())
    }

    /// Creates an empty flock with reproducible jitter.
    pub fn with_seed(seed: u64) -> Self {
        Self::with_config(seed, FlockConfig::default())
    }

    pub fn with_config(seed: u64, config: FlockConfig) -> Self {
        Self::with_rng(SmallRng::seed_from_u64(seed), config)
    }

    fn with_rng(rng: SmallRng, config: FlockConfig) -> Self {
        Self {
            boids: Vec::new(),
            destination: Vector2D::zero(),
            config,
            rng,
        }
    }

    /// Appends a resting boid.
    pub fn add_boid(&mut self, x: f32, y: f32, radius: f32, attribute: A) {
        self.boids
            .push(Boid::new(Vector2D::new(x, y), radius, attribute));
    }

    /// Appends `count` boids at random whole-pixel positions inside `bounds`, with
    /// whole-pixel radii in `[MIN_RADIUS, MAX_RADIUS)` and attributes from
    /// `make_attribute`. Empty bounds add nothing.
    pub fn populate<R, F>(&mut self, rng: &mut R, count: usize, bounds: Bounds, mut make_attribute: F)
    where
        R: Rng + ?Sized,
        F: FnMut(&mut R) -> A,
    {
        if bounds.is_empty() {
            return;
        }

        self.boids.reserve(count);
        for _ in 0..count {
            let x = rng.gen_range(0..bounds.width) as f32;
            let y = rng.gen_range(0..bounds.height) as f32;
            let radius = rng.gen_range(Self::MIN_RADIUS..Self::MAX_RADIUS) as f32;
            let attribute = make_attribute(rng);
            self.add_boid(x, y, radius, attribute);
        }
    }

    /// Sets the point every boid is biased toward, starting with the next step.
    pub fn set_dest(&mut self, destination: Vector2D) {
        self.destination = destination;
    }

    /// Removes every boid. The destination is kept.
    pub fn clear(&mut self) {
        self.boids.clear();
    }

    /// Runs one simulation step over the whole flock.
    pub fn update(&mut self) {
        match self.config.strategy {
            UpdateStrategy::Sequential => self.update_sequential(),
            UpdateStrategy::TwoPhase => self.update_two_phase(),
        }
    }

    fn update_sequential(&mut self) {
        for index in 0..self.boids.len() {
            let velocity = steer(
                &self.boids,
                index,
                self.destination,
                &self.config,
                &mut self.rng,
            );
            let boid = &mut self.boids[index];
            *boid.velocity_mut() = velocity;
            boid.move_by_velocity();
        }
    }

    fn update_two_phase(&mut self) {
        let velocities: Vec<Vector2D> = (0..self.boids.len())
            .map(|index| {
                steer(
                    &self.boids,
                    index,
                    self.destination,
                    &self.config,
                    &mut self.rng,
                )
            })
            .collect();

        for (boid, velocity) in self.boids.iter_mut().zip(velocities) {
            *boid.velocity_mut() = velocity;
            boid.move_by_velocity();
        }
    }

    /// Yields `(position, radius, attribute)` for each boid, in insertion order.
    pub fn draw(&self) -> impl Iterator<Item = (Vector2D, f32, &A)> + '_ {
        self.boids
            .iter()
            .map(|boid| (boid.position(), boid.radius(), boid.attribute()))
    }

    pub fn boids(&self) -> &[Boid<A>] {
        &self.boids
    }

    pub fn boids_mut(&mut self) -> &mut [Boid<A>] {
        &mut self.boids
    }

    pub fn destination(&self) -> Vector2D {
        self.destination
    }

    pub fn config(&self) -> &FlockConfig {
        &self.config
    }

    pub fn len(&self) -> usize {
        self.boids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boids.is_empty()
    }
}

#[cfg(feature = "std")]
impl<A> Default for Flock<A> {
    fn default() -> Self {
        Self::new()
    }
}

/// New velocity for `boids[index]` given the current state of the slice.
fn steer<A, R: Rng + ?Sized>(
    boids: &[Boid<A>],
    index: usize,
    destination: Vector2D,
    config: &FlockConfig,
    rng: &mut R,
) -> Vector2D {
    let steering = &config.steering;
    let boid = &boids[index];
    let position = boid.position();
    let mut velocity = boid.velocity();

    let hood = behavior::neighborhood(boids, index, steering);
    let to_dest = behavior::seek(position, destination, steering);

    velocity += hood.separation * steering.avoid_factor;
    if hood.count > 0 || config.isolation == IsolationPolicy::PullToOrigin {
        velocity += (hood.average_velocity() - velocity) * steering.matching_factor;
        velocity += (hood.average_position() - position) * steering.centering_factor;
    }
    velocity = velocity * (1.0 - steering.bias) + to_dest * steering.bias;

    velocity += behavior::jitter(rng, steering);

    behavior::clamp_speed(velocity, steering)
}
