//! Steering forces for a single boid.
//!
//! Each function looks at one boid of a flock slice by index so the same code
//! serves both the in-place sweep and the snapshot update.

use crate::{math, Boid, Vector2D};
use rand::Rng;

/// Floor on the separation exponent. Keeps `2^gap` a normal float, so the
/// repulsion of deeply overlapping boids stays finite and its square fits in `f32`.
const MIN_SEPARATION_EXPONENT: f32 = -48.0;

/// Tuning constants of the steering model.
///
/// These are fixed for the application; `Default` holds the values every flock
/// uses unless a caller builds one by hand (tests turn the noise off, for instance).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Steering {
    pub avoid_factor: f32,
    /// Surface-to-surface gap below which another boid counts as a neighbor.
    pub visual_range: f32,
    pub centering_factor: f32,
    pub matching_factor: f32,
    pub max_speed: f32,
    pub min_speed: f32,
    /// Blend weight between the flocking velocity and the destination heading.
    pub bias: f32,
    pub noise_strength: f32,
    /// Added to the speed before rescaling so a stalled boid never divides by zero.
    pub speed_epsilon: f32,
}

impl Steering {
    pub const AVOID_FACTOR: f32 = 0.5;
    pub const VISUAL_RANGE: f32 = 20.0;
    pub const CENTERING_FACTOR: f32 = 0.0005;
    pub const MATCHING_FACTOR: f32 = 0.05;
    pub const MAX_SPEED: f32 = 6.0;
    pub const MIN_SPEED: f32 = 1.0;
    pub const BIAS_VAL: f32 = 0.005;
    pub const NOISE_STRENGTH: f32 = 0.1;
    pub const SPEED_EPSILON: f32 = 1e-2;

    /// Default constants without the random jitter.
    pub fn without_noise() -> Self {
        Self {
            noise_strength: 0.0,
            ..Self::default()
        }
    }
}

impl Default for Steering {
    fn default() -> Self {
        Self {
            avoid_factor: Self::AVOID_FACTOR,
            visual_range: Self::VISUAL_RANGE,
            centering_factor: Self::CENTERING_FACTOR,
            matching_factor: Self::MATCHING_FACTOR,
            max_speed: Self::MAX_SPEED,
            min_speed: Self::MIN_SPEED,
            bias: Self::BIAS_VAL,
            noise_strength: Self::NOISE_STRENGTH,
            speed_epsilon: Self::SPEED_EPSILON,
        }
    }
}

/// What a boid sees of the rest of the flock.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighborhood {
    pub separation: Vector2D,
    pub velocity_sum: Vector2D,
    pub position_sum: Vector2D,
    pub count: usize,
}

impl Neighborhood {
    pub fn average_velocity(&self) -> Vector2D {
        if self.count > 0 {
            self.velocity_sum / self.count as f32
        } else {
            Vector2D::zero()
        }
    }

    pub fn average_position(&self) -> Vector2D {
        if self.count > 0 {
            self.position_sum / self.count as f32
        } else {
            Vector2D::zero()
        }
    }
}

/// Scans every other boid of `boids` and accumulates the neighborhood of `boids[index]`.
///
/// A neighbor is any boid whose surface lies closer than the visual range. Its
/// repulsion decays as `2^-gap`, so overlapping boids (negative gap) push hardest.
/// Coincident boids still count as neighbors but add no repulsion.
pub fn neighborhood<A>(boids: &[Boid<A>], index: usize, steering: &Steering) -> Neighborhood {
    let boid = &boids[index];
    let position = boid.position();
    let radius = boid.radius();

    let mut separation = Vector2D::zero();
    let mut velocity_sum = Vector2D::zero();
    let mut position_sum = Vector2D::zero();
    let mut count = 0;

    for (other_index, other) in boids.iter().enumerate() {
        if other_index == index {
            continue;
        }

        let to_other = other.position() - position;
        let len = to_other.magnitude();
        let gap = len - (radius + other.radius());
        if gap < steering.visual_range {
            if len > 0.0 {
                let weight = len * math::exp2(gap.max(MIN_SEPARATION_EXPONENT));
                separation -= to_other / weight;
            }
            velocity_sum += other.velocity();
            position_sum += other.position();
            count += 1;
        }
    }

    Neighborhood {
        separation,
        velocity_sum,
        position_sum,
        count,
    }
}

/// Heading of length `max_speed` from `position` toward `destination`.
pub fn seek(position: Vector2D, destination: Vector2D, steering: &Steering) -> Vector2D {
    (destination - position).normalize() * steering.max_speed
}

pub fn jitter<R: Rng + ?Sized>(rng: &mut R, steering: &Steering) -> Vector2D {
    let x = rng.gen_range(-1.0f32..1.0) * steering.noise_strength;
    let y = rng.gen_range(-1.0f32..1.0) * steering.noise_strength;
    Vector2D::new(x, y)
}

/// Rescales `velocity` into `[min_speed, max_speed]`.
///
/// The epsilon in the divisor means a boid leaving the bounds lands just inside
/// the upper bound and just short of the lower one; a boid at exactly zero
/// speed stays at zero.
pub fn clamp_speed(velocity: Vector2D, steering: &Steering) -> Vector2D {
    let speed = velocity.magnitude();
    if speed > steering.max_speed {
        velocity * (steering.max_speed / (speed + steering.speed_epsilon))
    } else if speed < steering.min_speed {
        velocity * (steering.min_speed / (speed + steering.speed_epsilon))
    } else {
        velocity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn pair(p2: Vector2D, r1: f32, r2: f32) -> [Boid<()>; 2] {
        [
            Boid::new(Vector2D::zero(), r1, ()),
            Boid::new(p2, r2, ()),
        ]
    }

    #[test]
    fn test_neighbor_inclusion_example() {
        let boids = pair(Vector2D::new(5.0, 0.0), 2.0, 2.0);
        let steering = Steering::default();

        let first = neighborhood(&boids, 0, &steering);
        let second = neighborhood(&boids, 1, &steering);

        assert_eq!(first.count, 1);
        assert_eq!(second.count, 1);
        // gap = 5 - 4 = 1, so the push is 5 / (5 * 2) along -x
        assert!(first.separation.x < 0.0);
        assert!((first.separation.x + 0.5).abs() < 1e-6);
        assert_eq!(first.separation.y, 0.0);
        assert!(second.separation.x > 0.0);
    }

    #[test]
    fn test_neighbor_excluded_beyond_visual_range() {
        // gap = 25 - 4 = 21
        let boids = pair(Vector2D::new(25.0, 0.0), 2.0, 2.0);
        let hood = neighborhood(&boids, 0, &Steering::default());

        assert_eq!(hood.count, 0);
        assert_eq!(hood.separation, Vector2D::zero());
        assert_eq!(hood.average_velocity(), Vector2D::zero());
        assert_eq!(hood.average_position(), Vector2D::zero());
    }

    #[test]
    fn test_large_radii_extend_the_neighborhood() {
        // centres 40 apart, but the surfaces are only 40 - 24 = 16 apart
        let boids = pair(Vector2D::new(0.0, 40.0), 12.0, 12.0);
        let hood = neighborhood(&boids, 0, &Steering::default());
        assert_eq!(hood.count, 1);
        assert!(hood.separation.y < 0.0);
    }

    #[test]
    fn test_overlap_repels_harder_than_distant_neighbor() {
        let steering = Steering::default();
        let overlapping = pair(Vector2D::new(3.0, 0.0), 2.0, 2.0);
        let distant = pair(Vector2D::new(23.9, 0.0), 2.0, 2.0);

        let close = neighborhood(&overlapping, 0, &steering);
        let far = neighborhood(&distant, 0, &steering);

        assert_eq!(far.count, 1);
        assert!(close.separation.magnitude() > far.separation.magnitude());
        assert!(close.separation.x < 0.0 && far.separation.x < 0.0);
    }

    #[test]
    fn test_coincident_boids_skip_separation() {
        let boids = pair(Vector2D::zero(), 2.0, 2.0);
        let hood = neighborhood(&boids, 0, &Steering::default());

        assert_eq!(hood.count, 1);
        assert_eq!(hood.separation, Vector2D::zero());
    }

    #[test]
    fn test_deep_overlap_repulsion_stays_finite() {
        // gap = 1 - 160, far below where 2^gap underflows
        let boids = pair(Vector2D::new(1.0, 0.0), 80.0, 80.0);
        let steering = Steering::default();

        let first = neighborhood(&boids, 0, &steering);
        let second = neighborhood(&boids, 1, &steering);

        assert!(first.separation.x.is_finite() && first.separation.x < 0.0);
        assert!(second.separation.x.is_finite() && second.separation.x > 0.0);
        assert!(first.separation.magnitude().is_finite());

        let shallower = neighborhood(&pair(Vector2D::new(100.0, 0.0), 80.0, 80.0), 0, &steering);
        assert!(first.separation.magnitude() >= shallower.separation.magnitude());

        let velocity = clamp_speed(first.separation * steering.avoid_factor, &steering);
        assert!(velocity.magnitude() <= Steering::MAX_SPEED);
        assert!(velocity.x < 0.0);
    }

    #[test]
    fn test_averages() {
        let mut boids = vec![
            Boid::new(Vector2D::zero(), 2.0, ()),
            Boid::new(Vector2D::new(6.0, 0.0), 2.0, ()),
            Boid::new(Vector2D::new(0.0, 8.0), 2.0, ()),
        ];
        *boids[1].velocity_mut() = Vector2D::new(2.0, 0.0);
        *boids[2].velocity_mut() = Vector2D::new(0.0, 4.0);

        let hood = neighborhood(&boids, 0, &Steering::default());

        assert_eq!(hood.count, 2);
        assert_eq!(hood.average_velocity(), Vector2D::new(1.0, 2.0));
        assert_eq!(hood.average_position(), Vector2D::new(3.0, 4.0));
    }

    #[test]
    fn test_seek() {
        let steering = Steering::default();
        let heading = seek(Vector2D::new(1.0, 1.0), Vector2D::new(1.0, 11.0), &steering);
        assert_eq!(heading, Vector2D::new(0.0, Steering::MAX_SPEED));

        let arrived = seek(Vector2D::new(4.0, 4.0), Vector2D::new(4.0, 4.0), &steering);
        assert_eq!(arrived, Vector2D::zero());
    }

    #[test]
    fn test_clamp_speed() {
        let steering = Steering::default();

        let fast = clamp_speed(Vector2D::new(10.0, 0.0), &steering);
        assert!((fast.x - 6.0 * 10.0 / 10.01).abs() < 1e-5);
        assert!(fast.magnitude() < steering.max_speed);

        let slow = clamp_speed(Vector2D::new(0.0, 0.5), &steering);
        assert!((slow.y - 0.5 / 0.51).abs() < 1e-5);

        let cruising = Vector2D::new(3.0, 4.0);
        assert_eq!(clamp_speed(cruising, &steering), cruising);

        assert_eq!(clamp_speed(Vector2D::zero(), &steering), Vector2D::zero());
    }

    #[test]
    fn test_jitter_bounds() {
        let steering = Steering::default();
        let mut rng = SmallRng::seed_from_u64(7);

        for _ in 0..1000 {
            let noise = jitter(&mut rng, &steering);
            assert!(noise.x.abs() <= steering.noise_strength);
            assert!(noise.y.abs() <= steering.noise_strength);
        }

        let silent = jitter(&mut rng, &Steering::without_noise());
        assert_eq!(silent, Vector2D::zero());
    }
}
