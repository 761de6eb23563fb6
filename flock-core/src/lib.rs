#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod behavior;
pub mod flock;

pub use behavior::{Neighborhood, Steering};
pub use flock::{Bounds, Flock, FlockConfig, IsolationPolicy, UpdateStrategy};

mod math {
    #[cfg(feature = "std")]
    pub fn sqrt(value: f32) -> f32 {
        value.sqrt()
    }

    #[cfg(not(feature = "std"))]
    pub fn sqrt(value: f32) -> f32 {
        libm::sqrtf(value)
    }

    #[cfg(feature = "std")]
    pub fn exp2(value: f32) -> f32 {
        value.exp2()
    }

    #[cfg(not(feature = "std"))]
    pub fn exp2(value: f32) -> f32 {
        libm::exp2f(value)
    }
}

/// A 2D vector used for position and velocity
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vector2D {
    pub x: f32,
    pub y: f32,
}

impl Vector2D {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn zero() -> Self {
        Self { x: 0.0, y: 0.0 }
    }

    pub fn magnitude(&self) -> f32 {
        math::sqrt(self.x * self.x + self.y * self.y)
    }

    /// Unit vector in the same direction, or the zero vector when `self` has no length.
    pub fn normalize(&self) -> Self {
        let mag = self.magnitude();
        if mag > 0.0 {
            Self {
                x: self.x / mag,
                y: self.y / mag,
            }
        } else {
            Self::zero()
        }
    }

    pub fn dot(&self, other: &Vector2D) -> f32 {
        self.x * other.x + self.y * other.y
    }

    pub fn distance(&self, other: &Vector2D) -> f32 {
        (*self - *other).magnitude()
    }
}

/// Componentwise `Vector2D op Vector2D` plus its compound assignment.
macro_rules! vector_op {
    ($op:ident, $method:ident, $op_assign:ident, $method_assign:ident, $sym:tt) => {
        impl core::ops::$op for Vector2D {
            type Output = Self;

            fn $method(self, other: Self) -> Self {
                Self::new(self.x $sym other.x, self.y $sym other.y)
            }
        }

        impl core::ops::$op_assign for Vector2D {
            fn $method_assign(&mut self, other: Self) {
                *self = *self $sym other;
            }
        }
    };
}

/// `Vector2D op f32`, applied to both components.
macro_rules! scalar_op {
    ($op:ident, $method:ident, $sym:tt) => {
        impl core::ops::$op<f32> for Vector2D {
            type Output = Self;

            fn $method(self, scalar: f32) -> Self {
                Self::new(self.x $sym scalar, self.y $sym scalar)
            }
        }
    };
}

vector_op!(Add, add, AddAssign, add_assign, +);
vector_op!(Sub, sub, SubAssign, sub_assign, -);
scalar_op!(Mul, mul, *);
scalar_op!(Div, div, /);

/// A single flocking agent.
///
/// The attribute `A` is whatever the renderer needs to draw the boid (a color in
/// the application); the simulation never looks at it.
#[derive(Debug, Clone, PartialEq)]
pub struct Boid<A> {
    position: Vector2D,
    velocity: Vector2D,
    radius: f32,
    attribute: A,
}

impl<A> Boid<A> {
    /// Creates a resting boid centred on `position`.
    pub fn new(position: Vector2D, radius: f32, attribute: A) -> Self {
        Self {
            position,
            velocity: Vector2D::zero(),
            radius,
            attribute,
        }
    }

    /// Advances the position by one step of the current velocity.
    pub fn move_by_velocity(&mut self) {
        self.position += self.velocity;
    }

    pub fn position(&self) -> Vector2D {
        self.position
    }

    pub fn velocity(&self) -> Vector2D {
        self.velocity
    }

    pub fn velocity_mut(&mut self) -> &mut Vector2D {
        &mut self.velocity
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn attribute(&self) -> &A {
        &self.attribute
    }
}
