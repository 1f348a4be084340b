use std::ops::{Add, Mul, Neg, Sub};

use num_traits::Zero;

pub mod gf2;

/// Represents a single ring element: the field the gadgets compute over.
pub trait RingElement:
    Sized
    + Copy
    + Zero
    + Add<Output = Self>
    + Sub<Output = Self>
    + Neg<Output = Self>
    + Mul<Output = Self>
{
}
