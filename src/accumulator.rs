//! Fixed-size sliding-window accumulators for the windowed correlations
//! of the frame detector.

use num_complex::Complex32;

/// Ring of the last `size` values with a running sum that admits O(1)
/// updates. Once full, each [`add`](SlidingAccumulator::add) overwrites
/// the oldest value.
#[derive(Clone, Debug)]
pub struct SlidingAccumulator<T> {
    pub sum: T,
    window: Vec<T>,
    index: usize,
}

/// Value that can live in a [`SlidingAccumulator`]. Non-finite inputs are
/// replaced by zero so a single bad sample from the radio cannot poison
/// the running sum for a whole window.
pub trait Accumulate:
    Copy + Default + std::ops::AddAssign + std::ops::SubAssign
{
    fn sanitize(self) -> Self;
}

impl Accumulate for f32 {
    fn sanitize(self) -> Self {
        if self.is_finite() {
            self
        } else {
            0.0
        }
    }
}

impl Accumulate for Complex32 {
    fn sanitize(self) -> Self {
        if self.re.is_finite() && self.im.is_finite() {
            self
        } else {
            Complex32::new(0.0, 0.0)
        }
    }
}

impl<T: Accumulate> SlidingAccumulator<T> {
    pub fn new(size: usize) -> Self {
        assert!(size > 0);
        SlidingAccumulator {
            sum: T::default(),
            window: vec![T::default(); size],
            index: 0,
        }
    }

    pub fn add(&mut self, value: T) {
        let value = value.sanitize();
        self.sum -= self.window[self.index];
        self.sum += value;
        self.window[self.index] = value;
        self.index = (self.index + 1) % self.window.len();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sliding_sum() {
        let mut acc = SlidingAccumulator::<f32>::new(4);
        for v in [1.0, 2.0, 3.0, 4.0] {
            acc.add(v);
        }
        assert_eq!(acc.sum, 10.0);
        acc.add(5.0); // evicts 1.0
        assert_eq!(acc.sum, 14.0);
    }

    #[test]
    fn non_finite_is_zeroed() {
        let mut acc = SlidingAccumulator::<f32>::new(2);
        acc.add(f32::NAN);
        acc.add(3.0);
        assert_eq!(acc.sum, 3.0);

        let mut acc = SlidingAccumulator::<Complex32>::new(2);
        acc.add(Complex32::new(f32::INFINITY, 0.0));
        acc.add(Complex32::new(1.0, -1.0));
        assert_eq!(acc.sum, Complex32::new(1.0, -1.0));
    }
}
