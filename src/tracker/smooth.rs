use std::collections::VecDeque;

/// Moving-average filter over the last `capacity` raw joint angles
pub struct AngleSmoother {
    window: VecDeque<f32>,
    capacity: usize,
}

impl AngleSmoother {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            window: VecDeque::with_capacity(capacity + 1),
            capacity,
        }
    }

    /// Push a raw sample and return the mean of the current window
    pub fn push(&mut self, angle: f32) -> f32 {
        self.window.push_back(angle);
        if self.window.len() > self.capacity {
            self.window.pop_front();
        }
        self.mean().unwrap_or(angle)
    }

    pub fn mean(&self) -> Option<f32> {
        if self.window.is_empty() {
            return None;
        }
        let sum: f32 = self.window.iter().sum();
        Some(sum / self.window.len() as f32)
    }

    pub fn len(&self) -> usize {
        self.window.len()
    }

    pub fn is_empty(&self) -> bool {
        self.window.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Oldest-first view of the window
    pub fn samples(&self) -> impl Iterator<Item = f32> + '_ {
        self.window.iter().copied()
    }

    pub fn clear(&mut self) {
        self.window.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq_f32(a: f32, b: f32, eps: f32) -> bool {
        (a - b).abs() < eps
    }

    #[test]
    fn test_first_sample_passthrough() {
        let mut s = AngleSmoother::new(5);
        assert_eq!(s.push(120.0), 120.0);
    }

    #[test]
    fn test_running_mean() {
        let mut s = AngleSmoother::new(3);
        s.push(90.0);
        assert!(approx_eq_f32(s.push(120.0), 105.0, 1e-4));
        assert!(approx_eq_f32(s.push(150.0), 120.0, 1e-4));
    }

    #[test]
    fn test_evicts_oldest() {
        let mut s = AngleSmoother::new(3);
        for a in [10.0, 20.0, 30.0, 40.0] {
            s.push(a);
        }
        assert_eq!(s.len(), 3);
        assert_eq!(s.samples().collect::<Vec<_>>(), vec![20.0, 30.0, 40.0]);
        assert!(approx_eq_f32(s.mean().unwrap(), 30.0, 1e-4));
    }

    #[test]
    fn test_constant_input_converges_exactly() {
        let mut s = AngleSmoother::new(5);
        for a in [170.0, 20.0, 95.0, 130.0, 60.0] {
            s.push(a);
        }
        let mut out = 0.0;
        for _ in 0..5 {
            out = s.push(137.5);
        }
        assert_eq!(out, 137.5);
    }

    #[test]
    fn test_window_of_one_is_passthrough() {
        let mut s = AngleSmoother::new(1);
        s.push(170.0);
        assert_eq!(s.push(90.0), 90.0);
    }

    #[test]
    fn test_zero_capacity_clamped() {
        let s = AngleSmoother::new(0);
        assert_eq!(s.capacity(), 1);
    }

    #[test]
    fn test_clear() {
        let mut s = AngleSmoother::new(5);
        s.push(100.0);
        s.push(110.0);
        s.clear();
        assert!(s.is_empty());
        assert_eq!(s.mean(), None);
        assert_eq!(s.push(42.0), 42.0);
    }
}
