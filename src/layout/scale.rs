/// Linear mapping from a data domain onto a pixel range. A degenerate domain
/// (min == max, or an empty fit) maps every value to the range midpoint
/// instead of dividing by zero.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinearScale {
    domain: (f64, f64),
    range: (f32, f32),
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f32, f32)) -> Self {
        Self { domain, range }
    }

    /// Fits the domain to the min/max of `values`.
    pub fn fit(values: impl IntoIterator<Item = f64>, range: (f32, f32)) -> Self {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for value in values {
            if !value.is_finite() {
                continue;
            }
            min = min.min(value);
            max = max.max(value);
        }

        let domain = if min <= max { (min, max) } else { (0.0, 0.0) };
        Self::new(domain, range)
    }

    pub fn domain(&self) -> (f64, f64) {
        self.domain
    }

    pub fn apply(&self, value: f64) -> f32 {
        let (d0, d1) = self.domain;
        let span = d1 - d0;
        if span.abs() <= f64::EPSILON {
            return (self.range.0 + self.range.1) * 0.5;
        }

        let t = ((value - d0) / span) as f32;
        self.range.0 + ((self.range.1 - self.range.0) * t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_domain_endpoints_to_range_endpoints() {
        let scale = LinearScale::new((0.0, 10.0), (0.0, 100.0));
        assert_eq!(scale.apply(0.0), 0.0);
        assert_eq!(scale.apply(10.0), 100.0);
        assert_eq!(scale.apply(5.0), 50.0);
    }

    #[test]
    fn inverted_range_plots_larger_values_lower() {
        let scale = LinearScale::new((0.0, 10.0), (200.0, 0.0));
        assert_eq!(scale.apply(0.0), 200.0);
        assert_eq!(scale.apply(10.0), 0.0);
    }

    #[test]
    fn degenerate_domain_collapses_to_midpoint() {
        let scale = LinearScale::fit([7.0, 7.0, 7.0], (0.0, 300.0));
        assert_eq!(scale.apply(7.0), 150.0);
        assert_eq!(scale.apply(123.0), 150.0);
    }

    #[test]
    fn empty_fit_is_degenerate_not_a_crash() {
        let scale = LinearScale::fit([], (0.0, 100.0));
        assert_eq!(scale.apply(1.0), 50.0);
    }
}
