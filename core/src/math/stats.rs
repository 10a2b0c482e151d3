pub struct StatsHelper;

impl StatsHelper {
    pub fn mean(samples: &[f64]) -> f64 {
        if samples.is_empty() {
            return 0.0;
        }
        samples.iter().sum::<f64>() / samples.len() as f64
    }

    pub fn max(samples: &[f64]) -> f64 {
        samples.iter().copied().fold(0.0, f64::max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_sequence_yields_zero() {
        assert_eq!(StatsHelper::mean(&[]), 0.0);
        assert_eq!(StatsHelper::max(&[]), 0.0);
    }

    #[test]
    fn mean_and_max_of_values() {
        assert_eq!(StatsHelper::mean(&[1.0, 2.0, 3.0]), 2.0);
        assert_eq!(StatsHelper::max(&[0.25, 0.5, 0.1]), 0.5);
    }
}
