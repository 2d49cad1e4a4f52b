//! Running collection of scalar samples with correlated-error analysis.

/// Collects the samples of one estimator over a production run.
#[derive(Debug, Clone, Default)]
pub struct BlockAccumulator {
    samples: Vec<f64>,
}

impl BlockAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self { samples: Vec::with_capacity(capacity) }
    }

    pub fn push(&mut self, value: f64) {
        self.samples.push(value);
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    /// Sample mean, NaN when nothing has been collected.
    pub fn mean(&self) -> f64 {
        if self.samples.is_empty() {
            return f64::NAN;
        }
        self.samples.iter().sum::<f64>() / self.samples.len() as f64
    }

    /// Integrated autocorrelation time, summed over lags until the
    /// normalized autocorrelation first turns negative.
    pub fn autocorrelation_time(&self) -> f64 {
        let n = self.samples.len();
        if n == 0 {
            return 1.0;
        }
        let mean = self.mean();
        let var = self.samples.iter().map(|&x| (x - mean).powi(2)).sum::<f64>() / n as f64;
        if var == 0.0 {
            return 1.0;
        }

        let mut tau = 1.0;
        for lag in 1..n / 2 {
            let rho = self.samples[..n - lag]
                .iter()
                .zip(&self.samples[lag..])
                .map(|(&x, &y)| (x - mean) * (y - mean))
                .sum::<f64>()
                / ((n - lag) as f64 * var);
            if rho < 0.0 {
                break;
            }
            tau += 2.0 * rho;
        }
        tau
    }

    /// Standard error of the mean from block averages of size `ceil(2 tau)`.
    ///
    /// Zero when the run holds fewer than two blocks.
    pub fn error(&self) -> f64 {
        self.error_with_tau(self.autocorrelation_time())
    }

    fn error_with_tau(&self, tau: f64) -> f64 {
        let block_size = ((2.0 * tau).ceil() as usize).max(1);
        let n_blocks = self.samples.len() / block_size;
        if n_blocks < 2 {
            return 0.0;
        }

        let block_means: Vec<f64> = self
            .samples
            .chunks_exact(block_size)
            .map(|block| block.iter().sum::<f64>() / block_size as f64)
            .collect();
        let mean = block_means.iter().sum::<f64>() / n_blocks as f64;
        let variance = block_means.iter().map(|&x| (x - mean).powi(2)).sum::<f64>() / (n_blocks - 1) as f64;

        (variance / n_blocks as f64).sqrt()
    }

    /// Mean, error and autocorrelation time in one pass over the analysis.
    pub fn summary(&self) -> (f64, f64, f64) {
        let tau = self.autocorrelation_time();
        (self.mean(), self.error_with_tau(tau), tau)
    }
}
