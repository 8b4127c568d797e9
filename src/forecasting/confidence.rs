//! Prediction interval helpers
//!
//! Intervals are `estimate ± z * se`, where `z` is the normal quantile for the
//! requested coverage and `se` grows with the forecast horizon.

use super::Prediction;

/// Residual-based interval for a fitted model
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PredictionInterval {
    /// Standard deviation of in-sample residuals
    pub residual_std: f64,
    /// Two-sided coverage, e.g. 0.8 for an 80% interval
    pub width: f64,
}

impl PredictionInterval {
    pub fn new(residual_std: f64, width: f64) -> Self {
        Self {
            residual_std,
            width,
        }
    }

    /// Standard error `horizon` steps past the last observation
    ///
    /// In-sample points (horizon 0) use the residual spread itself.
    pub fn standard_error(&self, horizon: u32) -> f64 {
        self.residual_std * (1.0 + f64::from(horizon)).sqrt()
    }

    /// Wrap a point estimate in its interval
    pub fn around(&self, estimate: f64, horizon: u32) -> Prediction {
        let z = normal_quantile(0.5 + self.width / 2.0);
        let margin = z * self.standard_error(horizon);
        Prediction {
            estimate,
            lower: estimate - margin,
            upper: estimate + margin,
        }
    }
}

/// Inverse of the standard normal CDF
///
/// Rational approximation with relative error below 1.2e-9 on (0, 1).
pub fn normal_quantile(p: f64) -> f64 {
    const A: [f64; 6] = [
        -3.969_683_028_665_376e1,
        2.209_460_984_245_205e2,
        -2.759_285_104_469_687e2,
        1.383_577_518_672_690e2,
        -3.066_479_806_614_716e1,
        2.506_628_277_459_239,
    ];
    const B: [f64; 5] = [
        -5.447_609_879_822_406e1,
        1.615_858_368_580_409e2,
        -1.556_989_798_598_866e2,
        6.680_131_188_771_972e1,
        -1.328_068_155_288_572e1,
    ];
    const C: [f64; 6] = [
        -7.784_894_002_430_293e-3,
        -3.223_964_580_411_365e-1,
        -2.400_758_277_161_838,
        -2.549_732_539_343_734,
        4.374_664_141_464_968,
        2.938_163_982_698_783,
    ];
    const D: [f64; 4] = [
        7.784_695_709_041_462e-3,
        3.224_671_290_700_398e-1,
        2.445_134_137_142_996,
        3.754_408_661_907_416,
    ];
    const P_LOW: f64 = 0.024_25;

    if p <= 0.0 {
        return f64::NEG_INFINITY;
    }
    if p >= 1.0 {
        return f64::INFINITY;
    }

    if p < P_LOW {
        let q = (-2.0 * p.ln()).sqrt();
        (((((C[0] * q + C[1]) * q + C[2]) * q + C[3]) * q + C[4]) * q + C[5])
            / ((((D[0] * q + D[1]) * q + D[2]) * q + D[3]) * q + 1.0)
    } else if p <= 1.0 - P_LOW {
        let q = p - 0.5;
        let r = q * q;
        (((((A[0] * r + A[1]) * r + A[2]) * r + A[3]) * r + A[4]) * r + A[5]) * q
            / (((((B[0] * r + B[1]) * r + B[2]) * r + B[3]) * r + B[4]) * r + 1.0)
    } else {
        let q = (-2.0 * (1.0 - p).ln()).sqrt();
        -(((((C[0] * q + C[1]) * q + C[2]) * q + C[3]) * q + C[4]) * q + C[5])
            / ((((D[0] * q + D[1]) * q + D[2]) * q + D[3]) * q + 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normal_quantile_known_values() {
        assert!(normal_quantile(0.5).abs() < 1e-9);
        assert!((normal_quantile(0.9) - 1.281_551_6).abs() < 1e-6);
        assert!((normal_quantile(0.975) - 1.959_964).abs() < 1e-6);
        assert!((normal_quantile(0.01) + 2.326_347_9).abs() < 1e-6);
        assert!(normal_quantile(0.0).is_infinite());
    }

    #[test]
    fn test_interval_is_symmetric() {
        let interval = PredictionInterval::new(10.0, 0.8);
        let p = interval.around(100.0, 0);
        assert!((p.estimate - 100.0).abs() < 1e-12);
        assert!(((p.upper - 100.0) - (100.0 - p.lower)).abs() < 1e-9);
        assert!((p.upper - 112.815_516).abs() < 1e-4);
    }

    #[test]
    fn test_interval_widens_with_horizon() {
        let interval = PredictionInterval::new(4.0, 0.95);
        let near = interval.around(50.0, 1);
        let far = interval.around(50.0, 30);
        assert!(far.upper - far.lower > near.upper - near.lower);
    }

    #[test]
    fn test_zero_residuals_collapse_interval() {
        let interval = PredictionInterval::new(0.0, 0.8);
        let p = interval.around(25.0, 10);
        assert_eq!(p.lower, 25.0);
        assert_eq!(p.upper, 25.0);
    }
}
