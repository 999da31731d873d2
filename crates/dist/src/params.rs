//! Fitted parameter triple shared by all parametric families.

/// Maximum-likelihood parameter estimates in the (shape, loc, scale)
/// convention.
///
/// - gamma: `shape` = k, `loc` = 0, `scale` = theta
/// - log-normal: `shape` = sd of ln x, `loc` = 0, `scale` = exp(mean of ln x)
/// - normal: `shape` = None, `loc` = mean, `scale` = sd
///
/// Positive-support families are fit with `loc` fixed at zero; the zero
/// mass of precipitation-type data is handled by the explicit zero-mass
/// correction rather than a shifted origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DistParams {
    shape: Option<f64>,
    loc: f64,
    scale: f64,
}

impl DistParams {
    pub(crate) fn new(shape: Option<f64>, loc: f64, scale: f64) -> Self {
        Self { shape, loc, scale }
    }

    /// Shape parameter, when the family has one.
    pub fn shape(&self) -> Option<f64> {
        self.shape
    }

    /// Location parameter.
    pub fn loc(&self) -> f64 {
        self.loc
    }

    /// Scale parameter.
    pub fn scale(&self) -> f64 {
        self.scale
    }
}
