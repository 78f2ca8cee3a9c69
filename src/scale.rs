//! Scales and colour ramps shared by the views.
//!
//! A scale maps a data value to a unit interval `t`, then to pixels or a
//! colour. Log-based scales only accept strictly positive values; anything
//! else comes back as `None` and is drawn as no data.

use ratatui::style::Color;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const WHITE: Rgb = Rgb(255, 255, 255);

    pub fn lerp(self, other: Rgb, t: f64) -> Rgb {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round() as u8;
        Rgb(mix(self.0, other.0), mix(self.1, other.1), mix(self.2, other.2))
    }
}

impl From<Rgb> for Color {
    fn from(c: Rgb) -> Self {
        Color::Rgb(c.0, c.1, c.2)
    }
}

/// Fill for countries without a value
pub const NO_DATA: Rgb = Rgb(0xe5, 0xe7, 0xeb);
/// Net donor extreme
pub const DONOR_RED: Rgb = Rgb(178, 24, 43);
/// Net recipient extreme
pub const RECIPIENT_BLUE: Rgb = Rgb(33, 102, 172);

/// Nine-class Blues
const BLUES: [Rgb; 9] = [
    Rgb(0xf7, 0xfb, 0xff),
    Rgb(0xde, 0xeb, 0xf7),
    Rgb(0xc6, 0xdb, 0xef),
    Rgb(0x9e, 0xca, 0xe1),
    Rgb(0x6b, 0xae, 0xd6),
    Rgb(0x42, 0x92, 0xc6),
    Rgb(0x21, 0x71, 0xb5),
    Rgb(0x08, 0x51, 0x9c),
    Rgb(0x08, 0x30, 0x6b),
];

/// Piecewise interpolation through the Blues stops
pub fn blues(t: f64) -> Rgb {
    let t = t.clamp(0.0, 1.0) * (BLUES.len() - 1) as f64;
    let i = (t.floor() as usize).min(BLUES.len() - 2);
    BLUES[i].lerp(BLUES[i + 1], t - i as f64)
}

/// Extent of the strictly positive, finite values
pub fn positive_extent<I: IntoIterator<Item = f64>>(values: I) -> Option<(f64, f64)> {
    values
        .into_iter()
        .filter(|v| v.is_finite() && *v > 0.0)
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    pub domain: (f64, f64),
    pub range: (f64, f64),
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    pub fn map(&self, v: f64) -> f64 {
        let (d0, d1) = self.domain;
        let span = d1 - d0;
        let t = if span == 0.0 { 0.0 } else { (v - d0) / span };
        self.range.0 + t * (self.range.1 - self.range.0)
    }

    pub fn invert(&self, px: f64) -> f64 {
        let (r0, r1) = self.range;
        let span = r1 - r0;
        let t = if span == 0.0 { 0.0 } else { (px - r0) / span };
        self.domain.0 + t * (self.domain.1 - self.domain.0)
    }

    /// Round step ticks (1, 2 or 5 times a power of ten), about `count` of them
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        let (lo, hi) = (self.domain.0.min(self.domain.1), self.domain.0.max(self.domain.1));
        if count == 0 || !(hi > lo) {
            return vec![lo];
        }
        let raw = (hi - lo) / count as f64;
        let magnitude = 10f64.powi(raw.log10().floor() as i32);
        let step = [1.0, 2.0, 5.0, 10.0]
            .iter()
            .map(|m| m * magnitude)
            .find(|s| *s >= raw)
            .unwrap_or(10.0 * magnitude);

        let first = (lo / step).ceil() as i64;
        let last = (hi / step).floor() as i64;
        (first..=last).map(|k| k as f64 * step).collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LogScale {
    pub domain: (f64, f64),
    pub range: (f64, f64),
}

impl LogScale {
    /// `None` when no strictly positive value exists
    pub fn from_values<I: IntoIterator<Item = f64>>(values: I) -> Option<Self> {
        positive_extent(values).map(|domain| Self {
            domain,
            range: (0.0, 1.0),
        })
    }

    /// Widen the domain outward to whole decades
    pub fn nice(mut self) -> Self {
        let lo = 10f64.powi(self.domain.0.log10().floor() as i32);
        let mut hi = 10f64.powi(self.domain.1.log10().ceil() as i32);
        if hi <= lo {
            hi = lo * 10.0;
        }
        self.domain = (lo, hi);
        self
    }

    pub fn with_range(mut self, r0: f64, r1: f64) -> Self {
        self.range = (r0, r1);
        self
    }

    /// Position in [0, 1] along the domain; values outside extrapolate
    pub fn unit(&self, v: f64) -> Option<f64> {
        if !(v > 0.0) || !v.is_finite() {
            return None;
        }
        let (l0, l1) = (self.domain.0.ln(), self.domain.1.ln());
        if l1 == l0 {
            return Some(0.5);
        }
        Some((v.ln() - l0) / (l1 - l0))
    }

    pub fn map(&self, v: f64) -> Option<f64> {
        self.unit(v)
            .map(|t| self.range.0 + t * (self.range.1 - self.range.0))
    }

    pub fn invert(&self, px: f64) -> f64 {
        let span = self.range.1 - self.range.0;
        let t = if span == 0.0 { 0.0 } else { (px - self.range.0) / span };
        let (l0, l1) = (self.domain.0.ln(), self.domain.1.ln());
        (l0 + t * (l1 - l0)).exp()
    }

    /// Powers of ten inside the domain
    pub fn ticks(&self) -> Vec<f64> {
        let first = self.domain.0.log10().ceil() as i32;
        let last = self.domain.1.log10().floor() as i32;
        (first..=last).map(|k| 10f64.powi(k)).collect()
    }
}

/// Symmetric log used for net balances
#[inline]
pub fn symlog(v: f64) -> f64 {
    v.signum() * (1.0 + v.abs() / 1e9).ln()
}

/// Diverging colour scale around zero with independently sized halves
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DivergingScale {
    pub min: f64,
    pub max: f64,
}

impl DivergingScale {
    /// Domain fixed to the observed skew of net balances
    pub fn net_balance() -> Self {
        Self {
            min: -500e9,
            max: 100e9,
        }
    }

    /// 0 at `min`, 0.5 at zero, 1 at `max`; clamped
    pub fn unit(&self, v: f64) -> f64 {
        if !v.is_finite() {
            return 0.5;
        }
        let v = v.clamp(self.min, self.max);
        let s = symlog(v);
        if s < 0.0 {
            0.5 - 0.5 * s / symlog(self.min)
        } else if s > 0.0 {
            0.5 + 0.5 * s / symlog(self.max)
        } else {
            0.5
        }
    }

    pub fn color_at(&self, t: f64) -> Rgb {
        if t < 0.5 {
            Rgb::WHITE.lerp(DONOR_RED, (0.5 - t) * 2.0)
        } else {
            Rgb::WHITE.lerp(RECIPIENT_BLUE, (t - 0.5) * 2.0)
        }
    }

    pub fn color(&self, v: f64) -> Rgb {
        self.color_at(self.unit(v))
    }

    /// Legend ticks: both endpoints and zero
    pub fn ticks(&self) -> [f64; 3] {
        [self.min, 0.0, self.max]
    }
}

/// Per-facet log colour scale over the Blues ramp
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SequentialScale {
    log: LogScale,
}

impl SequentialScale {
    pub fn from_values<I: IntoIterator<Item = f64>>(values: I) -> Option<Self> {
        LogScale::from_values(values).map(|log| Self { log })
    }

    pub fn domain(&self) -> (f64, f64) {
        self.log.domain
    }

    /// `None` for values with no position on a log axis
    pub fn color(&self, v: f64) -> Option<Rgb> {
        let (lo, hi) = self.log.domain;
        if lo == hi {
            return (v > 0.0 && v.is_finite()).then(|| blues(1.0));
        }
        self.log.unit(v).map(blues)
    }

    /// Evenly spaced legend stops in log space
    pub fn legend(&self, stops: usize) -> Vec<(f64, Rgb)> {
        let (lo, hi) = self.log.domain;
        (0..stops)
            .map(|i| {
                let t = if stops < 2 { 1.0 } else { i as f64 / (stops - 1) as f64 };
                let v = (lo.ln() + t * (hi.ln() - lo.ln())).exp();
                (v, blues(t))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_is_white() {
        let scale = DivergingScale::net_balance();
        assert_eq!(scale.unit(0.0), 0.5);
        assert_eq!(scale.color(0.0), Rgb::WHITE);
    }

    #[test]
    fn test_net_donor_is_red_half() {
        let scale = DivergingScale::net_balance();
        let t = scale.unit(-48e9);
        assert!(t < 0.5);
        let c = scale.color(-48e9);
        assert!(c.0 > c.2, "expected a red tint, got {:?}", c);
        assert!(scale.unit(5e9) > 0.5);
    }

    #[test]
    fn test_diverging_clamps() {
        let scale = DivergingScale::net_balance();
        assert_eq!(scale.unit(-2e12), 0.0);
        assert_eq!(scale.unit(1e12), 1.0);
        assert_eq!(scale.color(-2e12), DONOR_RED);
        assert_eq!(scale.color(1e12), RECIPIENT_BLUE);
    }

    #[test]
    fn test_positive_extent_skips_non_positive() {
        assert_eq!(positive_extent([0.0, -3.0, 5.0, 2.0, f64::NAN]), Some((2.0, 5.0)));
        assert_eq!(positive_extent([0.0, -1.0]), None);
        assert!(LogScale::from_values(Vec::new()).is_none());
    }

    #[test]
    fn test_log_nice_and_ticks() {
        let scale = LogScale::from_values([3e6, 4.2e10]).unwrap().nice();
        assert_eq!(scale.domain, (1e6, 1e11));
        assert_eq!(scale.ticks().len(), 6);
        assert_eq!(scale.map(-1.0), None);
        assert_eq!(scale.map(0.0), None);

        let single = LogScale::from_values([1e9]).unwrap().nice();
        assert_eq!(single.domain, (1e9, 1e10));
    }

    #[test]
    fn test_log_range_mapping() {
        let scale = LogScale::from_values([1.0, 100.0]).unwrap().with_range(0.0, 10.0);
        assert_eq!(scale.map(1.0), Some(0.0));
        assert!((scale.map(10.0).unwrap() - 5.0).abs() < 1e-9);
        assert!((scale.invert(5.0) - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_sequential_facets_are_independent() {
        let a = SequentialScale::from_values([1e6, 1e9]).unwrap();
        let b = SequentialScale::from_values([10.0, 1000.0]).unwrap();
        assert_eq!(b.domain(), (10.0, 1000.0));
        assert_eq!(a.color(1e9), Some(blues(1.0)));
        assert_eq!(b.color(1000.0), Some(blues(1.0)));
        assert_eq!(b.color(0.0), None);
    }

    #[test]
    fn test_sequential_single_value() {
        let scale = SequentialScale::from_values([0.0, 42.0]).unwrap();
        assert_eq!(scale.color(42.0), Some(blues(1.0)));
        assert_eq!(scale.color(-1.0), None);
    }

    #[test]
    fn test_blues_endpoints() {
        assert_eq!(blues(0.0), Rgb(0xf7, 0xfb, 0xff));
        assert_eq!(blues(1.0), Rgb(0x08, 0x30, 0x6b));
    }

    #[test]
    fn test_linear_ticks() {
        let scale = LinearScale::new((0.0, 1.0), (0.0, 100.0));
        assert_eq!(scale.map(0.5), 50.0);
        assert_eq!(scale.invert(25.0), 0.25);

        let wide = LinearScale::new((0.0, 100.0), (0.0, 1.0));
        assert_eq!(wide.ticks(4), vec![0.0, 50.0, 100.0]);
        let small = LinearScale::new((0.0, 10.0), (0.0, 1.0));
        assert_eq!(small.ticks(5), vec![0.0, 2.0, 4.0, 6.0, 8.0, 10.0]);
    }
}
