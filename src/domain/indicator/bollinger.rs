//! Bollinger bands.
//!
//! - Middle: SMA over `period` values
//! - Upper: middle + multiplier × stddev
//! - Lower: middle − multiplier × stddev
//!
//! Stddev is the population standard deviation (divides by N, not N−1).
//! The first (period − 1) outputs are `NaN`.

pub struct BollingerBands {
    pub lower: Vec<f64>,
    pub middle: Vec<f64>,
    pub upper: Vec<f64>,
}

pub fn bollinger(values: &[f64], period: usize, multiplier: f64) -> BollingerBands {
    let n = values.len();
    let mut bands = BollingerBands {
        lower: vec![f64::NAN; n],
        middle: vec![f64::NAN; n],
        upper: vec![f64::NAN; n],
    };
    if period == 0 || n < period {
        return bands;
    }

    for i in (period - 1)..n {
        let window = &values[i + 1 - period..=i];
        let mean: f64 = window.iter().sum::<f64>() / period as f64;
        let variance: f64 = window
            .iter()
            .map(|v| {
                let diff = v - mean;
                diff * diff
            })
            .sum::<f64>()
            / period as f64;
        let stddev = variance.sqrt();

        bands.middle[i] = mean;
        bands.upper[i] = mean + multiplier * stddev;
        bands.lower[i] = mean - multiplier * stddev;
    }

    bands
}
