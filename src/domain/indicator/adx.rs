//! ADX — Average Directional Index (Wilder).
//!
//! 1. +DM / −DM from consecutive bars
//! 2. Wilder-smooth +DM, −DM and true range (alpha = 1/period)
//! 3. ±DI = 100 × smoothed(±DM) / smoothed(TR)
//! 4. DX = 100 × |+DI − −DI| / (+DI + −DI)
//! 5. ADX = Wilder-smoothed DX
//!
//! Output is in [0, 100] where defined; the warmup prefix is `NaN`.

/// Wilder smoothing: seed with the mean of the first full window, then
/// s[i] = (s[i-1] × (period − 1) + x[i]) / period. Leading `NaN`s shift the
/// seed window forward.
pub(crate) fn wilder_smooth(values: &[f64], period: usize) -> Vec<f64> {
    let n = values.len();
    let mut out = vec![f64::NAN; n];
    if period == 0 {
        return out;
    }
    let start = match values.iter().position(|v| !v.is_nan()) {
        Some(i) => i,
        None => return out,
    };
    if start + period > n {
        return out;
    }

    let mut smoothed: f64 = values[start..start + period].iter().sum::<f64>() / period as f64;
    out[start + period - 1] = smoothed;
    for i in start + period..n {
        smoothed = (smoothed * (period as f64 - 1.0) + values[i]) / period as f64;
        out[i] = smoothed;
    }
    out
}

fn true_range(highs: &[f64], lows: &[f64], closes: &[f64]) -> Vec<f64> {
    let n = highs.len();
    let mut tr = vec![f64::NAN; n];
    for i in 1..n {
        let hl = highs[i] - lows[i];
        let hc = (highs[i] - closes[i - 1]).abs();
        let lc = (lows[i] - closes[i - 1]).abs();
        tr[i] = hl.max(hc).max(lc);
    }
    tr
}

pub fn adx(highs: &[f64], lows: &[f64], closes: &[f64], period: usize) -> Vec<f64> {
    let n = highs.len();
    let out = vec![f64::NAN; n];
    if n < 2 || period == 0 {
        return out;
    }

    let mut plus_dm = vec![f64::NAN; n];
    let mut minus_dm = vec![f64::NAN; n];
    for i in 1..n {
        let up = highs[i] - highs[i - 1];
        let down = lows[i - 1] - lows[i];
        plus_dm[i] = if up > down && up > 0.0 { up } else { 0.0 };
        minus_dm[i] = if down > up && down > 0.0 { down } else { 0.0 };
    }

    let smooth_tr = wilder_smooth(&true_range(highs, lows, closes), period);
    let smooth_plus = wilder_smooth(&plus_dm, period);
    let smooth_minus = wilder_smooth(&minus_dm, period);

    let mut dx = vec![f64::NAN; n];
    for i in 0..n {
        if smooth_tr[i].is_nan()
            || smooth_plus[i].is_nan()
            || smooth_minus[i].is_nan()
            || smooth_tr[i] == 0.0
        {
            continue;
        }
        let plus_di = 100.0 * smooth_plus[i] / smooth_tr[i];
        let minus_di = 100.0 * smooth_minus[i] / smooth_tr[i];
        let di_sum = plus_di + minus_di;
        dx[i] = if di_sum == 0.0 {
            0.0
        } else {
            100.0 * (plus_di - minus_di).abs() / di_sum
        };
    }

    wilder_smooth(&dx, period)
}
