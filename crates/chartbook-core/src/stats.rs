//! Descriptive statistics over `f64` samples.
//!
//! Inputs never contain nulls; callers filter them out first.

/// Arithmetic mean. `None` for an empty sample.
pub fn mean(xs: &[f64]) -> Option<f64> {
  if xs.is_empty() {
    return None;
  }
  Some(xs.iter().sum::<f64>() / xs.len() as f64)
}

/// Sample standard deviation (`n - 1` denominator). `None` below two
/// observations.
pub fn sample_std(xs: &[f64]) -> Option<f64> {
  if xs.len() < 2 {
    return None;
  }
  let m = mean(xs)?;
  let ss: f64 = xs.iter().map(|x| (x - m).powi(2)).sum();
  Some((ss / (xs.len() - 1) as f64).sqrt())
}

/// Quantile `q` (0..=1) of an ascending-sorted sample, linearly
/// interpolated between the closest ranks.
pub fn quantile_sorted(sorted: &[f64], q: f64) -> Option<f64> {
  if sorted.is_empty() {
    return None;
  }
  let pos = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
  let lo = pos.floor() as usize;
  let hi = pos.ceil() as usize;
  let frac = pos - lo as f64;
  if frac == 0.0 {
    return Some(sorted[lo]);
  }
  Some(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}

/// Copy and sort a sample ascending. NaN sorts last.
pub fn sorted(xs: &[f64]) -> Vec<f64> {
  let mut v = xs.to_vec();
  v.sort_by(|a, b| a.total_cmp(b));
  v
}

/// Pearson correlation over the pairs where both sides are present.
///
/// `None` when fewer than two complete pairs exist or either side has zero
/// variance.
pub fn pearson(xs: &[Option<f64>], ys: &[Option<f64>]) -> Option<f64> {
  let pairs: Vec<(f64, f64)> = xs
    .iter()
    .zip(ys)
    .filter_map(|(x, y)| Some(((*x)?, (*y)?)))
    .collect();
  if pairs.len() < 2 {
    return None;
  }
  let n = pairs.len() as f64;
  let mx = pairs.iter().map(|(x, _)| x).sum::<f64>() / n;
  let my = pairs.iter().map(|(_, y)| y).sum::<f64>() / n;

  let (mut sxy, mut sxx, mut syy) = (0.0, 0.0, 0.0);
  for (x, y) in &pairs {
    let (dx, dy) = (x - mx, y - my);
    sxy += dx * dy;
    sxx += dx * dx;
    syy += dy * dy;
  }
  if sxx == 0.0 || syy == 0.0 {
    return None;
  }
  Some((sxy / (sxx.sqrt() * syy.sqrt())).clamp(-1.0, 1.0))
}
