use ncollide2d::na::RealField;

/// Returns the index `i` of the last element in a non-decreasing slice such that
/// `slice[i] <= test_value`, clamped to `0` below the slice and to `len - 1` above it. When the
/// result is an interior index, `slice[i + 1] > test_value` is guaranteed.
pub fn preceding_index_search<N: RealField + Copy>(slice: &[N], test_value: N) -> usize {
    if slice.len() <= 1 || slice[1] > test_value {
        return 0;
    }

    let mut a = 1;
    let mut b = slice.len() - 1;
    if slice[b] <= test_value {
        return b;
    }

    while b > a + 1 {
        let check = (a + b) / 2;
        if test_value >= slice[check] {
            a = check;
        } else {
            b = check;
        }
    }
    a
}

/// Piecewise linear interpolation of `(xs, ys)` at `xq`, holding the end values outside of the
/// sampled range. `xs` must be non-decreasing and the same non-zero length as `ys`.
pub fn interp(xq: f64, xs: &[f64], ys: &[f64]) -> f64 {
    let last = xs.len() - 1;
    if xq <= xs[0] {
        return ys[0];
    }
    if xq >= xs[last] {
        return ys[last];
    }

    let i = preceding_index_search(xs, xq);
    let f = (xq - xs[i]) / (xs[i + 1] - xs[i]);
    ys[i] + f * (ys[i + 1] - ys[i])
}

/// `count` evenly spaced values from `start` to `end`, both included.
pub fn linspace(start: f64, end: f64, count: usize) -> Vec<f64> {
    match count {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (count - 1) as f64;
            let mut values: Vec<f64> = (0..count).map(|i| start + step * i as f64).collect();
            values[count - 1] = end;
            values
        }
    }
}

/// Trapezoidal rule over the samples `(x, y)`
pub fn trapezoid(x: &[f64], y: &[f64]) -> f64 {
    x.windows(2)
        .zip(y.windows(2))
        .map(|(xw, yw)| 0.5 * (xw[1] - xw[0]) * (yw[0] + yw[1]))
        .sum()
}

/// Derivative estimate dy/dx at every sample: central differences in the interior and one-sided
/// differences at both ends. Requires at least two samples with distinct neighbouring x values.
pub fn gradient(x: &[f64], y: &[f64]) -> Vec<f64> {
    let n = x.len();
    let mut result = vec![0.0; n];
    if n < 2 {
        return result;
    }

    result[0] = (y[1] - y[0]) / (x[1] - x[0]);
    result[n - 1] = (y[n - 1] - y[n - 2]) / (x[n - 1] - x[n - 2]);
    for i in 1..n - 1 {
        result[i] = (y[i + 1] - y[i - 1]) / (x[i + 1] - x[i - 1]);
    }

    result
}
