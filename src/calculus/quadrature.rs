//! Adaptive Simpson quadrature for integrands without a known antiderivative.

/// Integrate `f` over `[a, b]`. Returns `None` as soon as `f` is undefined at a sample point.
pub fn adaptive_simpson(
    f: &dyn Fn(f64) -> Option<f64>,
    a: f64,
    b: f64,
    tol: f64,
    max_depth: u32,
) -> Option<f64> {
    let fa = f(a)?;
    let fb = f(b)?;
    let fm = f((a + b) / 2.0)?;
    let whole = Panel { a, b, fa, fm, fb }.estimate();
    refine(f, Panel { a, b, fa, fm, fb }, whole, tol, max_depth)
}

/// An interval with the integrand sampled at both ends and the midpoint.
#[derive(Clone, Copy)]
struct Panel {
    a: f64,
    b: f64,
    fa: f64,
    fm: f64,
    fb: f64,
}

impl Panel {
    fn estimate(&self) -> f64 {
        (self.b - self.a) / 6.0 * (self.fa + 4.0 * self.fm + self.fb)
    }
}

fn refine(
    f: &dyn Fn(f64) -> Option<f64>,
    panel: Panel,
    whole: f64,
    tol: f64,
    depth: u32,
) -> Option<f64> {
    let m = (panel.a + panel.b) / 2.0;
    let left = Panel {
        a: panel.a,
        b: m,
        fa: panel.fa,
        fm: f((panel.a + m) / 2.0)?,
        fb: panel.fm,
    };
    let right = Panel {
        a: m,
        b: panel.b,
        fa: panel.fm,
        fm: f((m + panel.b) / 2.0)?,
        fb: panel.fb,
    };
    let (left_est, right_est) = (left.estimate(), right.estimate());
    let refined = left_est + right_est;
    let error = (refined - whole) / 15.0;

    if depth == 0 || error.abs() < tol {
        Some(refined + error)
    } else {
        Some(
            refine(f, left, left_est, tol / 2.0, depth - 1)?
                + refine(f, right, right_est, tol / 2.0, depth - 1)?,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integrates_smooth_functions() {
        let square = |x: f64| Some(x * x);
        let value = adaptive_simpson(&square, 0.0, 3.0, 1e-12, 30).unwrap();
        assert!((value - 9.0).abs() < 1e-10);
    }

    #[test]
    fn stops_on_undefined_samples() {
        let reciprocal = |x: f64| if x == 0.0 { None } else { Some(1.0 / x) };
        assert!(adaptive_simpson(&reciprocal, 0.0, 1.0, 1e-8, 20).is_none());
    }
}
