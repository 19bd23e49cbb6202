/// out[i] = y[i] + a * x[i]
///
/// All three slices must have the same length.
pub fn axpy_into(out: &mut [f64], y: &[f64], a: f64, x: &[f64]) {
    assert!(
        out.len() == y.len() && y.len() == x.len(),
        "axpy_into: length mismatch"
    );
    for i in 0..out.len() {
        out[i] = y[i] + a * x[i];
    }
}

/// Index of the first NaN or infinite component, if any.
pub fn first_non_finite(v: &[f64]) -> Option<usize> {
    v.iter().position(|x| !x.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn axpy_combines_componentwise() {
        let mut out = vec![0.0; 3];
        axpy_into(&mut out, &[1.0, 2.0, 3.0], 0.5, &[2.0, -4.0, 0.0]);
        assert_eq!(out, vec![2.0, 0.0, 3.0]);
    }

    #[test]
    fn finds_non_finite() {
        assert_eq!(first_non_finite(&[0.0, 1.0]), None);
        assert_eq!(first_non_finite(&[0.0, f64::NAN, f64::INFINITY]), Some(1));
    }
}
