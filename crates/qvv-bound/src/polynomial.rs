//! Real roots of quadratic, cubic and quartic polynomials in closed form.
//!
//! Coefficients are given from the highest degree down. A leading coefficient is
//! dropped only when it is zero or when the Cauchy bound of the roots exceeds
//! `1 / LEADING_EPSILON`, so the polynomial loses one degree only for a root that
//! has effectively escaped to infinity. Roots are returned unsorted, repeated roots
//! may appear more than once.

use std::f64::consts::PI;

/// Inverse of the root magnitude above which a leading coefficient is dropped.
const LEADING_EPSILON: f64 = 1e-14;

/// Number of Newton steps used to polish each root.
const POLISH_STEPS: usize = 2;

/// Real roots of `a x^2 + b x + c`.
///
/// Example:
///
/// ```
/// use qvv_bound::polynomial::solve_quadratic;
///
/// let mut roots = solve_quadratic(1.0, -3.0, 2.0);
/// roots.sort_by(f64::total_cmp);
/// assert_eq!(roots, vec![1.0, 2.0]);
/// ```
pub fn solve_quadratic(a: f64, b: f64, c: f64) -> Vec<f64> {
    if a == 0.0 && b == 0.0 && c == 0.0 {
        return Vec::new();
    }

    if is_negligible_leading(a, &[b, c]) {
        return if b == 0.0 { Vec::new() } else { vec![-c / b] };
    }

    let mut discriminant = b * b - 4.0 * a * c;
    if discriminant < 0.0 {
        // tangent roots can land slightly below zero
        if discriminant >= -LEADING_EPSILON * b * b {
            discriminant = 0.0;
        } else {
            return Vec::new();
        }
    }

    // avoid cancellation between b and the square root
    let q = -0.5 * (b + b.signum() * discriminant.sqrt());
    if q == 0.0 {
        return vec![0.0, 0.0];
    }

    vec![q / a, c / q]
}

/// Real roots of `a x^3 + b x^2 + c x + d`.
pub fn solve_cubic(a: f64, b: f64, c: f64, d: f64) -> Vec<f64> {
    if a == 0.0 && b == 0.0 && c == 0.0 && d == 0.0 {
        return Vec::new();
    }

    if is_negligible_leading(a, &[b, c, d]) {
        return solve_quadratic(b, c, d);
    }

    let coeffs = [a, b, c, d];
    monic_cubic_roots(b / a, c / a, d / a)
        .into_iter()
        .map(|x| polish(&coeffs, x))
        .collect()
}

/// Unpolished real roots of `x^3 + b x^2 + c x + d`.
fn monic_cubic_roots(b: f64, c: f64, d: f64) -> Vec<f64> {
    // depressed cubic t^3 + p t + q with x = t - b / 3
    let shift = -b / 3.0;
    let p = c - b * b / 3.0;
    let q = 2.0 * b * b * b / 27.0 - b * c / 3.0 + d;

    let discriminant = (q / 2.0).powi(2) + (p / 3.0).powi(3);

    if discriminant > 0.0 {
        // one real root, Cardano
        let u = (-q / 2.0 - q.signum() * discriminant.sqrt()).cbrt();
        let v = if u == 0.0 { 0.0 } else { -p / (3.0 * u) };
        vec![u + v + shift]
    } else if p >= 0.0 {
        // p == q == 0: triple root
        vec![shift]
    } else {
        // three real roots, trigonometric method
        let r = (-p / 3.0).sqrt();
        let phi = (-q / (2.0 * r * r * r)).clamp(-1.0, 1.0).acos() / 3.0;
        (0..3)
            .map(|k| 2.0 * r * (phi - 2.0 * PI * k as f64 / 3.0).cos() + shift)
            .collect()
    }
}

/// Real roots of `a x^4 + b x^3 + c x^2 + d x + e`, by Ferrari's method.
///
/// Example:
///
/// ```
/// use qvv_bound::polynomial::solve_quartic;
///
/// // (x^2 - 1)(x^2 - 4)
/// let mut roots = solve_quartic(1.0, 0.0, -5.0, 0.0, 4.0);
/// roots.sort_by(f64::total_cmp);
/// assert_eq!(roots.len(), 4);
/// assert!((roots[0] + 2.0).abs() < 1e-12 && (roots[3] - 2.0).abs() < 1e-12);
/// ```
pub fn solve_quartic(a: f64, b: f64, c: f64, d: f64, e: f64) -> Vec<f64> {
    if a == 0.0 && b == 0.0 && c == 0.0 && d == 0.0 && e == 0.0 {
        return Vec::new();
    }

    if is_negligible_leading(a, &[b, c, d, e]) {
        return solve_cubic(b, c, d, e);
    }

    let coeffs = [a, b, c, d, e];
    let (b, c, d, e) = (b / a, c / a, d / a, e / a);

    // depressed quartic y^4 + p y^2 + q y + r with x = y - b / 4
    let shift = -b / 4.0;
    let b2 = b * b;
    let p = c - 3.0 * b2 / 8.0;
    let q = d - b * c / 2.0 + b2 * b / 8.0;
    let r = e - b * d / 4.0 + b2 * c / 16.0 - 3.0 * b2 * b2 / 256.0;

    let mut depressed_roots = Vec::with_capacity(4);

    // the resolvent has a positive root whenever q != 0; it is monic and never demoted
    let resolvent_root = if q.abs() <= LEADING_EPSILON * (1.0 + p.abs() + r.abs()) {
        None
    } else {
        let resolvent = [1.0, p, p * p / 4.0 - r, -q * q / 8.0];
        monic_cubic_roots(resolvent[1], resolvent[2], resolvent[3])
            .into_iter()
            .map(|m| polish(&resolvent, m))
            .fold(None, |largest: Option<f64>, m| match largest {
                Some(current) if current >= m => Some(current),
                _ => Some(m),
            })
            .filter(|m| *m > 0.0)
    };

    match resolvent_root {
        Some(m) => {
            let s = (2.0 * m).sqrt();
            let t = q / (2.0 * s);
            depressed_roots.extend(solve_quadratic(1.0, -s, p / 2.0 + m + t));
            depressed_roots.extend(solve_quadratic(1.0, s, p / 2.0 + m - t));
        }
        None => {
            // biquadratic in y^2
            for z in solve_quadratic(1.0, p, r) {
                if z >= 0.0 {
                    let y = z.sqrt();
                    depressed_roots.push(y);
                    depressed_roots.push(-y);
                }
            }
        }
    }

    depressed_roots
        .into_iter()
        .map(|y| polish(&coeffs, y + shift))
        .collect()
}

/// Whether some root of the polynomial may exceed `1 / LEADING_EPSILON`, by the
/// Cauchy bound `1 + max |c_i / a|`.
fn is_negligible_leading(a: f64, rest: &[f64]) -> bool {
    a == 0.0 || rest.iter().any(|c| (c / a).abs() > 1.0 / LEADING_EPSILON)
}

/// Evaluate a polynomial and its derivative with Horner's scheme.
fn evaluate(coeffs: &[f64], x: f64) -> (f64, f64) {
    coeffs.iter().fold((0.0, 0.0), |(value, derivative), &coeff| {
        (value * x + coeff, derivative * x + value)
    })
}

/// Newton steps that are kept only while they reduce the residual.
fn polish(coeffs: &[f64], mut x: f64) -> f64 {
    for _ in 0..POLISH_STEPS {
        let (value, derivative) = evaluate(coeffs, x);
        if value == 0.0 || derivative == 0.0 {
            break;
        }
        let next = x - value / derivative;
        if !next.is_finite() || evaluate(coeffs, next).0.abs() >= value.abs() {
            break;
        }
        x = next;
    }
    x
}
