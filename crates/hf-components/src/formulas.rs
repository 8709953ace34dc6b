//! Hydraulic helper formulas.

use hf_core::{HfError, HfResult, Real, ensure_finite};

/// Nozzle conductance from a rated operating point: `p = q / sqrt(H)`.
///
/// `q` in l/s, `h` in meters of head.
pub fn calc_p(q: Real, h: Real) -> HfResult<Real> {
    ensure_finite(q, "flow")?;
    ensure_finite(h, "head")?;
    if h <= 0.0 {
        return Err(HfError::InvalidArg {
            what: "head must be positive",
        });
    }
    Ok(q / h.sqrt())
}

/// Head loss of `n` units of resistance `s` at flow `q`: `h = n * s * q^2`.
pub fn calc_h(n: Real, s: Real, q: Real) -> Real {
    n * s * q * q
}
