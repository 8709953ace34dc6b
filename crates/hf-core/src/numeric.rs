use crate::HfError;

/// Floating point type used throughout system
pub type Real = f64;

pub fn ensure_finite(v: Real, what: &'static str) -> Result<Real, HfError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(HfError::NonFinite { what, value: v })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn ensure_finite_detects_nan() {
        let err = ensure_finite(Real::NAN, "test").unwrap_err();
        let msg = format!("{err}");
        assert!(msg.contains("Non-finite"));
        assert!(ensure_finite(Real::INFINITY, "head").is_err());
    }

    proptest! {
        #[test]
        fn finite_values_pass_through(v in -1e12_f64..1e12) {
            prop_assert_eq!(ensure_finite(v, "v"), Ok(v));
        }
    }
}
