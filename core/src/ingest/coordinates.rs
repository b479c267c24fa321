/// Geographic bounds check applied at parse time and again before any locate.
pub struct CoordinateValidator;

impl CoordinateValidator {
    pub fn is_valid(latitude: f64, longitude: f64) -> bool {
        !latitude.is_nan()
            && !longitude.is_nan()
            && (-90.0..=90.0).contains(&latitude)
            && (-180.0..=180.0).contains(&longitude)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_inclusive_bounds() {
        assert!(CoordinateValidator::is_valid(90.0, 180.0));
        assert!(CoordinateValidator::is_valid(-90.0, -180.0));
        assert!(CoordinateValidator::is_valid(18.52, 73.85));
    }

    #[test]
    fn rejects_out_of_range_and_nan() {
        assert!(!CoordinateValidator::is_valid(200.0, 73.85));
        assert!(!CoordinateValidator::is_valid(18.5, -180.5));
        assert!(!CoordinateValidator::is_valid(f64::NAN, 0.0));
        assert!(!CoordinateValidator::is_valid(0.0, f64::NAN));
        assert!(!CoordinateValidator::is_valid(f64::INFINITY, 0.0));
    }
}
