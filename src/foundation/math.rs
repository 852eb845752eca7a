/// Linear interpolation between `a` and `b` at parameter `t`.
///
/// `t` is not clamped; callers that need a bounded result clamp first.
pub(crate) fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lerp_endpoints_and_midpoint() {
        assert_eq!(lerp(1.0, 9.0, 0.0), 1.0);
        assert_eq!(lerp(1.0, 9.0, 1.0), 9.0);
        assert_eq!(lerp(1.0, 9.0, 0.5), 5.0);
    }

    #[test]
    fn lerp_is_exact_for_equal_endpoints() {
        assert_eq!(lerp(4.25, 4.25, 0.3), 4.25);
    }
}
