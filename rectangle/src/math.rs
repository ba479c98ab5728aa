use cgmath::{Vector3, VectorSpace};

pub trait Lerpable: Clone + Copy {
    fn lerp(&self, other: &Self, factor: f64) -> Self;
}

impl Lerpable for f64 {
    fn lerp(&self, other: &Self, factor: f64) -> Self {
        self * (1.0 - factor) + (other * factor)
    }
}

impl Lerpable for Vector3<f64> {
    fn lerp(&self, other: &Self, factor: f64) -> Self {
        <Self as VectorSpace>::lerp(*self, *other, factor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lerp_endpoints() {
        assert_eq!(2.0_f64.lerp(&4.0, 0.0), 2.0);
        assert_eq!(2.0_f64.lerp(&4.0, 0.5), 3.0);
        assert_eq!(2.0_f64.lerp(&4.0, 1.0), 4.0);

        let a = Vector3::new(0.0, 1.0, 2.0);
        let b = Vector3::new(1.0, 1.0, 0.0);
        assert_eq!(Lerpable::lerp(&a, &b, 0.5), Vector3::new(0.5, 1.0, 1.0));
    }
}
