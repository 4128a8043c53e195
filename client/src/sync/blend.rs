/// State that can be bent part of the way toward an authoritative value.
///
/// `amount` is in `0.0..=1.0`; `0.0` keeps the local value, `1.0` takes the
/// authoritative value.
pub trait Blend {
    fn blend_toward(&mut self, target: &Self, amount: f32);
}

impl Blend for f32 {
    fn blend_toward(&mut self, target: &Self, amount: f32) {
        *self += (*target - *self) * amount;
    }
}

impl Blend for f64 {
    fn blend_toward(&mut self, target: &Self, amount: f32) {
        *self += (*target - *self) * f64::from(amount);
    }
}

impl<const N: usize> Blend for [f32; N] {
    fn blend_toward(&mut self, target: &Self, amount: f32) {
        for (value, target) in self.iter_mut().zip(target) {
            value.blend_toward(target, amount);
        }
    }
}

impl Blend for Vec<f32> {
    // Differently shaped state cannot be bent, it is replaced.
    fn blend_toward(&mut self, target: &Self, amount: f32) {
        if self.len() != target.len() {
            self.clone_from(target);
            return;
        }
        for (value, target) in self.iter_mut().zip(target) {
            value.blend_toward(target, amount);
        }
    }
}
