/// Uniform colour whose red channel bounces between 0 and 1.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorPulse {
    base: [f32; 4],
    value: f32,
    step: f32,
    increment: f32,
}

impl ColorPulse {
    pub const DEFAULT_COLOR: [f32; 4] = [0.2, 0.3, 0.8, 1.0];
    pub const DEFAULT_STEP: f32 = 0.05;

    pub fn new(base: [f32; 4], step: f32) -> Self {
        Self {
            base,
            value: 0.0,
            step,
            increment: step,
        }
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    /// Static colour, as set once before the first frame.
    pub fn base(&self) -> [f32; 4] {
        self.base
    }

    pub fn color(&self) -> [f32; 4] {
        let [_, g, b, a] = self.base;
        [self.value, g, b, a]
    }

    /// Moves to the next frame, reversing once the value leaves `[0, 1]`.
    pub fn advance(&mut self) {
        if self.value > 1.0 {
            self.increment = -self.step;
        } else if self.value < 0.0 {
            self.increment = self.step;
        }

        self.value += self.increment;
    }
}

impl Default for ColorPulse {
    fn default() -> Self {
        Self::new(Self::DEFAULT_COLOR, Self::DEFAULT_STEP)
    }
}
