use serde::{Deserialize, Serialize};

#[rustfmt::skip]
const TRIANGLE_POSITIONS: [f32; 6] = [
    -0.5, -0.5,
     0.0,  0.5,
     0.5, -0.5,
];

#[rustfmt::skip]
const QUAD_POSITIONS: [f32; 8] = [
    -0.5, -0.5, // 0
     0.5, -0.5, // 1
     0.5,  0.5, // 2
    -0.5,  0.5, // 3
];

#[rustfmt::skip]
const QUAD_INDICES: [u32; 6] = [
    0, 1, 2,
    2, 3, 0,
];

/// Name of the colour uniform in the built-in shaders.
pub const COLOR_UNIFORM: &str = "u_Color";

/// Floats per vertex in every preset.
pub const POSITION_COMPONENTS: usize = 2;

/// Iterations of the demo, from the plain triangle to the pulsing quad.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    Triangle,
    Quad,
    #[default]
    Pulse,
}

impl Preset {
    pub fn positions(&self) -> &'static [f32] {
        match self {
            Preset::Triangle => &TRIANGLE_POSITIONS,
            Preset::Quad | Preset::Pulse => &QUAD_POSITIONS,
        }
    }

    pub fn indices(&self) -> Option<&'static [u32]> {
        match self {
            Preset::Triangle => None,
            Preset::Quad | Preset::Pulse => Some(&QUAD_INDICES),
        }
    }

    pub fn uses_color_uniform(&self) -> bool {
        !matches!(self, Preset::Triangle)
    }

    pub fn animated(&self) -> bool {
        matches!(self, Preset::Pulse)
    }
}
