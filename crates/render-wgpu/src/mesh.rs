use boxdodge_render::{Lighting, RenderView, SceneMirror};
use bytemuck::{Pod, Zeroable};

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
pub(crate) struct FrameUniforms {
    pub view_proj: [[f32; 4]; 4],
    pub sun: [f32; 4],
    pub ambient: [f32; 4],
}

impl FrameUniforms {
    pub fn new(view: &RenderView, aspect: f32, lighting: &Lighting) -> Self {
        let to_light = lighting.to_light();
        Self {
            view_proj: view.view_proj(aspect).to_cols_array_2d(),
            sun: to_light.extend(lighting.sun_intensity).to_array(),
            ambient: [lighting.ambient, 0.0, 0.0, 0.0],
        }
    }
}

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub(crate) struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub(crate) struct Instance {
    pub model: [[f32; 4]; 4],
    pub color: [f32; 4],
}

/// Unit cube centered on the origin, four vertices per face so each face
/// carries a flat normal.
pub(crate) fn unit_cube() -> (Vec<Vertex>, Vec<u16>) {
    // (normal, u axis, v axis); u x v == normal keeps faces counter-clockwise.
    const FACES: [([f32; 3], [f32; 3], [f32; 3]); 6] = [
        ([0.0, 0.0, 1.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
        ([0.0, 0.0, -1.0], [-1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
        ([1.0, 0.0, 0.0], [0.0, 0.0, -1.0], [0.0, 1.0, 0.0]),
        ([-1.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0, 0.0]),
        ([0.0, 1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, -1.0]),
        ([0.0, -1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]),
    ];
    let mut vertices = Vec::with_capacity(24);
    let mut indices = Vec::with_capacity(36);
    for (n, u, v) in FACES {
        let base = vertices.len() as u16;
        for (su, sv) in [(-0.5, -0.5), (0.5, -0.5), (0.5, 0.5), (-0.5, 0.5)] {
            let position = std::array::from_fn(|i| n[i] * 0.5 + u[i] * su + v[i] * sv);
            vertices.push(Vertex {
                position,
                normal: n,
            });
        }
        indices.extend([base, base + 1, base + 2, base + 2, base + 3, base]);
    }
    (vertices, indices)
}

/// One instance per drawable, in id order.
pub(crate) fn instances(scene: &SceneMirror) -> Vec<Instance> {
    scene
        .iter()
        .map(|(_, d)| {
            let [r, g, b] = d.color;
            Instance {
                model: d.model_matrix().to_cols_array_2d(),
                color: [r, g, b, 1.0],
            }
        })
        .collect()
}
