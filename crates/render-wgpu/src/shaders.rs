/// Instanced box shader: one directional light plus ambient.
pub const BOX_SHADER: &str = r#"
struct Frame {
    view_proj: mat4x4<f32>,
    // xyz: unit vector toward the light, w: intensity
    sun: vec4<f32>,
    // x: ambient term
    ambient: vec4<f32>,
};

@group(0) @binding(0)
var<uniform> frame: Frame;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
};

struct InstanceInput {
    @location(2) model_0: vec4<f32>,
    @location(3) model_1: vec4<f32>,
    @location(4) model_2: vec4<f32>,
    @location(5) model_3: vec4<f32>,
    @location(6) color: vec4<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) world_normal: vec3<f32>,
    @location(1) color: vec4<f32>,
};

@vertex
fn vs_box(vertex: VertexInput, instance: InstanceInput) -> VertexOutput {
    let model = mat4x4<f32>(
        instance.model_0,
        instance.model_1,
        instance.model_2,
        instance.model_3,
    );
    // Non-uniform scale: dividing by the scale before the model transform
    // leaves R*n, not the inverse-transpose R*S^-1*n. Cube face normals lie
    // on the local axes, so the two agree once normalized.
    let sx = length(instance.model_0.xyz);
    let sy = length(instance.model_1.xyz);
    let sz = length(instance.model_2.xyz);
    let scaled = vertex.normal / vec3<f32>(sx, sy, sz);
    let world_normal = (model * vec4<f32>(scaled, 0.0)).xyz;

    var out: VertexOutput;
    out.clip_position = frame.view_proj * model * vec4<f32>(vertex.position, 1.0);
    out.world_normal = normalize(world_normal);
    out.color = instance.color;
    return out;
}

@fragment
fn fs_box(in: VertexOutput) -> @location(0) vec4<f32> {
    let diffuse = max(dot(in.world_normal, frame.sun.xyz), 0.0) * frame.sun.w;
    let shade = min(frame.ambient.x + diffuse, 1.0);
    return vec4<f32>(in.color.rgb * shade, in.color.a);
}
"#;
