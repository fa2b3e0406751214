/// WGSL for the scene: point light with ambient, diffuse and specular terms.
///
/// Lighting is computed in camera space. Untextured draws take their diffuse
/// color from the material; textured draws from the sampled texel.
pub const STANDARD_SHADER: &str = r#"
struct Frame {
    mvp: mat4x4<f32>,
    view: mat4x4<f32>,
    model: mat4x4<f32>,
    light_position: vec4<f32>,
};

struct Material {
    color: vec4<f32>,
    use_texture: u32,
    _pad0: u32,
    _pad1: u32,
    _pad2: u32,
};

@group(0) @binding(0)
var<uniform> frame: Frame;

@group(1) @binding(0)
var<uniform> material: Material;

@group(2) @binding(0)
var diffuse_texture: texture_2d<f32>;
@group(2) @binding(1)
var diffuse_sampler: sampler;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) uv: vec2<f32>,
    @location(2) normal: vec3<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) uv: vec2<f32>,
    @location(1) world_position: vec3<f32>,
    @location(2) normal_camera: vec3<f32>,
    @location(3) eye_direction_camera: vec3<f32>,
    @location(4) light_direction_camera: vec3<f32>,
};

@vertex
fn vs_main(vertex: VertexInput) -> VertexOutput {
    let world = frame.model * vec4<f32>(vertex.position, 1.0);
    let position_camera = (frame.view * world).xyz;
    let light_camera = (frame.view * vec4<f32>(frame.light_position.xyz, 1.0)).xyz;

    var out: VertexOutput;
    out.clip_position = frame.mvp * vec4<f32>(vertex.position, 1.0);
    out.uv = vertex.uv;
    out.world_position = world.xyz;
    out.eye_direction_camera = -position_camera;
    out.light_direction_camera = light_camera - position_camera;
    out.normal_camera = (frame.view * frame.model * vec4<f32>(vertex.normal, 0.0)).xyz;
    return out;
}

fn safe_normalize(v: vec3<f32>) -> vec3<f32> {
    return v / max(length(v), 1e-6);
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let light_color = vec3<f32>(1.0, 1.0, 1.0);
    let light_power = 50.0;

    let texel = textureSample(diffuse_texture, diffuse_sampler, in.uv).rgb;
    let diffuse_color = select(material.color.rgb, texel, material.use_texture != 0u);
    let ambient_color = diffuse_color * 0.1;
    let specular_color = vec3<f32>(0.3, 0.3, 0.3);

    let to_light = frame.light_position.xyz - in.world_position;
    let distance_sq = max(dot(to_light, to_light), 1e-4);

    let n = safe_normalize(in.normal_camera);
    let l = safe_normalize(in.light_direction_camera);
    let cos_theta = clamp(dot(n, l), 0.0, 1.0);

    let e = safe_normalize(in.eye_direction_camera);
    let r = reflect(-l, n);
    let cos_alpha = clamp(dot(e, r), 0.0, 1.0);

    let color = ambient_color
        + diffuse_color * light_color * light_power * cos_theta / distance_sq
        + specular_color * light_color * light_power * pow(cos_alpha, 5.0) / distance_sq;
    return vec4<f32>(color, 1.0);
}
"#;
