//! WGSL generators for the particle vertex and fragment stages.
//!
//! Both generators return complete, standalone WGSL modules. The vertex stage
//! expands every particle into an instanced quad (6 vertices) sized in screen
//! pixels; the fragment stage cuts the quad into the configured shape.
//!
//! # Vertex inputs
//!
//! | Location | Attribute | Type |
//! |----------|-----------|------|
//! | 0 | position | `vec3<f32>` |
//! | 1 | size | `f32` |
//! | 2 | color | `vec3<f32>` |
//!
//! All three are per-instance. Bind group 0, binding 0 holds [`ParticleUniforms`](crate::gpu::ParticleUniforms).

use serde::{Deserialize, Serialize};

use crate::color::{hex_to_rgb, FALLBACK_COLOR};

/// How the vertex stage assigns a color to each particle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    /// Every particle uses the configured base color (default).
    #[default]
    Solid,
    /// Color follows the direction of the particle from the field center.
    Rainbow,
    /// Per-particle colors from the color buffer.
    Vertex,
}

impl ColorMode {
    /// WGSL statements assigning `out.color`.
    fn to_wgsl_color(self) -> &'static str {
        match self {
            ColorMode::Solid => "    out.color = BASE_COLOR;",
            ColorMode::Rainbow => r#"    let dist = length(particle_pos);
    var dir = vec3<f32>(0.0, 1.0, 0.0);
    if dist > 0.0 {
        dir = particle_pos / dist;
    }
    out.color = dir * 0.5 + 0.5;"#,
            ColorMode::Vertex => "    out.color = particle_color;",
        }
    }
}

/// Sprite shape drawn for each particle.
///
/// Shapes use the quad UV space where (-1, -1) is bottom-left and (1, 1) is
/// top-right.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParticleShape {
    /// Circle with a soft edge (default).
    #[default]
    Circle,
    /// The whole quad.
    Square,
    /// Donut.
    Ring,
    /// Rhombus.
    Diamond,
    /// 5-pointed star.
    Star,
}

impl ParticleShape {
    /// WGSL fragment statements. Each body discards outside the shape and
    /// declares `alpha`.
    fn to_wgsl_fragment(self) -> &'static str {
        match self {
            ParticleShape::Circle => r#"    let dist = length(in.uv);
    if dist > 1.0 {
        discard;
    }
    let alpha = 1.0 - smoothstep(0.5, 1.0, dist);"#,

            ParticleShape::Square => "    let alpha = 1.0;",

            ParticleShape::Ring => r#"    let dist = length(in.uv);
    if dist > 1.0 || dist < 0.6 {
        discard;
    }
    let alpha = 1.0 - smoothstep(0.85, 1.0, dist);"#,

            ParticleShape::Diamond => r#"    let dist = abs(in.uv.x) + abs(in.uv.y);
    if dist > 1.0 {
        discard;
    }
    let alpha = 1.0;"#,

            ParticleShape::Star => r#"    let angle = atan2(in.uv.y, in.uv.x) + 1.5707963;
    let dist = length(in.uv);
    // Radius varies with angle, one lobe per point
    if dist > cos(angle * 5.0) * 0.4 + 0.6 {
        discard;
    }
    let alpha = 1.0;"#,
        }
    }
}

/// Format a float as a WGSL literal, substituting `fallback` for non-finite values.
fn wgsl_float(value: f32, fallback: f32) -> String {
    let value = if value.is_finite() { value } else { fallback };
    format!("{:?}", value)
}

/// Generate the vertex stage.
///
/// `color` is a hex token used as the base color in [`ColorMode::Solid`];
/// an invalid token draws white. Sprite sizes are scaled by
/// `device_pixel_ratio` so they keep their CSS pixel size on dense displays.
pub fn vertex_shader(color_mode: ColorMode, color: &str, device_pixel_ratio: f32) -> String {
    let base = hex_to_rgb(color).map_or(FALLBACK_COLOR, |rgb| rgb.normalized());
    let color_code = color_mode.to_wgsl_color();

    format!(
        r#"struct Uniforms {{
    view_proj: mat4x4<f32>,
    viewport: vec2<f32>,
    padding: vec2<f32>,
}};

@group(0) @binding(0)
var<uniform> uniforms: Uniforms;

const DEVICE_PIXEL_RATIO: f32 = {dpr};
const BASE_COLOR: vec3<f32> = vec3<f32>({r}, {g}, {b});

struct VertexOutput {{
    @builtin(position) clip_position: vec4<f32>,
    @location(0) color: vec3<f32>,
    @location(1) uv: vec2<f32>,
}};

@vertex
fn vs_main(
    @builtin(vertex_index) vertex_index: u32,
    @location(0) particle_pos: vec3<f32>,
    @location(1) particle_size: f32,
    @location(2) particle_color: vec3<f32>,
) -> VertexOutput {{
    var quad_vertices = array<vec2<f32>, 6>(
        vec2<f32>(-1.0, -1.0),
        vec2<f32>( 1.0, -1.0),
        vec2<f32>(-1.0,  1.0),
        vec2<f32>(-1.0,  1.0),
        vec2<f32>( 1.0, -1.0),
        vec2<f32>( 1.0,  1.0),
    );

    let quad_pos = quad_vertices[vertex_index];
    var clip_pos = uniforms.view_proj * vec4<f32>(particle_pos, 1.0);

    // Sprite is pixel_size pixels across
    let pixel_size = particle_size * DEVICE_PIXEL_RATIO;
    let offset = quad_pos * pixel_size / max(uniforms.viewport, vec2<f32>(1.0, 1.0));
    clip_pos.x += offset.x * clip_pos.w;
    clip_pos.y += offset.y * clip_pos.w;

    var out: VertexOutput;
    out.clip_position = clip_pos;
    out.uv = quad_pos;
{color_code}

    return out;
}}
"#,
        dpr = wgsl_float(device_pixel_ratio, 1.0),
        r = wgsl_float(base.x, 1.0),
        g = wgsl_float(base.y, 1.0),
        b = wgsl_float(base.z, 1.0),
        color_code = color_code,
    )
}

/// Generate the fragment stage.
///
/// The shape's alpha is multiplied by `transparency`, clamped to `0.0..=1.0`.
pub fn fragment_shader(shape: ParticleShape, transparency: f32) -> String {
    let transparency = if transparency.is_finite() {
        transparency.clamp(0.0, 1.0)
    } else {
        1.0
    };

    format!(
        r#"const TRANSPARENCY: f32 = {transparency};

struct FragmentInput {{
    @builtin(position) clip_position: vec4<f32>,
    @location(0) color: vec3<f32>,
    @location(1) uv: vec2<f32>,
}};

@fragment
fn fs_main(in: FragmentInput) -> @location(0) vec4<f32> {{
{shape_code}
    return vec4<f32>(in.color, alpha * TRANSPARENCY);
}}
"#,
        transparency = wgsl_float(transparency, 1.0),
        shape_code = shape.to_wgsl_fragment(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_SHAPES: [ParticleShape; 5] = [
        ParticleShape::Circle,
        ParticleShape::Square,
        ParticleShape::Ring,
        ParticleShape::Diamond,
        ParticleShape::Star,
    ];

    const ALL_MODES: [ColorMode; 3] = [ColorMode::Solid, ColorMode::Rainbow, ColorMode::Vertex];

    /// Validates WGSL code using naga.
    fn validate_wgsl(code: &str) -> Result<(), String> {
        let module = naga::front::wgsl::parse_str(code)
            .map_err(|e| format!("WGSL parse error: {:?}", e))?;

        let mut validator = naga::valid::Validator::new(
            naga::valid::ValidationFlags::all(),
            naga::valid::Capabilities::all(),
        );
        validator
            .validate(&module)
            .map_err(|e| format!("WGSL validation error: {:?}", e))?;

        Ok(())
    }

    #[test]
    fn test_vertex_shaders_validate() {
        for mode in ALL_MODES {
            let wgsl = vertex_shader(mode, "#3366ff", 2.0);
            validate_wgsl(&wgsl).unwrap_or_else(|e| panic!("{:?} vertex WGSL invalid: {}", mode, e));
        }
    }

    #[test]
    fn test_fragment_shaders_validate() {
        for shape in ALL_SHAPES {
            let wgsl = fragment_shader(shape, 0.5);
            validate_wgsl(&wgsl).unwrap_or_else(|e| panic!("{:?} fragment WGSL invalid: {}", shape, e));
        }
    }

    #[test]
    fn test_base_color_is_baked() {
        let wgsl = vertex_shader(ColorMode::Solid, "#ff8000", 1.0);
        assert!(wgsl.contains("vec3<f32>(1.0, 0.5, 0.0)"));
        assert!(wgsl.contains("out.color = BASE_COLOR;"));
    }

    #[test]
    fn test_invalid_base_color_is_white() {
        let wgsl = vertex_shader(ColorMode::Solid, "tomato", 1.0);
        assert!(wgsl.contains("vec3<f32>(1.0, 1.0, 1.0)"));
    }

    #[test]
    fn test_device_pixel_ratio_is_baked() {
        let wgsl = vertex_shader(ColorMode::Vertex, "#fff", 1.5);
        assert!(wgsl.contains("DEVICE_PIXEL_RATIO: f32 = 1.5;"));
        assert!(wgsl.contains("out.color = particle_color;"));

        let fallback = vertex_shader(ColorMode::Vertex, "#fff", f32::NAN);
        assert!(fallback.contains("DEVICE_PIXEL_RATIO: f32 = 1.0;"));
        validate_wgsl(&fallback).expect("NaN ratio should still produce valid WGSL");
    }

    #[test]
    fn test_transparency_is_baked() {
        assert!(fragment_shader(ParticleShape::Circle, 0.25).contains("TRANSPARENCY: f32 = 0.25;"));
        assert!(fragment_shader(ParticleShape::Circle, 3.0).contains("TRANSPARENCY: f32 = 1.0;"));
        assert!(fragment_shader(ParticleShape::Square, 0.0).contains("TRANSPARENCY: f32 = 0.0;"));
    }

    #[test]
    fn test_shapes_differ() {
        let circle = fragment_shader(ParticleShape::Circle, 1.0);
        let ring = fragment_shader(ParticleShape::Ring, 1.0);
        assert!(circle.contains("smoothstep(0.5, 1.0, dist)"));
        assert!(ring.contains("dist < 0.6"));
        assert!(!fragment_shader(ParticleShape::Square, 1.0).contains("discard"));
    }
}
