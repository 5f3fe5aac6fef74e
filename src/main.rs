//! Build a particle field from a JSON description and print a summary.
//!
//! ```text
//! particle-field [field.json] [--gpu]
//! ```
//!
//! With `--gpu` the buffers are also uploaded to a headless device.

use std::process::ExitCode;

use particle_field::gpu::{request_headless_device, ParticleFieldGpu};
use particle_field::{FieldDescription, ParticleField, ParticleFieldBuilder, RngSource};

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut path = None;
    let mut upload = false;
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--gpu" => upload = true,
            _ => path = Some(arg),
        }
    }

    let description = match path {
        Some(path) => match FieldDescription::load(&path) {
            Ok(description) => description,
            Err(e) => {
                log::error!("{}: {}", path, e);
                return ExitCode::FAILURE;
            }
        },
        None => FieldDescription::default(),
    };

    let field = match ParticleFieldBuilder::from_description(description).build(&mut RngSource::from_entropy()) {
        Ok(field) => field,
        Err(e) => {
            log::error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    print_summary(&field);

    if upload {
        match pollster::block_on(request_headless_device()) {
            Ok((device, _queue)) => {
                let gpu = ParticleFieldGpu::new(&device, &field, wgpu::TextureFormat::Rgba8UnormSrgb, None);
                log::info!("Uploaded {} particles", gpu.num_particles());
            }
            Err(e) => {
                log::error!("GPU error: {}", e);
                return ExitCode::FAILURE;
            }
        }
    }

    ExitCode::SUCCESS
}

fn print_summary(field: &ParticleField) {
    let bounds = field.bounds;
    println!("particles:   {}", field.count());
    println!(
        "bounds:      {} x {} x {}",
        bounds.x_bounds, bounds.y_bounds, bounds.z_bounds
    );
    println!("blend:       {:?}", field.shading.blend_mode);
    println!("transparent: {}", field.shading.transparent);
    println!("visible:     {}", field.shading.visible);

    if let Some(first) = field.records.first() {
        println!(
            "particle 0:  position {:?}, size {:?}, velocity {:?}",
            field.buffers.position(0),
            field.buffers.size(0),
            first.velocity
        );
    }
}
