use accretion::core::ray_batch::TerminalState;
use accretion::core::scene_loader::load_scene_with_settings;
use accretion::core::sensor::Sensor;
use accretion::core::shape::Crossing;
use accretion::emitters::sky_dome::SkyDome;
use accretion::integrators::geodesic::GeodesicTracer;
use accretion::math::constants::Float;
use console::style;
use std::env;

fn main() {
    let args: Vec<String> = env::args().collect();
    if args.len() < 4 {
        eprintln!("Usage: {} <scene.xml> <x> <y> [--every N] [--time T] [--width N] [--height N] [--seed N]", args[0]);
        std::process::exit(1);
    }

    let scene_path = &args[1];
    let x: usize = args[2].parse().unwrap_or(0);
    let y: usize = args[3].parse().unwrap_or(0);

    let mut every: u32 = 25;
    let mut time: Option<Float> = None;
    let mut width: Option<usize> = None;
    let mut height: Option<usize> = None;
    let mut seed: Option<u64> = None;

    let mut i = 4;
    while i < args.len() {
        match args[i].as_str() {
            "--every" => {
                i += 1;
                every = args.get(i).and_then(|v| v.parse::<u32>().ok()).unwrap_or(every).max(1);
            }
            "--time" => {
                i += 1;
                time = args.get(i).and_then(|v| v.parse::<Float>().ok());
            }
            "--width" => {
                i += 1;
                width = args.get(i).and_then(|v| v.parse::<usize>().ok());
            }
            "--height" => {
                i += 1;
                height = args.get(i).and_then(|v| v.parse::<usize>().ok());
            }
            "--seed" => {
                i += 1;
                seed = args.get(i).and_then(|v| v.parse::<u64>().ok());
            }
            _ => {}
        }
        i += 1;
    }

    let load_result = match load_scene_with_settings(scene_path) {
        Ok(result) => result,
        Err(e) => {
            eprintln!("failed to load scene: {}", e);
            std::process::exit(1);
        }
    };
    let width = width.unwrap_or(load_result.width);
    let height = height.unwrap_or(load_result.height);
    let time = time.unwrap_or(load_result.time);
    let mut sky_settings = load_result.sky;
    if let Some(seed) = seed {
        sky_settings.seed = seed;
    }

    if x >= width || y >= height {
        eprintln!("Pixel out of bounds: ({}, {}) for size {}x{}", x, y, width, height);
        std::process::exit(2);
    }

    let scene = load_result.scene;
    let sky = SkyDome::new(&sky_settings);
    let camera = scene.camera(width, height);
    let tracer = GeodesicTracer::new(&scene, &sky, time);
    let ray = camera.pixel_ray(x, y);
    let (u, v) = camera.film_offset(x, y);

    println!("trace_pixel_path: scene={} pixel=({}, {}) u={:.6} v={:.6} t={}", scene_path, x, y, u, v, time);
    println!(
        "origin=({:.5}, {:.5}, {:.5}) dir=({:.5}, {:.5}, {:.5})",
        ray.origin().x, ray.origin().y, ray.origin().z,
        ray.dir().x, ray.dir().y, ray.dir().z
    );

    let record = tracer.trace_ray_with(&ray, |step, position, direction| {
        if step % every == 0 {
            println!(
                "step {:4}: r={:.5} p=({:.5}, {:.5}, {:.5}) d=({:.5}, {:.5}, {:.5})",
                step, position.norm(),
                position.x, position.y, position.z,
                direction.x, direction.y, direction.z
            );
        }
    });

    let label = match record.state {
        TerminalState::Disk => style("disk").yellow().bold(),
        TerminalState::Horizon => style("horizon").red().bold(),
        TerminalState::Sky => style("sky").cyan().bold(),
    };
    println!(
        "terminated: {} after {} steps at p=({:.5}, {:.5}, {:.5}) color=({:.6}, {:.6}, {:.6})",
        label, record.steps,
        record.position.x, record.position.y, record.position.z,
        record.color[0], record.color[1], record.color[2]
    );

    match record.crossing {
        Some(Crossing::Disk { radius }) => {
            let e = tracer.shader().emission(&record.position, &record.direction, radius, time);
            println!("disk radius={:.5} phi={:.5} omega={:.6} band={:.5}", radius, e.phi, e.angular_velocity, e.texture);
            println!("beta={:.5} cos_theta={:.5} gamma={:.5}", e.beta, e.cos_theta, e.gamma);
            println!(
                "doppler={:.5} gravitational={:.5} delta={:.5} T_em={:.1} T_obs={:.1}",
                e.doppler, e.gravitational, e.delta, e.emitted_temperature, e.observed_temperature
            );
        }
        Some(Crossing::Horizon) => {
            println!("{}", style("captured by the event horizon").dim());
        }
        None => {
            let (tx, ty) = sky.texel_from_direction(&record.direction);
            println!("sky texel=({}, {})", tx, ty);
        }
    }
}
