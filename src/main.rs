// Copyright 2020 TwoCookingMice

use accretion::core::scene_loader::load_scene_with_settings;
use accretion::emitters::sky_dome::SkyDome;
use accretion::io::{exr_utils, image_utils};
use accretion::renderers::tiled::{Renderer, TiledRenderer};

use std::env;
use std::path::Path;
use std::time::Instant;

fn parse_next<T: std::str::FromStr>(args: &[String], i: &mut usize, flag: &str) -> Option<T> {
    *i += 1;
    let parsed = args.get(*i).and_then(|v| v.parse::<T>().ok());
    if parsed.is_none() {
        log::warn!("ignoring {}: expected a value", flag);
    }
    parsed
}

fn main() {
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info");
    }
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 3 {
        eprintln!("Usage: {} <scene.xml> <output.(png|exr)> [--width N] [--height N] [--time T] [--seed N] [--threads N] [--block N] [--quiet]", args[0]);
        std::process::exit(1);
    }

    let input_path = &args[1];
    let output_path = &args[2];
    let mut width_override: Option<usize> = None;
    let mut height_override: Option<usize> = None;
    let mut time_override: Option<f32> = None;
    let mut seed_override: Option<u64> = None;
    let mut threads: Option<usize> = None;
    let mut block_size: Option<usize> = None;
    let mut show_progress = true;

    let mut i = 3;
    while i < args.len() {
        match args[i].as_str() {
            "--width" => width_override = parse_next(&args, &mut i, "--width"),
            "--height" => height_override = parse_next(&args, &mut i, "--height"),
            "--time" => time_override = parse_next(&args, &mut i, "--time"),
            "--seed" => seed_override = parse_next(&args, &mut i, "--seed"),
            "--threads" => threads = parse_next(&args, &mut i, "--threads"),
            "--block" => block_size = parse_next(&args, &mut i, "--block"),
            "--quiet" => show_progress = false,
            other => log::warn!("unknown argument: {}", other),
        }
        i += 1;
    }

    let load_result = match load_scene_with_settings(input_path) {
        Ok(result) => result,
        Err(e) => {
            log::error!("failed to load scene {}: {}", input_path, e);
            std::process::exit(1);
        }
    };

    let width = width_override.unwrap_or(load_result.width);
    let height = height_override.unwrap_or(load_result.height);
    let time = time_override.unwrap_or(load_result.time);
    let mut sky_settings = load_result.sky;
    if let Some(seed) = seed_override {
        sky_settings.seed = seed;
    }

    let start = Instant::now();
    let sky = SkyDome::new(&sky_settings);
    log::info!("generated {}x{} sky with {} stars in {:.2?}",
               sky.width(), sky.height(), sky_settings.stars, start.elapsed());

    let mut renderer = TiledRenderer::new().with_progress(show_progress);
    if let Some(threads) = threads {
        renderer = renderer.with_threads(threads);
    }
    if let Some(block_size) = block_size {
        renderer = renderer.with_block_size(block_size);
    }

    let frame = match renderer.render(&load_result.scene, &sky, width, height, time) {
        Ok(frame) => frame,
        Err(e) => {
            log::error!("render failed: {}", e);
            std::process::exit(1);
        }
    };

    let stats = frame.stats();
    log::info!("disk {} / horizon {} / sky {} pixels",
               stats.disk_hits, stats.horizon_hits, stats.sky_hits);

    let is_exr = Path::new(output_path)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("exr"))
        .unwrap_or(false);
    let written = if is_exr {
        exr_utils::write_exr_to_file(frame.bitmap(), output_path)
    } else {
        image_utils::write_ldr_to_file(frame.bitmap(), output_path)
    };

    match written {
        Ok(()) => log::info!("wrote {}", output_path),
        Err(e) => {
            log::error!("{}", e);
            std::process::exit(1);
        }
    }
}
