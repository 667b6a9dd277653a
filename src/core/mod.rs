// Copyright @yucwang 2021

pub mod emitter;
pub mod integrator;
pub mod ray_batch;
pub mod rng;
pub mod scene;
pub mod scene_loader;
pub mod sensor;
pub mod shape;
