// Copyright 2020 @TwoCookingMice

pub mod bitmap;
pub mod blackbody;
pub mod constants;
pub mod ray;
pub mod spectrum;
