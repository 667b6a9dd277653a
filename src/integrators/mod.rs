// Copyright @yucwang 2026

pub mod geodesic;
pub mod newtonian;
