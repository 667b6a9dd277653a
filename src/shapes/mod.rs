// Copyright @yucwang 2026

pub mod accretion_disk;
pub mod event_horizon;
