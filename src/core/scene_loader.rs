// Copyright @yucwang 2026

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::Path;

use quick_xml::events::Event;
use quick_xml::Reader;

use crate::core::scene::{Scene, SceneConstants, SceneError};
use crate::emitters::sky_dome::SkyDomeSettings;
use crate::math::constants::Float;

pub const DEFAULT_WIDTH: usize = 200;
pub const DEFAULT_HEIGHT: usize = 150;

#[derive(Debug)]
pub enum SceneLoadError {
    Io(std::io::Error),
    Parse(String),
    MissingField(&'static str),
    Invalid(SceneError),
}

impl From<std::io::Error> for SceneLoadError {
    fn from(err: std::io::Error) -> Self {
        SceneLoadError::Io(err)
    }
}

impl From<SceneError> for SceneLoadError {
    fn from(err: SceneError) -> Self {
        SceneLoadError::Invalid(err)
    }
}

impl fmt::Display for SceneLoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SceneLoadError::Io(err) => write!(f, "io error: {}", err),
            SceneLoadError::Parse(msg) => write!(f, "parse error: {}", msg),
            SceneLoadError::MissingField(field) => write!(f, "missing field: {}", field),
            SceneLoadError::Invalid(err) => write!(f, "invalid scene: {}", err),
        }
    }
}

impl std::error::Error for SceneLoadError {}

pub struct SceneLoadResult {
    pub scene: Scene,
    pub width: usize,
    pub height: usize,
    pub sky: SkyDomeSettings,
    pub time: Float,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum Section {
    Root,
    BlackHole,
    Disk,
    Sensor,
    Film,
    Integrator,
    Sky,
    Animation,
}

pub fn load_scene<P: AsRef<Path>>(path: P) -> Result<Scene, SceneLoadError> {
    let result = load_scene_with_settings(path)?;
    Ok(result.scene)
}

pub fn load_scene_with_settings<P: AsRef<Path>>(path: P) -> Result<SceneLoadResult, SceneLoadError> {
    let path = path.as_ref();
    log::info!("Loading scene from {}.", path.display());
    let xml = fs::read_to_string(path)?;
    parse_scene(&xml)
}

/// Parse a scene description. Unset values keep the reference scene's
/// defaults; a missing horizon radius is derived as `2M`.
pub fn parse_scene(xml: &str) -> Result<SceneLoadResult, SceneLoadError> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);
    let mut buf = Vec::new();

    let mut defaults: HashMap<String, String> = HashMap::new();
    let mut section = Section::Root;
    let mut saw_scene = false;

    let mut constants = SceneConstants::default();
    let mut horizon_radius: Option<Float> = None;
    let mut width = DEFAULT_WIDTH;
    let mut height = DEFAULT_HEIGHT;
    let mut sky = SkyDomeSettings::default();
    let mut time: Float = 0.0;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Eof) => break,
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) => {
                match e.name().as_ref() {
                    b"scene" => saw_scene = true,
                    b"default" => {
                        let mut key: Option<String> = None;
                        let mut value: Option<String> = None;
                        for attr in e.attributes().flatten() {
                            match attr.key.as_ref() {
                                b"name" => key = Some(attr.unescape_value().unwrap_or_default().to_string()),
                                b"value" => value = Some(attr.unescape_value().unwrap_or_default().to_string()),
                                _ => {}
                            }
                        }
                        if let (Some(k), Some(v)) = (key, value) {
                            defaults.insert(k, v);
                        }
                    }
                    b"blackhole" => section = Section::BlackHole,
                    b"disk" => section = Section::Disk,
                    b"sky" => section = Section::Sky,
                    b"animation" => section = Section::Animation,
                    b"sensor" => {
                        let sensor_type = type_attribute(&e, &defaults);
                        if sensor_type.as_deref().unwrap_or("perspective") != "perspective" {
                            return Err(SceneLoadError::Parse(format!("unsupported sensor: {}", sensor_type.unwrap_or_default())));
                        }
                        section = Section::Sensor;
                    }
                    b"film" => {
                        if section == Section::Sensor {
                            section = Section::Film;
                        }
                    }
                    b"integrator" => {
                        let integrator_type = type_attribute(&e, &defaults);
                        if integrator_type.as_deref().unwrap_or("geodesic") != "geodesic" {
                            return Err(SceneLoadError::Parse(format!("unsupported integrator: {}", integrator_type.unwrap_or_default())));
                        }
                        section = Section::Integrator;
                    }
                    b"float" | b"integer" => {
                        let mut name_attr: Option<String> = None;
                        let mut value_attr: Option<String> = None;
                        for attr in e.attributes().flatten() {
                            match attr.key.as_ref() {
                                b"name" => name_attr = Some(attr.unescape_value().unwrap_or_default().to_string()),
                                b"value" => value_attr = Some(resolve_value(&attr.unescape_value().unwrap_or_default(), &defaults)),
                                _ => {}
                            }
                        }
                        let name = name_attr.ok_or(SceneLoadError::MissingField("property.name"))?;
                        let value = value_attr.ok_or(SceneLoadError::MissingField("property.value"))?;

                        match (section, name.as_str()) {
                            (Section::BlackHole, "mass") => constants.mass = parse_float(&value)?,
                            (Section::BlackHole, "horizon_radius") => horizon_radius = Some(parse_float(&value)?),
                            (Section::Disk, "inner_radius") => constants.disk_inner = parse_float(&value)?,
                            (Section::Disk, "outer_radius") => constants.disk_outer = parse_float(&value)?,
                            (Section::Sensor, "fov") => constants.fov_deg = parse_float(&value)?,
                            (Section::Sensor, "yaw") => constants.yaw = parse_float(&value)?,
                            (Section::Sensor, "pitch") => constants.pitch = parse_float(&value)?,
                            (Section::Sensor, "distance") => constants.camera_distance = parse_float(&value)?,
                            (Section::Film, "width") => width = parse_usize(&value)?,
                            (Section::Film, "height") => height = parse_usize(&value)?,
                            (Section::Integrator, "step_size") => constants.step_size = parse_float(&value)?,
                            (Section::Integrator, "max_steps") => constants.max_steps = parse_u32(&value)?,
                            (Section::Sky, "width") => sky.width = parse_usize(&value)?,
                            (Section::Sky, "height") => sky.height = parse_usize(&value)?,
                            (Section::Sky, "stars") => sky.stars = parse_usize(&value)?,
                            (Section::Sky, "seed") => sky.seed = parse_u64(&value)?,
                            (Section::Animation, "time") => time = parse_float(&value)?,
                            (section, name) => {
                                log::warn!("ignoring property '{}' in {:?} section", name, section);
                            }
                        }
                    }
                    _ => {}
                }
            }
            Ok(Event::End(e)) => {
                match e.name().as_ref() {
                    b"film" => section = Section::Sensor,
                    b"blackhole" | b"disk" | b"sensor" | b"integrator" | b"sky" | b"animation" => {
                        section = Section::Root;
                    }
                    _ => {}
                }
            }
            Err(e) => {
                return Err(SceneLoadError::Parse(e.to_string()));
            }
            _ => {}
        }

        buf.clear();
    }

    if !saw_scene {
        return Err(SceneLoadError::MissingField("scene"));
    }

    constants = match horizon_radius {
        Some(rs) => SceneConstants { horizon_radius: rs, ..constants },
        None => constants.with_schwarzschild_horizon(),
    };
    let scene = Scene::new(constants)?;

    Ok(SceneLoadResult { scene, width, height, sky, time })
}

fn type_attribute(e: &quick_xml::events::BytesStart, defaults: &HashMap<String, String>) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|attr| attr.key.as_ref() == b"type")
        .map(|attr| resolve_value(&attr.unescape_value().unwrap_or_default(), defaults))
}

fn resolve_value(raw: &str, defaults: &HashMap<String, String>) -> String {
    let mut out = raw.to_string();
    for (k, v) in defaults {
        out = out.replace(&format!("${}", k), v);
    }
    out
}

fn parse_float(value: &str) -> Result<Float, SceneLoadError> {
    value.trim().parse::<Float>().map_err(|_| SceneLoadError::Parse(format!("invalid float: {}", value)))
}

fn parse_u32(value: &str) -> Result<u32, SceneLoadError> {
    value.trim().parse::<u32>().map_err(|_| SceneLoadError::Parse(format!("invalid integer: {}", value)))
}

fn parse_u64(value: &str) -> Result<u64, SceneLoadError> {
    value.trim().parse::<u64>().map_err(|_| SceneLoadError::Parse(format!("invalid integer: {}", value)))
}

fn parse_usize(value: &str) -> Result<usize, SceneLoadError> {
    value.trim().parse::<usize>().map_err(|_| SceneLoadError::Parse(format!("invalid integer: {}", value)))
}
