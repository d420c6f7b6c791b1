/// Input validation utilities for the feed service
use validator::ValidateUrl;

pub const POST_CONTENT_MAX: usize = 280;
pub const BIO_MAX: usize = 160;
pub const LOCATION_NAME_MAX: usize = 100;

/// Radius applied when a proximity query omits the distance component.
pub const DEFAULT_NEAR_DISTANCE_METERS: f64 = 10_000.0;

/// Validates post and reply bodies: non-blank, at most 280 characters.
pub fn validate_content(content: &str) -> bool {
    !content.trim().is_empty() && content.chars().count() <= POST_CONTENT_MAX
}

/// Validates profile bios: at most 160 characters, empty allowed.
pub fn validate_bio(bio: &str) -> bool {
    bio.chars().count() <= BIO_MAX
}

/// Validates display labels for places.
pub fn validate_location_name(name: &str) -> bool {
    name.chars().count() <= LOCATION_NAME_MAX
}

/// Validates image and profile picture URLs.
pub fn validate_image_url(url: &str) -> bool {
    url.validate_url()
}

pub fn validate_longitude(value: f64) -> bool {
    value.is_finite() && (-180.0..=180.0).contains(&value)
}

pub fn validate_latitude(value: f64) -> bool {
    value.is_finite() && (-90.0..=90.0).contains(&value)
}

/// Parses a `location` query value of the form `lng,lat` or `lng,lat,meters`.
///
/// Returns `(longitude, latitude, max_distance_meters)` with the distance
/// defaulting to 10 km. A value that does not parse as coordinates yields
/// `None`; the caller decides whether that means "ignore" or "reject".
pub fn parse_location_param(raw: &str) -> Option<(f64, f64, f64)> {
    let parts: Vec<&str> = raw.split(',').map(str::trim).collect();
    if parts.len() != 2 && parts.len() != 3 {
        return None;
    }

    let longitude: f64 = parts[0].parse().ok()?;
    let latitude: f64 = parts[1].parse().ok()?;
    if !validate_longitude(longitude) || !validate_latitude(latitude) {
        return None;
    }

    let distance = match parts.get(2) {
        Some(meters) => {
            let parsed: f64 = meters.parse().ok()?;
            if !parsed.is_finite() || parsed <= 0.0 {
                return None;
            }
            parsed
        }
        None => DEFAULT_NEAR_DISTANCE_METERS,
    };

    Some((longitude, latitude, distance))
}
