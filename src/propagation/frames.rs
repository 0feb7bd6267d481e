use chrono::{DateTime, Utc};
use serde::Serialize;

pub const EARTH_ROTATION_RAD_S: f64 = 7.292_115e-5;

// WGS-84
const WGS84_A_KM: f64 = 6378.137;
const WGS84_E2: f64 = 0.006_694_379_990_14;
const GEODETIC_ITERATIONS: usize = 6;

/// Geodetic position on the WGS-84 ellipsoid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Geodetic {
    pub longitude_deg: f64,
    pub latitude_deg: f64,
    pub altitude_km: f64,
}

impl Geodetic {
    pub fn lat_rad(&self) -> f64 {
        self.latitude_deg.to_radians()
    }

    pub fn lon_rad(&self) -> f64 {
        self.longitude_deg.to_radians()
    }
}

/// Greenwich mean sidereal angle (radians) at `timestamp`.
pub fn sidereal_angle(timestamp: DateTime<Utc>) -> f64 {
    sgp4::iau_epoch_to_sidereal_time(sgp4::julian_years_since_j2000(&timestamp.naive_utc()))
}

/// Rotate a TEME vector about the z axis by the sidereal angle.
pub fn teme_to_ecef_position(teme: [f64; 3], gmst: f64) -> [f64; 3] {
    let (sin, cos) = gmst.sin_cos();
    [cos * teme[0] + sin * teme[1], cos * teme[1] - sin * teme[0], teme[2]]
}

/// Earth-relative velocity: the rotated TEME velocity minus `ω × r`.
pub fn teme_to_ecef_velocity(pos_teme: [f64; 3], vel_teme: [f64; 3], gmst: f64) -> [f64; 3] {
    let [x, y, _] = teme_to_ecef_position(pos_teme, gmst);
    let [vx, vy, vz] = teme_to_ecef_position(vel_teme, gmst);
    [vx + EARTH_ROTATION_RAD_S * y, vy - EARTH_ROTATION_RAD_S * x, vz]
}

/// Project an ECEF vector onto the East-North-Up frame at (`lat_rad`, `lon_rad`).
pub fn ecef_to_enu(v: [f64; 3], lat_rad: f64, lon_rad: f64) -> (f64, f64, f64) {
    let sin_lat = lat_rad.sin();
    let cos_lat = lat_rad.cos();
    let sin_lon = lon_rad.sin();
    let cos_lon = lon_rad.cos();

    let east = -sin_lon * v[0] + cos_lon * v[1];
    let north = -sin_lat * cos_lon * v[0] - sin_lat * sin_lon * v[1] + cos_lat * v[2];
    let up = cos_lat * cos_lon * v[0] + cos_lat * sin_lon * v[1] + sin_lat * v[2];
    (east, north, up)
}

/// ECEF (km) to geodetic, fixed-point iteration on the latitude.
pub fn ecef_to_geodetic(pos: [f64; 3]) -> Geodetic {
    let [x, y, z] = pos;
    let p = x.hypot(y);
    let longitude_deg = y.atan2(x).to_degrees();

    let mut lat = z.atan2(p * (1.0 - WGS84_E2));
    for _ in 0..GEODETIC_ITERATIONS {
        let sin_lat = lat.sin();
        let n = WGS84_A_KM / (1.0 - WGS84_E2 * sin_lat * sin_lat).sqrt();
        lat = (z + WGS84_E2 * n * sin_lat).atan2(p);
    }

    let sin_lat = lat.sin();
    let cos_lat = lat.cos();
    let n = WGS84_A_KM / (1.0 - WGS84_E2 * sin_lat * sin_lat).sqrt();
    let altitude_km = if cos_lat.abs() > 1e-10 {
        p / cos_lat - n
    } else {
        z.abs() - n * (1.0 - WGS84_E2)
    };

    Geodetic {
        longitude_deg,
        latitude_deg: lat.to_degrees(),
        altitude_km,
    }
}
